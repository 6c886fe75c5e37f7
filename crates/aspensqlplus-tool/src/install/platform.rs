use std::fmt;

/// Bare name of the formatter executable, without any platform suffix
pub const TOOL_NAME: &str = "aspensqlplus-fmt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOS,
    Windows,
    /// Any other system, carried by its native identifier (`linux`, `freebsd`, ...)
    Other(&'static str),
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::MacOS => "darwin",
            Os::Windows => "windows",
            Os::Other(name) => name,
        }
    }
}

/// Operating-system/CPU-architecture pair selecting the prebuilt binary variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformTriple {
    pub os: Os,
    pub arch: &'static str,
}

impl PlatformTriple {
    pub fn new(os: Os, arch: &'static str) -> Self {
        Self { os, arch }
    }

    /// Triple of the running process
    pub fn current() -> Self {
        Self::new(detect_os(), detect_arch())
    }
}

impl fmt::Display for PlatformTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch)
    }
}

pub fn detect_os() -> Os {
    #[cfg(target_os = "macos")]
    return Os::MacOS;

    #[cfg(target_os = "windows")]
    return Os::Windows;

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    Os::Other(std::env::consts::OS)
}

pub fn detect_arch() -> &'static str {
    std::env::consts::ARCH
}

pub fn binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "aspensqlplus-fmt.exe";

    #[cfg(not(target_os = "windows"))]
    return "aspensqlplus-fmt";
}

/// Release archive file name, e.g. `aspensqlplus-fmt-0.1.0-linux-x86_64.zip`
pub fn archive_name(version: &str, triple: &PlatformTriple) -> String {
    format!("{}-{}-{}.zip", TOOL_NAME, version, triple)
}
