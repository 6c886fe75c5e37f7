//! Formatter executable management for aspensqlplus.
//!
//! This crate locates (or obtains) the `aspensqlplus-fmt` executable, runs it over
//! a document and interprets what it prints.
//!
//! # Architecture
//!
//! - [`resolve`]: Fallback chain deciding which executable to use
//! - [`install`]: Platform naming, release URLs and archive extraction
//! - [`build`]: Building the formatter from a source checkout
//! - [`exec`]: Stdin/stdout invocation and exit-code conventions
//! - [`diagnostics`]: Parsing and filtering of the diagnostic report
//!
//! # Resolution Flow
//!
//! ```text
//! BinaryResolver::resolve()
//!     ↓
//! 1. Custom path (returned as-is when non-blank)
//!     ↓
//! 2. Bundled: {bundle_root}/bin/{os}-{arch}/aspensqlplus-fmt
//!     ↓
//! 3. Cache: {storage_root}/{os}-{arch}/aspensqlplus-fmt
//!     ↓ (auto_download)
//! 4. Download {base}/v{version}/aspensqlplus-fmt-{version}-{os}-{arch}.zip into the cache
//!     ↓ (auto_build)
//! 5. cargo build --release in {workspace_root}/formatter
//!     ↓
//! 6. Bare name, looked up on PATH when spawned
//! ```
//!
//! # Example
//!
//! ```no_run
//! use aspensqlplus_tool::{BinaryResolver, FormatOptions, ResolutionOptions, ResolverEnv};
//! use aspensqlplus_tool::exec::format_document;
//! use url::Url;
//!
//! # fn main() -> aspensqlplus_core::Result<()> {
//! let base = Url::parse("https://github.com/aspensqlplus/aspensqlplus-fmt/releases/download")
//!     .expect("valid url");
//! let resolver = BinaryResolver::new(ResolverEnv::new("/tmp/aspensqlplus", base));
//!
//! let resolution = resolver.resolve(ResolutionOptions {
//!     custom_path: None,
//!     auto_build: false,
//!     auto_download: true,
//!     release_version: "0.1.0".to_string(),
//! });
//! for warning in &resolution.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! let formatted = format_document(&resolution.location, &FormatOptions::default(), "select 1;")?;
//! print!("{}", formatted);
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod diagnostics;
pub mod exec;
pub mod http;
pub mod info;
pub mod install;
pub mod resolve;

// Re-export commonly used types
pub use diagnostics::{DiagnosticRecord, FilterPolicy, Severity};
pub use exec::{FormatOptions, InvocationMode, InvocationResult};
pub use info::{ExecutableLocation, Tier};
pub use install::PlatformTriple;
pub use resolve::{BinaryResolver, Resolution, ResolutionOptions, ResolveWarning, ResolverEnv};

// Type alias for convenience
pub type Result<T> = aspensqlplus_core::Result<T>;
