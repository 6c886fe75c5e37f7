//! Release download through the resolver, served by the shared mock server

use aspensqlplus_testkit::fixtures::{zip_bytes, zip_with_executable};
use aspensqlplus_testkit::{IsolatedEnv, get_shared_mock_server, shared_mock_url};
use aspensqlplus_tool::install::{PlatformTriple, archive_name, binary_name};
use aspensqlplus_tool::{BinaryResolver, ExecutableLocation, ResolutionOptions, ResolverEnv, Tier};
use url::Url;

fn resolver_for(isolated: &IsolatedEnv) -> BinaryResolver {
    let base = Url::parse(&format!("{}/releases", shared_mock_url())).unwrap();
    BinaryResolver::new(
        ResolverEnv::new(isolated.cache_dir(), base)
            .with_bundle_root(isolated.bundle_dir())
            .with_workspace_root(isolated.workspace_dir()),
    )
}

fn download_options(version: &str) -> ResolutionOptions {
    ResolutionOptions {
        custom_path: None,
        auto_build: false,
        auto_download: true,
        release_version: version.to_string(),
    }
}

fn release_path(version: &str) -> String {
    format!(
        "/releases/v{}/{}",
        version,
        archive_name(version, &PlatformTriple::current())
    )
}

#[test]
fn test_download_then_cache_hit() {
    let isolated = IsolatedEnv::new();
    let mock = {
        let mut server = get_shared_mock_server();
        server
            .mock("GET", release_path("0.2.0").as_str())
            .with_status(200)
            .with_body(zip_with_executable(
                binary_name(),
                "#!/bin/sh\ncat > /dev/null\necho downloaded\n",
            ))
            .expect(1)
            .create()
    };
    let resolver = resolver_for(&isolated);

    let first = resolver.resolve(download_options("0.2.0"));
    assert_eq!(first.tier, Tier::Downloaded);
    assert!(first.warnings.is_empty(), "{:?}", first.warnings);
    let cached = resolver.env().cached_binary_path();
    assert_eq!(first.location, ExecutableLocation::Path(cached.clone()));
    assert!(cached.is_file());

    let second = resolver.resolve(download_options("0.2.0"));
    assert_eq!(second.tier, Tier::Cached);
    assert_eq!(second.location, ExecutableLocation::Path(cached));

    mock.assert();
}

#[cfg(unix)]
#[test]
fn test_downloaded_binary_runs() {
    use aspensqlplus_tool::FormatOptions;
    use aspensqlplus_tool::exec::format_document;

    let isolated = IsolatedEnv::new();
    let _mock = {
        let mut server = get_shared_mock_server();
        server
            .mock("GET", release_path("0.3.0").as_str())
            .with_status(200)
            .with_body(zip_with_executable(
                binary_name(),
                "#!/bin/sh\ncat > /dev/null\necho downloaded\n",
            ))
            .create()
    };

    let resolution = resolver_for(&isolated).resolve(download_options("v0.3.0"));
    assert_eq!(resolution.tier, Tier::Downloaded);

    let output =
        format_document(&resolution.location, &FormatOptions::default(), "select 1;").unwrap();
    assert_eq!(output, "downloaded\n");
}

#[test]
fn test_missing_release_warns_and_falls_back() {
    let isolated = IsolatedEnv::new();
    let _mock = {
        let mut server = get_shared_mock_server();
        server
            .mock("GET", release_path("0.4.0").as_str())
            .with_status(404)
            .create()
    };

    let resolution = resolver_for(&isolated).resolve(ResolutionOptions {
        auto_build: true,
        ..download_options("0.4.0")
    });

    assert_eq!(resolution.tier, Tier::Path);
    assert_eq!(
        resolution.location,
        ExecutableLocation::Command(binary_name().to_string())
    );
    assert_eq!(resolution.warnings.len(), 1);
    assert_eq!(resolution.warnings[0].tier, Tier::Downloaded);
    assert!(resolution.warnings[0].message.starts_with("NETWORK_ERROR"));
}

#[test]
fn test_archive_without_binary_warns() {
    let isolated = IsolatedEnv::new();
    let _mock = {
        let mut server = get_shared_mock_server();
        server
            .mock("GET", release_path("0.5.0").as_str())
            .with_status(200)
            .with_body(zip_bytes(&[("LICENSE", b"MIT".as_slice())]))
            .create()
    };

    let resolution = resolver_for(&isolated).resolve(download_options("0.5.0"));

    assert_eq!(resolution.tier, Tier::Path);
    assert_eq!(resolution.warnings.len(), 1);
    assert!(resolution.warnings[0].message.contains("did not contain"));
}

#[test]
fn test_resolution_serializes_for_reporting() {
    let isolated = IsolatedEnv::new();
    let resolution = resolver_for(&isolated).resolve(ResolutionOptions {
        auto_download: false,
        ..download_options("0.1.0")
    });

    let json = serde_json::to_value(&resolution).unwrap();
    assert_eq!(json["tier"], "path");
    assert_eq!(json["location"], binary_name());
    assert_eq!(json["warnings"], serde_json::json!([]));
}
