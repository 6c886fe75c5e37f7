//! End-to-end integration tests for aspensqlplus-tool
//!
//! These tests verify the complete flow from binary resolution to running the
//! formatter and interpreting its output.

use aspensqlplus_core::AspenError;
use aspensqlplus_testkit::IsolatedEnv;
use aspensqlplus_tool::diagnostics::{self, FilterPolicy};
use aspensqlplus_tool::exec::{check_document, format_document, invoke};
use aspensqlplus_tool::install::binary_name;
use aspensqlplus_tool::{
    BinaryResolver, ExecutableLocation, FormatOptions, ResolutionOptions, ResolverEnv, Tier,
};
use url::Url;

fn resolver_env(isolated: &IsolatedEnv) -> ResolverEnv {
    ResolverEnv::new(
        isolated.cache_dir(),
        Url::parse("http://127.0.0.1:9/releases").unwrap(),
    )
    .with_bundle_root(isolated.bundle_dir())
    .with_workspace_root(isolated.workspace_dir())
}

fn offline_options() -> ResolutionOptions {
    ResolutionOptions {
        custom_path: None,
        auto_build: false,
        auto_download: false,
        release_version: "0.1.0".to_string(),
    }
}

#[test]
fn test_e2e_nothing_available_falls_back_to_bare_name() {
    let isolated = IsolatedEnv::new();
    let resolver = BinaryResolver::new(resolver_env(&isolated));

    let resolution = resolver.resolve(ResolutionOptions {
        custom_path: Some(String::new()),
        ..offline_options()
    });

    assert_eq!(resolution.tier, Tier::Path);
    assert_eq!(
        resolution.location,
        ExecutableLocation::Command(binary_name().to_string())
    );
    assert!(resolution.warnings.is_empty());
    assert!(resolver.env().cache_dir().is_dir(), "cache dir created on miss");
}

#[test]
fn test_e2e_bare_name_not_on_path_is_spawn_error() {
    let missing = ExecutableLocation::Command("aspensqlplus-fmt-not-installed-51d2".to_string());

    let err = format_document(&missing, &FormatOptions::default(), "select 1;").unwrap_err();
    assert!(matches!(err, AspenError::SpawnError { .. }), "{err}");
    assert!(err.to_string().starts_with("SPAWN_ERROR"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use aspensqlplus_testkit::{FAKE_DIAGNOSTICS, failing_formatter, fake_formatter, write_script};

    fn install_bundled(isolated: &IsolatedEnv, env: &ResolverEnv) -> PathBuf {
        let path = env.bundled_binary_path().unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let written = fake_formatter(path.parent().unwrap(), binary_name());
        assert!(written.starts_with(isolated.bundle_dir()));
        written
    }

    #[test]
    fn test_e2e_bundled_format_and_check() {
        let isolated = IsolatedEnv::new();
        let env = resolver_env(&isolated);
        let bundled = install_bundled(&isolated, &env);

        let resolution = BinaryResolver::new(env).resolve(offline_options());
        assert_eq!(resolution.tier, Tier::Bundled);
        assert_eq!(resolution.location, ExecutableLocation::Path(bundled));

        let formatted = format_document(
            &resolution.location,
            &FormatOptions::default(),
            "select a from t;\n",
        )
        .unwrap();
        assert_eq!(formatted, "SELECT A FROM T;\n");

        let report = check_document(&resolution.location, "declare x number;\n").unwrap();
        assert_eq!(report, FAKE_DIAGNOSTICS);

        let records = diagnostics::parse(&report);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_index, 1);
        assert_eq!(records[0].start_column, 6);
        assert_eq!(records[0].end_column, 16);

        let policy = FilterPolicy::new().with_category("unused-variable", false);
        let kept = diagnostics::filter(records, &policy);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "duplicate-variable");
    }

    #[test]
    fn test_e2e_custom_path_beats_bundled() {
        let isolated = IsolatedEnv::new();
        let env = resolver_env(&isolated);
        install_bundled(&isolated, &env);
        let custom = write_script(isolated.root(), "custom-fmt", "cat > /dev/null\necho custom\n");

        let resolution = BinaryResolver::new(env).resolve(ResolutionOptions {
            custom_path: Some(format!("  {}  ", custom.display())),
            ..offline_options()
        });

        assert_eq!(resolution.tier, Tier::Custom);
        let formatted =
            format_document(&resolution.location, &FormatOptions::default(), "x").unwrap();
        assert_eq!(formatted, "custom\n");
    }

    #[test]
    fn test_e2e_source_build_is_used() {
        let isolated = IsolatedEnv::new();
        let project = isolated.workspace_dir().join("formatter");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("Cargo.toml"), "[package]\nname = \"fmt\"\n").unwrap();

        // Stand-in for cargo that drops the fake formatter into target/release.
        let release_dir = project.join("target").join("release");
        let fake_cargo = write_script(
            isolated.root(),
            "fake-cargo",
            &format!(
                "mkdir -p '{dir}'\ncat > '{dir}/{bin}' <<'SCRIPT'\n#!/bin/sh\n{body}SCRIPT\nchmod 755 '{dir}/{bin}'\n",
                dir = release_dir.display(),
                bin = binary_name(),
                body = aspensqlplus_testkit::fake_formatter_body(),
            ),
        );

        let resolver = BinaryResolver::with_parts(
            resolver_env(&isolated),
            aspensqlplus_tool::install::ArchiveFetcher::new(),
            aspensqlplus_tool::build::SourceBuilder::with_program(&fake_cargo),
        );
        let resolution = resolver.resolve(ResolutionOptions {
            auto_build: true,
            ..offline_options()
        });

        assert_eq!(resolution.tier, Tier::Built);
        assert_eq!(
            resolution.location,
            ExecutableLocation::Path(release_dir.join(binary_name()))
        );
        let formatted =
            format_document(&resolution.location, &FormatOptions::default(), "begin null; end;")
                .unwrap();
        assert_eq!(formatted, "BEGIN NULL; END;");
    }

    #[test]
    fn test_e2e_failing_formatter_surfaces_stderr() {
        let isolated = IsolatedEnv::new();
        let formatter = failing_formatter(isolated.root(), "fmt", "parse error at 1:8");
        let location = ExecutableLocation::Path(formatter);

        let err = format_document(&location, &FormatOptions::default(), "selec 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "PROTOCOL_ERROR: format exited with code 2: parse error at 1:8"
        );

        let err = check_document(&location, "selec 1").unwrap_err();
        assert!(matches!(err, AspenError::ProtocolError { exit_code: 2, .. }));
    }

    #[test]
    fn test_e2e_large_document_round_trips() {
        let isolated = IsolatedEnv::new();
        let location = ExecutableLocation::Path(fake_formatter(isolated.root(), "fmt"));
        let document = "select col from tab;\n".repeat(50_000);

        let formatted =
            format_document(&location, &FormatOptions::default(), &document).unwrap();
        assert_eq!(formatted.len(), document.len());
        assert_eq!(formatted, document.to_uppercase());
    }

    #[test]
    fn test_e2e_tool_ignoring_stdin_still_reports() {
        let isolated = IsolatedEnv::new();
        let location =
            ExecutableLocation::Path(write_script(isolated.root(), "fmt", "echo early\nexit 0\n"));
        let document = "x".repeat(1 << 20);

        let result = invoke(&location, &[], &document).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "early\n");
    }

    #[test]
    fn test_e2e_invoke_passes_arguments() {
        let isolated = IsolatedEnv::new();
        let location = ExecutableLocation::Path(write_script(
            isolated.root(),
            "fmt",
            "cat > /dev/null\necho \"$@\"\necho diag >&2\n",
        ));
        let args = aspensqlplus_tool::exec::format_args(&FormatOptions {
            line_width: 120,
            indent_width: 4,
            uppercase_keywords: false,
        });

        let result = invoke(&location, &args, "").unwrap();
        assert_eq!(
            result.stdout,
            "--line-width 120 --indent 4 --uppercase-keywords false\n"
        );
        assert_eq!(result.stderr, "diag\n");
    }
}
