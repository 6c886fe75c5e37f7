//! Integration tests for doctor command

mod common;

use aspensqlplus_testkit::IsolatedEnv;
use common::{OFFLINE_SETTINGS, aspen_cmd, install_bundled_formatter, write_settings};

fn doctor_json(isolated: &IsolatedEnv) -> serde_json::Value {
    let assert = aspen_cmd(isolated).args(["doctor", "--json"]).assert().success();
    serde_json::from_slice(&assert.get_output().stdout).expect("Output should be valid JSON")
}

fn find_check<'a>(json: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    json["checks"]
        .as_array()
        .expect("checks should be an array")
        .iter()
        .find(|check| check["id"] == id)
        .unwrap_or_else(|| panic!("missing check {id}"))
}

#[test]
fn test_doctor_exits_zero_on_success() {
    let isolated = IsolatedEnv::new();
    write_settings(&isolated, OFFLINE_SETTINGS);

    aspen_cmd(&isolated).arg("doctor").assert().success();
}

#[test]
fn test_doctor_exits_zero_on_invalid_config() {
    let isolated = IsolatedEnv::new();
    write_settings(&isolated, "[format]\nline_width = 0\n");

    let json = doctor_json(&isolated);

    let config = find_check(&json, "config_valid");
    assert_eq!(config["status"], "error");
    assert!(
        config["message"]
            .as_str()
            .unwrap()
            .contains("CONFIG_INVALID_VALUE")
    );
    // The remaining checks still ran.
    find_check(&json, "cached_binary");
}

#[test]
fn test_doctor_json_output_structure() {
    let isolated = IsolatedEnv::new();

    let json = doctor_json(&isolated);

    assert_eq!(json["schema_version"], "1.0");
    assert!(json["platform"].as_str().unwrap().contains('-'));
    assert!(json.get("timestamp").is_some());
    for check in json["checks"].as_array().unwrap() {
        assert!(check.get("id").is_some());
        assert!(check.get("name").is_some());
        assert!(check.get("message").is_some());
        let status = check["status"].as_str().unwrap();
        assert!(
            ["ok", "warning", "error"].contains(&status),
            "Status should be ok, warning, or error, got: {}",
            status
        );
    }
}

#[test]
fn test_doctor_reports_bundled_binary() {
    let isolated = IsolatedEnv::new();
    let bundled = install_bundled_formatter(&isolated);

    let json = doctor_json(&isolated);

    let check = find_check(&json, "bundled_binary");
    assert_eq!(check["status"], "ok");
    assert_eq!(check["details"]["path"], bundled.display().to_string());
    assert_eq!(find_check(&json, "cached_binary")["status"], "warning");
}

#[test]
fn test_doctor_never_downloads() {
    let isolated = IsolatedEnv::new();
    write_settings(&isolated, "[executable]\nauto_download = true\n");

    doctor_json(&isolated);

    let entries = std::fs::read_dir(isolated.cache_dir()).unwrap().count();
    assert_eq!(entries, 0, "doctor must not touch the cache");
}

#[test]
fn test_doctor_reports_source_project() {
    let isolated = IsolatedEnv::new();
    let project = isolated.workspace_dir().join("formatter");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("Cargo.toml"), "[package]\n").unwrap();

    let json = doctor_json(&isolated);

    assert_eq!(find_check(&json, "source_project")["status"], "ok");
}

#[test]
fn test_doctor_human_readable() {
    let isolated = IsolatedEnv::new();
    let assert = aspen_cmd(&isolated).arg("doctor").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("Environment Health Check"));
    assert!(stdout.contains("Formatter on PATH"));
}

#[test]
fn test_doctor_warns_on_unknown_diagnostic_category() {
    let isolated = IsolatedEnv::new();
    write_settings(
        &isolated,
        &format!("{}\n[diagnostics]\nunused-varaible = false\n", OFFLINE_SETTINGS),
    );

    let json = doctor_json(&isolated);

    let check = find_check(&json, "diagnostic_categories");
    assert_eq!(check["status"], "warning");
    assert_eq!(check["message"], "unknown categories: unused-varaible");
}
