//! End-to-end CLI tests for mieru.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn mieru() -> Command {
    let mut cmd = cargo_bin_cmd!("mieru");
    cmd.env("NO_COLOR", "1").env_remove("MIERU_LOG");
    cmd
}

// ============================================
// Basic CLI Tests
// ============================================

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help() {
        mieru()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("mieru"))
            .stdout(predicate::str::contains("--max-depth"))
            .stdout(predicate::str::contains("--shared-tracking"));
    }

    #[test]
    fn shows_version() {
        mieru()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn missing_root_fails() {
        let tmp = TempDir::new().expect("tempdir");
        mieru()
            .arg(tmp.path().join("nope"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not exist"));
    }

    #[test]
    fn unreadable_hint_fails() {
        mieru()
            .arg(fixtures_path().join("vue_blog"))
            .args(["--hint", "/definitely/not/here.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("framework hint"));
    }
}

// ============================================
// Report Tests
// ============================================

mod reports {
    use super::*;

    #[test]
    fn summary_for_react_fixture() {
        mieru()
            .arg(fixtures_path().join("react_shop"))
            .assert()
            .success()
            .stdout(predicate::str::contains("7 of 7 files parsed successfully"))
            .stdout(predicate::str::contains("no circular dependencies"))
            .stdout(predicate::str::contains("Pages: 2 pages"));
    }

    #[test]
    fn json_report_is_valid() {
        let output = mieru()
            .arg(fixtures_path().join("vue_blog"))
            .arg("--json")
            .output()
            .expect("run mieru");
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
        assert_eq!(json["flavor"], "vue");
        assert_eq!(json["framework"]["name"], "Vue.js");
        assert_eq!(json["diagnostics"]["error_count"], 0);
        assert_eq!(json["pages"]["stats"]["total_pages"], 2);
        assert!(json["graph"]["nodes"].is_object());
    }

    #[test]
    fn pages_flag_leaves_graph_out() {
        let output = mieru()
            .arg(fixtures_path().join("react_shop"))
            .args(["--json", "--pages", "--max-depth", "0"])
            .output()
            .expect("run mieru");
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
        assert!(json.get("graph").is_none());
        let pages = json["pages"]["pages"].as_object().expect("pages map");
        for page in pages.values() {
            for component in page["components"].as_array().expect("components") {
                assert_eq!(component["depth"], 0);
            }
        }
    }

    #[test]
    fn hint_file_decides_unknown_projects() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("flows")).expect("mkdir");
        std::fs::write(tmp.path().join("flows/checkout.js"), "export const x = 1;\n").expect("write");
        let hint = tmp.path().join("hint.json");
        std::fs::write(
            &hint,
            r#"{"framework": "Vue.js", "confidence": 90, "pagePatterns": ["flows/**/*.js"]}"#,
        )
        .expect("write");

        let output = mieru()
            .arg(tmp.path())
            .arg("--json")
            .arg("--hint")
            .arg(&hint)
            .output()
            .expect("run mieru");
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
        assert_eq!(json["flavor"], "vue");
        assert_eq!(json["pages"]["stats"]["total_pages"], 1);
    }
}
