//! Integration tests for sheetscope

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn sheetscope() -> Command {
        cargo_bin_cmd!("sheetscope")
    }

    /// Temp dir holding a config rooted at the dir, with HTTP disabled
    fn workspace() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[loader]\nroot = {:?}\nallow_http = false\n",
                dir.path().display().to_string()
            ),
        )
        .unwrap();
        (dir, config)
    }

    fn with_config(config: &Path) -> Command {
        let mut cmd = sheetscope();
        cmd.arg("--config").arg(config);
        cmd
    }

    #[test]
    fn help_displays() {
        sheetscope()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Stylesheet"));
    }

    #[test]
    fn version_displays() {
        sheetscope()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sheetscope"));
    }

    #[test]
    fn config_path_honours_flag() {
        let (_dir, config) = workspace();
        with_config(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let (_dir, config) = workspace();
        with_config(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[loader]"))
            .stdout(predicate::str::contains("allow_http = false"));
    }

    #[test]
    fn invalid_config_reports_hint() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "[loader\n").unwrap();

        with_config(&config)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("config init --force"));
    }

    #[test]
    fn resolve_reports_loaded_sheet() {
        let (dir, config) = workspace();
        fs::write(dir.path().join("a.css"), "a { color: red }").unwrap();

        with_config(&config)
            .args(["resolve", "a.css", "a.css", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"state\": \"loaded\""))
            .stdout(predicate::str::contains("\"bytes\": 16"));
    }

    #[test]
    fn resolve_missing_sheet_is_reported() {
        let (_dir, config) = workspace();

        with_config(&config)
            .args(["resolve", "missing.css", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"state\": \"failed\""));
    }

    #[test]
    fn resolve_strict_fails_on_missing_sheet() {
        let (dir, config) = workspace();
        fs::write(dir.path().join("a.css"), "a {}").unwrap();

        with_config(&config)
            .args(["resolve", "a.css", "missing.css", "--strict"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("1 of 2 stylesheet loads failed"));
    }

    #[test]
    fn resolve_rejects_http_when_disabled() {
        let (_dir, config) = workspace();

        with_config(&config)
            .args(["resolve", "https://example.com/a.css", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("scheme https"))
            .stdout(predicate::str::contains("loader.allow_http = true"));
    }

    #[test]
    fn resolve_shows_hint_for_disabled_http() {
        let (_dir, config) = workspace();

        with_config(&config)
            .args(["resolve", "https://example.com/a.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Hint: Enable HTTP loading"));
    }

    #[test]
    fn adopt_manifest_json() {
        let (dir, config) = workspace();
        fs::write(dir.path().join("base.css"), "body {}").unwrap();
        fs::write(dir.path().join("a.css"), "a {}").unwrap();
        fs::write(dir.path().join("b.css"), "b {}").unwrap();
        let manifest = dir.path().join("adopt.toml");
        fs::write(
            &manifest,
            r#"
default_scope = "document"
sheets = ["a.css", { identifier = "b.css", scope = "panel" }]

[[scope]]
name = "document"
adopted = ["base.css"]

[[scope]]
name = "panel"
"#,
        )
        .unwrap();

        let output = with_config(&config)
            .arg("adopt")
            .arg(&manifest)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let scopes = report["scopes"].as_array().unwrap();
        assert_eq!(scopes.len(), 2);

        let document: Vec<&str> = scopes[0]["sheets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["identifier"].as_str().unwrap())
            .collect();
        assert_eq!(document, ["base.css", "a.css"]);
        assert_eq!(scopes[1]["sheets"][0]["identifier"], "b.css");
        assert_eq!(scopes[1]["sheets"][0]["state"], "loaded");
        assert!(report["unadopted"].as_array().unwrap().is_empty());
    }

    #[test]
    fn adopt_without_default_scope_leaves_sheets_unadopted() {
        let (dir, config) = workspace();
        fs::write(dir.path().join("a.css"), "a {}").unwrap();
        let manifest = dir.path().join("adopt.toml");
        fs::write(&manifest, "sheets = [\"a.css\"]\n").unwrap();

        with_config(&config)
            .arg("adopt")
            .arg(&manifest)
            .assert()
            .success()
            .stdout(predicate::str::contains("Unadopted"));
    }

    #[test]
    fn adopt_unknown_scope_fails() {
        let (dir, config) = workspace();
        let manifest = dir.path().join("adopt.toml");
        fs::write(
            &manifest,
            "sheets = [{ identifier = \"a.css\", scope = \"nowhere\" }]\n",
        )
        .unwrap();

        with_config(&config)
            .arg("adopt")
            .arg(&manifest)
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown scope 'nowhere'"));
    }

    #[test]
    fn adopt_strict_fails_on_missing_sheet() {
        let (dir, config) = workspace();
        let manifest = dir.path().join("adopt.toml");
        fs::write(
            &manifest,
            "default_scope = \"document\"\nsheets = [\"missing.css\"]\n\n[[scope]]\nname = \"document\"\n",
        )
        .unwrap();

        with_config(&config)
            .arg("adopt")
            .arg(&manifest)
            .arg("--strict")
            .assert()
            .failure()
            .stderr(predicate::str::contains("stylesheet loads failed"));
    }
}
