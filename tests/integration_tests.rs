//! Integration tests for infra-widgets
//!
//! These tests drive the binary the way a log renderer or an operator would.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create an infra-widgets Command with a clean environment
fn widgets() -> Command {
    let mut cmd = cargo_bin_cmd!("infra-widgets");
    for var in [
        "WIDGETS_SEARCH_URL",
        "WIDGETS_SOURCE_URL",
        "WIDGETS_REGISTRY_URL",
        "WIDGETS_SERVERS_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to write a widgets.toml pointing links at test hosts
fn write_test_config(dir: &TempDir) {
    let config_content = r#"
[links]
search_url = "https://search.test/?q="
source_url = "https://source.test/"
"#;
    fs::write(dir.path().join("widgets.toml"), config_content).unwrap();
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        widgets()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("decorate"))
            .stdout(predicate::str::contains("serve"));
    }

    #[test]
    fn test_version() {
        widgets().arg("--version").assert().success();
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        widgets().arg("frobnicate").assert().failure();
    }
}

// =============================================================================
// Message Decoration Tests
// =============================================================================

mod decoration {
    use super::*;

    #[test]
    fn test_decorate_argument() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .current_dir(dir.path())
            .args(["decorate", "See T1234 and rABCD and rABCD1234567"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"<a href="https://source.test/T1234">T1234</a>"#,
            ))
            .stdout(predicate::str::contains(
                r#"<a href="https://source.test/diffusion/ABCD/">rABCD</a>"#,
            ))
            .stdout(predicate::str::contains(
                r#"<a href="https://source.test/rABCD1234567">rABCD1234567</a>"#,
            ));
    }

    #[test]
    fn test_decorate_stdin_one_message_per_line() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .current_dir(dir.path())
            .arg("decorate")
            .write_stdin("Reverted a1b2c3d\nthe word acceded stood alone\nran `make test`\n")
            .assert()
            .success()
            .stdout(predicate::eq(concat!(
                "Reverted <a href=\"https://search.test/?q=a1b2c3d\">a1b2c3d</a>\n",
                "the word acceded stood alone\n",
                "ran <code>make test</code>\n",
            )));
    }

    #[test]
    fn test_decorate_empty_stdin() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .arg("decorate")
            .write_stdin("")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn test_decorate_default_links_without_config() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .args(["decorate", "T1"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"<a href="https://devcentral.nasqueron.org/T1">T1</a>"#,
            ));
    }

    #[test]
    fn test_decorate_env_overrides_config() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .current_dir(dir.path())
            .env("WIDGETS_SOURCE_URL", "https://env.test/")
            .args(["decorate", "D42"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"<a href="https://env.test/D42">D42</a>"#,
            ));
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .arg("config")
            .arg("show")
            .assert()
            .success()
            .stdout(predicate::str::contains("Using default configuration"))
            .stdout(predicate::str::contains("port = 8080"));
    }

    #[test]
    fn test_config_init_creates_toml() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .arg("config")
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created widgets.toml"));

        let content = fs::read_to_string(dir.path().join("widgets.toml")).unwrap();
        assert!(content.contains("[links]"));
        assert!(content.contains("[salt]"));
    }

    #[test]
    fn test_config_init_does_not_overwrite() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .current_dir(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));

        let content = fs::read_to_string(dir.path().join("widgets.toml")).unwrap();
        assert!(content.contains("https://source.test/"));
    }

    #[test]
    fn test_config_validate_no_config() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .arg("config")
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Using defaults (valid)"));
    }

    #[test]
    fn test_config_validate_with_warnings() {
        let dir = create_temp_project();
        let config_content = r#"
[links]
source_url = "source.test"

[salt]
base_url = "https://ops.test"
"#;
        fs::write(dir.path().join("widgets.toml"), config_content).unwrap();

        widgets()
            .current_dir(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration warnings"))
            .stdout(predicate::str::contains("links.source_url"))
            .stdout(predicate::str::contains("salt.base_url"));
    }

    #[test]
    fn test_config_shows_toml_content() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("https://search.test/?q="));
    }

    #[test]
    fn test_invalid_toml_fails() {
        let dir = create_temp_project();
        fs::write(dir.path().join("widgets.toml"), "[links\n").unwrap();

        widgets()
            .current_dir(dir.path())
            .args(["decorate", "T1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse widgets.toml"));
    }
}

// =============================================================================
// Widget Fetch Tests
// =============================================================================

mod widgets_fetch {
    use super::*;

    #[test]
    fn test_registry_unreachable_fails() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .args(["registry", "--url", "http://127.0.0.1:9"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Querying http://127.0.0.1:9"))
            .stderr(predicate::str::contains("Failed to fetch"));
    }

    #[test]
    fn test_servers_unreachable_fails() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .env("WIDGETS_SERVERS_URL", "http://127.0.0.1:9/servers.json")
            .arg("servers")
            .assert()
            .failure()
            .stderr(predicate::str::contains("http://127.0.0.1:9/servers.json"));
    }

    #[test]
    fn test_states_requires_server_argument() {
        widgets().arg("states").assert().failure();
    }
}

// =============================================================================
// Global Flags Tests
// =============================================================================

mod global_flags {
    use super::*;

    #[test]
    fn test_project_dir_flag() {
        let dir = create_temp_project();
        write_test_config(&dir);

        widgets()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["decorate", "P7"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://source.test/P7"));
    }

    #[test]
    fn test_verbose_flag_keeps_stdout_clean() {
        let dir = create_temp_project();

        widgets()
            .current_dir(dir.path())
            .args(["--verbose", "decorate", "plain text"])
            .assert()
            .success()
            .stdout(predicate::eq("plain text\n"));
    }
}
