//! Integration tests for CLI argument handling
//!
//! Tests the flag surface of the compiled binary without touching the
//! network or the terminal UI.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hullwatch"))
        .args(args)
        .output()
        .expect("Failed to execute hullwatch")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hullwatch"), "Help should mention hullwatch");
    assert!(stdout.contains("refresh"), "Help should mention --refresh flag");
    assert!(stdout.contains("json"), "Help should mention --json flag");
    assert!(
        stdout.contains("clear-cache"),
        "Help should mention --clear-cache flag"
    );
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(
        output.status.success(),
        "Expected --version to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hullwatch"), "Version should mention hullwatch");
}

#[test]
fn test_unknown_flag_fails() {
    let output = run_cli(&["--definitely-not-a-flag"]);
    assert!(!output.status.success(), "Unknown flags should be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unexpected"),
        "Should print a parse error: {}",
        stderr
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use hullwatch::cli::{Cli, StartupConfig};

    #[test]
    fn test_all_flags_parse_together() {
        let cli = Cli::parse_from(["hullwatch", "--refresh", "--json", "--clear-cache"]);
        let config = StartupConfig::from_cli(&cli);

        assert!(config.force_refresh);
        assert!(config.json_output);
        assert!(config.clear_cache);
    }

    #[test]
    fn test_defaults_are_all_off() {
        let cli = Cli::parse_from(["hullwatch"]);
        let config = StartupConfig::from_cli(&cli);

        assert!(!config.force_refresh);
        assert!(!config.json_output);
        assert!(!config.clear_cache);
    }
}
