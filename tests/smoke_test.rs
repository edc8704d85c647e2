/// Smoke tests to verify the binary runs without panicking
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    let log = std::env::temp_dir().join("termglobe-smoke.log");
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .arg("--log-file")
        .arg(&log)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = run(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("termglobe"),
        "Help output should mention termglobe"
    );
}

#[test]
fn binary_shows_version() {
    let output = run(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = run(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn cities_lists_current_home() {
    let output = run(&["cities"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6);
    let current: Vec<_> = stdout.lines().filter(|l| l.starts_with('*')).collect();
    assert_eq!(current.len(), 1);
    assert!(current[0].contains("London"));
}

#[test]
fn print_renders_a_frame_offline() {
    let output = run(&["print", "--width", "60", "--height", "20"]);
    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
}

#[test]
fn print_plain_has_no_escape_codes() {
    let output = run(&["print", "--width", "60", "--height", "20", "--plain"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(!stdout.contains('\x1b'));
    assert!(stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
}
