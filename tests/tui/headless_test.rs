//! End-to-end tests of the binary in headless mode.

use super::common::run_headless;

/// Moves focus from the Host field to the Connect button and presses it.
const CONNECT: &str = "key:tab,key:tab,key:tab,key:tab,key:tab,key:enter";

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--events", "key:esc"]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(stdout.contains("Events: 1 executed"), "stdout: {stdout}");
    assert!(stdout.contains("Chat with MySQL"));
}

#[test]
fn test_headless_initial_screen() {
    let (code, stdout, _) = run_headless(&["--size", "120x40", "--events", "wait:1"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Settings"));
    assert!(stdout.contains("[ Connect ]"));
    assert!(stdout.contains("not connected"));
    assert!(stdout.contains("Type a message..."));
}

#[test]
fn test_headless_connect_and_ask() {
    let events = format!(
        "{CONNECT},type:Name some artists,key:enter,\
         assert:contains:Connected to database!,\
         assert:contains:SELECT Name FROM Artist LIMIT 10;,\
         assert:not-contains:Tip: Either"
    );
    let (code, stdout, stderr) = run_headless(&[
        "-d",
        "chinook",
        "--size",
        "120x40",
        "--events",
        &events,
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}\nstderr: {stderr}");
    assert!(stdout.contains(r#""passed": 3"#));
    assert!(stdout.contains(r#""failed": 0"#));
    assert!(stdout.contains(r#""is_connected": true"#));
}

#[test]
fn test_headless_ask_without_connection_shows_warnings() {
    let (code, stdout, _) = run_headless(&[
        "--size",
        "120x40",
        "--events",
        "key:backtab,key:backtab,type:Name 3 artists,key:enter,assert:contains:Tip: Either Check the Prompt",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_type_event() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "key:backtab,key:backtab,type:hello world",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains(r#""input_text": "hello world""#));
    assert!(stdout.contains(r#""focus": "Input""#));
}

#[test]
fn test_headless_assertion_fail() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "assert:contains:goodbye",
        "--output",
        "json",
    ]);

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert!(stdout.contains(r#""passed": 0"#));
    assert!(stdout.contains(r#""failed": 1"#));
}

#[test]
fn test_headless_fail_fast() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "assert:contains:goodbye,key:esc,key:esc",
        "--fail-fast",
    ]);

    assert_eq!(code, 1);
    assert!(stdout.contains("Events: 1 executed"), "stdout: {stdout}");
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_headless(&[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}

#[test]
fn test_headless_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screen.txt");
    let path_str = path.to_str().unwrap();

    let (code, stdout, _) = run_headless(&["--events", "key:esc", "--output-file", path_str]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Events: 1 executed"));
}
