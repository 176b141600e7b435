//! Common test utilities for TUI tests.

use std::process::Command;

/// Runs chat-mysql in headless mode with the mock LLM and mock database.
///
/// `--config` points at a missing file so a user config cannot leak in.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_chat-mysql"))
        .args([
            "--headless",
            "--llm",
            "mock",
            "--mock-db",
            "--config",
            "/nonexistent/chat-mysql/config.toml",
        ])
        .args(args)
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
