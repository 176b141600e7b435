//! Headless-mode tests for the terminal UI.

pub mod common;
pub mod headless_test;
pub mod runner_test;
