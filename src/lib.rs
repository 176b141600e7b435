//! chat-mysql: chat with a MySQL database in natural language.
//!
//! This library exposes the core modules for the binary and for integration
//! tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod secrets;
pub mod tui;
