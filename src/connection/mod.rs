//! Connection management for the chat session.
//!
//! Owns the single active MySQL connection and its replacement on reconnect.

pub mod manager;

pub use manager::ConnectionManager;
