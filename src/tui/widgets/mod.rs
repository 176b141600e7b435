//! TUI widgets for chat-mysql.
//!
//! Contains reusable UI components.

pub mod chat;
pub mod header;
pub mod input;
pub mod sidebar;
pub mod spinner;
