//! Integration tests for the session and the MySQL client.
//!
//! The MySQL tests are skipped when DATABASE_URL is not set.

pub mod connection_test;
pub mod query_test;
pub mod session_test;
