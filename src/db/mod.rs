//! Embedded database connection and register repositories.

pub mod appointment;
pub mod connection;
pub mod dismissal;
pub mod entry;
pub mod seed;

pub use connection::{TableCounts, connect, ensure_created, get_table_counts, test_connection};
pub use seed::seed_test_data;
