//! # gabb-database
//!
//! PostgreSQL connection management, embedded migrations, and the
//! repositories backing the revocation list and person directory.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
