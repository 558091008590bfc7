//! # gabb-entity
//!
//! Row models for the Gabb backend. Every struct in this crate represents a
//! database table row and derives `sqlx::FromRow`.

pub mod token;
