//! HTTP request handlers.

pub mod account;
pub mod health;
