//! # gabb-storage
//!
//! Object storage provider implementations for Gabb. The signing key pair
//! is read from here, either from S3 or, in development, from the local
//! filesystem.

pub mod manager;
pub mod providers;

pub use manager::{BucketHealth, StorageManager};
