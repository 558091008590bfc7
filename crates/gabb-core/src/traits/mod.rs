//! Core traits defined in `gabb-core` and implemented by other crates.

pub mod health;
pub mod object_store;
pub mod person;

pub use health::HealthCheck;
pub use object_store::ObjectStore;
pub use person::PersonDirectory;
