//! Revocation list entities.

pub mod model;

pub use model::RevocationRecord;
