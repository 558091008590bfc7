//! Repository implementations for Gabb entities.

pub mod person;
pub mod token;

pub use person::PersonRepository;
pub use token::TokenRepository;
