//! # gabb-auth
//!
//! Token lifecycle and authorization for the Gabb backend.
//!
//! ## Modules
//!
//! - `keys`: RSA key pair loading from object storage, with optional caching
//! - `jwt`: RS256 claim encoding and verification
//! - `scope`: the fixed principal/purpose → scope catalog
//! - `revocation`: the single-use token revocation list
//! - `authorizer`: bearer token + scope (or owner) → allow/deny
//! - `issuance`: builds and signs tokens for each principal and purpose
//! - `password`: Argon2id password hashing

pub mod authorizer;
pub mod clock;
pub mod error;
pub mod issuance;
pub mod jwt;
pub mod keys;
pub mod password;
pub mod revocation;
pub mod scope;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use authorizer::{Authorizer, Decision};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthError, DenyReason};
pub use issuance::{IssuedToken, TokenIssuer};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use keys::KeyProvider;
pub use password::PasswordHasher;
pub use revocation::RevocationStore;
pub use scope::{PrincipalType, TokenPurpose};
