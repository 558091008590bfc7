//! Shared fixtures for unit and integration tests.
//!
//! Compiled for this crate's tests and, with the `test-support` feature,
//! for other crates' tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use gabb_core::config::AuthConfig;
use gabb_core::error::AppError;
use gabb_core::result::AppResult;
use gabb_core::traits::ObjectStore;
use gabb_entity::token::RevocationRecord;

use crate::authorizer::Authorizer;
use crate::clock::FixedClock;
use crate::issuance::TokenIssuer;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder};
use crate::keys::{KeyProvider, StaticKeyProvider};
use crate::revocation::{MemoryRevocationStore, RevocationStore};

/// RSA-2048 private key (PKCS#8) matching [`PUBLIC_KEY_PEM`].
pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/private.pem");
/// Public half of [`PRIVATE_KEY_PEM`].
pub const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../fixtures/public.pem");
/// An unrelated RSA-2048 private key.
pub const FOREIGN_PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/foreign_private.pem");

/// A fixed instant (2026-01-01T00:00:00Z) tests freeze the clock at.
pub const NOW: i64 = 1_767_225_600;

/// The fixture key pair.
pub fn static_keys() -> StaticKeyProvider {
    StaticKeyProvider::new(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM)
}

/// Signs with the foreign key; verification half is the fixture public key.
pub fn foreign_keys() -> StaticKeyProvider {
    StaticKeyProvider::new(FOREIGN_PRIVATE_KEY_PEM, PUBLIC_KEY_PEM)
}

/// Sign claims with a key the fixture public key will not verify.
pub async fn sign_with_foreign_key(claims: &Claims) -> String {
    JwtEncoder::new(Arc::new(foreign_keys()))
        .encode(claims)
        .await
        .expect("foreign key signs")
}

/// Whether `password` verifies against an Argon2 PHC `hash`.
pub fn password_matches(password: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| {
            argon2::Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Object store held in memory that can be switched to failing.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryObjectStore {
    /// Store an object.
    pub fn put(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .expect("object map lock")
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    /// Make every call fail as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `get` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self, _bucket: &str) -> AppResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage("connection refused"));
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .expect("object map lock")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {bucket}/{key}")))
    }
}

/// A memory object store holding the fixture pair under the default
/// bucket and object names.
pub fn key_bucket() -> MemoryObjectStore {
    let config = AuthConfig::default();
    let store = MemoryObjectStore::default();
    store.put(&config.key_bucket, &config.private_key_name, PRIVATE_KEY_PEM);
    store.put(&config.key_bucket, &config.public_key_name, PUBLIC_KEY_PEM);
    store
}

/// Revocation store whose every call fails.
#[derive(Debug, Default)]
pub struct FailingRevocationStore;

#[async_trait]
impl RevocationStore for FailingRevocationStore {
    async fn is_invalid(&self, _token: &str) -> AppResult<bool> {
        Err(AppError::database("connection reset"))
    }

    async fn mark_invalid(&self, _token: &str) -> AppResult<()> {
        Err(AppError::database("connection reset"))
    }

    async fn mark_valid(&self, _token: &str) -> AppResult<()> {
        Err(AppError::database("connection reset"))
    }

    async fn claim(&self, _token: &str) -> AppResult<bool> {
        Err(AppError::database("connection reset"))
    }

    async fn find(&self, _token: &str) -> AppResult<Option<RevocationRecord>> {
        Err(AppError::database("connection reset"))
    }
}

/// Authorizer and issuer wired over fixture keys, a frozen clock, and an
/// in-memory revocation list.
#[derive(Debug, Clone)]
pub struct TestAuth {
    /// Clock shared by decoder and issuer, frozen at [`NOW`].
    pub clock: Arc<FixedClock>,
    /// The revocation list.
    pub revocations: Arc<dyn RevocationStore>,
    /// The authorizer under test.
    pub authorizer: Authorizer,
    /// Issuer signing with the same keys.
    pub issuer: TokenIssuer,
}

impl TestAuth {
    /// Fixture keys and an empty in-memory revocation list.
    pub fn new() -> Self {
        Self::build(Arc::new(static_keys()), Arc::new(MemoryRevocationStore::new()))
    }

    /// Custom keys and an empty in-memory revocation list.
    pub fn with_keys(keys: impl KeyProvider) -> Self {
        Self::build(Arc::new(keys), Arc::new(MemoryRevocationStore::new()))
    }

    /// Fixture keys and a revocation list that always fails.
    pub fn with_failing_store() -> Self {
        Self::build(Arc::new(static_keys()), Arc::new(FailingRevocationStore))
    }

    /// Fixture keys over the given revocation list.
    pub fn with_store(revocations: Arc<dyn RevocationStore>) -> Self {
        Self::build(Arc::new(static_keys()), revocations)
    }

    fn build(keys: Arc<dyn KeyProvider>, revocations: Arc<dyn RevocationStore>) -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let decoder = JwtDecoder::new(keys.clone(), clock.clone());
        let issuer = TokenIssuer::new(JwtEncoder::new(keys), clock.clone());
        Self {
            clock,
            authorizer: Authorizer::new(decoder, revocations.clone()),
            revocations,
            issuer,
        }
    }

    /// Sign arbitrary claims with the fixture key.
    pub async fn sign(&self, claims: Claims) -> String {
        JwtEncoder::new(Arc::new(static_keys()))
            .encode(&claims)
            .await
            .expect("fixture key signs")
    }
}

impl Default for TestAuth {
    fn default() -> Self {
        Self::new()
    }
}
