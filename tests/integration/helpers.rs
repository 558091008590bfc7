//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dashmap::DashMap;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use gabb_api::{AppState, build_app};
use gabb_auth::TokenPurpose;
use gabb_auth::testing::{TestAuth, password_matches};
use gabb_core::config::CorsConfig;
use gabb_core::error::AppError;
use gabb_core::result::AppResult;
use gabb_core::traits::PersonDirectory;

/// The account fields the token flows touch.
#[derive(Debug, Clone)]
pub struct StoredPerson {
    pub id: Uuid,
    pub email: Option<String>,
    pub email_address_validated: bool,
    pub hashed_password: Option<String>,
}

/// Person directory held in memory.
#[derive(Debug, Default)]
pub struct MemoryPersons {
    persons: DashMap<String, StoredPerson>,
    unavailable: AtomicBool,
}

impl MemoryPersons {
    /// Add a person with an unvalidated email and return their id.
    pub fn add(&self, email: &str) -> String {
        let person = StoredPerson {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            email_address_validated: false,
            hashed_password: None,
        };
        let id = person.id.to_string();
        self.persons.insert(id.clone(), person);
        id
    }

    /// Snapshot of a stored person.
    pub fn get(&self, id: &str) -> Option<StoredPerson> {
        self.persons.get(id).map(|p| p.clone())
    }

    /// Make every update fail with a database error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl PersonDirectory for MemoryPersons {
    async fn mark_email_validated(&self, person_id: &str) -> AppResult<()> {
        self.ensure_available()?;
        let mut person = self
            .persons
            .get_mut(person_id)
            .ok_or_else(|| AppError::not_found(format!("Person not found: {person_id}")))?;
        person.email_address_validated = true;
        Ok(())
    }

    async fn set_password_hash(&self, person_id: &str, password_hash: &str) -> AppResult<()> {
        self.ensure_available()?;
        let mut person = self
            .persons
            .get_mut(person_id)
            .ok_or_else(|| AppError::not_found(format!("Person not found: {person_id}")))?;
        person.hashed_password = Some(password_hash.to_string());
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Keys, clock, revocation list, and issuer behind the router
    pub auth: TestAuth,
    /// The person directory behind the router
    pub persons: Arc<MemoryPersons>,
}

impl TestApp {
    /// Create a new test application over fresh in-memory stores
    pub fn new() -> Self {
        Self::with_auth(TestAuth::new())
    }

    /// Create a test application over the given auth fixtures
    pub fn with_auth(auth: TestAuth) -> Self {
        let persons = Arc::new(MemoryPersons::default());
        let state = AppState::new(auth.authorizer.clone(), persons.clone());
        let router = build_app(state, &CorsConfig::default());
        Self {
            router,
            auth,
            persons,
        }
    }

    /// Sign a single-purpose token for a person.
    pub async fn single_purpose_token(&self, person_id: &str, purpose: TokenPurpose) -> String {
        self.auth
            .issuer
            .issue_single_purpose(person_id, purpose)
            .await
            .expect("fixture key signs")
            .token
    }

    /// POST with an optional bearer token and raw body.
    pub async fn post(&self, path: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut req = Request::post(path).header("content-type", "application/json");
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = req.body(Body::from(body.to_string())).unwrap();
        self.send(req).await
    }

    /// Send a request and return status plus JSON body (`Null` when empty).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Whether `password` verifies against the person's stored hash.
    pub fn password_matches(&self, person_id: &str, password: &str) -> bool {
        self.persons
            .get(person_id)
            .and_then(|p| p.hashed_password)
            .map(|hash| password_matches(password, &hash))
            .unwrap_or(false)
    }
}
