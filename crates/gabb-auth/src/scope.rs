//! Fixed scope catalog.
//!
//! Scopes are space-delimited names in a token's `scope` claim. What a
//! token may carry is a pure function of who or what it was issued for.

use std::fmt;
use std::str::FromStr;

/// Read access to person-owned resources.
pub const CAN_READ: &str = "can-read";
/// Write access to person-owned resources.
pub const CAN_WRITE: &str = "can-write";
/// Unrestricted administrative access.
pub const ADMIN: &str = "admin";
/// Sign-up from the mobile app.
pub const CREATE_PERSON: &str = "create-person";
/// Request or complete a password reset.
pub const RESET_PASSWORD: &str = "reset-password";
/// Confirm an email address.
pub const VALIDATE_EMAIL: &str = "validate-email";
/// Short-lived smoke test tokens.
pub const TEST: &str = "test";

/// Who a long-lived token is issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalType {
    /// A signed-in app user.
    Person,
    /// The mobile app itself, before anyone signs in.
    App,
    /// Operators and back-office tooling.
    Admin,
}

impl PrincipalType {
    /// Scopes granted to this principal type.
    pub fn scopes(self) -> &'static [&'static str] {
        match self {
            Self::Person => &[CAN_READ, CAN_WRITE],
            Self::App => &[CREATE_PERSON, RESET_PASSWORD],
            Self::Admin => &[ADMIN, CAN_READ, CAN_WRITE, CREATE_PERSON, RESET_PASSWORD],
        }
    }

    /// The `scope` claim value for this principal type.
    pub fn scope_claim(self) -> String {
        self.scopes().join(" ")
    }

    /// Lowercase name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::App => "app",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "app" => Ok(Self::App),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown principal type: {other}")),
        }
    }
}

/// What a single-purpose token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    /// Confirm the subject's email address.
    ValidateEmail,
    /// Set a new password for the subject.
    ResetPassword,
    /// Exercise the signing pipeline end to end.
    Test,
}

impl TokenPurpose {
    /// The one scope a token of this purpose carries.
    pub fn scope(self) -> &'static str {
        match self {
            Self::ValidateEmail => VALIDATE_EMAIL,
            Self::ResetPassword => RESET_PASSWORD,
            Self::Test => TEST,
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope())
    }
}

impl FromStr for TokenPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VALIDATE_EMAIL => Ok(Self::ValidateEmail),
            RESET_PASSWORD => Ok(Self::ResetPassword),
            TEST => Ok(Self::Test),
            other => Err(format!("unknown token purpose: {other}")),
        }
    }
}
