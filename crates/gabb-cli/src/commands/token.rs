//! Token administration commands.

use std::str::FromStr;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;

use gabb_auth::{
    Claims, IssuedToken, JwtEncoder, PrincipalType, RevocationStore, SystemClock, TokenIssuer,
    TokenPurpose,
};
use gabb_core::config::AppConfig;
use gabb_core::error::AppError;
use gabb_entity::token::RevocationRecord;

use crate::output::{self, FieldRow, OutputFormat};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Sign a new token
    Issue {
        /// What the token is for
        #[command(subcommand)]
        kind: IssueKind,
    },
    /// Decode a token and show its revocation record
    Inspect {
        /// The token
        token: String,
    },
    /// Put a token on the revocation list
    Revoke {
        /// The token
        token: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Take a token off the revocation list
    Restore {
        /// The token
        token: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Kinds of token `issue` can sign
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum IssueKind {
    /// Long-lived token for the mobile app
    App,
    /// Short-lived operator token
    Admin,
    /// Token for a signed-in person
    Person {
        /// Person id
        id: String,
    },
    /// Single-use token (validate-email or reset-password)
    Purpose {
        /// Token purpose
        purpose: String,
        /// Person id
        id: String,
    },
    /// Smoke test token
    Test,
}

/// What `inspect` reports.
#[derive(Debug, Serialize)]
struct Inspection {
    claims: Option<Claims>,
    error: Option<String>,
    revocation: Option<RevocationRecord>,
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue { kind } => {
            let keys = super::load_keys(config).await?;
            let issuer = TokenIssuer::new(JwtEncoder::new(keys), Arc::new(SystemClock));
            let issued = issue(&issuer, kind).await?;
            output::print_item(&issued, &issued_rows(&issued), format);
        }
        TokenCommand::Inspect { token } => {
            let authorizer = super::build_authorizer(config).await?;
            let (claims, error) = match authorizer.decode_for_display(token).await {
                Ok(claims) => (Some(claims), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let revocation = authorizer.revocations().find(token.trim()).await?;
            let inspection = Inspection {
                claims,
                error,
                revocation,
            };
            output::print_item(&inspection, &inspection_rows(&inspection), format);
        }
        TokenCommand::Revoke { token, yes } => {
            if !confirm(*yes, "Revoke this token? It will be refused from now on.")? {
                println!("Cancelled.");
                return Ok(());
            }
            let authorizer = super::build_authorizer(config).await?;
            authorizer.revoke(token).await?;
            output::print_success("Token revoked");
        }
        TokenCommand::Restore { token, yes } => {
            let prompt = "Restore this token? A used single-use token becomes usable again.";
            if !confirm(*yes, prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
            let authorizer = super::build_authorizer(config).await?;
            authorizer.restore(token).await?;
            output::print_success("Token restored");
        }
    }

    Ok(())
}

async fn issue(issuer: &TokenIssuer, kind: &IssueKind) -> Result<IssuedToken, AppError> {
    let issued = match kind {
        IssueKind::App => issuer.issue_for_principal_type(PrincipalType::App).await?,
        IssueKind::Admin => issuer.issue_for_principal_type(PrincipalType::Admin).await?,
        IssueKind::Person { id } => issuer.issue_for_person(id).await?,
        IssueKind::Purpose { purpose, id } => {
            let purpose = TokenPurpose::from_str(purpose).map_err(AppError::validation)?;
            issuer.issue_single_purpose(id, purpose).await?
        }
        IssueKind::Test => issuer.issue_test_token().await?,
    };
    Ok(issued)
}

fn confirm(skip: bool, prompt: &str) -> Result<bool, AppError> {
    if skip {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

fn claim_rows(claims: &Claims) -> Vec<FieldRow> {
    let expires = claims
        .expires_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| claims.exp.to_string());
    vec![
        FieldRow::new("subject", claims.subject_id().unwrap_or("-")),
        FieldRow::new("scope", claims.scope.as_deref().unwrap_or("-")),
        FieldRow::new("expires", expires),
    ]
}

fn issued_rows(issued: &IssuedToken) -> Vec<FieldRow> {
    let mut rows = vec![FieldRow::new("token", issued.token.as_str())];
    rows.extend(claim_rows(&issued.claims));
    rows
}

fn inspection_rows(inspection: &Inspection) -> Vec<FieldRow> {
    let mut rows = match (&inspection.claims, &inspection.error) {
        (Some(claims), _) => claim_rows(claims),
        (None, Some(error)) => vec![FieldRow::new("error", error.as_str())],
        (None, None) => Vec::new(),
    };
    let status = match &inspection.revocation {
        Some(record) if record.is_invalid => format!("invalid since {}", record.updated_at),
        Some(record) => format!("valid (restored {})", record.updated_at),
        None => "no record".to_string(),
    };
    rows.push(FieldRow::new("revocation", status));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_rows() {
        let claims = Claims::new(Some("p1".into()), "validate-email", 1_767_225_600);
        let rows = claim_rows(&claims);
        assert_eq!(rows[0], FieldRow::new("subject", "p1"));
        assert_eq!(rows[1], FieldRow::new("scope", "validate-email"));
        assert_eq!(rows[2], FieldRow::new("expires", "2026-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_inspection_rows_without_record() {
        let inspection = Inspection {
            claims: None,
            error: Some("Token expired".into()),
            revocation: None,
        };
        let rows = inspection_rows(&inspection);
        assert_eq!(rows[0], FieldRow::new("error", "Token expired"));
        assert_eq!(rows[1], FieldRow::new("revocation", "no record"));
    }
}
