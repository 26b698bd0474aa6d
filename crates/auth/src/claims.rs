//! Claim vocabulary and the claims composer.
//!
//! A composed claim sequence is an *ordered* list, not a set: insertion order
//! is preserved all the way into the token payload, and no deduplication is
//! performed. If the identity provider hands back a stored claim whose type
//! collides with a synthesized one, both are emitted; the payload builder in
//! [`crate::token`] folds repeats into a JSON array under the shared key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Principal;

/// Closed claim-type vocabulary.
///
/// The registered variants map to the usual JWT names; anything the provider
/// stores beyond those travels as [`ClaimType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimType {
    /// "sub" — principal identifier.
    Subject,
    /// "email".
    Email,
    /// "jti" — unique token identifier.
    TokenId,
    /// "nbf" — not valid before (unix seconds).
    NotBefore,
    /// "iat" — issued at (unix seconds).
    IssuedAt,
    /// "role" — one entry per granted role.
    Role,
    /// Provider-defined claim type.
    Custom(String),
}

impl ClaimType {
    pub fn as_str(&self) -> &str {
        match self {
            ClaimType::Subject => "sub",
            ClaimType::Email => "email",
            ClaimType::TokenId => "jti",
            ClaimType::NotBefore => "nbf",
            ClaimType::IssuedAt => "iat",
            ClaimType::Role => "role",
            ClaimType::Custom(name) => name,
        }
    }
}

impl From<String> for ClaimType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sub" => ClaimType::Subject,
            "email" => ClaimType::Email,
            "jti" => ClaimType::TokenId,
            "nbf" => ClaimType::NotBefore,
            "iat" => ClaimType::IssuedAt,
            "role" => ClaimType::Role,
            _ => ClaimType::Custom(value),
        }
    }
}

impl From<ClaimType> for String {
    fn from(value: ClaimType) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a claim value serializes into the token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimValueKind {
    #[default]
    String,
    /// Value parses as i64 and is written as a JSON number.
    Integer,
}

/// One (type, value) claim pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub value: String,
    #[serde(default)]
    pub value_kind: ClaimValueKind,
}

impl ClaimEntry {
    pub fn string(claim_type: ClaimType, value: impl Into<String>) -> Self {
        Self {
            claim_type,
            value: value.into(),
            value_kind: ClaimValueKind::String,
        }
    }

    pub fn integer(claim_type: ClaimType, value: i64) -> Self {
        Self {
            claim_type,
            value: value.to_string(),
            value_kind: ClaimValueKind::Integer,
        }
    }
}

/// Build the canonical claim sequence for a verified principal.
///
/// Starts from the provider-stored `extra_claims` and appends, in order:
/// subject, email, a freshly generated token id, not-before, issued-at, then
/// one role claim per role in provider order. `nbf` and `iat` are both
/// derived from the single captured `now`, so they are always equal; `nbf`
/// keeps the string kind while `iat` is integer-kinded, mirroring how
/// consumers have historically read them.
pub fn compose_claims(
    principal: &Principal,
    extra_claims: Vec<ClaimEntry>,
    now: DateTime<Utc>,
) -> Vec<ClaimEntry> {
    let unix_seconds = now.timestamp();
    let token_id = Uuid::new_v4();

    let mut claims = extra_claims;
    claims.push(ClaimEntry::string(
        ClaimType::Subject,
        principal.id.to_string(),
    ));
    claims.push(ClaimEntry::string(ClaimType::Email, principal.email.clone()));
    claims.push(ClaimEntry::string(ClaimType::TokenId, token_id.to_string()));
    claims.push(ClaimEntry::string(
        ClaimType::NotBefore,
        unix_seconds.to_string(),
    ));
    claims.push(ClaimEntry::integer(ClaimType::IssuedAt, unix_seconds));

    for role in &principal.roles {
        claims.push(ClaimEntry::string(ClaimType::Role, role.as_str().to_string()));
    }

    claims
}
