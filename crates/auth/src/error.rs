//! Error taxonomy for the identity facade.

use thiserror::Error;

/// Non-fatal request-processing failures.
///
/// These never abort a request on their own: every variant is rendered to a
/// human-readable message and funneled through the response aggregator. The
/// `Display` strings of [`IdentityError::Authentication`] and
/// [`IdentityError::Lockout`] are the fixed client-facing messages, so keep
/// them stable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// A request field failed shape validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The identity provider rejected an account creation.
    #[error("account creation failed: {0}")]
    Creation(String),

    /// Credential verification failed. Deliberately generic: the same message
    /// covers unknown emails and wrong passwords (anti-enumeration).
    #[error("invalid credentials")]
    Authentication,

    /// Too many failed attempts; the provider has locked the account.
    #[error("account temporarily locked due to repeated invalid attempts")]
    Lockout,
}

impl IdentityError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn creation(msg: impl Into<String>) -> Self {
        Self::Creation(msg.into())
    }
}

/// Token signing misconfiguration.
///
/// Fatal by policy: detected when the config is constructed at startup,
/// never surfaced per-request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("signing secret is {actual} bytes; HS256 needs at least {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },

    #[error("token lifetime must be a positive number of hours, got {0}")]
    NonPositiveLifetime(i64),
}

/// Failure while serializing or signing a token.
///
/// Should not occur for well-typed claim input; kept for the integer-kinded
/// claim that fails to parse and for signer errors.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("claim '{claim_type}' is integer-kinded but holds '{value}'")]
    NonIntegerValue { claim_type: String, value: String },

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
