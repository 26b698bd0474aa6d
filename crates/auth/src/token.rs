//! HS256 token issuance.
//!
//! The issuer is a pure computation over a validated [`TokenConfig`] and a
//! composed claim sequence: no IO, no shared state, safe to call from
//! concurrent requests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Map, Value, map::Entry};

use crate::claims::{ClaimEntry, ClaimValueKind};
use crate::error::{ConfigError, IssueError};

/// Minimum HS256 key material, in bytes. Keys shorter than the SHA-256
/// output weaken the HMAC.
pub const MIN_SECRET_BYTES: usize = 32;

/// Validated signing configuration.
///
/// Construction is the boot-time configuration check: a process that holds a
/// `TokenConfig` can always sign. The four values (secret, issuer, audience,
/// lifetime) must stay stable across a deployment for issued tokens to keep
/// verifying.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    expiration_hours: i64,
}

impl TokenConfig {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiration_hours: i64,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                actual: secret.len(),
                minimum: MIN_SECRET_BYTES,
            });
        }
        if expiration_hours <= 0 {
            return Err(ConfigError::NonPositiveLifetime(expiration_hours));
        }

        Ok(Self {
            secret,
            issuer: issuer.into(),
            audience: audience.into(),
            expiration_hours,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.expiration_hours * 3600
    }
}

/// Compact signed token (`header.payload.signature`, base64url segments).
///
/// Fully self-describing: any holder of the secret can verify it without
/// contacting the issuing process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes claim sequences into signed, time-bounded bearer tokens.
pub struct TokenIssuer {
    config: TokenConfig,
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        let key = EncodingKey::from_secret(&config.secret);
        Self { config, key }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Sign `claims` into a token expiring `expiration_hours` after `now`.
    ///
    /// `now` here is a separate clock read from the one the composer used for
    /// nbf/iat; a skew of milliseconds between them is accepted.
    pub fn issue(
        &self,
        claims: &[ClaimEntry],
        now: DateTime<Utc>,
    ) -> Result<SignedToken, IssueError> {
        let mut payload = Map::new();
        for claim in claims {
            insert_claim(&mut payload, claim)?;
        }

        let expires_at = now + Duration::hours(self.config.expiration_hours);
        payload.insert("iss".to_string(), Value::String(self.config.issuer.clone()));
        payload.insert(
            "aud".to_string(),
            Value::String(self.config.audience.clone()),
        );
        payload.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Value::Object(payload),
            &self.key,
        )?;

        tracing::debug!(claim_count = claims.len(), "issued bearer token");
        Ok(SignedToken(token))
    }
}

/// Insert one claim into the payload map, folding repeated types into a JSON
/// array under the shared key (composition never dedups).
fn insert_claim(payload: &mut Map<String, Value>, claim: &ClaimEntry) -> Result<(), IssueError> {
    let value = match claim.value_kind {
        ClaimValueKind::String => Value::String(claim.value.clone()),
        ClaimValueKind::Integer => {
            let parsed: i64 =
                claim
                    .value
                    .parse()
                    .map_err(|_| IssueError::NonIntegerValue {
                        claim_type: claim.claim_type.to_string(),
                        value: claim.value.clone(),
                    })?;
            Value::from(parsed)
        }
    };

    match payload.entry(claim.claim_type.as_str().to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(values) => values.push(value),
            single => {
                let first = single.take();
                *single = Value::Array(vec![first, value]);
            }
        },
    }

    Ok(())
}
