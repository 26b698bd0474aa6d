//! Token-issuance orchestration shared by the register and login paths.

use chrono::Utc;
use thiserror::Error;

use signet_auth::{IssueError, Principal, TokenIssuer, compose_claims};

use crate::dto::{AccessTokenResponse, ClaimView};
use crate::provider::IdentityProvider;

/// Infrastructure-grade issuance failure. Logged, never echoed verbatim to
/// the client.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The account vanished between verification and issuance.
    #[error("no principal found for the verified email")]
    PrincipalNotFound,

    #[error(transparent)]
    Issue(#[from] IssueError),
}

/// Issue a token for an already-verified email.
///
/// Looks the principal up, pulls its stored claims, composes the full claim
/// sequence, and signs it. `expiresInSeconds` in the payload is the
/// configured lifetime, always `expiration_hours * 3600`.
pub fn issue_for_email(
    provider: &dyn IdentityProvider,
    issuer: &TokenIssuer,
    email: &str,
) -> Result<AccessTokenResponse, IssuanceError> {
    let identity = provider
        .find_by_email(email)
        .ok_or(IssuanceError::PrincipalNotFound)?;
    let stored_claims = provider.get_claims(identity.id);
    // Roles are re-fetched here so their order is whatever the provider
    // reports at issuance time, not whatever the lookup cached.
    let roles = provider.get_roles(identity.id);
    let principal = Principal { roles, ..identity };

    let claims = compose_claims(&principal, stored_claims, Utc::now());
    let token = issuer.issue(&claims, Utc::now())?;

    Ok(AccessTokenResponse {
        access_token: token.into_string(),
        expires_in_seconds: issuer.config().lifetime_seconds(),
        principal_id: principal.id,
        email: principal.email,
        claims: claims.iter().map(ClaimView::from).collect(),
    })
}
