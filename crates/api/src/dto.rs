//! Request/response DTOs for the identity endpoints.

use serde::{Deserialize, Serialize};

use signet_auth::{ClaimEntry, PrincipalId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirmed_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Success payload for both endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in_seconds: i64,
    pub principal_id: PrincipalId,
    pub email: String,
    pub claims: Vec<ClaimView>,
}

/// Claim as exposed in the success payload: type and value only, the value
/// kind is an issuance detail.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl From<&ClaimEntry> for ClaimView {
    fn from(entry: &ClaimEntry) -> Self {
        Self {
            claim_type: entry.claim_type.to_string(),
            value: entry.value.clone(),
        }
    }
}
