//! Router and endpoint handlers.
//!
//! Both endpoints share one shape: validate the body, call out to the
//! identity provider, and finish through the error accumulator so exactly
//! one of `{data}` / `{errors}` leaves the process.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use signet_auth::{IdentityError, TokenIssuer};

use crate::dto::{AccessTokenResponse, LoginRequest, RegisterRequest};
use crate::issuance;
use crate::provider::IdentityProvider;
use crate::response::ErrorAccumulator;
use crate::validation;

/// Request-handling services shared by every endpoint.
///
/// Token issuance is stateless and the provider synchronizes itself, so the
/// whole bundle is shared freely across concurrent requests.
pub struct AppServices {
    pub provider: Arc<dyn IdentityProvider>,
    pub issuer: TokenIssuer,
}

pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(health))
        .route("/new-account", post(register))
        .route("/authenticate", post(login))
        .layer(Extension(services))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// `POST /new-account`: Validating → Creating → (Issuing | Failed).
async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterRequest>,
) -> axum::response::Response {
    let mut errors = ErrorAccumulator::new();

    errors.record_validation_failures(&validation::validate_register(&body));
    if !errors.is_clean() {
        return errors.build_response::<AccessTokenResponse>(None).into_response();
    }

    // Accounts are created pre-confirmed; out-of-band email verification is
    // a deferred concern, not implemented here.
    let payload = match services.provider.create_account(&body.email, &body.password) {
        Ok(principal_id) => {
            tracing::info!(%principal_id, "account created");
            issue_or_record(&services, &body.email, &mut errors)
        }
        Err(reasons) => {
            tracing::warn!(reasons = reasons.len(), "account creation rejected");
            for reason in reasons {
                errors.record_error(reason);
            }
            None
        }
    };

    errors.build_response(payload).into_response()
}

/// `POST /authenticate`: Validating → Authenticating → (Issuing | LockedOut | Failed).
async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    let mut errors = ErrorAccumulator::new();

    errors.record_validation_failures(&validation::validate_login(&body));
    if !errors.is_clean() {
        return errors.build_response::<AccessTokenResponse>(None).into_response();
    }

    let verification = services
        .provider
        .verify_credentials(&body.email, &body.password, true);

    let payload = if verification.succeeded {
        issue_or_record(&services, &body.email, &mut errors)
    } else if verification.is_locked_out {
        tracing::warn!("login rejected: account locked out");
        errors.record_error(IdentityError::Lockout.to_string());
        None
    } else {
        // Same message for unknown email and wrong password.
        errors.record_error(IdentityError::Authentication.to_string());
        None
    };

    errors.build_response(payload).into_response()
}

fn issue_or_record(
    services: &AppServices,
    email: &str,
    errors: &mut ErrorAccumulator,
) -> Option<AccessTokenResponse> {
    match issuance::issue_for_email(services.provider.as_ref(), &services.issuer, email) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::error!(error = %err, "token issuance failed after verification");
            errors.record_error("unable to issue an access token");
            None
        }
    }
}
