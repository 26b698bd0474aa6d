//! The response-aggregation protocol shared by every endpoint.
//!
//! Each request constructs one [`ErrorAccumulator`], threads it through its
//! processing steps, and finishes with [`ErrorAccumulator::build_response`].
//! The accumulator is request-scoped by construction; nothing here is shared
//! across requests.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Ordered field-level validation failures: `(field, messages)` pairs in
/// field declaration order. Flattening is therefore deterministic.
pub type FieldErrors = Vec<(&'static str, Vec<String>)>;

/// Uniform endpoint envelope: a success payload or the collected error
/// messages, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope<T> {
    Success { data: Option<T> },
    Failure { errors: Vec<String> },
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        let status = match &self {
            ResponseEnvelope::Success { .. } => StatusCode::OK,
            // The envelope, not the status, carries the detail.
            ResponseEnvelope::Failure { .. } => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

/// Mutable collection of error messages scoped to one request.
///
/// Infallible by design: recording never errors, and every non-fatal failure
/// in the facade funnels through here before a response is built.
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: Vec<String>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one error message. Side effect only.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Flatten field-level failures in their declaration order.
    pub fn record_validation_failures(&mut self, fields: &FieldErrors) {
        for (_, messages) in fields {
            for message in messages {
                self.record_error(message.clone());
            }
        }
    }

    /// True iff no error has been recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Produce the terminal envelope, consuming the accumulator.
    ///
    /// Any payload computed earlier in the request is discarded when errors
    /// were recorded: a partially successful operation must not leak partial
    /// success data.
    pub fn build_response<T>(self, payload: Option<T>) -> ResponseEnvelope<T> {
        if self.is_clean() {
            ResponseEnvelope::Success { data: payload }
        } else {
            ResponseEnvelope::Failure {
                errors: self.errors,
            }
        }
    }
}
