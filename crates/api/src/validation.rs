//! Request-shape validation.
//!
//! Returns field-scoped messages in field declaration order so that the
//! flattened error list is deterministic. Password *policy* (strength,
//! reuse, breach checks) belongs to the identity provider; only shape is
//! checked here.

use crate::dto::{LoginRequest, RegisterRequest};
use crate::response::FieldErrors;

pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 100;

pub fn validate_register(request: &RegisterRequest) -> FieldErrors {
    let mut fields = FieldErrors::new();

    push(&mut fields, "email", email_errors(&request.email));
    push(&mut fields, "password", password_errors(&request.password));

    let mut confirm = Vec::new();
    if request.confirmed_password != request.password {
        confirm.push("passwords do not match".to_string());
    }
    push(&mut fields, "confirmedPassword", confirm);

    fields
}

pub fn validate_login(request: &LoginRequest) -> FieldErrors {
    let mut fields = FieldErrors::new();
    push(&mut fields, "email", email_errors(&request.email));
    push(&mut fields, "password", password_errors(&request.password));
    fields
}

fn push(fields: &mut FieldErrors, field: &'static str, messages: Vec<String>) {
    if !messages.is_empty() {
        fields.push((field, messages));
    }
}

fn email_errors(email: &str) -> Vec<String> {
    let email = email.trim();
    if email.is_empty() {
        return vec!["email is required".to_string()];
    }
    if !has_email_shape(email) {
        return vec!["email is in an invalid format".to_string()];
    }
    Vec::new()
}

// Shape check only: one '@' with non-empty sides. Deliverability is the
// provider's problem.
fn has_email_shape(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

fn password_errors(password: &str) -> Vec<String> {
    if password.is_empty() {
        return vec!["password is required".to_string()];
    }
    let length = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&length) {
        return vec![format!(
            "password must be between {PASSWORD_MIN_CHARS} and {PASSWORD_MAX_CHARS} characters"
        )];
    }
    Vec::new()
}
