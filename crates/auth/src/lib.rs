//! `signet-auth` — pure claims-composition and token-issuance boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to turn a verified principal into a signed bearer token, nothing else.

pub mod claims;
pub mod error;
pub mod principal;
pub mod token;

pub use claims::{ClaimEntry, ClaimType, ClaimValueKind, compose_claims};
pub use error::{ConfigError, IdentityError, IssueError};
pub use principal::{Principal, PrincipalId, Role};
pub use token::{MIN_SECRET_BYTES, SignedToken, TokenConfig, TokenIssuer};
