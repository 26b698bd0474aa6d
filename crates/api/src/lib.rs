//! HTTP identity facade: routing, request validation, and response shaping.

pub mod app;
pub mod config;
pub mod dto;
pub mod issuance;
pub mod provider;
pub mod response;
pub mod validation;
