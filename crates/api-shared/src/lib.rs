//! # API Shared
//!
//! Shared definitions for the patient records APIs.
//!
//! Contains:
//! - JSON wire types (`types` module), re-exported at the crate root
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` for request/response bodies and its OpenAPI document.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
