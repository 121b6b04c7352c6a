//! HTTP client module for the attendance backend.
//!
//! This module provides the `ApiClient` for logging in, looking up officer
//! status, listing classes, and submitting attendance and credits.
//!
//! The backend keeps the login in a session cookie, so one `ApiClient`
//! (and its cookie store) must be used for the whole session.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
