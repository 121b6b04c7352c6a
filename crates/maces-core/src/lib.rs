//! Core library for the MACES attendance client.
//!
//! This crate holds everything that does not depend on the terminal:
//!
//! - `api`: HTTP client for the attendance backend
//! - `models`: request and response shapes
//! - `session`: the logged-in user's park
//! - `event_link`: host park/date parameters and share URLs
//! - `display`: which form sections are visible for a given login
//! - `config`: persisted client settings

pub mod api;
pub mod config;
pub mod display;
pub mod event_link;
pub mod models;
pub mod session;
