//! REST API client module for the auth service.
//!
//! This module provides the `ApiClient` for the five auth endpoints:
//! login, register, fetch-profile, update-profile and logout.
//!
//! Protected endpoints use bearer token authentication with the token
//! returned by `POST /login`.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
