//! REST client module for the Clip Zip Ship services.
//!
//! This module provides the `CzsClient` for communicating with the web
//! (session) service and the API (resource) service, plus the error type
//! and message formatting shared by both.
//!
//! The web service authenticates with a CSRF header, the API service with
//! a JWT bearer token obtained through its login endpoint.

pub mod client;
pub mod error;

pub use client::CzsClient;
pub use error::{report_failure, ApiError};
