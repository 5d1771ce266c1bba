//! Appfigures API client and authentication.
//!
//! This module provides the [`AppFiguresClient`] for talking to the
//! Appfigures API, the [`ApiTransport`] capability streams are written
//! against, bearer authentication ([`Auth`]) and status classification
//! ([`ApiError`]).

mod appfigures;
mod auth;
mod error;
mod transport;

pub use appfigures::{AppFiguresClient, DEFAULT_API_URL, RetryPolicy};
pub use auth::Auth;
pub use error::{ApiError, classify_status};
pub use transport::ApiTransport;
