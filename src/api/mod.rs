//! REST API client module for the storefront backend.
//!
//! This module provides the `ApiClient` used by every store, the
//! `HttpTransport` seam it executes requests through, and the error
//! taxonomy surfaced to callers.
//!
//! Authentication uses an opaque session credential carried by the HTTP
//! layer; when it expires the client refreshes it transparently (see
//! `client`).

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
