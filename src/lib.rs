//! shopfront - client core for a storefront REST API.
//!
//! This crate holds the headless half of a storefront client: session
//! management (signup, login, logout, check, refresh), the product
//! catalog, the cart, and the admin analytics dashboard, all as stores a
//! view layer reads. The one piece with real machinery is the session
//! refresh path: every API call runs through an interceptor that, on an
//! auth-expired response, coalesces concurrent refresh attempts into a
//! single call and replays each original request once.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod logging;
pub mod models;
pub mod notify;
pub mod stores;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionState, SessionStore, SnapshotStore};
pub use config::Config;
pub use context::StoreContext;
pub use notify::{Notice, Notifier, Severity};
pub use stores::{AnalyticsStore, CartStore, ProductStore};
