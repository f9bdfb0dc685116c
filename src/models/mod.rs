//! Data models for storefront entities.
//!
//! This module contains the wire types exchanged with the storefront API:
//!
//! - `User`, `AuthPayload`, `CurrentUser`: account and session records
//! - `Product`, `NewProduct`: catalog entries
//! - `AnalyticsSummary`, `DailySale`: admin dashboard data

pub mod analytics;
pub mod product;
pub mod user;

pub use analytics::{AnalysisResponse, AnalyticsSummary, DailySale, DailySaleRecord};
pub use product::{FeaturedToggled, NewProduct, Product, ProductCreated, ProductList};
pub use user::{Ack, AuthPayload, CurrentUser, SignupForm, User};
