//! View-facing state stores.
//!
//! Each store owns one slice of client state and is the only writer for
//! it; views read snapshots and drive mutations through the async
//! operations. All API traffic goes through the shared `ApiClient`, so
//! every store benefits from the session refresh interceptor.

pub mod analytics;
pub mod cart;
pub mod products;

pub use analytics::AnalyticsStore;
pub use cart::{CartItem, CartStore, CartTotals};
pub use products::ProductStore;
