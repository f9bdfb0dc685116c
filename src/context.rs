//! Store construction and wiring.
//!
//! `StoreContext` is the one place the client graph is assembled: shared
//! session state, the API client over it, and the stores the view layer
//! reads. Build it once at process start and hand pieces to whatever
//! needs them; nothing here is a process-wide global.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::ApiClient;
use crate::auth::{SessionState, SessionStore, SnapshotStore};
use crate::config::Config;
use crate::notify::{Notice, Notifier};
use crate::stores::{AnalyticsStore, CartStore, ProductStore};

pub struct StoreContext {
    pub session: SessionStore,
    pub products: ProductStore,
    pub cart: Arc<CartStore>,
    pub analytics: AnalyticsStore,
}

impl StoreContext {
    /// Assemble the full store graph from configuration.
    ///
    /// Returns the context plus the notice receiver the view layer
    /// drains. The session is hydrated from the persisted snapshot as
    /// part of construction.
    pub fn new(config: &Config) -> Result<(Self, UnboundedReceiver<Notice>)> {
        let data_dir = config.data_dir()?;
        let snapshot = Arc::new(SnapshotStore::new(data_dir));
        let state = Arc::new(SessionState::new());
        let client = ApiClient::new(&config.api_url(), Arc::clone(&state), Arc::clone(&snapshot))
            .context("Failed to build API client")?;

        let (notifier, notices) = Notifier::channel();

        let session = SessionStore::new(
            client.clone(),
            Arc::clone(&state),
            snapshot,
            notifier.clone(),
        );
        session.hydrate();

        let cart = Arc::new(CartStore::new());
        let products = ProductStore::new(client.clone(), Arc::clone(&cart), notifier);
        let analytics = AnalyticsStore::new(client);

        Ok((
            Self {
                session,
                products,
                cart,
                analytics,
            },
            notices,
        ))
    }
}
