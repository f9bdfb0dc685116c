//! API client for the storefront REST API.
//!
//! `ApiClient` executes every request through an `HttpTransport` and owns
//! the auth-expired recovery path: when the server answers 401, the client
//! coordinates a single shared session refresh and replays the original
//! request once. Concurrent 401s collapse into one refresh call; every
//! waiter replays after the same outcome.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::auth::{SessionState, SnapshotStore};

use super::transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
use super::ApiError;

/// Refresh endpoint path. Called directly against the transport so the
/// refresh itself never re-enters the interceptor.
const REFRESH_PATH: &str = "/refresh-token";

/// Capacity of the refresh outcome broadcast; exactly one message is sent
/// per refresh.
const REFRESH_BROADCAST_CAPACITY: usize = 1;

/// Outcome announced to refresh waiters. The error arm carries the
/// message only - `ApiError` itself is not `Clone`.
type RefreshOutcome = Result<(), String>;

/// Client for the storefront API. Clone is cheap - every field is an `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    state: Arc<SessionState>,
    snapshot: Arc<SnapshotStore>,
    /// Single-slot marker for the in-flight refresh. The first 401 to find
    /// the slot empty becomes the sole initiator; everyone else subscribes
    /// and waits for the broadcast instead of starting another call.
    refresh_slot: Arc<Mutex<Option<broadcast::Sender<RefreshOutcome>>>>,
}

impl ApiClient {
    /// Create a client backed by a real HTTP transport.
    pub fn new(
        base_url: &str,
        state: Arc<SessionState>,
        snapshot: Arc<SnapshotStore>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(base_url)?;
        Ok(Self::with_transport(Arc::new(transport), state, snapshot))
    }

    /// Create a client over any transport. This is the construction seam
    /// tests use to substitute a scripted transport.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        state: Arc<SessionState>,
        snapshot: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            transport,
            state,
            snapshot,
            refresh_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Execute a request with auth-expired recovery.
    ///
    /// A request is replayed at most once: a second 401 on the replay
    /// propagates as `AuthExpired` instead of triggering another refresh.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.execute(&request).await?;
        if !response.is_auth_expired() {
            return Self::check_response(response);
        }

        debug!(path = %request.path, "auth expired, refreshing session before replay");
        self.refresh_session().await?;

        let response = self.transport.execute(&request).await?;
        Self::check_response(response)
    }

    /// Check if a response is successful, mapping failures to the error taxonomy.
    fn check_response(response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    // ===== Typed helpers =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode body: {}", e)))?;
        self.execute(ApiRequest::post(path, body)).await?.json()
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::post_empty(path)).await?.json()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::delete(path)).await?.json()
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::patch(path)).await?.json()
    }

    // ===== Session refresh =====

    /// Refresh the session, coalescing concurrent callers into one call.
    ///
    /// On failure the local session is force-cleared and the refresh error
    /// is returned - to this caller and to every waiter.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        let waiter = {
            let mut slot = self.refresh_slot.lock().await;
            // Subscribing happens under the lock, so the initiator cannot
            // broadcast before a waiter is registered.
            let rx = slot.as_ref().map(|tx| tx.subscribe());
            if rx.is_none() {
                let (tx, _rx) = broadcast::channel(REFRESH_BROADCAST_CAPACITY);
                *slot = Some(tx);
            }
            rx
        };

        if let Some(mut rx) = waiter {
            debug!("refresh already in flight, waiting for it to settle");
            return match rx.recv().await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(msg)) => Err(ApiError::RefreshFailed(msg)),
                Err(_) => Err(ApiError::RefreshFailed("refresh abandoned".to_string())),
            };
        }

        let outcome = self.run_refresh().await;

        let mut slot = self.refresh_slot.lock().await;
        if let Some(tx) = slot.take() {
            let announced: RefreshOutcome = match &outcome {
                Ok(()) => Ok(()),
                Err(e) => Err(e.to_string()),
            };
            // Send fails when no one is waiting, which is fine.
            let _ = tx.send(announced);
        }
        outcome
    }

    /// The actual refresh call. `checking_auth` is held for its duration
    /// so the store-level guard sees the operation in flight.
    async fn run_refresh(&self) -> Result<(), ApiError> {
        self.state.set_checking_auth(true);
        let result = self
            .transport
            .execute(&ApiRequest::post_empty(REFRESH_PATH))
            .await
            .and_then(Self::check_response);
        self.state.set_checking_auth(false);

        match result {
            Ok(_) => {
                info!("session refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed, clearing local session");
                self.force_logout();
                Err(e)
            }
        }
    }

    /// Clear the in-memory identity and the persisted snapshot.
    fn force_logout(&self) {
        self.state.clear_user();
        if let Err(e) = self.snapshot.clear() {
            warn!(error = %e, "failed to remove session snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::join_all;
    use reqwest::Method;

    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::auth::{SessionState, SnapshotStore};
    use crate::models::User;

    fn temp_snapshot(tag: &str) -> Arc<SnapshotStore> {
        let dir = std::env::temp_dir().join(format!("shopfront-client-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Arc::new(SnapshotStore::new(dir))
    }

    fn client_with(
        transport: Arc<MockTransport>,
        tag: &str,
    ) -> (ApiClient, Arc<SessionState>, Arc<SnapshotStore>) {
        let state = Arc::new(SessionState::new());
        let snapshot = temp_snapshot(tag);
        let client = ApiClient::with_transport(transport, Arc::clone(&state), Arc::clone(&snapshot));
        (client, state, snapshot)
    }

    fn logged_in_user() -> User {
        User {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            email: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/get-all-Product", 200, r#"{"products":[]}"#);
        let (client, _, _) = client_with(Arc::clone(&transport), "pass");

        let response = client.execute(ApiRequest::get("/get-all-Product")).await;
        assert!(response.is_ok());
        assert_eq!(transport.call_count("/get-all-Product"), 1);
        assert_eq!(transport.call_count(REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_auth_expired_refreshes_and_replays() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_once(Method::GET, "/get-user", 401, "");
        transport.respond(Method::GET, "/get-user", 200, r#"{"user":null}"#);
        transport.respond(Method::POST, REFRESH_PATH, 200, "{}");
        let (client, _, _) = client_with(Arc::clone(&transport), "replay");

        let response = client.execute(ApiRequest::get("/get-user")).await;
        assert!(response.is_ok());
        assert_eq!(transport.call_count(REFRESH_PATH), 1);
        assert_eq!(transport.call_count("/get-user"), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_auth_failures_share_one_refresh() {
        const CONCURRENT: usize = 8;

        let transport = Arc::new(MockTransport::new());
        for _ in 0..CONCURRENT {
            transport.respond_once(Method::GET, "/items", 401, "");
        }
        transport.respond(Method::GET, "/items", 200, r#"{"products":[]}"#);
        transport.respond(Method::POST, REFRESH_PATH, 200, "{}");
        // Hold the refresh in flight long enough for every 401 to pile up
        // behind the shared slot.
        transport.delay(Method::POST, REFRESH_PATH, Duration::from_millis(200));

        let (client, _, _) = client_with(Arc::clone(&transport), "coalesce");

        let results = join_all((0..CONCURRENT).map(|_| {
            let client = client.clone();
            async move { client.execute(ApiRequest::get("/items")).await }
        }))
        .await;

        for result in results {
            assert!(result.is_ok());
        }
        // Exactly one refresh, each original replayed exactly once.
        assert_eq!(transport.call_count(REFRESH_PATH), 1);
        assert_eq!(transport.call_count("/items"), CONCURRENT * 2);
    }

    #[tokio::test]
    async fn test_second_auth_failure_is_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/get-user", 401, "");
        transport.respond(Method::POST, REFRESH_PATH, 200, "{}");
        let (client, _, _) = client_with(Arc::clone(&transport), "noloop");

        let result = client.execute(ApiRequest::get("/get-user")).await;
        assert!(matches!(result, Err(ApiError::AuthExpired)));
        // One refresh, two attempts at the original, then give up.
        assert_eq!(transport.call_count(REFRESH_PATH), 1);
        assert_eq!(transport.call_count("/get-user"), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_forces_logout_and_propagates() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/get-user", 401, "");
        transport.respond(Method::POST, REFRESH_PATH, 500, "session store down");
        let (client, state, snapshot) = client_with(Arc::clone(&transport), "forced");

        state.set_user(logged_in_user());
        snapshot.save(&logged_in_user()).expect("snapshot saved");

        let result = client.execute(ApiRequest::get("/get-user")).await;
        // The refresh failure surfaces, not the original 401.
        assert!(matches!(result, Err(ApiError::ServerError(_))));
        assert!(state.user().is_none());
        assert!(!snapshot.exists());
        // The original request is not replayed after a failed refresh.
        assert_eq!(transport.call_count("/get-user"), 1);
    }

    #[tokio::test]
    async fn test_non_auth_failure_propagates_unchanged() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/analysis-data", 500, "boom");
        let (client, _, _) = client_with(Arc::clone(&transport), "servererr");

        let result = client.execute(ApiRequest::get("/analysis-data")).await;
        assert!(matches!(result, Err(ApiError::ServerError(_))));
        assert_eq!(transport.call_count(REFRESH_PATH), 0);
    }
}
