//! Session state and the operations that mutate it.
//!
//! `SessionState` is the shared, thread-safe record the view layer reads
//! (`user`, `loading`, `checking_auth`); `SessionStore` is the single
//! writer, mediating every transition through the API client. All store
//! operations catch their own errors and report through the notifier -
//! only `refresh_token` re-raises, so the interceptor can react.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Ack, AuthPayload, CurrentUser, SignupForm, User};
use crate::notify::Notifier;

use super::SnapshotStore;

const REGISTER_PATH: &str = "/register";
const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";
const GET_USER_PATH: &str = "/get-user";

/// Fallback notice when the server gave no usable message.
const GENERIC_ERROR: &str = "An error occurred";

// ============================================================================
// Shared state
// ============================================================================

/// Authentication state shared between the store, the interceptor, and
/// the view layer. Views only read; every write goes through the store's
/// operations (or the interceptor's forced logout).
pub struct SessionState {
    user: Mutex<Option<User>>,
    loading: AtomicBool,
    checking_auth: AtomicBool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            user: Mutex::new(None),
            loading: AtomicBool::new(false),
            checking_auth: AtomicBool::new(false),
        }
    }

    /// Current identity, if authenticated.
    pub fn user(&self) -> Option<User> {
        self.lock_user().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_user().is_some()
    }

    /// True while signup/login/logout is in flight.
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// True while an auth check or session refresh is in flight. Also the
    /// mutual-exclusion marker for the refresh path: at most one refresh
    /// call is outstanding at any time.
    pub fn checking_auth(&self) -> bool {
        self.checking_auth.load(Ordering::SeqCst)
    }

    pub(crate) fn set_user(&self, user: User) {
        *self.lock_user() = Some(user);
    }

    pub(crate) fn clear_user(&self) {
        *self.lock_user() = None;
    }

    pub(crate) fn set_loading(&self, value: bool) {
        self.loading.store(value, Ordering::SeqCst);
    }

    pub(crate) fn set_checking_auth(&self, value: bool) {
        self.checking_auth.store(value, Ordering::SeqCst);
    }

    fn lock_user(&self) -> MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Store operations
// ============================================================================

/// Single source of truth for auth transitions.
pub struct SessionStore {
    state: Arc<SessionState>,
    client: ApiClient,
    snapshot: Arc<SnapshotStore>,
    notifier: Notifier,
}

impl SessionStore {
    pub fn new(
        client: ApiClient,
        state: Arc<SessionState>,
        snapshot: Arc<SnapshotStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            state,
            client,
            snapshot,
            notifier,
        }
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    /// Restore the identity from the persisted snapshot, if present.
    /// Read-only: never writes the snapshot back.
    pub fn hydrate(&self) {
        match self.snapshot.load() {
            Ok(Some(user)) => {
                debug!(user_id = %user.id, "session hydrated from snapshot");
                self.state.set_user(user);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to load session snapshot"),
        }
    }

    /// Register a new account and start a session with it.
    ///
    /// Mismatched passwords fail before any network call is made.
    pub async fn signup(&self, form: SignupForm) {
        if form.password != form.confirm_password {
            self.report(ApiError::Validation("Passwords do not match".to_string()));
            return;
        }

        self.state.set_loading(true);
        let body = json!({
            "name": form.name,
            "email": form.email,
            "password": form.password,
            "role": form.role,
        });
        let result = self.client.post::<AuthPayload, _>(REGISTER_PATH, &body).await;
        self.settle_auth_attempt(result, "Account created");
        self.state.set_loading(false);
    }

    /// Start a session with existing credentials.
    pub async fn login(&self, email: &str, password: &str) {
        self.state.set_loading(true);
        let body = json!({ "email": email, "password": password });
        let result = self.client.post::<AuthPayload, _>(LOGIN_PATH, &body).await;
        self.settle_auth_attempt(result, "Logged in");
        self.state.set_loading(false);
    }

    /// End the session.
    ///
    /// Local-first policy: the in-memory identity and the snapshot are
    /// cleared when the call is issued, independent of whether the server
    /// acknowledges. A failed logout is reported but never restores them.
    pub async fn logout(&self) {
        self.state.clear_user();
        if let Err(e) = self.snapshot.clear() {
            warn!(error = %e, "failed to remove session snapshot");
        }

        self.state.set_loading(true);
        match self.client.post_empty::<Ack>(LOGOUT_PATH).await {
            Ok(Ack { success: true, msg }) => {
                self.notifier
                    .success(msg.unwrap_or_else(|| "Logged out".to_string()));
            }
            Ok(Ack { msg, .. }) => self.report(rejection(msg)),
            Err(e) => self.report(e),
        }
        self.state.set_loading(false);
    }

    /// Confirm an existing session with the server.
    ///
    /// A read-only confirmation: the returned identity updates the state
    /// but is not written back to the snapshot. On failure both the
    /// identity and the snapshot are cleared.
    pub async fn check_auth(&self) {
        self.state.set_checking_auth(true);
        match self.client.get::<CurrentUser>(GET_USER_PATH).await {
            Ok(CurrentUser { user: Some(user) }) => {
                self.state.set_user(user);
            }
            Ok(CurrentUser { user: None }) => {
                debug!("auth check returned no user");
                self.clear_session();
            }
            Err(e) => {
                debug!(error = %e, "auth check failed");
                self.clear_session();
            }
        }
        self.state.set_checking_auth(false);
    }

    /// Refresh the session credentials.
    ///
    /// No-op when a check or refresh is already in flight; otherwise
    /// delegates to the client's coalesced refresh path, which clears the
    /// session on failure. Unlike the other operations this one re-raises
    /// its error so the caller can react.
    pub async fn refresh_token(&self) -> Result<(), ApiError> {
        if self.state.checking_auth() {
            debug!("refresh skipped, auth operation already in flight");
            return Ok(());
        }
        self.client.refresh_session().await
    }

    fn settle_auth_attempt(&self, result: Result<AuthPayload, ApiError>, fallback_msg: &str) {
        match result {
            Ok(AuthPayload {
                success: true,
                user: Some(user),
                msg,
            }) => {
                if let Err(e) = self.snapshot.save(&user) {
                    warn!(error = %e, "failed to persist session snapshot");
                }
                self.state.set_user(user);
                self.notifier
                    .success(msg.unwrap_or_else(|| fallback_msg.to_string()));
            }
            Ok(AuthPayload {
                success: true,
                user: None,
                ..
            }) => {
                self.report(ApiError::InvalidResponse(
                    "server accepted the request but returned no user".to_string(),
                ));
            }
            Ok(AuthPayload { msg, .. }) => self.report(rejection(msg)),
            Err(e) => self.report(e),
        }
    }

    fn clear_session(&self) {
        self.state.clear_user();
        if let Err(e) = self.snapshot.clear() {
            warn!(error = %e, "failed to remove session snapshot");
        }
    }

    fn report(&self, error: ApiError) {
        debug!(error = %error, "session operation failed");
        self.notifier.error(notice_text(&error));
    }
}

fn rejection(msg: Option<String>) -> ApiError {
    ApiError::Rejected(msg.unwrap_or_else(|| GENERIC_ERROR.to_string()))
}

/// Text shown to the user for a failed operation: the server's message
/// when there is one, a generic fallback for transport problems.
fn notice_text(error: &ApiError) -> String {
    match error {
        ApiError::Rejected(msg) => msg.clone(),
        ApiError::Network(_) => GENERIC_ERROR.to_string(),
        other => other.to_string(),
    }
}
