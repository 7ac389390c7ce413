//! Application state for the smart API

use std::sync::Arc;

use smart_core::DocumentStore;

use crate::middleware::AuthPolicy;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Store handle, acquired before the server starts listening
    store: Arc<dyn DocumentStore>,
    /// Behaviour of the token-presence gate
    auth_policy: AuthPolicy,
}

impl AppState {
    /// Create a new AppState with a permissive token gate
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            auth_policy: AuthPolicy::default(),
        }
    }

    /// Replace the token gate policy
    pub fn with_auth_policy(mut self, auth_policy: AuthPolicy) -> Self {
        self.auth_policy = auth_policy;
        self
    }

    /// Get the store handle
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        self.auth_policy
    }
}
