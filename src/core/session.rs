use crate::models::Identity;
use crate::services::{ApiClient, GatewayError, IdentityStore, StoreError};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during session transitions
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("identity storage failed: {0}")]
    Store(#[from] StoreError),
}

/// The current authenticated identity, persisted across process restarts
///
/// Presence of an identity means "authenticated". There are exactly three
/// mutation sites: [`SessionState::login`], [`SessionState::logout`], and
/// [`SessionState::invalidate`] (the unauthorized-propagation path).
pub struct SessionState {
    store: Arc<dyn IdentityStore>,
    identity: Mutex<Option<Identity>>,
}

impl SessionState {
    /// Restore session state from the store, synchronously, before any
    /// authenticated work begins
    ///
    /// A corrupt persisted record is treated as absent; the next
    /// successful login overwrites it.
    pub fn restore(store: Arc<dyn IdentityStore>) -> Self {
        let identity = match store.load() {
            Ok(Some(identity)) => {
                tracing::info!("Restored session for {}", identity.email);
                Some(identity)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted identity: {}", e);
                None
            }
        };

        Self {
            store,
            identity: Mutex::new(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.lock().expect("session lock poisoned").is_some()
    }

    /// The current identity, if authenticated
    pub fn identity(&self) -> Option<Identity> {
        self.identity.lock().expect("session lock poisoned").clone()
    }

    /// Log in via the gateway; on success persist the identity and mark
    /// the session authenticated
    ///
    /// On any failure the prior session state is untouched.
    pub async fn login(&self, gateway: &ApiClient, identity: Identity) -> Result<(), SessionError> {
        gateway.login(&identity).await?;
        self.store.save(&identity)?;

        tracing::info!("Logged in as {}", identity.email);
        *self.identity.lock().expect("session lock poisoned") = Some(identity);
        Ok(())
    }

    /// Log out via the gateway
    ///
    /// Local state is cleared whether or not the remote call succeeds; a
    /// remote failure is surfaced only after cleanup, so the client never
    /// looks logged in when the backend refused the logout.
    pub async fn logout(&self, gateway: &ApiClient) -> Result<(), SessionError> {
        let remote = gateway.logout().await;

        self.identity.lock().expect("session lock poisoned").take();
        let cleared = self.store.clear();

        if let Err(e) = &remote {
            tracing::warn!("Remote logout failed after local cleanup: {}", e);
        }
        remote?;
        cleared?;

        tracing::info!("Logged out");
        Ok(())
    }

    /// Force the session unauthenticated after the backend reported the
    /// session invalid
    ///
    /// Runs for any 401, including one arriving on a background fetch, so
    /// the error cannot propagate; a storage failure here is only logged.
    pub fn invalidate(&self) {
        let had_identity = self
            .identity
            .lock()
            .expect("session lock poisoned")
            .take()
            .is_some();

        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted identity: {}", e);
        }

        if had_identity {
            tracing::info!("Session invalidated by unauthorized response");
        }
    }
}
