use crate::core::session::SessionState;
use crate::services::{ApiClient, GatewayError};

/// Shared context handed to every component that talks to the backend
///
/// Replaces ambient global auth state with an explicit object: the gateway
/// plus the session it authenticates. All gateway results from
/// authenticated components are routed through [`AppContext::authorized`]
/// so an unauthorized response from any call, foreground or background,
/// forces the session unauthenticated exactly once, in one place.
pub struct AppContext {
    pub gateway: ApiClient,
    pub session: SessionState,
}

impl AppContext {
    pub fn new(gateway: ApiClient, session: SessionState) -> Self {
        Self { gateway, session }
    }

    /// Pass a gateway result through, invalidating the session when the
    /// backend reported it invalid
    pub fn authorized<T>(&self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        if let Err(GatewayError::Unauthorized) = &result {
            self.session.invalidate();
        }
        result
    }
}
