//! Session handling: the identity-backend contract, the session state
//! machine, and the provider that routes sign-in/sign-out failures to the
//! report sink instead of surfacing them.

pub mod local;
pub mod provider;

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

use rill_types::UserIdentity;

pub use local::LocalIdentity;
pub use provider::SessionProvider;

/// Where the session currently stands.
///
/// `Initializing` is the only state in which the shell withholds rendering;
/// the backend resolves it to one of the other two on its first callback
/// and never returns to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Anonymous,
    Authenticated(UserIdentity),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in challenge was cancelled")]
    Cancelled,
    #[error("identity backend rejected the request: {0}")]
    Rejected(String),
}

/// The external identity provider, injected rather than global.
///
/// Lifecycle events arrive through the watch channel, which callers
/// register for at startup and never unregister. A failed or cancelled
/// sign-in leaves the published state untouched.
pub trait IdentityBackend: Send + Sync {
    fn watch(&self) -> watch::Receiver<SessionState>;

    /// Run the interactive sign-in challenge. On success the backend
    /// publishes `Authenticated` before resolving.
    fn sign_in(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Clear the authenticated session with the backend's own sign-out
    /// primitive.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}
