use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use rill_types::UserIdentity;

use crate::{AuthError, IdentityBackend, SessionState};

/// In-process identity backend: authenticates one fixed identity without
/// an external provider. Backs the shell in development and stands in for
/// the provider in tests.
pub struct LocalIdentity {
    identity: UserIdentity,
    state: watch::Sender<SessionState>,
    deny_next: AtomicBool,
}

impl LocalIdentity {
    pub fn new(identity: UserIdentity) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            identity,
            state,
            deny_next: AtomicBool::new(false),
        }
    }

    /// A fresh identity with a generated id.
    pub fn with_profile(display_name: &str, avatar_url: &str) -> Self {
        Self::new(UserIdentity {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            avatar_url: avatar_url.to_string(),
        })
    }

    /// Resolve the startup state. There is no stored session to restore,
    /// so the first published state is `Anonymous`.
    pub fn start(&self) {
        self.state.send_replace(SessionState::Anonymous);
    }

    /// Make the next sign-in challenge fail, as if the user dismissed it.
    pub fn deny_next_sign_in(&self) {
        self.deny_next.store(true, Ordering::SeqCst);
    }
}

impl IdentityBackend for LocalIdentity {
    fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn sign_in(&self) -> Result<(), AuthError> {
        if self.deny_next.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Cancelled);
        }
        self.state
            .send_replace(SessionState::Authenticated(self.identity.clone()));
        info!("signed in as {}", self.identity.display_name);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_replace(SessionState::Anonymous);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionProvider;
    use rill_types::{MemorySink, Report};
    use std::sync::Arc;

    fn ann() -> UserIdentity {
        UserIdentity {
            id: "u1".into(),
            display_name: "Ann".into(),
            avatar_url: String::new(),
        }
    }

    #[tokio::test]
    async fn starts_initializing_then_resolves_anonymous() {
        let backend = LocalIdentity::new(ann());
        let rx = backend.watch();
        assert!(rx.borrow().is_initializing());

        backend.start();
        assert_eq!(*rx.borrow(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn sign_in_publishes_the_authenticated_identity() {
        let backend = Arc::new(LocalIdentity::new(ann()));
        let sink = Arc::new(MemorySink::new());
        let provider = SessionProvider::new(backend.clone(), sink.clone());

        backend.start();
        provider.sign_in().await;

        assert_eq!(provider.current_user(), Some(ann()));
        assert!(sink.reports().is_empty());
    }

    #[tokio::test]
    async fn failed_sign_in_reports_and_leaves_state_unchanged() {
        let backend = Arc::new(LocalIdentity::new(ann()));
        let sink = Arc::new(MemorySink::new());
        let provider = SessionProvider::new(backend.clone(), sink.clone());

        backend.start();
        backend.deny_next_sign_in();
        provider.sign_in().await;

        assert_eq!(provider.state(), SessionState::Anonymous);
        assert!(matches!(
            sink.reports().as_slice(),
            [Report::AuthFailure { .. }]
        ));
    }

    #[tokio::test]
    async fn sign_out_delegates_to_the_backend_primitive() {
        let backend = Arc::new(LocalIdentity::new(ann()));
        let sink = Arc::new(MemorySink::new());
        let provider = SessionProvider::new(backend.clone(), sink.clone());

        backend.start();
        provider.sign_in().await;
        provider.sign_out().await;

        assert_eq!(provider.state(), SessionState::Anonymous);
        assert!(provider.current_user().is_none());
    }

    #[tokio::test]
    async fn provider_observes_transitions_as_they_happen() {
        let backend = Arc::new(LocalIdentity::new(ann()));
        let sink = Arc::new(MemorySink::new());
        let mut provider = SessionProvider::new(backend.clone(), sink);

        backend.start();
        assert!(provider.changed().await);
        assert_eq!(provider.state(), SessionState::Anonymous);

        provider.sign_in().await;
        assert!(provider.changed().await);
        assert!(provider.current_user().is_some());
    }
}
