use std::sync::Arc;

use tokio::sync::watch;

use rill_types::{Report, ReportSink, UserIdentity};

use crate::{IdentityBackend, SessionState};

/// Thin wrapper over the identity backend: exposes live session state and
/// the two session actions, routing their failures to the report sink.
/// No failure here ever becomes a visible error state.
pub struct SessionProvider<B: IdentityBackend> {
    backend: Arc<B>,
    state: watch::Receiver<SessionState>,
    reporter: Arc<dyn ReportSink>,
}

impl<B: IdentityBackend> SessionProvider<B> {
    /// Registers for the backend's lifecycle events. The registration is
    /// held for the life of the provider and never unregistered.
    pub fn new(backend: Arc<B>, reporter: Arc<dyn ReportSink>) -> Self {
        let state = backend.watch();
        Self {
            backend,
            state,
            reporter,
        }
    }

    /// Live session state, not a one-time fetch.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.state.borrow().user().cloned()
    }

    /// Await the next session transition. Returns `false` once the backend
    /// has gone away.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Trigger the interactive sign-in challenge. On failure or user
    /// cancellation the session state is left unchanged.
    pub async fn sign_in(&self) {
        if let Err(err) = self.backend.sign_in().await {
            self.reporter.report(Report::AuthFailure {
                detail: err.to_string(),
            });
        }
    }

    /// Clear the session by delegating to the backend's sign-out
    /// primitive.
    pub async fn sign_out(&self) {
        if let Err(err) = self.backend.sign_out().await {
            self.reporter.report(Report::SignOutFailure {
                detail: err.to_string(),
            });
        }
    }
}
