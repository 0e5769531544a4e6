/*
[INPUT]:  Status transitions from the challenge adapter and JWT login
[OUTPUT]: Shared, observable authentication status
[POS]:    Auth layer - process-wide auth status handle
[UPDATE]: When new status transitions are introduced
*/

use tokio::sync::watch;
use tracing::info;

use crate::types::AuthStatus;

/// Cloneable handle to the app-wide [`AuthStatus`].
///
/// Clones share the same value; subscribers are woken on every change.
#[derive(Debug, Clone)]
pub struct AuthState {
    tx: watch::Sender<AuthStatus>,
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthStatus::Unauthenticated);
        Self { tx }
    }

    pub fn status(&self) -> AuthStatus {
        *self.tx.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, status: AuthStatus) {
        let previous = self.tx.send_replace(status);
        if previous != status {
            info!(from = %previous, to = %status, "auth status changed");
        }
    }

    /// Explicit sign-out on the client side
    pub fn reset(&self) {
        self.set(AuthStatus::Unauthenticated);
    }

    /// Resolve once the status reads `Authenticated`
    pub async fn wait_authenticated(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|status| *status == AuthStatus::Authenticated).await;
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
