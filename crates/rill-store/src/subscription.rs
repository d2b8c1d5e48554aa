use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use rill_types::Message;

/// One delivered result set: the full validated window, ascending by
/// creation time.
pub type Snapshot = Vec<Message>;

/// Live handle onto the channel's message window.
///
/// Yields whole snapshots, never deltas. Cancellation is explicit and
/// idempotent; dropping the handle cancels as well, so the subscription is
/// released on every exit path. A snapshot already in flight when the
/// handle is cancelled is discarded, not delivered.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Snapshot>,
    token: CancellationToken,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl Subscription {
    pub fn new(rx: mpsc::UnboundedReceiver<Snapshot>, token: CancellationToken) -> Self {
        let cancelled = Box::pin(token.clone().cancelled_owned());
        Self {
            rx,
            token,
            cancelled,
        }
    }

    /// Await the next snapshot. Returns `None` once the subscription has
    /// been cancelled or the store has gone away.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        let token = self.token.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            snapshot = self.rx.recv() => snapshot,
        }
    }

    /// Stop receiving updates and release the subscription.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.rx.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.token.is_cancelled() {
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(item) => Poll::Ready(item),
            Poll::Pending => match this.cancelled.as_mut().poll(cx) {
                Poll::Ready(()) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
