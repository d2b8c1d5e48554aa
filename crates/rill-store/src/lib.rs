//! Live message store: the collaborator contract the channel controller is
//! written against, plus the in-process implementation used by the shell
//! and by tests.

pub mod memory;
pub mod subscription;

use std::future::Future;

use thiserror::Error;

use rill_types::{MessageId, OutgoingMessage};

pub use memory::MemoryStore;
pub use subscription::{Snapshot, Subscription};

/// Most recent entries kept in the live window.
pub const WINDOW_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// The shared message collection as the client sees it: a live query plus
/// a single-record insert. Implementations are constructed and passed in;
/// nothing reaches for a process-wide handle.
pub trait MessageStore: Send + Sync {
    /// Open a live query over the collection, ordered by creation time
    /// ascending and windowed to the [`WINDOW_LIMIT`] most recent entries.
    /// Every remote change delivers the full validated window, the initial
    /// load included. The returned handle must be cancelled to release the
    /// subscription; dropping it cancels too.
    fn subscribe(&self) -> impl Future<Output = Subscription> + Send;

    /// Insert one message. The store assigns the id and the creation
    /// timestamp at commit. Rejects text that is empty after trimming;
    /// the committed text is the caller's original, untrimmed.
    fn append(
        &self,
        outgoing: OutgoingMessage,
    ) -> impl Future<Output = Result<MessageId, StoreError>> + Send;
}
