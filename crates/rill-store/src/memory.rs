use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use rill_types::record;
use rill_types::{Message, MessageId, OutgoingMessage, RawRecord, Report, ReportSink};

use crate::subscription::{Snapshot, Subscription};
use crate::{MessageStore, StoreError, WINDOW_LIMIT};

/// In-process message store with live fan-out.
///
/// Stands in for the remote document collection: holds raw JSON records,
/// assigns ids and creation timestamps at commit, and pushes the validated
/// window to every live subscriber on each change. Subscribers are tracked
/// the same way the connection registry tracks clients: a per-subscriber
/// sender plus a cancellation token, pruned on every fan-out.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    records: RwLock<Vec<RawRecord>>,
    subscribers: RwLock<Vec<Subscriber>>,
    reporter: Arc<dyn ReportSink>,
}

struct Subscriber {
    token: CancellationToken,
    tx: mpsc::UnboundedSender<Snapshot>,
}

impl MemoryStore {
    pub fn new(reporter: Arc<dyn ReportSink>) -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                records: RwLock::new(Vec::new()),
                subscribers: RwLock::new(Vec::new()),
                reporter,
            }),
        }
    }

    /// Insert an arbitrary raw record, the way any other writer on the
    /// shared collection could. Bypasses the append constraints but not
    /// read-side validation.
    pub async fn insert_record(&self, record: RawRecord) {
        self.inner.records.write().await.push(record);
        self.fan_out().await;
    }

    /// Build the validated window: ascending by creation time, capped to
    /// the most recent [`WINDOW_LIMIT`] entries. Records failing validation
    /// are reported and excluded, never rendered as errors.
    async fn window(&self) -> Snapshot {
        let records = self.inner.records.read().await;
        let mut messages: Vec<Message> = Vec::with_capacity(records.len());
        for raw in records.iter() {
            match record::validate(raw) {
                Ok(message) => messages.push(message),
                Err(reason) => self.inner.reporter.report(Report::RecordDropped {
                    record_id: raw.id.clone(),
                    reason,
                }),
            }
        }

        messages.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        if messages.len() > WINDOW_LIMIT {
            messages.drain(..messages.len() - WINDOW_LIMIT);
        }
        messages
    }

    async fn fan_out(&self) {
        let snapshot = self.window().await;
        let mut subscribers = self.inner.subscribers.write().await;
        subscribers
            .retain(|sub| !sub.token.is_cancelled() && sub.tx.send(snapshot.clone()).is_ok());
    }
}

impl MessageStore for MemoryStore {
    async fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        // Initial load counts as a change.
        let _ = tx.send(self.window().await);

        self.inner.subscribers.write().await.push(Subscriber {
            token: token.clone(),
            tx,
        });

        Subscription::new(rx, token)
    }

    async fn append(&self, outgoing: OutgoingMessage) -> Result<MessageId, StoreError> {
        if outgoing.text.trim().is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let id = MessageId(Uuid::new_v4().to_string());
        // Store-assigned creation time, set at commit.
        let created_at = Utc::now();

        let mut data = json!({
            "text": outgoing.text,
            "created_at": created_at.to_rfc3339(),
            "uid": outgoing.author.id,
            "display_name": outgoing.author.display_name,
            "avatar_url": outgoing.author.avatar_url,
        });
        if let Some(reply) = &outgoing.reply_to {
            data["reply_to"] = json!({
                "message_id": reply.message_id.0,
                "text": reply.text,
            });
        }

        self.inner
            .records
            .write()
            .await
            .push(RawRecord::new(id.0.clone(), data));
        self.fan_out().await;

        debug!("appended message {}", id);
        Ok(id)
    }
}
