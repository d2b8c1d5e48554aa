use std::sync::Arc;

use tracing::debug;

use rill_store::{MessageStore, Snapshot, Subscription};
use rill_types::{MessageId, OutgoingMessage, ReplyRef, Report, ReportSink, UserIdentity};

use crate::state::ChannelState;

/// What became of a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exactly one append was accepted; the draft has been cleared.
    Sent,
    /// Draft was empty after trimming. No write, draft untouched.
    EmptyDraft,
    /// No authenticated identity. No write, draft untouched.
    NotAuthenticated,
    /// The store rejected the write. Reported; draft kept for a manual
    /// retry.
    Failed,
}

/// Bridges the store's live window to local view state and user intent
/// back to store writes.
///
/// Exclusively owns its [`ChannelState`]. Mounting opens exactly one
/// subscription; unmounting (or dropping the controller) releases it.
pub struct ChannelController<S: MessageStore> {
    store: Arc<S>,
    user: Option<UserIdentity>,
    subscription: Option<Subscription>,
    state: ChannelState,
    reporter: Arc<dyn ReportSink>,
}

impl<S: MessageStore> ChannelController<S> {
    pub async fn mount(
        store: Arc<S>,
        user: Option<UserIdentity>,
        reporter: Arc<dyn ReportSink>,
    ) -> Self {
        let subscription = Some(store.subscribe().await);
        Self {
            store,
            user,
            subscription,
            state: ChannelState::default(),
            reporter,
        }
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    /// Await the next remote update and apply it. Returns `false` once the
    /// subscription is closed or the controller has been unmounted; no
    /// view state changes after that.
    pub async fn next_update(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next_snapshot().await {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Replace the message sequence wholesale. The store always delivers
    /// the canonical window, so there is nothing to merge or deduplicate.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.state.messages = snapshot;
        self.state.scroll_anchor = self.state.messages.last().map(|m| m.id.clone());
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.state.draft
    }

    pub fn toggle_emoji_picker(&mut self) {
        self.state.emoji_picker_open = !self.state.emoji_picker_open;
    }

    /// Append an emoji glyph at the end of the draft and close the picker.
    pub fn insert_emoji(&mut self, glyph: &str) {
        self.state.draft.push_str(glyph);
        self.state.emoji_picker_open = false;
    }

    pub fn begin_reply(&mut self, message_id: MessageId, text: impl Into<String>) {
        self.state.replying_to = Some(ReplyRef {
            message_id,
            text: text.into(),
        });
    }

    pub fn cancel_reply(&mut self) {
        self.state.replying_to = None;
    }

    /// Record a reaction pick. Observed through the sink only; nothing is
    /// written to the store and no view reflects it.
    pub fn select_reaction(&self, message_id: MessageId, emoji: &str) {
        self.reporter.report(Report::ReactionSelected {
            message_id,
            emoji: emoji.to_string(),
        });
    }

    /// Submit the current draft.
    ///
    /// Trimming is only a guard: the append carries the original draft
    /// text. The draft and reply annotation clear only after the write
    /// settles successfully; there is no optimistic local insertion, so
    /// the message becomes visible via the subscription echo.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.state.draft.trim().is_empty() {
            return SubmitOutcome::EmptyDraft;
        }
        let Some(user) = self.user.clone() else {
            return SubmitOutcome::NotAuthenticated;
        };

        let outgoing = OutgoingMessage {
            text: self.state.draft.clone(),
            author: user,
            reply_to: self.state.replying_to.clone(),
        };

        match self.store.append(outgoing).await {
            Ok(id) => {
                debug!("append accepted as {}", id);
                self.state.draft.clear();
                self.state.replying_to = None;
                SubmitOutcome::Sent
            }
            Err(err) => {
                self.reporter.report(Report::WriteFailure {
                    detail: err.to_string(),
                });
                SubmitOutcome::Failed
            }
        }
    }

    /// Release the subscription. Idempotent; dropping the controller
    /// releases it too.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}
