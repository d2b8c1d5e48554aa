use rill_types::{Message, MessageId, ReplyRef};

/// Emoji offered by the composer picker and the per-message react action.
pub const EMOJI_PALETTE: [&str; 6] = ["😀", "😂", "😍", "👍", "🔥", "🎉"];

/// Everything the channel surface renders from.
///
/// Owned and mutated exclusively by the controller. The message sequence
/// is replaced wholesale on every subscription update; the rest is local
/// interaction state that never reaches the store.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    /// Validated messages, ascending by creation time, at most the store's
    /// window size.
    pub messages: Vec<Message>,
    /// Current composer draft.
    pub draft: String,
    /// Message being replied to, if any.
    pub replying_to: Option<ReplyRef>,
    pub emoji_picker_open: bool,
    /// Newest entry after the latest update; the view scrolls here.
    pub scroll_anchor: Option<MessageId>,
}
