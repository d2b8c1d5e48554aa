use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user as reported by the identity backend.
/// Held in memory for the duration of the session, cleared on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Opaque id assigned by the identity provider.
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Store-assigned document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reply annotation: the target message plus its text as echoed at the
/// time the reply was composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub message_id: MessageId,
    pub text: String,
}

/// A validated message, safe to render.
///
/// `created_at` is always store-assigned; clients never write timestamps.
/// Author fields may be empty strings when the raw record lacked them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub reply_to: Option<ReplyRef>,
}

/// Payload for an append. The store assigns the id and creation time at
/// commit, so neither appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub author: UserIdentity,
    pub reply_to: Option<ReplyRef>,
}
