//! Shared data model for the rill chat client: user identities, messages,
//! raw-record validation, and the report sink that collects every failure
//! the client swallows.

pub mod models;
pub mod record;
pub mod report;

pub use models::{Message, MessageId, OutgoingMessage, ReplyRef, UserIdentity};
pub use record::{RawRecord, RecordError};
pub use report::{MemorySink, Report, ReportSink, TracingSink};
