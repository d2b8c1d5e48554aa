use std::sync::Mutex;

use tracing::{info, warn};

use crate::models::MessageId;
use crate::record::RecordError;

/// Everything the client observes but never surfaces to the user.
///
/// None of these ever becomes a visible error state. Each one is
/// classified and handed to a [`ReportSink`] so callers (and tests) can see
/// what was dropped and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// An inbound record failed validation and was excluded from the view.
    RecordDropped {
        record_id: String,
        reason: RecordError,
    },
    /// The interactive sign-in challenge failed or was cancelled.
    AuthFailure { detail: String },
    SignOutFailure { detail: String },
    /// An append was rejected by the store. Never retried.
    WriteFailure { detail: String },
    /// A reaction was picked on a message. Observed only, never persisted.
    ReactionSelected { message_id: MessageId, emoji: String },
}

/// Pluggable observability sink for swallowed failures.
pub trait ReportSink: Send + Sync {
    fn report(&self, report: Report);
}

/// Default sink: routes every report to the log.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, report: Report) {
        match report {
            Report::RecordDropped { record_id, reason } => {
                warn!("dropped record {}: {}", record_id, reason);
            }
            Report::AuthFailure { detail } => warn!("sign-in failed: {}", detail),
            Report::SignOutFailure { detail } => warn!("sign-out failed: {}", detail),
            Report::WriteFailure { detail } => warn!("append failed: {}", detail),
            Report::ReactionSelected { message_id, emoji } => {
                info!("reaction {} selected on {}", emoji, message_id);
            }
        }
    }
}

/// Collecting sink for tests: remembers every report in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Drains and returns everything reported so far.
    pub fn take(&self) -> Vec<Report> {
        self.reports
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default()
    }
}

impl ReportSink for MemorySink {
    fn report(&self, report: Report) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_order_and_drains() {
        let sink = MemorySink::new();
        sink.report(Report::AuthFailure {
            detail: "cancelled".into(),
        });
        sink.report(Report::WriteFailure {
            detail: "offline".into(),
        });

        let reports = sink.take();
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0], Report::AuthFailure { .. }));
        assert!(matches!(reports[1], Report::WriteFailure { .. }));
        assert!(sink.reports().is_empty());
    }
}
