//! Progress reporting.
//!
//! An append-only sequence of `{job_id, phase, status, timestamp, message?}`
//! events, serialized by the sink (not by per-caller locking): a single
//! writer lock, append, read back by key. No publish/subscribe machinery —
//! callers poll `events_for`/`latest_by_job` rather than registering
//! listeners.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::types::PhaseName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Started,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub job_id: String,
    pub phase: PhaseName,
    pub status: PhaseStatus,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
}

/// A progress callback invoked at phase boundaries:
/// `(job_id, phase_name, message)`.
pub type ProgressCallback = Arc<dyn Fn(&str, &str, &str) + Send + Sync>;

/// Append-only, job_id-keyed progress log.
#[derive(Default)]
pub struct ProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, event: ProgressEvent) {
        self.events.lock().await.push(event);
    }

    pub async fn report(
        &self,
        job_id: &str,
        phase: PhaseName,
        status: PhaseStatus,
        message: Option<String>,
    ) {
        self.record(ProgressEvent {
            job_id: job_id.to_string(),
            phase,
            status,
            timestamp: Utc::now(),
            message,
        })
        .await;
    }

    /// The latest events for a given job, in recorded order.
    pub async fn events_for(&self, job_id: &str) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.job_id == job_id)
            .cloned()
            .collect()
    }

    /// The most recent event per job_id, for at-a-glance batch monitoring.
    pub async fn latest_by_job(&self) -> BTreeMap<String, ProgressEvent> {
        let mut out: BTreeMap<String, ProgressEvent> = BTreeMap::new();
        for event in self.events.lock().await.iter() {
            out.insert(event.job_id.clone(), event.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_are_filtered_by_job_id() {
        let sink = ProgressSink::new();
        sink.report("a", PhaseName::Discovery, PhaseStatus::Started, None).await;
        sink.report("b", PhaseName::Discovery, PhaseStatus::Started, None).await;
        sink.report("a", PhaseName::Discovery, PhaseStatus::Completed, None).await;

        let events = sink.events_for("a").await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.job_id == "a"));
    }
}
