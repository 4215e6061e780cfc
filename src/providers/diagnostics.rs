//! Client-side error reporting
//!
//! Failures inside the console are posted to /frontend/error so the
//! operators can see what broke in the field. The API answers 202 when
//! it accepted the report. When the report itself fails (network down,
//! server unavailable) it is parked in a bounded in-memory queue and
//! replayed later; beyond the cap the oldest reports are dropped.

use rand::Rng;
use reqwest::StatusCode;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::AppResult;
use crate::providers::http::ApiClient;

/// Payload for `POST /frontend/error`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub app_name: String,
    pub app_version: String,
    pub error: String,
    pub stack_trace: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>, stack_trace: impl Into<String>) -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            error: error.into(),
            stack_trace: stack_trace.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingReport {
    id: Uuid,
    report: ErrorReport,
}

pub struct DiagnosticsClient {
    api: ApiClient,
    pending: Mutex<VecDeque<PendingReport>>,
}

impl DiagnosticsClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Send one report; on failure queue it for a later replay
    pub async fn report(&self, report: ErrorReport) {
        match self.post_report(&report).await {
            Ok(status) => {
                debug!("✅ Error report delivered ({})", status.as_u16());
            }
            Err(e) => {
                warn!("⚠️ Error report failed ({}), queueing for replay", e);
                self.enqueue(report);
            }
        }
    }

    /// Retry queued reports, a batch at a time with jitter in between
    /// so a recovering server is not hit with a burst.
    pub async fn replay_pending(&self) -> usize {
        let batch = self.api.config().diagnostics_replay_batch;
        let mut delivered = 0;

        for _ in 0..batch {
            let Some(next) = self.dequeue() else { break };

            match self.post_report(&next.report).await {
                Ok(_) => {
                    debug!("✅ Replayed queued report {}", next.id);
                    delivered += 1;
                }
                Err(_) => {
                    // Put it back and stop; the server is still unhappy
                    self.requeue_front(next);
                    break;
                }
            }

            let jitter_ms = rand::thread_rng().gen_range(50..250);
            tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
        }

        if delivered > 0 {
            info!("📊 Replayed {} queued error reports", delivered);
        }
        delivered
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|q| q.len()).unwrap_or(0)
    }

    async fn post_report(&self, report: &ErrorReport) -> AppResult<StatusCode> {
        self.api.post_status("/frontend/error", report).await
    }

    fn enqueue(&self, report: ErrorReport) {
        let cap = self.api.config().max_pending_diagnostics;
        if let Ok(mut queue) = self.pending.lock() {
            while queue.len() >= cap {
                queue.pop_front();
            }
            queue.push_back(PendingReport {
                id: Uuid::new_v4(),
                report,
            });
        }
    }

    fn dequeue(&self) -> Option<PendingReport> {
        self.pending.lock().ok().and_then(|mut q| q.pop_front())
    }

    fn requeue_front(&self, pending: PendingReport) {
        if let Ok(mut queue) = self.pending.lock() {
            queue.push_front(pending);
        }
    }
}
