use crate::engine::{ExpenseReport, ReportEngine};
use crate::error::Result;
use crate::schema::{RawMonthRecord, ReportConfig};
use crate::source::ExpenseSource;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// What the display layer should currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    Idle,
    /// A fetch is in flight. `previous` is the report still on screen, if any.
    Fetching {
        request_id: u64,
        previous: Option<Arc<ExpenseReport>>,
    },
    Ready {
        request_id: u64,
        report: Arc<ExpenseReport>,
    },
    /// The last fetch failed. No chart or narrative is available.
    Unavailable {
        request_id: u64,
        reason: String,
    },
}

impl ReportState {
    /// The report produced by the latest fetch, once it has settled.
    pub fn report(&self) -> Option<&Arc<ExpenseReport>> {
        match self {
            ReportState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The report to keep rendering, including while a refresh is in flight.
    pub fn displayed_report(&self) -> Option<&Arc<ExpenseReport>> {
        match self {
            ReportState::Ready { report, .. } => Some(report),
            ReportState::Fetching { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<u64> {
        match self {
            ReportState::Idle => None,
            ReportState::Fetching { request_id, .. }
            | ReportState::Ready { request_id, .. }
            | ReportState::Unavailable { request_id, .. } => Some(*request_id),
        }
    }
}

/// Fetches snapshots and publishes finished reports.
///
/// Each refresh gets a sequence number. A response is only published if no
/// newer refresh has started in the meantime, and the chart plus both
/// narratives are swapped in together through a single watch update.
pub struct ReportOrchestrator<S> {
    source: S,
    engine: ReportEngine,
    latest_request: AtomicU64,
    state: watch::Sender<ReportState>,
}

impl<S: ExpenseSource> ReportOrchestrator<S> {
    pub fn new(source: S, config: ReportConfig) -> Self {
        let (state, _) = watch::channel(ReportState::Idle);
        Self {
            source,
            engine: ReportEngine::new(config),
            latest_request: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReportState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ReportState {
        self.state.borrow().clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one fetch cycle and returns the state visible afterwards.
    pub async fn refresh(&self) -> ReportState {
        let request_id = self.begin_request();
        let outcome = self.source.fetch_monthly_expenses().await;
        self.complete_request(request_id, outcome)
    }

    fn begin_request(&self) -> u64 {
        let mut request_id = 0;
        // The id is allocated under the watch lock so no completion can slip
        // in between allocation and the `Fetching` publish.
        self.state.send_modify(|state| {
            request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            let previous = state.displayed_report().cloned();
            *state = ReportState::Fetching {
                request_id,
                previous,
            };
        });
        debug!("Started monthly expense fetch #{}", request_id);
        request_id
    }

    fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == request_id
    }

    fn complete_request(
        &self,
        request_id: u64,
        outcome: Result<Vec<RawMonthRecord>>,
    ) -> ReportState {
        if !self.is_latest(request_id) {
            debug!("Discarding stale response for fetch #{}", request_id);
            return self.state();
        }

        let next = match outcome {
            Ok(records) => {
                let report = self.engine.build(&records);
                info!(
                    "Fetch #{} produced a report covering {} months ({} warnings)",
                    request_id,
                    report.months.len(),
                    report.warnings.len()
                );
                ReportState::Ready {
                    request_id,
                    report: Arc::new(report),
                }
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", request_id, e);
                ReportState::Unavailable {
                    request_id,
                    reason: e.to_string(),
                }
            }
        };

        if !self.publish(request_id, next) {
            debug!("Discarding stale response for fetch #{}", request_id);
        }

        self.state()
    }

    /// Replaces the published state unless a newer refresh has started.
    fn publish(&self, request_id: u64, next: ReportState) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_latest(request_id) {
                return false;
            }
            *state = next;
            true
        })
    }
}
