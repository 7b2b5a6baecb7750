use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::time::MissedTickBehavior;
use utoipa::ToSchema;

use super::slot::{RefreshSlot, RefreshState};
use crate::flights::{FlightRecord, MockGenerator, Normalizer, Provenance};
use crate::provider::{FailureKind, FetchError, FlightSource};

/// Why a snapshot holds synthetic data instead of live data.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Fallback {
    pub kind: FailureKind,
    pub message: String,
}

/// The result of one completed refresh cycle. Replaces the previous one
/// wholesale.
#[derive(Debug, Clone)]
pub struct FlightSnapshot {
    pub flights: Vec<FlightRecord>,
    pub source: Provenance,
    pub completed_at: DateTime<Utc>,
    pub fallback: Option<Fallback>,
}

impl FlightSnapshot {
    pub fn notice(&self) -> Option<String> {
        self.fallback
            .as_ref()
            .map(|f| format!("Using simulated data ({}: {})", f.kind, f.message))
    }

    /// Linear scan by flight code, case-insensitive.
    pub fn find(&self, code: &str) -> Option<&FlightRecord> {
        self.flights
            .iter()
            .find(|f| f.code.eq_ignore_ascii_case(code.trim()))
    }
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(Arc<FlightSnapshot>),
    /// Another refresh was in flight; nothing was done.
    Skipped,
}

#[derive(Debug, Default)]
struct RefreshStats {
    completed: AtomicU64,
    skipped: AtomicU64,
    fallbacks: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RefreshCounters {
    pub completed: u64,
    pub skipped: u64,
    pub fallbacks: u64,
}

/// Owns the single in-flight request slot and the latest published
/// snapshot. Never fails: every error path degrades to synthetic data.
pub struct Refresher<S> {
    source: S,
    normalizer: Normalizer,
    mock: MockGenerator,
    slot: RefreshSlot,
    stats: RefreshStats,
    latest: watch::Sender<Option<Arc<FlightSnapshot>>>,
}

impl<S: FlightSource> Refresher<S> {
    pub fn new(source: S, normalizer: Normalizer, mock: MockGenerator) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            source,
            normalizer,
            mock,
            slot: RefreshSlot::new(),
            stats: RefreshStats::default(),
            latest,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<FlightSnapshot>>> {
        self.latest.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<FlightSnapshot>> {
        self.latest.borrow().clone()
    }

    pub fn state(&self) -> RefreshState {
        self.slot.state()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn counters(&self) -> RefreshCounters {
        RefreshCounters {
            completed: self.stats.completed.load(Ordering::Relaxed),
            skipped: self.stats.skipped.load(Ordering::Relaxed),
            fallbacks: self.stats.fallbacks.load(Ordering::Relaxed),
        }
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = self.slot.try_acquire() else {
            self.stats.skipped.fetch_add(1, Ordering::Relaxed);
            log::debug!("Refresh already in flight, trigger ignored");
            return RefreshOutcome::Skipped;
        };

        let snapshot = match self.fetch_live().await {
            Ok(flights) => {
                log::info!("Refreshed {} live flights", flights.len());
                FlightSnapshot {
                    flights,
                    source: Provenance::Live,
                    completed_at: Utc::now(),
                    fallback: None,
                }
            }
            Err(e) => {
                self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
                let flights = self.mock.generate();
                log::warn!(
                    "Live fetch failed ({}), serving {} simulated flights",
                    e,
                    flights.len()
                );
                FlightSnapshot {
                    flights,
                    source: Provenance::Synthetic,
                    completed_at: Utc::now(),
                    fallback: Some(Fallback {
                        kind: e.kind(),
                        message: e.to_string(),
                    }),
                }
            }
        };

        let snapshot = Arc::new(snapshot);
        self.latest.send_replace(Some(Arc::clone(&snapshot)));
        self.stats.completed.fetch_add(1, Ordering::Relaxed);

        RefreshOutcome::Completed(snapshot)
    }

    async fn fetch_live(&self) -> Result<Vec<FlightRecord>, FetchError> {
        let response = self.source.fetch_states().await?;
        let normalized = self.normalizer.normalize_all(&response.states, response.time);

        if !normalized.rejected.is_empty() {
            log::debug!(
                "Rejected {} of {} state vectors: {:?}",
                normalized.rejected_total(),
                response.states.len(),
                normalized.rejected
            );
        }

        if normalized.flights.is_empty() {
            return Err(FetchError::Empty {
                rejected: normalized.rejected_total(),
            });
        }

        Ok(normalized.flights)
    }
}

impl<S: FlightSource + 'static> Refresher<S> {
    /// Refresh immediately, then on every `interval` tick until `stop` fires.
    /// Each tick spawns its refresh, so a slow request makes later ticks
    /// no-ops instead of delaying them.
    pub async fn run(self: Arc<Self>, interval: Duration, mut stop: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let this = Arc::clone(&self);
                    tokio::spawn(async move {
                        this.refresh().await;
                    });
                }
                _ = &mut stop => {
                    log::info!("Refresh loop stopped");
                    break;
                }
            }
        }
    }
}
