// Section board - Independent per-section fetch lifecycles
use crate::application::analytics_repository::{AnalyticsRepository, FetchError};
use crate::application::section_adapters::{build_content, endpoints, failure_message};
use crate::domain::charts::{ChartCache, Drawing};
use crate::domain::section::{SectionKind, SectionStatus, Timeframe};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, watch};
use tokio::task::AbortHandle;

struct Slot {
    status: SectionStatus,
    payloads: Vec<Value>,
    generation: u64,
    /// Last generation whose status became final.
    settled: watch::Sender<u64>,
    charts: Vec<ChartCache>,
}

impl Slot {
    fn new() -> Self {
        Self {
            status: SectionStatus::Loading,
            payloads: Vec::new(),
            generation: 0,
            settled: watch::Sender::new(0),
            charts: Vec::new(),
        }
    }

    fn settled_at(&self, generation: u64) -> Settled {
        Settled {
            rx: self.settled.subscribe(),
            generation,
        }
    }
}

/// Resolves once a section's status is final for the fetch it was handed
/// out for, or for a later one that replaced it.
pub struct Settled {
    rx: watch::Receiver<u64>,
    generation: u64,
}

impl Settled {
    /// `false` when the board went away first.
    pub async fn wait(mut self) -> bool {
        let generation = self.generation;
        let settled = self.rx.wait_for(|done| *done >= generation).await.is_ok();
        settled
    }
}

#[derive(Default)]
struct BoardState {
    slots: HashMap<SectionKind, Slot>,
    timeframe: Timeframe,
}

/// Owns every section's load state. Each fetch runs as its own task; a
/// failure only ever marks its own section as failed.
pub struct SectionBoard {
    repository: Arc<dyn AnalyticsRepository>,
    state: Arc<Mutex<BoardState>>,
    in_flight: std::sync::Mutex<HashMap<SectionKind, AbortHandle>>,
}

async fn fetch_payloads(
    repository: &dyn AnalyticsRepository,
    kind: SectionKind,
) -> Result<Vec<Value>, FetchError> {
    // Sections with several endpoints fetch them concurrently.
    futures::future::try_join_all(endpoints(kind).iter().map(|e| repository.fetch(*e))).await
}

impl SectionBoard {
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(Mutex::new(BoardState::default())),
            in_flight: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn in_flight(&self) -> std::sync::MutexGuard<'_, HashMap<SectionKind, AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the fetch for `kind`, or joins the one already in flight.
    pub async fn load(&self, kind: SectionKind) -> Settled {
        self.start(kind, false).await
    }

    async fn start(&self, kind: SectionKind, restart: bool) -> Settled {
        // Held until the new task is registered so concurrent callers see it.
        let mut board = self.state.lock().await;
        let slot = board.slots.entry(kind).or_insert_with(Slot::new);

        let running = self.in_flight().get(&kind).is_some_and(|h| !h.is_finished());
        if running && !restart {
            tracing::debug!(section = %kind.id(), generation = slot.generation, "joining in-flight fetch");
            return slot.settled_at(slot.generation);
        }
        if let Some(previous) = self.in_flight().remove(&kind) {
            tracing::debug!(section = %kind.id(), "aborting in-flight fetch");
            previous.abort();
        }

        slot.generation += 1;
        slot.status = SectionStatus::Loading;
        let generation = slot.generation;
        let settled = slot.settled_at(generation);

        let repository = self.repository.clone();
        let shared = self.state.clone();
        let handle = tokio::spawn(async move {
            tracing::debug!(section = %kind.id(), generation, "fetching section");
            let result = fetch_payloads(repository.as_ref(), kind).await;

            let mut state = shared.lock().await;
            let timeframe = state.timeframe;
            let Some(slot) = state.slots.get_mut(&kind) else {
                return;
            };
            if slot.generation != generation {
                return;
            }
            match result {
                Ok(payloads) => {
                    slot.status = SectionStatus::Ready(build_content(kind, &payloads, timeframe));
                    slot.payloads = payloads;
                    tracing::info!(section = %kind.id(), "section ready");
                }
                Err(err) => {
                    tracing::error!(section = %kind.id(), error = %err, "section fetch failed");
                    slot.status = SectionStatus::Failed {
                        message: failure_message(kind).to_string(),
                    };
                }
            }
            slot.settled.send_replace(generation);
        });

        self.in_flight().insert(kind, handle.abort_handle());
        drop(board);
        settled
    }

    pub async fn load_all(&self) -> Vec<(SectionKind, Settled)> {
        let mut handles = Vec::with_capacity(SectionKind::ALL.len());
        for kind in SectionKind::ALL {
            handles.push((kind, self.load(kind).await));
        }
        handles
    }

    /// Re-fetch a single section, aborting its in-flight fetch; other
    /// sections are untouched.
    pub async fn retry(&self, kind: SectionKind) -> Settled {
        tracing::info!(section = %kind.id(), "retrying section");
        self.start(kind, true).await
    }

    pub async fn status(&self, kind: SectionKind) -> SectionStatus {
        let state = self.state.lock().await;
        state
            .slots
            .get(&kind)
            .map(|slot| slot.status.clone())
            .unwrap_or(SectionStatus::Loading)
    }

    /// Drawings for the section's charts, re-rendered only when a spec changed.
    pub async fn drawings(&self, kind: SectionKind) -> Vec<Drawing> {
        let mut state = self.state.lock().await;
        let Some(Slot { status, charts, .. }) = state.slots.get_mut(&kind) else {
            return Vec::new();
        };
        let SectionStatus::Ready(content) = status else {
            return Vec::new();
        };
        let specs = content.charts();
        charts.resize_with(specs.len(), ChartCache::default);
        specs
            .into_iter()
            .zip(charts.iter_mut())
            .map(|(spec, cache)| cache.render(spec).clone())
            .collect()
    }

    /// Switches the traffic timeframe, rebuilding from the last payload
    /// without another fetch.
    pub async fn set_timeframe(&self, timeframe: Timeframe) {
        let mut state = self.state.lock().await;
        state.timeframe = timeframe;
        if let Some(slot) = state.slots.get_mut(&SectionKind::Line) {
            if matches!(slot.status, SectionStatus::Ready(_)) {
                slot.status =
                    SectionStatus::Ready(build_content(SectionKind::Line, &slot.payloads, timeframe));
            }
        }
    }
}

impl Drop for SectionBoard {
    fn drop(&mut self) {
        let in_flight = self.in_flight.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in in_flight.drain() {
            handle.abort();
        }
    }
}
