// Chart panel - Holds the current selection and its loaded chart
use crate::application::chart_service::ChartService;
use crate::application::error::ApiError;
use crate::domain::reading::Metric;
use crate::domain::telemetry::{Canvas, SensorChart};
use crate::domain::time_window::TimeWindow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub device_id: i64,
    pub metric: Metric,
    pub window: TimeWindow,
    pub canvas: Canvas,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading(Selection),
    Ready(Selection, Arc<SensorChart>),
    Failed(Selection, String),
    /// Upstream wants a login before it serves readings.
    NeedsLogin(Selection),
}

/// Loads charts for whichever selection was made last.
///
/// Every `select` starts a new fetch and supersedes earlier ones: a response
/// is only committed if no newer selection started in the meantime.
pub struct ChartPanel {
    service: ChartService,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<PanelState>>,
}

impl ChartPanel {
    pub fn new(service: ChartService) -> Self {
        let (state, _) = watch::channel(PanelState::Idle);
        Self {
            service,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    pub fn select(&self, selection: Selection) -> JoinHandle<()> {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = PanelState::Loading(selection);
        });

        let service = self.service.clone();
        let current = self.generation.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            let result = service
                .build_chart(
                    selection.device_id,
                    selection.metric,
                    selection.window,
                    selection.canvas,
                )
                .await;

            let next = match result {
                Ok(chart) => PanelState::Ready(selection, Arc::new(chart)),
                Err(ApiError::NotAuthenticated) => PanelState::NeedsLogin(selection),
                Err(err) => {
                    tracing::warn!("Failed to load chart for device {}: {}", selection.device_id, err);
                    PanelState::Failed(selection, err.user_message())
                }
            };

            let committed = state.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *state = next;
                true
            });
            if !committed {
                tracing::debug!("Discarded stale chart for device {}", selection.device_id);
            }
        })
    }

    /// Drop the selection; any in-flight fetch is discarded on arrival.
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = PanelState::Idle;
        });
    }
}
