//! Marker reconciliation and the flight list view.

mod board;
mod list;
mod markers;

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

pub use board::{BoardMarker, BoardState, MapView, MarkerBoard};
pub use list::{build_list, ListEntry, ListOptions, ListQuery, ListStatus, ListView};
pub use markers::{MarkerLayer, MarkerSpec, Popup};

use crate::flights::FlightRecord;
use crate::refresh::FlightSnapshot;

/// The marker board plus the layer that owns its markers.
pub struct Presenter {
    layer: MarkerLayer<u64>,
    board: MarkerBoard,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            layer: MarkerLayer::new(),
            board: MarkerBoard::new(),
        }
    }

    pub fn apply(&mut self, flights: &[FlightRecord]) -> usize {
        self.layer.sync(&mut self.board, flights)
    }

    pub fn focus(&mut self, code: &str) -> Option<MapView> {
        self.layer
            .focus(&mut self.board, code)
            .map(|_| self.board.view())
    }

    pub fn board(&self) -> &MarkerBoard {
        &self.board
    }
}

/// Apply every published snapshot to the board until the sender goes away.
pub async fn run_presenter(
    presenter: Arc<Mutex<Presenter>>,
    mut updates: watch::Receiver<Option<Arc<FlightSnapshot>>>,
) {
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if let Some(snapshot) = snapshot {
            let placed = presenter.lock().await.apply(&snapshot.flights);
            log::debug!("Placed {} markers ({})", placed, snapshot.source);
        }
    }
}
