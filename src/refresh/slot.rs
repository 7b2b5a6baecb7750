use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

const IDLE: i64 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Fetching { since: DateTime<Utc> },
}

/// Single-slot supervisor: start if idle, ignore if busy, back to idle when
/// the holder's guard drops. Triggers are never queued.
#[derive(Debug, Default)]
pub struct RefreshSlot {
    // Start time in epoch millis while busy, IDLE otherwise.
    started_ms: AtomicI64,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SlotGuard<'_>> {
        let now = Utc::now().timestamp_millis().max(IDLE + 1);
        self.started_ms
            .compare_exchange(IDLE, now, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotGuard { slot: self })
    }

    pub fn state(&self) -> RefreshState {
        match self.started_ms.load(Ordering::Acquire) {
            IDLE => RefreshState::Idle,
            ms => RefreshState::Fetching {
                since: DateTime::from_timestamp_millis(ms).unwrap_or_default(),
            },
        }
    }
}

/// Proof of holding the slot. Dropping it, on any path, releases the slot.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    slot: &'a RefreshSlot,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.started_ms.store(IDLE, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let slot = RefreshSlot::new();
        let guard = slot.try_acquire();
        assert!(guard.is_some());
        assert!(slot.try_acquire().is_none());
        assert!(matches!(slot.state(), RefreshState::Fetching { .. }));
    }

    #[test]
    fn test_drop_releases() {
        let slot = RefreshSlot::new();
        {
            let _guard = slot.try_acquire().unwrap();
            assert!(matches!(slot.state(), RefreshState::Fetching { .. }));
        }
        assert_eq!(slot.state(), RefreshState::Idle);
        assert!(slot.try_acquire().is_some());
    }

    #[test]
    fn test_fetching_reports_start_time() {
        let slot = RefreshSlot::new();
        let before = Utc::now().timestamp_millis();
        let _guard = slot.try_acquire().unwrap();
        match slot.state() {
            RefreshState::Fetching { since } => assert!(since.timestamp_millis() >= before),
            RefreshState::Idle => panic!("slot should be busy"),
        }
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_value(RefreshState::Idle).unwrap(),
            serde_json::json!({ "state": "idle" })
        );
    }
}
