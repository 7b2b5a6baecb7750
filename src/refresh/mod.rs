//! Fetch orchestration: one in-flight request at a time, live data when the
//! provider answers, synthetic traffic when it does not.

mod refresher;
mod slot;

pub use refresher::{
    Fallback, FlightSnapshot, RefreshCounters, RefreshOutcome, Refresher,
};
pub use slot::RefreshState;
