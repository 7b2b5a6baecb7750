mod mock;
mod normalize;
mod types;

pub use mock::MockGenerator;
pub use normalize::Normalizer;
pub use types::{AltitudeBand, FlightRecord, Provenance};
