//! Fakes and helpers shared by unit tests, integration tests and the simulator.

mod spy;
pub mod test_helpers;

pub use spy::SpyConnector;
pub use test_helpers::{spin_until, text_row};
