//! Capacity scenario calculator for virtualized application platforms
//!
//! This crate provides the core functionality for:
//! - Building an infrastructure state snapshot from operator input
//! - What-if scenario calculation (current vs proposed cell geometry)
//! - Bottleneck classification and reserve-constraint analysis
//! - Warning generation with fix suggestions
//!
//! The library is pure: every operation is a function from
//! (state, input) to a result, with no I/O and no retained state.

pub mod error;
pub mod models;
pub mod scenario;
pub mod state;

pub use error::ScenarioError;
pub use models::*;
pub use scenario::ScenarioCalculator;
