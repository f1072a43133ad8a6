//! Dual-venue trade trigger.
//!
//! # Data Flow
//! ```text
//! [[venues]] config
//!     → trigger.rs (one TaskGroup unit per venue)
//!     → venue.rs (connect → key → transactor → gas price → stub tx hash)
//!     → logs only; the caller joins on completion
//! ```

pub mod trigger;
pub mod venue;

pub use trigger::run_all;
pub use venue::{simulate_trade, StubTrade, TradeError};
