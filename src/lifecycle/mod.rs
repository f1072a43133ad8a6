//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Initialize logging/metrics
//!
//! Cancellation (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → watch loop returns Cancelled
//!
//! Join (task_group.rs):
//!     spawn N independent units → wait for all to complete
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod task_group;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use task_group::TaskGroup;
