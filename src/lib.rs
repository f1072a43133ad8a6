//! Block-driven transfer watcher and dual-venue trade trigger.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod trading;
pub mod watcher;

pub use config::AppConfig;
pub use lifecycle::Shutdown;
