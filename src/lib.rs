//! Monte-Carlo DCF Valuation Console
//!
//! Client side of a probabilistic discounted-cash-flow service:
//! - Distribution-typed parameter catalogue with copy-on-write edits
//! - Deterministic request payload builder
//! - Single-request lifecycle with cooperative cancellation
//! - Self-expiring status banners and a result presenter
//! - Terminal front end

pub mod config;
pub mod console;
pub mod event;
pub mod lifecycle;
pub mod notify;
pub mod params;
pub mod report;
pub mod request;
pub mod utils;
pub mod workspace;

// Re-exports for convenience
pub use config::{AppConfig, ConfigLoader};
pub use lifecycle::{RequestController, RequestState};
pub use request::{HttpTransport, ValuationTransport};
pub use workspace::Workspace;
