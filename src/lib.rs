//! RFID ROI Simulator
//!
//! A small web dashboard for comparing RFID tagging deployments:
//! - Scenario formulas (labor saving, tag cost, ROI, cash-flow projection)
//! - Append-only scenario ledger, one per browser session
//! - Table and chart views in cash-flow or ROI mode
//! - axum HTTP server with a JSON API

pub mod config;
pub mod error;
pub mod ledger;
pub mod page;
pub mod scenario;
pub mod server;
pub mod session;
pub mod view;

// Re-exports for convenience
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use ledger::{LedgerView, ScenarioLedger, SubmitOutcome};
pub use scenario::{MetricMode, Scenario, ScenarioInput};
pub use session::{SessionId, SessionStore};
