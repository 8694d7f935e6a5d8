//! Error types for the dashboard

use thiserror::Error;

use crate::session::SessionId;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("invalid metric mode '{0}' (expected 'cashflow' or 'roi')")]
    InvalidMode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
