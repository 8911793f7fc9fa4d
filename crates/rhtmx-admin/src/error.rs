// File: src/error.rs
// Purpose: Errors raised while building admin URLs

use rhtmx_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdminUrlError {
    /// Unsupported parameter value or unknown controller class
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target dashboard cannot be determined
    #[error("{0}")]
    Runtime(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

pub type Result<T, E = AdminUrlError> = std::result::Result<T, E>;
