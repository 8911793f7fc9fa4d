// File: src/error.rs
// Purpose: Errors raised while generating URLs

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("Route \"{0}\" does not exist")]
    RouteNotFound(String),

    #[error("Some mandatory parameters are missing ({}) to generate a URL for route \"{route}\"", .params.join(", "))]
    MissingParameters { route: String, params: Vec<String> },

    #[error("Parameter \"{param}\" for route \"{route}\" must be a single value, not a list or map")]
    InvalidParameter { route: String, param: String },
}
