// RHTMX Admin - URL generation for admin dashboards
// Builds links to CRUD controllers and custom routes inside a dashboard

pub mod admin_url;
pub mod config;
pub mod context;
pub mod error;
pub mod option;
pub mod param;
pub mod registry;

// Re-export core types
pub use admin_url::{AdminUrlGenerator, AdminUrls, CrudTarget, RawRoute, ReferrerPolicy, Target};
pub use config::AdminConfig;
pub use context::{AdminContext, AdminContextProvider};
pub use error::AdminUrlError;
pub use option::{action, Family, Param, ROUTE_RESET_SURVIVORS};
pub use param::Stringify;
pub use registry::{CrudRegistry, DashboardRegistry, MemoryCrudRegistry, MemoryDashboardRegistry};

// Re-export routing types used in the public API
pub use rhtmx_routing::{RequestBase, Route, RouteTable, UrlGenerator, UrlReference, Value};
