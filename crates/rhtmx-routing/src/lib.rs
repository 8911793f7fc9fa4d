//! # RHTMX Routing
//!
//! Named routes and URL generation for RHTMX applications:
//! - Route patterns with placeholders (`/users/:id`, `/posts/:page?`, `/docs/*slug`)
//! - Query strings in bracket notation (`filters[status]=draft`)
//! - Absolute paths or absolute URLs through the [`UrlGenerator`] trait
//!
//! ## Example
//!
//! ```
//! use rhtmx_routing::{RequestBase, Route, RouteTable, UrlGenerator, UrlReference, Value};
//! use std::collections::BTreeMap;
//!
//! let table = RouteTable::new(RequestBase::new("https", "example.com"))
//!     .with_route(Route::new("user", "/users/:id"));
//!
//! let mut params = BTreeMap::new();
//! params.insert("id".to_string(), Value::from(7));
//! params.insert("tab".to_string(), Value::from("posts"));
//!
//! let url = table.generate("user", &params, UrlReference::AbsoluteUrl).unwrap();
//! assert_eq!(url, "https://example.com/users/7?tab=posts");
//! ```

pub mod error;
pub mod generator;
pub mod path;
pub mod query;
pub mod route;
pub mod value;

pub use error::RoutingError;
pub use generator::{RequestBase, RouteTable, UrlGenerator, UrlReference};
pub use path::{is_valid_path, normalize_path};
pub use query::{build_query, parse_query};
pub use route::{Route, Segment};
pub use value::Value;
