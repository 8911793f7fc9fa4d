// File: src/context.rs
// Purpose: Snapshot of the admin request a URL is generated from

use axum::http::Uri;
use rhtmx_routing::{parse_query, Value};
use std::collections::BTreeMap;

/// The parts of the current admin request needed to generate URLs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminContext {
    /// Route name of the dashboard serving the request (may carry a locale suffix)
    dashboard_route: String,

    /// Request path without the query string
    path: String,

    /// Decoded query parameters
    query: BTreeMap<String, Value>,
}

impl AdminContext {
    pub fn new(
        dashboard_route: impl Into<String>,
        path: impl Into<String>,
        query: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            dashboard_route: dashboard_route.into(),
            path: path.into(),
            query,
        }
    }

    /// Build the context from the request URI
    ///
    /// # Examples
    ///
    /// ```
    /// use axum::http::Uri;
    /// use rhtmx_admin::{AdminContext, Value};
    ///
    /// let uri: Uri = "/admin?crudAction=index&menuIndex=2".parse().unwrap();
    /// let context = AdminContext::from_uri("admin", &uri);
    ///
    /// assert_eq!(context.path(), "/admin");
    /// assert_eq!(context.query().get("menuIndex"), Some(&Value::from("2")));
    /// ```
    pub fn from_uri(dashboard_route: impl Into<String>, uri: &Uri) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self::new(dashboard_route, uri.path(), query)
    }

    pub fn dashboard_route(&self) -> &str {
        &self.dashboard_route
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, Value> {
        &self.query
    }
}

/// Source of the current admin context
///
/// `None` means the URL is generated outside of an admin request (a console
/// command, a public page, an email template).
pub trait AdminContextProvider {
    fn context(&self) -> Option<AdminContext>;
}

impl AdminContextProvider for AdminContext {
    fn context(&self) -> Option<AdminContext> {
        Some(self.clone())
    }
}

impl AdminContextProvider for Option<AdminContext> {
    fn context(&self) -> Option<AdminContext> {
        self.clone()
    }
}
