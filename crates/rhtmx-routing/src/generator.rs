// File: src/generator.rs
// Purpose: URL generation from named routes

use crate::error::RoutingError;
use crate::path::join_paths;
use crate::query::build_query;
use crate::route::Route;
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Kind of reference produced by a [`UrlGenerator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlReference {
    /// `https://example.com/admin?crudAction=index`
    AbsoluteUrl,
    /// `/admin?crudAction=index`
    #[default]
    AbsolutePath,
}

/// Generates URLs for named routes
pub trait UrlGenerator: Send + Sync {
    /// Generate a URL for `route`, consuming placeholders from `params` and
    /// appending the rest as the query string
    fn generate(
        &self,
        route: &str,
        params: &BTreeMap<String, Value>,
        reference: UrlReference,
    ) -> Result<String, RoutingError>;
}

/// Scheme, host and base path used for absolute URLs
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBase {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub base_path: Option<String>,
}

impl RequestBase {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port: None,
            base_path: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// `scheme://host[:port]`, leaving out the scheme's default port
    pub fn origin(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };

        match self.port {
            Some(port) if Some(port) != default_port => {
                format!("{}://{}:{}", self.scheme, self.host, port)
            }
            _ => format!("{}://{}", self.scheme, self.host),
        }
    }
}

impl Default for RequestBase {
    fn default() -> Self {
        Self::new("http", "localhost")
    }
}

/// Named route table that generates URLs
///
/// # Examples
///
/// ```
/// use rhtmx_routing::{RequestBase, Route, RouteTable, UrlGenerator, UrlReference, Value};
/// use std::collections::BTreeMap;
///
/// let table = RouteTable::new(RequestBase::new("https", "example.com"))
///     .with_route(Route::new("admin", "/admin"));
///
/// let mut params = BTreeMap::new();
/// params.insert("crudAction".to_string(), Value::from("index"));
///
/// let url = table.generate("admin", &params, UrlReference::AbsoluteUrl).unwrap();
/// assert_eq!(url, "https://example.com/admin?crudAction=index");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    base: RequestBase,
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new(base: RequestBase) -> Self {
        Self {
            base,
            routes: HashMap::new(),
        }
    }

    /// Adds a route (functional builder)
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// Adds a route, replacing any route with the same name
    pub fn add_route(&mut self, route: Route) {
        if let Some(previous) = self.routes.insert(route.name.clone(), route) {
            tracing::warn!(
                "Route \"{}\" ({}) was replaced",
                previous.name,
                previous.pattern
            );
        }
    }

    pub fn get_route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn base(&self) -> &RequestBase {
        &self.base
    }
}

impl UrlGenerator for RouteTable {
    fn generate(
        &self,
        route: &str,
        params: &BTreeMap<String, Value>,
        reference: UrlReference,
    ) -> Result<String, RoutingError> {
        let named = self
            .routes
            .get(route)
            .ok_or_else(|| RoutingError::RouteNotFound(route.to_string()))?;

        let path = join_paths(self.base.base_path.as_deref(), &named.expand(params)?);

        let placeholders = named.placeholders();
        let extra: BTreeMap<String, Value> = params
            .iter()
            .filter(|(name, value)| !value.is_null() && !placeholders.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let query = build_query(&extra);
        let mut url = match reference {
            UrlReference::AbsoluteUrl => format!("{}{}", self.base.origin(), path),
            UrlReference::AbsolutePath => path,
        };
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        tracing::debug!("Generated URL for route \"{}\": {}", route, url);
        Ok(url)
    }
}
