// File: src/route.rs
// Purpose: Named route patterns and placeholder expansion

use crate::error::RoutingError;
use crate::path::normalize_path;
use crate::value::Value;
use std::collections::BTreeMap;

/// A single segment of a route pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Static text: `admin`
    Static(String),
    /// Required placeholder: `:id`
    Required(String),
    /// Optional placeholder: `:id?`
    Optional(String),
    /// Catch-all placeholder: `*slug`
    CatchAll(String),
}

impl Segment {
    /// Classifies a pattern segment
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_routing::Segment;
    ///
    /// assert_eq!(Segment::classify("admin"), Segment::Static("admin".into()));
    /// assert_eq!(Segment::classify(":id"), Segment::Required("id".into()));
    /// assert_eq!(Segment::classify(":id?"), Segment::Optional("id".into()));
    /// assert_eq!(Segment::classify("*slug"), Segment::CatchAll("slug".into()));
    /// ```
    pub fn classify(segment: &str) -> Self {
        match segment.chars().next() {
            Some(':') => {
                let name = segment.trim_start_matches(':');
                match name.strip_suffix('?') {
                    Some(optional) => Segment::Optional(optional.to_string()),
                    None => Segment::Required(name.to_string()),
                }
            }
            Some('*') => Segment::CatchAll(segment[1..].to_string()),
            _ => Segment::Static(segment.to_string()),
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Required(name) | Segment::Optional(name) | Segment::CatchAll(name) => {
                Some(name)
            }
        }
    }
}

/// A named route with its path pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Route name used for URL generation (e.g. `admin`, `admin.en`)
    pub name: String,
    /// Normalized URL pattern like `/admin/:section?`
    pub pattern: String,
    segments: Vec<Segment>,
}

impl Route {
    /// Creates a route from a name and a path pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_routing::Route;
    ///
    /// let route = Route::new("admin", "admin/");
    /// assert_eq!(route.pattern, "/admin");
    /// assert!(route.placeholders().is_empty());
    /// ```
    pub fn new(name: impl Into<String>, pattern: &str) -> Self {
        let pattern = normalize_path(pattern).into_owned();
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::classify)
            .collect();

        Self {
            name: name.into(),
            pattern,
            segments,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of every placeholder in the pattern
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments.iter().filter_map(Segment::placeholder).collect()
    }

    /// Builds the path for this route, substituting placeholders
    ///
    /// Parameters not used by the pattern are ignored here; the route table
    /// appends them as the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_routing::{Route, Value};
    /// use std::collections::BTreeMap;
    ///
    /// let route = Route::new("admin_section", "/admin/:section");
    /// let mut params = BTreeMap::new();
    /// params.insert("section".to_string(), Value::from("blog posts"));
    ///
    /// assert_eq!(route.expand(&params).unwrap(), "/admin/blog%20posts");
    /// ```
    pub fn expand(&self, params: &BTreeMap<String, Value>) -> Result<String, RoutingError> {
        let mut missing = Vec::new();
        let mut parts = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => parts.push(text.clone()),
                Segment::Required(name) => match self.placeholder_value(name, params)? {
                    Some(value) => parts.push(urlencoding::encode(&value).into_owned()),
                    None => missing.push(name.clone()),
                },
                Segment::Optional(name) => {
                    if let Some(value) = self.placeholder_value(name, params)? {
                        parts.push(urlencoding::encode(&value).into_owned());
                    }
                }
                Segment::CatchAll(name) => match self.placeholder_value(name, params)? {
                    Some(value) => parts.push(
                        value
                            .split('/')
                            .filter(|s| !s.is_empty())
                            .map(|s| urlencoding::encode(s).into_owned())
                            .collect::<Vec<_>>()
                            .join("/"),
                    ),
                    None => missing.push(name.clone()),
                },
            }
        }

        if !missing.is_empty() {
            return Err(RoutingError::MissingParameters {
                route: self.name.clone(),
                params: missing,
            });
        }

        let filtered: Vec<String> = parts.into_iter().filter(|s| !s.is_empty()).collect();
        if filtered.is_empty() {
            Ok("/".to_string())
        } else {
            Ok(format!("/{}", filtered.join("/")))
        }
    }

    fn placeholder_value(
        &self,
        name: &str,
        params: &BTreeMap<String, Value>,
    ) -> Result<Option<String>, RoutingError> {
        match params.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.to_query_string().map(Some).ok_or_else(|| {
                RoutingError::InvalidParameter {
                    route: self.name.clone(),
                    param: name.to_string(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_static_route() {
        let route = Route::new("admin", "/admin");
        assert_eq!(route.expand(&BTreeMap::new()).unwrap(), "/admin");
    }

    #[test]
    fn test_root_route() {
        let route = Route::new("home", "/");
        assert_eq!(route.expand(&BTreeMap::new()).unwrap(), "/");
    }

    #[test]
    fn test_required_placeholder_missing() {
        let route = Route::new("user", "/users/:id");
        let err = route.expand(&BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            RoutingError::MissingParameters {
                route: "user".to_string(),
                params: vec!["id".to_string()],
            }
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let route = Route::new("user", "/users/:id");
        assert!(route.expand(&params(&[("id", Value::Null)])).is_err());
    }

    #[test]
    fn test_optional_placeholder() {
        let route = Route::new("posts", "/posts/:page?");
        assert_eq!(route.expand(&BTreeMap::new()).unwrap(), "/posts");
        assert_eq!(
            route.expand(&params(&[("page", Value::from(3))])).unwrap(),
            "/posts/3"
        );
    }

    #[test]
    fn test_catch_all_keeps_slashes() {
        let route = Route::new("docs", "/docs/*slug");
        let url = route
            .expand(&params(&[("slug", Value::from("guide/getting started"))]))
            .unwrap();
        assert_eq!(url, "/docs/guide/getting%20started");
    }

    #[test]
    fn test_placeholder_rejects_map() {
        let route = Route::new("user", "/users/:id");
        let err = route
            .expand(&params(&[("id", Value::Map(BTreeMap::new()))]))
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidParameter { .. }));
    }
}
