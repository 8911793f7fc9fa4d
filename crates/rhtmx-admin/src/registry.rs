// File: src/registry.rs
// Purpose: Lookup tables for CRUD and dashboard controllers

use std::collections::HashMap;

/// Maps CRUD controller classes to the short ids used in URLs
pub trait CrudRegistry: Send + Sync {
    fn find_crud_id_by_fqcn(&self, controller_fqcn: &str) -> Option<String>;

    fn find_fqcn_by_crud_id(&self, crud_id: &str) -> Option<String>;

    /// Number of registered CRUD controllers
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps dashboard controller classes to their route names
pub trait DashboardRegistry: Send + Sync {
    fn route_by_fqcn(&self, controller_fqcn: &str) -> Option<String>;

    /// Number of registered dashboards
    fn count(&self) -> usize;

    /// Route of the first registered dashboard
    fn first_route(&self) -> Option<String>;
}

/// In-memory CRUD controller registry
#[derive(Debug, Clone, Default)]
pub struct MemoryCrudRegistry {
    ids_by_fqcn: HashMap<String, String>,
    fqcns_by_id: HashMap<String, String>,
}

impl MemoryCrudRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller under an explicit id (functional builder)
    pub fn with_controller(mut self, controller_fqcn: impl Into<String>, crud_id: impl Into<String>) -> Self {
        self.register(controller_fqcn, crud_id);
        self
    }

    /// Registers a controller under the id derived from its class name
    pub fn with_derived(mut self, controller_fqcn: impl Into<String>) -> Self {
        let controller_fqcn = controller_fqcn.into();
        let crud_id = derive_crud_id(&controller_fqcn);
        self.register(controller_fqcn, crud_id);
        self
    }

    pub fn register(&mut self, controller_fqcn: impl Into<String>, crud_id: impl Into<String>) {
        let controller_fqcn = controller_fqcn.into();
        let crud_id = crud_id.into();

        if let Some(previous) = self.ids_by_fqcn.insert(controller_fqcn.clone(), crud_id.clone()) {
            tracing::warn!(
                "CRUD controller {} re-registered: id \"{}\" replaced by \"{}\"",
                controller_fqcn,
                previous,
                crud_id
            );
            self.fqcns_by_id.remove(&previous);
        }
        if let Some(previous) = self.fqcns_by_id.insert(crud_id.clone(), controller_fqcn.clone()) {
            if previous != controller_fqcn {
                tracing::warn!(
                    "CRUD id \"{}\" moved from {} to {}",
                    crud_id,
                    previous,
                    controller_fqcn
                );
                self.ids_by_fqcn.remove(&previous);
            }
        }
    }
}

impl CrudRegistry for MemoryCrudRegistry {
    fn find_crud_id_by_fqcn(&self, controller_fqcn: &str) -> Option<String> {
        self.ids_by_fqcn.get(controller_fqcn).cloned()
    }

    fn find_fqcn_by_crud_id(&self, crud_id: &str) -> Option<String> {
        self.fqcns_by_id.get(crud_id).cloned()
    }

    fn len(&self) -> usize {
        self.ids_by_fqcn.len()
    }
}

/// In-memory dashboard registry, ordered by registration
#[derive(Debug, Clone, Default)]
pub struct MemoryDashboardRegistry {
    dashboards: Vec<(String, String)>,
}

impl MemoryDashboardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dashboard (functional builder)
    pub fn with_dashboard(mut self, controller_fqcn: impl Into<String>, route: impl Into<String>) -> Self {
        self.register(controller_fqcn, route);
        self
    }

    /// Registers a dashboard, replacing the route of an already known controller
    pub fn register(&mut self, controller_fqcn: impl Into<String>, route: impl Into<String>) {
        let controller_fqcn = controller_fqcn.into();
        let route = route.into();

        match self.dashboards.iter_mut().find(|(fqcn, _)| *fqcn == controller_fqcn) {
            Some(entry) => {
                tracing::warn!(
                    "Dashboard {} re-registered: route \"{}\" replaced by \"{}\"",
                    controller_fqcn,
                    entry.1,
                    route
                );
                entry.1 = route;
            }
            None => self.dashboards.push((controller_fqcn, route)),
        }
    }
}

impl DashboardRegistry for MemoryDashboardRegistry {
    fn route_by_fqcn(&self, controller_fqcn: &str) -> Option<String> {
        self.dashboards
            .iter()
            .find(|(fqcn, _)| fqcn == controller_fqcn)
            .map(|(_, route)| route.clone())
    }

    fn count(&self) -> usize {
        self.dashboards.len()
    }

    fn first_route(&self) -> Option<String> {
        self.dashboards.first().map(|(_, route)| route.clone())
    }
}

/// Derives a CRUD id from a controller class name
///
/// The namespace is dropped, then the `CrudController`/`Controller` suffix,
/// and the rest is converted to snake_case.
///
/// # Examples
///
/// ```
/// use rhtmx_admin::registry::derive_crud_id;
///
/// assert_eq!(derive_crud_id("App\\Controller\\Admin\\BlogCrudController"), "blog");
/// assert_eq!(derive_crud_id("admin::BlogPostCrudController"), "blog_post");
/// assert_eq!(derive_crud_id("Invoices"), "invoices");
/// ```
pub fn derive_crud_id(controller_fqcn: &str) -> String {
    let class = controller_fqcn
        .rsplit(|c: char| c == '\\' || c == ':')
        .next()
        .unwrap_or(controller_fqcn);

    let stem = ["CrudController", "Controller"]
        .iter()
        .find_map(|suffix| class.strip_suffix(*suffix).filter(|s| !s.is_empty()))
        .unwrap_or(class);

    let mut id = String::with_capacity(stem.len() + 4);
    for (i, ch) in stem.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                id.push('_');
            }
            id.extend(ch.to_lowercase());
        } else {
            id.push(ch);
        }
    }
    id
}
