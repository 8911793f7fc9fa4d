// File: src/config.rs
// Purpose: Admin configuration parsing from admin.toml

use crate::admin_url::AdminUrls;
use crate::registry::{derive_crud_id, MemoryCrudRegistry, MemoryDashboardRegistry};
use anyhow::{bail, Context, Result};
use rhtmx_routing::{is_valid_path, RequestBase, Route, RouteTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub dashboards: Vec<DashboardConfig>,

    #[serde(default)]
    pub cruds: Vec<CrudConfig>,
}

/// Where absolute URLs point to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: Option<u16>,

    /// Base path for all routes (e.g., "/app")
    #[serde(default)]
    pub base_path: Option<String>,
}

/// A dashboard controller and the route serving it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub controller: String,

    pub route: String,

    #[serde(default = "default_dashboard_path")]
    pub path: String,
}

/// A CRUD controller; the id is derived from the class name when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrudConfig {
    pub controller: String,

    #[serde(default)]
    pub id: Option<String>,
}

// Default values
fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> Option<u16> {
    Some(3000)
}

fn default_dashboard_path() -> String {
    "/admin".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            base_path: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read admin config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse admin config file: {:?}", path))
    }

    /// Load configuration from default path (./admin.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("admin.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn request_base(&self) -> RequestBase {
        let mut base = RequestBase::new(&self.site.scheme, &self.site.host);
        if let Some(port) = self.site.port {
            base = base.with_port(port);
        }
        if let Some(base_path) = &self.site.base_path {
            base = base.with_base_path(base_path);
        }
        base
    }

    /// Build the registries and route table described by this configuration
    pub fn build_urls(&self) -> Result<AdminUrls> {
        let mut table = RouteTable::new(self.request_base());
        let mut dashboards = MemoryDashboardRegistry::new();

        for dashboard in &self.dashboards {
            if dashboard.route.is_empty() || dashboard.route.contains('.') {
                bail!(
                    "Dashboard {} has an invalid route name \"{}\" (must be non-empty and contain no '.')",
                    dashboard.controller,
                    dashboard.route
                );
            }
            if !is_valid_path(&dashboard.path) {
                bail!(
                    "Dashboard {} has an invalid path \"{}\" (must start with '/' and have no trailing '/')",
                    dashboard.controller,
                    dashboard.path
                );
            }
            table.add_route(Route::new(dashboard.route.clone(), &dashboard.path));
            dashboards.register(dashboard.controller.clone(), dashboard.route.clone());
        }

        let mut cruds = MemoryCrudRegistry::new();
        for crud in &self.cruds {
            let id = crud
                .id
                .clone()
                .unwrap_or_else(|| derive_crud_id(&crud.controller));
            if id.is_empty() {
                bail!("CRUD controller {} resolves to an empty id", crud.controller);
            }
            cruds.register(crud.controller.clone(), id);
        }

        tracing::debug!(
            "Admin URLs configured with {} dashboards and {} CRUD controllers",
            self.dashboards.len(),
            self.cruds.len()
        );

        Ok(AdminUrls::new(Arc::new(table), Arc::new(dashboards), Arc::new(cruds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CrudRegistry, DashboardRegistry};

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.site.scheme, "http");
        assert_eq!(config.site.host, "127.0.0.1");
        assert_eq!(config.site.port, Some(3000));
        assert!(config.dashboards.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = AdminConfig::from_toml_str("").unwrap();
        assert_eq!(config.site.host, "127.0.0.1");
        assert!(config.cruds.is_empty());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = AdminConfig::load("does/not/exist/admin.toml").unwrap();
        assert!(config.dashboards.is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [site]
            scheme = "https"
            host = "example.com"
            port = 443

            [[dashboards]]
            controller = "App\\Controller\\Admin\\DashboardController"
            route = "admin"

            [[cruds]]
            controller = "App\\Controller\\Admin\\BlogPostCrudController"

            [[cruds]]
            controller = "App\\Controller\\Admin\\UserCrudController"
            id = "members"
        "#;
        let config = AdminConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.dashboards[0].path, "/admin");

        let urls = config.build_urls().unwrap();
        assert_eq!(urls.dashboards().count(), 1);
        assert_eq!(
            urls.cruds().find_crud_id_by_fqcn("App\\Controller\\Admin\\BlogPostCrudController"),
            Some("blog_post".to_string())
        );
        assert_eq!(
            urls.cruds().find_crud_id_by_fqcn("App\\Controller\\Admin\\UserCrudController"),
            Some("members".to_string())
        );
    }

    #[test]
    fn test_dotted_dashboard_route_rejected() {
        let toml = r#"
            [[dashboards]]
            controller = "App\\DashboardController"
            route = "admin.en"
        "#;
        let config = AdminConfig::from_toml_str(toml).unwrap();
        assert!(config.build_urls().is_err());
    }

    #[test]
    fn test_invalid_dashboard_path_rejected() {
        let toml = r#"
            [[dashboards]]
            controller = "App\\DashboardController"
            route = "admin"
            path = "admin/"
        "#;
        let config = AdminConfig::from_toml_str(toml).unwrap();
        let err = config.build_urls().unwrap_err();
        assert!(err.to_string().contains("invalid path"));
    }
}
