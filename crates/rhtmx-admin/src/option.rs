// File: src/option.rs
// Purpose: Admin query parameter vocabulary and built-in action names

use std::fmt;
use std::str::FromStr;

/// Query parameters understood by the admin panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    CrudAction,
    CrudControllerFqcn,
    CrudId,
    DashboardControllerFqcn,
    EntityFqcn,
    EntityId,
    Filters,
    MenuIndex,
    Query,
    Referrer,
    RouteName,
    RouteParams,
    Sort,
    SubmenuIndex,
}

/// Which part of the URL target a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Controller class, controller id and action
    Crud,
    /// Raw route name and its parameter bag
    Route,
    /// Everything else (entity id, sort, filters, menu markers, ...)
    Other,
}

/// Parameters kept by [`crate::AdminUrlGenerator::set_route`]
///
/// Menu highlighting must survive leaving CRUD pages for a custom route.
pub const ROUTE_RESET_SURVIVORS: [Param; 2] = [Param::MenuIndex, Param::SubmenuIndex];

impl Param {
    pub const ALL: [Param; 14] = [
        Param::CrudAction,
        Param::CrudControllerFqcn,
        Param::CrudId,
        Param::DashboardControllerFqcn,
        Param::EntityFqcn,
        Param::EntityId,
        Param::Filters,
        Param::MenuIndex,
        Param::Query,
        Param::Referrer,
        Param::RouteName,
        Param::RouteParams,
        Param::Sort,
        Param::SubmenuIndex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Param::CrudAction => "crudAction",
            Param::CrudControllerFqcn => "crudControllerFqcn",
            Param::CrudId => "crudId",
            Param::DashboardControllerFqcn => "dashboardControllerFqcn",
            Param::EntityFqcn => "entityFqcn",
            Param::EntityId => "entityId",
            Param::Filters => "filters",
            Param::MenuIndex => "menuIndex",
            Param::Query => "query",
            Param::Referrer => "referrer",
            Param::RouteName => "routeName",
            Param::RouteParams => "routeParams",
            Param::Sort => "sort",
            Param::SubmenuIndex => "submenuIndex",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Param::CrudAction | Param::CrudControllerFqcn | Param::CrudId => Family::Crud,
            Param::RouteName | Param::RouteParams => Family::Route,
            _ => Family::Other,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Param {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Param {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .iter()
            .copied()
            .find(|param| param.as_str() == s)
            .ok_or_else(|| UnknownParam(s.to_string()))
    }
}

/// Returned when parsing a name outside the admin vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not an admin query parameter")]
pub struct UnknownParam(pub String);

/// Built-in CRUD action names
pub mod action {
    pub const BATCH_DELETE: &str = "batchDelete";
    pub const DELETE: &str = "delete";
    pub const DETAIL: &str = "detail";
    pub const EDIT: &str = "edit";
    pub const INDEX: &str = "index";
    pub const NEW: &str = "new";
}
