// File: src/admin_url.rs
// Purpose: Builder that turns admin route parameters into dashboard URLs

use crate::context::{AdminContext, AdminContextProvider};
use crate::error::{AdminUrlError, Result};
use crate::option::{action, Family, Param, ROUTE_RESET_SURVIVORS};
use crate::param::to_param_value;
use crate::registry::{CrudRegistry, DashboardRegistry};
use rhtmx_routing::{build_query, UrlGenerator, UrlReference, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Services shared by every [`AdminUrlGenerator`]
///
/// Cheap to clone; build one at startup and hand out builders per request.
#[derive(Clone)]
pub struct AdminUrls {
    generator: Arc<dyn UrlGenerator>,
    dashboards: Arc<dyn DashboardRegistry>,
    cruds: Arc<dyn CrudRegistry>,
}

impl AdminUrls {
    pub fn new(
        generator: Arc<dyn UrlGenerator>,
        dashboards: Arc<dyn DashboardRegistry>,
        cruds: Arc<dyn CrudRegistry>,
    ) -> Self {
        Self {
            generator,
            dashboards,
            cruds,
        }
    }

    /// Start a URL from the given request context, or from scratch when there is none
    pub fn builder(&self, context: Option<&AdminContext>) -> AdminUrlGenerator {
        AdminUrlGenerator::new(self.clone(), context)
    }

    pub fn builder_from(&self, provider: &impl AdminContextProvider) -> AdminUrlGenerator {
        self.builder(provider.context().as_ref())
    }

    pub fn dashboards(&self) -> &dyn DashboardRegistry {
        self.dashboards.as_ref()
    }

    pub fn cruds(&self) -> &dyn CrudRegistry {
        self.cruds.as_ref()
    }
}

impl fmt::Debug for AdminUrls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUrls")
            .field("dashboards", &self.dashboards.count())
            .field("cruds", &self.cruds.len())
            .finish()
    }
}

/// What the generated URL points at
///
/// Two families of target parameters exist: the CRUD controller/id/action
/// triple and a raw route with its parameters. `set_controller`,
/// `set_action` and `set_route` leave exactly one family in place. A request
/// can still carry both (and `set_crud_id` does not reset the raw route), so
/// `Mixed` holds both until one of those transitions settles it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Target {
    #[default]
    Unset,
    Crud(CrudTarget),
    Route(RawRoute),
    Mixed(CrudTarget, RawRoute),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrudTarget {
    pub controller_fqcn: Option<Value>,
    pub crud_id: Option<Value>,
    pub action: Option<Value>,
}

impl CrudTarget {
    pub fn is_empty(&self) -> bool {
        self.controller_fqcn.is_none() && self.crud_id.is_none() && self.action.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRoute {
    pub name: Option<Value>,
    pub params: Option<Value>,
}

impl RawRoute {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.params.is_none()
    }
}

impl Target {
    fn from_parts(crud: CrudTarget, route: RawRoute) -> Self {
        match (crud.is_empty(), route.is_empty()) {
            (true, true) => Target::Unset,
            (false, true) => Target::Crud(crud),
            (true, false) => Target::Route(route),
            (false, false) => Target::Mixed(crud, route),
        }
    }

    fn into_parts(self) -> (CrudTarget, RawRoute) {
        match self {
            Target::Unset => Default::default(),
            Target::Crud(crud) => (crud, RawRoute::default()),
            Target::Route(route) => (CrudTarget::default(), route),
            Target::Mixed(crud, route) => (crud, route),
        }
    }

    fn parts(&self) -> (Option<&CrudTarget>, Option<&RawRoute>) {
        match self {
            Target::Unset => (None, None),
            Target::Crud(crud) => (Some(crud), None),
            Target::Route(route) => (None, Some(route)),
            Target::Mixed(crud, route) => (Some(crud), Some(route)),
        }
    }

    /// The single family targeted; `None` when unset or mixed
    pub fn family(&self) -> Option<Family> {
        match self {
            Target::Crud(_) => Some(Family::Crud),
            Target::Route(_) => Some(Family::Route),
            Target::Unset | Target::Mixed(..) => None,
        }
    }

    /// Store or clear one target parameter, keeping the other family as it is
    fn assign(&mut self, param: Param, value: Option<Value>) {
        let (mut crud, mut route) = std::mem::take(self).into_parts();
        match param {
            Param::CrudControllerFqcn => crud.controller_fqcn = value,
            Param::CrudId => crud.crud_id = value,
            Param::CrudAction => crud.action = value,
            Param::RouteName => route.name = value,
            Param::RouteParams => route.params = value,
            _ => {}
        }
        *self = Target::from_parts(crud, route);
    }

    /// Switch to the CRUD family, dropping any raw route
    fn enter_crud(&mut self) {
        let (crud, route) = std::mem::take(self).into_parts();
        if !route.is_empty() {
            tracing::debug!("URL target switched to a CRUD controller; raw route parameters dropped");
        }
        *self = Target::from_parts(crud, RawRoute::default());
    }

    fn slot(&self, param: Param) -> Option<&Value> {
        let (crud, route) = self.parts();
        match param {
            Param::CrudControllerFqcn => crud?.controller_fqcn.as_ref(),
            Param::CrudId => crud?.crud_id.as_ref(),
            Param::CrudAction => crud?.action.as_ref(),
            Param::RouteName => route?.name.as_ref(),
            Param::RouteParams => route?.params.as_ref(),
            _ => None,
        }
    }

    fn entries(&self) -> Vec<(Param, &Value)> {
        [
            Param::CrudControllerFqcn,
            Param::CrudId,
            Param::CrudAction,
            Param::RouteName,
            Param::RouteParams,
        ]
        .into_iter()
        .filter_map(|param| self.slot(param).map(|value| (param, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Target::Unset)
    }
}

/// Whether the generated URL carries a link back to the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferrerPolicy {
    /// Leave the referrer inherited from the current request as it is
    #[default]
    Keep,
    Include,
    Remove,
}

/// Fluent builder for admin URLs
///
/// Seeded with the query parameters of the current admin request, mutated in
/// any order, then resolved by [`generate_url`](Self::generate_url).
///
/// # Examples
///
/// ```
/// use rhtmx_admin::{AdminUrls, MemoryCrudRegistry, MemoryDashboardRegistry};
/// use rhtmx_routing::{RequestBase, Route, RouteTable};
/// use std::sync::Arc;
///
/// let urls = AdminUrls::new(
///     Arc::new(RouteTable::new(RequestBase::new("https", "example.com"))
///         .with_route(Route::new("admin", "/admin"))),
///     Arc::new(MemoryDashboardRegistry::new().with_dashboard("App\\DashboardController", "admin")),
///     Arc::new(MemoryCrudRegistry::new().with_controller("App\\BlogCrudController", "blog")),
/// );
///
/// let url = urls
///     .builder(None)
///     .set_controller("App\\BlogCrudController")
///     .set_action("new")
///     .generate_url()
///     .unwrap();
///
/// assert_eq!(url, "https://example.com/admin?crudAction=new&crudId=blog");
/// ```
#[derive(Clone)]
pub struct AdminUrlGenerator {
    services: AdminUrls,
    dashboard_route: Option<String>,
    target: Target,
    params: BTreeMap<String, Value>,
    referrer: ReferrerPolicy,
    current_page_referrer: Option<String>,
}

impl AdminUrlGenerator {
    pub fn new(services: AdminUrls, context: Option<&AdminContext>) -> Self {
        let dashboard_route = context
            .map(|ctx| ctx.dashboard_route().to_string())
            .filter(|route| !route.is_empty());

        let current_page_referrer = context.map(|ctx| {
            let mut query = ctx.query().clone();
            query.remove(Param::Referrer.as_str());
            format!("{}?{}", ctx.path(), build_query(&query))
        });

        let mut generator = Self {
            services,
            dashboard_route,
            target: Target::Unset,
            params: BTreeMap::new(),
            referrer: ReferrerPolicy::Keep,
            current_page_referrer,
        };

        if let Some(ctx) = context {
            for (name, value) in ctx.query() {
                generator.put(name, value.clone());
            }
        }

        generator
    }

    /// Link to another dashboard, given its controller class
    pub fn set_dashboard(&mut self, dashboard_fqcn: impl Into<String>) -> &mut Self {
        self.put(Param::DashboardControllerFqcn.as_str(), Value::String(dashboard_fqcn.into()));
        self
    }

    pub fn set_crud_id(&mut self, crud_id: impl Into<String>) -> &mut Self {
        self.put(Param::CrudId.as_str(), Value::String(crud_id.into()));
        self
    }

    /// Target a CRUD controller by class; any raw route is dropped
    pub fn set_controller(&mut self, crud_fqcn: impl Into<String>) -> &mut Self {
        self.target.enter_crud();
        self.put(Param::CrudControllerFqcn.as_str(), Value::String(crud_fqcn.into()));
        self
    }

    /// Set the CRUD action; any raw route is dropped
    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.target.enter_crud();
        self.put(Param::CrudAction.as_str(), Value::String(action.into()));
        self
    }

    /// Target a raw route rendered inside the dashboard
    ///
    /// Every other parameter is removed except the menu markers listed in
    /// [`ROUTE_RESET_SURVIVORS`]. Pass `()` when the route takes no parameters.
    pub fn set_route<P: Serialize>(&mut self, route_name: impl Into<String>, route_params: P) -> Result<&mut Self> {
        let route_params = match to_param_value(Param::RouteParams.as_str(), &route_params)? {
            Value::Null => Value::Map(BTreeMap::new()),
            bag @ (Value::Map(_) | Value::List(_)) => bag,
            _ => {
                return Err(AdminUrlError::InvalidArgument(format!(
                    "The \"{}\" parameter must be a map of route parameters.",
                    Param::RouteParams
                )))
            }
        };

        self.unset_all_except(ROUTE_RESET_SURVIVORS);
        self.target = Target::Route(RawRoute {
            name: Some(Value::String(route_name.into())),
            params: Some(route_params),
        });
        Ok(self)
    }

    pub fn set_entity_id<V: Serialize>(&mut self, entity_id: V) -> Result<&mut Self> {
        self.set(Param::EntityId, entity_id)
    }

    pub fn set<V: Serialize>(&mut self, name: impl AsRef<str>, value: V) -> Result<&mut Self> {
        let name = name.as_ref();
        let value = to_param_value(name, &value)?;
        self.put(name, value);
        Ok(self)
    }

    /// Set several parameters; nothing is changed if any value is rejected
    pub fn set_all<I, K, V>(&mut self, params: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        let coerced = params
            .into_iter()
            .map(|(name, value)| {
                let name = name.as_ref().to_string();
                to_param_value(&name, &value).map(|value| (name, value))
            })
            .collect::<Result<Vec<_>>>()?;

        for (name, value) in coerced {
            self.put(&name, value);
        }
        Ok(self)
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&Value> {
        let name = name.as_ref();
        let value = match name.parse::<Param>() {
            Ok(param) if param.family() != Family::Other => self.target.slot(param),
            _ => self.params.get(name),
        };
        value.filter(|value| !value.is_null())
    }

    pub fn unset(&mut self, name: impl AsRef<str>) -> &mut Self {
        let name = name.as_ref();
        match name.parse::<Param>() {
            Ok(param) if param.family() != Family::Other => self.target.assign(param, None),
            _ => {
                self.params.remove(name);
            }
        }
        self
    }

    pub fn unset_all(&mut self) -> &mut Self {
        self.target = Target::Unset;
        self.params.clear();
        self
    }

    pub fn unset_all_except<I, S>(&mut self, names_to_keep: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep: Vec<String> = names_to_keep
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let is_kept = |name: &str| keep.iter().any(|kept| kept == name);

        let dropped: Vec<Param> = self
            .target
            .entries()
            .into_iter()
            .map(|(param, _)| param)
            .filter(|param| !is_kept(param.as_str()))
            .collect();
        for param in dropped {
            self.target.assign(param, None);
        }

        self.params.retain(|name, _| is_kept(name.as_str()));
        self
    }

    pub fn include_referrer(&mut self) -> &mut Self {
        self.referrer = ReferrerPolicy::Include;
        self
    }

    pub fn remove_referrer(&mut self) -> &mut Self {
        self.referrer = ReferrerPolicy::Remove;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn referrer_policy(&self) -> ReferrerPolicy {
        self.referrer
    }

    /// `<path>?<query>` of the page this builder was created on, without its own referrer
    pub fn current_page_referrer(&self) -> Option<&str> {
        self.current_page_referrer.as_deref()
    }

    /// All parameters as currently set, including `Null` values
    pub fn parameters(&self) -> BTreeMap<String, Value> {
        let mut merged = self.params.clone();
        for (param, value) in self.target.entries() {
            merged.insert(param.as_str().to_string(), value.clone());
        }
        merged
    }

    /// Resolve controller and dashboard references and generate the absolute URL
    ///
    /// This is the fallible entry point; formatting the builder with `Display`
    /// runs the same steps but falls back to an empty string.
    pub fn generate_url(&mut self) -> Result<String> {
        match self.referrer {
            ReferrerPolicy::Include => {
                let referrer = Value::from(self.current_page_referrer.clone());
                self.put(Param::Referrer.as_str(), referrer);
            }
            ReferrerPolicy::Remove => {
                self.unset(Param::Referrer);
            }
            ReferrerPolicy::Keep => {}
        }

        if let Some(crud_fqcn) = self.get(Param::CrudControllerFqcn).cloned() {
            let crud_fqcn = reference_name(Param::CrudControllerFqcn, &crud_fqcn)?;
            let crud_id = self
                .services
                .cruds
                .find_crud_id_by_fqcn(&crud_fqcn)
                .ok_or_else(|| {
                    AdminUrlError::InvalidArgument(format!(
                        "The given \"{}\" class is not a valid CRUD controller. Make sure it implements the CRUD controller contract and is registered in the CRUD controller registry.",
                        crud_fqcn
                    ))
                })?;

            tracing::debug!("CRUD controller {} resolved to id \"{}\"", crud_fqcn, crud_id);
            self.put(Param::CrudId.as_str(), Value::String(crud_id));
            self.unset(Param::CrudControllerFqcn);
        }

        if self.get(Param::CrudId).is_some() && self.get(Param::CrudAction).is_none() {
            self.put(Param::CrudAction.as_str(), Value::from(action::INDEX));
        }

        if let Some(dashboard_fqcn) = self.get(Param::DashboardControllerFqcn).cloned() {
            let dashboard_fqcn = reference_name(Param::DashboardControllerFqcn, &dashboard_fqcn)?;
            let route = self
                .services
                .dashboards
                .route_by_fqcn(&dashboard_fqcn)
                .ok_or_else(|| {
                    AdminUrlError::InvalidArgument(format!(
                        "The given \"{}\" class is not a valid Dashboard controller. Make sure it implements the dashboard controller contract and is registered in the dashboard registry.",
                        dashboard_fqcn
                    ))
                })?;

            tracing::debug!("Dashboard {} resolved to route \"{}\"", dashboard_fqcn, route);
            self.dashboard_route = Some(route);
            self.unset(Param::DashboardControllerFqcn);
        }

        let dashboard_route = match self.dashboard_route.take() {
            Some(route) => route,
            None => self.default_dashboard_route()?,
        };

        // i18n dashboard routes are named "route_name.locale"
        let dashboard_route = dashboard_route
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        self.dashboard_route = Some(dashboard_route.clone());

        let params: BTreeMap<String, Value> = self
            .parameters()
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();

        let url = self
            .services
            .generator
            .generate(&dashboard_route, &params, UrlReference::AbsoluteUrl)?;
        Ok(url)
    }

    fn default_dashboard_route(&self) -> Result<String> {
        let dashboards = &self.services.dashboards;
        if dashboards.count() > 1 {
            return Err(AdminUrlError::Runtime(
                "When generating admin URLs outside of an admin request, if your application has more than one dashboard, you must associate the URL to a specific dashboard using \"set_dashboard()\".".to_string(),
            ));
        }

        dashboards.first_route().ok_or_else(|| {
            AdminUrlError::Runtime(
                "Cannot generate an admin URL because no dashboard is registered.".to_string(),
            )
        })
    }

    fn put(&mut self, name: &str, value: Value) {
        match name.parse::<Param>() {
            Ok(param) if param.family() != Family::Other => self.target.assign(param, Some(value)),
            _ => {
                self.params.insert(name.to_string(), value);
            }
        }
    }
}

/// Controller references are class names; anything else cannot be resolved
fn reference_name(param: Param, value: &Value) -> Result<String> {
    value.to_query_string().ok_or_else(|| {
        AdminUrlError::InvalidArgument(format!(
            "The \"{}\" parameter must be a controller class name.",
            param
        ))
    })
}

/// Renders the generated URL, or an empty string when generation fails
///
/// Failures are logged, not returned; use
/// [`generate_url`](AdminUrlGenerator::generate_url) to handle them.
impl fmt::Display for AdminUrlGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clone().generate_url() {
            Ok(url) => f.write_str(&url),
            Err(err) => {
                tracing::error!("Failed to generate admin URL: {}", err);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for AdminUrlGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUrlGenerator")
            .field("dashboard_route", &self.dashboard_route)
            .field("target", &self.target)
            .field("params", &self.params)
            .field("referrer", &self.referrer)
            .finish()
    }
}
