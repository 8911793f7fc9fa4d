//! Integration tests for the admin URL builder
//!
//! Collaborators are replaced by recording doubles so the tests can check
//! exactly what reaches the registries and the URL generator.

use pretty_assertions::assert_eq;
use rhtmx_admin::*;
use rhtmx_routing::{build_query, parse_query, RoutingError};
use rstest::rstest;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const BLOG_CRUD: &str = "BlogCrudController";
const MAIN_DASHBOARD: &str = "App\\Controller\\Admin\\DashboardController";
const SHOP_DASHBOARD: &str = "App\\Controller\\Admin\\ShopDashboardController";

type Call = (String, BTreeMap<String, Value>, UrlReference);

#[derive(Default)]
struct RecordingGenerator {
    calls: Mutex<Vec<Call>>,
}

impl RecordingGenerator {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl UrlGenerator for RecordingGenerator {
    fn generate(
        &self,
        route: &str,
        params: &BTreeMap<String, Value>,
        reference: UrlReference,
    ) -> Result<String, RoutingError> {
        self.calls
            .lock()
            .unwrap()
            .push((route.to_string(), params.clone(), reference));

        let query = build_query(params);
        if query.is_empty() {
            Ok(format!("https://admin.test/{}", route))
        } else {
            Ok(format!("https://admin.test/{}?{}", route, query))
        }
    }
}

struct CountingCruds {
    inner: MemoryCrudRegistry,
    lookups: AtomicUsize,
}

impl CrudRegistry for CountingCruds {
    fn find_crud_id_by_fqcn(&self, controller_fqcn: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_crud_id_by_fqcn(controller_fqcn)
    }

    fn find_fqcn_by_crud_id(&self, crud_id: &str) -> Option<String> {
        self.inner.find_fqcn_by_crud_id(crud_id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

struct CountingDashboards {
    inner: MemoryDashboardRegistry,
    lookups: AtomicUsize,
}

impl DashboardRegistry for CountingDashboards {
    fn route_by_fqcn(&self, controller_fqcn: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.route_by_fqcn(controller_fqcn)
    }

    fn count(&self) -> usize {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.count()
    }

    fn first_route(&self) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.first_route()
    }
}

struct Harness {
    urls: AdminUrls,
    generator: Arc<RecordingGenerator>,
    cruds: Arc<CountingCruds>,
    dashboards: Arc<CountingDashboards>,
}

impl Harness {
    fn with_dashboards(dashboards: MemoryDashboardRegistry) -> Self {
        init_tracing();

        let generator = Arc::new(RecordingGenerator::default());
        let cruds = Arc::new(CountingCruds {
            inner: MemoryCrudRegistry::new().with_controller(BLOG_CRUD, "blog"),
            lookups: AtomicUsize::new(0),
        });
        let dashboards = Arc::new(CountingDashboards {
            inner: dashboards,
            lookups: AtomicUsize::new(0),
        });

        let urls = AdminUrls::new(generator.clone(), dashboards.clone(), cruds.clone());
        Self {
            urls,
            generator,
            cruds,
            dashboards,
        }
    }

    fn single() -> Self {
        Self::with_dashboards(MemoryDashboardRegistry::new().with_dashboard(MAIN_DASHBOARD, "admin"))
    }

    fn double() -> Self {
        Self::with_dashboards(
            MemoryDashboardRegistry::new()
                .with_dashboard(MAIN_DASHBOARD, "admin")
                .with_dashboard(SHOP_DASHBOARD, "shop_admin"),
        )
    }

    fn last_params(&self) -> BTreeMap<String, Value> {
        self.generator.calls().last().map(|(_, params, _)| params.clone()).unwrap_or_default()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn context(path_and_query: &str) -> AdminContext {
    let uri = path_and_query.parse().unwrap();
    AdminContext::from_uri("admin", &uri)
}

fn query_of(url: &str) -> BTreeMap<String, Value> {
    url.split_once('?')
        .map(|(_, query)| parse_query(query))
        .unwrap_or_default()
}

fn params(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[rstest]
#[case("page")]
#[case("entityId")]
#[case("sort")]
#[case("menuIndex")]
#[case("referrer")]
#[case("routeName")]
fn test_unset_parameter_never_reaches_query(#[case] name: &str) {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=index&crudId=blog&menuIndex=1&referrer=/admin");

    let mut builder = harness.urls.builder(Some(&ctx));
    let url = builder.set(name, "value").unwrap().unset(name).generate_url().unwrap();

    assert!(!query_of(&url).contains_key(name), "{} found in {}", name, url);
}

#[test]
fn test_action_and_controller_order_independent() {
    let harness = Harness::single();

    let first = harness
        .urls
        .builder(None)
        .set_action("edit")
        .set_controller(BLOG_CRUD)
        .generate_url()
        .unwrap();
    let second = harness
        .urls
        .builder(None)
        .set_controller(BLOG_CRUD)
        .set_action("edit")
        .generate_url()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        harness.last_params(),
        params(&[("crudAction", Value::from("edit")), ("crudId", Value::from("blog"))])
    );
}

#[test]
fn test_set_route_keeps_only_menu_markers() {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=edit&crudId=blog&entityId=7&menuIndex=2&submenuIndex=1&sort%5Btitle%5D=ASC");

    let mut route_params = BTreeMap::new();
    route_params.insert("year", 2024);

    let mut builder = harness.urls.builder(Some(&ctx));
    builder.set_route("app_report", &route_params).unwrap();

    let mut expected_bag = BTreeMap::new();
    expected_bag.insert("year".to_string(), Value::Int(2024));
    assert_eq!(
        builder.parameters(),
        params(&[
            ("menuIndex", Value::from("2")),
            ("routeName", Value::from("app_report")),
            ("routeParams", Value::Map(expected_bag)),
            ("submenuIndex", Value::from("1")),
        ])
    );
    assert_eq!(builder.target().family(), Some(Family::Route));
}

#[test]
fn test_set_route_without_menu_markers() {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=index&crudId=blog&page=3");

    let mut builder = harness.urls.builder(Some(&ctx));
    builder.set_route("app_stats", ()).unwrap();

    assert_eq!(
        builder.parameters(),
        params(&[
            ("routeName", Value::from("app_stats")),
            ("routeParams", Value::Map(BTreeMap::new())),
        ])
    );
}

#[test]
fn test_referrer_left_untouched_by_default() {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=index&crudId=blog&referrer=%2Fadmin%3FcrudAction%3Ddetail");

    let url = harness.urls.builder(Some(&ctx)).set_action("edit").generate_url().unwrap();

    assert_eq!(
        query_of(&url).get("referrer"),
        Some(&Value::from("/admin?crudAction=detail"))
    );
}

#[test]
fn test_include_referrer_points_at_current_page() {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=index&crudId=blog&page=2&referrer=/elsewhere");

    let mut builder = harness.urls.builder(Some(&ctx));
    assert_eq!(
        builder.current_page_referrer(),
        Some("/admin?crudAction=index&crudId=blog&page=2")
    );

    builder.set_action("new").include_referrer().generate_url().unwrap();
    assert_eq!(
        harness.last_params().get("referrer"),
        Some(&Value::from("/admin?crudAction=index&crudId=blog&page=2"))
    );
}

#[test]
fn test_remove_referrer() {
    let harness = Harness::single();
    let ctx = context("/admin?crudAction=index&crudId=blog&referrer=/elsewhere");

    harness.urls.builder(Some(&ctx)).remove_referrer().generate_url().unwrap();
    assert!(!harness.last_params().contains_key("referrer"));
}

#[test]
fn test_include_referrer_without_context_is_dropped() {
    let harness = Harness::single();

    harness.urls.builder(None).set_crud_id("blog").include_referrer().generate_url().unwrap();
    assert!(!harness.last_params().contains_key("referrer"));
}

#[test]
fn test_parameter_order_is_lexicographic() {
    let harness = Harness::single();

    let first = harness
        .urls
        .builder(None)
        .set("z", 1)
        .unwrap()
        .set("a", 2)
        .unwrap()
        .generate_url()
        .unwrap();
    let second = harness
        .urls
        .builder(None)
        .set("a", 2)
        .unwrap()
        .set("z", 1)
        .unwrap()
        .generate_url()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, "https://admin.test/admin?a=2&z=1");
}

#[test]
fn test_ambiguous_dashboard_without_context() {
    let harness = Harness::double();

    let err = harness.urls.builder(None).set_crud_id("blog").generate_url().unwrap_err();
    assert!(matches!(err, AdminUrlError::Runtime(_)));
    assert!(harness.generator.calls().is_empty());
}

#[test]
fn test_single_dashboard_is_default() {
    let harness = Harness::single();

    harness.urls.builder(None).set_crud_id("blog").generate_url().unwrap();
    assert_eq!(harness.generator.calls()[0].0, "admin");
}

#[test]
fn test_set_dashboard_disambiguates() {
    let harness = Harness::double();

    let url = harness
        .urls
        .builder(None)
        .set_dashboard(SHOP_DASHBOARD)
        .set_crud_id("blog")
        .generate_url()
        .unwrap();

    assert_eq!(url, "https://admin.test/shop_admin?crudAction=index&crudId=blog");
    assert!(!harness.last_params().contains_key("dashboardControllerFqcn"));
}

#[test]
fn test_unknown_dashboard_class() {
    let harness = Harness::single();

    let err = harness
        .urls
        .builder(None)
        .set_dashboard("App\\NotADashboard")
        .generate_url()
        .unwrap_err();
    match err {
        AdminUrlError::InvalidArgument(msg) => {
            assert!(msg.contains("App\\NotADashboard"));
            assert!(msg.contains("Dashboard controller"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_no_dashboard_registered() {
    let harness = Harness::with_dashboards(MemoryDashboardRegistry::new());

    let err = harness.urls.builder(None).generate_url().unwrap_err();
    assert!(matches!(err, AdminUrlError::Runtime(_)));
}

#[test]
fn test_locale_suffix_is_stripped() {
    let harness = Harness::single();
    let uri = "/en/admin?crudAction=index&crudId=blog".parse().unwrap();
    let ctx = AdminContext::from_uri("admin.en", &uri);

    harness.urls.builder(Some(&ctx)).set_action("detail").generate_url().unwrap();
    assert_eq!(harness.generator.calls()[0].0, "admin");
}

#[test]
fn test_end_to_end_controller_and_action() {
    let harness = Harness::single();

    let url = harness
        .urls
        .builder(None)
        .set_controller(BLOG_CRUD)
        .set_action("new")
        .generate_url()
        .unwrap();

    assert_eq!(
        harness.generator.calls(),
        vec![(
            "admin".to_string(),
            params(&[("crudAction", Value::from("new")), ("crudId", Value::from("blog"))]),
            UrlReference::AbsoluteUrl,
        )]
    );
    assert_eq!(url, "https://admin.test/admin?crudAction=new&crudId=blog");
}

#[test]
fn test_non_stringable_object_fails_before_any_lookup() {
    #[derive(Serialize)]
    struct Post {
        id: u32,
        title: String,
    }

    let harness = Harness::single();
    let mut builder = harness.urls.builder(None);
    builder.set_controller(BLOG_CRUD);

    let err = builder
        .set_entity_id(Post {
            id: 1,
            title: "Hello".to_string(),
        })
        .unwrap_err();

    match err {
        AdminUrlError::InvalidArgument(msg) => assert!(msg.contains("\"entityId\"")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(harness.cruds.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(harness.dashboards.lookups.load(Ordering::SeqCst), 0);
    assert!(harness.generator.calls().is_empty());
}

#[test]
fn test_stringify_and_newtypes_as_entity_id() {
    struct Slug(u32);

    impl std::fmt::Display for Slug {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "post-{}", self.0)
        }
    }

    let harness = Harness::single();
    let id = uuid::Uuid::new_v4();

    harness
        .urls
        .builder(None)
        .set_crud_id("blog")
        .set_entity_id(id)
        .unwrap()
        .set("publishedAfter", chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .unwrap()
        .set("slug", Stringify(Slug(12)))
        .unwrap()
        .generate_url()
        .unwrap();

    let sent = harness.last_params();
    assert_eq!(sent.get("entityId"), Some(&Value::from(id.to_string())));
    assert_eq!(sent.get("publishedAfter"), Some(&Value::from("2024-05-01")));
    assert_eq!(sent.get("slug"), Some(&Value::from("post-12")));
}

#[test]
fn test_unknown_crud_controller_reports_class() {
    let harness = Harness::single();

    let err = harness
        .urls
        .builder(None)
        .set_controller("App\\PlainController")
        .generate_url()
        .unwrap_err();
    assert!(matches!(err, AdminUrlError::InvalidArgument(msg) if msg.contains("App\\PlainController")));
    assert!(harness.generator.calls().is_empty());
}

#[test]
fn test_null_values_are_dropped() {
    let harness = Harness::single();

    harness
        .urls
        .builder(None)
        .set_crud_id("blog")
        .set("page", None::<u32>)
        .unwrap()
        .generate_url()
        .unwrap();
    assert!(!harness.last_params().contains_key("page"));
}

#[test]
fn test_builder_from_provider() {
    let harness = Harness::single();
    let provider: Option<AdminContext> = Some(context("/admin?crudAction=index&crudId=blog"));

    let builder = harness.urls.builder_from(&provider);
    assert_eq!(builder.get(Param::CrudId), Some(&Value::from("blog")));
}

#[test]
fn test_display_generates_url() {
    let harness = Harness::single();
    let mut builder = harness.urls.builder(None);
    builder.set_crud_id("blog");

    assert_eq!(builder.to_string(), "https://admin.test/admin?crudAction=index&crudId=blog");
}
