use pretty_assertions::assert_eq;
use rhtmx_routing::{
    build_query, parse_query, RequestBase, Route, RouteTable, RoutingError, UrlGenerator,
    UrlReference, Value,
};
use rstest::rstest;
use std::collections::BTreeMap;

fn table() -> RouteTable {
    RouteTable::new(RequestBase::new("https", "shop.example.com").with_port(8443))
        .with_route(Route::new("admin", "/admin"))
        .with_route(Route::new("admin_post", "/admin/posts/:id"))
        .with_route(Route::new("docs", "/docs/*path"))
        .with_route(Route::new("archive", "/archive/:year?"))
}

fn params(entries: Vec<(&str, Value)>) -> BTreeMap<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[rstest]
#[case("admin", params(vec![]), "/admin")]
#[case("admin_post", params(vec![("id", Value::from(7))]), "/admin/posts/7")]
#[case("docs", params(vec![("path", Value::from("guide/install"))]), "/docs/guide/install")]
#[case("archive", params(vec![]), "/archive")]
#[case("archive", params(vec![("year", Value::from(2024))]), "/archive/2024")]
fn test_paths(#[case] route: &str, #[case] params: BTreeMap<String, Value>, #[case] expected: &str) {
    let url = table().generate(route, &params, UrlReference::AbsolutePath).unwrap();
    assert_eq!(url, expected);
}

#[test]
fn test_absolute_url_with_port() {
    let url = table()
        .generate("admin", &BTreeMap::new(), UrlReference::AbsoluteUrl)
        .unwrap();
    assert_eq!(url, "https://shop.example.com:8443/admin");
}

#[test]
fn test_missing_required_placeholder() {
    let err = table()
        .generate("admin_post", &BTreeMap::new(), UrlReference::AbsolutePath)
        .unwrap_err();
    assert!(matches!(err, RoutingError::MissingParameters { .. }));
}

#[test]
fn test_nested_query_survives_round_trip() {
    let mut route_params = BTreeMap::new();
    route_params.insert("year".to_string(), Value::from(2024));
    route_params.insert("tags".to_string(), Value::List(vec![Value::from("rust"), Value::from("web")]));

    let sent = params(vec![
        ("routeName", Value::from("app_report")),
        ("routeParams", Value::Map(route_params)),
        ("menuIndex", Value::from(1)),
        ("draft", Value::Null),
    ]);

    let url = table().generate("admin", &sent, UrlReference::AbsolutePath).unwrap();
    let (path, query) = url.split_once('?').unwrap();
    assert_eq!(path, "/admin");
    assert_eq!(
        query,
        "menuIndex=1&routeName=app_report&routeParams%5Btags%5D%5B0%5D=rust&routeParams%5Btags%5D%5B1%5D=web&routeParams%5Byear%5D=2024"
    );

    let decoded = parse_query(query);
    let bag = decoded.get("routeParams").and_then(Value::as_map).unwrap();
    assert_eq!(bag.get("year"), Some(&Value::from("2024")));
    let tags = bag.get("tags").and_then(Value::as_map).unwrap();
    assert_eq!(tags.get("0"), Some(&Value::from("rust")));
    assert_eq!(tags.get("1"), Some(&Value::from("web")));
    assert!(!decoded.contains_key("draft"));
}

#[test]
fn test_query_keeps_reserved_characters_readable() {
    let query = build_query(&params(vec![("referrer", Value::from("/admin?page=2"))]));
    assert_eq!(query, "referrer=/admin?page%3D2");
}
