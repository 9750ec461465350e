//! Integration tests for route tables and their configuration

use pretty_assertions::assert_eq;
use rhtmx_pattern::*;
use serde_json::json;

const CONFIG: &str = r#"
[constraints]
slug = "^[a-z0-9-]+$"
year = "^[0-9]{4}$"

[[route]]
name = "home"
pattern = "/"

[[route]]
name = "post"
pattern = "/blog/{year:year}/{slug:slug}"

[[route]]
name = "product"
pattern = "/products/{id:int:min(1)}/{tab?:=(overview)}"

[[route]]
pattern = "/{path*}"
"#;

fn table() -> RouteTable {
    RoutesConfig::from_toml_str(CONFIG).unwrap().table().unwrap()
}

#[test]
fn test_routes_keep_config_order() {
    let table = table();
    let names: Vec<Option<&str>> = table.routes().iter().map(Route::name).collect();
    assert_eq!(names, vec![Some("home"), Some("post"), Some("product"), None]);
}

#[test]
fn test_match_named_routes() {
    let table = table();

    assert_eq!(table.match_path("/").unwrap().name(), Some("home"));

    let m = table.match_path("/blog/2024/hello-world").unwrap();
    assert_eq!(m.name(), Some("post"));
    assert_eq!(
        serde_json::to_value(&m.params).unwrap(),
        json!({ "year": "2024", "slug": "hello-world" })
    );

    let m = table.match_path("/products/3").unwrap();
    assert_eq!(
        serde_json::to_value(&m.params).unwrap(),
        json!({ "id": 3, "tab": "overview" })
    );
    assert!(m.params.get("tab").unwrap().is_default());
}

#[test]
fn test_constraint_failure_falls_through() {
    let table = table();

    // Bad year, so the catch-all takes it
    let m = table.match_path("/blog/24/hello").unwrap();
    assert_eq!(m.name(), None);
    assert_eq!(
        serde_json::to_value(&m.params).unwrap(),
        json!({ "path": ["blog", "24", "hello"] })
    );

    let m = table.match_path("/products/0").unwrap();
    assert_eq!(m.template(), "/{path*}");
}

#[test]
fn test_resolve_through_table() {
    let table = table();

    assert_eq!(
        table
            .resolve("post", &RouteValues::new().with("year", 2024).with("slug", "intro"))
            .as_deref(),
        Some("/blog/2024/intro")
    );
    assert_eq!(
        table.resolve("product", &RouteValues::new().with("id", 9)).as_deref(),
        Some("/products/9/overview")
    );
    assert_eq!(table.resolve("post", &RouteValues::new()), None);
    assert_eq!(table.resolve("nope", &RouteValues::new()), None);
}

#[test]
fn test_unknown_constraint_in_config() {
    let config = RoutesConfig::from_toml_str(
        r#"
        [[route]]
        pattern = "/{id:uuid}"
        "#,
    )
    .unwrap();

    let err = config.table().unwrap_err();
    assert_eq!(err.to_string(), "Unknown constraint 'uuid': /{id:uuid}");
}

#[test]
fn test_duplicate_route_names_in_config() {
    let config = RoutesConfig::from_toml_str(
        r#"
        [[route]]
        name = "a"
        pattern = "/a"

        [[route]]
        name = "a"
        pattern = "/b"
        "#,
    )
    .unwrap();

    assert!(matches!(
        config.table().unwrap_err(),
        TableError::DuplicateName(name) if name == "a"
    ));
}

#[test]
fn test_match_result_feeds_resolve() {
    let table = table();
    let m = table.match_path("/products/12/reviews").unwrap();
    let values = RouteValues::from(&m.params);
    assert_eq!(
        table.resolve("product", &values).as_deref(),
        Some("/products/12/reviews")
    );
}
