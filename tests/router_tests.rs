use waypoint::{RouteDef, RouteError, RouteOutcome, RouteTable};

fn mvc_table() -> RouteTable {
    let mut table = RouteTable::new();
    table.ignore("content/{*file}").expect("ignore registers");
    table
        .add(
            RouteDef::new("blog", "blog/{action}/{id?}")
                .with_default("controller", "Blog")
                .with_constraint("id", r"\d+"),
        )
        .expect("blog route registers");
    table
        .add(RouteDef::new(
            "default",
            "{controller=Home}/{action=index}/{id?}",
        ))
        .expect("default route registers");
    table
}

fn assert_values(table: &RouteTable, path: &str, route: &str, expected: &[(&str, &str)]) {
    let matched = table
        .match_path(path)
        .unwrap_or_else(|| panic!("expected {} to match", path));
    assert_eq!(
        matched.route.name, route,
        "route mismatch for {}: expected '{}', got '{}'",
        path, route, matched.route.name
    );
    for (key, value) in expected {
        assert_eq!(
            matched.get(key),
            Some(*value),
            "value mismatch for '{}' on {}",
            key,
            path
        );
    }
}

#[test]
fn test_root_path_uses_defaults() {
    let table = mvc_table();
    let matched = table.match_path("/").expect("root matches the default route");
    assert_eq!(matched.route.name, "default");
    assert_eq!(matched.get("controller"), Some("home"));
    assert_eq!(matched.get("action"), Some("index"));
    // {id?} never backfills a value.
    assert_eq!(matched.get("id"), None);
    assert!(!matched.values_map().contains_key("id"));
}

#[test]
fn test_full_path_values_are_lowercased() {
    let table = mvc_table();
    assert_values(
        &table,
        "/Forum/Show/123",
        "default",
        &[("controller", "forum"), ("action", "show"), ("id", "123")],
    );
}

#[test]
fn test_three_segment_scenario() {
    let table = mvc_table();
    assert_values(
        &table,
        "/Articles/Sections/5",
        "default",
        &[
            ("controller", "articles"),
            ("action", "sections"),
            ("id", "5"),
        ],
    );
}

#[test]
fn test_route_level_defaults_fill_missing_values() {
    let mut table = RouteTable::new();
    table
        .add(
            RouteDef::new("img", "image-{id}")
                .with_default("controller", "Home")
                .with_default("action", "image"),
        )
        .expect("img route registers");

    assert_values(
        &table,
        "/image-123",
        "img",
        &[("controller", "home"), ("action", "image"), ("id", "123")],
    );
}

#[test]
fn test_constraint_failure_falls_through() {
    let table = mvc_table();
    // The blog route requires a numeric id; a letter id falls through to
    // the default route, which binds it as a plain segment value.
    assert_values(
        &table,
        "/blog/post/abc",
        "default",
        &[("controller", "blog"), ("action", "post"), ("id", "abc")],
    );
    assert_values(
        &table,
        "/blog/post/42",
        "blog",
        &[("controller", "blog"), ("action", "post"), ("id", "42")],
    );
}

#[test]
fn test_first_match_wins_over_later_routes() {
    let mut table = RouteTable::new();
    table
        .add(RouteDef::new("first", "{controller}/{action=index}"))
        .expect("first registers");
    table
        .add(RouteDef::new("second", "{controller}/{action=index}"))
        .expect("second registers");

    let matched = table.match_path("/Shop").expect("path matches");
    assert_eq!(matched.route.name, "first");
}

#[test]
fn test_ignore_routes_take_precedence() {
    let table = mvc_table();
    let outcome = table.recognize("/content/images/x.png");
    assert!(matches!(outcome, RouteOutcome::Ignored));
    assert!(table.match_path("/content/images/x.png").is_none());
}

#[test]
fn test_too_many_segments_is_no_match() {
    let mut table = RouteTable::new();
    table
        .add(RouteDef::new("date", "{yyyy}-{mm}-{dd}/{id}"))
        .expect("date route registers");
    table
        .add(RouteDef::new(
            "default",
            "{controller=Home}/{action=index}/{id?}",
        ))
        .expect("default registers");

    let outcome = table.recognize("/2018/04/03/show/9999/abc");
    assert!(matches!(outcome, RouteOutcome::NoMatch));
}

#[test]
fn test_duplicate_route_name_is_rejected_case_insensitively() {
    let mut table = mvc_table();
    let err = table
        .add(RouteDef::new("Default", "{controller}/{action}"))
        .expect_err("duplicate name must fail");
    assert_eq!(
        err,
        RouteError::DuplicateName {
            name: "Default".to_string()
        }
    );
}

#[test]
fn test_empty_name_and_template_are_rejected() {
    let mut table = RouteTable::new();
    assert_eq!(
        table.add(RouteDef::new("", "{controller}")),
        Err(RouteError::EmptyName)
    );
    assert_eq!(
        table.add(RouteDef::new("broken", "")),
        Err(RouteError::EmptyTemplate {
            name: "broken".to_string()
        })
    );
}

#[test]
fn test_ambiguous_default_fails_at_registration() {
    let mut table = RouteTable::new();
    let err = table
        .add(RouteDef::new("dual", "posts/{id=5}").with_default("id", "7"))
        .expect_err("ambiguous default must fail");
    assert_eq!(
        err,
        RouteError::AmbiguousDefault {
            segment: "id".to_string()
        }
    );
    // The failed registration leaves the table untouched.
    assert!(table.is_empty());
}

#[test]
fn test_front_controller_script_is_root() {
    let table = mvc_table();
    let matched = table.match_path("/index.php").expect("index.php is the root path");
    assert_eq!(matched.route.name, "default");
    assert_eq!(matched.get("controller"), Some("home"));
}

#[test]
fn test_query_string_is_stripped() {
    let table = mvc_table();
    assert_values(
        &table,
        "/Forum/Show/123?page=2&sort=desc",
        "default",
        &[("controller", "forum"), ("id", "123")],
    );
}

#[test]
fn test_trailing_slash_is_accepted() {
    let table = mvc_table();
    assert_values(
        &table,
        "/Forum/Show/",
        "default",
        &[("controller", "forum"), ("action", "show")],
    );
}

#[test]
fn test_clear_empties_routes_and_ignores() {
    let mut table = mvc_table();
    assert_eq!(table.len(), 2);
    assert_eq!(table.ignore_count(), 1);

    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.ignore_count(), 0);
    assert!(matches!(table.recognize("/"), RouteOutcome::NoMatch));
    assert!(matches!(
        table.recognize("/content/images/x.png"),
        RouteOutcome::NoMatch
    ));
}

#[test]
fn test_case_sensitive_table() {
    let mut table = RouteTable::new_case_sensitive();
    table
        .add(RouteDef::new("home", "home/{action=index}"))
        .expect("route registers");

    assert!(table.match_path("/home/about").is_some());
    assert!(table.match_path("/Home/about").is_none());
}

#[test]
fn test_registration_order_is_preserved() {
    let table = mvc_table();
    let names: Vec<&str> = table.routes().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["blog", "default"]);
}
