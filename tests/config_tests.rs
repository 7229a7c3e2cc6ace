use std::io::Write;

use tempfile::TempPath;
use waypoint::config::{load_config, load_table};
use waypoint::RouteOutcome;

fn write_routes_file(suffix: &str, content: &str) -> TempPath {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp routes file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp routes file");
    file.into_temp_path()
}

fn yaml_routes() -> &'static str {
    r#"
ignore:
  - template: "content/{*file}"
routes:
  - name: blog
    template: "blog/{action}/{id?}"
    defaults:
      controller: Blog
    constraints:
      id: '\d+'
  - name: default
    template: "{controller=Home}/{action=index}/{id?}"
"#
}

#[test]
fn test_yaml_round_trip() {
    let path = write_routes_file(".yaml", yaml_routes());
    let table = load_table(path.to_str().expect("utf8 path")).expect("routes file loads");

    assert_eq!(table.len(), 2);
    assert_eq!(table.ignore_count(), 1);

    let matched = table.match_path("/Forum/Show/123").expect("path matches");
    assert_eq!(matched.route.name, "default");
    assert_eq!(matched.get("controller"), Some("forum"));
    assert_eq!(matched.get("id"), Some("123"));

    let matched = table.match_path("/blog/post/42").expect("path matches");
    assert_eq!(matched.route.name, "blog");
    assert_eq!(matched.get("controller"), Some("blog"));

    assert!(matches!(
        table.recognize("/content/site.css"),
        RouteOutcome::Ignored
    ));
}

#[test]
fn test_json_round_trip() {
    let path = write_routes_file(
        ".json",
        r#"{
            "routes": [
                {
                    "name": "default",
                    "template": "{controller=Home}/{action=index}/{id?}"
                }
            ]
        }"#,
    );
    let table = load_table(path.to_str().expect("utf8 path")).expect("routes file loads");

    let matched = table.match_path("/").expect("root matches");
    assert_eq!(matched.get("controller"), Some("home"));
    assert_eq!(matched.get("action"), Some("index"));
}

#[test]
fn test_file_order_is_match_priority() {
    let path = write_routes_file(
        ".yaml",
        r#"
routes:
  - name: first
    template: "{controller}/{action=index}"
  - name: second
    template: "{controller}/{action=index}"
"#,
    );
    let table = load_table(path.to_str().expect("utf8 path")).expect("routes file loads");
    let matched = table.match_path("/Shop").expect("path matches");
    assert_eq!(matched.route.name, "first");
}

#[test]
fn test_case_sensitive_flag() {
    let path = write_routes_file(
        ".yaml",
        r#"
case_sensitive: true
routes:
  - name: home
    template: "home/{action=index}"
"#,
    );
    let table = load_table(path.to_str().expect("utf8 path")).expect("routes file loads");
    assert!(table.match_path("/home/about").is_some());
    assert!(table.match_path("/Home/about").is_none());
}

#[test]
fn test_ambiguous_default_fails_the_build() {
    let path = write_routes_file(
        ".yaml",
        r#"
routes:
  - name: dual
    template: "posts/{id=5}"
    defaults:
      id: "7"
"#,
    );
    // The file parses but the table build enforces registration invariants.
    assert!(load_config(path.to_str().expect("utf8 path")).is_ok());
    let err = load_table(path.to_str().expect("utf8 path"))
        .expect_err("ambiguous default must fail the build");
    assert!(err.to_string().contains("invalid route configuration"));
}

#[test]
fn test_missing_file_reports_the_path() {
    let err = load_table("does/not/exist.yaml").expect_err("missing file must fail");
    assert!(err.to_string().contains("does/not/exist.yaml"));
}

#[test]
fn test_malformed_yaml_is_rejected() {
    let path = write_routes_file(".yaml", "routes: [not a route");
    assert!(load_config(path.to_str().expect("utf8 path")).is_err());
}
