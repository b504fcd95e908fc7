use beanscope_api::ArchiveId;
use beanscope_core::{DeploymentDescriptor, ExtensionClassCache};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SHOP: &str = r#"{
  "application": "shop",
  "scopes": [{ "id": "app" }, { "id": "war", "parent": "app" }],
  "archives": [
    { "id": "shop.war", "kind": "web_module", "scope": "war",
      "accessible": ["lib.jar", "model.jar"],
      "classes": [
        { "name": "com.acme.Cart", "annotations": ["jakarta.enterprise.context.SessionScoped"] },
        { "name": "com.acme.Util" },
        { "name": "com.acme.Repo", "defined_in": "app" }
      ] },
    { "id": "lib.jar", "scope": "app", "beans_xml": { "state": "empty" },
      "classes": [{ "name": "com.acme.Repo" }, { "name": "com.acme.Broken", "loadable": false }] },
    { "id": "model.jar", "scope": "app", "beans_xml": { "state": "declared", "mode": "none" },
      "classes": [{ "name": "com.acme.Order" }],
      "extra_classes": ["com.acme.OrderListener"] }
  ]
}"#;

#[test]
fn test_descriptor_file_end_to_end() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shop.json");
    fs::write(&path, SHOP).unwrap();

    let descriptor = DeploymentDescriptor::from_path(&path).unwrap();
    let mut graph = descriptor
        .build_graph(Arc::new(ExtensionClassCache::new()))
        .unwrap();
    graph.scan_all();
    let report = graph.report();

    let web = report.archive("shop.war").unwrap();
    assert_eq!(web.candidate_classes, vec!["com.acme.Cart"]);

    let lib = report.archive("lib.jar").unwrap();
    assert_eq!(lib.candidate_classes, vec!["com.acme.Repo"]);
    assert_eq!(lib.descendants, vec![ArchiveId::new("shop.war")]);

    let model = report.archive("model.jar").unwrap();
    assert_eq!(model.candidate_classes, vec!["com.acme.OrderListener"]);
    assert!(model.direct_annotations.is_empty());

    assert_eq!(report.scan_order.last(), Some(&ArchiveId::new("shop.war")));
}

#[test]
fn test_missing_descriptor_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = DeploymentDescriptor::from_path(&temp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, beanscope_core::DiscoveryError::Io(_)));
}

#[test]
fn test_runtime_extension_listed_last_still_owns_its_classes() {
    let descriptor = DeploymentDescriptor::from_json(
        r#"{
      "application": "tracing",
      "scopes": [{ "id": "server" }, { "id": "app", "parent": "server" }],
      "archives": [
        { "id": "web.war", "kind": "web_module", "scope": "app",
          "discovery_mode": "all", "accessible": ["ext"],
          "classes": [{ "name": "ext.Tracer", "defined_in": "server" }, { "name": "web.Cart" }] },
        { "id": "ext", "kind": "runtime_extension", "scope": "server",
          "classes": [{ "name": "ext.Tracer",
                        "annotations": ["jakarta.enterprise.context.ApplicationScoped"] }] }
      ]
    }"#,
    )
    .unwrap();
    let mut graph = descriptor
        .build_graph(Arc::new(ExtensionClassCache::new()))
        .unwrap();
    graph.scan_all();
    let report = graph.report();

    assert_eq!(
        report.scan_order,
        vec![ArchiveId::new("ext"), ArchiveId::new("web.war")]
    );
    assert_eq!(report.archive("ext").unwrap().candidate_classes, vec!["ext.Tracer"]);
    assert_eq!(report.archive("web.war").unwrap().candidate_classes, vec!["web.Cart"]);
}
