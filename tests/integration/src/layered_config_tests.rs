//! End-to-end resolution across layered parameter files
//!
//! Exercises the complete flow: bag files on disk -> parameter bags ->
//! prioritised chain -> lookups with scope fallback.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use confchain_core::{ChainConfigResolver, Error};
use confchain_params::ParameterBag;
use confchain_test_utils::{MockResolver, identify};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

const DEFAULTS: &str = r#"
default_namespace = "app"

[groups]
site_en = ["public"]
site_fr = ["public"]
admin = ["backoffice"]

[parameters]
"app.default.languages" = ["eng-GB"]
"app.default.cache" = { ttl = 60, enabled = true }
"app.public.design" = "standard"
"app.backoffice.design" = "admin"
"#;

const SITES: &str = r#"
default_namespace = "app"

[groups]
site_fr = ["public"]

[parameters]
"app.site_fr.languages" = ["fre-FR", "eng-GB"]
"app.global.debug" = false
"#;

const LOCAL: &str = r#"
default_namespace = "app"

[parameters]
"app.global.debug" = true
"#;

/// Write the three layers and load them into a chain, local overrides first.
fn setup_layers(root: &Path) -> ChainConfigResolver {
    let files = [
        ("defaults.toml", DEFAULTS, 0),
        ("sites.toml", SITES, 50),
        ("local.toml", LOCAL, 100),
    ];

    let mut chain = ChainConfigResolver::new();
    for (file, content, priority) in files {
        let path = root.join(file);
        fs::write(&path, content).unwrap();
        chain.add_resolver(Arc::new(ParameterBag::load(&path).unwrap()), priority);
    }
    chain
}

#[test]
fn test_layers_resolve_by_priority_and_scope() {
    let temp = TempDir::new().unwrap();
    let chain = setup_layers(temp.path());

    // Local global override beats the site layer
    assert_eq!(
        chain.get_parameter("debug", Some("app"), Some("site_fr")).unwrap(),
        json!(true)
    );
    // Site layer answers for its own scope
    assert_eq!(
        chain.get_parameter("languages", Some("app"), Some("site_fr")).unwrap(),
        json!(["fre-FR", "eng-GB"])
    );
    // Other scopes fall through to the defaults layer
    assert_eq!(
        chain.get_parameter("languages", Some("app"), Some("site_en")).unwrap(),
        json!(["eng-GB"])
    );
    assert_eq!(
        chain.get_parameter("design", Some("app"), Some("admin")).unwrap(),
        json!("admin")
    );
    assert_eq!(
        chain.get_parameter("cache", None, None).unwrap()["ttl"],
        json!(60)
    );
}

#[test]
fn test_missing_parameter_reports_name_and_namespace() {
    let temp = TempDir::new().unwrap();
    let chain = setup_layers(temp.path());

    assert!(!chain.has_parameter("timezone", Some("app"), Some("site_en")));
    let err = chain
        .get_parameter("timezone", Some("app"), Some("site_en"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parameter 'timezone' with namespace 'app' could not be found."
    );
}

#[test]
fn test_runtime_registration_takes_effect_immediately() {
    let temp = TempDir::new().unwrap();
    let mut chain = setup_layers(temp.path());
    assert_eq!(
        chain.get_parameter("design", Some("app"), Some("site_en")).unwrap(),
        json!("standard")
    );

    let preview = MockResolver::new("preview").returning("preview").shared();
    chain.add_resolver(preview.clone(), 1000);

    assert_eq!(
        chain.get_parameter("design", Some("app"), Some("site_en")).unwrap(),
        json!("preview")
    );
    assert_eq!(
        identify(&chain.all_resolvers()[..1], &[preview.clone()]),
        vec!["preview"]
    );
}

#[test]
fn test_failing_resolver_hides_lower_layers() {
    let temp = TempDir::new().unwrap();
    let mut chain = setup_layers(temp.path());
    let remote = MockResolver::new("remote").failing("timeout").shared();
    chain.add_resolver(remote.clone(), 75);

    // The local layer still answers before the failing resolver is reached
    assert_eq!(
        chain.get_parameter("debug", Some("app"), Some("site_fr")).unwrap(),
        json!(true)
    );
    // Anything the local layer misses hits the failure
    let err = chain
        .get_parameter("languages", Some("app"), Some("site_fr"))
        .unwrap_err();
    assert!(matches!(err, Error::Resolver { .. }));
    assert_eq!(remote.get_calls(), 1);
}

#[test]
fn test_nested_chains_share_namespace_broadcast() {
    let temp = TempDir::new().unwrap();
    let site_chain = Arc::new(setup_layers(temp.path()));

    let mut blog = ParameterBag::new("blog");
    blog.set("blog", "default", "languages", json!(["nor-NO"]));
    blog.set("app", "default", "posts_per_page", 10);

    let mut root = ChainConfigResolver::new();
    root.add_resolver(site_chain.clone(), 10);
    root.add_resolver(Arc::new(blog), 0);

    assert_eq!(
        root.get_parameter("posts_per_page", Some("app"), None).unwrap(),
        json!(10)
    );

    root.set_default_namespace("blog");
    assert_eq!(site_chain.default_namespace().unwrap(), "blog");
    assert_eq!(
        root.get_parameter("languages", None, None).unwrap(),
        json!(["nor-NO"])
    );
}
