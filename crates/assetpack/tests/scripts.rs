//! Script packaging, end to end.

mod common;

use std::sync::Arc;

use assetpack::{
    DefaultPackager, Error, Filter, Minifier, MinifyConfig, PackagerConfig, Registry, Tree,
    preprocessor,
};
use common::{APP, Fixture, build, packager, style_config};
use serde_json::Value;

/// Strips all whitespace from `.js` files.
struct Squash;

impl Filter for Squash {
    fn name(&self) -> &str {
        "squash"
    }

    fn can_process(&self, relative_path: &str) -> bool {
        relative_path.ends_with(".js")
    }

    fn process(&self, _relative_path: &str, contents: &[u8]) -> anyhow::Result<Vec<u8>> {
        let source = std::str::from_utf8(contents)?;
        Ok(source.split_whitespace().collect::<String>().into_bytes())
    }
}

impl Minifier for Squash {
    fn name(&self) -> &str {
        "squash"
    }

    fn minify(&self, tree: Tree, options: &Value) -> anyhow::Result<Tree> {
        anyhow::ensure!(options.get("mangle").is_some(), "options were not passed through");
        Ok(Tree::filter(tree, Arc::new(Squash)))
    }
}

fn script_config() -> PackagerConfig {
    PackagerConfig::new(APP).with_script_bundle(
        "/assets/vendor.js",
        [
            "bower_components/2.js",
            "bower_components/1.js",
            "bower_components/2.js",
        ],
    )
}

#[tokio::test]
async fn concatenates_app_scripts_in_path_order() {
    let fixture = Fixture::new();
    let packager = packager(script_config());

    let packaged = packager.package_scripts(fixture.tree()).unwrap();
    let output = build(&packaged).await;

    assert_eq!(
        output.list("assets"),
        vec!["the-best-app-ever.js", "vendor.js"]
    );
    assert_eq!(
        output.read("assets/the-best-app-ever.js").unwrap(),
        [
            "app.js",
            "export default class {}",
            "environment.js",
            "router.js",
            "export default class {}",
        ]
        .join("\n")
    );
    assert_eq!(
        output.read("assets/vendor.js").unwrap(),
        "var two;\nvar one;"
    );
}

#[tokio::test]
async fn caches_scripts_separately_from_styles() {
    let fixture = Fixture::new();
    let packager = packager(style_config());

    assert!(packager.cached_scripts().is_none());
    let scripts = packager.package_scripts(fixture.tree()).unwrap();
    assert!(packager.cached_styles().is_none());

    let styles = packager.package_styles(fixture.tree()).unwrap();
    assert!(!Tree::ptr_eq(&scripts, &styles));

    let cached = packager.cached_scripts().unwrap();
    assert!(Tree::ptr_eq(cached, &scripts));
    assert_eq!(cached.annotation(), Some("Packaged Javascript"));
    assert!(Tree::ptr_eq(
        &packager.package_scripts(Tree::empty()).unwrap(),
        &scripts
    ));
}

#[tokio::test]
async fn minifies_scripts_with_the_attached_minifier() {
    let fixture = Fixture::new();
    let config = script_config().with_minify_js(
        MinifyConfig::enabled().with_options(serde_json::json!({ "mangle": false })),
    );
    let packager = DefaultPackager::builder(config)
        .script_minifier(Arc::new(Squash))
        .build()
        .unwrap();

    let output = build(&packager.package_scripts(fixture.tree()).unwrap()).await;

    assert_eq!(output.read("assets/vendor.js").unwrap(), "vartwo;varone;");
    assert!(
        !output
            .read("assets/the-best-app-ever.js")
            .unwrap()
            .contains(char::is_whitespace)
    );
}

#[test]
fn script_minification_needs_a_minifier() {
    let config = script_config().with_minify_js(MinifyConfig::enabled());
    let err = DefaultPackager::builder(config).build().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[tokio::test]
async fn registered_js_preprocessors_replace_the_default_concat() {
    let fixture = Fixture::new();
    let registry = Registry::new().with(
        "js",
        preprocessor("copy", |tree, input, output, _options| {
            assert_eq!(input, APP);
            assert_eq!(output, "assets");
            Ok(Tree::funnel(
                tree,
                assetpack::FunnelOptions::new()
                    .src_dir(input)
                    .dest_dir(format!("{output}/modules"))
                    .files(["app.js", "router.js"]),
            ))
        }),
    );
    let packager = DefaultPackager::builder(script_config())
        .registry(registry)
        .build()
        .unwrap();

    let output = build(&packager.package_scripts(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.paths().collect::<Vec<_>>(),
        vec!["assets/modules/app.js", "assets/modules/router.js", "assets/vendor.js"]
    );
}
