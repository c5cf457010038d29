//! Shared fixtures for packager integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assetpack::{
    DefaultPackager, MinifyConfig, OutputPaths, PackagerConfig, Registry, Snapshot, Tree,
    TreeBuilder,
};
use tempfile::TempDir;

pub const APP: &str = "the-best-app-ever";

const MODULES: &[(&str, &str)] = &[
    ("the-best-app-ever/router.js", "router.js"),
    ("the-best-app-ever/app.js", "app.js"),
    ("the-best-app-ever/components/x-foo.js", "export default class {}"),
    ("the-best-app-ever/routes/application.js", "export default class {}"),
    ("the-best-app-ever/config/environment.js", "environment.js"),
    ("the-best-app-ever/styles/app.css", "html { height: 100%; }"),
    ("bower_components/hint.css/hint.css", ""),
    ("bower_components/1.css", "first"),
    ("bower_components/2.css", "second"),
    ("bower_components/3.css", "third"),
    ("bower_components/1.js", "var one;"),
    ("bower_components/2.js", "var two;"),
    (
        "vendor/font-awesome/css/font-awesome.css",
        "body { height: 100%; }",
    ),
];

/// The input tree of a typical build, written to a temp directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for (path, contents) in MODULES {
            write(dir.path(), path, contents);
        }
        fs::create_dir_all(dir.path().join("the-best-app-ever/templates")).unwrap();
        fs::create_dir_all(dir.path().join("addon-tree-output")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tree(&self) -> Tree {
        Tree::source(self.dir.path())
    }
}

fn write(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, contents).unwrap();
}

/// `/assets/vendor.css` built from files that exist in the fixture.
pub fn style_config() -> PackagerConfig {
    PackagerConfig::new(APP)
        .with_app_css_file(OutputPaths::named([("app", "/assets/the-best-app-ever.css")]))
        .with_vendor_css_file("/assets/vendor.css")
        .with_style_bundle(
            "/assets/vendor.css",
            [
                "vendor/font-awesome/css/font-awesome.css",
                "bower_components/hint.css/hint.css",
            ],
        )
}

pub fn minify_on() -> MinifyConfig {
    MinifyConfig::enabled().with_options(serde_json::json!({
        "processImport": false,
        "relativeTo": "assets",
    }))
}

pub fn minify_off() -> MinifyConfig {
    MinifyConfig::disabled().with_options(serde_json::json!({
        "processImport": false,
        "relativeTo": "assets",
    }))
}

pub fn packager(config: PackagerConfig) -> DefaultPackager {
    DefaultPackager::builder(config)
        .registry(Registry::new())
        .build()
        .unwrap()
}

pub async fn build(tree: &Tree) -> Snapshot {
    TreeBuilder::default().build(tree).await.unwrap()
}

/// A non-empty output with no whitespace left inside it.
pub fn is_minified(contents: &str) -> bool {
    let trimmed = contents.trim();
    !trimmed.is_empty() && !trimmed.contains(char::is_whitespace)
}
