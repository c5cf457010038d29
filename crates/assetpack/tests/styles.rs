//! Style packaging, end to end.

mod common;

use assetpack::{
    FunnelOptions, OutputPaths, PackagerConfig, Registry, Tree, TreeBuilder, TreeError,
    preprocessor,
};
use common::{APP, Fixture, build, is_minified, minify_off, minify_on, packager, style_config};

#[tokio::test]
async fn caches_packaged_styles_tree() {
    let fixture = Fixture::new();
    let registry = Registry::new().with(
        "css",
        preprocessor("scss", |tree, input, output, _options| {
            Ok(Tree::funnel(
                tree,
                FunnelOptions::new()
                    .src_dir(input)
                    .dest_dir(output)
                    .destination(|path| Some(path.replace(".scss", ".css"))),
            ))
        }),
    );
    let packager = assetpack::DefaultPackager::builder(
        style_config()
            .with_app_css_file("/assets/the-best-app-ever.css")
            .with_minify_css(minify_on()),
    )
    .registry(registry)
    .build()
    .unwrap();

    assert!(packager.cached_styles().is_none());

    let packaged = packager.package_styles(fixture.tree()).unwrap();

    let cached = packager.cached_styles().expect("styles are cached");
    assert!(Tree::ptr_eq(cached, &packaged));
    assert_eq!(cached.annotation(), Some("Packaged Styles"));

    // Any later call returns the cached tree, whatever it is given.
    let again = packager.package_styles(Tree::empty()).unwrap();
    assert!(Tree::ptr_eq(&packaged, &again));

    let output = build(&packaged).await;
    assert_eq!(output.list("assets"), vec!["app.css", "vendor.css"]);
}

#[tokio::test]
async fn does_not_minify_css_files_when_minification_is_disabled() {
    let fixture = Fixture::new();
    let packager = packager(style_config().with_minify_css(minify_off()));

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.list("assets"),
        vec!["the-best-app-ever.css", "vendor.css"]
    );
    assert_eq!(
        output.read("assets/vendor.css").unwrap(),
        "body { height: 100%; }\n"
    );
    assert_eq!(
        output.read("assets/the-best-app-ever.css").unwrap(),
        "html { height: 100%; }"
    );
}

#[tokio::test]
async fn minifies_css_files_when_minification_is_enabled() {
    let fixture = Fixture::new();
    let packager = packager(style_config().with_minify_css(minify_on()));

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.list("assets"),
        vec!["the-best-app-ever.css", "vendor.css"]
    );
    let vendor = output.read("assets/vendor.css").unwrap();
    let app = output.read("assets/the-best-app-ever.css").unwrap();
    assert!(is_minified(&vendor), "vendor.css is minified: {vendor:?}");
    assert!(is_minified(&app), "app css is minified: {app:?}");
    assert!(app.contains("height:100%"));
}

#[tokio::test]
async fn processes_css_according_to_the_registry() {
    let fixture = Fixture::new();
    let registry = Registry::new().with(
        "css",
        preprocessor("zss", |tree, input, _output, options| {
            let zss = options
                .output_paths
                .get("app")
                .unwrap_or_default()
                .replace(".css", ".zss");
            Ok(Tree::funnel(
                tree,
                FunnelOptions::new().src_dir(input).destination(move |path| {
                    if path.contains("app.css") {
                        Some(zss.clone())
                    } else {
                        Some(path.to_string())
                    }
                }),
            ))
        }),
    );
    let packager = assetpack::DefaultPackager::builder(style_config().with_minify_css(minify_on()))
        .registry(registry)
        .build()
        .unwrap();

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.list("assets"),
        vec!["the-best-app-ever.zss", "vendor.css"]
    );
    // Only .css files are minified; the renamed file is left as written.
    assert_eq!(
        output.read("assets/the-best-app-ever.zss").unwrap(),
        "html { height: 100%; }"
    );
}

#[tokio::test]
async fn prevents_duplicate_inclusion_and_maintains_order() {
    let fixture = Fixture::new();
    let config = style_config().with_minify_css(minify_off()).with_style_bundle(
        "/assets/vendor.css",
        [
            "bower_components/1.css",
            "bower_components/2.css",
            "bower_components/3.css",
            "bower_components/1.css",
        ],
    );
    let packager = packager(config);

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(output.read("assets/vendor.css").unwrap(), "first\nsecond\nthird");
}

#[tokio::test]
async fn declared_bundles_are_isolated() {
    let fixture = Fixture::new();
    let config = PackagerConfig::new("no-styles-here")
        .with_style_bundle("/assets/vendor.css", ["bower_components/1.css"])
        .with_style_bundle(
            "/assets/test-support.css",
            ["bower_components/2.css", "bower_components/3.css"],
        );
    let packager = packager(config);

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.paths().collect::<Vec<_>>(),
        vec!["assets/test-support.css", "assets/vendor.css"]
    );
    assert_eq!(output.read("assets/vendor.css").unwrap(), "first");
    assert_eq!(output.read("assets/test-support.css").unwrap(), "second\nthird");
}

#[tokio::test]
async fn vendor_file_is_emitted_without_a_declared_bundle() {
    let fixture = Fixture::new();
    let packager = packager(PackagerConfig::new(APP));

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;

    assert_eq!(
        output.list("assets"),
        vec!["the-best-app-ever.css", "vendor.css"]
    );
    assert_eq!(output.read("assets/vendor.css").unwrap(), "");
}

#[tokio::test]
async fn addon_output_is_appended_to_the_vendor_bundle() {
    let tree = Tree::from_files([
        ("bower_components/1.css", "first"),
        ("addon-tree-output/b-addon/b.css", ".b {}"),
        ("addon-tree-output/a-addon/a.css", ".a {}"),
        ("addon-tree-output/a-addon/a.js", "ignored"),
    ]);
    let config = PackagerConfig::new(APP)
        .with_style_bundle("/assets/vendor.css", ["bower_components/1.css"]);
    let packager = packager(config);

    let output = build(&packager.package_styles(tree).unwrap()).await;

    assert_eq!(
        output.read("assets/vendor.css").unwrap(),
        "first\n.a {}\n.b {}"
    );
}

#[tokio::test]
async fn named_entries_route_matching_stylesheets() {
    let tree = Tree::from_files([
        ("the-best-app-ever/styles/app.css", "html {}"),
        ("the-best-app-ever/styles/admin.css", ".admin {}"),
        ("the-best-app-ever/styles/themes/dark.css", ".dark {}"),
        ("the-best-app-ever/styles/notes.txt", "not a stylesheet"),
    ]);
    let config = PackagerConfig::new(APP).with_app_css_file(OutputPaths::named([
        ("app", "/assets/the-best-app-ever.css"),
        ("admin", "/assets/admin-panel.css"),
    ]));
    let packager = packager(config);

    let output = build(&packager.package_styles(tree).unwrap()).await;

    assert_eq!(
        output.paths().collect::<Vec<_>>(),
        vec![
            "assets/admin-panel.css",
            "assets/the-best-app-ever.css",
            "assets/themes/dark.css",
            "assets/vendor.css",
        ]
    );
    assert_eq!(output.read("assets/admin-panel.css").unwrap(), ".admin {}");
}

#[tokio::test]
async fn nested_stylesheet_sharing_an_entry_name_keeps_its_path() {
    let tree = Tree::from_files([
        ("app/styles/app.css", "html {}"),
        ("app/styles/themes/app.css", ".theme {}"),
    ]);
    let packager = packager(PackagerConfig::new("app"));

    let output = build(&packager.package_styles(tree).unwrap()).await;

    assert_eq!(
        output.paths().collect::<Vec<_>>(),
        vec!["assets/app.css", "assets/themes/app.css", "assets/vendor.css"]
    );
    assert_eq!(output.read("assets/app.css").unwrap(), "html {}");
    assert_eq!(output.read("assets/themes/app.css").unwrap(), ".theme {}");
}

#[tokio::test]
async fn only_top_level_stylesheets_are_routed_to_named_entries() {
    let tree = Tree::from_files([
        ("the-best-app-ever/styles/app.css", "html {}"),
        ("the-best-app-ever/styles/admin.css", ".admin {}"),
        ("the-best-app-ever/styles/admin/app.css", ".admin-app {}"),
        ("the-best-app-ever/styles/themes/admin.css", ".themed-admin {}"),
    ]);
    let config = PackagerConfig::new(APP).with_app_css_file(OutputPaths::named([
        ("app", "/assets/the-best-app-ever.css"),
        ("admin", "/assets/admin-panel.css"),
    ]));
    let packager = packager(config);

    let output = build(&packager.package_styles(tree).unwrap()).await;

    assert_eq!(
        output.paths().collect::<Vec<_>>(),
        vec![
            "assets/admin-panel.css",
            "assets/admin/app.css",
            "assets/the-best-app-ever.css",
            "assets/themes/admin.css",
            "assets/vendor.css",
        ]
    );
    assert_eq!(output.read("assets/the-best-app-ever.css").unwrap(), "html {}");
    assert_eq!(output.read("assets/admin-panel.css").unwrap(), ".admin {}");
    assert_eq!(output.read("assets/admin/app.css").unwrap(), ".admin-app {}");
    assert_eq!(output.read("assets/themes/admin.css").unwrap(), ".themed-admin {}");
}

#[tokio::test]
async fn minifier_rejects_bundles_that_are_not_css() {
    let fixture = Fixture::new();
    let config = style_config().with_minify_css(minify_on()).with_style_bundle(
        "/assets/vendor.css",
        ["bower_components/1.css", "bower_components/2.css"],
    );
    let packager = packager(config);

    // Composition succeeds; lightningcss only sees the bundle at build time.
    let packaged = packager.package_styles(fixture.tree()).unwrap();
    let err = TreeBuilder::default().build(&packaged).await.unwrap_err();

    assert!(matches!(err, TreeError::Filter(_)), "unexpected error: {err}");
    assert!(err.to_string().contains("Failed to parse CSS"), "{err}");
}

#[tokio::test]
async fn missing_declared_file_fails_the_build() {
    let fixture = Fixture::new();
    let config = style_config().with_style_bundle(
        "/assets/vendor.css",
        ["bower_components/1.css", "vendor/1.css"],
    );
    let packager = packager(config);

    // Packaging only composes the tree; the missing file surfaces when it is built.
    let packaged = packager.package_styles(fixture.tree()).unwrap();
    let err = TreeBuilder::default().build(&packaged).await.unwrap_err();

    match err {
        TreeError::MissingFile { path, output } => {
            assert_eq!(path, "vendor/1.css");
            assert_eq!(output, "assets/vendor.css");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn packaged_styles_write_to_disk() {
    let fixture = Fixture::new();
    let packager = packager(style_config());

    let output = build(&packager.package_styles(fixture.tree()).unwrap()).await;
    let dist = tempfile::TempDir::new().unwrap();
    output.write_to(dist.path(), false).unwrap();

    let written = std::fs::read_to_string(dist.path().join("assets/the-best-app-ever.css")).unwrap();
    assert_eq!(written, "html { height: 100%; }");
    assert!(fixture.path().join("the-best-app-ever/styles/app.css").exists());
}
