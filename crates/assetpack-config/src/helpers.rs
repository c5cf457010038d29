use serde_json::Value;

// Helper defaults
pub(crate) fn default_env() -> String {
    "development".to_string()
}

pub(crate) fn default_minify_options() -> Value {
    Value::Object(Default::default())
}

pub(crate) fn default_assets_dir() -> &'static str {
    "/assets"
}
