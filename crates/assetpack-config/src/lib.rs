pub mod config;
pub mod discovery;
pub mod error;
mod helpers;
pub mod minify;
pub mod paths;
pub mod validation;

// Re-export main types
pub use config::*;
pub use error::*;
pub use minify::MinifyConfig;
pub use paths::{DistPaths, DistPathsConfig, OutputPaths};

// Re-export discovery and validation
pub use discovery::{discover, ConfigDiscovery};
pub use validation::{validate_schema, ConfigValidator, SchemaValidator};
