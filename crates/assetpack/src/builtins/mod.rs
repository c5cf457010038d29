//! Built-in minifiers.

pub mod css;

pub use css::{CssMinifier, CssMinifyOptions};
