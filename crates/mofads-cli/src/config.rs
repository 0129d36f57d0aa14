//! Layered CLI configuration: built-in defaults, an optional TOML file, command-line
//! arguments and finally `-S key=value` overrides.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, build_registry};
pub use models::AppConfig;
