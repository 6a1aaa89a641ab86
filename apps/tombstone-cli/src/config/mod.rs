//! Configuration management for the tombstone CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::Config;
