//! # tplfactory-core
//!
//! Core types, settings, module registry, and error types for tplfactory.
//! This crate has no dependency on any template engine and provides the
//! foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Factory settings and per-engine configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`checks`] - Configuration checks
//! - [`modules`] - Installed host modules (the module-presence oracle)
//! - [`page`] - The content item being rendered, saved, or deleted
//! - [`logging`] - Tracing-based logging integration

pub mod checks;
pub mod error;
pub mod logging;
pub mod modules;
pub mod page;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FactoryError, FactoryResult};
pub use modules::{Module, ModuleOracle, ModuleRegistry};
pub use page::Page;
pub use settings::{EngineSettings, Settings};
