//! # tplfactory
//!
//! Lets a content-managed site render each page with a template engine chosen
//! in settings, as long as a template file for the page exists.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `tplfactory` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tplfactory::prelude::*;
//!
//! let registry = Arc::new(EngineRegistry::builtin());
//! let mut host = ModuleRegistry::new();
//! for module in registry.modules() {
//!     host.install(Box::new(module));
//! }
//! host.populate();
//!
//! let dispatcher =
//!     LifecycleDispatcher::new(Arc::new(Settings::default()), registry, Arc::new(host))?;
//! let page = Page::new(1, "contact", "contact");
//! let mut ctx = RequestContext::new(page.clone());
//! dispatcher.on_ready(&mut ctx)?;
//! let html = ctx.render_page(page, String::new())?;
//! # Ok::<(), FactoryError>(())
//! ```

/// Settings, errors, logging, the module registry and configuration checks.
pub use tplfactory_core as core;

/// Per-request lifecycle hooks.
pub use tplfactory_hooks as hooks;

/// The engine contract and the built-in engines.
pub use tplfactory_engines as engines;

/// Engine registry, resolver and lifecycle dispatcher.
pub use tplfactory_dispatch as dispatch;

// Re-export commonly used third-party crates.
pub use serde_json;
pub use tracing;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use tplfactory_core::{
        FactoryError, FactoryResult, Module, ModuleOracle, ModuleRegistry, Page, Settings,
    };
    pub use tplfactory_dispatch::{
        DispatchState, EngineRegistry, EngineResolver, LifecycleDispatcher, RequestContext,
    };
    pub use tplfactory_engines::{
        CacheInvalidatable, EngineConfig, EngineId, TemplateEngine, TemplateVars,
    };
    pub use tplfactory_hooks::{Hook, PageDeleted, PageRender, PageSaved, RequestHooks};
}
