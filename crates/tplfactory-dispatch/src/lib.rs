//! # tplfactory-dispatch
//!
//! Decides, per request, which template engine renders the current page and
//! wires that engine into the host's lifecycle hooks.
//!
//! ## Flow
//!
//! 1. The host creates a [`RequestContext`] for the page being served.
//! 2. On the host's "ready" event it calls [`LifecycleDispatcher::on_ready`], which
//!    asks the [`EngineResolver`] for an engine bound to the page's template.
//! 3. If the template has a source file for the configured engine, the engine is
//!    registered in the context under the configured lookup name and the
//!    render hook is attached, plus save/delete hooks when the engine can
//!    invalidate its cache. Otherwise nothing is attached and the host renders
//!    as usual.
//!
//! ## Modules
//!
//! - [`registry`] - The fixed table of engine families and their constructors
//! - [`resolver`] - Turns an engine identifier and template name into an instance
//! - [`capability`] - Cache-invalidation capability detection
//! - [`context`] - Request-scoped state: bound engine, lookup names, hooks
//! - [`dispatcher`] - The per-request state machine and hook wiring

pub mod capability;
pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod resolver;

pub use capability::supports_invalidation;
pub use context::RequestContext;
pub use dispatcher::{DispatchState, LifecycleDispatcher};
pub use registry::{EngineConstructor, EngineModule, EngineRegistry};
pub use resolver::{EngineResolver, TemplateBinding};
