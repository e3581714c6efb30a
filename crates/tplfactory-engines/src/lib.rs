//! # tplfactory-engines
//!
//! The template engine interface used by tplfactory's dispatch layer and the
//! engines that ship with it.
//!
//! ## Modules
//!
//! - [`engine`] - [`TemplateEngine`], the optional [`CacheInvalidatable`]
//!   capability, [`EngineId`], and per-instance [`EngineConfig`]
//! - [`passthrough`] - Returns template files verbatim
//! - [`tera_engine`] - Renders with Tera, optionally caching output on disk

pub mod engine;
pub mod passthrough;
pub mod tera_engine;

pub use engine::{CacheInvalidatable, EngineConfig, EngineId, TemplateEngine, TemplateVars};
pub use passthrough::PassthroughEngine;
pub use tera_engine::TeraEngine;
