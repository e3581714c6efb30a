//! Command handlers.
//!
//! Each handler writes its report to the given writer so the binary can print
//! to stdout and tests can capture output.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use serde_json::Value;
use tplfactory_core::checks::{run_checks, CheckLevel};
use tplfactory_core::{ModuleRegistry, Page, Settings};
use tplfactory_dispatch::{DispatchState, EngineRegistry, LifecycleDispatcher, RequestContext};

/// Options of the `render` command.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// The content template to render.
    pub template: String,
    /// Page name; defaults to the template name.
    pub page_name: Option<String>,
    /// Page title; defaults to the page name.
    pub title: Option<String>,
    /// Extra template variables as `key=value` pairs.
    pub vars: Vec<String>,
}

/// Installs every built-in engine into a fresh host module registry.
pub fn host_with_builtin_engines(registry: &EngineRegistry) -> ModuleRegistry {
    let mut host = ModuleRegistry::new();
    for module in registry.modules() {
        host.install(Box::new(module));
    }
    host.populate();
    host
}

/// Lists engine families and marks the configured one.
pub fn engines(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let registry = EngineRegistry::builtin();
    let host = host_with_builtin_engines(&registry);
    let installed = registry.list_installed(&host);

    for (id, name) in registry.list_available() {
        let marker = if settings.engine.trim() == id.slug() { "*" } else { " " };
        let status = if installed.iter().any(|(i, _)| *i == id) {
            "installed"
        } else {
            "missing"
        };
        writeln!(
            out,
            "{marker} {:<12} {:<28} {status}  {}",
            id.slug(),
            name,
            EngineRegistry::class_name_for(id)
        )?;
    }
    Ok(())
}

/// Runs configuration checks. Fails if any check reports an error.
pub fn check(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let registry = EngineRegistry::builtin();
    let messages = run_checks(settings, &registry.slugs());

    for message in &messages {
        writeln!(out, "{message}")?;
    }
    let errors = messages
        .iter()
        .filter(|m| m.level == CheckLevel::Error)
        .count();
    if errors > 0 {
        bail!("{errors} configuration error(s)");
    }
    writeln!(out, "System check identified no errors.")?;
    Ok(())
}

/// Renders one page through a simulated request.
///
/// When no engine applies, the host's default output (empty here) stands and a
/// note is written instead.
pub fn render(
    settings: Settings,
    options: &RenderOptions,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let registry = Arc::new(EngineRegistry::builtin());
    let host = Arc::new(host_with_builtin_engines(&registry));
    let api_var = settings.api_var.clone();
    let dispatcher = LifecycleDispatcher::new(Arc::new(settings), registry, host)?;

    let name = options
        .page_name
        .clone()
        .unwrap_or_else(|| options.template.clone());
    let mut page = Page::new(1, name, options.template.clone());
    if let Some(title) = &options.title {
        page = page.with_title(title.clone());
    }

    let mut ctx = RequestContext::new(page.clone());
    let state = dispatcher
        .on_ready(&mut ctx)
        .with_context(|| format!("dispatching template '{}'", options.template))?;

    if state != DispatchState::Bound {
        writeln!(
            out,
            "No engine template for '{}'; host rendering applies.",
            options.template
        )?;
        return Ok(());
    }

    if let Some(view) = ctx.api(&api_var) {
        for pair in &options.vars {
            let (key, value) = parse_var(pair)?;
            view.set(&key, value);
        }
    }

    let output = ctx.render_page(page, String::new())?;
    out.write_all(output.as_bytes())?;
    Ok(())
}

/// Parses `key=value`. The value is read as JSON when it parses, otherwise as
/// a plain string.
pub fn parse_var(pair: &str) -> anyhow::Result<(String, Value)> {
    let Some((key, raw)) = pair.split_once('=') else {
        bail!("variable '{pair}' is not of the form key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("variable '{pair}' has an empty key");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw));
    Ok((key.to_string(), value))
}
