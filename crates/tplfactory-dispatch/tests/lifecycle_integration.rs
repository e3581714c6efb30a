//! Integration tests for engine resolution and lifecycle-hook dispatch.
//!
//! Tests cover: the contact-template scenario, render substitution counts,
//! cache invalidation gated on capability, instance isolation between
//! requests, and concurrent requests binding different templates.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::Value;
use tplfactory_core::{FactoryError, FactoryResult, ModuleRegistry, Page, Settings};
use tplfactory_dispatch::{DispatchState, EngineRegistry, LifecycleDispatcher, RequestContext};
use tplfactory_engines::{
    CacheInvalidatable, EngineConfig, EngineId, PassthroughEngine, TemplateEngine,
};

// ═════════════════════════════════════════════════════════════════════
// Counting engine
// ═════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Counters {
    inits: AtomicUsize,
    renders: AtomicUsize,
    clears: AtomicUsize,
}

/// Serves files like the passthrough engine, counting every call.
struct CountingEngine {
    inner: PassthroughEngine,
    counters: Arc<Counters>,
    cacheable: bool,
}

impl TemplateEngine for CountingEngine {
    fn templates_path(&self) -> &Path {
        self.inner.templates_path()
    }

    fn filename(&self) -> &str {
        self.inner.filename()
    }

    fn init_engine(&mut self) -> FactoryResult<()> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set(&self, key: &str, value: Value) {
        self.inner.set(key, value);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    fn render(&self) -> FactoryResult<String> {
        self.counters.renders.fetch_add(1, Ordering::SeqCst);
        Ok(format!("engine:{}", self.inner.render()?))
    }

    fn as_cache_invalidatable(&self) -> Option<&dyn CacheInvalidatable> {
        if self.cacheable {
            Some(self)
        } else {
            None
        }
    }
}

impl CacheInvalidatable for CountingEngine {
    fn clear_all_cache(&self) -> FactoryResult<()> {
        self.counters.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ═════════════════════════════════════════════════════════════════════
// Helpers
// ═════════════════════════════════════════════════════════════════════

fn counting_registry(counters: &Arc<Counters>, cacheable: bool) -> EngineRegistry {
    let counters = Arc::clone(counters);
    EngineRegistry::builtin().with_constructor(
        EngineId::Tera,
        Arc::new(move |config: EngineConfig| {
            Box::new(CountingEngine {
                inner: PassthroughEngine::new(config),
                counters: Arc::clone(&counters),
                cacheable,
            }) as Box<dyn TemplateEngine>
        }),
    )
}

fn dispatcher_with(root: &Path, engine: &str, registry: EngineRegistry) -> LifecycleDispatcher {
    let mut settings = Settings::default();
    settings.templates_root = root.to_path_buf();
    settings.engine = engine.to_string();

    let mut host = ModuleRegistry::new();
    for module in registry.modules() {
        host.install(Box::new(module));
    }
    host.populate();

    LifecycleDispatcher::new(Arc::new(settings), Arc::new(registry), Arc::new(host)).unwrap()
}

fn write_view(root: &Path, file: &str, body: &str) {
    let views = root.join("views");
    std::fs::create_dir_all(&views).unwrap();
    std::fs::write(views.join(file), body).unwrap();
}

// ═════════════════════════════════════════════════════════════════════
// 1. Contact scenario
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_contact_template_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let contact = Page::new(10, "contact", "contact");

    // No contact.tpl yet: the engine opts out.
    let dispatcher = dispatcher_with(dir.path(), "tera", EngineRegistry::builtin());
    assert!(dispatcher.resolver().resolve("tera", "contact").unwrap().is_none());
    let mut ctx = RequestContext::new(contact.clone());
    assert_eq!(dispatcher.on_ready(&mut ctx).unwrap(), DispatchState::Inactive);
    assert_eq!(ctx.render_page(contact.clone(), "host".into()).unwrap(), "host");

    // With contact.tpl the engine takes over.
    write_view(dir.path(), "contact.tpl", "<form>{{ page.name }}</form>");
    assert!(dispatcher.resolver().resolve("tera", "contact").unwrap().is_some());
    let mut ctx = RequestContext::new(contact.clone());
    assert_eq!(dispatcher.on_ready(&mut ctx).unwrap(), DispatchState::Bound);
    assert_eq!(
        ctx.render_page(contact.clone(), "host".into()).unwrap(),
        "<form>contact</form>"
    );

    // Unregistered identifier.
    assert!(matches!(
        dispatcher.resolver().resolve("engineZ", "contact"),
        Err(FactoryError::NotInstalled(_))
    ));

    // Empty identifier: host rendering untouched.
    let disabled = dispatcher_with(dir.path(), "", EngineRegistry::builtin());
    let mut ctx = RequestContext::new(contact.clone());
    assert_eq!(disabled.on_ready(&mut ctx).unwrap(), DispatchState::Inactive);
    assert_eq!(ctx.render_page(contact, "host".into()).unwrap(), "host");
}

// ═════════════════════════════════════════════════════════════════════
// 2. Render substitution
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_render_called_once_per_render_event() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home");
    let counters = Arc::new(Counters::default());
    let dispatcher = dispatcher_with(dir.path(), "tera", counting_registry(&counters, false));

    let page = Page::new(1, "home", "home");
    let mut ctx = RequestContext::new(page.clone());
    dispatcher.on_ready(&mut ctx).unwrap();
    assert_eq!(counters.inits.load(Ordering::SeqCst), 1);

    assert_eq!(ctx.render_page(page.clone(), "host".into()).unwrap(), "engine:home");
    assert_eq!(counters.renders.load(Ordering::SeqCst), 1);
    ctx.render_page(page, "host".into()).unwrap();
    assert_eq!(counters.renders.load(Ordering::SeqCst), 2);
}

#[test]
fn test_admin_render_leaves_output_and_skips_engine() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home");
    let counters = Arc::new(Counters::default());
    let dispatcher = dispatcher_with(dir.path(), "tera", counting_registry(&counters, false));

    let mut ctx = RequestContext::new(Page::new(1, "home", "home"));
    dispatcher.on_ready(&mut ctx).unwrap();

    let admin = Page::new(2, "settings", "admin");
    assert_eq!(ctx.render_page(admin, "admin".into()).unwrap(), "admin");
    assert_eq!(counters.renders.load(Ordering::SeqCst), 0);
}

// ═════════════════════════════════════════════════════════════════════
// 3. Cache invalidation
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_save_and_delete_each_clear_once_when_capable() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home");
    let counters = Arc::new(Counters::default());
    let dispatcher = dispatcher_with(dir.path(), "tera", counting_registry(&counters, true));

    let mut ctx = RequestContext::new(Page::new(1, "home", "home"));
    dispatcher.on_ready(&mut ctx).unwrap();

    let other = Page::new(5, "news", "article");
    assert_eq!(ctx.page_saved(other.clone()).unwrap(), 1);
    assert_eq!(counters.clears.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.page_deleted(other).unwrap(), 1);
    assert_eq!(counters.clears.load(Ordering::SeqCst), 2);
}

#[test]
fn test_no_invalidation_hooks_without_capability() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home");
    let counters = Arc::new(Counters::default());
    let dispatcher = dispatcher_with(dir.path(), "tera", counting_registry(&counters, false));

    let mut ctx = RequestContext::new(Page::new(1, "home", "home"));
    dispatcher.on_ready(&mut ctx).unwrap();

    let page = Page::new(5, "news", "article");
    assert_eq!(ctx.page_saved(page.clone()).unwrap(), 0);
    assert_eq!(ctx.page_deleted(page).unwrap(), 0);
    assert_eq!(counters.clears.load(Ordering::SeqCst), 0);
}

#[test]
fn test_tera_output_cache_cleared_on_save() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "news.tpl", "v1");
    let mut settings = Settings::default();
    settings.templates_root = dir.path().to_path_buf();
    settings.engine = "tera".to_string();
    settings.engines.get_mut("tera").unwrap().cache_dir = Some("cache".into());

    let registry = EngineRegistry::builtin();
    let mut host = ModuleRegistry::new();
    for module in registry.modules() {
        host.install(Box::new(module));
    }
    let dispatcher =
        LifecycleDispatcher::new(Arc::new(settings), Arc::new(registry), Arc::new(host)).unwrap();
    let page = Page::new(3, "news", "news");

    let mut first = RequestContext::with_request_id("first", page.clone());
    dispatcher.on_ready(&mut first).unwrap();
    assert_eq!(first.render_page(page.clone(), String::new()).unwrap(), "v1");

    write_view(dir.path(), "news.tpl", "v2");
    let mut second = RequestContext::with_request_id("second", page.clone());
    dispatcher.on_ready(&mut second).unwrap();
    assert_eq!(second.render_page(page.clone(), String::new()).unwrap(), "v1");

    second.page_saved(page.clone()).unwrap();
    assert_eq!(second.render_page(page, String::new()).unwrap(), "v2");
}

// ═════════════════════════════════════════════════════════════════════
// 4. Request isolation
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_two_requests_get_independent_instances() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home");
    let counters = Arc::new(Counters::default());
    let dispatcher = dispatcher_with(dir.path(), "tera", counting_registry(&counters, false));

    let page = Page::new(1, "home", "home");
    let mut a = RequestContext::new(page.clone());
    let mut b = RequestContext::new(page);
    dispatcher.on_ready(&mut a).unwrap();
    dispatcher.on_ready(&mut b).unwrap();

    let view_a = a.api("view").unwrap();
    let view_b = b.api("view").unwrap();
    assert!(!Arc::ptr_eq(&view_a, &view_b));
    assert_eq!(counters.inits.load(Ordering::SeqCst), 2);

    view_a.set("only_a", Value::from(true));
    assert!(view_b.get("only_a").is_none());
}

#[test]
fn test_concurrent_requests_bind_their_own_templates() {
    let dir = tempfile::tempdir().unwrap();
    write_view(dir.path(), "home.tpl", "home page");
    write_view(dir.path(), "contact.tpl", "contact page");
    let dispatcher = Arc::new(dispatcher_with(dir.path(), "tera", EngineRegistry::builtin()));

    let handles: Vec<_> = ["home", "contact", "blog"]
        .into_iter()
        .enumerate()
        .map(|(i, template)| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let page = Page::new(i as u64, template, template);
                let mut ctx = RequestContext::new(page.clone());
                let state = dispatcher.on_ready(&mut ctx).unwrap();
                (state, ctx.render_page(page, "host".into()).unwrap())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            (DispatchState::Bound, "home page".to_string()),
            (DispatchState::Bound, "contact page".to_string()),
            (DispatchState::Inactive, "host".to_string()),
        ]
    );
}
