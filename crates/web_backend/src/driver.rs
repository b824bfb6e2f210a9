//! Glue between browser events and the page controller.
//!
//! The page lives in an `Rc<RefCell<_>>` shared by every listener. After each
//! callback the driver re-arms a single `setTimeout` for the page's next
//! timer deadline, so the browser only wakes us when there is work queued.

use crate::clock;
use crate::document::{WebDocument, js_error};
use anyhow::{Result, anyhow};
use core::cell::RefCell;
use core::time::Duration;
use dom::{NodeKey, Viewport};
use effects::{EffectsConfig, IntersectionEntry, PortfolioPage};
use js_sys::{Array, Reflect};
use log::{debug, error, warn};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Window,
};

pub type SharedDriver = Rc<RefCell<Driver>>;

/// Owns the page and the browser timer that pumps its queue.
pub struct Driver {
    page: PortfolioPage<WebDocument>,
    window: Window,
    origin_ms: f64,
    timeout: Option<i32>,
    pump: Option<Closure<dyn FnMut()>>,
}

impl Driver {
    /// Attach the effects to the window's document and wire every listener.
    ///
    /// # Errors
    ///
    /// Fails when the page lacks the typing element, the config is invalid, or
    /// a listener cannot be registered.
    pub fn mount(window: Window, config: EffectsConfig) -> Result<SharedDriver> {
        let document = window
            .document()
            .ok_or_else(|| anyhow!("window has no document"))?;
        let page = PortfolioPage::attach(WebDocument::new(document)?, config)?;
        let origin_ms = now_ms(&window);
        let shared = Rc::new(RefCell::new(Self {
            page,
            window,
            origin_ms,
            timeout: None,
            pump: None,
        }));

        let weak = Rc::downgrade(&shared);
        let pump = Closure::wrap(Box::new(move || pump_timers(&weak)) as Box<dyn FnMut()>);
        shared.borrow_mut().pump = Some(pump);

        bind_pointer(&shared)?;
        bind_clicks(&shared)?;
        bind_hover(&shared)?;
        bind_animation_end(&shared)?;
        bind_reveal(&shared)?;
        bind_lifecycle(&shared)?;
        debug!("page mounted");
        Ok(shared)
    }

    #[inline]
    #[must_use]
    pub const fn page(&self) -> &PortfolioPage<WebDocument> {
        &self.page
    }

    fn elapsed(&self) -> Duration {
        let millis = (now_ms(&self.window) - self.origin_ms).max(0.0);
        Duration::from_secs_f64(millis / 1000.0)
    }

    /// Replace any pending browser timeout with one for the next deadline.
    fn arm(&mut self) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(pump) = self.pump.as_ref() else {
            return;
        };
        let Some(delay) = clock::timeout_delay(self.page.next_deadline(), self.elapsed()) else {
            return;
        };
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(pump.as_ref().unchecked_ref(), delay)
        {
            Ok(handle) => self.timeout = Some(handle),
            Err(err) => error!("{:#}", js_error("setTimeout", &err)),
        }
    }
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |perf| perf.now())
}

/// Bring the page clock up to now, run `action` against the driver, log its
/// failure, then re-arm the timer. Re-entrant deliveries are dropped.
fn with_driver<F>(shared: &SharedDriver, what: &str, action: F)
where
    F: FnOnce(&mut Driver) -> Result<()>,
{
    let Ok(mut driver) = shared.try_borrow_mut() else {
        warn!("{what}: page busy, event dropped");
        return;
    };
    let now = driver.elapsed();
    clock::catch_up(&mut driver.page, now);
    if let Err(err) = action(&mut driver) {
        error!("{what}: {err:#}");
    }
    driver.arm();
}

fn pump_timers(weak: &Weak<RefCell<Driver>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    // Due tasks already ran in the catch-up.
    with_driver(&shared, "timers", |driver| {
        driver.timeout = None;
        Ok(())
    });
}

fn listen<F>(target: &EventTarget, kind: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(|err| js_error(kind, &err))?;
    callback.forget();
    Ok(())
}

fn listen_passive<F>(target: &EventTarget, kind: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|err| js_error(kind, &err))?;
    callback.forget();
    Ok(())
}

fn client_point(event: &Event) -> (f64, f64) {
    event.dyn_ref::<MouseEvent>().map_or((0.0, 0.0), |mouse| {
        (f64::from(mouse.client_x()), f64::from(mouse.client_y()))
    })
}

fn viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|number| number.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn element_for(shared: &SharedDriver, node: NodeKey) -> Result<Element> {
    shared
        .borrow()
        .page
        .document()
        .element(node)
        .ok_or_else(|| anyhow!("listener target {node:?} vanished"))
}

fn bind_pointer(shared: &SharedDriver) -> Result<()> {
    let window = shared.borrow().window.clone();

    let move_state = Rc::clone(shared);
    listen(&window, "mousemove", move |event| {
        let (x, y) = client_point(&event);
        with_driver(&move_state, "mousemove", |driver| {
            let bounds = viewport(&driver.window);
            driver.page.pointer_move(x, y, bounds)
        });
    })?;

    let scroll_state = Rc::clone(shared);
    listen_passive(&window, "scroll", move |_event| {
        with_driver(&scroll_state, "scroll", |driver| {
            let scroll_y = driver.window.scroll_y().unwrap_or(0.0);
            driver.page.scroll(scroll_y);
            Ok(())
        });
    })
}

fn bind_clicks(shared: &SharedDriver) -> Result<()> {
    let targets = shared.borrow().page.click_targets();
    for node in targets {
        let element = element_for(shared, node)?;
        let state = Rc::clone(shared);
        listen(&element, "click", move |event| {
            let (x, y) = client_point(&event);
            with_driver(&state, "click", |driver| {
                let outcome = driver.page.click(node, x, y)?;
                if outcome.default_prevented {
                    event.prevent_default();
                }
                Ok(())
            });
        })?;
    }
    Ok(())
}

fn bind_hover(shared: &SharedDriver) -> Result<()> {
    let cards = shared.borrow().page.hover_targets().to_vec();
    for node in cards {
        let element = element_for(shared, node)?;
        let enter_state = Rc::clone(shared);
        listen(&element, "mouseenter", move |_event| {
            with_driver(&enter_state, "mouseenter", |driver| {
                driver.page.pointer_enter(node).map(drop)
            });
        })?;
        let leave_state = Rc::clone(shared);
        listen(&element, "mouseleave", move |_event| {
            with_driver(&leave_state, "mouseleave", |driver| {
                driver.page.pointer_leave(node).map(drop)
            });
        })?;
    }
    Ok(())
}

fn bind_animation_end(shared: &SharedDriver) -> Result<()> {
    let document = shared.borrow().page.document().raw().clone();
    let state = Rc::clone(shared);
    listen(&document, "animationend", move |event| {
        let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        with_driver(&state, "animationend", |driver| {
            match driver.page.document().key_of(&target) {
                Some(node) => driver.page.animation_end(node).map(drop),
                None => Ok(()),
            }
        });
    })
}

fn bind_reveal(shared: &SharedDriver) -> Result<()> {
    let (options, targets) = {
        let driver = shared.borrow();
        (
            driver.page.reveal().options(),
            driver.page.reveal().targets().to_vec(),
        )
    };
    if targets.is_empty() {
        return Ok(());
    }

    let state = Rc::clone(shared);
    let callback = Closure::wrap(Box::new(move |records: Array| {
        with_driver(&state, "intersection", |driver| {
            let entries: Vec<IntersectionEntry> = records
                .iter()
                .filter_map(|record| record.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|record| {
                    let target = driver.page.document().key_of(&record.target())?;
                    Some(IntersectionEntry {
                        target,
                        is_intersecting: record.is_intersecting(),
                    })
                })
                .collect();
            driver.page.intersections(&entries).map(drop)
        });
    }) as Box<dyn FnMut(Array)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin());
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(|err| js_error("IntersectionObserver", &err))?;
    callback.forget();

    for node in targets {
        observer.observe(&element_for(shared, node)?);
    }
    Ok(())
}

fn ready_state(document: &web_sys::Document) -> String {
    Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .unwrap_or_default()
}

fn bind_lifecycle(shared: &SharedDriver) -> Result<()> {
    let (window, document) = {
        let driver = shared.borrow();
        (driver.window.clone(), driver.page.document().raw().clone())
    };
    let state = ready_state(&document);

    if state == "loading" {
        let ready_driver = Rc::clone(shared);
        listen(&document, "DOMContentLoaded", move |_event| {
            with_driver(&ready_driver, "DOMContentLoaded", |driver| {
                driver.page.dom_content_loaded()
            });
        })?;
    } else {
        with_driver(shared, "DOMContentLoaded", |driver| driver.page.dom_content_loaded());
    }

    if state == "complete" {
        with_driver(shared, "load", |driver| {
            driver.page.load();
            Ok(())
        });
    } else {
        let load_state = Rc::clone(shared);
        listen(&window, "load", move |_event| {
            with_driver(&load_state, "load", |driver| {
                driver.page.load();
                Ok(())
            });
        })?;
    }
    Ok(())
}

/// Mount once the document has a body: immediately when parsing is done,
/// otherwise on `DOMContentLoaded`.
///
/// # Errors
///
/// Fails when the window has no document or the deferred listener cannot be
/// registered. Mount failures inside the deferred listener are logged.
pub fn mount_when_ready<F>(window: &Window, on_mounted: F, config: EffectsConfig) -> Result<()>
where
    F: FnOnce(SharedDriver) + 'static,
{
    let document = window
        .document()
        .ok_or_else(|| anyhow!("window has no document"))?;
    if document.body().is_some() {
        on_mounted(Driver::mount(window.clone(), config)?);
        return Ok(());
    }

    let deferred_window = window.clone();
    let mut pending = Some((on_mounted, config));
    listen(&document, "DOMContentLoaded", move |_event| {
        let Some((callback, settings)) = pending.take() else {
            return;
        };
        match Driver::mount(deferred_window.clone(), settings) {
            Ok(driver) => callback(driver),
            Err(err) => error!("mount failed: {err:#}"),
        }
    })
}

/// Surface an `anyhow` failure to JS callers.
pub fn to_js(err: &anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}
