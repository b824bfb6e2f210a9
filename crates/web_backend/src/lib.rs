//! Browser host for the portfolio effects.
//!
//! Builds to a `cdylib` for `wasm32-unknown-unknown`. With the default
//! `autostart` feature the module mounts itself with default settings when
//! instantiated; otherwise the page calls [`start_with_config`] itself.

use core::cell::RefCell;
use effects::EffectsConfig;
use log::{error, info};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

pub mod clock;
pub mod console;
pub mod document;
pub mod driver;

pub use document::WebDocument;
pub use driver::{Driver, SharedDriver};

thread_local! {
    static MOUNTED: RefCell<Option<SharedDriver>> = const { RefCell::new(None) };
}

fn mount(config: EffectsConfig) -> Result<(), JsValue> {
    if console::init().is_err() {
        info!("logger already installed");
    }
    if MOUNTED.with_borrow(Option::is_some) {
        return Err(JsValue::from_str("folio is already mounted on this page"));
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    driver::mount_when_ready(
        &window,
        |mounted| MOUNTED.with_borrow_mut(|slot| *slot = Some(mounted)),
        config,
    )
    .map_err(|err| {
        error!("mount failed: {err:#}");
        driver::to_js(&err)
    })
}

/// Module start hook: mount with default settings.
///
/// # Errors
///
/// Returns the mount failure as a JS string; it is also logged.
#[cfg_attr(
    all(target_arch = "wasm32", feature = "autostart", not(test)),
    wasm_bindgen(start)
)]
pub fn start() -> Result<(), JsValue> {
    mount(EffectsConfig::default())
}

/// Mount with settings parsed from `config_json` (an `EffectsConfig` object;
/// omitted fields keep their defaults).
///
/// # Errors
///
/// Fails on malformed JSON, invalid settings, or a second mount.
#[wasm_bindgen]
pub fn start_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = EffectsConfig::from_json(config_json).map_err(|err| driver::to_js(&err))?;
    mount(config)
}
