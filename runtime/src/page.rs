//! Page glue: status element, button listeners, DOM readiness, config override.

use bridge_core::{Action, BridgeConfig, BridgeContext, BridgeError, OutputSink};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

/// Global a page can set before loading the module to override defaults
const CONFIG_GLOBAL: &str = "__WEBCHANNEL_BRIDGE_CONFIG__";

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Status element looked up by id on every write
pub struct PageOutput {
    id: String,
}

impl PageOutput {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl OutputSink for PageOutput {
    fn set_text(&self, text: &str) {
        match document().and_then(|d| d.get_element_by_id(&self.id)) {
            Some(element) => element.set_text_content(Some(text)),
            None => log::error!("{}", BridgeError::MissingElement(self.id.clone())),
        }
    }
}

/// Bind the four buttons to their actions.
///
/// All buttons are resolved before any listener is added, so a missing
/// button leaves the page without half its wiring.
pub fn attach_listeners(ctx: &BridgeContext) -> Result<(), BridgeError> {
    let document = document().ok_or_else(|| BridgeError::MissingElement("document".into()))?;

    let buttons = Action::ALL
        .into_iter()
        .map(|action| {
            let id = action.element_id(ctx.config());
            document
                .get_element_by_id(id)
                .map(|button| (action, button))
                .ok_or_else(|| BridgeError::MissingElement(id.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (action, button) in buttons {
        let ctx = ctx.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            // Err means the handler was missing and the page already says so
            if let Ok(completion) = ctx.dispatch(action) {
                spawn_local(completion);
            }
        });
        if let Err(e) =
            button.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        {
            log::error!("failed to bind {:?}: {:?}", action, e);
        }
        // Listeners live as long as the page
        callback.forget();
    }

    log::debug!("attached {} button listeners", Action::ALL.len());
    Ok(())
}

/// Run `f` once the DOM is parsed (immediately if it already is).
pub fn on_dom_ready<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(document) = document() else {
        log::error!("document not available");
        return;
    };

    let ready_state = Reflect::get(&document, &"readyState".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if ready_state != "loading" {
        f();
        return;
    }

    let callback = Closure::once_into_js(f);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        log::error!("failed to wait for DOMContentLoaded: {:?}", e);
    }
}

/// Defaults, overlaid with `window.__WEBCHANNEL_BRIDGE_CONFIG__` when set.
pub fn load_config() -> BridgeConfig {
    let raw = Reflect::get(&js_sys::global(), &CONFIG_GLOBAL.into()).unwrap_or(JsValue::UNDEFINED);
    if raw.is_undefined() || raw.is_null() {
        return BridgeConfig::default();
    }

    match serde_wasm_bindgen::from_value::<BridgeConfig>(raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}; using defaults", BridgeError::Config(e.to_string()));
            BridgeConfig::default()
        }
    }
}
