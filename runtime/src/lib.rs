//! WebChannel Bridge - page-side adapter for Qt WebEngine hosts
//!
//! Loaded as a WebAssembly module into a page served by a Qt host. On DOM
//! ready it opens the host's `QWebChannel`, looks up the remote handler
//! object and wires the page buttons to it. Replies land in the status
//! element; diagnostics go to the browser console.

mod channel;
mod console;
mod page;

use std::cell::RefCell;
use std::rc::Rc;

use bridge_core::{BridgeContext, BridgeState, Handshake, Lifecycle, RemoteHandler};
use log::LevelFilter;
use wasm_bindgen::prelude::*;

use crate::channel::JsRemoteHandler;
use crate::page::PageOutput;

thread_local! {
    static LIFECYCLE: RefCell<Option<Lifecycle>> = const { RefCell::new(None) };
    static CONTEXT: RefCell<Option<BridgeContext>> = const { RefCell::new(None) };
}

fn with_lifecycle<R>(f: impl FnOnce(&mut Lifecycle) -> R) -> Option<R> {
    LIFECYCLE.with(|slot| slot.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(LevelFilter::Info);

    let config = Rc::new(page::load_config());
    let output = Rc::new(PageOutput::new(config.elements.output.clone()));
    LIFECYCLE.with(|slot| *slot.borrow_mut() = Some(Lifecycle::new(config, output)));

    page::on_dom_ready(boot);
}

/// Detect the channel library and open the channel.
fn boot() {
    let Some(constructor) = channel::channel_constructor() else {
        with_lifecycle(|lc| lc.channel_missing());
        return;
    };

    if !with_lifecycle(|lc| lc.channel_detected()).unwrap_or(false) {
        return;
    }

    if let Err(e) = channel::open(&constructor, on_channel_ready) {
        log::error!("{}", e);
    }
}

/// Handshake callback; may fire more than once.
fn on_channel_ready(channel: JsValue) {
    let handshake = with_lifecycle(|lc| {
        let handler = channel::lookup_object(&channel, &lc.config().channel.handler_object)
            .map(|object| Rc::new(JsRemoteHandler::new(object)) as Rc<dyn RemoteHandler>);
        lc.handler_resolved(handler)
    });

    let Some(Handshake::Ready(ctx)) = handshake else {
        return;
    };

    if let Err(e) = page::attach_listeners(&ctx) {
        log::error!("{}", e);
    }
    CONTEXT.with(|slot| *slot.borrow_mut() = Some(ctx));
}

/// Current startup state, e.g. `"ready"`.
#[wasm_bindgen]
pub fn bridge_state() -> String {
    with_lifecycle(|lc| lc.state())
        .unwrap_or(BridgeState::Uninitialized)
        .to_string()
}

/// Remote methods the handler exposed at handshake, as an array of names.
#[wasm_bindgen]
pub fn bridge_capabilities() -> JsValue {
    let names = CONTEXT.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|ctx| ctx.capabilities().names())
            .unwrap_or_default()
    });
    serde_wasm_bindgen::to_value(&names).unwrap_or(JsValue::NULL)
}
