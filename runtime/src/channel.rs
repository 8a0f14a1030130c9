//! QWebChannel access.
//!
//! The channel library (`qwebchannel.js`) and its transport
//! (`qt.webChannelTransport`) are injected by the host. This module finds
//! them on the global object, opens the channel, and wraps the named remote
//! object in a [`RemoteHandler`].

use bridge_core::{BridgeError, Capabilities, RemoteCall, RemoteHandler, RemoteMethod};
use futures::{future, FutureExt};
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const CHANNEL_CONSTRUCTOR: &str = "QWebChannel";

/// The global `QWebChannel` constructor, if the host injected it.
pub fn channel_constructor() -> Option<Function> {
    Reflect::get(&js_sys::global(), &CHANNEL_CONSTRUCTOR.into())
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// `qt.webChannelTransport`
fn transport() -> Result<JsValue, BridgeError> {
    let qt = Reflect::get(&js_sys::global(), &"qt".into())
        .map_err(|_| BridgeError::ChannelUnavailable)?;
    if qt.is_undefined() || qt.is_null() {
        return Err(BridgeError::ChannelUnavailable);
    }

    let transport = Reflect::get(&qt, &"webChannelTransport".into())
        .map_err(|_| BridgeError::ChannelUnavailable)?;
    if transport.is_undefined() || transport.is_null() {
        return Err(BridgeError::ChannelUnavailable);
    }
    Ok(transport)
}

/// `new QWebChannel(qt.webChannelTransport, on_ready)`.
///
/// `on_ready` receives the channel every time the library invokes the
/// handshake callback; deduplication is the caller's job.
pub fn open<F>(constructor: &Function, on_ready: F) -> Result<(), BridgeError>
where
    F: FnMut(JsValue) + 'static,
{
    let transport = transport()?;
    let callback = Closure::<dyn FnMut(JsValue)>::new(on_ready);

    let args = Array::of2(&transport, callback.as_ref());
    Reflect::construct(constructor, &args).map_err(|e| {
        log::error!("new QWebChannel failed: {}", describe(&e));
        BridgeError::ChannelUnavailable
    })?;

    // Owned by the channel for the page lifetime
    callback.forget();
    Ok(())
}

/// `channel.objects[name]`, if present and an object.
pub fn lookup_object(channel: &JsValue, name: &str) -> Option<Object> {
    let objects = Reflect::get(channel, &"objects".into()).ok()?;
    if objects.is_undefined() || objects.is_null() {
        return None;
    }
    let object = Reflect::get(&objects, &name.into()).ok()?;
    if !object.is_object() {
        return None;
    }
    Some(object.unchecked_into())
}

/// Which known methods the remote object exposes as functions.
pub fn detect_capabilities(object: &Object) -> Capabilities {
    RemoteMethod::ALL
        .into_iter()
        .filter(|method| {
            Reflect::get(object, &method.name().into())
                .map(|v| v.is_function())
                .unwrap_or(false)
        })
        .collect()
}

/// Remote handler backed by a `QWebChannel` object.
pub struct JsRemoteHandler {
    object: Object,
    capabilities: Capabilities,
}

impl JsRemoteHandler {
    /// Wrap a channel object. Capabilities are probed once, here.
    pub fn new(object: Object) -> Self {
        let capabilities = detect_capabilities(&object);
        Self {
            object,
            capabilities,
        }
    }

    /// Call `object[method](...args, callback)`.
    ///
    /// The call is issued before this returns; the future resolves with the
    /// value the host passes to the callback.
    fn invoke(&self, method: RemoteMethod, args: &[JsValue]) -> RemoteCall<JsValue> {
        let name = method.name();

        let issued = Reflect::get(&self.object, &name.into())
            .and_then(|f| f.dyn_into::<Function>())
            .and_then(|function| {
                let mut outcome = Ok(JsValue::UNDEFINED);
                // The executor runs synchronously, so the call goes out now
                let promise = Promise::new(&mut |resolve, _reject| {
                    let call_args: Array = args.iter().collect();
                    call_args.push(&resolve);
                    outcome = function.apply(&self.object, &call_args);
                });
                outcome.map(|_| promise)
            });

        match issued {
            Ok(promise) => JsFuture::from(promise)
                .map(move |r| r.map_err(|e| BridgeError::remote(name, describe(&e))))
                .boxed_local(),
            Err(e) => future::ready(Err(BridgeError::remote(name, describe(&e)))).boxed_local(),
        }
    }
}

impl RemoteHandler for JsRemoteHandler {
    fn capabilities(&self) -> Capabilities {
        self.capabilities.clone()
    }

    fn process_message(&self, message: &str) -> RemoteCall<String> {
        self.invoke(RemoteMethod::ProcessMessage, &[JsValue::from_str(message)])
            .map(|r| r.map(to_text))
            .boxed_local()
    }

    fn show_dialog(&self, title: &str, message: &str) -> RemoteCall<bool> {
        self.invoke(
            RemoteMethod::ShowDialog,
            &[JsValue::from_str(title), JsValue::from_str(message)],
        )
        .map(|r| r.map(|v| v.is_truthy()))
        .boxed_local()
    }

    fn get_system_info(&self) -> RemoteCall<String> {
        self.invoke(RemoteMethod::GetSystemInfo, &[])
            .map(|r| r.map(to_text))
            .boxed_local()
    }

    fn exit_application(&self) -> RemoteCall<Value> {
        self.invoke(RemoteMethod::ExitApplication, &[])
            .map(|r| r.map(to_json))
            .boxed_local()
    }
}

/// Text the page would show for a value assigned to `textContent`.
pub fn to_text(value: JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_undefined() || value.is_null() {
        return String::new();
    }
    js_sys::JSON::stringify(&value)
        .map(String::from)
        .unwrap_or_default()
}

fn to_json(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
