//! Remote Handler Trait
//!
//! Abstracts the host-side object reached over the channel so the adapter
//! logic can run against the real `QWebChannel` object in the browser and
//! against fakes in tests.

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::capabilities::Capabilities;
use crate::error::BridgeError;

/// Pending result of a remote call.
///
/// The call itself is issued when the trait method is invoked; the future
/// only waits for the completion callback.
pub type RemoteCall<T> = LocalBoxFuture<'static, Result<T, BridgeError>>;

/// Host-side handler exposed over the channel
///
/// Implementations must send the request synchronously inside each method
/// and return a future that resolves when the host answers. Callers rely on
/// that to order UI updates relative to the outgoing call.
pub trait RemoteHandler {
    /// Methods the remote object declared at handshake
    fn capabilities(&self) -> Capabilities;

    /// `process_message(message) -> string`
    fn process_message(&self, message: &str) -> RemoteCall<String>;

    /// `show_dialog(title, message) -> bool`
    fn show_dialog(&self, title: &str, message: &str) -> RemoteCall<bool>;

    /// `get_system_info() -> string`
    fn get_system_info(&self) -> RemoteCall<String>;

    /// `exit_application() -> any`. Only called when [`capabilities`]
    /// lists it.
    ///
    /// [`capabilities`]: RemoteHandler::capabilities
    fn exit_application(&self) -> RemoteCall<Value>;
}
