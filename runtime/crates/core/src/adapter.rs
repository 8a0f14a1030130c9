//! Bridge adapter operations
//!
//! Translates UI intent into remote calls and remote results into the
//! status text. Every operation does its synchronous work (handler check,
//! immediate UI writes, issuing the call) before returning, and hands back a
//! [`Completion`] that applies the result once the host answers.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::capabilities::{Capabilities, RemoteMethod};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::handler::{RemoteCall, RemoteHandler};
use crate::output::OutputSink;

/// Shown when an action runs without a remote handler
pub const HANDLER_UNAVAILABLE: &str = "Error: Python handler not available";
/// Shown once when the handshake finishes without a remote handler
pub const HANDLER_UNAVAILABLE_AT_STARTUP: &str =
    "Error: Python handler not available. Please restart the application.";
pub const DIALOG_SHOWN: &str = "Dialog shown successfully";
pub const DIALOG_FAILED: &str = "Failed to show dialog";
pub const SYSTEM_INFO_PREFIX: &str = "System Info: ";
pub const EXITING: &str = "Exiting application...";
/// Sent through `process_message` when the host has no `exit_application`
pub const EXIT_SENTINEL: &str = "EXIT_APPLICATION";

/// Work left to do once a remote call completes
pub type Completion = LocalBoxFuture<'static, ()>;

/// User actions wired to page buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    SendMessage,
    ShowDialog,
    SystemInfo,
    Exit,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::SendMessage,
        Action::ShowDialog,
        Action::SystemInfo,
        Action::Exit,
    ];

    /// Id of the button that triggers this action
    pub fn element_id(self, config: &BridgeConfig) -> &str {
        match self {
            Action::SendMessage => &config.elements.send_message,
            Action::ShowDialog => &config.elements.show_dialog,
            Action::SystemInfo => &config.elements.system_info,
            Action::Exit => &config.elements.exit,
        }
    }
}

/// Capability object threaded into every event handler.
///
/// Holds the remote handler (absent until a successful handshake), the
/// output sink and the configuration. Cloning is cheap and shares all three.
#[derive(Clone)]
pub struct BridgeContext {
    handler: Option<Rc<dyn RemoteHandler>>,
    capabilities: Capabilities,
    output: Rc<dyn OutputSink>,
    config: Rc<BridgeConfig>,
}

impl BridgeContext {
    /// Context bound to a handler. Capabilities are read once, here.
    pub fn new(
        handler: Rc<dyn RemoteHandler>,
        output: Rc<dyn OutputSink>,
        config: Rc<BridgeConfig>,
    ) -> Self {
        let capabilities = handler.capabilities();
        Self {
            handler: Some(handler),
            capabilities,
            output,
            config,
        }
    }

    /// Context without a handler; every action reports the handler missing
    pub fn detached(output: Rc<dyn OutputSink>, config: Rc<BridgeConfig>) -> Self {
        Self {
            handler: None,
            capabilities: Capabilities::new(),
            output,
            config,
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run the action bound to a button, using the configured arguments
    pub fn dispatch(&self, action: Action) -> Result<Completion, BridgeError> {
        match action {
            Action::SendMessage => self.send_text_message(&self.config.messages.text_message),
            Action::ShowDialog => self.request_dialog(
                &self.config.messages.dialog_title,
                &self.config.messages.dialog_body,
            ),
            Action::SystemInfo => self.request_system_info(),
            Action::Exit => self.request_exit(),
        }
    }

    /// `process_message(message)`; the reply replaces the status text
    pub fn send_text_message(&self, message: &str) -> Result<Completion, BridgeError> {
        let handler = self.require_handler()?;
        let call = handler.process_message(message);
        Ok(self.finish(call, |output, result: String| output.set_text(&result)))
    }

    /// `show_dialog(title, message)`; reports success from the result's truthiness
    pub fn request_dialog(&self, title: &str, message: &str) -> Result<Completion, BridgeError> {
        let handler = self.require_handler()?;
        let call = handler.show_dialog(title, message);
        Ok(self.finish(call, |output, shown: bool| {
            output.set_text(if shown { DIALOG_SHOWN } else { DIALOG_FAILED })
        }))
    }

    /// `get_system_info()`; shows the labelled result
    pub fn request_system_info(&self) -> Result<Completion, BridgeError> {
        let handler = self.require_handler()?;
        let call = handler.get_system_info();
        Ok(self.finish(call, |output, info: String| {
            output.set_text(&format!("{}{}", SYSTEM_INFO_PREFIX, info))
        }))
    }

    /// Ask the host to quit.
    ///
    /// The status text is updated before the call goes out. Uses
    /// `exit_application` when the handler declared it, otherwise sends
    /// [`EXIT_SENTINEL`] through `process_message`. The result is only logged.
    pub fn request_exit(&self) -> Result<Completion, BridgeError> {
        let handler = self.require_handler()?;
        self.output.set_text(EXITING);

        let call: RemoteCall<Value> = if self.capabilities.supports(RemoteMethod::ExitApplication)
        {
            handler.exit_application()
        } else {
            handler
                .process_message(EXIT_SENTINEL)
                .map(|r| r.map(Value::String))
                .boxed_local()
        };

        Ok(async move {
            match call.await {
                Ok(result) => log::info!("Exit result: {}", result),
                Err(e) => log::error!("{}", e),
            }
        }
        .boxed_local())
    }

    fn require_handler(&self) -> Result<&Rc<dyn RemoteHandler>, BridgeError> {
        match &self.handler {
            Some(handler) => Ok(handler),
            None => {
                let err = BridgeError::HandlerUnavailable(self.config.channel.handler_object.clone());
                log::error!("{}", err);
                self.output.set_text(HANDLER_UNAVAILABLE);
                Err(err)
            }
        }
    }

    fn finish<T, F>(&self, call: RemoteCall<T>, apply: F) -> Completion
    where
        T: 'static,
        F: FnOnce(&dyn OutputSink, T) + 'static,
    {
        let output = Rc::clone(&self.output);
        async move {
            match call.await {
                Ok(value) => apply(&*output, value),
                // Transport failures leave the status text alone
                Err(e) => log::error!("{}", e),
            }
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemoryOutput;
    use futures::executor::block_on;
    use futures::future;
    use std::cell::RefCell;

    /// Fake handler that answers immediately and records calls
    #[derive(Default)]
    struct FakeHandler {
        calls: RefCell<Vec<String>>,
        reply: String,
        dialog_result: bool,
        caps: Capabilities,
    }

    impl RemoteHandler for FakeHandler {
        fn capabilities(&self) -> Capabilities {
            self.caps.clone()
        }

        fn process_message(&self, message: &str) -> RemoteCall<String> {
            self.calls.borrow_mut().push(format!("process_message({})", message));
            future::ready(Ok(self.reply.clone())).boxed_local()
        }

        fn show_dialog(&self, title: &str, message: &str) -> RemoteCall<bool> {
            self.calls
                .borrow_mut()
                .push(format!("show_dialog({}, {})", title, message));
            future::ready(Ok(self.dialog_result)).boxed_local()
        }

        fn get_system_info(&self) -> RemoteCall<String> {
            self.calls.borrow_mut().push("get_system_info()".to_string());
            future::ready(Ok(self.reply.clone())).boxed_local()
        }

        fn exit_application(&self) -> RemoteCall<Value> {
            self.calls.borrow_mut().push("exit_application()".to_string());
            future::ready(Ok(Value::Bool(true))).boxed_local()
        }
    }

    fn context_with(handler: Rc<FakeHandler>) -> (BridgeContext, MemoryOutput) {
        let out = MemoryOutput::new();
        let ctx = BridgeContext::new(
            handler,
            Rc::new(out.clone()),
            Rc::new(BridgeConfig::default()),
        );
        (ctx, out)
    }

    #[test]
    fn test_detached_context_rejects_every_action() {
        let out = MemoryOutput::new();
        let ctx = BridgeContext::detached(Rc::new(out.clone()), Rc::new(BridgeConfig::default()));

        for action in Action::ALL {
            let err = ctx.dispatch(action).err().unwrap();
            assert_eq!(err, BridgeError::HandlerUnavailable("pythonHandler".into()));
            assert_eq!(out.text(), HANDLER_UNAVAILABLE);
        }
        assert_eq!(out.history().len(), 4);
    }

    #[test]
    fn test_dispatch_uses_configured_arguments() {
        let handler = Rc::new(FakeHandler {
            caps: Capabilities::all(),
            dialog_result: true,
            ..Default::default()
        });
        let (ctx, _out) = context_with(Rc::clone(&handler));

        block_on(ctx.dispatch(Action::SendMessage).unwrap());
        block_on(ctx.dispatch(Action::ShowDialog).unwrap());

        assert_eq!(
            *handler.calls.borrow(),
            vec![
                "process_message(Hello from JavaScript!)",
                "show_dialog(Message from JavaScript, This dialog was triggered from JavaScript!)",
            ]
        );
    }

    #[test]
    fn test_completion_applies_result_only_when_polled() {
        let handler = Rc::new(FakeHandler {
            reply: "ok".into(),
            ..Default::default()
        });
        let (ctx, out) = context_with(Rc::clone(&handler));

        let completion = ctx.send_text_message("hi").unwrap();
        // Call already issued, UI not yet touched
        assert_eq!(handler.calls.borrow().len(), 1);
        assert!(out.history().is_empty());

        block_on(completion);
        assert_eq!(out.text(), "ok");
    }

    #[test]
    fn test_exit_falls_back_without_capability() {
        let handler = Rc::new(FakeHandler {
            caps: Capabilities::from_names(["process_message"]),
            ..Default::default()
        });
        let (ctx, out) = context_with(Rc::clone(&handler));

        block_on(ctx.request_exit().unwrap());

        assert_eq!(*handler.calls.borrow(), vec!["process_message(EXIT_APPLICATION)"]);
        assert_eq!(out.history(), vec![EXITING]);
    }

    #[test]
    fn test_action_element_ids() {
        let config = BridgeConfig::default();
        let ids: Vec<&str> = Action::ALL.iter().map(|a| a.element_id(&config)).collect();
        assert_eq!(ids, config.button_ids());
    }
}
