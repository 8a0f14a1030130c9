//! Startup state machine
//!
//! ```text
//! Uninitialized --channel detected--> AwaitingHandler --handler found--> Ready
//!                                            |
//!                                            +--handler absent--> HandlerMissing
//! ```
//!
//! There are no backward transitions and no retries. [`Handshake::Ready`]
//! is produced exactly once per lifecycle, which is what keeps listener
//! attachment idempotent when the channel callback fires repeatedly.

use std::fmt;
use std::rc::Rc;

use crate::adapter::{BridgeContext, HANDLER_UNAVAILABLE_AT_STARTUP};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::handler::RemoteHandler;
use crate::output::OutputSink;

/// Startup state of the adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    AwaitingHandler,
    Ready,
    /// Handshake completed without the handler object; terminal
    HandlerMissing,
}

impl BridgeState {
    pub fn as_str(self) -> &'static str {
        match self {
            BridgeState::Uninitialized => "uninitialized",
            BridgeState::AwaitingHandler => "awaiting-handler",
            BridgeState::Ready => "ready",
            BridgeState::HandlerMissing => "handler-missing",
        }
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a handshake callback
pub enum Handshake {
    /// First successful handshake; attach listeners with this context
    Ready(BridgeContext),
    /// Already set up by an earlier callback; nothing to do
    AlreadyReady,
    /// Handler object absent; the startup error has been shown
    HandlerMissing,
    /// Callback arrived in a state that does not accept it
    Ignored(BridgeState),
}

/// Drives startup from page load to a ready [`BridgeContext`]
pub struct Lifecycle {
    state: BridgeState,
    config: Rc<BridgeConfig>,
    output: Rc<dyn OutputSink>,
}

impl Lifecycle {
    pub fn new(config: Rc<BridgeConfig>, output: Rc<dyn OutputSink>) -> Self {
        Self {
            state: BridgeState::Uninitialized,
            config,
            output,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn config(&self) -> &Rc<BridgeConfig> {
        &self.config
    }

    /// The channel constructor exists. Returns false if startup already
    /// moved past this point, so the caller does not open a second channel.
    pub fn channel_detected(&mut self) -> bool {
        if self.state != BridgeState::Uninitialized {
            log::debug!("channel already detected (state: {})", self.state);
            return false;
        }
        self.state = BridgeState::AwaitingHandler;
        true
    }

    /// The channel constructor is missing; the adapter stays inert
    pub fn channel_missing(&self) -> BridgeError {
        let err = BridgeError::ChannelUnavailable;
        log::error!("QWebChannel not loaded");
        err
    }

    /// Handshake finished; `handler` is the named object if the host exposed it
    pub fn handler_resolved(&mut self, handler: Option<Rc<dyn RemoteHandler>>) -> Handshake {
        match self.state {
            BridgeState::AwaitingHandler => {}
            BridgeState::Ready => return Handshake::AlreadyReady,
            other => {
                log::debug!("handshake ignored in state {}", other);
                return Handshake::Ignored(other);
            }
        }

        let name = &self.config.channel.handler_object;
        match handler {
            Some(handler) => {
                let ctx = BridgeContext::new(handler, Rc::clone(&self.output), Rc::clone(&self.config));
                let missing = ctx.capabilities().missing_required();
                if !missing.is_empty() {
                    log::warn!(
                        "{} does not declare: {}",
                        name,
                        missing.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
                    );
                }
                log::info!("QWebChannel initialized successfully with {}", name);
                self.state = BridgeState::Ready;
                Handshake::Ready(ctx)
            }
            None => {
                log::error!("{} not available in QWebChannel", name);
                self.output.set_text(HANDLER_UNAVAILABLE_AT_STARTUP);
                self.state = BridgeState::HandlerMissing;
                Handshake::HandlerMissing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::handler::RemoteCall;
    use crate::output::MemoryOutput;
    use futures::{future, FutureExt};
    use serde_json::Value;

    struct NullHandler;

    impl RemoteHandler for NullHandler {
        fn capabilities(&self) -> Capabilities {
            Capabilities::all()
        }

        fn process_message(&self, _message: &str) -> RemoteCall<String> {
            future::ready(Ok(String::new())).boxed_local()
        }

        fn show_dialog(&self, _title: &str, _message: &str) -> RemoteCall<bool> {
            future::ready(Ok(false)).boxed_local()
        }

        fn get_system_info(&self) -> RemoteCall<String> {
            future::ready(Ok(String::new())).boxed_local()
        }

        fn exit_application(&self) -> RemoteCall<Value> {
            future::ready(Ok(Value::Null)).boxed_local()
        }
    }

    fn lifecycle() -> (Lifecycle, MemoryOutput) {
        let out = MemoryOutput::new();
        let lc = Lifecycle::new(Rc::new(BridgeConfig::default()), Rc::new(out.clone()));
        (lc, out)
    }

    #[test]
    fn test_happy_path_reaches_ready_once() {
        let (mut lc, out) = lifecycle();
        assert_eq!(lc.state(), BridgeState::Uninitialized);

        assert!(lc.channel_detected());
        assert_eq!(lc.state(), BridgeState::AwaitingHandler);

        assert!(matches!(lc.handler_resolved(Some(Rc::new(NullHandler))), Handshake::Ready(_)));
        assert_eq!(lc.state(), BridgeState::Ready);

        // Repeated callbacks never produce a second context
        assert!(matches!(lc.handler_resolved(Some(Rc::new(NullHandler))), Handshake::AlreadyReady));
        assert!(matches!(lc.handler_resolved(None), Handshake::AlreadyReady));
        assert!(out.history().is_empty());
    }

    #[test]
    fn test_second_channel_detection_is_rejected() {
        let (mut lc, _out) = lifecycle();
        assert!(lc.channel_detected());
        assert!(!lc.channel_detected());
    }

    #[test]
    fn test_missing_handler_is_terminal() {
        let (mut lc, out) = lifecycle();
        lc.channel_detected();

        assert!(matches!(lc.handler_resolved(None), Handshake::HandlerMissing));
        assert_eq!(lc.state(), BridgeState::HandlerMissing);
        assert_eq!(out.text(), HANDLER_UNAVAILABLE_AT_STARTUP);

        // No recovery even if a later callback carries the handler
        assert!(matches!(
            lc.handler_resolved(Some(Rc::new(NullHandler))),
            Handshake::Ignored(BridgeState::HandlerMissing)
        ));
        assert_eq!(out.history().len(), 1);
    }

    #[test]
    fn test_handshake_before_detection_is_ignored() {
        let (mut lc, _out) = lifecycle();
        assert!(matches!(
            lc.handler_resolved(Some(Rc::new(NullHandler))),
            Handshake::Ignored(BridgeState::Uninitialized)
        ));
        assert_eq!(lc.channel_missing(), BridgeError::ChannelUnavailable);
        assert_eq!(lc.state(), BridgeState::Uninitialized);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(BridgeState::AwaitingHandler.to_string(), "awaiting-handler");
        assert_eq!(BridgeState::Ready.as_str(), "ready");
    }
}
