//! Bridge Core - platform-independent half of the WebChannel bridge
//!
//! The page-side adapter relays button clicks to a host application over a
//! Qt WebChannel and writes the host's replies into a status element. This
//! crate holds everything that does not touch JavaScript, so it can be
//! tested natively.
//!
//! ## Architecture
//!
//! The bridge uses **traits** at the two places it meets the browser:
//!
//! - [`RemoteHandler`] - the host object reached over the channel
//! - [`OutputSink`] - the element that shows status text
//!
//! [`Lifecycle`] walks startup from page load to a ready [`BridgeContext`],
//! and the context carries the handler into every event callback.

pub mod adapter;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod output;

// Re-export commonly used items
pub use adapter::{
    Action, BridgeContext, Completion, DIALOG_FAILED, DIALOG_SHOWN, EXITING, EXIT_SENTINEL,
    HANDLER_UNAVAILABLE, HANDLER_UNAVAILABLE_AT_STARTUP, SYSTEM_INFO_PREFIX,
};
pub use capabilities::{Capabilities, RemoteMethod};
pub use config::{BridgeConfig, ChannelConfig, ElementIds, MessageDefaults};
pub use error::BridgeError;
pub use handler::{RemoteCall, RemoteHandler};
pub use lifecycle::{BridgeState, Handshake, Lifecycle};
pub use output::{MemoryOutput, OutputSink};
