//! Bridge configuration
//!
//! Every field has a default matching the stock page, so an empty JSON
//! object (or no override at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub channel: ChannelConfig,

    #[serde(default)]
    pub elements: ElementIds,

    #[serde(default)]
    pub messages: MessageDefaults,
}

/// Where to find the remote handler on the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Name of the remote object under `channel.objects`
    #[serde(default = "default_handler_object")]
    pub handler_object: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            handler_object: default_handler_object(),
        }
    }
}

fn default_handler_object() -> String {
    "pythonHandler".to_string()
}

/// DOM element ids the adapter binds to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementIds {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_send_message")]
    pub send_message: String,

    #[serde(default = "default_show_dialog")]
    pub show_dialog: String,

    #[serde(default = "default_system_info")]
    pub system_info: String,

    #[serde(default = "default_exit")]
    pub exit: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            output: default_output(),
            send_message: default_send_message(),
            show_dialog: default_show_dialog(),
            system_info: default_system_info(),
            exit: default_exit(),
        }
    }
}

fn default_output() -> String {
    "response".to_string()
}

fn default_send_message() -> String {
    "callPythonBtn".to_string()
}

fn default_show_dialog() -> String {
    "showDialogBtn".to_string()
}

fn default_system_info() -> String {
    "getSystemInfoBtn".to_string()
}

fn default_exit() -> String {
    "exitAppBtn".to_string()
}

/// Literal arguments the buttons send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDefaults {
    #[serde(default = "default_text_message")]
    pub text_message: String,

    #[serde(default = "default_dialog_title")]
    pub dialog_title: String,

    #[serde(default = "default_dialog_body")]
    pub dialog_body: String,
}

impl Default for MessageDefaults {
    fn default() -> Self {
        Self {
            text_message: default_text_message(),
            dialog_title: default_dialog_title(),
            dialog_body: default_dialog_body(),
        }
    }
}

fn default_text_message() -> String {
    "Hello from JavaScript!".to_string()
}

fn default_dialog_title() -> String {
    "Message from JavaScript".to_string()
}

fn default_dialog_body() -> String {
    "This dialog was triggered from JavaScript!".to_string()
}

impl BridgeConfig {
    /// Parse a configuration from JSON, filling in defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(json).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }

    /// Button ids in the order listeners are attached
    pub fn button_ids(&self) -> [&str; 4] {
        [
            &self.elements.send_message,
            &self.elements.show_dialog,
            &self.elements.system_info,
            &self.elements.exit,
        ]
    }
}
