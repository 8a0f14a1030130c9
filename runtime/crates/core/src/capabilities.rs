//! Remote method capability descriptor
//!
//! The remote handler is inspected once at handshake time; the resulting
//! set decides optional-method fallbacks for the rest of the page's life.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Methods the bridge knows how to call on the remote handler
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteMethod {
    ProcessMessage,
    ShowDialog,
    GetSystemInfo,
    ExitApplication,
}

impl RemoteMethod {
    pub const ALL: [RemoteMethod; 4] = [
        RemoteMethod::ProcessMessage,
        RemoteMethod::ShowDialog,
        RemoteMethod::GetSystemInfo,
        RemoteMethod::ExitApplication,
    ];

    /// Method name as exposed on the channel object
    pub fn name(self) -> &'static str {
        match self {
            RemoteMethod::ProcessMessage => "process_message",
            RemoteMethod::ShowDialog => "show_dialog",
            RemoteMethod::GetSystemInfo => "get_system_info",
            RemoteMethod::ExitApplication => "exit_application",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Whether the host may legitimately omit this method
    pub fn is_optional(self) -> bool {
        matches!(self, RemoteMethod::ExitApplication)
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of remote methods a handler declared at handshake
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    methods: BTreeSet<RemoteMethod>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known method, including the optional ones
    pub fn all() -> Self {
        RemoteMethod::ALL.into_iter().collect()
    }

    /// Build from method names; unknown names are ignored
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|n| RemoteMethod::from_name(n.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, method: RemoteMethod) {
        self.methods.insert(method);
    }

    pub fn supports(&self, method: RemoteMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Required methods the handler did not declare
    pub fn missing_required(&self) -> Vec<RemoteMethod> {
        RemoteMethod::ALL
            .into_iter()
            .filter(|m| !m.is_optional() && !self.supports(*m))
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.methods.iter().map(|m| m.name()).collect()
    }
}

impl FromIterator<RemoteMethod> for Capabilities {
    fn from_iter<T: IntoIterator<Item = RemoteMethod>>(iter: T) -> Self {
        Self {
            methods: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_ignores_unknown() {
        let caps = Capabilities::from_names(["process_message", "destroyed", "objectName"]);
        assert!(caps.supports(RemoteMethod::ProcessMessage));
        assert_eq!(caps.names(), vec!["process_message"]);
    }

    #[test]
    fn test_missing_required_skips_optional() {
        let caps = Capabilities::from_names(["process_message", "show_dialog", "get_system_info"]);
        assert!(caps.missing_required().is_empty());
        assert!(!caps.supports(RemoteMethod::ExitApplication));

        let partial = Capabilities::from_names(["show_dialog"]);
        assert_eq!(
            partial.missing_required(),
            vec![RemoteMethod::ProcessMessage, RemoteMethod::GetSystemInfo]
        );
    }

    #[test]
    fn test_all_contains_exit() {
        assert!(Capabilities::all().supports(RemoteMethod::ExitApplication));
        assert_eq!(RemoteMethod::from_name("exit_application"), Some(RemoteMethod::ExitApplication));
    }
}
