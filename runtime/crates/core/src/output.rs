//! Output sink for user-visible status text

use std::cell::RefCell;
use std::rc::Rc;

/// Destination for the single line of status text the page shows
pub trait OutputSink {
    /// Replace the displayed text
    fn set_text(&self, text: &str);
}

impl<T: OutputSink + ?Sized> OutputSink for Rc<T> {
    fn set_text(&self, text: &str) {
        (**self).set_text(text)
    }
}

/// In-memory sink that keeps every write, for headless embedding and tests
#[derive(Clone, Debug, Default)]
pub struct MemoryOutput {
    writes: Rc<RefCell<Vec<String>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text (last write), empty if nothing was written
    pub fn text(&self) -> String {
        self.writes.borrow().last().cloned().unwrap_or_default()
    }

    /// All writes in order
    pub fn history(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl OutputSink for MemoryOutput {
    fn set_text(&self, text: &str) {
        self.writes.borrow_mut().push(text.to_string());
    }
}
