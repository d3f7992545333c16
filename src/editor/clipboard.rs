//! The shared clipboard slot used by copy and paste.
//!
//! The slot holds one serialized subtree. Its emptiness decides whether paste
//! is available at all.

use crate::config::Config;
use std::cell::RefCell;
use std::rc::Rc;

/// A single slot holding a serialized-node payload.
pub trait Clipboard {
    /// Current payload, `None` when the slot is empty.
    fn contents(&self) -> Option<String>;
    fn set_contents(&mut self, payload: String);

    fn is_empty(&self) -> bool {
        self.contents().map_or(true, |payload| payload.is_empty())
    }
}

/// In-process clipboard. Clones share the same slot, so two documents built
/// from clones of one `MemoryClipboard` can copy and paste between each other.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn set_contents(&mut self, payload: String) {
        *self.slot.borrow_mut() = Some(payload);
    }
}

/// The operating system clipboard.
///
/// The system clipboard may be unavailable (headless sessions); reads then
/// report an empty slot and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn contents(&self) -> Option<String> {
        arboard::Clipboard::new().ok()?.get_text().ok()
    }

    fn set_contents(&mut self, payload: String) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            if let Err(err) = clipboard.set_text(payload) {
                tracing::warn!(%err, "failed to write system clipboard");
            }
        }
    }
}

impl Clipboard for Box<dyn Clipboard> {
    fn contents(&self) -> Option<String> {
        (**self).contents()
    }

    fn set_contents(&mut self, payload: String) {
        (**self).set_contents(payload)
    }
}

/// Picks the clipboard the configuration asks for.
pub fn from_config(config: &Config) -> Box<dyn Clipboard> {
    if config.system_clipboard {
        Box::new(SystemClipboard)
    } else {
        Box::new(MemoryClipboard::new())
    }
}
