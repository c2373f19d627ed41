//! Mounted widget registry.
//!
//! `thread_local!` storage (WASM is single-threaded) keeping every mounted
//! widget alive until its host is unmounted. Widget handlers only hold weak
//! references, so releasing an entry drops the widget.

use crate::log_in::LogIn;
use crate::passphrase_input::PassphraseInput;
use crate::show_hide::ShowHideButton;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub enum Widget {
    LogIn(Rc<LogIn>),
    PassphraseInput(Rc<PassphraseInput>),
    ShowHideButton(Rc<ShowHideButton>),
}

/// Owned values keyed by the id written on their host element.
pub struct Registry<W> {
    entries: Vec<(u32, W)>,
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<W> Registry<W> {
    pub fn keep(&mut self, id: u32, value: W) {
        self.entries.push((id, value));
    }

    pub fn release(&mut self, id: u32) -> Option<W> {
        let position = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

thread_local! {
    static MOUNTED: RefCell<Registry<Widget>> = RefCell::new(Registry::default());
    static NEXT_ID: Cell<u32> = const { Cell::new(0) };
}

/// Keep `widget` alive and return the id to write on its host.
pub fn keep(widget: Widget) -> u32 {
    let id = next_id();
    MOUNTED.with(|m| m.borrow_mut().keep(id, widget));
    id
}

/// Take the widget registered under `id` out of the registry.
pub fn release(id: u32) -> Option<Widget> {
    MOUNTED.with(|m| m.borrow_mut().release(id))
}

pub fn mounted() -> usize {
    MOUNTED.with(|m| m.borrow().len())
}

/// Unique suffix for element ids inside a widget.
pub fn next_id() -> u32 {
    NEXT_ID.with(|id| {
        let next = id.get();
        id.set(next + 1);
        next
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_entry_is_dropped_once_handlers_hold_weak_refs() {
        let mut registry = Registry::default();
        let widget = Rc::new(String::from("log-in"));
        let handler_ref = Rc::downgrade(&widget);
        registry.keep(7, widget);
        registry.keep(8, Rc::new(String::from("show-hide")));
        assert!(handler_ref.upgrade().is_some());

        let released = registry.release(7);
        assert!(released.is_some());
        drop(released);
        assert!(handler_ref.upgrade().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn releasing_unknown_id_is_a_no_op() {
        let mut registry: Registry<Rc<String>> = Registry::default();
        registry.keep(1, Rc::new(String::new()));
        assert!(registry.release(2).is_none());
        assert!(registry.release(1).is_some());
        assert!(registry.release(1).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let first = next_id();
        let second = next_id();
        assert_ne!(first, second);
    }
}
