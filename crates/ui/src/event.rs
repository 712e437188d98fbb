//! Event handlers and first-consumer dispatch.
//!
//! Handlers are plain closures keyed by event name. The traversal's
//! `listen_to` filter only checks that a name has at least one handler;
//! [`ItemTree::dispatch`] is the usual input loop built on top of it.

use crate::error::{LayoutError, Result};
use crate::traverse::TraversalFilter;
use crate::tree::{ItemId, ItemTree};
use glam::Vec2;
use tracing::trace;

/// Event handler. Returns `true` when the event was consumed.
pub type Handler = Box<dyn FnMut(&UiEvent) -> bool>;

/// An input event routed through the item tree.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// Event name handlers are registered under.
    pub name: String,
    /// Pointer position, for positional events.
    pub pos: Option<Vec2>,
}

impl UiEvent {
    /// Event without a position (keyboard, focus, ...).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: None,
        }
    }

    /// Event at a pointer position.
    pub fn at(name: impl Into<String>, pos: Vec2) -> Self {
        Self {
            name: name.into(),
            pos: Some(pos),
        }
    }
}

impl ItemTree {
    /// Register a handler on an attached item.
    pub fn on<F>(&mut self, id: ItemId, event: impl Into<String>, handler: F) -> Result<()>
    where
        F: FnMut(&UiEvent) -> bool + 'static,
    {
        let node = self.node_mut(id).ok_or(LayoutError::StaleItem)?;
        node.item
            .handlers
            .entry(event.into())
            .or_default()
            .push(Box::new(handler));
        Ok(())
    }

    /// Whether the item has a handler for `event`.
    pub fn has_handler(&self, id: ItemId, event: &str) -> bool {
        self.node(id).is_some_and(|node| node.item.listens_to(event))
    }

    /// Number of handlers registered for `event`.
    pub fn handler_count(&self, id: ItemId, event: &str) -> usize {
        self.node(id)
            .and_then(|node| node.item.handlers.get(event))
            .map_or(0, Vec::len)
    }

    /// Drop every handler for `event`; returns how many were removed.
    pub fn clear_handlers(&mut self, id: ItemId, event: &str) -> usize {
        self.node_mut(id)
            .and_then(|node| node.item.handlers.remove(event))
            .map_or(0, |list| list.len())
    }

    /// Offer `event` to every matching item in traversal order until a
    /// handler consumes it. Returns the consuming item.
    pub fn dispatch(&mut self, event: &UiEvent) -> Option<ItemId> {
        let filter = TraversalFilter {
            pos: event.pos,
            listen_to: Some(event.name.as_str()),
        };
        let candidates: Vec<ItemId> = self.traverse(self.root(), filter).collect();

        for id in candidates {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            let Some(handlers) = node.item.handlers.get_mut(&event.name) else {
                continue;
            };
            for handler in handlers.iter_mut() {
                if handler(event) {
                    trace!(event = %event.name, "event consumed");
                    return Some(id);
                }
            }
        }
        None
    }
}
