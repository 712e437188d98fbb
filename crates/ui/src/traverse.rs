//! Lazy, filtered depth-first traversal used for hit-testing.

use crate::tree::{ItemId, ItemTree};
use glam::Vec2;

/// Which items a [`Traverse`] yields. Both conditions must hold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraversalFilter<'a> {
    /// Only items whose rectangle contains this point (edges included).
    pub pos: Option<Vec2>,
    /// Only items with at least one handler for this event.
    pub listen_to: Option<&'a str>,
}

impl<'a> TraversalFilter<'a> {
    /// Accept everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder: require containment of `pos`.
    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Builder: require a handler for `event`.
    pub fn listening_to(mut self, event: &'a str) -> Self {
        self.listen_to = Some(event);
        self
    }
}

/// Post-order iterator over a subtree.
///
/// Children are visited newest first (reverse insertion order) and each item
/// is yielded after its children, so the starting item comes last. The filter
/// never prunes: descendants of a rejected item are still visited.
pub struct Traverse<'a> {
    tree: &'a ItemTree,
    filter: TraversalFilter<'a>,
    stack: Vec<(ItemId, bool)>,
}

impl<'a> Traverse<'a> {
    fn accepts(&self, id: ItemId) -> bool {
        let Some(node) = self.tree.node(id) else {
            return false;
        };
        let at_pos = match self.filter.pos {
            None => true,
            Some(pos) => node.anchor.is_some_and(|anchor| anchor.contains(pos)),
        };
        let listening = match self.filter.listen_to {
            None => true,
            Some(event) => node.item.listens_to(event),
        };
        at_pos && listening
    }
}

impl Iterator for Traverse<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        while let Some((id, expanded)) = self.stack.pop() {
            if expanded {
                if self.accepts(id) {
                    return Some(id);
                }
                continue;
            }
            self.stack.push((id, true));
            // Pushed in insertion order so the newest child is popped first.
            self.stack
                .extend(self.tree.children(id).map(|child| (child, false)));
        }
        None
    }
}

impl ItemTree {
    /// Traverse the subtree rooted at `from`. Each call starts a fresh walk.
    pub fn traverse<'a>(&'a self, from: ItemId, filter: TraversalFilter<'a>) -> Traverse<'a> {
        let stack = if self.contains(from) {
            vec![(from, false)]
        } else {
            Vec::new()
        };
        Traverse {
            tree: self,
            filter,
            stack,
        }
    }
}
