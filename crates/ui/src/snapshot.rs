//! Serializable view of a tree's geometry for tooling and golden tests.

use crate::anchor::Anchor;
use crate::margin::Margin;
use crate::tree::ItemTree;
use serde::{Deserialize, Serialize};

/// Geometry of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// `/`-separated path from the root.
    pub path: String,
    /// Resolved anchor, `None` if unbound.
    pub anchor: Option<Anchor>,
    /// Declared margin.
    pub margin: Margin,
}

/// Every item of a tree in depth-first pre-order, children in z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Captured items, root first.
    pub items: Vec<ItemSnapshot>,
}

impl LayoutSnapshot {
    /// Capture the current state of `tree`.
    pub fn capture(tree: &ItemTree) -> Self {
        let mut items = Vec::with_capacity(tree.len());
        let mut pending = vec![tree.root()];
        while let Some(id) = pending.pop() {
            items.push(ItemSnapshot {
                path: tree.path(id),
                anchor: tree.anchor(id).copied(),
                margin: tree.margin(id).unwrap_or_default(),
            });
            let mut children: Vec<_> = tree.children(id).collect();
            children.reverse();
            pending.extend(children);
        }
        Self { items }
    }

    /// Snapshot entry for `path`.
    pub fn get(&self, path: &str) -> Option<&ItemSnapshot> {
        self.items.iter().find(|item| item.path == path)
    }

    /// Whether every captured item is bound.
    pub fn is_fully_bound(&self) -> bool {
        self.items.iter().all(|item| item.anchor.is_some())
    }
}
