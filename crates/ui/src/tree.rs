//! The item tree: arena ownership, scope invalidation and binding.
//!
//! Items live in generation-checked slots owned by [`ItemTree`]. A node knows
//! its parent only through a copyable [`ItemId`], so the ownership tree stays
//! a tree no matter how anchors reference each other. Sibling references form
//! a separate graph that the resolver rebuilds for each scope during bind.

use crate::anchor::{Anchor, AnchorSpec, AnchorTarget, PARENT_TARGET};
use crate::derive::{derive_anchor, ResolvedRefs};
use crate::error::{LayoutError, Result};
use crate::item::Item;
use crate::margin::Margin;
use crate::resolver::{evaluation_order, ScopeEntry};
use glam::Vec2;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Key of the root item in paths.
pub const ROOT_KEY: &str = "root";

/// Handle to an item attached to an [`ItemTree`].
///
/// Handles of detached items are rejected rather than aliasing a newer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    index: u32,
    generation: u32,
}

pub(crate) struct Node {
    pub(crate) key: String,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: IndexMap<String, ItemId>,
    pub(crate) item: Item,
    pub(crate) anchor: Option<Anchor>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owner of every item reachable from one root.
///
/// Not thread-safe: handlers are `FnMut` closures and all mutation is
/// expected to happen on the UI thread.
pub struct ItemTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ItemId,
    len: usize,
}

impl ItemTree {
    /// Create a tree whose root covers a `width` x `height` viewport at the origin.
    pub fn new(width: f32, height: f32) -> Self {
        let spec = viewport_spec(width, height);
        let anchor = Anchor::from_rect(Vec2::ZERO, width, height);
        let root_node = Node {
            key: ROOT_KEY.to_string(),
            parent: None,
            children: IndexMap::new(),
            item: Item::viewport(spec),
            anchor: Some(anchor),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: ItemId {
                index: 0,
                generation: 0,
            },
            len: 1,
        }
    }

    /// The root item.
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Number of live items, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` refers to a live item.
    pub fn contains(&self, id: ItemId) -> bool {
        self.node(id).is_some()
    }

    /// Resize the viewport. Everything below the root becomes unbound.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let root = self.root;
        if let Some(node) = self.node_mut(root) {
            node.item.spec = viewport_spec(width, height);
            node.anchor = Some(Anchor::from_rect(Vec2::ZERO, width, height));
        }
        self.invalidate_below(root);
    }

    /// Attach `item` under `parent` as its newest (topmost) child.
    pub fn add_child(&mut self, parent: ItemId, key: impl Into<String>, item: Item) -> Result<ItemId> {
        let key = key.into();
        validate_key(&key)?;
        let parent_node = self.node(parent).ok_or(LayoutError::StaleItem)?;
        if parent_node.children.contains_key(&key) {
            return Err(LayoutError::DuplicateKey {
                parent: self.path(parent),
                key,
            });
        }

        let id = self.alloc(Node {
            key: key.clone(),
            parent: Some(parent),
            children: IndexMap::new(),
            item,
            anchor: None,
        });
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.insert(key, id);
        }
        self.invalidate_below(parent);
        Ok(id)
    }

    /// Detach and drop the child registered under `key`, with its subtree.
    ///
    /// Returns `false` when `parent` has no such child.
    pub fn remove_child(&mut self, parent: ItemId, key: &str) -> Result<bool> {
        let parent_node = self.node_mut(parent).ok_or(LayoutError::StaleItem)?;
        let Some(child) = parent_node.children.shift_remove(key) else {
            return Ok(false);
        };

        let mut pending = vec![child];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.release(id) {
                pending.extend(node.children.values().copied());
            }
        }
        self.invalidate_below(parent);
        Ok(true)
    }

    /// Replace an item's anchor declaration. Its whole scope becomes unbound.
    pub fn set_anchor_spec(&mut self, id: ItemId, spec: AnchorSpec) -> Result<()> {
        spec.validate()?;
        let parent = self.scope_of(id)?;
        if let Some(node) = self.node_mut(id) {
            node.item.spec = spec;
        }
        self.invalidate_below(parent);
        Ok(())
    }

    /// Replace an item's margin. Its whole scope becomes unbound.
    pub fn set_margin(&mut self, id: ItemId, margin: Margin) -> Result<()> {
        let parent = self.scope_of(id)?;
        if let Some(node) = self.node_mut(id) {
            node.item.margin = margin;
        }
        self.invalidate_below(parent);
        Ok(())
    }

    /// Parent of `id`; `None` for the root or a stale handle.
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Key the item is registered under.
    pub fn key(&self, id: ItemId) -> Option<&str> {
        self.node(id).map(|node| node.key.as_str())
    }

    /// Children in insertion (z-)order.
    pub fn children(&self, id: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.children.values().copied())
    }

    /// Child registered under `key`.
    pub fn child(&self, id: ItemId, key: &str) -> Option<ItemId> {
        self.node(id)?.children.get(key).copied()
    }

    /// Find an item by a `/`-separated path of keys relative to the root.
    ///
    /// The empty path and `"root"` name the root itself.
    pub fn lookup(&self, path: &str) -> Option<ItemId> {
        let path = path.trim_matches('/');
        let path = path
            .strip_prefix(ROOT_KEY)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(path);
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root, |id, segment| self.child(id, segment))
    }

    /// `/`-separated keys from the root down to `id`, e.g. `root/menu/button`.
    pub fn path(&self, id: ItemId) -> String {
        let mut keys = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            keys.push(node.key.as_str());
            cursor = node.parent;
        }
        keys.reverse();
        keys.join("/")
    }

    /// Declared anchors of an item.
    pub fn anchor_spec(&self, id: ItemId) -> Option<&AnchorSpec> {
        self.node(id).map(|node| &node.item.spec)
    }

    /// Declared margin of an item.
    pub fn margin(&self, id: ItemId) -> Option<Margin> {
        self.node(id).map(|node| node.item.margin)
    }

    /// Resolved anchor; `None` until a bind covering the item succeeds.
    pub fn anchor(&self, id: ItemId) -> Option<&Anchor> {
        self.node(id)?.anchor.as_ref()
    }

    /// Whether the item currently has trustworthy geometry.
    pub fn is_bound(&self, id: ItemId) -> bool {
        self.anchor(id).is_some()
    }

    /// Top-left corner of a bound item.
    pub fn position(&self, id: ItemId) -> Option<Vec2> {
        self.anchor(id).map(Anchor::position)
    }

    /// Width of a bound item.
    pub fn width(&self, id: ItemId) -> Option<f32> {
        self.anchor(id).map(Anchor::width)
    }

    /// Height of a bound item.
    pub fn height(&self, id: ItemId) -> Option<f32> {
        self.anchor(id).map(Anchor::height)
    }

    /// Resolve the whole tree.
    pub fn bind(&mut self) -> Result<()> {
        self.bind_subtree(self.root)
    }

    /// Resolve everything below `id`, which must itself be bound.
    ///
    /// Scopes are resolved top-down. On failure the walk stops: the failing
    /// scope and every scope not yet reached stay unbound.
    pub fn bind_subtree(&mut self, id: ItemId) -> Result<()> {
        let node = self.node(id).ok_or(LayoutError::StaleItem)?;
        if node.anchor.is_none() {
            return Err(LayoutError::Unbound(self.path(id)));
        }
        self.invalidate_below(id);

        let mut scopes = vec![id];
        while let Some(scope) = scopes.pop() {
            if let Err(err) = self.bind_scope(scope) {
                warn!(scope = %self.path(scope), error = %err, "layout bind failed");
                return Err(err);
            }
            let mut children: Vec<ItemId> = self.children(scope).collect();
            children.reverse();
            scopes.extend(children);
        }
        Ok(())
    }

    /// Per-frame update of every item's behavior, parents before children.
    pub fn update(&mut self, dt: f32) {
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            let geometry = node.anchor;
            if let Some(behavior) = node.item.behavior.as_mut() {
                behavior.update(dt, geometry.as_ref());
            }
            pending.extend(node.children.values().rev().copied());
        }
    }

    fn bind_scope(&mut self, parent: ItemId) -> Result<()> {
        let results = self.resolve_scope(parent)?;
        for (id, anchor) in results {
            if let Some(node) = self.node_mut(id) {
                node.anchor = Some(anchor);
            }
        }
        Ok(())
    }

    /// Compute anchors for the children of `parent` without touching the tree.
    fn resolve_scope(&self, parent: ItemId) -> Result<Vec<(ItemId, Anchor)>> {
        let parent_node = self.node(parent).ok_or(LayoutError::StaleItem)?;
        if parent_node.children.is_empty() {
            return Ok(Vec::new());
        }
        let parent_anchor = parent_node
            .anchor
            .ok_or_else(|| LayoutError::Unbound(self.path(parent)))?;
        let scope = self.path(parent);

        let members: Vec<(ItemId, &Node)> = parent_node
            .children
            .values()
            .filter_map(|&id| self.node(id).map(|node| (id, node)))
            .collect();
        let entries: Vec<ScopeEntry<'_>> = members
            .iter()
            .map(|(_, node)| ScopeEntry {
                key: &node.key,
                spec: &node.item.spec,
            })
            .collect();
        let order = evaluation_order(&scope, &entries)?;

        let slot_of: HashMap<&str, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key, i))
            .collect();
        let mut resolved: Vec<Option<Anchor>> = vec![None; members.len()];

        for &i in &order {
            let node = members[i].1;
            let mut values: ResolvedRefs = [None; 6];
            for (anchor_type, reference) in node.item.spec.references() {
                let source = match reference.target() {
                    AnchorTarget::Parent => parent_anchor,
                    AnchorTarget::Sibling(key) => slot_of
                        .get(key.as_str())
                        .and_then(|&slot| resolved[slot])
                        .ok_or_else(|| LayoutError::Unbound(format!("{scope}/{key}")))?,
                };
                values[anchor_type.index()] = Some(source[reference.anchor()]);
            }
            resolved[i] = Some(derive_anchor(
                &parent_anchor,
                &node.item.spec,
                &values,
                &node.item.margin,
            ));
        }

        debug!(
            scope = %scope,
            order = ?order.iter().map(|&i| entries[i].key).collect::<Vec<_>>(),
            "resolved layout scope"
        );

        Ok(members
            .iter()
            .zip(resolved)
            .filter_map(|((id, _), anchor)| anchor.map(|anchor| (*id, anchor)))
            .collect())
    }

    /// Mark every descendant of `id` as unbound.
    fn invalidate_below(&mut self, id: ItemId) {
        let mut pending: Vec<ItemId> = self.children(id).collect();
        let mut count = 0usize;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.node_mut(current) {
                node.anchor = None;
                pending.extend(node.children.values().copied());
                count += 1;
            }
        }
        trace!(scope = %self.path(id), count, "invalidated layout");
    }

    /// Parent whose scope contains `id`; the root has none.
    fn scope_of(&self, id: ItemId) -> Result<ItemId> {
        let node = self.node(id).ok_or(LayoutError::StaleItem)?;
        node.parent.ok_or(LayoutError::RootGeometry)
    }

    pub(crate) fn node(&self, id: ItemId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: ItemId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn alloc(&mut self, node: Node) -> ItemId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return ItemId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ItemId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: ItemId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }
}

impl std::fmt::Debug for ItemTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemTree")
            .field("len", &self.len)
            .field("root", &self.anchor(self.root))
            .finish()
    }
}

fn viewport_spec(width: f32, height: f32) -> AnchorSpec {
    AnchorSpec::new()
        .with_position(Vec2::ZERO)
        .with_size(width, height)
}

fn validate_key(key: &str) -> Result<()> {
    let reserved = key == PARENT_TARGET || key.contains('.') || key.contains('/');
    if key.is_empty() || key.trim() != key || reserved {
        return Err(LayoutError::InvalidKey(key.to_string()));
    }
    Ok(())
}
