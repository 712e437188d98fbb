//! Declarative layout documents.
//!
//! A document is plain serde data, so callers can load it from TOML or JSON:
//!
//! ```toml
//! [viewport]
//! width = 800
//! height = 600
//!
//! [[items]]
//! key = "header"
//! height = 40
//! anchor = { left = "parent.left", right = "parent.right", top = "parent.top" }
//!
//! [[items]]
//! key = "body"
//! margin = 8
//! on = ["click"]
//! anchor = { left = "parent.left", right = "parent.right", top = "header.bottom", bottom = "parent.bottom" }
//! ```

use crate::anchor::{AnchorRef, AnchorSpec, AnchorType};
use crate::error::LayoutError;
use crate::item::Item;
use crate::margin::Margin;
use crate::tree::{ItemId, ItemTree};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error building a tree from a document, tagged with the item's path.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {source}")]
pub struct DocumentError {
    /// Path of the offending item.
    pub path: String,
    /// Underlying layout error.
    #[source]
    pub source: LayoutError,
}

/// Size of the root item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Anchors declared by one item, as reference text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorDecl {
    /// Left edge.
    pub left: Option<AnchorRef>,
    /// Horizontal center.
    pub hcenter: Option<AnchorRef>,
    /// Right edge.
    pub right: Option<AnchorRef>,
    /// Top edge.
    pub top: Option<AnchorRef>,
    /// Vertical center.
    pub vcenter: Option<AnchorRef>,
    /// Bottom edge.
    pub bottom: Option<AnchorRef>,
}

/// `margin = 10` or `margin = { left = 4, top = 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginDecl {
    /// Same offset on every side.
    Symmetric(f32),
    /// Per-side offsets; missing sides are zero.
    Sides(Margin),
}

impl From<MarginDecl> for Margin {
    fn from(decl: MarginDecl) -> Self {
        match decl {
            MarginDecl::Symmetric(m) => Margin::symmetric(m),
            MarginDecl::Sides(margin) => margin,
        }
    }
}

/// One item and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDecl {
    /// Key within the parent.
    pub key: String,
    /// Start from the four parent edges; `anchor` entries override.
    #[serde(default)]
    pub fill: bool,
    /// Declared anchors.
    #[serde(default)]
    pub anchor: AnchorDecl,
    /// Explicit width.
    pub width: Option<f32>,
    /// Explicit height.
    pub height: Option<f32>,
    /// Explicit `[x, y]` relative to the parent.
    pub position: Option<[f32; 2]>,
    /// Margin.
    pub margin: Option<MarginDecl>,
    /// Events this item consumes.
    #[serde(default)]
    pub on: Vec<String>,
    /// Child items, in z-order.
    #[serde(default)]
    pub children: Vec<ItemDecl>,
}

impl ItemDecl {
    /// Anchor declaration described by this entry.
    pub fn anchor_spec(&self) -> AnchorSpec {
        let mut spec = if self.fill {
            AnchorSpec::fill()
        } else {
            AnchorSpec::new()
        };
        let declared = [
            (AnchorType::Left, &self.anchor.left),
            (AnchorType::HCenter, &self.anchor.hcenter),
            (AnchorType::Right, &self.anchor.right),
            (AnchorType::Top, &self.anchor.top),
            (AnchorType::VCenter, &self.anchor.vcenter),
            (AnchorType::Bottom, &self.anchor.bottom),
        ];
        for (anchor_type, reference) in declared {
            if let Some(reference) = reference {
                spec = spec.with_anchor(anchor_type, reference.clone());
            }
        }
        if let Some(width) = self.width {
            spec = spec.with_width(width);
        }
        if let Some(height) = self.height {
            spec = spec.with_height(height);
        }
        if let Some([x, y]) = self.position {
            spec = spec.with_position(Vec2::new(x, y));
        }
        spec
    }

    fn to_item(&self) -> Result<Item, LayoutError> {
        let mut builder = Item::builder()
            .anchor(self.anchor_spec())
            .margin(self.margin.map(Margin::from).unwrap_or_default());
        for event in &self.on {
            builder = builder.on(event.clone(), |_| true);
        }
        builder.build()
    }
}

/// A complete layout: optional viewport and the root's children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Root size; callers supply a default when absent.
    pub viewport: Option<Viewport>,
    /// Children of the root, in z-order.
    #[serde(default)]
    pub items: Vec<ItemDecl>,
}

impl LayoutDocument {
    /// Number of declared items, nested ones included.
    pub fn item_count(&self) -> usize {
        fn count(items: &[ItemDecl]) -> usize {
            items.iter().map(|item| 1 + count(&item.children)).sum()
        }
        count(&self.items)
    }

    /// Build an unbound tree. Items are validated as they are attached.
    pub fn build(&self, default_viewport: Viewport) -> Result<ItemTree, DocumentError> {
        let viewport = self.viewport.unwrap_or(default_viewport);
        let mut tree = ItemTree::new(viewport.width, viewport.height);
        let root = tree.root();
        let mut pending: Vec<(ItemId, &ItemDecl)> =
            self.items.iter().rev().map(|decl| (root, decl)).collect();

        while let Some((parent, decl)) = pending.pop() {
            let path = format!("{}/{}", tree.path(parent), decl.key);
            let attach = decl
                .to_item()
                .and_then(|item| tree.add_child(parent, decl.key.as_str(), item));
            let id = attach.map_err(|source| DocumentError { path, source })?;
            pending.extend(decl.children.iter().rev().map(|child| (id, child)));
        }
        Ok(tree)
    }
}
