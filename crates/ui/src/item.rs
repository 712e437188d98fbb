//! Unattached items and their builder.

use crate::anchor::{Anchor, AnchorSpec};
use crate::error::Result;
use crate::event::{Handler, UiEvent};
use crate::margin::Margin;
use std::collections::HashMap;
use std::fmt;

/// Per-frame hook attached to an item.
///
/// Receives the frame delta in seconds and the item's geometry as of the last
/// successful bind (`None` while unbound).
pub trait Behavior {
    /// Advance the item by `dt` seconds.
    fn update(&mut self, dt: f32, geometry: Option<&Anchor>);
}

impl<F> Behavior for F
where
    F: FnMut(f32, Option<&Anchor>),
{
    fn update(&mut self, dt: f32, geometry: Option<&Anchor>) {
        self(dt, geometry)
    }
}

/// A validated item declaration, ready to be attached with
/// [`ItemTree::add_child`](crate::ItemTree::add_child).
pub struct Item {
    pub(crate) spec: AnchorSpec,
    pub(crate) margin: Margin,
    pub(crate) handlers: HashMap<String, Vec<Handler>>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Item {
    /// Start declaring an item.
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    /// Shorthand for a handler-less item.
    pub fn new(spec: AnchorSpec, margin: Margin) -> Result<Self> {
        Self::builder().anchor(spec).margin(margin).build()
    }

    /// Root items skip validation: their rectangle is the viewport.
    pub(crate) fn viewport(spec: AnchorSpec) -> Self {
        Self {
            spec,
            margin: Margin::default(),
            handlers: HashMap::new(),
            behavior: None,
        }
    }

    /// Declared anchors.
    pub fn anchor_spec(&self) -> &AnchorSpec {
        &self.spec
    }

    /// Declared margin.
    pub fn margin(&self) -> &Margin {
        &self.margin
    }

    /// Whether at least one handler is registered for `event`.
    pub fn listens_to(&self, event: &str) -> bool {
        self.handlers.get(event).is_some_and(|list| !list.is_empty())
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        events.sort_unstable();
        f.debug_struct("Item")
            .field("spec", &self.spec)
            .field("margin", &self.margin)
            .field("events", &events)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

/// Builder for [`Item`]; validation happens in [`ItemBuilder::build`].
#[derive(Default)]
pub struct ItemBuilder {
    spec: AnchorSpec,
    margin: Margin,
    handlers: HashMap<String, Vec<Handler>>,
    behavior: Option<Box<dyn Behavior>>,
}

impl ItemBuilder {
    /// Set the anchor declaration.
    pub fn anchor(mut self, spec: AnchorSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Set the margin.
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Register a handler for `event`. Handlers return `true` to consume it.
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&UiEvent) -> bool + 'static,
    {
        self.handlers
            .entry(event.into())
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Attach a per-frame behavior.
    pub fn behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Validate the declaration and produce the item.
    pub fn build(self) -> Result<Item> {
        self.spec.validate()?;
        Ok(Item {
            spec: self.spec,
            margin: self.margin,
            handlers: self.handlers,
            behavior: self.behavior,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn build_rejects_empty_declaration() {
        assert!(matches!(
            Item::builder().build(),
            Err(LayoutError::Validation { .. })
        ));
    }

    #[test]
    fn builder_registers_handlers() {
        let item = Item::builder()
            .anchor(AnchorSpec::fill())
            .on("click", |_| false)
            .build()
            .unwrap();
        assert!(item.listens_to("click"));
        assert!(!item.listens_to("hover"));
        assert!(format!("{item:?}").contains("click"));
    }
}
