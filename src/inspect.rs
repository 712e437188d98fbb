//! Commands of the layout inspector. Each returns the text to print.

use anyhow::{Context, Result};
use glam::Vec2;
use std::{fmt::Write as _, fs, path::Path};
use surviveler_ui::{ItemTree, LayoutDocument, LayoutSnapshot, TraversalFilter, UiEvent};
use tracing::info;

use crate::config::InspectorConfig;

/// Parse a layout document; `.json` files use JSON, everything else TOML.
pub fn load_document(path: &Path) -> Result<LayoutDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON layout {}", path.display()))?
    } else {
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML layout {}", path.display()))?
    };
    Ok(document)
}

fn build_bound(document: &LayoutDocument, config: &InspectorConfig) -> Result<ItemTree> {
    let mut tree = document.build(config.viewport())?;
    tree.bind().context("Failed to bind layout")?;
    info!(items = document.item_count(), "layout bound");
    Ok(tree)
}

pub fn check(path: &Path, config: &InspectorConfig) -> Result<String> {
    let document = load_document(path)?;
    build_bound(&document, config)?;
    Ok(format!("ok ({} items)\n", document.item_count()))
}

pub fn bind(path: &Path, json: bool, config: &InspectorConfig) -> Result<String> {
    let document = load_document(path)?;
    let tree = build_bound(&document, config)?;
    let snapshot = LayoutSnapshot::capture(&tree);
    if json {
        let mut text = if config.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        text.push('\n');
        return Ok(text);
    }
    render_table(&snapshot)
}

pub fn hit(path: &Path, pos: Vec2, event: Option<&str>, config: &InspectorConfig) -> Result<String> {
    let document = load_document(path)?;
    let mut tree = build_bound(&document, config)?;

    let mut filter = TraversalFilter::all().at(pos);
    if let Some(event) = event {
        filter = filter.listening_to(event);
    }
    let mut out = String::new();
    for id in tree.traverse(tree.root(), filter) {
        writeln!(out, "{}", tree.path(id))?;
    }

    if let Some(event) = event {
        let consumer = tree.dispatch(&UiEvent::at(event, pos));
        let name = consumer.map_or_else(|| "none".to_string(), |id| tree.path(id));
        writeln!(out, "consumed by: {name}")?;
    }
    Ok(out)
}

/// One line per item: path, origin and size.
pub fn render_table(snapshot: &LayoutSnapshot) -> Result<String> {
    let width = snapshot
        .items
        .iter()
        .map(|item| item.path.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for item in &snapshot.items {
        match item.anchor {
            Some(anchor) => writeln!(
                out,
                "{:<width$}  x={:<8} y={:<8} w={:<8} h={}",
                item.path,
                anchor.left(),
                anchor.top(),
                anchor.width(),
                anchor.height(),
            )?,
            None => writeln!(out, "{:<width$}  unbound", item.path)?,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surviveler_ui::{AnchorSpec, Item, Margin};

    #[test]
    fn table_lists_every_item() {
        let mut tree = ItemTree::new(100.0, 50.0);
        let root = tree.root();
        tree.add_child(root, "panel", Item::new(AnchorSpec::fill(), Margin::symmetric(5.0)).unwrap())
            .unwrap();
        let unbound = render_table(&LayoutSnapshot::capture(&tree)).unwrap();
        assert!(unbound.contains("root/panel  unbound"));

        tree.bind().unwrap();
        let table = render_table(&LayoutSnapshot::capture(&tree)).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("root        x=0"));
        assert!(lines[1].contains("x=5 "));
        assert!(lines[1].ends_with("h=40"));
    }
}
