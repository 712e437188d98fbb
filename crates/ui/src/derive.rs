//! Geometry derivation: resolved references + explicit size + margin -> [`Anchor`].

use crate::anchor::{Anchor, AnchorSpec, AnchorType, Axis};
use crate::margin::Margin;

/// Coordinates of the declared references, indexed by the declaring anchor.
///
/// `values[AnchorType::Top.index()]` holds the coordinate that the item's top
/// edge was bound to, or `None` if the top edge is not declared.
pub type ResolvedRefs = [Option<f32>; 6];

/// Compute an item's anchor.
///
/// Outer edges are derived first, then shrunk by the margin; centers are the
/// midpoints of the shrunk edges, so symmetric margins keep the center while
/// asymmetric ones shift it.
pub fn derive_anchor(
    parent: &Anchor,
    spec: &AnchorSpec,
    values: &ResolvedRefs,
    margin: &Margin,
) -> Anchor {
    let position = spec.position().unwrap_or_default();
    let (left, right) = derive_axis(
        Axis::Horizontal,
        values,
        spec.width(),
        parent.left() + position.x,
    );
    let (top, bottom) = derive_axis(
        Axis::Vertical,
        values,
        spec.height(),
        parent.top() + position.y,
    );

    Anchor::from_edges(
        left + margin.left(),
        right - margin.right(),
        top + margin.top(),
        bottom - margin.bottom(),
    )
}

/// Near/far outer edges of one axis before margins.
fn derive_axis(axis: Axis, values: &ResolvedRefs, size: Option<f32>, origin: f32) -> (f32, f32) {
    let [near, center, far] = axis.anchors().map(|t: AnchorType| values[t.index()]);
    let size = size.unwrap_or(0.0);

    match (near, center, far) {
        (Some(near), _, Some(far)) => (near, far),
        (Some(near), Some(center), None) => (near, 2.0 * center - near),
        (None, Some(center), Some(far)) => (2.0 * center - far, far),
        (Some(near), None, None) => (near, near + size),
        (None, None, Some(far)) => (far - size, far),
        (None, Some(center), None) => (center - size / 2.0, center + size / 2.0),
        (None, None, None) => (origin, origin + size),
    }
}
