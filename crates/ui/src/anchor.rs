//! Anchor types, resolved anchors and the declarative [`AnchorSpec`].
//!
//! An item's rectangle is never stored directly. Instead each of the six
//! [`AnchorType`]s may reference an anchor of the parent or of a sibling
//! (`"parent.left"`, `"header.bottom"`), and explicit width/height/position
//! fill in whatever the references leave open. [`AnchorSpec::validate`]
//! checks that every axis carries exactly enough information.

use crate::error::{LayoutError, Result, ValidationCause};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Reserved target name for references to the parent item.
pub const PARENT_TARGET: &str = "parent";

/// The six anchor lines of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorType {
    /// Left edge.
    Left,
    /// Horizontal center.
    HCenter,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Vertical center.
    VCenter,
    /// Bottom edge.
    Bottom,
}

impl AnchorType {
    /// All anchor types in storage order.
    pub const ALL: [AnchorType; 6] = [
        AnchorType::Left,
        AnchorType::HCenter,
        AnchorType::Right,
        AnchorType::Top,
        AnchorType::VCenter,
        AnchorType::Bottom,
    ];

    /// Position of this type in fixed-size anchor arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis the anchor line lies on.
    pub const fn axis(self) -> Axis {
        match self {
            AnchorType::Left | AnchorType::HCenter | AnchorType::Right => Axis::Horizontal,
            AnchorType::Top | AnchorType::VCenter | AnchorType::Bottom => Axis::Vertical,
        }
    }

    /// Lowercase name used in reference text.
    pub const fn name(self) -> &'static str {
        match self {
            AnchorType::Left => "left",
            AnchorType::HCenter => "hcenter",
            AnchorType::Right => "right",
            AnchorType::Top => "top",
            AnchorType::VCenter => "vcenter",
            AnchorType::Bottom => "bottom",
        }
    }
}

impl fmt::Display for AnchorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnchorType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        AnchorType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| LayoutError::MalformedReference(s.to_string()))
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left / hcenter / right.
    Horizontal,
    /// Top / vcenter / bottom.
    Vertical,
}

impl Axis {
    /// Anchors on this axis as `[near outer, center, far outer]`.
    pub const fn anchors(self) -> [AnchorType; 3] {
        match self {
            Axis::Horizontal => [AnchorType::Left, AnchorType::HCenter, AnchorType::Right],
            Axis::Vertical => [AnchorType::Top, AnchorType::VCenter, AnchorType::Bottom],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// Resolved anchor coordinates of an item.
///
/// Always consistent: centers are the midpoints of their outer edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnchorFields", into = "AnchorFields")]
pub struct Anchor([f32; 6]);

impl Anchor {
    /// Build an anchor from its outer edges, deriving the centers.
    pub fn from_edges(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self([
            left,
            (left + right) / 2.0,
            right,
            top,
            (top + bottom) / 2.0,
            bottom,
        ])
    }

    /// Build an anchor from a top-left corner and a size.
    pub fn from_rect(position: Vec2, width: f32, height: f32) -> Self {
        Self::from_edges(
            position.x,
            position.x + width,
            position.y,
            position.y + height,
        )
    }

    /// Coordinate of a single anchor line.
    pub fn get(&self, anchor: AnchorType) -> f32 {
        self.0[anchor.index()]
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self[AnchorType::Left]
    }

    /// Horizontal center.
    pub fn hcenter(&self) -> f32 {
        self[AnchorType::HCenter]
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self[AnchorType::Right]
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self[AnchorType::Top]
    }

    /// Vertical center.
    pub fn vcenter(&self) -> f32 {
        self[AnchorType::VCenter]
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self[AnchorType::Bottom]
    }

    /// `right - left`.
    pub fn width(&self) -> f32 {
        self.right() - self.left()
    }

    /// `bottom - top`.
    pub fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Closed containment test: points on the edges are inside.
    pub fn contains(&self, pos: Vec2) -> bool {
        self.left() <= pos.x && pos.x <= self.right() && self.top() <= pos.y && pos.y <= self.bottom()
    }
}

impl Index<AnchorType> for Anchor {
    type Output = f32;

    fn index(&self, index: AnchorType) -> &f32 {
        &self.0[index.index()]
    }
}

impl IndexMut<AnchorType> for Anchor {
    fn index_mut(&mut self, index: AnchorType) -> &mut f32 {
        &mut self.0[index.index()]
    }
}

#[derive(Serialize, Deserialize)]
struct AnchorFields {
    left: f32,
    hcenter: f32,
    right: f32,
    top: f32,
    vcenter: f32,
    bottom: f32,
}

impl From<AnchorFields> for Anchor {
    fn from(f: AnchorFields) -> Self {
        Self([f.left, f.hcenter, f.right, f.top, f.vcenter, f.bottom])
    }
}

impl From<Anchor> for AnchorFields {
    fn from(a: Anchor) -> Self {
        let [left, hcenter, right, top, vcenter, bottom] = a.0;
        Self {
            left,
            hcenter,
            right,
            top,
            vcenter,
            bottom,
        }
    }
}

/// Item whose anchor a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    /// The declaring item's parent.
    Parent,
    /// A sibling, by key.
    Sibling(String),
}

/// A declared `target.anchor` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnchorRef {
    target: AnchorTarget,
    anchor: AnchorType,
}

impl AnchorRef {
    /// Reference to an anchor of the parent.
    pub fn parent(anchor: AnchorType) -> Self {
        Self {
            target: AnchorTarget::Parent,
            anchor,
        }
    }

    /// Reference to an anchor of the sibling registered under `key`.
    pub fn sibling(key: impl Into<String>, anchor: AnchorType) -> Self {
        Self {
            target: AnchorTarget::Sibling(key.into()),
            anchor,
        }
    }

    /// Referenced item.
    pub fn target(&self) -> &AnchorTarget {
        &self.target
    }

    /// Referenced anchor line.
    pub fn anchor(&self) -> AnchorType {
        self.anchor
    }

    /// Sibling key, if the reference is not to the parent.
    pub fn sibling_key(&self) -> Option<&str> {
        match &self.target {
            AnchorTarget::Parent => None,
            AnchorTarget::Sibling(key) => Some(key),
        }
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            AnchorTarget::Parent => write!(f, "{PARENT_TARGET}.{}", self.anchor),
            AnchorTarget::Sibling(key) => write!(f, "{key}.{}", self.anchor),
        }
    }
}

impl FromStr for AnchorRef {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || LayoutError::MalformedReference(s.to_string());
        let (target, anchor) = s.trim().rsplit_once('.').ok_or_else(malformed)?;
        if target.is_empty() || target.contains('.') {
            return Err(malformed());
        }
        let anchor = anchor.parse::<AnchorType>().map_err(|_| malformed())?;
        Ok(if target == PARENT_TARGET {
            Self::parent(anchor)
        } else {
            Self::sibling(target, anchor)
        })
    }
}

impl TryFrom<String> for AnchorRef {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AnchorRef> for String {
    fn from(value: AnchorRef) -> Self {
        value.to_string()
    }
}

/// Declared, unresolved anchors of an item plus its explicit geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorSpec {
    refs: [Option<AnchorRef>; 6],
    width: Option<f32>,
    height: Option<f32>,
    position: Option<Vec2>,
}

impl AnchorSpec {
    /// Empty declaration. Not valid on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stretch over the parent: four outer edges bound to the parent's.
    pub fn fill() -> Self {
        Self::new()
            .left(AnchorRef::parent(AnchorType::Left))
            .right(AnchorRef::parent(AnchorType::Right))
            .top(AnchorRef::parent(AnchorType::Top))
            .bottom(AnchorRef::parent(AnchorType::Bottom))
    }

    /// Builder: bind `anchor` to `reference`.
    pub fn with_anchor(mut self, anchor: AnchorType, reference: AnchorRef) -> Self {
        self.refs[anchor.index()] = Some(reference);
        self
    }

    /// Builder: bind the left edge.
    pub fn left(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::Left, reference)
    }

    /// Builder: bind the horizontal center.
    pub fn hcenter(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::HCenter, reference)
    }

    /// Builder: bind the right edge.
    pub fn right(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::Right, reference)
    }

    /// Builder: bind the top edge.
    pub fn top(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::Top, reference)
    }

    /// Builder: bind the vertical center.
    pub fn vcenter(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::VCenter, reference)
    }

    /// Builder: bind the bottom edge.
    pub fn bottom(self, reference: AnchorRef) -> Self {
        self.with_anchor(AnchorType::Bottom, reference)
    }

    /// Builder: explicit width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder: explicit height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Builder: explicit width and height.
    pub fn with_size(self, width: f32, height: f32) -> Self {
        self.with_width(width).with_height(height)
    }

    /// Builder: explicit top-left corner, relative to the parent's.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    /// Reference declared for `anchor`, if any.
    pub fn reference(&self, anchor: AnchorType) -> Option<&AnchorRef> {
        self.refs[anchor.index()].as_ref()
    }

    /// All declared references in anchor order.
    pub fn references(&self) -> impl Iterator<Item = (AnchorType, &AnchorRef)> + '_ {
        AnchorType::ALL
            .into_iter()
            .filter_map(|t| self.reference(t).map(|r| (t, r)))
    }

    /// Explicit width.
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    /// Explicit height.
    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// Explicit size along `axis`.
    pub fn size_on(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Explicit position.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Number of anchors declared on `axis`.
    pub fn declared_on(&self, axis: Axis) -> usize {
        axis.anchors()
            .into_iter()
            .filter(|t| self.refs[t.index()].is_some())
            .count()
    }

    /// Check that each axis is exactly determined.
    ///
    /// Valid per axis: two anchors; one anchor and a size; or no anchor with
    /// both size and position.
    pub fn validate(&self) -> Result<()> {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let declared = self.declared_on(axis);
            let sized = self.size_on(axis).is_some();
            let cause = match (sized, declared) {
                (true, 0) if self.position.is_some() => None,
                (true, 0) => Some(ValidationCause::Insufficient { declared }),
                (true, 1) => None,
                (true, _) => Some(ValidationCause::Redundant { declared }),
                (false, 2) => None,
                (false, 3) => Some(ValidationCause::Redundant { declared }),
                (false, _) => Some(ValidationCause::Insufficient { declared }),
            };
            if let Some(cause) = cause {
                return Err(LayoutError::Validation { axis, cause });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> AnchorRef {
        text.parse().expect("valid reference")
    }

    #[test]
    fn parses_parent_and_sibling_references() {
        assert_eq!(r("parent.left"), AnchorRef::parent(AnchorType::Left));
        let sibling = r("item1.bottom");
        assert_eq!(sibling.sibling_key(), Some("item1"));
        assert_eq!(sibling.anchor(), AnchorType::Bottom);
        assert_eq!(sibling.to_string(), "item1.bottom");
    }

    #[test]
    fn rejects_malformed_references() {
        for text in ["parent", ".left", "parent.middle", "a.b.left", ""] {
            assert!(
                matches!(text.parse::<AnchorRef>(), Err(LayoutError::MalformedReference(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn fill_is_valid() {
        let spec = AnchorSpec::fill();
        assert!(spec.validate().is_ok());
        assert_eq!(spec.declared_on(Axis::Horizontal), 2);
        assert_eq!(spec.declared_on(Axis::Vertical), 2);
    }

    #[test]
    fn width_with_two_horizontal_anchors_is_redundant() {
        let pairs = [
            (AnchorType::Left, AnchorType::Right),
            (AnchorType::Left, AnchorType::HCenter),
            (AnchorType::HCenter, AnchorType::Right),
        ];
        for (a, b) in pairs {
            let spec = AnchorSpec::new()
                .with_anchor(a, AnchorRef::parent(a))
                .with_anchor(b, AnchorRef::parent(b))
                .top(r("parent.top"))
                .with_size(100.0, 100.0);
            assert_eq!(
                spec.validate(),
                Err(LayoutError::Validation {
                    axis: Axis::Horizontal,
                    cause: ValidationCause::Redundant { declared: 2 },
                })
            );
        }
    }

    #[test]
    fn height_with_two_vertical_anchors_is_redundant() {
        let spec = AnchorSpec::new()
            .vcenter(r("parent.vcenter"))
            .bottom(r("parent.bottom"))
            .left(r("parent.left"))
            .with_size(100.0, 100.0);
        assert_eq!(
            spec.validate(),
            Err(LayoutError::Validation {
                axis: Axis::Vertical,
                cause: ValidationCause::Redundant { declared: 2 },
            })
        );
    }

    #[test]
    fn empty_spec_is_insufficient() {
        assert_eq!(
            AnchorSpec::new().validate(),
            Err(LayoutError::Validation {
                axis: Axis::Horizontal,
                cause: ValidationCause::Insufficient { declared: 0 },
            })
        );
    }

    #[test]
    fn size_without_position_is_insufficient() {
        let spec = AnchorSpec::new().with_size(30.0, 30.0);
        assert!(matches!(
            spec.validate(),
            Err(LayoutError::Validation {
                cause: ValidationCause::Insufficient { declared: 0 },
                ..
            })
        ));
        assert!(spec.with_position(Vec2::new(25.0, 25.0)).validate().is_ok());
    }

    #[test]
    fn three_anchors_are_redundant_even_without_size() {
        let spec = AnchorSpec::fill().hcenter(r("parent.hcenter"));
        assert_eq!(
            spec.validate(),
            Err(LayoutError::Validation {
                axis: Axis::Horizontal,
                cause: ValidationCause::Redundant { declared: 3 },
            })
        );
    }

    #[test]
    fn single_anchor_without_size_is_insufficient() {
        let spec = AnchorSpec::new()
            .left(r("parent.left"))
            .with_height(10.0)
            .top(r("parent.top"));
        assert_eq!(
            spec.validate(),
            Err(LayoutError::Validation {
                axis: Axis::Horizontal,
                cause: ValidationCause::Insufficient { declared: 1 },
            })
        );
    }

    #[test]
    fn anchor_edges_derive_centers() {
        let anchor = Anchor::from_rect(Vec2::new(25.0, 25.0), 30.0, 30.0);
        assert_eq!(anchor.hcenter(), 40.0);
        assert_eq!(anchor.vcenter(), 40.0);
        assert_eq!(anchor.width(), 30.0);
        assert!(anchor.contains(Vec2::new(55.0, 25.0)));
        assert!(!anchor.contains(Vec2::new(55.1, 25.0)));
    }

    #[test]
    fn reference_serializes_as_text() {
        let json = serde_json::to_string(&r("header.vcenter")).unwrap();
        assert_eq!(json, "\"header.vcenter\"");
        let back: AnchorRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r("header.vcenter"));
        assert!(serde_json::from_str::<AnchorRef>("\"header\"").is_err());
    }
}
