//! Per-side inward offsets applied after anchors are resolved.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The four sides a margin can shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginType {
    /// Moves the left edge right.
    Left,
    /// Moves the right edge left.
    Right,
    /// Moves the top edge down.
    Top,
    /// Moves the bottom edge up.
    Bottom,
}

impl MarginType {
    /// All sides in storage order.
    pub const ALL: [MarginType; 4] = [
        MarginType::Left,
        MarginType::Right,
        MarginType::Top,
        MarginType::Bottom,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Margin values; unspecified sides are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MarginFields", into = "MarginFields")]
pub struct Margin([f32; 4]);

impl Margin {
    /// Explicit margin for every side.
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self([left, right, top, bottom])
    }

    /// Same offset on all four sides.
    pub fn symmetric(margin: f32) -> Self {
        Self([margin; 4])
    }

    /// Builder: set one side.
    pub fn with(mut self, side: MarginType, value: f32) -> Self {
        self[side] = value;
        self
    }

    /// Left offset.
    pub fn left(&self) -> f32 {
        self[MarginType::Left]
    }

    /// Right offset.
    pub fn right(&self) -> f32 {
        self[MarginType::Right]
    }

    /// Top offset.
    pub fn top(&self) -> f32 {
        self[MarginType::Top]
    }

    /// Bottom offset.
    pub fn bottom(&self) -> f32 {
        self[MarginType::Bottom]
    }
}

impl Index<MarginType> for Margin {
    type Output = f32;

    fn index(&self, index: MarginType) -> &f32 {
        &self.0[index.index()]
    }
}

impl IndexMut<MarginType> for Margin {
    fn index_mut(&mut self, index: MarginType) -> &mut f32 {
        &mut self.0[index.index()]
    }
}

#[derive(Serialize, Deserialize)]
struct MarginFields {
    #[serde(default)]
    left: f32,
    #[serde(default)]
    right: f32,
    #[serde(default)]
    top: f32,
    #[serde(default)]
    bottom: f32,
}

impl From<MarginFields> for Margin {
    fn from(f: MarginFields) -> Self {
        Self::new(f.left, f.right, f.top, f.bottom)
    }
}

impl From<Margin> for MarginFields {
    fn from(m: Margin) -> Self {
        Self {
            left: m.left(),
            right: m.right(),
            top: m.top(),
            bottom: m.bottom(),
        }
    }
}
