//! Property-based tests for layout binding
//!
//! Validates geometry invariants:
//! - Derived anchors keep centers at the midpoint of their edges
//! - Binding twice without changes yields identical geometry
//! - Sibling chains resolve independently of insertion order
//! - Sibling cycles of any length are reported with every member

use glam::Vec2;
use proptest::prelude::*;
use surviveler_ui::{
    AnchorRef, AnchorSpec, AnchorType, Item, ItemTree, LayoutError, LayoutSnapshot, Margin,
};

fn edge() -> impl Strategy<Value = AnchorType> {
    prop_oneof![
        Just(AnchorType::Left),
        Just(AnchorType::HCenter),
        Just(AnchorType::Right),
        Just(AnchorType::Top),
        Just(AnchorType::VCenter),
        Just(AnchorType::Bottom),
    ]
}

fn row(top: AnchorRef) -> AnchorSpec {
    AnchorSpec::new()
        .left(AnchorRef::parent(AnchorType::Left))
        .right(AnchorRef::parent(AnchorType::Right))
        .top(top)
        .with_height(10.0)
}

proptest! {
    /// Property: Position and size place the item relative to its parent
    #[test]
    fn position_and_size_are_relative(
        px in 0u16..200,
        py in 0u16..200,
        w in 1u16..100,
        h in 1u16..100,
        cx in 0u16..50,
        cy in 0u16..50,
    ) {
        let (px, py, w, h) = (f32::from(px), f32::from(py), f32::from(w), f32::from(h));
        let (cx, cy) = (f32::from(cx), f32::from(cy));
        let mut tree = ItemTree::new(400.0, 400.0);
        let root = tree.root();
        let outer = AnchorSpec::new().with_position(Vec2::new(px, py)).with_size(w, h);
        let outer = tree.add_child(root, "outer", Item::new(outer, Margin::default()).unwrap()).unwrap();
        let inner = AnchorSpec::new().with_position(Vec2::new(cx, cy)).with_size(w, h);
        let inner = tree.add_child(outer, "inner", Item::new(inner, Margin::default()).unwrap()).unwrap();
        tree.bind().unwrap();

        prop_assert_eq!(tree.position(outer), Some(Vec2::new(px, py)));
        prop_assert_eq!(tree.position(inner), Some(Vec2::new(px + cx, py + cy)));
        prop_assert_eq!(tree.width(inner), Some(w));
        prop_assert_eq!(tree.height(inner), Some(h));
    }

    /// Property: Centers stay at the midpoint of the edges after margins
    #[test]
    fn centers_are_midpoints(
        near in edge(),
        far in edge(),
        top in edge(),
        height in 1u16..300,
        left in 0u8..40,
        right in 0u8..40,
        upper in 0u8..40,
        lower in 0u8..40,
    ) {
        let mut tree = ItemTree::new(640.0, 480.0);
        let root = tree.root();
        let spec = AnchorSpec::new()
            .left(AnchorRef::parent(near))
            .right(AnchorRef::parent(far))
            .top(AnchorRef::parent(top))
            .with_height(f32::from(height));
        let margin = Margin::new(left.into(), right.into(), upper.into(), lower.into());
        let id = tree.add_child(root, "item", Item::new(spec, margin).unwrap()).unwrap();
        tree.bind().unwrap();

        let anchor = tree.anchor(id).copied().unwrap();
        prop_assert_eq!(anchor.hcenter(), (anchor.left() + anchor.right()) / 2.0);
        prop_assert_eq!(anchor.vcenter(), (anchor.top() + anchor.bottom()) / 2.0);
        prop_assert_eq!(anchor.height(), f32::from(height) - f32::from(upper) - f32::from(lower));
    }

    /// Property: Fill with a symmetric margin keeps the parent's centers
    #[test]
    fn symmetric_margin_keeps_centers(
        width in 100u16..1000,
        height in 100u16..1000,
        margin in 0u8..50,
    ) {
        let (width, height, m) = (f32::from(width), f32::from(height), f32::from(margin));
        let mut tree = ItemTree::new(width, height);
        let root = tree.root();
        let id = tree
            .add_child(root, "fill", Item::new(AnchorSpec::fill(), Margin::symmetric(m)).unwrap())
            .unwrap();
        tree.bind().unwrap();

        let outer = tree.anchor(root).copied().unwrap();
        let inner = tree.anchor(id).copied().unwrap();
        prop_assert_eq!(inner.hcenter(), outer.hcenter());
        prop_assert_eq!(inner.vcenter(), outer.vcenter());
        prop_assert_eq!(inner.width(), width - 2.0 * m);
        prop_assert_eq!(inner.height(), height - 2.0 * m);
    }

    /// Property: Binding is idempotent
    #[test]
    fn bind_is_idempotent(
        order in Just((0..8usize).collect::<Vec<_>>()).prop_shuffle(),
        margin in 0u8..5,
    ) {
        let mut tree = ItemTree::new(320.0, 240.0);
        let root = tree.root();
        for &i in &order {
            let top = if i == 0 {
                AnchorRef::parent(AnchorType::Top)
            } else {
                AnchorRef::sibling(format!("row{}", i - 1), AnchorType::Bottom)
            };
            let item = Item::new(row(top), Margin::symmetric(margin.into())).unwrap();
            tree.add_child(root, format!("row{i}"), item).unwrap();
        }
        tree.bind().unwrap();
        let first = LayoutSnapshot::capture(&tree);
        tree.bind().unwrap();
        let second = LayoutSnapshot::capture(&tree);

        prop_assert!(first.is_fully_bound());
        prop_assert_eq!(first, second);
    }

    /// Property: A stacked chain resolves the same in any insertion order
    #[test]
    fn chain_ignores_insertion_order(
        order in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut tree = ItemTree::new(100.0, 500.0);
        let root = tree.root();
        for &i in &order {
            let top = if i == 0 {
                AnchorRef::parent(AnchorType::Top)
            } else {
                AnchorRef::sibling(format!("row{}", i - 1), AnchorType::Bottom)
            };
            tree.add_child(root, format!("row{i}"), Item::new(row(top), Margin::default()).unwrap())
                .unwrap();
        }
        tree.bind().unwrap();

        for i in 0..12usize {
            let id = tree.lookup(&format!("row{i}")).unwrap();
            prop_assert_eq!(tree.position(id), Some(Vec2::new(0.0, i as f32 * 10.0)));
        }
    }

    /// Property: Every member of a reference loop is reported
    #[test]
    fn cycles_report_every_member(len in 1usize..8, free in 0usize..4) {
        let mut tree = ItemTree::new(100.0, 100.0);
        let root = tree.root();
        for i in 0..free {
            tree.add_child(root, format!("free{i}"), Item::new(row(AnchorRef::parent(AnchorType::Top)), Margin::default()).unwrap())
                .unwrap();
        }
        for i in 0..len {
            let next = format!("loop{}", (i + 1) % len);
            let item = Item::new(row(AnchorRef::sibling(next, AnchorType::Bottom)), Margin::default()).unwrap();
            tree.add_child(root, format!("loop{i}"), item).unwrap();
        }

        let expected: Vec<String> = (0..len).map(|i| format!("loop{i}")).collect();
        prop_assert_eq!(
            tree.bind().unwrap_err(),
            LayoutError::CyclicDependency { scope: "root".into(), members: expected }
        );
    }
}
