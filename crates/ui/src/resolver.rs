//! Per-scope dependency ordering of sibling references.
//!
//! Nodes are the direct children of one parent, edges go from a child to each
//! sibling it references. References to `parent` add no edge since the parent
//! is always resolved before its children. The graph lives only for the
//! duration of one call.

use crate::anchor::AnchorSpec;
use crate::error::{LayoutError, Result};
use std::collections::{HashMap, VecDeque};

/// One child of the scope being ordered.
#[derive(Debug, Clone, Copy)]
pub struct ScopeEntry<'a> {
    /// Key under which the child is registered.
    pub key: &'a str,
    /// The child's declaration.
    pub spec: &'a AnchorSpec,
}

/// Order `entries` so that every child comes after the siblings it references.
///
/// Returns indices into `entries`. Uses Kahn's algorithm seeded in insertion
/// order, so independent children keep their relative order.
pub fn evaluation_order(scope: &str, entries: &[ScopeEntry<'_>]) -> Result<Vec<usize>> {
    let by_key: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.key, i))
        .collect();

    let mut in_degree = vec![0usize; entries.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];

    for (i, entry) in entries.iter().enumerate() {
        let mut depends_on: Vec<usize> = Vec::new();
        for (_, reference) in entry.spec.references() {
            let Some(key) = reference.sibling_key() else {
                continue;
            };
            let dep = *by_key
                .get(key)
                .ok_or_else(|| LayoutError::UnresolvedReference {
                    scope: scope.to_string(),
                    item: entry.key.to_string(),
                    reference: reference.to_string(),
                })?;
            if !depends_on.contains(&dep) {
                depends_on.push(dep);
            }
        }
        in_degree[i] = depends_on.len();
        for dep in depends_on {
            dependents[dep].push(i);
        }
    }

    let mut ready: VecDeque<usize> = (0..entries.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(entries.len());

    while let Some(node) = ready.pop_front() {
        order.push(node);
        for &dependent in &dependents[node] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() < entries.len() {
        let members = (0..entries.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| entries[i].key.to_string())
            .collect();
        return Err(LayoutError::CyclicDependency {
            scope: scope.to_string(),
            members,
        });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{AnchorRef, AnchorType};

    fn row_below(key: &str) -> AnchorSpec {
        AnchorSpec::new()
            .left(AnchorRef::parent(AnchorType::Left))
            .right(AnchorRef::parent(AnchorType::Right))
            .top(AnchorRef::sibling(key, AnchorType::Bottom))
            .with_height(100.0)
    }

    fn top_row() -> AnchorSpec {
        AnchorSpec::new()
            .left(AnchorRef::parent(AnchorType::Left))
            .right(AnchorRef::parent(AnchorType::Right))
            .top(AnchorRef::parent(AnchorType::Top))
            .with_height(100.0)
    }

    fn keys<'a>(entries: &[ScopeEntry<'a>], order: &[usize]) -> Vec<&'a str> {
        order.iter().map(|&i| entries[i].key).collect()
    }

    #[test]
    fn orders_chain_inserted_out_of_order() {
        let (s1, s2, s3, s4) = (top_row(), row_below("item1"), row_below("item2"), row_below("item3"));
        let entries = [
            ScopeEntry { key: "item3", spec: &s3 },
            ScopeEntry { key: "item2", spec: &s2 },
            ScopeEntry { key: "item1", spec: &s1 },
            ScopeEntry { key: "item4", spec: &s4 },
        ];
        let order = evaluation_order("root", &entries).unwrap();
        assert_eq!(keys(&entries, &order), ["item1", "item2", "item3", "item4"]);
    }

    #[test]
    fn independent_children_keep_insertion_order() {
        let fill = AnchorSpec::fill();
        let entries = [
            ScopeEntry { key: "b", spec: &fill },
            ScopeEntry { key: "a", spec: &fill },
            ScopeEntry { key: "c", spec: &fill },
        ];
        let order = evaluation_order("root", &entries).unwrap();
        assert_eq!(order, [0, 1, 2]);
    }

    #[test]
    fn detects_two_node_cycle() {
        let a = AnchorSpec::new()
            .left(AnchorRef::parent(AnchorType::Left))
            .right(AnchorRef::parent(AnchorType::Right))
            .bottom(AnchorRef::sibling("item2", AnchorType::Top))
            .with_height(100.0);
        let b = row_below("item1");
        let entries = [
            ScopeEntry { key: "item1", spec: &a },
            ScopeEntry { key: "item2", spec: &b },
        ];
        assert_eq!(
            evaluation_order("root", &entries),
            Err(LayoutError::CyclicDependency {
                scope: "root".into(),
                members: vec!["item1".into(), "item2".into()],
            })
        );
    }

    #[test]
    fn detects_longer_cycles_and_self_references() {
        let (a, b, c) = (row_below("c"), row_below("a"), row_below("b"));
        let entries = [
            ScopeEntry { key: "a", spec: &a },
            ScopeEntry { key: "b", spec: &b },
            ScopeEntry { key: "c", spec: &c },
        ];
        assert!(matches!(
            evaluation_order("root", &entries),
            Err(LayoutError::CyclicDependency { members, .. }) if members.len() == 3
        ));

        let selfish = row_below("solo");
        let entries = [ScopeEntry { key: "solo", spec: &selfish }];
        assert!(matches!(
            evaluation_order("root", &entries),
            Err(LayoutError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn unknown_sibling_is_unresolved() {
        let spec = row_below("ghost");
        let entries = [ScopeEntry { key: "item", spec: &spec }];
        assert_eq!(
            evaluation_order("root", &entries),
            Err(LayoutError::UnresolvedReference {
                scope: "root".into(),
                item: "item".into(),
                reference: "ghost.bottom".into(),
            })
        );
    }
}
