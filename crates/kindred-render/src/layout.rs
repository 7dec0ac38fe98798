//! Tidy layout of the visible hierarchy followed by the chart-specific corrections.

use crate::Result;
use crate::hierarchy::{Hierarchy, NodeId, Partnership};
use narwhal::TreeLayout;

/// Spouse pairs sit a little further apart than plain siblings so the pull-together step has
/// room to move the individual next to their first spouse.
pub const SPOUSE_SEPARATION: f64 = 1.25;
pub const SIBLING_SEPARATION: f64 = 1.0;
pub const COUSIN_SEPARATION: f64 = 2.0;

/// Separation between two neighbouring nodes of one generation, `left` before `right`.
pub fn separation(hierarchy: &Hierarchy, left: NodeId, right: NodeId) -> f64 {
    let l = hierarchy.node(left);
    let r = hierarchy.node(right);
    if matches!(l.partnership, Partnership::Spouses(_)) || r.is_spouse_slot() {
        SPOUSE_SEPARATION
    } else if l.parent == r.parent {
        SIBLING_SEPARATION
    } else {
        COUSIN_SEPARATION
    }
}

/// Positions every visible node of `hierarchy`.
pub fn layout(hierarchy: &mut Hierarchy) -> Result<()> {
    let orientation = *hierarchy.orientation();
    let (tree, order) = hierarchy.visible_tree()?;

    let positions = {
        let h = &*hierarchy;
        TreeLayout::new(orientation.node_width(), orientation.node_height())
            .layout(&tree, |l, r| separation(h, order[l], order[r]))
    };
    for (idx, p) in positions.iter().enumerate() {
        hierarchy.node_mut(order[idx]).position = orientation.norm(p.x, p.depth);
    }

    pull_spouses_together(hierarchy, &order);
    center_children(hierarchy, &order);
    Ok(())
}

/// Moves every individual to exactly one node width before their first spouse.
fn pull_spouses_together(hierarchy: &mut Hierarchy, order: &[NodeId]) {
    let orientation = *hierarchy.orientation();
    for &id in order {
        let Some(&first) = hierarchy.node(id).spouses().and_then(<[NodeId]>::first) else {
            continue;
        };
        let Some(spouse) = hierarchy.position(first) else {
            tracing::debug!(node = id, spouse = first, "first spouse missing, not pulled");
            continue;
        };
        let node = hierarchy.node_mut(id);
        node.position = orientation.point(
            orientation.cross(spouse) - orientation.node_width(),
            orientation.depth(node.position),
        );
    }
}

/// Shifts the descendants of each family half a node width toward the individual, so the
/// children are centred below the couple instead of below the spouse.
fn center_children(hierarchy: &mut Hierarchy, order: &[NodeId]) {
    let orientation = *hierarchy.orientation();
    let shift = -orientation.node_width() / 2.0;
    for &id in order {
        let node = hierarchy.node(id);
        if !node.is_spouse_slot() || node.parent.is_none() {
            continue;
        }
        let children = hierarchy.visible_children(id);
        let Some(&first_child) = children.first() else {
            continue;
        };
        if node.family == 0
            && children.len() == 1
            && hierarchy.visible_children(first_child).is_empty()
        {
            continue;
        }
        for d in hierarchy.descendants(id) {
            let n = hierarchy.node_mut(d);
            n.position = orientation.shift_cross(n.position, shift);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::{ChartOptions, FamilyTree, FamilyTreeNode, LayoutDirection, PersonRecord};
    use std::collections::BTreeSet;

    fn person(id: i64) -> PersonRecord {
        PersonRecord::new(id, format!("Person {id}"))
    }

    fn build(tree: &FamilyTree, layout: LayoutDirection) -> Hierarchy {
        let options = ChartOptions {
            layout,
            ..Default::default()
        };
        let mut h = Hierarchy::build(tree, &options, &BTreeSet::new());
        super::layout(&mut h).unwrap();
        h
    }

    #[test]
    fn separation_cases() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))).with_children(vec![
                FamilyTreeNode::individual(person(3)),
                FamilyTreeNode::individual(person(4)),
            ]),
            FamilyTreeNode::individual(person(5))
                .with_children(vec![FamilyTreeNode::individual(person(6))]),
        ]);
        let h = Hierarchy::build(&tree, &ChartOptions::default(), &BTreeSet::new());
        // 1 A, 2 B(slot), 3 C, 4 D, 5 E, 6 F
        assert_eq!(separation(&h, 1, 2), SPOUSE_SEPARATION);
        assert_eq!(separation(&h, 3, 4), SIBLING_SEPARATION);
        assert_eq!(separation(&h, 4, 6), COUSIN_SEPARATION);
        assert_eq!(separation(&h, 2, 5), SIBLING_SEPARATION);
    }

    #[test]
    fn couple_is_pulled_together_and_children_centered() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))).with_children(vec![
                FamilyTreeNode::individual(person(3)),
                FamilyTreeNode::individual(person(4)),
            ]),
        ]);
        let h = build(&tree, LayoutDirection::TopBottom);
        let o = h.orientation();
        let (a, b, c, d) = (
            h.node(1).position,
            h.node(2).position,
            h.node(3).position,
            h.node(4).position,
        );
        assert_eq!(b.x - a.x, o.node_width());
        assert_eq!(d.x - c.x, o.node_width());
        assert_eq!(a.y, b.y);
        assert_eq!(c.y - a.y, o.node_height());
        // Children are centred below the midpoint of the couple.
        assert!(((c.x + d.x) / 2.0 - (a.x + b.x) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_childless_child_of_first_family_is_not_shifted() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2)))
                .with_children(vec![FamilyTreeNode::individual(person(3))]),
        ]);
        let h = build(&tree, LayoutDirection::TopBottom);
        assert_eq!(h.node(3).position.x, h.node(2).position.x);
    }

    #[test]
    fn horizontal_layouts_pull_along_y() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))),
        ]);
        let h = build(&tree, LayoutDirection::RightLeft);
        let (a, b) = (h.node(1).position, h.node(2).position);
        assert_eq!(a.x, b.x);
        assert_eq!(b.y - a.y, h.orientation().node_width());
        assert!(a.x < 0.0);
    }
}
