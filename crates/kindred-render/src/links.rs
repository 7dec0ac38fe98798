//! Connections between laid-out nodes.

use crate::geometry::Point;
use crate::hierarchy::{Hierarchy, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: NodeId,
    pub spouse: Option<NodeId>,
    /// `None` for a spouse connector.
    pub target: Option<NodeId>,
    /// Positions of the co-spouses that precede `source` in its partner's spouse list.
    pub coords: Option<Vec<Point>>,
}

impl LinkRecord {
    pub fn is_spouse_link(&self) -> bool {
        self.target.is_none()
    }
}

/// Builds the links of every visible non-root node, in pre-order.
pub fn build_links(hierarchy: &Hierarchy) -> Vec<LinkRecord> {
    let mut links = Vec::new();
    for id in hierarchy.visible() {
        let node = hierarchy.node(id);
        if node.parent.is_none() {
            continue;
        }
        let partner = node.partner();

        for &child in hierarchy.visible_children(id) {
            if hierarchy.node(child).is_spouse_slot() {
                continue;
            }
            links.push(LinkRecord {
                source: id,
                spouse: partner,
                target: Some(child),
                coords: None,
            });
        }

        let Some(partner) = partner else {
            continue;
        };
        if node.is_placeholder() {
            continue;
        }
        let preceding: Vec<Point> = hierarchy
            .node(partner)
            .spouses()
            .unwrap_or(&[])
            .iter()
            .take_while(|&&s| s != id)
            .filter_map(|&s| hierarchy.position(s))
            .collect();
        links.push(LinkRecord {
            source: id,
            spouse: Some(partner),
            target: None,
            coords: (!preceding.is_empty()).then_some(preceding),
        });
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::{ChartOptions, FamilyTree, FamilyTreeNode, PersonRecord};
    use std::collections::BTreeSet;

    fn person(id: i64) -> PersonRecord {
        PersonRecord::new(id, format!("Person {id}"))
    }

    #[test]
    fn one_spouse_two_children() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))).with_children(vec![
                FamilyTreeNode::individual(person(3)),
                FamilyTreeNode::individual(person(4)),
            ]),
        ]);
        let h = Hierarchy::build(&tree, &ChartOptions::default(), &BTreeSet::new());
        let links = build_links(&h);
        assert_eq!(links.len(), 3);
        let spouse_links: Vec<_> = links.iter().filter(|l| l.is_spouse_link()).collect();
        assert_eq!(spouse_links.len(), 1);
        assert_eq!(spouse_links[0].source, 2);
        assert_eq!(spouse_links[0].spouse, Some(1));
        assert_eq!(spouse_links[0].coords, None);
        assert!(links.iter().filter(|l| !l.is_spouse_link()).all(|l| l.spouse == Some(1)));
    }

    #[test]
    fn later_spouses_carry_their_predecessors() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2, 3, 4]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))),
            FamilyTreeNode::spouse_slot(1, 1, Some(person(3))),
            FamilyTreeNode::spouse_slot(1, 2, Some(person(4))),
        ]);
        let h = Hierarchy::build(&tree, &ChartOptions::default(), &BTreeSet::new());
        let coords: Vec<usize> = build_links(&h)
            .iter()
            .map(|l| l.coords.as_ref().map_or(0, Vec::len))
            .collect();
        assert_eq!(coords, vec![0, 1, 2]);
    }

    #[test]
    fn placeholders_get_child_links_only() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)),
            FamilyTreeNode::spouse_slot(1, 1, None)
                .with_children(vec![FamilyTreeNode::individual(person(5))]),
        ]);
        let h = Hierarchy::build(&tree, &ChartOptions::default(), &BTreeSet::new());
        let links = build_links(&h);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, Some(3));
    }
}
