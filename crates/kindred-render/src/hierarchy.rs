//! Arena hierarchy built from the host tree.
//!
//! Node ids are assigned in pre-order by a per-build counter, so they are stable across
//! rebuilds of the same tree with the same generation limit. The collapse state is keyed by
//! these ids.

use crate::geometry::Point;
use crate::orientation::Orientation;
use crate::{Error, Result};
use kindred_core::{ChartOptions, FamilyTree, FamilyTreeNode, PersonId, PersonRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Person {
    Real(PersonRecord),
    /// Unknown or hidden spouse; the slot exists so the family's children have a parent.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Individual,
    SpouseSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Partnership {
    #[default]
    None,
    /// Spouse slots of an individual, in family order.
    Spouses(Vec<NodeId>),
    /// The individual a spouse slot belongs to.
    SpouseOf(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fold {
    #[default]
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub person: Person,
    pub family: usize,
    pub depth: usize,
    pub parent: Option<NodeId>,
    /// Full child list, kept while the node is collapsed.
    pub children: Vec<NodeId>,
    pub partnership: Partnership,
    pub fold: Fold,
    pub position: Point,
}

impl HierarchyNode {
    pub fn record(&self) -> Option<&PersonRecord> {
        match &self.person {
            Person::Real(p) => Some(p),
            Person::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.person, Person::Placeholder)
    }

    pub fn is_spouse_slot(&self) -> bool {
        self.kind == NodeKind::SpouseSlot
    }

    pub fn spouses(&self) -> Option<&[NodeId]> {
        match &self.partnership {
            Partnership::Spouses(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn partner(&self) -> Option<NodeId> {
        match self.partnership {
            Partnership::SpouseOf(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.fold == Fold::Collapsed
    }
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    orientation: Orientation,
}

impl Hierarchy {
    pub fn build(tree: &FamilyTree, options: &ChartOptions, collapsed: &BTreeSet<NodeId>) -> Self {
        let mut orientation = Orientation::new(options.layout);
        if options.show_alternative_name {
            orientation = orientation.with_alternative_names();
        }

        let mut builder = Builder {
            options,
            collapsed,
            nodes: Vec::new(),
            sources: Vec::new(),
        };
        let root = builder.push(NodeKind::Root, Person::Placeholder, 0, 0, None, Source::EMPTY);
        let children = builder.add_children(&tree.children, root, 1);
        builder.nodes[root].children = children;

        tracing::debug!(
            nodes = builder.nodes.len(),
            layout = %options.layout,
            "built descendants hierarchy"
        );
        Self {
            nodes: builder.nodes,
            orientation,
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
        &mut self.nodes[id]
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(id).map(|n| n.position)
    }

    /// Children that take part in layout: none while the node is collapsed.
    pub fn visible_children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(n) if !n.is_collapsed() => &n.children,
            _ => &[],
        }
    }

    /// Visible nodes in pre-order, the root included.
    pub fn visible(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.visible_children(v).iter().rev().copied());
        }
        out
    }

    /// Visible descendants of `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.visible_children(id).iter().rev().copied().collect();
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.visible_children(v).iter().rev().copied());
        }
        out
    }

    /// The visible part of the hierarchy as a layout tree, plus the node id of every tree index.
    pub(crate) fn visible_tree(&self) -> Result<(narwhal::Tree, Vec<NodeId>)> {
        let order = self.visible();
        let mut index = vec![usize::MAX; self.nodes.len()];
        for (i, &id) in order.iter().enumerate() {
            index[id] = i;
        }
        let children = order
            .iter()
            .map(|&id| {
                self.visible_children(id)
                    .iter()
                    .map(|&c| match index[c] {
                        usize::MAX => Err(Error::InvalidHierarchy {
                            message: format!("node {c} is not reachable from the root"),
                        }),
                        i => Ok(i),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        let tree = narwhal::Tree::from_children(0, children)?;
        Ok((tree, order))
    }
}

/// Person-id references of a node, resolved once its siblings exist.
#[derive(Debug, Clone)]
struct Source {
    person: Option<PersonId>,
    spouses: Option<Vec<PersonId>>,
    spouse: Option<PersonId>,
}

impl Source {
    const EMPTY: Source = Source {
        person: None,
        spouses: None,
        spouse: None,
    };
}

struct Builder<'a> {
    options: &'a ChartOptions,
    collapsed: &'a BTreeSet<NodeId>,
    nodes: Vec<HierarchyNode>,
    sources: Vec<Source>,
}

impl Builder<'_> {
    fn push(
        &mut self,
        kind: NodeKind,
        person: Person,
        family: usize,
        depth: usize,
        parent: Option<NodeId>,
        source: Source,
    ) -> NodeId {
        let id = self.nodes.len();
        let fold = if self.collapsed.contains(&id) {
            Fold::Collapsed
        } else {
            Fold::Expanded
        };
        self.nodes.push(HierarchyNode {
            id,
            kind,
            person,
            family,
            depth,
            parent,
            children: Vec::new(),
            partnership: Partnership::None,
            fold,
            position: Point::ORIGIN,
        });
        self.sources.push(source);
        id
    }

    fn add_children(
        &mut self,
        nodes: &[FamilyTreeNode],
        parent: NodeId,
        depth: usize,
    ) -> Vec<NodeId> {
        if depth as u32 > self.options.generations {
            return Vec::new();
        }
        let ids: Vec<NodeId> = nodes
            .iter()
            .map(|node| self.add(node, parent, depth))
            .collect();
        self.resolve_partnerships(&ids);
        ids
    }

    fn add(&mut self, node: &FamilyTreeNode, parent: NodeId, depth: usize) -> NodeId {
        let kind = if node.is_spouse_slot() {
            NodeKind::SpouseSlot
        } else {
            NodeKind::Individual
        };
        let person = match &node.data {
            Some(_) if kind == NodeKind::SpouseSlot && self.options.hide_spouses => {
                Person::Placeholder
            }
            Some(record) => Person::Real(record.clone()),
            None => Person::Placeholder,
        };
        let source = Source {
            person: node.person_id(),
            spouses: node.spouses.clone(),
            spouse: node.spouse,
        };
        let id = self.push(kind, person, node.family, depth, Some(parent), source);
        let children = self.add_children(&node.children, id, depth + 1);
        self.nodes[id].children = children;
        id
    }

    fn find_sibling(
        &self,
        siblings: &[NodeId],
        kind: NodeKind,
        person: PersonId,
    ) -> Option<NodeId> {
        siblings
            .iter()
            .copied()
            .find(|&s| self.nodes[s].kind == kind && self.sources[s].person == Some(person))
    }

    fn resolve_partnerships(&mut self, siblings: &[NodeId]) {
        for &id in siblings {
            let source = self.sources[id].clone();
            let partnership = if let Some(spouses) = &source.spouses {
                let mut resolved = Vec::with_capacity(spouses.len());
                for &person in spouses {
                    match self.find_sibling(siblings, NodeKind::SpouseSlot, person) {
                        Some(slot) => resolved.push(slot),
                        None => tracing::warn!(
                            node = id,
                            spouse = person,
                            "dropping spouse reference without a matching spouse slot"
                        ),
                    }
                }
                Partnership::Spouses(resolved)
            } else if let Some(partner) = source.spouse {
                match self.find_sibling(siblings, NodeKind::Individual, partner) {
                    Some(individual) => Partnership::SpouseOf(individual),
                    None => {
                        tracing::warn!(
                            node = id,
                            partner,
                            "spouse slot refers to an individual outside its siblings"
                        );
                        Partnership::None
                    }
                }
            } else {
                Partnership::None
            };
            self.nodes[id].partnership = partnership;
        }
    }
}
