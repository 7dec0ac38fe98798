//! Orthogonal link paths.
//!
//! Both constructors work in the cross/depth frame of [`Axis`]; `vertical` and `horizontal`
//! differ only in which screen axis is which.

use crate::geometry::Point;
use crate::hierarchy::{Hierarchy, HierarchyNode, NodeId};
use crate::links::LinkRecord;
use crate::orientation::Axis;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Inset of a spouse line where an earlier segment already ends at the same box.
pub const LINE_START_OFFSET: f64 = 2.0;
/// Depth step between stacked spouse lines of one individual.
pub const SPOUSE_LINE_OFFSET: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

impl PathCommand {
    pub fn point(&self) -> Point {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
        }
    }
}

/// SVG path data for `commands` (`M x y L x y ...`).
pub fn to_svg_d(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        if !out.is_empty() {
            out.push(' ');
        }
        let (op, p) = match cmd {
            PathCommand::MoveTo(p) => ('M', p),
            PathCommand::LineTo(p) => ('L', p),
        };
        let _ = write!(
            &mut out,
            "{op}{} {}",
            crate::svg::fmt(p.x),
            crate::svg::fmt(p.y)
        );
    }
    out
}

pub fn vertical(hierarchy: &Hierarchy, link: &LinkRecord) -> Vec<PathCommand> {
    route(Frame::new(hierarchy, Axis::Vertical), hierarchy, link)
}

pub fn horizontal(hierarchy: &Hierarchy, link: &LinkRecord) -> Vec<PathCommand> {
    route(Frame::new(hierarchy, Axis::Horizontal), hierarchy, link)
}

struct Frame {
    axis: Axis,
    direction: f64,
    box_cross: f64,
    box_depth: f64,
    cross_offset: f64,
    depth_offset: f64,
}

impl Frame {
    fn new(hierarchy: &Hierarchy, axis: Axis) -> Self {
        let o = hierarchy.orientation();
        let (box_cross, box_depth, cross_offset, depth_offset) = match axis {
            Axis::Vertical => (o.box_width(), o.box_height(), o.x_offset(), o.y_offset()),
            Axis::Horizontal => (o.box_height(), o.box_width(), o.y_offset(), o.x_offset()),
        };
        Self {
            axis,
            direction: o.direction(),
            box_cross,
            box_depth,
            cross_offset,
            depth_offset,
        }
    }

    fn cross(&self, p: Point) -> f64 {
        match self.axis {
            Axis::Vertical => p.x,
            Axis::Horizontal => p.y,
        }
    }

    fn depth(&self, p: Point) -> f64 {
        match self.axis {
            Axis::Vertical => p.y,
            Axis::Horizontal => p.x,
        }
    }

    fn point(&self, cross: f64, depth: f64) -> Point {
        match self.axis {
            Axis::Vertical => Point::new(cross, depth),
            Axis::Horizontal => Point::new(depth, cross),
        }
    }
}

fn route(frame: Frame, hierarchy: &Hierarchy, link: &LinkRecord) -> Vec<PathCommand> {
    let Some(source) = hierarchy.get(link.source) else {
        return Vec::new();
    };
    let partner = link.spouse.and_then(|id| hierarchy.get(id));
    match link.target {
        Some(target) => child_path(&frame, hierarchy, source, partner, target),
        None => spouse_path(&frame, source, partner, link.coords.as_deref()),
    }
}

fn child_path(
    frame: &Frame,
    hierarchy: &Hierarchy,
    source: &HierarchyNode,
    partner: Option<&HierarchyNode>,
    target: NodeId,
) -> Vec<PathCommand> {
    let Some(target) = hierarchy.get(target) else {
        return Vec::new();
    };
    let dir = frame.direction;
    let s_cross = frame.cross(source.position);
    let s_depth = frame.depth(source.position);
    let box_edge = dir * frame.box_depth / 2.0;

    let (from_cross, from_depth) = match partner {
        _ if source.is_spouse_slot() && source.is_placeholder() => (
            placeholder_origin_cross(
                s_cross,
                partner.map(|p| frame.cross(p.position)),
                frame.box_cross,
                frame.cross_offset,
            ),
            s_depth + box_edge,
        ),
        Some(p) if source.is_spouse_slot() && source.family == 0 => {
            ((s_cross + frame.cross(p.position)) / 2.0, s_depth)
        }
        _ => (s_cross, s_depth + box_edge),
    };

    let t_cross = frame.cross(target.position);
    let t_depth = frame.depth(target.position);
    let mid = t_depth - dir * (frame.box_depth / 2.0 + frame.depth_offset / 2.0);

    vec![
        PathCommand::MoveTo(frame.point(from_cross, from_depth)),
        PathCommand::LineTo(frame.point(from_cross, mid)),
        PathCommand::LineTo(frame.point(t_cross, mid)),
        PathCommand::LineTo(frame.point(t_cross, t_depth - box_edge)),
    ]
}

/// Cross position where the connectors of a placeholder slot's family start: just outside the
/// empty box, on the side facing the partner (the negative side when there is none).
pub fn placeholder_origin_cross(
    slot: f64,
    partner: Option<f64>,
    box_cross: f64,
    cross_offset: f64,
) -> f64 {
    let toward = match partner {
        Some(p) if p > slot => 1.0,
        _ => -1.0,
    };
    slot + toward * (box_cross / 2.0 + cross_offset / 4.0)
}

fn spouse_path(
    frame: &Frame,
    source: &HierarchyNode,
    partner: Option<&HierarchyNode>,
    coords: Option<&[Point]>,
) -> Vec<PathCommand> {
    let (Some(partner), Some(coords)) = (partner, coords) else {
        return Vec::new();
    };

    let mut chain = Vec::with_capacity(coords.len() + 2);
    chain.push(partner.position);
    chain.extend_from_slice(coords);
    chain.push(source.position);

    let line_depth =
        frame.depth(source.position) + frame.direction * coords.len() as f64 * SPOUSE_LINE_OFFSET;
    let half = frame.box_cross / 2.0;

    let mut out = Vec::with_capacity(2 * (chain.len() - 1));
    for (i, pair) in chain.windows(2).enumerate() {
        let (a, b) = (frame.cross(pair[0]), frame.cross(pair[1]));
        let sign = if b >= a { 1.0 } else { -1.0 };
        let mut start = a + sign * half;
        if i > 0 {
            start += sign * LINE_START_OFFSET;
        }
        let end = b - sign * half;
        out.push(PathCommand::MoveTo(frame.point(start, line_depth)));
        out.push(PathCommand::LineTo(frame.point(end, line_depth)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::links::build_links;
    use kindred_core::{ChartOptions, FamilyTree, FamilyTreeNode, LayoutDirection, PersonRecord};
    use std::collections::BTreeSet;

    fn person(id: i64) -> PersonRecord {
        PersonRecord::new(id, format!("Person {id}"))
    }

    fn laid_out(tree: &FamilyTree, layout_direction: LayoutDirection) -> Hierarchy {
        let options = ChartOptions {
            layout: layout_direction,
            ..Default::default()
        };
        let mut h = Hierarchy::build(tree, &options, &BTreeSet::new());
        layout(&mut h).unwrap();
        h
    }

    #[test]
    fn first_family_child_link_starts_between_the_couple() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))).with_children(vec![
                FamilyTreeNode::individual(person(3)),
                FamilyTreeNode::individual(person(4)),
            ]),
        ]);
        let h = laid_out(&tree, LayoutDirection::TopBottom);
        let links = build_links(&h);
        let child = links.iter().find(|l| l.target == Some(3)).unwrap();
        let path = vertical(&h, child);
        let (a, b, c) = (h.node(1).position, h.node(2).position, h.node(3).position);

        assert_eq!(path.len(), 4);
        assert_eq!(path[0], PathCommand::MoveTo(Point::new((a.x + b.x) / 2.0, a.y)));
        // mid-depth halfway through the gap between generations
        let mid = c.y - (175.0 / 2.0 + 40.0 / 2.0);
        assert_eq!(path[1].point(), Point::new((a.x + b.x) / 2.0, mid));
        assert_eq!(path[2].point(), Point::new(c.x, mid));
        assert_eq!(path[3].point(), Point::new(c.x, c.y - 87.5));
    }

    #[test]
    fn first_spouse_has_no_connector() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))),
        ]);
        let h = laid_out(&tree, LayoutDirection::LeftRight);
        let links = build_links(&h);
        assert_eq!(links.len(), 1);
        assert!(horizontal(&h, &links[0]).is_empty());
    }

    #[test]
    fn third_spouse_chain_runs_edge_to_edge() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)).with_spouses(vec![2, 3, 4]),
            FamilyTreeNode::spouse_slot(1, 0, Some(person(2))),
            FamilyTreeNode::spouse_slot(1, 1, Some(person(3))),
            FamilyTreeNode::spouse_slot(1, 2, Some(person(4))),
        ]);
        let h = laid_out(&tree, LayoutDirection::TopBottom);
        let links = build_links(&h);
        let third = links.iter().find(|l| l.source == 4).unwrap();
        let path = vertical(&h, third);
        assert_eq!(path.len(), 6);
        assert!(matches!(path[0], PathCommand::MoveTo(_)));
        assert!(matches!(path[2], PathCommand::MoveTo(_)));

        let y = h.node(4).position.y + 2.0 * SPOUSE_LINE_OFFSET;
        assert!(path.iter().all(|c| c.point().y == y));
        // partner's right edge to the first spouse's left edge
        assert_eq!(path[0].point().x, h.node(1).position.x + 75.0);
        assert_eq!(path[1].point().x, h.node(2).position.x - 75.0);
        // later segments start inset from the intermediate spouse's edge
        assert_eq!(
            path[2].point().x,
            h.node(2).position.x + 75.0 + LINE_START_OFFSET
        );
        assert_eq!(path[5].point().x, h.node(4).position.x - 75.0);
    }

    #[test]
    fn placeholder_source_leans_toward_the_individual() {
        let tree = FamilyTree::new(vec![
            FamilyTreeNode::individual(person(1)),
            FamilyTreeNode::spouse_slot(1, 1, None)
                .with_children(vec![FamilyTreeNode::individual(person(5))]),
        ]);
        let h = laid_out(&tree, LayoutDirection::LeftRight);
        let links = build_links(&h);
        let path = horizontal(&h, &links[0]);
        let slot = h.node(2).position;
        let start = path[0].point();
        assert_eq!(start.y, slot.y - (80.0 / 2.0 + 20.0 / 4.0));
        assert_eq!(start.x, slot.x + 310.0 / 2.0);
    }

    #[test]
    fn svg_path_data() {
        let d = to_svg_d(&[
            PathCommand::MoveTo(Point::new(0.0, -0.0)),
            PathCommand::LineTo(Point::new(12.5, 40.0)),
        ]);
        assert_eq!(d, "M0 0 L12.5 40");
    }
}
