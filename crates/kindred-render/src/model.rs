use crate::elbow::{PathCommand, to_svg_d};
use crate::geometry::{BoxMetrics, Bounds, ImageMetrics, Point, TextMetrics};
use crate::hierarchy::{Fold, Hierarchy, NodeId, NodeKind};
use crate::links::LinkRecord;
use crate::orientation::{Axis, Orientation};
use kindred_core::PersonRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub family: usize,
    /// `None` for placeholder spouse slots, which are laid out but not drawn.
    pub person: Option<PersonRecord>,
    pub fold: Fold,
    /// Whether the node has children at all, visible or collapsed.
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouses: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<NodeId>,
}

impl LayoutNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_placeholder(&self) -> bool {
        self.person.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkKind {
    Child,
    Spouse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLink {
    pub kind: LinkKind,
    #[serde(flatten)]
    pub record: LinkRecord,
    pub path: Vec<PathCommand>,
    /// SVG path data of `path`; empty when nothing is drawn.
    pub d: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub orientation: Orientation,
    pub axis: Axis,
    pub direction: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub box_metrics: BoxMetrics,
    pub image: ImageMetrics,
    pub text: TextMetrics,
    /// Laid-out nodes in pre-order, the synthetic root excluded.
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
    pub bounds: Option<Bounds>,
}

impl ChartLayout {
    pub fn from_hierarchy(hierarchy: &Hierarchy, records: Vec<LinkRecord>) -> Self {
        let orientation = *hierarchy.orientation();
        let nodes: Vec<LayoutNode> = hierarchy
            .visible()
            .into_iter()
            .filter(|&id| id != hierarchy.root())
            .map(|id| {
                let n = hierarchy.node(id);
                LayoutNode {
                    id,
                    kind: n.kind,
                    depth: n.depth,
                    x: n.position.x,
                    y: n.position.y,
                    family: n.family,
                    person: n.record().cloned(),
                    fold: n.fold,
                    has_children: !n.children.is_empty(),
                    spouses: n.spouses().map(<[NodeId]>::to_vec).unwrap_or_default(),
                    spouse: n.partner(),
                }
            })
            .collect();

        let links: Vec<LayoutLink> = records
            .into_iter()
            .map(|record| {
                let path = orientation.elbow(hierarchy, &record);
                LayoutLink {
                    kind: if record.is_spouse_link() {
                        LinkKind::Spouse
                    } else {
                        LinkKind::Child
                    },
                    d: to_svg_d(&path),
                    path,
                    record,
                }
            })
            .collect();

        let box_metrics = orientation.box_metrics();
        let (hw, hh) = (box_metrics.half_width(), box_metrics.half_height());
        let corners = nodes
            .iter()
            .filter(|n| !n.is_placeholder())
            .flat_map(|n| {
                [
                    Point::new(n.x - hw, n.y - hh),
                    Point::new(n.x + hw, n.y + hh),
                ]
            });
        let path_points = links.iter().flat_map(|l| l.path.iter().map(PathCommand::point));
        let bounds = Bounds::from_points(corners.chain(path_points));

        Self {
            axis: orientation.axis(),
            direction: orientation.direction(),
            node_width: orientation.node_width(),
            node_height: orientation.node_height(),
            box_metrics,
            image: orientation.image_metrics(),
            text: orientation.text_metrics(),
            orientation,
            nodes,
            links,
            bounds,
        }
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn child_links(&self) -> impl Iterator<Item = &LayoutLink> {
        self.links.iter().filter(|l| l.kind == LinkKind::Child)
    }

    pub fn spouse_links(&self) -> impl Iterator<Item = &LayoutLink> {
        self.links.iter().filter(|l| l.kind == LinkKind::Spouse)
    }
}
