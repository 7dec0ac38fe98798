//! Orientation strategy: box metrics, node pitch, coordinate normalization and elbow dispatch.
//!
//! The layout engine works in a "cross / depth" frame: the cross axis runs along siblings, the
//! depth axis along generations. Vertical charts map cross to `x` and depth to `y`; horizontal
//! charts swap them. Call sites ask for [`Orientation::axis`] and never match on the layout
//! variant themselves.

use crate::elbow::{self, PathCommand};
use crate::geometry::{BoxMetrics, ImageMetrics, Point, TextAnchor, TextMetrics};
use crate::hierarchy::Hierarchy;
use crate::links::LinkRecord;
use kindred_core::LayoutDirection;
use serde::{Deserialize, Serialize};

pub const VERTICAL_BOX_WIDTH: f64 = 150.0;
pub const VERTICAL_BOX_HEIGHT: f64 = 175.0;
pub const VERTICAL_X_OFFSET: f64 = 30.0;
pub const VERTICAL_Y_OFFSET: f64 = 40.0;

pub const HORIZONTAL_BOX_WIDTH: f64 = 310.0;
pub const HORIZONTAL_BOX_HEIGHT: f64 = 80.0;
pub const HORIZONTAL_X_OFFSET: f64 = 40.0;
pub const HORIZONTAL_Y_OFFSET: f64 = 20.0;

/// Extra box height when vertical charts show the alternative name line.
pub const ALTERNATIVE_NAME_HEIGHT: f64 = 30.0;

const FONT_SIZE: f64 = 13.0;
const LINE_HEIGHT: f64 = 16.0;
const BOX_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Generations stack along `y`.
    Vertical,
    /// Generations stack along `x`.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientation {
    layout: LayoutDirection,
    box_width: f64,
    box_height: f64,
    x_offset: f64,
    y_offset: f64,
}

impl Orientation {
    pub fn new(layout: LayoutDirection) -> Self {
        let (box_width, box_height, x_offset, y_offset) = match layout {
            LayoutDirection::TopBottom | LayoutDirection::BottomTop => (
                VERTICAL_BOX_WIDTH,
                VERTICAL_BOX_HEIGHT,
                VERTICAL_X_OFFSET,
                VERTICAL_Y_OFFSET,
            ),
            LayoutDirection::LeftRight | LayoutDirection::RightLeft => (
                HORIZONTAL_BOX_WIDTH,
                HORIZONTAL_BOX_HEIGHT,
                HORIZONTAL_X_OFFSET,
                HORIZONTAL_Y_OFFSET,
            ),
        };
        Self {
            layout,
            box_width,
            box_height,
            x_offset,
            y_offset,
        }
    }

    /// Grows the box for the alternative name line. Horizontal boxes already have room for it.
    pub fn with_alternative_names(mut self) -> Self {
        if self.axis() == Axis::Vertical {
            self.box_height += ALTERNATIVE_NAME_HEIGHT;
        }
        self
    }

    pub fn layout(&self) -> LayoutDirection {
        self.layout
    }

    pub fn axis(&self) -> Axis {
        match self.layout {
            LayoutDirection::TopBottom | LayoutDirection::BottomTop => Axis::Vertical,
            LayoutDirection::LeftRight | LayoutDirection::RightLeft => Axis::Horizontal,
        }
    }

    /// `1.0` when generations grow toward positive coordinates, `-1.0` otherwise.
    pub fn direction(&self) -> f64 {
        match self.layout {
            LayoutDirection::TopBottom | LayoutDirection::LeftRight => 1.0,
            LayoutDirection::BottomTop | LayoutDirection::RightLeft => -1.0,
        }
    }

    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    pub fn box_height(&self) -> f64 {
        self.box_height
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    /// Vertical boxes are narrow, so first and last names go on separate lines.
    pub fn split_names(&self) -> bool {
        self.axis() == Axis::Vertical
    }

    /// Box extent along the sibling axis.
    pub fn box_cross(&self) -> f64 {
        match self.axis() {
            Axis::Vertical => self.box_width,
            Axis::Horizontal => self.box_height,
        }
    }

    /// Box extent along the generation axis.
    pub fn box_depth(&self) -> f64 {
        match self.axis() {
            Axis::Vertical => self.box_height,
            Axis::Horizontal => self.box_width,
        }
    }

    pub fn cross_offset(&self) -> f64 {
        match self.axis() {
            Axis::Vertical => self.x_offset,
            Axis::Horizontal => self.y_offset,
        }
    }

    pub fn depth_offset(&self) -> f64 {
        match self.axis() {
            Axis::Vertical => self.y_offset,
            Axis::Horizontal => self.x_offset,
        }
    }

    /// Pitch between neighbouring nodes of one generation.
    pub fn node_width(&self) -> f64 {
        self.box_cross() + self.cross_offset()
    }

    /// Pitch between generations.
    pub fn node_height(&self) -> f64 {
        self.box_depth() + self.depth_offset()
    }

    /// Maps a raw tidy-layout position (`raw_x` along siblings, `depth` in generations) onto
    /// screen coordinates.
    pub fn norm(&self, raw_x: f64, depth: usize) -> Point {
        let depth = self.direction() * depth as f64 * self.node_height();
        match self.axis() {
            Axis::Vertical => Point::new(raw_x, depth),
            Axis::Horizontal => Point::new(depth, raw_x),
        }
    }

    pub fn cross(&self, p: Point) -> f64 {
        match self.axis() {
            Axis::Vertical => p.x,
            Axis::Horizontal => p.y,
        }
    }

    pub fn depth(&self, p: Point) -> f64 {
        match self.axis() {
            Axis::Vertical => p.y,
            Axis::Horizontal => p.x,
        }
    }

    /// Builds a screen point from cross/depth coordinates.
    pub fn point(&self, cross: f64, depth: f64) -> Point {
        match self.axis() {
            Axis::Vertical => Point::new(cross, depth),
            Axis::Horizontal => Point::new(depth, cross),
        }
    }

    /// Moves `p` along the cross axis.
    pub fn shift_cross(&self, p: Point, delta: f64) -> Point {
        self.point(self.cross(p) + delta, self.depth(p))
    }

    pub fn elbow(&self, hierarchy: &Hierarchy, link: &LinkRecord) -> Vec<PathCommand> {
        match self.axis() {
            Axis::Vertical => elbow::vertical(hierarchy, link),
            Axis::Horizontal => elbow::horizontal(hierarchy, link),
        }
    }

    pub fn box_metrics(&self) -> BoxMetrics {
        let corner_radius = match self.axis() {
            Axis::Vertical => 20.0,
            Axis::Horizontal => self.box_height / 2.0,
        };
        BoxMetrics {
            width: self.box_width,
            height: self.box_height,
            corner_radius,
        }
    }

    pub fn image_metrics(&self) -> ImageMetrics {
        match self.axis() {
            Axis::Vertical => ImageMetrics {
                x: -40.0,
                y: -self.box_height / 2.0 + BOX_PADDING,
                width: 80.0,
                height: 80.0,
                corner_radius: 40.0,
            },
            Axis::Horizontal => ImageMetrics {
                x: -self.box_width / 2.0 + BOX_PADDING,
                y: -30.0,
                width: 60.0,
                height: 60.0,
                corner_radius: 30.0,
            },
        }
    }

    /// Text placement for a box whose thumbnail slot is always reserved.
    pub fn text_metrics(&self) -> TextMetrics {
        let image = self.image_metrics();
        match self.axis() {
            Axis::Vertical => TextMetrics {
                x: 0.0,
                y: image.y + image.height + 2.0 * BOX_PADDING,
                anchor: TextAnchor::Middle,
                line_height: LINE_HEIGHT,
                font_size: FONT_SIZE,
                max_width: self.box_width - BOX_PADDING,
            },
            Axis::Horizontal => {
                let x = image.x + image.width + BOX_PADDING;
                TextMetrics {
                    x,
                    y: -self.box_height / 2.0 + 22.0,
                    anchor: TextAnchor::Start,
                    line_height: LINE_HEIGHT,
                    font_size: FONT_SIZE,
                    max_width: self.box_width / 2.0 - x - BOX_PADDING,
                }
            }
        }
    }
}

impl From<LayoutDirection> for Orientation {
    fn from(layout: LayoutDirection) -> Self {
        Self::new(layout)
    }
}
