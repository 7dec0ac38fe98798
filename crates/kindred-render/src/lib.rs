#![forbid(unsafe_code)]

//! Headless layout and SVG rendering of descendants charts.
//!
//! The pipeline runs once per draw: [`hierarchy::Hierarchy::build`] turns the host tree into an
//! arena, [`layout::layout`] positions it, [`links::build_links`] derives the connections and
//! the orientation's elbow constructor turns each of them into a path. [`layout_chart`] runs all
//! of it and returns a serializable [`model::ChartLayout`]; [`svg::render_chart_svg`] draws one.

pub mod elbow;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod layout;
pub mod links;
pub mod model;
pub mod orientation;
pub mod svg;
pub mod text;
pub mod thumbnail;

pub use error::{Error, Result};

use crate::hierarchy::{Hierarchy, NodeId};
use crate::model::ChartLayout;
use kindred_core::{ChartOptions, FamilyTree};
use std::collections::BTreeSet;

/// Lays out `tree`; nodes listed in `collapsed` keep their children hidden.
pub fn layout_chart(
    tree: &FamilyTree,
    options: &ChartOptions,
    collapsed: &BTreeSet<NodeId>,
) -> Result<ChartLayout> {
    options.validate()?;
    let mut hierarchy = Hierarchy::build(tree, options, collapsed);
    layout::layout(&mut hierarchy)?;
    let links = links::build_links(&hierarchy);
    tracing::debug!(
        nodes = hierarchy.len(),
        links = links.len(),
        "descendants chart laid out"
    );
    Ok(ChartLayout::from_hierarchy(&hierarchy, links))
}
