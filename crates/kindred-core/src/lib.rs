#![forbid(unsafe_code)]

//! Input model and options for kindred descendants charts (headless).
//!
//! The host application exports a person/family tree as JSON ([`FamilyTree`]) and a handful of
//! form options ([`ChartOptions`]); everything downstream (hierarchy, layout, links, SVG) lives
//! in `kindred-render`.

pub mod config;
pub mod error;
pub mod model;

pub use config::{ChartOptions, LayoutDirection, OptionLayers};
pub use error::{Error, Result};
pub use model::{FamilyTree, FamilyTreeNode, PersonId, PersonRecord, Sex};
