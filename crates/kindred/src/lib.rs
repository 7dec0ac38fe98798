#![forbid(unsafe_code)]

//! `kindred` draws genealogical descendants charts without a browser.
//!
//! Feed it the person/family tree a host application exports as JSON and get back a laid-out
//! chart (boxes, elbow links, bounds) or a finished SVG.
//!
//! # Features
//!
//! - `render` (default): layout + SVG rendering and the stateful [`Chart`]
//! - `raster`: PNG/JPG output via pure-Rust SVG rasterization

pub use kindred_core::*;

#[cfg(feature = "render")]
mod chart;

#[cfg(feature = "render")]
pub use chart::Chart;

#[cfg(feature = "render")]
pub mod render {
    pub use kindred_render::hierarchy::{Fold, NodeId, NodeKind};
    pub use kindred_render::layout_chart;
    pub use kindred_render::model::{ChartLayout, LayoutLink, LayoutNode, LinkKind};
    pub use kindred_render::svg::{SvgRenderOptions, render_chart_svg};
    pub use kindred_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use kindred_render::thumbnail::{
        FileThumbnailLoader, NoThumbnails, ThumbnailError, ThumbnailLoader,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Input(#[from] kindred_core::Error),
        #[error(transparent)]
        Render(#[from] kindred_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so several charts can be
    /// inlined into one document without clip path id collisions.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.trim().chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            if ok {
                out.push(ch);
            } else if !out.ends_with('-') {
                out.push('-');
            }
        }
        let out = out.trim_matches('-');
        match out.chars().next() {
            None => "chart".to_string(),
            Some(c) if c.is_ascii_alphabetic() => out.to_string(),
            Some(_) => format!("c-{out}"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::sanitize_svg_id;

        #[test]
        fn svg_ids_are_conservative() {
            assert_eq!(sanitize_svg_id(" Family of I1 "), "Family-of-I1");
            assert_eq!(sanitize_svg_id("42/tree"), "c-42-tree");
            assert_eq!(sanitize_svg_id("%%"), "chart");
        }
    }
}
