#![forbid(unsafe_code)]

//! Tidy tree layout with a fixed node size and a caller-supplied separation function.
//!
//! `narwhal` is used by `kindred-render` as the generic layout primitive underneath the
//! descendants chart. It follows d3-hierarchy's `tree()` (Buchheim, Jünger and Leipert's
//! linear-time variant of Walker's algorithm) so charts keep the familiar d3 spacing.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod layout;
pub mod tree;

pub use error::{Error, Result};
pub use layout::{Position, TreeLayout, default_separation};
pub use tree::Tree;
