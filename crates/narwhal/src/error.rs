#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("tree has no nodes")]
    Empty,
    #[error("root index {root} is out of range for {len} nodes")]
    RootOutOfRange { root: usize, len: usize },
    #[error("node {parent} lists child {child}, which is out of range")]
    ChildOutOfRange { parent: usize, child: usize },
    #[error("node {child} has more than one parent ({first} and {second})")]
    MultipleParents {
        child: usize,
        first: usize,
        second: usize,
    },
    #[error("root {root} is listed as a child of node {parent}")]
    RootHasParent { root: usize, parent: usize },
    #[error("node {node} is not reachable from the root")]
    Unreachable { node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
