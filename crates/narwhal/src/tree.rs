//! Arena-backed rooted tree used as layout input.

use crate::error::{Error, Result};

/// A rooted, ordered tree stored as child index lists.
///
/// Node indices are positions in the arena; children are kept in the order given, which is the
/// left-to-right order of the layout.
#[derive(Debug, Clone)]
pub struct Tree {
    root: usize,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    depth: Vec<usize>,
}

impl Tree {
    /// Builds a tree from per-node child lists, validating that the structure is a single
    /// rooted tree (every non-root node has exactly one parent and is reachable from `root`).
    pub fn from_children(root: usize, children: Vec<Vec<usize>>) -> Result<Self> {
        let len = children.len();
        if len == 0 {
            return Err(Error::Empty);
        }
        if root >= len {
            return Err(Error::RootOutOfRange { root, len });
        }

        let mut parent: Vec<Option<usize>> = vec![None; len];
        for (p, kids) in children.iter().enumerate() {
            for &c in kids {
                if c >= len {
                    return Err(Error::ChildOutOfRange { parent: p, child: c });
                }
                if c == root {
                    return Err(Error::RootHasParent { root, parent: p });
                }
                if let Some(first) = parent[c] {
                    return Err(Error::MultipleParents {
                        child: c,
                        first,
                        second: p,
                    });
                }
                parent[c] = Some(p);
            }
        }

        let mut depth = vec![usize::MAX; len];
        depth[root] = 0;
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            for &c in &children[v] {
                depth[c] = depth[v] + 1;
                stack.push(c);
            }
        }
        if let Some(node) = depth.iter().position(|&d| d == usize::MAX) {
            return Err(Error::Unreachable { node });
        }

        Ok(Self {
            root,
            parent,
            children,
            depth,
        })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// The root as a one-element sibling list (d3 hangs the root under a virtual parent).
    pub(crate) fn root_slice(&self) -> &[usize] {
        std::slice::from_ref(&self.root)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parent.get(node).copied().flatten()
    }

    pub fn children(&self, node: usize) -> &[usize] {
        self.children.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn depth(&self, node: usize) -> usize {
        self.depth.get(node).copied().unwrap_or(0)
    }

    /// Nodes in pre-order (parent before children, children left to right).
    pub fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.children[v].iter().rev().copied());
        }
        out
    }

    /// Nodes in post-order (children left to right before their parent).
    pub fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![(self.root, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                out.push(v);
                continue;
            }
            stack.push((v, true));
            for &c in self.children[v].iter().rev() {
                stack.push((c, false));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_orders_follow_child_order() {
        // 0 -> [1, 2], 1 -> [3]
        let t = Tree::from_children(0, vec![vec![1, 2], vec![3], vec![], vec![]]).unwrap();
        assert_eq!(t.pre_order(), vec![0, 1, 3, 2]);
        assert_eq!(t.post_order(), vec![3, 1, 2, 0]);
        assert_eq!(t.depth(3), 2);
        assert_eq!(t.parent(3), Some(1));
        assert_eq!(t.parent(0), None);
    }

    #[test]
    fn rejects_nodes_with_two_parents() {
        let err = Tree::from_children(0, vec![vec![1, 2], vec![2], vec![]]).unwrap_err();
        assert_eq!(
            err,
            Error::MultipleParents {
                child: 2,
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn rejects_detached_cycles() {
        let err = Tree::from_children(0, vec![vec![], vec![2], vec![1]]).unwrap_err();
        assert!(matches!(err, Error::Unreachable { .. }));
    }
}
