//! Buchheim/Walker tidy tree layout.
//!
//! This mirrors d3-hierarchy's `tree()` with `nodeSize([dx, dy])`: the root is placed at
//! `x = 0`, every node at `y = depth * dy`, and adjacent nodes on a level are kept at least
//! `separation(left, right) * dx` apart. Parents are centered over their children.
//!
//! One deliberate difference: the separation callback always receives the left node first.

use crate::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub depth: usize,
}

/// d3's default: siblings are one unit apart, cousins two.
pub fn default_separation(tree: &Tree, left: usize, right: usize) -> f64 {
    if tree.parent(left) == tree.parent(right) {
        1.0
    } else {
        2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayout {
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            node_width: 1.0,
            node_height: 1.0,
        }
    }
}

impl TreeLayout {
    pub fn new(node_width: f64, node_height: f64) -> Self {
        Self {
            node_width,
            node_height,
        }
    }

    /// Lays out `tree` with d3's default separation.
    pub fn layout_default(&self, tree: &Tree) -> Vec<Position> {
        self.layout(tree, |l, r| default_separation(tree, l, r))
    }

    /// Lays out `tree`; the result is indexed like the tree's arena.
    pub fn layout<F>(&self, tree: &Tree, separation: F) -> Vec<Position>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut walk = Walk::new(tree, separation);
        for v in tree.post_order() {
            walk.first_walk(v);
        }
        let root = tree.root();
        let root_mod = -walk.z[root];
        let mut x = vec![0.0; tree.len()];
        for v in tree.pre_order() {
            let parent_mod = tree.parent(v).map(|p| walk.m[p]).unwrap_or(root_mod);
            x[v] = walk.z[v] + parent_mod;
            walk.m[v] += parent_mod;
        }

        (0..tree.len())
            .map(|v| {
                let depth = tree.depth(v);
                Position {
                    x: x[v] * self.node_width,
                    y: depth as f64 * self.node_height,
                    depth,
                }
            })
            .collect()
    }
}

/// Per-node scratch state (d3 field names: z = prelim, m = mod, c = change, s = shift,
/// t = thread, a = ancestor, i = sibling index).
struct Walk<'t, F> {
    tree: &'t Tree,
    separation: F,
    z: Vec<f64>,
    m: Vec<f64>,
    c: Vec<f64>,
    s: Vec<f64>,
    t: Vec<Option<usize>>,
    a: Vec<usize>,
    i: Vec<usize>,
    /// Default ancestor for apportioning children of a node (d3's `parent.A`).
    default_ancestor: Vec<Option<usize>>,
}

impl<'t, F> Walk<'t, F>
where
    F: FnMut(usize, usize) -> f64,
{
    fn new(tree: &'t Tree, separation: F) -> Self {
        let len = tree.len();
        let mut i = vec![0; len];
        for v in 0..len {
            for (idx, &c) in tree.children(v).iter().enumerate() {
                i[c] = idx;
            }
        }
        Self {
            tree,
            separation,
            z: vec![0.0; len],
            m: vec![0.0; len],
            c: vec![0.0; len],
            s: vec![0.0; len],
            t: vec![None; len],
            a: (0..len).collect(),
            i,
            default_ancestor: vec![None; len],
        }
    }

    fn siblings(&self, v: usize) -> &'t [usize] {
        match self.tree.parent(v) {
            Some(p) => self.tree.children(p),
            None => self.tree.root_slice(),
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.tree.children(v).first().copied().or(self.t[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.tree.children(v).last().copied().or(self.t[v])
    }

    fn first_walk(&mut self, v: usize) {
        let tree = self.tree;
        let siblings = self.siblings(v);
        let w = if self.i[v] > 0 {
            siblings.get(self.i[v] - 1).copied()
        } else {
            None
        };

        let children = tree.children(v);
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.z[first] + self.z[last]) / 2.0;
            match w {
                Some(w) => {
                    self.z[v] = self.z[w] + (self.separation)(w, v);
                    self.m[v] = self.z[v] - midpoint;
                }
                None => self.z[v] = midpoint,
            }
        } else if let Some(w) = w {
            self.z[v] = self.z[w] + (self.separation)(w, v);
        }

        if let Some(p) = tree.parent(v) {
            let ancestor = self.default_ancestor[p].unwrap_or(siblings[0]);
            self.default_ancestor[p] = Some(self.apportion(v, w, ancestor));
        }
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in self.tree.children(v).iter().rev() {
            self.z[w] += shift;
            self.m[w] += shift;
            change += self.c[w];
            shift += self.s[w] + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        if self.tree.parent(self.a[vim]) == self.tree.parent(v) {
            self.a[vim]
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let spread = self.i[wp].saturating_sub(self.i[wm]).max(1) as f64;
        let change = shift / spread;
        self.c[wp] -= change;
        self.s[wp] += shift;
        self.c[wm] += change;
        self.z[wp] += shift;
        self.m[wp] += shift;
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };
        let Some(&leftmost) = self.siblings(v).first() else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = leftmost;
        let mut sip = self.m[vip];
        let mut sop = self.m[vop];
        let mut sim = self.m[vim];
        let mut som = self.m[vom];

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vom = om;
            vop = op;
            self.a[vop] = v;

            let shift = self.z[vim] + sim - self.z[vip] - sip + (self.separation)(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.m[vim];
            sip += self.m[vip];
            som += self.m[vom];
            sop += self.m[vop];

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im {
            if self.next_right(vop).is_none() {
                self.t[vop] = Some(im);
                self.m[vop] += sim - sop;
            }
        }
        if let Some(ip) = next_ip {
            if self.next_left(vom).is_none() {
                self.t[vom] = Some(ip);
                self.m[vom] += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_node_sits_at_origin() {
        let t = Tree::from_children(0, vec![vec![]]).unwrap();
        let p = TreeLayout::new(10.0, 20.0).layout_default(&t);
        assert_eq!(
            p,
            vec![Position {
                x: 0.0,
                y: 0.0,
                depth: 0
            }]
        );
    }

    #[test]
    fn parent_is_centered_over_two_children() {
        let t = Tree::from_children(0, vec![vec![1, 2], vec![], vec![]]).unwrap();
        let p = TreeLayout::new(10.0, 20.0).layout_default(&t);
        assert!(approx(p[0].x, 0.0));
        assert!(approx(p[1].x, -5.0));
        assert!(approx(p[2].x, 5.0));
        assert!(approx(p[1].y, 20.0));
    }

    #[test]
    fn cousins_use_double_separation() {
        // 0 -> [1, 2]; 1 -> [3]; 2 -> [4]
        let t = Tree::from_children(0, vec![vec![1, 2], vec![3], vec![4], vec![], vec![]])
            .unwrap();
        let p = TreeLayout::new(1.0, 1.0).layout_default(&t);
        assert!(approx(p[4].x - p[3].x, 2.0));
        assert!(approx(p[2].x - p[1].x, 2.0));
    }

    #[test]
    fn separation_receives_left_node_first() {
        let t = Tree::from_children(0, vec![vec![1, 2, 3], vec![], vec![], vec![]]).unwrap();
        let mut calls = Vec::new();
        TreeLayout::default().layout(&t, |l, r| {
            calls.push((l, r));
            1.0
        });
        assert_eq!(calls, vec![(1, 2), (2, 3)]);
    }
}
