//! Vertex orbits under the group discovered so far.
//!
//! A union-find over `0..n` whose roots are always the smallest vertex
//! of their class. Orbits start as singletons, are merged monotonically
//! as automorphisms are found, and are never split.

use crate::perm::Permutation;

/// Union-find over vertices with minimal representatives.
#[derive(Debug, Clone)]
pub struct Orbits {
    parent: Vec<usize>,
}

impl Orbits {
    /// Every vertex in its own orbit.
    pub fn singletons(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `i`'s orbit, with path compression.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the orbits of `i` and `j`; the smaller root survives.
    pub fn join(&mut self, i: usize, j: usize) {
        let ri = self.find(i);
        let rj = self.find(j);
        if ri < rj {
            self.parent[rj] = ri;
        } else if rj < ri {
            self.parent[ri] = rj;
        }
    }

    pub fn same(&mut self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    /// Merge along a permutation: afterwards every pair `(i, p[i])`
    /// shares a root. Finishes with a full compression pass and returns
    /// the orbit count.
    pub fn join_permutation(&mut self, p: &Permutation) -> usize {
        for i in 0..self.parent.len() {
            let pi = p.image(i);
            if pi != i {
                self.join(i, pi);
            }
        }
        self.compress_and_count()
    }

    /// One pass of path compression plus a root count.
    pub fn compress_and_count(&mut self) -> usize {
        let mut count = 0;
        for i in 0..self.parent.len() {
            let r = self.find(i);
            if r == i {
                count += 1;
            }
        }
        count
    }

    /// The fully compressed parent array: `slice[v]` is the smallest
    /// vertex of `v`'s orbit.
    pub fn into_vec(mut self) -> Vec<usize> {
        self.compress_and_count();
        self.parent
    }

    /// Compressed view without consuming.
    pub fn to_vec(&self) -> Vec<usize> {
        let mut clone = self.clone();
        clone.compress_and_count();
        clone.parent
    }

    /// The raw parent array. Fully compressed right after
    /// [`Orbits::join_permutation`] or [`Orbits::compress_and_count`].
    pub fn as_slice(&self) -> &[usize] {
        &self.parent
    }
}
