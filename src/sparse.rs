//! Sparse graph store in CSR form.
//!
//! Three parallel arrays: `offsets[v]` is the start of `v`'s neighbor
//! range in `edges`, `degree[v]` its length. `has_edge` is linear in
//! the degree, which is fine off the refinement hot path. Structural
//! equality and the canonical total order require sorted adjacency
//! lists; [`SparseGraph::sort_adjacency`] establishes that, and
//! [`SparseGraph::permute`] re-establishes it.

use std::cmp::Ordering;

use crate::dense::MAX_VERTICES;
use crate::error::Error;

/// Adjacency-list graph on vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SparseGraph {
    n: usize,
    directed: bool,
    offsets: Vec<usize>,
    degree: Vec<usize>,
    edges: Vec<usize>,
}

impl SparseGraph {
    /// Build from an edge list; undirected input stores both directions.
    pub fn from_edges<I>(n: usize, edges: I, directed: bool) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        if n >= MAX_VERTICES {
            return Err(Error::TooManyVertices(n));
        }
        let pairs: Vec<(usize, usize)> = edges.into_iter().collect();
        let mut degree = vec![0usize; n];
        for &(v, w) in &pairs {
            if v >= n || w >= n {
                return Err(Error::EdgeOutOfRange {
                    vertex: v.max(w),
                    n,
                });
            }
            degree[v] += 1;
            if !directed && v != w {
                degree[w] += 1;
            }
        }
        let mut offsets = vec![0usize; n];
        let mut acc = 0;
        for v in 0..n {
            offsets[v] = acc;
            acc += degree[v];
        }
        let mut fill = offsets.clone();
        let mut e = vec![0usize; acc];
        for &(v, w) in &pairs {
            e[fill[v]] = w;
            fill[v] += 1;
            if !directed && v != w {
                e[fill[w]] = v;
                fill[w] += 1;
            }
        }
        Ok(Self {
            n,
            directed,
            offsets,
            degree,
            edges: e,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.degree[v]
    }

    /// Neighbor slice of `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.edges[self.offsets[v]..self.offsets[v] + self.degree[v]]
    }

    /// Linear scan of `v`'s list.
    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.neighbors(v).contains(&w)
    }

    pub fn arc_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_loops(&self) -> bool {
        (0..self.n).any(|v| self.neighbors(v).contains(&v))
    }

    /// Sort every adjacency list in place.
    pub fn sort_adjacency(&mut self) {
        for v in 0..self.n {
            let start = self.offsets[v];
            let end = start + self.degree[v];
            self.edges[start..end].sort_unstable();
        }
    }

    /// The graph `p(g)`: edge `(i, j)` holds iff `g` has edge `(p[i], p[j])`.
    ///
    /// Rewrites offsets, degrees and the edge array via the inverse
    /// permutation; adjacency comes out sorted.
    pub fn permute(&self, p: &[usize]) -> Self {
        debug_assert_eq!(p.len(), self.n);
        let mut inv = vec![0usize; self.n];
        for (i, &pi) in p.iter().enumerate() {
            inv[pi] = i;
        }
        let mut degree = vec![0usize; self.n];
        for v in 0..self.n {
            degree[inv[v]] = self.degree[v];
        }
        let mut offsets = vec![0usize; self.n];
        let mut acc = 0;
        for v in 0..self.n {
            offsets[v] = acc;
            acc += degree[v];
        }
        let mut edges = vec![0usize; acc];
        for v in 0..self.n {
            let iv = inv[v];
            let dst = &mut edges[offsets[iv]..offsets[iv] + degree[iv]];
            for (slot, &w) in dst.iter_mut().zip(self.neighbors(v)) {
                *slot = inv[w];
            }
            dst.sort_unstable();
        }
        Self {
            n: self.n,
            directed: self.directed,
            offsets,
            degree,
            edges,
        }
    }

    /// Check that `p` preserves adjacency.
    pub fn is_automorphism(&self, p: &[usize]) -> bool {
        if p.len() != self.n {
            return false;
        }
        for v in 0..self.n {
            if self.degree[v] != self.degree[p[v]] {
                return false;
            }
            for &w in self.neighbors(v) {
                if !self.has_edge(p[v], p[w]) {
                    return false;
                }
            }
        }
        true
    }
}

impl PartialOrd for SparseGraph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SparseGraph {
    fn cmp(&self, other: &Self) -> Ordering {
        self.n.cmp(&other.n).then_with(|| {
            for v in 0..self.n {
                let ord = self
                    .degree[v]
                    .cmp(&other.degree[v])
                    .then_with(|| self.neighbors(v).cmp(other.neighbors(v)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csr_layout() {
        let g = SparseGraph::from_edges(4, [(0, 1), (1, 2), (1, 3)], false).unwrap();
        assert_eq!(g.degree(1), 3);
        assert_eq!(g.neighbors(1), &[0, 2, 3]);
        assert_eq!(g.arc_count(), 6);
        assert!(g.has_edge(3, 1));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn directed_keeps_one_direction() {
        let g = SparseGraph::from_edges(3, [(0, 1), (1, 2)], true).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
        assert_eq!(g.arc_count(), 2);
    }

    #[test]
    fn self_loop_stored_once() {
        let g = SparseGraph::from_edges(2, [(0, 0), (0, 1)], false).unwrap();
        assert_eq!(g.neighbors(0), &[0, 1]);
        assert!(g.has_loops());
    }

    #[test]
    fn permute_matches_dense_semantics() {
        let g = SparseGraph::from_edges(3, [(0, 1), (1, 2)], false).unwrap();
        let h = g.permute(&[2, 1, 0]);
        assert!(h.has_edge(0, 1));
        assert!(h.has_edge(1, 2));
        assert!(!h.has_edge(0, 2));
    }

    #[test]
    fn equality_needs_sorted_lists() {
        let mut a = SparseGraph::from_edges(3, [(0, 1), (0, 2)], true).unwrap();
        let mut b = SparseGraph::from_edges(3, [(0, 2), (0, 1)], true).unwrap();
        assert_ne!(a, b);
        a.sort_adjacency();
        b.sort_adjacency();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn automorphism_check() {
        let p3 = SparseGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        assert!(p3.is_automorphism(&[3, 2, 1, 0]));
        assert!(!p3.is_automorphism(&[1, 0, 2, 3]));
    }
}
