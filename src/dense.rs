//! Dense graph store: one row of set words per vertex.
//!
//! Row `v` holds the out-neighbors of `v` in the bit order of
//! [`crate::bitset`]. Undirected construction sets both directions.
//! The total order on graphs (words compared as unsigned, row by row)
//! is what the canonical competition uses, so it is part of the
//! contract, not a convenience.

use std::cmp::Ordering;

use crate::bitset::{self, Elements};
use crate::error::Error;

/// Largest supported vertex count, `2^30`.
pub const MAX_VERTICES: usize = 1 << 30;

/// Bit-matrix graph on vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DenseGraph {
    n: usize,
    m: usize,
    directed: bool,
    rows: Vec<u64>,
}

impl DenseGraph {
    /// An edgeless graph on `n` vertices.
    pub fn empty(n: usize, directed: bool) -> Result<Self, Error> {
        if n >= MAX_VERTICES {
            return Err(Error::TooManyVertices(n));
        }
        let m = bitset::words_needed(n);
        Ok(Self {
            n,
            m,
            directed,
            rows: vec![0; n * m],
        })
    }

    /// Build from an edge list. For undirected graphs both `(v, w)` and
    /// `(w, v)` bits are set. Endpoints are validated up front.
    pub fn from_edges<I>(n: usize, edges: I, directed: bool) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::empty(n, directed)?;
        for (v, w) in edges {
            if v >= n || w >= n {
                return Err(Error::EdgeOutOfRange {
                    vertex: v.max(w),
                    n,
                });
            }
            g.add_edge(v, w);
        }
        Ok(g)
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Words per row.
    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Read-only view of the bit row of `v`.
    #[inline]
    pub fn row(&self, v: usize) -> &[u64] {
        &self.rows[v * self.m..(v + 1) * self.m]
    }

    #[inline]
    fn row_mut(&mut self, v: usize) -> &mut [u64] {
        &mut self.rows[v * self.m..(v + 1) * self.m]
    }

    pub(crate) fn add_edge(&mut self, v: usize, w: usize) {
        bitset::insert(self.row_mut(v), w);
        if !self.directed {
            bitset::insert(self.row_mut(w), v);
        }
    }

    #[inline]
    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        bitset::contains(self.row(v), w)
    }

    /// Out-degree of `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        bitset::size(self.row(v))
    }

    /// Out-neighbors of `v` in increasing order.
    pub fn neighbors(&self, v: usize) -> Elements<'_> {
        bitset::elements(self.row(v))
    }

    /// Total number of set adjacency bits.
    pub fn arc_count(&self) -> usize {
        (0..self.n).map(|v| self.degree(v)).sum()
    }

    /// Whether any vertex has a self-loop.
    pub fn has_loops(&self) -> bool {
        (0..self.n).any(|v| self.has_edge(v, v))
    }

    /// The graph `p(g)`: edge `(i, j)` holds iff `g` has edge `(p[i], p[j])`.
    pub fn permute(&self, p: &[usize]) -> Self {
        debug_assert_eq!(p.len(), self.n);
        let mut inv = vec![0usize; self.n];
        for (i, &pi) in p.iter().enumerate() {
            inv[pi] = i;
        }
        let mut out = Self {
            n: self.n,
            m: self.m,
            directed: self.directed,
            rows: vec![0; self.n * self.m],
        };
        for v in 0..self.n {
            let iv = inv[v];
            for w in self.neighbors(v) {
                bitset::insert(out.row_mut(iv), inv[w]);
            }
        }
        out
    }

    /// Check that `p` preserves adjacency in both directions.
    ///
    /// Per-vertex out-degree equality plus edge-to-edge mapping is
    /// enough: each row then maps bijectively onto its image row.
    pub fn is_automorphism(&self, p: &[usize]) -> bool {
        if p.len() != self.n {
            return false;
        }
        for v in 0..self.n {
            if self.degree(v) != self.degree(p[v]) {
                return false;
            }
            for w in self.neighbors(v) {
                if !self.has_edge(p[v], p[w]) {
                    return false;
                }
            }
        }
        true
    }
}

impl PartialOrd for DenseGraph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DenseGraph {
    fn cmp(&self, other: &Self) -> Ordering {
        self.n
            .cmp(&other.n)
            .then_with(|| self.rows.cmp(&other.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_sets_both_bits() {
        let g = DenseGraph::from_edges(3, [(0, 1), (1, 2)], false).unwrap();
        assert!(g.has_edge(0, 1) && g.has_edge(1, 0));
        assert!(g.has_edge(1, 2) && g.has_edge(2, 1));
        assert!(!g.has_edge(0, 2));
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn directed_sets_one_bit() {
        let g = DenseGraph::from_edges(3, [(0, 1)], true).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
    }

    #[test]
    fn bad_endpoint_is_reported() {
        let err = DenseGraph::from_edges(2, [(0, 5)], false).unwrap_err();
        assert!(matches!(err, Error::EdgeOutOfRange { vertex: 5, n: 2 }));
    }

    #[test]
    fn permute_pulls_back_edges() {
        // path 0-1-2; p = [2,1,0] gives edge (i,j) iff g has (p[i],p[j])
        let g = DenseGraph::from_edges(3, [(0, 1), (1, 2)], false).unwrap();
        let h = g.permute(&[2, 1, 0]);
        assert!(h.has_edge(0, 1));
        assert!(h.has_edge(1, 2));
        assert!(!h.has_edge(0, 2));

        let g = DenseGraph::from_edges(3, [(0, 1)], true).unwrap();
        let h = g.permute(&[1, 2, 0]);
        // h(i,j) iff g(p[i],p[j]); only g(0,1) exists, so i=2, j=0
        assert!(h.has_edge(2, 0));
        assert_eq!(h.arc_count(), 1);
    }

    #[test]
    fn automorphism_check() {
        let c4 = DenseGraph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)], false).unwrap();
        assert!(c4.is_automorphism(&[1, 2, 3, 0]));
        assert!(c4.is_automorphism(&[3, 2, 1, 0]));
        assert!(!c4.is_automorphism(&[1, 0, 2, 3]));
    }

    #[test]
    fn word_order_is_total() {
        let a = DenseGraph::from_edges(3, [(0, 1)], false).unwrap();
        let b = DenseGraph::from_edges(3, [(0, 2)], false).unwrap();
        // vertex 1 bit is more significant than vertex 2 bit
        assert!(a > b);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn spans_multiple_words() {
        let n = 130;
        let g = DenseGraph::from_edges(n, [(0, 129), (64, 65)], false).unwrap();
        assert_eq!(g.m(), 3);
        assert!(g.has_edge(129, 0));
        assert!(g.has_edge(64, 65));
        assert_eq!(g.arc_count(), 4);
    }
}
