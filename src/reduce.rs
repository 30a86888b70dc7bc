//! Reduction of weighted petgraph graphs to plain engine graphs.
//!
//! Node weights become color classes of the initial partition, ordered
//! by weight. Multi-edges are merged into a single edge whose effective
//! weight is the sorted vector of the individual weights; self-loop
//! weights are appended to the node weight instead. The most common
//! edge weight is taken as the implicit default; every edge with a
//! different weight is routed through a fresh auxiliary vertex
//! (`u -> x -> v`), with one color class per distinct weight vector.
//!
//! Engine vertex ids are the ranks of the input vertices under the
//! weight order, so the color classes are exactly the runs of equal
//! weight and fall out of the same sorting pass. Auxiliary vertices
//! are appended after the real ones, grouped by weight kind. The
//! canonical labeling of the reduced graph keeps the real vertices in
//! the leading cells, which is what lets [`rebuild`] place them back
//! into a petgraph graph by canonical position alone.

use std::hash::Hash;
use std::marker::PhantomData;

use itertools::izip;
use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

use crate::dense::DenseGraph;
use crate::error::Error;
use crate::sparse::SparseGraph;

#[cfg(feature = "stable")]
mod detail {
    use ahash::RandomState;

    pub(crate) type WeightMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

    pub(super) fn order<T: Ord>(xs: &mut [T]) {
        xs.sort()
    }

    pub(super) fn order_by<T, F>(xs: &mut [T], f: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        xs.sort_by(f)
    }
}

#[cfg(not(feature = "stable"))]
mod detail {
    use ahash::RandomState;

    pub(crate) type WeightMap<K, V> = ahash::AHashMap<K, V, RandomState>;

    pub(super) fn order<T: Ord>(xs: &mut [T]) {
        xs.sort_unstable()
    }

    pub(super) fn order_by<T, F>(xs: &mut [T], f: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        xs.sort_unstable_by(f)
    }
}

use detail::{order, order_by};
pub(crate) use detail::WeightMap;

/// A petgraph graph flattened for the engine: merged weights, weight
/// classes over rank-ordered vertices, auxiliary vertices for
/// non-default edge weights, and the arcs of the reduced graph.
#[derive(Debug, Clone)]
pub(crate) struct Reduced<N, E, D> {
    /// Weights of the real vertices in engine (rank) order. The
    /// conversion from a petgraph graph instantiates `N` with
    /// `(weight, merged self-loop weights)`.
    pub(crate) node_weights: Vec<N>,
    /// Merged edge weights, keyed by engine vertex ids.
    pub(crate) edge_weights: WeightMap<(usize, usize), Vec<E>>,
    /// Color classes over `0..num_vertices`: weight runs, then one
    /// class per auxiliary weight kind.
    pub(crate) classes: Vec<Vec<usize>>,
    /// Arcs of the reduced graph, one entry per logical edge.
    pub(crate) arcs: Vec<(usize, usize)>,
    /// Real plus auxiliary vertex count.
    pub(crate) num_vertices: usize,
    dir: PhantomData<D>,
}

impl<N, E, Ty, Ix> From<Graph<N, E, Ty, Ix>> for Reduced<(N, Vec<E>), E, Ty>
where
    Ty: EdgeType,
    Ix: IndexType,
    N: Ord,
    E: Hash + Ord,
{
    fn from(g: Graph<N, E, Ty, Ix>) -> Self {
        let directed = g.is_directed();
        let (raw_nodes, raw_edges) = g.into_nodes_edges();
        let n_real = raw_nodes.len();

        // split the edge list into self-loop weights per vertex and a
        // merged weight vector per remaining vertex pair
        let mut loops: Vec<Vec<E>> = (0..n_real).map(|_| Vec::new()).collect();
        let mut merged: WeightMap<(usize, usize), Vec<E>> = WeightMap::default();
        for edge in raw_edges {
            let a = edge.source().index();
            let b = edge.target().index();
            if a == b {
                loops[a].push(edge.weight);
            } else {
                let key = if directed || a < b { (a, b) } else { (b, a) };
                merged.entry(key).or_default().push(edge.weight);
            }
        }
        for ws in merged.values_mut() {
            order(ws);
        }

        // effective vertex weight = declared weight plus sorted loop
        // weights; the rank under this order is the engine vertex id,
        // and runs of equal weight are the color classes
        let mut weights: Vec<(N, Vec<E>)> = izip!(raw_nodes, loops)
            .map(|(node, mut ls)| {
                order(&mut ls);
                (node.weight, ls)
            })
            .collect();
        let mut by_weight: Vec<usize> = (0..n_real).collect();
        order_by(&mut by_weight, |&a, &b| weights[a].cmp(&weights[b]));
        let mut rank = vec![0usize; n_real];
        let mut classes: Vec<Vec<usize>> = Vec::new();
        for (pos, &v) in by_weight.iter().enumerate() {
            rank[v] = pos;
            if pos == 0 || weights[by_weight[pos - 1]] != weights[v] {
                classes.push(Vec::new());
            }
            classes.last_mut().expect("class opened above").push(pos);
        }
        let mut slots: Vec<Option<(N, Vec<E>)>> = weights.drain(..).map(Some).collect();
        let node_weights: Vec<(N, Vec<E>)> = by_weight
            .iter()
            .map(|&v| slots[v].take().expect("each vertex is placed once"))
            .collect();

        // re-key the merged edges to engine ids
        let mut edge_weights: WeightMap<(usize, usize), Vec<E>> = WeightMap::default();
        for ((a, b), ws) in merged {
            let mut x = rank[a];
            let mut y = rank[b];
            if !directed && x > y {
                std::mem::swap(&mut x, &mut y);
            }
            edge_weights.insert((x, y), ws);
        }

        // tally the distinct weight vectors by run length; the most
        // frequent kind is the implicit default and needs no auxiliary
        // vertices, every other kind gets one per edge
        let mut kinds: Vec<&Vec<E>> = edge_weights.values().collect();
        order(&mut kinds);
        let mut distinct: Vec<(&Vec<E>, usize)> = Vec::new();
        for k in kinds {
            match distinct.last_mut() {
                Some((w, c)) if *w == k => *c += 1,
                _ => distinct.push((k, 1)),
            }
        }
        let mut default_kind = None;
        for (i, &(_, c)) in distinct.iter().enumerate() {
            if default_kind.map_or(true, |d: usize| c > distinct[d].1) {
                default_kind = Some(i);
            }
        }
        let mut aux_kind: Vec<&Vec<E>> = Vec::new();
        let mut aux_count: Vec<usize> = Vec::new();
        for (i, &(w, c)) in distinct.iter().enumerate() {
            if Some(i) != default_kind {
                aux_kind.push(w);
                aux_count.push(c);
            }
        }

        // auxiliary vertices live after the real ones, one contiguous
        // class per kind
        let mut aux_next: Vec<usize> = Vec::with_capacity(aux_count.len());
        let mut base = n_real;
        for &c in &aux_count {
            aux_next.push(base);
            base += c;
        }
        let num_vertices = base;
        for (&start, &len) in izip!(&aux_next, &aux_count) {
            classes.push((start..start + len).collect());
        }

        // arcs: default-weight edges go straight through, the rest
        // detour over a fresh vertex of their kind
        let mut arcs = Vec::with_capacity(edge_weights.len());
        for (&(x, y), ws) in &edge_weights {
            debug_assert_ne!(x, y);
            match aux_kind.binary_search(&ws) {
                Ok(kind) => {
                    let mid = aux_next[kind];
                    aux_next[kind] += 1;
                    arcs.push((x, mid));
                    arcs.push((mid, y));
                }
                Err(_) => arcs.push((x, y)),
            }
        }

        Self {
            node_weights,
            edge_weights,
            classes,
            arcs,
            num_vertices,
            dir: PhantomData,
        }
    }
}

impl<N, E, D> Reduced<N, E, D> {
    pub(crate) fn is_directed(&self) -> bool
    where
        D: EdgeType,
    {
        D::is_directed()
    }

    pub(crate) fn to_dense(&self) -> Result<DenseGraph, Error>
    where
        D: EdgeType,
    {
        DenseGraph::from_edges(
            self.num_vertices,
            self.arcs.iter().copied(),
            self.is_directed(),
        )
    }

    pub(crate) fn to_sparse(&self) -> Result<SparseGraph, Error>
    where
        D: EdgeType,
    {
        SparseGraph::from_edges(
            self.num_vertices,
            self.arcs.iter().copied(),
            self.is_directed(),
        )
    }
}

/// Rebuild a petgraph graph from merged weights and a canonical
/// labeling of the reduced graph.
///
/// The leading cells of the labeling hold exactly the real vertices,
/// so each real vertex can be dropped straight into its canonical
/// position; edges follow, sorted for a reproducible insertion order,
/// with the folded self-loops re-attached to their vertex.
pub(crate) fn rebuild<N, E, Ty, Ix>(
    node_weights: Vec<(N, Vec<E>)>,
    edge_weights: WeightMap<(usize, usize), Vec<E>>,
    lab: &[usize],
) -> Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
    E: Ord,
{
    use petgraph::visit::NodeIndexable;

    let n_real = node_weights.len();
    let mut position = vec![usize::MAX; lab.len()];
    for (pos, &v) in lab.iter().enumerate() {
        position[v] = pos;
    }

    let mut placed: Vec<Option<(N, Vec<E>)>> = (0..n_real).map(|_| None).collect();
    for (v, w) in node_weights.into_iter().enumerate() {
        let pos = position[v];
        debug_assert!(pos < n_real, "real vertices lead the canonical labeling");
        placed[pos] = Some(w);
    }

    let mut g = Graph::with_capacity(n_real, edge_weights.len());
    let mut pending: Vec<(usize, usize, E)> = Vec::new();
    for (pos, slot) in placed.into_iter().enumerate() {
        let (w, ls) = slot.expect("every leading position holds a real vertex");
        for lw in ls {
            pending.push((pos, pos, lw));
        }
        g.add_node(w);
    }
    for ((a, b), ws) in edge_weights {
        let mut x = position[a];
        let mut y = position[b];
        if !Ty::is_directed() && x > y {
            std::mem::swap(&mut x, &mut y);
        }
        for w in ws {
            pending.push((x, y, w));
        }
    }
    order(&mut pending);
    for (x, y, w) in pending {
        let a = g.from_index(x);
        let b = g.from_index(y);
        g.add_edge(a, b, w);
    }
    g
}
