//! Isomorphism testing by canonical-form comparison.

use std::hash::Hash;

use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

use crate::canon::TryIntoCanonDense;
use crate::cmp::IsIdentical;
use crate::dense::DenseGraph;
use crate::error::Error;
use crate::options::{EngineOptions, Hooks};
use crate::search::{run_dense, run_sparse};
use crate::sparse::SparseGraph;

/// Whether two petgraph graphs are isomorphic, respecting node and
/// edge weights: canonicalize both and compare.
pub fn are_isomorphic<N, E, Ty, Ix>(
    g1: &Graph<N, E, Ty, Ix>,
    g2: &Graph<N, E, Ty, Ix>,
) -> Result<bool, Error>
where
    N: Clone + Ord,
    E: Clone + Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    if g1.node_count() != g2.node_count() || g1.edge_count() != g2.edge_count() {
        return Ok(false);
    }
    let c1 = g1.clone().try_into_canon_dense()?;
    let c2 = g2.clone().try_into_canon_dense()?;
    Ok(c1.is_identical(&c2))
}

/// Isomorphism of plain dense graphs, both run through the dense
/// engine with the same options.
pub fn are_isomorphic_dense(a: &DenseGraph, b: &DenseGraph) -> Result<bool, Error> {
    if a.n() != b.n() || a.is_directed() != b.is_directed() {
        return Ok(false);
    }
    let opts = EngineOptions {
        get_canon: true,
        digraph: a.is_directed() || a.has_loops() || b.has_loops(),
        ..Default::default()
    };
    let ca = run_dense(a, &opts, None, &mut Hooks::none())?;
    let cb = run_dense(b, &opts, None, &mut Hooks::none())?;
    Ok(ca.canonical.expect("requested").graph == cb.canonical.expect("requested").graph)
}

/// Isomorphism of plain sparse graphs via the sparse engine.
pub fn are_isomorphic_sparse(a: &SparseGraph, b: &SparseGraph) -> Result<bool, Error> {
    if a.n() != b.n() || a.is_directed() != b.is_directed() {
        return Ok(false);
    }
    let opts = EngineOptions {
        get_canon: true,
        digraph: a.is_directed() || a.has_loops() || b.has_loops(),
        ..Default::default()
    };
    let ca = run_sparse(a, &opts, None, &mut Hooks::none())?;
    let cb = run_sparse(b, &opts, None, &mut Hooks::none())?;
    Ok(ca.canonical.expect("requested").graph == cb.canonical.expect("requested").graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::UnGraph;

    #[test]
    fn cycles_are_isomorphic_paths_are_not() {
        let c4a = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]);
        let c4b = UnGraph::<(), ()>::from_edges([(1, 3), (3, 0), (0, 2), (2, 1)]);
        let p4 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
        assert!(are_isomorphic(&c4a, &c4b).unwrap());
        assert!(!are_isomorphic(&c4a, &p4).unwrap());
    }

    #[test]
    fn dense_engine_isomorphism() {
        let a = DenseGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], false)
            .unwrap();
        let b = DenseGraph::from_edges(5, [(0, 2), (2, 4), (4, 1), (1, 3), (3, 0)], false)
            .unwrap();
        assert!(are_isomorphic_dense(&a, &b).unwrap());
        let c = DenseGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)], false).unwrap();
        assert!(!are_isomorphic_dense(&a, &c).unwrap());
    }

    #[test]
    fn sparse_engine_isomorphism() {
        let a = SparseGraph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)], false).unwrap();
        let b = SparseGraph::from_edges(4, [(0, 2), (2, 1), (1, 3), (3, 0)], false).unwrap();
        assert!(are_isomorphic_sparse(&a, &b).unwrap());
    }

    #[test]
    fn weight_mismatch_is_not_isomorphic() {
        let a = UnGraph::<(), u8>::from_edges([(0, 1, 0), (1, 2, 0)]);
        let b = UnGraph::<(), u8>::from_edges([(0, 1, 0), (1, 2, 1)]);
        assert!(!are_isomorphic(&a, &b).unwrap());
    }
}
