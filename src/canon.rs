//! Canonical labelling of petgraph graphs.
//!
//! The traits mirror the usual conversion idiom: `try_into_canon`
//! consumes a graph and returns the canonically labelled equivalent,
//! so two graphs are isomorphic (respecting node and edge weights)
//! exactly when their canonical forms are identical. The dense engine
//! is the default; `*_sparse` variants run the CSR engine instead.

use std::cmp::Ord;
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

use crate::error::Error;
use crate::options::{EngineOptions, Hooks};
use crate::reduce::{rebuild, Reduced};
use crate::search::{run_dense, run_sparse};

/// Find the canonical labelling for a graph.
pub trait IntoCanon {
    fn into_canon(self) -> Self;
}

/// Try to find the canonical labelling for a graph.
pub trait TryIntoCanon {
    type Error;

    fn try_into_canon(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

/// Use the dense engine to find the canonical labelling.
pub trait IntoCanonDense {
    fn into_canon_dense(self) -> Self;
}

pub trait TryIntoCanonDense {
    type Error;

    fn try_into_canon_dense(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

/// Use the sparse engine to find the canonical labelling.
pub trait IntoCanonSparse {
    fn into_canon_sparse(self) -> Self;
}

pub trait TryIntoCanonSparse {
    type Error;

    fn try_into_canon_sparse(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

impl<N, E, Ty: EdgeType, Ix: IndexType> IntoCanon for Graph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: TryIntoCanon,
    <Graph<N, E, Ty, Ix> as TryIntoCanon>::Error: Debug,
{
    fn into_canon(self) -> Self {
        self.try_into_canon().unwrap()
    }
}

impl<N, E, Ty: EdgeType, Ix: IndexType> TryIntoCanon for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
{
    type Error = Error;

    fn try_into_canon(self) -> Result<Self, Self::Error> {
        self.try_into_canon_dense()
    }
}

impl<N, E, Ty, Ix: IndexType> TryIntoCanonDense for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
{
    type Error = Error;

    fn try_into_canon_dense(self) -> Result<Self, Self::Error> {
        if self.node_count() == 0 {
            return Ok(self);
        }
        let reduced: Reduced<_, _, Ty> = Reduced::from(self);
        let g = reduced.to_dense()?;
        let opts = EngineOptions {
            get_canon: true,
            digraph: reduced.is_directed(),
            ..Default::default()
        };
        let res = run_dense(&g, &opts, Some(&reduced.classes), &mut Hooks::none())?;
        let canonical = res.canonical.expect("canonicalization was requested");
        Ok(rebuild(
            reduced.node_weights,
            reduced.edge_weights,
            canonical.labeling.as_slice(),
        ))
    }
}

impl<N, E, Ty, Ix> IntoCanonDense for Graph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: TryIntoCanonDense,
    <Graph<N, E, Ty, Ix> as TryIntoCanonDense>::Error: Debug,
{
    fn into_canon_dense(self) -> Self {
        self.try_into_canon_dense().unwrap()
    }
}

impl<N, E, Ty, Ix: IndexType> TryIntoCanonSparse for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
{
    type Error = Error;

    fn try_into_canon_sparse(self) -> Result<Self, Self::Error> {
        if self.node_count() == 0 {
            return Ok(self);
        }
        let reduced: Reduced<_, _, Ty> = Reduced::from(self);
        let g = reduced.to_sparse()?;
        let opts = EngineOptions {
            get_canon: true,
            digraph: reduced.is_directed(),
            ..Default::default()
        };
        let res = run_sparse(&g, &opts, Some(&reduced.classes), &mut Hooks::none())?;
        let canonical = res.canonical.expect("canonicalization was requested");
        Ok(rebuild(
            reduced.node_weights,
            reduced.edge_weights,
            canonical.labeling.as_slice(),
        ))
    }
}

impl<N, E, Ty, Ix> IntoCanonSparse for Graph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: TryIntoCanonSparse,
    <Graph<N, E, Ty, Ix> as TryIntoCanonSparse>::Error: Debug,
{
    fn into_canon_sparse(self) -> Self {
        self.try_into_canon_sparse().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::super::cmp::IsIdentical;
    use super::*;
    use petgraph::{
        algo::isomorphism::is_isomorphic,
        graph::{Graph, UnGraph},
        Directed, Undirected,
    };
    use rand::prelude::*;
    use testing::{randomize_labels, GraphIter};

    use rand_xoshiro::Xoshiro256Plus;

    use log::debug;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn triangle() {
        log_init();

        use petgraph::visit::NodeIndexable;
        let mut g1 = UnGraph::<u8, ()>::from_edges([
            (0, 0),
            (1, 1),
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 2),
        ]);
        *g1.node_weight_mut(g1.from_index(0)).unwrap() = 2;
        *g1.node_weight_mut(g1.from_index(1)).unwrap() = 2;
        let g1 = g1.into_canon();

        let mut g2 = UnGraph::<u8, ()>::from_edges([
            (0, 0),
            (1, 1),
            (0, 1),
            (0, 2),
            (0, 2),
            (1, 2),
        ]);
        *g2.node_weight_mut(g2.from_index(0)).unwrap() = 2;
        *g2.node_weight_mut(g2.from_index(1)).unwrap() = 2;
        let g2 = g2.into_canon();

        assert!(g1.is_identical(&g2));
    }

    #[test]
    fn random_canon_dense_undirected() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::<Undirected>::default();

        for g in graphs.take(300) {
            debug!("Initial graph: {g:#?}");
            let gg = randomize_labels(g.clone(), &mut rng);
            debug!("Randomised graph: {gg:#?}");
            assert!(is_isomorphic(&g, &gg));
            let g = g.into_canon_dense();
            debug!("Canonical graph (from initial): {g:#?}");
            assert!(is_isomorphic(&g, &gg));
            let gg = gg.into_canon_dense();
            debug!("Canonical graph (from randomised): {gg:#?}");
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_identical(&gg));
        }
    }

    #[test]
    fn random_canon_dense_directed() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::<Directed>::default();

        for g in graphs.take(200) {
            let gg = randomize_labels(g.clone(), &mut rng);
            assert!(is_isomorphic(&g, &gg));
            let g = g.into_canon_dense();
            assert!(is_isomorphic(&g, &gg));
            let gg = gg.into_canon_dense();
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_identical(&gg));
        }
    }

    #[test]
    fn random_canon_sparse_undirected() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::<Undirected>::default();

        for g in graphs.take(300) {
            let gg = randomize_labels(g.clone(), &mut rng);
            assert!(is_isomorphic(&g, &gg));
            let g = g.into_canon_sparse();
            assert!(is_isomorphic(&g, &gg));
            let gg = gg.into_canon_sparse();
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_identical(&gg));
        }
    }

    #[test]
    fn random_canon_sparse_directed() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::<Directed>::default();

        for g in graphs.take(200) {
            let gg = randomize_labels(g.clone(), &mut rng);
            assert!(is_isomorphic(&g, &gg));
            let g = g.into_canon_sparse();
            assert!(is_isomorphic(&g, &gg));
            let gg = gg.into_canon_sparse();
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_identical(&gg));
        }
    }

    #[test]
    fn empty() {
        log_init();

        let g = Graph::<(), (), _>::new_undirected();
        assert!(g.is_identical(&g.clone().into_canon()));
    }
}
