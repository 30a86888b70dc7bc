//! Automorphism group statistics for petgraph graphs.

use std::cmp::Ord;
use std::convert::From;
use std::hash::Hash;

use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

use crate::error::Error;
use crate::options::{EngineOptions, Hooks};
use crate::reduce::Reduced;
use crate::result::AutomResult;
use crate::search::{run_dense, run_sparse};

/// Information on the automorphism group of a graph.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct AutomStats {
    /// The group order is approximately `grpsize_base * 10.pow(grpsize_exp)`.
    pub grpsize_base: f64,
    /// The group order is approximately `grpsize_base * 10.pow(grpsize_exp)`.
    pub grpsize_exp: u32,
    /// Number of orbits of the automorphism group.
    pub num_orbits: u32,
    /// Number of generators.
    pub num_generators: u32,
}

impl AutomStats {
    /// The size of the automorphism group.
    pub fn grpsize(&self) -> f64 {
        self.grpsize_base * 10f64.powi(self.grpsize_exp as i32)
    }
}

impl<G> From<&AutomResult<G>> for AutomStats {
    fn from(res: &AutomResult<G>) -> Self {
        Self {
            grpsize_base: res.group_size.mantissa,
            grpsize_exp: res.group_size.exponent,
            num_orbits: res.num_orbits as u32,
            num_generators: res.generators.len() as u32,
        }
    }
}

/// Statistics for a graph's automorphism group.
pub trait TryIntoAutomStats {
    type Error;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error>;
}

/// Statistics for a graph's automorphism group using the dense engine.
pub trait TryIntoAutomStatsDense {
    type Error;

    fn try_into_autom_stats_dense(self) -> Result<AutomStats, Self::Error>;
}

/// Statistics for a graph's automorphism group using the sparse engine.
pub trait TryIntoAutomStatsSparse {
    type Error;

    fn try_into_autom_stats_sparse(self) -> Result<AutomStats, Self::Error>;
}

impl<N, E, Ty, Ix> TryIntoAutomStats for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = Error;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error> {
        self.try_into_autom_stats_dense()
    }
}

impl<N, E, Ty, Ix> TryIntoAutomStatsDense for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = Error;

    fn try_into_autom_stats_dense(self) -> Result<AutomStats, Self::Error> {
        if self.node_count() == 0 {
            return Ok(AutomStats {
                grpsize_base: 1.,
                ..Default::default()
            });
        }
        let reduced: Reduced<_, _, Ty> = Reduced::from(self);
        let g = reduced.to_dense()?;
        let opts = EngineOptions {
            get_canon: false,
            digraph: reduced.is_directed(),
            ..Default::default()
        };
        let res = run_dense(&g, &opts, Some(&reduced.classes), &mut Hooks::none())?;
        Ok(AutomStats::from(&res))
    }
}

impl<N, E, Ty, Ix> TryIntoAutomStatsSparse for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = Error;

    fn try_into_autom_stats_sparse(self) -> Result<AutomStats, Self::Error> {
        if self.node_count() == 0 {
            return Ok(AutomStats {
                grpsize_base: 1.,
                ..Default::default()
            });
        }
        let reduced: Reduced<_, _, Ty> = Reduced::from(self);
        let g = reduced.to_sparse()?;
        let opts = EngineOptions {
            get_canon: false,
            digraph: reduced.is_directed(),
            ..Default::default()
        };
        let res = run_sparse(&g, &opts, Some(&reduced.classes), &mut Hooks::none())?;
        Ok(AutomStats::from(&res))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::{graph::DiGraph, Undirected};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn simple() {
        log_init();

        use petgraph::visit::NodeIndexable;
        let g = DiGraph::<u8, ()>::from_edges([(0, 1)]);
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 1.);
        assert_eq!(autom.grpsize_exp, 0);
        let g = g.into_edge_type::<Undirected>();
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 2.);
        assert_eq!(autom.grpsize_exp, 0);
        let mut g = g;
        *g.node_weight_mut(g.from_index(0)).unwrap() = 2;
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 1.);
        assert_eq!(autom.grpsize_exp, 0);
    }

    #[test]
    fn triangle() {
        log_init();

        use petgraph::visit::EdgeIndexable;
        let g = DiGraph::<(), u8>::from_edges([(0, 1), (1, 2), (2, 0)]);
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 3.);
        assert_eq!(autom.grpsize_exp, 0);
        let g = g.into_edge_type::<Undirected>();
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 6.);
        assert_eq!(autom.grpsize_exp, 0);
        let mut g = g;
        *g.edge_weight_mut(g.from_index(0)).unwrap() = 2;
        let autom = g.clone().try_into_autom_stats().unwrap();
        assert_eq!(autom.grpsize_base, 2.);
        assert_eq!(autom.grpsize_exp, 0);
    }

    #[test]
    fn sparse_agrees_with_dense() {
        log_init();

        let g = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
        let dense = g.clone().try_into_autom_stats_dense().unwrap();
        let sparse = g.try_into_autom_stats_sparse().unwrap();
        assert_eq!(dense.grpsize_base, sparse.grpsize_base);
        assert_eq!(dense.grpsize_exp, sparse.grpsize_exp);
    }
}
