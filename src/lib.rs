//! # canonry
//!
//! Automorphism groups and canonical labellings of finite graphs,
//! computed by a pure-Rust individualization/refinement search in the
//! style of McKay's nauty.
//!
//! Two graphs are isomorphic (respecting node and edge weights) if and
//! only if their canonical forms are identical, so canonical forms can
//! be compared, hashed and collected into sets.
//!
//! ## Quick start
//!
//! ```
//! use petgraph::graph::UnGraph;
//! use canonry::prelude::*;
//!
//! let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0)]);
//! let h = UnGraph::<(), ()>::from_edges([(2, 1), (1, 0), (0, 2)]);
//! assert!(g.clone().into_canon().is_identical(&h.into_canon()));
//!
//! let stats = g.try_into_autom_stats().unwrap();
//! assert_eq!(stats.grpsize(), 6.);
//! ```
//!
//! ## Engine layer
//!
//! The petgraph traits sit on top of a plain engine over bit-matrix
//! ([`DenseGraph`]) and CSR ([`SparseGraph`]) stores. [`run_dense`] and
//! [`run_sparse`] take a graph, [`EngineOptions`] and an optional
//! initial partition and return an [`AutomResult`] with generators,
//! orbits, the group order (floating mantissa/exponent, plus an exact
//! big integer when Schreier–Sims is enabled) and the canonical form.
//! [`Hooks`] observe the search and can abort it cooperatively.
//!
//! The graph6/sparse6/digraph6 interchange formats are available in
//! [`codec`].

#![forbid(unsafe_code)]

mod autom;
pub mod bitset;
mod canon;
mod cmp;
mod codec;
mod dense;
mod error;
mod graph;
mod iso;
mod options;
mod orbits;
pub mod partition;
mod perm;
mod reduce;
mod refine;
mod result;
mod schreier;
mod search;
mod sparse;

pub use autom::{
    AutomStats, TryIntoAutomStats, TryIntoAutomStatsDense, TryIntoAutomStatsSparse,
};
pub use canon::{
    IntoCanon, IntoCanonDense, IntoCanonSparse, TryIntoCanon, TryIntoCanonDense,
    TryIntoCanonSparse,
};
pub use cmp::IsIdentical;
pub use dense::DenseGraph;
pub use error::Error;
pub use graph::{CanonDiGraph, CanonGraph, CanonUnGraph};
pub use iso::{are_isomorphic, are_isomorphic_dense, are_isomorphic_sparse};
pub use options::{
    AbortFlag, AutomorphismEvent, CanonEvent, EngineOptions, Hooks, LevelEvent,
    NodeEvent, DEFAULT_SCHREIER_SEED,
};
pub use orbits::Orbits;
pub use perm::Permutation;
pub use result::{AutomResult, Canonical, GroupSize, SearchStats, SearchStatus};
pub use schreier::{generate_group, StrongGenSet, RANDOM_FAIL_BOUND};
pub use search::{run_dense, run_sparse};
pub use sparse::SparseGraph;

pub mod formats {
    //! Re-exports of the graph6 family of codecs.
    pub use crate::codec::{
        from_digraph6, from_graph6, from_sparse6, to_digraph6, to_graph6, to_sparse6,
    };
}

pub mod prelude;
