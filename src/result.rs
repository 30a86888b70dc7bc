//! Search output: generators, group order, orbits, canonical form.

use num_bigint::BigUint;

use crate::perm::Permutation;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The tree was exhausted; all outputs are final.
    Complete,
    /// A hook raised the abort flag. Generators found so far are valid
    /// automorphisms; orbits and group order are best-effort.
    Aborted,
}

/// Group order as `mantissa * 10^exponent`.
///
/// Whenever the mantissa reaches `1e10` it is divided by `1e10` and the
/// exponent grows by 10, which keeps about 16 significant digits no
/// matter how large the group gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSize {
    pub mantissa: f64,
    pub exponent: u32,
}

impl GroupSize {
    pub fn one() -> Self {
        Self {
            mantissa: 1.0,
            exponent: 0,
        }
    }

    /// Multiply in an orbit index.
    pub fn multiply(&mut self, factor: usize) {
        self.mantissa *= factor as f64;
        while self.mantissa >= 1e10 {
            self.mantissa /= 1e10;
            self.exponent += 10;
        }
    }

    /// Collapse to an `f64`; may overflow to infinity for huge groups.
    pub fn approx(&self) -> f64 {
        self.mantissa * 10f64.powi(self.exponent as i32)
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        Self::one()
    }
}

/// Search-tree counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Tree nodes visited.
    pub nodes: u64,
    /// Discrete leaves that produced neither an automorphism nor a
    /// better canonical form.
    pub bad_leaves: u64,
    /// Deepest level reached.
    pub max_level: u32,
    /// Sum of target-cell sizes over visited nodes.
    pub tc_total: u64,
    /// Times the canonical candidate was replaced.
    pub canon_updates: u64,
}

/// Canonical labeling and the relabeled graph.
///
/// `graph` has edge `(i, j)` exactly when the input has edge
/// `(labeling.image(i), labeling.image(j))`.
#[derive(Debug, Clone)]
pub struct Canonical<G> {
    pub labeling: Permutation,
    pub graph: G,
}

/// Aggregate output of one engine call. Immutable once returned.
#[derive(Debug, Clone)]
pub struct AutomResult<G> {
    /// Generators of the automorphism group, in discovery order. Each
    /// one strictly reduced the orbit count when found.
    pub generators: Vec<Permutation>,
    /// Group order accumulated by the search.
    pub group_size: GroupSize,
    /// Exact group order from Schreier–Sims, when requested.
    pub exact_order: Option<BigUint>,
    /// `orbits[v]` is the smallest vertex in `v`'s orbit.
    pub orbits: Vec<usize>,
    /// Number of orbits.
    pub num_orbits: usize,
    /// Canonical labeling and graph, when requested.
    pub canonical: Option<Canonical<G>>,
    pub stats: SearchStats,
    pub status: SearchStatus,
}

impl<G> AutomResult<G> {
    /// Whether the search ran to completion.
    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }
}
