//! Engine options, progress hooks and the cooperative abort flag.

use std::cell::Cell;
use std::rc::Rc;

use crate::perm::Permutation;

/// Default seed of the Schreier–Sims random-product phase. Fixing the
/// seed makes group orders reproducible across runs; override it per
/// call through [`EngineOptions::schreier_seed`].
pub const DEFAULT_SCHREIER_SEED: u64 = 0x5EED_CA11_AB1E_0001;

/// Immutable knobs of a single engine call.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Compute a canonical labeling and canonical graph.
    pub get_canon: bool,
    /// Treat the graph as directed (also set implicitly by self-loops).
    pub digraph: bool,
    /// Run Schreier–Sims over the discovered generators for an exact
    /// group order and a membership-capable generating set.
    pub use_schreier: bool,
    /// Seed for the randomized part of Schreier–Sims.
    pub schreier_seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            get_canon: true,
            digraph: false,
            use_schreier: false,
            schreier_seed: DEFAULT_SCHREIER_SEED,
        }
    }
}

/// Cooperative abort switch shared between a caller (or its hooks) and
/// the running search. The engine polls it between refinement and
/// recursion; nothing is interrupted mid-refinement.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Rc<Cell<bool>>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    pub fn clear(&self) {
        self.0.set(false);
    }
}

/// Payload of the per-automorphism hook.
pub struct AutomorphismEvent<'a> {
    /// The generator just accepted.
    pub generator: &'a Permutation,
    /// Current orbit array, compressed to minimal representatives.
    pub orbits: &'a [usize],
    /// Number of fixed points of the generator.
    pub fixed_count: usize,
}

/// Payload of the per-level hook, fired on first-path descent.
pub struct LevelEvent {
    pub level: u32,
    pub target_cell_size: usize,
}

/// Payload of the per-node hook.
pub struct NodeEvent {
    pub level: u32,
    pub num_cells: usize,
    pub code: u16,
}

/// Payload of the per-canonical-update hook.
pub struct CanonEvent<'a> {
    pub level: u32,
    pub lab: &'a [usize],
}

/// Optional observer callbacks, each invoked synchronously on the
/// calling thread. Hooks observe; they never mutate engine state. To
/// stop a search early, set the [`AbortFlag`] from inside a hook.
#[derive(Default)]
pub struct Hooks<'a> {
    pub on_automorphism: Option<Box<dyn FnMut(&AutomorphismEvent) + 'a>>,
    pub on_level: Option<Box<dyn FnMut(&LevelEvent) + 'a>>,
    pub on_node: Option<Box<dyn FnMut(&NodeEvent) + 'a>>,
    pub on_canonical: Option<Box<dyn FnMut(&CanonEvent) + 'a>>,
    pub abort: AbortFlag,
}

impl Hooks<'_> {
    pub fn none() -> Self {
        Self::default()
    }
}
