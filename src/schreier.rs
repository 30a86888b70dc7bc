//! Schreier–Sims base and strong generating set.
//!
//! Builds a stabilizer chain `G = G_0 ≥ G_1 ≥ … ≥ G_d = 1` over the
//! generators discovered by the search. Each level stores the strong
//! generators added there and a transversal mapping every point of the
//! level orbit to a coset representative sending the base point to it.
//! The exact group order is the product of transversal sizes; sifting
//! gives a membership test.
//!
//! Construction is a deterministic fixpoint over Schreier generators,
//! followed by a seeded random-product confirmation phase that stops
//! after [`RANDOM_FAIL_BOUND`] consecutive sifts that add nothing.

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use ahash::AHashSet;

use crate::error::Error;
use crate::perm::Permutation;

/// Consecutive failed random sifts required before the confirmation
/// phase stops. Too low risks under-reported orders; this bound is
/// fixed and sits on top of a deterministic closure, so the random
/// phase only ever confirms.
pub const RANDOM_FAIL_BOUND: u32 = 10;

#[derive(Debug, Clone)]
struct Level {
    base_point: usize,
    gens: Vec<Permutation>,
    /// `transversal[p]` maps `base_point` to `p`; `None` outside the orbit.
    transversal: Vec<Option<Permutation>>,
}

impl Level {
    fn new(base_point: usize, n: usize) -> Self {
        let mut transversal = vec![None; n];
        transversal[base_point] = Some(Permutation::identity(n));
        Self {
            base_point,
            gens: Vec::new(),
            transversal,
        }
    }

    fn orbit_size(&self) -> usize {
        self.transversal.iter().filter(|t| t.is_some()).count()
    }

    fn orbit_points(&self) -> Vec<usize> {
        self.transversal
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(p, _)| p)
            .collect()
    }
}

/// Stabilizer chain over a set of permutations of `0..n`.
#[derive(Debug, Clone)]
pub struct StrongGenSet {
    n: usize,
    levels: Vec<Level>,
}

impl StrongGenSet {
    /// Build the chain from `generators`. The `seed` drives only the
    /// confirmation phase, so a fixed seed gives reproducible output.
    pub fn build(generators: &[Permutation], n: usize, seed: u64) -> Self {
        let mut chain = Self {
            n,
            levels: Vec::new(),
        };
        for g in generators {
            chain.insert(g.clone());
        }

        let strong: Vec<Permutation> = chain
            .levels
            .iter()
            .flat_map(|l| l.gens.iter().cloned())
            .collect();
        if !strong.is_empty() {
            let mut rng = Xoshiro256Plus::seed_from_u64(seed);
            let mut fails = 0;
            while fails < RANDOM_FAIL_BOUND {
                let word = random_word(&strong, n, &mut rng);
                if chain.insert(word) {
                    fails = 0;
                } else {
                    fails += 1;
                }
            }
        }
        chain
    }

    /// Base points of the chain.
    pub fn base(&self) -> Vec<usize> {
        self.levels.iter().map(|l| l.base_point).collect()
    }

    /// Orbit sizes per level; their product is the group order.
    pub fn transversal_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(|l| l.orbit_size()).collect()
    }

    /// Exact group order.
    pub fn order(&self) -> BigUint {
        let mut ord = BigUint::one();
        for l in &self.levels {
            ord *= BigUint::from(l.orbit_size());
        }
        ord
    }

    /// Membership test by sifting; no mutation.
    pub fn contains(&self, p: &Permutation) -> bool {
        if p.len() != self.n {
            return false;
        }
        let (_, residue) = self.sift_from(0, p.clone());
        residue.is_identity()
    }

    /// Sift `p` through levels `start..`, returning the level at which
    /// it stuck and the remaining residue (identity iff `p` was fully
    /// expressed by the chain from `start`).
    fn sift_from(&self, start: usize, mut p: Permutation) -> (usize, Permutation) {
        for k in start..self.levels.len() {
            let level = &self.levels[k];
            let img = p.image(level.base_point);
            match &level.transversal[img] {
                Some(t) => p = t.inverse().compose(&p),
                None => return (k, p),
            }
        }
        (self.levels.len(), p)
    }

    /// Sift and, if a residue remains, add it as a strong generator and
    /// re-close the chain. Returns whether anything was added.
    fn insert(&mut self, p: Permutation) -> bool {
        let (lvl, residue) = self.sift_from(0, p);
        if residue.is_identity() {
            return false;
        }
        self.place(lvl, residue);
        self.close();
        true
    }

    fn place(&mut self, lvl: usize, residue: Permutation) {
        if lvl == self.levels.len() {
            let b = residue
                .first_moved_point()
                .expect("non-identity residue moves a point");
            self.levels.push(Level::new(b, self.n));
        }
        self.levels[lvl].gens.push(residue);
    }

    /// Fixpoint: recompute transversals and add failing Schreier
    /// generators until every one sifts to the identity. Terminates
    /// because each addition strictly grows the transversal product,
    /// which is bounded by the group order.
    fn close(&mut self) {
        loop {
            for k in 0..self.levels.len() {
                self.rebuild_transversal(k);
            }
            match self.find_failing_schreier() {
                Some((lvl, residue)) => self.place(lvl, residue),
                None => break,
            }
        }
    }

    /// Generators of `G_k`: everything added at level `k` or deeper
    /// (deeper generators fix all earlier base points).
    fn gens_of(&self, k: usize) -> Vec<Permutation> {
        self.levels[k..]
            .iter()
            .flat_map(|l| l.gens.iter().cloned())
            .collect()
    }

    /// BFS orbit of the level's base point under `gens_of(k)`.
    fn rebuild_transversal(&mut self, k: usize) {
        let gens = self.gens_of(k);
        let base = self.levels[k].base_point;
        let mut transversal: Vec<Option<Permutation>> = vec![None; self.n];
        transversal[base] = Some(Permutation::identity(self.n));
        let mut frontier = vec![base];
        while let Some(p) = frontier.pop() {
            let rep = transversal[p].clone().expect("frontier point has a rep");
            for g in &gens {
                let q = g.image(p);
                if transversal[q].is_none() {
                    transversal[q] = Some(g.compose(&rep));
                    frontier.push(q);
                }
            }
        }
        self.levels[k].transversal = transversal;
    }

    fn find_failing_schreier(&self) -> Option<(usize, Permutation)> {
        for k in 0..self.levels.len() {
            let gens = self.gens_of(k);
            for p in self.levels[k].orbit_points() {
                let u = self.levels[k].transversal[p]
                    .as_ref()
                    .expect("orbit point has a rep");
                for g in &gens {
                    let gu = g.compose(u);
                    let v = self.levels[k].transversal[g.image(p)]
                        .as_ref()
                        .expect("orbit is closed under generators");
                    let s = v.inverse().compose(&gu);
                    if s.is_identity() {
                        continue;
                    }
                    let (lvl, residue) = self.sift_from(k + 1, s);
                    if !residue.is_identity() {
                        return Some((lvl, residue));
                    }
                }
            }
        }
        None
    }
}

/// A short random product of strong generators, some inverted.
fn random_word<R: Rng>(strong: &[Permutation], n: usize, rng: &mut R) -> Permutation {
    let len = rng.gen_range(2..=4);
    let mut w = Permutation::identity(n);
    for _ in 0..len {
        let g = &strong[rng.gen_range(0..strong.len())];
        if rng.gen_bool(0.5) {
            w = g.inverse().compose(&w);
        } else {
            w = g.compose(&w);
        }
    }
    w
}

/// Enumerate the whole group generated by `gens`, failing once more
/// than `bound` elements appear.
pub fn generate_group(
    gens: &[Permutation],
    n: usize,
    bound: usize,
) -> Result<Vec<Permutation>, Error> {
    for g in gens {
        if g.len() != n {
            return Err(Error::InvalidPermutation(format!(
                "generator length {} does not match n = {n}",
                g.len()
            )));
        }
    }
    let identity = Permutation::identity(n);
    let mut seen: AHashSet<Vec<usize>> = AHashSet::new();
    seen.insert(identity.as_slice().to_vec());
    let mut out = vec![identity];
    let mut head = 0;
    while head < out.len() {
        let e = out[head].clone();
        head += 1;
        for g in gens {
            let f = g.compose(&e);
            if seen.insert(f.as_slice().to_vec()) {
                if out.len() >= bound {
                    return Err(Error::GroupTooLarge { bound });
                }
                out.push(f);
            }
        }
    }
    Ok(out)
}
