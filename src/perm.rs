//! Permutations of `0..n`.
//!
//! A [`Permutation`] stores its direct mapping (`map[i]` is the image
//! of `i`) together with the inverse mapping, and is immutable once
//! constructed. Generators discovered by the search, Schreier–Sims
//! transversal elements and canonical relabelings are all values of
//! this type.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigUint;
use num_traits::One;

use crate::error::Error;

/// A permutation of `0..n` with its inverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    map: Vec<usize>,
    inv: Vec<usize>,
}

impl Permutation {
    /// The identity on `0..n`.
    pub fn identity(n: usize) -> Self {
        let map: Vec<usize> = (0..n).collect();
        Self {
            inv: map.clone(),
            map,
        }
    }

    /// Build from an image array, rejecting anything that is not a
    /// permutation of `0..n`.
    pub fn try_from_map(map: Vec<usize>) -> Result<Self, Error> {
        let n = map.len();
        let mut inv = vec![usize::MAX; n];
        for (i, &j) in map.iter().enumerate() {
            if j >= n {
                return Err(Error::InvalidPermutation(format!(
                    "image {j} out of range for length {n}"
                )));
            }
            if inv[j] != usize::MAX {
                return Err(Error::InvalidPermutation(format!(
                    "image {j} appears twice"
                )));
            }
            inv[j] = i;
        }
        Ok(Self { map, inv })
    }

    /// Build from an image array already known to be a permutation.
    pub(crate) fn from_map_unchecked(map: Vec<usize>) -> Self {
        let mut inv = vec![0; map.len()];
        for (i, &j) in map.iter().enumerate() {
            inv[j] = i;
        }
        Self { map, inv }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Image of `i`.
    #[inline]
    pub fn image(&self, i: usize) -> usize {
        self.map[i]
    }

    /// Preimage of `i`.
    #[inline]
    pub fn preimage(&self, i: usize) -> usize {
        self.inv[i]
    }

    /// The image array.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Composition `self ∘ other`: first `other`, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        let map: Vec<usize> = other.map.iter().map(|&i| self.map[i]).collect();
        Self::from_map_unchecked(map)
    }

    pub fn inverse(&self) -> Self {
        Self {
            map: self.inv.clone(),
            inv: self.map.clone(),
        }
    }

    /// `self` composed with itself `k` times, by repeated squaring.
    pub fn pow(&self, mut k: u64) -> Self {
        let mut acc = Self::identity(self.len());
        let mut sq = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                acc = sq.compose(&acc);
            }
            sq = sq.compose(&sq);
            k >>= 1;
        }
        acc
    }

    /// Reorder a slice: the element at position `i` moves to position
    /// `map[i]`, so element `i` of the result is `data[inv[i]]`.
    pub fn apply_slice<T: Clone>(&self, data: &[T]) -> Vec<T> {
        debug_assert_eq!(self.len(), data.len());
        self.inv.iter().map(|&i| data[i].clone()).collect()
    }

    /// Cycle decomposition; fixed points are omitted.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut out = Vec::new();
        for start in 0..self.len() {
            if seen[start] || self.map[start] == start {
                continue;
            }
            let mut cycle = Vec::new();
            let mut i = start;
            while !seen[i] {
                seen[i] = true;
                cycle.push(i);
                i = self.map[i];
            }
            out.push(cycle);
        }
        out
    }

    /// Order of the permutation: the lcm of its cycle lengths.
    pub fn order(&self) -> BigUint {
        let mut ord = BigUint::one();
        for cycle in self.cycles() {
            let len = BigUint::from(cycle.len());
            let g = gcd(ord.clone(), len.clone());
            ord = ord / g * len;
        }
        ord
    }

    /// Number of fixed points.
    pub fn fixed_count(&self) -> usize {
        self.map.iter().enumerate().filter(|&(i, &j)| i == j).count()
    }

    /// The points moved by the permutation, in increasing order.
    pub fn moved_points(&self) -> Vec<usize> {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &j)| i != j)
            .map(|(i, _)| i)
            .collect()
    }

    /// Smallest moved point, if any.
    pub fn first_moved_point(&self) -> Option<usize> {
        self.map.iter().enumerate().find(|&(i, &j)| i != j).map(|(i, _)| i)
    }
}

fn gcd(mut a: BigUint, mut b: BigUint) -> BigUint {
    use num_traits::Zero;
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Permutation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.map.cmp(&other.map)
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cycles = self.cycles();
        if cycles.is_empty() {
            return write!(f, "()");
        }
        for cycle in cycles {
            write!(f, "(")?;
            for (k, v) in cycle.iter().enumerate() {
                if k > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
