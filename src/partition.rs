//! Ordered partitions of the vertex set.
//!
//! The pair `(lab, ptn)` encodes an ordered partition of `0..n`: `lab`
//! is a permutation of the vertices and cells are maximal contiguous
//! runs. `ptn[i]` tags the boundary at position `i` with the search
//! level at which it appeared (`INFTY` while `i` and `i + 1` share a
//! cell at every level, `0` for the user-supplied color classes). The
//! cell containing position `i` at level `L` is the run whose interior
//! positions all satisfy `ptn > L`. One array therefore encodes the
//! whole nest of partitions along the current search path, and rolling
//! back to an ancestor level is a single pass resetting deeper tags.
//!
//! `lab` itself never needs restoring on backtrack: splits only permute
//! vertices inside the cells of the ancestor partition, so every
//! ancestor cell keeps its contents as a set.

use crate::error::Error;

/// Boundary tag meaning "interior at every level".
pub const INFTY: u32 = u32::MAX;

/// Ordered partition with level-tagged boundaries and a position index.
#[derive(Debug, Clone)]
pub struct Partition {
    lab: Vec<usize>,
    ptn: Vec<u32>,
    pos: Vec<usize>,
}

impl Partition {
    /// The unit partition: one cell holding all of `0..n`.
    pub fn unit(n: usize) -> Self {
        let lab: Vec<usize> = (0..n).collect();
        let pos = lab.clone();
        let mut ptn = vec![INFTY; n];
        if n > 0 {
            ptn[n - 1] = 0;
        }
        Self { lab, ptn, pos }
    }

    /// Build from ordered color classes. Every vertex of `0..n` must
    /// appear in exactly one class.
    pub fn from_classes(n: usize, classes: &[Vec<usize>]) -> Result<Self, Error> {
        let mut lab = Vec::with_capacity(n);
        let mut ptn = vec![INFTY; n];
        let mut seen = vec![false; n];
        for class in classes {
            if class.is_empty() {
                return Err(Error::InvalidPartition("empty color class".into()));
            }
            for &v in class {
                if v >= n {
                    return Err(Error::InvalidPartition(format!(
                        "vertex {v} out of range for {n} vertices"
                    )));
                }
                if seen[v] {
                    return Err(Error::InvalidPartition(format!(
                        "vertex {v} appears twice"
                    )));
                }
                seen[v] = true;
                lab.push(v);
            }
            ptn[lab.len() - 1] = 0;
        }
        if lab.len() != n {
            let missing = seen.iter().position(|&s| !s).unwrap_or(0);
            return Err(Error::InvalidPartition(format!(
                "vertex {missing} missing from the partition"
            )));
        }
        let mut pos = vec![0usize; n];
        for (i, &v) in lab.iter().enumerate() {
            pos[v] = i;
        }
        Ok(Self { lab, ptn, pos })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.lab.len()
    }

    /// The labeling array; a valid permutation of `0..n` at all times.
    #[inline]
    pub fn lab(&self) -> &[usize] {
        &self.lab
    }

    #[inline]
    pub fn vertex_at(&self, i: usize) -> usize {
        self.lab[i]
    }

    #[inline]
    pub fn position_of(&self, v: usize) -> usize {
        self.pos[v]
    }

    /// Whether position `i` ends a cell when viewed at `level`.
    #[inline]
    pub fn is_boundary(&self, i: usize, level: u32) -> bool {
        self.ptn[i] <= level
    }

    /// Last position of the cell starting at `start`, viewed at `level`.
    pub fn cell_end(&self, start: usize, level: u32) -> usize {
        let mut i = start;
        while self.ptn[i] > level {
            i += 1;
        }
        i
    }

    /// Number of cells at `level`.
    pub fn cell_count(&self, level: u32) -> usize {
        self.ptn.iter().filter(|&&p| p <= level).count()
    }

    /// Iterate `(start, end)` cell ranges (inclusive end) at `level`.
    pub fn cells(&self, level: u32) -> Cells<'_> {
        Cells {
            part: self,
            level,
            next: 0,
        }
    }

    /// Start and end of the first cell of size at least two at `level`.
    pub fn first_nonsingleton(&self, level: u32) -> Option<(usize, usize)> {
        self.cells(level).find(|&(s, e)| e > s)
    }

    /// Snapshot the vertices of the cell starting at `start`.
    pub fn cell_vertices(&self, start: usize, level: u32) -> Vec<usize> {
        let end = self.cell_end(start, level);
        self.lab[start..=end].to_vec()
    }

    /// Mark a cell boundary at position `i`, created at `level`.
    #[inline]
    pub fn split_at(&mut self, i: usize, level: u32) {
        debug_assert!(self.ptn[i] > level);
        self.ptn[i] = level;
    }

    /// Write vertex `v` into slot `i`. Callers are responsible for
    /// keeping `lab` a permutation across a whole rewrite.
    #[inline]
    pub(crate) fn set_slot(&mut self, i: usize, v: usize) {
        self.lab[i] = v;
        self.pos[v] = i;
    }

    /// Move `v` to the front of its cell (which must start at
    /// `cell_start`) and cut it off as a singleton created at `level`.
    pub fn individualize(&mut self, cell_start: usize, v: usize, level: u32) {
        let pv = self.pos[v];
        debug_assert!(pv >= cell_start);
        let u = self.lab[cell_start];
        self.lab.swap(cell_start, pv);
        self.pos[u] = pv;
        self.pos[v] = cell_start;
        self.split_at(cell_start, level);
    }

    /// Undo every boundary created below `level`.
    pub fn restore(&mut self, level: u32) {
        for p in &mut self.ptn {
            if *p > level && *p != INFTY {
                *p = INFTY;
            }
        }
    }
}

/// Iterator over the cells of a partition at a fixed level.
pub struct Cells<'a> {
    part: &'a Partition,
    level: u32,
    next: usize,
}

impl Iterator for Cells<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.next >= self.part.n() {
            return None;
        }
        let start = self.next;
        let end = self.part.cell_end(start, self.level);
        self.next = end + 1;
        Some((start, end))
    }
}
