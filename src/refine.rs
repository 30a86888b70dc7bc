//! Equitable refinement of ordered partitions.
//!
//! Given a partition and an active set of unprocessed splitter cells,
//! refinement repeatedly recounts adjacencies towards a splitter and
//! splits every cell whose members disagree, until the active set is
//! exhausted or the partition is discrete. The dense store counts with
//! a popcount of `row AND splitter`; the sparse store walks the
//! splitter's adjacency lists. Both return a 15-bit code that depends
//! only on the structure of the refinement — splitter positions,
//! counts, fragment start positions and the cell count — never on
//! vertex identities, so codes are comparable across sibling paths of
//! the search tree.

use crate::bitset::{self, VertexSet};
use crate::dense::DenseGraph;
use crate::partition::Partition;
use crate::sparse::SparseGraph;

/// Mixing constant of the running code (classical nauty `MASH`).
pub(crate) const MASH: u16 = 0x6B1D;

/// Fold one contribution into the running 15-bit code.
#[inline]
pub(crate) fn mash(code: u16, x: usize) -> u16 {
    (code ^ MASH).wrapping_add(x as u16) & 0x7FFF
}

/// Reusable working storage for refinement, allocated once per search.
#[derive(Debug)]
pub(crate) struct RefineScratch {
    /// Vertex set of the current splitter cell.
    splitter: VertexSet,
    /// Per-vertex adjacency count towards the splitter.
    count: Vec<usize>,
    /// Counting-sort buckets, indexed by count value.
    bucket: Vec<usize>,
    /// Cell contents in pre-split order.
    sorted: Vec<usize>,
    /// Snapshot of non-singleton cell starts per splitter step.
    starts: Vec<usize>,
    /// `(start, size, count)` per fragment of the cell being split.
    frags: Vec<(usize, usize, usize)>,
    /// BFS queue for the sparse distance pass.
    queue: Vec<usize>,
}

impl RefineScratch {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            splitter: VertexSet::new(n.max(1)),
            count: vec![0; n],
            bucket: vec![0; n + 2],
            sorted: Vec::with_capacity(n),
            starts: Vec::with_capacity(n),
            frags: Vec::with_capacity(n),
            queue: Vec::with_capacity(n),
        }
    }
}

/// The operation set the search driver needs from a graph store. Dense
/// and sparse keep their own refinement and verification; the driver is
/// monomorphized over this trait rather than dispatching dynamically.
pub(crate) trait Refinable: Clone + Ord {
    fn vertex_count(&self) -> usize;

    /// Whether the store keeps directed adjacency.
    fn stores_directed(&self) -> bool;

    /// Refine to an equitable partition at `level`, consuming `active`,
    /// updating `num_cells`, and returning the refinement code.
    fn refine_partition(
        &self,
        part: &mut Partition,
        active: &mut VertexSet,
        scratch: &mut RefineScratch,
        level: u32,
        num_cells: &mut usize,
    ) -> u16;

    /// Verify that `p` preserves adjacency.
    fn check_automorphism(&self, p: &[usize]) -> bool;

    /// The graph with edge `(i, j)` iff this graph has `(lab[i], lab[j])`.
    fn relabel(&self, lab: &[usize]) -> Self;
}

/// Split one cell by the counts in `count`, rewriting its `lab` range
/// in bucket order, tagging fragment boundaries with `level`, updating
/// the active set, the running code and the singleton hint.
///
/// Every non-trivial fragment except the largest joins the active set;
/// the largest inherits the split cell's role. If the split cell was
/// itself still active, all fragments join.
#[allow(clippy::too_many_arguments)]
fn split_cell(
    part: &mut Partition,
    active: &mut VertexSet,
    bucket: &mut [usize],
    sorted: &mut Vec<usize>,
    frags: &mut Vec<(usize, usize, usize)>,
    count: &[usize],
    cs: usize,
    ce: usize,
    min_c: usize,
    max_c: usize,
    level: u32,
    num_cells: &mut usize,
    code: &mut u16,
    hint: &mut Option<usize>,
) {
    let was_active = active.contains(cs);

    for b in &mut bucket[min_c..=max_c] {
        *b = 0;
    }
    for i in cs..=ce {
        bucket[count[part.vertex_at(i)]] += 1;
    }

    frags.clear();
    let mut start = cs;
    for c in min_c..=max_c {
        if bucket[c] > 0 {
            frags.push((start, bucket[c], c));
            start += bucket[c];
        }
    }
    debug_assert!(frags.len() >= 2);

    // rewrite the cell in bucket order; bucket[c] becomes the next
    // free slot of fragment c
    sorted.clear();
    sorted.extend_from_slice(&part.lab()[cs..=ce]);
    for &(s, _, c) in frags.iter() {
        bucket[c] = s;
    }
    for &v in sorted.iter() {
        let c = count[v];
        part.set_slot(bucket[c], v);
        bucket[c] += 1;
    }

    let mut largest = 0;
    let mut smallest = 0;
    for (k, &(_, sz, _)) in frags.iter().enumerate() {
        if sz > frags[largest].1 {
            largest = k;
        }
        if sz < frags[smallest].1 {
            smallest = k;
        }
    }

    let last = frags.len() - 1;
    for (k, &(s, sz, c)) in frags.iter().enumerate() {
        if k < last {
            part.split_at(s + sz - 1, level);
        }
        *code = mash(*code, s);
        *code = mash(*code, c);
        if was_active || k != largest {
            active.insert(s);
        }
    }
    *num_cells += last;
    *hint = Some(frags[smallest].0);
}

/// Pick the next splitter: the hinted cell if it is still active,
/// otherwise the first active position.
fn take_splitter(active: &mut VertexSet, hint: &mut Option<usize>) -> Option<usize> {
    let pick = match hint.take().filter(|&h| active.contains(h)) {
        Some(h) => h,
        None => active.next_element(None)?,
    };
    active.remove(pick);
    Some(pick)
}

impl Refinable for DenseGraph {
    fn vertex_count(&self) -> usize {
        self.n()
    }

    fn stores_directed(&self) -> bool {
        self.is_directed()
    }

    fn refine_partition(
        &self,
        part: &mut Partition,
        active: &mut VertexSet,
        scratch: &mut RefineScratch,
        level: u32,
        num_cells: &mut usize,
    ) -> u16 {
        let n = self.n();
        let RefineScratch {
            splitter,
            count,
            bucket,
            sorted,
            starts,
            frags,
            ..
        } = scratch;
        let mut code: u16 = 0;
        let mut hint: Option<usize> = None;

        while *num_cells < n {
            let split_start = match take_splitter(active, &mut hint) {
                Some(s) => s,
                None => break,
            };
            code = mash(code, split_start);
            let split_end = part.cell_end(split_start, level);

            splitter.clear();
            for i in split_start..=split_end {
                splitter.insert(part.vertex_at(i));
            }
            let single = if split_start == split_end {
                Some(part.vertex_at(split_start))
            } else {
                None
            };

            starts.clear();
            starts.extend(part.cells(level).filter(|&(s, e)| e > s).map(|(s, _)| s));

            for &cs in starts.iter() {
                let ce = part.cell_end(cs, level);
                let mut min_c = usize::MAX;
                let mut max_c = 0;
                for i in cs..=ce {
                    let v = part.vertex_at(i);
                    let c = match single {
                        // singleton splitters need no popcount
                        Some(s) => usize::from(self.has_edge(v, s)),
                        None => bitset::intersection_size(self.row(v), splitter.words()),
                    };
                    count[v] = c;
                    min_c = min_c.min(c);
                    max_c = max_c.max(c);
                }
                if min_c == max_c {
                    code = mash(code, min_c);
                    continue;
                }
                split_cell(
                    part, active, bucket, sorted, frags, count, cs, ce, min_c, max_c,
                    level, num_cells, &mut code, &mut hint,
                );
            }
            code = mash(code, *num_cells);
        }
        code
    }

    fn check_automorphism(&self, p: &[usize]) -> bool {
        self.is_automorphism(p)
    }

    fn relabel(&self, lab: &[usize]) -> Self {
        self.permute(lab)
    }
}

impl Refinable for SparseGraph {
    fn vertex_count(&self) -> usize {
        self.n()
    }

    fn stores_directed(&self) -> bool {
        self.is_directed()
    }

    fn refine_partition(
        &self,
        part: &mut Partition,
        active: &mut VertexSet,
        scratch: &mut RefineScratch,
        level: u32,
        num_cells: &mut usize,
    ) -> u16 {
        let n = self.n();
        let RefineScratch {
            count,
            bucket,
            sorted,
            starts,
            frags,
            queue,
            ..
        } = scratch;
        let mut code: u16 = 0;
        let mut hint: Option<usize> = None;

        while *num_cells < n {
            // early in the search a lone singleton splitter over a
            // coarse partition refines faster by distance from its
            // vertex, all cells in one pass
            if level <= 2 && *num_cells <= n / 8 {
                if let Some(first) = active.next_element(None) {
                    let lone = active.next_element(Some(first)).is_none();
                    if lone && part.cell_end(first, level) == first {
                        active.remove(first);
                        code = mash(code, first);
                        let src = part.vertex_at(first);

                        // BFS distance labels; unreachable maps to n
                        for c in count.iter_mut() {
                            *c = n;
                        }
                        count[src] = 0;
                        queue.clear();
                        queue.push(src);
                        let mut head = 0;
                        while head < queue.len() {
                            let u = queue[head];
                            head += 1;
                            for &w in self.neighbors(u) {
                                if count[w] == n && w != src {
                                    count[w] = count[u] + 1;
                                    queue.push(w);
                                }
                            }
                        }

                        starts.clear();
                        starts.extend(
                            part.cells(level).filter(|&(s, e)| e > s).map(|(s, _)| s),
                        );
                        for &cs in starts.iter() {
                            let ce = part.cell_end(cs, level);
                            let mut min_c = usize::MAX;
                            let mut max_c = 0;
                            for i in cs..=ce {
                                let c = count[part.vertex_at(i)];
                                min_c = min_c.min(c);
                                max_c = max_c.max(c);
                            }
                            if min_c == max_c {
                                code = mash(code, min_c);
                                continue;
                            }
                            split_cell(
                                part, active, bucket, sorted, frags, count, cs, ce,
                                min_c, max_c, level, num_cells, &mut code, &mut hint,
                            );
                        }
                        code = mash(code, *num_cells);
                        continue;
                    }
                }
            }

            let split_start = match take_splitter(active, &mut hint) {
                Some(s) => s,
                None => break,
            };
            code = mash(code, split_start);
            let split_end = part.cell_end(split_start, level);

            starts.clear();
            starts.extend(part.cells(level).filter(|&(s, e)| e > s).map(|(s, _)| s));

            // zero only what will be read, then let every vertex of the
            // splitter bump its neighbors
            for &cs in starts.iter() {
                let ce = part.cell_end(cs, level);
                for i in cs..=ce {
                    count[part.vertex_at(i)] = 0;
                }
            }
            for i in split_start..=split_end {
                let u = part.vertex_at(i);
                for &w in self.neighbors(u) {
                    count[w] += 1;
                }
            }

            for &cs in starts.iter() {
                let ce = part.cell_end(cs, level);
                let mut min_c = usize::MAX;
                let mut max_c = 0;
                for i in cs..=ce {
                    let c = count[part.vertex_at(i)];
                    min_c = min_c.min(c);
                    max_c = max_c.max(c);
                }
                if min_c == max_c {
                    code = mash(code, min_c);
                    continue;
                }
                split_cell(
                    part, active, bucket, sorted, frags, count, cs, ce, min_c, max_c,
                    level, num_cells, &mut code, &mut hint,
                );
            }
            code = mash(code, *num_cells);
        }
        code
    }

    fn check_automorphism(&self, p: &[usize]) -> bool {
        self.is_automorphism(p)
    }

    fn relabel(&self, lab: &[usize]) -> Self {
        self.permute(lab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refine_dense(
        g: &DenseGraph,
        part: &mut Partition,
        level: u32,
        num_cells: &mut usize,
    ) -> u16 {
        let mut scratch = RefineScratch::new(g.n());
        let mut active = VertexSet::new(g.n());
        for (s, _) in part.cells(level) {
            active.insert(s);
        }
        g.refine_partition(part, &mut active, &mut scratch, level, num_cells)
    }

    fn refine_sparse(
        g: &SparseGraph,
        part: &mut Partition,
        level: u32,
        num_cells: &mut usize,
    ) -> u16 {
        let mut scratch = RefineScratch::new(g.n());
        let mut active = VertexSet::new(g.n());
        for (s, _) in part.cells(level) {
            active.insert(s);
        }
        g.refine_partition(part, &mut active, &mut scratch, level, num_cells)
    }

    fn is_equitable(g: &DenseGraph, part: &Partition, level: u32) -> bool {
        let cells: Vec<(usize, usize)> = part.cells(level).collect();
        for &(cs, ce) in &cells {
            for &(ds, de) in &cells {
                let splitter: Vec<usize> =
                    (ds..=de).map(|i| part.vertex_at(i)).collect();
                let deg = |v: usize| {
                    splitter
                        .iter()
                        .filter(|&&w| g.has_edge(v, w))
                        .count()
                };
                let d0 = deg(part.vertex_at(cs));
                if (cs..=ce).any(|i| deg(part.vertex_at(i)) != d0) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn star_splits_by_degree() {
        // star with center 0 and three leaves
        let g = DenseGraph::from_edges(4, [(0, 1), (0, 2), (0, 3)], false).unwrap();
        let mut part = Partition::unit(4);
        let mut num_cells = 1;
        refine_dense(&g, &mut part, 1, &mut num_cells);
        assert_eq!(num_cells, 2);
        assert!(is_equitable(&g, &part, 1));
        // leaves before the center: degree 1 sorts below degree 3
        assert_eq!(part.vertex_at(3), 0);
    }

    #[test]
    fn regular_graph_stays_coarse() {
        let c5 = DenseGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], false)
            .unwrap();
        let mut part = Partition::unit(5);
        let mut num_cells = 1;
        refine_dense(&c5, &mut part, 1, &mut num_cells);
        // C5 is vertex-transitive and equitable as one cell
        assert_eq!(num_cells, 1);
        assert!(is_equitable(&c5, &part, 1));
    }

    #[test]
    fn individualization_makes_cycle_discrete() {
        let c5 = DenseGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], false)
            .unwrap();
        let mut part = Partition::unit(5);
        let mut num_cells = 1;
        refine_dense(&c5, &mut part, 1, &mut num_cells);
        part.individualize(0, 0, 2);
        num_cells += 1;
        let mut scratch = RefineScratch::new(5);
        let mut active = VertexSet::new(5);
        active.insert(0);
        c5.refine_partition(&mut part, &mut active, &mut scratch, 2, &mut num_cells);
        // fixing one vertex of C5 leaves only the reflection, which
        // cannot be separated: cells {0}, {1,4}, {2,3}
        assert_eq!(num_cells, 3);
        assert!(is_equitable(&c5, &part, 2));
        assert_eq!(part.vertex_at(0), 0);
    }

    #[test]
    fn path_refines_to_discrete_after_one_choice() {
        let p4 = DenseGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        let mut part = Partition::unit(4);
        let mut num_cells = 1;
        refine_dense(&p4, &mut part, 1, &mut num_cells);
        // ends vs middles
        assert_eq!(num_cells, 2);
        part.individualize(0, 0, 2);
        num_cells += 1;
        let mut scratch = RefineScratch::new(4);
        let mut active = VertexSet::new(4);
        active.insert(0);
        p4.refine_partition(&mut part, &mut active, &mut scratch, 2, &mut num_cells);
        assert_eq!(num_cells, 4);
        // the far end (count 0 towards {0}) sorts before the neighbor
        assert_eq!(part.lab(), &[0, 3, 2, 1]);
    }

    #[test]
    fn sparse_and_dense_agree_on_cells() {
        let edges = [(0usize, 1usize), (1, 2), (2, 3), (0, 3), (0, 2)];
        let dg = DenseGraph::from_edges(4, edges, false).unwrap();
        let sg = SparseGraph::from_edges(4, edges, false).unwrap();
        let mut dp = Partition::unit(4);
        let mut sp = Partition::unit(4);
        let (mut dc, mut sc) = (1, 1);
        refine_dense(&dg, &mut dp, 1, &mut dc);
        refine_sparse(&sg, &mut sp, 1, &mut sc);
        assert_eq!(dc, sc);
        let dcells: Vec<Vec<usize>> = dp
            .cells(1)
            .map(|(s, e)| {
                let mut v = dp.lab()[s..=e].to_vec();
                v.sort_unstable();
                v
            })
            .collect();
        let scells: Vec<Vec<usize>> = sp
            .cells(1)
            .map(|(s, e)| {
                let mut v = sp.lab()[s..=e].to_vec();
                v.sort_unstable();
                v
            })
            .collect();
        assert_eq!(dcells, scells);
    }

    #[test]
    fn code_ignores_vertex_names() {
        // the same graph under a relabeling must produce the same code
        let g1 = DenseGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)], false).unwrap();
        let g2 = DenseGraph::from_edges(5, [(4, 3), (3, 2), (2, 1), (1, 0)], false).unwrap();
        let mut p1 = Partition::unit(5);
        let mut p2 = Partition::unit(5);
        let (mut c1, mut c2) = (1, 1);
        let code1 = refine_dense(&g1, &mut p1, 1, &mut c1);
        let code2 = refine_dense(&g2, &mut p2, 1, &mut c2);
        assert_eq!(code1, code2);
    }

    #[test]
    fn colored_start_respects_classes() {
        let g = DenseGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        let mut part = Partition::from_classes(4, &[vec![1, 2], vec![0, 3]]).unwrap();
        let mut num_cells = 2;
        refine_dense(&g, &mut part, 1, &mut num_cells);
        // colors already separate ends from middles; nothing splits
        assert_eq!(num_cells, 2);
    }
}
