//! The backtracking search over the refinement tree.
//!
//! Nodes are equitable partitions; the children of a node individualize
//! the vertices of its target cell (the first non-singleton cell) in
//! turn and refine. The driver runs in three modes:
//!
//! * **first path** — the leftmost descent; its leaf seeds the
//!   automorphism bookkeeping and, when requested, the canonical
//!   candidate;
//! * **sibling paths** — explored from every first-path node, with
//!   target-cell vertices pruned to orbit representatives (every
//!   automorphism discovered while such a node is open was found
//!   between two leaves below it and therefore fixes the node's path
//!   prefix pointwise, which is what makes the global orbit array a
//!   sound filter here);
//! * **canonical competition** — discrete leaves relabel the graph and
//!   compare word-lexicographically against the best leaf so far;
//!   smaller wins, equal yields an automorphism between the two
//!   labelings.
//!
//! An automorphism found at a leaf jumps the search back to the deepest
//! common ancestor of the two equivalent leaves. First-path nodes clamp
//! incoming jumps to their own level so that the orbit-index factor of
//! the group order is accumulated for every node on the first path.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::bitset::VertexSet;
use crate::dense::DenseGraph;
use crate::error::Error;
use crate::options::{
    AutomorphismEvent, CanonEvent, EngineOptions, Hooks, LevelEvent, NodeEvent,
};
use crate::orbits::Orbits;
use crate::partition::Partition;
use crate::perm::Permutation;
use crate::refine::{Refinable, RefineScratch};
use crate::result::{AutomResult, Canonical, GroupSize, SearchStatus, SearchStats};
use crate::schreier::StrongGenSet;
use crate::sparse::SparseGraph;

/// Automorphism group and canonical form of a dense graph.
pub fn run_dense(
    g: &DenseGraph,
    opts: &EngineOptions,
    classes: Option<&[Vec<usize>]>,
    hooks: &mut Hooks,
) -> Result<AutomResult<DenseGraph>, Error> {
    run_engine(g, opts, classes, hooks)
}

/// Automorphism group and canonical form of a sparse graph.
pub fn run_sparse(
    g: &SparseGraph,
    opts: &EngineOptions,
    classes: Option<&[Vec<usize>]>,
    hooks: &mut Hooks,
) -> Result<AutomResult<SparseGraph>, Error> {
    run_engine(g, opts, classes, hooks)
}

pub(crate) fn run_engine<G: Refinable>(
    g: &G,
    opts: &EngineOptions,
    classes: Option<&[Vec<usize>]>,
    hooks: &mut Hooks,
) -> Result<AutomResult<G>, Error> {
    let n = g.vertex_count();
    // a directed store must be announced; the reverse (digraph set for
    // an undirected store with self-loops) is fine
    debug_assert!(opts.digraph || !g.stores_directed());
    if n == 0 {
        return Ok(AutomResult {
            generators: Vec::new(),
            group_size: GroupSize::one(),
            exact_order: opts
                .use_schreier
                .then(|| StrongGenSet::build(&[], 0, opts.schreier_seed).order()),
            orbits: Vec::new(),
            num_orbits: 0,
            canonical: opts.get_canon.then(|| Canonical {
                labeling: Permutation::identity(0),
                graph: g.clone(),
            }),
            stats: SearchStats::default(),
            status: SearchStatus::Complete,
        });
    }

    let (part, root_cells) = match classes {
        Some(classes) => {
            let part = Partition::from_classes(n, classes)?;
            let cells = classes.len();
            (part, cells)
        }
        None => (Partition::unit(n), 1),
    };

    let mut search = Search::new(g, *opts, hooks, part);
    search.run(root_cells);
    Ok(search.into_result())
}

struct Search<'g, 'h, 'a, G: Refinable> {
    g: &'g G,
    n: usize,
    opts: EngineOptions,
    hooks: &'h mut Hooks<'a>,

    part: Partition,
    active: VertexSet,
    scratch: RefineScratch,

    orbits: Orbits,
    num_orbits: usize,
    generators: Vec<Permutation>,
    group_size: GroupSize,
    stats: SearchStats,
    aborted: bool,

    // current path, indexed by level; path[l] is the vertex whose
    // individualization created the node at level l (l >= 2)
    path: Vec<usize>,
    code: Vec<u16>,

    // first path snapshot
    first_lab: Vec<usize>,
    first_path: Vec<usize>,
    first_code: Vec<u16>,
    first_leaf_level: u32,
    first_tc: Vec<usize>,
    // prefix flags of the current path against the first path
    first_eq: Vec<bool>,
    first_match: Vec<bool>,

    // canonical candidate
    canon_lab: Vec<usize>,
    canon_graph: Option<G>,
    canon_path: Vec<usize>,
    canon_level: u32,
    canon_match: Vec<bool>,
}

impl<'g, 'h, 'a, G: Refinable> Search<'g, 'h, 'a, G> {
    fn new(g: &'g G, opts: EngineOptions, hooks: &'h mut Hooks<'a>, part: Partition) -> Self {
        let n = g.vertex_count();
        let depth = n + 2;
        Self {
            g,
            n,
            opts,
            hooks,
            part,
            active: VertexSet::new(n),
            scratch: RefineScratch::new(n),
            orbits: Orbits::singletons(n),
            num_orbits: n,
            generators: Vec::new(),
            group_size: GroupSize::one(),
            stats: SearchStats::default(),
            aborted: false,
            path: vec![usize::MAX; depth],
            code: vec![0; depth],
            first_lab: Vec::new(),
            first_path: vec![usize::MAX; depth],
            first_code: vec![0; depth],
            first_leaf_level: 0,
            first_tc: vec![0; depth],
            first_eq: vec![false; depth],
            first_match: vec![false; depth],
            canon_lab: Vec::new(),
            canon_graph: None,
            canon_path: vec![usize::MAX; depth],
            canon_level: 0,
            canon_match: vec![false; depth],
        }
    }

    fn run(&mut self, root_cells: usize) {
        let mut num_cells = root_cells;
        for (s, _) in self.part.cells(1) {
            self.active.insert(s);
        }
        let code = self.g.refine_partition(
            &mut self.part,
            &mut self.active,
            &mut self.scratch,
            1,
            &mut num_cells,
        );
        self.stats.nodes += 1;
        self.stats.max_level = 1;
        self.code[1] = code;
        self.first_eq[1] = true;
        self.first_match[1] = true;
        self.canon_match[1] = true;
        self.fire_node(1, num_cells, code);
        if self.hooks.abort.is_set() {
            self.aborted = true;
            return;
        }
        if num_cells == self.n {
            // the root refined to a discrete partition: the group is
            // trivial and the only leaf is canonical
            self.record_first_leaf(1);
        } else {
            self.first_node(1, num_cells);
        }
    }

    /// A node on the leftmost path. Never propagates backjumps past
    /// itself: its orbit-index factor must be accumulated.
    fn first_node(&mut self, level: u32, num_cells: usize) {
        let (tcs, _) = self
            .part
            .first_nonsingleton(level)
            .expect("non-discrete node has a non-singleton cell");
        let tc_vertices = self.part.cell_vertices(tcs, level);
        self.first_tc[level as usize] = tcs;
        self.stats.tc_total += tc_vertices.len() as u64;
        if let Some(f) = self.hooks.on_level.as_mut() {
            f(&LevelEvent {
                level,
                target_cell_size: tc_vertices.len(),
            });
        }

        let tv1 = tc_vertices[0];
        let clevel = level + 1;

        // leftmost child
        let ccells = self.descend(tcs, tv1, level, num_cells);
        self.first_eq[clevel as usize] = true;
        self.first_match[clevel as usize] = true;
        self.canon_match[clevel as usize] = true;
        if self.check_abort() {
            self.part.restore(level);
            return;
        }
        if ccells == self.n {
            self.record_first_leaf(clevel);
        } else {
            self.first_node(clevel, ccells);
        }
        self.part.restore(level);
        if self.aborted {
            return;
        }

        // remaining children, pruned to orbit representatives; the
        // target cell keeps its position across siblings
        for &w in &tc_vertices[1..] {
            if self.aborted {
                break;
            }
            if self.orbits.find(w) != w {
                continue;
            }
            let tc_start = self.first_tc[level as usize];
            let ccells = self.descend(tc_start, w, level, num_cells);
            self.enter_sibling(clevel, w);
            if self.check_abort() {
                self.part.restore(level);
                return;
            }
            if !self.opts.get_canon && !self.first_eq[clevel as usize] {
                self.stats.bad_leaves += 1;
            } else if ccells == self.n {
                // backjumps are clamped here: the sibling loop resumes
                let _ = self.process_leaf(clevel);
            } else {
                let _ = self.other_node(clevel, ccells);
            }
            self.part.restore(level);
        }

        // orbit-stabilizer factor for this level
        let rep = self.orbits.find(tv1);
        let index = tc_vertices
            .iter()
            .filter(|&&w| self.orbits.find(w) == rep)
            .count();
        self.group_size.multiply(index);
        trace!("level {level}: target cell {}, orbit index {index}", tc_vertices.len());
    }

    /// A node off the first path. Returns the level to unwind to.
    fn other_node(&mut self, level: u32, num_cells: usize) -> u32 {
        let (tcs, _) = self
            .part
            .first_nonsingleton(level)
            .expect("non-discrete node has a non-singleton cell");
        let tc_vertices = self.part.cell_vertices(tcs, level);
        self.stats.tc_total += tc_vertices.len() as u64;
        let clevel = level + 1;

        for &w in &tc_vertices {
            if self.aborted {
                break;
            }
            let ccells = self.descend(tcs, w, level, num_cells);
            self.enter_sibling(clevel, w);
            if self.check_abort() {
                self.part.restore(level);
                return 0;
            }
            let rtn = if !self.opts.get_canon && !self.first_eq[clevel as usize] {
                self.stats.bad_leaves += 1;
                level
            } else if ccells == self.n {
                self.process_leaf(clevel)
            } else {
                self.other_node(clevel, ccells)
            };
            self.part.restore(level);
            if rtn < level {
                return rtn;
            }
        }
        level - 1
    }

    /// Individualize `w` in the target cell at `tcs`, refine the child
    /// and record its code. Returns the child's cell count.
    fn descend(&mut self, tcs: usize, w: usize, level: u32, num_cells: usize) -> usize {
        let clevel = level + 1;
        self.part.individualize(tcs, w, clevel);
        let mut ccells = num_cells + 1;
        self.active.clear();
        self.active.insert(tcs);
        let code = self.g.refine_partition(
            &mut self.part,
            &mut self.active,
            &mut self.scratch,
            clevel,
            &mut ccells,
        );
        self.stats.nodes += 1;
        self.stats.max_level = self.stats.max_level.max(clevel);
        self.code[clevel as usize] = code;
        self.path[clevel as usize] = w;
        self.fire_node(clevel, ccells, code);
        ccells
    }

    /// Update the prefix flags after descending to a non-first child.
    fn enter_sibling(&mut self, clevel: u32, w: usize) {
        let l = clevel as usize;
        let parent = l - 1;
        self.first_eq[l] =
            self.first_eq[parent] && self.code[l] == self.first_code[l];
        self.first_match[l] = self.first_match[parent]
            && clevel <= self.first_leaf_level
            && self.first_path[l] == w;
        self.canon_match[l] = self.canon_match[parent]
            && clevel <= self.canon_level
            && self.canon_path[l] == w;
    }

    /// Snapshot the leftmost leaf and seed the canonical candidate.
    fn record_first_leaf(&mut self, level: u32) {
        debug!("first leaf at level {level}");
        self.first_leaf_level = level;
        self.first_lab = self.part.lab().to_vec();
        for l in 1..=level as usize {
            self.first_code[l] = self.code[l];
            self.first_path[l] = self.path[l];
        }
        if self.opts.get_canon {
            self.replace_canon(level);
        }
    }

    /// A discrete leaf off the first path. Returns the level to unwind
    /// to: the deepest common ancestor with the matching leaf when an
    /// automorphism was found, the parent level otherwise.
    fn process_leaf(&mut self, level: u32) -> u32 {
        // equivalent to the first leaf by refinement codes?
        if self.first_eq[level as usize] && level == self.first_leaf_level {
            let mut map = vec![0usize; self.n];
            for i in 0..self.n {
                map[self.first_lab[i]] = self.part.vertex_at(i);
            }
            if self.g.check_automorphism(&map) {
                let p = Permutation::from_map_unchecked(map);
                self.handle_automorphism(p);
                return self.deepest_match(&self.first_match, level);
            }
        }

        if !self.opts.get_canon {
            self.stats.bad_leaves += 1;
            return level - 1;
        }

        let cand = self.g.relabel(self.part.lab());
        let canon = self
            .canon_graph
            .as_ref()
            .expect("canonical candidate exists after the first leaf");
        match cand.cmp(canon) {
            Ordering::Less => {
                self.canon_graph = Some(cand);
                self.replace_canon(level);
                level - 1
            }
            Ordering::Equal => {
                // equal relabeled graphs always differ by an
                // automorphism of the input
                let mut map = vec![0usize; self.n];
                for i in 0..self.n {
                    map[self.canon_lab[i]] = self.part.vertex_at(i);
                }
                if self.g.check_automorphism(&map) {
                    let p = Permutation::from_map_unchecked(map);
                    self.handle_automorphism(p);
                    self.deepest_match(&self.canon_match, level)
                } else {
                    self.stats.bad_leaves += 1;
                    level - 1
                }
            }
            Ordering::Greater => {
                self.stats.bad_leaves += 1;
                level - 1
            }
        }
    }

    /// Make the current leaf the canonical candidate. Callers that
    /// already built the relabeled graph store it first; the first
    /// leaf builds it here.
    fn replace_canon(&mut self, level: u32) {
        self.canon_lab = self.part.lab().to_vec();
        if self.canon_graph.is_none() {
            self.canon_graph = Some(self.g.relabel(&self.canon_lab));
        }
        self.canon_level = level;
        for l in 1..=level as usize {
            self.canon_path[l] = self.path[l];
            self.canon_match[l] = true;
        }
        self.stats.canon_updates += 1;
        if let Some(f) = self.hooks.on_canonical.as_mut() {
            f(&CanonEvent {
                level,
                lab: &self.canon_lab,
            });
        }
    }

    /// Deepest level at which the given prefix flags still hold.
    fn deepest_match(&self, flags: &[bool], level: u32) -> u32 {
        let mut l = level as usize;
        while l > 1 && !flags[l] {
            l -= 1;
        }
        l as u32
    }

    /// Merge an automorphism into the orbit state; keep it as a
    /// generator only if it reduced the orbit count.
    fn handle_automorphism(&mut self, p: Permutation) {
        debug_assert!(self.g.check_automorphism(p.as_slice()));
        let before = self.num_orbits;
        let after = self.orbits.join_permutation(&p);
        self.num_orbits = after;
        if after < before {
            debug!("generator {p}: orbits {before} -> {after}");
            if let Some(f) = self.hooks.on_automorphism.as_mut() {
                f(&AutomorphismEvent {
                    generator: &p,
                    orbits: self.orbits.as_slice(),
                    fixed_count: p.fixed_count(),
                });
            }
            self.generators.push(p);
        }
    }

    fn fire_node(&mut self, level: u32, num_cells: usize, code: u16) {
        if let Some(f) = self.hooks.on_node.as_mut() {
            f(&NodeEvent {
                level,
                num_cells,
                code,
            });
        }
    }

    fn check_abort(&mut self) -> bool {
        if self.hooks.abort.is_set() {
            self.aborted = true;
        }
        self.aborted
    }

    fn into_result(mut self) -> AutomResult<G> {
        let num_orbits = self.orbits.compress_and_count();
        let exact_order = self.opts.use_schreier.then(|| {
            StrongGenSet::build(&self.generators, self.n, self.opts.schreier_seed).order()
        });
        let canonical = match (self.opts.get_canon, self.canon_graph) {
            (true, Some(graph)) => Some(Canonical {
                labeling: Permutation::from_map_unchecked(self.canon_lab),
                graph,
            }),
            _ => None,
        };
        AutomResult {
            generators: self.generators,
            group_size: self.group_size,
            exact_order,
            orbits: self.orbits.into_vec(),
            num_orbits,
            canonical,
            stats: self.stats,
            status: if self.aborted {
                SearchStatus::Aborted
            } else {
                SearchStatus::Complete
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(n: usize, edges: &[(usize, usize)], directed: bool) -> DenseGraph {
        DenseGraph::from_edges(n, edges.iter().copied(), directed).unwrap()
    }

    fn order_of<G>(res: &AutomResult<G>) -> f64 {
        res.group_size.approx()
    }

    #[test]
    fn k4_has_order_24() {
        let g = dense(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)], false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 24.0);
        assert_eq!(res.num_orbits, 1);
        assert!(res.generators.len() <= 3);
        for p in &res.generators {
            assert!(g.is_automorphism(p.as_slice()));
        }
    }

    #[test]
    fn c5_has_order_10() {
        let g = dense(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 10.0);
        assert_eq!(res.num_orbits, 1);
        assert!(res.generators.len() >= 2);
    }

    #[test]
    fn p4_has_order_2() {
        let g = dense(4, &[(0, 1), (1, 2), (2, 3)], false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 2.0);
        assert_eq!(res.num_orbits, 2);
        assert_eq!(res.generators.len(), 1);
        assert_eq!(res.generators[0].as_slice(), &[3, 2, 1, 0]);
        assert_eq!(res.orbits, vec![0, 1, 1, 0]);
    }

    #[test]
    fn empty_and_complete_get_full_symmetric_group() {
        for n in [2usize, 3, 4, 5, 6] {
            let fact: f64 = (1..=n).product::<usize>() as f64;
            let empty = DenseGraph::empty(n, false).unwrap();
            let res =
                run_dense(&empty, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
            assert_eq!(order_of(&res), fact, "empty graph on {n}");
            assert_eq!(res.num_orbits, 1);

            let mut edges = Vec::new();
            for i in 0..n {
                for j in i + 1..n {
                    edges.push((i, j));
                }
            }
            let kn = dense(n, &edges, false);
            let res =
                run_dense(&kn, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
            assert_eq!(order_of(&res), fact, "K{n}");
        }
    }

    #[test]
    fn singleton_and_empty_graphs() {
        let g = DenseGraph::empty(1, false).unwrap();
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 1.0);
        assert!(res.generators.is_empty());
        assert_eq!(res.num_orbits, 1);

        let g = DenseGraph::empty(0, false).unwrap();
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 1.0);
        assert!(res.generators.is_empty());
        assert_eq!(res.num_orbits, 0);
        assert!(res.canonical.is_some());
    }

    #[test]
    fn petersen_has_order_120() {
        // outer pentagon 0-4, inner pentagram 5-9, five spokes
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((5 + i, 5 + (i + 2) % 5));
            edges.push((i, 5 + i));
        }
        let g = dense(10, &edges, false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 120.0);
        assert_eq!(res.num_orbits, 1);
    }

    #[test]
    fn k33_has_order_72() {
        let mut edges = Vec::new();
        for i in 0..3 {
            for j in 3..6 {
                edges.push((i, j));
            }
        }
        let g = dense(6, &edges, false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 72.0);
        // the two parts merge into one orbit only via the part swap,
        // which is an automorphism of K33
        assert_eq!(res.num_orbits, 1);
    }

    #[test]
    fn directed_cycle_has_only_rotations() {
        let g = dense(4, &[(0, 1), (1, 2), (2, 3), (3, 0)], true);
        let opts = EngineOptions {
            digraph: true,
            ..Default::default()
        };
        let res = run_dense(&g, &opts, None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 4.0);
        assert_eq!(res.num_orbits, 1);
        for p in &res.generators {
            assert!(g.is_automorphism(p.as_slice()));
        }
    }

    #[test]
    fn star_leaves_permute_freely() {
        for k in [3usize, 4, 5, 6] {
            let edges: Vec<_> = (1..=k).map(|i| (0, i)).collect();
            let g = DenseGraph::from_edges(k + 1, edges.iter().copied(), false).unwrap();
            let res =
                run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
            let fact: f64 = (1..=k).product::<usize>() as f64;
            assert_eq!(order_of(&res), fact, "star with {k} leaves");
            assert_eq!(res.num_orbits, 2);
            // the center is fixed by every generator
            for p in &res.generators {
                assert_eq!(p.image(0), 0);
            }
        }
    }

    #[test]
    fn coloring_restricts_the_group() {
        // P3: 0-1-2; forcing the ends into distinct classes kills the flip
        let g = dense(3, &[(0, 1), (1, 2)], false);
        let res = run_dense(
            &g,
            &EngineOptions::default(),
            Some(&[vec![0], vec![2], vec![1]]),
            &mut Hooks::none(),
        )
        .unwrap();
        assert_eq!(order_of(&res), 1.0);
        assert!(res.generators.is_empty());

        // same coloring class for both ends keeps it
        let res = run_dense(
            &g,
            &EngineOptions::default(),
            Some(&[vec![0, 2], vec![1]]),
            &mut Hooks::none(),
        )
        .unwrap();
        assert_eq!(order_of(&res), 2.0);
    }

    #[test]
    fn canonical_form_is_label_invariant() {
        let g1 = dense(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], false);
        // same C5 under a scrambled labeling
        let g2 = dense(5, &[(2, 4), (4, 1), (1, 3), (3, 0), (0, 2)], false);
        let r1 = run_dense(&g1, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        let r2 = run_dense(&g2, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(
            r1.canonical.unwrap().graph,
            r2.canonical.unwrap().graph
        );
    }

    #[test]
    fn canonical_labeling_reproduces_canonical_graph() {
        let g = dense(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5)], false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        let canon = res.canonical.unwrap();
        assert_eq!(g.permute(canon.labeling.as_slice()), canon.graph);
    }

    #[test]
    fn sparse_matches_dense_group_order() {
        let edges = [(0usize, 1usize), (1, 2), (2, 3), (3, 4), (4, 0)];
        let dg = DenseGraph::from_edges(5, edges, false).unwrap();
        let sg = SparseGraph::from_edges(5, edges, false).unwrap();
        let dr = run_dense(&dg, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        let sr = run_sparse(&sg, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(dr.group_size.approx(), sr.group_size.approx());
        assert_eq!(dr.num_orbits, sr.num_orbits);
    }

    #[test]
    fn orbits_are_closed_under_generators() {
        let g = dense(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)], false);
        let res = run_dense(&g, &EngineOptions::default(), None, &mut Hooks::none()).unwrap();
        assert_eq!(order_of(&res), 12.0);
        for p in &res.generators {
            for v in 0..6 {
                assert_eq!(res.orbits[v], res.orbits[p.image(v)]);
            }
        }
    }

    #[test]
    fn abort_from_hook_yields_partial_result() {
        let mut edges = Vec::new();
        for i in 0..8 {
            for j in i + 1..8 {
                edges.push((i, j));
            }
        }
        let g = dense(8, &edges, false);
        let mut hooks = Hooks::none();
        let abort = hooks.abort.clone();
        let mut seen = 0u32;
        hooks.on_node = Some(Box::new(move |_| {
            seen += 1;
            if seen >= 3 {
                abort.set();
            }
        }));
        let res = run_dense(&g, &EngineOptions::default(), None, &mut hooks).unwrap();
        assert_eq!(res.status, SearchStatus::Aborted);
        assert!(!res.is_complete());
        for p in &res.generators {
            assert!(g.is_automorphism(p.as_slice()));
        }
    }

    #[test]
    fn hooks_observe_the_search() {
        use std::cell::Cell;

        let g = dense(4, &[(0, 1), (1, 2), (2, 3)], false);
        let nodes = Cell::new(0u32);
        let autos = Cell::new(0u32);
        let canon = Cell::new(0u32);
        let levels = Cell::new(0u32);
        let mut hooks = Hooks::none();
        hooks.on_node = Some(Box::new(|_| nodes.set(nodes.get() + 1)));
        hooks.on_automorphism = Some(Box::new(|ev| {
            autos.set(autos.get() + 1);
            assert!(ev.fixed_count < 4);
        }));
        hooks.on_canonical = Some(Box::new(|_| canon.set(canon.get() + 1)));
        hooks.on_level = Some(Box::new(|_| levels.set(levels.get() + 1)));
        let res = run_dense(&g, &EngineOptions::default(), None, &mut hooks).unwrap();
        assert_eq!(res.stats.nodes as u32, nodes.get());
        assert!(nodes.get() >= 3);
        assert_eq!(autos.get(), 1);
        assert!(canon.get() >= 1);
        assert!(levels.get() >= 1);
    }
}
