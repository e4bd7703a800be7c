use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::graph::*;
use crate::incumbent::RedPath;
use fixedbitset::FixedBitSet;
use fxhash::FxHashSet;
use log::trace;
use std::cmp::Reverse;

/// The adaptive width is `BEAM_BUDGET / n`, clamped to `[MIN_BEAM_WIDTH, MAX_BEAM_WIDTH]`
const BEAM_BUDGET: usize = 1 << 16;
const MIN_BEAM_WIDTH: usize = 4;
const MAX_BEAM_WIDTH: usize = 256;

/// Beam width used if none is configured: wide for small graphs, narrow for large ones
pub fn adaptive_beam_width(n: usize) -> usize {
    (BEAM_BUDGET / n.max(1)).clamp(MIN_BEAM_WIDTH, MAX_BEAM_WIDTH)
}

#[derive(Clone, Debug)]
struct BeamEntry {
    path: Vec<Node>,
    visited: FixedBitSet,
    reds: u32,
    /// `reds` plus the red nodes still reachable from the end of `path`
    score: u32,
}

/// Every expansion runs a reachability search over the graph, so the number of expansions per
/// step is scaled down to keep a step within roughly this many node and arc visits
const WORK_PER_STEP: usize = 1 << 20;
const MAX_EXPANSIONS_PER_STEP: usize = 256;

/// Breadth-first search that keeps only the `width` most promising path prefixes per round.
/// A prefix is scored by its red nodes plus an optimistic estimate of the red nodes a
/// continuation may still collect. Prefixes that cannot reach the target anymore are dropped.
///
/// A round extends every prefix of the beam by one node. The search completes as soon as a
/// round reaches the target (the best of all prefixes arriving in that round is kept) or the
/// beam runs empty. A round on a large graph is too much work for a single call of
/// [`IterativeAlgorithm::execute_step`], so a step only tries a bounded number of successors
/// and the round resumes where it stopped in the next call.
pub struct BeamSearch<'a, G> {
    graph: &'a G,
    width: usize,
    expansions_per_step: usize,
    beam: Vec<BeamEntry>,
    reach: BlockedReach,
    best: Option<RedPath>,
    rounds: usize,

    round: Round,
}

/// Progress within the current round
#[derive(Default)]
struct Round {
    /// Index into the beam of the prefix being extended
    entry: usize,
    /// Index into the successors of that prefix's last node
    successor: usize,
    next_beam: Vec<BeamEntry>,
    seen: FxHashSet<(Node, FixedBitSet)>,
    arrived: Option<RedPath>,
}

impl<'a, G> BeamSearch<'a, G>
where
    G: AdjacencyListIn + RedMarking,
{
    pub fn new(graph: &'a G, width: usize) -> Self {
        assert!(width > 0);

        let (s, t) = (graph.source(), graph.target());
        let mut reach = BlockedReach::new(graph.len());
        let mut beam = Vec::with_capacity(width);
        let mut best = None;

        if s == t {
            best = Some(RedPath::new(graph.red(s), vec![s]));
        } else {
            let mut visited = FixedBitSet::with_capacity(graph.len());
            visited.insert(s as usize);
            if let Some(ahead) = reach.red_ahead(graph, s, &visited) {
                beam.push(BeamEntry {
                    path: vec![s],
                    visited,
                    reds: graph.red(s),
                    score: graph.red(s) + ahead,
                });
            }
        }

        let work = (graph.len() + 2 * graph.number_of_edges()).max(1);

        Self {
            graph,
            width,
            expansions_per_step: (WORK_PER_STEP / work).clamp(1, MAX_EXPANSIONS_PER_STEP),
            beam,
            reach,
            best,
            rounds: 0,
            round: Round::default(),
        }
    }

    /// Same as [`BeamSearch::new`] with [`adaptive_beam_width`]
    pub fn with_adaptive_width(graph: &'a G) -> Self {
        Self::new(graph, adaptive_beam_width(graph.len()))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of completed rounds
    pub fn number_of_rounds(&self) -> usize {
        self.rounds
    }

    /// Tries the next successor of the current prefix; returns false if the round is exhausted
    fn expand_next(&mut self) -> bool {
        let graph = self.graph;
        let round = &mut self.round;

        let entry = match self.beam.get(round.entry) {
            Some(entry) => entry,
            None => return false,
        };

        let u = entry.path[entry.path.len() - 1];
        let v = match graph.out_neighbors(u).get(round.successor) {
            Some(&v) => v,
            None => {
                round.entry += 1;
                round.successor = 0;
                return true;
            }
        };
        round.successor += 1;

        if entry.visited[v as usize] {
            return true;
        }

        let reds = entry.reds + graph.red(v);

        if v == graph.target() {
            let candidate = RedPath::new(reds, extended(&entry.path, v));
            round.arrived = Some(match round.arrived.take() {
                Some(current) => current.max(candidate),
                None => candidate,
            });
            return true;
        }

        let mut visited = entry.visited.clone();
        visited.insert(v as usize);

        if !round.seen.insert((v, visited.clone())) {
            return true;
        }

        if let Some(ahead) = self.reach.red_ahead(graph, v, &visited) {
            round.next_beam.push(BeamEntry {
                path: extended(&entry.path, v),
                visited,
                reds,
                score: reds + ahead,
            });
        }

        true
    }

    fn finish_round(&mut self) {
        self.rounds += 1;
        let round = std::mem::take(&mut self.round);

        if let Some(solution) = round.arrived {
            trace!(
                "Beam reached target in round {} with {} reds",
                self.rounds,
                solution.reds()
            );
            self.best = Some(solution);
            self.beam.clear();
            return;
        }

        let mut next_beam = round.next_beam;
        next_beam.sort_by_key(|e| (Reverse(e.score), Reverse(e.reds)));
        next_beam.truncate(self.width);
        self.beam = next_beam;
    }
}

impl<'a, G> IterativeAlgorithm for BeamSearch<'a, G>
where
    G: AdjacencyListIn + RedMarking,
{
    fn execute_step(&mut self) {
        for _ in 0..self.expansions_per_step {
            if !self.expand_next() {
                self.finish_round();
                return;
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.best.is_some() || self.beam.is_empty()
    }

    fn best_known_solution(&self) -> Option<&RedPath> {
        self.best.as_ref()
    }
}

impl<'a, G> TerminatingIterativeAlgorithm for BeamSearch<'a, G> where G: AdjacencyListIn + RedMarking {}

fn extended(path: &[Node], v: Node) -> Vec<Node> {
    let mut result = Vec::with_capacity(path.len() + 1);
    result.extend_from_slice(path);
    result.push(v);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::exhaustive_search::exhaustive_search;
    use crate::random_models::gnp::generate_red_gnp;
    use rand::SeedableRng;
    use crate::algorithm::Deadline;
    use rand_pcg::Pcg64Mcg;
    use std::time::{Duration, Instant};
    use test_case::test_case;

    #[test_case(1 => MAX_BEAM_WIDTH)]
    #[test_case(1000 => 65)]
    #[test_case(1_000_000 => MIN_BEAM_WIDTH)]
    fn adaptive_width(n: usize) -> usize {
        adaptive_beam_width(n)
    }

    #[test]
    fn prefers_red_detour() {
        // 0 -> 4 directly, or 0 -> 1* -> 2* -> 3 -> 4
        let edges: Vec<_> = [(0, 4), (0, 1), (1, 2), (2, 3), (3, 4)]
            .iter()
            .map(|&(u, v)| EdgeDecl::directed(u, v))
            .collect();
        let graph = RedGraph::from_parts(5, 0, 4, &[1, 2], &edges).unwrap();

        // the direct edge reaches the target in the first round
        let solution = BeamSearch::new(&graph, 4).run_to_completion().unwrap();
        assert_eq!(solution.path(), &[0, 4]);

        // ... while the red detour is found once the target is two hops away
        let edges: Vec<_> = [(0, 5), (5, 4), (0, 1), (1, 4), (1, 2), (2, 3), (3, 4)]
            .iter()
            .map(|&(u, v)| EdgeDecl::directed(u, v))
            .collect();
        let graph = RedGraph::from_parts(6, 0, 4, &[1, 2], &edges).unwrap();
        let solution = BeamSearch::new(&graph, 4).run_to_completion().unwrap();
        assert_eq!(solution.reds(), 1);
        assert_eq!(solution.path(), &[0, 1, 4]);
    }

    #[test]
    fn unreachable_and_trivial() {
        let graph = RedGraph::from_parts(3, 0, 2, &[], &[EdgeDecl::directed(2, 0)]).unwrap();
        let mut algo = BeamSearch::with_adaptive_width(&graph);
        assert!(algo.is_completed());
        assert!(algo.run_to_completion().is_none());

        let graph = RedGraph::from_parts(3, 1, 1, &[1], &[EdgeDecl::directed(2, 0)]).unwrap();
        let solution = BeamSearch::new(&graph, 1).run_to_completion().unwrap();
        assert_eq!(solution, RedPath::new(1, vec![1]));
    }

    #[test]
    fn rounds_are_split_on_large_graphs() {
        let mut gen = Pcg64Mcg::seed_from_u64(4000);
        let graph = generate_red_gnp(&mut gen, 4000, 10.0 / 4000.0, 0.3, 0.0);

        let mut algo = BeamSearch::new(&graph, 64);
        assert!(algo.expansions_per_step < 64);

        let start = Instant::now();
        algo.run_until_deadline(&Deadline::after(Duration::from_millis(50)));
        assert!(start.elapsed() < Duration::from_secs(1), "{:?}", start.elapsed());
    }

    #[test]
    fn valid_lower_bound() {
        let mut gen = Pcg64Mcg::seed_from_u64(4321);

        for n in 2..=12 {
            for _ in 0..8 {
                let graph = generate_red_gnp(&mut gen, n, 0.25, 0.4, 0.5);
                let optimum = exhaustive_search(&graph).map(|s| s.reds());
                let found = BeamSearch::new(&graph, 3).run_to_completion();

                // the beam never drops every prefix while a path exists
                assert_eq!(found.is_some(), optimum.is_some());

                if let Some(found) = found {
                    assert_eq!(graph.check_witness(found.path()), Ok(found.reds()));
                    assert!(Some(found.reds()) <= optimum);
                }
            }
        }
    }
}
