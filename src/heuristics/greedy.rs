use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::graph::*;
use crate::incumbent::RedPath;
use fixedbitset::FixedBitSet;
use log::trace;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Randomized greedy walks from the source with restarts. In each step a walk moves to an
/// unvisited successor that can still reach the target, preferring red successors if there are
/// any. Among the preferred successors, one is sampled with probability inversely proportional
/// to its distance to the target.
///
/// The walk never enters the target itself: whenever the target is a successor of the current
/// node, the path via this edge is offered as a solution and the walk continues until it gets
/// stuck. The next call then starts a fresh walk.
///
/// Each call of [`IterativeAlgorithm::execute_step`] carries out one walk. The algorithm
/// completes after `restarts` walks.
pub struct RandomizedGreedy<'a, G, R> {
    graph: &'a G,
    rng: &'a mut R,
    dist_to_target: Vec<Option<Node>>,

    restarts_left: usize,
    best: Option<RedPath>,

    walk: Vec<Node>,
    visited: FixedBitSet,
    candidates: Vec<Node>,
    weights: Vec<f64>,
}

impl<'a, G, R> RandomizedGreedy<'a, G, R>
where
    G: AdjacencyListIn + RedMarking,
    R: Rng,
{
    pub fn new(graph: &'a G, rng: &'a mut R, restarts: usize) -> Self {
        let dist_to_target = graph.distances_to(graph.target());
        let (s, t) = (graph.source(), graph.target());

        let mut restarts_left = restarts;
        let mut best = None;
        if s == t {
            best = Some(RedPath::new(graph.red(s), vec![s]));
            restarts_left = 0;
        } else if dist_to_target[s as usize].is_none() {
            restarts_left = 0;
        }

        Self {
            graph,
            rng,
            dist_to_target,
            restarts_left,
            best,
            walk: Vec::with_capacity(graph.len()),
            visited: FixedBitSet::with_capacity(graph.len()),
            candidates: Vec::new(),
            weights: Vec::new(),
        }
    }

    fn offer(&mut self, reds: u32, last: Node) {
        if self.best.as_ref().map_or(false, |b| reds <= b.reds()) {
            return;
        }

        let mut path = self.walk.clone();
        path.push(last);
        trace!("Greedy walk found a path with {} reds", reds);
        self.best = Some(RedPath::new(reds, path));
    }

    /// Samples the next node of the walk among the unvisited successors of `u`; None if stuck
    fn choose_successor(&mut self, u: Node) -> Option<Node> {
        let graph = self.graph;
        let target = graph.target();

        self.candidates.clear();
        self.candidates.extend(graph.out_neighbors(u).iter().copied().filter(|&v| {
            v != target && !self.visited[v as usize] && self.dist_to_target[v as usize].is_some()
        }));

        if self.candidates.iter().any(|&v| graph.is_red(v)) {
            self.candidates.retain(|&v| graph.is_red(v));
        }

        match self.candidates.len() {
            0 => return None,
            1 => return Some(self.candidates[0]),
            _ => {}
        }

        let dist = &self.dist_to_target;
        self.weights.clear();
        self.weights.extend(
            self.candidates
                .iter()
                .map(|&v| 1.0 / (1.0 + dist[v as usize].unwrap_or(0) as f64)),
        );

        let index = WeightedIndex::new(&self.weights).ok()?;
        Some(self.candidates[index.sample(&mut *self.rng)])
    }
}

impl<'a, G, R> IterativeAlgorithm for RandomizedGreedy<'a, G, R>
where
    G: AdjacencyListIn + RedMarking,
    R: Rng,
{
    fn execute_step(&mut self) {
        assert!(self.restarts_left > 0);
        self.restarts_left -= 1;

        let graph = self.graph;
        let (s, t) = (graph.source(), graph.target());

        self.walk.clear();
        self.visited.clear();
        self.walk.push(s);
        self.visited.insert(s as usize);
        let mut reds = graph.red(s);
        let mut u = s;

        loop {
            if graph.out_neighbors(u).contains(&t) {
                self.offer(reds + graph.red(t), t);
            }

            match self.choose_successor(u) {
                Some(v) => {
                    self.walk.push(v);
                    self.visited.insert(v as usize);
                    reds += graph.red(v);
                    u = v;
                }
                None => break,
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.restarts_left == 0
    }

    fn best_known_solution(&self) -> Option<&RedPath> {
        self.best.as_ref()
    }
}

impl<'a, G, R> TerminatingIterativeAlgorithm for RandomizedGreedy<'a, G, R>
where
    G: AdjacencyListIn + RedMarking,
    R: Rng,
{
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::exact::exhaustive_search::exhaustive_search;
    use crate::random_models::gnp::generate_red_gnp;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn follows_red_nodes() {
        // 0 -> 1* -> 2* -> 3 and the shortcut 0 -> 3
        let edges: Vec<_> = [(0, 1), (1, 2), (2, 3), (0, 3)]
            .iter()
            .map(|&(u, v)| EdgeDecl::directed(u, v))
            .collect();
        let graph = RedGraph::from_parts(4, 0, 3, &[1, 2], &edges).unwrap();

        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let solution = RandomizedGreedy::new(&graph, &mut rng, 1)
            .run_to_completion()
            .unwrap();
        assert_eq!(solution, RedPath::new(2, vec![0, 1, 2, 3]));
    }

    #[test]
    fn unreachable_and_trivial() {
        let graph = RedGraph::from_parts(3, 0, 2, &[], &[EdgeDecl::directed(2, 0)]).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let mut algo = RandomizedGreedy::new(&graph, &mut rng, 10);
        assert!(algo.is_completed());
        assert!(algo.best_known_solution().is_none());

        let graph = RedGraph::from_parts(2, 1, 1, &[], &[EdgeDecl::directed(0, 1)]).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let solution = RandomizedGreedy::new(&graph, &mut rng, 10).run_to_completion();
        assert_eq!(solution, Some(RedPath::new(0, vec![1])));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut gen = Pcg64Mcg::seed_from_u64(99);
        let graph = generate_red_gnp(&mut gen, 60, 0.08, 0.3, 0.5);

        let run = |seed| {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            RandomizedGreedy::new(&graph, &mut rng, 32).run_to_completion()
        };

        assert_eq!(run(5), run(5));
    }

    #[test]
    fn valid_lower_bound() {
        let mut gen = Pcg64Mcg::seed_from_u64(8765);

        for n in 2..=12 {
            for _ in 0..8 {
                let graph = generate_red_gnp(&mut gen, n, 0.25, 0.4, 0.5);
                let optimum = exhaustive_search(&graph).map(|s| s.reds());
                let found = RandomizedGreedy::new(&graph, &mut gen, 16).run_to_completion();

                if optimum.is_none() {
                    assert!(found.is_none());
                }

                if let Some(found) = found {
                    assert_eq!(graph.check_witness(found.path()), Ok(found.reds()));
                    assert!(Some(found.reds()) <= optimum);
                }
            }
        }
    }
}
