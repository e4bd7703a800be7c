//! Heuristics produce valid s-t paths, i.e. lower bounds, but never certify optimality.

pub mod beam;
pub mod greedy;

use crate::algorithm::{Deadline, IterativeAlgorithm};
use crate::graph::*;
use crate::incumbent::RedPath;
use beam::{adaptive_beam_width, BeamSearch};
use greedy::RandomizedGreedy;
use log::debug;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

#[derive(Clone, Debug)]
pub struct HeuristicParams {
    /// Width of the beam; adaptive to the graph order if None
    pub beam_width: Option<usize>,
    /// Maximum number of greedy walks
    pub greedy_restarts: usize,
    pub seed: u64,
    /// Run both heuristics concurrently instead of one after another
    pub parallel: bool,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            beam_width: None,
            greedy_restarts: 256,
            seed: 0,
            parallel: false,
        }
    }
}

/// Runs beam search and randomized greedy restarts on the same graph and keeps the better
/// result (beam search wins ties).
///
/// In sequential mode the greedy walks run first, as they find a lower bound within a few linear
/// passes, and may use at most half of the budget; the beam search gets the rest. In parallel mode both run as independent workers until the common
/// deadline; they only share the read-only graph.
pub struct HeuristicPortfolio {
    params: HeuristicParams,
}

impl HeuristicPortfolio {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HeuristicParams {
        &self.params
    }

    pub fn run<G>(&self, graph: &G, deadline: &Deadline) -> Option<RedPath>
    where
        G: AdjacencyListIn + RedMarking + Sync,
    {
        let (beam, greedy) = if self.params.parallel {
            rayon::join(
                || self.run_beam(graph, deadline),
                || self.run_greedy(graph, deadline),
            )
        } else {
            let greedy = self.run_greedy(graph, &deadline.limited_to(deadline.remaining() / 2));
            (self.run_beam(graph, deadline), greedy)
        };

        debug!(
            "Heuristics found beam: {:?}, greedy: {:?}",
            beam.as_ref().map(RedPath::reds),
            greedy.as_ref().map(RedPath::reds)
        );

        match (beam, greedy) {
            (Some(b), Some(g)) => Some(b.max(g)),
            (b, g) => b.or(g),
        }
    }

    fn run_beam<G>(&self, graph: &G, deadline: &Deadline) -> Option<RedPath>
    where
        G: AdjacencyListIn + RedMarking,
    {
        let width = self
            .params
            .beam_width
            .unwrap_or_else(|| adaptive_beam_width(graph.len()))
            .max(1);

        let mut algo = BeamSearch::new(graph, width);
        algo.run_until_deadline(deadline);
        debug!(
            "Beam search of width {} stopped after {} rounds",
            width,
            algo.number_of_rounds()
        );
        algo.best_known_solution().cloned()
    }

    fn run_greedy<G>(&self, graph: &G, deadline: &Deadline) -> Option<RedPath>
    where
        G: AdjacencyListIn + RedMarking,
    {
        let mut rng = Pcg64Mcg::seed_from_u64(self.params.seed);
        let mut algo = RandomizedGreedy::new(graph, &mut rng, self.params.greedy_restarts);
        algo.run_until_deadline(deadline);
        algo.best_known_solution().cloned()
    }
}
