//! The strategy controller: decides which tier solves an instance and assigns the final status.
//!
//! The decision is sequential. Feasibility is checked first and is authoritative: if `t` cannot
//! be reached from `s`, every configuration reports [`Status::NoPath`]. Trees and DAGs are solved
//! exactly in linear time. All other graphs go to branch and bound, the heuristics, or the
//! heuristics followed by a seeded branch and bound (improvement pass), depending on
//! [`SolverConfig::resolve_strategy`].

mod config;

pub use config::*;

use crate::algorithm::{Deadline, IterativeAlgorithm};
use crate::classify::{classify, is_feasible, GraphClass};
use crate::exact::{solve_dag, solve_tree, BranchAndBound};
use crate::graph::*;
use crate::heuristics::HeuristicPortfolio;
use crate::incumbent::{Incumbent, RedPath};
use crate::result::{SolveResult, SolveStats, Status, Tier};
use log::{debug, info};

/// Solves an instance; see [`solve_with_stats`]
pub fn solve(graph: &RedGraph, config: &SolverConfig) -> SolveResult {
    solve_with_stats(graph, config).0
}

/// Solves an instance and reports which tier determined the answer.
///
/// # Example
/// ```
/// use redpath::graph::*;
/// use redpath::result::Status;
/// use redpath::solver::*;
///
/// // 0 -- 1* -- 2 -- 3* -- 4
/// let edges: Vec<_> = (0..4).map(|u| EdgeDecl::undirected(u, u + 1)).collect();
/// let graph = RedGraph::from_parts(5, 0, 4, &[1, 3], &edges).unwrap();
///
/// let (result, stats) = solve_with_stats(&graph, &SolverConfig::default());
/// assert_eq!(result.status(), Status::Optimal);
/// assert_eq!(result.to_string(), "2");
/// assert_eq!(stats.tier.to_string(), "tree");
/// ```
///
/// # Panics
/// If a produced witness is not a simple s-t path attaining the reported value. This indicates
/// a bug and is never returned as an answer.
pub fn solve_with_stats(graph: &RedGraph, config: &SolverConfig) -> (SolveResult, SolveStats) {
    let deadline = Deadline::after(config.effective_deadline());

    let forced;
    let graph = if config.force_directed && graph.has_undirected_edges() {
        forced = graph.forced_orientation();
        &forced
    } else {
        graph
    };

    let controller = Controller {
        graph,
        config,
        deadline,
    };
    let (result, mut stats) = controller.run();
    stats.elapsed = deadline.elapsed();

    assert_consistent(graph, &result);

    info!(
        "Solved n={} m={} reds={} with {} tier in {}ms: {:?} {}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        graph.number_of_reds(),
        stats.tier,
        stats.elapsed.as_millis(),
        result.status(),
        result
    );

    (result, stats)
}

struct Controller<'a> {
    graph: &'a RedGraph,
    config: &'a SolverConfig,
    deadline: Deadline,
}

impl<'a> Controller<'a> {
    fn run(&self) -> (SolveResult, SolveStats) {
        let graph = self.graph;

        if !is_feasible(graph) {
            info!("t is not reachable from s");
            return (SolveResult::no_path(), SolveStats::new(Tier::Feasibility));
        }

        let seed = match classify(graph) {
            GraphClass::Tree => return exact_result(solve_tree(graph), Tier::Tree),
            GraphClass::Dag => return exact_result(solve_dag(graph), Tier::Dag),
            GraphClass::ForcedDag => {
                // every path of the forced graph is a path of the graph itself
                let seed = solve_dag(&graph.forced_orientation());
                debug!(
                    "Forced orientation yields lower bound {:?}",
                    seed.as_ref().map(RedPath::reds)
                );
                seed
            }
            GraphClass::General => None,
        };

        let strategy = self.config.resolve_strategy(graph.len());
        info!("General graph with n={}; use strategy {:?}", graph.len(), strategy);

        match strategy {
            Strategy::ExactOnly | Strategy::Auto => self.exact(seed),
            Strategy::HeuristicOnly => self.heuristic(seed),
            Strategy::HeuristicThenImprovement => self.heuristic_then_improvement(seed),
        }
    }

    fn exact(&self, seed: Option<RedPath>) -> (SolveResult, SolveStats) {
        let (incumbent, completed, iterations) =
            self.branch_and_bound(Incumbent::seeded(seed), &self.deadline);

        let mut stats = SolveStats::new(Tier::BranchAndBound);
        stats.bnb_iterations = iterations;
        (tag(incumbent.into_best(), completed), stats)
    }

    fn heuristic(&self, seed: Option<RedPath>) -> (SolveResult, SolveStats) {
        let (lower_bound, mut stats) = self.run_heuristics(seed, &self.deadline);

        stats.tier = Tier::Heuristic;
        (tag(lower_bound, false), stats)
    }

    fn heuristic_then_improvement(&self, seed: Option<RedPath>) -> (SolveResult, SolveStats) {
        if self.graph.len() > self.config.improvement_size_threshold {
            info!(
                "n={} exceeds improvement threshold {}; heuristics only",
                self.graph.len(),
                self.config.improvement_size_threshold
            );
            return self.heuristic(seed);
        }

        let improvement_budget = self.config.effective_improvement_deadline();
        let (lower_bound, mut stats) =
            self.run_heuristics(seed, &self.deadline.reserving(improvement_budget));

        let lower_bound = match lower_bound {
            Some(x) => x,
            None => {
                info!("Heuristics found no path; skip improvement");
                stats.tier = Tier::Heuristic;
                return (SolveResult::unsolved(), stats);
            }
        };

        let before = lower_bound.reds();
        let (incumbent, completed, iterations) = self.branch_and_bound(
            Incumbent::seeded(Some(lower_bound)),
            &self.deadline.limited_to(improvement_budget),
        );
        stats.bnb_iterations = iterations;

        let best = incumbent.into_best();
        let improved = best.as_ref().map_or(false, |b| b.reds() > before);
        stats.tier = if completed || improved {
            Tier::Improvement
        } else {
            Tier::Heuristic
        };

        info!(
            "Improvement pass {} with value {:?} (heuristic value {})",
            if completed { "completed" } else { "timed out" },
            best.as_ref().map(RedPath::reds),
            before
        );

        (tag(best, completed), stats)
    }

    /// Runs both heuristics and merges their result with `seed`; the seed is kept on ties
    fn run_heuristics(
        &self,
        seed: Option<RedPath>,
        deadline: &Deadline,
    ) -> (Option<RedPath>, SolveStats) {
        let portfolio = HeuristicPortfolio::new(self.config.heuristic_params());
        let found = portfolio.run(self.graph, deadline);

        let mut stats = SolveStats::new(Tier::Heuristic);
        stats.heuristic_value = found.as_ref().map(RedPath::reds);

        let best = match (seed, found) {
            (Some(seed), Some(found)) => Some(seed.max(found)),
            (seed, found) => seed.or(found),
        };
        (best, stats)
    }

    fn branch_and_bound(&self, incumbent: Incumbent, deadline: &Deadline) -> (Incumbent, bool, usize) {
        let mut algo = BranchAndBound::new(self.graph, incumbent);
        let completed = algo.run_until_deadline(deadline);
        debug!(
            "Branch and bound {} after {} iterations ({} expansions, {} prunes)",
            if completed { "completed" } else { "interrupted" },
            algo.number_of_iterations(),
            algo.number_of_expansions(),
            algo.number_of_prunes()
        );
        let iterations = algo.number_of_iterations();
        (algo.into_incumbent(), completed, iterations)
    }
}

/// Result of a polynomial tier; the instance is known to be feasible
fn exact_result(solution: Option<RedPath>, tier: Tier) -> (SolveResult, SolveStats) {
    let result = match solution {
        Some(solution) => SolveResult::optimal(solution),
        None => SolveResult::no_path(),
    };
    (result, SolveStats::new(tier))
}

/// Assigns the status to the best path found by a search that is optimal iff `completed`
fn tag(best: Option<RedPath>, completed: bool) -> SolveResult {
    match best {
        Some(best) if completed => SolveResult::optimal(best),
        Some(best) => SolveResult::best_effort(best),
        None => {
            // a completed search on a feasible instance always finds a path
            assert!(!completed, "completed search without solution");
            SolveResult::unsolved()
        }
    }
}

fn assert_consistent(graph: &RedGraph, result: &SolveResult) {
    match result.status() {
        Status::Optimal | Status::BestEffort => {
            let path = result.path().expect("solved result carries a witness");
            let reds = graph
                .check_witness(path)
                .unwrap_or_else(|e| panic!("invalid witness: {}", e));
            assert_eq!(Some(reds), result.reds(), "witness does not attain value");
        }
        Status::NoPath => assert!(!is_feasible(graph), "reported no path for feasible instance"),
        Status::Unsolved => assert!(result.path().is_none()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::exhaustive_search::exhaustive_search;
    use crate::random_models::gnp::generate_red_gnp;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use std::time::Duration;

    fn config() -> SolverConfig {
        SolverConfig::default().with_deadline(Duration::from_secs(60))
    }

    #[test]
    fn forced_orientation_seeds_general_tier() {
        // triangle 0, 1*, 2 plus the pendant 3; forced to 0 -> 1 -> 2 -> 3 and 0 -> 2
        let edges = [
            EdgeDecl::undirected(0, 1),
            EdgeDecl::undirected(1, 2),
            EdgeDecl::undirected(0, 2),
            EdgeDecl::undirected(2, 3),
        ];
        let graph = RedGraph::from_parts(4, 0, 3, &[1], &edges).unwrap();
        assert_eq!(classify(&graph), GraphClass::ForcedDag);

        let (result, stats) = solve_with_stats(&graph, &config());
        assert_eq!(result.status(), Status::Optimal);
        assert_eq!(result.value(), Some(1));
        assert_eq!(stats.tier, Tier::BranchAndBound);

        let (result, stats) = solve_with_stats(&graph, &config().with_force_directed(true));
        assert_eq!(result.status(), Status::Optimal);
        assert_eq!(result.path(), Some(&[0, 1, 2, 3][..]));
        assert_eq!(stats.tier, Tier::Dag);
    }

    #[test]
    fn force_directed_changes_reachability() {
        let graph = RedGraph::from_parts(2, 1, 0, &[], &[EdgeDecl::undirected(0, 1)]).unwrap();
        assert_eq!(solve(&graph, &config()).value(), Some(0));
        assert_eq!(
            solve(&graph, &config().with_force_directed(true)).status(),
            Status::NoPath
        );
    }

    #[test]
    fn expired_deadline_is_unsolved() {
        // directed 4-cycle with a chord: neither tree nor DAG
        let edges: Vec<_> = [(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]
            .iter()
            .map(|&(u, v)| EdgeDecl::directed(u, v))
            .collect();
        let graph = RedGraph::from_parts(4, 0, 3, &[2], &edges).unwrap();

        for strategy in [
            Strategy::ExactOnly,
            Strategy::HeuristicOnly,
            Strategy::HeuristicThenImprovement,
        ] {
            let config = config()
                .with_deadline(Duration::ZERO)
                .with_strategy(strategy);
            let result = solve(&graph, &config);
            assert_eq!(result.status(), Status::Unsolved);
            assert_eq!(result.to_string(), "!?");
        }

        let result = solve(&graph, &config());
        assert_eq!(result.status(), Status::Optimal);
        assert_eq!(result.path(), Some(&[0, 1, 2, 3][..]));
    }

    #[test]
    fn heuristic_only_is_best_effort() {
        let mut gen = Pcg64Mcg::seed_from_u64(77);
        let graph = generate_red_gnp(&mut gen, 12, 0.3, 0.4, 0.5);
        let optimum = exhaustive_search(&graph).map(|s| s.reds() as i64);

        let result = solve(&graph, &config().with_strategy(Strategy::HeuristicOnly));
        match result.status() {
            Status::BestEffort => assert!(result.value() <= optimum),
            Status::Optimal => assert_eq!(result.value(), optimum),
            Status::NoPath => assert!(optimum.is_none()),
            status => panic!("unexpected status {:?}", status),
        }
    }

    #[test]
    fn improvement_pass_proves_optimality() {
        let mut gen = Pcg64Mcg::seed_from_u64(78);

        for _ in 0..10 {
            let graph = generate_red_gnp(&mut gen, 12, 0.25, 0.4, 0.3);
            let optimum = exhaustive_search(&graph).map(|s| s.reds() as i64);
            let config = config().with_strategy(Strategy::HeuristicThenImprovement);
            let (result, stats) = solve_with_stats(&graph, &config);

            if optimum.is_none() {
                assert_eq!(result.status(), Status::NoPath);
                continue;
            }

            assert_eq!(result.value(), optimum);
            match stats.tier {
                Tier::Improvement => assert_eq!(result.status(), Status::Optimal),
                Tier::Tree | Tier::Dag => assert_eq!(result.status(), Status::Optimal),
                tier => panic!("unexpected tier {}", tier),
            }
        }
    }

    #[test]
    fn improvement_pass_respects_size_threshold() {
        let edges: Vec<_> = (0..8).map(|u| EdgeDecl::undirected(u, (u + 1) % 8)).collect();
        let graph = RedGraph::from_parts(8, 0, 5, &[2, 6], &edges).unwrap();
        assert_eq!(classify(&graph), GraphClass::General);

        let config = config().with_strategy(Strategy::HeuristicThenImprovement);
        let (_, stats) = solve_with_stats(&graph, &config.clone().with_size_thresholds(4, 7));
        assert_eq!(stats.tier, Tier::Heuristic);
        assert_eq!(stats.bnb_iterations, 0);

        let (result, stats) = solve_with_stats(&graph, &config.with_size_thresholds(4, 8));
        assert_eq!(stats.tier, Tier::Improvement);
        assert_eq!(result.status(), Status::Optimal);
    }
}
