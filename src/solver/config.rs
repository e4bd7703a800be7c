use crate::heuristics::HeuristicParams;
use std::convert::TryFrom;
use std::time::Duration;

/// No solve call may take longer than this, regardless of the configured deadline
pub const MAX_DEADLINE: Duration = Duration::from_secs(120);

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);
pub const DEFAULT_IMPROVEMENT_DEADLINE: Duration = Duration::from_secs(2);
pub const DEFAULT_EXACT_SIZE_THRESHOLD: usize = 64;
pub const DEFAULT_IMPROVEMENT_SIZE_THRESHOLD: usize = 512;
pub const DEFAULT_GREEDY_RESTARTS: usize = 256;

/// How general graphs (neither tree nor DAG) are attacked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Decide by graph order, see [`SolverConfig::resolve_strategy`]
    Auto,
    /// Branch and bound until completion or deadline
    ExactOnly,
    /// Beam search and greedy walks only; never optimal
    HeuristicOnly,
    /// Heuristics, then branch and bound seeded with their result under the improvement deadline
    HeuristicThenImprovement,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Auto
    }
}

impl TryFrom<&str> for Strategy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "exact" => Ok(Strategy::ExactOnly),
            "heuristic" => Ok(Strategy::HeuristicOnly),
            "improve" => Ok(Strategy::HeuristicThenImprovement),
            _ => Err(format!("'{}' is an invalid strategy.", value)),
        }
    }
}

/// Control parameters of a solve call. They never influence the correctness of a result, only
/// how much effort is spent and hence which status can be reached.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Always run branch and bound on general graphs, regardless of their order
    pub force_exact: bool,
    /// Treat every edge as directed in its declared orientation
    pub force_directed: bool,
    pub strategy: Strategy,

    /// Wall-clock budget of the whole call; capped by [`MAX_DEADLINE`]
    pub deadline: Duration,
    /// Budget of the improvement pass; capped by the deadline
    pub improvement_deadline: Duration,

    /// General graphs up to this order are solved by branch and bound only
    pub exact_size_threshold: usize,
    /// General graphs up to this order get an improvement pass after the heuristics, also if
    /// [`Strategy::HeuristicThenImprovement`] is chosen explicitly
    pub improvement_size_threshold: usize,

    pub beam_width: Option<usize>,
    pub greedy_restarts: usize,
    pub seed: u64,
    pub parallel_heuristics: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            force_exact: false,
            force_directed: false,
            strategy: Strategy::Auto,
            deadline: DEFAULT_DEADLINE,
            improvement_deadline: DEFAULT_IMPROVEMENT_DEADLINE,
            exact_size_threshold: DEFAULT_EXACT_SIZE_THRESHOLD,
            improvement_size_threshold: DEFAULT_IMPROVEMENT_SIZE_THRESHOLD,
            beam_width: None,
            greedy_restarts: DEFAULT_GREEDY_RESTARTS,
            seed: 0,
            parallel_heuristics: false,
        }
    }
}

impl SolverConfig {
    pub fn with_force_exact(mut self, force_exact: bool) -> Self {
        self.force_exact = force_exact;
        self
    }

    pub fn with_force_directed(mut self, force_directed: bool) -> Self {
        self.force_directed = force_directed;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_improvement_deadline(mut self, deadline: Duration) -> Self {
        self.improvement_deadline = deadline;
        self
    }

    pub fn with_size_thresholds(mut self, exact: usize, improvement: usize) -> Self {
        self.exact_size_threshold = exact;
        self.improvement_size_threshold = improvement;
        self
    }

    pub fn with_beam_width(mut self, width: Option<usize>) -> Self {
        self.beam_width = width;
        self
    }

    pub fn with_greedy_restarts(mut self, restarts: usize) -> Self {
        self.greedy_restarts = restarts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel_heuristics(mut self, parallel: bool) -> Self {
        self.parallel_heuristics = parallel;
        self
    }

    pub fn effective_deadline(&self) -> Duration {
        self.deadline.min(MAX_DEADLINE)
    }

    pub fn effective_improvement_deadline(&self) -> Duration {
        self.improvement_deadline.min(self.effective_deadline())
    }

    /// Chooses the strategy for a general graph with `n` nodes. An explicit strategy is kept,
    /// although the improvement pass of [`Strategy::HeuristicThenImprovement`] still only runs up
    /// to `improvement_size_threshold`. [`Strategy::Auto`] picks branch and bound if exactness is
    /// forced or the graph is small, an improvement pass for medium graphs and heuristics only
    /// otherwise.
    pub fn resolve_strategy(&self, n: usize) -> Strategy {
        match self.strategy {
            Strategy::Auto if self.force_exact || n <= self.exact_size_threshold => {
                Strategy::ExactOnly
            }
            Strategy::Auto if n <= self.improvement_size_threshold => {
                Strategy::HeuristicThenImprovement
            }
            Strategy::Auto => Strategy::HeuristicOnly,
            explicit => explicit,
        }
    }

    pub fn heuristic_params(&self) -> HeuristicParams {
        HeuristicParams {
            beam_width: self.beam_width,
            greedy_restarts: self.greedy_restarts,
            seed: self.seed,
            parallel: self.parallel_heuristics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Strategy::Auto, false, 10 => Strategy::ExactOnly)]
    #[test_case(Strategy::Auto, false, 64 => Strategy::ExactOnly)]
    #[test_case(Strategy::Auto, false, 65 => Strategy::HeuristicThenImprovement)]
    #[test_case(Strategy::Auto, false, 512 => Strategy::HeuristicThenImprovement)]
    #[test_case(Strategy::Auto, false, 513 => Strategy::HeuristicOnly)]
    #[test_case(Strategy::Auto, true, 100_000 => Strategy::ExactOnly)]
    #[test_case(Strategy::HeuristicOnly, true, 10 => Strategy::HeuristicOnly)]
    fn strategy_resolution(strategy: Strategy, force_exact: bool, n: usize) -> Strategy {
        SolverConfig::default()
            .with_strategy(strategy)
            .with_force_exact(force_exact)
            .resolve_strategy(n)
    }

    #[test]
    fn deadlines_are_capped() {
        let config = SolverConfig::default().with_deadline(Duration::from_secs(1000));
        assert_eq!(config.effective_deadline(), MAX_DEADLINE);

        let config = SolverConfig::default()
            .with_deadline(Duration::from_secs(1))
            .with_improvement_deadline(Duration::from_secs(5));
        assert_eq!(config.effective_deadline(), Duration::from_secs(1));
        assert_eq!(config.effective_improvement_deadline(), Duration::from_secs(1));
    }

    #[test_case("auto" => Ok(Strategy::Auto))]
    #[test_case("Exact" => Ok(Strategy::ExactOnly))]
    #[test_case("heuristic" => Ok(Strategy::HeuristicOnly))]
    #[test_case("improve" => Ok(Strategy::HeuristicThenImprovement))]
    #[test_case("magic" => Err("'magic' is an invalid strategy.".to_string()))]
    fn parse_strategy(name: &str) -> Result<Strategy, String> {
        Strategy::try_from(name)
    }
}
