use crate::graph::Node;
use crate::incumbent::RedPath;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// Printed instead of a value if neither optimality nor a lower bound could be established
pub const UNSOLVED_MARKER: &str = "!?";

/// Reported value if no s-t path exists at all
pub const NO_PATH_VALUE: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// The value is the proven maximum
    Optimal,
    /// The value is attained by the witness, but may not be the maximum
    BestEffort,
    /// There is no path from s to t
    NoPath,
    /// Nothing could be certified within the budget
    Unsolved,
}

/// The component that determined the final answer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Feasibility,
    Tree,
    Dag,
    BranchAndBound,
    Heuristic,
    Improvement,
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Feasibility => "feasibility",
            Tier::Tree => "tree",
            Tier::Dag => "dag",
            Tier::BranchAndBound => "branch-and-bound",
            Tier::Heuristic => "heuristic",
            Tier::Improvement => "improvement",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one solve call. Once returned it is never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveResult {
    status: Status,
    value: Option<i64>,
    path: Option<Vec<Node>>,
}

impl SolveResult {
    pub fn optimal(solution: RedPath) -> Self {
        Self::with_solution(Status::Optimal, solution)
    }

    pub fn best_effort(solution: RedPath) -> Self {
        Self::with_solution(Status::BestEffort, solution)
    }

    pub fn no_path() -> Self {
        Self {
            status: Status::NoPath,
            value: Some(NO_PATH_VALUE),
            path: None,
        }
    }

    pub fn unsolved() -> Self {
        Self {
            status: Status::Unsolved,
            value: None,
            path: None,
        }
    }

    fn with_solution(status: Status, solution: RedPath) -> Self {
        Self {
            status,
            value: Some(solution.reds() as i64),
            path: Some(solution.into_path()),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The reported value; `-1` for [`Status::NoPath`] and None for [`Status::Unsolved`]
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// The witness path, if the result carries one
    pub fn path(&self) -> Option<&[Node]> {
        self.path.as_deref()
    }

    /// Number of red vertices on the witness
    pub fn reds(&self) -> Option<u32> {
        match self.status {
            Status::Optimal | Status::BestEffort => self.value.map(|v| v as u32),
            Status::NoPath | Status::Unsolved => None,
        }
    }

    /// The witness as space separated vertex ids
    pub fn witness_line(&self) -> Option<String> {
        Some(self.path.as_ref()?.iter().join(" "))
    }
}

/// Renders the first output line: the value, `-1` or the unsolved marker.
impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.status, self.value) {
            (Status::Unsolved, _) | (_, None) => write!(f, "{}", UNSOLVED_MARKER),
            (_, Some(value)) => write!(f, "{}", value),
        }
    }
}

/// Bookkeeping of a solve call; not part of the answer
#[derive(Clone, Debug)]
pub struct SolveStats {
    pub tier: Tier,
    pub heuristic_value: Option<u32>,
    pub bnb_iterations: usize,
    pub elapsed: Duration,
}

impl SolveStats {
    pub(crate) fn new(tier: Tier) -> Self {
        Self {
            tier,
            heuristic_value: None,
            bnb_iterations: 0,
            elapsed: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering() {
        let optimal = SolveResult::optimal(RedPath::new(2, vec![0, 1, 2, 3, 4]));
        assert_eq!(optimal.to_string(), "2");
        assert_eq!(optimal.witness_line().unwrap(), "0 1 2 3 4");
        assert_eq!(optimal.reds(), Some(2));

        let no_path = SolveResult::no_path();
        assert_eq!(no_path.to_string(), "-1");
        assert_eq!(no_path.value(), Some(-1));
        assert_eq!(no_path.reds(), None);
        assert!(no_path.witness_line().is_none());

        let unsolved = SolveResult::unsolved();
        assert_eq!(unsolved.to_string(), "!?");
        assert_eq!(unsolved.value(), None);

        let best_effort = SolveResult::best_effort(RedPath::new(0, vec![3]));
        assert_eq!(best_effort.status(), Status::BestEffort);
        assert_eq!(best_effort.to_string(), "0");
    }
}
