//! All our search algorithms for the general tier are implemented using the
//! [`IterativeAlgorithm`] trait.
//!
//! The idea is to allow co-operative time management, i.e. an algorithm does a bounded amount
//! of work and then returns to the caller, who checks the [`Deadline`] and decides whether to
//! continue. There is no preemption: a step always runs to its end, and the best solution found
//! so far is never lost when the caller stops.

use crate::incumbent::RedPath;
use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute all our algorithms. Observe
/// that it does not prescribe any constructor which is left to the algorithm designer as each
/// algorithm has specific parameters et cetera.
///
/// # Example
/// ```
/// use redpath::algorithm::{Deadline, IterativeAlgorithm};
/// use redpath::incumbent::RedPath;
///
/// struct Countdown {
///     steps: usize,
///     solution: Option<RedPath>,
/// }
///
/// impl IterativeAlgorithm for Countdown {
///     fn execute_step(&mut self) {
///         self.steps -= 1;
///         if self.steps == 0 {
///             self.solution = Some(RedPath::new(0, vec![0]));
///         }
///     }
///
///     fn is_completed(&self) -> bool {
///         self.steps == 0
///     }
///
///     fn best_known_solution(&self) -> Option<&RedPath> {
///         self.solution.as_ref()
///     }
/// }
///
/// let mut algo = Countdown { steps: 3, solution: None };
/// assert!(algo.run_until_deadline(&Deadline::unbounded()));
/// assert_eq!(algo.best_known_value(), Some(0));
/// ```
pub trait IterativeAlgorithm {
    /// Advances the computation of this algorithm by a bounded amount of work.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] may not
    /// be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&self) -> Option<&RedPath>;

    /// Returns the number of red vertices of the currently best known solution.
    fn best_known_value(&self) -> Option<u32> {
        Some(self.best_known_solution()?.reds())
    }

    /// Keeps calling [`IterativeAlgorithm::execute_step`] as long as `predicate` holds and the
    /// algorithm is not completed. The predicate is evaluated before each step.
    fn run_while<F: FnMut(&Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() && predicate(&*self) {
            self.execute_step();
        }
    }

    /// Executes the algorithm until it completes or the deadline expires. Observe that the
    /// deadline is only checked between steps. Returns true iff the algorithm completed.
    fn run_until_deadline(&mut self, deadline: &Deadline) -> bool {
        self.run_while(|_| !deadline.expired());
        self.is_completed()
    }
}

/// [`TerminatingIterativeAlgorithm`] is a marker trait for algorithms that eventually complete
/// on their own.
pub trait TerminatingIterativeAlgorithm: IterativeAlgorithm {
    /// Execute the algorithm until it completed and return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<RedPath> {
        while !self.is_completed() {
            self.execute_step();
        }
        self.best_known_solution().cloned()
    }
}

/// A wall-clock budget that starts running at construction.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// A deadline that never expires
    pub fn unbounded() -> Self {
        Self::after(Duration::MAX)
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.start.elapsed())
    }

    /// A new deadline that expires after `budget` or together with `self`, whichever comes first
    pub fn limited_to(&self, budget: Duration) -> Self {
        Self::after(budget.min(self.remaining()))
    }

    /// A new deadline that expires `reserve` before `self`
    pub fn reserving(&self, reserve: Duration) -> Self {
        Self::after(self.remaining().saturating_sub(reserve))
    }
}
