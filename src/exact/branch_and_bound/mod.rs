#![allow(rustdoc::private_intra_doc_links)]

use crate::algorithm::*;
use crate::graph::*;
use crate::incumbent::{Incumbent, RedPath};
use log::debug;

mod frame;

use frame::*;

/// Upper limit on the number of frame operations carried out by one call of
/// [`IterativeAlgorithm::execute_step`]; the caller checks the deadline in between.
const EXPANSIONS_PER_STEP: usize = 256;

/// Every frame operation runs a reachability search over the graph, so the number of
/// operations per step is scaled down to keep a step within roughly this many node and arc
/// visits.
const WORK_PER_STEP: usize = 1 << 20;

/// Number of frame operations per step for a graph with `n` nodes and `m` declared edges
fn operations_per_step(n: usize, m: usize) -> usize {
    // an undirected edge is an arc in both directions
    (WORK_PER_STEP / (n + 2 * m).max(1)).clamp(1, EXPANSIONS_PER_STEP)
}

/// This implementation is a classical branch-and-bound algorithm searching for a simple s-t path
/// with the maximum number of red nodes. It extends a path prefix one node at a time and
/// abandons a prefix as soon as the number of red nodes it collected plus the red nodes that are
/// still reachable (ignoring the simple path restriction, but avoiding the prefix) cannot beat
/// the incumbent. If the search completes, the incumbent is optimal.
///
/// We implement this recursive algorithm using an explicit call stack. This design avoids
/// stack overflows on long paths. The bulk of the work is carried out in [`Frame`] which emulates
/// a stack frame. [`Frame::resume`] tries one candidate successor and may return
/// [`BBResult::Branch`]`(child)` in which case we put `child` on the stack, or
/// [`BBResult::Backtrack`] in which case the frame is removed and its node leaves the path.
///
/// We implement the [`IterativeAlgorithm`] trait in order to support preemption. A step in the
/// iterative algorithm carries out up to [`EXPANSIONS_PER_STEP`] frame operations, fewer on
/// large graphs (see [`operations_per_step`]). The constructor only runs two linear searches,
/// so the first deadline check happens after a bounded amount of work.
///
/// The incumbent is owned by the algorithm for the duration of the search and may be seeded
/// with a known solution; it is never replaced by a worse one.
///
/// # Example
/// ```
/// use redpath::algorithm::*;
/// use redpath::graph::*;
/// use redpath::exact::BranchAndBound;
/// use redpath::incumbent::Incumbent;
///
/// // 0 -- 1* -- 2 -- 0, target 2
/// let edges = [
///     EdgeDecl::undirected(0, 1),
///     EdgeDecl::undirected(1, 2),
///     EdgeDecl::undirected(2, 0),
/// ];
/// let graph = RedGraph::from_parts(3, 0, 2, &[1], &edges).unwrap();
/// let solution = BranchAndBound::new(&graph, Incumbent::new())
///     .run_to_completion()
///     .unwrap();
/// assert_eq!(solution.path(), &[0, 1, 2]);
/// ```
pub struct BranchAndBound<'a, G> {
    stack: Vec<Frame>,
    ctx: Context<'a, G>,

    /// Bound of the root frame, i.e. no solution can exceed it
    root_bound: u32,
    operations_per_step: usize,
    iterations: usize,
}

/// State shared by all frames: the graph, the current path prefix and the incumbent.
pub(super) struct Context<'a, G> {
    graph: &'a G,
    dist_to_target: Vec<Option<Node>>,

    path: PathStack,
    reach: BlockedReach,
    incumbent: Incumbent,

    expansions: usize,
    prunes: usize,
}

impl<'a, G> BranchAndBound<'a, G>
where
    G: AdjacencyListIn + RedMarking,
{
    pub fn new(graph: &'a G, incumbent: Incumbent) -> Self {
        let n = graph.len();
        let (s, t) = (graph.source(), graph.target());

        let mut ctx = Context {
            graph,
            dist_to_target: graph.distances_to(t),
            path: PathStack::new(n),
            reach: BlockedReach::new(n),
            incumbent,
            expansions: 0,
            prunes: 0,
        };

        let mut stack = Vec::with_capacity(n);
        let mut root_bound = 0;

        if s == t {
            ctx.incumbent.try_improve(graph.red(s), || vec![s]);
        } else {
            ctx.path.try_push(s);
            if let Some(ahead) = ctx.reach.red_ahead(graph, s, ctx.path.visited()) {
                root_bound = graph.red(s) + ahead;
                stack.push(Frame::new(&ctx, s, graph.red(s), root_bound));
            }
        }

        Self {
            stack,
            ctx,
            root_bound,
            operations_per_step: operations_per_step(n, graph.number_of_edges()),
            iterations: 0,
        }
    }

    /// Returns the number of calls to [`IterativeAlgorithm::execute_step`] processed so far
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the number of frames pushed onto the stack so far
    pub fn number_of_expansions(&self) -> usize {
        self.ctx.expansions
    }

    /// Returns the number of branches that were cut by the bound
    pub fn number_of_prunes(&self) -> usize {
        self.ctx.prunes
    }

    pub fn incumbent(&self) -> &Incumbent {
        &self.ctx.incumbent
    }

    pub fn into_incumbent(self) -> Incumbent {
        self.ctx.incumbent
    }

    fn backtrack(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let top = self.ctx.path.pop();
            debug_assert_eq!(top, Some(frame.node));
        }
    }

    fn abort_search(&mut self) {
        self.stack.clear();
        self.ctx.path.clear();
    }
}

impl<'a, G> IterativeAlgorithm for BranchAndBound<'a, G>
where
    G: AdjacencyListIn + RedMarking,
{
    fn execute_step(&mut self) {
        self.iterations += 1;

        for _ in 0..self.operations_per_step {
            let result = match self.stack.last_mut() {
                Some(frame) => frame.resume(&mut self.ctx),
                None => break,
            };

            match result {
                BBResult::Branch(frame) => self.stack.push(frame),
                BBResult::Backtrack => self.backtrack(),
                BBResult::Continue => {}
            }

            // no completion of any prefix can beat the incumbent anymore
            if self.ctx.incumbent.prunes(self.root_bound) {
                self.abort_search();
            }
        }

        if self.stack.is_empty() {
            debug!(
                "Branch and bound completed after {} iterations: {} expansions, {} prunes, value {:?}",
                self.iterations,
                self.ctx.expansions,
                self.ctx.prunes,
                self.ctx.incumbent.value()
            );
        }
    }

    fn is_completed(&self) -> bool {
        self.stack.is_empty()
    }

    fn best_known_solution(&self) -> Option<&RedPath> {
        self.ctx.incumbent.best()
    }
}

impl<'a, G> TerminatingIterativeAlgorithm for BranchAndBound<'a, G> where
    G: AdjacencyListIn + RedMarking
{
}
