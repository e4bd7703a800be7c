use super::*;
use itertools::Itertools;
use log::trace;
use std::cmp::Reverse;

pub(super) enum BBResult {
    /// Descend into a child frame that extends the path by one node
    Branch(Frame),
    /// The frame is exhausted or cannot beat the incumbent anymore
    Backtrack,
    /// One candidate was processed without descending
    Continue,
}

/// The frame emulates a stack frame of the recursive search (see also [`BranchAndBound`] for
/// further information). A frame corresponds to the path prefix ending in `node`, which is
/// stored in the shared [`PathStack`] of the [`Context`]; the frame itself only remembers which
/// successors it still has to try.
pub(super) struct Frame {
    pub(super) node: Node,

    /// Number of red nodes on the path prefix including `node`
    reds: u32,

    /// Upper bound on the number of red nodes of any completion of this prefix. A frame whose
    /// bound does not exceed the incumbent can be abandoned.
    pub(super) bound: u32,

    /// Unvisited successors that can still reach the target, in the order they are tried
    candidates: Vec<Node>,
    cursor: usize,
}

impl Frame {
    /// Creates the frame for the prefix currently stored in `ctx.path`, which must end in `node`.
    pub(super) fn new<G>(ctx: &Context<G>, node: Node, reds: u32, bound: u32) -> Self
    where
        G: AdjacencyListIn + RedMarking,
    {
        debug_assert_eq!(ctx.path.peek(), Some(node));

        let mut candidates = ctx
            .graph
            .out_neighbors(node)
            .iter()
            .copied()
            .filter(|&v| !ctx.path.contains(v) && ctx.dist_to_target[v as usize].is_some())
            .unique()
            .collect_vec();

        // the order only affects the running time
        candidates.sort_by_key(|&v| (Reverse(ctx.graph.red(v)), ctx.dist_to_target[v as usize]));

        Self {
            node,
            reds,
            bound,
            candidates,
            cursor: 0,
        }
    }

    /// Tries the next candidate. Reaching the target updates the incumbent; any other candidate
    /// is pushed onto the path and either returned as a child frame or rejected by the bound.
    pub(super) fn resume<G>(&mut self, ctx: &mut Context<G>) -> BBResult
    where
        G: AdjacencyListIn + RedMarking,
    {
        if ctx.incumbent.prunes(self.bound) {
            ctx.prunes += 1;
            return BBResult::Backtrack;
        }

        let v = match self.candidates.get(self.cursor) {
            Some(&v) => v,
            None => return BBResult::Backtrack,
        };
        self.cursor += 1;

        let reds = self.reds + ctx.graph.red(v);

        if v == ctx.graph.target() {
            let path = &ctx.path;
            if ctx.incumbent.try_improve(reds, || path.extended_by(v)) {
                trace!(
                    "New incumbent with {} reds after {} expansions",
                    reds,
                    ctx.expansions
                );
            }
            return BBResult::Continue;
        }

        let pushed = ctx.path.try_push(v);
        debug_assert!(pushed);

        match ctx.reach.red_ahead(ctx.graph, v, ctx.path.visited()) {
            Some(ahead) if !ctx.incumbent.prunes(reds + ahead) => {
                ctx.expansions += 1;
                BBResult::Branch(Frame::new(ctx, v, reds, reds + ahead))
            }
            ahead => {
                if ahead.is_some() {
                    ctx.prunes += 1;
                }
                ctx.path.pop();
                BBResult::Continue
            }
        }
    }
}
