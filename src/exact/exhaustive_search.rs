use crate::graph::*;
use crate::incumbent::RedPath;

/// A simple implementation of an exhaustive search to provide cross-validation
/// for more complicated algorithms.
///
/// The idea is to enumerate every simple path starting in `s` and to keep the best one that
/// ends in `t`. There is no pruning whatsoever, so this is only usable on tiny graphs.
pub fn exhaustive_search<G>(graph: &G) -> Option<RedPath>
where
    G: AdjacencyList + RedMarking,
{
    assert!(graph.number_of_nodes() <= 16);

    let mut path = PathStack::new(graph.len());
    let mut best: Option<RedPath> = None;
    assert!(path.try_push(graph.source()));
    enumerate(graph, &mut path, graph.red(graph.source()), &mut best);
    best
}

/// Executes [`exhaustive_search`] and checks that `candidate` is a valid witness attaining
/// the optimal value.
pub fn exhaustive_search_verify_optimality(graph: &RedGraph, candidate: &RedPath) -> bool {
    match (graph.check_witness(candidate.path()), exhaustive_search(graph)) {
        (Ok(reds), Some(best)) => reds == candidate.reds() && reds == best.reds(),
        _ => false,
    }
}

fn enumerate<G>(graph: &G, path: &mut PathStack, reds: u32, best: &mut Option<RedPath>)
where
    G: AdjacencyList + RedMarking,
{
    let u = path.peek().unwrap();
    if u == graph.target() {
        if best.as_ref().map_or(true, |b| reds > b.reds()) {
            *best = Some(RedPath::new(reds, path.as_slice().to_vec()));
        }
        return;
    }

    for &v in graph.out_neighbors(u) {
        if path.try_push(v) {
            enumerate(graph, path, reds + graph.red(v), best);
            path.pop();
        }
    }
}
