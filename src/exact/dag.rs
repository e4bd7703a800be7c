use crate::graph::*;
use crate::incumbent::RedPath;

/// Longest red path in a directed acyclic graph via dynamic programming over a topological
/// order, O(n + m).
///
/// `dp[v]` is the maximum number of red vertices on a path from `s` to `v` and is only
/// defined for nodes reachable from `s`. A parent pointer is set whenever `dp[v]` strictly
/// increases; among equally good predecessors the first one encountered (topological order,
/// then adjacency order) is kept.
///
/// Returns None if `t` is not reachable from `s`.
///
/// ** Panics if the graph contains a cycle **
pub fn solve_dag<G>(graph: &G) -> Option<RedPath>
where
    G: Traversal + RedMarking,
{
    let order = graph
        .topological_order()
        .expect("dynamic program requires an acyclic graph");
    let (s, t) = (graph.source(), graph.target());

    let mut dp: Vec<Option<u32>> = vec![None; graph.len()];
    let mut parent: Vec<Option<Node>> = vec![None; graph.len()];
    dp[s as usize] = Some(graph.red(s));

    for u in order {
        let reds_u = match dp[u as usize] {
            Some(x) => x,
            None => continue,
        };

        for &v in graph.out_neighbors(u) {
            let candidate = reds_u + graph.red(v);
            if dp[v as usize].map_or(true, |x| candidate > x) {
                dp[v as usize] = Some(candidate);
                parent[v as usize] = Some(u);
            }
        }
    }

    let reds = dp[t as usize]?;

    let mut path = vec![t];
    let mut current = t;
    while current != s {
        current = parent[current as usize].expect("every reached node except s has a parent");
        path.push(current);
    }
    path.reverse();

    Some(RedPath::new(reds, path))
}
