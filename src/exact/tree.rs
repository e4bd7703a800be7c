use crate::graph::*;
use crate::incumbent::RedPath;
use std::collections::VecDeque;

/// Solves an instance whose underlying undirected graph is a tree (see
/// [`crate::classify::is_tree`]). In a tree there is at most one simple path between two
/// vertices, so a single traversal from `s` recording parents finds the answer in O(n + m).
///
/// Returns None if `t` is not reachable from `s`.
pub fn solve_tree<G>(graph: &G) -> Option<RedPath>
where
    G: AdjacencyList + RedMarking,
{
    let (s, t) = (graph.source(), graph.target());

    let mut parent: Vec<Option<Node>> = vec![None; graph.len()];
    let mut queue = VecDeque::from(vec![s]);
    let mut found = s == t;

    while let Some(u) = queue.pop_front() {
        if found {
            break;
        }

        for &v in graph.out_neighbors(u) {
            if v == s || parent[v as usize].is_some() {
                continue;
            }
            parent[v as usize] = Some(u);
            if v == t {
                found = true;
                break;
            }
            queue.push_back(v);
        }
    }

    if !found {
        return None;
    }

    let mut path = vec![t];
    let mut current = t;
    while let Some(p) = parent[current as usize] {
        path.push(p);
        current = p;
    }
    path.reverse();

    Some(RedPath::new(graph.count_reds(&path), path))
}
