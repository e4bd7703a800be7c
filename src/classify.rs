//! Cheap structural tests that decide which solver tier applies to an instance.

use crate::graph::*;
use log::debug;

/// Structural class of an instance, from most to least tractable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphClass {
    /// The underlying undirected graph is a tree: the s-t path is unique
    Tree,
    /// All edges are directed and there is no directed cycle
    Dag,
    /// There are undirected edges, but orienting every edge as stored yields a DAG
    ForcedDag,
    /// Anything else
    General,
}

/// Plain reachability of `t` from `s`, ignoring colors. If this fails, no tier can find a path
/// and the answer is final.
pub fn is_feasible<G: Traversal + RedMarking>(graph: &G) -> bool {
    graph.is_reachable(graph.source(), graph.target())
}

/// A graph is a tree iff it is connected and has exactly `n - 1` edges; directed edges are
/// counted like undirected ones. Any two vertices of a tree are joined by at most one simple
/// path, regardless of how the edges are oriented.
pub fn is_tree<G: Traversal>(graph: &G) -> bool {
    !graph.is_empty()
        && graph.number_of_edges() + 1 == graph.len()
        && graph.is_weakly_connected()
}

pub fn is_dag<G: Traversal>(graph: &G) -> bool {
    graph.is_acyclic()
}

pub fn classify(graph: &RedGraph) -> GraphClass {
    let class = if is_tree(graph) {
        GraphClass::Tree
    } else if !graph.has_undirected_edges() {
        if is_dag(graph) {
            GraphClass::Dag
        } else {
            GraphClass::General
        }
    } else if is_dag(&graph.forced_orientation()) {
        GraphClass::ForcedDag
    } else {
        GraphClass::General
    };

    debug!(
        "Classified graph with n={}, m={} as {:?}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        class
    );
    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn graph(n: usize, edges: &[EdgeDecl]) -> RedGraph {
        RedGraph::from_parts(n, 0, n as Node - 1, &[], edges).unwrap()
    }

    fn d(u: Node, v: Node) -> EdgeDecl {
        EdgeDecl::directed(u, v)
    }

    fn u(u: Node, v: Node) -> EdgeDecl {
        EdgeDecl::undirected(u, v)
    }

    #[test_case(1, &[] => GraphClass::Tree; "single vertex")]
    #[test_case(4, &[u(0, 1), u(1, 2), u(2, 3)] => GraphClass::Tree; "undirected path")]
    #[test_case(4, &[d(0, 1), d(2, 1), u(1, 3)] => GraphClass::Tree; "mixed tree")]
    #[test_case(4, &[d(0, 1), d(0, 2), d(1, 3), d(2, 3)] => GraphClass::Dag; "diamond")]
    #[test_case(3, &[d(0, 1), d(1, 2), d(2, 0)] => GraphClass::General; "directed triangle")]
    #[test_case(4, &[u(0, 1), u(1, 2), u(0, 2), d(2, 3)] => GraphClass::ForcedDag; "forced triangle")]
    #[test_case(3, &[u(0, 1), u(1, 2), u(2, 0)] => GraphClass::General; "undirected triangle")]
    #[test_case(4, &[u(0, 1), u(2, 3)] => GraphClass::ForcedDag; "disconnected forest")]
    fn classification(n: usize, edges: &[EdgeDecl]) -> GraphClass {
        classify(&graph(n, edges))
    }

    #[test]
    fn feasibility() {
        assert!(is_feasible(&graph(3, &[d(0, 1), d(1, 2)])));
        assert!(!is_feasible(&graph(3, &[d(0, 1), d(2, 1)])));
        assert!(is_feasible(&graph(3, &[u(1, 0), u(2, 1)])));
        assert!(is_feasible(&graph(1, &[])));
    }
}
