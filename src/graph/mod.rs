pub mod path_stack;
pub mod red_graph;
pub mod traversal;

use std::ops::Range;

pub type Node = u32;
pub type Edge = (Node, Node);

pub use path_stack::PathStack;
pub use red_graph::{EdgeDecl, EdgeKind, InstanceHeader, RedGraph};
pub use traversal::{BlockedReach, Traversal};

pub trait GraphOrder {
    /// Returns the order (number of nodes) of the graph
    fn number_of_nodes(&self) -> Node;

    /// Returns the number of declared edges; an undirected edge counts once
    fn number_of_edges(&self) -> usize;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns true if the graph has no nodes
    fn is_empty(&self) -> bool {
        self.number_of_nodes() == 0
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }
}

/// Provides basic read-only functionality associated with an adjacency list.
/// Undirected edges appear in the lists of both of their endpoints.
pub trait AdjacencyList: GraphOrder {
    /// Returns a slice over the outgoing neighbors of a given vertex.
    /// ** Panics if the v >= n **
    fn out_neighbors(&self, u: Node) -> &[Node];

    /// Returns the number of outgoing edges from *u*
    fn out_degree(&self, u: Node) -> Node {
        self.out_neighbors(u).len() as Node
    }
}

pub trait AdjacencyListIn: AdjacencyList {
    /// Returns a slice over the incoming neighbors of a given vertex.
    /// ** Panics if the v >= n **
    fn in_neighbors(&self, u: Node) -> &[Node];

    /// Returns the number of ingoing edges to *u*
    fn in_degree(&self, u: Node) -> Node {
        self.in_neighbors(u).len() as Node
    }

    /// Returns the total number of edges incident to *u*
    fn total_degree(&self, u: Node) -> Node {
        self.in_degree(u) + self.out_degree(u)
    }
}

/// Marks the distinguished (red) vertices and the two terminals of an instance.
pub trait RedMarking: GraphOrder {
    fn is_red(&self, u: Node) -> bool;

    /// Returns 1 for a red vertex and 0 otherwise
    fn red(&self, u: Node) -> u32 {
        self.is_red(u) as u32
    }

    /// Returns the number of red vertices in the graph
    fn number_of_reds(&self) -> Node;

    fn source(&self) -> Node;

    fn target(&self) -> Node;

    /// Number of red vertices on the given sequence of nodes
    fn count_reds(&self, nodes: &[Node]) -> u32 {
        nodes.iter().map(|&u| self.red(u)).sum()
    }
}
