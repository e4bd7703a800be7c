use crate::graph::Node;
use std::fmt::{self, Display, Formatter};

/// Reasons why a declared instance cannot be turned into a [`crate::graph::RedGraph`].
/// All of them are fatal: no solver is run on a malformed graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The instance declares no vertices, so neither terminal can exist.
    EmptyGraph,
    /// The header announces a different number of edges than were declared.
    EdgeCountMismatch { expected: usize, got: usize },
    /// The header announces a different number of red vertices than were marked.
    RedCountMismatch { expected: usize, got: usize },
    /// An edge references a vertex id outside of `0..order`.
    DanglingEdge {
        edge: usize,
        vertex: Node,
        order: usize,
    },
    /// A red marker references a vertex id outside of `0..order`.
    RedVertexOutOfRange { vertex: Node, order: usize },
    /// The start or end vertex is not a vertex of the graph.
    TerminalOutOfRange {
        terminal: Terminal,
        vertex: Node,
        order: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Source,
    Target,
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Source => write!(f, "start vertex"),
            Terminal::Target => write!(f, "end vertex"),
        }
    }
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::EmptyGraph => write!(f, "graph has no vertices"),
            GraphError::EdgeCountMismatch { expected, got } => {
                write!(f, "header announces {expected} edges but {got} were declared")
            }
            GraphError::RedCountMismatch { expected, got } => write!(
                f,
                "header announces {expected} red vertices but {got} were marked"
            ),
            GraphError::DanglingEdge {
                edge,
                vertex,
                order,
            } => write!(
                f,
                "edge #{edge} references vertex {vertex}, but the graph has only {order} vertices"
            ),
            GraphError::RedVertexOutOfRange { vertex, order } => write!(
                f,
                "red marker on vertex {vertex}, but the graph has only {order} vertices"
            ),
            GraphError::TerminalOutOfRange {
                terminal,
                vertex,
                order,
            } => write!(
                f,
                "{terminal} {vertex} is not present in a graph with {order} vertices"
            ),
        }
    }
}

impl std::error::Error for GraphError {}
