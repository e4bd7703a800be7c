use super::*;
use crate::error::{GraphError, Terminal};
use fixedbitset::FixedBitSet;
use itertools::Itertools;
use std::fmt::{self, Debug, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Traversable from `u` to `v` only
    Directed,
    /// Traversable in both directions
    Undirected,
}

/// An edge as declared by the instance, i.e. before it is expanded into adjacency lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeDecl {
    pub u: Node,
    pub v: Node,
    pub kind: EdgeKind,
}

impl EdgeDecl {
    pub fn directed(u: Node, v: Node) -> Self {
        Self {
            u,
            v,
            kind: EdgeKind::Directed,
        }
    }

    pub fn undirected(u: Node, v: Node) -> Self {
        Self {
            u,
            v,
            kind: EdgeKind::Undirected,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.kind == EdgeKind::Directed
    }
}

/// The counts announced in front of an instance: vertices, edges and red vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceHeader {
    pub nodes: usize,
    pub edges: usize,
    pub reds: usize,
}

/// Immutable graph with red marking and designated terminals `s` and `t`.
///
/// Successor and predecessor lists are kept in declaration order of the edges; an undirected
/// edge `{u, v}` contributes `u -> v` and `v -> u`. The graph is never modified after
/// construction and can be shared freely between concurrent searches.
#[derive(Clone)]
pub struct RedGraph {
    edges: Vec<EdgeDecl>,
    out_neighbors: Vec<Vec<Node>>,
    in_neighbors: Vec<Vec<Node>>,
    red: FixedBitSet,
    number_of_reds: Node,
    source: Node,
    target: Node,
}

impl RedGraph {
    /// Validates a declared instance against its header and builds the graph.
    ///
    /// # Example
    /// ```
    /// use redpath::graph::*;
    ///
    /// let header = InstanceHeader { nodes: 3, edges: 2, reds: 1 };
    /// let graph = RedGraph::try_new(
    ///     header,
    ///     0,
    ///     2,
    ///     [1],
    ///     [EdgeDecl::directed(0, 1), EdgeDecl::undirected(1, 2)],
    /// )
    /// .unwrap();
    /// assert_eq!(graph.out_neighbors(2), &[1]);
    /// assert!(graph.is_red(1));
    /// ```
    pub fn try_new<R, E>(
        header: InstanceHeader,
        source: Node,
        target: Node,
        reds: R,
        edges: E,
    ) -> Result<Self, GraphError>
    where
        R: IntoIterator<Item = Node>,
        E: IntoIterator<Item = EdgeDecl>,
    {
        let n = header.nodes;
        if n == 0 {
            return Err(GraphError::EmptyGraph);
        }

        for (terminal, vertex) in [(Terminal::Source, source), (Terminal::Target, target)] {
            if vertex as usize >= n {
                return Err(GraphError::TerminalOutOfRange {
                    terminal,
                    vertex,
                    order: n,
                });
            }
        }

        let mut red = FixedBitSet::with_capacity(n);
        for vertex in reds {
            if vertex as usize >= n {
                return Err(GraphError::RedVertexOutOfRange { vertex, order: n });
            }
            red.insert(vertex as usize);
        }
        let number_of_reds = red.count_ones(..);
        if number_of_reds != header.reds {
            return Err(GraphError::RedCountMismatch {
                expected: header.reds,
                got: number_of_reds,
            });
        }

        let edges = edges.into_iter().collect_vec();
        if edges.len() != header.edges {
            return Err(GraphError::EdgeCountMismatch {
                expected: header.edges,
                got: edges.len(),
            });
        }

        let mut out_neighbors = vec![Vec::new(); n];
        let mut in_neighbors = vec![Vec::new(); n];
        for (i, e) in edges.iter().enumerate() {
            if let Some(vertex) = [e.u, e.v].into_iter().find(|&x| x as usize >= n) {
                return Err(GraphError::DanglingEdge {
                    edge: i,
                    vertex,
                    order: n,
                });
            }

            out_neighbors[e.u as usize].push(e.v);
            in_neighbors[e.v as usize].push(e.u);
            if !e.is_directed() {
                out_neighbors[e.v as usize].push(e.u);
                in_neighbors[e.u as usize].push(e.v);
            }
        }

        Ok(Self {
            edges,
            out_neighbors,
            in_neighbors,
            red,
            number_of_reds: number_of_reds as Node,
            source,
            target,
        })
    }

    /// Same as [`RedGraph::try_new`], but the header is derived from the declarations
    /// themselves. Duplicate red markers are merged.
    pub fn from_parts(
        n: usize,
        source: Node,
        target: Node,
        reds: &[Node],
        edges: &[EdgeDecl],
    ) -> Result<Self, GraphError> {
        let header = InstanceHeader {
            nodes: n,
            edges: edges.len(),
            reds: reds.iter().unique().count(),
        };
        Self::try_new(header, source, target, reds.iter().copied(), edges.iter().copied())
    }

    /// The edges in declaration order
    pub fn edges(&self) -> &[EdgeDecl] {
        &self.edges
    }

    pub fn has_undirected_edges(&self) -> bool {
        self.edges.iter().any(|e| !e.is_directed())
    }

    /// Returns a copy of the graph in which every edge is directed in its stored orientation,
    /// i.e. `u -- v` becomes `u -> v`.
    pub fn forced_orientation(&self) -> Self {
        let mut out_neighbors = vec![Vec::new(); self.len()];
        let mut in_neighbors = vec![Vec::new(); self.len()];
        let edges = self
            .edges
            .iter()
            .map(|e| {
                out_neighbors[e.u as usize].push(e.v);
                in_neighbors[e.v as usize].push(e.u);
                EdgeDecl::directed(e.u, e.v)
            })
            .collect_vec();

        Self {
            edges,
            out_neighbors,
            in_neighbors,
            red: self.red.clone(),
            number_of_reds: self.number_of_reds,
            source: self.source,
            target: self.target,
        }
    }

    /// Returns *true* exactly if the graph allows to traverse from u to v in one step
    pub fn has_arc(&self, u: Node, v: Node) -> bool {
        self.out_neighbors[u as usize].contains(&v)
    }

    /// Verifies that `path` is a simple path from the source to the target using existing
    /// arcs and returns the number of red vertices on it.
    pub fn check_witness(&self, path: &[Node]) -> Result<u32, String> {
        match (path.first(), path.last()) {
            (Some(&first), Some(&last)) if first == self.source && last == self.target => {}
            _ => return Err(format!("path {:?} does not connect s and t", path)),
        }

        if let Some(&u) = path.iter().find(|&&u| u >= self.number_of_nodes()) {
            return Err(format!("path visits unknown vertex {}", u));
        }

        if path.iter().duplicates().next().is_some() {
            return Err(format!("path {:?} revisits a vertex", path));
        }

        if let Some((u, v)) = path.iter().tuple_windows().find(|&(&u, &v)| !self.has_arc(u, v)) {
            return Err(format!("path uses missing arc {} -> {}", u, v));
        }

        Ok(self.count_reds(path))
    }
}

impl GraphOrder for RedGraph {
    fn number_of_nodes(&self) -> Node {
        self.out_neighbors.len() as Node
    }

    fn number_of_edges(&self) -> usize {
        self.edges.len()
    }
}

impl AdjacencyList for RedGraph {
    fn out_neighbors(&self, u: Node) -> &[Node] {
        &self.out_neighbors[u as usize]
    }
}

impl AdjacencyListIn for RedGraph {
    fn in_neighbors(&self, u: Node) -> &[Node] {
        &self.in_neighbors[u as usize]
    }
}

impl RedMarking for RedGraph {
    fn is_red(&self, u: Node) -> bool {
        self.red[u as usize]
    }

    fn number_of_reds(&self) -> Node {
        self.number_of_reds
    }

    fn source(&self) -> Node {
        self.source
    }

    fn target(&self) -> Node {
        self.target
    }
}

impl Debug for RedGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "RedGraph with {} vertices, s={}, t={}, red={:?}",
            self.number_of_nodes(),
            self.source,
            self.target,
            self.red.ones().collect_vec()
        )?;
        for e in &self.edges {
            let connector = if e.is_directed() { "->" } else { "--" };
            writeln!(f, "{} {} {}", e.u, connector, e.v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn path_graph() -> RedGraph {
        // 0 -- 1* -- 2 -> 3*
        RedGraph::from_parts(
            4,
            0,
            3,
            &[1, 3],
            &[
                EdgeDecl::undirected(0, 1),
                EdgeDecl::undirected(1, 2),
                EdgeDecl::directed(2, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn adjacency() {
        let graph = path_graph();
        assert_eq!(graph.number_of_nodes(), 4);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.number_of_reds(), 2);
        assert_eq!(graph.out_neighbors(1), &[0, 2]);
        assert_eq!(graph.in_neighbors(1), &[0, 2]);
        assert_eq!(graph.out_neighbors(3), &[] as &[Node]);
        assert_eq!(graph.in_neighbors(3), &[2]);
        assert_eq!(graph.total_degree(2), 3);
        assert!(graph.has_undirected_edges());
    }

    #[test]
    fn forced_orientation() {
        let forced = path_graph().forced_orientation();
        assert!(!forced.has_undirected_edges());
        assert_eq!(forced.out_neighbors(1), &[2]);
        assert_eq!(forced.in_neighbors(0), &[] as &[Node]);
        assert_eq!(forced.number_of_reds(), 2);
    }

    #[test]
    fn validation_errors() {
        let header = InstanceHeader {
            nodes: 3,
            edges: 1,
            reds: 0,
        };

        assert_eq!(
            RedGraph::try_new(header, 0, 2, [], [EdgeDecl::directed(0, 3)]).unwrap_err(),
            GraphError::DanglingEdge {
                edge: 0,
                vertex: 3,
                order: 3
            }
        );
        assert_eq!(
            RedGraph::try_new(header, 0, 2, [], []).unwrap_err(),
            GraphError::EdgeCountMismatch {
                expected: 1,
                got: 0
            }
        );
        assert_eq!(
            RedGraph::try_new(header, 0, 2, [1], [EdgeDecl::directed(0, 1)]).unwrap_err(),
            GraphError::RedCountMismatch {
                expected: 0,
                got: 1
            }
        );
        assert_eq!(
            RedGraph::try_new(header, 5, 2, [], [EdgeDecl::directed(0, 1)]).unwrap_err(),
            GraphError::TerminalOutOfRange {
                terminal: Terminal::Source,
                vertex: 5,
                order: 3
            }
        );
        assert_eq!(
            RedGraph::try_new(header, 0, 2, [7], [EdgeDecl::directed(0, 1)]).unwrap_err(),
            GraphError::RedVertexOutOfRange {
                vertex: 7,
                order: 3
            }
        );
        assert_eq!(
            RedGraph::from_parts(0, 0, 0, &[], &[]).unwrap_err(),
            GraphError::EmptyGraph
        );
    }

    #[test]
    fn witness() {
        let graph = path_graph();
        assert_eq!(graph.check_witness(&[0, 1, 2, 3]), Ok(2));
        assert!(graph.check_witness(&[0, 1, 0, 1, 2, 3]).is_err());
        assert!(graph.check_witness(&[0, 2, 3]).is_err());
        assert!(graph.check_witness(&[1, 2, 3]).is_err());
        assert!(graph.check_witness(&[]).is_err());
    }
}
