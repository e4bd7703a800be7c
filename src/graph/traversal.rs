use super::*;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

pub struct TraversalState<'a, G> {
    graph: &'a G,
    visited: FixedBitSet,
}

impl<'a, G: AdjacencyListIn> TraversalState<'a, G> {
    pub fn new(graph: &'a G) -> TraversalState<'a, G> {
        Self {
            graph,
            visited: FixedBitSet::with_capacity(graph.len()),
        }
    }

    /// Executes breadth-first-search starting at node `start` along outgoing edges and
    /// calls callback for every node visited in order
    pub fn bfs_directed<T: FnMut(Node)>(&mut self, start: Node, callback: T) {
        let graph = self.graph;
        self.bfs(start, |u| graph.out_neighbors(u).iter(), callback)
    }

    /// Same as [`TraversalState::bfs_directed`] but follows edges backwards
    pub fn bfs_reverse<T: FnMut(Node)>(&mut self, start: Node, callback: T) {
        let graph = self.graph;
        self.bfs(start, |u| graph.in_neighbors(u).iter(), callback)
    }

    /// Executes breadth-first-search ignoring the direction of edges
    pub fn bfs_undirected<T: FnMut(Node)>(&mut self, start: Node, callback: T) {
        let graph = self.graph;
        self.bfs(
            start,
            |u| {
                graph
                    .out_neighbors(u)
                    .iter()
                    .chain(graph.in_neighbors(u).iter())
            },
            callback,
        )
    }

    fn bfs<'b, I, N, T>(&mut self, start: Node, neighbors: N, mut callback: T)
    where
        I: Iterator<Item = &'b Node>,
        N: Fn(Node) -> I,
        T: FnMut(Node),
    {
        if self.visited.put(start as usize) {
            return;
        }

        let mut queue: VecDeque<Node> = VecDeque::from(vec![start]);
        while let Some(u) = queue.pop_front() {
            callback(u);
            for &v in neighbors(u) {
                if !self.visited.put(v as usize) {
                    queue.push_back(v);
                }
            }
        }
    }

    pub fn visited(&self) -> &FixedBitSet {
        &self.visited
    }

    pub fn did_visit(&self, u: Node) -> bool {
        self.visited[u as usize]
    }
}

pub enum TravAlgo {
    DirBFS(Node),
    RevBFS(Node),
    UndirBFS(Node),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DfsColor {
    Unvisited,
    OnStack,
    Done,
}

pub trait Traversal: AdjacencyListIn + Sized {
    /// Runs the requested algorithm and invokes the callback for every visited node
    fn traverse<T: FnMut(Node)>(&self, algo: TravAlgo, callback: T) -> FixedBitSet {
        let mut state = TraversalState::new(self);

        match algo {
            TravAlgo::DirBFS(start) => state.bfs_directed(start, callback),
            TravAlgo::RevBFS(start) => state.bfs_reverse(start, callback),
            TravAlgo::UndirBFS(start) => state.bfs_undirected(start, callback),
        }

        state.visited
    }

    /// Runs the requested algorithm and returns the order in which nodes where visited
    fn traversal_order(&self, algo: TravAlgo) -> Vec<Node> {
        let mut order = Vec::with_capacity(self.len());
        self.traverse(algo, |u| order.push(u));
        order
    }

    /// All nodes reachable from `start` (including `start`)
    fn reachable_from(&self, start: Node) -> FixedBitSet {
        self.traverse(TravAlgo::DirBFS(start), |_| {})
    }

    /// All nodes that can reach `target` (including `target`)
    fn reaching(&self, target: Node) -> FixedBitSet {
        self.traverse(TravAlgo::RevBFS(target), |_| {})
    }

    /// Returns true iff a directed path from `from` to `to` exists
    fn is_reachable(&self, from: Node, to: Node) -> bool {
        self.reachable_from(from)[to as usize]
    }

    /// Returns true iff the underlying undirected graph is connected
    fn is_weakly_connected(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        self.traverse(TravAlgo::UndirBFS(0), |_| {})
            .count_ones(..)
            == self.len()
    }

    /// Number of edges on a shortest path from each node to `target`; None if there is none
    fn distances_to(&self, target: Node) -> Vec<Option<Node>> {
        let mut distances = vec![None; self.len()];
        distances[target as usize] = Some(0);

        let mut queue = VecDeque::from(vec![target]);
        while let Some(u) = queue.pop_front() {
            let next = distances[u as usize].map(|d| d + 1);
            for &v in self.in_neighbors(u) {
                if distances[v as usize].is_none() {
                    distances[v as usize] = next;
                    queue.push_back(v);
                }
            }
        }

        distances
    }

    /// Computes a topological order using a queue of nodes with no unprocessed predecessors
    /// (Kahn's algorithm). Returns None if the graph contains a cycle.
    fn topological_order(&self) -> Option<Vec<Node>> {
        let mut in_degs: Vec<Node> = self.vertices().map(|u| self.in_degree(u)).collect();

        let mut queue: VecDeque<Node> = self.vertices().filter(|&u| in_degs[u as usize] == 0).collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(u) = queue.pop_front() {
            order.push(u);

            for &v in self.out_neighbors(u) {
                in_degs[v as usize] -= 1;
                if in_degs[v as usize] == 0 {
                    queue.push_back(v);
                }
            }
        }

        if order.len() == self.len() {
            Some(order)
        } else {
            None
        }
    }

    /// Depth-first cycle detection over outgoing edges. The search keeps an explicit stack of
    /// (node, neighbor cursor) pairs, so its depth is not limited by the call stack.
    fn is_acyclic(&self) -> bool {
        let mut color = vec![DfsColor::Unvisited; self.len()];
        let mut stack: Vec<(Node, usize)> = Vec::new();

        for root in self.vertices() {
            if color[root as usize] != DfsColor::Unvisited {
                continue;
            }

            color[root as usize] = DfsColor::OnStack;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (u, cursor) = *frame;
                frame.1 += 1;

                match self.out_neighbors(u).get(cursor) {
                    Some(&v) => match color[v as usize] {
                        DfsColor::OnStack => return false,
                        DfsColor::Unvisited => {
                            color[v as usize] = DfsColor::OnStack;
                            stack.push((v, 0));
                        }
                        DfsColor::Done => {}
                    },
                    None => {
                        color[u as usize] = DfsColor::Done;
                        stack.pop();
                    }
                }
            }
        }

        true
    }
}

impl<G: AdjacencyListIn> Traversal for G {}

/// Reusable buffers to compute how many red vertices a simple continuation of a path can
/// still collect.
pub struct BlockedReach {
    forward: FixedBitSet,
    backward: FixedBitSet,
    queue: VecDeque<Node>,
}

impl BlockedReach {
    pub fn new(n: usize) -> Self {
        Self {
            forward: FixedBitSet::with_capacity(n),
            backward: FixedBitSet::with_capacity(n),
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Considers a path that currently ends in `from` and has visited the nodes in `blocked`.
    /// Returns None if the target cannot be reached from `from` without entering a blocked
    /// node. Otherwise, returns the number of red nodes (excluding `from`) that are reachable
    /// from `from` and can reach the target while avoiding blocked nodes.
    ///
    /// Every simple continuation to the target only uses such nodes, hence the value never
    /// underestimates what a continuation can collect.
    pub fn red_ahead<G>(&mut self, graph: &G, from: Node, blocked: &FixedBitSet) -> Option<u32>
    where
        G: AdjacencyListIn + RedMarking,
    {
        let target = graph.target();
        if from == target {
            return Some(0);
        }

        self.forward.clear();
        self.queue.clear();
        self.forward.insert(from as usize);
        self.queue.push_back(from);

        while let Some(u) = self.queue.pop_front() {
            // a path ends at the target, so it never passes through it
            if u == target {
                continue;
            }

            for &v in graph.out_neighbors(u) {
                if blocked[v as usize] || self.forward.put(v as usize) {
                    continue;
                }
                self.queue.push_back(v);
            }
        }

        if !self.forward[target as usize] {
            return None;
        }

        self.backward.clear();
        self.backward.insert(target as usize);
        self.queue.push_back(target);

        let mut reds = 0;
        while let Some(u) = self.queue.pop_front() {
            reds += graph.red(u);

            for &w in graph.in_neighbors(u) {
                if w == from || !self.forward[w as usize] || self.backward.put(w as usize) {
                    continue;
                }
                self.queue.push_back(w);
            }
        }

        Some(reds)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn directed(n: usize, s: Node, t: Node, reds: &[Node], edges: &[Edge]) -> RedGraph {
        let edges: Vec<_> = edges
            .iter()
            .map(|&(u, v)| EdgeDecl::directed(u, v))
            .collect();
        RedGraph::from_parts(n, s, t, reds, &edges).unwrap()
    }

    #[test]
    fn bfs_order() {
        //  / 2 --- \
        // 1         4 - 3
        //  \ 0 - 5 /
        let graph = directed(6, 1, 3, &[], &[(1, 2), (1, 0), (4, 3), (0, 5), (2, 4), (5, 4)]);

        {
            let order = graph.traversal_order(TravAlgo::DirBFS(1));
            assert_eq!(order, [1, 2, 0, 4, 5, 3]);
        }

        {
            let order = graph.traversal_order(TravAlgo::DirBFS(5));
            assert_eq!(order, [5, 4, 3]);
        }

        {
            let order = graph.traversal_order(TravAlgo::RevBFS(4));
            assert_eq!(order, [4, 2, 5, 1, 0]);
        }
    }

    #[test]
    fn reachability() {
        let graph = directed(5, 0, 3, &[], &[(0, 1), (1, 2), (3, 2), (4, 4)]);
        assert!(graph.is_reachable(0, 2));
        assert!(!graph.is_reachable(0, 3));
        assert!(graph.is_reachable(3, 3));
        assert_eq!(graph.reaching(2).ones().collect::<Vec<_>>(), [0, 1, 2, 3]);
        assert!(!graph.is_weakly_connected());

        let graph = directed(3, 0, 2, &[], &[(1, 0), (1, 2)]);
        assert!(graph.is_weakly_connected());
    }

    #[test]
    fn distances() {
        let graph = directed(5, 0, 3, &[], &[(0, 1), (1, 2), (2, 3), (0, 3), (4, 0)]);
        assert_eq!(
            graph.distances_to(3),
            vec![Some(1), Some(2), Some(1), Some(0), Some(2)]
        );
        assert_eq!(graph.distances_to(4), vec![None, None, None, None, Some(0)]);
    }

    #[test]
    fn topology_order() {
        let mut edges = vec![(2, 0), (1, 0), (0, 3), (0, 4), (0, 5), (3, 6)];
        {
            let graph = directed(8, 0, 6, &[], &edges);
            let order = graph.topological_order().unwrap();
            assert_eq!(order.len(), 8);
            let mut rank = vec![0; 8];
            for (i, &u) in order.iter().enumerate() {
                rank[u as usize] = i;
            }
            for &(u, v) in &edges {
                assert!(rank[u as usize] < rank[v as usize]);
            }
            assert!(graph.is_acyclic());
        }

        edges.push((6, 2)); // introduce cycle
        {
            let graph = directed(8, 0, 6, &[], &edges);
            assert!(graph.topological_order().is_none());
            assert!(!graph.is_acyclic());
        }
    }

    #[test]
    fn acyclic_self_loop_and_long_chain() {
        assert!(!directed(2, 0, 1, &[], &[(0, 1), (1, 1)]).is_acyclic());

        // a long chain must not exhaust the call stack
        let n = 200_000;
        let edges: Vec<Edge> = (0..n - 1).map(|u| (u, u + 1)).collect();
        let graph = directed(n as usize, 0, n - 1, &[], &edges);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn red_ahead() {
        // 0 -> 1* -> 2 -> 4
        //  \-> 3* ------/
        // 5* is reachable from 0 but cannot reach 4
        let graph = directed(
            6,
            0,
            4,
            &[1, 3, 5],
            &[(0, 1), (1, 2), (2, 4), (0, 3), (3, 4), (0, 5)],
        );
        let mut reach = BlockedReach::new(6);
        let mut blocked = FixedBitSet::with_capacity(6);

        blocked.insert(0);
        assert_eq!(reach.red_ahead(&graph, 0, &blocked), Some(2));

        blocked.insert(1);
        assert_eq!(reach.red_ahead(&graph, 1, &blocked), Some(0));

        blocked.insert(2);
        blocked.insert(3);
        assert_eq!(reach.red_ahead(&graph, 5, &blocked), None);
        assert_eq!(reach.red_ahead(&graph, 4, &blocked), Some(0));
    }
}
