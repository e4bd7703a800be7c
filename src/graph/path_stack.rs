use super::*;
use fixedbitset::FixedBitSet;

/// A simple path prefix: the nodes in visiting order together with a membership set.
/// A node can be stored at most once, hence the content is always a simple path
/// provided consecutive nodes are connected by an edge.
#[derive(Clone, Debug)]
pub struct PathStack {
    stack: Vec<Node>,
    bitset: FixedBitSet,
}

impl PathStack {
    pub fn new(n: usize) -> Self {
        Self {
            stack: Vec::with_capacity(n),
            bitset: FixedBitSet::with_capacity(n),
        }
    }

    /// Returns the element that would be popped if [`PathStack::pop`] were called but does
    /// not alter the data structure
    pub fn peek(&self) -> Option<Node> {
        Some(*self.stack.last()?)
    }

    /// Removes last element pushed onto stack (and None if none such element exists)
    pub fn pop(&mut self) -> Option<Node> {
        let u = self.stack.pop()?;
        self.bitset.set(u as usize, false);
        Some(u)
    }

    /// Tries to push new element onto stack if it is not currently stored on the stack.
    /// Returns true iff the push succeeded
    pub fn try_push(&mut self, u: Node) -> bool {
        if self.bitset.put(u as usize) {
            return false;
        }

        self.stack.push(u);
        true
    }

    /// Returns the number of elements on the stack
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if currently no elements are stored on stack
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Return true if the requested element is currently stored on the stack
    pub fn contains(&self, u: Node) -> bool {
        self.bitset[u as usize]
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.bitset.clear();
    }

    /// The path in visiting order
    pub fn as_slice(&self) -> &[Node] {
        &self.stack
    }

    /// Membership set of all nodes on the path
    pub fn visited(&self) -> &FixedBitSet {
        &self.bitset
    }

    /// Copies the path and appends `last`, which must not be on the path
    pub fn extended_by(&self, last: Node) -> Vec<Node> {
        debug_assert!(!self.contains(last));
        let mut path = Vec::with_capacity(self.len() + 1);
        path.extend_from_slice(&self.stack);
        path.push(last);
        path
    }
}
