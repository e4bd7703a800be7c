use crate::graph::Node;

/// A simple s-t path together with the number of red vertices on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedPath {
    reds: u32,
    path: Vec<Node>,
}

impl RedPath {
    pub fn new(reds: u32, path: Vec<Node>) -> Self {
        Self { reds, path }
    }

    pub fn reds(&self) -> u32 {
        self.reds
    }

    pub fn path(&self) -> &[Node] {
        &self.path
    }

    pub fn into_path(self) -> Vec<Node> {
        self.path
    }

    /// Returns the better of both; on ties `self` is kept
    pub fn max(self, other: Self) -> Self {
        if other.reds > self.reds {
            other
        } else {
            self
        }
    }
}

/// Best known solution of one solve invocation. It is owned by the caller of the search and
/// handed to the branch and bound by mutable reference, so there is never more than one writer.
///
/// An incumbent may be seeded with a known lower bound; it then only accepts strict
/// improvements and never falls below the seed.
#[derive(Clone, Debug, Default)]
pub struct Incumbent {
    best: Option<RedPath>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: Option<RedPath>) -> Self {
        Self { best: seed }
    }

    pub fn value(&self) -> Option<u32> {
        self.best.as_ref().map(RedPath::reds)
    }

    pub fn best(&self) -> Option<&RedPath> {
        self.best.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    /// Installs a solution with `reds` red vertices if it is strictly better than the current
    /// one. The path is only materialized in that case. Returns true iff it was installed.
    pub fn try_improve<F: FnOnce() -> Vec<Node>>(&mut self, reds: u32, path: F) -> bool {
        if self.value().map_or(false, |best| reds <= best) {
            return false;
        }

        self.best = Some(RedPath::new(reds, path()));
        true
    }

    pub fn offer(&mut self, candidate: RedPath) -> bool {
        let RedPath { reds, path } = candidate;
        self.try_improve(reds, move || path)
    }

    /// Returns true if no branch whose value is at most `bound` can improve the incumbent
    pub fn prunes(&self, bound: u32) -> bool {
        self.value().map_or(false, |best| bound <= best)
    }

    pub fn into_best(self) -> Option<RedPath> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_strict_improvements() {
        let mut incumbent = Incumbent::new();
        assert!(incumbent.is_empty());
        assert!(!incumbent.prunes(0));

        assert!(incumbent.try_improve(0, || vec![0, 1]));
        assert!(incumbent.prunes(0));
        assert!(!incumbent.prunes(1));

        assert!(!incumbent.try_improve(0, || panic!("must not be materialized")));
        assert!(incumbent.offer(RedPath::new(2, vec![0, 2, 1])));
        assert!(!incumbent.offer(RedPath::new(1, vec![0, 3, 1])));
        assert_eq!(incumbent.value(), Some(2));
        assert_eq!(incumbent.best().unwrap().path(), &[0, 2, 1]);
    }

    #[test]
    fn seeded_never_regresses() {
        let mut incumbent = Incumbent::seeded(Some(RedPath::new(3, vec![0, 4])));
        assert!(!incumbent.offer(RedPath::new(3, vec![0, 5, 4])));
        assert!(!incumbent.offer(RedPath::new(1, vec![0, 5, 4])));
        assert_eq!(incumbent.into_best(), Some(RedPath::new(3, vec![0, 4])));
    }

    #[test]
    fn max_prefers_first_on_ties() {
        let a = RedPath::new(1, vec![0, 1]);
        let b = RedPath::new(1, vec![0, 2, 1]);
        assert_eq!(a.clone().max(b.clone()), a);
        assert_eq!(b.clone().max(RedPath::new(2, vec![0])).reds(), 2);
    }
}
