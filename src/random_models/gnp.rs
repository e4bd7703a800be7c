use crate::graph::*;
use rand::Rng;
use rand_distr::Geometric;

/// Iterates over a random subset of `0..len` in increasing order, where each index is included
/// independently with probability `p`. Instead of flipping a coin per index, the gap to the next
/// included index is drawn from a geometric distribution, so sampling a sparse set of the `n^2`
/// node pairs takes time proportional to the size of the sample.
pub struct SkipSampler<'a, R> {
    rng: &'a mut R,
    gaps: Geometric,
    upcoming: u64,
    len: u64,
}

impl<'a, R: Rng> SkipSampler<'a, R> {
    pub fn new(rng: &'a mut R, len: u64, p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p));
        let gaps = Geometric::new(p).expect("probability is in [0, 1]");
        let upcoming = rng.sample(gaps);
        Self {
            rng,
            gaps,
            upcoming,
            len,
        }
    }
}

impl<'a, R: Rng> Iterator for SkipSampler<'a, R> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.upcoming >= self.len {
            return None;
        }

        let current = self.upcoming;
        // for p = 0 the gap is u64::MAX
        let gap = self.rng.sample(self.gaps);
        self.upcoming = current.saturating_add(1).saturating_add(gap);
        Some(current)
    }
}

/// Marks every node of `0..n` red independently with probability `p_red`; sorted
pub fn sample_reds<R: Rng>(rng: &mut R, n: Node, p_red: f64) -> Vec<Node> {
    SkipSampler::new(rng, n as u64, p_red)
        .map(|u| u as Node)
        .collect()
}

/// Samples each ordered pair `(u, v)` of nodes in `0..n` with `u != v` independently with
/// probability `p`; the pairs are sorted lexicographically
pub fn sample_pairs<R: Rng>(rng: &mut R, n: Node, p: f64) -> Vec<(Node, Node)> {
    let n = n as u64;
    SkipSampler::new(rng, n * n, p)
        .map(|x| ((x / n) as Node, (x % n) as Node))
        .filter(|&(u, v)| u != v)
        .collect()
}

/// Generates a Gilbert graph with red marking. Each of the n(n-1) ordered pairs `(u, v)` with
/// `u != v` becomes an edge independently with probability `p`; such an edge is directed with
/// probability `p_directed` and undirected otherwise. Each node is red with probability `p_red`.
/// The terminals are `s = 0` and `t = n - 1`.
pub fn generate_red_gnp<R>(rng: &mut R, n: Node, p: f64, p_red: f64, p_directed: f64) -> RedGraph
where
    R: Rng,
{
    assert!(n > 0);

    let edges: Vec<_> = sample_pairs(rng, n, p)
        .into_iter()
        .map(|(u, v)| {
            if rng.gen_bool(p_directed) {
                EdgeDecl::directed(u, v)
            } else {
                EdgeDecl::undirected(u, v)
            }
        })
        .collect();

    let reds = sample_reds(rng, n, p_red);
    RedGraph::from_parts(n as usize, 0, n - 1, &reds, &edges)
        .expect("generated instances are consistent")
}
