//! Random instances of the tractable classes, mostly used to cross-validate the exact tiers.

use super::gnp::{sample_pairs, sample_reds};
use crate::graph::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Generates a uniform random recursive tree: node `v > 0` is attached to a uniformly chosen
/// node `u < v`. Each edge is directed (in a random orientation) with probability `p_directed`
/// and undirected otherwise. The terminals are chosen uniformly at random.
pub fn generate_tree<R: Rng>(rng: &mut R, n: Node, p_red: f64, p_directed: f64) -> RedGraph {
    assert!(n > 0);

    let edges: Vec<_> = (1..n)
        .map(|v| {
            let u = rng.gen_range(0..v);
            match (rng.gen_bool(p_directed), rng.gen_bool(0.5)) {
                (false, _) => EdgeDecl::undirected(u, v),
                (true, true) => EdgeDecl::directed(u, v),
                (true, false) => EdgeDecl::directed(v, u),
            }
        })
        .collect();

    let reds = sample_reds(rng, n, p_red);
    let s = rng.gen_range(0..n);
    let t = rng.gen_range(0..n);
    RedGraph::from_parts(n as usize, s, t, &reds, &edges).expect("generated instances are consistent")
}

/// Generates a random directed acyclic graph: nodes are ranked by a random permutation and each
/// pair is connected from lower to higher rank independently with probability `p`.
/// The terminals are the nodes of lowest and highest rank.
pub fn generate_dag<R: Rng>(rng: &mut R, n: Node, p: f64, p_red: f64) -> RedGraph {
    assert!(n > 0);

    let mut ranking: Vec<Node> = (0..n).collect();
    ranking.shuffle(rng);

    // pairs of ranks; the lower rank is the tail
    let edges: Vec<_> = sample_pairs(rng, n, p)
        .into_iter()
        .filter(|&(i, j)| i < j)
        .map(|(i, j)| EdgeDecl::directed(ranking[i as usize], ranking[j as usize]))
        .collect();

    let reds = sample_reds(rng, n, p_red);
    RedGraph::from_parts(n as usize, ranking[0], ranking[n as usize - 1], &reds, &edges)
        .expect("generated instances are consistent")
}
