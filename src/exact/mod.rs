pub mod branch_and_bound;
pub mod dag;
pub mod exhaustive_search;
pub mod tree;

pub use branch_and_bound::BranchAndBound;
pub use dag::solve_dag;
pub use tree::solve_tree;
