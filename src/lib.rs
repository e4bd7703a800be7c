pub mod algorithm;
pub mod classify;
pub mod error;
pub mod exact;
pub mod graph;
pub mod heuristics;
pub mod incumbent;
pub mod log;
pub mod random_models;
pub mod result;
pub mod solver;
