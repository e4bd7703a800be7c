pub mod generators;
pub mod gnp;
