//! Hand-off of the simplified cost structure to an external discrete solver.
pub mod problem;

pub use problem::SolverProblem;
