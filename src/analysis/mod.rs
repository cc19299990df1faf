//! Read-only analysis of the live cost graph.
pub mod topology;
