//! The cost graph: edge cost table, adjacency, contraction and absorption ledger.
pub mod adjacency;
pub mod contraction;
pub mod cost_graph;
pub mod cost_matrix;
pub mod ledger;

// Re-export key types for convenient access
pub use adjacency::Adjacency;
pub use contraction::{ContractionDelta, GraphSnapshot};
pub use cost_graph::CostGraph;
pub use cost_matrix::CostMatrix;
pub use ledger::{AbsorptionLedger, AbsorptionRecord};
