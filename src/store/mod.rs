//! Input side: the per-node strategy vectors produced by strategy enumeration.
pub mod registry;
pub mod types;

pub use registry::StrategyRegistry;
pub use types::{is_infeasible, Cost, NodeId, Strategy, StrategyIndex, StrategyVector, INFEASIBLE};
