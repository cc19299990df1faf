//! Error types shared by the registry and the cost graph engine.
use crate::store::NodeId;
use thiserror::Error;

/// Malformed strategy registry input, detected before the cost graph is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Node {node:?} references unknown node {missing:?}")]
    UnknownNode { node: NodeId, missing: NodeId },
    #[error("Node '{name}' has no candidate strategies")]
    NoStrategies { node: NodeId, name: String },
    #[error("Node {node:?} lists {neighbor:?} more than once")]
    DuplicateNeighbor { node: NodeId, neighbor: NodeId },
    #[error("Adjacency mismatch: {parent:?} -> {child:?} is declared on one side only")]
    InconsistentAdjacency { parent: NodeId, child: NodeId },
    #[error("Node {node:?} strategy {strategy} has {actual} cost lists, expected {expected}")]
    CostListCount { node: NodeId, strategy: usize, expected: usize, actual: usize },
    #[error("Node {node:?} strategy {strategy} has {actual} costs against {predecessor:?}, expected {expected}")]
    CostListLength { node: NodeId, strategy: usize, predecessor: NodeId, expected: usize, actual: usize },
    #[error("Node {node:?} strategy {strategy} has an invalid cost {value} against {predecessor:?}")]
    InvalidCost { node: NodeId, strategy: usize, predecessor: NodeId, value: f64 },
    #[error("Registry serialization failed: {0}")]
    Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostGraphError {
    #[error("No edge between {src:?} and {dst:?}")]
    NoSuchEdge { src: NodeId, dst: NodeId },
    #[error("Cannot merge {src:?} with {dst:?}: {reason}")]
    MergePrecondition { src: NodeId, dst: NodeId, reason: String },
    #[error("Absorption cycle detected while resolving node {0:?}")]
    AbsorptionCycle(NodeId),
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("Invalid assignment: {0}")]
    Assignment(String),
    #[error("Live graph is not acyclic (at node {0:?})")]
    CycleDetected(NodeId),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
