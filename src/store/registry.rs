use super::types::*;
use crate::error::RegistryError;
use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use std::path::Path;

/// The per-node strategy vectors produced upstream, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRegistry {
    pub vectors: Vec<StrategyVector>,
}

impl StrategyRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.vectors.len() }

    /// Wraps externally built vectors as-is. Call `validate` before trusting them.
    pub fn from_vectors(vectors: Vec<StrategyVector>) -> Self {
        Self { vectors }
    }

    /// Appends a node and registers it as a successor of each of its predecessors.
    ///
    /// `strategies[s].resharding_costs[k]` must hold one cost per strategy of
    /// `predecessors[k]`.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        predecessors: &[NodeId],
        strategies: Vec<Strategy>,
        mergeable: bool,
    ) -> NodeId {
        let id = NodeId::new(self.vectors.len());

        for &parent in predecessors {
            if let Some(vector) = self.vectors.get_mut(parent.index()) {
                if !vector.successors.contains(&id) {
                    vector.successors.push(id);
                }
            }
        }

        self.vectors.push(StrategyVector {
            name: name.into(),
            predecessors: predecessors.to_vec(),
            successors: Vec::new(),
            strategies,
            mergeable,
        });
        id
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> Option<&StrategyVector> {
        self.vectors.get(id.index())
    }

    pub fn strategy_count(&self, id: NodeId) -> Option<usize> {
        self.get(id).map(|v| v.len())
    }

    pub fn name(&self, id: NodeId) -> &str {
        self.get(id).map(|v| v.name.as_str()).unwrap_or("<unknown>")
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.vectors.len()).map(NodeId::new)
    }

    /// Checks the structural contract the cost graph relies on.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (idx, vector) in self.vectors.iter().enumerate() {
            let node = NodeId::new(idx);

            if vector.strategies.is_empty() {
                return Err(RegistryError::NoStrategies { node, name: vector.name.clone() });
            }

            // 1. Neighbours exist, are unique and agree with each other.
            let mut seen = HashSet::new();
            for &parent in &vector.predecessors {
                let other = self.get(parent).ok_or(RegistryError::UnknownNode { node, missing: parent })?;
                if !seen.insert(parent) {
                    return Err(RegistryError::DuplicateNeighbor { node, neighbor: parent });
                }
                if !other.successors.contains(&node) {
                    return Err(RegistryError::InconsistentAdjacency { parent, child: node });
                }
            }
            seen.clear();
            for &child in &vector.successors {
                let other = self.get(child).ok_or(RegistryError::UnknownNode { node, missing: child })?;
                if !seen.insert(child) {
                    return Err(RegistryError::DuplicateNeighbor { node, neighbor: child });
                }
                if !other.predecessors.contains(&node) {
                    return Err(RegistryError::InconsistentAdjacency { parent: node, child });
                }
            }

            // 2. Cost tables are dense and well-formed.
            for (s, strategy) in vector.strategies.iter().enumerate() {
                if strategy.resharding_costs.len() != vector.predecessors.len() {
                    return Err(RegistryError::CostListCount {
                        node,
                        strategy: s,
                        expected: vector.predecessors.len(),
                        actual: strategy.resharding_costs.len(),
                    });
                }
                for (&predecessor, costs) in vector.predecessors.iter().zip(&strategy.resharding_costs) {
                    let expected = self.vectors[predecessor.index()].len();
                    if costs.len() != expected {
                        return Err(RegistryError::CostListLength {
                            node, strategy: s, predecessor, expected, actual: costs.len(),
                        });
                    }
                    if let Some(&value) = costs.iter().find(|c| c.is_nan() || **c < 0.0) {
                        return Err(RegistryError::InvalidCost { node, strategy: s, predecessor, value });
                    }
                }
            }
        }
        Ok(())
    }

    /// Total cost of a full assignment over every declared edge of the
    /// unsimplified graph.
    pub fn assignment_cost(&self, assignment: &[StrategyIndex]) -> Option<Cost> {
        if assignment.len() != self.vectors.len() {
            return None;
        }
        let mut total = 0.0;
        for (idx, vector) in self.vectors.iter().enumerate() {
            let chosen = assignment[idx];
            for &parent in &vector.predecessors {
                let costs = vector.resharding_costs(chosen, parent)?;
                total += *costs.get(*assignment.get(parent.index())?)?;
            }
        }
        Some(total)
    }

    // --- Persistence ---

    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(self).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| RegistryError::Serialization(format!("cannot write '{}': {e}", path.display())))
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Serialization(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_json(&content)
    }
}
