//! The simplified cost structure as handed to an external discrete solver.

use crate::analysis::topology;
use crate::error::CostGraphError;
use crate::graph::CostGraph;
use crate::store::{Cost, NodeId, StrategyIndex};
use serde::{Serialize, Deserialize};

/// Costs are `None` where the pairing is infeasible (JSON has no infinity).
pub type WireCost = Option<Cost>;

fn to_wire(cost: Cost) -> WireCost {
    if cost.is_finite() { Some(cost) } else { None }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemNode {
    pub id: NodeId,
    pub name: String,
    pub strategy_count: usize,
    /// Per-strategy cost charged to this node independent of any edge.
    pub extra_costs: Option<Vec<WireCost>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemEdge {
    pub src: NodeId,
    pub dst: NodeId,
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` entries.
    pub costs: Vec<WireCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorbedNode {
    pub id: NodeId,
    pub representative: NodeId,
    /// `strategy_map[s]`: strategy of this node when the representative picks `s`.
    pub strategy_map: Vec<StrategyIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverProblem {
    /// Live nodes in topological order.
    pub nodes: Vec<ProblemNode>,
    pub edges: Vec<ProblemEdge>,
    pub absorbed: Vec<AbsorbedNode>,
}

impl SolverProblem {
    pub fn from_graph(graph: &CostGraph) -> Result<Self, CostGraphError> {
        let order = topology::live_order(graph)?;

        let nodes = order
            .into_iter()
            .map(|id| ProblemNode {
                id,
                name: graph.name(id).to_string(),
                strategy_count: graph.node_len(id).unwrap_or(0),
                extra_costs: graph.extra_node_cost(id).map(|row| row.iter().map(|&c| to_wire(c)).collect()),
            })
            .collect();

        let edges = graph
            .edges()
            .into_iter()
            .map(|((src, dst), matrix)| ProblemEdge {
                src,
                dst,
                rows: matrix.rows(),
                cols: matrix.cols(),
                costs: matrix.as_slice().iter().map(|&c| to_wire(c)).collect(),
            })
            .collect();

        let mut ledger = graph.ledger().clone();
        if !ledger.is_resolved() {
            ledger.resolve()?;
        }
        let absorbed = ledger
            .resolved_records()
            .map(|(id, record)| AbsorbedNode {
                id,
                representative: record.into,
                strategy_map: record.merge_map.clone(),
            })
            .collect();

        Ok(Self { nodes, edges, absorbed })
    }

    pub fn to_json(&self) -> Result<String, CostGraphError> {
        serde_json::to_string(self).map_err(|e| CostGraphError::Config(format!("JSON serialise error: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, CostGraphError> {
        serde_json::from_str(json).map_err(|e| CostGraphError::Config(format!("JSON parse error: {e}")))
    }
}
