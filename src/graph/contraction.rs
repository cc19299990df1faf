//! contraction.rs
//! Node contraction as a pure step: `plan` reads a snapshot and describes the
//! merge, `ContractionDelta::apply` writes it.

use super::adjacency::Adjacency;
use super::cost_matrix::CostMatrix;
use super::ledger::AbsorptionRecord;
use crate::error::CostGraphError;
use crate::store::{Cost, NodeId, StrategyIndex};
use std::collections::HashMap;

/// Everything the contraction engine mutates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    /// Strategy count per node, fixed at build time.
    pub(crate) node_lens: Vec<usize>,
    pub(crate) adjacency: Adjacency,
    pub(crate) edge_costs: HashMap<(NodeId, NodeId), CostMatrix>,
    /// Per-strategy costs folded into a node by the merges it took part in.
    pub(crate) extra_node_costs: HashMap<NodeId, Vec<Cost>>,
}

impl GraphSnapshot {
    pub fn node_len(&self, id: NodeId) -> Option<usize> {
        self.node_lens.get(id.index()).copied()
    }

    pub fn adjacency(&self) -> &Adjacency { &self.adjacency }

    pub fn edge_cost(&self, src: NodeId, dst: NodeId) -> Result<&CostMatrix, CostGraphError> {
        self.edge_costs.get(&(src, dst)).ok_or(CostGraphError::NoSuchEdge { src, dst })
    }

    pub fn extra_node_cost(&self, id: NodeId) -> Option<&[Cost]> {
        self.extra_node_costs.get(&id).map(|v| v.as_slice())
    }
}

/// The result of planning `merge(src, dst)` against one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractionDelta {
    pub src: NodeId,
    pub dst: NodeId,
    /// `merge_map[i]`: strategy of `dst` implied by strategy `i` of `src`.
    pub merge_map: Vec<StrategyIndex>,
    /// New extra cost row of `src`.
    pub src_extra: Vec<Cost>,
    /// Final matrices of `(src, child)` for every child of `dst`.
    pub derived_edges: Vec<(NodeId, CostMatrix)>,
    pub dst_children: Vec<NodeId>,
    /// `src` was the last parent of `dst`.
    pub absorbs_dst: bool,
}

/// Plans the contraction of the live edge `src -> dst` without mutating anything.
pub fn plan(snapshot: &GraphSnapshot, src: NodeId, dst: NodeId) -> Result<ContractionDelta, CostGraphError> {
    let adjacency = &snapshot.adjacency;
    let reject = |reason: &str| CostGraphError::MergePrecondition { src, dst, reason: reason.to_string() };

    if !adjacency.contains(src) {
        return Err(CostGraphError::UnknownNode(src));
    }
    if !adjacency.contains(dst) {
        return Err(CostGraphError::UnknownNode(dst));
    }
    if !adjacency.is_live(src) || !adjacency.is_live(dst) {
        return Err(reject("both nodes must be live"));
    }
    if !adjacency.parents(dst).contains(&src) {
        return Err(reject("source is not a parent of destination"));
    }
    let edge = snapshot.edge_costs.get(&(src, dst)).ok_or_else(|| reject("no cost matrix for edge"))?;

    // 1. Merge map: cheapest destination strategy per source strategy.
    let merge_map = (0..edge.rows())
        .map(|i| edge.argmin_row(i).ok_or_else(|| reject("destination has no strategies")))
        .collect::<Result<Vec<_>, _>>()?;

    // 2. Extra cost: the fixed src->dst pairing plus whatever dst already carries.
    let dst_extra = snapshot.extra_node_costs.get(&dst);
    let mut src_extra = snapshot
        .extra_node_costs
        .get(&src)
        .cloned()
        .unwrap_or_else(|| vec![0.0; edge.rows()]);
    for (i, &j) in merge_map.iter().enumerate() {
        src_extra[i] += edge.row(i)[j];
        if let Some(extra) = dst_extra {
            src_extra[i] += extra[j];
        }
    }

    // 3. Re-derive dst's outgoing edges from src's point of view.
    let dst_children = adjacency.children(dst).to_vec();
    let mut derived_edges = Vec::with_capacity(dst_children.len());
    for &child in &dst_children {
        let old = snapshot.edge_cost(dst, child)?;
        let derived = CostMatrix::from_fn(edge.rows(), old.cols(), |i, c| old.row(merge_map[i])[c]);
        let merged = match snapshot.edge_costs.get(&(src, child)) {
            Some(existing) => {
                let mut sum = existing.clone();
                if !sum.accumulate(&derived) {
                    return Err(reject("existing edge to shared child has a different shape"));
                }
                sum
            }
            None => derived,
        };
        derived_edges.push((child, merged));
    }

    let absorbs_dst = adjacency.parents(dst).iter().all(|&p| p == src);

    Ok(ContractionDelta { src, dst, merge_map, src_extra, derived_edges, dst_children, absorbs_dst })
}

impl ContractionDelta {
    /// Writes the planned merge into `snapshot`.
    pub fn apply(&self, snapshot: &mut GraphSnapshot) {
        let (src, dst) = (self.src, self.dst);

        snapshot.extra_node_costs.insert(src, self.src_extra.clone());
        for (child, matrix) in &self.derived_edges {
            snapshot.edge_costs.insert((src, *child), matrix.clone());
        }

        // src takes over dst's downstream connectivity.
        snapshot.adjacency.remove_parent(dst, src);
        snapshot.adjacency.remove_child(src, dst);
        snapshot.edge_costs.remove(&(src, dst));
        for &child in &self.dst_children {
            snapshot.adjacency.link(src, child);
        }

        if self.absorbs_dst {
            for &child in &self.dst_children {
                snapshot.adjacency.remove_parent(child, dst);
                snapshot.edge_costs.remove(&(dst, child));
            }
            snapshot.adjacency.retire(dst);
        }
    }

    /// Ledger entry produced by this merge, if `dst` leaves the live graph.
    pub fn absorption(&self) -> Option<(NodeId, AbsorptionRecord)> {
        self.absorbs_dst.then(|| {
            (self.dst, AbsorptionRecord { into: self.src, merge_map: self.merge_map.clone() })
        })
    }
}

/// `(snapshot, pair) -> (snapshot', delta)`.
pub fn contract(
    mut snapshot: GraphSnapshot,
    src: NodeId,
    dst: NodeId,
) -> Result<(GraphSnapshot, ContractionDelta), CostGraphError> {
    let delta = plan(&snapshot, src, dst)?;
    delta.apply(&mut snapshot);
    Ok((snapshot, delta))
}
