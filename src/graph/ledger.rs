//! ledger.rs
//! Which live node each absorbed node was folded into, and how to recover
//! its strategy once the live node's strategy is known.

use crate::error::CostGraphError;
use crate::store::{NodeId, StrategyIndex};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsorptionRecord {
    /// The node this one was merged into.
    pub into: NodeId,
    /// `merge_map[s]`: this node's strategy when `into` picks strategy `s`.
    pub merge_map: Vec<StrategyIndex>,
}

impl AbsorptionRecord {
    #[inline(always)]
    pub fn strategy_for(&self, into_strategy: StrategyIndex) -> Option<StrategyIndex> {
        self.merge_map.get(into_strategy).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbsorptionLedger {
    /// As recorded at merge time; may point at nodes absorbed later.
    records: BTreeMap<NodeId, AbsorptionRecord>,
    /// Path-compressed: `into` is always live, maps are composed along the chain.
    resolved: BTreeMap<NodeId, AbsorptionRecord>,
}

impl AbsorptionLedger {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn is_absorbed(&self, node: NodeId) -> bool { self.records.contains_key(&node) }

    pub fn is_resolved(&self) -> bool { self.resolved.len() == self.records.len() }

    pub fn record(&mut self, absorbed: NodeId, record: AbsorptionRecord) {
        self.records.insert(absorbed, record);
        self.resolved.clear();
    }

    /// The node `absorbed` was merged into when it left the graph.
    pub fn raw_record(&self, absorbed: NodeId) -> Option<&AbsorptionRecord> {
        self.records.get(&absorbed)
    }

    /// Compressed entry pointing straight at the live representative.
    pub fn resolved_record(&self, absorbed: NodeId) -> Option<&AbsorptionRecord> {
        self.resolved.get(&absorbed)
    }

    pub fn resolved_records(&self) -> impl Iterator<Item = (NodeId, &AbsorptionRecord)> {
        self.resolved.iter().map(|(&n, r)| (n, r))
    }

    /// Compresses every absorption chain to a single hop.
    pub fn resolve(&mut self) -> Result<(), CostGraphError> {
        let pending: Vec<NodeId> = self.records.keys().copied().collect();
        for node in pending {
            self.resolve_chain(node)?;
        }
        Ok(())
    }

    fn resolve_chain(&mut self, start: NodeId) -> Result<(), CostGraphError> {
        if self.resolved.contains_key(&start) {
            return Ok(());
        }

        // 1. Walk raw records until a live node or an already compressed entry.
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cur = start;
        let tail = loop {
            if let Some(done) = self.resolved.get(&cur) {
                break Some(done.clone());
            }
            match self.records.get(&cur) {
                None => break None,
                Some(record) => {
                    if !visited.insert(cur) {
                        return Err(CostGraphError::AbsorptionCycle(start));
                    }
                    chain.push(cur);
                    cur = record.into;
                }
            }
        };

        // 2. Compose merge maps from the representative back towards `start`.
        let (root, mut composed) = match tail {
            Some(done) => (done.into, Some(done.merge_map)),
            None => (cur, None),
        };
        for &node in chain.iter().rev() {
            let own = &self.records[&node].merge_map;
            let map: Vec<StrategyIndex> = match composed {
                Some(outer) => outer.iter().map(|&s| own[s]).collect(),
                None => own.clone(),
            };
            self.resolved.insert(node, AbsorptionRecord { into: root, merge_map: map.clone() });
            composed = Some(map);
        }
        Ok(())
    }

    /// Live node standing in for `node` (itself when it was never absorbed).
    pub fn representative(&self, node: NodeId) -> Result<NodeId, CostGraphError> {
        if let Some(record) = self.resolved.get(&node) {
            return Ok(record.into);
        }
        let mut visited = HashSet::new();
        let mut cur = node;
        while let Some(record) = self.records.get(&cur) {
            if !visited.insert(cur) {
                return Err(CostGraphError::AbsorptionCycle(node));
            }
            cur = record.into;
        }
        Ok(cur)
    }

    /// Fills in the strategy of every absorbed node from its representative's
    /// entry in `assignment` (indexed by node).
    pub fn reconstruct(&self, assignment: &[StrategyIndex]) -> Result<Vec<StrategyIndex>, CostGraphError> {
        let ledger = if self.is_resolved() {
            Cow::Borrowed(self)
        } else {
            let mut copy = self.clone();
            copy.resolve()?;
            Cow::Owned(copy)
        };

        let mut full = assignment.to_vec();
        for (&node, record) in &ledger.resolved {
            let chosen = *assignment
                .get(record.into.index())
                .ok_or(CostGraphError::UnknownNode(record.into))?;
            let slot = full.get_mut(node.index()).ok_or(CostGraphError::UnknownNode(node))?;
            *slot = record.strategy_for(chosen).ok_or_else(|| {
                CostGraphError::Assignment(format!(
                    "strategy {chosen} out of range for node {:?}",
                    record.into
                ))
            })?;
        }
        Ok(full)
    }
}
