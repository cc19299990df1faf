//! cost_graph.rs
//! Linearizes per-strategy resharding costs into edge matrices and shrinks
//! the graph by contracting mergeable nodes.

use super::contraction::{self, GraphSnapshot};
use super::cost_matrix::CostMatrix;
use super::ledger::AbsorptionLedger;
use super::adjacency::Adjacency;
use crate::config::CostGraphConfig;
use crate::error::CostGraphError;
use crate::store::{Cost, NodeId, StrategyIndex, StrategyRegistry};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CostGraph {
    snapshot: GraphSnapshot,
    names: Vec<String>,
    /// `(src, dst)` pairs in discovery order.
    merge_pairs: Vec<(NodeId, NodeId)>,
    ledger: AbsorptionLedger,
    config: CostGraphConfig,
    simplified: bool,
}

impl CostGraph {
    pub fn new(registry: &StrategyRegistry) -> Result<Self, CostGraphError> {
        Self::build(registry, CostGraphConfig::default())
    }

    /// Builds one cost matrix per declared edge and queues merge pairs.
    pub fn build(registry: &StrategyRegistry, config: CostGraphConfig) -> Result<Self, CostGraphError> {
        config.validate()?;
        registry.validate()?;

        let count = registry.count();
        let node_lens: Vec<usize> = registry.vectors.iter().map(|v| v.len()).collect();
        let mut adjacency = Adjacency::with_nodes(count);
        let mut edge_costs = HashMap::new();
        let mut merge_pairs = Vec::new();

        for dst in registry.node_ids() {
            let vector = &registry.vectors[dst.index()];

            for (slot, &src) in vector.predecessors.iter().enumerate() {
                let matrix = CostMatrix::from_fn(node_lens[src.index()], vector.len(), |p, n| {
                    config.normalize(vector.strategies[n].resharding_costs[slot][p])
                });
                edge_costs.insert((src, dst), matrix);
            }
            adjacency.set_parents(dst, &vector.predecessors);
            adjacency.set_children(dst, &vector.successors);

            if config.simplify && vector.mergeable {
                merge_pairs.extend(vector.predecessors.iter().map(|&src| (src, dst)));
            }
        }

        tracing::info!(
            "built cost graph: {} nodes, {} edges, {} merge pairs",
            count,
            edge_costs.len(),
            merge_pairs.len(),
        );

        Ok(Self {
            snapshot: GraphSnapshot { node_lens, adjacency, edge_costs, extra_node_costs: HashMap::new() },
            names: registry.vectors.iter().map(|v| v.name.clone()).collect(),
            merge_pairs,
            ledger: AbsorptionLedger::new(),
            config,
            simplified: false,
        })
    }

    pub fn get_edge_cost(&self, src: NodeId, dst: NodeId) -> Result<&CostMatrix, CostGraphError> {
        self.snapshot.edge_cost(src, dst)
    }

    /// Contracts the live edge `src -> dst`. `src` inherits `dst`'s children;
    /// `dst` leaves the graph once `src` was its last parent.
    pub fn merge_node(&mut self, src: NodeId, dst: NodeId) -> Result<(), CostGraphError> {
        Self::contract_into(&self.names, &mut self.snapshot, &mut self.ledger, src, dst)
    }

    fn contract_into(
        names: &[String],
        snapshot: &mut GraphSnapshot,
        ledger: &mut AbsorptionLedger,
        src: NodeId,
        dst: NodeId,
    ) -> Result<(), CostGraphError> {
        let delta = contraction::plan(snapshot, src, dst)?;
        delta.apply(snapshot);

        match delta.absorption() {
            Some((absorbed, record)) => {
                tracing::debug!(
                    "merged '{}' with '{}': absorbed, merge map {:?}",
                    node_name(names, src),
                    node_name(names, absorbed),
                    record.merge_map,
                );
                ledger.record(absorbed, record);
            }
            None => tracing::warn!(
                "merged '{}' with '{}': destination keeps {} other parent(s)",
                node_name(names, src),
                node_name(names, dst),
                snapshot.adjacency.parents(dst).len(),
            ),
        }
        Ok(())
    }

    /// Applies the queued merges latest-discovered first, then compresses the
    /// absorption ledger. Repeat calls are no-ops.
    ///
    /// The replay runs on a staged copy of the graph and ledger; on error the
    /// graph is left exactly as it was before the call.
    pub fn simplify_graph(&mut self) -> Result<(), CostGraphError> {
        if !self.config.simplify || self.simplified {
            return Ok(());
        }

        let mut snapshot = self.snapshot.clone();
        let mut ledger = self.ledger.clone();

        for &(src, dst) in self.merge_pairs.iter().rev() {
            Self::contract_into(&self.names, &mut snapshot, &mut ledger, src, dst).map_err(|e| {
                tracing::warn!("simplification aborted at ({:?}, {:?}), graph left unchanged: {}", src, dst, e);
                e
            })?;
        }
        ledger.resolve()?;

        self.snapshot = snapshot;
        self.ledger = ledger;
        self.simplified = true;

        tracing::info!(
            "simplified cost graph: {} live nodes, {} edges, {} absorbed",
            self.live_node_count(),
            self.snapshot.edge_costs.len(),
            self.ledger.len(),
        );
        Ok(())
    }

    // --- Accessors ---

    pub fn config(&self) -> &CostGraphConfig { &self.config }
    pub fn snapshot(&self) -> &GraphSnapshot { &self.snapshot }
    pub fn ledger(&self) -> &AbsorptionLedger { &self.ledger }
    pub fn merge_pairs(&self) -> &[(NodeId, NodeId)] { &self.merge_pairs }
    pub fn is_simplified(&self) -> bool { self.simplified }
    pub fn node_count(&self) -> usize { self.snapshot.node_lens.len() }

    pub fn name(&self, id: NodeId) -> &str {
        node_name(&self.names, id)
    }

    pub fn node_len(&self, id: NodeId) -> Option<usize> { self.snapshot.node_len(id) }

    pub fn is_live(&self, id: NodeId) -> bool { self.snapshot.adjacency.is_live(id) }

    pub fn parents(&self, id: NodeId) -> &[NodeId] { self.snapshot.adjacency.parents(id) }

    pub fn children(&self, id: NodeId) -> &[NodeId] { self.snapshot.adjacency.children(id) }

    pub fn live_nodes(&self) -> Vec<NodeId> { self.snapshot.adjacency.live_nodes().collect() }

    pub fn live_node_count(&self) -> usize { self.snapshot.adjacency.live_nodes().count() }

    pub fn extra_node_cost(&self, id: NodeId) -> Option<&[Cost]> { self.snapshot.extra_node_cost(id) }

    /// Live edges ordered by `(src, dst)`.
    pub fn edges(&self) -> Vec<((NodeId, NodeId), &CostMatrix)> {
        let mut edges: Vec<_> = self.snapshot.edge_costs.iter().map(|(&k, m)| (k, m)).collect();
        edges.sort_by_key(|(k, _)| *k);
        edges
    }

    pub fn representative(&self, id: NodeId) -> Result<NodeId, CostGraphError> {
        if id.index() >= self.node_count() {
            return Err(CostGraphError::UnknownNode(id));
        }
        self.ledger.representative(id)
    }

    // --- Assignments ---

    /// Cost of `assignment` (one strategy per original node) on the live graph:
    /// live edges plus the extra costs carried by live nodes. Entries for
    /// absorbed nodes are ignored.
    pub fn assignment_cost(&self, assignment: &[StrategyIndex]) -> Result<Cost, CostGraphError> {
        self.check_assignment(assignment)?;
        let mut total = 0.0;
        for node in self.snapshot.adjacency.live_nodes() {
            if let Some(extra) = self.snapshot.extra_node_cost(node) {
                total += extra[assignment[node.index()]];
            }
        }
        for (&(src, dst), matrix) in &self.snapshot.edge_costs {
            total += matrix
                .get(assignment[src.index()], assignment[dst.index()])
                .ok_or(CostGraphError::NoSuchEdge { src, dst })?;
        }
        Ok(total)
    }

    /// Expands a solver result over live nodes into a full assignment.
    pub fn reconstruct(&self, assignment: &[StrategyIndex]) -> Result<Vec<StrategyIndex>, CostGraphError> {
        self.check_assignment(assignment)?;
        self.ledger.reconstruct(assignment)
    }

    fn check_assignment(&self, assignment: &[StrategyIndex]) -> Result<(), CostGraphError> {
        if assignment.len() != self.node_count() {
            return Err(CostGraphError::Assignment(format!(
                "expected {} entries, got {}",
                self.node_count(),
                assignment.len()
            )));
        }
        for node in self.snapshot.adjacency.live_nodes() {
            let chosen = assignment[node.index()];
            let len = self.snapshot.node_lens[node.index()];
            if chosen >= len {
                return Err(CostGraphError::Assignment(format!(
                    "node '{}' has {len} strategies, got index {chosen}",
                    self.name(node)
                )));
            }
        }
        Ok(())
    }
}

fn node_name(names: &[String], id: NodeId) -> &str {
    names.get(id.index()).map(|n| n.as_str()).unwrap_or("<unknown>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Strategy, StrategyVector, INFEASIBLE};
    use rstest::rstest;

    /// `costs[s]` is the cost list of strategy `s` against each predecessor.
    fn strategies(costs: Vec<Vec<Vec<Cost>>>) -> Vec<Strategy> {
        costs.into_iter().enumerate().map(|(s, c)| Strategy::new(format!("S{s}"), c)).collect()
    }

    fn leaf(n: usize) -> Vec<Strategy> {
        (0..n).map(|s| Strategy::new(format!("S{s}"), vec![])).collect()
    }

    /// Every assignment of the given node widths.
    fn assignments(lens: &[usize]) -> Vec<Vec<usize>> {
        let mut out = vec![vec![]];
        for &len in lens {
            out = out
                .into_iter()
                .flat_map(|prefix| (0..len).map(move |s| {
                    let mut next = prefix.clone();
                    next.push(s);
                    next
                }))
                .collect();
        }
        out
    }

    /// For every live assignment, the simplified accounting equals the
    /// original cost of the reconstructed full assignment.
    fn assert_cost_preserved(registry: &StrategyRegistry, graph: &CostGraph) {
        let lens: Vec<usize> = (0..graph.node_count())
            .map(|i| if graph.is_live(NodeId::new(i)) { graph.node_len(NodeId::new(i)).unwrap() } else { 1 })
            .collect();
        for assignment in assignments(&lens) {
            let full = graph.reconstruct(&assignment).unwrap();
            let simplified = graph.assignment_cost(&assignment).unwrap();
            let original = registry.assignment_cost(&full).unwrap();
            assert!((simplified - original).abs() < 1e-9, "{assignment:?}: {simplified} vs {original}");
        }
    }

    /// A -> B -> C, two strategies each; C may be merged with B.
    fn chain_registry() -> StrategyRegistry {
        let mut reg = StrategyRegistry::new();
        let a = reg.add_node("A", &[], leaf(2), false);
        let b = reg.add_node("B", &[a], strategies(vec![vec![vec![3.0, 1.0]], vec![vec![0.5, 4.0]]]), false);
        reg.add_node("C", &[b], strategies(vec![vec![vec![2.0, 6.0]], vec![vec![5.0, 1.5]]]), true);
        reg
    }

    #[test]
    fn test_build_linearizes_costs() {
        let graph = CostGraph::new(&chain_registry()).unwrap();
        let (a, b, c) = (NodeId(0), NodeId(1), NodeId(2));

        // entry (p, n) = cost strategy n of the successor declares for strategy p.
        let ab = graph.get_edge_cost(a, b).unwrap();
        assert_eq!(ab.as_slice(), &[3.0, 0.5, 1.0, 4.0]);
        assert_eq!(graph.parents(c), &[b]);
        assert_eq!(graph.children(a), &[b]);
        assert_eq!(graph.merge_pairs(), &[(b, c)]);
    }

    #[test]
    fn test_missing_edge_fails() {
        let graph = CostGraph::new(&chain_registry()).unwrap();
        let err = graph.get_edge_cost(NodeId(0), NodeId(2)).unwrap_err();
        assert_eq!(err, CostGraphError::NoSuchEdge { src: NodeId(0), dst: NodeId(2) });
    }

    #[test]
    fn test_chain_accounting_uses_merge_map_choice() {
        let registry = chain_registry();
        let mut graph = CostGraph::new(&registry).unwrap();
        graph.simplify_graph().unwrap();
        let (a, b, c) = (NodeId(0), NodeId(1), NodeId(2));

        // B->C rows: B0 -> [2.0, 5.0], B1 -> [6.0, 1.5]
        let record = graph.ledger().resolved_record(c).unwrap();
        assert_eq!(record.into, b);
        assert_eq!(record.merge_map, vec![0, 1]);
        assert_eq!(graph.extra_node_cost(b), Some(&[2.0, 1.5][..]));
        assert!(!graph.is_live(c));

        for (sa, sb) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let fixed_c = record.merge_map[sb];
            let expected = registry.vectors[1].strategies[sb].resharding_costs[0][sa]
                + registry.vectors[2].strategies[fixed_c].resharding_costs[0][sb];
            let live = graph.get_edge_cost(a, b).unwrap().get(sa, sb).unwrap()
                + graph.extra_node_cost(b).unwrap()[sb];
            assert_eq!(live, expected);
        }
        assert_cost_preserved(&registry, &graph);
    }

    #[test]
    fn test_shared_child_costs_accumulate() {
        // S feeds D1 and D2, both feed Y. D1 and D2 are merged into S by two
        // separate merges, so (S, Y) is derived twice.
        let mut reg = StrategyRegistry::new();
        let s = reg.add_node("S", &[], leaf(2), false);
        let d1 = reg.add_node("D1", &[s], strategies(vec![vec![vec![0.0, 9.0]], vec![vec![8.0, 0.0]]]), true);
        let d2 = reg.add_node("D2", &[s], strategies(vec![vec![vec![1.0, 2.0]], vec![vec![3.0, 0.0]]]), true);
        let y = reg.add_node("Y", &[d1, d2], strategies(vec![
            vec![vec![10.0, 20.0], vec![100.0, 200.0]],
            vec![vec![30.0, 40.0], vec![300.0, 400.0]],
        ]), false);

        let mut graph = CostGraph::new(&reg).unwrap();
        graph.simplify_graph().unwrap();

        // D1 map [0, 1], D2 map [0, 1]: (S, Y)[i, y] = (D1,Y)[i, y] + (D2,Y)[i, y]
        let sy = graph.get_edge_cost(s, y).unwrap();
        assert_eq!(sy.as_slice(), &[110.0, 330.0, 220.0, 440.0]);
        assert_eq!(graph.parents(y), &[s]);
        assert_eq!(graph.live_nodes(), vec![s, y]);
        assert_eq!(graph.extra_node_cost(s), Some(&[1.0, 0.0][..]));
        assert_cost_preserved(&reg, &graph);
    }

    #[test]
    fn test_diamond_accumulates_onto_existing_edge() {
        // S -> D -> Y and S -> Y directly.
        let mut reg = StrategyRegistry::new();
        let s = reg.add_node("S", &[], leaf(2), false);
        let d = reg.add_node("D", &[s], strategies(vec![vec![vec![0.0, 5.0]], vec![vec![5.0, 0.0]]]), true);
        let y = reg.add_node("Y", &[s, d], strategies(vec![
            vec![vec![1.0, 2.0], vec![10.0, 20.0]],
        ]), false);

        let mut graph = CostGraph::new(&reg).unwrap();
        graph.simplify_graph().unwrap();

        let sy = graph.get_edge_cost(s, y).unwrap();
        assert_eq!(sy.as_slice(), &[11.0, 22.0]);
        assert_eq!(graph.representative(d).unwrap(), s);
        assert_cost_preserved(&reg, &graph);
    }

    #[test]
    fn test_absorption_chain_resolves_to_live_node() {
        // C -> B -> A. A is merged into B, then B into C.
        let mut reg = StrategyRegistry::new();
        let c = reg.add_node("C", &[], leaf(2), false);
        let b = reg.add_node("B", &[c], strategies(vec![
            vec![vec![1.0, 0.0]], vec![vec![0.0, 1.0]], vec![vec![2.0, 2.0]],
        ]), true);
        let a = reg.add_node("A", &[b], strategies(vec![
            vec![vec![0.0, 7.0, 1.0]], vec![vec![4.0, 0.0, 3.0]],
        ]), true);

        let mut graph = CostGraph::new(&reg).unwrap();
        assert_eq!(graph.merge_pairs(), &[(c, b), (b, a)]);
        graph.simplify_graph().unwrap();

        let ledger = graph.ledger();
        assert_eq!(ledger.raw_record(a).unwrap().into, b);
        assert_eq!(ledger.raw_record(b).unwrap().into, c);
        assert_eq!(ledger.resolved_record(a).unwrap().into, c);
        let manual = ledger.raw_record(ledger.raw_record(a).unwrap().into).unwrap().into;
        assert_eq!(manual, graph.representative(a).unwrap());

        assert_eq!(graph.live_nodes(), vec![c]);
        assert_eq!(graph.edges().len(), 0);
        assert_cost_preserved(&reg, &graph);
    }

    #[test]
    fn test_full_absorption_cleans_adjacency() {
        // A -> B -> {C, D}; B merged into A.
        let mut reg = StrategyRegistry::new();
        let a = reg.add_node("A", &[], leaf(2), false);
        let b = reg.add_node("B", &[a], strategies(vec![vec![vec![1.0, 2.0]], vec![vec![2.0, 1.0]]]), true);
        let c = reg.add_node("C", &[b], strategies(vec![vec![vec![0.0, 1.0]]]), false);
        let d = reg.add_node("D", &[b], strategies(vec![vec![vec![4.0, 3.0]]]), false);

        let mut graph = CostGraph::new(&reg).unwrap();
        graph.simplify_graph().unwrap();

        assert!(graph.children(b).is_empty());
        assert!(graph.parents(b).is_empty());
        assert!(graph.get_edge_cost(b, c).is_err());
        assert!(graph.get_edge_cost(b, d).is_err());
        assert!(graph.get_edge_cost(a, b).is_err());
        assert_eq!(graph.children(a), &[c, d]);
        assert_eq!(graph.parents(d), &[a]);
        assert_cost_preserved(&reg, &graph);
    }

    #[test]
    fn test_mixed_tree_preserves_cost() {
        // x -> a -> b -> c, x -> d; a, b and d are mergeable.
        fn table(width: usize, pred_widths: &[usize], salt: usize) -> Vec<Strategy> {
            (0..width)
                .map(|n| {
                    let costs: Vec<Vec<Cost>> = pred_widths
                        .iter()
                        .map(|&pw| (0..pw).map(|p| ((p * 7 + n * 3 + salt) % 5) as f64).collect::<Vec<_>>())
                        .collect();
                    Strategy::new(format!("S{n}"), costs)
                })
                .collect()
        }
        let mut reg = StrategyRegistry::new();
        let x = reg.add_node("x", &[], leaf(3), false);
        let a = reg.add_node("a", &[x], table(2, &[3], 1), true);
        let b = reg.add_node("b", &[a], table(3, &[2], 2), true);
        let c = reg.add_node("c", &[b], table(2, &[3], 3), false);
        let d = reg.add_node("d", &[x], table(3, &[3], 4), true);

        let mut graph = CostGraph::new(&reg).unwrap();
        graph.simplify_graph().unwrap();

        assert_eq!(graph.live_nodes(), vec![x, c]);
        assert_eq!(graph.parents(c), &[x]);
        for node in [a, b, d] {
            assert_eq!(graph.representative(node).unwrap(), x);
        }
        assert_cost_preserved(&reg, &graph);
    }

    #[test]
    fn test_merge_pairs_restored_after_simplify() {
        let mut reg = StrategyRegistry::new();
        let a = reg.add_node("A", &[], leaf(1), false);
        let b = reg.add_node("B", &[a], strategies(vec![vec![vec![0.0]]]), true);
        let c = reg.add_node("C", &[b], strategies(vec![vec![vec![0.0]]]), true);
        let d = reg.add_node("D", &[c], strategies(vec![vec![vec![0.0]]]), true);

        let mut graph = CostGraph::new(&reg).unwrap();
        let before = graph.merge_pairs().to_vec();
        graph.simplify_graph().unwrap();

        assert_eq!(before, vec![(a, b), (b, c), (c, d)]);
        assert_eq!(graph.merge_pairs(), before.as_slice());
        assert_eq!(graph.live_nodes(), vec![a]);
        for node in [b, c, d] {
            assert_eq!(graph.representative(node).unwrap(), a);
        }

        // Second call leaves everything as it is.
        let edges_before = graph.edges().len();
        graph.simplify_graph().unwrap();
        assert_eq!(graph.edges().len(), edges_before);
    }

    #[test]
    fn test_simplify_disabled_records_nothing() {
        let config = CostGraphConfig { simplify: false, ..Default::default() };
        let mut graph = CostGraph::build(&chain_registry(), config).unwrap();
        assert!(graph.merge_pairs().is_empty());
        graph.simplify_graph().unwrap();
        assert_eq!(graph.live_node_count(), 3);
    }

    #[rstest]
    #[case(vec![INFEASIBLE, 4.0], vec![1, 1])]
    #[case(vec![INFEASIBLE, INFEASIBLE], vec![0, 1])]
    fn test_infeasible_entries_never_win(#[case] first_row: Vec<Cost>, #[case] expected_map: Vec<usize>) {
        // Row 0 of (A, B) is `first_row`; row 1 prefers column 1.
        let mut reg = StrategyRegistry::new();
        let a = reg.add_node("A", &[], leaf(2), false);
        reg.add_node("B", &[a], strategies(vec![
            vec![vec![first_row[0], 9.0]],
            vec![vec![first_row[1], 1.0]],
        ]), true);

        let mut graph = CostGraph::new(&reg).unwrap();
        graph.simplify_graph().unwrap();

        let record = graph.ledger().resolved_record(NodeId(1)).unwrap();
        let expected_extra: Vec<Cost> = vec![first_row[expected_map[0]], 1.0];
        assert_eq!(record.merge_map, expected_map);
        assert_eq!(graph.extra_node_cost(a).unwrap(), expected_extra.as_slice());
    }

    #[test]
    fn test_threshold_turns_large_costs_infeasible() {
        let mut reg = StrategyRegistry::new();
        let a = reg.add_node("A", &[], leaf(1), false);
        let b = reg.add_node("B", &[a], strategies(vec![vec![vec![1e15]], vec![vec![2.0]]]), false);
        let config = CostGraphConfig { infeasible_threshold: Some(1e12), ..Default::default() };

        let graph = CostGraph::build(&reg, config).unwrap();
        assert_eq!(graph.get_edge_cost(a, b).unwrap().as_slice(), &[INFEASIBLE, 2.0]);
    }

    #[test]
    fn test_merge_precondition_is_fatal() {
        let mut graph = CostGraph::new(&chain_registry()).unwrap();
        let err = graph.merge_node(NodeId(2), NodeId(1)).unwrap_err();
        assert!(matches!(err, CostGraphError::MergePrecondition { .. }), "{err:?}");
    }

    #[test]
    fn test_assignment_length_checked() {
        let graph = CostGraph::new(&chain_registry()).unwrap();
        assert!(matches!(graph.assignment_cost(&[0, 0]), Err(CostGraphError::Assignment(_))));
        assert!(matches!(graph.assignment_cost(&[0, 0, 5]), Err(CostGraphError::Assignment(_))));
    }

    /// M <- N <- P, listed out of topological order so the second replayed
    /// merge targets a node the first one already absorbed.
    fn reversed_chain_registry() -> StrategyRegistry {
        let vector = |name: &str, predecessors: Vec<NodeId>, successors: Vec<NodeId>, strategies, mergeable| StrategyVector {
            name: name.to_string(),
            predecessors,
            successors,
            strategies,
            mergeable,
        };
        StrategyRegistry::from_vectors(vec![
            vector("M", vec![NodeId(1)], vec![], strategies(vec![vec![vec![1.0, 2.0]], vec![vec![3.0, 0.5]]]), true),
            vector("N", vec![NodeId(2)], vec![NodeId(0)], strategies(vec![vec![vec![4.0, 1.0]], vec![vec![2.0, 2.0]]]), true),
            vector("P", vec![], vec![NodeId(1)], leaf(2), false),
        ])
    }

    #[test]
    fn test_failed_simplify_leaves_graph_untouched() {
        let (m, n, p) = (NodeId(0), NodeId(1), NodeId(2));
        let mut graph = CostGraph::new(&reversed_chain_registry()).unwrap();
        let before = graph.snapshot().clone();

        let first = graph.simplify_graph().unwrap_err();
        assert!(matches!(first, CostGraphError::MergePrecondition { src, dst, .. } if src == n && dst == m));

        assert_eq!(graph.snapshot(), &before);
        assert_eq!(graph.live_nodes(), vec![m, n, p]);
        assert!(graph.get_edge_cost(p, m).is_err());
        assert!(graph.get_edge_cost(p, n).is_ok());
        assert!(graph.get_edge_cost(n, m).is_ok());
        assert!(graph.ledger().is_empty());
        assert!(!graph.is_simplified());
        assert_eq!(graph.merge_pairs(), &[(n, m), (p, n)]);

        // A retry fails at the same pair instead of on an already-applied one.
        let second = graph.simplify_graph().unwrap_err();
        assert_eq!(second.to_string(), first.to_string());
        assert_eq!(graph.snapshot(), &before);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_representative_rejects_wide_id() {
        let mut graph = CostGraph::new(&chain_registry()).unwrap();
        graph.simplify_graph().unwrap();
        let wide = NodeId::new(1usize << 32);
        assert!(matches!(graph.representative(wide), Err(CostGraphError::UnknownNode(id)) if id == wide));
    }
}
