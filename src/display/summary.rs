use crate::graph::CostGraph;
use std::fmt::Write;

/// Human-readable report of the live graph and the absorption ledger.
pub fn format_summary(graph: &CostGraph) -> String {
    let mut out = String::new();
    let live = graph.live_nodes();

    let _ = writeln!(out, "COST GRAPH ({} of {} nodes live, {} edges)", live.len(), graph.node_count(), graph.edges().len());
    let _ = writeln!(out, "--------------------------------------------------");

    for &node in &live {
        let width = graph.node_len(node).unwrap_or(0);
        let _ = write!(out, "  {} [{} strategies]", graph.name(node), width);
        if let Some(extra) = graph.extra_node_cost(node) {
            let _ = write!(out, " extra={:?}", extra);
        }
        let _ = writeln!(out);
        for &child in graph.children(node) {
            let _ = writeln!(out, "    -> {}", graph.name(child));
        }
    }

    if !graph.is_simplified() && !graph.merge_pairs().is_empty() {
        let _ = writeln!(out, "Pending merges: {}", graph.merge_pairs().len());
    }

    let ledger = graph.ledger();
    if !ledger.is_empty() {
        let _ = writeln!(out, "Absorbed:");
        for (node, record) in ledger.resolved_records() {
            let _ = writeln!(
                out,
                "  {} => {} via {:?}",
                graph.name(node),
                graph.name(record.into),
                record.merge_map
            );
        }
    }
    out
}
