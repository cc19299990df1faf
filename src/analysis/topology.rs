use crate::error::CostGraphError;
use crate::graph::CostGraph;
use crate::store::NodeId;
use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

/// Directed view of the live graph (edges carry no weight).
pub fn live_graph(graph: &CostGraph) -> DiGraphMap<NodeId, ()> {
    let mut view = DiGraphMap::new();
    for node in graph.live_nodes() {
        view.add_node(node);
    }
    for ((src, dst), _) in graph.edges() {
        view.add_edge(src, dst, ());
    }
    view
}

/// Topological order of the live nodes, parents first.
///
/// Solvers that sweep the graph (dynamic programming over a chain or tree)
/// consume nodes in this order.
pub fn live_order(graph: &CostGraph) -> Result<Vec<NodeId>, CostGraphError> {
    toposort(&live_graph(graph), None).map_err(|cycle| CostGraphError::CycleDetected(cycle.node_id()))
}

/// Graphviz rendering of the live graph; edges are labelled with their matrix shape.
pub fn to_dot(graph: &CostGraph) -> String {
    let mut view: DiGraph<String, String> = DiGraph::new();
    let mut index = HashMap::new();

    for node in graph.live_nodes() {
        let label = format!("{} [{}]", graph.name(node), graph.node_len(node).unwrap_or(0));
        index.insert(node, view.add_node(label));
    }
    for ((src, dst), matrix) in graph.edges() {
        if let (Some(&a), Some(&b)) = (index.get(&src), index.get(&dst)) {
            view.add_edge(a, b, format!("{}x{}", matrix.rows(), matrix.cols()));
        }
    }
    format!("{}", Dot::new(&view))
}
