use crate::config::CostGraphConfig;
use crate::display::summary;
use crate::error::CostGraphError;
use crate::graph::CostGraph;
use crate::solver::SolverProblem;
use crate::store::{NodeId, StrategyRegistry};
use pyo3::prelude::*;
use pyo3::exceptions::{PyValueError, PyRuntimeError};

fn to_py_err(e: CostGraphError) -> PyErr {
    match e {
        CostGraphError::Registry(_) | CostGraphError::Config(_) | CostGraphError::Assignment(_)
        | CostGraphError::UnknownNode(_) | CostGraphError::NoSuchEdge { .. } => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

/// Python ints are unbounded; ids that do not fit a `NodeId` are rejected here.
fn node_id(idx: usize) -> PyResult<NodeId> {
    NodeId::try_new(idx).ok_or_else(|| PyValueError::new_err(format!("node id {idx} out of range")))
}

#[pyclass(name = "_CostGraph")]
#[derive(Debug, Clone)]
pub struct PyCostGraph {
    inner: CostGraph,
}

#[pymethods]
impl PyCostGraph {
    /// Builds the cost graph from a registry JSON document.
    #[new]
    #[pyo3(signature = (registry_json, config_json=None))]
    pub fn new(registry_json: &str, config_json: Option<&str>) -> PyResult<Self> {
        let registry = StrategyRegistry::from_json(registry_json)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let config = match config_json {
            Some(json) => CostGraphConfig::from_json(json).map_err(to_py_err)?,
            None => CostGraphConfig::default(),
        };
        let inner = CostGraph::build(&registry, config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    pub fn simplify(&mut self) -> PyResult<()> {
        self.inner.simplify_graph().map_err(to_py_err)
    }

    pub fn merge_node(&mut self, src: usize, dst: usize) -> PyResult<()> {
        self.inner.merge_node(node_id(src)?, node_id(dst)?).map_err(to_py_err)
    }

    /// Row-major cost matrix of the live edge `src -> dst`.
    pub fn edge_cost(&self, src: usize, dst: usize) -> PyResult<Vec<Vec<f64>>> {
        let matrix = self.inner.get_edge_cost(node_id(src)?, node_id(dst)?).map_err(to_py_err)?;
        Ok((0..matrix.rows()).map(|i| matrix.row(i).to_vec()).collect())
    }

    pub fn extra_node_cost(&self, node: usize) -> PyResult<Option<Vec<f64>>> {
        Ok(self.inner.extra_node_cost(node_id(node)?).map(|c| c.to_vec()))
    }

    pub fn live_nodes(&self) -> Vec<usize> {
        self.inner.live_nodes().into_iter().map(|id| id.index()).collect()
    }

    pub fn merge_pairs(&self) -> Vec<(usize, usize)> {
        self.inner.merge_pairs().iter().map(|(s, d)| (s.index(), d.index())).collect()
    }

    pub fn representative(&self, node: usize) -> PyResult<usize> {
        self.inner.representative(node_id(node)?).map(|id| id.index()).map_err(to_py_err)
    }

    pub fn reconstruct(&self, assignment: Vec<usize>) -> PyResult<Vec<usize>> {
        self.inner.reconstruct(&assignment).map_err(to_py_err)
    }

    pub fn assignment_cost(&self, assignment: Vec<usize>) -> PyResult<f64> {
        self.inner.assignment_cost(&assignment).map_err(to_py_err)
    }

    pub fn solver_problem_json(&self) -> PyResult<String> {
        SolverProblem::from_graph(&self.inner)
            .and_then(|p| p.to_json())
            .map_err(to_py_err)
    }

    pub fn summary(&self) -> String {
        summary::format_summary(&self.inner)
    }

    pub fn node_count(&self) -> usize { self.inner.node_count() }
}
