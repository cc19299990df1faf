// FFI Facade: The main entry point for Python.
// This file uses `pyo3` to define the `_core` Python
// module and expose the cost graph engine as Python objects.

use pyo3::prelude::*;

pub mod analysis;
pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod solver;
pub mod store;
mod bindings {
    pub mod python;
}

pub use config::CostGraphConfig;
pub use error::{CostGraphError, RegistryError};
pub use graph::{CostGraph, CostMatrix};
pub use store::{NodeId, Strategy, StrategyRegistry, StrategyVector, INFEASIBLE};

#[pyfunction]
fn rust_core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// --- Module Definition ---
/// This function defines the `_core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rust_core_version, m)?)?;
    m.add_class::<bindings::python::PyCostGraph>()?;
    Ok(())
}
