//! Build options for the cost graph.
//!
//! # JSON Format
//! ```json
//! { "simplify": true, "infeasible_threshold": 1e12 }
//! ```

use crate::error::CostGraphError;
use crate::store::{Cost, INFEASIBLE};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGraphConfig {
    /// Record merge pairs during build so `simplify_graph` can contract them.
    #[serde(default = "default_true")]
    pub simplify: bool,
    /// Registry costs at or above this value are treated as infeasible.
    #[serde(default)]
    pub infeasible_threshold: Option<Cost>,
}

fn default_true() -> bool {
    true
}

impl Default for CostGraphConfig {
    fn default() -> Self {
        Self { simplify: true, infeasible_threshold: None }
    }
}

impl CostGraphConfig {
    pub fn from_json(json: &str) -> Result<Self, CostGraphError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CostGraphError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CostGraphError> {
        match self.infeasible_threshold {
            Some(t) if t.is_nan() || t <= 0.0 => Err(CostGraphError::Config(format!(
                "infeasible_threshold must be positive, got {t}"
            ))),
            _ => Ok(()),
        }
    }

    /// Maps a registry cost onto the engine's cost domain.
    #[inline(always)]
    pub fn normalize(&self, cost: Cost) -> Cost {
        match self.infeasible_threshold {
            Some(t) if cost >= t => INFEASIBLE,
            _ => cost,
        }
    }
}
