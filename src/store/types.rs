use serde::{Serialize, Deserialize};

/// Dense, stable identifier of a node (its position in the registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    /// Saturates at `u32::MAX`, which never names a registered node.
    pub fn new(idx: usize) -> Self { Self::try_new(idx).unwrap_or(Self(u32::MAX)) }
    pub fn try_new(idx: usize) -> Option<Self> { u32::try_from(idx).ok().map(Self) }
}

/// Position of a candidate strategy inside its node's strategy vector.
pub type StrategyIndex = usize;

/// A resharding or node cost. Non-negative; `INFEASIBLE` marks impossible pairings.
pub type Cost = f64;

pub const INFEASIBLE: Cost = f64::INFINITY;

#[inline(always)]
pub fn is_infeasible(cost: Cost) -> bool {
    cost == INFEASIBLE
}

/// One candidate execution strategy of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    /// `resharding_costs[k][p]`: penalty of choosing this strategy while the
    /// k-th predecessor chose its strategy `p`.
    #[serde(with = "cost_table")]
    pub resharding_costs: Vec<Vec<Cost>>,
}

impl Strategy {
    pub fn new(name: impl Into<String>, resharding_costs: Vec<Vec<Cost>>) -> Self {
        Self { name: name.into(), resharding_costs }
    }
}

/// All candidate strategies of one node together with its declared neighbours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyVector {
    pub name: String,
    pub predecessors: Vec<NodeId>,
    pub successors: Vec<NodeId>,
    pub strategies: Vec<Strategy>,
    /// Whether this node may be contracted with its predecessors.
    #[serde(default)]
    pub mergeable: bool,
}

impl StrategyVector {
    pub fn len(&self) -> usize { self.strategies.len() }

    pub fn is_empty(&self) -> bool { self.strategies.is_empty() }

    /// Costs declared by `strategy` against every strategy of `predecessor`.
    pub fn resharding_costs(&self, strategy: StrategyIndex, predecessor: NodeId) -> Option<&[Cost]> {
        let slot = self.predecessors.iter().position(|&p| p == predecessor)?;
        self.strategies
            .get(strategy)?
            .resharding_costs
            .get(slot)
            .map(|row| row.as_slice())
    }
}

/// JSON has no infinity, so infeasible costs travel as `null`. Only `+inf`
/// is infeasible; NaN and `-inf` have no encoding.
mod cost_table {
    use super::{Cost, INFEASIBLE};
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(table: &Vec<Vec<Cost>>, s: S) -> Result<S::Ok, S::Error> {
        let encoded = table
            .iter()
            .map(|row| row.iter().map(|&c| encode(c)).collect::<Result<Vec<_>, String>>())
            .collect::<Result<Vec<_>, String>>()
            .map_err(S::Error::custom)?;
        encoded.serialize(s)
    }

    fn encode(c: Cost) -> Result<Option<Cost>, String> {
        if c.is_finite() {
            Ok(Some(c))
        } else if c == INFEASIBLE {
            Ok(None)
        } else {
            Err(format!("cost {c} has no serialized form"))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<Cost>>, D::Error> {
        let encoded = Vec::<Vec<Option<Cost>>>::deserialize(d)?;
        Ok(encoded
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.unwrap_or(INFEASIBLE)).collect())
            .collect())
    }
}
