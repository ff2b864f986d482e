//! Canonical scene types.
//!
//! Coordinates arrive from the allocation service either as `[x, y]` pairs or
//! as `{"x": .., "y": ..}` objects depending on the endpoint; `Coord`
//! normalizes both on deserialization so nothing downstream ever branches on
//! representation.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// A single warehouse grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordRepr {
    Pair(i32, i32),
    Named { x: i32, y: i32 },
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match CoordRepr::deserialize(deserializer)? {
            CoordRepr::Pair(x, y) | CoordRepr::Named { x, y } => Coord { x, y },
        })
    }
}

/// Warehouse layout for one session. Replaced wholesale on reload, never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct Warehouse {
    /// Width in grid cells.
    pub width: u32,
    /// Height in grid cells; each row is one floor.
    pub height: u32,
    pub zones: BTreeMap<String, Zone>,
    pub entry: Coord,
}

/// A named zone occupying a set of grid cells.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub cells: Vec<Coord>,
}

/// Read-only product reference, used only for marker placement.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub location: Coord,
}

/// Agent class; governs rendering color and whether floor changes are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Robot,
    Human,
    Cart,
    #[serde(other)]
    Unknown,
}

impl AgentKind {
    /// Robots and carts stay on their floor; everything else may transit
    /// between floors on screen.
    pub fn allows_vertical_motion(self) -> bool {
        !matches!(self, AgentKind::Robot | AgentKind::Cart)
    }
}

/// A mobile agent (robot, picking cart or human picker).
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub kind: AgentKind,
}

/// Aggregate fulfillment counters, rendered exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub n_orders: u32,
    #[serde(default)]
    pub n_assigned: u32,
    #[serde(default)]
    pub n_unassigned: u32,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub total_time_min: f64,
    #[serde(default)]
    pub total_cost_euros: f64,
    #[serde(default)]
    pub by_type: BTreeMap<String, TypeBreakdown>,
}

/// Per-agent-class slice of the statistics snapshot.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TypeBreakdown {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub orders: u32,
}

/// One row of the per-order metrics table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderMetrics {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub time_min: f64,
    #[serde(default)]
    pub cost_euros: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_accepts_pair_and_named_forms() {
        let pair: Coord = serde_json::from_str("[3, 7]").unwrap();
        let named: Coord = serde_json::from_str(r#"{"x": 3, "y": 7}"#).unwrap();
        assert_eq!(pair, Coord::new(3, 7));
        assert_eq!(pair, named);
    }

    #[test]
    fn agent_kind_falls_back_to_unknown() {
        let kind: AgentKind = serde_json::from_str(r#""drone""#).unwrap();
        assert_eq!(kind, AgentKind::Unknown);
        assert!(kind.allows_vertical_motion());
    }

    #[test]
    fn floor_locked_kinds() {
        assert!(!AgentKind::Robot.allows_vertical_motion());
        assert!(!AgentKind::Cart.allows_vertical_motion());
        assert!(AgentKind::Human.allows_vertical_motion());
    }

    #[test]
    fn stats_snapshot_defaults_missing_fields() {
        let stats: StatsSnapshot = serde_json::from_str(r#"{"n_orders": 4}"#).unwrap();
        assert_eq!(stats.n_orders, 4);
        assert_eq!(stats.n_assigned, 0);
        assert_eq!(stats.total_cost_euros, 0.0);
        assert!(stats.by_type.is_empty());
    }
}
