//! The mutable scene aggregate and its merge rules.
//!
//! `SceneState` has exactly one owner (the render thread); the network side
//! only ever hands over complete `StateUpdate` values, and every merge
//! replaces whole top-level fields, so a redraw can never observe a
//! half-applied update.

use crate::interp::advance;
use crate::model::{Agent, Coord, OrderMetrics, Product, StatsSnapshot, Warehouse};
use std::collections::HashMap;

/// Per-frame progress increment; one full route traversal takes the same
/// wall-clock time regardless of waypoint count.
pub const ANIMATION_SPEED: f32 = 0.0006;

/// The merge payload extracted from one allocation-service response.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub stats: Option<StatsSnapshot>,
    pub orders_metrics: Option<Vec<OrderMetrics>>,
    pub positions: Option<HashMap<String, Coord>>,
    pub routes: Option<HashMap<String, Vec<Coord>>>,
    pub assignment: Option<HashMap<String, Option<String>>>,
}

/// Everything the renderer reads: layout, reference data, routes, per-agent
/// progress and the latest statistics snapshot.
#[derive(Debug, Default)]
pub struct SceneState {
    pub warehouse: Option<Warehouse>,
    pub products: Vec<Product>,
    pub agents: Vec<Agent>,
    pub routes: HashMap<String, Vec<Coord>>,
    pub positions: HashMap<String, Coord>,
    pub assignment: HashMap<String, Option<String>>,
    /// Fractional route advancement per agent id, each in [0, 1). Owned by
    /// the animation tick; network merges only ever add zero-initialized
    /// entries for newly routed agents.
    pub progress: HashMap<String, f32>,
    pub stats: StatsSnapshot,
    pub orders_metrics: Vec<OrderMetrics>,
}

impl SceneState {
    /// Applies a periodic poll result. Every block is replaced wholesale;
    /// blocks the service omitted come back empty rather than stale.
    pub fn merge_poll(&mut self, update: StateUpdate) {
        self.stats = update.stats.unwrap_or_default();
        self.orders_metrics = update.orders_metrics.unwrap_or_default();
        self.positions = update.positions.unwrap_or_default();
        self.assignment = update.assignment.unwrap_or_default();
        self.replace_routes(update.routes.unwrap_or_default());
    }

    /// Applies an order acknowledgement. Unlike a poll, the whole merge is
    /// gated on the presence of the stats block, and an omitted route map
    /// keeps the routes currently animating.
    pub fn merge_order_ack(&mut self, update: StateUpdate) {
        let Some(stats) = update.stats else {
            return;
        };
        self.stats = stats;
        if let Some(metrics) = update.orders_metrics {
            self.orders_metrics = metrics;
        }
        self.positions = update.positions.unwrap_or_default();
        if let Some(routes) = update.routes {
            self.replace_routes(routes);
        }
    }

    /// Swaps in a new route map and zero-initializes progress for ids seen
    /// for the first time. Progress entries whose route disappeared are kept:
    /// an id missing from the agent list is never drawn, and keeping the
    /// entry lets a returning agent resume where it left off.
    fn replace_routes(&mut self, routes: HashMap<String, Vec<Coord>>) {
        self.routes = routes;
        for id in self.routes.keys() {
            self.progress.entry(id.clone()).or_insert(0.0);
        }
    }
}

/// Advances every progress entry by a fixed step each frame, wrapping mod 1.
#[derive(Debug, Clone, Copy)]
pub struct Animator {
    pub step: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            step: ANIMATION_SPEED,
        }
    }
}

impl Animator {
    pub fn tick(&self, state: &mut SceneState) {
        for progress in state.progress.values_mut() {
            *progress = advance(*progress, self.step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeBreakdown;

    fn routed(pairs: &[(&str, &[(i32, i32)])]) -> HashMap<String, Vec<Coord>> {
        pairs
            .iter()
            .map(|(id, cells)| {
                (
                    id.to_string(),
                    cells.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
                )
            })
            .collect()
    }

    fn snapshot() -> StatsSnapshot {
        let mut by_type = std::collections::BTreeMap::new();
        by_type.insert("robot".into(), TypeBreakdown { count: 2, orders: 5 });
        StatsSnapshot {
            n_orders: 7,
            n_assigned: 5,
            n_unassigned: 2,
            total_distance: 42.0,
            total_time_min: 13.5,
            total_cost_euros: 8.25,
            by_type,
        }
    }

    #[test]
    fn poll_merge_replaces_stats_exactly() {
        let mut state = SceneState::default();
        state.merge_poll(StateUpdate {
            stats: Some(snapshot()),
            ..Default::default()
        });
        assert_eq!(state.stats.n_orders, 7);
        assert_eq!(state.stats.total_cost_euros, 8.25);
        assert_eq!(state.stats.by_type["robot"].orders, 5);
    }

    #[test]
    fn poll_merge_initializes_new_progress_and_keeps_stale() {
        let mut state = SceneState::default();
        state.merge_poll(StateUpdate {
            routes: Some(routed(&[("R1", &[(0, 0), (3, 0)])])),
            ..Default::default()
        });
        state.progress.insert("R1".into(), 0.5);

        state.merge_poll(StateUpdate {
            routes: Some(routed(&[("H1", &[(0, 0)])])),
            ..Default::default()
        });

        // R1 fell out of the route map but its progress entry survives.
        assert_eq!(state.progress["R1"], 0.5);
        assert_eq!(state.progress["H1"], 0.0);
        assert!(!state.routes.contains_key("R1"));
    }

    #[test]
    fn poll_merge_with_missing_blocks_clears_them() {
        let mut state = SceneState::default();
        state.merge_poll(StateUpdate {
            stats: Some(snapshot()),
            routes: Some(routed(&[("R1", &[(0, 0)])])),
            ..Default::default()
        });
        state.merge_poll(StateUpdate::default());
        assert_eq!(state.stats.n_orders, 0);
        assert!(state.routes.is_empty());
    }

    #[test]
    fn order_ack_without_stats_changes_nothing() {
        let mut state = SceneState::default();
        state.merge_poll(StateUpdate {
            stats: Some(snapshot()),
            routes: Some(routed(&[("R1", &[(0, 0), (1, 0)])])),
            ..Default::default()
        });

        state.merge_order_ack(StateUpdate {
            routes: Some(routed(&[("R2", &[(5, 5)])])),
            ..Default::default()
        });

        assert_eq!(state.stats.n_orders, 7);
        assert!(state.routes.contains_key("R1"));
        assert!(!state.routes.contains_key("R2"));
    }

    #[test]
    fn order_ack_keeps_routes_when_omitted() {
        let mut state = SceneState::default();
        state.merge_poll(StateUpdate {
            routes: Some(routed(&[("R1", &[(0, 0), (1, 0)])])),
            ..Default::default()
        });
        state.merge_order_ack(StateUpdate {
            stats: Some(snapshot()),
            ..Default::default()
        });
        assert!(state.routes.contains_key("R1"));
        assert_eq!(state.stats.n_assigned, 5);
    }

    #[test]
    fn animator_wraps_progress() {
        let mut state = SceneState::default();
        state.progress.insert("R1".into(), 0.9996);
        let animator = Animator::default();
        animator.tick(&mut state);
        let p = state.progress["R1"];
        assert!(p < ANIMATION_SPEED, "expected wrap, got {p}");
    }
}
