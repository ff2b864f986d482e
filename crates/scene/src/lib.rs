//! Scene model and motion engine for the warehouse fulfillment viewer.
//!
//! Everything here is pure: grid-to-pixel mapping, waypoint interpolation and
//! the mutable scene aggregate with its merge rules. No drawing, no I/O and no
//! clocks — the viewer binary supplies all three, which keeps every invariant
//! in this crate testable with plain unit tests.

pub mod grid;
pub mod interp;
pub mod model;
pub mod state;

pub use grid::{GridMapper, FLOOR_LABEL_MARGIN};
pub use interp::{advance, route_position, RoutePosition};
pub use model::{
    Agent, AgentKind, Coord, OrderMetrics, Product, StatsSnapshot, TypeBreakdown, Warehouse, Zone,
};
pub use state::{Animator, SceneState, StateUpdate, ANIMATION_SPEED};
