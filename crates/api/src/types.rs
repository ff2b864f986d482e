//! JSON shapes of the allocation service, with conversions into `scene`
//! types. Field sets mirror the service exactly; optional blocks default
//! rather than fail.

use scene::{Agent, AgentKind, Coord, OrderMetrics, Product, StatsSnapshot, StateUpdate, Warehouse, Zone};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Fallback layout used when the warehouse descriptor is incomplete.
const DEFAULT_WIDTH: u32 = 10;
const DEFAULT_HEIGHT: u32 = 8;

/// `GET /api/warehouse` response.
#[derive(Debug, Default, Deserialize)]
pub struct WarehouseDescriptor {
    #[serde(default)]
    dimensions: Option<Dimensions>,
    #[serde(default)]
    zones: BTreeMap<String, ZoneDescriptor>,
    #[serde(default)]
    entry_point: Option<Coord>,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ZoneDescriptor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    coords: Vec<Coord>,
}

impl From<WarehouseDescriptor> for Warehouse {
    fn from(descriptor: WarehouseDescriptor) -> Self {
        let (width, height) = match descriptor.dimensions {
            Some(d) => (
                d.width.unwrap_or(DEFAULT_WIDTH),
                d.height.unwrap_or(DEFAULT_HEIGHT),
            ),
            None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        };
        let zones = descriptor
            .zones
            .into_iter()
            .map(|(id, z)| {
                let name = z.name.unwrap_or_else(|| id.clone());
                (
                    id,
                    Zone {
                        name,
                        cells: z.coords,
                    },
                )
            })
            .collect();
        Warehouse {
            width,
            height,
            zones,
            entry: descriptor.entry_point.unwrap_or_default(),
        }
    }
}

/// One element of the `GET /api/products` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<Coord>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let name = record.name.unwrap_or_else(|| record.id.clone());
        Product {
            id: record.id,
            name,
            location: record.location.unwrap_or_default(),
        }
    }
}

/// One element of the `GET /api/agents` response.
#[derive(Debug, Deserialize)]
pub(crate) struct AgentRecord {
    id: String,
    #[serde(rename = "type", default)]
    kind: AgentKind,
}

impl From<AgentRecord> for Agent {
    fn from(record: AgentRecord) -> Self {
        Agent {
            id: record.id,
            kind: record.kind,
        }
    }
}

/// Allocation method selection, forwarded verbatim as query or body fields.
#[derive(Debug, Clone, Serialize)]
pub struct AllocParams {
    pub alloc: String,
    pub solver: String,
}

impl Default for AllocParams {
    fn default() -> Self {
        Self {
            alloc: "first_fit".into(),
            solver: "cbc".into(),
        }
    }
}

/// The scene-update blocks shared by the stats and order responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateBlocks {
    #[serde(default)]
    stats: Option<StatsSnapshot>,
    #[serde(default)]
    orders_metrics: Option<Vec<OrderMetrics>>,
    #[serde(default)]
    agent_positions: Option<HashMap<String, Coord>>,
    #[serde(default)]
    agent_routes: Option<HashMap<String, Vec<Coord>>>,
    #[serde(default)]
    assignment: Option<HashMap<String, Option<String>>>,
}

impl From<UpdateBlocks> for StateUpdate {
    fn from(blocks: UpdateBlocks) -> Self {
        StateUpdate {
            stats: blocks.stats,
            orders_metrics: blocks.orders_metrics,
            positions: blocks.agent_positions,
            routes: blocks.agent_routes,
            assignment: blocks.assignment,
        }
    }
}

/// `GET /api/stats` response.
#[derive(Debug, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    blocks: UpdateBlocks,
    #[serde(default)]
    pub alloc_method: Option<String>,
    /// Service-reported failure; when set, the rest of the payload is a
    /// placeholder and must not be merged.
    #[serde(default)]
    pub error: Option<String>,
}

impl StatsResponse {
    pub fn into_update(self) -> StateUpdate {
        self.blocks.into()
    }
}

/// `POST /api/orders` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    #[serde(flatten)]
    pub params: AllocParams,
    pub received_time: String,
    pub deadline: String,
    pub priority: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// `POST /api/orders` response; rejections come back with `ok = false` and
/// an error message instead of an HTTP-level failure.
#[derive(Debug, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(flatten)]
    blocks: UpdateBlocks,
    #[serde(default)]
    pub error: Option<String>,
}

impl OrderResponse {
    pub fn into_update(self) -> StateUpdate {
        self.blocks.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_descriptor_parses_pair_coords() {
        let descriptor: WarehouseDescriptor = serde_json::from_str(
            r#"{
                "dimensions": {"width": 12, "height": 5},
                "zones": {"A": {"name": "Ambient", "coords": [[1, 0], [2, 0]]}},
                "entry_point": [0, 2]
            }"#,
        )
        .unwrap();
        let warehouse: Warehouse = descriptor.into();
        assert_eq!((warehouse.width, warehouse.height), (12, 5));
        assert_eq!(warehouse.entry, Coord::new(0, 2));
        assert_eq!(warehouse.zones["A"].name, "Ambient");
        assert_eq!(warehouse.zones["A"].cells[1], Coord::new(2, 0));
    }

    #[test]
    fn warehouse_descriptor_defaults_when_empty() {
        let warehouse: Warehouse = serde_json::from_str::<WarehouseDescriptor>("{}")
            .unwrap()
            .into();
        assert_eq!((warehouse.width, warehouse.height), (10, 8));
        assert_eq!(warehouse.entry, Coord::new(0, 0));
        assert!(warehouse.zones.is_empty());
    }

    #[test]
    fn zone_name_falls_back_to_its_id() {
        let warehouse: Warehouse = serde_json::from_str::<WarehouseDescriptor>(
            r#"{"zones": {"Z": {"coords": [{"x": 1, "y": 1}]}}}"#,
        )
        .unwrap()
        .into();
        assert_eq!(warehouse.zones["Z"].name, "Z");
    }

    #[test]
    fn product_name_falls_back_to_its_id() {
        let product: Product = serde_json::from_str::<ProductRecord>(r#"{"id": "P042"}"#)
            .unwrap()
            .into();
        assert_eq!(product.name, "P042");
        assert_eq!(product.location, Coord::new(0, 0));
    }

    #[test]
    fn agent_record_tolerates_unknown_type() {
        let agent: Agent = serde_json::from_str::<AgentRecord>(
            r#"{"id": "D1", "type": "drone", "speed": 2.5}"#,
        )
        .unwrap()
        .into();
        assert_eq!(agent.kind, AgentKind::Unknown);
    }

    #[test]
    fn stats_response_splits_into_update_blocks() {
        let response: StatsResponse = serde_json::from_str(
            r#"{
                "stats": {"n_orders": 3, "n_assigned": 2, "n_unassigned": 1},
                "agent_routes": {"R1": [{"x": 0, "y": 0}, {"x": 2, "y": 0}]},
                "assignment": {"Order_001": "R1", "Order_002": null},
                "alloc_method": "first_fit"
            }"#,
        )
        .unwrap();
        assert!(response.error.is_none());
        let update = response.into_update();
        assert_eq!(update.stats.unwrap().n_orders, 3);
        assert_eq!(update.routes.unwrap()["R1"].len(), 2);
        let assignment = update.assignment.unwrap();
        assert_eq!(assignment["Order_001"].as_deref(), Some("R1"));
        assert_eq!(assignment["Order_002"], None);
    }

    #[test]
    fn order_rejection_parses_without_stats() {
        let response: OrderResponse =
            serde_json::from_str(r#"{"ok": false, "error": "at least one item required"}"#)
                .unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("at least one item required"));
        assert!(response.into_update().stats.is_none());
    }

    #[test]
    fn order_request_flattens_alloc_params() {
        let request = OrderRequest {
            params: AllocParams::default(),
            received_time: "12:00".into(),
            deadline: "18:00".into(),
            priority: "standard".into(),
            items: vec![OrderItemRequest {
                product_id: "P001".into(),
                quantity: 2,
            }],
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["alloc"], "first_fit");
        assert_eq!(body["solver"], "cbc");
        assert_eq!(body["items"][0]["quantity"], 2);
    }
}
