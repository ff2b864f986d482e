//! Wire types and HTTP client for the external allocation service.
//!
//! The service computes assignments, routes and statistics; this crate only
//! describes its JSON surface and converts responses into the canonical
//! `scene` types at the boundary. Malformed or missing optional fields fall
//! back to documented defaults instead of failing — the viewer degrades
//! rather than crashes.

mod client;
mod types;

pub use client::{AllocationClient, ApiError};
pub use types::{
    AllocParams, OrderItemRequest, OrderRequest, OrderResponse, StatsResponse, WarehouseDescriptor,
};
