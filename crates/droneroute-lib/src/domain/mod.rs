//! Domain entities of the delivery network.
//!
//! - [`element`] - locations (warehouses, clients, recharge stations) and vertex identities
//! - [`order`] - delivery orders and their lifecycle
//! - [`route`] - computed routes and route signatures

pub mod element;
pub mod order;
pub mod route;

pub use element::{
    Client, ElementId, ElementKind, ElementRef, RechargeStation, VertexId, Warehouse,
};
pub use order::{Order, OrderId, OrderStatus, Priority};
pub use route::{Route, RouteId, RouteSignature};
