//! Delivery orders and their lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ConstructionError, Error, Result};

use super::element::VertexId;
use super::route::RouteId;

/// Numeric identifier of an order.
pub type OrderId = u64;

/// Delivery urgency attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Dispatched,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A delivery from a warehouse to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub origin: VertexId,
    pub destination: VertexId,
    pub priority: Priority,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build a pending order, checking that it runs from a warehouse to a client.
    pub fn new(
        id: OrderId,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> std::result::Result<Self, ConstructionError> {
        if !origin.is_warehouse() {
            return Err(ConstructionError::OriginNotWarehouse { origin });
        }
        if !destination.is_client() {
            return Err(ConstructionError::DestinationNotClient { destination });
        }

        Ok(Self {
            id,
            origin,
            destination,
            priority,
            status: OrderStatus::Pending,
            route: None,
            weight: None,
            created_at,
            delivered_at: None,
        })
    }

    /// Attach a freshly computed route. Pending orders become dispatched;
    /// dispatched orders simply switch to the new route.
    pub fn assign_route(&mut self, route: RouteId, weight: f64) -> Result<()> {
        if self.status == OrderStatus::Delivered {
            return Err(Error::InvalidOrderTransition {
                id: self.id,
                action: "re-routed",
                status: self.status.label(),
            });
        }
        self.route = Some(route);
        self.weight = Some(weight);
        self.status = OrderStatus::Dispatched;
        Ok(())
    }

    /// Mark a dispatched order as delivered.
    pub fn mark_delivered(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.status != OrderStatus::Dispatched {
            return Err(Error::InvalidOrderTransition {
                id: self.id,
                action: "delivered",
                status: self.status.label(),
            });
        }
        self.status = OrderStatus::Delivered;
        self.delivered_at = Some(at);
        Ok(())
    }
}
