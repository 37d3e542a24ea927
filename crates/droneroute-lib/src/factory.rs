//! Entity factories.
//!
//! Factories allocate identities, check construction preconditions and
//! register the new entity in its repository. A failed precondition is not
//! propagated: it is recorded in the [`CreationAudit`], logged, and the
//! caller receives `None`. Invariant violations (a repository refusing a
//! duplicate identity) are still returned as errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::domain::{
    Client, ElementId, ElementKind, Order, OrderId, Priority, RechargeStation, Route, RouteId,
    RouteSignature, VertexId, Warehouse,
};
use crate::error::{ConstructionError, Result};
use crate::graph::EdgeId;
use crate::repository::Repositories;
use crate::routing::RouteAlgorithm;

/// Kind of entity a factory produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Element(ElementKind),
    Order,
    Route,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Element(kind) => write!(f, "{kind}"),
            EntityKind::Order => f.write_str("order"),
            EntityKind::Route => f.write_str("route"),
        }
    }
}

/// One rejected construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationFailure {
    pub entity: EntityKind,
    pub reason: String,
    #[serde(skip)]
    pub error: ConstructionError,
    pub at: DateTime<Utc>,
}

/// Rejected constructions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct CreationAudit {
    failures: Vec<CreationFailure>,
}

impl CreationAudit {
    pub fn record(&mut self, entity: EntityKind, error: ConstructionError) {
        warn!(%entity, reason = %error, "entity construction rejected");
        self.failures.push(CreationFailure {
            entity,
            reason: error.to_string(),
            error,
            at: Utc::now(),
        });
    }

    pub fn failures(&self) -> &[CreationFailure] {
        &self.failures
    }

    pub fn last(&self) -> Option<&CreationFailure> {
        self.failures.last()
    }

    pub fn count_for(&self, entity: EntityKind) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.entity == entity)
            .count()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }
}

/// Creates warehouses, clients or recharge stations with fresh ids.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    kind: ElementKind,
    next_id: ElementId,
}

impl ElementFactory {
    pub fn new(kind: ElementKind) -> Self {
        Self { kind, next_id: 1 }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Create an element, named after its kind and id unless `name` is given.
    pub fn create(
        &mut self,
        name: Option<&str>,
        repositories: &mut Repositories,
        audit: &mut CreationAudit,
    ) -> Result<Option<VertexId>> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                audit.record(
                    EntityKind::Element(self.kind),
                    ConstructionError::EmptyName { kind: self.kind },
                );
                return Ok(None);
            }
        }

        while repositories.has_element(VertexId::new(self.kind, self.next_id)) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.next_id += 1;

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| default_name(self.kind, id));
        let vertex = match self.kind {
            ElementKind::Warehouse => repositories.insert_warehouse(Warehouse {
                id,
                name,
                dispatched_orders: 0,
            })?,
            ElementKind::Client => repositories.insert_client(Client {
                id,
                name,
                delivered_orders: 0,
            })?,
            ElementKind::RechargeStation => {
                repositories.insert_recharge_station(RechargeStation {
                    id,
                    name,
                    recharge_stops: 0,
                })?
            }
        };
        Ok(Some(vertex))
    }

    pub fn reset(&mut self) {
        self.next_id = 1;
    }
}

fn default_name(kind: ElementKind, id: ElementId) -> String {
    let title = match kind {
        ElementKind::Warehouse => "Warehouse",
        ElementKind::Client => "Client",
        ElementKind::RechargeStation => "Recharge Station",
    };
    format!("{title} {id}")
}

/// Creates orders between existing warehouses and clients.
#[derive(Debug, Clone)]
pub struct OrderFactory {
    next_id: OrderId,
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl OrderFactory {
    pub fn create(
        &mut self,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
        created_at: DateTime<Utc>,
        repositories: &mut Repositories,
        audit: &mut CreationAudit,
    ) -> Option<OrderId> {
        for vertex in [origin, destination] {
            if !repositories.has_element(vertex) {
                audit.record(EntityKind::Order, ConstructionError::UnknownVertex { vertex });
                return None;
            }
        }

        match Order::new(self.next_id, origin, destination, priority, created_at) {
            Ok(order) => {
                let id = order.id;
                self.next_id += 1;
                repositories.orders.put(id, order);
                Some(id)
            }
            Err(error) => {
                audit.record(EntityKind::Order, error);
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.next_id = 1;
    }
}

/// Everything needed to create a [`Route`] except its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDraft {
    pub order: Option<OrderId>,
    pub origin: VertexId,
    pub destination: VertexId,
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
    pub algorithm: RouteAlgorithm,
    pub latency_micros: Option<u64>,
    pub recharge_stops: usize,
}

/// Creates validated routes.
#[derive(Debug, Clone)]
pub struct RouteFactory {
    next_id: RouteId,
}

impl Default for RouteFactory {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl RouteFactory {
    /// Build and store a route; rejected drafts are audited.
    pub fn create(
        &mut self,
        draft: RouteDraft,
        max_weight: Option<f64>,
        repositories: &mut Repositories,
        audit: &mut CreationAudit,
    ) -> Option<RouteId> {
        let route = Route {
            id: self.next_id,
            order: draft.order,
            origin: draft.origin,
            destination: draft.destination,
            signature: RouteSignature::from_vertices(&draft.vertices),
            vertices: draft.vertices,
            edges: draft.edges,
            total_weight: draft.total_weight,
            algorithm: draft.algorithm,
            latency_micros: draft.latency_micros,
            recharge_stops: draft.recharge_stops,
        };
        if let Err(error) = route.validate(max_weight) {
            audit.record(EntityKind::Route, error);
            return None;
        }

        let id = route.id;
        self.next_id += 1;
        repositories.routes.put(id, route);
        Some(id)
    }

    pub fn reset(&mut self) {
        self.next_id = 1;
    }
}

/// Every factory of a run plus their shared audit trail.
#[derive(Debug, Clone)]
pub struct Factories {
    pub warehouses: ElementFactory,
    pub clients: ElementFactory,
    pub recharge_stations: ElementFactory,
    pub orders: OrderFactory,
    pub routes: RouteFactory,
    pub audit: CreationAudit,
}

impl Default for Factories {
    fn default() -> Self {
        Self {
            warehouses: ElementFactory::new(ElementKind::Warehouse),
            clients: ElementFactory::new(ElementKind::Client),
            recharge_stations: ElementFactory::new(ElementKind::RechargeStation),
            orders: OrderFactory::default(),
            routes: RouteFactory::default(),
            audit: CreationAudit::default(),
        }
    }
}

impl Factories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element of `kind` with a default name.
    pub fn create_element(
        &mut self,
        kind: ElementKind,
        repositories: &mut Repositories,
    ) -> Result<Option<VertexId>> {
        let factory = match kind {
            ElementKind::Warehouse => &mut self.warehouses,
            ElementKind::Client => &mut self.clients,
            ElementKind::RechargeStation => &mut self.recharge_stations,
        };
        factory.create(None, repositories, &mut self.audit)
    }

    pub fn create_order(
        &mut self,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
        repositories: &mut Repositories,
    ) -> Option<OrderId> {
        self.orders.create(
            origin,
            destination,
            priority,
            Utc::now(),
            repositories,
            &mut self.audit,
        )
    }

    pub fn create_route(
        &mut self,
        draft: RouteDraft,
        max_weight: Option<f64>,
        repositories: &mut Repositories,
    ) -> Option<RouteId> {
        self.routes
            .create(draft, max_weight, repositories, &mut self.audit)
    }

    /// Restart every id sequence and forget the audit trail.
    pub fn reset(&mut self) {
        self.warehouses.reset();
        self.clients.reset();
        self.recharge_stations.reset();
        self.orders.reset();
        self.routes.reset();
        self.audit.clear();
    }
}
