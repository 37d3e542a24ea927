//! Identity repositories.
//!
//! A [`Repository`] holds the single authoritative instance for each key.
//! Everything else in the crate refers to entities by key and reads through
//! the owning repository, so two callers can never diverge on "the same"
//! entity. [`Repositories`] bundles the per-run stores that are not owned by
//! the [`Graph`](crate::graph::Graph).

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{
    Client, ElementId, ElementKind, ElementRef, Order, OrderId, RechargeStation, Route, RouteId,
    VertexId, Warehouse,
};
use crate::error::{Error, Result};

/// Keyed store with O(1) amortised lookup and deterministic iteration order.
///
/// Iteration follows first-insertion order; overwriting a key keeps its
/// original position. The order index is maintained on insert and remove, so
/// listing never sorts.
#[derive(Debug, Clone)]
pub struct Repository<K, V> {
    entries: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Repository<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Copy, V> Repository<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key`, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(existing) = self.entries.get_mut(&key) {
            return Some(std::mem::replace(existing, value));
        }
        self.order.push(key);
        self.entries.insert(key, value);
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        if let Some(position) = self.order.iter().position(|k| k == key) {
            self.order.remove(position);
        }
        Some(value)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        let entries = &self.entries;
        self.order
            .iter()
            .filter_map(move |key| entries.get(key).map(|value| (*key, value)))
    }

    /// Every entry in insertion order.
    pub fn all(&self) -> Vec<(K, &V)> {
        self.iter().collect()
    }

    /// Every key in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.order.clone()
    }

    /// Every value in insertion order.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Iterate without ordering guarantees.
    pub fn iter_unordered(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Per-run context holding every repository outside the graph.
#[derive(Debug, Clone, Default)]
pub struct Repositories {
    pub warehouses: Repository<ElementId, Warehouse>,
    pub clients: Repository<ElementId, Client>,
    pub recharge_stations: Repository<ElementId, RechargeStation>,
    pub orders: Repository<OrderId, Order>,
    pub routes: Repository<RouteId, Route>,
}

impl Repositories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new warehouse; the id must not be taken.
    pub fn insert_warehouse(&mut self, warehouse: Warehouse) -> Result<VertexId> {
        let id = warehouse.id;
        if self.warehouses.contains(&id) {
            return Err(Error::DuplicateIdentity {
                kind: ElementKind::Warehouse,
                id,
            });
        }
        self.warehouses.put(id, warehouse);
        Ok(VertexId::warehouse(id))
    }

    /// Register a new client; the id must not be taken.
    pub fn insert_client(&mut self, client: Client) -> Result<VertexId> {
        let id = client.id;
        if self.clients.contains(&id) {
            return Err(Error::DuplicateIdentity {
                kind: ElementKind::Client,
                id,
            });
        }
        self.clients.put(id, client);
        Ok(VertexId::client(id))
    }

    /// Register a new recharge station; the id must not be taken.
    pub fn insert_recharge_station(&mut self, station: RechargeStation) -> Result<VertexId> {
        let id = station.id;
        if self.recharge_stations.contains(&id) {
            return Err(Error::DuplicateIdentity {
                kind: ElementKind::RechargeStation,
                id,
            });
        }
        self.recharge_stations.put(id, station);
        Ok(VertexId::recharge_station(id))
    }

    /// Resolve a vertex key to the element it wraps.
    pub fn element(&self, vertex: VertexId) -> Option<ElementRef<'_>> {
        match vertex.kind {
            ElementKind::Warehouse => self.warehouses.get(&vertex.id).map(ElementRef::Warehouse),
            ElementKind::Client => self.clients.get(&vertex.id).map(ElementRef::Client),
            ElementKind::RechargeStation => self
                .recharge_stations
                .get(&vertex.id)
                .map(ElementRef::RechargeStation),
        }
    }

    /// Whether an element exists for the vertex key.
    pub fn has_element(&self, vertex: VertexId) -> bool {
        self.element(vertex).is_some()
    }

    /// Number of stored elements of the given kind.
    pub fn element_count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Warehouse => self.warehouses.len(),
            ElementKind::Client => self.clients.len(),
            ElementKind::RechargeStation => self.recharge_stations.len(),
        }
    }

    /// Drop every entity; used on reset and before a new run.
    pub fn clear(&mut self) {
        self.warehouses.clear();
        self.clients.clear();
        self.recharge_stations.clear();
        self.orders.clear();
        self.routes.clear();
    }
}
