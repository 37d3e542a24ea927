//! Network locations and the vertex identities that wrap them.

use std::fmt;

use serde::{Serialize, Serializer};

/// Numeric identifier of a location, unique within its kind.
pub type ElementId = u32;

/// The three kinds of location a drone can fly between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Warehouse,
    Client,
    RechargeStation,
}

impl ElementKind {
    /// Every kind, in display order.
    pub const ALL: [ElementKind; 3] = [
        ElementKind::Warehouse,
        ElementKind::Client,
        ElementKind::RechargeStation,
    ];

    /// Single-letter prefix used in vertex labels and route signatures.
    pub fn prefix(self) -> char {
        match self {
            ElementKind::Warehouse => 'W',
            ElementKind::Client => 'C',
            ElementKind::RechargeStation => 'R',
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Warehouse => "warehouse",
            ElementKind::Client => "client",
            ElementKind::RechargeStation => "recharge station",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a vertex: the kind and id of the element it wraps.
///
/// Two vertices are the same vertex iff they wrap the same kind of element
/// with the same id. Ordering is by kind, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    pub kind: ElementKind,
    pub id: ElementId,
}

impl VertexId {
    pub const fn new(kind: ElementKind, id: ElementId) -> Self {
        Self { kind, id }
    }

    pub const fn warehouse(id: ElementId) -> Self {
        Self::new(ElementKind::Warehouse, id)
    }

    pub const fn client(id: ElementId) -> Self {
        Self::new(ElementKind::Client, id)
    }

    pub const fn recharge_station(id: ElementId) -> Self {
        Self::new(ElementKind::RechargeStation, id)
    }

    pub fn is_warehouse(&self) -> bool {
        self.kind == ElementKind::Warehouse
    }

    pub fn is_client(&self) -> bool {
        self.kind == ElementKind::Client
    }

    pub fn is_recharge_station(&self) -> bool {
        self.kind == ElementKind::RechargeStation
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}

// Serialized as the compact label (`W1`, `C4`) so JSON output stays readable.
impl Serialize for VertexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A warehouse that dispatches orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warehouse {
    pub id: ElementId,
    pub name: String,
    /// Orders dispatched from this warehouse during the current run.
    pub dispatched_orders: u32,
}

/// A client that receives deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: ElementId,
    pub name: String,
    /// Orders delivered to this client during the current run.
    pub delivered_orders: u32,
}

/// A station where a drone's battery is restored to full autonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RechargeStation {
    pub id: ElementId,
    pub name: String,
    /// Routes that stopped here to recharge during the current run.
    pub recharge_stops: u32,
}

/// Borrowed view over any element kind, resolved from a [`VertexId`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Warehouse(&'a Warehouse),
    Client(&'a Client),
    RechargeStation(&'a RechargeStation),
}

impl ElementRef<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Warehouse(_) => ElementKind::Warehouse,
            ElementRef::Client(_) => ElementKind::Client,
            ElementRef::RechargeStation(_) => ElementKind::RechargeStation,
        }
    }

    pub fn id(&self) -> ElementId {
        match self {
            ElementRef::Warehouse(w) => w.id,
            ElementRef::Client(c) => c.id,
            ElementRef::RechargeStation(r) => r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ElementRef::Warehouse(w) => &w.name,
            ElementRef::Client(c) => &c.name,
            ElementRef::RechargeStation(r) => &r.name,
        }
    }

    pub fn vertex_id(&self) -> VertexId {
        VertexId::new(self.kind(), self.id())
    }
}
