//! Drone delivery network simulation.
//!
//! This crate generates random delivery networks of warehouses, clients and
//! recharge stations, plans energy-feasible drone routes over them with a
//! choice of graph algorithms, and ranks the routes it computes by
//! frequency. Higher-level consumers (the CLI) should drive everything
//! through [`Simulation`] or the free functions exported here instead of
//! reimplementing behavior.
//!
//! - [`graph`] - vertex/edge repositories and adjacency
//! - [`network`] - random network construction and segmentation checks
//! - [`path`] / [`routing`] - energy-aware searches and the strategy layer
//! - [`ranking`] - AVL frequency index over route signatures
//! - [`simulation`] - the run orchestrator

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod factory;
pub mod graph;
pub mod network;
pub mod output;
pub mod path;
pub mod ranking;
pub mod repository;
pub mod routing;
pub mod simulation;
pub mod spanning;

pub use config::{NetworkConfig, SimulationConfig};
pub use domain::{
    Client, ElementKind, Order, OrderId, OrderStatus, Priority, RechargeStation, Route, RouteId,
    RouteSignature, VertexId, Warehouse,
};
pub use error::{ConstructionError, Error, Result};
pub use events::{EventLog, EventRecord, SimulationEvent};
pub use factory::{CreationAudit, Factories};
pub use graph::{Edge, EdgeId, Graph, GraphMode};
pub use network::{Network, NetworkBuilder, SegmentationReport};
pub use output::{RenderMode, RouteSummary, RunSummary, Statistics};
pub use path::{EnergyBudget, PathResult, SearchLimits};
pub use ranking::{FrequencyRecord, FrequencyTree};
pub use repository::{Repositories, Repository};
pub use routing::{calculate_route, select_planner, RouteAlgorithm, RoutePlanner};
pub use simulation::{RankedRoute, SharedSimulation, Simulation};
pub use spanning::{minimum_spanning_tree, SpanningTree};
