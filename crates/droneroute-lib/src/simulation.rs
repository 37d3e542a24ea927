//! The simulation orchestrator.
//!
//! A [`Simulation`] owns every per-run context object (repositories,
//! factories, frequency tree, event log) and at most one active run. Route
//! computation is split in three steps so that [`SharedSimulation`] can plan
//! without holding the write lock:
//!
//! 1. [`Simulation::planning_context`] snapshots what a search needs;
//! 2. [`PlanningContext::plan`] runs the search;
//! 3. [`Simulation::record_route`] stores the result, unless the run was
//!    replaced in the meantime.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::config::SimulationConfig;
use crate::domain::{
    ElementKind, Order, OrderId, OrderStatus, Priority, Route, RouteId, RouteSignature, VertexId,
};
use crate::error::{Error, Result};
use crate::events::{EventLog, SimulationEvent};
use crate::factory::{CreationAudit, Factories, RouteDraft};
use crate::graph::{EdgeId, Graph};
use crate::network::{Network, NetworkBuilder};
use crate::output::{RunSummary, Statistics};
use crate::path::{EnergyBudget, PathResult};
use crate::ranking::FrequencyTree;
use crate::repository::Repositories;
use crate::routing::{calculate_route, RouteAlgorithm};
use crate::spanning::{minimum_spanning_tree, SpanningTree};

/// The network and bookkeeping of the active run.
#[derive(Debug, Clone)]
pub struct RunState {
    pub run_id: u64,
    pub graph: Arc<Graph>,
    pub skeleton: Graph,
    pub warehouses: Vec<VertexId>,
    pub clients: Vec<VertexId>,
    pub recharge_stations: Vec<VertexId>,
    pub budget: Arc<EnergyBudget>,
    /// Network construction attempts this run needed.
    pub attempts: usize,
    pub draws: usize,
    pub started_at: DateTime<Utc>,
}

/// Snapshot needed to plan one route without touching the simulation.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    pub run_id: u64,
    pub order: OrderId,
    pub origin: VertexId,
    pub destination: VertexId,
    pub algorithm: RouteAlgorithm,
    pub graph: Arc<Graph>,
    pub budget: Arc<EnergyBudget>,
}

impl PlanningContext {
    /// Run the search. Takes no lock.
    pub fn plan(&self) -> Result<PlannedRoute> {
        let started = Instant::now();
        let path = calculate_route(
            &self.graph,
            self.origin,
            self.destination,
            self.algorithm,
            &self.budget,
        )?;
        let latency_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        Ok(PlannedRoute {
            context: self.clone(),
            path,
            latency_micros,
        })
    }
}

/// A search result waiting to be recorded.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub context: PlanningContext,
    pub path: PathResult,
    pub latency_micros: u64,
}

/// A stored route and how often its signature was computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRoute<'a> {
    pub route: &'a Route,
    pub count: u64,
}

/// Single-run drone delivery simulation.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    rng: StdRng,
    repositories: Repositories,
    factories: Factories,
    frequency: FrequencyTree,
    route_by_signature: HashMap<RouteSignature, RouteId>,
    events: EventLog,
    run: Option<RunState>,
    next_run_id: u64,
}

impl Simulation {
    /// Create an idle simulation. The configuration is validated.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            events: EventLog::new(config.event_capacity),
            config,
            rng,
            repositories: Repositories::new(),
            factories: Factories::new(),
            frequency: FrequencyTree::new(),
            route_by_signature: HashMap::new(),
            run: None,
            next_run_id: 1,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Graph of the active run.
    pub fn graph(&self) -> Option<&Graph> {
        self.run.as_ref().map(|run| run.graph.as_ref())
    }

    pub fn frequency(&self) -> &FrequencyTree {
        &self.frequency
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Constructions rejected during the current run.
    pub fn audit(&self) -> &CreationAudit {
        &self.factories.audit
    }

    fn active_run(&self) -> Result<&RunState> {
        self.run.as_ref().ok_or(Error::NoActiveRun)
    }

    fn current_run_id(&self) -> Option<u64> {
        self.run.as_ref().map(|run| run.run_id)
    }

    /// Start a new run: build a network and generate orders.
    ///
    /// Any previous run is discarded first. Network construction is retried
    /// with fresh randomness up to `max_build_attempts` times; size errors
    /// that no retry can fix are returned immediately.
    #[instrument(skip(self))]
    pub fn initialize(
        &mut self,
        vertex_count: usize,
        edge_count: usize,
        order_count: usize,
    ) -> Result<RunSummary> {
        self.clear_run_state();

        let (network, attempts) = self.build_network(vertex_count, edge_count)?;
        let run_id = self.next_run_id;
        self.next_run_id += 1;

        let Network {
            graph,
            skeleton,
            warehouses,
            clients,
            recharge_stations,
            draws,
            ..
        } = network;
        let budget = EnergyBudget::new(self.config.autonomy, recharge_stations.iter().copied())
            .with_limits(self.config.search);

        self.run = Some(RunState {
            run_id,
            graph: Arc::new(graph),
            skeleton,
            warehouses,
            clients,
            recharge_stations,
            budget: Arc::new(budget),
            attempts,
            draws,
            started_at: Utc::now(),
        });

        let created = self.generate_orders(order_count);
        let run = self.active_run()?;
        let event = SimulationEvent::RunStarted {
            vertices: run.graph.vertex_count(),
            edges: run.graph.edge_count(),
            orders: created,
            attempts,
        };
        self.events.emit(Some(run_id), event);
        info!(run_id, orders = created, "run initialised");

        RunSummary::from_simulation(self)
    }

    fn build_network(&mut self, vertex_count: usize, edge_count: usize) -> Result<(Network, usize)> {
        let max_attempts = self.config.max_build_attempts;
        let mut last = None;
        for attempt in 1..=max_attempts {
            let builder = NetworkBuilder::new(&self.config.network, self.config.autonomy);
            let result = builder.build(
                vertex_count,
                edge_count,
                &mut self.rng,
                &mut self.factories,
                &mut self.repositories,
            );
            match result {
                Ok(network) => return Ok((network, attempt)),
                Err(err) => {
                    self.repositories.clear();
                    self.factories.reset();
                    let retryable = matches!(
                        err,
                        Error::Disconnected { .. }
                            | Error::SegmentationInvalid { .. }
                            | Error::EdgeTargetUnreachable { .. }
                    );
                    if !retryable {
                        self.events.emit(
                            None,
                            SimulationEvent::RunFailed {
                                attempts: attempt,
                                reason: err.to_string(),
                            },
                        );
                        return Err(err);
                    }
                    self.events.emit(
                        None,
                        SimulationEvent::NetworkAttemptFailed {
                            attempt,
                            reason: err.to_string(),
                        },
                    );
                    last = Some(err);
                }
            }
        }

        let Some(last) = last else {
            return Err(Error::InvalidConfig {
                message: "max_build_attempts must be at least 1".to_string(),
            });
        };
        self.events.emit(
            None,
            SimulationEvent::RunFailed {
                attempts: max_attempts,
                reason: last.to_string(),
            },
        );
        Err(Error::NetworkBuildFailed {
            attempts: max_attempts,
            last: Box::new(last),
        })
    }

    /// Create up to `count` orders between random warehouses and clients.
    ///
    /// Rejected constructions are audited and skipped; orders already created
    /// are kept.
    fn generate_orders(&mut self, count: usize) -> usize {
        let Some(run) = self.run.as_ref() else {
            return 0;
        };
        let (warehouses, clients) = (run.warehouses.clone(), run.clients.clone());
        let run_id = run.run_id;

        let mut created = 0;
        for _ in 0..count {
            let (Some(&origin), Some(&destination), Some(&priority)) = (
                warehouses.choose(&mut self.rng),
                clients.choose(&mut self.rng),
                Priority::ALL.choose(&mut self.rng),
            ) else {
                break;
            };
            self.create_order_in_run(run_id, origin, destination, priority, &mut created);
        }
        created
    }

    fn create_order_in_run(
        &mut self,
        run_id: u64,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
        created: &mut usize,
    ) -> Option<OrderId> {
        match self
            .factories
            .create_order(origin, destination, priority, &mut self.repositories)
        {
            Some(order) => {
                *created += 1;
                self.events.emit(
                    Some(run_id),
                    SimulationEvent::OrderCreated {
                        order,
                        origin,
                        destination,
                        priority,
                    },
                );
                Some(order)
            }
            None => {
                let event = match self.factories.audit.last() {
                    Some(failure) => SimulationEvent::CreationRejected {
                        entity: failure.entity.to_string(),
                        reason: failure.reason.clone(),
                    },
                    None => SimulationEvent::CreationRejected {
                        entity: "order".to_string(),
                        reason: "unknown".to_string(),
                    },
                };
                self.events.emit(Some(run_id), event);
                None
            }
        }
    }

    /// Add an order to the active run.
    ///
    /// Returns `Ok(None)` when the order is rejected (for example an origin
    /// that is not a warehouse); the rejection is audited.
    pub fn place_order(
        &mut self,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
    ) -> Result<Option<OrderId>> {
        let run_id = self.active_run()?.run_id;
        let mut created = 0;
        Ok(self.create_order_in_run(run_id, origin, destination, priority, &mut created))
    }

    pub fn order(&self, id: OrderId) -> Result<&Order> {
        self.repositories
            .orders
            .get(&id)
            .ok_or(Error::UnknownOrder { id })
    }

    /// Orders in creation order.
    pub fn orders(&self) -> Vec<&Order> {
        self.repositories.orders.values()
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.repositories.routes.get(&id)
    }

    /// Snapshot everything needed to route `order` with `algorithm`.
    pub fn planning_context(
        &self,
        order: OrderId,
        algorithm: RouteAlgorithm,
    ) -> Result<PlanningContext> {
        let run = self.active_run()?;
        let stored = self.order(order)?;
        if stored.status == OrderStatus::Delivered {
            return Err(Error::InvalidOrderTransition {
                id: order,
                action: "re-routed",
                status: stored.status.label(),
            });
        }
        Ok(PlanningContext {
            run_id: run.run_id,
            order,
            origin: stored.origin,
            destination: stored.destination,
            algorithm,
            graph: Arc::clone(&run.graph),
            budget: Arc::clone(&run.budget),
        })
    }

    /// Store a planned route, rank it and dispatch its order.
    pub fn record_route(&mut self, planned: PlannedRoute) -> Result<Route> {
        let PlannedRoute {
            context,
            path,
            latency_micros,
        } = planned;
        let run = self.active_run()?;
        if run.run_id != context.run_id {
            return Err(Error::RunReplaced {
                expected: context.run_id,
                current: run.run_id,
            });
        }

        let mode = run.graph.mode();
        let edges: Vec<EdgeId> = path
            .vertices
            .windows(2)
            .map(|pair| EdgeId::new(mode, pair[0], pair[1]))
            .collect();
        let draft = RouteDraft {
            order: Some(context.order),
            origin: context.origin,
            destination: context.destination,
            vertices: path.vertices.clone(),
            edges,
            total_weight: path.cost,
            algorithm: context.algorithm,
            latency_micros: Some(latency_micros),
            recharge_stops: path.recharge_stops,
        };

        let Some(route_id) =
            self.factories
                .create_route(draft, self.config.max_route_weight, &mut self.repositories)
        else {
            let message = self
                .factories
                .audit
                .last()
                .map(|failure| failure.reason.clone())
                .unwrap_or_else(|| "route rejected".to_string());
            self.events.emit(
                Some(context.run_id),
                SimulationEvent::RouteFailed {
                    order: context.order,
                    algorithm: context.algorithm,
                    reason: message.clone(),
                },
            );
            return Err(Error::RouteValidation { message });
        };

        let route = self
            .repositories
            .routes
            .get(&route_id)
            .cloned()
            .ok_or_else(|| Error::RouteValidation {
                message: format!("route {route_id} vanished after creation"),
            })?;

        let order = self
            .repositories
            .orders
            .get_mut(&context.order)
            .ok_or(Error::UnknownOrder { id: context.order })?;
        let first_dispatch = order.status == OrderStatus::Pending;
        order.assign_route(route_id, route.total_weight)?;

        if first_dispatch {
            if let Some(warehouse) = self.repositories.warehouses.get_mut(&route.origin.id) {
                warehouse.dispatched_orders += 1;
            }
        }
        let inner = route.vertices.len().saturating_sub(1);
        for vertex in route.vertices.iter().take(inner).skip(1) {
            if vertex.is_recharge_station() {
                if let Some(station) = self.repositories.recharge_stations.get_mut(&vertex.id) {
                    station.recharge_stops += 1;
                }
            }
        }

        let count = self.frequency.insert(route.signature.clone());
        self.route_by_signature
            .insert(route.signature.clone(), route_id);
        debug!(route = route_id, signature = %route.signature, count, "route ranked");

        self.events.emit(
            Some(context.run_id),
            SimulationEvent::RouteComputed {
                order: context.order,
                route: route_id,
                algorithm: context.algorithm,
                weight: route.total_weight,
                recharge_stops: route.recharge_stops,
                latency_micros,
            },
        );
        Ok(route)
    }

    /// Audit a failed search.
    pub fn record_failure(&mut self, context: &PlanningContext, error: &Error) {
        self.events.emit(
            Some(context.run_id),
            SimulationEvent::RouteFailed {
                order: context.order,
                algorithm: context.algorithm,
                reason: error.to_string(),
            },
        );
    }

    /// Route an order with the named algorithm.
    ///
    /// An unknown name is [`Error::UnknownAlgorithm`]; an unreachable
    /// destination is [`Error::RouteNotFound`] and leaves the order pending.
    pub fn compute_route(&mut self, order: OrderId, algorithm_name: &str) -> Result<Route> {
        let algorithm: RouteAlgorithm = algorithm_name.parse()?;
        self.compute_route_with(order, algorithm)
    }

    pub fn compute_route_with(
        &mut self,
        order: OrderId,
        algorithm: RouteAlgorithm,
    ) -> Result<Route> {
        let context = self.planning_context(order, algorithm)?;
        match context.plan() {
            Ok(planned) => self.record_route(planned),
            Err(err) => {
                self.record_failure(&context, &err);
                Err(err)
            }
        }
    }

    /// Mark a dispatched order as delivered.
    pub fn deliver_order(&mut self, id: OrderId) -> Result<()> {
        let run_id = self.active_run()?.run_id;
        let order = self
            .repositories
            .orders
            .get_mut(&id)
            .ok_or(Error::UnknownOrder { id })?;
        order.mark_delivered(Utc::now())?;
        let client = order.destination.id;
        if let Some(client) = self.repositories.clients.get_mut(&client) {
            client.delivered_orders += 1;
        }
        self.events
            .emit(Some(run_id), SimulationEvent::OrderDelivered { order: id });
        Ok(())
    }

    /// The `top_k` most frequently computed routes, most frequent first.
    ///
    /// Each signature is represented by its most recently stored route.
    pub fn most_frequent_routes(&self, top_k: usize) -> Vec<RankedRoute<'_>> {
        self.frequency
            .top_k(top_k)
            .into_iter()
            .filter_map(|record| {
                let id = self.route_by_signature.get(&record.signature)?;
                let route = self.repositories.routes.get(id)?;
                Some(RankedRoute {
                    route,
                    count: record.count,
                })
            })
            .collect()
    }

    /// Minimum spanning tree of the active network.
    pub fn minimum_spanning_tree(&self) -> Result<SpanningTree> {
        let run = self.active_run()?;
        Ok(minimum_spanning_tree(&run.graph))
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_simulation(self)
    }

    /// Drop the active run with all its entities and rankings.
    pub fn reset(&mut self) {
        let run_id = self.current_run_id();
        self.clear_run_state();
        self.events.emit(run_id, SimulationEvent::Reset);
        info!(run_id, "simulation reset");
    }

    fn clear_run_state(&mut self) {
        self.repositories.clear();
        self.factories.reset();
        self.frequency.clear();
        self.route_by_signature.clear();
        self.run = None;
    }

    /// Count of elements of `kind` in the current run.
    pub fn element_count(&self, kind: ElementKind) -> usize {
        self.repositories.element_count(kind)
    }
}

/// A [`Simulation`] shared between threads.
///
/// Mutations take the write lock. Route searches are planned under a short
/// read lock on an `Arc` snapshot of the graph, so concurrent readers are not
/// blocked while a search runs.
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<RwLock<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(simulation)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<T>(&self, f: impl FnOnce(&Simulation) -> T) -> Result<T> {
        let guard = self.inner.read().map_err(|_| Error::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access.
    pub fn write<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> Result<T> {
        let mut guard = self.inner.write().map_err(|_| Error::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    pub fn initialize(
        &self,
        vertex_count: usize,
        edge_count: usize,
        order_count: usize,
    ) -> Result<RunSummary> {
        self.write(|sim| sim.initialize(vertex_count, edge_count, order_count))?
    }

    pub fn compute_route(&self, order: OrderId, algorithm_name: &str) -> Result<Route> {
        let algorithm: RouteAlgorithm = algorithm_name.parse()?;
        let context = self.read(|sim| sim.planning_context(order, algorithm))??;
        match context.plan() {
            Ok(planned) => self.write(|sim| sim.record_route(planned))?,
            Err(err) => {
                self.write(|sim| sim.record_failure(&context, &err))?;
                Err(err)
            }
        }
    }

    pub fn deliver_order(&self, id: OrderId) -> Result<()> {
        self.write(|sim| sim.deliver_order(id))?
    }

    /// Owned copies of the most frequent routes.
    pub fn most_frequent_routes(&self, top_k: usize) -> Result<Vec<(Route, u64)>> {
        self.read(|sim| {
            sim.most_frequent_routes(top_k)
                .into_iter()
                .map(|ranked| (ranked.route.clone(), ranked.count))
                .collect()
        })
    }

    pub fn minimum_spanning_tree(&self) -> Result<SpanningTree> {
        self.read(Simulation::minimum_spanning_tree)?
    }

    pub fn statistics(&self) -> Result<Statistics> {
        self.read(Simulation::statistics)
    }

    pub fn reset(&self) -> Result<()> {
        self.write(Simulation::reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            autonomy: 100.0,
            network: NetworkConfig {
                max_edge_weight: 9.0,
                ..NetworkConfig::default()
            },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn compute_route_dispatches_and_ranks() {
        let mut sim = Simulation::new(config(11)).unwrap();
        let summary = sim.initialize(10, 15, 4).unwrap();
        assert_eq!(summary.orders, 4);

        let route = sim.compute_route(1, "dijkstra").unwrap();
        let again = sim.compute_route(1, "dijkstra").unwrap();
        assert_eq!(route.signature, again.signature);

        let order = sim.order(1).unwrap();
        assert_eq!(order.status, OrderStatus::Dispatched);
        assert_eq!(order.route, Some(again.id));

        let top = sim.most_frequent_routes(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].route.id, again.id);
    }

    #[test]
    fn unknown_algorithm_is_a_configuration_error() {
        let mut sim = Simulation::new(config(1)).unwrap();
        sim.initialize(6, 8, 1).unwrap();
        assert!(matches!(
            sim.compute_route(1, "a-star"),
            Err(Error::UnknownAlgorithm { .. })
        ));
        assert_eq!(sim.order(1).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn delivered_orders_cannot_be_rerouted() {
        let mut sim = Simulation::new(config(2)).unwrap();
        sim.initialize(6, 8, 1).unwrap();
        sim.compute_route(1, "bfs").unwrap();
        sim.deliver_order(1).unwrap();

        assert!(matches!(
            sim.compute_route(1, "bfs"),
            Err(Error::InvalidOrderTransition { .. })
        ));
        assert!(matches!(
            sim.deliver_order(1),
            Err(Error::InvalidOrderTransition { .. })
        ));
    }

    #[test]
    fn operations_need_an_active_run() {
        let mut sim = Simulation::new(config(3)).unwrap();
        assert!(matches!(sim.minimum_spanning_tree(), Err(Error::NoActiveRun)));
        assert!(matches!(
            sim.compute_route(1, "bfs"),
            Err(Error::NoActiveRun)
        ));
    }

    #[test]
    fn reset_clears_everything() {
        let mut sim = Simulation::new(config(4)).unwrap();
        sim.initialize(8, 10, 3).unwrap();
        sim.compute_route(1, "floyd_warshall").unwrap();
        sim.reset();

        assert!(sim.run().is_none());
        assert!(sim.orders().is_empty());
        assert!(sim.frequency().is_empty());
        assert!(sim.most_frequent_routes(5).is_empty());
        assert_eq!(sim.element_count(ElementKind::Warehouse), 0);
    }

    #[test]
    fn too_small_network_fails_without_retry() {
        let mut sim = Simulation::new(config(5)).unwrap();
        assert!(matches!(
            sim.initialize(2, 1, 1),
            Err(Error::NetworkTooSmall { .. })
        ));
        assert!(sim.run().is_none());
        assert_eq!(sim.element_count(ElementKind::Client), 0);
    }

    #[test]
    fn exhausted_attempts_report_last_error() {
        let mut cfg = config(6);
        cfg.autonomy = 40.0;
        cfg.network.min_edge_weight = 40.0;
        cfg.network.max_edge_weight = 100.0;
        cfg.max_build_attempts = 2;
        // Almost every candidate edge is longer than the battery allows.
        let mut sim = Simulation::new(cfg).unwrap();
        let err = sim.initialize(10, 9, 1).unwrap_err();
        match err {
            Error::NetworkBuildFailed { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, Error::Disconnected { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(sim.run().is_none());
        let failures = sim
            .events()
            .records()
            .filter(|record| record.event.name() == "network_attempt_failed")
            .count();
        assert_eq!(failures, 2);
    }

    #[test]
    fn shared_simulation_plans_outside_the_write_lock() {
        let shared = SharedSimulation::new(Simulation::new(config(8)).unwrap());
        shared.initialize(8, 12, 2).unwrap();

        let context = shared
            .read(|sim| sim.planning_context(1, RouteAlgorithm::Bfs))
            .unwrap()
            .unwrap();
        let planned = context.plan().unwrap();

        shared.initialize(8, 12, 2).unwrap();
        let err = shared
            .write(|sim| sim.record_route(planned))
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::RunReplaced { expected: 1, current: 2 }));

        let route = shared.compute_route(1, "bfs").unwrap();
        assert_eq!(shared.most_frequent_routes(1).unwrap()[0].0, route);
    }
}
