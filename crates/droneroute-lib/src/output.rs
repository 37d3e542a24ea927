use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::domain::{OrderStatus, Route, VertexId};
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphMode};
use crate::path::EnergyBudget;
use crate::repository::Repositories;
use crate::routing::RouteAlgorithm;
use crate::simulation::{RankedRoute, Simulation};
use crate::spanning::SpanningTree;

/// Presentation style for the text renderings below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    PlainText,
    /// Markdown-flavoured output.
    RichText,
}

/// Overview of a freshly initialised run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub run_id: u64,
    pub mode: GraphMode,
    pub autonomy: f64,
    pub vertices: usize,
    pub edges: usize,
    pub skeleton_edges: usize,
    pub total_weight: f64,
    pub warehouses: usize,
    pub clients: usize,
    pub recharge_stations: usize,
    pub orders: usize,
    /// Construction attempts needed, including the successful one.
    pub attempts: usize,
    /// Random edge candidates drawn while growing the network.
    pub draws: usize,
}

impl RunSummary {
    /// Summarise the active run of `simulation`.
    pub fn from_simulation(simulation: &Simulation) -> Result<Self> {
        let run = simulation.run().ok_or(Error::NoActiveRun)?;
        Ok(Self {
            run_id: run.run_id,
            mode: run.graph.mode(),
            autonomy: run.budget.autonomy,
            vertices: run.graph.vertex_count(),
            edges: run.graph.edge_count(),
            skeleton_edges: run.skeleton.edge_count(),
            total_weight: round2(run.graph.total_weight()),
            warehouses: run.warehouses.len(),
            clients: run.clients.len(),
            recharge_stations: run.recharge_stations.len(),
            orders: simulation.repositories().orders.len(),
            attempts: run.attempts,
            draws: run.draws,
        })
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "Run {}: {} vertices, {} edges ({:?}, autonomy {})",
                    self.run_id, self.vertices, self.edges, self.mode, self.autonomy
                );
            }
            RenderMode::RichText => {
                let _ = writeln!(
                    buffer,
                    "**Run {}**: {} vertices, {} edges (`{:?}`, autonomy {})",
                    self.run_id, self.vertices, self.edges, self.mode, self.autonomy
                );
            }
        }
        let _ = writeln!(
            buffer,
            "  roles: {} warehouses, {} clients, {} recharge stations",
            self.warehouses, self.clients, self.recharge_stations
        );
        let _ = writeln!(
            buffer,
            "  skeleton: {} edges; total weight {:.2}",
            self.skeleton_edges, self.total_weight
        );
        let _ = writeln!(
            buffer,
            "  orders: {}; built in {} attempt(s), {} draws",
            self.orders, self.attempts, self.draws
        );
        buffer
    }
}

/// Counters describing the current state of a simulation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Statistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<u64>,
    pub vertices: usize,
    pub edges: usize,
    pub warehouses: usize,
    pub clients: usize,
    pub recharge_stations: usize,
    pub orders_by_status: BTreeMap<&'static str, usize>,
    pub routes: usize,
    pub routes_by_algorithm: BTreeMap<RouteAlgorithm, usize>,
    /// Distinct route signatures in the frequency tree.
    pub distinct_routes: usize,
    pub dispatched_from_warehouses: u64,
    pub delivered_to_clients: u64,
    pub recharge_stops: u64,
    pub creation_failures: usize,
    pub events_retained: usize,
    pub events_dropped: u64,
}

impl Statistics {
    pub fn from_simulation(simulation: &Simulation) -> Self {
        let repositories = simulation.repositories();

        let mut orders_by_status: BTreeMap<&'static str, usize> = OrderStatus::ALL
            .iter()
            .map(|status| (status.label(), 0))
            .collect();
        for order in repositories.orders.values() {
            *orders_by_status.entry(order.status.label()).or_default() += 1;
        }

        let mut routes_by_algorithm = BTreeMap::new();
        for route in repositories.routes.values() {
            *routes_by_algorithm.entry(route.algorithm).or_default() += 1;
        }

        let (vertices, edges) = simulation
            .graph()
            .map_or((0, 0), |graph| (graph.vertex_count(), graph.edge_count()));

        Self {
            run_id: simulation.run().map(|run| run.run_id),
            vertices,
            edges,
            warehouses: repositories.warehouses.len(),
            clients: repositories.clients.len(),
            recharge_stations: repositories.recharge_stations.len(),
            orders_by_status,
            routes: repositories.routes.len(),
            routes_by_algorithm,
            distinct_routes: simulation.frequency().len(),
            dispatched_from_warehouses: sum(repositories.warehouses.values(), |w| {
                w.dispatched_orders
            }),
            delivered_to_clients: sum(repositories.clients.values(), |c| c.delivered_orders),
            recharge_stops: sum(repositories.recharge_stations.values(), |s| s.recharge_stops),
            creation_failures: simulation.audit().len(),
            events_retained: simulation.events().len(),
            events_dropped: simulation.events().dropped(),
        }
    }

    pub fn render(&self) -> String {
        let mut buffer = String::new();
        match self.run_id {
            Some(run_id) => {
                let _ = writeln!(
                    buffer,
                    "Run {run_id}: {} vertices, {} edges",
                    self.vertices, self.edges
                );
            }
            None => {
                let _ = writeln!(buffer, "No active run");
            }
        }
        let _ = writeln!(
            buffer,
            "  elements: {} warehouses, {} clients, {} recharge stations",
            self.warehouses, self.clients, self.recharge_stations
        );
        let orders = self
            .orders_by_status
            .iter()
            .map(|(status, count)| format!("{count} {status}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(buffer, "  orders: {orders}");
        let _ = writeln!(
            buffer,
            "  routes: {} stored, {} distinct",
            self.routes, self.distinct_routes
        );
        for (algorithm, count) in &self.routes_by_algorithm {
            let _ = writeln!(buffer, "    {algorithm:<16} {count}");
        }
        let _ = writeln!(
            buffer,
            "  dispatched {}, delivered {}, recharge stops {}",
            self.dispatched_from_warehouses, self.delivered_to_clients, self.recharge_stops
        );
        let _ = writeln!(
            buffer,
            "  creation failures {}, events {} retained / {} dropped",
            self.creation_failures, self.events_retained, self.events_dropped
        );
        buffer
    }
}

fn sum<T>(values: Vec<&T>, count: impl Fn(&T) -> u32) -> u64 {
    values.into_iter().map(|value| u64::from(count(value))).sum()
}

/// Battery state after one step of a route.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct EnergyProjection {
    /// Weight of the leg flown to reach this step; zero at the origin.
    pub leg_weight: f64,
    /// Energy on landing, before any recharge.
    pub on_arrival: f64,
    /// Energy when leaving this step.
    pub remaining: f64,
    pub recharged: bool,
}

/// One vertex of a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub vertex: VertexId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub energy: EnergyProjection,
}

impl RouteStep {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }
}

/// Structured view of a route with names and per-step energy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub route: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,
    pub algorithm: RouteAlgorithm,
    pub hops: usize,
    pub total_weight: f64,
    pub recharge_stops: usize,
    pub autonomy: f64,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_micros: Option<u64>,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Resolve names and project the battery level along `route`.
    pub fn from_route(
        route: &Route,
        graph: &Graph,
        budget: &EnergyBudget,
        repositories: &Repositories,
    ) -> Result<Self> {
        if route.vertices.is_empty() {
            return Err(Error::RouteValidation {
                message: format!("route {} has no vertices", route.id),
            });
        }

        let mut steps = Vec::with_capacity(route.vertices.len());
        let mut remaining = budget.autonomy;
        let mut previous: Option<VertexId> = None;
        for (index, &vertex) in route.vertices.iter().enumerate() {
            let leg_weight = match previous {
                Some(from) => graph
                    .edge_between(from, vertex)
                    .map(|edge| edge.weight)
                    .ok_or_else(|| Error::RouteValidation {
                        message: format!("route {} uses missing edge {from}->{vertex}", route.id),
                    })?,
                None => 0.0,
            };
            let on_arrival = (remaining - leg_weight).max(0.0);
            let is_last = index + 1 == route.vertices.len();
            let recharged = index > 0 && !is_last && budget.is_recharge(vertex);
            remaining = if recharged { budget.autonomy } else { on_arrival };

            steps.push(RouteStep {
                index,
                vertex,
                name: repositories
                    .element(vertex)
                    .map(|element| element.name().to_string()),
                energy: EnergyProjection {
                    leg_weight,
                    on_arrival: round2(on_arrival),
                    remaining: round2(remaining),
                    recharged,
                },
            });
            previous = Some(vertex);
        }

        Ok(Self {
            route: route.id,
            order: route.order,
            algorithm: route.algorithm,
            hops: route.hop_count(),
            total_weight: route.total_weight,
            recharge_stops: route.recharge_stops,
            autonomy: budget.autonomy,
            signature: route.signature.to_string(),
            latency_micros: route.latency_micros,
            steps,
        })
    }

    /// Summarise a route of the active run of `simulation`.
    pub fn for_simulation(simulation: &Simulation, route: &Route) -> Result<Self> {
        let run = simulation.run().ok_or(Error::NoActiveRun)?;
        Self::from_route(route, &run.graph, &run.budget, simulation.repositories())
    }

    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn header(&self) -> String {
        let first = self.steps.first().map_or("<unknown>", RouteStep::display_name);
        let last = self.steps.last().map_or("<unknown>", RouteStep::display_name);
        format!(
            "{first} -> {last} ({} hops, weight {:.2}, {} recharge stops, algorithm: {})",
            self.hops, self.total_weight, self.recharge_stops, self.algorithm
        )
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Route {}: {}", self.route, self.header());
        for step in &self.steps {
            let marker = if step.energy.recharged { " [recharge]" } else { "" };
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}) leg {:.2}, battery {:.2}/{}{marker}",
                step.index,
                step.display_name(),
                step.vertex,
                step.energy.leg_weight,
                step.energy.remaining,
                self.autonomy
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**Route {}**: _{}_", self.route, self.header());
        for step in &self.steps {
            let marker = if step.energy.recharged { " ⚡" } else { "" };
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) battery {:.2}{marker}",
                step.index,
                step.display_name(),
                step.vertex,
                step.energy.remaining
            );
        }
        buffer
    }
}

/// A row of the most-frequent-routes ranking.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankingEntry {
    pub rank: usize,
    pub count: u64,
    pub route: u64,
    pub signature: String,
    pub total_weight: f64,
    pub algorithm: RouteAlgorithm,
}

impl RankingEntry {
    pub fn from_ranked(ranked: &[RankedRoute<'_>]) -> Vec<Self> {
        ranked
            .iter()
            .enumerate()
            .map(|(index, entry)| Self {
                rank: index + 1,
                count: entry.count,
                route: entry.route.id,
                signature: entry.route.signature.to_string(),
                total_weight: entry.route.total_weight,
                algorithm: entry.route.algorithm,
            })
            .collect()
    }
}

pub fn render_ranking(entries: &[RankingEntry]) -> String {
    let mut buffer = String::new();
    if entries.is_empty() {
        let _ = writeln!(buffer, "No routes computed yet");
        return buffer;
    }
    for entry in entries {
        let _ = writeln!(
            buffer,
            "{:>3}. x{:<4} {} (weight {:.2}, {})",
            entry.rank, entry.count, entry.signature, entry.total_weight, entry.algorithm
        );
    }
    buffer
}

pub fn render_spanning_tree(tree: &SpanningTree) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Minimum spanning {}: {} edges over {} vertices, total weight {:.2}",
        if tree.is_spanning() { "tree" } else { "forest" },
        tree.edges.len(),
        tree.vertex_count,
        tree.total_weight
    );
    for edge in &tree.edges {
        let _ = writeln!(
            buffer,
            "  {} - {} ({:.2})",
            edge.source, edge.target, edge.weight
        );
    }
    buffer
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RechargeStation, RouteSignature, Warehouse};
    use crate::graph::EdgeId;

    #[test]
    fn projection_resets_at_recharge_stations() {
        let (w1, r1, c1) = (
            VertexId::warehouse(1),
            VertexId::recharge_station(1),
            VertexId::client(1),
        );
        let graph =
            Graph::from_edges(GraphMode::Undirected, &[(w1, r1, 30.0), (r1, c1, 20.0)]).unwrap();
        let budget = EnergyBudget::for_graph(&graph, 50.0);
        let mut repositories = Repositories::new();
        repositories
            .insert_warehouse(Warehouse {
                id: 1,
                name: "Depot".to_string(),
                dispatched_orders: 0,
            })
            .unwrap();
        repositories
            .insert_recharge_station(RechargeStation {
                id: 1,
                name: "Pad".to_string(),
                recharge_stops: 0,
            })
            .unwrap();

        let vertices = vec![w1, r1, c1];
        let route = Route {
            id: 7,
            order: Some(3),
            origin: w1,
            destination: c1,
            edges: vec![
                EdgeId::new(GraphMode::Undirected, w1, r1),
                EdgeId::new(GraphMode::Undirected, r1, c1),
            ],
            signature: RouteSignature::from_vertices(&vertices),
            vertices,
            total_weight: 50.0,
            algorithm: RouteAlgorithm::Dijkstra,
            latency_micros: None,
            recharge_stops: 1,
        };

        let summary = RouteSummary::from_route(&route, &graph, &budget, &repositories).unwrap();
        let remaining: Vec<f64> = summary.steps.iter().map(|s| s.energy.remaining).collect();
        assert_eq!(remaining, vec![50.0, 50.0, 30.0]);
        assert_eq!(summary.steps[1].energy.on_arrival, 20.0);
        assert!(summary.steps[1].energy.recharged);
        assert_eq!(summary.steps[2].name, None);

        let text = summary.render(RenderMode::PlainText);
        assert!(text.starts_with("Route 7: Depot -> <unknown> (2 hops"));
        assert!(text.contains("Pad (R1) leg 30.00, battery 50.00/50 [recharge]"));
    }

    #[test]
    fn empty_ranking_renders_placeholder() {
        assert_eq!(render_ranking(&[]), "No routes computed yet\n");
    }
}
