//! Random delivery-network construction.
//!
//! A network is built in two stages:
//!
//! 1. a minimum-weight spanning *skeleton* chosen by union-find over randomly
//!    weighted candidate edges no heavier than the drone's autonomy;
//! 2. *growth*: further random edges until the requested edge count, with
//!    the warehouse/client segmentation re-checked as edges are added.
//!
//! While some (warehouse, client) pair is still infeasible, growth prefers
//! candidates that link an endpoint of such a pair to a recharge station.

mod segmentation;

pub use segmentation::{reachable_from, validate_segmentation, SegmentationReport};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::domain::{ElementKind, VertexId};
use crate::error::{Error, Result};
use crate::factory::Factories;
use crate::graph::{Graph, GraphMode};
use crate::path::EnergyBudget;
use crate::repository::Repositories;
use crate::spanning::kruskal_select;

/// Fewest vertices that can hold one warehouse, one station and one client.
pub const MIN_VERTICES: usize = 3;

/// A generated network and the roles of its vertices.
#[derive(Debug, Clone)]
pub struct Network {
    pub graph: Graph,
    /// The spanning skeleton the graph was grown from.
    pub skeleton: Graph,
    pub warehouses: Vec<VertexId>,
    pub clients: Vec<VertexId>,
    pub recharge_stations: Vec<VertexId>,
    /// Random candidates drawn while growing the graph.
    pub draws: usize,
    pub segmentation: SegmentationReport,
}

/// How many vertices of each kind a network gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub warehouses: usize,
    pub recharge_stations: usize,
    pub clients: usize,
}

/// Builds random networks under one configuration.
#[derive(Debug, Clone)]
pub struct NetworkBuilder<'a> {
    config: &'a NetworkConfig,
    autonomy: f64,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(config: &'a NetworkConfig, autonomy: f64) -> Self {
        Self { config, autonomy }
    }

    /// Split `vertex_count` into roles using the configured ratios.
    pub fn role_counts(&self, vertex_count: usize) -> Result<RoleCounts> {
        if vertex_count < MIN_VERTICES {
            return Err(Error::NetworkTooSmall {
                vertices: vertex_count,
                minimum: MIN_VERTICES,
            });
        }
        let share = |ratio: f64| ((vertex_count as f64 * ratio).round() as usize).max(1);
        let mut warehouses = share(self.config.warehouse_ratio);
        let mut recharge_stations = share(self.config.recharge_ratio);
        while warehouses + recharge_stations >= vertex_count {
            if warehouses >= recharge_stations && warehouses > 1 {
                warehouses -= 1;
            } else {
                recharge_stations -= 1;
            }
        }
        Ok(RoleCounts {
            warehouses,
            recharge_stations,
            clients: vertex_count - warehouses - recharge_stations,
        })
    }

    /// Inclusive range of edge counts a network of this size can have.
    ///
    /// In directed mode the skeleton is laid both ways, doubling the minimum.
    pub fn edge_bounds(&self, vertex_count: usize) -> (usize, usize) {
        let n = vertex_count;
        match self.config.mode {
            GraphMode::Undirected => (n.saturating_sub(1), n * n.saturating_sub(1) / 2),
            GraphMode::Directed => (2 * n.saturating_sub(1), n * n.saturating_sub(1)),
        }
    }

    fn check_request(&self, vertex_count: usize, edge_count: usize) -> Result<RoleCounts> {
        let roles = self.role_counts(vertex_count)?;
        if vertex_count > self.config.max_vertices {
            return Err(Error::InvalidConfig {
                message: format!(
                    "{vertex_count} vertices requested, configured maximum is {}",
                    self.config.max_vertices
                ),
            });
        }
        let (minimum, maximum) = self.edge_bounds(vertex_count);
        let maximum = maximum.min(self.config.max_edges);
        if edge_count < minimum || edge_count > maximum {
            return Err(Error::EdgeTargetInfeasible {
                requested: edge_count,
                minimum,
                maximum,
            });
        }
        Ok(roles)
    }

    /// Build a network with `vertex_count` vertices and `edge_count` edges.
    ///
    /// Elements are created through `factories` into `repositories`. The size
    /// checks happen before anything is created; a failure after that leaves
    /// the created elements in place for the caller to clear.
    pub fn build<R: Rng + ?Sized>(
        &self,
        vertex_count: usize,
        edge_count: usize,
        rng: &mut R,
        factories: &mut Factories,
        repositories: &mut Repositories,
    ) -> Result<Network> {
        let roles = self.check_request(vertex_count, edge_count)?;

        let mut slots = Vec::with_capacity(vertex_count);
        slots.extend(std::iter::repeat(ElementKind::Warehouse).take(roles.warehouses));
        slots.extend(std::iter::repeat(ElementKind::RechargeStation).take(roles.recharge_stations));
        slots.extend(std::iter::repeat(ElementKind::Client).take(roles.clients));
        slots.shuffle(rng);

        let mut vertices = Vec::with_capacity(vertex_count);
        for kind in slots {
            let vertex = factories
                .create_element(kind, repositories)?
                .ok_or_else(|| Error::InvalidConfig {
                    message: format!("could not create a {kind}"),
                })?;
            vertices.push(vertex);
        }

        let skeleton = self.skeleton(&vertices, rng)?;
        let budget = EnergyBudget::new(
            self.autonomy,
            vertices.iter().copied().filter(VertexId::is_recharge_station),
        );
        let (graph, draws, segmentation) = self.grow(&skeleton, edge_count, &budget, rng)?;

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            skeleton_edges = skeleton.edge_count(),
            draws,
            warehouses = roles.warehouses,
            recharge_stations = roles.recharge_stations,
            clients = roles.clients,
            "network built"
        );

        let of_kind = |kind: ElementKind| -> Vec<VertexId> {
            vertices.iter().copied().filter(|v| v.kind == kind).collect()
        };
        Ok(Network {
            warehouses: of_kind(ElementKind::Warehouse),
            clients: of_kind(ElementKind::Client),
            recharge_stations: of_kind(ElementKind::RechargeStation),
            graph,
            skeleton,
            draws,
            segmentation,
        })
    }

    fn random_weight<R: Rng + ?Sized>(&self, rng: &mut R, ceiling: f64) -> f64 {
        let low = self.config.min_edge_weight;
        let high = self.config.max_edge_weight.min(ceiling).max(low);
        let raw = if high > low {
            rng.gen_range(low..=high)
        } else {
            low
        };
        (raw * 100.0).round() / 100.0
    }

    /// Spanning skeleton over every vertex.
    fn skeleton<R: Rng + ?Sized>(&self, vertices: &[VertexId], rng: &mut R) -> Result<Graph> {
        let mut candidates = Vec::new();
        for (i, &u) in vertices.iter().enumerate() {
            for &v in &vertices[i + 1..] {
                let weight = self.random_weight(rng, f64::INFINITY);
                if weight <= self.autonomy {
                    candidates.push((u, v, weight));
                }
            }
        }

        let (selected, components) = kruskal_select(vertices, &candidates);
        if components > 1 {
            return Err(Error::Disconnected { components });
        }

        let mut skeleton = Graph::new(self.config.mode);
        for &vertex in vertices {
            skeleton.insert_vertex(vertex);
        }
        for index in selected {
            let (u, v, weight) = candidates[index];
            skeleton.insert_edge(u, v, weight)?;
            if skeleton.is_directed() {
                skeleton.insert_edge(v, u, weight)?;
            }
        }
        debug!(
            candidates = candidates.len(),
            edges = skeleton.edge_count(),
            weight = skeleton.total_weight(),
            "skeleton selected"
        );
        Ok(skeleton)
    }

    /// Add random edges to the skeleton until `edge_count` is reached.
    fn grow<R: Rng + ?Sized>(
        &self,
        skeleton: &Graph,
        edge_count: usize,
        budget: &EnergyBudget,
        rng: &mut R,
    ) -> Result<(Graph, usize, SegmentationReport)> {
        let mut graph = skeleton.clone();
        let vertices = graph.vertices();
        let stations: Vec<VertexId> = budget.recharge.iter().copied().collect();
        let mut report = validate_segmentation(&graph, budget);

        let max_draws = self.config.draws_per_edge.saturating_mul(edge_count.max(1));
        let mut draws = 0;
        while graph.edge_count() < edge_count && draws < max_draws {
            draws += 1;

            let repair = if report.is_valid() {
                None
            } else {
                repair_candidate(&report, &stations, graph.mode(), rng)
            };
            let (u, v) = match repair {
                Some(pair) => pair,
                None => {
                    let Some(pair) = random_pair(&vertices, rng) else {
                        break;
                    };
                    pair
                }
            };
            if graph.edge_between(u, v).is_some() {
                continue;
            }

            let weight = self.random_weight(rng, self.autonomy);
            if !budget.leg_fits(weight) {
                continue;
            }
            graph.insert_edge(u, v, weight)?;

            // Adding an edge never makes a feasible pair infeasible, so the
            // check only needs to rerun while pairs are still missing.
            if !report.is_valid() {
                report = validate_segmentation(&graph, budget);
            }
        }

        if graph.edge_count() < edge_count {
            return Err(Error::EdgeTargetUnreachable {
                requested: edge_count,
                reached: graph.edge_count(),
                draws,
            });
        }
        let report = validate_segmentation(&graph, budget);
        if !report.is_valid() {
            return Err(Error::SegmentationInvalid {
                infeasible: report.infeasible.len(),
            });
        }
        Ok((graph, draws, report))
    }
}

/// Candidate edge linking an infeasible pair's endpoint to a recharge station.
fn repair_candidate<R: Rng + ?Sized>(
    report: &SegmentationReport,
    stations: &[VertexId],
    mode: GraphMode,
    rng: &mut R,
) -> Option<(VertexId, VertexId)> {
    let &(warehouse, client) = report.infeasible.choose(rng)?;
    let &station = stations.choose(rng)?;
    // Directed edges must point along the delivery: out of the warehouse,
    // into the client.
    if rng.gen_bool(0.5) {
        Some((warehouse, station))
    } else if mode == GraphMode::Directed {
        Some((station, client))
    } else {
        Some((client, station))
    }
}

fn random_pair<R: Rng + ?Sized>(
    vertices: &[VertexId],
    rng: &mut R,
) -> Option<(VertexId, VertexId)> {
    if vertices.len() < 2 {
        return None;
    }
    let mut picked = vertices.choose_multiple(rng, 2);
    let u = *picked.next()?;
    let v = *picked.next()?;
    Some((u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(
        config: &NetworkConfig,
        autonomy: f64,
        vertices: usize,
        edges: usize,
        seed: u64,
    ) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut factories = Factories::new();
        let mut repositories = Repositories::new();
        NetworkBuilder::new(config, autonomy).build(
            vertices,
            edges,
            &mut rng,
            &mut factories,
            &mut repositories,
        )
    }

    #[test]
    fn role_counts_follow_ratios_with_minimums() {
        let config = NetworkConfig::default();
        let builder = NetworkBuilder::new(&config, 100.0);

        let roles = builder.role_counts(10).unwrap();
        assert_eq!(
            roles,
            RoleCounts {
                warehouses: 2,
                recharge_stations: 2,
                clients: 6
            }
        );

        let roles = builder.role_counts(3).unwrap();
        assert_eq!(
            roles,
            RoleCounts {
                warehouses: 1,
                recharge_stations: 1,
                clients: 1
            }
        );

        assert!(matches!(
            builder.role_counts(2),
            Err(Error::NetworkTooSmall { minimum: 3, .. })
        ));
    }

    #[test]
    fn builds_requested_size_with_valid_segmentation() {
        // Eleven legs of at most 9 stay within autonomy, so any skeleton works.
        let config = NetworkConfig {
            max_edge_weight: 9.0,
            ..NetworkConfig::default()
        };
        let network = build(&config, 100.0, 12, 20, 7).unwrap();

        assert_eq!(network.graph.vertex_count(), 12);
        assert_eq!(network.graph.edge_count(), 20);
        assert_eq!(network.skeleton.edge_count(), 11);
        assert!(network.segmentation.is_valid());
        assert!(network
            .graph
            .edges()
            .iter()
            .all(|edge| edge.weight <= 9.0));
    }

    #[test]
    fn successful_builds_always_validate() {
        let config = NetworkConfig::default();
        for seed in 0..10 {
            let Ok(network) = build(&config, 60.0, 10, 25, seed) else {
                continue;
            };
            let budget = EnergyBudget::new(60.0, network.recharge_stations.iter().copied());
            for &warehouse in &network.warehouses {
                for &client in &network.clients {
                    assert!(
                        crate::path::find_route_bfs(&network.graph, warehouse, client, &budget)
                            .is_some(),
                        "seed {seed}: {warehouse} -> {client}"
                    );
                }
            }
        }
    }

    #[test]
    fn directed_skeleton_runs_both_ways() {
        let config = NetworkConfig {
            mode: GraphMode::Directed,
            max_edge_weight: 20.0,
            ..NetworkConfig::default()
        };
        let network = build(&config, 100.0, 6, 10, 3).unwrap();
        assert_eq!(network.skeleton.edge_count(), 10);
        for edge in network.skeleton.edges() {
            assert!(network.skeleton.edge_between(edge.target, edge.source).is_some());
        }
    }

    #[test]
    fn rejects_impossible_edge_targets() {
        let config = NetworkConfig::default();
        assert!(matches!(
            build(&config, 100.0, 5, 3, 1),
            Err(Error::EdgeTargetInfeasible {
                minimum: 4,
                maximum: 10,
                ..
            })
        ));
        assert!(matches!(
            build(&config, 100.0, 5, 11, 1),
            Err(Error::EdgeTargetInfeasible { .. })
        ));
    }

    #[test]
    fn autonomy_below_every_weight_disconnects_skeleton() {
        let config = NetworkConfig {
            min_edge_weight: 50.0,
            max_edge_weight: 60.0,
            ..NetworkConfig::default()
        };
        assert!(matches!(
            build(&config, 40.0, 5, 6, 1),
            Err(Error::Disconnected { components: 5 })
        ));
    }
}
