//! Route planning for delivery drones.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - the fixed set of supported strategies
//! - [`RoutePlanner`] - the strategy contract every algorithm implements
//! - [`calculate_route`] - main entry point for computing one route
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in its own planner struct and selected by
//! [`select_planner`], so the orchestrator never branches on the algorithm.
//!
//! # Example
//!
//! ```
//! use droneroute_lib::{calculate_route, EnergyBudget, Graph, GraphMode, RouteAlgorithm, VertexId};
//!
//! let (w1, r1, c1) = (
//!     VertexId::warehouse(1),
//!     VertexId::recharge_station(1),
//!     VertexId::client(1),
//! );
//! let graph = Graph::from_edges(GraphMode::Undirected, &[(w1, r1, 30.0), (r1, c1, 30.0)])?;
//! let budget = EnergyBudget::for_graph(&graph, 50.0);
//! let path = calculate_route(&graph, w1, c1, RouteAlgorithm::Dijkstra, &budget)?;
//! assert_eq!(path.vertices, vec![w1, r1, c1]);
//! # Ok::<(), droneroute_lib::Error>(())
//! ```

mod planner;

pub use planner::{
    select_planner, BfsPlanner, DfsPlanner, DijkstraPlanner, FloydWarshallPlanner,
    KruskalPlanner, RoutePlanner, TopologicalPlanner,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::VertexId;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path::{EnergyBudget, PathResult};

/// Supported routing algorithms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Fewest legs, over (vertex, energy) states.
    Bfs,
    /// First feasible path found depth-first.
    Dfs,
    /// Cheapest feasible path.
    #[default]
    Dijkstra,
    /// All-pairs tables split at recharge stations.
    FloydWarshall,
    /// Path along the minimum spanning tree, repaired with recharge stops.
    Kruskal,
    /// Cheapest feasible path on a directed acyclic graph.
    TopologicalSort,
}

impl RouteAlgorithm {
    pub const ALL: [RouteAlgorithm; 6] = [
        RouteAlgorithm::Bfs,
        RouteAlgorithm::Dfs,
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::FloydWarshall,
        RouteAlgorithm::Kruskal,
        RouteAlgorithm::TopologicalSort,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            RouteAlgorithm::Bfs => "bfs",
            RouteAlgorithm::Dfs => "dfs",
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::FloydWarshall => "floyd_warshall",
            RouteAlgorithm::Kruskal => "kruskal",
            RouteAlgorithm::TopologicalSort => "topological_sort",
        }
    }

    /// Every canonical name.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|algorithm| algorithm.name()).collect()
    }
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(value: &str) -> Result<Self> {
        let normalised = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalised)
            .ok_or_else(|| Error::UnknownAlgorithm {
                name: value.to_string(),
                known: Self::names(),
            })
    }
}

/// Compute a feasible route with the requested algorithm.
///
/// Unknown endpoints are reported as [`Error::UnknownVertex`]; a reachable
/// graph with no energy-feasible path yields [`Error::RouteNotFound`].
pub fn calculate_route(
    graph: &Graph,
    origin: VertexId,
    destination: VertexId,
    algorithm: RouteAlgorithm,
    budget: &EnergyBudget,
) -> Result<PathResult> {
    for vertex in [origin, destination] {
        if !graph.contains_vertex(vertex) {
            return Err(Error::UnknownVertex { vertex });
        }
    }

    let planner = select_planner(algorithm);
    let path = planner.find_path(graph, origin, destination, budget)?;
    match path {
        Some(path) => {
            debug!(
                %algorithm,
                %origin,
                %destination,
                hops = path.hop_count(),
                cost = path.cost,
                recharge_stops = path.recharge_stops,
                "route computed"
            );
            Ok(path)
        }
        None => Err(Error::RouteNotFound {
            origin,
            destination,
            algorithm,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!(
            "floyd-warshall".parse::<RouteAlgorithm>().unwrap(),
            RouteAlgorithm::FloydWarshall
        );
        assert_eq!(
            "TOPOLOGICAL_SORT".parse::<RouteAlgorithm>().unwrap(),
            RouteAlgorithm::TopologicalSort
        );
        for algorithm in RouteAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<RouteAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        let err = "a-star".parse::<RouteAlgorithm>().unwrap_err();
        match err {
            Error::UnknownAlgorithm { name, known } => {
                assert_eq!(name, "a-star");
                assert_eq!(known.len(), 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let graph = Graph::from_edges(
            crate::graph::GraphMode::Undirected,
            &[(VertexId::warehouse(1), VertexId::client(1), 1.0)],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 10.0);
        let err = calculate_route(
            &graph,
            VertexId::warehouse(1),
            VertexId::client(7),
            RouteAlgorithm::Bfs,
            &budget,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownVertex { .. }));
    }
}
