//! Route planning strategies implementing the Strategy pattern.
//!
//! Every planner shares one contract: given a graph, two endpoints and an
//! energy budget, return a feasible path, `None` when there is none, or an
//! error when the graph is unsuitable for the algorithm.

use tracing::debug;

use crate::domain::VertexId;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path::{
    find_route_bfs, find_route_dfs, find_route_dijkstra, find_route_floyd_warshall,
    find_route_topological, insert_recharge_stops, EnergyBudget, PathResult,
};
use crate::spanning::minimum_spanning_tree;

use super::RouteAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the algorithm on the given graph.
    ///
    /// Returns `Ok(Some(path))` if a feasible route is found and `Ok(None)`
    /// otherwise.
    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>>;

    /// Whether the planner only works on directed acyclic graphs.
    fn requires_dag(&self) -> bool {
        false
    }
}

/// Breadth-first search planner; minimises the number of legs.
#[derive(Debug, Clone, Default)]
pub struct BfsPlanner;

impl RoutePlanner for BfsPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Bfs
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        Ok(find_route_bfs(graph, origin, destination, budget))
    }
}

/// Depth-first search planner.
#[derive(Debug, Clone, Default)]
pub struct DfsPlanner;

impl RoutePlanner for DfsPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dfs
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        Ok(find_route_dfs(graph, origin, destination, budget))
    }
}

/// Dijkstra planner; minimises total weight.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        Ok(find_route_dijkstra(graph, origin, destination, budget))
    }
}

/// Floyd-Warshall planner; builds the all-pairs tables on every call.
#[derive(Debug, Clone, Default)]
pub struct FloydWarshallPlanner;

impl RoutePlanner for FloydWarshallPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::FloydWarshall
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        Ok(find_route_floyd_warshall(graph, origin, destination, budget))
    }
}

/// Routes along the minimum spanning tree.
///
/// The tree path is flown as is when it fits the battery; otherwise recharge
/// stops are inserted. Tree paths that run against a directed edge, contain a
/// leg longer than the autonomy, or cannot be repaired yield no route.
#[derive(Debug, Clone, Default)]
pub struct KruskalPlanner;

impl RoutePlanner for KruskalPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Kruskal
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        let tree = minimum_spanning_tree(graph);
        let Some(tree_path) = tree.tree_path(origin, destination) else {
            return Ok(None);
        };
        if let Some(path) = budget.walk(graph, &tree_path) {
            return Ok(Some(path));
        }
        for pair in tree_path.windows(2) {
            let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
                debug!(%origin, %destination, "tree path runs against edge direction");
                return Ok(None);
            };
            if !budget.leg_fits(edge.weight) {
                debug!(
                    from = %pair[0],
                    to = %pair[1],
                    weight = edge.weight,
                    "tree leg exceeds autonomy"
                );
                return Ok(None);
            }
        }

        match insert_recharge_stops(graph, budget, &tree_path) {
            Ok(repaired) => Ok(budget.walk(graph, &repaired)),
            Err(Error::RechargeUnavailable { at }) => {
                debug!(%origin, %destination, %at, "no recharge detour fits the tree path");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Topological-order planner; directed acyclic graphs only.
#[derive(Debug, Clone, Default)]
pub struct TopologicalPlanner;

impl RoutePlanner for TopologicalPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::TopologicalSort
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: VertexId,
        destination: VertexId,
        budget: &EnergyBudget,
    ) -> Result<Option<PathResult>> {
        find_route_topological(graph, origin, destination, budget)
    }

    fn requires_dag(&self) -> bool {
        true
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Bfs => Box::new(BfsPlanner),
        RouteAlgorithm::Dfs => Box::new(DfsPlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::FloydWarshall => Box::new(FloydWarshallPlanner),
        RouteAlgorithm::Kruskal => Box::new(KruskalPlanner),
        RouteAlgorithm::TopologicalSort => Box::new(TopologicalPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::GraphMode;

    fn w(id: u32) -> VertexId {
        VertexId::warehouse(id)
    }
    fn r(id: u32) -> VertexId {
        VertexId::recharge_station(id)
    }
    fn c(id: u32) -> VertexId {
        VertexId::client(id)
    }

    #[test]
    fn select_planner_chooses_correct_type() {
        for algorithm in RouteAlgorithm::ALL {
            assert_eq!(select_planner(algorithm).algorithm(), algorithm);
        }
        assert!(select_planner(RouteAlgorithm::TopologicalSort).requires_dag());
        assert!(!select_planner(RouteAlgorithm::Bfs).requires_dag());
    }

    #[test]
    fn kruskal_repairs_tree_path_with_recharge_stop() {
        // MST: W1-C2 (30), C2-R1 (5), C2-C1 (30); W1-C1 (65) is left out.
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(2), 30.0),
                (c(2), c(1), 30.0),
                (c(2), r(1), 5.0),
                (w(1), c(1), 65.0),
            ],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 40.0);

        let path = KruskalPlanner
            .find_path(&graph, w(1), c(1), &budget)
            .unwrap()
            .expect("route");
        assert_eq!(path.vertices, vec![w(1), c(2), r(1), c(2), c(1)]);
    }

    #[test]
    fn kruskal_without_recharge_detour_has_no_route() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), c(2), 30.0), (c(2), c(1), 30.0)],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 40.0);
        let path = KruskalPlanner
            .find_path(&graph, w(1), c(1), &budget)
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn kruskal_rejects_tree_leg_longer_than_autonomy() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), r(1), 30.0), (r(1), c(1), 30.0)],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 20.0);
        let path = KruskalPlanner
            .find_path(&graph, w(1), c(1), &budget)
            .unwrap();
        assert!(path.is_none());

        let err = crate::routing::calculate_route(
            &graph,
            w(1),
            c(1),
            RouteAlgorithm::Kruskal,
            &budget,
        )
        .unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { .. }));
    }
}
