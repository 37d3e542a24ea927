//! Warehouse-to-client reachability under the battery constraint.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::domain::VertexId;
use crate::graph::Graph;
use crate::path::{EnergyBudget, ENERGY_EPSILON};

/// Outcome of a segmentation check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationReport {
    pub warehouses: usize,
    pub clients: usize,
    pub feasible_pairs: usize,
    /// (warehouse, client) pairs with no energy-feasible path.
    pub infeasible: Vec<(VertexId, VertexId)>,
}

impl SegmentationReport {
    pub fn is_valid(&self) -> bool {
        self.infeasible.is_empty()
    }

    pub fn total_pairs(&self) -> usize {
        self.warehouses * self.clients
    }
}

/// Check that every warehouse can reach every client.
///
/// One search per warehouse over (vertex, energy) states. Arriving at a
/// vertex with no more energy than an earlier arrival cannot lead anywhere
/// new, so each vertex is expanded only when its best energy improves.
pub fn validate_segmentation(graph: &Graph, budget: &EnergyBudget) -> SegmentationReport {
    let vertices = graph.vertices();
    let warehouses: Vec<VertexId> = vertices
        .iter()
        .copied()
        .filter(VertexId::is_warehouse)
        .collect();
    let clients: Vec<VertexId> = vertices
        .iter()
        .copied()
        .filter(VertexId::is_client)
        .collect();

    let mut feasible_pairs = 0;
    let mut infeasible = Vec::new();
    for &warehouse in &warehouses {
        let reached = reachable_from(graph, budget, warehouse);
        for &client in &clients {
            if reached.contains(&client) {
                feasible_pairs += 1;
            } else {
                infeasible.push((warehouse, client));
            }
        }
    }

    SegmentationReport {
        warehouses: warehouses.len(),
        clients: clients.len(),
        feasible_pairs,
        infeasible,
    }
}

/// Every vertex reachable from `origin` starting with a full battery.
pub fn reachable_from(
    graph: &Graph,
    budget: &EnergyBudget,
    origin: VertexId,
) -> HashSet<VertexId> {
    let mut best: HashMap<VertexId, f64> = HashMap::new();
    let mut reached = HashSet::new();
    if !graph.contains_vertex(origin) {
        return reached;
    }

    best.insert(origin, budget.autonomy);
    reached.insert(origin);
    let mut queue = VecDeque::from([(origin, budget.autonomy)]);

    while let Some((vertex, energy)) = queue.pop_front() {
        if best.get(&vertex).is_some_and(|&known| known > energy + ENERGY_EPSILON) {
            continue;
        }
        for neighbour in graph.neighbours(vertex) {
            let Some(left) = budget.fly(energy, neighbour.weight, neighbour.vertex) else {
                continue;
            };
            let improves = best
                .get(&neighbour.vertex)
                .map_or(true, |&known| left > known + ENERGY_EPSILON);
            if improves {
                best.insert(neighbour.vertex, left);
                reached.insert(neighbour.vertex);
                queue.push_back((neighbour.vertex, left));
            }
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn recharge_station_bridges_long_legs() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), r(1), 30.0), (r(1), c(1), 30.0)],
        )
        .unwrap();

        let report = validate_segmentation(&graph, &EnergyBudget::for_graph(&graph, 50.0));
        assert!(report.is_valid());
        assert_eq!(report.feasible_pairs, 1);

        let report = validate_segmentation(&graph, &EnergyBudget::for_graph(&graph, 20.0));
        assert_eq!(report.infeasible, vec![(w(1), c(1))]);
    }

    #[test]
    fn energy_is_not_reset_at_clients() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(1), 30.0),
                (c(1), c(2), 35.0),
                (w(2), r(1), 10.0),
                (r(1), c(2), 10.0),
            ],
        )
        .unwrap();

        let report = validate_segmentation(&graph, &EnergyBudget::for_graph(&graph, 40.0));
        assert_eq!(report.warehouses, 2);
        assert_eq!(report.clients, 2);
        assert_eq!(report.infeasible, vec![(w(1), c(2)), (w(2), c(1))]);
    }

    #[test]
    fn later_arrival_with_more_energy_is_expanded() {
        // W1 reaches C2 cheaply on 35 units, or via R1 with a full battery.
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(2), 35.0),
                (w(1), r(1), 5.0),
                (r(1), c(2), 10.0),
                (c(2), c(1), 25.0),
            ],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 40.0);
        assert!(reachable_from(&graph, &budget, w(1)).contains(&c(1)));
    }
}
