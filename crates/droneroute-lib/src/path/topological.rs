use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::domain::VertexId;
use crate::error::{Error, Result};
use crate::graph::{Direction, Graph};
use crate::routing::RouteAlgorithm;

use super::labels::LabelArena;
use super::{endpoints_present, EnergyBudget, PathResult};

/// Kahn ordering of a directed graph, or `None` when it has a cycle.
///
/// Vertices with no remaining predecessors are emitted in insertion order.
pub fn topological_order(graph: &Graph) -> Option<Vec<VertexId>> {
    let vertices = graph.vertices();
    let mut in_degree: HashMap<VertexId, usize> = vertices
        .iter()
        .map(|vertex| (*vertex, graph.degree(*vertex, Direction::Incoming)))
        .collect();

    let mut ready: VecDeque<VertexId> = vertices
        .iter()
        .copied()
        .filter(|vertex| in_degree.get(vertex).copied() == Some(0))
        .collect();
    let mut order = Vec::with_capacity(vertices.len());

    while let Some(vertex) = ready.pop_front() {
        order.push(vertex);
        for neighbour in graph.neighbours(vertex) {
            if let Some(degree) = in_degree.get_mut(&neighbour.vertex) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(neighbour.vertex);
                }
            }
        }
    }

    (order.len() == vertices.len()).then_some(order)
}

/// Cheapest feasible path on a directed acyclic graph.
///
/// Labels are relaxed once per vertex in topological order, using the same
/// (cost, energy) dominance as Dijkstra. Undirected or cyclic graphs are
/// rejected with [`Error::UnsupportedGraph`].
pub fn find_route_topological(
    graph: &Graph,
    origin: VertexId,
    destination: VertexId,
    budget: &EnergyBudget,
) -> Result<Option<PathResult>> {
    if !graph.is_directed() {
        return Err(Error::UnsupportedGraph {
            algorithm: RouteAlgorithm::TopologicalSort,
            reason: "graph is undirected".to_string(),
        });
    }
    let order = topological_order(graph).ok_or_else(|| Error::UnsupportedGraph {
        algorithm: RouteAlgorithm::TopologicalSort,
        reason: "graph contains a cycle".to_string(),
    })?;

    if !endpoints_present(graph, origin, destination) {
        return Ok(None);
    }
    if origin == destination {
        return Ok(Some(PathResult::trivial(origin)));
    }

    let mut arena = LabelArena::new();
    arena.offer(origin, 0.0, budget.autonomy, None);

    let start = order
        .iter()
        .position(|vertex| *vertex == origin)
        .unwrap_or(order.len());
    for &vertex in &order[start..] {
        if vertex == destination {
            break;
        }
        for index in arena.at(vertex) {
            let label = arena.get(index);
            for neighbour in graph.neighbours(vertex) {
                let Some(energy) = budget.fly(label.energy, neighbour.weight, neighbour.vertex)
                else {
                    continue;
                };
                arena.offer(
                    neighbour.vertex,
                    label.cost + neighbour.weight,
                    energy,
                    Some(index),
                );
            }
        }
    }

    let best = arena
        .at(destination)
        .into_iter()
        .min_by(|a, b| arena.get(*a).cost.total_cmp(&arena.get(*b).cost));
    let Some(best) = best else {
        debug!(%origin, %destination, "no feasible label reached destination");
        return Ok(None);
    };
    Ok(budget.walk(graph, &arena.trace(best)))
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
    fn orders_vertices_after_their_predecessors() {
        let graph = Graph::from_edges(
            GraphMode::Directed,
            &[(w(1), r(1), 1.0), (r(1), c(1), 1.0), (w(1), c(1), 5.0)],
        )
        .unwrap();
        assert_eq!(topological_order(&graph), Some(vec![w(1), r(1), c(1)]));
    }

    #[test]
    fn cycles_have_no_order() {
        let graph = Graph::from_edges(
            GraphMode::Directed,
            &[(w(1), c(1), 1.0), (c(1), c(2), 1.0), (c(2), w(1), 1.0)],
        )
        .unwrap();
        assert!(topological_order(&graph).is_none());

        let budget = EnergyBudget::for_graph(&graph, 10.0);
        let err = find_route_topological(&graph, w(1), c(2), &budget).unwrap_err();
        assert!(matches!(err, Error::UnsupportedGraph { .. }));
    }

    #[test]
    fn undirected_graphs_are_rejected() {
        let graph = Graph::from_edges(GraphMode::Undirected, &[(w(1), c(1), 1.0)]).unwrap();
        let budget = EnergyBudget::for_graph(&graph, 10.0);
        assert!(matches!(
            find_route_topological(&graph, w(1), c(1), &budget),
            Err(Error::UnsupportedGraph { .. })
        ));
    }

    #[test]
    fn relaxes_with_energy_in_topological_order() {
        let graph = Graph::from_edges(
            GraphMode::Directed,
            &[
                (w(1), c(2), 20.0),
                (c(2), c(1), 25.0),
                (w(1), r(1), 25.0),
                (r(1), c(1), 25.0),
            ],
        )
        .unwrap();

        let budget = EnergyBudget::for_graph(&graph, 40.0);
        let path = find_route_topological(&graph, w(1), c(1), &budget)
            .unwrap()
            .expect("route");
        assert_eq!(path.vertices, vec![w(1), r(1), c(1)]);
        assert_eq!(path.cost, 50.0);

        let tight = EnergyBudget::for_graph(&graph, 20.0);
        assert!(find_route_topological(&graph, w(1), c(1), &tight)
            .unwrap()
            .is_none());
    }
}
