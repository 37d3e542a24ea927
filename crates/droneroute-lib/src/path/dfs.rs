use tracing::debug;

use crate::domain::VertexId;
use crate::graph::{Graph, Neighbour};

use super::{
    endpoints_present, trace_states, EnergyBudget, PathResult, SearchState, StateLedger,
    ENERGY_EPSILON,
};

/// Depth-first search over (vertex, remaining-energy) states.
///
/// Neighbours are explored in edge insertion order. The first path reaching
/// the destination is returned; it is feasible but not necessarily cheap.
/// A branch may only come back to a vertex it already holds when it arrives
/// with more energy than before, so detours through recharge stations are
/// allowed while plain cycles are not.
pub fn find_route_dfs(
    graph: &Graph,
    origin: VertexId,
    destination: VertexId,
    budget: &EnergyBudget,
) -> Option<PathResult> {
    if !endpoints_present(graph, origin, destination) {
        return None;
    }
    if origin == destination {
        return Some(PathResult::trivial(origin));
    }

    let limits = budget.limits;
    let mut ledger = StateLedger::new(limits.revisit_tolerance);
    let mut states = vec![SearchState {
        vertex: origin,
        energy: budget.autonomy,
        parent: None,
        depth: 0,
    }];
    ledger.admit(origin, budget.autonomy);

    let mut stack = vec![0usize];
    let mut iterations = 0usize;

    while let Some(index) = stack.pop() {
        iterations += 1;
        if iterations > limits.max_iterations {
            debug!(%origin, %destination, iterations, "dfs iteration budget exhausted");
            break;
        }

        let current = states[index];
        if current.vertex == destination {
            let vertices = trace_states(&states, index);
            return budget.walk(graph, &vertices);
        }
        if current.depth >= limits.max_path_length {
            continue;
        }

        // Reverse so the first neighbour ends up on top of the stack.
        let neighbours: Vec<Neighbour> = graph.neighbours(current.vertex).collect();
        for neighbour in neighbours.into_iter().rev() {
            let Some(energy) = budget.fly(current.energy, neighbour.weight, neighbour.vertex)
            else {
                continue;
            };
            if loops_without_gain(&states, index, neighbour.vertex, energy) {
                continue;
            }
            if !ledger.admit(neighbour.vertex, energy) {
                continue;
            }
            states.push(SearchState {
                vertex: neighbour.vertex,
                energy,
                parent: Some(index),
                depth: current.depth + 1,
            });
            stack.push(states.len() - 1);
        }
    }

    None
}

fn loops_without_gain(
    states: &[SearchState],
    mut index: usize,
    vertex: VertexId,
    energy: f64,
) -> bool {
    loop {
        let state = states[index];
        if state.vertex == vertex && state.energy + ENERGY_EPSILON >= energy {
            return true;
        }
        match state.parent {
            Some(parent) => index = parent,
            None => return false,
        }
    }
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
    fn follows_first_branch_to_the_end() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(2), 5.0),
                (w(1), c(1), 5.0),
                (c(2), c(3), 5.0),
                (c(3), c(1), 5.0),
            ],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 100.0);

        let path = find_route_dfs(&graph, w(1), c(1), &budget).expect("route");
        assert_eq!(path.vertices, vec![w(1), c(2), c(3), c(1)]);
        assert_eq!(path.cost, 15.0);
    }

    #[test]
    fn skips_branches_that_run_out_of_energy() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(2), 30.0),
                (c(2), c(1), 30.0),
                (w(1), r(1), 25.0),
                (r(1), c(1), 25.0),
            ],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 40.0);

        let path = find_route_dfs(&graph, w(1), c(1), &budget).expect("route");
        assert_eq!(path.vertices, vec![w(1), r(1), c(1)]);
        assert_eq!(path.recharge_stops, 1);
    }

    #[test]
    fn returns_to_a_vertex_only_after_recharging() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(2), 30.0),
                (c(2), c(1), 30.0),
                (c(2), r(1), 5.0),
            ],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 40.0);

        let path = find_route_dfs(&graph, w(1), c(1), &budget).expect("route");
        assert_eq!(path.vertices, vec![w(1), c(2), r(1), c(2), c(1)]);
        assert_eq!(path.cost, 70.0);
    }
}
