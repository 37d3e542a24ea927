use std::collections::VecDeque;

use tracing::debug;

use crate::domain::VertexId;
use crate::graph::Graph;

use super::{endpoints_present, trace_states, EnergyBudget, PathResult, SearchState, StateLedger};

/// Breadth-first search over (vertex, remaining-energy) states.
///
/// Returns the path with the fewest legs among the states explored. The
/// same vertex may appear more than once in a path (for example a detour to
/// a recharge station and back).
pub fn find_route_bfs(
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

    let mut queue = VecDeque::from([0usize]);
    let mut iterations = 0usize;

    while let Some(index) = queue.pop_front() {
        iterations += 1;
        if iterations > limits.max_iterations {
            debug!(%origin, %destination, iterations, "bfs iteration budget exhausted");
            break;
        }

        let current = states[index];
        if current.depth >= limits.max_path_length {
            continue;
        }

        for neighbour in graph.neighbours(current.vertex) {
            let Some(energy) = budget.fly(current.energy, neighbour.weight, neighbour.vertex)
            else {
                continue;
            };
            if !ledger.admit(neighbour.vertex, energy) {
                continue;
            }

            states.push(SearchState {
                vertex: neighbour.vertex,
                energy,
                parent: Some(index),
                depth: current.depth + 1,
            });
            let next = states.len() - 1;

            if neighbour.vertex == destination {
                let vertices = trace_states(&states, next);
                return budget.walk(graph, &vertices);
            }
            queue.push_back(next);
        }
    }

    None
}
