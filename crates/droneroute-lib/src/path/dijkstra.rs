use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::domain::VertexId;
use crate::graph::Graph;

use super::labels::LabelArena;
use super::{endpoints_present, EnergyBudget, FloatOrd, PathResult};

/// Cheapest energy-feasible path.
///
/// Plain Dijkstra keeps one distance per vertex, which loses paths that are
/// more expensive so far but arrive with more energy. Each vertex instead
/// keeps its Pareto front of (cost, energy) labels. Queue ties resolve in
/// insertion order.
pub fn find_route_dijkstra(
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

    let mut arena = LabelArena::new();
    let mut queue = BinaryHeap::new();
    let mut seq = 0u64;

    let root = arena.offer(origin, 0.0, budget.autonomy, None)?;
    queue.push(QueueEntry::new(root, 0.0, seq));

    let mut iterations = 0usize;
    while let Some(entry) = queue.pop() {
        iterations += 1;
        if iterations > budget.limits.max_iterations {
            debug!(%origin, %destination, iterations, "dijkstra iteration budget exhausted");
            break;
        }

        let label = arena.get(entry.label);
        if !label.alive {
            continue;
        }
        if label.vertex == destination {
            let vertices = arena.trace(entry.label);
            return budget.walk(graph, &vertices);
        }

        for neighbour in graph.neighbours(label.vertex) {
            let Some(energy) = budget.fly(label.energy, neighbour.weight, neighbour.vertex) else {
                continue;
            };
            let cost = label.cost + neighbour.weight;
            if let Some(next) = arena.offer(neighbour.vertex, cost, energy, Some(entry.label)) {
                seq += 1;
                queue.push(QueueEntry::new(next, cost, seq));
            }
        }
    }

    None
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    label: usize,
    cost: FloatOrd,
    seq: u64,
}

impl QueueEntry {
    fn new(label: usize, cost: f64, seq: u64) -> Self {
        Self {
            label,
            cost: FloatOrd(cost),
            seq,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then by
        // insertion order.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
