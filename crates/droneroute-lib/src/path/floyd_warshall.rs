//! All-pairs routing tables.
//!
//! The tables are computed in two passes so that reconstructed routes honour
//! the battery rule:
//!
//! 1. *Legs*: cheapest paths whose intermediate vertices are never recharge
//!    stations. A leg is flown on a single charge.
//! 2. *Routes*: legs no heavier than `autonomy`, chained through recharge
//!    stations only.
//!
//! A route is then a chain of feasible legs, each starting with a full
//! battery, which is exactly what the state searches accept.

use tracing::debug;

use crate::domain::VertexId;
use crate::graph::Graph;

use super::{EnergyBudget, PathResult, VertexIndex};

const NO_HOP: usize = usize::MAX;

/// Distance and successor matrices over every vertex pair.
#[derive(Debug, Clone)]
pub struct AllPairsTable {
    index: VertexIndex,
    leg_dist: Vec<f64>,
    leg_next: Vec<usize>,
    dist: Vec<f64>,
    next: Vec<usize>,
}

impl AllPairsTable {
    pub fn build(graph: &Graph, budget: &EnergyBudget) -> Self {
        let index = VertexIndex::new(graph);
        let n = index.len();
        let recharge: Vec<bool> = index
            .vertices()
            .iter()
            .map(|vertex| budget.is_recharge(*vertex))
            .collect();

        let mut leg_dist = vec![f64::INFINITY; n * n];
        let mut leg_next = vec![NO_HOP; n * n];
        for i in 0..n {
            leg_dist[i * n + i] = 0.0;
            leg_next[i * n + i] = i;
        }
        for i in 0..n {
            for neighbour in graph.neighbours(index.vertex(i)) {
                let Some(j) = index.position(neighbour.vertex) else {
                    continue;
                };
                if !budget.leg_fits(neighbour.weight) {
                    continue;
                }
                if neighbour.weight < leg_dist[i * n + j] {
                    leg_dist[i * n + j] = neighbour.weight;
                    leg_next[i * n + j] = j;
                }
            }
        }
        relax(n, &mut leg_dist, &mut leg_next, |k| !recharge[k]);

        let mut dist = vec![f64::INFINITY; n * n];
        let mut next = vec![NO_HOP; n * n];
        for cell in 0..n * n {
            if leg_dist[cell].is_finite() && budget.leg_fits(leg_dist[cell]) {
                dist[cell] = leg_dist[cell];
                next[cell] = cell % n;
            }
        }
        relax(n, &mut dist, &mut next, |k| recharge[k]);

        debug!(vertices = n, "all-pairs tables built");
        Self {
            index,
            leg_dist,
            leg_next,
            dist,
            next,
        }
    }

    /// Cheapest feasible cost between two vertices.
    pub fn distance(&self, origin: VertexId, destination: VertexId) -> Option<f64> {
        let cell = self.cell(origin, destination)?;
        let value = self.dist[cell];
        value.is_finite().then_some(value)
    }

    /// Reconstruct and validate the route between two vertices.
    pub fn route(
        &self,
        graph: &Graph,
        budget: &EnergyBudget,
        origin: VertexId,
        destination: VertexId,
    ) -> Option<PathResult> {
        self.distance(origin, destination)?;
        let n = self.index.len();
        let from = self.index.position(origin)?;
        let to = self.index.position(destination)?;

        let waypoints = expand(n, &self.next, from, to)?;
        let mut positions = vec![from];
        for pair in waypoints.windows(2) {
            let leg = expand(n, &self.leg_next, pair[0], pair[1])?;
            positions.extend_from_slice(&leg[1..]);
        }

        let vertices: Vec<VertexId> = positions
            .into_iter()
            .map(|position| self.index.vertex(position))
            .collect();
        budget.walk(graph, &vertices)
    }

    /// Cost of the cheapest single-charge leg between two vertices.
    pub fn leg_distance(&self, origin: VertexId, destination: VertexId) -> Option<f64> {
        let cell = self.cell(origin, destination)?;
        let value = self.leg_dist[cell];
        value.is_finite().then_some(value)
    }

    fn cell(&self, origin: VertexId, destination: VertexId) -> Option<usize> {
        let i = self.index.position(origin)?;
        let j = self.index.position(destination)?;
        Some(i * self.index.len() + j)
    }
}

/// Floyd-Warshall restricted to intermediates accepted by `allowed`.
fn relax(n: usize, dist: &mut [f64], next: &mut [usize], allowed: impl Fn(usize) -> bool) {
    for k in 0..n {
        if !allowed(k) {
            continue;
        }
        for i in 0..n {
            let through = dist[i * n + k];
            if !through.is_finite() {
                continue;
            }
            for j in 0..n {
                let candidate = through + dist[k * n + j];
                if candidate < dist[i * n + j] {
                    dist[i * n + j] = candidate;
                    next[i * n + j] = next[i * n + k];
                }
            }
        }
    }
}

/// Follow successor links from `from` to `to`.
fn expand(n: usize, next: &[usize], from: usize, to: usize) -> Option<Vec<usize>> {
    let mut path = vec![from];
    let mut current = from;
    while current != to {
        current = next[current * n + to];
        if current == NO_HOP || path.len() > n {
            return None;
        }
        path.push(current);
    }
    Some(path)
}

/// Build the tables and read off one route.
///
/// Callers routing many pairs on the same graph should build an
/// [`AllPairsTable`] once instead.
pub fn find_route_floyd_warshall(
    graph: &Graph,
    origin: VertexId,
    destination: VertexId,
    budget: &EnergyBudget,
) -> Option<PathResult> {
    if !super::endpoints_present(graph, origin, destination) {
        return None;
    }
    if origin == destination {
        return Some(PathResult::trivial(origin));
    }
    AllPairsTable::build(graph, budget).route(graph, budget, origin, destination)
}
