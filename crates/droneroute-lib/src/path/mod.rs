//! Energy-aware path search.
//!
//! Every search shares the same flight rule, captured by [`EnergyBudget`]:
//! a drone leaves with a full battery (`autonomy`), an edge can only be flown
//! when its weight fits in the remaining energy, and landing on a recharge
//! vertex restores the battery to `autonomy`. An edge heavier than
//! `autonomy` can never be flown.
//!
//! - [`bfs`] / [`dfs`] - uninformed search over (vertex, energy) states
//! - [`dijkstra`] - cheapest feasible path with Pareto labels
//! - [`floyd_warshall`] - all-pairs tables split at recharge vertices
//! - [`topological`] - label relaxation in topological order (DAGs only)
//! - [`recharge`] - recharge-stop insertion post-processing

pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod floyd_warshall;
mod labels;
pub mod recharge;
pub mod topological;

pub use bfs::find_route_bfs;
pub use dfs::find_route_dfs;
pub use dijkstra::find_route_dijkstra;
pub use floyd_warshall::{find_route_floyd_warshall, AllPairsTable};
pub use recharge::insert_recharge_stops;
pub use topological::{find_route_topological, topological_order};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::VertexId;
use crate::graph::Graph;

/// Slack used when comparing accumulated energy against a leg weight.
pub(crate) const ENERGY_EPSILON: f64 = 1e-9;

/// Bounds that keep the uninformed searches finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Maximum number of states expanded by one search.
    pub max_iterations: usize,
    /// Maximum number of legs in a candidate path.
    pub max_path_length: usize,
    /// How much worse (in energy units) a revisit of a vertex may be than the
    /// best state already seen there and still be explored by BFS/DFS.
    pub revisit_tolerance: f64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_iterations: 200_000,
            max_path_length: 256,
            revisit_tolerance: 15.0,
        }
    }
}

/// Battery constraint applied to a search.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBudget {
    pub autonomy: f64,
    pub recharge: HashSet<VertexId>,
    pub limits: SearchLimits,
}

impl EnergyBudget {
    pub fn new(autonomy: f64, recharge: impl IntoIterator<Item = VertexId>) -> Self {
        Self {
            autonomy,
            recharge: recharge.into_iter().collect(),
            limits: SearchLimits::default(),
        }
    }

    /// Budget whose recharge set is every recharge-station vertex of `graph`.
    pub fn for_graph(graph: &Graph, autonomy: f64) -> Self {
        Self::new(
            autonomy,
            graph
                .vertices()
                .into_iter()
                .filter(VertexId::is_recharge_station),
        )
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn is_recharge(&self, vertex: VertexId) -> bool {
        self.recharge.contains(&vertex)
    }

    /// Whether a single leg of this weight can ever be flown.
    pub fn leg_fits(&self, weight: f64) -> bool {
        weight <= self.autonomy + ENERGY_EPSILON
    }

    /// Energy left after flying a leg of `weight` with `remaining` energy and
    /// landing on `target`, or `None` if the leg cannot be flown.
    pub fn fly(&self, remaining: f64, weight: f64, target: VertexId) -> Option<f64> {
        if !self.leg_fits(weight) || weight > remaining + ENERGY_EPSILON {
            return None;
        }
        if self.is_recharge(target) {
            Some(self.autonomy)
        } else {
            Some((remaining - weight).max(0.0))
        }
    }

    /// Fly a full vertex sequence, starting with a charged battery.
    ///
    /// Returns `None` when a leg has no edge or runs the battery dry.
    pub fn walk(&self, graph: &Graph, vertices: &[VertexId]) -> Option<PathResult> {
        let first = *vertices.first()?;
        if !graph.contains_vertex(first) {
            return None;
        }
        let mut remaining = self.autonomy;
        let mut cost = 0.0;
        for pair in vertices.windows(2) {
            let edge = graph.edge_between(pair[0], pair[1])?;
            remaining = self.fly(remaining, edge.weight, pair[1])?;
            cost += edge.weight;
        }
        Some(PathResult {
            recharge_stops: self.count_recharge_stops(vertices),
            vertices: vertices.to_vec(),
            cost,
        })
    }

    /// Recharge vertices visited strictly between the two ends of a path.
    pub fn count_recharge_stops(&self, vertices: &[VertexId]) -> usize {
        if vertices.len() < 3 {
            return 0;
        }
        vertices[1..vertices.len() - 1]
            .iter()
            .filter(|vertex| self.is_recharge(**vertex))
            .count()
    }
}

/// A feasible path and its cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub vertices: Vec<VertexId>,
    pub cost: f64,
    pub recharge_stops: usize,
}

impl PathResult {
    /// Path made of a single vertex (origin equals destination).
    pub fn trivial(vertex: VertexId) -> Self {
        Self {
            vertices: vec![vertex],
            cost: 0.0,
            recharge_stops: 0,
        }
    }

    /// Number of legs.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Dense index over the vertices of a graph, for matrix-based algorithms.
#[derive(Debug, Clone)]
pub(crate) struct VertexIndex {
    vertices: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
}

impl VertexIndex {
    pub(crate) fn new(graph: &Graph) -> Self {
        let vertices = graph.vertices();
        let positions = vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| (*vertex, index))
            .collect();
        Self {
            vertices,
            positions,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn position(&self, vertex: VertexId) -> Option<usize> {
        self.positions.get(&vertex).copied()
    }

    pub(crate) fn vertex(&self, position: usize) -> VertexId {
        self.vertices[position]
    }

    pub(crate) fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }
}

/// Search state used by the BFS/DFS arenas.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchState {
    pub vertex: VertexId,
    pub energy: f64,
    pub parent: Option<usize>,
    pub depth: usize,
}

/// Walk parent links back to the root and return the vertex sequence.
pub(crate) fn trace_states(states: &[SearchState], mut index: usize) -> Vec<VertexId> {
    let mut path = Vec::new();
    loop {
        let state = states[index];
        path.push(state.vertex);
        match state.parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Admission rule shared by BFS and DFS.
///
/// A state is explored unless the exact (vertex, energy) pair was seen
/// before or its energy is worse than the best energy recorded at that
/// vertex by more than the revisit tolerance.
#[derive(Debug)]
pub(crate) struct StateLedger {
    best: HashMap<VertexId, f64>,
    seen: HashSet<(VertexId, u64)>,
    tolerance: f64,
}

impl StateLedger {
    pub(crate) fn new(tolerance: f64) -> Self {
        Self {
            best: HashMap::new(),
            seen: HashSet::new(),
            tolerance: tolerance.max(0.0),
        }
    }

    pub(crate) fn admit(&mut self, vertex: VertexId, energy: f64) -> bool {
        let key = (vertex, energy.to_bits());
        if self.seen.contains(&key) {
            return false;
        }
        if let Some(&best) = self.best.get(&vertex) {
            if energy < best - self.tolerance {
                return false;
            }
        }
        self.seen.insert(key);
        let best = self.best.entry(vertex).or_insert(energy);
        if energy > *best {
            *best = energy;
        }
        true
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Endpoint sanity shared by every search: both vertices must be in the graph.
pub(crate) fn endpoints_present(graph: &Graph, origin: VertexId, destination: VertexId) -> bool {
    graph.contains_vertex(origin) && graph.contains_vertex(destination)
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
    fn flying_resets_at_recharge_vertices() {
        let budget = EnergyBudget::new(50.0, [r(1)]);
        assert_eq!(budget.fly(50.0, 30.0, c(1)), Some(20.0));
        assert_eq!(budget.fly(50.0, 30.0, r(1)), Some(50.0));
        assert_eq!(budget.fly(20.0, 30.0, c(1)), None);
        assert_eq!(budget.fly(100.0, 60.0, c(1)), None, "leg above autonomy");
    }

    #[test]
    fn walk_counts_cost_and_recharge_stops() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), r(1), 30.0), (r(1), c(1), 30.0)],
        )
        .unwrap();
        let budget = EnergyBudget::for_graph(&graph, 50.0);

        let walked = budget.walk(&graph, &[w(1), r(1), c(1)]).expect("feasible");
        assert_eq!(walked.cost, 60.0);
        assert_eq!(walked.recharge_stops, 1);
        assert!(budget.walk(&graph, &[w(1), c(1)]).is_none(), "no edge");

        let tight = EnergyBudget::for_graph(&graph, 20.0);
        assert!(tight.walk(&graph, &[w(1), r(1), c(1)]).is_none());
    }

    #[test]
    fn ledger_tolerates_slightly_worse_revisits() {
        let mut ledger = StateLedger::new(15.0);
        assert!(ledger.admit(c(1), 40.0));
        assert!(!ledger.admit(c(1), 40.0), "exact duplicate");
        assert!(ledger.admit(c(1), 30.0), "within tolerance");
        assert!(!ledger.admit(c(1), 20.0), "too much worse");
        assert!(ledger.admit(c(1), 45.0));
        assert!(!ledger.admit(c(1), 29.0));
    }
}
