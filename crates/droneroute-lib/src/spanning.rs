//! Minimum spanning trees (Kruskal with union-find).

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::domain::VertexId;
use crate::graph::{Edge, Graph};

/// Disjoint sets over `0..n` with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns `false` if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets.
    pub fn sets(&self) -> usize {
        self.sets
    }
}

/// Kruskal selection over candidate edges.
///
/// Candidates are taken in non-decreasing weight order; equal weights keep
/// their input order. Candidates are treated as undirected. Returns the
/// positions of the selected candidates and the number of components left.
pub fn kruskal_select(
    vertices: &[VertexId],
    candidates: &[(VertexId, VertexId, f64)],
) -> (Vec<usize>, usize) {
    let positions: HashMap<VertexId, usize> = vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| (*vertex, index))
        .collect();

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| candidates[*a].2.total_cmp(&candidates[*b].2));

    let mut sets = UnionFind::new(vertices.len());
    let mut selected = Vec::with_capacity(vertices.len().saturating_sub(1));
    for candidate in order {
        let (u, v, _) = candidates[candidate];
        let (Some(&a), Some(&b)) = (positions.get(&u), positions.get(&v)) else {
            continue;
        };
        if sets.union(a, b) {
            selected.push(candidate);
            if sets.sets() == 1 {
                break;
            }
        }
    }
    (selected, sets.sets())
}

/// Minimum spanning tree (or forest) of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTree {
    pub edges: Vec<Edge>,
    pub total_weight: f64,
    pub vertex_count: usize,
    /// Connected components covered; 1 for a connected graph.
    pub components: usize,
}

impl SpanningTree {
    /// True when the tree connects every vertex.
    pub fn is_spanning(&self) -> bool {
        self.vertex_count == 0
            || (self.components == 1 && self.edges.len() + 1 == self.vertex_count)
    }

    /// The unique tree path between two vertices, if they share a component.
    pub fn tree_path(&self, from: VertexId, to: VertexId) -> Option<Vec<VertexId>> {
        let mut adjacency: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.source).or_default().push(edge.target);
            adjacency.entry(edge.target).or_default().push(edge.source);
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut parents: HashMap<VertexId, VertexId> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(vertex) = queue.pop_front() {
            for &next in adjacency.get(&vertex).map(Vec::as_slice).unwrap_or(&[]) {
                if next == from || parents.contains_key(&next) {
                    continue;
                }
                parents.insert(next, vertex);
                if next == to {
                    let mut path = vec![to];
                    let mut current = to;
                    while let Some(&parent) = parents.get(&current) {
                        path.push(parent);
                        current = parent;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

/// Kruskal over every edge of `graph`, ignoring direction.
pub fn minimum_spanning_tree(graph: &Graph) -> SpanningTree {
    let vertices = graph.vertices();
    let edges = graph.edges();
    let candidates: Vec<(VertexId, VertexId, f64)> = edges
        .iter()
        .map(|edge| (edge.source, edge.target, edge.weight))
        .collect();

    let (selected, components) = kruskal_select(&vertices, &candidates);
    let tree: Vec<Edge> = selected.into_iter().map(|index| *edges[index]).collect();
    SpanningTree {
        total_weight: tree.iter().map(|edge| edge.weight).sum(),
        edges: tree,
        vertex_count: vertices.len(),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMode;

    fn w(id: u32) -> VertexId {
        VertexId::warehouse(id)
    }
    fn c(id: u32) -> VertexId {
        VertexId::client(id)
    }

    #[test]
    fn union_find_tracks_sets() {
        let mut sets = UnionFind::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.sets(), 2);
        assert!(sets.union(1, 3));
        assert_eq!(sets.find(0), sets.find(2));
        assert_eq!(sets.sets(), 1);
    }

    #[test]
    fn picks_lightest_edges_and_keeps_input_order_on_ties() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[
                (w(1), c(1), 4.0),
                (w(1), c(2), 1.0),
                (c(1), c(2), 1.0),
                (c(2), c(3), 4.0),
                (c(1), c(3), 4.0),
            ],
        )
        .unwrap();

        let tree = minimum_spanning_tree(&graph);
        assert!(tree.is_spanning());
        assert_eq!(tree.total_weight, 6.0);
        let ids: Vec<_> = tree.edges.iter().map(|edge| edge.id.to_string()).collect();
        assert_eq!(ids, vec!["W1-C2", "C1-C2", "C2-C3"]);
    }

    #[test]
    fn disconnected_graph_yields_forest() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), c(1), 1.0), (c(2), c(3), 1.0)],
        )
        .unwrap();
        let tree = minimum_spanning_tree(&graph);
        assert_eq!(tree.components, 2);
        assert!(!tree.is_spanning());
        assert!(tree.tree_path(w(1), c(3)).is_none());
        assert_eq!(tree.tree_path(c(3), c(2)), Some(vec![c(3), c(2)]));
    }
}
