use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::domain::VertexId;
use crate::error::{Error, Result};
use crate::repository::Repository;

/// Whether edges are one-way arcs or two-way connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    Directed,
    #[default]
    Undirected,
}

/// Which incident edges to report for a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// Identity of an edge: its endpoints.
///
/// In undirected mode the endpoints are normalised so that `source <= target`,
/// which makes `(u, v)` and `(v, u)` the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId {
    pub source: VertexId,
    pub target: VertexId,
}

impl EdgeId {
    pub fn new(mode: GraphMode, u: VertexId, v: VertexId) -> Self {
        match mode {
            GraphMode::Undirected if v < u => Self {
                source: v,
                target: u,
            },
            _ => Self {
                source: u,
                target: v,
            },
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Vertex record stored in the graph's vertex repository.
///
/// Only the identity lives here; the wrapped element is owned by
/// [`Repositories`](crate::repository::Repositories).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub id: VertexId,
}

/// Weighted connection between two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    /// Flight-energy cost of the leg.
    pub weight: f64,
}

impl Edge {
    /// The endpoint opposite `vertex`, if `vertex` is an endpoint.
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if vertex == self.source {
            Some(self.target)
        } else if vertex == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

/// A vertex reachable over one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub vertex: VertexId,
    pub edge: EdgeId,
    pub weight: f64,
}

/// Graph structure used by every routing strategy.
///
/// Vertices and edges live in identity repositories; adjacency lists only
/// hold edge keys.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    mode: GraphMode,
    vertices: Repository<VertexId, Vertex>,
    edges: Repository<EdgeId, Edge>,
    outgoing: HashMap<VertexId, Vec<EdgeId>>,
    incoming: HashMap<VertexId, Vec<EdgeId>>,
}

impl Graph {
    pub fn new(mode: GraphMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Build a graph from `(u, v, weight)` triples, inserting endpoints as needed.
    pub fn from_edges(mode: GraphMode, edges: &[(VertexId, VertexId, f64)]) -> Result<Self> {
        let mut graph = Self::new(mode);
        for &(u, v, weight) in edges {
            graph.insert_vertex(u);
            graph.insert_vertex(v);
            graph.insert_edge(u, v, weight)?;
        }
        Ok(graph)
    }

    /// Mode chosen at construction.
    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn is_directed(&self) -> bool {
        self.mode == GraphMode::Directed
    }

    /// Insert a vertex; inserting an existing identity returns it unchanged.
    pub fn insert_vertex(&mut self, id: VertexId) -> VertexId {
        if !self.vertices.contains(&id) {
            self.vertices.put(id, Vertex { id });
            self.outgoing.entry(id).or_default();
            if self.is_directed() {
                self.incoming.entry(id).or_default();
            }
        }
        id
    }

    /// Insert an edge between two existing vertices.
    ///
    /// Inserting the same endpoints again returns the existing edge and keeps
    /// its original weight.
    pub fn insert_edge(&mut self, u: VertexId, v: VertexId, weight: f64) -> Result<EdgeId> {
        for vertex in [u, v] {
            if !self.vertices.contains(&vertex) {
                return Err(Error::UnknownVertex { vertex });
            }
        }
        if u == v {
            return Err(Error::SelfLoop { vertex: u });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight {
                source_vertex: u,
                target_vertex: v,
                weight,
            });
        }

        let id = EdgeId::new(self.mode, u, v);
        if let Some(existing) = self.edges.get(&id) {
            if existing.weight != weight {
                debug!(edge = %id, kept = existing.weight, ignored = weight, "edge already present");
            }
            return Ok(id);
        }

        self.edges.put(
            id,
            Edge {
                id,
                source: id.source,
                target: id.target,
                weight,
            },
        );
        match self.mode {
            GraphMode::Directed => {
                self.outgoing.entry(id.source).or_default().push(id);
                self.incoming.entry(id.target).or_default().push(id);
            }
            GraphMode::Undirected => {
                self.outgoing.entry(id.source).or_default().push(id);
                self.outgoing.entry(id.target).or_default().push(id);
            }
        }
        Ok(id)
    }

    /// Remove a vertex together with every edge touching it.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<Vertex> {
        let vertex = self.vertices.remove(&id)?;
        let mut touching: Vec<EdgeId> = self.outgoing.remove(&id).unwrap_or_default();
        touching.extend(self.incoming.remove(&id).unwrap_or_default());
        for edge in touching {
            self.remove_edge(edge);
        }
        Some(vertex)
    }

    /// Remove an edge by identity.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        let detach = |list: Option<&mut Vec<EdgeId>>| {
            if let Some(list) = list {
                list.retain(|candidate| *candidate != id);
            }
        };
        match self.mode {
            GraphMode::Directed => {
                detach(self.outgoing.get_mut(&edge.source));
                detach(self.incoming.get_mut(&edge.target));
            }
            GraphMode::Undirected => {
                detach(self.outgoing.get_mut(&edge.source));
                detach(self.outgoing.get_mut(&edge.target));
            }
        }
        Some(edge)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(&id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edge usable to fly from `u` to `v`, honouring the graph mode.
    pub fn edge_between(&self, u: VertexId, v: VertexId) -> Option<&Edge> {
        self.edges.get(&EdgeId::new(self.mode, u, v))
    }

    /// Vertices reachable over one edge, in edge insertion order.
    pub fn neighbours(&self, vertex: VertexId) -> impl Iterator<Item = Neighbour> + '_ {
        self.outgoing
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| {
                let edge = self.edges.get(id)?;
                let other = match self.mode {
                    GraphMode::Directed => edge.target,
                    GraphMode::Undirected => edge.other(vertex)?,
                };
                Some(Neighbour {
                    vertex: other,
                    edge: edge.id,
                    weight: edge.weight,
                })
            })
    }

    /// Edges touching `vertex` in the requested direction.
    ///
    /// Undirected graphs report every incident edge regardless of direction.
    pub fn incident_edges(&self, vertex: VertexId, direction: Direction) -> Vec<&Edge> {
        let lookup = |map: &HashMap<VertexId, Vec<EdgeId>>| -> Vec<EdgeId> {
            map.get(&vertex).cloned().unwrap_or_default()
        };
        let ids = match (self.mode, direction) {
            (GraphMode::Undirected, _) | (GraphMode::Directed, Direction::Outgoing) => {
                lookup(&self.outgoing)
            }
            (GraphMode::Directed, Direction::Incoming) => lookup(&self.incoming),
            (GraphMode::Directed, Direction::Both) => {
                let mut ids = lookup(&self.outgoing);
                ids.extend(lookup(&self.incoming));
                ids
            }
        };
        ids.iter().filter_map(|id| self.edges.get(id)).collect()
    }

    /// Number of incident edges in the requested direction.
    pub fn degree(&self, vertex: VertexId, direction: Direction) -> usize {
        self.incident_edges(vertex, direction).len()
    }

    /// Vertex identities in insertion order.
    pub fn vertices(&self) -> Vec<VertexId> {
        self.vertices.keys()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> Vec<&Edge> {
        self.edges.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sum of every edge weight.
    pub fn total_weight(&self) -> f64 {
        self.edges.iter_unordered().map(|(_, edge)| edge.weight).sum()
    }

    /// Drop every vertex and edge, keeping the mode.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(id: u32) -> VertexId {
        VertexId::warehouse(id)
    }

    fn c(id: u32) -> VertexId {
        VertexId::client(id)
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut graph = Graph::new(GraphMode::Undirected);
        assert_eq!(graph.insert_vertex(w(1)), w(1));
        assert_eq!(graph.insert_vertex(w(1)), w(1));
        graph.insert_vertex(c(1));

        let first = graph.insert_edge(w(1), c(1), 10.0).unwrap();
        let second = graph.insert_edge(c(1), w(1), 99.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(first).unwrap().weight, 10.0);
    }

    #[test]
    fn invalid_edges_are_rejected() {
        let mut graph = Graph::new(GraphMode::Undirected);
        graph.insert_vertex(w(1));
        graph.insert_vertex(c(1));

        assert!(matches!(
            graph.insert_edge(w(1), c(2), 1.0),
            Err(Error::UnknownVertex { .. })
        ));
        assert!(matches!(
            graph.insert_edge(w(1), w(1), 1.0),
            Err(Error::SelfLoop { .. })
        ));
        assert!(matches!(
            graph.insert_edge(w(1), c(1), -1.0),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            graph.insert_edge(w(1), c(1), f64::NAN),
            Err(Error::InvalidWeight { .. })
        ));
    }

    #[test]
    fn directed_mode_respects_direction() {
        let graph = Graph::from_edges(GraphMode::Directed, &[(w(1), c(1), 5.0)]).unwrap();

        let from_w: Vec<_> = graph.neighbours(w(1)).map(|n| n.vertex).collect();
        assert_eq!(from_w, vec![c(1)]);
        assert_eq!(graph.neighbours(c(1)).count(), 0);
        assert!(graph.edge_between(w(1), c(1)).is_some());
        assert!(graph.edge_between(c(1), w(1)).is_none());

        assert_eq!(graph.degree(c(1), Direction::Incoming), 1);
        assert_eq!(graph.degree(c(1), Direction::Outgoing), 0);
        assert_eq!(graph.degree(w(1), Direction::Both), 1);
    }

    #[test]
    fn undirected_mode_reports_all_incident_edges() {
        let graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), c(1), 5.0), (c(2), w(1), 7.0)],
        )
        .unwrap();

        let around_w: Vec<_> = graph.neighbours(w(1)).map(|n| n.vertex).collect();
        assert_eq!(around_w, vec![c(1), c(2)]);
        assert_eq!(graph.degree(w(1), Direction::Incoming), 2);
        assert!(graph.edge_between(c(2), w(1)).is_some());
        assert!(graph.edge_between(w(1), c(2)).is_some());
        assert_eq!(graph.total_weight(), 12.0);
    }

    #[test]
    fn removing_a_vertex_drops_its_edges() {
        let mut graph = Graph::from_edges(
            GraphMode::Undirected,
            &[(w(1), c(1), 5.0), (w(1), c(2), 7.0), (c(1), c(2), 1.0)],
        )
        .unwrap();

        assert!(graph.remove_vertex(w(1)).is_some());
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbours(c(1)).count(), 1);
        assert!(graph.remove_vertex(w(1)).is_none());

        let edge = graph.edge_between(c(1), c(2)).unwrap().id;
        assert!(graph.remove_edge(edge).is_some());
        assert_eq!(graph.neighbours(c(2)).count(), 0);
    }
}
