#![allow(dead_code)]

use droneroute_lib::{EnergyBudget, Graph, GraphMode, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn w(id: u32) -> VertexId {
    VertexId::warehouse(id)
}

pub fn c(id: u32) -> VertexId {
    VertexId::client(id)
}

pub fn r(id: u32) -> VertexId {
    VertexId::recharge_station(id)
}

/// W1 - R1 - C1 with two legs of 30.
pub fn relay_graph(mode: GraphMode) -> Graph {
    Graph::from_edges(mode, &[(w(1), r(1), 30.0), (r(1), c(1), 30.0)]).expect("fixture graph")
}

pub fn budget(graph: &Graph, autonomy: f64) -> EnergyBudget {
    EnergyBudget::for_graph(graph, autonomy)
}

/// Random graph over 2 warehouses, 2 stations and 4 clients.
///
/// Each unordered pair is linked with probability `density`; in directed
/// mode the orientation is random. Weights are whole numbers in 1..=30.
pub fn random_graph(seed: u64, mode: GraphMode, density: f64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let vertices = [w(1), w(2), r(1), r(2), c(1), c(2), c(3), c(4)];
    let mut graph = Graph::new(mode);
    for vertex in vertices {
        graph.insert_vertex(vertex);
    }
    for (i, &u) in vertices.iter().enumerate() {
        for &v in &vertices[i + 1..] {
            if !rng.gen_bool(density) {
                continue;
            }
            let weight = f64::from(rng.gen_range(1u32..=30));
            let (from, to) = if mode == GraphMode::Directed && rng.gen_bool(0.5) {
                (v, u)
            } else {
                (u, v)
            };
            graph.insert_edge(from, to, weight).expect("valid edge");
        }
    }
    graph
}
