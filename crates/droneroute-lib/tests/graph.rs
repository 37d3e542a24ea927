mod common;

use common::{c, r, w};
use droneroute_lib::graph::Direction;
use droneroute_lib::{minimum_spanning_tree, EdgeId, Error, Graph, GraphMode};

#[test]
fn undirected_edges_share_one_identity() {
    let mut graph = Graph::new(GraphMode::Undirected);
    for vertex in [w(1), c(1)] {
        graph.insert_vertex(vertex);
    }
    let forward = graph.insert_edge(w(1), c(1), 12.0).expect("edge inserted");
    let backward = graph.insert_edge(c(1), w(1), 99.0).expect("same edge");

    assert_eq!(forward, backward);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_between(c(1), w(1)).map(|e| e.weight), Some(12.0));
}

#[test]
fn directed_edges_keep_their_orientation() {
    let graph = Graph::from_edges(
        GraphMode::Directed,
        &[(w(1), c(1), 5.0), (c(1), w(1), 7.0), (r(1), c(1), 2.0)],
    )
    .expect("graph builds");

    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.edge_between(w(1), c(1)).map(|e| e.weight), Some(5.0));
    assert_eq!(graph.edge_between(c(1), w(1)).map(|e| e.weight), Some(7.0));
    assert!(graph.edge_between(c(1), r(1)).is_none());
    assert_eq!(graph.degree(c(1), Direction::Incoming), 2);
    assert_eq!(graph.degree(c(1), Direction::Outgoing), 1);
    assert_eq!(graph.degree(c(1), Direction::Both), 3);
}

#[test]
fn malformed_edges_are_rejected() {
    let mut graph = Graph::new(GraphMode::Undirected);
    graph.insert_vertex(w(1));

    assert!(matches!(
        graph.insert_edge(w(1), w(1), 1.0),
        Err(Error::SelfLoop { .. })
    ));
    assert!(matches!(
        graph.insert_edge(w(1), c(9), 1.0),
        Err(Error::UnknownVertex { .. })
    ));
    graph.insert_vertex(c(9));
    assert!(matches!(
        graph.insert_edge(w(1), c(9), f64::NAN),
        Err(Error::InvalidWeight { .. })
    ));
    assert!(matches!(
        graph.insert_edge(w(1), c(9), -1.0),
        Err(Error::InvalidWeight { .. })
    ));
}

#[test]
fn removing_a_vertex_drops_its_edges() {
    let mut graph = Graph::from_edges(
        GraphMode::Undirected,
        &[(w(1), r(1), 1.0), (r(1), c(1), 2.0), (w(1), c(1), 3.0)],
    )
    .expect("graph builds");

    graph.remove_vertex(r(1)).expect("vertex existed");
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph
        .edge(EdgeId::new(GraphMode::Undirected, w(1), r(1)))
        .is_none());
    let neighbours: Vec<_> = graph.neighbours(w(1)).map(|n| n.vertex).collect();
    assert_eq!(neighbours, vec![c(1)]);
}

#[test]
fn spanning_tree_matches_brute_force_minimum() {
    let edges = [
        (w(1), c(1), 4.0),
        (w(1), r(1), 1.0),
        (r(1), c(1), 3.0),
        (c(1), c(2), 2.0),
        (r(1), c(2), 5.0),
        (w(1), c(2), 2.0),
        (c(2), c(3), 7.0),
        (r(1), c(3), 6.0),
    ];
    let graph = Graph::from_edges(GraphMode::Undirected, &edges).expect("graph builds");
    let tree = minimum_spanning_tree(&graph);
    assert!(tree.is_spanning());

    // Every 4-edge subset that connects all 5 vertices.
    let vertices = graph.vertices();
    let mut best = f64::INFINITY;
    for mask in 0u32..(1 << edges.len()) {
        if mask.count_ones() != 4 {
            continue;
        }
        let mut component: Vec<usize> = (0..vertices.len()).collect();
        for (i, (u, v, _)) in edges.iter().enumerate() {
            if mask & (1 << i) == 0 {
                continue;
            }
            let a = component[vertices.iter().position(|x| x == u).unwrap()];
            let b = component[vertices.iter().position(|x| x == v).unwrap()];
            for slot in component.iter_mut() {
                if *slot == b {
                    *slot = a;
                }
            }
        }
        if component.iter().all(|&id| id == component[0]) {
            let weight: f64 = edges
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, (_, _, weight))| weight)
                .sum();
            best = best.min(weight);
        }
    }

    assert_eq!(tree.total_weight, best);
    assert_eq!(tree.edges.len(), 4);
}
