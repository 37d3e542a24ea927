use std::io::Write;
use std::thread;

use droneroute_lib::{
    Error, NetworkConfig, OrderStatus, RenderMode, RouteAlgorithm, RouteSummary, SharedSimulation,
    Simulation, SimulationConfig,
};
use tempfile::NamedTempFile;

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        autonomy: 100.0,
        network: NetworkConfig {
            min_edge_weight: 1.0,
            max_edge_weight: 8.0,
            ..NetworkConfig::default()
        },
        ..SimulationConfig::default()
    }
}

#[test]
fn full_run_routes_every_order() {
    let mut sim = Simulation::new(config(21)).expect("valid config");
    let summary = sim.initialize(12, 20, 6).expect("network builds");
    assert_eq!(summary.vertices, 12);
    assert_eq!(summary.edges, 20);
    assert_eq!(summary.orders, 6);

    let algorithms = ["bfs", "dfs", "dijkstra", "floyd_warshall", "kruskal", "dijkstra"];
    let ids: Vec<_> = sim.orders().iter().map(|order| order.id).collect();
    for (order, name) in ids.iter().zip(algorithms) {
        let route = sim.compute_route(*order, name).expect("feasible network");
        assert_eq!(route.order, Some(*order));
        assert_eq!(route.algorithm, name.parse::<RouteAlgorithm>().unwrap());

        let summary = RouteSummary::for_simulation(&sim, &route).expect("active run");
        assert!(summary.steps.iter().all(|step| step.energy.remaining >= 0.0));
        assert!(summary.render(RenderMode::PlainText).starts_with("Route "));
    }

    let stats = sim.statistics();
    assert_eq!(stats.orders_by_status["dispatched"], 6);
    assert_eq!(stats.routes, 6);
    assert_eq!(stats.dispatched_from_warehouses, 6);
    assert_eq!(stats.routes_by_algorithm[&RouteAlgorithm::Dijkstra], 2);

    sim.deliver_order(ids[0]).expect("dispatched order");
    assert_eq!(sim.order(ids[0]).unwrap().status, OrderStatus::Delivered);
    assert_eq!(sim.statistics().delivered_to_clients, 1);
}

#[test]
fn ranking_follows_repeated_computations() {
    let mut sim = Simulation::new(config(5)).expect("valid config");
    sim.initialize(8, 12, 2).expect("network builds");

    for _ in 0..3 {
        sim.compute_route(1, "dijkstra").expect("route");
    }
    sim.compute_route(2, "dijkstra").expect("route");

    let same_path = sim.order(1).unwrap().destination == sim.order(2).unwrap().destination
        && sim.order(1).unwrap().origin == sim.order(2).unwrap().origin;
    let top = sim.most_frequent_routes(2);
    if same_path {
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 4);
    } else {
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].count, 3);
        assert_eq!(top[0].route.order, Some(1));
        assert_eq!(top[1].count, 1);
    }
    assert_eq!(sim.frequency().total_count(), 4);
}

#[test]
fn mst_spans_the_active_network() {
    let mut sim = Simulation::new(config(8)).expect("valid config");
    sim.initialize(10, 18, 0).expect("network builds");

    let tree = sim.minimum_spanning_tree().expect("active run");
    assert!(tree.is_spanning());
    assert_eq!(tree.edges.len(), 9);
    let skeleton_weight = sim.run().unwrap().skeleton.total_weight();
    assert!(tree.total_weight <= skeleton_weight + 1e-9);
}

#[test]
fn reinitialise_replaces_the_previous_run() {
    let mut sim = Simulation::new(config(13)).expect("valid config");
    let first = sim.initialize(6, 7, 2).expect("network builds");
    sim.compute_route(1, "bfs").expect("route");
    let second = sim.initialize(7, 9, 1).expect("network builds");

    assert_eq!(second.run_id, first.run_id + 1);
    assert_eq!(sim.orders().len(), 1);
    assert!(sim.frequency().is_empty());
    assert_eq!(sim.graph().unwrap().vertex_count(), 7);
}

#[test]
fn config_file_overrides_defaults() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{ "autonomy": 75, "seed": 4, "network": {{ "max_edge_weight": 9 }} }}"#
    )
    .expect("write config");

    let config = SimulationConfig::from_path(file.path()).expect("config loads");
    assert_eq!(config.autonomy, 75.0);
    assert_eq!(config.network.max_edge_weight, 9.0);
    assert_eq!(config.max_build_attempts, 5);

    let mut sim = Simulation::new(config).expect("valid config");
    let summary = sim.initialize(9, 12, 3).expect("network builds");
    assert_eq!(summary.autonomy, 75.0);
}

#[test]
fn shared_simulation_serves_concurrent_routes() {
    let shared = SharedSimulation::new(Simulation::new(config(17)).expect("valid config"));
    shared.initialize(12, 24, 8).expect("network builds");

    let handles: Vec<_> = (1..=8)
        .map(|order| {
            let shared = shared.clone();
            thread::spawn(move || shared.compute_route(order, "dijkstra"))
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread finished").expect("route");
    }

    let stats = shared.statistics().expect("lock healthy");
    assert_eq!(stats.routes, 8);
    assert_eq!(stats.orders_by_status["pending"], 0);

    shared.reset().expect("lock healthy");
    assert!(matches!(
        shared.minimum_spanning_tree(),
        Err(Error::NoActiveRun)
    ));
}
