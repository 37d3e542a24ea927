use anyhow::Result;

use droneroute_lib::{select_planner, RouteAlgorithm};

use droneroute_cli::output::{render_json, OutputFormat};

/// Caveat printed next to planners that need a directed acyclic graph.
///
/// Generated networks always contain cycles (undirected legs, or directed
/// skeletons laid both ways), so these planners report every order as
/// unsupported inside a simulation run.
pub const DAG_ONLY_NOTE: &str =
    "directed acyclic graphs only; generated networks always contain cycles";

/// List the routing algorithms.
pub fn handle_algorithms(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        render_json(&RouteAlgorithm::names())?;
        return Ok(());
    }
    for algorithm in RouteAlgorithm::ALL {
        let marker = if algorithm == RouteAlgorithm::default() {
            " (default)"
        } else {
            ""
        };
        if select_planner(algorithm).requires_dag() {
            println!("{algorithm}{marker} ({DAG_ONLY_NOTE})");
        } else {
            println!("{algorithm}{marker}");
        }
    }
    Ok(())
}
