//! Run a full simulation: build a network, route every order, rank routes.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use droneroute_lib::output::RankingEntry;
use droneroute_lib::{OrderId, RouteAlgorithm, RouteSummary, RunSummary, Statistics};

use crate::commands::{start_run, GlobalOptions, NetworkSize};
use droneroute_cli::output::{
    print_footer, print_heading, render_failure, render_json, render_ranking_text, render_route,
    OutputFormat,
};
use droneroute_cli::terminal::ColorPalette;

/// Arguments for the simulate command.
#[derive(Debug, Clone)]
pub struct SimulateCommandArgs {
    pub size: NetworkSize,
    pub orders: usize,
    /// Algorithm names; orders cycle through them.
    pub algorithms: Vec<String>,
    /// Number of entries in the popularity ranking.
    pub top: usize,
    /// Mark every routed order as delivered.
    pub deliver: bool,
    /// Print every computed route.
    pub show_routes: bool,
}

#[derive(Debug, Serialize)]
struct RouteFailure {
    order: OrderId,
    algorithm: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    run: RunSummary,
    routes: Vec<RouteSummary>,
    failures: Vec<RouteFailure>,
    ranking: Vec<RankingEntry>,
    statistics: Statistics,
}

pub fn handle_simulate(options: &GlobalOptions, args: &SimulateCommandArgs) -> Result<()> {
    let started = Instant::now();
    // Reject unknown names before doing any work.
    for name in &args.algorithms {
        name.parse::<RouteAlgorithm>()?;
    }
    let (mut simulation, run) = start_run(options, args.size, args.orders)?;

    let default_algorithm = [RouteAlgorithm::default().name().to_string()];
    let algorithms = if args.algorithms.is_empty() {
        &default_algorithm[..]
    } else {
        &args.algorithms[..]
    };

    let order_ids: Vec<OrderId> = simulation.orders().iter().map(|order| order.id).collect();
    let mut routes = Vec::new();
    let mut failures = Vec::new();
    for (order, algorithm) in order_ids.into_iter().zip(algorithms.iter().cycle()) {
        match simulation.compute_route(order, algorithm) {
            Ok(route) => {
                if args.deliver {
                    simulation.deliver_order(order)?;
                }
                routes.push(RouteSummary::for_simulation(&simulation, &route)?);
            }
            Err(err) => failures.push(RouteFailure {
                order,
                algorithm: algorithm.clone(),
                error: err.to_string(),
            }),
        }
    }

    let ranking = RankingEntry::from_ranked(&simulation.most_frequent_routes(args.top));
    let statistics = simulation.statistics();

    if options.format == OutputFormat::Json {
        render_json(&SimulationReport {
            run,
            routes,
            failures,
            ranking,
            statistics,
        })?;
        return Ok(());
    }

    let palette = ColorPalette::detect();
    print!("{}", run.render(options.format.render_mode()));
    if args.show_routes {
        print_heading(&palette, "Routes");
        for summary in &routes {
            render_route(summary, options.format, &palette);
        }
    }
    if !failures.is_empty() {
        print_heading(&palette, "Failed orders");
        for failure in &failures {
            render_failure(failure.order, &failure.error, &palette);
        }
    }
    print_heading(&palette, "Most frequent routes");
    render_ranking_text(&ranking);
    print_heading(&palette, "Statistics");
    print!("{}", statistics.render());
    print_footer(started.elapsed(), Some(run.draws), &palette);
    Ok(())
}
