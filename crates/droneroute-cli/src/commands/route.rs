//! Route a single order on a freshly generated network.

use anyhow::{Context, Result};

use droneroute_lib::{OrderId, RouteSummary};

use crate::commands::{start_run, GlobalOptions, NetworkSize};
use droneroute_cli::output::{render_route, OutputFormat};
use droneroute_cli::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    pub size: NetworkSize,
    /// Orders to generate; the routed order must be one of them.
    pub orders: usize,
    pub order: OrderId,
    /// Algorithm name as typed by the user.
    pub algorithm: String,
}

pub fn handle_route(options: &GlobalOptions, args: &RouteCommandArgs) -> Result<()> {
    let (mut simulation, summary) = start_run(options, args.size, args.orders.max(1))?;
    let route = simulation
        .compute_route(args.order, &args.algorithm)
        .with_context(|| format!("failed to route order {}", args.order))?;
    let route_summary = RouteSummary::for_simulation(&simulation, &route)?;

    let palette = ColorPalette::detect();
    if options.format != OutputFormat::Json {
        print!("{}", summary.render(options.format.render_mode()));
    }
    render_route(&route_summary, options.format, &palette);
    Ok(())
}
