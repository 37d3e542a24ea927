mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use droneroute_cli::logging::{init_logging, LoggingConfig};

use commands::algorithms::handle_algorithms;
use commands::mst::handle_mst;
use commands::route::{handle_route, RouteCommandArgs};
use commands::simulate::{handle_simulate, SimulateCommandArgs};
use commands::{GlobalOptions, NetworkSize};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drone delivery network simulation")]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a network, route every order and rank the routes.
    Simulate {
        #[command(flatten)]
        size: NetworkSize,
        /// Number of orders to generate.
        #[arg(long, default_value_t = 10)]
        orders: usize,
        /// Routing algorithm; repeat to cycle through several.
        ///
        /// `topological_sort` needs a directed acyclic graph. Generated
        /// networks always contain cycles, so it fails every order.
        #[arg(long = "algorithm", short = 'a')]
        algorithms: Vec<String>,
        /// Entries in the popularity ranking.
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Mark routed orders as delivered.
        #[arg(long)]
        deliver: bool,
        /// Print every computed route.
        #[arg(long)]
        show_routes: bool,
    },
    /// Route one order on a generated network.
    Route {
        #[command(flatten)]
        size: NetworkSize,
        /// Number of orders to generate.
        #[arg(long, default_value_t = 1)]
        orders: usize,
        /// Order to route.
        #[arg(long, default_value_t = 1)]
        order: u64,
        /// Routing algorithm (`topological_sort` needs an acyclic network).
        #[arg(long, short = 'a', default_value = "dijkstra")]
        algorithm: String,
    },
    /// Print the minimum spanning tree of a generated network.
    Mst {
        #[command(flatten)]
        size: NetworkSize,
    },
    /// List the routing algorithms.
    Algorithms,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::from_env().verbose(cli.verbose));

    match cli.command {
        Command::Simulate {
            size,
            orders,
            algorithms,
            top,
            deliver,
            show_routes,
        } => handle_simulate(
            &cli.options,
            &SimulateCommandArgs {
                size,
                orders,
                algorithms,
                top,
                deliver,
                show_routes,
            },
        ),
        Command::Route {
            size,
            orders,
            order,
            algorithm,
        } => handle_route(
            &cli.options,
            &RouteCommandArgs {
                size,
                orders,
                order,
                algorithm,
            },
        ),
        Command::Mst { size } => handle_mst(&cli.options, size),
        Command::Algorithms => handle_algorithms(cli.options.format),
    }
}
