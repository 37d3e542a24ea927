//! Minimum spanning tree of a generated network.

use anyhow::Result;

use droneroute_lib::output::render_spanning_tree;

use crate::commands::{start_run, GlobalOptions, NetworkSize};
use droneroute_cli::output::{render_json, OutputFormat};

pub fn handle_mst(options: &GlobalOptions, size: NetworkSize) -> Result<()> {
    let (simulation, summary) = start_run(options, size, 0)?;
    let tree = simulation.minimum_spanning_tree()?;

    match options.format {
        OutputFormat::Json => render_json(&serde_json::json!({
            "run": summary,
            "tree": tree,
        }))?,
        OutputFormat::Text | OutputFormat::Rich => {
            print!("{}", summary.render(options.format.render_mode()));
            print!("{}", render_spanning_tree(&tree));
        }
    }
    Ok(())
}
