//! Output formatting for command results.
//!
//! Text output is colored when the terminal allows it; JSON output is a
//! single pretty-printed document on stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use droneroute_lib::output::{render_ranking, RankingEntry};
use droneroute_lib::{RenderMode, RouteSummary};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored plain text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn render_mode(self) -> RenderMode {
        match self {
            OutputFormat::Rich => RenderMode::RichText,
            OutputFormat::Text | OutputFormat::Json => RenderMode::PlainText,
        }
    }
}

/// Write `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    writeln!(stdout)
}

/// Print a section heading.
pub fn print_heading(palette: &ColorPalette, title: &str) {
    println!("\n{}{title}{}", palette.heading, palette.reset);
}

/// Print a route with per-step battery levels.
///
/// Recharge stops are highlighted, and so is any step that lands with less
/// than a fifth of the battery left.
pub fn render_route_text(summary: &RouteSummary, palette: &ColorPalette) {
    let first = summary
        .steps
        .first()
        .map(|step| step.vertex.to_string())
        .unwrap_or_default();
    let last = summary
        .steps
        .last()
        .map(|step| step.vertex.to_string())
        .unwrap_or_default();
    println!(
        "{}Route {}{}: {first} -> {last} ({} hops, weight {:.2}, algorithm: {})",
        palette.ok, summary.route, palette.reset, summary.hops, summary.total_weight, summary.algorithm
    );
    for step in &summary.steps {
        let name = step.name.as_deref().unwrap_or("<unknown>");
        let battery = step.energy.remaining;
        let (color, tag) = if step.energy.recharged {
            (palette.recharge, " RECHARGE")
        } else if battery < summary.autonomy * 0.2 {
            (palette.low, "")
        } else {
            ("", "")
        };
        println!(
            " {}{:>3}{} {name} ({}) {}leg {:.2}{} battery {color}{battery:.2}{tag}{}",
            palette.muted,
            step.index,
            palette.reset,
            step.vertex,
            palette.muted,
            step.energy.leg_weight,
            palette.reset,
            palette.reset
        );
    }
}

/// Print a route in the requested format.
pub fn render_route(summary: &RouteSummary, format: OutputFormat, palette: &ColorPalette) {
    match format {
        OutputFormat::Text => render_route_text(summary, palette),
        OutputFormat::Rich => print!("{}", summary.render(RenderMode::RichText)),
        OutputFormat::Json => {
            if let Err(err) = render_json(summary) {
                tracing::warn!(error = %err, "failed to write route JSON");
            }
        }
    }
}

/// Print the route popularity ranking.
pub fn render_ranking_text(entries: &[RankingEntry]) {
    print!("{}", render_ranking(entries));
}

/// Print a failed route computation.
pub fn render_failure(order: u64, message: &str, palette: &ColorPalette) {
    println!(
        "{}order {order}: {message}{}",
        palette.error, palette.reset
    );
}

/// Print the footer with elapsed time and draw count.
pub fn print_footer(elapsed: std::time::Duration, draws: Option<usize>, palette: &ColorPalette) {
    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{elapsed_ms}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };
    match draws {
        Some(draws) => println!(
            "\n{}Completed in {time_str} ({} candidate draws){}",
            palette.muted,
            format_with_separators(draws as u64),
            palette.reset
        ),
        None => println!("\n{}Completed in {time_str}{}", palette.muted, palette.reset),
    }
}
