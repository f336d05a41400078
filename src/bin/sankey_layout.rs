//! Sankey Layout CLI
//!
//! Reads a graph document as JSON, lays it out and prints the annotated
//! graph as JSON on stdout. Logs go to stderr.
//!
//! ## Input
//!
//! ```json
//! {
//!   "nodes": [{ "name": "web" }, { "name": "api" }],
//!   "links": [{ "source": 0, "target": "api", "value": 4 }],
//!   "options": { "size": [800, 400], "nodeWidth": 18, "nodePadding": 8 }
//! }
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: sankey_layout=warn)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! sankey_layout graph.json --paths --iterations 64
//! cat graph.json | sankey_layout -
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sankey_layout::{GraphInput, LayoutConfig, Sankey, SankeyGraph};

/// Initialize the tracing subscriber with JSON or pretty format on stderr
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sankey_layout=warn".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Lay out a Sankey graph document and print it as JSON
#[derive(Parser, Debug)]
#[command(name = "sankey_layout")]
#[command(version)]
#[command(about = "Compute a Sankey layout from a JSON graph document", long_about = None)]
struct Args {
    /// Input JSON file (omit or use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Include an SVG path string for every link
    #[arg(long)]
    paths: bool,

    /// Relaxation rounds (defaults to the configured iteration count)
    #[arg(long, value_name = "N")]
    iterations: Option<usize>,
}

impl Args {
    /// Input file, or `None` for stdin.
    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn read_input(path: Option<&Path>) -> Result<GraphInput, Box<dyn std::error::Error>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&text)?)
}

/// JSON document written to stdout.
#[derive(Serialize)]
struct Output<'a> {
    schema_version: &'static str,
    params_hash: String,
    fingerprint: String,
    config: &'a LayoutConfig,
    graph: &'a SankeyGraph,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<Vec<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let input = read_input(args.input_path())?;

    let mut sankey = Sankey::default();
    sankey.configure(&input.options)?;
    sankey.set_graph(input.nodes, input.links);

    let iterations = args.iterations.unwrap_or(sankey.config().iterations);
    sankey.layout(iterations)?;

    let config = sankey.config();
    let graph = sankey.graph().ok_or("layout produced no graph")?;
    info!(
        nodes = graph.num_nodes(),
        links = graph.num_links(),
        circular = graph.circular_links.len(),
        warnings = graph.warnings.len(),
        "layout finished"
    );

    let paths = args.paths.then(|| {
        sankey
            .link_path()
            .paths(graph)
            .iter()
            .map(|p| p.to_svg())
            .collect()
    });

    let output = Output {
        schema_version: sankey_layout::LAYOUT_SCHEMA_VERSION,
        params_hash: config.params_hash(),
        fingerprint: graph.fingerprint(),
        config,
        graph,
        paths,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let argv = ["sankey_layout", "graph.json", "--paths", "--iterations", "64"];
        let args = Args::try_parse_from(argv).unwrap();

        assert_eq!(args.input_path(), Some(Path::new("graph.json")));
        assert!(args.paths);
        assert_eq!(args.iterations, Some(64));
    }

    #[test]
    fn test_dash_and_missing_input_read_stdin() {
        let dash = Args::try_parse_from(["sankey_layout", "-"]).unwrap();
        let bare = Args::try_parse_from(["sankey_layout"]).unwrap();

        assert_eq!(dash.input_path(), None);
        assert_eq!(bare.input_path(), None);
        assert!(!bare.paths);
        assert_eq!(bare.iterations, None);
    }

    #[test]
    fn test_bad_iteration_count_rejected() {
        assert!(Args::try_parse_from(["sankey_layout", "--iterations", "many"]).is_err());
        assert!(Args::try_parse_from(["sankey_layout", "--bogus"]).is_err());
    }
}
