//! subgraph-cli: extract one point-anchored routing subgraph.
//!
//! Loads an edge CSV (or the built-in Munich block), resolves snap settings
//! from a TOML file (or a 25 m default), runs a single request, and writes
//! `edges.csv` / `summary.csv` to the output directory.
//!
//! ```text
//! RUST_LOG=debug subgraph-cli --lon 11.543274 --lat 48.195524 --max-cutoff 1200
//! ```

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sn_assemble::{AssemblerBuilder, AssemblyObserver, RoutingRequest, RoutingSubgraph};
use sn_core::{CancellationToken, Settings};
use sn_network::load_edges_csv;
use sn_output::{CsvWriter, OutputWriter, SubgraphOutputObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SNAP_TOLERANCE_M: f64 = 25.0;

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Edge CSV; the built-in Munich block is used when absent.
    #[arg(long, env = "SNAPNET_EDGES")]
    edges: Option<PathBuf>,

    /// Layered settings TOML (`[defaults]`, `[study_area]`, `[user]`).
    #[arg(long, env = "SNAPNET_SETTINGS")]
    settings: Option<PathBuf>,

    #[arg(long, default_value_t = 11.543274, allow_negative_numbers = true)]
    lon: f64,

    #[arg(long, default_value_t = 48.195524, allow_negative_numbers = true)]
    lat: f64,

    /// Travel-time cutoff in seconds.
    #[arg(long, default_value_t = 1200.0)]
    max_cutoff: f64,

    /// Travel speed in m/s.
    #[arg(long, default_value_t = 1.33)]
    speed: f64,

    /// `default`, `scenario`, or `comparison`.
    #[arg(long, default_value = "default")]
    modus: String,

    #[arg(long, default_value_t = 1)]
    scenario: i64,

    #[arg(long, default_value = "walking_standard")]
    profile: String,

    #[arg(long, default_value = "output/subgraph-cli")]
    out: PathBuf,
}

// ── Observer wrapper to log stage counts ──────────────────────────────────────

struct LoggingObserver<W: OutputWriter> {
    inner: SubgraphOutputObserver<W>,
}

impl<W: OutputWriter> AssemblyObserver for LoggingObserver<W> {
    fn on_narrow_query(&mut self, edges: usize) {
        info!(edges, "narrow query");
    }

    fn on_splice(&mut self, artificial: usize, superseded: usize) {
        info!(artificial, superseded, "splice");
    }

    fn on_wide_query(&mut self, edges: usize) {
        info!(edges, "wide query");
    }

    fn on_assembled(&mut self, subgraph: &RoutingSubgraph) {
        self.inner.on_assembled(subgraph);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    // 1. Edge store.
    let store = match &args.edges {
        Some(path) => load_edges_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => network::block_store()?,
    };
    info!(edges = store.len(), "edge store ready");

    // 2. Settings.
    let settings = match &args.settings {
        Some(path) => Settings::from_toml_path(path).with_context(|| format!("reading {}", path.display()))?,
        None => Settings::single("snap_tolerance_m", DEFAULT_SNAP_TOLERANCE_M),
    };
    let assembler = AssemblerBuilder::new(store).settings(settings).build()?;

    // 3. Request.
    let request = RoutingRequest {
        x:               vec![args.lon],
        y:               vec![args.lat],
        max_cutoff:      args.max_cutoff,
        speed:           args.speed,
        modus:           args.modus.clone(),
        scenario_id:     args.scenario,
        routing_profile: args.profile.clone(),
    };
    let typed = request.validate()?;
    let cancel = CancellationToken::new();

    // 4. Output.
    std::fs::create_dir_all(&args.out)?;
    let writer = CsvWriter::new(&args.out)?;
    let mut obs = LoggingObserver { inner: SubgraphOutputObserver::new(writer) };

    // 5. Run.
    let t0 = Instant::now();
    let subgraph = assembler.assemble_with(&typed, &cancel, &mut obs)?;
    let elapsed = t0.elapsed();
    obs.inner.finish()?;
    subgraph.check_invariants()?;

    // 6. Summary.
    println!("Subgraph assembled in {:.3} ms", elapsed.as_secs_f64() * 1e3);
    println!(
        "  start node : {}",
        subgraph.start_node.map_or_else(|| "none (point did not snap)".to_owned(), |n| n.to_string())
    );
    println!("  edges      : {} ({} artificial)", subgraph.len(), subgraph.artificial.len());
    println!("  superseded : {:?}", subgraph.superseded.iter().map(|id| id.get()).collect::<Vec<_>>());
    println!("  output     : {}", args.out.display());
    println!();

    // 7. Projected rows, as a routing engine would receive them.
    let rows = subgraph.output_edges();
    println!("{:<14} {:>8} {:>8} {:>10} {:>9}", "Edge", "Source", "Target", "Length m", "Dead end");
    println!("{}", "-".repeat(53));
    for row in &rows {
        println!(
            "{:<14} {:>8} {:>8} {:>10.1} {:>9}",
            row.id.get(),
            row.source.get(),
            row.target.get(),
            row.length_m,
            row.dead_end.map_or("-", |d| if d { "yes" } else { "no" }),
        );
    }
    Ok(())
}
