//! # mieru
//!
//! Command-line front end: scan a project and print its page and component
//! structure, either as a short summary or as a JSON report.

use std::any::Any;
use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use mieru::MieruConfig;
use mieru::output::{render_json, render_summary};
use mieru::pages::ExpansionTracking;
use mieru::pipeline::{RunOptions, analyze_project};

#[derive(Parser, Debug)]
#[command(name = "mieru")]
#[command(about = "Page and component structure analyzer for React, Next.js, Vue and Nuxt.js")]
#[command(version)]
struct Args {
    /// Project root to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Only the page structure (with --graph: both)
    #[arg(long)]
    pages: bool,

    /// Only the dependency graph (with --pages: both)
    #[arg(long)]
    graph: bool,

    /// Classify every pair of files in the graph (slow on large projects)
    #[arg(long)]
    relationships: bool,

    /// Component expansion depth (default: 5 for React/Next, 3 otherwise)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Expand each component once per run instead of once per page
    #[arg(long)]
    shared_tracking: bool,

    /// Framework hint JSON file, replacing the package.json guess
    #[arg(long, value_name = "FILE")]
    hint: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). MIERU_LOG overrides it.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MIERU_LOG")
                .unwrap_or_else(|_| log_level.parse().unwrap_or_default()),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let root = args.path.clone();
    let mut config = MieruConfig::load(&root);
    if let Some(depth) = args.max_depth {
        config.max_expansion_depth = Some(depth);
    }
    if args.shared_tracking {
        config.expansion_tracking = ExpansionTracking::Shared;
    }
    debug!("config: {:?}", config);

    let (include_graph, include_pages) = match (args.graph, args.pages) {
        (false, false) => (true, true),
        selected => selected,
    };
    let options = RunOptions {
        config,
        hint_path: args.hint,
        include_graph,
        include_pages,
        relationships: args.relationships,
    };

    let report = analyze_project(&root, &options)
        .with_context(|| format!("failed to analyze {}", root.display()))?;

    let rendered = if args.json {
        render_json(&report).context("failed to serialize report")?
    } else {
        render_summary(&report)
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end()).context("failed to write output")?;
    Ok(())
}

fn main() -> ExitCode {
    install_broken_pipe_handler();
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[mieru] error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
