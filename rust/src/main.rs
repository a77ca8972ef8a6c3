use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use gantt_cores::logging::setup_logging;
use gantt_cores::render::{render_text, write_svg};
use gantt_cores::{allocate, load_problem, AllocationConfig, JobOrder, RenderConfig};

/// Assign cores to pre-timed jobs, verify the schedule and draw it as a Gantt chart
#[derive(Parser)]
#[command(author, version, about)]
struct Opts {
    /// Input file to evaluate
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    filename: PathBuf,

    /// Output file for the chart (SVG); the chart is printed to the terminal when omitted
    #[arg(short = 's', long = "save", value_name = "FILE")]
    savefig: Option<PathBuf>,

    /// Order in which jobs claim cores: "input" or "start-time"
    #[arg(long, default_value = "input")]
    order: JobOrder,

    /// Print the assignment as JSON (replaces the terminal chart)
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let problem = load_problem(&opts.filename)
        .with_context(|| format!("Cannot load {}", opts.filename.display()))?;
    let config = AllocationConfig {
        order: opts.order,
        verbosity: opts.verbose,
    };
    let allocation = allocate(problem, &config)?;
    log::info!(
        "All {} jobs placed on {} machines",
        allocation.jobs.len(),
        allocation.machines.len()
    );

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&allocation.jobs)?);
    }
    match &opts.savefig {
        Some(path) => write_svg(&allocation, &RenderConfig::default(), path)?,
        None if !opts.json => print!("{}", render_text(&allocation)?),
        None => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    setup_logging(opts.verbose);

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

/// Fatal error line printed regardless of the log filter.
fn diagnostic(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}
