use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use u_dispatch::config::PlannerConfig;
use u_dispatch::contract::{plan, ScenarioRequest, ScenarioResponse, SolveRequest, SolveResponse};
use u_dispatch::scenario::ScenarioRunner;
use u_dispatch::solver::RoutingSolver;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Planner configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one dispatch request
    Solve {
        /// JSON solve request
        #[arg(short, long)]
        input: PathBuf,

        /// Write the response here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Time budget in seconds, overriding the request and config
        #[arg(short, long)]
        budget: Option<f64>,
    },
    /// Compare a baseline against what-if scenarios
    Compare {
        /// JSON scenario request
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Time budget per scenario in seconds
        #[arg(short, long)]
        budget: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    match cli.command {
        Commands::Solve {
            input,
            output,
            budget,
        } => {
            let request: SolveRequest = read_json(&input)?;
            let budget = match budget {
                Some(secs) => std::time::Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid budget {secs}"))?,
                None => request.time_budget(config.solver.time_budget()),
            };
            let request = with_config_defaults(request, &config);
            let (model, limits) = request.into_model().context("invalid solve request")?;

            let dispatch = plan(&model, budget, &limits, &RoutingSolver::new(config.solver.params()));
            info!(
                routes = dispatch.solution.num_routes(),
                unserved = dispatch.solution.unserved().len(),
                violations = dispatch.violations.len(),
                cost = dispatch.economics.totals.total_cost,
                "solved"
            );
            write_json(output.as_deref(), &SolveResponse::from(&dispatch))?;
        }
        Commands::Compare {
            input,
            output,
            budget,
        } => {
            let mut request: ScenarioRequest = read_json(&input)?;
            let variants = request.variants();
            let budget = match budget {
                Some(secs) => std::time::Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid budget {secs}"))?,
                None => request.base.time_budget(config.solver.time_budget()),
            };
            request.base = with_config_defaults(request.base, &config);
            let (model, limits) = request.base.into_model().context("invalid base request")?;

            let report = ScenarioRunner::new(limits)
                .with_solver_params(config.solver.params())
                .compare(&model, &variants, budget);
            write_json(output.as_deref(), &ScenarioResponse::from(&report))?;
        }
    }

    Ok(())
}

/// Fills cost and limits the request leaves out from the configuration.
fn with_config_defaults(mut request: SolveRequest, config: &PlannerConfig) -> SolveRequest {
    request.cost = request.cost.or(Some(config.cost));
    request.limits = request.limits.or(Some(config.limits));
    request
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(file, value)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
