//! `leansim` - Lean construction schedule simulator.
//!
//! ## Commands
//!
//! - `detailed`: realize one schedule and print the activity timeline
//! - `monte-carlo`: repeat the simulation and print outcome statistics
//!
//! Without `--config` the built-in reference construction project is used.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use u_leansim::config::SimulationConfig;
use u_leansim::models::Schedule;
use u_leansim::simulation::{Metric, MonteCarloReport, SimulationMode, SimulationOutput};

#[derive(Parser)]
#[command(name = "leansim")]
#[command(author = "iyulab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lean construction schedule simulation", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true, env = "LEANSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print structured JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Realize one schedule and print the timeline
    Detailed {
        /// Lean improvement factor (0 = no improvement, 1 = no delay)
        #[arg(short, long)]
        lean: Option<f64>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run repeated simulations and print statistics
    MonteCarlo {
        /// Number of iterations
        #[arg(short = 'n', long, default_value_t = 1000)]
        iterations: usize,

        /// Lean improvement factor (0 = no improvement, 1 = no delay)
        #[arg(short, long)]
        lean: Option<f64>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Run iterations in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Also print P50/P85/P95 of each metric
        #[arg(long)]
        percentiles: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };

    let show_percentiles = match cli.command {
        Commands::Detailed { lean, seed } => {
            config.mode = SimulationMode::Detailed;
            apply_overrides(&mut config, lean, seed);
            false
        }
        Commands::MonteCarlo {
            iterations,
            lean,
            seed,
            parallel,
            percentiles,
        } => {
            config.mode = SimulationMode::MonteCarlo { iterations };
            config.parallel |= parallel;
            apply_overrides(&mut config, lean, seed);
            percentiles
        }
    };

    let simulation = config.simulation()?;
    info!(
        "simulating {} activities (lean={}, seed={})",
        simulation.project().len(),
        simulation.lean_factor(),
        simulation.seed()
    );
    let output = simulation.execute(config.mode)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &output {
        SimulationOutput::Detailed(schedule) => print_schedule(schedule),
        SimulationOutput::MonteCarlo(report) => print_report(report, show_percentiles),
    }
    Ok(())
}

fn apply_overrides(config: &mut SimulationConfig, lean: Option<f64>, seed: Option<u64>) {
    if let Some(lean) = lean {
        config.lean_factor = lean;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
}

fn print_schedule(schedule: &Schedule) {
    println!("Detailed project schedule");
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10} {:>6}",
        "Activity", "Start", "Finish", "Duration", "Base", "Delay", "Value"
    );
    for a in schedule.activities() {
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>6}",
            a.name,
            a.start,
            a.finish,
            a.duration,
            a.base_duration,
            a.applied_delay,
            if a.is_value_adding() { "yes" } else { "no" }
        );
    }
    println!();
    println!("Project duration:   {:.2} days", schedule.project_duration());
    println!("Value-adding time:  {:.2} days", schedule.value_adding_time());
    println!("Total delay:        {:.2} days", schedule.total_delay());
    println!("Efficiency:         {:.2}%", schedule.efficiency() * 100.0);
}

fn print_report(report: &MonteCarloReport, show_percentiles: bool) {
    let stats = &report.statistics;
    println!("Monte Carlo simulation");
    println!("Iterations:  {}", stats.iterations);
    println!("Lean factor: {:.2}", report.lean_factor);
    println!();
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "Metric", "Mean", "Min", "Max", "Std dev", "CV"
    );
    for metric in Metric::ALL {
        let m = stats.metric(metric);
        let cv = m
            .coefficient_of_variation()
            .map_or_else(|| "-".to_string(), |cv| format!("{cv:.4}"));
        println!(
            "{:<20} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>8}",
            metric.label(),
            m.mean,
            m.min,
            m.max,
            m.std_dev,
            cv
        );
    }
    println!();
    println!(
        "Pooled efficiency (mean value-adding / mean duration): {:.2}%",
        stats.pooled_efficiency() * 100.0
    );

    if show_percentiles {
        println!();
        println!("{:<20} {:>10} {:>10} {:>10}", "Metric", "P50", "P85", "P95");
        for metric in Metric::ALL {
            let p = |q| report.percentile(metric, q).unwrap_or(f64::NAN);
            println!(
                "{:<20} {:>10.3} {:>10.3} {:>10.3}",
                metric.label(),
                p(50.0),
                p(85.0),
                p(95.0)
            );
        }
    }
}
