//! # Tower Sizing CLI
//!
//! Command line front end for `sizing_core`: runs a sizing job file, writes
//! a demo job and lists profile catalogs.
//!
//! ```text
//! tower-sizing template demo.tsj
//! tower-sizing run demo.tsj --report demo.report.json
//! tower-sizing catalog --csv angles.csv
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sizing_core::file_io::{load_job, save_job, save_report, SizingReport};
use sizing_core::job::SizingJob;
use sizing_core::materials::{builtin_angle_profiles, ProfileCatalog, ProfileUsage};
use sizing_core::sizing::{size_members, SizingOutcome, SizingOutput};
use sizing_core::weight::{weight_takeoff, WeightSummary};

#[derive(Debug, Parser)]
#[command(name = "tower-sizing", version, about)]
struct Cli {
    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Size every member of a job and design the end connections
    Run {
        /// Job file (.tsj)
        job: PathBuf,

        /// Return an infeasible outcome instead of failing
        #[arg(long)]
        soft: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Write a JSON report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Replace the job's profile catalog with a CSV export
        #[arg(long, value_name = "CSV")]
        profiles: Option<PathBuf>,
    },

    /// Write a demo job file
    Template {
        /// Output path
        path: PathBuf,
    },

    /// List a profile catalog (built-in by default)
    Catalog {
        /// CSV export to list instead of the built-in angles
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
}

fn default_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// `RUST_LOG` wins when set and valid; otherwise the verbosity level applies.
fn log_filter(rust_log: Option<&str>, verbosity: u8) -> EnvFilter {
    let fallback = || EnvFilter::new(default_level(verbosity).as_str());
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| fallback())
        }
        _ => fallback(),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), verbosity);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Run {
            job,
            soft,
            json,
            report,
            profiles,
        } => run(job, soft, json, report, profiles),
        Command::Template { path } => {
            save_job(&SizingJob::demo(), &path)
                .with_context(|| format!("failed to write template {}", path.display()))?;
            println!("Demo job written to {}", path.display());
            Ok(())
        }
        Command::Catalog { csv } => {
            let catalog = match csv {
                Some(path) => ProfileCatalog::load_from_csv(&path)
                    .with_context(|| format!("failed to load catalog {}", path.display()))?,
                None => builtin_angle_profiles(),
            };
            print_catalog(&catalog);
            Ok(())
        }
    }
}

fn run(
    path: PathBuf,
    soft: bool,
    json: bool,
    report: Option<PathBuf>,
    profiles: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut job = load_job(&path).with_context(|| format!("failed to load job {}", path.display()))?;
    if soft {
        job.input.config.hard_stop = false;
    }
    if let Some(csv) = profiles {
        job.input.profiles = ProfileCatalog::load_from_csv(&csv)
            .with_context(|| format!("failed to load catalog {}", csv.display()))?;
    }

    println!("Job {} - {}", job.meta.job_id, job.meta.description);
    println!(
        "{} members, {} hypotheses, {} profiles",
        job.input.members.len(),
        job.input.hypotheses.len(),
        job.input.profiles.len()
    );
    println!();

    let outcome = match size_members(&job.input) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("[FAIL] {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return Err(e).context("sizing failed");
        }
    };

    let weight = match &outcome {
        SizingOutcome::Sized(output) => {
            print_results(output);
            let weight = weight_takeoff(output, &job.input.profiles)?;
            print_weight(&weight);
            Some(weight)
        }
        SizingOutcome::Infeasible { reason } => {
            println!("[FAIL] No feasible sizing: {}", reason);
            None
        }
    };

    if json {
        println!();
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    if let Some(report_path) = report {
        let report = SizingReport::new(&job, outcome, weight);
        save_report(&report, &report_path)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
        println!();
        println!("Report written to {}", report_path.display());
    }

    Ok(())
}

fn print_results(output: &SizingOutput) {
    println!(
        "{:<6} {:<11} {:>3}  {:<14} {:<12} {:>6} {:>6} {:>5}  ",
        "Member", "Class", "Mod", "Profile", "Governing", "Axial", "Conn", "Bolts"
    );
    println!("{}", "-".repeat(76));

    for (id, result) in &output.results {
        let axial = result.final_axial_utilization.unwrap_or(0.0);
        let connection = result.final_connection_utilization.unwrap_or(0.0);
        let bolts = output
            .connections
            .get(id)
            .and_then(|c| c.bolt_count)
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let module = result.module.map_or_else(|| "-".to_string(), |m| m.to_string());

        println!(
            "{:<6} {:<11} {:>3}  {:<14} {:<12} {:>6.3} {:>6.3} {:>5}  {}",
            id.to_string(),
            format!("{:?}", result.class),
            module,
            result.profile,
            result.governing_hypothesis,
            axial,
            connection,
            bolts,
            status_icon(axial <= 1.0 && connection <= 1.0)
        );
    }

    let required: Vec<String> = output.connection_required.iter().map(|id| id.to_string()).collect();
    println!();
    println!("Connection-required legs: {}", required.join(", "));
}

fn print_weight(weight: &WeightSummary) {
    println!();
    println!("{:<8} {:>10} {:>10} {:>10}", "Module", "Legs kg", "Bracing kg", "Total kg");
    for (module, split) in &weight.modules {
        println!(
            "{:<8} {:>10.1} {:>10.1} {:>10.1}",
            module,
            split.legs_kg,
            split.bracing_kg,
            split.total_kg()
        );
    }
    println!("Total steel: {:.1} kg", weight.total_kg);
}

fn print_catalog(catalog: &ProfileCatalog) {
    println!(
        "{:<16} {:>8} {:>7} {:>7} {:>6} {:>8} {:>8}  {}",
        "Profile", "A cm2", "rx cm", "rz cm", "t cm", "kg/m", "Dmax cm", "Usage"
    );
    for profile in catalog.iter() {
        let usage = match profile.usage {
            ProfileUsage::Unrestricted => "",
            ProfileUsage::NotForLegs => "bracing only",
            ProfileUsage::Withdrawn => "withdrawn",
        };
        let max_bolt = profile
            .max_bolt_diameter_cm
            .map_or_else(|| "-".to_string(), |d| format!("{:.2}", d));
        println!(
            "{:<16} {:>8.2} {:>7.2} {:>7.2} {:>6.2} {:>8.2} {:>8}  {}",
            profile.name,
            profile.area_cm2,
            profile.rx_cm,
            profile.rz_cm,
            profile.thickness_cm,
            profile.mass_kg_m,
            max_bolt,
            usage
        );
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}
