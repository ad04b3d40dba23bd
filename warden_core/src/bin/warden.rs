//! `warden` — a thin CLI shell over `warden_core`.
//!
//! Business logic lives in the library; this binary only parses
//! arguments, wires the pieces together, and maps the result onto an
//! exit code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use warden_core::baseline::Baseline;
use warden_core::config::Config;

#[derive(Parser)]
#[command(name = "warden", about = "Static analysis for Python sources", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run static analysis on the given path.
    Check {
        /// File or directory to scan.
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output findings as a JSON array instead of a text table.
        #[arg(long)]
        json: bool,

        /// Path to a YAML configuration file.
        #[arg(long, default_value = "warden.yaml")]
        config: PathBuf,

        /// Path to a baseline file used to suppress previously-accepted findings.
        #[arg(long, default_value = "warden-baseline.json")]
        baseline: PathBuf,

        /// Write a new baseline from the current findings instead of reporting them.
        #[arg(long)]
        generate_baseline: bool,

        /// Report every finding, including ones the baseline would normally suppress.
        #[arg(long)]
        show_baseline: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            path,
            json,
            config,
            baseline,
            generate_baseline,
            show_baseline,
        } => run_check(&path, json, &config, &baseline, generate_baseline, show_baseline),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_check(
    path: &Path,
    json: bool,
    config_path: &Path,
    baseline_path: &Path,
    generate_baseline: bool,
    show_baseline: bool,
) -> ExitCode {
    let config = Config::load(config_path);
    let registry = warden_core::default_registry();

    if !json && !generate_baseline {
        println!("Warden scanning: {}...", path.display());
    }

    let files = match warden_core::walker::discover(path, &config) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let findings = warden_core::engine::scan(&files, &registry, &config);

    if generate_baseline {
        if let Err(err) = Baseline::save(baseline_path, &findings) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
        if !json {
            println!(
                "Baseline generated at {} with {} issues.",
                baseline_path.display(),
                findings.len()
            );
        }
        return ExitCode::SUCCESS;
    }

    let findings = if show_baseline {
        findings
    } else {
        match Baseline::load(baseline_path) {
            Ok(baseline) => baseline.filter(findings),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };

    if json {
        println!("{}", warden_core::reporter::to_json(&findings));
    } else if findings.is_empty() {
        println!("No issues discovered!");
    } else {
        print!("{}", warden_core::reporter::to_table(&findings));
    }

    if findings.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
