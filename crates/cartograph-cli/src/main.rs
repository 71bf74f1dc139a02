//! Cartograph CLI — map a project's files, symbols and import graph.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cartograph_core::config::AnalysisConfig;
use cartograph_core::output::write_document;
use cartograph_core::pipeline::{self, PipelineRun};

#[derive(Parser)]
#[command(
    name = "cartograph",
    version,
    about = "Cartograph - Map the files, symbols and import cycles of a codebase"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a project directory and write a structural report
    Analyze {
        /// Path to the project root
        path: PathBuf,

        /// Output JSON file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum directory depth below the root
        #[arg(long, default_value = "10")]
        depth: usize,

        /// Comma-separated extension allow-list, e.g. py,ts
        #[arg(short, long)]
        extensions: Option<String>,

        /// Additional directory or file names to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Worker threads for extraction (0 = all cores)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Files larger than this many bytes are not parsed
        #[arg(long, default_value = "1000000")]
        max_file_size: u64,

        /// Debug logging and per-phase timing breakdown
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long, conflicts_with = "verbose")]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            output,
            depth,
            extensions,
            exclude,
            jobs,
            max_file_size,
            verbose,
            quiet,
        } => {
            init_logging(verbose);

            let root = path.canonicalize().unwrap_or(path);
            let project = project_name(&root);
            let output_path =
                output.unwrap_or_else(|| PathBuf::from(format!("{project}.cartograph.json")));

            let extensions = extensions.map(|list| {
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            });

            let config = AnalysisConfig {
                root: root.to_string_lossy().to_string(),
                output_path: Some(output_path.to_string_lossy().to_string()),
                max_depth: depth,
                extensions,
                exclude_patterns: exclude,
                max_file_size,
                jobs,
                ..Default::default()
            };

            if quiet {
                run_quiet(&config, &output_path);
            } else {
                run_with_progress(&config, &output_path, &project, verbose);
            }
        }
    }
}

/// Route `log` and `tracing` records to stderr. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,cartograph_core=debug,cartograph=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

fn run_quiet(config: &AnalysisConfig, output_path: &Path) {
    match pipeline::run_pipeline(config, None) {
        Ok(run) => {
            if let Err(e) = write_document(&run.document, output_path) {
                eprintln!("Error writing output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &AnalysisConfig, output_path: &Path, project: &str, verbose: bool) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let run = match pipeline::run_pipeline(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("{} Analysis failed: {e}", style("✗").red().bold());
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    print_summary(&run, project, start, verbose);

    if let Err(e) = write_document(&run.document, output_path) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path.display()
    );
}

fn print_summary(run: &PipelineRun, project: &str, start: Instant, verbose: bool) {
    let stats = &run.document.stats;
    let profile = &run.document.header.profile;

    println!(
        "\n{}  Cartograph Analysis: {}",
        style("✓").green().bold(),
        style(project).bold()
    );
    if let Some(ref project_type) = profile.project_type {
        if profile.frameworks.is_empty() {
            println!("  {:<14} {}", "Type:", project_type);
        } else {
            println!(
                "  {:<14} {} ({})",
                "Type:",
                project_type,
                profile.frameworks.join(", ")
            );
        }
    }
    println!("  {:<14} {}", "Files:", stats.files);
    println!(
        "  {:<14} {} ({} degraded, {} skipped)",
        "Parsed:", stats.parsed, stats.degraded, stats.skipped
    );
    println!("  {:<14} {}", "Symbols:", stats.symbols);
    println!(
        "  {:<14} {} ({} unresolved imports)",
        "Edges:", stats.internal_edges, stats.unresolved_imports
    );

    let cycles = if stats.cycles == 0 {
        style(stats.cycles.to_string()).green()
    } else {
        style(stats.cycles.to_string()).yellow().bold()
    };
    println!("  {:<14} {}", "Cycles:", cycles);

    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if verbose {
        println!("\n  Phase Timings:");
        for (phase, secs) in &run.timings {
            println!("    {:<14} {:.1}ms", phase, secs * 1000.0);
        }
    }
}
