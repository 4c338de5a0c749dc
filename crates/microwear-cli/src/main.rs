//! microwear CLI — compute and export dental microwear statistics.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use microwear::{Category, ExportMode, FeatureClass, MetricsRecord, Project, Sample, StatsConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "microwear")]
#[command(about = "Texture statistics for annotated dental microwear micrographs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics for a single annotated sample.
    Stats(CliStatsArgs),

    /// Export a project as a `;`-separated table.
    Export(CliExportArgs),

    /// List feature categories.
    Categories,
}

#[derive(Debug, Clone, Args)]
struct CliStatsArgs {
    /// Path to the sample document (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Optional engine constants (JSON); missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Json)]
    format: OutputFormatArg,
}

#[derive(Debug, Clone, Args)]
struct CliExportArgs {
    /// Path to the project document (JSON).
    #[arg(long)]
    project: PathBuf,

    /// Table layout.
    #[arg(long, value_enum, default_value_t = ExportModeArg::Full)]
    mode: ExportModeArg,

    /// Path to write the table (CSV with `;` delimiter).
    #[arg(long)]
    out: PathBuf,

    /// Optional engine constants (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportModeArg {
    Counts,
    Stats,
    Full,
    Average,
}

impl ExportModeArg {
    fn to_core(self) -> ExportMode {
        match self {
            Self::Counts => ExportMode::Counts,
            Self::Stats => ExportMode::Stats,
            Self::Full => ExportMode::Full,
            Self::Average => ExportMode::Average,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats(args) => run_stats(&args),
        Commands::Export(args) => run_export(&args),
        Commands::Categories => run_categories(),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<StatsConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading engine constants: {}", path.display());
            Ok(StatsConfig::from_json_file(path)?)
        }
        None => Ok(StatsConfig::default()),
    }
}

// ── stats ──────────────────────────────────────────────────────────────

fn run_stats(args: &CliStatsArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    tracing::info!("Loading sample: {}", args.input.display());
    let sample = Sample::from_json_file(&args.input)?;
    tracing::info!(
        "Sample '{}': {} items, calibrated={}",
        sample.name,
        sample.items.len(),
        sample.is_calibrated()
    );

    let stats = sample.stats(&config);
    match args.format {
        OutputFormatArg::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormatArg::Table => print_table(&stats),
    }
    Ok(())
}

fn print_table(stats: &MetricsRecord) {
    let width = MetricsRecord::KEYS
        .iter()
        .map(|k| k.len())
        .max()
        .unwrap_or(0);
    for (key, value) in stats.fields() {
        println!("  {:<width$}  {:>12.4}", key, value, width = width);
    }
}

// ── export ─────────────────────────────────────────────────────────────

fn run_export(args: &CliExportArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    tracing::info!("Loading project: {}", args.project.display());
    let project = Project::from_json_file(&args.project)?;
    tracing::info!(
        "Project '{}': {} samples",
        project.name,
        project.samples.len()
    );

    let mode = args.mode.to_core();
    let file = File::create(&args.out).map_err(|e| -> CliError {
        format!("Failed to create {}: {}", args.out.display(), e).into()
    })?;
    microwear::write_table(&project, mode, &config, BufWriter::new(file))?;
    tracing::info!("{:?} table written to {}", mode, args.out.display());
    Ok(())
}

// ── categories ─────────────────────────────────────────────────────────

fn run_categories() -> CliResult<()> {
    println!("microwear feature categories");
    for category in Category::ALL {
        let note = if category.is_statistically_relevant() {
            ""
        } else {
            "  (excluded from statistics)"
        };
        let class = match category.class() {
            FeatureClass::Pit => "pit",
            FeatureClass::Scratch => "scratch",
        };
        println!(
            "  {:<4} {:<4} {:<8} {}{}",
            category.tag(),
            category.label(),
            class,
            category.description(),
            note
        );
    }
    Ok(())
}
