//! brandcheck CLI: analyze logo images for brand compliance.

use std::path::PathBuf;
use std::process::ExitCode;

use brandcheck::analyze::analyze_batch;
use brandcheck::core::Rgb;
use brandcheck::{AnalysisConfig, ColorComplianceChecker};
use clap::{CommandFactory, Parser, Subcommand};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "brandcheck")]
#[command(about = "Check logo images against brand color and geometry rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Images to analyze. Prints a JSON array with one entry per image.
    images: Vec<PathBuf>,

    /// JSON config file; command-line overrides are applied on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Brand color as a hex string, e.g. "#FFBC0D".
    #[arg(long, global = true, value_name = "HEX")]
    target_hex: Option<String>,

    /// Maximum RGB distance still counted as the brand color.
    #[arg(long, global = true)]
    tolerance: Option<u32>,

    /// Largest rotation, in degrees, accepted without a violation.
    #[arg(long, global = true, value_name = "DEGREES")]
    max_rotation: Option<f64>,

    /// Cluster at most N pixels when extracting dominant colors (0 = all).
    /// Speeds up photos with many distinct colors.
    #[arg(long, global = true, value_name = "N")]
    max_samples: Option<usize>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Log level written to stderr (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    /// Emit logs and spans through `tracing` as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a hex color matches the brand color.
    Hex {
        /// Color such as "#FFBC0D" or "ffbc0d".
        hex: String,
    },
    /// Print the effective configuration as JSON.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.command.is_none() && cli.images.is_empty() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "no images given; pass one or more image paths or use a subcommand",
            )
            .exit();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    if cli.json_logs {
        brandcheck::core::init_tracing(true, cli.log_level);
        return;
    }
    let _ = brandcheck::core::init_with_level(cli.log_level);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    let _ = brandcheck::core::init_with_level(cli.log_level);
}

fn run(cli: Cli) -> CliResult<()> {
    let config = effective_config(&cli)?;

    match &cli.command {
        Some(Commands::Hex { hex }) => {
            let checker = ColorComplianceChecker::new(config.compliance.clone(), config.color.clone());
            let parsed = hex.parse::<Rgb>().ok();
            let out = serde_json::json!({
                "hex": hex,
                "rgb": parsed,
                "target": config.compliance.target_color.to_hex(),
                "matches": checker.validate_hex_color(hex),
            });
            print_json(&out, cli.pretty)
        }
        Some(Commands::Config) => print_json(&config, cli.pretty),
        None => {
            let items = analyze_batch(&cli.images, &config);
            print_json(&items, cli.pretty)
        }
    }
}

fn effective_config(cli: &Cli) -> CliResult<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(hex) = &cli.target_hex {
        config.compliance.target_color = Rgb::from_hex(hex)?;
    }
    if let Some(tolerance) = cli.tolerance {
        config.compliance.color_tolerance = tolerance;
    }
    if let Some(max_rotation) = cli.max_rotation {
        config.compliance.max_rotation_degrees = max_rotation;
    }
    if let Some(max_samples) = cli.max_samples {
        config.color.max_cluster_samples = (max_samples > 0).then_some(max_samples);
    }
    config.compliance.validate()?;
    log::debug!("effective config: {config:?}");
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
