use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rune_visualiser_core::{
    format_for_path, parse_format, AppConfig, Chart, ImageFormat, NotePlacement, RenderWindow,
    Renderer, RuneVizError,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() -> rune_visualiser_core::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_tracing(&config.log.filter);

    let result = match cli.command {
        Commands::Render {
            chart,
            output,
            format,
        } => run_render(&config, &chart, &output, format.as_deref()),
        Commands::Inspect { chart } => run_inspect(&chart),
    };

    if let Err(err) = &result {
        if err.is_input_rejection() {
            tracing::warn!(%err, "invalid input");
        } else {
            tracing::error!(%err, "unexpected error while rendering");
        }
    }
    result
}

/// Loads the configuration. A broken config file is still reported through
/// tracing, using the default filter since the configured one is unknown.
fn load_config(path: &Path) -> rune_visualiser_core::Result<AppConfig> {
    AppConfig::load(path).inspect_err(|err| {
        init_tracing(&AppConfig::default().log.filter);
        tracing::error!(%err, config = ?path, "failed to load configuration");
    })
}

fn load_chart(path: &Path) -> rune_visualiser_core::Result<Chart> {
    let json = std::fs::read_to_string(path)?;
    Chart::from_json(&json)
}

fn resolve_format(
    config: &AppConfig,
    output: &Path,
    requested: Option<&str>,
) -> rune_visualiser_core::Result<ImageFormat> {
    match requested {
        Some(name) => parse_format(name),
        None => format_for_path(output).or_else(|err| match output.extension() {
            None => parse_format(&config.output.default_format),
            Some(_) => Err(err),
        }),
    }
}

fn run_render(
    config: &AppConfig,
    chart_path: &Path,
    output: &Path,
    format: Option<&str>,
) -> rune_visualiser_core::Result<()> {
    tracing::info!(chart = ?chart_path, ?output, "rendering rune string image");

    let format = resolve_format(config, output, format)?;
    let chart = load_chart(chart_path)?;
    let image = Renderer::new()?.render(&chart)?;
    std::fs::write(output, image.encode(format)?)?;

    tracing::info!(
        width = image.width(),
        height = image.height(),
        ?format,
        "wrote rune string image"
    );
    Ok(())
}

fn run_inspect(chart_path: &Path) -> rune_visualiser_core::Result<()> {
    let chart = load_chart(chart_path)?;
    let window = RenderWindow::compute(&chart)?;
    let report = InspectReport {
        notes: window.place_notes(&chart.notes),
        grid_lines: window.grid_lines().len(),
        window,
    };

    let json = serde_json::to_string_pretty(&report).map_err(RuneVizError::from)?;
    println!("{json}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectReport {
    window: RenderWindow,
    grid_lines: usize,
    notes: Vec<NotePlacement>,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Renders rune string charts to images", long_about = None)]
struct Cli {
    /// JSON configuration file. Defaults are used when it does not exist.
    #[arg(short, long, global = true, default_value = "rune-visualiser.json")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a decoded chart to an image file.
    Render {
        /// Path to the decoded chart (JSON).
        chart: PathBuf,
        /// Output image path.
        output: PathBuf,
        /// Image format; inferred from the output extension when omitted.
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Print the computed layout of a chart as JSON.
    Inspect {
        /// Path to the decoded chart (JSON).
        chart: PathBuf,
    },
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}
