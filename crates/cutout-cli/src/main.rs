//! cutout: render a sticker from a local image or URL.
//!
//! Runs the full pipeline once with configurable parameters, writes the
//! encoded sticker and prints per-stage diagnostics. Useful for:
//!
//! - Previewing what the bot will send for a given cutout
//! - Tuning outline radius, padding and resampling filter
//! - Measuring per-stage durations
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin cutout -- [OPTIONS] <INPUT>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use cutout_pipeline::{OutlineColor, OutputFormat, PipelineConfig, ResampleFilter};
use tracing_subscriber::EnvFilter;

/// Turn a transparent cutout into an outlined sticker.
#[derive(Parser, Debug)]
#[command(name = "cutout", version)]
struct Cli {
    /// Input image path, or an `http(s)://` URL to download.
    input: String,

    /// Where to write the encoded sticker.
    #[arg(short, long, default_value = "sticker.webp")]
    output: PathBuf,

    /// Longest side in pixels after scaling, before padding.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_SIDE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_side: u32,

    /// Transparent margin on every side, in pixels.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_PADDING)]
    padding: u32,

    /// Outline thickness in pixels.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_OUTLINE_RADIUS)]
    outline_radius: u32,

    /// Outline color as `#rrggbb`.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_OUTLINE_COLOR)]
    outline_color: OutlineColor,

    /// Resampling filter (nearest, triangle, catmull-rom, gaussian, lanczos3).
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    filter: Filter,

    /// Output container.
    #[arg(long, value_enum, default_value_t = Format::Webp)]
    format: Format,

    /// User-Agent sent when the input is a URL.
    #[arg(long, default_value = cutout_io::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Download deadline in seconds when the input is a URL.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,
}

/// Resampling filter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

const fn filter_from_pipeline(f: ResampleFilter) -> Filter {
    match f {
        ResampleFilter::Nearest => Filter::Nearest,
        ResampleFilter::Triangle => Filter::Triangle,
        ResampleFilter::CatmullRom => Filter::CatmullRom,
        ResampleFilter::Gaussian => Filter::Gaussian,
        ResampleFilter::Lanczos3 => Filter::Lanczos3,
    }
}

const fn filter_to_pipeline(f: Filter) -> ResampleFilter {
    match f {
        Filter::Nearest => ResampleFilter::Nearest,
        Filter::Triangle => ResampleFilter::Triangle,
        Filter::CatmullRom => ResampleFilter::CatmullRom,
        Filter::Gaussian => ResampleFilter::Gaussian,
        Filter::Lanczos3 => ResampleFilter::Lanczos3,
    }
}

/// Derived from [`PipelineConfig::DEFAULT_RESAMPLE_FILTER`] so the two
/// cannot silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_pipeline(PipelineConfig::DEFAULT_RESAMPLE_FILTER);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Webp,
    Png,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    if let Some(ref json) = cli.config_json {
        let config: PipelineConfig = serde_json::from_str(json).context("parsing --config-json")?;
        config.validate()?;
        return Ok(config);
    }

    Ok(PipelineConfig {
        max_side: cli.max_side,
        padding: cli.padding,
        outline_radius: cli.outline_radius,
        outline_color: cli.outline_color,
        resample_filter: filter_to_pipeline(cli.filter),
        output_format: match cli.format {
            Format::Webp => OutputFormat::WebP,
            Format::Png => OutputFormat::Png,
        },
    })
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_input(cli: &Cli) -> anyhow::Result<Vec<u8>> {
    if is_url(&cli.input) {
        let client = cutout_io::build_client(Duration::from_secs(cli.timeout_secs))?;
        let headers = cutout_io::user_agent_headers(&cli.user_agent)?;
        let bytes = cutout_io::fetch_image(&client, &cli.input, &headers)
            .await
            .context("downloading input")?;
        Ok(bytes)
    } else {
        tokio::fs::read(&cli.input)
            .await
            .with_context(|| format!("reading {}", cli.input))
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = config_from_cli(cli)?;
    let source = read_input(cli).await?;
    tracing::info!(input_bytes = source.len(), ?config, "rendering sticker");

    let sticker = cutout_io::sticker_from_bytes(source, config).await?;

    tokio::fs::write(&cli.output, &sticker.bytes)
        .await
        .with_context(|| format!("writing {}", cli.output.display()))?;
    eprintln!(
        "Sticker written to {} ({} bytes, {})",
        cli.output.display(),
        sticker.bytes.len(),
        sticker.dimensions,
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sticker.diagnostics)?);
    } else {
        println!("{}", sticker.diagnostics.report());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cutout").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_pipeline_defaults() {
        let cli = parse(&["in.png"]);
        assert_eq!(config_from_cli(&cli).unwrap(), PipelineConfig::default());
        assert_eq!(cli.output, PathBuf::from("sticker.webp"));
        assert!(!cli.json);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "in.png",
            "--max-side",
            "200",
            "--padding",
            "8",
            "--outline-radius",
            "4",
            "--outline-color",
            "#ff0000",
            "--filter",
            "lanczos3",
            "--format",
            "png",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.max_side, 200);
        assert_eq!(config.padding, 8);
        assert_eq!(config.outline_radius, 4);
        assert_eq!(config.outline_color, OutlineColor::new(255, 0, 0));
        assert_eq!(config.resample_filter, ResampleFilter::Lanczos3);
        assert_eq!(config.output_format, OutputFormat::Png);
    }

    #[test]
    fn config_json_wins_over_flags() {
        let cli = parse(&["in.png", "--padding", "8", "--config-json", r#"{"padding": 2}"#]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.padding, 2);
        assert_eq!(config.max_side, PipelineConfig::DEFAULT_MAX_SIDE);
    }

    #[test]
    fn invalid_config_json_is_rejected() {
        let cli = parse(&["in.png", "--config-json", r#"{"max_side": 0}"#]);
        assert!(config_from_cli(&cli).is_err());
        let cli = parse(&["in.png", "--config-json", "not json"]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn zero_max_side_flag_is_rejected() {
        assert!(Cli::try_parse_from(["cutout", "in.png", "--max-side", "0"]).is_err());
    }

    #[test]
    fn bad_outline_color_is_rejected() {
        assert!(Cli::try_parse_from(["cutout", "in.png", "--outline-color", "white"]).is_err());
    }

    #[test]
    fn default_filter_tracks_pipeline() {
        assert_eq!(filter_to_pipeline(CLI_DEFAULT_FILTER), PipelineConfig::DEFAULT_RESAMPLE_FILTER);
    }

    #[test]
    fn urls_are_detected() {
        assert!(is_url("https://example.com/a.png"));
        assert!(is_url("http://localhost:8080/a.png"));
        assert!(!is_url("./https.png"));
        assert!(!is_url("/tmp/a.png"));
    }
}
