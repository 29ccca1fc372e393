//! CLI binary for itinerary2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GenerationConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use itinerary2pdf::{generate_to_file, GenerationConfig};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic build from a text file
  itinerary2pdf plan.txt -o trip.pdf

  # Pipe LLM output straight in
  some-llm-tool | itinerary2pdf - -d Jaipur -d Agra -o trip.pdf

  # Maps included (LocationIQ static maps)
  LOCATIONIQ_API_KEY=pk.xxx itinerary2pdf plan.txt -d Manali

  # Emoji section headers (needs a font with coverage)
  itinerary2pdf plan.txt --decorated --font ./NotoSans.ttf

  # Machine-readable build report
  itinerary2pdf plan.txt --json > report.json

ENVIRONMENT VARIABLES:
  LOCATIONIQ_API_KEY   Static-map API key; maps are omitted without it
  ITINERARY2PDF_FONT   Path to a .ttf used when no --font is given

NOTES:
  Geocoding uses the public Nominatim endpoint and sends an identifying
  User-Agent, as its usage policy requires. Each network call is bounded
  by --timeout seconds; a slow or failed call only costs that one map.
"#;

/// Render AI-generated travel itineraries as PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "itinerary2pdf",
    version,
    about = "Render AI-generated travel itineraries as PDF documents with maps and QR codes",
    long_about = "Turn free-form itinerary text (typically LLM output) into a paginated PDF: \
styled section headers, bullet lists, a static map per recognised destination, and a QR \
code that opens the whole route in a map application.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Itinerary text file, or '-' to read stdin.
    input: String,

    /// Destination(s) for the title page and the place fallback. Repeatable.
    #[arg(short, long = "destination")]
    destinations: Vec<String>,

    /// Output PDF path.
    #[arg(short, long, env = "ITINERARY2PDF_OUTPUT", default_value = "itinerary.pdf")]
    output: PathBuf,

    /// Document title.
    #[arg(long, default_value = "Travel Itinerary")]
    title: String,

    /// Static-map API key (LocationIQ). Maps are omitted without one.
    #[arg(long, env = "LOCATIONIQ_API_KEY", hide_env_values = true)]
    map_api_key: Option<String>,

    /// Static-map zoom level (1-18).
    #[arg(long, default_value_t = 13,
          value_parser = clap::value_parser!(u8).range(1..=18))]
    zoom: u8,

    /// Maximum number of places to enrich with maps.
    #[arg(long, default_value_t = 5)]
    max_places: usize,

    /// TTF font file for the document.
    #[arg(long, env = "ITINERARY2PDF_FONT")]
    font: Option<PathBuf>,

    /// Use emoji glyphs in section headers (font coverage permitting).
    #[arg(long)]
    decorated: bool,

    /// Skip the title page.
    #[arg(long)]
    no_title_page: bool,

    /// Per-network-call timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Print the build report as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let text = if cli.input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read itinerary text from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read itinerary text from '{}'", cli.input))?
    };

    let config = build_config(&cli)?;

    // ── Build ────────────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let spinner = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Building itinerary document…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = generate_to_file(&text, &cli.destinations, &cli.output, &config);

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let stats = result.context("Document build failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise build report")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} paragraphs  {}/{} maps  {}ms  →  {}",
            if stats.maps_embedded == stats.places_resolved {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.paragraphs,
            stats.maps_embedded,
            stats.places_resolved,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} bytes, route code: {}",
                stats.pdf_bytes,
                if stats.code_embedded { "yes" } else { "no" }
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .title(cli.title.clone())
        .title_page(!cli.no_title_page)
        .decorated(cli.decorated)
        .map_zoom(cli.zoom)
        .max_places(cli.max_places)
        .http_timeout_secs(cli.timeout);

    if let Some(ref key) = cli.map_api_key {
        builder = builder.map_api_key(key.clone());
    }
    if let Some(ref font) = cli.font {
        builder = builder.font_path(font.clone());
    }

    builder.build().context("Invalid configuration")
}
