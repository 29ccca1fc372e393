//! # itinerary2pdf
//!
//! Render free-form, AI-generated travel itinerary text as a paginated PDF
//! with embedded location maps and scannable navigation codes.
//!
//! ## Why this crate?
//!
//! LLM itinerary output is useful on screen and useless in a pocket: soft-
//! wrapped prose, ad-hoc bullets, no maps, no way to jump into navigation.
//! This crate turns that text into a document: typed paragraphs with styled
//! section headers, a static map per recognised destination, and a QR code
//! that opens the whole route in a map application.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Segment  coalesce lines into prose/bullet paragraphs
//!  ├─ 2. Extract  heuristic place-name extraction + noise filtering
//!  ├─ 3. Geo      geocode each place, fetch a static map (best-effort)
//!  ├─ 4. Navcode  build a maps deep link, QR-encode it locally
//!  └─ 5. Render   flow layout → paginated PDF bytes
//! ```
//!
//! Stage 3 is the only one touching the network; every call is bounded by a
//! short timeout and any failure degrades that one enrichment instead of the
//! build. As long as the text could be segmented, a document comes back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use itinerary2pdf::{generate, GenerationConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = std::fs::read_to_string("itinerary.txt")?;
//!     let destinations = vec!["Jaipur".to_string(), "Agra".to_string()];
//!
//!     // Maps appear when LOCATIONIQ_API_KEY is set; omitted otherwise.
//!     let config = GenerationConfig::default();
//!     let output = generate(&text, &destinations, &config)?;
//!     std::fs::write("itinerary.pdf", &output.pdf)?;
//!     eprintln!(
//!         "{} paragraphs, {} maps embedded",
//!         output.stats.paragraphs, output.stats.maps_embedded
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `itinerary2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! itinerary2pdf = { version = "0.2", default-features = false }
//! ```
//!
//! ## Fonts
//!
//! Layout needs TTF metrics, so a font file must exist at build time. The
//! renderer looks at the `font_path` config field, the `ITINERARY2PDF_FONT`
//! environment variable, and finally the usual DejaVu Sans system locations.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use error::{EnrichmentError, ItineraryError};
pub use generate::{generate, generate_to_file};
pub use output::{BuildStats, ItineraryOutput, PlaceResult};
pub use pipeline::extract::{extract_places, PlaceName};
pub use pipeline::geo::GeoCoordinate;
pub use pipeline::segment::{segment, Paragraph, ParagraphKind};
