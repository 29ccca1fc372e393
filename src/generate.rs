//! Top-level document generation entry points.
//!
//! ## Pipeline shape
//!
//! One synchronous pass: segment the text, extract and enrich place names,
//! render everything into a PDF buffer. External calls (geocoding, map
//! fetch) are few (bounded by the distinct-place cap) and individually
//! timeout-bounded, so the build is interactive without any concurrency.
//!
//! ## The caller-facing guarantee
//!
//! `generate` returns `Err` only for fatal conditions (no font, broken
//! config, PDF assembly failure). Unresolvable places, unreachable map
//! services, and empty input all degrade: the document is still produced
//! and the degradations are reported in [`ItineraryOutput::places`] and
//! [`BuildStats`].

use crate::config::GenerationConfig;
use crate::error::ItineraryError;
use crate::output::{BuildStats, ItineraryOutput, PlaceResult};
use crate::pipeline::render::{render_document, RenderInputs};
use crate::pipeline::{extract, geo, navcode, segment};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build an itinerary PDF from raw text and a destination list.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `text` — free-form itinerary text (typically LLM output)
/// * `destinations` — the caller's destination list; used for the title-page
///   label and as the place fallback when extraction finds nothing
/// * `config` — build configuration
///
/// # Returns
/// `Ok(ItineraryOutput)` whenever a document could be produced, even if
/// every enrichment degraded (check `output.places`).
///
/// # Errors
/// Returns `Err(ItineraryError)` only for fatal errors: no usable font,
/// invalid configuration, or a PDF assembly failure.
pub fn generate(
    text: &str,
    destinations: &[String],
    config: &GenerationConfig,
) -> Result<ItineraryOutput, ItineraryError> {
    let total_start = Instant::now();
    info!("Starting itinerary build ({} bytes of text)", text.len());

    // ── Step 1: Segment text ─────────────────────────────────────────────
    let paragraphs = segment::segment(text);
    debug!("Segmented into {} paragraphs", paragraphs.len());

    // ── Step 2: Collect place names ──────────────────────────────────────
    let extracted = extract::extract_places(text);
    let places_extracted = extracted.len();
    let mut names: Vec<String> = extracted.into_iter().map(|p| p.raw).collect();
    if names.is_empty() {
        // Nothing recognisable in the text; fall back to what the caller
        // asked for, which is at least a real destination list.
        names = dedupe_destinations(destinations);
        debug!("Extraction found nothing; using {} caller destinations", names.len());
    }
    names.truncate(config.max_places);

    let destination_label = if destinations.is_empty() {
        names.join(", ")
    } else {
        dedupe_destinations(destinations).join(", ")
    };

    // ── Step 3: Enrich places (geocode + map fetch) ──────────────────────
    let enrich_start = Instant::now();
    let resolved: Vec<geo::ResolvedPlace> = names
        .iter()
        .map(|name| geo::resolve_place(name, config))
        .collect();
    let enrich_duration_ms = enrich_start.elapsed().as_millis() as u64;

    // ── Step 4: Route code ───────────────────────────────────────────────
    let route_code_png = if names.is_empty() {
        None
    } else {
        let url = navcode::deep_link(&names);
        match navcode::encode_qr_png(&url) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    };

    // ── Step 5: Render ───────────────────────────────────────────────────
    let render_start = Instant::now();
    let inputs = RenderInputs {
        paragraphs: &paragraphs,
        destination_label: &destination_label,
        places: &resolved,
        route_code_png: route_code_png.as_deref(),
    };
    let rendered = render_document(&inputs, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 6: Report ───────────────────────────────────────────────────
    let places: Vec<PlaceResult> = resolved
        .into_iter()
        .map(|place| PlaceResult {
            mapped: place.map_png.is_some(),
            name: place.name,
            coordinate: place.coordinate,
            error: place.error,
        })
        .collect();

    let stats = BuildStats {
        paragraphs: paragraphs.len(),
        places_extracted,
        places_resolved: places.iter().filter(|p| p.coordinate.is_some()).count(),
        maps_embedded: rendered.maps_embedded,
        code_embedded: rendered.code_embedded,
        enrich_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        pdf_bytes: rendered.pdf.len(),
    };

    info!(
        "Build complete: {} paragraphs, {}/{} maps, {} bytes, {}ms",
        stats.paragraphs,
        stats.maps_embedded,
        places.len(),
        stats.pdf_bytes,
        stats.total_duration_ms
    );

    Ok(ItineraryOutput {
        pdf: rendered.pdf,
        places,
        stats,
    })
}

/// Build an itinerary PDF and write it directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn generate_to_file(
    text: &str,
    destinations: &[String],
    output_path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<BuildStats, ItineraryError> {
    let output = generate(text, destinations, config)?;
    let path = output_path.as_ref();

    let write_err = |source: std::io::Error| ItineraryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &output.pdf).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    Ok(output.stats)
}

/// Trim, drop empties, and dedupe the caller's destination list
/// case-insensitively, preserving order and original casing.
fn dedupe_destinations(destinations: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for destination in destinations {
        let trimmed = destination.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        out.push(trimmed.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_dedupe_preserves_order_and_casing() {
        let input = vec![
            "Jaipur".to_string(),
            "  ".to_string(),
            "AGRA".to_string(),
            "jaipur".to_string(),
        ];
        assert_eq!(dedupe_destinations(&input), vec!["Jaipur", "AGRA"]);
    }

    #[test]
    fn empty_destination_list_dedupes_to_empty() {
        assert!(dedupe_destinations(&[]).is_empty());
    }
}
