//! Output types: the built document plus per-place and whole-build reporting.
//!
//! A build can partially succeed: the document is always produced, but any
//! subset of the map enrichments may have degraded to absent. [`PlaceResult`]
//! records per-place what happened so callers can report "2 of 3 maps
//! embedded" instead of guessing from the PDF bytes, and [`BuildStats`] gives
//! the whole-build numbers a CLI or log line wants.

use crate::error::EnrichmentError;
use crate::pipeline::geo::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// The result of one itinerary document build.
///
/// The PDF bytes are the primary artefact; `places` and `stats` describe how
/// the build went. Serialising the output (CLI `--json`) skips the raw PDF
/// buffer.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryOutput {
    /// The finished PDF document.
    #[serde(skip)]
    pub pdf: Vec<u8>,

    /// Per-place enrichment outcomes, in the order places were enriched.
    pub places: Vec<PlaceResult>,

    /// Aggregate counters and stage timings.
    pub stats: BuildStats,
}

/// What happened to one place during enrichment.
///
/// Mirrors the degrade-don't-fail policy: `coordinate` and `mapped` describe
/// what made it into the document, `error` (if any) describes why something
/// is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    /// The place name as extracted (original casing).
    pub name: String,

    /// Resolved coordinate, absent when geocoding failed or found nothing.
    pub coordinate: Option<GeoCoordinate>,

    /// Whether a map image for this place was embedded in the document.
    pub mapped: bool,

    /// The enrichment failure for this place, if any.
    pub error: Option<EnrichmentError>,
}

/// Aggregate statistics for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Paragraphs produced by segmentation.
    pub paragraphs: usize,

    /// Place names that survived extraction (after noise filtering and dedup,
    /// before the `max_places` cap).
    pub places_extracted: usize,

    /// Places with a resolved coordinate.
    pub places_resolved: usize,

    /// Map images actually embedded in the document.
    pub maps_embedded: usize,

    /// Whether the route QR code block was embedded.
    pub code_embedded: bool,

    /// Wall-clock spent in geocoding + map fetches.
    pub enrich_duration_ms: u64,

    /// Wall-clock spent assembling the PDF.
    pub render_duration_ms: u64,

    /// Whole-build wall-clock.
    pub total_duration_ms: u64,

    /// Size of the finished PDF in bytes.
    pub pdf_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_json_omits_pdf_bytes() {
        let output = ItineraryOutput {
            pdf: vec![1, 2, 3],
            places: vec![],
            stats: BuildStats::default(),
        };
        let json = serde_json::to_string(&output).expect("serialise");
        assert!(!json.contains("pdf"), "got: {json}");
        assert!(json.contains("stats"));
    }
}
