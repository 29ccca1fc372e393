//! Error types for the itinerary2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ItineraryError`] — **Fatal**: the document cannot be produced at all
//!   (no usable font, invalid configuration, PDF assembly failure). Returned
//!   as `Err(ItineraryError)` from the top-level `generate*` functions.
//!
//! * [`EnrichmentError`] — **Non-fatal**: one place's enrichment failed
//!   (geocoder found nothing, map service unreachable) but the document is
//!   still built. Stored inside [`crate::output::PlaceResult`] so callers can
//!   inspect partial success rather than losing the whole document to one
//!   unreachable map tile.
//!
//! The separation encodes the caller-facing guarantee of the pipeline:
//! enrichment is decoration, and as long as the text could be segmented a
//! document always comes back.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the itinerary2pdf library.
///
/// Per-place enrichment failures use [`EnrichmentError`] and are stored in
/// [`crate::output::PlaceResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ItineraryError {
    // ── Font errors ───────────────────────────────────────────────────────
    /// No usable TTF font was found in any of the searched locations.
    #[error(
        "No TTF font found. Searched: {searched:?}\n\
         Install the DejaVu fonts (apt install fonts-dejavu-core), or point\n\
         ITINERARY2PDF_FONT (or the `font_path` config field) at a .ttf file."
    )]
    FontNotFound { searched: Vec<PathBuf> },

    /// A font file exists but could not be parsed as TTF data.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoadFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The PDF backend failed while assembling or serialising the document.
    #[error("PDF assembly failed: {detail}")]
    RenderFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal error for a single place's enrichment.
///
/// Stored alongside [`crate::output::PlaceResult`] when geocoding or the
/// map-image fetch fails. The overall build always continues.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum EnrichmentError {
    /// The geocoding call failed (network error, timeout, malformed response).
    #[error("Geocoding '{place}' failed: {detail}")]
    GeocodeFailed { place: String, detail: String },

    /// The geocoder answered but found no match for the place name.
    #[error("No coordinates found for '{place}'")]
    PlaceNotFound { place: String },

    /// The static-map fetch failed (non-success status, timeout, network error).
    #[error("Map fetch for '{place}' failed: {detail}")]
    MapFetchFailed { place: String, detail: String },

    /// Encoding the navigation deep link as a QR image failed.
    #[error("QR encoding failed: {detail}")]
    CodeEncodeFailed { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_not_found_lists_searched_paths() {
        let e = ItineraryError::FontNotFound {
            searched: vec![PathBuf::from("/tmp/a.ttf"), PathBuf::from("/tmp/b.ttf")],
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/a.ttf"), "got: {msg}");
        assert!(msg.contains("ITINERARY2PDF_FONT"), "got: {msg}");
    }

    #[test]
    fn place_not_found_display() {
        let e = EnrichmentError::PlaceNotFound {
            place: "Xyzzyplex Nonplace".into(),
        };
        assert!(e.to_string().contains("Xyzzyplex Nonplace"));
    }

    #[test]
    fn map_fetch_failed_display() {
        let e = EnrichmentError::MapFetchFailed {
            place: "Jaipur".into(),
            detail: "HTTP 403".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Jaipur"));
        assert!(msg.contains("HTTP 403"));
    }

    #[test]
    fn enrichment_error_round_trips_through_json() {
        let e = EnrichmentError::GeocodeFailed {
            place: "Agra".into(),
            detail: "connection refused".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        let back: EnrichmentError = serde_json::from_str(&json).expect("deserialise");
        assert!(back.to_string().contains("Agra"));
    }
}
