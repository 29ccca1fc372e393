//! Navigation deep links and their QR encodings.
//!
//! The document closes with a scannable code so a reader can jump from paper
//! (or a screenshot) straight into a map application. Everything here is
//! local and deterministic: the link is a pure function of the place list,
//! and the QR encoder is a pure function of the link, so identical input
//! yields byte-identical PNG output. No network calls.

use crate::error::EnrichmentError;
use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;
use tracing::debug;

/// Single-place search deep link base.
const SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Multi-place directions deep link base. Places are appended as path
/// segments, so `/` doubles as the route-join token.
const ROUTE_BASE: &str = "https://www.google.com/maps/dir/";

/// Build the map-application deep link for the given places.
///
/// One place yields a search link; two or more yield a directions link
/// chaining every place in order. Place names are encoded with spaces as
/// `+`, matching what map applications accept in both link forms.
pub fn deep_link<S: AsRef<str>>(places: &[S]) -> String {
    match places {
        [] => String::new(),
        [single] => format!("{SEARCH_BASE}{}", encode_token(single.as_ref())),
        many => {
            let segments: Vec<String> =
                many.iter().map(|p| encode_token(p.as_ref())).collect();
            format!("{ROUTE_BASE}{}", segments.join("/"))
        }
    }
}

/// Encode the deep link as a QR code and render it to an in-memory PNG.
pub fn encode_qr_png(url: &str) -> Result<Vec<u8>, EnrichmentError> {
    let encode_err = |detail: String| EnrichmentError::CodeEncodeFailed { detail };

    let code = QrCode::new(url.as_bytes()).map_err(|e| encode_err(e.to_string()))?;
    let matrix = code
        .render::<Luma<u8>>()
        .min_dimensions(240, 240)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(matrix)
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| encode_err(e.to_string()))?;

    debug!("Encoded {} byte deep link into {} byte QR PNG", url.len(), png.len());
    Ok(png)
}

fn encode_token(place: &str) -> String {
    place.trim().replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_place_is_a_search_link() {
        let url = deep_link(&["Taj Mahal"]);
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=Taj+Mahal"
        );
    }

    #[test]
    fn multiple_places_chain_in_order() {
        let url = deep_link(&["Jaipur", "Agra"]);
        assert_eq!(url, "https://www.google.com/maps/dir/Jaipur/Agra");
        // Order is load-bearing: the scanned route must match the itinerary.
        assert!(url.find("Jaipur").unwrap() < url.find("Agra").unwrap());
    }

    #[test]
    fn spaces_become_plus_in_route_segments() {
        let url = deep_link(&["New Delhi", "Taj Mahal"]);
        assert_eq!(url, "https://www.google.com/maps/dir/New+Delhi/Taj+Mahal");
    }

    #[test]
    fn empty_place_list_yields_empty_link() {
        assert_eq!(deep_link::<&str>(&[]), "");
    }

    #[test]
    fn qr_encoding_is_deterministic() {
        let url = deep_link(&["Jaipur", "Agra"]);
        let first = encode_qr_png(&url).expect("encode");
        let second = encode_qr_png(&url).expect("encode");
        assert_eq!(first, second, "identical input must yield identical bytes");
    }

    #[test]
    fn qr_output_is_png() {
        let png = encode_qr_png("https://example.com").expect("encode");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
