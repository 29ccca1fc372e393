//! Geocoding and static-map retrieval for one place name.
//!
//! Two sequential external calls per place, each bounded by the configured
//! timeout:
//!
//! 1. **Geocode** the name to a coordinate via a Nominatim-compatible search
//!    endpoint. Nominatim answers JSON with string-encoded `lat`/`lon`.
//! 2. **Fetch** a static map centred on that coordinate from a LocationIQ-
//!    compatible endpoint, only when an API key is configured. Key-less
//!    operation is a first-class mode, not an error.
//!
//! ## Degradation policy
//!
//! Nothing in this module returns `Err` to the build. Every failure mode maps
//! to an absent field on [`ResolvedPlace`] plus a recorded
//! [`EnrichmentError`]:
//!
//! * geocode network error / malformed response → no coordinate, no map
//! * geocoder found nothing → no coordinate, no map
//! * missing API key → coordinate kept, no map, no error
//! * map fetch non-success / timeout → coordinate kept, no map
//!
//! The caller embeds whatever survived and reports the rest.

use crate::config::GenerationConfig;
use crate::error::EnrichmentError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// A latitude/longitude pair resolved for a place name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything enrichment produced for one place.
///
/// The map bytes are consumed once by the renderer; the rest is carried into
/// [`crate::output::PlaceResult`] for reporting.
#[derive(Debug, Clone)]
pub struct ResolvedPlace {
    pub name: String,
    pub coordinate: Option<GeoCoordinate>,
    pub map_png: Option<Vec<u8>>,
    pub error: Option<EnrichmentError>,
}

impl ResolvedPlace {
    fn absent(name: &str, error: EnrichmentError) -> Self {
        ResolvedPlace {
            name: name.to_string(),
            coordinate: None,
            map_png: None,
            error: Some(error),
        }
    }
}

/// One hit from the Nominatim search API. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Resolve a place name to a coordinate and (optionally) a map image.
///
/// Never fails the build: every error is folded into the returned
/// [`ResolvedPlace`] and logged.
pub fn resolve_place(name: &str, config: &GenerationConfig) -> ResolvedPlace {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!("HTTP client construction failed: {e}");
            return ResolvedPlace::absent(
                name,
                EnrichmentError::GeocodeFailed {
                    place: name.to_string(),
                    detail: e.to_string(),
                },
            );
        }
    };

    let coordinate = match geocode(&client, name, config) {
        Ok(Some(coord)) => coord,
        Ok(None) => {
            debug!("Geocoder found nothing for '{name}'");
            return ResolvedPlace::absent(
                name,
                EnrichmentError::PlaceNotFound {
                    place: name.to_string(),
                },
            );
        }
        Err(e) => {
            warn!("{e}");
            return ResolvedPlace::absent(name, e);
        }
    };

    debug!(
        "Resolved '{name}' to {:.4},{:.4}",
        coordinate.latitude, coordinate.longitude
    );

    let Some(api_key) = config.resolved_map_api_key() else {
        debug!("No static-map API key configured; skipping map for '{name}'");
        return ResolvedPlace {
            name: name.to_string(),
            coordinate: Some(coordinate),
            map_png: None,
            error: None,
        };
    };

    match fetch_static_map(&client, &coordinate, &api_key, config) {
        Ok(png) => ResolvedPlace {
            name: name.to_string(),
            coordinate: Some(coordinate),
            map_png: Some(png),
            error: None,
        },
        Err(detail) => {
            let error = EnrichmentError::MapFetchFailed {
                place: name.to_string(),
                detail,
            };
            warn!("{error}");
            ResolvedPlace {
                name: name.to_string(),
                coordinate: Some(coordinate),
                map_png: None,
                error: Some(error),
            }
        }
    }
}

/// Call the geocoding endpoint. `Ok(None)` means "service answered, no match".
fn geocode(
    client: &reqwest::blocking::Client,
    name: &str,
    config: &GenerationConfig,
) -> Result<Option<GeoCoordinate>, EnrichmentError> {
    let geocode_err = |detail: String| EnrichmentError::GeocodeFailed {
        place: name.to_string(),
        detail,
    };

    let response = client
        .get(config.geocoder_endpoint.as_str())
        .query(&[("q", name), ("format", "json"), ("limit", "1")])
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                geocode_err(format!("timed out after {}s", config.http_timeout_secs))
            } else {
                geocode_err(e.to_string())
            }
        })?;

    if !response.status().is_success() {
        return Err(geocode_err(format!("HTTP {}", response.status())));
    }

    let hits: Vec<NominatimHit> = response.json().map_err(|e| geocode_err(e.to_string()))?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let latitude: f64 = hit
        .lat
        .parse()
        .map_err(|_| geocode_err(format!("malformed latitude '{}'", hit.lat)))?;
    let longitude: f64 = hit
        .lon
        .parse()
        .map_err(|_| geocode_err(format!("malformed longitude '{}'", hit.lon)))?;

    Ok(Some(GeoCoordinate {
        latitude,
        longitude,
    }))
}

/// Fetch a static map PNG centred on the coordinate. The error is the failure
/// detail; the caller attaches the place name.
fn fetch_static_map(
    client: &reqwest::blocking::Client,
    coordinate: &GeoCoordinate,
    api_key: &str,
    config: &GenerationConfig,
) -> Result<Vec<u8>, String> {
    let center = format!("{},{}", coordinate.latitude, coordinate.longitude);
    let size = format!("{}x{}", config.map_width_px, config.map_height_px);
    let zoom = config.map_zoom.to_string();

    let response = client
        .get(config.map_endpoint.as_str())
        .query(&[
            ("key", api_key),
            ("center", center.as_str()),
            ("zoom", zoom.as_str()),
            ("size", size.as_str()),
            ("format", "png"),
        ])
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                format!("timed out after {}s", config.http_timeout_secs)
            } else {
                e.to_string()
            }
        })?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let bytes = response.bytes().map_err(|e| e.to_string())?;
    debug!("Fetched {} bytes of map imagery", bytes.len());
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> GenerationConfig {
        // TEST-NET-1 address with a one-second timeout: guaranteed unroutable,
        // so these tests exercise the network-error path without the network.
        GenerationConfig::builder()
            .geocoder_endpoint("http://192.0.2.1:9/search")
            .map_endpoint("http://192.0.2.1:9/staticmap")
            .http_timeout_secs(1)
            .build()
            .unwrap()
    }

    #[test]
    fn unreachable_geocoder_degrades_to_absent() {
        let resolved = resolve_place("Xyzzyplex Nonplace", &offline_config());
        assert!(resolved.coordinate.is_none());
        assert!(resolved.map_png.is_none());
        assert!(matches!(
            resolved.error,
            Some(EnrichmentError::GeocodeFailed { .. })
        ));
    }

    #[test]
    fn nominatim_hit_parses_string_coordinates() {
        let json = r#"[{"lat":"26.9154576","lon":"75.8189817","display_name":"Jaipur"}]"#;
        let hits: Vec<NominatimHit> = serde_json::from_str(json).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].lat.parse::<f64>().unwrap() - 26.9154576).abs() < 1e-9);
    }

    #[test]
    fn empty_hit_list_deserialises() {
        let hits: Vec<NominatimHit> = serde_json::from_str("[]").unwrap();
        assert!(hits.is_empty());
    }
}
