//! Configuration types for itinerary document generation.
//!
//! All build behaviour is controlled through [`GenerationConfig`], built via
//! its [`GenerationConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across builds, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A fifteen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Nominatim-compatible geocoding endpoint.
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Default LocationIQ static-map endpoint.
pub const DEFAULT_MAP_ENDPOINT: &str = "https://maps.locationiq.com/v3/staticmap";

/// Environment variable consulted for the static-map API key when the config
/// field is unset.
pub const MAP_API_KEY_ENV: &str = "LOCATIONIQ_API_KEY";

/// Configuration for one itinerary document build.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use itinerary2pdf::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .title("Rajasthan Trip")
///     .map_zoom(12)
///     .max_places(3)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Document title shown on the title page. Default: "Travel Itinerary".
    pub title: String,

    /// Emit a title page (title + destination label + rule line). Default: true.
    pub title_page: bool,

    /// Use decorative emoji glyphs in section headers. Default: false.
    ///
    /// Off by default because glyph coverage depends entirely on the loaded
    /// font: DejaVu Sans has no emoji, and a missing glyph renders as tofu.
    /// The ASCII labels carry the same information; the glyphs are sugar.
    pub decorated: bool,

    /// Explicit TTF font file. Default: None.
    ///
    /// When unset, the renderer consults the `ITINERARY2PDF_FONT` environment
    /// variable and then a short list of well-known DejaVu Sans install
    /// locations. Font resolution is the only fatal enrichment-independent
    /// dependency of a build: without layout metrics no page can be measured.
    pub font_path: Option<PathBuf>,

    /// Body font size in points. Headers derive from it. Default: 11.
    pub base_font_size: u8,

    /// Maximum number of places to enrich with maps. Default: 5.
    ///
    /// Each place costs up to two bounded network calls. An AI itinerary for
    /// a multi-city trip commonly mentions dozens of capitalised names; the
    /// cap keeps document generation interactive while covering the 1–5
    /// distinct destinations a real trip has.
    pub max_places: usize,

    /// Static-map zoom level (1–18). Default: 13 (city scale).
    pub map_zoom: u8,

    /// Requested static-map raster size in pixels. Default: 600×300.
    pub map_width_px: u32,
    /// See [`Self::map_width_px`].
    pub map_height_px: u32,

    /// Width of an embedded map image on the page, in millimetres. Default: 180.
    pub map_width_mm: f64,

    /// Width of the embedded route QR code, in millimetres. Default: 60.
    ///
    /// Small on purpose: a QR code stays scannable at 60 mm and the block
    /// should read as an appendix, not a full-page figure.
    pub code_width_mm: f64,

    /// Static-map API key. Default: None (falls back to `LOCATIONIQ_API_KEY`).
    ///
    /// A missing key is a valid operating mode: geocoding still runs and maps
    /// are simply omitted from the document.
    pub map_api_key: Option<String>,

    /// Geocoding endpoint (Nominatim search API shape). Default:
    /// [`DEFAULT_GEOCODER_ENDPOINT`]. Overridable so tests can exercise the
    /// degradation paths against an unroutable address.
    pub geocoder_endpoint: String,

    /// Static-map endpoint. Default: [`DEFAULT_MAP_ENDPOINT`].
    pub map_endpoint: String,

    /// User-Agent header for geocoding calls. Default: "itinerary2pdf/0.2".
    ///
    /// Nominatim's usage policy rejects requests without an identifying
    /// User-Agent, so this is not optional decoration.
    pub user_agent: String,

    /// Per-HTTP-call timeout in seconds. Default: 5.
    ///
    /// Both external calls are bounded so one slow map tile cannot stall
    /// document generation; on expiry that single enrichment degrades to
    /// absent and the build proceeds.
    pub http_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            title: "Travel Itinerary".to_string(),
            title_page: true,
            decorated: false,
            font_path: None,
            base_font_size: 11,
            max_places: 5,
            map_zoom: 13,
            map_width_px: 600,
            map_height_px: 300,
            map_width_mm: 180.0,
            code_width_mm: 60.0,
            map_api_key: None,
            geocoder_endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            map_endpoint: DEFAULT_MAP_ENDPOINT.to_string(),
            user_agent: concat!("itinerary2pdf/", env!("CARGO_PKG_VERSION")).to_string(),
            http_timeout_secs: 5,
        }
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }

    /// The effective static-map API key: the config field when set, otherwise
    /// the `LOCATIONIQ_API_KEY` environment variable. `None` means "no maps".
    pub fn resolved_map_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.map_api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var(MAP_API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn title_page(mut self, v: bool) -> Self {
        self.config.title_page = v;
        self
    }

    pub fn decorated(mut self, v: bool) -> Self {
        self.config.decorated = v;
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn base_font_size(mut self, size: u8) -> Self {
        self.config.base_font_size = size.clamp(6, 32);
        self
    }

    pub fn max_places(mut self, n: usize) -> Self {
        self.config.max_places = n;
        self
    }

    pub fn map_zoom(mut self, zoom: u8) -> Self {
        self.config.map_zoom = zoom.clamp(1, 18);
        self
    }

    pub fn map_size_px(mut self, width: u32, height: u32) -> Self {
        self.config.map_width_px = width.max(1);
        self.config.map_height_px = height.max(1);
        self
    }

    pub fn map_width_mm(mut self, mm: f64) -> Self {
        self.config.map_width_mm = mm;
        self
    }

    pub fn code_width_mm(mut self, mm: f64) -> Self {
        self.config.code_width_mm = mm;
        self
    }

    pub fn map_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.map_api_key = Some(key.into());
        self
    }

    pub fn geocoder_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.geocoder_endpoint = endpoint.into();
        self
    }

    pub fn map_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.map_endpoint = endpoint.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, ItineraryError> {
        let c = &self.config;
        if c.http_timeout_secs == 0 {
            return Err(ItineraryError::InvalidConfig(
                "HTTP timeout must be ≥ 1 second".into(),
            ));
        }
        if c.map_width_mm <= 0.0 || c.code_width_mm <= 0.0 {
            return Err(ItineraryError::InvalidConfig(format!(
                "Embed widths must be positive, got map {} mm / code {} mm",
                c.map_width_mm, c.code_width_mm
            )));
        }
        if c.geocoder_endpoint.is_empty() {
            return Err(ItineraryError::InvalidConfig(
                "Geocoder endpoint must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::builder().build().expect("default config");
        assert_eq!(config.map_zoom, 13);
        assert_eq!(config.max_places, 5);
        assert!(!config.decorated);
        assert!(config.title_page);
    }

    #[test]
    fn zoom_is_clamped_to_provider_range() {
        let config = GenerationConfig::builder().map_zoom(99).build().unwrap();
        assert_eq!(config.map_zoom, 18);
        let config = GenerationConfig::builder().map_zoom(0).build().unwrap();
        assert_eq!(config.map_zoom, 1);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = GenerationConfig::builder()
            .http_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn negative_embed_width_is_rejected() {
        let err = GenerationConfig::builder()
            .map_width_mm(-1.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("widths"));
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = GenerationConfig::builder().map_api_key("pk.test").build().unwrap();
        assert_eq!(config.resolved_map_api_key().as_deref(), Some("pk.test"));
    }
}
