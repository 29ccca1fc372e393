//! Document rendering: paragraphs + enrichment images → paginated PDF bytes.
//!
//! ## Layout model
//!
//! Linear flow only. Elements are pushed onto a genpdf [`Document`] in
//! source order and genpdf handles line wrapping and page breaks; this
//! module never measures pages or paginates by hand. The per-build mutable
//! state (current document, style flags) lives in one [`RenderSession`]
//! owned exclusively by the render call, so builds are independent and
//! side-effect-free across calls.
//!
//! ## Header classification
//!
//! Whether a paragraph renders as a section header is decided here, at
//! presentation time, by [`HEADER_RULES`]: a static ordered list of
//! (predicate, display) rules evaluated top-down against the lowercased,
//! decoration-trimmed text. Adding a header type is one new table row.
//!
//! ## Glyph policy
//!
//! Section headers optionally carry emoji markers for visual scannability.
//! Emoji coverage depends entirely on the loaded font, so the markers are
//! opt-in (`config.decorated`) and every header has an ASCII-safe plain
//! form. Glyphs are presentation sugar, never a correctness requirement.
//!
//! [`Document`]: genpdf::Document

use crate::config::GenerationConfig;
use crate::error::ItineraryError;
use crate::pipeline::geo::ResolvedPlace;
use crate::pipeline::segment::{Paragraph, ParagraphKind};
use genpdf::style::Style;
use genpdf::{elements, Alignment, Element as _, Margins, Scale};
use image::GenericImageView;
use std::path::PathBuf;
use tracing::{debug, warn};

/// genpdf sizes raster images at this DPI; embed scales derive from it.
const IMAGE_DPI: f64 = 300.0;

const MM_PER_INCH: f64 = 25.4;

/// Well-known DejaVu Sans install locations, tried after the config override
/// and the `ITINERARY2PDF_FONT` environment variable.
const WELL_KNOWN_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    "/Library/Fonts/DejaVuSans.ttf",
];

// ── Header rule table ────────────────────────────────────────────────────

/// Predicate over the lowercased, decoration-trimmed paragraph text.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HeaderPattern {
    Prefix(&'static str),
    Contains(&'static str),
}

/// One (predicate, display) rule. `label: None` means "display the
/// paragraph's own text" (used for day headers, which carry the day number).
#[derive(Debug)]
pub(crate) struct HeaderRule {
    pattern: HeaderPattern,
    pub(crate) glyph: &'static str,
    pub(crate) label: Option<&'static str>,
}

/// Ordered top-down: the first matching rule wins, so the specific `day `
/// prefix outranks the broad substring rules below it.
pub(crate) const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        pattern: HeaderPattern::Prefix("day "),
        glyph: "📅",
        label: None,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("destination overview"),
        glyph: "📍",
        label: Some("Destination Overview"),
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("daily itinerary"),
        glyph: "🗓",
        label: Some("Daily Itinerary"),
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("budget estimate"),
        glyph: "💰",
        label: Some("Budget Estimate"),
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("notes"),
        glyph: "📝",
        label: Some("Notes"),
    },
];

const MAP_GLYPH: &str = "🗺";
const CODE_GLYPH: &str = "📱";

/// Strip the emphasis stars LLM output wraps around pseudo-headers.
fn trim_decoration(text: &str) -> &str {
    text.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Find the first header rule matching the paragraph text, if any.
pub(crate) fn classify_header(text: &str) -> Option<&'static HeaderRule> {
    let lower = trim_decoration(text).to_lowercase();
    HEADER_RULES.iter().find(|rule| match rule.pattern {
        HeaderPattern::Prefix(p) => lower.starts_with(p),
        HeaderPattern::Contains(s) => lower.contains(s),
    })
}

// ── Render inputs / outputs ──────────────────────────────────────────────

/// Everything the renderer consumes for one document.
pub struct RenderInputs<'a> {
    pub paragraphs: &'a [Paragraph],
    pub destination_label: &'a str,
    pub places: &'a [ResolvedPlace],
    pub route_code_png: Option<&'a [u8]>,
}

/// The finished document plus what actually made it in.
pub struct RenderedDocument {
    pub pdf: Vec<u8>,
    pub maps_embedded: usize,
    pub code_embedded: bool,
}

/// Assemble the final PDF.
///
/// Emits, in order: optional title page, every paragraph (headers styled per
/// [`HEADER_RULES`], bullets marker-prefixed, prose wrapped), one map block
/// per place with a fetched image, and the route code block. Images that
/// fail to decode are skipped with a warning; enrichment is decoration and
/// the build always completes.
pub fn render_document(
    inputs: &RenderInputs<'_>,
    config: &GenerationConfig,
) -> Result<RenderedDocument, ItineraryError> {
    let mut session = RenderSession::new(config)?;

    if config.title_page {
        session.push_title_page(&config.title, inputs.destination_label);
    }

    for paragraph in inputs.paragraphs {
        session.push_paragraph(paragraph);
    }

    let mut maps_embedded = 0;
    for place in inputs.places {
        if let Some(png) = &place.map_png {
            let header = format!("Map Preview: {}", place.name);
            if session.push_image_block(&header, MAP_GLYPH, png, config.map_width_mm) {
                maps_embedded += 1;
            }
        }
    }

    let mut code_embedded = false;
    if let Some(png) = inputs.route_code_png {
        code_embedded =
            session.push_image_block("Open in Google Maps", CODE_GLYPH, png, config.code_width_mm);
    }

    let pdf = session.finish()?;
    debug!(
        "Rendered document: {} bytes, {} map blocks, code block: {}",
        pdf.len(),
        maps_embedded,
        code_embedded
    );

    Ok(RenderedDocument {
        pdf,
        maps_embedded,
        code_embedded,
    })
}

// ── Render session ───────────────────────────────────────────────────────

/// Per-build mutable renderer state: the document under construction plus
/// the style knobs read from the config. Created, used, and consumed inside
/// one `render_document` call.
struct RenderSession {
    doc: genpdf::Document,
    decorated: bool,
    base_size: u8,
}

impl RenderSession {
    fn new(config: &GenerationConfig) -> Result<Self, ItineraryError> {
        let (path, bytes) = resolve_font(config)?;
        debug!("Using font: {}", path.display());

        let data = genpdf::fonts::FontData::new(bytes, None).map_err(|e| {
            ItineraryError::FontLoadFailed {
                path,
                detail: e.to_string(),
            }
        })?;
        // One TTF serves the whole family; bold headers reuse the regular
        // face, matching a single-font document.
        let family = genpdf::fonts::FontFamily {
            regular: data.clone(),
            bold: data.clone(),
            italic: data.clone(),
            bold_italic: data,
        };

        let mut doc = genpdf::Document::new(family);
        doc.set_title(config.title.as_str());
        doc.set_font_size(config.base_font_size);
        doc.set_line_spacing(1.2);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        Ok(RenderSession {
            doc,
            decorated: config.decorated,
            base_size: config.base_font_size,
        })
    }

    fn push_title_page(&mut self, title: &str, destination: &str) {
        self.doc.push(
            elements::Paragraph::new(title.to_string())
                .aligned(Alignment::Center)
                .styled(Style::new().bold().with_font_size(22)),
        );
        self.doc.push(elements::Break::new(1.0));

        if !destination.is_empty() {
            self.doc.push(
                elements::Paragraph::new(destination.to_string())
                    .aligned(Alignment::Center)
                    .styled(Style::new().with_font_size(14)),
            );
            self.doc.push(elements::Break::new(1.0));
        }

        self.doc.push(
            elements::Paragraph::new("_".repeat(48)).aligned(Alignment::Center),
        );
        self.doc.push(elements::PageBreak::new());
    }

    fn push_paragraph(&mut self, paragraph: &Paragraph) {
        if let Some(rule) = classify_header(&paragraph.text) {
            let label = match rule.label {
                Some(fixed) => fixed.to_string(),
                None => trim_decoration(&paragraph.text).to_string(),
            };
            self.push_header_line(&label, rule.glyph);
            return;
        }

        match paragraph.kind {
            ParagraphKind::Bullet => {
                let marker = if self.decorated { "• " } else { "- " };
                self.doc.push(
                    elements::Paragraph::new(format!("{marker}{}", paragraph.text))
                        .padded(Margins::trbl(0.0, 0.0, 1.0, 4.0)),
                );
            }
            ParagraphKind::Prose => {
                self.doc.push(
                    elements::Paragraph::new(paragraph.text.clone())
                        .padded(Margins::trbl(0.0, 0.0, 1.0, 0.0)),
                );
            }
        }
    }

    fn push_header_line(&mut self, label: &str, glyph: &'static str) {
        let display = if self.decorated {
            format!("{glyph} {label}")
        } else {
            label.to_string()
        };
        self.doc.push(
            elements::Paragraph::new(display)
                .styled(Style::new().bold().with_font_size(self.base_size.saturating_add(2)))
                .padded(Margins::trbl(2.0, 0.0, 1.0, 0.0)),
        );
    }

    /// Embed one image under a header line, scaled to `width_mm`.
    ///
    /// Returns whether the image made it into the document. Undecodable
    /// bytes are skipped, not fatal: a corrupt map tile must never cost the
    /// caller the whole itinerary.
    fn push_image_block(
        &mut self,
        header: &str,
        glyph: &'static str,
        png: &[u8],
        width_mm: f64,
    ) -> bool {
        let decoded = match image::load_from_memory(png) {
            Ok(img) => img,
            Err(e) => {
                warn!("Skipping image block '{header}': undecodable image: {e}");
                return false;
            }
        };
        let (px_width, _) = decoded.dimensions();

        let element = match elements::Image::from_dynamic_image(decoded) {
            Ok(el) => el,
            Err(e) => {
                warn!("Skipping image block '{header}': embed failed: {e}");
                return false;
            }
        };

        let factor = scale_for_width(px_width, width_mm);
        self.push_header_line(header, glyph);
        self.doc.push(
            element
                .with_scale(Scale::new(factor, factor))
                .padded(Margins::trbl(1.0, 0.0, 2.0, 0.0)),
        );
        true
    }

    fn finish(self) -> Result<Vec<u8>, ItineraryError> {
        let mut out = Vec::new();
        self.doc
            .render(&mut out)
            .map_err(|e| ItineraryError::RenderFailed {
                detail: e.to_string(),
            })?;
        Ok(out)
    }
}

/// Uniform scale factor that makes an image `target_mm` wide on the page.
fn scale_for_width(px_width: u32, target_mm: f64) -> f64 {
    let natural_mm = f64::from(px_width.max(1)) * MM_PER_INCH / IMAGE_DPI;
    target_mm / natural_mm
}

// ── Font resolution ──────────────────────────────────────────────────────

/// Locate a TTF font: config override, then `ITINERARY2PDF_FONT`, then the
/// well-known system paths. The error lists everything that was tried.
fn resolve_font(config: &GenerationConfig) -> Result<(PathBuf, Vec<u8>), ItineraryError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(ref path) = config.font_path {
        candidates.push(path.clone());
    }
    if let Ok(env_font) = std::env::var("ITINERARY2PDF_FONT") {
        if !env_font.is_empty() {
            candidates.push(PathBuf::from(env_font));
        }
    }
    candidates.extend(WELL_KNOWN_FONTS.iter().map(PathBuf::from));

    let mut searched = Vec::new();
    for path in candidates {
        if path.is_file() {
            return match std::fs::read(&path) {
                Ok(bytes) => Ok((path, bytes)),
                Err(e) => Err(ItineraryError::FontLoadFailed {
                    path,
                    detail: e.to_string(),
                }),
            };
        }
        searched.push(path);
    }

    Err(ItineraryError::FontNotFound { searched })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_prefix_classifies_with_own_text() {
        let rule = classify_header("Day 3: Jaipur sightseeing").expect("should classify");
        assert!(rule.label.is_none(), "day headers keep their own text");
    }

    #[test]
    fn emphasis_stars_do_not_defeat_classification() {
        let rule = classify_header("**Day 1: Arrival in Agra**").expect("should classify");
        assert!(rule.label.is_none());
    }

    #[test]
    fn substring_rules_match_anywhere() {
        let rule = classify_header("Here is the Destination Overview for your trip")
            .expect("should classify");
        assert_eq!(rule.label, Some("Destination Overview"));

        let rule = classify_header("Final Budget Estimate").expect("should classify");
        assert_eq!(rule.label, Some("Budget Estimate"));
    }

    #[test]
    fn rules_apply_top_down() {
        // Matches both the day prefix and the budget substring; the more
        // specific prefix rule is listed first and must win.
        let rule = classify_header("Day 5: budget estimate review").expect("should classify");
        assert!(rule.label.is_none());
    }

    #[test]
    fn plain_prose_is_not_a_header() {
        assert!(classify_header("Enjoy the local street food.").is_none());
        assert!(classify_header("").is_none());
    }

    #[test]
    fn every_rule_has_an_ascii_safe_form() {
        for rule in HEADER_RULES {
            if let Some(label) = rule.label {
                assert!(label.is_ascii(), "label {label:?} must be ASCII-safe");
            }
        }
    }

    #[test]
    fn scale_targets_requested_width() {
        // A 600 px image is 50.8 mm at 300 DPI; 180 mm needs ~3.54×.
        let factor = scale_for_width(600, 180.0);
        assert!((factor - 3.543).abs() < 0.01, "got {factor}");
        // Identity when the target equals the natural size.
        let natural = f64::from(600) * MM_PER_INCH / IMAGE_DPI;
        assert!((scale_for_width(600, natural) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_font_error_lists_candidates() {
        let config = GenerationConfig::builder()
            .font_path("/nonexistent/nowhere.ttf")
            .build()
            .unwrap();
        // Only hit the not-found path when no system font exists either;
        // otherwise resolution legitimately succeeds on the fallback.
        match resolve_font(&config) {
            Err(ItineraryError::FontNotFound { searched }) => {
                assert!(searched
                    .iter()
                    .any(|p| p.to_string_lossy().contains("nowhere.ttf")));
            }
            Ok(_) => (),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
