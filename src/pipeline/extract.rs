//! Place-name extraction: heuristic scan of itinerary text for destinations.
//!
//! ## Why heuristics are enough
//!
//! The downstream consumers are forgiving: a false positive costs one failed
//! geocoding lookup (bounded by timeout, degrades to "no map"), a false
//! negative costs one missing map block. Full named-entity recognition would
//! add a model dependency for marginal gain on text whose phrasing we partly
//! control via the upstream prompt. So the contract here is best-effort
//! extraction, not correctness.
//!
//! The rule set is deliberately kept in one place (the cue regex and the
//! noise block-list below) so it can be tuned without touching callers.

use once_cell::sync::Lazy;
use regex::Regex;

/// A candidate real-world location extracted from text.
///
/// `raw` keeps the original casing for display and geocoding; `normalized`
/// is the trimmed, lowercased form used for dedup and noise filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName {
    pub raw: String,
    pub normalized: String,
}

impl PlaceName {
    fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let normalized = raw.to_lowercase();
        PlaceName { raw, normalized }
    }
}

/// Capitalized-word runs following a cue token.
///
/// Cues: `Day <n>:`, `City:`, and the prepositions `in`/`to`/`from`. The
/// capture is a run of capitalized words joined by single spaces. Single
/// spaces only, so a run can never leak across a line break the way a
/// `[A-Za-z\s]+` class would.
static PLACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Day\s+\d+\s*:|City\s*:|\b(?:in|to|from))\s+([A-Z][a-zA-Z]*(?: [A-Z][a-zA-Z]*)*)")
        .expect("place cue regex is valid")
});

/// Generic itinerary words that regularly appear capitalized after a cue
/// ("Overnight Stay", "Return Journey") but are never place names. Matched
/// as substrings of the normalized candidate; anything containing one is
/// discarded before it can reach the geocoder.
const NOISE_TOKENS: &[&str] = &[
    "arrival",
    "departure",
    "return",
    "home",
    "back",
    "stay",
    "rest",
    "break",
    "relax",
    "travel",
    "journey",
    "checkout",
    "overnight",
    "hotel",
];

/// Extract candidate place names from itinerary text.
///
/// Applies the cue regex, drops noise-token matches, and deduplicates
/// case-insensitively while preserving first-seen order and first-seen
/// casing.
pub fn extract_places(text: &str) -> Vec<PlaceName> {
    let mut places: Vec<PlaceName> = Vec::new();

    for caps in PLACE_RE.captures_iter(text) {
        let candidate = PlaceName::new(&caps[1]);
        if candidate.raw.is_empty() || is_noise(&candidate.normalized) {
            continue;
        }
        if places.iter().any(|p| p.normalized == candidate.normalized) {
            continue;
        }
        places.push(candidate);
    }

    places
}

fn is_noise(normalized: &str) -> bool {
    NOISE_TOKENS.iter().any(|t| normalized.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        extract_places(text).into_iter().map(|p| p.raw).collect()
    }

    #[test]
    fn extracts_after_day_and_city_cues() {
        let text = "Day 1: Jaipur\nCity: Agra\nThen travel onwards.";
        assert_eq!(names(text), vec!["Jaipur", "Agra"]);
    }

    #[test]
    fn extracts_after_prepositions() {
        let text = "Fly to Delhi, then drive from Delhi and arrive in Udaipur.";
        assert_eq!(names(text), vec!["Delhi", "Udaipur"]);
    }

    #[test]
    fn captures_multi_word_runs() {
        let text = "Spend the morning in New Delhi before lunch.";
        assert_eq!(names(text), vec!["New Delhi"]);
    }

    #[test]
    fn run_does_not_cross_line_breaks() {
        let text = "Head to Agra\nVisit the fort early.";
        assert_eq!(names(text), vec!["Agra"]);
    }

    #[test]
    fn noise_words_never_surface() {
        let text = "Day 5: Overnight Stay\nDay 6: Return Journey\nDay 7: Jaipur";
        assert_eq!(names(text), vec!["Jaipur"]);
    }

    #[test]
    fn hotel_checkout_is_filtered() {
        let text = "in Hotel Plaza\nDay 2: Checkout\nto Goa";
        assert_eq!(names(text), vec!["Goa"]);
    }

    #[test]
    fn dedup_is_case_insensitive_and_order_preserving() {
        let text = "Day 1: Jaipur\nin JAIPUR\nto Agra\nfrom Jaipur";
        let extracted = extract_places(text);
        assert_eq!(extracted.len(), 2);
        // First-seen casing is the one exposed.
        assert_eq!(extracted[0].raw, "Jaipur");
        assert_eq!(extracted[1].raw, "Agra");
    }

    #[test]
    fn mid_word_prepositions_do_not_trigger() {
        // "in" inside "Checkin"/"within" must not act as a cue.
        let text = "Checkin Procedures apply within Airport Zones.";
        assert!(names(text).is_empty());
    }

    #[test]
    fn lowercase_following_word_is_not_captured() {
        let text = "Go to the market in town.";
        assert!(names(text).is_empty());
    }
}
