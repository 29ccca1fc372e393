//! Text segmentation: raw itinerary text → ordered logical paragraphs.
//!
//! ## Why is segmentation necessary?
//!
//! LLM-generated itinerary text is soft-wrapped prose interleaved with bullet
//! lists, with no reliable markup. Rendering it line-by-line would break
//! every wrapped sentence mid-thought; rendering it as one blob would lose
//! the list structure. The fix is cheap and deterministic: coalesce runs of
//! non-blank lines into single paragraphs, and let bullet markers and blank
//! lines act as the only two separators.
//!
//! Classification into section headers is *not* done here: whether "Day 3:
//! Jaipur" gets header styling is a presentation decision and lives in the
//! renderer's rule table. Segmentation only distinguishes prose from bullet
//! items, which is a structural property of the input.

/// Structural kind of a segmented paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    /// A merge-group of consecutive non-blank, non-bullet lines.
    Prose,
    /// A single line that started with a bullet marker (marker stripped).
    Bullet,
}

/// One unit of segmented text, consumed once by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub text: String,
}

impl Paragraph {
    fn prose(text: String) -> Self {
        Paragraph {
            kind: ParagraphKind::Prose,
            text,
        }
    }

    fn bullet(text: String) -> Self {
        Paragraph {
            kind: ParagraphKind::Bullet,
            text,
        }
    }
}

/// Split raw text into an ordered sequence of paragraphs.
///
/// Walks the input line by line:
///
/// * a line starting with `*` flushes any accumulated prose, then becomes a
///   bullet paragraph of its own (marker and surrounding whitespace stripped);
/// * a blank line flushes the accumulator;
/// * any other line appends its trimmed content, space-joined, to the
///   accumulator.
///
/// The trailing accumulator is flushed at end of input. Whitespace-only input
/// yields an empty vec; input with no blank lines and no bullets yields
/// exactly one paragraph.
pub fn segment(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.starts_with('*') {
            flush(&mut paragraphs, &mut current);
            let item = stripped.trim_matches(|c: char| c == '*' || c.is_whitespace());
            if !item.is_empty() {
                paragraphs.push(Paragraph::bullet(item.to_string()));
            }
        } else if stripped.is_empty() {
            flush(&mut paragraphs, &mut current);
        } else {
            current.push(stripped);
        }
    }
    flush(&mut paragraphs, &mut current);

    paragraphs
}

fn flush(paragraphs: &mut Vec<Paragraph>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        paragraphs.push(Paragraph::prose(current.join(" ")));
        current.clear();
    }
}
