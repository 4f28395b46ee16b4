//! Title layout: pick the largest font size whose greedy word-wrap fits
//! the text box, shrinking before ever adding a third line, and never
//! truncating.

/// Bounded, descending font-size search space (px).
pub const FONT_SIZE_MAX: u32 = 90;
pub const FONT_SIZE_FLOOR: u32 = 50;
pub const FONT_SIZE_STEP: usize = 5;

/// Preferred maximum line count. The floor size may exceed it rather
/// than drop words.
pub const MAX_LINES: usize = 2;

/// Line advance as a multiple of font size.
pub const LINE_HEIGHT_EM: f32 = 1.18;

// Calibrated against the bundled sans stack at title weights. These are
// linear-in-size estimates, not glyph metrics; FIT_MARGIN absorbs the
// difference for ordinary titles.
const CHAR_WIDTH_EM: f32 = 0.56;
const SPACE_WIDTH_EM: f32 = 0.28;
const FIT_MARGIN: f32 = 0.95;

/// A word in its rendered form, with the emphasis flag the compositor
/// turns into the accent color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledWord {
    pub text: String,
    pub emphasized: bool,
}

/// Result of the font-size search.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleLayout {
    pub font_size: f32,
    /// Words per line, in draw order. Empty for an empty title.
    pub lines: Vec<Vec<StyledWord>>,
}

/// Estimated advance of one word at `font_size`.
pub fn word_width(font_size: f32, word: &str) -> f32 {
    font_size * CHAR_WIDTH_EM * word.chars().count() as f32
}

/// Estimated advance of one inter-word space at `font_size`.
pub fn space_width(font_size: f32) -> f32 {
    font_size * SPACE_WIDTH_EM
}

fn line_advance(font_size: f32, words: &[StyledWord]) -> f32 {
    let text: f32 = words.iter().map(|w| word_width(font_size, &w.text)).sum();
    let gaps = words.len().saturating_sub(1) as f32;
    text + gaps * space_width(font_size)
}

/// Maps title tokens to their rendered forms: the emphasized token (its
/// first occurrence only) goes fully uppercase, every other word gets a
/// leading capital.
pub fn styled_words(title: &str, emphasis: Option<&str>) -> Vec<StyledWord> {
    let mut emphasis_pending = emphasis.is_some();
    title
        .split_whitespace()
        .map(|token| {
            let hit = emphasis_pending && Some(token) == emphasis;
            if hit {
                emphasis_pending = false;
            }
            StyledWord {
                text: if hit {
                    token.to_uppercase()
                } else {
                    title_case(token)
                },
                emphasized: hit,
            }
        })
        .collect()
}

/// Uppercases the first character, leaving the rest untouched.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Greedy wrap at a fixed size. A word that alone exceeds the limit
/// still gets its own line; mid-word breaks never happen.
fn wrap(words: &[StyledWord], font_size: f32, width_limit: f32) -> Vec<Vec<StyledWord>> {
    let mut lines: Vec<Vec<StyledWord>> = Vec::new();
    let mut current: Vec<StyledWord> = Vec::new();
    let mut current_advance = 0.0_f32;

    for word in words {
        let advance = word_width(font_size, &word.text);
        let candidate = if current.is_empty() {
            advance
        } else {
            current_advance + space_width(font_size) + advance
        };
        if current.is_empty() || candidate <= width_limit {
            current.push(word.clone());
            current_advance = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(word.clone());
            current_advance = advance;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Descending font-size search over the rendered words.
///
/// Each candidate size wraps against the margined box width. An
/// overflow past [`MAX_LINES`] gets one rescue attempt: the overflow
/// appended to the last kept line is measured against the raw
/// (unmargined) width, and a fit there wins before the size steps
/// down. At [`FONT_SIZE_FLOOR`] the wrap is accepted at whatever line
/// count it needs.
pub fn layout_title(words: &[StyledWord], box_width: f32) -> TitleLayout {
    if words.is_empty() {
        return TitleLayout {
            font_size: FONT_SIZE_MAX as f32,
            lines: Vec::new(),
        };
    }

    let fitted_width = box_width * FIT_MARGIN;
    for size in (FONT_SIZE_FLOOR..=FONT_SIZE_MAX)
        .rev()
        .step_by(FONT_SIZE_STEP)
    {
        let font_size = size as f32;
        let lines = wrap(words, font_size, fitted_width);
        if lines.len() <= MAX_LINES {
            return TitleLayout { font_size, lines };
        }
        if let Some(merged) = merge_overflow(&lines, font_size, box_width) {
            return TitleLayout {
                font_size,
                lines: merged,
            };
        }
    }

    TitleLayout {
        font_size: FONT_SIZE_FLOOR as f32,
        lines: wrap(words, FONT_SIZE_FLOOR as f32, fitted_width),
    }
}

/// Rescue check for a wrap that spilled past [`MAX_LINES`]: fold the
/// overflow into the last kept line and test it against the raw box
/// width. The margin gap between the two widths is what makes this
/// worth trying.
fn merge_overflow(
    lines: &[Vec<StyledWord>],
    font_size: f32,
    raw_width: f32,
) -> Option<Vec<Vec<StyledWord>>> {
    let mut merged: Vec<Vec<StyledWord>> = lines[..MAX_LINES - 1].to_vec();
    let tail: Vec<StyledWord> = lines[MAX_LINES - 1..].concat();
    if line_advance(font_size, &tail) <= raw_width {
        merged.push(tail);
        Some(merged)
    } else {
        None
    }
}
