//! Page geometry and base-14 font metrics for report pages.
//!
//! Positions are expressed in millimetres from the top-left corner of an A4
//! page and converted to PDF user space (points, bottom-left origin) at the
//! last moment.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;

pub const LOGO_ORIGIN_MM: (f32, f32) = (10.0, 8.0);
pub const LOGO_MAX_SIZE_MM: (f32, f32) = (66.0, 22.0);
/// Title is centred in the band to the right of the logo.
pub const TITLE_BAND_MM: (f32, f32) = (90.0, 200.0);
pub const TITLE_BASELINE_MM: f32 = 17.0;
pub const TITLE_FONT_SIZE: f32 = 15.0;

pub const CONTENT_TOP_MM: f32 = 35.0;
pub const CONTENT_BOTTOM_MM: f32 = 272.0;
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const HEADING_FONT_SIZE: f32 = 14.0;
pub const LINE_HEIGHT_MM: f32 = 7.0;

pub const IMAGE_ORIGIN_MM: (f32, f32) = (10.0, CONTENT_TOP_MM);
pub const IMAGE_WIDTH_MM: f32 = 180.0;

pub const FOOTER_BASELINE_MM: f32 = 288.0;
pub const FOOTER_FONT_SIZE: f32 = 8.0;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

pub fn page_width_pt() -> f32 {
    mm_to_pt(PAGE_WIDTH_MM)
}

pub fn page_height_pt() -> f32 {
    mm_to_pt(PAGE_HEIGHT_MM)
}

/// Converts a top-left based vertical position in mm to a PDF y coordinate.
pub fn y_from_top(mm: f32) -> f32 {
    page_height_pt() - mm_to_pt(mm)
}

// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

const FALLBACK_WIDTH: u16 = 556;

/// Approximate rendered width of `text` in points.
pub fn text_width_pt(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// Greedy word wrap against a maximum line width in points. Words wider than
/// a whole line are broken at character boundaries.
pub fn wrap_text(text: &str, font_size: f32, max_width_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in split_overwide(word, font_size, max_width_pt) {
            let candidate = if current.is_empty() {
                piece.to_string()
            } else {
                format!("{} {}", current, piece)
            };

            if text_width_pt(&candidate, font_size) <= max_width_pt || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece.to_string();
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits `word` into pieces that each fit `max_width_pt`. Every piece holds
/// at least one character so a too-narrow line still makes progress.
fn split_overwide(word: &str, font_size: f32, max_width_pt: f32) -> Vec<&str> {
    if text_width_pt(word, font_size) <= max_width_pt {
        return vec![word];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (at, c) in word.char_indices() {
        let end = at + c.len_utf8();
        if at > start && text_width_pt(&word[start..end], font_size) > max_width_pt {
            pieces.push(&word[start..at]);
            start = at;
        }
    }
    pieces.push(&word[start..]);
    pieces
}

/// Encodes text for a base-14 font using WinAnsiEncoding.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if c.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}
