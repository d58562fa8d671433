//! Width-budgeted text fitting.
//!
//! Label fields are drawn with fonts whose metrics are not always available (the
//! built-in PDF fonts carry none), so widths are estimated with a fixed average
//! glyph advance of `0.6` em.

/// Average glyph advance as a fraction of the font size
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Estimated rendered width of `text` at `size`
pub fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH_FACTOR
}

/// How many characters fit in `max_width` at `size`
fn chars_per_width(max_width: f32, size: f32) -> usize {
    let advance = size * CHAR_WIDTH_FACTOR;
    if advance <= 0.0 || !max_width.is_finite() {
        return usize::MAX;
    }
    (max_width / advance).floor().max(0.0) as usize
}

/// Greedily wrap `text` into lines that fit `max_width`.
///
/// Words are whitespace separated and are never reordered. A word that does not fit
/// on a line of its own is hard-split into fixed-length chunks, each emitted as its
/// own line.
pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if estimate_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if estimate_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            let chunk_len = chars_per_width(max_width, size).max(1);
            let chars: Vec<char> = word.chars().collect();
            lines.extend(chars.chunks(chunk_len).map(|chunk| chunk.iter().collect()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Shorten `text` to fit `max_width`, marking the cut with `...`. Text that already
/// fits is returned unchanged.
pub fn truncate(text: &str, max_width: f32, size: f32) -> String {
    if estimate_width(text, size) <= max_width {
        return text.to_string();
    }

    let keep = chars_per_width(max_width, size).saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_counts_chars_not_bytes() {
        assert_eq!(estimate_width("abc", 10.0), 18.0);
        assert_eq!(estimate_width("açã", 10.0), 18.0);
    }

    #[test]
    fn wraps_words_in_order_within_budget() {
        let text = "A very long product name for testing";
        let lines = wrap(text, 100.0, 12.0);
        assert!(lines.len() >= 2);
        for line in lines.iter() {
            assert!(estimate_width(line, 12.0) <= 100.0, "{line:?} overflows");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn long_word_is_hard_split() {
        // 10 * 0.6 = 6 per char, 30 / 6 = 5 chars per chunk
        let word = "ABCDEFGHIJKLM";
        let lines = wrap(word, 30.0, 10.0);
        assert_eq!(lines, vec!["ABCDE", "FGHIJ", "KLM"]);
        assert_eq!(lines.iter().map(|l| l.len()).sum::<usize>(), word.len());
    }

    #[test]
    fn hard_split_closes_pending_line() {
        let lines = wrap("ab ABCDEFGHIJ cd", 30.0, 10.0);
        assert_eq!(lines, vec!["ab", "ABCDE", "FGHIJ", "cd"]);
    }

    #[test]
    fn tiny_budget_still_makes_progress() {
        let lines = wrap("abc", 1.0, 10.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap("   ", 100.0, 12.0).is_empty());
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("short", 300.0, 12.0), "short");
        // 60 / 6 = 10 chars, minus 3 for the ellipsis
        assert_eq!(truncate("ABCDEFGHIJKLMNOP", 60.0, 10.0), "ABCDEFG...");
        assert_eq!(truncate("ABCDEFGHIJ", 12.0, 10.0), "...");
    }
}
