use std::mem;

use super::{Emphasis, TextMeasure};

/// Greedy word wrap to `max_width_mm`.
///
/// Explicit newlines always start a new line, runs of whitespace collapse to a
/// single space, and a word that cannot fit on a line by itself is split at
/// character boundaries. The result always has at least one line.
pub fn wrap_text(
    text: &str,
    max_width_mm: f32,
    emphasis: Emphasis,
    font_size_pt: f32,
    measure: &impl TextMeasure,
) -> Vec<String> {
    let fits = |candidate: &str| measure.width_mm(candidate, emphasis, font_size_pt) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }

            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && !fits(&next) {
                    lines.push(mem::replace(&mut current, ch.to_string()));
                } else {
                    current = next;
                }
            }
        }

        lines.push(current);
    }

    lines
}
