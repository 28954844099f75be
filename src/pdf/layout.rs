//! Pure text-wrapping and measurement.
//!
//! Layout runs measure-then-draw: heights are computed from wrapped line
//! counts before anything is emitted, and the draw step consumes the wrapped
//! lines instead of re-measuring, so the two can never drift apart.

use crate::fonts::{FontStyle, text_width};

/// Greedy word wrap of `text` into lines fitting `width` points.
///
/// Explicit newlines force breaks. A word wider than the full width is split
/// at character granularity (at least one char per line, so this terminates
/// for any positive width). Empty text yields one empty line: a text block
/// never measures to zero height.
pub fn wrap_lines(text: &str, width: f32, style: FontStyle, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;
        let space_w = text_width(" ", style, size);

        for word in segment.split_whitespace() {
            let word_w = text_width(word, style, size);

            if word_w > width {
                // Oversized word: flush the pending line, then hard-split.
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0.0;
                }
                let mut piece = String::new();
                let mut piece_w = 0.0f32;
                for ch in word.chars() {
                    let cw = text_width(&ch.to_string(), style, size);
                    if !piece.is_empty() && piece_w + cw > width {
                        lines.push(std::mem::take(&mut piece));
                        piece_w = 0.0;
                    }
                    piece.push(ch);
                    piece_w += cw;
                }
                current = piece;
                current_w = piece_w;
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_w = word_w;
            } else if current_w + space_w + word_w > width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
            }
        }
        lines.push(current);
    }
    lines
}

/// Height a wrapped text block will occupy, without drawing.
pub fn measure_wrapped_height(
    text: &str,
    width: f32,
    style: FontStyle,
    size: f32,
    line_h: f32,
) -> f32 {
    wrap_lines(text, width, style, size).len() as f32 * line_h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontStyle::Regular;

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(wrap_lines("", 100.0, Regular, 10.0), vec![String::new()]);
        assert_eq!(measure_wrapped_height("", 100.0, Regular, 10.0, 12.0), 12.0);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_lines("un mot", 200.0, Regular, 10.0);
        assert_eq!(lines, vec!["un mot".to_string()]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // "mesure" at 10pt is ~34pt wide; force one word per line.
        let lines = wrap_lines("mesure mesure mesure", 40.0, Regular, 10.0);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l == "mesure"));
    }

    #[test]
    fn explicit_newlines_force_breaks() {
        let lines = wrap_lines("a\nb\n\nc", 200.0, Regular, 10.0);
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn oversized_word_splits_at_char_level() {
        let lines = wrap_lines("Anticonstitutionnellement", 30.0, Regular, 10.0);
        assert!(lines.len() > 1);
        let rejoined: String = lines.concat();
        assert_eq!(rejoined, "Anticonstitutionnellement");
        for line in &lines {
            assert!(text_width(line, Regular, 10.0) <= 30.0 + 0.01);
        }
    }

    #[test]
    fn measure_matches_wrap_count() {
        let text = "La prise d'information et la lecture du jeu en attaque placée";
        let lines = wrap_lines(text, 120.0, Regular, 10.0);
        assert_eq!(
            measure_wrapped_height(text, 120.0, Regular, 10.0, 5.0),
            lines.len() as f32 * 5.0
        );
    }

    #[test]
    fn no_line_exceeds_width() {
        let text = "Améliorer la prise d'information dans un jeu réduit à effectif constant";
        for width in [60.0f32, 90.0, 150.0] {
            for line in wrap_lines(text, width, Regular, 10.0) {
                assert!(
                    text_width(&line, Regular, 10.0) <= width + 0.01,
                    "line {line:?} exceeds {width}"
                );
            }
        }
    }
}
