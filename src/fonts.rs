//! Metrics and encoding for the four base-14 Helvetica variants.
//!
//! The generated documents use WinAnsi-encoded Type1 fonts only, so no font
//! files are embedded; widths come from the standard AFM tables. WinAnsi and
//! Latin-1 agree on every code point the sanitizer can emit (0x20..=0x7E and
//! 0xA0..=0xFF), which keeps measurement and encoding in lockstep.

use pdf_writer::{Name, Pdf, Ref};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// Resource name used in content streams (`/F1` .. `/F4`).
    pub fn pdf_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
            FontStyle::BoldItalic => "F4",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
            FontStyle::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    /// Oblique variants share the upright width tables.
    fn width_table(self) -> &'static [f32; 95] {
        match self {
            FontStyle::Regular | FontStyle::Italic => &ASCII_WIDTHS_REGULAR,
            FontStyle::Bold | FontStyle::BoldItalic => &ASCII_WIDTHS_BOLD,
        }
    }
}

pub const ALL_STYLES: [FontStyle; 4] = [
    FontStyle::Regular,
    FontStyle::Bold,
    FontStyle::Italic,
    FontStyle::BoldItalic,
];

/// Register the four Type1 fonts and return (resource name, ref) pairs for
/// the page resource dictionaries.
pub fn register_base_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(&'static str, Ref)> {
    ALL_STYLES
        .iter()
        .map(|&style| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(style.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (style.pdf_name(), font_ref)
        })
        .collect()
}

/// Helvetica AFM advance widths for chars 0x20..=0x7E, 1000 units/em.
const ASCII_WIDTHS_REGULAR: [f32; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, // ' '..'\''
    333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0, // '('..'/'
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, // '0'..'7'
    556.0, 556.0, 278.0, 278.0, 584.0, 584.0, 584.0, 556.0, // '8'..'?'
    1015.0, 667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, // '@'..'G'
    722.0, 278.0, 500.0, 667.0, 556.0, 833.0, 722.0, 778.0, // 'H'..'O'
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, // 'P'..'W'
    667.0, 667.0, 611.0, 278.0, 278.0, 278.0, 469.0, 556.0, // 'X'..'_'
    333.0, 556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, // '`'..'g'
    556.0, 222.0, 222.0, 500.0, 222.0, 833.0, 556.0, 556.0, // 'h'..'o'
    556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, // 'p'..'w'
    500.0, 500.0, 500.0, 334.0, 260.0, 334.0, 584.0, // 'x'..'~'
];

/// Helvetica-Bold AFM advance widths for chars 0x20..=0x7E.
const ASCII_WIDTHS_BOLD: [f32; 95] = [
    278.0, 333.0, 474.0, 556.0, 556.0, 889.0, 722.0, 238.0, // ' '..'\''
    333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0, // '('..'/'
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, // '0'..'7'
    556.0, 556.0, 333.0, 333.0, 584.0, 584.0, 584.0, 611.0, // '8'..'?'
    975.0, 722.0, 722.0, 722.0, 722.0, 667.0, 611.0, 778.0, // '@'..'G'
    722.0, 278.0, 556.0, 722.0, 611.0, 833.0, 722.0, 778.0, // 'H'..'O'
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, // 'P'..'W'
    667.0, 667.0, 611.0, 333.0, 278.0, 333.0, 584.0, 556.0, // 'X'..'_'
    333.0, 556.0, 611.0, 556.0, 611.0, 556.0, 333.0, 611.0, // '`'..'g'
    611.0, 278.0, 278.0, 556.0, 278.0, 889.0, 611.0, 611.0, // 'h'..'o'
    611.0, 611.0, 389.0, 556.0, 333.0, 611.0, 556.0, 778.0, // 'p'..'w'
    556.0, 556.0, 500.0, 389.0, 280.0, 389.0, 584.0, // 'x'..'~'
];

/// Accented Latin-1 letters advance exactly like their base letter in
/// Helvetica, so the supplement range folds onto the ASCII table.
fn latin1_supplement_base(byte: u8) -> Option<char> {
    Some(match byte {
        0xC0..=0xC5 => 'A',
        0xC7 => 'C',
        0xC8..=0xCB => 'E',
        0xCC..=0xCF => 'I',
        0xD1 => 'N',
        0xD2..=0xD6 | 0xD8 => 'O',
        0xD9..=0xDC => 'U',
        0xDD => 'Y',
        0xE0..=0xE5 => 'a',
        0xE7 => 'c',
        0xE8..=0xEB => 'e',
        0xEC..=0xEF => 'i',
        0xF1 => 'n',
        0xF2..=0xF6 => 'o',
        0xF9..=0xFC => 'u',
        0xFD | 0xFF => 'y',
        _ => return None,
    })
}

/// Advance width of one char in 1000 units/em. Unencodable chars measure as
/// `?`, matching what the encoder emits for them.
pub fn char_width_1000(style: FontStyle, ch: char) -> f32 {
    let table = style.width_table();
    match ch as u32 {
        0x20..=0x7E => table[ch as usize - 0x20],
        0xA0 => table[0], // nbsp = space
        0xC0..=0xFF => {
            let byte = ch as u8;
            if let Some(base) = latin1_supplement_base(byte) {
                table[base as usize - 0x20]
            } else {
                match byte {
                    0xC6 => 1000.0,                            // Æ
                    0xD0 | 0xDE => table['D' as usize - 0x20], // Ð Þ
                    0xD7 | 0xF7 => 584.0,                      // × ÷
                    0xDF => 611.0,                             // ß
                    0xE6 => 889.0,                             // æ
                    0xF0 | 0xF8 | 0xFE => table['o' as usize - 0x20],
                    _ => table['?' as usize - 0x20],
                }
            }
        }
        0xA1..=0xBF => match ch as u8 {
            0xAB | 0xBB => 556.0, // guillemets
            0xB0 => 400.0,        // degree
            0xB7 => 278.0,        // middle dot
            _ => 556.0,
        },
        _ => table['?' as usize - 0x20],
    }
}

/// Width of a string in points at the given size.
pub fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    text.chars()
        .map(|ch| char_width_1000(style, ch) * size / 1000.0)
        .sum()
}

/// Encode sanitized text for a WinAnsi `Str` operand. Anything outside the
/// shared Latin-1/WinAnsi range degrades to `?` (the sanitizer already
/// guarantees this cannot happen for document text).
pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm() {
        assert_eq!(char_width_1000(FontStyle::Regular, ' '), 278.0);
        assert_eq!(char_width_1000(FontStyle::Regular, 'M'), 833.0);
        assert_eq!(char_width_1000(FontStyle::Regular, 'i'), 222.0);
        assert_eq!(char_width_1000(FontStyle::Bold, 'i'), 278.0);
        assert_eq!(char_width_1000(FontStyle::Bold, '@'), 975.0);
    }

    #[test]
    fn accented_letters_measure_as_base() {
        for style in ALL_STYLES {
            assert_eq!(char_width_1000(style, 'É'), char_width_1000(style, 'E'));
            assert_eq!(char_width_1000(style, 'é'), char_width_1000(style, 'e'));
        }
    }

    #[test]
    fn oblique_shares_upright_widths() {
        assert_eq!(
            text_width("Cadrage", FontStyle::Regular, 10.0),
            text_width("Cadrage", FontStyle::Italic, 10.0)
        );
    }

    #[test]
    fn winansi_encoding_is_byte_per_char() {
        assert_eq!(to_winansi_bytes("Régler"), b"R\xE9gler".to_vec());
        assert_eq!(to_winansi_bytes("a\u{1F4F7}b"), b"a?b".to_vec());
    }
}
