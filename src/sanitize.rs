//! Text normalization toward the Latin-1 repertoire of the WinAnsi-encoded
//! base fonts.
//!
//! Substitutions run before the charset filter so that common typographic
//! characters degrade to readable ASCII instead of the `?` fallback.

/// Ordered substitution table applied before the Latin-1 filter.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2019}', "'"),   // right single quote
    ('\u{2018}', "'"),   // left single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2026}', "..."), // ellipsis
    ('\u{0153}', "oe"),  // œ — Latin-1 has no ligature slot
    ('\u{0152}', "OE"),  // Œ
    ('\u{20AC}', "Eur"), // euro sign
    ('\u{2022}', "-"),   // bullet
];

/// Normalize `text` to characters the page renderer can encode.
///
/// Every output character is in the Latin-1 range; anything unmappable after
/// substitution becomes `?`. Idempotent: sanitizing sanitized text is a no-op.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    'chars: for ch in text.chars() {
        for &(from, to) in SUBSTITUTIONS {
            if ch == from {
                out.push_str(to);
                continue 'chars;
            }
        }
        if (ch as u32) < 0x100 {
            out.push(ch);
        } else {
            out.push('?');
        }
    }
    out
}

/// `None` and empty inputs yield an empty string.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_typographic_characters() {
        assert_eq!(sanitize("l’œuvre – 3€…"), "l'oeuvre - 3Eur...");
        assert_eq!(sanitize("“quoted”"), "\"quoted\"");
        assert_eq!(sanitize("• item"), "- item");
    }

    #[test]
    fn keeps_latin1_accents() {
        assert_eq!(sanitize("Régler l'exposition"), "Régler l'exposition");
        assert_eq!(sanitize("Étalonner"), "Étalonner");
    }

    #[test]
    fn replaces_unencodable_with_fallback() {
        assert_eq!(sanitize("caméra 📷"), "caméra ?");
        assert_eq!(sanitize("日本"), "??");
    }

    #[test]
    fn idempotent() {
        let samples = ["l’œuvre – 3€…", "déjà propre", "mixte 📷 et “texte”"];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn none_yields_empty() {
        assert_eq!(sanitize_opt(None), "");
        assert_eq!(sanitize_opt(Some("ok")), "ok");
    }
}
