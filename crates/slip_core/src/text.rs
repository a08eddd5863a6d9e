use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Replace accented Latin letters with their plain ASCII base letters and drop
/// combining marks.
///
/// Only the Latin-1 Supplement and Latin Extended-A letters are rewritten;
/// other scripts pass through unchanged. Letters without a canonical
/// decomposition (`đ`, `ß`, `æ`, `ł`, ...) use a fixed transliteration.
pub fn deburr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else if is_combining_mark(ch) {
            continue;
        } else if let Some(replacement) = transliterate(ch) {
            out.push_str(replacement);
        } else if is_latin_letter(ch) {
            out.extend(std::iter::once(ch).nfd().filter(|c| !is_combining_mark(*c)));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Keep at most `limit` characters of `input`.
pub fn truncate_chars(input: &str, limit: usize) -> String {
    input.chars().take(limit).collect()
}

fn is_latin_letter(ch: char) -> bool {
    matches!(ch, '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{17F}')
}

fn transliterate(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Þ' => "Th",
        'þ' => "th",
        'ß' => "ss",
        'Æ' => "Ae",
        'æ' => "ae",
        'Ø' => "O",
        'ø' => "o",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'ĸ' => "k",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'ŉ' => "'n",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Œ' => "Oe",
        'œ' => "oe",
        'Ŧ' => "T",
        'ŧ' => "t",
        'ſ' => "s",
        _ => return None,
    };
    Some(replacement)
}
