/// Maximum length of a stored amount, in characters.
pub const MAX_AMOUNT_LEN: usize = 15;

const MAX_FRACTION_DIGITS: usize = 2;

/// Convert free-form amount text into a canonical decimal string.
///
/// Everything except ASCII digits, `,` and `.` is discarded. Without a
/// separator the digits are returned with leading zeros collapsed. With a
/// separator the result is `<integer>.<fraction>`, where the fraction is the
/// text between the first and second separator truncated to two digits. The
/// fraction may be empty, in which case the trailing dot is kept.
///
/// Never fails: malformed input degrades to a partial result or `""`.
pub fn normalize_amount(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .collect();
    if kept.is_empty() {
        return String::new();
    }

    let mut parts = kept.split([',', '.']);
    let integer = parts.next().unwrap_or_default();
    match parts.next() {
        None => collapse_leading_zeros(integer),
        Some(fraction) => {
            let fraction: String = fraction.chars().take(MAX_FRACTION_DIGITS).collect();
            format!("{}.{}", collapse_leading_zeros(integer), fraction)
        }
    }
}

fn collapse_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
