//! Destination number normalization
//!
//! Numbers are stored as the admin typed them; normalization to the
//! international form happens only at send time.

/// Normalize a New Zealand number to international format (`64...`)
///
/// Strips every non-digit, then rewrites a leading `0` to the `64` country
/// prefix. Numbers already in international form pass through untouched.
#[must_use]
pub fn normalize_nz_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(rest) => format!("64{rest}"),
        None => digits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mobile_becomes_international() {
        assert_eq!(normalize_nz_number("0211234567"), "64211234567");
    }

    #[test]
    fn spaces_and_punctuation_are_stripped() {
        assert_eq!(normalize_nz_number("021 123-4567"), "64211234567");
        assert_eq!(normalize_nz_number("(09) 555 0100"), "6495550100");
    }

    #[test]
    fn international_form_passes_through() {
        assert_eq!(normalize_nz_number("64211234567"), "64211234567");
        assert_eq!(normalize_nz_number("+64 21 123 4567"), "64211234567");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_nz_number(""), "");
    }
}
