use std::fmt;

/// Country code assumed for bare 10-digit numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// A destination number after [`normalize_phone`]. Always starts with `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPhone(String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number with everything but the last four digits hidden, for logs.
    pub fn masked(&self) -> String {
        let digits = &self.0[1..];
        let keep = digits.len().min(4);
        format!(
            "+{}{}",
            "*".repeat(digits.len() - keep),
            &digits[digits.len() - keep..]
        )
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NormalizedPhone> for String {
    fn from(phone: NormalizedPhone) -> Self {
        phone.0
    }
}

/// Very basic E.164-like normalization.
///
/// Every non-digit is dropped. Exactly ten remaining digits are treated as a
/// national number and get [`DEFAULT_COUNTRY_CODE`]; anything else is assumed
/// to already carry its country code and only gets a leading `+`.
pub fn normalize_phone(raw: &str) -> NormalizedPhone {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        NormalizedPhone(format!("{DEFAULT_COUNTRY_CODE}{digits}"))
    } else {
        NormalizedPhone(format!("+{digits}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_digits_get_default_country_code() {
        assert_eq!(normalize_phone("9876543210").as_str(), "+919876543210");
        assert_eq!(normalize_phone("(987) 654-3210").as_str(), "+919876543210");
    }

    #[test]
    fn other_lengths_get_plus() {
        assert_eq!(normalize_phone("+14155552671").as_str(), "+14155552671");
        assert_eq!(normalize_phone("44 20 7946 0958").as_str(), "+442079460958");
        assert_eq!(normalize_phone("12345").as_str(), "+12345");
    }

    #[test]
    fn output_always_starts_with_plus() {
        for raw in ["", "abc", "+", "0000000000", "٣٤٥", "+91 98765 43210"] {
            assert!(normalize_phone(raw).as_str().starts_with('+'), "{raw:?}");
        }
        assert_eq!(normalize_phone("no digits").as_str(), "+");
    }

    #[test]
    fn idempotent_on_prefixed_output() {
        for raw in ["9876543210", "+14155552671", "44 20 7946 0958"] {
            let once = normalize_phone(raw);
            let twice = normalize_phone(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(normalize_phone("9876543210").masked(), "+********3210");
        assert_eq!(normalize_phone("12").masked(), "+12");
    }
}
