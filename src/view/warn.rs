use std::sync::LazyLock;

use regex::Regex;

/// Matches the case-number line of a warn embed in any supported locale,
/// capturing the backticked integer.
static CASE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Номер случая|Номер справи|Case number)[^`]*`(\d+)`")
        .expect("case number pattern is valid")
});

/// Re-parses the case number out of a warn embed description.
///
/// The remove-warn dialog shows the warn as an embed and has to recover
/// the case number from its rendered text when the moderator submits the
/// modal.
pub fn extract_case_number(description: &str) -> Option<i32> {
    let captures = CASE_NUMBER_RE.captures(description)?;
    captures.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_all_three_locales() {
        assert_eq!(extract_case_number("Номер случая: `14`\nПричина: спам"), Some(14));
        assert_eq!(extract_case_number("Номер справи: `7`"), Some(7));
        assert_eq!(extract_case_number("Case number: `231`\nReason: spam"), Some(231));
    }

    #[test]
    fn ignores_unbackticked_numbers() {
        assert_eq!(extract_case_number("Case number: 14"), None);
        assert_eq!(extract_case_number("just text with `3`"), None);
    }

    #[test]
    fn overlong_numbers_do_not_panic() {
        assert_eq!(extract_case_number("Case number: `99999999999999999999`"), None);
    }
}
