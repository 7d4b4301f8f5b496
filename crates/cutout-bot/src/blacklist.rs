//! Sender language blacklist.

/// Primary language subtags that receive the blacklist reply instead of
/// service: Russian, Belarusian, Chinese and Tigrinya, in both ISO 639-1
/// and ISO 639-2 form.
pub const BLACKLISTED_LANGUAGES: &[&str] = &["ru", "rus", "be", "bel", "zh", "zho", "chi", "ti", "tir"];

/// Whether an IETF language tag (as reported by Telegram) is blacklisted.
///
/// Only the primary subtag is compared, case-insensitively, so `ru-RU`
/// and `ZH-hans` both match. A missing or empty tag never matches.
#[must_use]
pub fn is_blacklisted(language_code: Option<&str>) -> bool {
    let Some(tag) = language_code else {
        return false;
    };
    let primary = tag.split(['-', '_']).next().unwrap_or_default().trim();
    !primary.is_empty()
        && BLACKLISTED_LANGUAGES
            .iter()
            .any(|code| code.eq_ignore_ascii_case(primary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_codes_match() {
        for code in BLACKLISTED_LANGUAGES {
            assert!(is_blacklisted(Some(code)), "{code}");
        }
    }

    #[test]
    fn region_and_case_are_ignored() {
        assert!(is_blacklisted(Some("ru-RU")));
        assert!(is_blacklisted(Some("ZH-Hans")));
        assert!(is_blacklisted(Some("be_BY")));
        assert!(is_blacklisted(Some("RUS")));
    }

    #[test]
    fn other_languages_pass() {
        for code in ["uk", "en", "en-US", "pl", "de", "rue", "tig", "zu"] {
            assert!(!is_blacklisted(Some(code)), "{code}");
        }
    }

    #[test]
    fn missing_or_empty_tag_passes() {
        assert!(!is_blacklisted(None));
        assert!(!is_blacklisted(Some("")));
        assert!(!is_blacklisted(Some("-RU")));
    }
}
