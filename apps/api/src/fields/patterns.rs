//! Pattern rules for the contact, education and experience fields.
//!
//! Every rule is best-effort: no match is `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{MatchMode, PhoneMode};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+").expect("valid email regex")
});

/// Two shapes, separators `-`, `.` or a single space:
/// optional `+CC`, a 3-digit area code (bare or in parentheses), then 3 and 4 digits;
/// or `+CC` followed by two 5-digit groups (`+91 98765 43210`).
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+\d{1,3}[-. ]?)?(?:\(\d{3}\)|\d{3})[-. ]?\d{3}[-. ]?\d{4}|\+\d{1,3}[-. ]?\d{5}[-. ]?\d{5}",
    )
    .expect("valid phone regex")
});

/// Year ranges (`2014-2018`, `2019 2023`) and numeric dates (`12.05.1994`).
static DATE_LIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:19|20)\d{2}\s?[-–./ ]\s?(?:19|20)\d{2}\b|\b\d{1,2}[-./]\d{1,2}[-./](?:19|20)?\d{2}\b",
    )
    .expect("valid date regex")
});

static PHONE_TEN_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{10}\b").expect("valid ten-digit phone regex"));

/// Degree abbreviations and names. Dots and the space after them are optional
/// so `B.Tech`, `B. Tech` and `BTech` all match.
const DEGREE_PATTERNS: &[&str] = &[
    r"B\.?\s?Tech",
    r"B\.?\s?Sc",
    r"B\.?\s?Com",
    r"B\.\s?E",
    r"B\.\s?A",
    r"M\.?\s?Tech",
    r"M\.?\s?Sc",
    r"M\.?\s?Com",
    r"M\.\s?E",
    r"M\.\s?A",
    r"Ph\.?\s?D",
    r"MBA",
    r"MCA",
    r"BCA",
    r"Bachelors?",
    r"Masters?",
    r"Diploma",
];

static EDUCATION_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\b(?:{})\b", DEGREE_PATTERNS.join("|"));
    Regex::new(&pattern).expect("valid education regex")
});

static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\+?\s*(?:years?|yrs?|months?)\s+(?:of\s+)?(?:work\s+)?experience\b",
    )
    .expect("valid experience regex")
});

/// First well-formed email address in document order.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First phone-number-shaped run of digits.
pub fn find_phone(text: &str, mode: PhoneMode) -> Option<String> {
    match mode {
        PhoneMode::TenDigit => PHONE_TEN_DIGIT_RE
            .find(text)
            .map(|m| m.as_str().to_string()),
        PhoneMode::International => PHONE_RE
            .find_iter(text)
            .find(|m| is_standalone(text, m.start(), m.end()) && !DATE_LIKE_RE.is_match(m.as_str()))
            .map(|m| m.as_str().trim().to_string()),
    }
}

pub fn find_education(text: &str, mode: MatchMode) -> Option<String> {
    collect_matches(&EDUCATION_RE, text, mode)
}

pub fn find_experience(text: &str, mode: MatchMode) -> Option<String> {
    collect_matches(&EXPERIENCE_RE, text, mode)
}

/// `First` returns the first match; `All` joins every distinct match
/// (case-insensitive, order of first occurrence) with ", ".
fn collect_matches(re: &Regex, text: &str, mode: MatchMode) -> Option<String> {
    match mode {
        MatchMode::First => re.find(text).map(|m| m.as_str().to_string()),
        MatchMode::All => {
            let mut seen: Vec<String> = Vec::new();
            let mut found: Vec<&str> = Vec::new();
            for m in re.find_iter(text) {
                let key = normalize_key(m.as_str());
                if !seen.contains(&key) {
                    seen.push(key);
                    found.push(m.as_str());
                }
            }
            (!found.is_empty()).then(|| found.join(", "))
        }
    }
}

/// Lowercased with whitespace collapsed, so "3 Years  experience" and
/// "3 years experience" count as the same phrase.
fn normalize_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The match must not be glued to surrounding letters or digits.
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_email() {
        let text = "Contact: jane.doe+jobs@mail.example.co.uk for details";
        assert_eq!(
            find_email(text).as_deref(),
            Some("jane.doe+jobs@mail.example.co.uk")
        );
    }

    #[test]
    fn test_first_email_wins() {
        let text = "work: j.doe@corp.com\npersonal: jane_99@home.net";
        assert_eq!(find_email(text).as_deref(), Some("j.doe@corp.com"));
    }

    #[test]
    fn test_email_excludes_trailing_period() {
        assert_eq!(
            find_email("Reach me at jane@example.com.").as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn test_no_email() {
        assert_eq!(find_email("jane at example dot com"), None);
    }

    #[test]
    fn test_phone_with_area_code_in_parens() {
        assert_eq!(
            find_phone("Phone: (415) 555-0199", PhoneMode::International).as_deref(),
            Some("(415) 555-0199")
        );
    }

    #[test]
    fn test_phone_with_country_code() {
        assert_eq!(
            find_phone("Mobile +91 98765 43210", PhoneMode::International).as_deref(),
            Some("+91 98765 43210")
        );
        assert_eq!(
            find_phone("tel +1-415-555-0199", PhoneMode::International).as_deref(),
            Some("+1-415-555-0199")
        );
    }

    #[test]
    fn test_phone_with_dots() {
        assert_eq!(
            find_phone("415.555.0199", PhoneMode::International).as_deref(),
            Some("415.555.0199")
        );
    }

    #[test]
    fn test_short_digit_runs_are_not_phones() {
        assert_eq!(find_phone("Class of 2019, GPA 3.8", PhoneMode::International), None);
    }

    #[test]
    fn test_phone_does_not_span_lines() {
        assert_eq!(find_phone("Room 12\n3456", PhoneMode::International), None);
    }

    #[test]
    fn test_year_range_is_not_a_phone() {
        let text = "Jane Doe\nB.Tech, 2014-2018\nPhone: (415) 555-0199";
        assert_eq!(
            find_phone(text, PhoneMode::International).as_deref(),
            Some("(415) 555-0199")
        );
    }

    #[test]
    fn test_dotted_date_is_not_a_phone() {
        let text = "Jane Doe\nDOB 12.05.1994\nPhone: (415) 555-0199";
        assert_eq!(
            find_phone(text, PhoneMode::International).as_deref(),
            Some("(415) 555-0199")
        );
    }

    #[test]
    fn test_space_separated_years_are_not_a_phone() {
        let text = "Jane Doe\nAcme Corp 2019 2023\nPhone: (415) 555-0199";
        assert_eq!(
            find_phone(text, PhoneMode::International).as_deref(),
            Some("(415) 555-0199")
        );
    }

    #[test]
    fn test_date_lines_alone_yield_no_phone() {
        let text = "Acme Corp, 2014 - 2018\nJoined 01/06/2019\nRoll no. 1234 5678";
        assert_eq!(find_phone(text, PhoneMode::International), None);
    }

    #[test]
    fn test_ten_digit_mode() {
        assert_eq!(
            find_phone("call 9876543210 now", PhoneMode::TenDigit).as_deref(),
            Some("9876543210")
        );
        assert_eq!(find_phone("(415) 555-0199", PhoneMode::TenDigit), None);
        assert_eq!(find_phone("98765432101", PhoneMode::TenDigit), None);
    }

    #[test]
    fn test_education_first_match_case_insensitive() {
        let text = "m.tech in AI (2020)\nB.Tech in Computer Science";
        assert_eq!(find_education(text, MatchMode::First).as_deref(), Some("m.tech"));
    }

    #[test]
    fn test_education_all_matches_deduplicated() {
        let text = "B.Tech (2016)\nMBA (2019)\nb.tech honours";
        assert_eq!(
            find_education(text, MatchMode::All).as_deref(),
            Some("B.Tech, MBA")
        );
    }

    #[test]
    fn test_education_extended_vocabulary() {
        assert_eq!(
            find_education("B.Com from Delhi University", MatchMode::First).as_deref(),
            Some("B.Com")
        );
        assert_eq!(
            find_education("Ph.D. in Physics", MatchMode::First).as_deref(),
            Some("Ph.D")
        );
        assert_eq!(
            find_education("Master's degree in Statistics", MatchMode::First).as_deref(),
            Some("Master")
        );
    }

    #[test]
    fn test_education_requires_word_boundary() {
        assert_eq!(find_education("Mastery of Kubernetes", MatchMode::First), None);
    }

    #[test]
    fn test_experience_first_match() {
        let text = "3 years experience in Python; 6 months experience in Go";
        assert_eq!(
            find_experience(text, MatchMode::First).as_deref(),
            Some("3 years experience")
        );
    }

    #[test]
    fn test_experience_all_matches() {
        let text = "3 years experience in Python; 6 months experience in Go; 3 YEARS experience again";
        assert_eq!(
            find_experience(text, MatchMode::All).as_deref(),
            Some("3 years experience, 6 months experience")
        );
    }

    #[test]
    fn test_experience_variants() {
        assert_eq!(
            find_experience("1 year of experience", MatchMode::First).as_deref(),
            Some("1 year of experience")
        );
        assert_eq!(
            find_experience("5+ yrs experience", MatchMode::First).as_deref(),
            Some("5+ yrs experience")
        );
        assert_eq!(find_experience("experienced engineer", MatchMode::First), None);
    }
}
