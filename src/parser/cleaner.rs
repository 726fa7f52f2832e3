use chrono::NaiveDate;

use crate::models::EpisodeMeta;

// ── Text ──────────────────────────────────────────────────────────────────────

pub fn normalise_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The reveal fragment sits inside a single-quoted script string, so quotes
/// arrive backslash-escaped: `Ken\'s` → `Ken's`.
pub fn unescape_script_string(s: &str) -> String {
    s.replace("\\'", "'").replace("\\\"", "\"")
}

// ── Money ─────────────────────────────────────────────────────────────────────

/// Parse a clue value: "$1,000" → 1000 | "1000" → 1000.
/// Anything besides digits, `$`, `,` and spaces is rejected.
pub fn parse_dollars(s: &str) -> Option<u32> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a score or wager: "$3,400" → 3400 | "-$400" → -400 | "$-400" → -400.
/// A minus sign (ASCII or U+2212) is only accepted in front of the digits.
pub fn parse_signed_dollars(s: &str) -> Option<i64> {
    fn unsigned(rest: &str) -> Option<&str> {
        rest.strip_prefix('-').or_else(|| rest.strip_prefix('\u{2212}'))
    }

    let s = s.trim();
    let (negative, magnitude) = match unsigned(s) {
        Some(rest) => (true, rest),
        None => match s.strip_prefix('$').and_then(unsigned) {
            Some(rest) => (true, rest),
            None => (false, s),
        },
    };
    let magnitude = i64::from(parse_dollars(magnitude)?);
    Some(if negative { -magnitude } else { magnitude })
}

/// Daily-double values are labelled "DD: $2,000".
pub fn strip_daily_double_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("DD:").unwrap_or(s).trim()
}

// ── Episode title ─────────────────────────────────────────────────────────────

/// "Show #4596 - Friday, July 23, 2004" → show 4596, 2004-07-23.
/// Both parts are optional; special pages use other title shapes.
pub fn parse_episode_title(title: &str) -> EpisodeMeta {
    let title = normalise_text(title);

    let show_number = title.split_once('#').and_then(|(_, rest)| {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    });

    let air_date = title
        .split_once(" - ")
        .and_then(|(_, date)| parse_air_date(date.trim()));

    EpisodeMeta {
        show_number,
        air_date,
    }
}

fn parse_air_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%A, %B %d, %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%B %d, %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dollars() {
        assert_eq!(parse_dollars("$200"), Some(200));
        assert_eq!(parse_dollars("$2,000"), Some(2000));
        assert_eq!(parse_dollars(" 400 "), Some(400));
        assert_eq!(parse_dollars(""), None);
        assert_eq!(parse_dollars("$"), None);
        assert_eq!(parse_dollars("DD: $400"), None);
    }

    #[test]
    fn test_parse_signed_dollars() {
        assert_eq!(parse_signed_dollars("$3,400"), Some(3400));
        assert_eq!(parse_signed_dollars("-$400"), Some(-400));
        assert_eq!(parse_signed_dollars("$-1,200"), Some(-1200));
        assert_eq!(parse_signed_dollars("\u{2212}$600"), Some(-600));
        assert_eq!(parse_signed_dollars("$0"), Some(0));
        assert_eq!(parse_signed_dollars("n/a"), None);
        assert_eq!(parse_signed_dollars("$1-00"), None);
        assert_eq!(parse_signed_dollars("$400-"), None);
        assert_eq!(parse_signed_dollars("--$400"), None);
    }

    #[test]
    fn test_strip_daily_double_prefix() {
        assert_eq!(strip_daily_double_prefix("DD: $2,000"), "$2,000");
        assert_eq!(strip_daily_double_prefix("$800"), "$800");
        assert_eq!(parse_dollars(strip_daily_double_prefix("DD: $2,000")), Some(2000));
    }

    #[test]
    fn test_unescape_script_string() {
        assert_eq!(unescape_script_string(r"What is Ken\'s hat?"), "What is Ken's hat?");
        assert_eq!(
            unescape_script_string(r#"<em class=\"correct_response\">x</em>"#),
            r#"<em class="correct_response">x</em>"#
        );
    }

    #[test]
    fn test_parse_episode_title() {
        let meta = parse_episode_title("Show #4596 - Friday, July 23, 2004");
        assert_eq!(meta.show_number, Some(4596));
        assert_eq!(meta.air_date, NaiveDate::from_ymd_opt(2004, 7, 23));

        let meta = parse_episode_title("Show #1, aired 1984-09-10");
        assert_eq!(meta.show_number, Some(1));
        assert_eq!(meta.air_date, None);

        assert_eq!(parse_episode_title("Pilot episode"), EpisodeMeta::default());
    }
}
