//! Pattern-based extraction of zoning rules from regulatory text.
//!
//! Text is lowercased and split into sentences. Each sentence is probed
//! independently for a zone type, FAR, maximum height, ground coverage,
//! setback and parking ratio; a sentence becomes a [`ZoningRule`] only when
//! at least two of those six are found.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::CityCatalog;
use crate::models::{ZoneType, ZoningRule};

/// Minimum number of extracted fields for a sentence to count as a rule.
pub const MIN_RULE_FIELDS: usize = 2;

/// Zone vocabulary in match order; later matches overwrite earlier ones.
const ZONE_KEYWORDS: [(&str, ZoneType); 5] = [
    ("residential", ZoneType::Residential),
    ("commercial", ZoneType::Commercial),
    ("industrial", ZoneType::Industrial),
    ("mixed", ZoneType::Mixed),
    ("mixed-use", ZoneType::Mixed),
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static rule pattern is a valid regex")
}

static FAR_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?:far|fsi)[\s:]*(?:of|is|=)?\s*([0-9]+\.?[0-9]*)"));

static HEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?:height|tall)[\s:]*(?:of|is|up to)?\s*([0-9]+)\s*(?:m|meter|metre|feet|ft)")
});

static COVERAGE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"coverage[\s:]*(?:of|is)?\s*([0-9]+)\s*%"));

static SETBACK_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"setback[\s:]*(?:of|is)?\s*([0-9]+)\s*(?:m|meter|metre|feet|ft)")
});

static PARKING_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"parking[\s:]*([0-9]+)\s*(?:per|for every|/)\s*([0-9]+)\s*(?:sqm|sq\.m|square meter)",
    )
});

fn capture<'t>(re: &Regex, sentence: &'t str, group: usize) -> Option<&'t str> {
    re.captures(sentence)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text, or at a blank line. Decimal points never split.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = match c {
            '.' | '!' | '?' => match chars.peek() {
                None => Some(i + c.len_utf8()),
                Some((_, next)) if next.is_whitespace() => Some(i + c.len_utf8()),
                _ => None,
            },
            '\n' => {
                let rest = &text[i + 1..];
                let line_end = rest.find('\n');
                match line_end {
                    Some(n) if rest[..n].trim().is_empty() => Some(i),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(end) = end {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Probe one lowercased sentence for rule fields.
///
/// Returns `None` when fewer than [`MIN_RULE_FIELDS`] fields are found.
/// Numbers that do not fit their field type are ignored.
pub fn parse_sentence(sentence: &str) -> Option<ZoningRule> {
    let mut rule = ZoningRule {
        source_sentence: sentence.to_string(),
        ..ZoningRule::default()
    };

    for (keyword, zone) in ZONE_KEYWORDS {
        if sentence.contains(keyword) {
            rule.zone_type = Some(zone);
        }
    }

    rule.far = capture(&FAR_RE, sentence, 1)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite());
    rule.max_height = capture(&HEIGHT_RE, sentence, 1).and_then(|v| v.parse().ok());
    rule.ground_coverage = capture(&COVERAGE_RE, sentence, 1).and_then(|v| v.parse().ok());
    rule.setback = capture(&SETBACK_RE, sentence, 1).and_then(|v| v.parse().ok());
    // Only the area denominator is kept; the ratio is normalised to one space.
    rule.parking = capture(&PARKING_RE, sentence, 2).map(|area| format!("1 per {} sqm", area));

    (rule.field_count() >= MIN_RULE_FIELDS).then_some(rule)
}

/// Extract every accepted rule from raw text, in sentence order.
pub fn extract_rules(text: &str) -> Vec<ZoningRule> {
    let lowered = text.to_lowercase();
    split_sentences(&lowered)
        .into_iter()
        .filter_map(parse_sentence)
        .collect()
}

/// First city whose keywords appear in the text, in catalog order.
pub fn detect_city(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    CityCatalog::city_keywords()
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(city, _)| *city)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_and_height_sentence() {
        let rules = extract_rules("FAR is 2.5 and maximum height is 30m");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].far, Some(2.5));
        assert_eq!(rules[0].max_height, Some(30));
        assert_eq!(rules[0].zone_type, None);
        assert_eq!(rules[0].source_sentence, "far is 2.5 and maximum height is 30m");
    }

    #[test]
    fn test_single_field_is_discarded() {
        assert!(extract_rules("Parking must be provided for visitors.").is_empty());
        assert!(extract_rules("The FSI of 3.0 applies.").is_empty());
    }

    #[test]
    fn test_all_fields() {
        let text = "In commercial zones the FSI: 3.5, building height up to 60 m, \
                    ground coverage of 70%, setback of 9 meters and parking 2 per 50 sqm.";
        let rules = extract_rules(text);
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.zone_type, Some(ZoneType::Commercial));
        assert_eq!(rule.far, Some(3.5));
        assert_eq!(rule.max_height, Some(60));
        assert_eq!(rule.ground_coverage, Some(70));
        assert_eq!(rule.setback, Some(9));
        assert_eq!(rule.parking.as_deref(), Some("1 per 50 sqm"));
        assert_eq!(rule.field_count(), 6);
    }

    #[test]
    fn test_later_zone_keyword_overwrites() {
        let rule = parse_sentence("residential and commercial plots have far 2.0").unwrap();
        assert_eq!(rule.zone_type, Some(ZoneType::Commercial));

        let mixed = parse_sentence("mixed-use towers with far of 2.8").unwrap();
        assert_eq!(mixed.zone_type, Some(ZoneType::Mixed));
    }

    #[test]
    fn test_sentence_splitting() {
        let text = "FAR is 2.5. Height is 30m!\n\nCoverage is 50%\nand setback 3m? End";
        assert_eq!(
            split_sentences(text),
            vec!["FAR is 2.5.", "Height is 30m!", "Coverage is 50%\nand setback 3m?", "End"]
        );
    }

    #[test]
    fn test_rules_across_sentences() {
        let text = "Residential FAR is 1.75. Commercial coverage is 60% with setback 6m.\n\n\
                    Nothing useful here.";
        let rules = extract_rules(text);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].far, Some(1.75));
        assert_eq!(rules[1].ground_coverage, Some(60));
        assert_eq!(rules[1].setback, Some(6));
    }

    #[test]
    fn test_detect_city_first_match_wins() {
        assert_eq!(detect_city("Issued by BBMP for Bengaluru"), Some("bangalore"));
        assert_eq!(detect_city("Pune and Mumbai municipal rules"), Some("mumbai"));
        assert_eq!(detect_city("Zoning Resolution of NYC"), Some("new_york"));
        assert_eq!(detect_city("no city here"), None);
    }
}
