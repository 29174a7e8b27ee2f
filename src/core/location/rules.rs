//! Ordered rules that turn a place's name and address into an area label.

use regex::Regex;
use std::sync::OnceLock;

/// Label used whenever no rule produces a usable area.
pub const DEFAULT_AREA: &str = "downtown";

const LANDMARK_NAME_MAX_CHARS: usize = 10;

/// One step of the area extraction table, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaRule {
    /// Transit station token; the "Station" word is dropped
    Station,
    /// District, neighborhood, "City" or "Center" compound, kept as written
    District,
    /// First comma segment of the address, house numbers removed
    AddressSegment,
    /// Short venue name used as a landmark when there is no address
    NameLandmark,
    /// Nothing matched
    Default,
}

impl AreaRule {
    pub const ORDER: [AreaRule; 5] = [
        AreaRule::Station,
        AreaRule::District,
        AreaRule::AddressSegment,
        AreaRule::NameLandmark,
        AreaRule::Default,
    ];

    /// Apply this rule alone. Token rules look at the name first, then the
    /// address.
    pub fn apply(&self, name: &str, address: &str) -> Option<String> {
        match self {
            AreaRule::Station => station_token(name).or_else(|| station_token(address)),
            AreaRule::District => district_token(name).or_else(|| district_token(address)),
            AreaRule::AddressSegment => decompose_address(address),
            AreaRule::NameLandmark => name_landmark(name, address),
            AreaRule::Default => Some(DEFAULT_AREA.to_string()),
        }
    }
}

/// Area label plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaMatch {
    pub rule: AreaRule,
    pub area: String,
}

/// Run the table; the first rule that yields a label wins.
pub fn classify_place(name: &str, address: &str) -> AreaMatch {
    AreaRule::ORDER
        .iter()
        .find_map(|rule| {
            rule.apply(name, address).map(|area| AreaMatch { rule: *rule, area })
        })
        .unwrap_or_else(|| AreaMatch {
            rule: AreaRule::Default,
            area: DEFAULT_AREA.to_string(),
        })
}

pub fn extract_area(name: &str, address: &str) -> String {
    classify_place(name, address).area
}

struct Patterns {
    station: Vec<Regex>,
    district: Vec<Regex>,
    station_word: Regex,
    leading_numbers: Regex,
    street_level: Vec<Regex>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("valid regex");
        Patterns {
            station: [
                r"([가-힣A-Za-z]+역)(?:앞|근처|[^가-힣]|$)",
                r"([\p{Han}\p{Hiragana}\p{Katakana}ー]+駅)",
                r"(?i)\b([A-Za-z][A-Za-z'-]*)\s+station\b",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            district: [
                r"([가-힣A-Za-z]+지구)",
                r"([가-힣]+동)(?:길|로|[^가-힣]|$)",
                r"([가-힣A-Za-z]+시티)",
                r"(?i)\b([A-Za-z]+\s+(?:district|quarter))\b",
                r"(?i)\b([A-Za-z]+\s+(?:city|center|centre))\b",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            station_word: compile(r"(?i)\s*station"),
            leading_numbers: compile(r"^(?:\d+(?:[-/]\d+)*(?:번지|번)?(?:[\s,]+|$))+"),
            street_level: [
                r"(?:로|길|번지)(?:[\s\d]|$)",
                r"(?i)\b(?:street|avenue|ave|road|rd|boulevard|blvd)\b",
            ]
            .into_iter()
            .map(compile)
            .collect(),
        }
    })
}

fn first_capture(regexes: &[Regex], text: &str) -> Option<String> {
    regexes.iter().find_map(|regex| {
        regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

fn station_token(text: &str) -> Option<String> {
    first_capture(&patterns().station, text)
}

fn district_token(text: &str) -> Option<String> {
    first_capture(&patterns().district, text)
}

fn is_station_word(word: &str) -> bool {
    word.contains('역') || word.contains('駅') || patterns().station_word.is_match(word)
}

fn is_district_word(word: &str) -> bool {
    word.contains("지구") || word.contains('동') || word.to_lowercase().contains("-dong")
}

fn decompose_address(address: &str) -> Option<String> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }

    let first_segment = address.split(',').next().unwrap_or(address).trim();
    let cleaned = patterns()
        .leading_numbers
        .replace(first_segment, "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Some(DEFAULT_AREA.to_string());
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let station = words
        .iter()
        .filter(|word| is_station_word(word))
        .map(|word| patterns().station_word.replace_all(word, "").trim().to_string())
        .find(|word| !word.is_empty());
    if station.is_some() {
        return station;
    }
    if let Some(word) = words.iter().find(|word| is_district_word(word)) {
        return Some(word.to_string());
    }
    if words.len() > 2 {
        return Some(words[words.len() - 2..].join(" "));
    }
    Some(cleaned)
}

fn name_landmark(name: &str, address: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty()
        || !address.trim().is_empty()
        || name.chars().count() > LANDMARK_NAME_MAX_CHARS
    {
        return None;
    }
    Some(format!("{name} nearby"))
}

/// Whether an address segment looks like a street rather than a city.
pub(crate) fn is_street_level(segment: &str) -> bool {
    patterns()
        .street_level
        .iter()
        .any(|regex| regex.is_match(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_rule() {
        assert_eq!(
            AreaRule::Station.apply("Shibuya Station Hachiko Exit", ""),
            Some("Shibuya".to_string())
        );
        assert_eq!(
            AreaRule::Station.apply("홍대입구역 9번 출구", ""),
            Some("홍대입구역".to_string())
        );
        assert_eq!(
            AreaRule::Station.apply("Ichiran", "京都駅前 8-1"),
            Some("京都駅".to_string())
        );
        // "지역" followed by more Hangul is part of a longer word
        assert_eq!(AreaRule::Station.apply("지역사회센터", ""), None);
    }

    #[test]
    fn test_district_rule() {
        assert_eq!(
            AreaRule::District.apply("Gion Geisha District Walk", ""),
            Some("Geisha District".to_string())
        );
        assert_eq!(
            AreaRule::District.apply("Blue Bottle", "성수동 2가 301"),
            Some("성수동".to_string())
        );
        assert_eq!(
            AreaRule::District.apply("Latin Quarter Bistro", ""),
            Some("Latin Quarter".to_string())
        );
        assert_eq!(AreaRule::District.apply("Louvre", "Rue de Rivoli"), None);
    }

    #[test]
    fn test_address_segment_rule() {
        assert_eq!(
            AreaRule::AddressSegment.apply("Eiffel Tower", "Champ de Mars, 5 Av. Anatole France, Paris"),
            Some("de Mars".to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "221-3 Hongdae, Mapo-gu, Seoul"),
            Some("Hongdae".to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "12, Itaewon-ro"),
            Some(DEFAULT_AREA.to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "1st Avenue"),
            Some("1st Avenue".to_string())
        );
        assert_eq!(AreaRule::AddressSegment.apply("x", "   "), None);
    }

    #[test]
    fn test_road_name_addresses() {
        assert_eq!(extract_area("쌈지길", "서울 종로구 인사동길 44"), "인사동");
        assert_eq!(extract_area("Blue Bottle", "서울 성동구 아차산로 7 성수역앞"), "성수역");
        assert_eq!(
            AreaRule::Station.apply("신촌역 근처 카페", ""),
            Some("신촌역".to_string())
        );
        // a gu name is not a neighborhood
        assert_eq!(AreaRule::District.apply("x", "서울 성동구 아차산로 7"), None);

        // words are matched on what they contain, not how they end
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "아차산로 7 성수역앞"),
            Some("성수역앞".to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "12 인사동길 44"),
            Some("인사동길".to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "京都駅前 8-1, Shimogyo Ward"),
            Some("京都駅前".to_string())
        );
        assert_eq!(
            AreaRule::AddressSegment.apply("x", "2 Exit ShinjukuStation Plaza"),
            Some("Shinjuku".to_string())
        );
    }

    #[test]
    fn test_name_landmark_rule() {
        assert_eq!(
            AreaRule::NameLandmark.apply("Tsukiji", ""),
            Some("Tsukiji nearby".to_string())
        );
        assert_eq!(AreaRule::NameLandmark.apply("Tsukiji Outer Market", ""), None);
        assert_eq!(AreaRule::NameLandmark.apply("Tsukiji", "Chuo City"), None);
    }

    #[test]
    fn test_rules_run_in_order() {
        // station beats district even when both appear
        let matched = classify_place("Gangnam Station", "Yeoksam-dong District");
        assert_eq!(matched.rule, AreaRule::Station);
        assert_eq!(matched.area, "Gangnam");

        let matched = classify_place("Kinkaku-ji", "");
        assert_eq!(matched.rule, AreaRule::NameLandmark);

        let matched = classify_place("A very long temple name indeed", "");
        assert_eq!(matched.rule, AreaRule::Default);
        assert_eq!(matched.area, DEFAULT_AREA);
    }

    #[test]
    fn test_street_level_segments() {
        assert!(is_street_level("세종대로 110"));
        assert!(is_street_level("Baker Street"));
        assert!(is_street_level("5th Ave"));
        assert!(!is_street_level("Seoul"));
        assert!(!is_street_level("로마"));
        assert!(!is_street_level("Paris"));
    }
}
