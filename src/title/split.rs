use regex::Regex;
use std::sync::LazyLock;

// "Artist - Title", "Artist : Title", "Artist – Title"; the artist side is the
// shortest prefix that reaches a whitespace-padded separator.
static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<artist>.+?)\s+[-:–]\s+(?P<title>.+)$").unwrap());

/// Split a cleaned title into `(artist, title)`.
///
/// The split is only trusted when the left side and the uploader name contain
/// one another as whole name tokens (case-insensitive, see `name_tokens`);
/// otherwise the uploader is the artist and the title is kept whole.
/// "Anne-Marie - Alarm" by "Anne-Marie" and "Adele - Hello" by "AdeleVEVO"
/// split, "Review - Some Product" by "TechReviewer" doesn't.
pub fn split(cleaned_title: &str, uploader: &str) -> (String, String) {
    let fallback = || (uploader.to_string(), cleaned_title.to_string());

    let Some(caps) = SPLIT_RE.captures(cleaned_title) else {
        return fallback();
    };

    let artist = caps["artist"].trim();
    let title = caps["title"].trim();
    if artist.is_empty() || title.is_empty() {
        return fallback();
    }

    let artist_tokens = name_tokens(artist);
    let uploader_tokens = name_tokens(uploader);
    if contains_run(&uploader_tokens, &artist_tokens)
        || contains_run(&artist_tokens, &uploader_tokens)
    {
        (artist.to_string(), title.to_string())
    } else {
        log::debug!("Not splitting '{cleaned_title}': '{artist}' doesn't match uploader '{uploader}'");
        fallback()
    }
}

/// Lowercased words of a name. Words break at anything that isn't a letter or
/// digit and at camel-case humps: "AdeleVEVO" → `adele vevo`, "TechReviewer" →
/// `tech reviewer`, "ADELE" → `adele`.
fn name_tokens(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            // "eV" in "AdeleVEVO", or "OA" before "Adele" in "VEVOAdele"
            let hump = prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase));
            if hump {
                tokens.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// True when `needle` appears as a contiguous run in `haystack`. An empty
/// needle is always found.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, t: &str) -> (String, String) {
        (a.to_string(), t.to_string())
    }

    #[test]
    fn test_hyphenated_artist() {
        // Minimal left span stops at the first padded separator, not the inner hyphen
        assert_eq!(split("Anne-Marie - Alarm", "Anne-Marie"), pair("Anne-Marie", "Alarm"));
    }

    #[test]
    fn test_unrelated_prefix_rejected() {
        assert_eq!(
            split("Review - Some Product", "TechReviewer"),
            pair("TechReviewer", "Review - Some Product")
        );
    }

    #[test]
    fn test_partial_word_match_rejected() {
        assert_eq!(split("Art - Piece", "Artist"), pair("Artist", "Art - Piece"));
        assert_eq!(split("Tech - Talk", "TechReviewer"), pair("Tech", "Talk"));
    }

    #[test]
    fn test_camel_case_uploader() {
        assert_eq!(
            split("Rick Astley - Never Gonna Give You Up", "RickAstleyVEVO"),
            pair("Rick Astley", "Never Gonna Give You Up")
        );
        assert_eq!(split("Adele - Hello", "VEVOAdele"), pair("Adele", "Hello"));
    }

    #[test]
    fn test_name_tokens() {
        assert_eq!(name_tokens("AdeleVEVO"), vec!["adele", "vevo"]);
        assert_eq!(name_tokens("TechReviewer"), vec!["tech", "reviewer"]);
        assert_eq!(name_tokens("ADELE"), vec!["adele"]);
        assert_eq!(name_tokens("Anne-Marie"), vec!["anne", "marie"]);
        assert_eq!(name_tokens("Queen & David Bowie"), vec!["queen", "david", "bowie"]);
        assert!(name_tokens(" & ").is_empty());
    }

    #[test]
    fn test_uploader_contains_left() {
        assert_eq!(split("Adele - Hello", "AdeleVEVO"), pair("Adele", "Hello"));
    }

    #[test]
    fn test_left_contains_uploader() {
        assert_eq!(
            split("Queen & David Bowie - Under Pressure", "Queen"),
            pair("Queen & David Bowie", "Under Pressure")
        );
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(split("ADELE - Hello", "adele"), pair("ADELE", "Hello"));
    }

    #[test]
    fn test_colon_and_en_dash_separators() {
        assert_eq!(split("Muse : Uprising", "Muse"), pair("Muse", "Uprising"));
        assert_eq!(split("Muse – Uprising", "Muse"), pair("Muse", "Uprising"));
    }

    #[test]
    fn test_separator_needs_whitespace() {
        assert_eq!(split("Jay-Z", "Jay-Z"), pair("Jay-Z", "Jay-Z"));
        assert_eq!(split("AC/DC: Thunderstruck", "AC/DC"), pair("AC/DC", "AC/DC: Thunderstruck"));
    }

    #[test]
    fn test_first_separator_wins() {
        assert_eq!(
            split("Artist - Song - Live", "Artist"),
            pair("Artist", "Song - Live")
        );
    }

    #[test]
    fn test_no_separator() {
        assert_eq!(split("Just A Song", "Someone"), pair("Someone", "Just A Song"));
    }

    #[test]
    fn test_empty_uploader_always_accepts() {
        assert_eq!(split("Anyone - Anything", ""), pair("Anyone", "Anything"));
    }

    #[test]
    fn test_blank_left_side_rejected() {
        assert_eq!(split("  - Song", ""), pair("", "  - Song"));
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(split("", "Uploader"), pair("Uploader", ""));
    }
}
