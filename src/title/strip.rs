use std::sync::{LazyLock, OnceLock};

use regex::{Captures, Regex};

use crate::vocabulary::{self, TagVocabulary};

// Hashtag run: from the first #word to the end of the title
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\s*#\w+.*$").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Bracket pairs emptied by tag removal: "( )", "[]"
static EMPTY_BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)|\[\s*\]|\{\s*\}").unwrap());

/// Characters that may open a tag: opening brackets and separators.
const LEAD_DELIMITERS: &str = r"(\[{|\-./•+";

/// Characters that may close a tag: closing brackets and separators.
const TRAIL_DELIMITERS: &str = r")\]}|\-./•+";

/// Removes decorative tags ("Official Video", "HD", "Lyrics", ...) from titles.
///
/// A tag is removed only when a bracket or separator sits in front of it and
/// another one (or the end of the title) follows it, so "Free Bird" survives
/// while "Song (Free)" and "Song - Free" lose the tag.
#[derive(Debug)]
pub struct TagStripper {
    tag_re: Option<Regex>,
}

impl TagStripper {
    pub fn new(vocab: &TagVocabulary) -> Self {
        if vocab.is_empty() {
            return TagStripper { tag_re: None };
        }
        let tag_re = Regex::new(&format!(
            r"(?i)\s*(?P<lead>[{LEAD_DELIMITERS}])\s*(?:{})\s*(?:(?P<trail>[{TRAIL_DELIMITERS}])\s*|$)",
            vocab.alternation()
        ));
        match tag_re {
            Ok(re) => TagStripper { tag_re: Some(re) },
            Err(e) => {
                // Custom patterns compile alone but can still clash here (e.g. group names)
                log::warn!("Tag vocabulary doesn't compile, tags won't be stripped: {e}");
                TagStripper { tag_re: None }
            }
        }
    }

    /// Strip tags and hashtags from a raw title. Idempotent; empty input is
    /// returned unchanged.
    pub fn strip(&self, raw_title: &str) -> String {
        if raw_title.is_empty() {
            return String::new();
        }

        // Removing one tag can expose another (or a hashtag), so run to a fixpoint
        let mut current = self.pass(raw_title);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, title: &str) -> String {
        let title = title.replace('–', "-");
        let title = HASHTAG_RE.replace(&title, "");

        let stripped = match &self.tag_re {
            Some(re) => re.replace_all(&title, |caps: &Captures| {
                let end = caps.get(0).map_or(0, |m| m.end());
                let lead = caps.name("lead").map_or("", |m| m.as_str());
                let trail = caps.name("trail").map_or("", |m| m.as_str());
                rejoin(lead, trail, title[end..].trim().is_empty())
            }),
            None => title.clone(),
        };
        let stripped = EMPTY_BRACKETS_RE.replace_all(&stripped, " ");

        WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
    }
}

/// What to put back in place of `lead tag trail` (whitespace after `trail`
/// included): whichever delimiter the surrounding text still needs. `at_end`
/// means nothing but whitespace follows.
fn rejoin(lead: &str, trail: &str, at_end: bool) -> String {
    let opens = matches!(lead, "(" | "[" | "{");
    let closes = matches!(trail, ")" | "]" | "}");
    match (opens, closes) {
        // "(HD)"
        (true, true) => " ".to_string(),
        // "(Remix - HD)" → "(Remix)"
        (false, true) => format!("{trail} "),
        // "Song | Lyrics |", "Song - HD"
        _ if at_end => String::new(),
        // "(HD - Lyrics)" → "(Lyrics)"
        (true, false) => format!(" {lead}"),
        // "Song - Lyrics - Remix" → "Song - Remix"
        (false, false) => format!(" {trail} "),
    }
}

static STRIPPER: OnceLock<TagStripper> = OnceLock::new();

/// Strip a title using the process-wide vocabulary.
pub fn strip(raw_title: &str) -> String {
    STRIPPER
        .get_or_init(|| TagStripper::new(vocabulary::vocabulary()))
        .strip(raw_title)
}
