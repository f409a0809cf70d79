use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Conceptual grouping of decorative tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagGroup {
    /// "Official Video", "Visualizer", "M/V"
    Video,
    /// "Official Audio", "Audio Only"
    Audio,
    /// "HD", "4K Remaster", "1080P"
    Quality,
    /// "Lyrics", "Explicit", "OUT NOW"
    Content,
}

impl TagGroup {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Quality => "quality",
            Self::Content => "content",
        }
    }
}

/// How a tag is matched. Phrases are literal text; patterns are regex fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum TagPattern {
    Phrase(String),
    Pattern(String),
}

impl TagPattern {
    /// Regex fragment for this tag, ready to drop into an alternation.
    pub fn regex_fragment(&self) -> String {
        match self {
            Self::Phrase(p) => regex::escape(p),
            Self::Pattern(p) => p.clone(),
        }
    }

    fn key(&self) -> String {
        match self {
            Self::Phrase(p) | Self::Pattern(p) => p.to_lowercase(),
        }
    }
}

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TagEntry {
    pub pattern: TagPattern,
    pub group: TagGroup,
}

/// Ordered set of decorative tags stripped from titles. Order matters: earlier
/// entries win when two alternatives match at the same position.
#[derive(Debug)]
pub struct TagVocabulary {
    entries: Vec<TagEntry>,
}

/// Config file tag definition (deserialized from TOML).
#[derive(Debug, Deserialize, Clone)]
pub struct CustomTagConfig {
    pub phrase: String,
    #[serde(default)]
    pub group: Option<TagGroup>,
    /// Treat `phrase` as a regex fragment instead of literal text.
    #[serde(default)]
    pub pattern: bool,
}

static VOCABULARY: OnceLock<TagVocabulary> = OnceLock::new();

/// Initialize the global vocabulary with custom tags. Call once at startup,
/// before the first title is stripped.
pub fn init(custom_tags: &[CustomTagConfig]) {
    if VOCABULARY.set(TagVocabulary::new(custom_tags)).is_err() {
        log::warn!("Tag vocabulary already initialized, ignoring {} custom tags", custom_tags.len());
    }
}

/// Get the global vocabulary, falling back to the built-in table.
pub fn vocabulary() -> &'static TagVocabulary {
    VOCABULARY.get_or_init(|| TagVocabulary::new(&[]))
}

impl TagVocabulary {
    pub fn new(custom_tags: &[CustomTagConfig]) -> Self {
        let mut entries = builtin_tags();

        for custom in custom_tags {
            let pattern = if custom.pattern {
                if let Err(e) = Regex::new(&custom.phrase) {
                    log::warn!("Skipping invalid tag pattern '{}': {}", custom.phrase, e);
                    continue;
                }
                TagPattern::Pattern(custom.phrase.clone())
            } else {
                TagPattern::Phrase(custom.phrase.clone())
            };

            if custom.phrase.trim().is_empty() {
                continue;
            }

            // Additive merge: matching is case-insensitive, so skip case variants
            let key = pattern.key();
            if entries.iter().any(|e| e.pattern.key() == key) {
                log::debug!("Tag '{}' already in vocabulary", custom.phrase);
                continue;
            }

            entries.push(TagEntry {
                pattern,
                group: custom.group.unwrap_or(TagGroup::Content),
            });
        }

        TagVocabulary { entries }
    }

    /// A vocabulary with no tags at all.
    pub fn empty() -> Self {
        TagVocabulary { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries belonging to one group, in vocabulary order.
    pub fn group(&self, group: TagGroup) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter().filter(move |e| e.group == group)
    }

    /// The whole vocabulary as one alternation, in order.
    pub fn alternation(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.pattern.regex_fragment())
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn phrases(group: TagGroup, list: &[&str]) -> Vec<TagEntry> {
    list.iter()
        .map(|p| TagEntry {
            pattern: TagPattern::Phrase((*p).to_string()),
            group,
        })
        .collect()
}

/// Built-in tag table. Case variants are folded since matching ignores case.
fn builtin_tags() -> Vec<TagEntry> {
    let mut tags = phrases(
        TagGroup::Video,
        &[
            "Official Video",
            "Official Music Video",
            "Official Lyric Video",
            "Music Video",
            "Lyric Video",
            "Video Oficial",
            "Videoclip Oficial",
            "Official",
            "Video",
            "Pseudo Video",
            "Visualizer",
            "Official HD Video",
            "Official 4K Video",
            "Premiere",
            "Visualizer Video",
            "Official CantoYo Video",
            "Official Video HD",
            "Official Trailer",
            "M/V",
            "Cover Audio Video",
            "Remastered Video",
            "Acoustic Video",
            "Offical Video",
            "Visualiser",
            "Animated Lyric Video",
            "Official Video Remastered HD",
            "Lyrics / Lyric Video",
            "Official Live Video",
            "Official Classic Version",
            "Animated Video",
            "Official Video 2016",
            "Official Video 2021",
            "Official Video HQ",
            "Official Music Vidéo",
            "VIDEO OFFICIAL",
            "Official Vedio",
            "**OFFICIAL VIDEO**",
            "Pop-up Video",
        ],
    );

    tags.extend(phrases(
        TagGroup::Audio,
        &[
            "Audio",
            "Official Audio",
            "Audio Stream",
            "Official Full Stream",
            "Cover Art",
            "Audio Only",
            "Audio Officiel",
            "Audio Oficial",
        ],
    ));

    tags.extend(phrases(TagGroup::Quality, &["HD", "4K Remaster"]));
    tags.push(TagEntry {
        pattern: TagPattern::Pattern(r"Remastered \d+".to_string()),
        group: TagGroup::Quality,
    });
    tags.extend(phrases(
        TagGroup::Quality,
        &[
            "Full HD Remastered",
            "Best Quality",
            "Ultra High Quality",
            "60fps",
            "98 BPM_G major",
            "Stereo",
            "HQ + Lyrics",
            "HQ",
            "HQ Remaster",
            "wmv",
            "30sec",
            "720P",
            "1080P",
            "flv",
            "mov",
            "Full Version HD",
            "in 4K",
            "HQ HD Dirty",
            "HD Widescreen Music Video",
        ],
    ));

    tags.extend(phrases(
        TagGroup::Content,
        &[
            "Explicit",
            "UNCENSORED",
            "Lyrics",
            "Free",
            "w/ Lyrics",
            "Ultra Music",
            "Spinnin Records",
            "OUT NOW",
            "OUT NOW!",
            "YHLQMDLG",
            "TopPop",
            "LYRICS!!",
            "Ringtone Download",
            "New Single",
            "English",
            "FREE DOWNLOAD",
            "with lyrics",
            "with download link",
            "DOWNLOAD AVAILABLE!",
            "Original",
            "Full Length",
            "FULL",
            "Lyrics Video",
            "CDQ",
            "New/CDQ/Dirty",
            "on ITUNES NOW",
            "Original Radio",
            "DVD Cut",
            "Lyriclizer",
            "Official Version",
            "WSHH Exclusive",
            "WSHH Premiere",
            "CLIPE OFICIAL",
            "non-official recut",
            "Dirty",
            "Videoclip",
        ],
    ));

    tags
}
