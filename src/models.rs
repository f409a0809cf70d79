use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder year used when an upload date is missing or unparsable.
pub const DEFAULT_RELEASE_YEAR: i32 = 2024;

/// Maximum description length (in characters) carried into a canonical track.
pub const DESCRIPTION_LIMIT: usize = 500;

/// Treat an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata as delivered by the fetch collaborator (yt-dlp info JSON shape).
/// Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub channel_id: Option<String>,
    pub duration: Option<f64>,
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnails: Vec<RawThumbnail>,
    pub channel_thumbnail: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub formats: Vec<RawFormat>,
    /// Children of a playlist or channel. Unavailable entries come through as `null`.
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<Option<RawMetadata>>,
    pub url: Option<String>,
    pub playlist_count: Option<u64>,
    pub n_entries: Option<u64>,
}

impl RawMetadata {
    /// True when no field carries any data (an empty record from the collaborator).
    pub fn is_empty(&self) -> bool {
        *self == RawMetadata::default()
    }

    /// Non-null children that carry an id, in playlist order.
    pub fn identified_entries(&self) -> impl Iterator<Item = (&str, &RawMetadata)> {
        self.entries
            .iter()
            .flatten()
            .filter_map(|e| non_empty(e.id.as_deref()).map(|id| (id, e)))
    }
}

/// One thumbnail candidate. Dimensions are often missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawThumbnail {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RawThumbnail {
    pub fn area(&self) -> u64 {
        u64::from(self.width.unwrap_or(0)) * u64::from(self.height.unwrap_or(0))
    }
}

/// One stream format descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFormat {
    pub format_id: Option<String>,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
    /// Audio bitrate in kbps.
    pub abr: Option<f64>,
    /// Total bitrate in kbps.
    pub tbr: Option<f64>,
    pub url: Option<String>,
    pub ext: Option<String>,
}

impl RawFormat {
    /// Audio-only: no video stream, and an audio codec that isn't "none".
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
            && self.acodec.as_deref().is_some_and(|a| a != "none")
    }

    /// Effective bitrate: `abr`, then `tbr`, then 0.
    pub fn bitrate(&self) -> f64 {
        self.abr
            .filter(|b| *b > 0.0)
            .or(self.tbr.filter(|b| *b > 0.0))
            .unwrap_or(0.0)
    }
}

/// Audio codec families a canonical track can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Opus,
    Aac,
    Mp3,
    Vorbis,
}

impl Codec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Mp3 => "mp3",
            Self::Vorbis => "vorbis",
        }
    }

    /// Codec actually delivered, judged by the downloaded file's extension.
    /// Unknown extensions are reported as Opus.
    pub fn from_extension(ext: &str) -> Codec {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "opus" | "webm" => Self::Opus,
            "mp3" => Self::Mp3,
            "m4a" | "aac" => Self::Aac,
            "ogg" => Self::Vorbis,
            _ => Self::Opus,
        }
    }

    /// Format selector handed to the download collaborator so the delivered
    /// stream agrees with the advertised codec.
    pub fn format_selector(&self) -> &'static str {
        match self {
            Self::Opus => {
                "bestaudio[acodec=opus]/bestaudio[acodec=aac]/bestaudio[acodec=mp3]/bestaudio/best"
            }
            Self::Mp3 => {
                "bestaudio[acodec=mp3]/bestaudio[acodec=opus]/bestaudio[acodec=aac]/bestaudio/best"
            }
            Self::Aac => {
                "bestaudio[acodec=aac]/bestaudio[acodec=opus]/bestaudio[acodec=mp3]/bestaudio/best"
            }
            Self::Vorbis => "bestaudio/best",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied quality preference, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Hifi,
    Lossless,
    High,
    Medium,
    Low,
    Minimum,
}

impl QualityTier {
    /// Target codec family: two high tiers → Opus, two mid → AAC, two low → MP3.
    pub fn codec(&self) -> Codec {
        match self {
            Self::Hifi | Self::Lossless => Codec::Opus,
            Self::High | Self::Medium => Codec::Aac,
            Self::Low | Self::Minimum => Codec::Mp3,
        }
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hifi" => Ok(Self::Hifi),
            "lossless" => Ok(Self::Lossless),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "minimum" => Ok(Self::Minimum),
            other => Err(format!("unknown quality tier '{other}'")),
        }
    }
}

/// What a locator or record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Playlist,
    Channel,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Playlist => "playlist",
            Self::Channel => "channel",
        }
    }
}

/// Normalized track record handed to the host application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTrack {
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub artist_id: Option<String>,
    pub release_year: i32,
    /// ISO 8601 date (YYYY-MM-DD).
    pub release_date: Option<String>,
    pub cover_url: Option<String>,
    pub codec: Codec,
    /// Seconds.
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    /// Set on the sentinel record returned when metadata could not be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized playlist record. `entries` keeps each child's raw metadata so
/// tracks can be normalized later without another fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPlaylist {
    pub id: String,
    pub name: String,
    pub creator: String,
    pub creator_id: Option<String>,
    pub track_ids: Vec<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
    pub release_year: i32,
    #[serde(skip)]
    pub entries: BTreeMap<String, RawMetadata>,
}

/// Normalized channel record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalChannel {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub track_ids: Vec<String>,
    #[serde(skip)]
    pub entries: BTreeMap<String, RawMetadata>,
}

/// One row of a search listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub kind: ResourceKind,
    pub name: String,
    pub artists: Vec<String>,
    pub duration: Option<f64>,
    pub year: Option<String>,
    pub additional: Option<String>,
    pub image_url: Option<String>,
}

/// `Some(s)` only for present, non-empty strings.
pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
