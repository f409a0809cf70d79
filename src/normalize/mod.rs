//! Raw metadata → canonical records.
//!
//! Nothing here fails: missing fields fall back to placeholders, an absent
//! record becomes a sentinel track carrying `error`.

pub mod collection;
pub mod search;

use chrono::NaiveDate;

use crate::models::{
    CanonicalTrack, Codec, DEFAULT_RELEASE_YEAR, DESCRIPTION_LIMIT, QualityTier, RawMetadata,
    non_empty,
};
use crate::select::{ThumbnailMode, select_thumbnail};
use crate::title;

pub use collection::{normalize_channel, normalize_playlist};
pub use search::shape_search_results;

/// Placeholder for missing titles and uploader names.
pub const UNKNOWN: &str = "Unknown";

/// Suffix of auto-generated artist channels ("Artist - Topic").
pub const TOPIC_SUFFIX: &str = " - Topic";

/// Error carried by the sentinel track.
pub const FETCH_FAILED: &str = "Failed to get video information";

fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Sentinel returned when a video's metadata could not be fetched.
pub fn unavailable_track(id: Option<&str>) -> CanonicalTrack {
    let id = non_empty(id);
    CanonicalTrack {
        id: id.map(str::to_string),
        title: UNKNOWN.to_string(),
        artist: UNKNOWN.to_string(),
        artist_id: None,
        release_year: DEFAULT_RELEASE_YEAR,
        release_date: None,
        cover_url: None,
        codec: Codec::Opus,
        duration: None,
        description: None,
        preview_url: id.map(watch_url),
        error: Some(FETCH_FAILED.to_string()),
    }
}

/// Parse `YYYYMMDD` or `YYYY...` into `(release_year, release_date)`.
///
/// The year comes from the first four characters; a full date is only
/// reported for eight characters that form a real calendar day. Anything
/// unparsable yields the default year and no date.
pub fn parse_upload_date(upload_date: Option<&str>) -> (i32, Option<String>) {
    let Some(s) = non_empty(upload_date) else {
        return (DEFAULT_RELEASE_YEAR, None);
    };

    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = s.get(range)?;
        if part.bytes().all(|b| b.is_ascii_digit()) { part.parse().ok() } else { None }
    };

    let Some(year) = digits(0..4) else {
        log::debug!("Unparsable upload date '{s}', using {DEFAULT_RELEASE_YEAR}");
        return (DEFAULT_RELEASE_YEAR, None);
    };
    // Four digits always fit
    let year = year as i32;

    if s.len() != 8 {
        return (year, None);
    }

    let date = digits(4..6)
        .zip(digits(6..8))
        .and_then(|(month, day)| NaiveDate::from_ymd_opt(year, month, day));
    match date {
        Some(d) => (year, Some(d.format("%Y-%m-%d").to_string())),
        None => {
            log::debug!("Invalid calendar date '{s}', keeping year {year}");
            (year, None)
        }
    }
}

/// Uploader name with the auto-generated " - Topic" suffix removed, falling
/// back to `channel_name_fallback` when nothing usable is left.
fn resolve_uploader(raw: &RawMetadata, channel_name_fallback: Option<&str>) -> String {
    let uploader = non_empty(raw.uploader.as_deref())
        .or_else(|| non_empty(raw.channel.as_deref()))
        .unwrap_or(UNKNOWN);
    let uploader = uploader.strip_suffix(TOPIC_SUFFIX).unwrap_or(uploader).trim();

    if uploader.is_empty() || uploader == UNKNOWN {
        return non_empty(channel_name_fallback).unwrap_or(UNKNOWN).to_string();
    }
    uploader.to_string()
}

/// Normalize one video's metadata into a canonical track.
///
/// `tier` picks the advertised codec (`None` for an unrecognized tier means
/// Opus). `channel_name_fallback` names the artist when the record itself
/// has no uploader, e.g. entries of a channel listing.
pub fn normalize(
    raw: Option<&RawMetadata>,
    tier: Option<QualityTier>,
    channel_name_fallback: Option<&str>,
) -> CanonicalTrack {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return unavailable_track(None);
    };

    let raw_title = non_empty(raw.title.as_deref()).unwrap_or(UNKNOWN);
    let cleaned = title::strip(raw_title);
    // A title made only of tags strips to nothing
    let cleaned = if cleaned.is_empty() { UNKNOWN.to_string() } else { cleaned };
    let uploader = resolve_uploader(raw, channel_name_fallback);
    let (artist, title) = title::split(&cleaned, &uploader);

    let (release_year, release_date) = parse_upload_date(raw.upload_date.as_deref());

    let cover_url = select_thumbnail(&raw.thumbnails, ThumbnailMode::Largest)
        .or_else(|| non_empty(raw.thumbnail.as_deref()).map(str::to_string));

    let description = non_empty(raw.description.as_deref())
        .map(|d| d.chars().take(DESCRIPTION_LIMIT).collect::<String>());

    let id = non_empty(raw.id.as_deref());

    CanonicalTrack {
        id: id.map(str::to_string),
        title,
        artist,
        artist_id: non_empty(raw.channel_id.as_deref()).map(str::to_string),
        release_year,
        release_date,
        cover_url,
        codec: tier.map_or(Codec::Opus, |t| t.codec()),
        duration: raw.duration,
        description,
        preview_url: id.map(watch_url),
        error: None,
    }
}
