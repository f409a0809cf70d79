use regex::Regex;
use std::sync::LazyLock;

use crate::models::{RawMetadata, RawThumbnail, ResourceKind, non_empty};

/// Explicit avatar size: `=s48`, `=s176`, ...
static AVATAR_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=s[1-9]\d*").unwrap());

/// Full-size marker `=s0` (channel banners), boundary-matched so `=s00x` isn't caught.
static BANNER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=s0(?:-|\?|/|$)").unwrap());

/// Max `|w - h|` for an avatar to count as square.
const AVATAR_SQUARE_TOLERANCE: u32 = 24;
/// Max side for an avatar; larger images are banners or artwork.
const AVATAR_MAX_SIDE: u32 = 400;
/// Squareness tolerance used when picking channel art out of search results.
const SEARCH_SQUARE_TOLERANCE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailMode {
    /// Highest resolution wins.
    Largest,
    /// Only size-tokened avatar URLs; never a banner.
    AvatarOnly,
}

/// True when the URL carries an explicit avatar size and no banner marker.
pub fn is_avatar_url(url: &str) -> bool {
    !BANNER_RE.is_match(url) && AVATAR_SIZE_RE.is_match(url)
}

/// Pass the URL through only if it is avatar-shaped.
pub fn avatar_only(url: Option<&str>) -> Option<&str> {
    non_empty(url).filter(|u| is_avatar_url(u))
}

fn url_of(t: &RawThumbnail) -> Option<&str> {
    non_empty(t.url.as_deref())
}

fn near_square(t: &RawThumbnail, tolerance: u32) -> bool {
    t.width.unwrap_or(0).abs_diff(t.height.unwrap_or(0)) <= tolerance
}

/// Largest-area candidate; `rev()` because `max_by_key` keeps the last maximum
/// and ties must go to the earliest entry.
fn largest<'a>(candidates: impl DoubleEndedIterator<Item = &'a RawThumbnail>) -> Option<&'a RawThumbnail> {
    candidates.rev().max_by_key(|t| t.area())
}

/// Pick one thumbnail URL out of a candidate list.
pub fn select_thumbnail(candidates: &[RawThumbnail], mode: ThumbnailMode) -> Option<String> {
    let with_url = || candidates.iter().filter(|t| url_of(t).is_some());

    let chosen = match mode {
        ThumbnailMode::Largest => largest(with_url()),
        ThumbnailMode::AvatarOnly => {
            let eligible: Vec<&RawThumbnail> =
                with_url().filter(|t| url_of(t).is_some_and(is_avatar_url)).collect();
            largest(eligible.iter().copied().filter(|t| {
                near_square(t, AVATAR_SQUARE_TOLERANCE)
                    && t.width.unwrap_or(0) <= AVATAR_MAX_SIDE
                    && t.height.unwrap_or(0) <= AVATAR_MAX_SIDE
            }))
            .or_else(|| eligible.first().copied())
        }
    };

    chosen.and_then(url_of).map(str::to_string)
}

/// Channel avatar from a channel record. Every step is guarded, so a banner
/// is never returned even when it is the only image on offer.
pub fn resolve_channel_avatar(raw: &RawMetadata) -> Option<String> {
    if let Some(url) = avatar_only(raw.channel_thumbnail.as_deref()) {
        return Some(url.to_string());
    }
    if let Some(url) = select_thumbnail(&raw.thumbnails, ThumbnailMode::AvatarOnly) {
        return Some(url);
    }
    if let Some(url) = avatar_only(raw.thumbnail.as_deref()) {
        return Some(url.to_string());
    }
    raw.thumbnails
        .iter()
        .find_map(|t| avatar_only(t.url.as_deref()))
        .map(str::to_string)
}

/// Image for one search listing row.
///
/// Channel rows carry the thumbnails of a matching video, so they look for
/// channel art instead: `channel_thumbnail`, then the largest near-square
/// dimensioned thumbnail. Other rows use `thumbnail`, the largest thumbnail,
/// `channel_thumbnail`, and for videos the standard hqdefault still.
pub fn search_thumbnail(entry: &RawMetadata, kind: ResourceKind) -> Option<String> {
    if kind == ResourceKind::Channel {
        if let Some(url) = non_empty(entry.channel_thumbnail.as_deref()) {
            return Some(url.to_string());
        }
        let square = entry.thumbnails.iter().filter(|t| {
            url_of(t).is_some()
                && t.width.unwrap_or(0) > 0
                && t.height.unwrap_or(0) > 0
                && near_square(t, SEARCH_SQUARE_TOLERANCE)
        });
        return largest(square).and_then(url_of).map(str::to_string);
    }

    non_empty(entry.thumbnail.as_deref())
        .map(str::to_string)
        .or_else(|| select_thumbnail(&entry.thumbnails, ThumbnailMode::Largest))
        .or_else(|| non_empty(entry.channel_thumbnail.as_deref()).map(str::to_string))
        .or_else(|| match (kind, non_empty(entry.id.as_deref())) {
            (ResourceKind::Video, Some(id)) => Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
            _ => None,
        })
}
