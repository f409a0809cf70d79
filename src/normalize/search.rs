use std::collections::HashSet;

use crate::models::{RawMetadata, ResourceKind, SearchResult, non_empty};
use crate::select::search_thumbnail;

use super::UNKNOWN;

fn track_count_label(count: u64) -> String {
    if count == 1 { "1 track".to_string() } else { format!("{count} tracks") }
}

fn year_of(upload_date: Option<&str>) -> Option<String> {
    non_empty(upload_date).and_then(|d| d.get(..4)).map(str::to_string)
}

/// Shape raw search entries into listing rows.
///
/// Channel searches return videos, so rows are built from each video's
/// channel and deduplicated by `channel_id`. Playlists that report zero
/// entries are dropped; a missing count is kept. At most `limit` rows.
pub fn shape_search_results(
    entries: &[RawMetadata],
    kind: ResourceKind,
    limit: usize,
) -> Vec<SearchResult> {
    match kind {
        ResourceKind::Channel => channel_rows(entries, limit),
        ResourceKind::Video | ResourceKind::Playlist => entries
            .iter()
            .filter_map(|entry| listing_row(entry, kind))
            .take(limit)
            .collect(),
    }
}

fn channel_rows(entries: &[RawMetadata], limit: usize) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for entry in entries {
        if rows.len() >= limit {
            break;
        }
        let Some(channel_id) = non_empty(entry.channel_id.as_deref()) else {
            continue;
        };
        if !seen.insert(channel_id) {
            continue;
        }
        let channel_name = non_empty(entry.channel.as_deref())
            .or_else(|| non_empty(entry.uploader.as_deref()))
            .unwrap_or(UNKNOWN);

        rows.push(SearchResult {
            id: channel_id.to_string(),
            kind: ResourceKind::Channel,
            // Channel rows show the name in the artist column only
            name: String::new(),
            artists: vec![channel_name.to_string()],
            duration: None,
            year: None,
            additional: None,
            image_url: search_thumbnail(entry, ResourceKind::Channel),
        });
    }

    rows
}

fn listing_row(entry: &RawMetadata, kind: ResourceKind) -> Option<SearchResult> {
    let id = non_empty(entry.id.as_deref())?;

    let count = entry.playlist_count.or(entry.n_entries);
    if kind == ResourceKind::Playlist && count == Some(0) {
        log::debug!("Skipping empty playlist {id}");
        return None;
    }

    let owner = non_empty(entry.uploader.as_deref())
        .or_else(|| non_empty(entry.channel.as_deref()))
        .or_else(|| non_empty(entry.title.as_deref()));
    let artists = match (kind, owner) {
        // Flat playlist results rarely name their owner; show nothing rather than "Unknown"
        (ResourceKind::Playlist, None) => Vec::new(),
        (ResourceKind::Playlist, Some(name)) if name.trim() == UNKNOWN => Vec::new(),
        (_, name) => vec![name.unwrap_or(UNKNOWN).to_string()],
    };

    Some(SearchResult {
        id: id.to_string(),
        kind,
        name: non_empty(entry.title.as_deref()).unwrap_or(UNKNOWN).to_string(),
        artists,
        duration: entry.duration,
        year: year_of(entry.upload_date.as_deref()),
        additional: match kind {
            ResourceKind::Playlist => count.map(track_count_label),
            _ => None,
        },
        image_url: search_thumbnail(entry, kind),
    })
}
