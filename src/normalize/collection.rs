use std::collections::BTreeMap;

use crate::models::{
    CanonicalChannel, CanonicalPlaylist, CanonicalTrack, DEFAULT_RELEASE_YEAR, QualityTier,
    RawMetadata, non_empty,
};
use crate::select::resolve_channel_avatar;

use super::{UNKNOWN, normalize};

/// Name used when a playlist has no title.
pub const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";

/// Child ids in listing order, plus each child's raw entry keyed by id.
fn collect_entries(raw: &RawMetadata) -> (Vec<String>, BTreeMap<String, RawMetadata>) {
    let mut ids = Vec::new();
    let mut entries = BTreeMap::new();
    for (id, entry) in raw.identified_entries() {
        ids.push(id.to_string());
        entries.insert(id.to_string(), entry.clone());
    }
    (ids, entries)
}

fn owned(s: Option<&str>) -> Option<String> {
    non_empty(s).map(str::to_string)
}

/// Normalize a playlist listing. Null and id-less entries are skipped.
pub fn normalize_playlist(raw: &RawMetadata, id: &str) -> CanonicalPlaylist {
    let (track_ids, entries) = collect_entries(raw);

    let cover_url = owned(raw.thumbnail.as_deref()).or_else(|| {
        raw.identified_entries()
            .next()
            .and_then(|(_, first)| owned(first.thumbnail.as_deref()))
    });

    CanonicalPlaylist {
        id: id.to_string(),
        name: owned(raw.title.as_deref()).unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string()),
        creator: non_empty(raw.uploader.as_deref())
            .or_else(|| non_empty(raw.channel.as_deref()))
            .unwrap_or(UNKNOWN)
            .to_string(),
        creator_id: owned(raw.channel_id.as_deref()),
        track_ids,
        cover_url,
        description: owned(raw.description.as_deref()),
        release_year: DEFAULT_RELEASE_YEAR,
        entries,
    }
}

/// Normalize a channel listing. The avatar never falls back to a banner.
pub fn normalize_channel(raw: &RawMetadata, id: &str) -> CanonicalChannel {
    let (track_ids, entries) = collect_entries(raw);

    CanonicalChannel {
        id: id.to_string(),
        name: non_empty(raw.title.as_deref())
            .or_else(|| non_empty(raw.uploader.as_deref()))
            .unwrap_or(UNKNOWN)
            .to_string(),
        avatar_url: resolve_channel_avatar(raw),
        track_ids,
        entries,
    }
}

impl CanonicalPlaylist {
    /// Tracks from the stored entries, in playlist order.
    pub fn tracks(&self, tier: Option<QualityTier>) -> Vec<CanonicalTrack> {
        self.track_ids
            .iter()
            .map(|id| normalize(self.entries.get(id), tier, None))
            .collect()
    }
}

impl CanonicalChannel {
    /// Tracks from the stored entries. Flat channel listings usually omit the
    /// uploader, so the channel name stands in for it.
    pub fn tracks(&self, tier: Option<QualityTier>) -> Vec<CanonicalTrack> {
        self.track_ids
            .iter()
            .map(|id| normalize(self.entries.get(id), tier, Some(&self.name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Codec;

    fn raw(json: &str) -> RawMetadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_playlist_ids_in_order_skipping_nulls() {
        let r = raw(r#"{
            "title": "Road Trip",
            "uploader": "Someone",
            "channel_id": "UCabc",
            "description": "songs for the car",
            "entries": [
                {"id": "aaaaaaaaaaa", "title": "First"},
                null,
                {"title": "no id"},
                {"id": "bbbbbbbbbbb", "title": "Second"}
            ]
        }"#);
        let p = normalize_playlist(&r, "PL1");
        assert_eq!(p.id, "PL1");
        assert_eq!(p.name, "Road Trip");
        assert_eq!(p.creator, "Someone");
        assert_eq!(p.creator_id.as_deref(), Some("UCabc"));
        assert_eq!(p.track_ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
        assert_eq!(p.entries.len(), 2);
        assert_eq!(p.description.as_deref(), Some("songs for the car"));
        assert_eq!(p.release_year, DEFAULT_RELEASE_YEAR);
    }

    #[test]
    fn test_playlist_defaults() {
        let p = normalize_playlist(&RawMetadata::default(), "PL2");
        assert_eq!(p.name, UNKNOWN_PLAYLIST);
        assert_eq!(p.creator, UNKNOWN);
        assert!(p.track_ids.is_empty());
        assert!(p.cover_url.is_none());

        let p = normalize_playlist(&raw(r#"{"channel": "Chan"}"#), "PL3");
        assert_eq!(p.creator, "Chan");
    }

    #[test]
    fn test_playlist_cover_from_first_entry() {
        let r = raw(r#"{"entries": [
            null,
            {"id": "aaaaaaaaaaa", "thumbnail": "https://i.ytimg.com/a.jpg"},
            {"id": "bbbbbbbbbbb", "thumbnail": "https://i.ytimg.com/b.jpg"}
        ]}"#);
        assert_eq!(
            normalize_playlist(&r, "PL").cover_url.as_deref(),
            Some("https://i.ytimg.com/a.jpg")
        );

        let r = raw(r#"{"thumbnail": "https://i.ytimg.com/pl.jpg", "entries": [
            {"id": "aaaaaaaaaaa", "thumbnail": "https://i.ytimg.com/a.jpg"}
        ]}"#);
        assert_eq!(
            normalize_playlist(&r, "PL").cover_url.as_deref(),
            Some("https://i.ytimg.com/pl.jpg")
        );
    }

    #[test]
    fn test_playlist_tracks_use_stored_entries() {
        let r = raw(r#"{"entries": [
            {"id": "aaaaaaaaaaa", "title": "Band - One (Official Video)", "uploader": "Band"},
            {"id": "bbbbbbbbbbb", "title": "Two", "uploader": "Band - Topic"}
        ]}"#);
        let tracks = normalize_playlist(&r, "PL").tracks(Some(QualityTier::Low));
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "One");
        assert_eq!(tracks[0].artist, "Band");
        assert_eq!(tracks[1].artist, "Band");
        assert!(tracks.iter().all(|t| t.codec == Codec::Mp3));
    }

    #[test]
    fn test_channel_name_and_avatar() {
        let r = raw(r#"{
            "title": "Some Channel",
            "uploader": "Some Uploader",
            "thumbnails": [
                {"url": "https://yt3.googleusercontent.com/banner=s0", "width": 2560, "height": 1440},
                {"url": "https://yt3.googleusercontent.com/av=s176-c-k", "width": 176, "height": 176}
            ],
            "entries": [{"id": "aaaaaaaaaaa", "title": "A Song"}]
        }"#);
        let c = normalize_channel(&r, "UCxyz");
        assert_eq!(c.name, "Some Channel");
        assert_eq!(c.avatar_url.as_deref(), Some("https://yt3.googleusercontent.com/av=s176-c-k"));
        assert_eq!(c.track_ids, vec!["aaaaaaaaaaa"]);

        let c = normalize_channel(&raw(r#"{"uploader": "Up"}"#), "UCxyz");
        assert_eq!(c.name, "Up");
        assert!(c.avatar_url.is_none());
    }

    #[test]
    fn test_channel_tracks_fall_back_to_channel_name() {
        let r = raw(r#"{"title": "Band", "entries": [{"id": "aaaaaaaaaaa", "title": "Band - Hit"}]}"#);
        let tracks = normalize_channel(&r, "UCxyz").tracks(None);
        assert_eq!(tracks[0].artist, "Band");
        assert_eq!(tracks[0].title, "Hit");
    }
}
