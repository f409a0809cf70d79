//! Seam to the external fetch/download collaborator.
//!
//! The collaborator resolves ids to raw metadata, runs searches, and
//! materializes audio. Everything here is glue: the normalization itself
//! lives in [`crate::normalize`].

pub mod info_json;

use std::path::PathBuf;

use thiserror::Error;

use crate::locator::uploads_playlist_id;
use crate::models::{
    CanonicalChannel, CanonicalPlaylist, CanonicalTrack, Codec, QualityTier, RawMetadata,
    ResourceKind, SearchResult,
};
use crate::normalize::{
    normalize, normalize_channel, normalize_playlist, shape_search_results, unavailable_track,
};

pub use info_json::InfoJsonDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed metadata in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Invalid resource id '{0}'")]
    InvalidId(String),
}

/// Resolves ids and queries to raw metadata.
pub trait MetadataSource {
    /// Raw metadata for one resource; `Ok(None)` when it doesn't exist.
    fn resolve(&self, kind: ResourceKind, id: &str) -> Result<Option<RawMetadata>, SourceError>;

    /// Raw search entries. Channel searches may return videos; the caller
    /// reduces them to their channels.
    fn search(
        &self,
        query: &str,
        kind: ResourceKind,
        limit: usize,
    ) -> Result<Vec<RawMetadata>, SourceError>;
}

/// Materializes audio locally. Implementations should request
/// [`Codec::format_selector`] so the delivered stream matches the codec the
/// track advertises.
pub trait AudioDownloader {
    fn download(&self, id: &str, codec: Codec) -> Result<Option<PathBuf>, SourceError>;
}

/// Resolve and normalize one video. A missing video yields the sentinel track.
pub fn fetch_track(
    source: &dyn MetadataSource,
    id: &str,
    tier: Option<QualityTier>,
) -> Result<CanonicalTrack, SourceError> {
    let Some(mut raw) = source.resolve(ResourceKind::Video, id)?.filter(|r| !r.is_empty()) else {
        log::warn!("No metadata for video {id}");
        return Ok(unavailable_track(Some(id)));
    };

    raw.id.get_or_insert_with(|| id.to_string());
    Ok(normalize(Some(&raw), tier, None))
}

/// Resolve and normalize a playlist. A channel id is tried as its uploads
/// playlist first.
pub fn fetch_playlist(
    source: &dyn MetadataSource,
    id: &str,
) -> Result<Option<CanonicalPlaylist>, SourceError> {
    if let Some(uploads) = uploads_playlist_id(id) {
        if let Some(raw) = source.resolve(ResourceKind::Playlist, &uploads)? {
            log::debug!("Using uploads playlist {uploads} for channel {id}");
            return Ok(Some(normalize_playlist(&raw, &uploads)));
        }
    }

    Ok(source
        .resolve(ResourceKind::Playlist, id)?
        .map(|raw| normalize_playlist(&raw, id)))
}

/// Resolve and normalize a channel.
pub fn fetch_channel(
    source: &dyn MetadataSource,
    id: &str,
) -> Result<Option<CanonicalChannel>, SourceError> {
    Ok(source
        .resolve(ResourceKind::Channel, id)?
        .map(|raw| normalize_channel(&raw, id)))
}

/// Run a search and shape the listing.
pub fn search(
    source: &dyn MetadataSource,
    query: &str,
    kind: ResourceKind,
    limit: usize,
) -> Result<Vec<SearchResult>, SourceError> {
    // Several hits usually share a channel, so ask for more before deduplicating
    let fetch_limit = match kind {
        ResourceKind::Channel => limit.saturating_mul(2),
        _ => limit,
    };
    let entries = source.search(query, kind, fetch_limit)?;
    Ok(shape_search_results(&entries, kind, limit))
}

/// Download a track's audio in its advertised codec. Returns the file and
/// the codec actually delivered, judged by the file extension.
pub fn download_track(
    downloader: &dyn AudioDownloader,
    track: &CanonicalTrack,
) -> Result<Option<(PathBuf, Codec)>, SourceError> {
    let Some(id) = track.id.as_deref() else {
        return Err(SourceError::InvalidId(String::new()));
    };
    let Some(path) = downloader.download(id, track.codec)? else {
        return Ok(None);
    };

    let delivered = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(Codec::Opus, Codec::from_extension);
    if delivered != track.codec {
        log::warn!("Requested {} for {id} but got {delivered}", track.codec);
    }
    Ok(Some((path, delivered)))
}
