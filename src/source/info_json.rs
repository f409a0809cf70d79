use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{MetadataSource, SourceError};
use crate::models::{RawMetadata, ResourceKind, non_empty};
use crate::warnings;

const SUFFIX: &str = ".info.json";

/// A [`MetadataSource`] over a directory of `<id>.info.json` files, as
/// written by `yt-dlp --write-info-json -o '%(id)s'`.
#[derive(Debug, Clone)]
pub struct InfoJsonDir {
    root: PathBuf,
}

/// Infer what a stored record describes: no children → video; a listing
/// whose id is its own channel id → channel; any other listing → playlist.
pub fn kind_of(raw: &RawMetadata) -> ResourceKind {
    let is_listing =
        !raw.entries.is_empty() || raw.playlist_count.is_some() || raw.n_entries.is_some();
    if !is_listing {
        return ResourceKind::Video;
    }
    match (non_empty(raw.id.as_deref()), non_empty(raw.channel_id.as_deref())) {
        (Some(id), Some(channel_id)) if id == channel_id => ResourceKind::Channel,
        _ => ResourceKind::Playlist,
    }
}

fn matches_query(raw: &RawMetadata, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    [&raw.title, &raw.uploader, &raw.channel]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query))
}

impl InfoJsonDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        InfoJsonDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, SourceError> {
        let bad = id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']);
        if bad {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}{SUFFIX}")))
    }

    fn parse(path: &Path, text: &str) -> Result<RawMetadata, SourceError> {
        serde_json::from_str(text).map_err(|source| SourceError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load one record by id. A missing file is `Ok(None)`.
    pub fn load(&self, id: &str) -> Result<Option<RawMetadata>, SourceError> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&path, &text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No info JSON at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every readable record in the directory, ordered by file name.
    /// Malformed files are skipped with a warning.
    pub fn records(&self) -> Result<Vec<RawMetadata>, SourceError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SUFFIX))
            })
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let parsed = fs::read_to_string(&path)
                .map_err(SourceError::from)
                .and_then(|text| Self::parse(&path, &text));
            match parsed {
                Ok(raw) => records.push(raw),
                // Rescanned on every search; report each bad file once
                Err(e) => {
                    warnings::global().warning(&format!("Skipping {}: {}", path.display(), e));
                }
            }
        }
        Ok(records)
    }
}

impl MetadataSource for InfoJsonDir {
    fn resolve(&self, kind: ResourceKind, id: &str) -> Result<Option<RawMetadata>, SourceError> {
        let Some(raw) = self.load(id)? else {
            return Ok(None);
        };
        let found = kind_of(&raw);
        if found != kind {
            log::debug!("{id} is a {}, not a {}", found.name(), kind.name());
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn search(
        &self,
        query: &str,
        kind: ResourceKind,
        limit: usize,
    ) -> Result<Vec<RawMetadata>, SourceError> {
        let query = query.trim().to_lowercase();
        Ok(self
            .records()?
            .into_iter()
            .filter(|raw| match kind {
                // Channel hits come from videos too; shaping reduces them to channels
                ResourceKind::Channel => kind_of(raw) != ResourceKind::Playlist,
                _ => kind_of(raw) == kind,
            })
            .filter(|raw| matches_query(raw, &query))
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        fs::write(dir.path().join(name), body).unwrap();
    }

    fn fixture() -> (TempDir, InfoJsonDir) {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp,
            "aaaaaaaaaaa.info.json",
            r#"{"id": "aaaaaaaaaaa", "title": "Band - First Song", "uploader": "Band", "channel_id": "UC1"}"#,
        );
        write(
            &tmp,
            "bbbbbbbbbbb.info.json",
            r#"{"id": "bbbbbbbbbbb", "title": "Second Song", "uploader": "Other Artist", "channel_id": "UC2"}"#,
        );
        write(
            &tmp,
            "PL1.info.json",
            r#"{"id": "PL1", "title": "Band Mix", "channel_id": "UC1", "entries": [{"id": "aaaaaaaaaaa"}]}"#,
        );
        write(
            &tmp,
            "UC1.info.json",
            r#"{"id": "UC1", "title": "Band", "channel_id": "UC1", "entries": [{"id": "aaaaaaaaaaa"}]}"#,
        );
        write(&tmp, "broken.info.json", "{not json");
        write(&tmp, "notes.txt", "ignored");
        let dir = InfoJsonDir::new(tmp.path());
        (tmp, dir)
    }

    #[test]
    fn test_resolve_by_kind() {
        let (_tmp, dir) = fixture();
        let video = dir.resolve(ResourceKind::Video, "aaaaaaaaaaa").unwrap().unwrap();
        assert_eq!(video.title.as_deref(), Some("Band - First Song"));
        assert!(dir.resolve(ResourceKind::Playlist, "PL1").unwrap().is_some());
        assert!(dir.resolve(ResourceKind::Channel, "UC1").unwrap().is_some());
        // Wrong kind
        assert!(dir.resolve(ResourceKind::Video, "PL1").unwrap().is_none());
    }

    #[test]
    fn test_missing_id_is_none() {
        let (_tmp, dir) = fixture();
        assert!(dir.resolve(ResourceKind::Video, "zzzzzzzzzzz").unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let (_tmp, dir) = fixture();
        let err = dir.load("broken").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(err.to_string().contains("broken.info.json"));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (_tmp, dir) = fixture();
        for id in ["", "..", "../etc/passwd", "a/b", r"a\b"] {
            assert!(matches!(dir.load(id), Err(SourceError::InvalidId(_))), "{id:?}");
        }
    }

    #[test]
    fn test_records_skip_malformed_and_sort() {
        let (_tmp, dir) = fixture();
        let ids: Vec<String> = dir.records().unwrap().into_iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec!["PL1", "UC1", "aaaaaaaaaaa", "bbbbbbbbbbb"]);
    }

    #[test]
    fn test_search_videos_case_insensitive() {
        let (_tmp, dir) = fixture();
        let hits = dir.search("BAND", ResourceKind::Video, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_deref(), Some("aaaaaaaaaaa"));

        let hits = dir.search("song", ResourceKind::Video, 1).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_playlists_and_channels() {
        let (_tmp, dir) = fixture();
        let hits = dir.search("mix", ResourceKind::Playlist, 10).unwrap();
        assert_eq!(hits.len(), 1);

        let rows = crate::source::search(&dir, "band", ResourceKind::Channel, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "UC1");
    }

    #[test]
    fn test_kind_inference() {
        let raw: RawMetadata = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(kind_of(&raw), ResourceKind::Video);
        let raw: RawMetadata =
            serde_json::from_str(r#"{"id": "PLx", "playlist_count": 0}"#).unwrap();
        assert_eq!(kind_of(&raw), ResourceKind::Playlist);
        let raw: RawMetadata =
            serde_json::from_str(r#"{"id": "UCx", "channel_id": "UCx", "entries": [null]}"#).unwrap();
        assert_eq!(kind_of(&raw), ResourceKind::Channel);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = InfoJsonDir::new("/nonexistent/tubetag-test");
        assert!(matches!(dir.records(), Err(SourceError::Io(_))));
    }
}
