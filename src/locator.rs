use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::models::ResourceKind;

/// A classified locator: what it points at and the id to fetch it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLocator {
    pub kind: ResourceKind,
    pub id: String,
}

// Tier 1: playlist page
static PLAYLIST_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/playlist\?(?:[^#]*&)?list=([A-Za-z0-9_-]+)").unwrap());

// Tier 2: list= on any other URL (watch pages inside a playlist)
static LIST_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").unwrap());

// Tier 3: video pages. The id is exactly 11 chars, so the token must end there.
static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:
            youtube\.com/watch\?(?:[^\#]*&)?v=
          | youtu\.be/
          | youtube\.com/(?:embed|v|shorts|live)/
        )
        ([A-Za-z0-9_-]{11})
        (?:[^A-Za-z0-9_-]|$)
        ",
    )
    .unwrap()
});

// Tier 4: channel pages (/channel/UC..., /c/slug, /@handle)
static CHANNEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/(?:channel/|c/|@)([A-Za-z0-9_.-]+)").unwrap()
});

/// Classify a locator string. First match wins: playlist page, `list=`
/// parameter, video shapes, channel shapes. Anything else is `None`.
pub fn classify(locator: &str) -> Option<ResourceLocator> {
    let locator = locator.trim();

    let tiers: [(&Regex, ResourceKind); 4] = [
        (&*PLAYLIST_PAGE_RE, ResourceKind::Playlist),
        (&*LIST_PARAM_RE, ResourceKind::Playlist),
        (&*VIDEO_RE, ResourceKind::Video),
        (&*CHANNEL_RE, ResourceKind::Channel),
    ];

    tiers.iter().find_map(|(re, kind)| {
        re.captures(locator).map(|caps| ResourceLocator {
            kind: *kind,
            id: caps[1].to_string(),
        })
    })
}

/// Channel ids proper ("UC" + 22 chars), as opposed to handles and slugs.
fn is_channel_id(id: &str) -> bool {
    id.len() == 24 && id.starts_with("UC")
}

/// Uploads playlist of a channel: `UC…` becomes `UU…`. Handles have none.
pub fn uploads_playlist_id(channel_id: &str) -> Option<String> {
    channel_id
        .strip_prefix("UC")
        .filter(|_| is_channel_id(channel_id))
        .map(|rest| format!("UU{rest}"))
}

impl ResourceLocator {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        ResourceLocator { kind, id: id.into() }
    }

    /// Canonical page URL for this resource.
    pub fn canonical_url(&self) -> String {
        match self.kind {
            ResourceKind::Video => format!("https://www.youtube.com/watch?v={}", self.id),
            ResourceKind::Playlist => format!("https://www.youtube.com/playlist?list={}", self.id),
            ResourceKind::Channel if is_channel_id(&self.id) => {
                format!("https://www.youtube.com/channel/{}", self.id)
            }
            ResourceKind::Channel => format!("https://www.youtube.com/@{}", self.id),
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> Option<ResourceLocator> {
        Some(ResourceLocator::new(ResourceKind::Video, id))
    }

    fn playlist(id: &str) -> Option<ResourceLocator> {
        Some(ResourceLocator::new(ResourceKind::Playlist, id))
    }

    fn channel(id: &str) -> Option<ResourceLocator> {
        Some(ResourceLocator::new(ResourceKind::Channel, id))
    }

    // === Videos ===

    #[test]
    fn test_watch_url() {
        assert_eq!(classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), video("dQw4w9WgXcQ"));
        assert_eq!(classify("https://music.youtube.com/watch?v=dQw4w9WgXcQ"), video("dQw4w9WgXcQ"));
        assert_eq!(
            classify("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_video_shapes() {
        assert_eq!(classify("https://youtu.be/dQw4w9WgXcQ?si=abc"), video("dQw4w9WgXcQ"));
        assert_eq!(classify("https://www.youtube.com/embed/dQw4w9WgXcQ"), video("dQw4w9WgXcQ"));
        assert_eq!(classify("https://www.youtube.com/v/dQw4w9WgXcQ"), video("dQw4w9WgXcQ"));
        assert_eq!(classify("https://youtube.com/shorts/aBcDeFgHiJk"), video("aBcDeFgHiJk"));
        assert_eq!(classify("https://youtube.com/live/aBc-eF_HiJk"), video("aBc-eF_HiJk"));
    }

    #[test]
    fn test_video_id_must_be_eleven_chars() {
        assert_eq!(classify("https://youtu.be/short"), None);
        assert_eq!(classify("https://youtu.be/dQw4w9WgXcQextra"), None);
    }

    // === Playlists ===

    #[test]
    fn test_playlist_page() {
        assert_eq!(
            classify("https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"),
            playlist("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf")
        );
    }

    #[test]
    fn test_playlist_wins_over_video() {
        assert_eq!(
            classify("https://youtube.com/watch?v=dQw4w9WgXcQ&list=PL123"),
            playlist("PL123")
        );
        assert_eq!(classify("https://youtu.be/dQw4w9WgXcQ?list=OLAK5uy_x"), playlist("OLAK5uy_x"));
    }

    // === Channels ===

    #[test]
    fn test_channel_shapes() {
        assert_eq!(classify("https://youtube.com/@somechannel"), channel("somechannel"));
        assert_eq!(
            classify("https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw/videos"),
            channel("UCuAXFkgsw1L7xaCfnd5JJOw")
        );
        assert_eq!(classify("https://www.youtube.com/c/LinusTechTips"), channel("LinusTechTips"));
        assert_eq!(classify("https://www.youtube.com/@some.handle"), channel("some.handle"));
    }

    // === Rejects ===

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("not a url"), None);
        assert_eq!(classify("https://vimeo.com/123456"), None);
        assert_eq!(classify("https://www.youtube.com/"), None);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(classify("  https://youtu.be/dQw4w9WgXcQ \n"), video("dQw4w9WgXcQ"));
    }

    // === Canonical URLs ===

    #[test]
    fn test_canonical_urls() {
        assert_eq!(
            ResourceLocator::new(ResourceKind::Video, "dQw4w9WgXcQ").canonical_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            ResourceLocator::new(ResourceKind::Playlist, "PL123").canonical_url(),
            "https://www.youtube.com/playlist?list=PL123"
        );
        assert_eq!(
            ResourceLocator::new(ResourceKind::Channel, "UCuAXFkgsw1L7xaCfnd5JJOw").canonical_url(),
            "https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw"
        );
        assert_eq!(
            ResourceLocator::new(ResourceKind::Channel, "somechannel").canonical_url(),
            "https://www.youtube.com/@somechannel"
        );
    }

    #[test]
    fn test_uploads_playlist_id() {
        assert_eq!(
            uploads_playlist_id("UCuAXFkgsw1L7xaCfnd5JJOw").as_deref(),
            Some("UUuAXFkgsw1L7xaCfnd5JJOw")
        );
        assert_eq!(uploads_playlist_id("somechannel"), None);
        assert_eq!(uploads_playlist_id("UCshort"), None);
    }

    #[test]
    fn test_classify_then_canonical_round_trip() {
        let loc = classify("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(classify(&loc.canonical_url()), Some(loc));
    }
}
