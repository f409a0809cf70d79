//! Best-of-N choosers for thumbnails and audio formats. Both tolerate missing
//! fields and break ties toward the earliest candidate.

pub mod format;
pub mod thumbnail;

pub use format::{DEFAULT_PREFERENCE, preview_stream_url, select_format};
pub use thumbnail::{
    ThumbnailMode, avatar_only, is_avatar_url, resolve_channel_avatar, search_thumbnail,
    select_thumbnail,
};
