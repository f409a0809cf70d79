use crate::models::{RawFormat, RawMetadata, non_empty};

/// Codec order used for previews when the caller has no preference.
pub const DEFAULT_PREFERENCE: [&str; 3] = ["opus", "aac", "mp3"];

fn lowest_bitrate<'a>(formats: impl Iterator<Item = &'a RawFormat>) -> Option<&'a RawFormat> {
    // min_by keeps the first minimum, so earlier entries win ties
    formats.min_by(|a, b| a.bitrate().total_cmp(&b.bitrate()))
}

/// Pick an audio-only stream, cheapest first.
///
/// The first codec in `preference` with any audio-only match wins, and the
/// lowest-bitrate match for it is returned (previews load faster). A format
/// matches a codec when its `acodec` starts with the codec name. Without a
/// preferred match the globally cheapest audio-only format is used.
pub fn select_format<'a, S: AsRef<str>>(
    formats: &'a [RawFormat],
    preference: &[S],
) -> Option<&'a RawFormat> {
    let audio_only = || formats.iter().filter(|f| f.is_audio_only());

    for codec in preference {
        let codec = codec.as_ref();
        let matching = audio_only()
            .filter(|f| f.acodec.as_deref().is_some_and(|a| a.starts_with(codec)));
        if let Some(found) = lowest_bitrate(matching) {
            return Some(found);
        }
    }

    lowest_bitrate(audio_only())
}

/// Direct stream URL of the preview format for one video.
pub fn preview_stream_url<S: AsRef<str>>(raw: &RawMetadata, preference: &[S]) -> Option<String> {
    let format = select_format(&raw.formats, preference)?;
    match non_empty(format.url.as_deref()) {
        Some(url) => Some(url.to_string()),
        None => {
            log::debug!(
                "Preview format {} has no URL",
                format.format_id.as_deref().unwrap_or("?")
            );
            None
        }
    }
}
