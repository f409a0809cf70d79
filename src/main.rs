use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tubetag::models::{CanonicalTrack, Codec, QualityTier, RawMetadata, ResourceKind};
use tubetag::select::{ThumbnailMode, preview_stream_url, resolve_channel_avatar, select_thumbnail};
use tubetag::source::{self, InfoJsonDir};
use tubetag::vocabulary::{self, TagGroup, TagPattern};

#[derive(Parser)]
#[command(name = "tubetag", version, about = "Video metadata normalizer for music libraries")]
struct Cli {
    /// Path to a config file (defaults to the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Video,
    Playlist,
    Channel,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => ResourceKind::Video,
            KindArg::Playlist => ResourceKind::Playlist,
            KindArg::Channel => ResourceKind::Channel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupArg {
    Video,
    Audio,
    Quality,
    Content,
}

impl From<GroupArg> for TagGroup {
    fn from(group: GroupArg) -> Self {
        match group {
            GroupArg::Video => TagGroup::Video,
            GroupArg::Audio => TagGroup::Audio,
            GroupArg::Quality => TagGroup::Quality,
            GroupArg::Content => TagGroup::Content,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a locator as a video, playlist or channel
    Classify {
        locator: String,
    },

    /// Strip decorative tags from a title
    Strip {
        title: String,
    },

    /// Split a cleaned title into artist and title
    Split {
        title: String,

        /// Uploader name the artist side must match
        #[arg(short, long, default_value = "")]
        uploader: String,
    },

    /// Normalize a video's info JSON into a track
    Track {
        /// Info JSON file, or - for stdin
        input: PathBuf,

        /// Quality tier (hifi, lossless, high, medium, low, minimum)
        #[arg(short, long)]
        quality: Option<String>,

        /// Artist to use when the record has no uploader
        #[arg(long)]
        channel_name: Option<String>,
    },

    /// Normalize a playlist's info JSON
    Playlist {
        /// Info JSON file, or - for stdin
        input: PathBuf,

        /// Playlist id (defaults to the record's id)
        #[arg(long)]
        id: Option<String>,

        /// Also normalize every entry into a track
        #[arg(long)]
        tracks: bool,

        #[arg(short, long)]
        quality: Option<String>,
    },

    /// Normalize a channel's info JSON
    Channel {
        /// Info JSON file, or - for stdin
        input: PathBuf,

        /// Channel id (defaults to the record's id)
        #[arg(long)]
        id: Option<String>,

        /// Also normalize every entry into a track
        #[arg(long)]
        tracks: bool,

        #[arg(short, long)]
        quality: Option<String>,
    },

    /// Print the preview stream URL for a video
    Preview {
        /// Info JSON file, or - for stdin
        input: PathBuf,

        /// Codec preference, best first (defaults to config preview_codecs)
        #[arg(long, value_delimiter = ',')]
        codecs: Vec<String>,
    },

    /// Print the cover (or, with --avatar, the channel avatar) URL
    Cover {
        /// Info JSON file, or - for stdin
        input: PathBuf,

        /// Only accept avatar-shaped images
        #[arg(long)]
        avatar: bool,
    },

    /// Resolve an id from the info JSON directory
    Lookup {
        id: String,

        #[arg(short, long, value_enum, default_value = "video")]
        kind: KindArg,

        #[arg(short, long)]
        quality: Option<String>,
    },

    /// Search the info JSON directory
    Search {
        query: String,

        #[arg(short, long, value_enum, default_value = "video")]
        kind: KindArg,

        /// Number of results
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show the download format selector for a quality tier
    Selector {
        #[arg(short, long)]
        quality: Option<String>,
    },

    /// List the tag vocabulary
    Vocabulary {
        #[arg(short, long, value_enum)]
        group: Option<GroupArg>,
    },

    /// Filter extractor log output, showing each distinct warning once
    FilterLog {
        /// Log file, or - for stdin
        input: PathBuf,
    },
}

/// A collection record with its entries normalized alongside.
#[derive(Serialize)]
struct WithTracks<'a, T: Serialize> {
    #[serde(flatten)]
    record: &'a T,
    tracks: Vec<CanonicalTrack>,
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

/// Parse an info JSON document. `null` or an empty document means no record.
fn read_raw(input: &Path) -> Result<Option<RawMetadata>> {
    let text = read_input(input)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text).with_context(|| format!("Malformed info JSON in {}", input.display()))
}

fn require_raw(input: &Path) -> Result<RawMetadata> {
    read_raw(input)?.with_context(|| format!("No metadata in {}", input.display()))
}

/// Unrecognized tiers fall through to `None`, which normalizes as Opus.
fn resolve_tier(arg: Option<&str>, default: QualityTier) -> Option<QualityTier> {
    match arg {
        None => Some(default),
        Some(s) => match s.parse() {
            Ok(tier) => Some(tier),
            Err(e) => {
                log::warn!("{e}, using opus");
                None
            }
        },
    }
}

fn record_id(explicit: Option<String>, raw: &RawMetadata, input: &Path) -> String {
    explicit
        .or_else(|| raw.id.clone().filter(|id| !id.is_empty()))
        .or_else(|| {
            let name = input.file_name()?.to_str()?;
            Some(name.strip_suffix(".info.json").unwrap_or(name).to_string())
        })
        .unwrap_or_default()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = match &cli.config {
        Some(path) => tubetag::config::AppConfig::load_from(path),
        None => tubetag::config::AppConfig::load(),
    };

    // Initialize the tag vocabulary (must happen before any title is stripped)
    vocabulary::init(&config.custom_tags);

    match cli.command {
        Commands::Classify { locator } => {
            let found = tubetag::classify(&locator)
                .with_context(|| format!("Unrecognized locator: {locator}"))?;
            log::info!("{found} → {}", found.canonical_url());
            print_json(&found)?;
        }

        Commands::Strip { title } => {
            println!("{}", tubetag::strip(&title));
        }

        Commands::Split { title, uploader } => {
            let (artist, title) = tubetag::split(&title, &uploader);
            print_json(&serde_json::json!({ "artist": artist, "title": title }))?;
        }

        Commands::Track { input, quality, channel_name } => {
            let raw = read_raw(&input)?;
            let tier = resolve_tier(quality.as_deref(), config.quality);
            let track = tubetag::normalize(raw.as_ref(), tier, channel_name.as_deref());
            if let Some(err) = &track.error {
                log::warn!("{}: {err}", input.display());
            }
            print_json(&track)?;
        }

        Commands::Playlist { input, id, tracks, quality } => {
            let raw = require_raw(&input)?;
            let id = record_id(id, &raw, &input);
            let playlist = tubetag::normalize::normalize_playlist(&raw, &id);
            if tracks {
                let tier = resolve_tier(quality.as_deref(), config.quality);
                print_json(&WithTracks { tracks: playlist.tracks(tier), record: &playlist })?;
            } else {
                print_json(&playlist)?;
            }
        }

        Commands::Channel { input, id, tracks, quality } => {
            let raw = require_raw(&input)?;
            let id = record_id(id, &raw, &input);
            let channel = tubetag::normalize::normalize_channel(&raw, &id);
            if tracks {
                let tier = resolve_tier(quality.as_deref(), config.quality);
                print_json(&WithTracks { tracks: channel.tracks(tier), record: &channel })?;
            } else {
                print_json(&channel)?;
            }
        }

        Commands::Preview { input, codecs } => {
            let raw = require_raw(&input)?;
            let codecs = if codecs.is_empty() { config.preview_codecs.clone() } else { codecs };
            let url = preview_stream_url(&raw, &codecs)
                .context("No audio-only format with a stream URL")?;
            println!("{url}");
        }

        Commands::Cover { input, avatar } => {
            let raw = require_raw(&input)?;
            let url = if avatar {
                resolve_channel_avatar(&raw)
            } else {
                select_thumbnail(&raw.thumbnails, ThumbnailMode::Largest).or(raw.thumbnail)
            };
            match url {
                Some(url) => println!("{url}"),
                None => anyhow::bail!("No suitable image in {}", input.display()),
            }
        }

        Commands::Lookup { id, kind, quality } => {
            let dir = InfoJsonDir::new(config.resolve_info_json_dir());
            log::info!("Info JSON directory: {}", dir.root().display());
            match ResourceKind::from(kind) {
                ResourceKind::Video => {
                    let tier = resolve_tier(quality.as_deref(), config.quality);
                    print_json(&source::fetch_track(&dir, &id, tier)?)?;
                }
                ResourceKind::Playlist => {
                    let playlist = source::fetch_playlist(&dir, &id)?
                        .with_context(|| format!("No playlist {id}"))?;
                    print_json(&playlist)?;
                }
                ResourceKind::Channel => {
                    let channel = source::fetch_channel(&dir, &id)?
                        .with_context(|| format!("No channel {id}"))?;
                    print_json(&channel)?;
                }
            }
        }

        Commands::Search { query, kind, limit } => {
            let dir = InfoJsonDir::new(config.resolve_info_json_dir());
            let results = source::search(&dir, &query, kind.into(), limit)
                .context("Search failed")?;
            print_json(&results)?;
        }

        Commands::Selector { quality } => {
            let codec = resolve_tier(quality.as_deref(), config.quality)
                .map_or(Codec::Opus, |t| t.codec());
            println!("{codec}\t{}", codec.format_selector());
        }

        Commands::Vocabulary { group } => {
            let vocab = vocabulary::vocabulary();
            let entries: Vec<&vocabulary::TagEntry> = match group {
                Some(g) => vocab.group(g.into()).collect(),
                None => vocab.entries().iter().collect(),
            };
            for entry in entries {
                match &entry.pattern {
                    TagPattern::Phrase(p) => println!("{:<8} {p}", entry.group.name()),
                    TagPattern::Pattern(p) => println!("{:<8} /{p}/", entry.group.name()),
                }
            }
        }

        Commands::FilterLog { input } => {
            let text = read_input(&input)?;
            let warnings = tubetag::warnings::global();
            let emitted = text.lines().filter(|line| warnings.line(line)).count();
            log::info!("{emitted} lines reported, {} distinct warnings", warnings.distinct());
        }
    }

    Ok(())
}
