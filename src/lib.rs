pub mod config;
pub mod locator;
pub mod models;
pub mod normalize;
pub mod select;
pub mod source;
pub mod title;
pub mod vocabulary;
pub mod warnings;

pub use locator::{ResourceLocator, classify};
pub use normalize::normalize;
pub use select::{ThumbnailMode, select_format, select_thumbnail};
pub use title::{split, strip};

/// Application name for XDG paths
pub const APP_NAME: &str = "tubetag";
