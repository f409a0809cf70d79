pub mod split;
pub mod strip;

pub use split::split;
pub use strip::{TagStripper, strip};
