//! Domain logic - the version value, its ordering and its text form

pub mod ordering;
pub mod repr;
pub mod version;

pub use repr::ParsedCall;
pub use version::{Major, Version, VersionBuilder, DEFAULT_CONSTRUCTOR};
