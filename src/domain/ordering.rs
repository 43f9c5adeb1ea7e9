//! Total ordering over versions of one package.
//!
//! Every version maps to a [`SortKey`] whose derived ordering is the version
//! ordering. Absent optional components are mapped to the value that gives
//! them their meaning:
//! - no release candidate sorts above any release candidate,
//! - no post release sorts below any post release,
//! - no dev release sorts above any dev release.

use std::cmp::Ordering;

use crate::domain::version::{Major, Version};
use crate::error::{IncrementalError, Result};

/// A component where absence means "larger than any value".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Ceiling {
    Value(u32),
    Unbounded,
}

impl From<Option<u32>> for Ceiling {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Ceiling::Unbounded, Ceiling::Value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    major: Major,
    minor: u32,
    micro: u32,
    release_candidate: Ceiling,
    // `None` orders before every `Some`, i.e. below post0.
    post: Option<u32>,
    dev: Ceiling,
}

impl SortKey {
    fn of(version: &Version) -> Self {
        SortKey {
            major: version.major(),
            minor: version.minor(),
            micro: version.micro(),
            release_candidate: version.release_candidate().into(),
            post: version.post(),
            dev: version.dev().into(),
        }
    }
}

/// Compares two versions of the same package.
///
/// # Errors
/// [`IncrementalError::Incomparable`] when the package names differ
/// (case-insensitively).
pub fn compare(left: &Version, right: &Version) -> Result<Ordering> {
    if !left.same_package(right) {
        return Err(IncrementalError::Incomparable {
            left: left.package().to_string(),
            right: right.package().to_string(),
        });
    }

    Ok(SortKey::of(left).cmp(&SortKey::of(right)))
}
