//! Decides the next version from the requested bump and the recorded one.
//!
//! Nothing here touches the file system; flags are validated before the
//! caller reads anything from disk.

use chrono::{Datelike, NaiveDate};

use crate::domain::version::increment;
use crate::domain::Version;
use crate::error::{IncrementalError, Result};

/// Raw bump flags as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpFlags {
    pub newversion: Option<String>,
    pub patch: bool,
    pub rc: bool,
    pub dev: bool,
    pub create: bool,
}

/// A validated bump request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpMode {
    /// Start versioning from today's date, ignoring any recorded version.
    Create,
    /// Use an explicit dotted version such as `1.2.3.rc1`.
    Explicit(String),
    /// Next micro release, optionally as its first release candidate.
    Patch { release_candidate: bool },
    /// Next release candidate.
    ReleaseCandidate,
    /// Next dev release of the recorded version.
    Dev,
    /// Turn the recorded release candidate into the final release.
    Finalize,
}

impl BumpMode {
    /// Whether the recorded version must be loaded to plan this bump.
    pub fn needs_existing(&self) -> bool {
        !matches!(self, BumpMode::Create)
    }
}

impl BumpFlags {
    fn active(&self) -> [(&'static str, bool); 5] {
        [
            ("create", self.create),
            ("newversion", self.newversion.is_some()),
            ("patch", self.patch),
            ("rc", self.rc),
            ("dev", self.dev),
        ]
    }

    /// Checks mutual exclusivity and resolves the flags into one mode.
    ///
    /// `--rc` may be combined with `--patch`; every other pair of flags is
    /// rejected.
    ///
    /// # Errors
    /// [`IncrementalError::InvalidCombination`] naming the first conflicting pair.
    pub fn validate(&self) -> Result<BumpMode> {
        let active = self.active();
        for (i, &(first, first_on)) in active.iter().enumerate() {
            for &(second, second_on) in active.iter().skip(i + 1) {
                let compatible = matches!((first, second), ("patch", "rc"));
                if first_on && second_on && !compatible {
                    return Err(IncrementalError::InvalidCombination { first, second });
                }
            }
        }

        let mode = if self.create {
            BumpMode::Create
        } else if let Some(text) = &self.newversion {
            BumpMode::Explicit(text.clone())
        } else if self.patch {
            BumpMode::Patch {
                release_candidate: self.rc,
            }
        } else if self.rc {
            BumpMode::ReleaseCandidate
        } else if self.dev {
            BumpMode::Dev
        } else {
            BumpMode::Finalize
        };
        Ok(mode)
    }
}

/// The outcome of planning: what the version was and what it becomes.
#[derive(Debug, Clone)]
pub struct BumpPlan {
    /// Recorded version before the bump; `None` for [`BumpMode::Create`].
    pub previous: Option<Version>,
    pub next: Version,
}

impl BumpPlan {
    /// Whether the new version sorts strictly above the previous one.
    ///
    /// Plans without a previous version, or whose versions cannot be
    /// compared, count as moving forward.
    pub fn moves_forward(&self) -> bool {
        match &self.previous {
            Some(previous) => self.next.follows(previous).unwrap_or(true),
            None => true,
        }
    }
}

/// Computes next versions for one calendar day.
#[derive(Debug, Clone, Copy)]
pub struct BumpPlanner {
    today: NaiveDate,
    epoch_year: i32,
}

impl BumpPlanner {
    pub fn new(today: NaiveDate, epoch_year: i32) -> Self {
        BumpPlanner { today, epoch_year }
    }

    /// `(year - epoch, month, 0)` for today.
    pub fn calendar_version(&self, package: &str) -> Result<Version> {
        let major = u32::try_from(self.today.year() - self.epoch_year).map_err(|_| {
            IncrementalError::invalid(format!(
                "year {} is before the epoch year {}",
                self.today.year(),
                self.epoch_year
            ))
        })?;
        Ok(Version::new(package, major, self.today.month(), 0))
    }

    /// Plans the next version of `package`.
    ///
    /// `existing` is the recorded version; it is ignored by
    /// [`BumpMode::Create`] and required by every other mode.
    ///
    /// # Errors
    /// * [`IncrementalError::NoPrerelease`] when finalizing a version without an rc
    /// * [`IncrementalError::InvalidConstruction`] for malformed explicit versions,
    ///   or when a bumped component is already `u32::MAX`
    pub fn plan(&self, package: &str, mode: &BumpMode, existing: Option<Version>) -> Result<BumpPlan> {
        let recorded = || {
            existing.as_ref().ok_or_else(|| {
                IncrementalError::invalid("the recorded version is required for this bump")
            })
        };

        let next = match mode {
            BumpMode::Create => self.calendar_version(package)?,
            BumpMode::Explicit(text) => {
                recorded()?;
                parse_dotted(package, text)?
            }
            BumpMode::Patch { release_candidate } => {
                let existing = recorded()?;
                let patched = rebase(package, existing)
                    .without_markers()
                    .micro(increment("micro", existing.micro())?);
                if *release_candidate {
                    patched.bump_release_candidate()?.build()?
                } else {
                    patched.build()?
                }
            }
            BumpMode::ReleaseCandidate => {
                // The candidate is incremented exactly once: either the
                // existing rc moves up, or a new release line starts at rc1.
                let existing = recorded()?;
                let base = if existing.release_candidate().is_some() {
                    rebase(package, existing).without_post().without_dev()
                } else {
                    self.calendar_version(package)?.to_builder()
                };
                base.bump_release_candidate()?.build()?
            }
            BumpMode::Dev => {
                let existing = recorded()?;
                rebase(package, existing)
                    .without_post()
                    .dev(increment("dev", existing.dev().unwrap_or(0))?)
                    .build()?
            }
            BumpMode::Finalize => {
                let existing = recorded()?;
                if existing.release_candidate().is_none() {
                    return Err(IncrementalError::NoPrerelease);
                }
                rebase(package, existing).without_markers().build()?
            }
        };

        // A created version starts fresh, whatever was recorded before.
        let previous = match mode {
            BumpMode::Create => None,
            _ => existing,
        };

        tracing::debug!(
            previous = ?previous.as_ref().map(Version::public),
            next = %next.public(),
            ?mode,
            "planned version bump"
        );
        Ok(BumpPlan { previous, next })
    }
}

/// Builder seeded from `existing` but named after `package`.
fn rebase(package: &str, existing: &Version) -> crate::domain::VersionBuilder {
    let mut builder = Version::builder(package, 0, existing.minor(), existing.micro())
        .with_major(existing.major());
    if let Some(rc) = existing.release_candidate() {
        builder = builder.release_candidate(rc);
    }
    if let Some(post) = existing.post() {
        builder = builder.post(post);
    }
    if let Some(dev) = existing.dev() {
        builder = builder.dev(dev);
    }
    builder
}

/// Parses an explicit version such as `1.2.3`, `1.2.3.rc1` or `1.2.3.rc1.dev2`.
///
/// Suffix segments are `rcN`, `devN`, `postN` and the deprecated `preN`
/// (same as `rcN`). Any other suffix is rejected.
pub fn parse_dotted(package: &str, text: &str) -> Result<Version> {
    let mut segments = text.trim().split('.');
    let mut component = |name: &str| -> Result<u32> {
        let segment = segments.next().ok_or_else(|| {
            IncrementalError::invalid(format!(
                "'{}' needs at least major.minor.micro (missing {})",
                text, name
            ))
        })?;
        segment.parse::<u32>().map_err(|_| {
            IncrementalError::invalid(format!("invalid {} '{}' in '{}'", name, segment, text))
        })
    };
    let major = component("major")?;
    let minor = component("minor")?;
    let micro = component("micro")?;

    let mut builder = Version::builder(package, major, minor, micro);
    for segment in segments {
        let number = |digits: &str| {
            digits.parse::<u32>().map_err(|_| {
                IncrementalError::invalid(format!("invalid number in '{}' of '{}'", segment, text))
            })
        };

        builder = if let Some(digits) = segment.strip_prefix("dev") {
            builder.dev(number(digits)?)
        } else if let Some(digits) = segment.strip_prefix("rc") {
            builder.release_candidate(number(digits)?)
        } else if let Some(digits) = segment.strip_prefix("pre") {
            builder.legacy_prerelease(number(digits)?)
        } else if let Some(digits) = segment.strip_prefix("post") {
            builder.post(number(digits)?)
        } else {
            return Err(IncrementalError::invalid(format!(
                "unknown version suffix '{}' in '{}'",
                segment, text
            )));
        };
    }

    builder.build()
}
