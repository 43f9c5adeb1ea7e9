use std::fmt;
use std::path::PathBuf;

/// Warnings that occur while updating a package's version.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The new version does not sort above the recorded one
    VersionNotNewer { previous: String, next: String },
    /// The version file uses the deprecated `prerelease=` keyword
    DeprecatedPrereleaseField { path: PathBuf },
    /// No file in the package referenced the version being replaced
    NoReferencesUpdated { package: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::VersionNotNewer { previous, next } => {
                write!(
                    f,
                    "New version {} is not newer than the recorded version {}",
                    next, previous
                )
            }
            BoundaryWarning::DeprecatedPrereleaseField { path } => {
                write!(
                    f,
                    "'{}' uses the deprecated 'prerelease' field; it will be rewritten as 'release_candidate'",
                    path.display()
                )
            }
            BoundaryWarning::NoReferencesUpdated { package } => {
                write!(
                    f,
                    "No references to '{} NEXT' or its placeholder version were found",
                    package.to_lowercase()
                )
            }
        }
    }
}
