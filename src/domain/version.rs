use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::{ordering, repr};
use crate::error::{IncrementalError, Result};

/// Constructor name used when rendering the canonical representation.
pub const DEFAULT_CONSTRUCTOR: &str = "VersionValue";

/// Major component of a version.
///
/// `Next` is the "not yet released" placeholder. It sorts above every
/// concrete release, which the derived ordering relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Major {
    Release(u32),
    Next,
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Major::Release(n) => write!(f, "{}", n),
            Major::Next => write!(f, "NEXT"),
        }
    }
}

/// A version of one package: `major.minor.micro` plus optional release
/// candidate, post release and dev release numbers.
///
/// Values are immutable once built. Two versions are only comparable when
/// their package names match case-insensitively; see [`Version::compare`].
#[derive(Debug, Clone)]
pub struct Version {
    package: String,
    major: Major,
    minor: u32,
    micro: u32,
    release_candidate: Option<u32>,
    post: Option<u32>,
    dev: Option<u32>,
}

impl Version {
    /// Creates a plain release version with no rc, post or dev marker.
    pub fn new(package: impl Into<String>, major: u32, minor: u32, micro: u32) -> Self {
        Version {
            package: package.into(),
            major: Major::Release(major),
            minor,
            micro,
            release_candidate: None,
            post: None,
            dev: None,
        }
    }

    /// The "unreleased" placeholder for a package: `NEXT` with every other
    /// component zeroed.
    pub fn unreleased(package: impl Into<String>) -> Self {
        Version {
            package: package.into(),
            major: Major::Next,
            minor: 0,
            micro: 0,
            release_candidate: None,
            post: None,
            dev: None,
        }
    }

    /// Starts building a version that needs optional components.
    pub fn builder(package: impl Into<String>, major: u32, minor: u32, micro: u32) -> VersionBuilder {
        VersionBuilder {
            package: package.into(),
            major: Major::Release(major),
            minor,
            micro,
            release_candidate: None,
            prerelease: None,
            post: None,
            dev: None,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn major(&self) -> Major {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    pub fn release_candidate(&self) -> Option<u32> {
        self.release_candidate
    }

    /// Old name for [`Version::release_candidate`].
    #[deprecated(note = "use `release_candidate` instead")]
    pub fn prerelease(&self) -> Option<u32> {
        tracing::warn!(
            package = %self.package,
            "Version::prerelease is deprecated, use Version::release_candidate instead"
        );
        self.release_candidate
    }

    pub fn post(&self) -> Option<u32> {
        self.post
    }

    pub fn dev(&self) -> Option<u32> {
        self.dev
    }

    pub fn is_unreleased(&self) -> bool {
        self.major == Major::Next
    }

    /// PEP 440 style public version, e.g. `14.4.0`, `1.2.3rc1`,
    /// `14.2.1rc1dev9`. The unreleased placeholder renders as `NEXT`.
    pub fn public(&self) -> String {
        if let Major::Next = self.major {
            return "NEXT".to_string();
        }

        let mut out = format!("{}.{}.{}", self.major, self.minor, self.micro);
        if let Some(rc) = self.release_candidate {
            out.push_str(&format!("rc{}", rc));
        }
        if let Some(post) = self.post {
            out.push_str(&format!("post{}", post));
        }
        if let Some(dev) = self.dev {
            out.push_str(&format!("dev{}", dev));
        }
        out
    }

    pub fn short(&self) -> String {
        self.public()
    }

    pub fn base(&self) -> String {
        self.public()
    }

    pub fn local(&self) -> String {
        self.public()
    }

    /// Human friendly `<package> <short>` string.
    pub fn version_string(&self) -> String {
        format!("{} {}", self.package, self.short())
    }

    /// Canonical constructor form using [`DEFAULT_CONSTRUCTOR`].
    ///
    /// This exact text is what the tree rewriter searches for, so it must
    /// stay byte-stable for equal values.
    pub fn repr(&self) -> String {
        self.repr_with(DEFAULT_CONSTRUCTOR)
    }

    /// Canonical constructor form with a caller-chosen constructor name,
    /// e.g. `Version('pkg', 1, 2, 3, release_candidate=1)`.
    pub fn repr_with(&self, constructor: &str) -> String {
        let major = match self.major {
            Major::Release(n) => n.to_string(),
            Major::Next => repr::quote("NEXT"),
        };

        let mut out = format!(
            "{}({}, {}, {}, {}",
            constructor,
            repr::quote(&self.package),
            major,
            self.minor,
            self.micro
        );
        if let Some(rc) = self.release_candidate {
            out.push_str(&format!(", release_candidate={}", rc));
        }
        if let Some(post) = self.post {
            out.push_str(&format!(", post={}", post));
        }
        if let Some(dev) = self.dev {
            out.push_str(&format!(", dev={}", dev));
        }
        out.push(')');
        out
    }

    pub fn same_package(&self, other: &Version) -> bool {
        self.package.to_lowercase() == other.package.to_lowercase()
    }

    /// Three-way comparison.
    ///
    /// # Errors
    /// Returns [`IncomparableVersions`](IncrementalError::Incomparable) when
    /// the two versions belong to different packages.
    pub fn compare(&self, other: &Version) -> Result<Ordering> {
        ordering::compare(self, other)
    }

    /// `self < other`
    pub fn precedes(&self, other: &Version) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    /// `self > other`
    pub fn follows(&self, other: &Version) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    /// `self == other` under the version ordering.
    pub fn equivalent(&self, other: &Version) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    /// Reopens this value as a builder, keeping every component.
    pub fn to_builder(&self) -> VersionBuilder {
        VersionBuilder {
            package: self.package.clone(),
            major: self.major,
            minor: self.minor,
            micro: self.micro,
            release_candidate: self.release_candidate,
            prerelease: None,
            post: self.post,
            dev: self.dev,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, version {}]", self.package, self.short())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl FromStr for Version {
    type Err = IncrementalError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(repr::parse_call(s)?.version)
    }
}

/// `value + 1`, failing instead of wrapping at `u32::MAX`.
pub(crate) fn increment(component: &str, value: u32) -> Result<u32> {
    value.checked_add(1).ok_or_else(|| {
        IncrementalError::invalid(format!("{} {} cannot be incremented", component, value))
    })
}

/// Builder for versions carrying optional components.
///
/// All validation happens in [`VersionBuilder::build`].
#[derive(Debug, Clone)]
pub struct VersionBuilder {
    package: String,
    major: Major,
    minor: u32,
    micro: u32,
    release_candidate: Option<u32>,
    prerelease: Option<u32>,
    post: Option<u32>,
    dev: Option<u32>,
}

impl VersionBuilder {
    pub fn with_major(mut self, major: Major) -> Self {
        self.major = major;
        self
    }

    pub fn micro(mut self, micro: u32) -> Self {
        self.micro = micro;
        self
    }

    pub fn release_candidate(mut self, rc: u32) -> Self {
        self.release_candidate = Some(rc);
        self
    }

    /// Old name for [`VersionBuilder::release_candidate`].
    #[deprecated(note = "use `release_candidate` instead")]
    pub fn prerelease(self, prerelease: u32) -> Self {
        self.legacy_prerelease(prerelease)
    }

    pub(crate) fn legacy_prerelease(mut self, prerelease: u32) -> Self {
        self.prerelease = Some(prerelease);
        self
    }

    pub fn post(mut self, post: u32) -> Self {
        self.post = Some(post);
        self
    }

    pub fn dev(mut self, dev: u32) -> Self {
        self.dev = Some(dev);
        self
    }

    pub fn without_post(mut self) -> Self {
        self.post = None;
        self
    }

    pub fn without_dev(mut self) -> Self {
        self.dev = None;
        self
    }

    /// Drops the release candidate, post and dev markers.
    pub fn without_markers(mut self) -> Self {
        self.release_candidate = None;
        self.prerelease = None;
        self.post = None;
        self.dev = None;
        self
    }

    /// Moves the release candidate up by one, starting at 1.
    pub(crate) fn bump_release_candidate(mut self) -> Result<Self> {
        let current = self.release_candidate.unwrap_or(0);
        self.release_candidate = Some(increment("release_candidate", current)?);
        Ok(self)
    }

    /// Validates and freezes the version.
    ///
    /// # Errors
    /// * both `release_candidate` and the deprecated `prerelease` given
    /// * a release candidate of 0
    /// * `NEXT` combined with any non-zero component
    /// * an empty package name
    pub fn build(self) -> Result<Version> {
        if self.package.is_empty() {
            return Err(IncrementalError::invalid("package name must not be empty"));
        }

        let release_candidate = match (self.release_candidate, self.prerelease) {
            (Some(_), Some(_)) => {
                return Err(IncrementalError::invalid(
                    "give only one of release_candidate and prerelease",
                ));
            }
            (None, Some(prerelease)) => {
                tracing::warn!(
                    package = %self.package,
                    "passing prerelease is deprecated, pass release_candidate instead"
                );
                Some(prerelease)
            }
            (rc, None) => rc,
        };

        if release_candidate == Some(0) {
            return Err(IncrementalError::invalid(
                "release candidate numbers start at 1",
            ));
        }

        if self.major == Major::Next
            && (self.minor != 0
                || self.micro != 0
                || release_candidate.is_some()
                || self.post.unwrap_or(0) != 0
                || self.dev.unwrap_or(0) != 0)
        {
            return Err(IncrementalError::invalid(
                "when using NEXT, all other values except the package must be 0",
            ));
        }

        Ok(Version {
            package: self.package,
            major: self.major,
            minor: self.minor,
            micro: self.micro,
            release_candidate,
            post: self.post,
            dev: self.dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_plain() {
        assert_eq!(Version::new("dummy", 1, 2, 3).public(), "1.2.3");
    }

    #[test]
    fn test_public_with_all_markers() {
        let v = Version::builder("dummy", 14, 2, 1)
            .release_candidate(1)
            .post(2)
            .dev(9)
            .build()
            .unwrap();
        assert_eq!(v.public(), "14.2.1rc1post2dev9");
        assert_eq!(v.short(), v.public());
        assert_eq!(v.base(), v.public());
        assert_eq!(v.local(), v.public());
    }

    #[test]
    fn test_public_unreleased() {
        assert_eq!(Version::unreleased("dummy").public(), "NEXT");
    }

    #[test]
    fn test_repr_plain() {
        assert_eq!(
            Version::new("inctestpkg", 16, 8, 0).repr(),
            "VersionValue('inctestpkg', 16, 8, 0)"
        );
    }

    #[test]
    fn test_repr_with_markers_in_fixed_order() {
        let v = Version::builder("inctestpkg", 1, 2, 3)
            .dev(2)
            .release_candidate(1)
            .post(0)
            .build()
            .unwrap();
        assert_eq!(
            v.repr(),
            "VersionValue('inctestpkg', 1, 2, 3, release_candidate=1, post=0, dev=2)"
        );
    }

    #[test]
    fn test_repr_unreleased_quotes_next() {
        assert_eq!(
            Version::unreleased("inctestpkg").repr_with("Version"),
            "Version('inctestpkg', 'NEXT', 0, 0)"
        );
    }

    #[test]
    fn test_display_and_version_string() {
        let v = Version::builder("MyProj", 17, 5, 1).dev(0).build().unwrap();
        assert_eq!(v.to_string(), "[MyProj, version 17.5.1dev0]");
        assert_eq!(v.version_string(), "MyProj 17.5.1dev0");
    }

    #[test]
    fn test_next_rejects_non_zero_components() {
        let next = |minor, micro| Version::builder("dummy", 0, minor, micro).with_major(Major::Next);
        assert!(next(1, 0).build().is_err());
        assert!(next(0, 1).build().is_err());
        assert!(next(0, 0).release_candidate(1).build().is_err());
        assert!(next(0, 0).dev(3).build().is_err());
        assert!(next(0, 0).build().is_ok());
    }

    #[test]
    #[allow(deprecated)]
    fn test_prerelease_alias_sets_release_candidate() {
        let v = Version::builder("whatever", 1, 0, 0)
            .prerelease(1)
            .build()
            .unwrap();
        assert_eq!(v.release_candidate(), Some(1));
        assert_eq!(v.prerelease(), Some(1));
    }

    #[test]
    #[allow(deprecated)]
    fn test_prerelease_and_release_candidate_conflict() {
        let err = Version::builder("whatever", 1, 0, 0)
            .release_candidate(1)
            .prerelease(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, IncrementalError::InvalidConstruction(_)));
    }

    #[test]
    fn test_zero_release_candidate_rejected() {
        assert!(Version::builder("dummy", 1, 0, 0)
            .release_candidate(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_empty_package_rejected() {
        assert!(Version::builder("", 1, 0, 0).build().is_err());
    }

    #[test]
    fn test_bump_release_candidate_starts_at_one() {
        let v = Version::new("dummy", 1, 2, 3)
            .to_builder()
            .bump_release_candidate()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(v.release_candidate(), Some(1));

        let v = v
            .to_builder()
            .bump_release_candidate()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(v.release_candidate(), Some(2));
    }

    #[test]
    fn test_bump_release_candidate_at_max_fails() {
        let err = Version::builder("dummy", 1, 2, 3)
            .release_candidate(u32::MAX)
            .bump_release_candidate()
            .unwrap_err();
        assert!(matches!(err, IncrementalError::InvalidConstruction(_)));
        assert!(err.to_string().contains("release_candidate"));
    }

    #[test]
    fn test_increment() {
        assert_eq!(increment("micro", 3).unwrap(), 4);
        assert!(increment("micro", u32::MAX).is_err());
    }

    #[test]
    fn test_without_markers_keeps_triple() {
        let v = Version::builder("dummy", 1, 2, 3)
            .release_candidate(1)
            .post(1)
            .dev(2)
            .build()
            .unwrap();
        let stripped = v.to_builder().without_markers().build().unwrap();
        assert_eq!(stripped.repr(), "VersionValue('dummy', 1, 2, 3)");
    }

    #[test]
    fn test_equality_ignores_package_case() {
        assert_eq!(Version::new("Dummy", 1, 0, 0), Version::new("dummy", 1, 0, 0));
        assert_ne!(Version::new("dummy", 1, 0, 0), Version::new("dumym", 1, 0, 0));
    }

    #[test]
    fn test_relational_helpers() {
        let older = Version::new("dummy", 1, 0, 0);
        let newer = Version::new("dummy", 1, 0, 1);
        assert!(older.precedes(&newer).unwrap());
        assert!(newer.follows(&older).unwrap());
        assert!(older.equivalent(&older.clone()).unwrap());
        assert!(older < newer);
        assert!(newer >= older);
    }

    #[test]
    fn test_partial_cmp_across_packages_is_none() {
        let a = Version::new("dummy", 1, 0, 0);
        let b = Version::new("other", 1, 0, 0);
        assert_eq!(a.partial_cmp(&b), None);
        assert!(a.compare(&b).is_err());
    }

    #[test]
    fn test_from_str_roundtrip() {
        let v = Version::builder("inctestpkg", 1, 2, 3)
            .release_candidate(4)
            .dev(5)
            .build()
            .unwrap();
        let parsed: Version = v.repr().parse().unwrap();
        assert_eq!(parsed.repr(), v.repr());
    }
}
