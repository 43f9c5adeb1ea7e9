//! Propagates a new version through every file of a package.
//!
//! Replacements are byte-exact and applied in a fixed order:
//! 1. the previous release candidate's canonical text, when it had one,
//! 2. the canonical text of the `NEXT` placeholder (either quote style),
//! 3. `<package> NEXT` with `<package> <public version>`.
//!
//! The walk is not transactional: a failure part way leaves the files
//! already rewritten in place. The report lists every file written so far.

use std::fs;
use std::path::{Path, PathBuf};

use regex::bytes::{NoExpand, Regex};

use crate::domain::Version;
use crate::error::{IncrementalError, Result};

/// One literal replacement.
#[derive(Debug, Clone)]
struct Substitution {
    needle: Regex,
    replacement: Vec<u8>,
}

impl Substitution {
    fn literal(needle: &str, replacement: &str) -> Result<Self> {
        let needle = Regex::new(&regex::escape(needle))
            .map_err(|e| IncrementalError::invalid(format!("bad search text: {}", e)))?;
        Ok(Substitution {
            needle,
            replacement: replacement.as_bytes().to_vec(),
        })
    }
}

/// Files touched by a tree pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Files whose content changed, in walk order.
    pub rewritten: Vec<PathBuf>,
    /// Regular files examined.
    pub scanned: usize,
}

/// Rewrites references to an old version across a directory tree.
#[derive(Debug, Clone)]
pub struct TreeRewriter {
    substitutions: Vec<Substitution>,
}

impl TreeRewriter {
    /// Prepares the ordered substitutions for moving `package` to `next`.
    ///
    /// `constructor` is the name used in the canonical version text.
    pub fn new(
        package: &str,
        previous: Option<&Version>,
        next: &Version,
        constructor: &str,
    ) -> Result<Self> {
        let next_repr = next.repr_with(constructor);
        let mut substitutions = Vec::new();

        if let Some(previous) = previous.filter(|p| p.release_candidate().is_some()) {
            let previous_repr = previous.repr_with(constructor);
            substitutions.push(Substitution::literal(&previous_repr, &next_repr)?);
            let double_quoted = previous_repr.replace('\'', "\"");
            if double_quoted != previous_repr {
                substitutions.push(Substitution::literal(&double_quoted, &next_repr)?);
            }
        }

        let unreleased = Version::unreleased(package).repr_with(constructor);
        substitutions.push(Substitution::literal(&unreleased, &next_repr)?);
        substitutions.push(Substitution::literal(
            &unreleased.replace('\'', "\""),
            &next_repr,
        )?);

        let lowered = package.to_lowercase();
        substitutions.push(Substitution::literal(
            &format!("{} NEXT", lowered),
            &format!("{} {}", lowered, next.public()),
        )?);

        Ok(TreeRewriter { substitutions })
    }

    /// Applies every substitution in order. Returns `None` when nothing changed.
    pub fn apply(&self, content: &[u8]) -> Option<Vec<u8>> {
        let mut current = content.to_vec();
        for substitution in &self.substitutions {
            let replaced = substitution
                .needle
                .replace_all(&current, NoExpand(substitution.replacement.as_slice()));
            if let std::borrow::Cow::Owned(bytes) = replaced {
                current = bytes;
            }
        }

        if current == content {
            None
        } else {
            Some(current)
        }
    }

    /// Walks every regular file under `root` and rewrites the ones whose
    /// content changes. With `dry_run` nothing is written but the report
    /// still lists the files that would change.
    pub fn rewrite_tree(&self, root: &Path, dry_run: bool) -> Result<RewriteReport> {
        let mut report = RewriteReport::default();
        self.rewrite_dir(root, dry_run, &mut report)?;
        Ok(report)
    }

    fn rewrite_dir(&self, dir: &Path, dry_run: bool, report: &mut RewriteReport) -> Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            // Symlinks are neither followed nor rewritten.
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                self.rewrite_dir(&path, dry_run, report)?;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            report.scanned += 1;
            let original = fs::read(&path)?;
            let Some(updated) = self.apply(&original) else {
                continue;
            };

            if dry_run {
                tracing::info!(path = %path.display(), "would update");
            } else {
                tracing::info!(path = %path.display(), "updating");
                fs::write(&path, updated)?;
            }
            report.rewritten.push(path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CTOR: &str = "VersionValue";

    fn rewriter(previous: Option<&Version>, next: &Version) -> TreeRewriter {
        TreeRewriter::new("inctestpkg", previous, next, CTOR).unwrap()
    }

    #[test]
    fn test_replaces_next_placeholders() {
        let next = Version::new("inctestpkg", 1, 2, 4);
        let content = b"introduced_in = VersionValue('inctestpkg', 'NEXT', 0, 0).short()\n\
                        other = VersionValue(\"inctestpkg\", \"NEXT\", 0, 0)\n\
                        next_released_version = \"inctestpkg NEXT\"\n";

        let updated = rewriter(None, &next).apply(content).unwrap();
        assert_eq!(
            String::from_utf8(updated).unwrap(),
            "introduced_in = VersionValue('inctestpkg', 1, 2, 4).short()\n\
             other = VersionValue('inctestpkg', 1, 2, 4)\n\
             next_released_version = \"inctestpkg 1.2.4\"\n"
        );
    }

    #[test]
    fn test_replaces_previous_candidate() {
        let previous = Version::builder("inctestpkg", 1, 2, 3)
            .release_candidate(1)
            .build()
            .unwrap();
        let next = Version::new("inctestpkg", 1, 2, 3);
        let rewriter = rewriter(Some(&previous), &next);

        let single = b"x = VersionValue('inctestpkg', 1, 2, 3, release_candidate=1)\n";
        assert_eq!(
            rewriter.apply(single).unwrap(),
            b"x = VersionValue('inctestpkg', 1, 2, 3)\n".to_vec()
        );

        let double = b"x = VersionValue(\"inctestpkg\", 1, 2, 3, release_candidate=1)\n";
        assert_eq!(
            rewriter.apply(double).unwrap(),
            b"x = VersionValue('inctestpkg', 1, 2, 3)\n".to_vec()
        );
    }

    #[test]
    fn test_previous_release_is_left_alone() {
        let previous = Version::new("inctestpkg", 1, 2, 3);
        let next = Version::new("inctestpkg", 1, 2, 4);
        let content = b"x = VersionValue('inctestpkg', 1, 2, 3)\n";

        assert!(rewriter(Some(&previous), &next).apply(content).is_none());
    }

    #[test]
    fn test_unrelated_content_is_unchanged() {
        let next = Version::new("inctestpkg", 1, 2, 4);
        assert!(rewriter(None, &next).apply(b"NEXT otherpkg NEXT\n").is_none());
        assert!(rewriter(None, &next).apply(&[0xff, 0xfe, 0x00]).is_none());
    }

    #[test]
    fn test_package_name_is_lowercased_for_plain_marker() {
        let next = Version::new("IncTestPkg", 2, 0, 0);
        let rewriter = TreeRewriter::new("IncTestPkg", None, &next, CTOR).unwrap();
        let updated = rewriter.apply(b"inctestpkg NEXT").unwrap();
        assert_eq!(updated, b"inctestpkg 2.0.0".to_vec());
    }

    #[test]
    fn test_rewrite_tree_only_touches_changed_files() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("a.txt"), "released in inctestpkg NEXT").unwrap();
        fs::write(dir.path().join("b.txt"), "nothing to see").unwrap();

        let next = Version::new("inctestpkg", 1, 0, 0);
        let report = rewriter(None, &next).rewrite_tree(dir.path(), false).unwrap();

        assert_eq!(report.rewritten, vec![nested.join("a.txt")]);
        assert_eq!(report.scanned, 2);
        assert_eq!(
            fs::read_to_string(nested.join("a.txt")).unwrap(),
            "released in inctestpkg 1.0.0"
        );
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "nothing to see");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "inctestpkg NEXT").unwrap();

        let next = Version::new("inctestpkg", 1, 0, 0);
        let report = rewriter(None, &next).rewrite_tree(dir.path(), true).unwrap();

        assert_eq!(report.rewritten, vec![dir.path().join("a.txt")]);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "inctestpkg NEXT");
    }
}
