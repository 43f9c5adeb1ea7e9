//! Main workflow orchestration logic
//!
//! Keeps the update workflow out of `main.rs` so it can be driven without
//! clap, with an explicit working directory and date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::Version;
use crate::error::Result;
use crate::locator::find_package_root;
use crate::planner::{BumpFlags, BumpMode, BumpPlanner};
use crate::rewriter::{RewriteReport, TreeRewriter};
use crate::store::VersionStore;

/// Arguments for the update workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    /// Package name as given by the user
    pub package: String,

    /// Package root, bypassing the lookup under `cwd`
    pub path: Option<PathBuf>,

    /// Requested bump
    pub flags: BumpFlags,

    /// Report what would change without writing anything
    pub dry_run: bool,

    /// Directory the package is searched from
    pub cwd: PathBuf,

    /// Date used for calendar versions
    pub today: NaiveDate,
}

/// Result of a successful update
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Package root that was rewritten
    pub root: PathBuf,

    /// Version recorded before the update, if it was read
    pub previous: Option<Version>,

    /// The new version
    pub next: Version,

    /// Files rewritten by the tree pass
    pub report: RewriteReport,

    /// Version file written; `None` on a dry run
    pub artifact_path: Option<PathBuf>,

    /// Non-fatal issues to show the user
    pub warnings: Vec<BoundaryWarning>,
}

fn resolve_root(package: &str, path: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match path {
        Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
        Some(path) => Ok(cwd.join(path)),
        None => find_package_root(cwd, package),
    }
}

/// Main update workflow
///
/// 1. Validate the bump flags
/// 2. Locate the package root
/// 3. Read the recorded version when the bump needs it
/// 4. Plan the next version
/// 5. Rewrite references across the package
/// 6. Write the version file
///
/// Flag conflicts are reported before any file is touched.
pub fn run_update(args: &UpdateArgs, config: &Config) -> Result<UpdateOutcome> {
    let mode = args.flags.validate()?;
    let root = resolve_root(&args.package, args.path.as_deref(), &args.cwd)?;
    let store = VersionStore::new(config.artifact.clone());
    let mut warnings = Vec::new();

    let existing = if mode.needs_existing() {
        let call = store.read(&root)?;
        if call.used_prerelease_alias {
            warnings.push(BoundaryWarning::DeprecatedPrereleaseField {
                path: store.path(&root),
            });
        }
        Some(call.version)
    } else {
        None
    };

    let planner = BumpPlanner::new(args.today, config.calendar.epoch_year);
    let plan = planner.plan(&args.package, &mode, existing)?;

    // Dev releases sort below their base on purpose, so only explicit
    // versions are checked for going backwards.
    if let (BumpMode::Explicit(_), Some(previous)) = (&mode, &plan.previous) {
        if !plan.moves_forward() {
            warnings.push(BoundaryWarning::VersionNotNewer {
                previous: previous.public(),
                next: plan.next.public(),
            });
        }
    }

    tracing::info!(
        package = %args.package,
        root = %root.display(),
        next = %plan.next.public(),
        dry_run = args.dry_run,
        "updating package"
    );

    let rewriter = TreeRewriter::new(
        &args.package,
        plan.previous.as_ref(),
        &plan.next,
        &store.artifact().constructor,
    )?;
    let report = rewriter.rewrite_tree(&root, args.dry_run)?;

    let artifact = store.path(&root);
    if !report.rewritten.iter().any(|path| path != &artifact) {
        warnings.push(BoundaryWarning::NoReferencesUpdated {
            package: args.package.clone(),
        });
    }

    let artifact_path = if args.dry_run {
        None
    } else {
        Some(store.save(&root, &args.package, &plan.next)?)
    };

    Ok(UpdateOutcome {
        root,
        previous: plan.previous,
        next: plan.next,
        report,
        artifact_path,
        warnings,
    })
}

/// Returns the public version string recorded for `package`.
///
/// This is what packaging tools read to fill in a distribution's version.
pub fn show_version(
    package: &str,
    path: Option<&Path>,
    cwd: &Path,
    config: &Config,
) -> Result<String> {
    let root = resolve_root(package, path, cwd)?;
    let store = VersionStore::new(config.artifact.clone());
    Ok(store.load(&root)?.public())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IncrementalError;
    use std::fs;
    use tempfile::TempDir;

    fn args(cwd: &Path, flags: BumpFlags) -> UpdateArgs {
        UpdateArgs {
            package: "inctestpkg".to_string(),
            path: None,
            flags,
            dry_run: false,
            cwd: cwd.to_path_buf(),
            today: NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
        }
    }

    #[test]
    fn test_conflicting_flags_fail_before_lookup() {
        let dir = TempDir::new().unwrap();
        let flags = BumpFlags {
            create: true,
            dev: true,
            ..Default::default()
        };

        let err = run_update(&args(dir.path(), flags), &Config::default()).unwrap_err();
        assert!(matches!(err, IncrementalError::InvalidCombination { .. }));
    }

    #[test]
    fn test_relative_path_is_joined_to_cwd() {
        let dir = TempDir::new().unwrap();
        let root = resolve_root("x", Some(Path::new("lib/x")), dir.path()).unwrap();
        assert_eq!(root, dir.path().join("lib").join("x"));
    }

    #[test]
    fn test_warns_when_nothing_references_the_version() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("inctestpkg")).unwrap();
        let flags = BumpFlags {
            create: true,
            ..Default::default()
        };

        let outcome = run_update(&args(dir.path(), flags), &Config::default()).unwrap();
        assert!(outcome.warnings.contains(&BoundaryWarning::NoReferencesUpdated {
            package: "inctestpkg".to_string()
        }));
    }

    #[test]
    fn test_explicit_older_version_warns() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("inctestpkg");
        fs::create_dir_all(&root).unwrap();
        VersionStore::new(Config::default().artifact)
            .save(&root, "inctestpkg", &Version::new("inctestpkg", 2, 0, 0))
            .unwrap();

        let flags = BumpFlags {
            newversion: Some("1.0.0".to_string()),
            ..Default::default()
        };
        let outcome = run_update(&args(dir.path(), flags), &Config::default()).unwrap();
        assert!(outcome.warnings.contains(&BoundaryWarning::VersionNotNewer {
            previous: "2.0.0".to_string(),
            next: "1.0.0".to_string(),
        }));
    }

    #[test]
    fn test_show_version() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("inctestpkg");
        fs::create_dir_all(&root).unwrap();
        let version = Version::builder("inctestpkg", 1, 2, 3)
            .release_candidate(4)
            .build()
            .unwrap();
        VersionStore::new(Config::default().artifact)
            .save(&root, "inctestpkg", &version)
            .unwrap();

        let shown = show_version("inctestpkg", None, dir.path(), &Config::default()).unwrap();
        assert_eq!(shown, "1.2.3rc4");
    }
}
