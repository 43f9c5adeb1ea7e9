//! Finds a package's directory in a source checkout.

use std::path::{Path, PathBuf};

use crate::error::{IncrementalError, Result};

/// Resolves the root directory of `package` under `cwd`.
///
/// Checks `<cwd>/src/<package>` then `<cwd>/<package>`, always with the
/// package name lower cased.
///
/// # Errors
/// [`IncrementalError::PackageNotFound`] naming both candidates when neither
/// is a directory.
pub fn find_package_root(cwd: &Path, package: &str) -> Result<PathBuf> {
    let dir_name = package.to_lowercase();
    let src_candidate = cwd.join("src").join(&dir_name);
    let plain_candidate = cwd.join(&dir_name);

    if src_candidate.is_dir() {
        tracing::debug!(root = %src_candidate.display(), "found package in src layout");
        return Ok(src_candidate);
    }
    if plain_candidate.is_dir() {
        tracing::debug!(root = %plain_candidate.display(), "found package in flat layout");
        return Ok(plain_candidate);
    }

    Err(IncrementalError::PackageNotFound {
        package: package.to_string(),
        src_candidate,
        plain_candidate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_src_layout() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src").join("inctestpkg")).unwrap();
        fs::create_dir_all(dir.path().join("inctestpkg")).unwrap();

        let root = find_package_root(dir.path(), "inctestpkg").unwrap();
        assert_eq!(root, dir.path().join("src").join("inctestpkg"));
    }

    #[test]
    fn test_falls_back_to_flat_layout() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("inctestpkg")).unwrap();

        let root = find_package_root(dir.path(), "inctestpkg").unwrap();
        assert_eq!(root, dir.path().join("inctestpkg"));
    }

    #[test]
    fn test_lowercases_package_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("inctestpkg")).unwrap();

        let root = find_package_root(dir.path(), "IncTestPkg").unwrap();
        assert_eq!(root, dir.path().join("inctestpkg"));
    }

    #[test]
    fn test_plain_file_is_not_a_package() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inctestpkg"), b"not a dir").unwrap();

        assert!(find_package_root(dir.path(), "inctestpkg").is_err());
    }

    #[test]
    fn test_not_found_names_both_candidates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("srca").join("inctestpkg")).unwrap();

        match find_package_root(dir.path(), "inctestpkg") {
            Err(IncrementalError::PackageNotFound {
                src_candidate,
                plain_candidate,
                ..
            }) => {
                assert_eq!(src_candidate, dir.path().join("src").join("inctestpkg"));
                assert_eq!(plain_candidate, dir.path().join("inctestpkg"));
            }
            other => panic!("expected PackageNotFound, got {:?}", other),
        }
    }
}
