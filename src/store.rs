//! The generated version file of a package.
//!
//! The file is a tiny Python module binding `__version__` to a constructor
//! call. It is read with a dedicated parser, never executed, and always
//! written back in full.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ArtifactConfig;
use crate::domain::{ParsedCall, Version};
use crate::error::{IncrementalError, Result};

const BINDING: &str = "__version__";

/// Reads and writes the generated version file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    artifact: ArtifactConfig,
}

impl VersionStore {
    pub fn new(artifact: ArtifactConfig) -> Self {
        VersionStore { artifact }
    }

    pub fn artifact(&self) -> &ArtifactConfig {
        &self.artifact
    }

    /// Location of the version file under a package root.
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.artifact.file_name)
    }

    /// Loads the recorded version.
    ///
    /// # Errors
    /// * [`IncrementalError::MissingArtifact`] if the file does not exist
    /// * [`IncrementalError::InvalidConstruction`] if it holds no readable binding
    pub fn load(&self, root: &Path) -> Result<Version> {
        Ok(self.read(root)?.version)
    }

    /// Like [`VersionStore::load`] but keeps details of how the call was written.
    pub fn read(&self, root: &Path) -> Result<ParsedCall> {
        let path = self.path(root);
        if !path.is_file() {
            return Err(IncrementalError::MissingArtifact { path });
        }

        let content = fs::read_to_string(&path)?;
        let call = parse_binding(&content).map_err(|e| match e {
            IncrementalError::InvalidConstruction(msg) => {
                IncrementalError::invalid(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            version = %call.version.public(),
            "loaded recorded version"
        );
        Ok(call)
    }

    /// Renders the full file content for `version`.
    pub fn render(&self, package: &str, version: &Version) -> String {
        format!(
            "# This file is auto-generated! Do not edit!\n\
             # Use `{invocation} {package}` to change this file.\n\
             \n\
             {import}\n\
             \n\
             {binding} = {repr}\n\
             __all__ = [\"{binding}\"]\n",
            invocation = self.artifact.invocation,
            package = package,
            import = self.artifact.import_line,
            binding = BINDING,
            repr = version.repr_with(&self.artifact.constructor),
        )
    }

    /// Overwrites the version file with the full template.
    pub fn save(&self, root: &Path, package: &str, version: &Version) -> Result<PathBuf> {
        let path = self.path(root);
        fs::write(&path, self.render(package, version))?;
        tracing::info!(path = %path.display(), version = %version.public(), "wrote version file");
        Ok(path)
    }
}

/// Finds the `__version__ = Ctor(...)` line and parses its right-hand side.
fn parse_binding(content: &str) -> Result<ParsedCall> {
    for line in content.lines() {
        let Some(rest) = line.trim_start().strip_prefix(BINDING) else {
            continue;
        };
        let Some(value) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        return crate::domain::repr::parse_call(value);
    }

    Err(IncrementalError::invalid(format!(
        "no `{} = ...` binding found",
        BINDING
    )))
}
