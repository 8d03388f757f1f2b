//! Shader source discovery.
//!
//! Lists a directory and keeps the entries whose extension names a
//! [`ShaderStage`]. Nothing is cached; every call reads the filesystem again.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{ForgeError, Result};
use crate::stage::ShaderStage;

/// A shader source file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSourceFile {
    path: PathBuf,
    stage: ShaderStage,
}

impl ShaderSourceFile {
    /// Builds a source file from a path, or `None` if the extension is not a
    /// recognized shader stage.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stage = ShaderStage::from_path(&path)?;
        Some(Self { path, stage })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// File name including the stage extension, e.g. `blur.comp`.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        // from_path guarantees an extension, which implies a file name
        self.path.file_name().unwrap_or_default()
    }

    /// Directory the source lives in.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}

/// Lists the immediate shader sources of `directory`.
///
/// Order follows the directory listing; no sorting is applied.
pub fn discover(directory: impl AsRef<Path>) -> Result<Vec<ShaderSourceFile>> {
    scan(directory.as_ref(), 1, None)
}

/// Lists shader sources of `directory` and all of its subdirectories.
///
/// Subdirectories named `output_dir_name` are not entered, so compiled
/// artifacts from earlier runs never show up as inputs.
pub fn discover_recursive(
    directory: impl AsRef<Path>,
    output_dir_name: &str,
) -> Result<Vec<ShaderSourceFile>> {
    scan(directory.as_ref(), usize::MAX, Some(output_dir_name))
}

fn scan(directory: &Path, max_depth: usize, skip_dir: Option<&str>) -> Result<Vec<ShaderSourceFile>> {
    if !directory.is_dir() {
        return Err(ForgeError::DirectoryNotFound(directory.to_path_buf()));
    }

    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && skip_dir.is_some_and(|name| entry.file_name() == OsStr::new(name)))
        });

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        // Follows symlinked files; WalkDir itself does not.
        if !entry.path().is_file() {
            continue;
        }
        if let Some(source) = ShaderSourceFile::from_path(entry.into_path()) {
            log::trace!("Discovered {} shader {}", source.stage, source.path.display());
            sources.push(source);
        }
    }

    log::debug!("Found {} shader(s) in {}", sources.len(), directory.display());
    Ok(sources)
}
