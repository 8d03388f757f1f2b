//! Shader Stage Definitions
//!
//! `ShaderStage` identifies which pipeline stage a source file targets. The
//! stage is never read from file contents; it is derived from the extension.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

/// Shader stage enumeration.
///
/// # Extension Mapping
///
/// | Stage | Extension | `glslc` stage name |
/// |-------|-----------|--------------------|
/// | `Vertex` | `.vert` | `vertex` |
/// | `Fragment` | `.frag` | `fragment` |
/// | `Compute` | `.comp` | `compute` |
///
/// Matching is exact: `shader.VERT` or `shader.vert.glsl` is not a shader
/// source as far as discovery is concerned.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShaderStage {
    /// Vertex shader (`.vert`).
    Vertex = 0,

    /// Fragment shader (`.frag`).
    Fragment = 1,

    /// Compute shader (`.comp`).
    Compute = 2,
}

impl ShaderStage {
    /// All recognized stages, in pipeline order.
    pub const ALL: [ShaderStage; 3] = [Self::Vertex, Self::Fragment, Self::Compute];

    /// File extension (without the dot) that selects this stage.
    #[inline]
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Compute => "comp",
        }
    }

    /// Lowercase stage name, used in logs and reports.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        }
    }

    /// Maps a bare extension to a stage.
    #[must_use]
    pub fn from_extension(ext: &OsStr) -> Option<Self> {
        let ext = ext.to_str()?;
        Self::ALL.into_iter().find(|stage| stage.extension() == ext)
    }

    /// Derives the stage from a path's final extension.
    #[inline]
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
