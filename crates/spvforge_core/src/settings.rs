//! Build Settings
//!
//! [`ForgeSettings`] is everything a run needs to know up front: which
//! directories to scan, which compiler to call, and how hard to push it.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults ([`ForgeSettings::default`])
//! 2. A TOML settings file (`spvforge.toml` unless told otherwise)
//! 3. The `SHADERC_PATH` environment variable
//! 4. Command-line flags (applied by the binary)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use spvforge_core::ForgeSettings;
//!
//! // Defaults: conventional directories, `glslc` from PATH, 30s timeout
//! let settings = ForgeSettings::default();
//!
//! // A single directory compiled strictly one file at a time
//! let settings = ForgeSettings {
//!     directories: vec!["assets/shaders".into()],
//!     jobs: 1,
//!     ..Default::default()
//! };
//! ```
//!
//! # File Format
//!
//! ```toml
//! directories = ["scanline/compute", "scanline/surface", "common"]
//! compiler = "/opt/vulkan/bin/glslc"
//! timeout_secs = 60
//! jobs = 4
//! recursive = false
//! output_dir_name = "spv"
//! extra_args = ["--target-env=vulkan1.2"]
//! ```

use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{ForgeError, Result};

/// Name of the directory that receives compiled artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "spv";

/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "spvforge.toml";

/// Environment variable overriding the compiler location.
pub const SHADERC_PATH_ENV: &str = "SHADERC_PATH";

/// Per-job timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source directories scanned when none are given.
pub const DEFAULT_DIRECTORIES: [&str; 3] = ["scanline/compute", "scanline/surface", "common"];

/// Configuration for one build run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeSettings {
    /// Source directories, scanned in order. Relative entries resolve against
    /// the settings file's directory, or the working directory without one.
    pub directories: Vec<PathBuf>,

    /// Compiler executable name or path. `None` means `glslc`, searched on
    /// `PATH` and then under `VULKAN_SDK`.
    pub compiler: Option<PathBuf>,

    /// Upper bound on a single compiler invocation, in seconds.
    pub timeout_secs: u64,

    /// Maximum number of compiler processes alive at once.
    pub jobs: usize,

    /// Descend into subdirectories of each source directory.
    pub recursive: bool,

    /// Name of the per-directory output folder.
    pub output_dir_name: String,

    /// Arguments passed to the compiler ahead of the input path.
    pub extra_args: Vec<String>,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            directories: DEFAULT_DIRECTORIES.iter().map(PathBuf::from).collect(),
            compiler: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            jobs: default_jobs(),
            recursive: false,
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            extra_args: Vec::new(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

impl ForgeSettings {
    /// Parses settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a settings file.
    ///
    /// Relative source directories, including the built-in defaults, are
    /// taken relative to the file's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded settings from {}", path.display());
        let mut settings = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent().filter(|base| !base.as_os_str().is_empty()) {
            settings.resolve_directories(base);
        }
        Ok(settings)
    }

    /// Joins every relative source directory onto `base`.
    pub fn resolve_directories(&mut self, base: &Path) {
        for directory in &mut self.directories {
            if directory.is_relative() {
                *directory = base.join(&*directory);
            }
        }
    }

    /// Loads `explicit` if given; otherwise `spvforge.toml` from the working
    /// directory if it exists; otherwise the defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            return Self::load(implicit);
        }
        Ok(Self::default())
    }

    /// Applies a `SHADERC_PATH` value. Empty values are ignored.
    pub fn apply_shaderc_path(&mut self, value: Option<OsString>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            log::debug!("{SHADERC_PATH_ENV} overrides compiler: {}", value.to_string_lossy());
            self.compiler = Some(PathBuf::from(value));
        }
    }

    /// Applies overrides taken from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_shaderc_path(std::env::var_os(SHADERC_PATH_ENV));
    }

    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(ForgeError::InvalidConfig("jobs must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ForgeError::InvalidConfig("timeout_secs must be greater than 0".into()));
        }
        let mut components = Path::new(&self.output_dir_name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(ForgeError::InvalidConfig(format!(
                "output_dir_name must be a plain directory name, got {:?}",
                self.output_dir_name
            )));
        }
        Ok(())
    }
}
