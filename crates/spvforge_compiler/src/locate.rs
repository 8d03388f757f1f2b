//! Compiler discovery.
//!
//! Resolution order:
//!
//! 1. The requested compiler (`--compiler`, `SHADERC_PATH`, or the settings
//!    file). A path must point at an executable; a directory must contain
//!    `glslc`; a bare name is searched on `PATH`. Nothing else is tried,
//!    except that a bare `glslc` is treated as no request at all.
//! 2. `glslc` on `PATH`.
//! 3. `glslc` inside the Vulkan SDK (`$VULKAN_SDK/bin`, `$VULKAN_SDK/Bin`).

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use spvforge_core::{ForgeError, Result};

/// Compiler used when none is requested.
pub const DEFAULT_COMPILER: &str = "glslc";

/// Finds the compiler executable before any job runs.
#[derive(Debug, Clone, Default)]
pub struct CompilerLocator {
    requested: Option<PathBuf>,
    path_var: Option<OsString>,
    vulkan_sdk: Option<OsString>,
}

impl CompilerLocator {
    /// A locator with no search path; see [`Self::from_env`].
    #[must_use]
    pub fn new(requested: Option<PathBuf>) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    /// A locator searching the process `PATH` and `VULKAN_SDK`.
    #[must_use]
    pub fn from_env(requested: Option<PathBuf>) -> Self {
        Self {
            requested,
            path_var: env::var_os("PATH"),
            vulkan_sdk: env::var_os("VULKAN_SDK"),
        }
    }

    #[must_use]
    pub fn with_path_var(mut self, path_var: Option<OsString>) -> Self {
        self.path_var = path_var;
        self
    }

    #[must_use]
    pub fn with_vulkan_sdk(mut self, vulkan_sdk: Option<OsString>) -> Self {
        self.vulkan_sdk = vulkan_sdk;
        self
    }

    /// Resolves the compiler to an executable path.
    pub fn locate(&self) -> Result<PathBuf> {
        let found = match self.requested.as_deref() {
            Some(requested) if requested.as_os_str() != DEFAULT_COMPILER => self.resolve_requested(requested),
            _ => self
                .search_path(OsStr::new(DEFAULT_COMPILER))
                .or_else(|| self.search_vulkan_sdk()),
        };

        match found {
            Some(path) => {
                log::debug!("Using shader compiler: {}", path.display());
                Ok(path)
            }
            None => Err(ForgeError::CompilerNotFound(self.describe_miss())),
        }
    }

    fn resolve_requested(&self, requested: &Path) -> Option<PathBuf> {
        if requested.is_dir() {
            let candidate = requested.join(executable_name(OsStr::new(DEFAULT_COMPILER)));
            return is_executable(&candidate).then_some(candidate);
        }
        if is_bare_name(requested) {
            return self.search_path(requested.as_os_str());
        }
        is_executable(requested).then(|| requested.to_path_buf())
    }

    fn search_path(&self, name: &OsStr) -> Option<PathBuf> {
        let path_var = self.path_var.as_ref()?;
        let name = executable_name(name);
        env::split_paths(path_var)
            .map(|dir| dir.join(&name))
            .find(|candidate| is_executable(candidate))
    }

    fn search_vulkan_sdk(&self) -> Option<PathBuf> {
        let sdk = PathBuf::from(self.vulkan_sdk.as_ref()?);
        let name = executable_name(OsStr::new(DEFAULT_COMPILER));
        ["bin", "Bin"]
            .into_iter()
            .map(|sub| sdk.join(sub).join(&name))
            .find(|candidate| is_executable(candidate))
    }

    fn describe_miss(&self) -> String {
        match self.requested.as_deref() {
            Some(requested) if requested.as_os_str() != DEFAULT_COMPILER => {
                format!("{} is not an executable", requested.display())
            }
            _ => format!(
                "`{DEFAULT_COMPILER}` is not on PATH or under VULKAN_SDK. \
                 Install the Vulkan SDK, or point SHADERC_PATH / --compiler at glslc"
            ),
        }
    }
}

fn is_bare_name(path: &Path) -> bool {
    path.parent().is_none_or(|parent| parent.as_os_str().is_empty())
}

fn executable_name(name: &OsStr) -> OsString {
    let mut name = name.to_os_string();
    if !env::consts::EXE_SUFFIX.is_empty() && Path::new(&name).extension().is_none() {
        name.push(env::consts::EXE_SUFFIX);
    }
    name
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
