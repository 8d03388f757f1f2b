//! Error Types
//!
//! This module defines the error type shared by every spvforge crate.
//!
//! # Overview
//!
//! [`ForgeError`] separates failures by how far they reach:
//! - Directory-level: [`ForgeError::DirectoryNotFound`] skips one source directory
//! - Environment-level: [`ForgeError::CompilerNotFound`] aborts the whole run
//! - Job-level: [`ForgeError::CompileFailure`] / [`ForgeError::CompileTimeout`]
//!   describe a single shader and are collected, never propagated
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ForgeError>`.
//!
//! ```rust,ignore
//! use spvforge_core::errors::{ForgeError, Result};
//!
//! fn scan() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The main error type for spvforge.
#[derive(Error, Debug)]
pub enum ForgeError {
    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// A configured source directory does not exist (or is not a directory).
    #[error("Shader directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The shader compiler executable could not be located.
    #[error("Shader compiler not found: {0}")]
    CompilerNotFound(String),

    // ========================================================================
    // Per-Job Errors
    // ========================================================================
    /// The compiler exited with a non-zero status.
    #[error("Failed to compile {}: {}", .path.display(), describe_exit(.exit_code.as_ref()))]
    CompileFailure {
        /// Shader source that failed
        path: PathBuf,
        /// Exit code, `None` when terminated by a signal
        exit_code: Option<i32>,
        /// Captured standard error of the compiler
        stderr: String,
    },

    /// The compiler did not finish within the configured bound.
    #[error("Compiling {} timed out after {:.1}s", .path.display(), .timeout.as_secs_f32())]
    CompileTimeout {
        /// Shader source that timed out
        path: PathBuf,
        /// How long the compiler ran before it was killed
        timeout: Duration,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A setting or command-line value is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn describe_exit(code: Option<&i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ForgeError {
    /// Returns `true` for errors that make every remaining job pointless.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CompilerNotFound(_) | Self::InvalidConfig(_) | Self::ConfigParse(_))
    }
}

/// Alias for `Result<T, ForgeError>`.
pub type Result<T> = std::result::Result<T, ForgeError>;
