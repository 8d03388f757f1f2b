//! Build Report
//!
//! The summary of one run: every compile result in planning order plus the
//! directories that could not be scanned. `Display` renders the text the CLI
//! prints after a build.

use std::fmt;
use std::path::{Path, PathBuf};

use spvforge_core::{CompileResult, ForgeError};

/// A source directory excluded from the run.
#[derive(Debug)]
pub struct SkippedDirectory {
    pub path: PathBuf,
    pub error: ForgeError,
}

/// Outcome of [`ShaderBuildOrchestrator::run`](crate::ShaderBuildOrchestrator::run).
#[derive(Debug, Default)]
pub struct BuildReport {
    /// One entry per planned job, in planning order.
    pub results: Vec<CompileResult>,
    pub skipped: Vec<SkippedDirectory>,
}

impl BuildReport {
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CompileResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Artifacts written by successful jobs.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.job.output_path.as_path())
    }

    /// `true` when every job compiled and every directory was scanned.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.skipped.is_empty()
    }

    /// Process exit code for this report: 0 on success, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for skipped in &self.skipped {
            writeln!(f, "skipped {}: {}", skipped.path.display(), skipped.error)?;
        }

        for result in self.failed() {
            if let Some(error) = result.error() {
                writeln!(f, "{error}")?;
            }
            for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
                writeln!(f, "    {line}")?;
            }
        }

        write!(
            f,
            "{}/{} shader(s) compiled, {} failed",
            self.succeeded(),
            self.total(),
            self.failed_count()
        )?;
        if !self.skipped.is_empty() {
            write!(f, ", {} director(y/ies) skipped", self.skipped.len())?;
        }
        Ok(())
    }
}
