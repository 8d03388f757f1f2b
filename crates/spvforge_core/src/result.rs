//! Compile results.

use std::time::Duration;

use crate::errors::ForgeError;
use crate::job::CompileJob;

/// How a single compiler invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileStatus {
    /// Exit code 0.
    Succeeded,
    /// Non-zero exit code, or terminated by a signal.
    Failed,
    /// Killed after exceeding the per-job timeout.
    TimedOut,
}

/// Outcome of running one [`CompileJob`].
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub job: CompileJob,
    pub status: CompileStatus,
    /// `None` when the process did not exit on its own.
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CompileResult {
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == CompileStatus::Succeeded
    }

    /// The job-level error this result represents, if any.
    #[must_use]
    pub fn error(&self) -> Option<ForgeError> {
        match self.status {
            CompileStatus::Succeeded => None,
            CompileStatus::Failed => Some(ForgeError::CompileFailure {
                path: self.job.input_path.clone(),
                exit_code: self.exit_code,
                stderr: self.stderr.clone(),
            }),
            CompileStatus::TimedOut => Some(ForgeError::CompileTimeout {
                path: self.job.input_path.clone(),
                timeout: self.elapsed,
            }),
        }
    }
}
