use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use spvforge_core::{CompileJob, CompileResult, CompileStatus, ForgeError, ForgeSettings, Result};
use tokio::process::Command;

use crate::locate::CompilerLocator;

/// Shader compiler backend.
///
/// A returned `Err` means the environment is broken (the compiler vanished,
/// the output directory cannot be created) and the run should stop. A shader
/// that fails to compile is an `Ok` result with a failed status.
pub trait ShaderCompiler: Send + Sync {
    /// Compiles one job, writing or overwriting `job.output_path`.
    fn compile(&self, job: &CompileJob) -> impl Future<Output = Result<CompileResult>> + Send;
}

/// `glslc` (or any compiler with the same command line) run as a subprocess.
///
/// Invocation: `<executable> [extra_args...] <input_path> -o <output_path>`.
#[derive(Debug, Clone)]
pub struct Glslc {
    executable: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl Glslc {
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: Duration::from_secs(spvforge_core::settings::DEFAULT_TIMEOUT_SECS),
            extra_args: Vec::new(),
        }
    }

    /// Locates the compiler named by `settings` and applies its options.
    pub fn from_settings(settings: &ForgeSettings) -> Result<Self> {
        let executable = CompilerLocator::from_env(settings.compiler.clone()).locate()?;
        Ok(Self::new(executable)
            .with_timeout(settings.timeout())
            .with_extra_args(settings.extra_args.iter().cloned()))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The command for `job`. Arguments are passed as-is, never via a shell.
    #[must_use]
    pub fn command(&self, job: &CompileJob) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.extra_args)
            .arg(&job.input_path)
            .arg("-o")
            .arg(&job.output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn spawn_error(&self, err: io::Error) -> ForgeError {
        if err.kind() == io::ErrorKind::NotFound {
            ForgeError::CompilerNotFound(format!("{} could not be started: {err}", self.executable.display()))
        } else {
            ForgeError::IoError(err)
        }
    }
}

impl ShaderCompiler for Glslc {
    async fn compile(&self, job: &CompileJob) -> Result<CompileResult> {
        tokio::fs::create_dir_all(job.output_dir()).await?;

        let mut command = self.command(job);
        log::debug!("Running {:?}", command.as_std());

        let started = Instant::now();
        let child = command.spawn().map_err(|e| self.spawn_error(e))?;

        // On timeout the pending future drops the child, and kill_on_drop ends it.
        let Ok(output) = tokio::time::timeout(self.timeout, child.wait_with_output()).await else {
            log::warn!(
                "{} timed out after {}s, killed",
                job.input_path.display(),
                self.timeout.as_secs_f32()
            );
            return Ok(CompileResult {
                job: job.clone(),
                status: CompileStatus::TimedOut,
                exit_code: None,
                stderr: String::new(),
                elapsed: started.elapsed(),
            });
        };
        let output = output?;
        let elapsed = started.elapsed();

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.stdout.is_empty() {
            log::debug!("{} stdout: {}", job.input_path.display(), String::from_utf8_lossy(&output.stdout));
        }

        let status = if output.status.success() {
            if stderr.trim().is_empty() {
                log::info!("Compiled {} -> {}", job.input_path.display(), job.output_path.display());
            } else {
                log::warn!("{}: {}", job.input_path.display(), stderr.trim_end());
            }
            CompileStatus::Succeeded
        } else {
            log::warn!("FAILED {}: {}", job.input_path.display(), stderr.trim_end());
            CompileStatus::Failed
        };

        Ok(CompileResult {
            job: job.clone(),
            status,
            exit_code: output.status.code(),
            stderr,
            elapsed,
        })
    }
}
