//! Shader Build Orchestrator
//!
//! Drives a batch: discover → plan → compile → report.
//!
//! # Failure Policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Compiler cannot be located | `from_settings` fails, nothing runs |
//! | Source directory missing | directory recorded as skipped, batch continues |
//! | Shader fails or times out | result recorded, batch continues |
//! | Compiler backend returns `Err` | run aborts, in-flight children are killed |
//!
//! # Concurrency
//!
//! Jobs are compiled on an ordered buffered stream: at most
//! [`ForgeSettings::jobs`] compiler processes exist at once, and results come
//! back in planning order whatever order they finish in.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use futures::{StreamExt, TryStreamExt, stream};
use spvforge_compiler::{Glslc, ShaderCompiler};
use spvforge_core::{
    CompileJob, CompileResult, ForgeSettings, Result, ShaderSourceFile, discover, discover_recursive,
    plan_job_in,
};
use tokio::runtime::Runtime;

use crate::report::{BuildReport, SkippedDirectory};

fn get_build_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create shader build runtime"))
}

/// Batch driver over a [`ShaderCompiler`] backend.
pub struct ShaderBuildOrchestrator<C = Glslc> {
    compiler: C,
    settings: ForgeSettings,
}

impl ShaderBuildOrchestrator<Glslc> {
    /// Validates `settings` and locates the compiler.
    ///
    /// Fails with `CompilerNotFound` before any directory is touched.
    pub fn from_settings(settings: ForgeSettings) -> Result<Self> {
        settings.validate()?;
        let compiler = Glslc::from_settings(&settings)?;
        Ok(Self::new(compiler, settings))
    }
}

impl<C: ShaderCompiler> ShaderBuildOrchestrator<C> {
    #[must_use]
    pub fn new(compiler: C, settings: ForgeSettings) -> Self {
        Self { compiler, settings }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ForgeSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Shader sources in `directory`, recursing only if configured to.
    pub fn discover(&self, directory: &Path) -> Result<Vec<ShaderSourceFile>> {
        if self.settings.recursive {
            discover_recursive(directory, &self.settings.output_dir_name)
        } else {
            discover(directory)
        }
    }

    /// Where `source` compiles to under the configured output directory name.
    #[must_use]
    pub fn plan_job(&self, source: &ShaderSourceFile) -> CompileJob {
        plan_job_in(source, &self.settings.output_dir_name)
    }

    /// Discovers and plans one directory, creating its output directories.
    pub fn plan_directory(&self, directory: &Path) -> Result<Vec<CompileJob>> {
        let jobs: Vec<CompileJob> = self.discover(directory)?.iter().map(|s| self.plan_job(s)).collect();

        let output_dirs: HashSet<&Path> = jobs.iter().map(CompileJob::output_dir).collect();
        for dir in output_dirs {
            std::fs::create_dir_all(dir)?;
        }
        Ok(jobs)
    }

    /// Runs a single job through the backend.
    pub async fn compile(&self, job: &CompileJob) -> Result<CompileResult> {
        self.compiler.compile(job).await
    }

    /// Compiles every shader in `directories`.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`Self::run_async`] there.
    pub fn run(&self, directories: &[PathBuf]) -> Result<BuildReport> {
        get_build_runtime().block_on(self.run_async(directories))
    }

    /// Compiles every shader in the configured directories.
    pub fn run_configured(&self) -> Result<BuildReport> {
        self.run(&self.settings.directories)
    }

    pub async fn run_async(&self, directories: &[PathBuf]) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let jobs = self.plan_all(directories, &mut report)?;

        log::info!(
            "Compiling {} shader(s) from {} director(y/ies), {} at a time",
            jobs.len(),
            directories.len() - report.skipped.len(),
            self.settings.jobs
        );

        report.results = stream::iter(&jobs)
            .map(|job| self.compiler.compile(job))
            .buffered(self.settings.jobs.max(1))
            .try_collect()
            .await?;

        log::info!(
            "{}/{} shader(s) compiled, {} failed",
            report.succeeded(),
            report.total(),
            report.failed_count()
        );
        Ok(report)
    }

    fn plan_all(&self, directories: &[PathBuf], report: &mut BuildReport) -> Result<Vec<CompileJob>> {
        let mut jobs = Vec::new();
        let mut seen = HashSet::new();

        for directory in directories {
            match self.plan_directory(directory) {
                Ok(planned) => {
                    if planned.is_empty() {
                        log::info!("No shaders in {}", directory.display());
                    }
                    // The same directory reached by two spellings must not race on one output file.
                    let root = std::fs::canonicalize(directory).unwrap_or_else(|_| directory.clone());
                    for job in planned {
                        let key = job
                            .output_path
                            .strip_prefix(directory)
                            .map_or_else(|_| job.output_path.clone(), |rel| root.join(rel));
                        if seen.insert(key) {
                            jobs.push(job);
                        } else {
                            log::debug!("Ignoring duplicate {}", job.input_path.display());
                        }
                    }
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    log::warn!("Skipping {}: {err}", directory.display());
                    report.skipped.push(SkippedDirectory {
                        path: directory.clone(),
                        error: err,
                    });
                }
            }
        }
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spvforge_core::{CompileStatus, ForgeError};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Copies the source to the output unless it contains `#error`.
    #[derive(Default)]
    struct CopyCompiler {
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ShaderCompiler for CopyCompiler {
        async fn compile(&self, job: &CompileJob) -> Result<CompileResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let started = Instant::now();
            tokio::time::sleep(self.delay).await;
            let source = tokio::fs::read_to_string(&job.input_path).await?;

            let (status, exit_code, stderr) = if source.contains("#error") {
                (CompileStatus::Failed, Some(1), format!("{}:1: error: forced", job.input_path.display()))
            } else {
                tokio::fs::write(&job.output_path, source).await?;
                (CompileStatus::Succeeded, Some(0), String::new())
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(CompileResult {
                job: job.clone(),
                status,
                exit_code,
                stderr,
                elapsed: started.elapsed(),
            })
        }
    }

    /// Always reports the compiler as gone.
    struct VanishedCompiler;

    impl ShaderCompiler for VanishedCompiler {
        async fn compile(&self, _job: &CompileJob) -> Result<CompileResult> {
            Err(ForgeError::CompilerNotFound("glslc".into()))
        }
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spvforge-build-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn settings(jobs: usize) -> ForgeSettings {
        ForgeSettings {
            jobs,
            ..Default::default()
        }
    }

    #[test]
    fn run_compiles_into_spv_sibling() {
        let dir = scratch_dir();
        for name in ["a.vert", "b.frag", "c.comp", "notes.txt"] {
            fs::write(dir.join(name), name).unwrap();
        }

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(2));
        let report = forge.run(&[dir.clone()]).unwrap();

        assert!(report.is_success());
        assert_eq!(report.total(), 3);
        for name in ["a.vert", "b.frag", "c.comp"] {
            assert!(dir.join("spv").join(format!("{name}.spv")).is_file(), "{name}");
        }
        assert!(!dir.join("spv/notes.txt.spv").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failures_do_not_abort_the_batch() {
        let dir = scratch_dir();
        fs::write(dir.join("good.vert"), "void main() {}").unwrap();
        fs::write(dir.join("bad.frag"), "#error nope").unwrap();

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(1));
        let report = forge.run(&[dir.clone()]).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(forge.compiler().calls.load(Ordering::SeqCst), 2);
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed[0].job.input_path, dir.join("bad.frag"));
        assert!(failed[0].stderr.contains("forced"));
        assert!(dir.join("spv/good.vert.spv").is_file());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_directory_is_skipped() {
        let root = scratch_dir();
        let present = root.join("present");
        fs::create_dir_all(&present).unwrap();
        fs::write(present.join("a.comp"), "").unwrap();

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(2));
        let report = forge.run(&[root.join("absent"), present.clone()]).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].error, ForgeError::DirectoryNotFound(_)));
        assert_eq!(report.exit_code(), 1);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn backend_error_aborts_the_run() {
        let dir = scratch_dir();
        fs::write(dir.join("a.vert"), "").unwrap();

        let forge = ShaderBuildOrchestrator::new(VanishedCompiler, settings(2));
        assert!(matches!(forge.run(&[dir.clone()]), Err(ForgeError::CompilerNotFound(_))));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn worker_count_bounds_concurrency() {
        let dir = scratch_dir();
        for i in 0..6 {
            fs::write(dir.join(format!("s{i}.comp")), "").unwrap();
        }

        let compiler = CopyCompiler {
            delay: Duration::from_millis(30),
            ..Default::default()
        };
        let forge = ShaderBuildOrchestrator::new(compiler, settings(2));
        let report = forge.run(&[dir.clone()]).unwrap();

        assert_eq!(report.succeeded(), 6);
        let peak = forge.compiler().peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak = {peak}");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn results_follow_planning_order() {
        let first = scratch_dir();
        let second = scratch_dir();
        fs::write(first.join("x.vert"), "").unwrap();
        fs::write(second.join("y.frag"), "").unwrap();

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(4));
        let report = forge.run(&[first.clone(), second.clone()]).unwrap();

        let inputs: Vec<_> = report.results.iter().map(|r| r.job.input_path.clone()).collect();
        assert_eq!(inputs, [first.join("x.vert"), second.join("y.frag")]);

        fs::remove_dir_all(first).unwrap();
        fs::remove_dir_all(second).unwrap();
    }

    #[test]
    fn duplicate_directories_compile_once() {
        let dir = scratch_dir();
        fs::write(dir.join("a.vert"), "").unwrap();

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(2));
        let report = forge.run(&[dir.clone(), dir.clone()]).unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(forge.compiler().calls.load(Ordering::SeqCst), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn differently_spelled_directories_compile_once() {
        let dir = scratch_dir();
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("a.vert"), "").unwrap();

        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings(2));
        let report = forge.run(&[dir.clone(), dir.join("sub/..")]).unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(forge.compiler().calls.load(Ordering::SeqCst), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn recursive_and_custom_output_dir() {
        let dir = scratch_dir();
        fs::create_dir_all(dir.join("post")).unwrap();
        fs::write(dir.join("post/bloom.frag"), "").unwrap();

        let settings = ForgeSettings {
            recursive: true,
            output_dir_name: "bin".into(),
            ..settings(1)
        };
        let forge = ShaderBuildOrchestrator::new(CopyCompiler::default(), settings);
        let report = forge.run(&[dir.clone()]).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert!(dir.join("post/bin/bloom.frag.spv").is_file());

        // Second run must not pick up anything from the output directory.
        let again = forge.run(&[dir.clone()]).unwrap();
        assert_eq!(again.total(), 1);

        fs::remove_dir_all(dir).unwrap();
    }
}
