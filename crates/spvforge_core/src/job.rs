//! Compile job planning.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::settings::DEFAULT_OUTPUT_DIR;
use crate::source::ShaderSourceFile;
use crate::stage::ShaderStage;

/// Extension appended to every compiled artifact.
pub const SPIRV_EXTENSION: &str = "spv";

/// One compiler invocation: a source file and where its SPIR-V goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompileJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub stage: ShaderStage,
}

impl CompileJob {
    /// Directory that must exist before the compiler runs.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output_path.parent().unwrap_or(Path::new(""))
    }
}

/// Plans a job writing into the conventional `spv` sibling directory.
///
/// `shaders/blur.comp` becomes `shaders/spv/blur.comp.spv`.
#[must_use]
pub fn plan_job(source: &ShaderSourceFile) -> CompileJob {
    plan_job_in(source, DEFAULT_OUTPUT_DIR)
}

/// Plans a job writing into `<source dir>/<output_dir_name>/<file name>.spv`.
///
/// Pure path arithmetic; the filesystem is not touched.
#[must_use]
pub fn plan_job_in(source: &ShaderSourceFile, output_dir_name: &str) -> CompileJob {
    let mut artifact = OsString::from(source.file_name());
    artifact.push(".");
    artifact.push(SPIRV_EXTENSION);

    CompileJob {
        input_path: source.path().to_path_buf(),
        output_path: source.directory().join(output_dir_name).join(artifact),
        stage: source.stage(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str) -> ShaderSourceFile {
        ShaderSourceFile::from_path(path).unwrap()
    }

    #[test]
    fn output_goes_to_spv_sibling() {
        let job = plan_job(&source("shaders/a.vert"));
        assert_eq!(job.input_path, Path::new("shaders/a.vert"));
        assert_eq!(job.output_path, Path::new("shaders/spv/a.vert.spv"));
        assert_eq!(job.output_dir(), Path::new("shaders/spv"));
        assert_eq!(job.stage, ShaderStage::Vertex);
    }

    #[test]
    fn planning_is_deterministic() {
        let src = source("/abs/dir/lighting.comp");
        assert_eq!(plan_job(&src), plan_job(&src));
        assert_eq!(plan_job(&src).output_path, Path::new("/abs/dir/spv/lighting.comp.spv"));
    }

    #[test]
    fn bare_file_name_plans_relative_output() {
        let job = plan_job(&source("quad.frag"));
        assert_eq!(job.output_path, Path::new("spv/quad.frag.spv"));
    }

    #[test]
    fn custom_output_dir_name() {
        let job = plan_job_in(&source("shaders/my shader.frag"), "bin");
        assert_eq!(job.output_path, Path::new("shaders/bin/my shader.frag.spv"));
    }
}
