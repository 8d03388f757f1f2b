#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # spvforge
//!
//! Batch-compiles GLSL shader sources (`.vert`, `.frag`, `.comp`) with an
//! external compiler (`glslc` by default), writing `<dir>/spv/<name>.spv`.
//!
//! ```rust,ignore
//! use spvforge::{ForgeSettings, ShaderBuildOrchestrator};
//!
//! let forge = ShaderBuildOrchestrator::from_settings(ForgeSettings {
//!     directories: vec!["shaders".into()],
//!     ..Default::default()
//! })?;
//! let report = forge.run_configured()?;
//! println!("{report}");
//! std::process::exit(report.exit_code());
//! ```

pub mod cli;

pub use spvforge_build as build;
pub use spvforge_compiler as compiler;
pub use spvforge_core as core;

pub use spvforge_build::{BuildReport, ShaderBuildOrchestrator, SkippedDirectory};
pub use spvforge_compiler::{CompilerLocator, Glslc, ShaderCompiler};
pub use spvforge_core::errors::{ForgeError, Result};
pub use spvforge_core::{
    CompileJob, CompileResult, CompileStatus, ForgeSettings, ShaderSourceFile, ShaderStage, discover,
    plan_job,
};
