//! Core types for spvforge.
//!
//! - [`ShaderStage`] / [`ShaderSourceFile`]: what was found on disk
//! - [`CompileJob`]: where a source compiles to
//! - [`CompileResult`]: what the compiler said
//! - [`ForgeSettings`]: how a run is configured
//! - [`ForgeError`]: everything that can go wrong

pub mod errors;
pub mod job;
pub mod result;
pub mod settings;
pub mod source;
pub mod stage;

pub use errors::{ForgeError, Result};
pub use job::{CompileJob, plan_job, plan_job_in};
pub use result::{CompileResult, CompileStatus};
pub use settings::ForgeSettings;
pub use source::{ShaderSourceFile, discover, discover_recursive};
pub use stage::ShaderStage;
