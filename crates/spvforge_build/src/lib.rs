//! Batch orchestration for spvforge.
//!
//! [`ShaderBuildOrchestrator`] turns a list of source directories into a
//! [`BuildReport`]; see the `orchestrator` module for the failure policy.

pub mod orchestrator;
pub mod report;

pub use orchestrator::ShaderBuildOrchestrator;
pub use report::{BuildReport, SkippedDirectory};
