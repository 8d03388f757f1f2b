//! Shader compiler backends for spvforge.
//!
//! [`CompilerLocator`] resolves which executable to run; [`Glslc`] runs it
//! once per [`CompileJob`](spvforge_core::CompileJob) with a bounded timeout.
//! Anything else that can turn a job into a result can plug in through
//! [`ShaderCompiler`].

pub mod invoke;
pub mod locate;

pub use invoke::{Glslc, ShaderCompiler};
pub use locate::{CompilerLocator, DEFAULT_COMPILER};
