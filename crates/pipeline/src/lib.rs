//! # niagate-pipeline
//!
//! Orchestrates one guarded request: input classification, curriculum
//! resolution, prompt assembly, the completion call and output
//! sanitization.

pub mod pipeline;
pub mod prompt;
pub mod resolver;

pub use pipeline::{Disposition, GuardPipeline, PipelineOutcome};
pub use prompt::{PromptInput, assemble};
pub use resolver::{Resolution, ResolvedDay, resolve};
