//! # niagate core
//!
//! Domain types, traits, and error definitions for the guarded curriculum
//! proxy. This crate has **no framework dependencies**: it defines the
//! model that every other crate implements against.
//!
//! The two external collaborators, the curriculum data store and the
//! text-generation service, are traits here. Implementations live in
//! `niagate-store` and `niagate-providers`, which keeps the guardrail
//! pipeline testable with plain mocks.

pub mod completion;
pub mod curriculum;
pub mod error;
pub mod request;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionBackend, CompletionRequest};
pub use curriculum::{CurriculumDay, Practice, PracticeRef, PracticeRefs};
pub use error::{CompletionError, RequestError, StoreError};
pub use request::{DayKey, GuardedReply, GuardedRequest};
pub use store::CurriculumStore;
