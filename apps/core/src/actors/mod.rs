//! # Actors
//!
//! The completion collaborator: the `CompletionActor` seam used by the
//! pipelines, and `LlmActorHandle`, its HTTP implementation.

pub mod llm;
pub mod messages;
pub mod traits;

pub use llm::LlmActorHandle;
pub use messages::CompletionRequest;
pub use traits::CompletionActor;
