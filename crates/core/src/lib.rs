//! # KASA Core
//!
//! Domain types, traits, and error definitions for the KASA tutor backend.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that the other crates implement against.
//!
//! The one external collaborator, the chat-completion provider, is a trait
//! here so the tutor pipeline can be exercised with stub providers.

pub mod ask;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use ask::{Age, AskReply, AskRequest, FailureKind, PromptPair, ReplyOutcome};
pub use error::{Error, ProviderError, Result, ValidationError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
