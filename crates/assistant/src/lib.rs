//! Assistant response pipeline - from free-text message to final reply
//!
//! This crate is the decision core of the storefront assistant. Given the
//! latest user message and the caller's session, it:
//! 1. **Relevance gate** (`gate`) - reject obviously off-topic input
//!    before spending any network call
//! 2. **Context aggregation** (`context`) - assemble a role-scoped
//!    snapshot of backend data, tolerating partial source failure
//! 3. **Local resolution** (`rules`) - answer deterministically from the
//!    snapshot when an ordered rule matches
//! 4. **Generative fallback** (`llm` + `prompt`) - delegate to the
//!    external model only when no rule applied
//!
//! # Key Types
//!
//! - `AssistantPipeline` - the orchestrator (see `pipeline` module)
//! - `GenerativeClient` - pluggable trait for the text-completion endpoint
//!
//! # Safety Principle
//!
//! The generative model never sees data the session is not entitled to,
//! and the pipeline never surfaces a raw error: every call resolves to a
//! `PipelineResult` with a human-readable message.

pub mod context;
pub mod gate;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod rules;

pub use llm::{GenerativeClient, HttpGenerativeClient};
pub use pipeline::AssistantPipeline;
