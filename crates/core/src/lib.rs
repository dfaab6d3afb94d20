//! # Veristep Core
//!
//! Domain types, traits, and error definitions for the Veristep reasoning
//! agent. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! The pipeline it models: a question goes through Plan → Execute → Verify,
//! each stage one call to an opaque text-generation backend, with a bounded
//! retry of the Execute→Verify cycle when verification fails.

pub mod backend;
pub mod error;
pub mod extract;
pub mod report;

// Re-export key types at crate root for ergonomics
pub use backend::{GenerationRequest, GenerationResponse, Provider, Usage};
pub use error::{Error, ExtractionError, ProviderError, Result};
pub use extract::extract_json;
pub use report::{AgentReport, Check, ReportMetadata, Solution, SolveStatus};
