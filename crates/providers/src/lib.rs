//! Generation backend implementations for Veristep.
//!
//! All backends implement the `veristep_core::Provider` trait.
//! The router selects the correct backend based on configuration.

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
