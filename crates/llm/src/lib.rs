//! Ollama client for the general-question responder.
//!
//! Blocking reqwest client (no Tokio runtime required). Implements the
//! engine's [`TextGenerator`](salesq_engine::TextGenerator) so the pipeline
//! never sees HTTP.

mod client;

pub use client::{OllamaClient, GENERATE_PATH, TAGS_PATH};
