//! Generative-AI summarization and extraction pipeline.
//!
//! Turns normalized activity into a prompt, sends it to a Gemini-style
//! `generateContent` endpoint, and decodes the reply against a declared
//! response schema. Every invocation is a single request/response cycle with
//! no retry.

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod wire;

pub use client::{GenAiClient, RawResponse};
pub use config::GenAiConfig;
pub use error::{Error, Result};
pub use pipeline::{AcceptExpense, AcceptedExpense, SummaryPipeline};
pub use response::SummaryResponse;

#[cfg(test)]
mod tests;
