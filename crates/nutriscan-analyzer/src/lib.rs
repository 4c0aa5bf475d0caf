//! Health analysis of formatted products through the Gemini API.
//!
//! Builds a prompt from a [`nutriscan_core::FormattedProduct`], sends it to
//! the `generateContent` endpoint once, and turns the free-form answer into a
//! [`nutriscan_core::Analysis`]. Answers that cannot be parsed fall back to a
//! deterministic placeholder analysis instead of failing.

pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompt;

pub use error::AnalyzeError;
pub use gemini::GeminiClient;
pub use parse::{fallback_analysis, interpret_response, parse_analysis};
pub use prompt::build_prompt;
