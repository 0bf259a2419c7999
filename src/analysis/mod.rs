//! Reading analysis
//!
//! Sends extracted text to the Anthropic Messages API with a fixed
//! instruction template and turns the reply into a [`ReadingAnalysis`].
//!
//! The model is asked for bare JSON but often fences it in markdown, so the
//! reply goes through a shape classifier before parsing. A reply that is not
//! JSON at all never fails the request: it is stored as a degraded record
//! with the raw text preserved.

mod client;
mod parser;
mod prompt;
mod types;

pub use client::{AnalysisError, Analyzer, AnthropicClient};
pub use parser::{parse_reply, ReplyShape};
pub use prompt::PromptVersion;
pub use types::{Argument, Evidence, KeyTerm, ReadingAnalysis};
