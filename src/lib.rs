//! storyrelay - HTTP relay for LLM-generated story titles and stories
//!
//! Accepts a title and description, sends them to an OpenAI-compatible
//! chat-completion provider with a fixed system prompt, and returns the
//! model's JSON answer.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod metrics;
pub mod middleware;
pub mod prompts;
pub mod shared;
pub mod telemetry;
