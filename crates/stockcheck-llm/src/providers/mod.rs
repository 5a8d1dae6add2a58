//! Concrete LLM provider implementations

pub mod openai;

pub use openai::{OPENROUTER_API_BASE, OpenAIConfig, OpenAIProvider};
