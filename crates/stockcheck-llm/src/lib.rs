//! LLM provider abstraction layer for stockcheck
//!
//! This crate provides the small slice of LLM plumbing the dashboards need
//! to turn a company name into a ticker symbol:
//!
//! - Message types for chat-style requests
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (used against OpenRouter)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
