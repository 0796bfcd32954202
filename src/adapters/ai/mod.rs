//! AI adapter module. Implements LlmPort for LLM integration.
//!
//! Provides an OpenAI-compatible adapter (OpenAI, Groq, Ollama) and a mock adapter for offline runs.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::MockLlmAdapter;
pub use openai_adapter::OpenAiAdapter;
