//! Embedding adapters. Implement EmbeddingPort.
//!
//! Remote OpenAI-compatible embeddings, or a local hashing embedder when no key is configured.

pub mod hashing;
pub mod openai_embeddings;

pub use hashing::HashingEmbedder;
pub use openai_embeddings::OpenAiEmbeddingAdapter;
