//! Cross-cutting configuration shared by main and adapters.

pub mod config;
