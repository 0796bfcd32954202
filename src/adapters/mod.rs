//! Infrastructure adapters. Implement outbound ports.
//!
//! LLM, embeddings, web fetch, catalog/report files, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod embedding;
pub mod persistence;
pub mod ui;
pub mod vector;
pub mod web;
