//! coldmail: careers page -> job postings -> portfolio-backed cold emails. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
