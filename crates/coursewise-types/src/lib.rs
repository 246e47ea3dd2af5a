//! Shared domain types for Coursewise.
//!
//! This crate contains the core domain types used across the Coursewise
//! service: session state, conversation stages, course records, LLM
//! request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod course;
pub mod error;
pub mod llm;
