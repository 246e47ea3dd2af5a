//! Business logic and collaborator trait definitions for Coursewise.
//!
//! This crate defines the "ports" (text generation, embedding, retrieval,
//! session storage) that the infrastructure layer implements, plus the
//! conversation state machine that orchestrates them per turn. It depends
//! only on `coursewise-types` -- never on `coursewise-infra` or any
//! HTTP/IO crate.

pub mod conversation;
pub mod embedding;
pub mod llm;
pub mod prompt;
pub mod retrieval;
pub mod session;
