//! Infrastructure layer for Coursewise.
//!
//! Contains implementations of the collaborator traits defined in
//! `coursewise-core`: the AWS Bedrock text-generation client, the Titan
//! embedder, the JSON course catalog loader, the in-memory course index,
//! and the in-memory session store.

pub mod catalog;
pub mod config;
pub mod llm;
pub mod retrieval;
pub mod session;
