//! Session state storage and transcript export.

pub mod export;
pub mod memory;

pub use export::export_transcript;
pub use memory::InMemorySessionStore;
