//! Text-generation collaborator contract.

pub mod provider;

pub use provider::TextGenerator;
