//! The conversation state machine and its supporting pieces.
//!
//! One inbound user message drives exactly one pass through
//! stage determination -> interest extraction -> response generation.
//! There is no internal autonomous loop.

pub mod engine;
pub mod history;
pub mod interests;
pub mod stage;

pub use engine::{EngineConfig, TurnEngine, TurnReply};
