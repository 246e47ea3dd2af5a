//! Session state and conversation stage types for Coursewise.
//!
//! These types model one student's conversation with the advisor: the
//! transcript, the extracted interests, and the stage that drives all
//! branching in the turn engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Phase of one student's conversation.
///
/// Drives all branching in the turn engine: discovery questions, the
/// one-time recommendation offer, the recommendation itself, and the
/// completed state a fresh message can restart from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    Greeting,
    Discovery,
    PromptRecommendation,
    Recommendation,
    Complete,
}

impl fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStage::Greeting => write!(f, "greeting"),
            ConversationStage::Discovery => write!(f, "discovery"),
            ConversationStage::PromptRecommendation => write!(f, "prompt_recommendation"),
            ConversationStage::Recommendation => write!(f, "recommendation"),
            ConversationStage::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for ConversationStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greeting" => Ok(ConversationStage::Greeting),
            "discovery" => Ok(ConversationStage::Discovery),
            "prompt_recommendation" => Ok(ConversationStage::PromptRecommendation),
            "recommendation" => Ok(ConversationStage::Recommendation),
            "complete" => Ok(ConversationStage::Complete),
            other => Err(format!("invalid conversation stage: '{other}'")),
        }
    }
}

impl Default for ConversationStage {
    fn default() -> Self {
        ConversationStage::Greeting
    }
}

/// A single turn in a session transcript.
///
/// Turns are append-only and never reordered. Alternation between roles is
/// not enforced; consecutive same-role entries are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-student conversation state, mutated once per inbound message.
///
/// The turn engine exclusively owns state transitions; the session store
/// exclusively owns storage lifetime. `grade` must be set (8..=12) before
/// any chat turn is processed, and is treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub user_id: String,
    pub messages: Vec<ChatTurn>,
    pub grade: Option<u8>,
    /// Lowercase interest strings in first-seen order, deduplicated.
    pub interests: Vec<String>,
    /// Open vocabulary: "any", "dual credit", "regular credit", ...
    pub credit_preference: String,
    pub conversation_stage: ConversationStage,
    /// Turns handled while in the discovery stage; used as a fallback
    /// trigger toward the recommendation offer.
    pub interest_turns: u32,
    pub has_offered_recommendation: bool,
    pub has_prompted_recommendation: bool,
    /// Most recent recommendation text, retained for display/audit.
    pub last_recommendation: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Create the empty greeting-stage session for a user's first contact.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            messages: Vec::new(),
            grade: None,
            interests: Vec::new(),
            credit_preference: "any".to_string(),
            conversation_stage: ConversationStage::Greeting,
            interest_turns: 0,
            has_offered_recommendation: false,
            has_prompted_recommendation: false,
            last_recommendation: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// Append a user turn to the transcript.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatTurn::user(content));
        self.updated_at = Utc::now();
    }

    /// Append an assistant turn to the transcript.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatTurn::assistant(content));
        self.updated_at = Utc::now();
    }

    /// Content of the newest user-role turn, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|turn| turn.role == MessageRole::User)
            .map(|turn| turn.content.as_str())
    }
}
