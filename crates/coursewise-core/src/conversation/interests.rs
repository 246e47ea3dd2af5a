//! Interest extraction and merging.
//!
//! Extraction calls the text-generation backend with a structured prompt
//! over the recent transcript window and parses a comma-separated reply.
//! Parsing is defensive: a sentinel or empty reply means "no interests
//! found yet" (a valid non-error result), and meta-commentary fragments
//! are filtered out rather than stored as interests.

use coursewise_types::chat::ChatTurn;
use coursewise_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::conversation::history::{MAX_EXCHANGES, format_history};
use crate::llm::TextGenerator;
use crate::prompt::render_extraction_prompt;

/// Exact reply the extraction prompt instructs the model to use when no
/// interest meets the quality criteria. Compared lowercased.
pub const NO_INTERESTS_SENTINEL: &str = "no clear interests yet.";

/// Meta-commentary fragments that occasionally leak into the extraction
/// reply; any parsed entry containing one of these is dropped.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "based on the conversation",
    "no clear interests",
    "therefore",
    "the student",
    "it seems",
    "i cannot",
];

/// Minimum character length for a kept interest.
const MIN_INTEREST_LEN: usize = 3;

/// Parse a raw extraction reply into normalized interest strings.
///
/// Lowercases, splits on commas, trims, keeps entries longer than 2
/// characters, drops boilerplate. The sentinel and an empty reply both
/// yield an empty list.
pub fn parse_interest_response(response: &str) -> Vec<String> {
    let text = response.trim().to_lowercase();
    if text.is_empty() || text == NO_INTERESTS_SENTINEL {
        return Vec::new();
    }

    text.split(',')
        .map(str::trim)
        .filter(|interest| interest.len() >= MIN_INTEREST_LEN)
        .filter(|interest| {
            !BOILERPLATE_PHRASES
                .iter()
                .any(|phrase| interest.contains(phrase))
        })
        .map(str::to_string)
        .collect()
}

/// Stable set union: append `new` after `existing`, dedup keeping the first
/// occurrence. Idempotent and order-preserving.
pub fn merge_interests(existing: &[String], new: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + new.len());
    for interest in existing.iter().chain(new.iter()) {
        if !merged.iter().any(|known| known == interest) {
            merged.push(interest.clone());
        }
    }
    merged
}

/// Extract interests from the recent transcript window via the generator.
///
/// Runs at temperature 0.0; the reply is parsed with
/// [`parse_interest_response`]. An empty list is a valid result.
pub async fn extract_interests<G: TextGenerator>(
    generator: &G,
    model: &str,
    max_tokens: u32,
    messages: &[ChatTurn],
) -> Result<Vec<String>, LlmError> {
    if messages.is_empty() {
        return Ok(Vec::new());
    }

    let chat_history = format_history(messages, MAX_EXCHANGES);
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: MessageRole::User,
            content: render_extraction_prompt(&chat_history),
        }],
        system: None,
        max_tokens,
        temperature: Some(0.0),
        top_p: None,
        stop_sequences: None,
    };

    let response = generator.complete(&request).await?;
    Ok(parse_interest_response(&response.content))
}
