//! Transcript windowing and formatting for prompt injection.

use coursewise_types::chat::{ChatTurn, MessageRole};

/// Number of exchanges (user + assistant pairs) kept when formatting
/// history into a prompt.
pub const MAX_EXCHANGES: usize = 5;

/// The most recent `max` turns of a transcript.
pub fn recent_window(messages: &[ChatTurn], max: usize) -> &[ChatTurn] {
    if messages.len() > max {
        &messages[messages.len() - max..]
    } else {
        messages
    }
}

/// Format the newest `max_exchanges * 2` turns as "Student:" / "Bot:" lines.
pub fn format_history(messages: &[ChatTurn], max_exchanges: usize) -> String {
    recent_window(messages, max_exchanges * 2)
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                MessageRole::User => "Student",
                _ => "Bot",
            };
            format!("{speaker}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
