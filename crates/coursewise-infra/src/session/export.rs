//! Transcript export to disk.
//!
//! Writes a session's transcript as a role-tagged JSON chat log, one file
//! per export, named by user id and timestamp.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use coursewise_types::chat::{ChatTurn, MessageRole};
use coursewise_types::error::SessionError;

/// One entry in an exported chat log.
#[derive(Debug, Serialize)]
pub struct ChatLogEntry<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Write the transcript as pretty-printed JSON under `dir`.
///
/// Creates the directory if needed. The file is named
/// `chat_log_{user_id}_{timestamp}.json`; the written path is returned.
pub async fn export_transcript(
    dir: impl AsRef<Path>,
    user_id: &str,
    messages: &[ChatTurn],
) -> Result<PathBuf, SessionError> {
    let entries: Vec<ChatLogEntry<'_>> = messages
        .iter()
        .map(|turn| ChatLogEntry {
            role: match turn.role {
                MessageRole::User => "user",
                _ => "bot",
            },
            content: &turn.content,
        })
        .collect();

    let json = serde_json::to_string_pretty(&entries)
        .map_err(|e| SessionError::Storage(format!("failed to serialize chat log: {e}")))?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir
        .as_ref()
        .join(format!("chat_log_{user_id}_{timestamp}.json"));

    tokio::fs::create_dir_all(dir.as_ref())
        .await
        .map_err(|e| SessionError::Storage(format!("failed to create log directory: {e}")))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| SessionError::Storage(format!("failed to write chat log: {e}")))?;

    tracing::info!(path = %path.display(), "chat log exported");
    Ok(path)
}
