//! Stage transition rules.
//!
//! Pure functions over (state, lowercased user message). Rules are evaluated
//! in a fixed priority order each turn: exit phrases win over everything,
//! then a completed session restarts, then a pending offer's reply is
//! classified, then the interest thresholds, then the discovery default.

use coursewise_types::chat::{ConversationStage, SessionState};

/// Termination vocabulary; containment match, case-insensitive.
pub const EXIT_PHRASES: &[&str] = &["bye", "exit", "quit", "stop", "no thanks", "goodbye"];

/// Affirmative replies to the recommendation offer.
pub const AFFIRMATIVE_PHRASES: &[&str] = &[
    "yes",
    "yeah",
    "sure",
    "of course",
    "please",
    "yes if you have",
    "yes for sure",
    "ok go ahead",
    "yes please",
    "yep",
];

/// Negative replies to the recommendation offer.
pub const NEGATIVE_PHRASES: &[&str] = &["no", "not really", "maybe later", "not right now"];

/// Distinct interests needed before the engine offers a recommendation.
pub const INTEREST_THRESHOLD: usize = 2;

/// Discovery turns after which the offer is forced even without enough
/// interests.
pub const INTEREST_TURN_LIMIT: u32 = 3;

fn contains_any(message: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| message.contains(phrase))
}

/// Rules 1-3: exit, restart-after-complete, and offer-reply classification.
///
/// Returns `Some(stage)` when the message itself decides the stage; `None`
/// means the decision falls through to the interest-progress rules. Kept
/// separate from [`stage_for_interest_progress`] so the engine can re-apply
/// only the latter after the interest merge -- a message-forced decision
/// (an exit, a declined offer) must not be overridden by extraction
/// results from the same turn.
pub fn classify_message(state: &SessionState, message: &str) -> Option<ConversationStage> {
    let message = message.to_lowercase();

    // Rule 1: exit phrases force completion regardless of anything else.
    if contains_any(&message, EXIT_PHRASES) {
        return Some(ConversationStage::Complete);
    }

    // Rule 2: a fresh message after completion restarts discovery.
    if state.conversation_stage == ConversationStage::Complete && !message.trim().is_empty() {
        return Some(ConversationStage::Discovery);
    }

    // Rule 3: classify the reply to a pending recommendation offer.
    if state.conversation_stage == ConversationStage::PromptRecommendation {
        if contains_any(&message, AFFIRMATIVE_PHRASES) {
            return Some(ConversationStage::Recommendation);
        }
        if contains_any(&message, NEGATIVE_PHRASES) {
            return Some(ConversationStage::Discovery);
        }
        // Ambiguous: stay put, re-offer downstream.
        return Some(ConversationStage::PromptRecommendation);
    }

    None
}

/// Determine the stage for this turn. `message` is the new user message.
///
/// Does not mutate state; the engine applies side effects (zeroing
/// `interest_turns` on restart) based on the returned stage.
pub fn advance_stage(state: &SessionState, message: &str) -> ConversationStage {
    classify_message(state, message).unwrap_or_else(|| stage_for_interest_progress(state))
}

/// Rules 4-6: interest count and turn-count thresholds, discovery default.
///
/// Re-applied after the interest merge when no message rule fired, so
/// interests extracted from the current message count toward the offer in
/// the same turn.
pub fn stage_for_interest_progress(state: &SessionState) -> ConversationStage {
    if state.interests.len() >= INTEREST_THRESHOLD {
        if !state.has_prompted_recommendation {
            return ConversationStage::PromptRecommendation;
        }
        // Repeat visit after a prior prompt: recommend directly.
        return ConversationStage::Recommendation;
    }

    if state.interest_turns >= INTEREST_TURN_LIMIT {
        return ConversationStage::PromptRecommendation;
    }

    ConversationStage::Discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursewise_types::chat::SessionState;

    fn state_with(stage: ConversationStage) -> SessionState {
        let mut state = SessionState::new("u");
        state.grade = Some(10);
        state.conversation_stage = stage;
        state
    }

    #[test]
    fn test_exit_phrase_forces_complete_from_any_stage() {
        for stage in [
            ConversationStage::Greeting,
            ConversationStage::Discovery,
            ConversationStage::PromptRecommendation,
            ConversationStage::Recommendation,
            ConversationStage::Complete,
        ] {
            let mut state = state_with(stage);
            state.interests = vec!["math".to_string(), "art".to_string(), "music".to_string()];
            assert_eq!(
                advance_stage(&state, "ok BYE now"),
                ConversationStage::Complete,
                "stage {stage} should yield complete on exit phrase"
            );
        }
    }

    #[test]
    fn test_exit_match_is_case_insensitive_containment() {
        let state = state_with(ConversationStage::Discovery);
        assert_eq!(advance_stage(&state, "No Thanks!"), ConversationStage::Complete);
        assert_eq!(advance_stage(&state, "QUIT"), ConversationStage::Complete);
    }

    #[test]
    fn test_complete_restarts_on_new_message() {
        let state = state_with(ConversationStage::Complete);
        assert_eq!(advance_stage(&state, "hi again"), ConversationStage::Discovery);
    }

    #[test]
    fn test_blank_message_from_complete_skips_restart_rule() {
        // A blank message does not trigger the rule-2 restart (whose side
        // effect zeroes interest_turns in the engine); it falls through to
        // the interest rules instead.
        let mut state = state_with(ConversationStage::Complete);
        state.interests = vec!["math".to_string(), "art".to_string()];
        assert_eq!(
            advance_stage(&state, "   "),
            ConversationStage::PromptRecommendation
        );
    }

    #[test]
    fn test_offer_reply_affirmative() {
        let state = state_with(ConversationStage::PromptRecommendation);
        for reply in ["yeah sure", "Yes please", "ok go ahead", "yep!"] {
            assert_eq!(
                advance_stage(&state, reply),
                ConversationStage::Recommendation,
                "reply {reply:?}"
            );
        }
    }

    #[test]
    fn test_offer_reply_negative() {
        let state = state_with(ConversationStage::PromptRecommendation);
        for reply in ["not right now", "not really", "maybe later"] {
            assert_eq!(
                advance_stage(&state, reply),
                ConversationStage::Discovery,
                "reply {reply:?}"
            );
        }
    }

    #[test]
    fn test_offer_reply_ambiguous_keeps_stage() {
        let state = state_with(ConversationStage::PromptRecommendation);
        assert_eq!(
            advance_stage(&state, "hmm maybe"),
            // "maybe" alone matches neither vocabulary
            ConversationStage::PromptRecommendation
        );
    }

    #[test]
    fn test_two_interests_prompt_first_time() {
        let mut state = state_with(ConversationStage::Discovery);
        state.interests = vec!["math".to_string(), "art".to_string()];
        assert_eq!(
            advance_stage(&state, "tell me about school"),
            ConversationStage::PromptRecommendation
        );
    }

    #[test]
    fn test_two_interests_recommend_after_prior_prompt() {
        let mut state = state_with(ConversationStage::Discovery);
        state.interests = vec!["math".to_string(), "art".to_string()];
        state.has_prompted_recommendation = true;
        assert_eq!(
            advance_stage(&state, "tell me about school"),
            ConversationStage::Recommendation
        );
    }

    #[test]
    fn test_turn_limit_forces_prompt_without_interests() {
        let mut state = state_with(ConversationStage::Discovery);
        state.interest_turns = 3;
        assert_eq!(
            advance_stage(&state, "I dunno"),
            ConversationStage::PromptRecommendation
        );
    }

    #[test]
    fn test_default_is_discovery() {
        let state = state_with(ConversationStage::Greeting);
        assert_eq!(advance_stage(&state, "hello"), ConversationStage::Discovery);
    }
}
