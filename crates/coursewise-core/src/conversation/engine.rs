//! The per-turn conversation engine.
//!
//! `TurnEngine` orchestrates one pass per inbound user message:
//! validate -> determine stage -> extract interests -> generate response.
//! It exclusively owns state transitions; callers persist the updated
//! state afterwards. Collaborator failures (extractor, generator) are
//! recovered locally with fallback replies and never surface as errors,
//! so every accepted turn yields exactly one visible assistant message.

use tracing::{debug, warn};

use coursewise_types::chat::{ConversationStage, SessionState};
use coursewise_types::course::RetrievedCourse;
use coursewise_types::error::TurnError;
use coursewise_types::llm::{CompletionRequest, Message, MessageRole};

use crate::conversation::history::{MAX_EXCHANGES, format_history};
use crate::conversation::interests::{extract_interests, merge_interests};
use crate::conversation::stage::{classify_message, stage_for_interest_progress};
use crate::llm::TextGenerator;
use crate::prompt::{
    EMPTY_RESPONSE_FALLBACK, GENERATION_FALLBACK, NO_MATCH_FALLBACK, render_discovery_prompt,
    render_recommendation_offer, render_recommendation_prompt,
};
use crate::retrieval::CourseRetriever;

/// Generation settings applied to every turn.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Text-generation model identifier passed through to the backend.
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    /// Course excerpts retrieved per recommendation.
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "anthropic.claude-3-5-sonnet-20240620-v1:0".to_string(),
            temperature: 0.3,
            top_p: 0.9,
            max_tokens: 1024,
            top_k: 4,
        }
    }
}

/// The visible outcome of one accepted turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    /// The single assistant message appended this turn.
    pub reply: String,
    /// Stage after the turn, for callers that branch on it.
    pub stage: ConversationStage,
}

/// Conversation state machine, generic over the two LLM-facing
/// collaborators so tests can script them.
pub struct TurnEngine<G: TextGenerator, R: CourseRetriever> {
    generator: G,
    retriever: R,
    config: EngineConfig,
}

impl<G: TextGenerator, R: CourseRetriever> TurnEngine<G, R> {
    pub fn new(generator: G, retriever: R, config: EngineConfig) -> Self {
        Self {
            generator,
            retriever,
            config,
        }
    }

    /// Process one inbound user message against the session state.
    ///
    /// Rejects with [`TurnError`] before any mutation when the grade is
    /// unset or the message is blank. Otherwise the state is mutated in
    /// place (message appends, stage/interest/counter updates) and the
    /// appended assistant reply is returned.
    #[tracing::instrument(
        name = "handle_turn",
        skip(self, state, message, credit_preference),
        fields(user_id = %state.user_id, stage = %state.conversation_stage)
    )]
    pub async fn handle_turn(
        &self,
        state: &mut SessionState,
        message: &str,
        credit_preference: Option<&str>,
    ) -> Result<TurnReply, TurnError> {
        if state.grade.is_none() {
            return Err(TurnError::GradeMissing);
        }
        if message.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        if let Some(preference) = credit_preference {
            state.credit_preference = preference.to_string();
        }
        state.push_user(message);

        // Stage rules see the raw reply first: exit, restart, and offer
        // classification must not be overridden by extraction results.
        let restarting = state.conversation_stage == ConversationStage::Complete;
        let forced = classify_message(state, message);
        if restarting && forced == Some(ConversationStage::Discovery) {
            state.interest_turns = 0;
        }

        // Interest extraction runs every turn; failure leaves interests
        // unchanged and the turn continues.
        match extract_interests(
            &self.generator,
            &self.config.model,
            self.config.max_tokens,
            &state.messages,
        )
        .await
        {
            Ok(new_interests) => {
                if !new_interests.is_empty() {
                    state.interests = merge_interests(&state.interests, &new_interests);
                    debug!(interests = ?state.interests, "merged extracted interests");
                }
            }
            Err(err) => {
                warn!(error = %err, "interest extraction failed; keeping interests unchanged");
            }
        }

        // Interests extracted from this very message count toward the
        // offer threshold in the same turn, but only when no message rule
        // already decided the stage.
        let stage = forced.unwrap_or_else(|| stage_for_interest_progress(state));
        state.conversation_stage = stage;

        let reply = match stage {
            ConversationStage::PromptRecommendation => {
                state.has_prompted_recommendation = true;
                render_recommendation_offer(&state.interests)
            }
            ConversationStage::Recommendation => self.recommend(state, message).await,
            _ => self.converse(state, message).await,
        };

        state.push_assistant(&reply);
        Ok(TurnReply {
            reply,
            stage: state.conversation_stage,
        })
    }

    /// Recommendation path: retrieve course context, then generate.
    ///
    /// Empty retrieval short-circuits to the fixed no-match sentence (a
    /// normal business outcome, not an error). On success the session
    /// completes and the recommendation is retained for audit.
    async fn recommend(&self, state: &mut SessionState, query: &str) -> String {
        let grade = state.grade.unwrap_or(0);

        let courses = match self.retriever.search(query, self.config.top_k).await {
            Ok(courses) => courses,
            Err(err) => {
                warn!(error = %err, "course retrieval failed");
                return GENERATION_FALLBACK.to_string();
            }
        };

        if courses.is_empty() {
            debug!(query, "no courses matched; returning fixed no-match reply");
            state.conversation_stage = ConversationStage::Complete;
            state.has_offered_recommendation = true;
            state.last_recommendation = Some(NO_MATCH_FALLBACK.to_string());
            return NO_MATCH_FALLBACK.to_string();
        }

        let context = Self::format_course_context(&courses);
        let prompt = render_recommendation_prompt(
            &context,
            grade,
            &state.interests,
            &state.credit_preference,
            query,
        );

        match self.complete_text(&prompt).await {
            Some(text) => {
                state.conversation_stage = ConversationStage::Complete;
                state.has_offered_recommendation = true;
                state.last_recommendation = Some(text.clone());
                text
            }
            None => GENERATION_FALLBACK.to_string(),
        }
    }

    /// Discovery path: conversational reply, counting discovery turns.
    async fn converse(&self, state: &mut SessionState, user_input: &str) -> String {
        let grade = state.grade.unwrap_or(0);
        let chat_history = format_history(&state.messages, MAX_EXCHANGES);
        let prompt = render_discovery_prompt(grade, &chat_history, user_input);

        if state.conversation_stage == ConversationStage::Discovery {
            state.interest_turns += 1;
        }

        match self.complete_text(&prompt).await {
            Some(text) => text,
            None => GENERATION_FALLBACK.to_string(),
        }
    }

    /// Run one completion; `None` means the generator failed. An empty but
    /// successful completion maps to the empty-response fallback.
    async fn complete_text(&self, prompt: &str) -> Option<String> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: prompt.to_string(),
            }],
            system: None,
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            top_p: Some(self.config.top_p),
            stop_sequences: None,
        };

        match self.generator.complete(&request).await {
            Ok(response) => {
                let text = response.content.trim();
                if text.is_empty() {
                    Some(EMPTY_RESPONSE_FALLBACK.to_string())
                } else {
                    Some(text.to_string())
                }
            }
            Err(err) => {
                warn!(error = %err, backend = self.generator.name(), "generation failed");
                None
            }
        }
    }

    fn format_course_context(courses: &[RetrievedCourse]) -> String {
        courses
            .iter()
            .map(|hit| hit.course.document())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use coursewise_types::course::Course;
    use coursewise_types::error::RetrievalError;
    use coursewise_types::llm::{CompletionResponse, LlmError, StopReason, Usage};

    /// Scripted generator: replies to extraction prompts from one queue and
    /// to conversational/recommendation prompts from another.
    struct ScriptedGenerator {
        extraction_replies: Mutex<Vec<Result<String, ()>>>,
        generation_replies: Mutex<Vec<Result<String, ()>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(
            extraction: Vec<Result<&str, ()>>,
            generation: Vec<Result<&str, ()>>,
        ) -> Self {
            let own = |v: Vec<Result<&str, ()>>| {
                v.into_iter()
                    .map(|r| r.map(str::to_string))
                    .rev()
                    .collect::<Vec<_>>()
            };
            Self {
                extraction_replies: Mutex::new(own(extraction)),
                generation_replies: Mutex::new(own(generation)),
                calls: AtomicUsize::new(0),
            }
        }

        fn respond(script: &Mutex<Vec<Result<String, ()>>>) -> Result<CompletionResponse, LlmError> {
            let next = script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok("No clear interests yet.".to_string()));
            match next {
                Ok(content) => Ok(CompletionResponse {
                    id: "test".to_string(),
                    content,
                    model: "scripted".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Err(()) => Err(LlmError::Provider {
                    message: "scripted failure".to_string(),
                }),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let is_extraction = request.messages[0]
                .content
                .contains("interest extraction system");
            if is_extraction {
                Self::respond(&self.extraction_replies)
            } else {
                Self::respond(&self.generation_replies)
            }
        }
    }

    /// Retriever returning a fixed result set (or a scripted error).
    struct FixedRetriever {
        courses: Vec<RetrievedCourse>,
        fail: bool,
    }

    impl FixedRetriever {
        fn with(courses: Vec<RetrievedCourse>) -> Self {
            Self { courses, fail: false }
        }

        fn empty() -> Self {
            Self::with(Vec::new())
        }
    }

    impl CourseRetriever for FixedRetriever {
        async fn search(
            &self,
            _query: &str,
            _top_k: usize,
        ) -> Result<Vec<RetrievedCourse>, RetrievalError> {
            if self.fail {
                return Err(RetrievalError::Index("scripted".to_string()));
            }
            Ok(self.courses.clone())
        }
    }

    fn sample_course() -> RetrievedCourse {
        RetrievedCourse {
            course: Course {
                course_id: "CS101".to_string(),
                title: "Intro to Programming".to_string(),
                description: "Learn to code.".to_string(),
                subjects: vec!["computer science".to_string()],
                grades: vec!["10".to_string()],
                is_dual_credit: false,
                is_credit_recovery: false,
                higher_ed_credits: 0,
            },
            score: 0.9,
        }
    }

    fn engine(
        extraction: Vec<Result<&str, ()>>,
        generation: Vec<Result<&str, ()>>,
        retriever: FixedRetriever,
    ) -> TurnEngine<ScriptedGenerator, FixedRetriever> {
        TurnEngine::new(
            ScriptedGenerator::new(extraction, generation),
            retriever,
            EngineConfig::default(),
        )
    }

    fn ready_state() -> SessionState {
        let mut state = SessionState::new("student");
        state.grade = Some(10);
        state
    }

    #[tokio::test]
    async fn test_grade_missing_rejected_without_mutation() {
        let engine = engine(vec![], vec![], FixedRetriever::empty());
        let mut state = SessionState::new("student");
        let err = engine.handle_turn(&mut state, "hello", None).await.unwrap_err();
        assert_eq!(err, TurnError::GradeMissing);
        assert!(state.messages.is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let engine = engine(vec![], vec![], FixedRetriever::empty());
        let mut state = ready_state();
        let err = engine.handle_turn(&mut state, "   ", None).await.unwrap_err();
        assert_eq!(err, TurnError::EmptyMessage);
        assert!(state.messages.is_empty());
    }

    #[tokio::test]
    async fn test_first_message_with_two_interests_prompts_same_turn() {
        // Spec scenario: greeting stage, "I love coding and robotics",
        // extractor finds two interests -> same-turn offer.
        let engine = engine(
            vec![Ok("programming, robotics")],
            vec![],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        let reply = engine
            .handle_turn(&mut state, "I love coding and robotics", None)
            .await
            .unwrap();

        assert_eq!(reply.stage, ConversationStage::PromptRecommendation);
        assert_eq!(state.interests.len(), 2);
        assert!(state.has_prompted_recommendation);
        assert!(reply.reply.contains("programming, robotics"));
        assert_eq!(state.interest_turns, 0);
    }

    #[tokio::test]
    async fn test_discovery_turn_increments_counter() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("What do you like to do after school?")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        let reply = engine.handle_turn(&mut state, "hi", None).await.unwrap();

        assert_eq!(reply.stage, ConversationStage::Discovery);
        assert_eq!(state.interest_turns, 1);
        assert_eq!(reply.reply, "What do you like to do after school?");
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_exit_phrase_completes_without_counting() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("Take care!")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.interest_turns = 2;
        let reply = engine.handle_turn(&mut state, "ok bye", None).await.unwrap();

        assert_eq!(reply.stage, ConversationStage::Complete);
        // Not a discovery turn: counter untouched.
        assert_eq!(state.interest_turns, 2);
    }

    #[tokio::test]
    async fn test_restart_from_complete_resets_counter() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("Welcome back! What's new?")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.conversation_stage = ConversationStage::Complete;
        state.interest_turns = 3;

        let reply = engine.handle_turn(&mut state, "hello again", None).await.unwrap();
        assert_eq!(reply.stage, ConversationStage::Discovery);
        // Reset to 0, then the discovery turn counted.
        assert_eq!(state.interest_turns, 1);
    }

    #[tokio::test]
    async fn test_offer_reply_yes_then_recommendation() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("Course Id: CS101\nCourse Title: Intro to Programming")],
            FixedRetriever::with(vec![sample_course()]),
        );
        let mut state = ready_state();
        state.conversation_stage = ConversationStage::PromptRecommendation;
        state.has_prompted_recommendation = true;
        state.interests = vec!["programming".to_string(), "robotics".to_string()];

        let reply = engine.handle_turn(&mut state, "yeah sure", None).await.unwrap();
        assert_eq!(reply.stage, ConversationStage::Complete);
        assert!(state.has_offered_recommendation);
        assert_eq!(state.last_recommendation.as_deref(), Some(reply.reply.as_str()));
    }

    #[tokio::test]
    async fn test_offer_reply_no_returns_to_discovery() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("No problem! What else do you enjoy?")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.conversation_stage = ConversationStage::PromptRecommendation;
        state.has_prompted_recommendation = true;

        let reply = engine
            .handle_turn(&mut state, "not right now", None)
            .await
            .unwrap();
        assert_eq!(reply.stage, ConversationStage::Discovery);
        assert_eq!(state.interest_turns, 1);
    }

    #[tokio::test]
    async fn test_offer_reply_ambiguous_reoffers() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.conversation_stage = ConversationStage::PromptRecommendation;
        state.has_prompted_recommendation = true;
        state.interests = vec!["art".to_string(), "music".to_string()];

        let reply = engine.handle_turn(&mut state, "hmm maybe", None).await.unwrap();
        assert_eq!(reply.stage, ConversationStage::PromptRecommendation);
        assert!(reply.reply.contains("art, music"));
    }

    #[tokio::test]
    async fn test_empty_retrieval_yields_verbatim_no_match() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.conversation_stage = ConversationStage::PromptRecommendation;
        state.has_prompted_recommendation = true;

        let reply = engine.handle_turn(&mut state, "yes please", None).await.unwrap();
        assert_eq!(reply.reply, NO_MATCH_FALLBACK);
        assert_eq!(reply.stage, ConversationStage::Complete);
        assert!(state.has_offered_recommendation);
    }

    #[tokio::test]
    async fn test_generator_failure_still_appends_one_reply() {
        let engine = engine(vec![Err(())], vec![Err(())], FixedRetriever::empty());
        let mut state = ready_state();
        let before = state.messages.len();

        let reply = engine.handle_turn(&mut state, "hello", None).await.unwrap();
        assert_eq!(reply.reply, GENERATION_FALLBACK);
        // User message + fallback assistant message.
        assert_eq!(state.messages.len(), before + 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_keeps_interests() {
        let engine = engine(
            vec![Err(())],
            vec![Ok("Tell me more!")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        state.interests = vec!["chemistry".to_string()];

        let reply = engine.handle_turn(&mut state, "hello", None).await.unwrap();
        assert_eq!(state.interests, vec!["chemistry".to_string()]);
        assert_eq!(reply.reply, "Tell me more!");
    }

    #[tokio::test]
    async fn test_blank_generation_uses_empty_response_fallback() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("   ")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        let reply = engine.handle_turn(&mut state, "hi", None).await.unwrap();
        assert_eq!(reply.reply, EMPTY_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn test_credit_preference_override_applied() {
        let engine = engine(
            vec![Ok("No clear interests yet.")],
            vec![Ok("Nice!")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();
        engine
            .handle_turn(&mut state, "hi", Some("dual credit"))
            .await
            .unwrap();
        assert_eq!(state.credit_preference, "dual credit");
    }

    #[tokio::test]
    async fn test_merge_is_stable_across_turns() {
        let engine = engine(
            vec![Ok("art, music"), Ok("math, art")],
            vec![Ok("Cool!"), Ok("Great!")],
            FixedRetriever::empty(),
        );
        let mut state = ready_state();

        let first = engine
            .handle_turn(&mut state, "I like art and music", None)
            .await
            .unwrap();
        assert_eq!(first.stage, ConversationStage::PromptRecommendation);
        assert_eq!(state.interests, vec!["art".to_string(), "music".to_string()]);

        // Declining the offer returns to discovery (the decline is not
        // overridden by same-turn extraction); the second extraction
        // overlaps the first and must merge in first-seen order.
        let second = engine
            .handle_turn(&mut state, "not really, I'm also into math", None)
            .await
            .unwrap();
        assert_eq!(second.stage, ConversationStage::Discovery);
        assert_eq!(
            state.interests,
            vec!["art".to_string(), "music".to_string(), "math".to_string()]
        );
    }
}
