//! Assistant Facade
//!
//! The externally visible entry point: takes raw Portuguese text,
//! orchestrates interpretation, dispatch and response composition, keeps a
//! bounded conversation log, and optionally requests speech synthesis for
//! the final text. One [`Assistant`] value owns all per-session state;
//! nothing here is process-global.

use crate::dispatch::{ActionTaken, CommandResult, Dispatcher};
use crate::intent::CommandInterpreter;
use crate::lexicon::Lexicon;
use crate::response::{
    analyze_sentiment, detect_intention, EmotionSnapshot, PersonalityState, ResponseComposer,
};
use crate::speech::SpeechSynthesizer;
use crate::store::ErpStore;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Tunable knobs for an assistant instance
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Turns kept in the conversation log
    pub history_limit: usize,
    /// Voice id forwarded to the speech backend
    pub voice: String,
    /// Speech speed multiplier
    pub speech_speed: f32,
    /// Upper bound on a speech-synthesis call
    pub speech_timeout: Duration,
    /// Restore personality state across restarts instead of waking up at
    /// baseline
    pub persist_personality: bool,
    /// Seed for phrase-selection randomness; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            voice: "luna".to_string(),
            speech_speed: 1.0,
            speech_timeout: Duration::from_secs(5),
            persist_personality: false,
            rng_seed: None,
        }
    }
}

/// Who said a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub timestamp: NaiveDateTime,
    pub user_id: Option<String>,
    pub role: Role,
    pub text: String,
}

/// Everything a caller gets back for one utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub success: bool,
    pub message: String,
    pub action_taken: ActionTaken,
    pub module: String,
    pub data: Value,
    pub suggestions: Vec<String>,
    pub required_fields: Vec<String>,
    pub emotion: EmotionSnapshot,
    /// Synthesized audio, when requested and available
    pub audio: Option<Vec<u8>>,
    pub has_voice: bool,
}

/// The LUA assistant
pub struct Assistant<S: ErpStore, V: SpeechSynthesizer> {
    config: AssistantConfig,
    session_id: Uuid,
    interpreter: CommandInterpreter,
    dispatcher: Dispatcher<S>,
    composer: ResponseComposer,
    speech: V,
    lexicon: Arc<Lexicon>,
    personality: Mutex<PersonalityState>,
    rng: Mutex<StdRng>,
    history: Mutex<Vec<ConversationTurn>>,
    last_interaction: Mutex<Instant>,
}

impl<S: ErpStore, V: SpeechSynthesizer> Assistant<S, V> {
    /// Assistant with the embedded lexicon and default configuration.
    pub fn new(store: Arc<S>, speech: V) -> Self {
        Self::with_config(store, speech, Arc::new(Lexicon::embedded()), AssistantConfig::default())
    }

    pub fn with_config(
        store: Arc<S>,
        speech: V,
        lexicon: Arc<Lexicon>,
        config: AssistantConfig,
    ) -> Self {
        let session_id = Uuid::new_v4();
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(%session_id, "assistant session started");

        Self {
            interpreter: CommandInterpreter::new(lexicon.clone()),
            dispatcher: Dispatcher::new(store, &lexicon),
            composer: ResponseComposer::new(),
            speech,
            lexicon,
            personality: Mutex::new(PersonalityState::new()),
            rng: Mutex::new(rng),
            history: Mutex::new(Vec::new()),
            last_interaction: Mutex::new(Instant::now()),
            config,
            session_id,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Restore a previously saved personality state. Only honored when
    /// `persist_personality` is enabled; otherwise sessions wake up at
    /// baseline by design.
    pub fn restore_personality(&self, state: PersonalityState) {
        if self.config.persist_personality {
            *self.lock_personality() = state;
        }
    }

    /// Interpret one utterance, execute the business operation it asks for,
    /// and compose the final reply.
    pub async fn interpret_and_execute(
        &self,
        text: &str,
        user_id: Option<&str>,
        want_voice: bool,
    ) -> Result<AssistantReply> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            let result = CommandResult::failure("Comando vazio. Por favor, diga algo.");
            return Ok(self.reply_without_voice(result));
        }

        self.push_turn(Role::User, user_id, trimmed);

        let intent = self.interpreter.interpret(trimmed);
        let result = self.dispatcher.dispatch(&intent).await?;

        let folded = crate::normalize::fold_text(trimmed);
        let sentiment = analyze_sentiment(&folded, &self.lexicon);
        let intention = detect_intention(&folded, &self.lexicon);

        let composed = {
            let mut personality = self.lock_personality();
            personality.decay(self.idle_time());
            let mut rng = self.lock_rng();
            self.composer
                .compose(&result, sentiment, intention, &mut personality, &mut rng)
        };

        let audio = if want_voice {
            self.synthesize(&composed.message).await
        } else {
            None
        };

        self.push_turn(Role::Assistant, None, &composed.message);
        *self.lock_last_interaction() = Instant::now();

        Ok(AssistantReply {
            success: result.success,
            message: composed.message,
            action_taken: result.action_taken,
            module: result.module,
            data: result.data,
            suggestions: result.suggestions,
            required_fields: result.required_fields,
            emotion: composed.metadata,
            has_voice: audio.is_some(),
            audio,
        })
    }

    /// Speech synthesis, bounded by the configured timeout. Failure or
    /// timeout degrades to a text-only reply.
    async fn synthesize(&self, message: &str) -> Option<Vec<u8>> {
        let call = self
            .speech
            .synthesize(message, &self.config.voice, self.config.speech_speed);

        match tokio::time::timeout(self.config.speech_timeout, call).await {
            Ok(Ok(audio)) => audio,
            Ok(Err(err)) => {
                warn!(error = %err, "speech synthesis failed, replying text-only");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.speech_timeout.as_millis() as u64,
                    "speech synthesis timed out, replying text-only"
                );
                None
            }
        }
    }

    pub fn conversation_history(&self) -> Vec<ConversationTurn> {
        self.lock_history().clone()
    }

    pub fn clear_conversation(&self) {
        self.lock_history().clear();
        info!(session_id = %self.session_id, "conversation history cleared");
    }

    /// Snapshot of the current emotional state.
    pub fn personality_snapshot(&self) -> PersonalityState {
        self.lock_personality().clone()
    }

    fn reply_without_voice(&self, result: CommandResult) -> AssistantReply {
        let emotion = {
            let personality = self.lock_personality();
            EmotionSnapshot {
                emotion: personality.dominant().label().to_string(),
                mood: personality.mood(),
                confidence: personality.get(crate::response::EmotionDim::Confidence),
                style: crate::response::ResponseStyle::Professional,
            }
        };

        AssistantReply {
            success: result.success,
            message: result.message,
            action_taken: result.action_taken,
            module: result.module,
            data: result.data,
            suggestions: result.suggestions,
            required_fields: result.required_fields,
            emotion,
            audio: None,
            has_voice: false,
        }
    }

    fn push_turn(&self, role: Role, user_id: Option<&str>, text: &str) {
        let mut history = self.lock_history();
        history.push(ConversationTurn {
            timestamp: Local::now().naive_local(),
            user_id: user_id.map(str::to_string),
            role,
            text: text.to_string(),
        });

        let limit = self.config.history_limit;
        if history.len() > limit {
            let excess = history.len() - limit;
            history.drain(..excess);
        }
    }

    fn idle_time(&self) -> Duration {
        self.lock_last_interaction().elapsed()
    }

    fn lock_personality(&self) -> std::sync::MutexGuard<'_, PersonalityState> {
        self.personality
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, Vec<ConversationTurn>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_last_interaction(&self) -> std::sync::MutexGuard<'_, Instant> {
        self.last_interaction
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
