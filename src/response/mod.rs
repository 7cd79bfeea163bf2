//! Response Composer
//!
//! Renders a dispatcher result into the final user-facing text, blended
//! with the personality layer: a style-appropriate opening, the factual
//! message (always preserved verbatim), and occasional flourishes gated by
//! the current emotional state. Randomness comes from an injected RNG so
//! tests can pin phrase selection.

pub mod personality;
mod phrases;

pub use personality::{
    analyze_sentiment, detect_intention, EmotionDim, Intention, PersonalityState, Sentiment,
};

use crate::dispatch::{ActionTaken, CommandResult};
use chrono::Timelike;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tone bucket a response is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    Greeting,
    Efficient,
    Humble,
    Witty,
    Friendly,
    Supportive,
    Sarcastic,
    Professional,
}

/// Emotional metadata attached to a composed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    /// Dominant emotion label (e.g. "confident")
    pub emotion: String,
    /// Mean of the positive dimensions
    pub mood: f64,
    /// Current confidence dimension
    pub confidence: f64,
    /// Style the response was rendered in
    pub style: ResponseStyle,
}

/// A rendered response plus its metadata
#[derive(Debug, Clone)]
pub struct ComposedResponse {
    pub message: String,
    pub metadata: EmotionSnapshot,
}

/// The response composer
#[derive(Debug, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Pick the style bucket for this interaction. The sarcastic override
    /// fires with probability `sarcasm * 0.3`.
    pub fn choose_style(
        &self,
        intention: Intention,
        sentiment: Sentiment,
        state: &PersonalityState,
        rng: &mut StdRng,
    ) -> ResponseStyle {
        match (intention, sentiment) {
            (Intention::Greeting, _) => ResponseStyle::Greeting,
            (Intention::Urgent, _) | (_, Sentiment::Urgent) => ResponseStyle::Efficient,
            (Intention::Appreciation, _) => ResponseStyle::Humble,
            (Intention::Casual, _) => {
                if state.get(EmotionDim::Humor) > 0.5 {
                    ResponseStyle::Witty
                } else {
                    ResponseStyle::Friendly
                }
            }
            (_, Sentiment::Negative) => ResponseStyle::Supportive,
            _ => {
                if rng.gen::<f64>() < state.get(EmotionDim::Sarcasm) * 0.3 {
                    ResponseStyle::Sarcastic
                } else {
                    ResponseStyle::Professional
                }
            }
        }
    }

    /// Render the final text. The dispatcher's factual message is always
    /// contained in the output; the opening and flourishes only augment it.
    pub fn compose(
        &self,
        result: &CommandResult,
        sentiment: Sentiment,
        intention: Intention,
        state: &mut PersonalityState,
        rng: &mut StdRng,
    ) -> ComposedResponse {
        state.apply(sentiment, intention);

        let style = self.choose_style(intention, sentiment, state, rng);
        let thought = self.internal_thought(sentiment, rng);
        debug!(?style, thought, "composing response");

        let mut message = if result.success && result.action_taken != ActionTaken::Greeting {
            format!("{}\n\n{}", self.opening(style, rng), result.message)
        } else {
            result.message.clone()
        };

        self.append_flourishes(&mut message, style, state, rng);

        let metadata = EmotionSnapshot {
            emotion: state.dominant().label().to_string(),
            mood: state.mood(),
            confidence: state.get(EmotionDim::Confidence),
            style,
        };

        ComposedResponse { message, metadata }
    }

    fn opening(&self, style: ResponseStyle, rng: &mut StdRng) -> String {
        let table: &[&str] = match style {
            ResponseStyle::Greeting => phrases::GREETINGS,
            ResponseStyle::Efficient => phrases::EFFICIENT,
            ResponseStyle::Humble => phrases::HUMBLE,
            ResponseStyle::Witty => phrases::WITTY,
            ResponseStyle::Friendly => phrases::FRIENDLY,
            ResponseStyle::Supportive => phrases::SUPPORTIVE,
            ResponseStyle::Sarcastic => phrases::SARCASTIC,
            ResponseStyle::Professional => phrases::PROFESSIONAL,
        };

        let phrase = table[rng.gen_range(0..table.len())];
        if phrase.contains("{time}") {
            phrase.replace("{time}", time_of_day())
        } else {
            phrase.to_string()
        }
    }

    fn append_flourishes(
        &self,
        message: &mut String,
        style: ResponseStyle,
        state: &PersonalityState,
        rng: &mut StdRng,
    ) {
        if state.get(EmotionDim::Confidence) > 0.8 && rng.gen::<f64>() > 0.7 {
            message.push_str(" Posso garantir eficiência máxima nesta operação.");
        }

        if state.get(EmotionDim::Humor) > 0.7 && style == ResponseStyle::Witty {
            let extra = phrases::HUMOR_FLOURISHES[rng.gen_range(0..phrases::HUMOR_FLOURISHES.len())];
            message.push(' ');
            message.push_str(extra);
        }

        if state.get(EmotionDim::Empathy) > 0.8 && style == ResponseStyle::Supportive {
            message.push_str(" Estou aqui para ajudar no que precisar.");
        }
    }

    fn internal_thought(&self, sentiment: Sentiment, rng: &mut StdRng) -> &'static str {
        let table: &[&str] = match sentiment {
            Sentiment::Urgent => phrases::THOUGHTS_URGENT,
            Sentiment::Positive => phrases::THOUGHTS_POSITIVE,
            Sentiment::Negative => phrases::THOUGHTS_NEGATIVE,
            Sentiment::Neutral => phrases::THOUGHTS_DEFAULT,
        };
        table[rng.gen_range(0..table.len())]
    }
}

fn time_of_day() -> &'static str {
    let hour = chrono::Local::now().hour();
    if (5..12).contains(&hour) {
        "dia"
    } else if (12..18).contains(&hour) {
        "tarde"
    } else {
        "noite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::CommandResult;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_factual_message_always_preserved() {
        let composer = ResponseComposer::new();
        let mut state = PersonalityState::new();
        let mut rng = seeded();

        let result = CommandResult::ok(
            "vales",
            ActionTaken::Created,
            "Vale criado com sucesso! Josemir receberá R$ 200.00.",
        );

        let composed = composer.compose(
            &result,
            Sentiment::Neutral,
            Intention::Create,
            &mut state,
            &mut rng,
        );

        assert!(composed
            .message
            .contains("Vale criado com sucesso! Josemir receberá R$ 200.00."));
    }

    #[test]
    fn test_failure_message_untouched_by_opening() {
        let composer = ResponseComposer::new();
        let mut state = PersonalityState::new();
        let mut rng = seeded();

        let result = CommandResult::failure("Funcionário não encontrado.");
        let composed = composer.compose(
            &result,
            Sentiment::Neutral,
            Intention::General,
            &mut state,
            &mut rng,
        );

        assert!(composed.message.starts_with("Funcionário não encontrado."));
    }

    #[test]
    fn test_urgent_maps_to_efficient_style() {
        let composer = ResponseComposer::new();
        let state = PersonalityState::new();
        let mut rng = seeded();

        let style = composer.choose_style(
            Intention::General,
            Sentiment::Urgent,
            &state,
            &mut rng,
        );
        assert_eq!(style, ResponseStyle::Efficient);
    }

    #[test]
    fn test_seeded_composition_is_deterministic() {
        let composer = ResponseComposer::new();
        let result = CommandResult::ok("vales", ActionTaken::Listed, "3 vales encontrados.");

        let render = || {
            let mut state = PersonalityState::new();
            let mut rng = StdRng::seed_from_u64(42);
            composer
                .compose(
                    &result,
                    Sentiment::Neutral,
                    Intention::Search,
                    &mut state,
                    &mut rng,
                )
                .message
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_sarcasm_never_fires_at_zero() {
        let composer = ResponseComposer::new();
        let mut state = PersonalityState::new();
        state.adjust(EmotionDim::Sarcasm, -1.0);
        let mut rng = seeded();

        for _ in 0..64 {
            let style = composer.choose_style(
                Intention::General,
                Sentiment::Neutral,
                &state,
                &mut rng,
            );
            assert_eq!(style, ResponseStyle::Professional);
        }
    }

    #[test]
    fn test_metadata_reflects_state() {
        let composer = ResponseComposer::new();
        let mut state = PersonalityState::new();
        let mut rng = seeded();

        let result = CommandResult::ok("caixa", ActionTaken::Balance, "Saldo: R$ 10.00");
        let composed = composer.compose(
            &result,
            Sentiment::Positive,
            Intention::General,
            &mut state,
            &mut rng,
        );

        assert!(composed.metadata.mood > 0.0);
        assert!(!composed.metadata.emotion.is_empty());
    }
}
