//! Personality state
//!
//! The assistant keeps a set of named emotional dimensions, each in [0, 1].
//! Every interaction nudges them by small deltas depending on the detected
//! sentiment and intention; idle time pulls them back toward their
//! baselines. The state never leaves the [0, 1] envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Named emotional dimensions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EmotionDim {
    Happiness,
    Curiosity,
    Confidence,
    Empathy,
    Humor,
    Sarcasm,
    Loyalty,
    Patience,
}

impl EmotionDim {
    pub const ALL: [EmotionDim; 8] = [
        EmotionDim::Happiness,
        EmotionDim::Curiosity,
        EmotionDim::Confidence,
        EmotionDim::Empathy,
        EmotionDim::Humor,
        EmotionDim::Sarcasm,
        EmotionDim::Loyalty,
        EmotionDim::Patience,
    ];

    /// Baseline value the dimension starts at and decays toward.
    pub fn baseline(&self) -> f64 {
        match self {
            EmotionDim::Happiness => 0.7,
            EmotionDim::Curiosity => 0.8,
            EmotionDim::Confidence => 0.9,
            EmotionDim::Empathy => 0.8,
            EmotionDim::Humor => 0.6,
            EmotionDim::Sarcasm => 0.4,
            EmotionDim::Loyalty => 1.0,
            EmotionDim::Patience => 0.8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmotionDim::Happiness => "happy",
            EmotionDim::Curiosity => "curious",
            EmotionDim::Confidence => "confident",
            EmotionDim::Empathy => "empathetic",
            EmotionDim::Humor => "playful",
            EmotionDim::Sarcasm => "sarcastic",
            EmotionDim::Loyalty => "loyal",
            EmotionDim::Patience => "patient",
        }
    }
}

/// Detected sentiment of an utterance; urgent outranks the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Urgent,
    Positive,
    Negative,
    Neutral,
}

/// Detected conversational intention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intention {
    Greeting,
    Help,
    Create,
    Search,
    Report,
    Urgent,
    Casual,
    Appreciation,
    Complaint,
    General,
}

/// Additive deltas applied for a detected sentiment or intention
fn adjustments_for(key: AdjustmentKey) -> &'static [(EmotionDim, f64)] {
    match key {
        AdjustmentKey::Positive => &[
            (EmotionDim::Happiness, 0.05),
            (EmotionDim::Confidence, 0.02),
        ],
        AdjustmentKey::Negative => &[
            (EmotionDim::Happiness, -0.03),
            (EmotionDim::Empathy, 0.05),
            (EmotionDim::Patience, 0.03),
        ],
        AdjustmentKey::Urgent => &[
            (EmotionDim::Confidence, 0.03),
            (EmotionDim::Patience, -0.02),
        ],
        AdjustmentKey::Appreciation => &[
            (EmotionDim::Happiness, 0.08),
            (EmotionDim::Loyalty, 0.02),
        ],
        AdjustmentKey::Casual => &[(EmotionDim::Humor, 0.05), (EmotionDim::Sarcasm, 0.03)],
    }
}

#[derive(Debug, Clone, Copy)]
enum AdjustmentKey {
    Positive,
    Negative,
    Urgent,
    Appreciation,
    Casual,
}

impl Sentiment {
    fn adjustment_key(&self) -> Option<AdjustmentKey> {
        match self {
            Sentiment::Positive => Some(AdjustmentKey::Positive),
            Sentiment::Negative => Some(AdjustmentKey::Negative),
            Sentiment::Urgent => Some(AdjustmentKey::Urgent),
            Sentiment::Neutral => None,
        }
    }
}

impl Intention {
    fn adjustment_key(&self) -> Option<AdjustmentKey> {
        match self {
            Intention::Urgent => Some(AdjustmentKey::Urgent),
            Intention::Appreciation => Some(AdjustmentKey::Appreciation),
            Intention::Casual => Some(AdjustmentKey::Casual),
            _ => None,
        }
    }
}

/// The assistant's emotional state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityState {
    dims: BTreeMap<EmotionDim, f64>,
}

impl Default for PersonalityState {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonalityState {
    /// Fresh state at baseline values.
    pub fn new() -> Self {
        Self {
            dims: EmotionDim::ALL
                .iter()
                .map(|d| (*d, d.baseline()))
                .collect(),
        }
    }

    pub fn get(&self, dim: EmotionDim) -> f64 {
        self.dims.get(&dim).copied().unwrap_or_else(|| dim.baseline())
    }

    /// Additive, clamped adjustment.
    pub fn adjust(&mut self, dim: EmotionDim, delta: f64) {
        let value = self.dims.entry(dim).or_insert_with(|| dim.baseline());
        *value = (*value + delta).clamp(0.0, 1.0);
    }

    /// Apply the deltas for a detected sentiment and intention.
    pub fn apply(&mut self, sentiment: Sentiment, intention: Intention) {
        if let Some(key) = sentiment.adjustment_key() {
            for (dim, delta) in adjustments_for(key) {
                self.adjust(*dim, *delta);
            }
        }
        if let Some(key) = intention.adjustment_key() {
            for (dim, delta) in adjustments_for(key) {
                self.adjust(*dim, *delta);
            }
        }
    }

    /// Pull every dimension toward its baseline by 10% per idle hour.
    pub fn decay(&mut self, idle: Duration) {
        let hours = idle.as_secs_f64() / 3600.0;
        if hours <= 0.0 {
            return;
        }
        let factor = (0.1 * hours).min(1.0);
        for (dim, value) in self.dims.iter_mut() {
            *value += (dim.baseline() - *value) * factor;
            *value = value.clamp(0.0, 1.0);
        }
    }

    /// Currently dominant emotion.
    pub fn dominant(&self) -> EmotionDim {
        self.dims
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(dim, _)| *dim)
            .unwrap_or(EmotionDim::Confidence)
    }

    /// Overall mood: mean of the positive dimensions.
    pub fn mood(&self) -> f64 {
        let positive = [EmotionDim::Happiness, EmotionDim::Confidence, EmotionDim::Humor];
        positive.iter().map(|d| self.get(*d)).sum::<f64>() / positive.len() as f64
    }

    /// Iterate dimensions and values.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionDim, f64)> + '_ {
        self.dims.iter().map(|(d, v)| (*d, *v))
    }
}

/// Detect the sentiment of a folded utterance using the lexicon's ordered
/// sentiment table; the first matching group wins.
pub fn analyze_sentiment(folded: &str, lexicon: &crate::lexicon::Lexicon) -> Sentiment {
    for entry in &lexicon.sentiments {
        if entry.keywords.iter().any(|k| folded.contains(k.as_str())) {
            return entry.sentiment;
        }
    }
    Sentiment::Neutral
}

/// Detect the conversational intention of a folded utterance.
pub fn detect_intention(folded: &str, lexicon: &crate::lexicon::Lexicon) -> Intention {
    for entry in &lexicon.intentions {
        if entry.keywords.iter().any(|k| folded.contains(k.as_str())) {
            return entry.intention;
        }
    }
    Intention::General
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use proptest::prelude::*;

    #[test]
    fn test_baseline_initialization() {
        let state = PersonalityState::new();
        assert_eq!(state.get(EmotionDim::Loyalty), 1.0);
        assert_eq!(state.get(EmotionDim::Sarcasm), 0.4);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut state = PersonalityState::new();
        state.adjust(EmotionDim::Loyalty, 0.5);
        assert_eq!(state.get(EmotionDim::Loyalty), 1.0);
        state.adjust(EmotionDim::Happiness, -5.0);
        assert_eq!(state.get(EmotionDim::Happiness), 0.0);
    }

    #[test]
    fn test_apply_appreciation() {
        let mut state = PersonalityState::new();
        state.apply(Sentiment::Positive, Intention::Appreciation);
        // positive: +0.05, appreciation: +0.08
        assert!((state.get(EmotionDim::Happiness) - 0.83).abs() < 1e-9);
    }

    #[test]
    fn test_decay_moves_toward_baseline() {
        let mut state = PersonalityState::new();
        state.adjust(EmotionDim::Humor, 0.3);
        let before = state.get(EmotionDim::Humor);
        state.decay(Duration::from_secs(3600));
        let after = state.get(EmotionDim::Humor);
        assert!(after < before);
        assert!(after > EmotionDim::Humor.baseline());
    }

    #[test]
    fn test_decay_never_overshoots() {
        let mut state = PersonalityState::new();
        state.adjust(EmotionDim::Patience, -0.5);
        state.decay(Duration::from_secs(3600 * 1000));
        assert!((state.get(EmotionDim::Patience) - EmotionDim::Patience.baseline()).abs() < 1e-9);
    }

    #[test]
    fn test_sentiment_precedence() {
        let lexicon = Lexicon::embedded();
        // "urgente" outranks "problema".
        assert_eq!(
            analyze_sentiment("problema urgente no caixa", &lexicon),
            Sentiment::Urgent
        );
        assert_eq!(
            analyze_sentiment("obrigado pelo relatorio", &lexicon),
            Sentiment::Positive
        );
        assert_eq!(analyze_sentiment("listar vales", &lexicon), Sentiment::Neutral);
    }

    #[test]
    fn test_intention_detection() {
        let lexicon = Lexicon::embedded();
        assert_eq!(detect_intention("bom dia", &lexicon), Intention::Greeting);
        assert_eq!(
            detect_intention("valeu pela forca", &lexicon),
            Intention::Appreciation
        );
        assert_eq!(detect_intention("xyz abc", &lexicon), Intention::General);
    }

    proptest! {
        // Dimensions stay within [0, 1] under any interaction sequence.
        #[test]
        fn prop_dims_stay_in_unit_interval(steps in proptest::collection::vec((0u8..4, 0u8..10), 0..64)) {
            let mut state = PersonalityState::new();
            for (kind, intent) in steps {
                let sentiment = match kind {
                    0 => Sentiment::Urgent,
                    1 => Sentiment::Positive,
                    2 => Sentiment::Negative,
                    _ => Sentiment::Neutral,
                };
                let intention = match intent {
                    0 => Intention::Greeting,
                    1 => Intention::Help,
                    2 => Intention::Create,
                    3 => Intention::Search,
                    4 => Intention::Report,
                    5 => Intention::Urgent,
                    6 => Intention::Casual,
                    7 => Intention::Appreciation,
                    8 => Intention::Complaint,
                    _ => Intention::General,
                };
                state.apply(sentiment, intention);
                for (_, value) in state.iter() {
                    prop_assert!((0.0..=1.0).contains(&value));
                }
            }
        }
    }
}
