//! Command Classifier
//!
//! Stateless decision tree over the lexicon's ordered keyword tables.
//! Category routing is first-match-wins down the configured list; action
//! detection scores exact word hits with a position weight; entity detection
//! is substring lookup at fixed confidence.

use crate::intent::{CommandAction, CommandCategory, EntityKind};
use crate::lexicon::Lexicon;
use std::sync::Arc;

/// Confidence for an exact action keyword hit
const ACTION_HIT: f64 = 0.9;
/// Confidence when the keyword appears among the first three words
const ACTION_HIT_EARLY: f64 = 0.95;
/// Confidence for an inferred action with no explicit verb
const ACTION_INFERRED: f64 = 0.6;
/// Confidence for an entity keyword hit
const ENTITY_HIT: f64 = 0.95;

/// Keyword-driven classifier
pub struct CommandClassifier {
    lexicon: Arc<Lexicon>,
}

impl CommandClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Coarse routing category; the lexicon's declared order is the
    /// precedence policy.
    pub fn classify_category(&self, folded: &str) -> CommandCategory {
        for entry in &self.lexicon.categories {
            if entry.keywords.iter().any(|k| folded.contains(k.as_str())) {
                return entry.category;
            }
        }
        CommandCategory::General
    }

    /// Fine-grained CRUD action with confidence. Verbs in the first three
    /// words weigh more; with no explicit verb the action is inferred from
    /// question words or "novo/nova".
    pub fn detect_action(&self, folded: &str) -> (CommandAction, f64) {
        let words: Vec<&str> = folded.split_whitespace().collect();

        let mut best = (CommandAction::Unknown, 0.0f64);
        for entry in &self.lexicon.actions {
            for keyword in &entry.keywords {
                if let Some(position) = words.iter().position(|w| *w == keyword.as_str()) {
                    let confidence = if position < 3 { ACTION_HIT_EARLY } else { ACTION_HIT };
                    if confidence > best.1 {
                        best = (entry.action, confidence);
                    }
                }
            }
        }

        if best.0 == CommandAction::Unknown {
            if ["quais", "quantos", "lista"]
                .iter()
                .any(|k| folded.contains(k))
            {
                return (CommandAction::Read, ACTION_INFERRED);
            }
            if folded.contains("novo") || folded.contains("nova") {
                return (CommandAction::Create, ACTION_INFERRED);
            }
        }

        best
    }

    /// Entity kind mentioned in the utterance; the lexicon's declared order
    /// breaks ties between kinds at equal confidence.
    pub fn detect_entity(&self, folded: &str) -> (EntityKind, f64) {
        for entry in &self.lexicon.entities {
            if entry.keywords.iter().any(|k| folded.contains(k.as_str())) {
                return (entry.entity, ENTITY_HIT);
            }
        }
        (EntityKind::Unknown, 0.0)
    }
}
