//! Command Interpreter
//!
//! Composes the classifier and the lexical extractors into a structured
//! [`Intent`]: action, entity, slots and filters, with a combined
//! confidence. Missing required slots do not fail interpretation; the
//! dispatcher turns partial intents into clarification requests.

use crate::extract::{extract_amount, extract_count, extract_date, extract_name};
use crate::intent::{
    classifier::CommandClassifier, CommandAction, CommandCategory, EntityKind, Intent, SlotValue,
};
use crate::lexicon::Lexicon;
use crate::normalize::fold_text;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Ordered status keyword → canonical filter value
const STATUS_FILTERS: &[(&str, &str)] = &[
    ("pendente", "pending"),
    ("aprovado", "approved"),
    ("pago", "paid"),
    ("confirmad", "confirmed"),
    ("entregu", "delivered"),
    ("cancelad", "cancelled"),
];

/// Ordered time keyword → canonical filter value
const TIME_FILTERS: &[(&str, &str)] = &[
    ("hoje", "today"),
    ("ontem", "yesterday"),
    ("esta semana", "this_week"),
    ("essa semana", "this_week"),
    ("este mes", "this_month"),
    ("esse mes", "this_month"),
    ("mes passado", "last_month"),
];

/// Ordered value-condition keyword → canonical filter value
const VALUE_CONDITIONS: &[(&str, &str)] = &[
    ("acima de", "greater_than"),
    ("abaixo de", "less_than"),
    ("igual a", "equal_to"),
    ("entre", "between"),
];

/// Utterance → Intent
pub struct CommandInterpreter {
    lexicon: Arc<Lexicon>,
    classifier: CommandClassifier,
}

impl CommandInterpreter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let classifier = CommandClassifier::new(lexicon.clone());
        Self {
            lexicon,
            classifier,
        }
    }

    /// Interpret one utterance. Always succeeds; unrecognized input comes
    /// back with confidence below the recognition threshold.
    pub fn interpret(&self, text: &str) -> Intent {
        let raw = text.trim();
        let folded = fold_text(raw);

        let category = self.classifier.classify_category(&folded);
        let (action, action_confidence) = self.classifier.detect_action(&folded);
        let (entity_type, entity_confidence) = self.classifier.detect_entity(&folded);

        let entities = self.extract_slots(raw, &folded);
        let filters = self.extract_filters(&folded);

        let confidence = (action_confidence + entity_confidence) / 2.0;

        let intent = Intent {
            action,
            entity_type,
            category,
            entities,
            filters,
            confidence,
            raw_text: raw.to_string(),
        };

        debug!(
            action = ?intent.action,
            entity = ?intent.entity_type,
            category = ?intent.category,
            confidence = intent.confidence,
            "interpreted utterance"
        );

        intent
    }

    fn extract_slots(&self, raw: &str, folded: &str) -> HashMap<String, SlotValue> {
        let mut entities = HashMap::new();

        if let Some(amount) = extract_amount(raw) {
            entities.insert("amount".to_string(), SlotValue::Number(amount));
        }

        let exclusions = self.lexicon.exclusion_set();
        if let Some(name) = extract_name(raw, &exclusions) {
            entities.insert("person_name".to_string(), SlotValue::Text(name));
        }

        if let Some(date) = extract_date(raw) {
            entities.insert("date".to_string(), SlotValue::Date(date));
        }

        if let Some(count) = extract_count(raw) {
            entities.insert("count".to_string(), SlotValue::Number(count as f64));
        }

        if folded.contains("ultimo") || folded.contains("ultima") {
            entities.insert("target".to_string(), SlotValue::Text("last".to_string()));
        } else if folded.contains("primeiro") || folded.contains("primeira") {
            entities.insert("target".to_string(), SlotValue::Text("first".to_string()));
        } else if folded.contains("todos") || folded.contains("todas") {
            entities.insert("target".to_string(), SlotValue::Text("all".to_string()));
        }

        entities
    }

    fn extract_filters(&self, folded: &str) -> HashMap<String, String> {
        let mut filters = HashMap::new();

        for (keyword, value) in STATUS_FILTERS {
            if folded.contains(keyword) {
                filters.insert("status".to_string(), value.to_string());
                break;
            }
        }

        for (keyword, value) in TIME_FILTERS {
            if folded.contains(keyword) {
                filters.insert("time_filter".to_string(), value.to_string());
                break;
            }
        }

        for (keyword, value) in VALUE_CONDITIONS {
            if folded.contains(keyword) {
                filters.insert("value_condition".to_string(), value.to_string());
                break;
            }
        }

        if folded.contains("mais recente") {
            filters.insert("order".to_string(), "desc".to_string());
        } else if folded.contains("mais antigo") {
            filters.insert("order".to_string(), "asc".to_string());
        }

        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(Lexicon::embedded()))
    }

    #[test]
    fn test_vale_creation_intent() {
        let intent = interpreter().interpret("criar vale de 200 para Josemir");

        assert_eq!(intent.action, CommandAction::Create);
        assert_eq!(intent.entity_type, EntityKind::Vale);
        assert_eq!(intent.category, CommandCategory::Create);
        assert_eq!(intent.number_slot("amount"), Some(200.0));
        assert_eq!(intent.text_slot("person_name"), Some("Josemir"));
        assert!(intent.confidence >= 0.8);
    }

    #[test]
    fn test_partial_intent_keeps_confidence() {
        // No amount and no name: still a recognized vale-creation command.
        let intent = interpreter().interpret("criar vale");

        assert_eq!(intent.action, CommandAction::Create);
        assert_eq!(intent.entity_type, EntityKind::Vale);
        assert!(intent.is_recognized());
        assert!(intent.number_slot("amount").is_none());
        assert!(intent.text_slot("person_name").is_none());
    }

    #[test]
    fn test_unrecognized_utterance() {
        let intent = interpreter().interpret("zzz bzz fff");
        assert!(intent.confidence <= 0.3);
        assert!(!intent.is_recognized());
        assert_eq!(intent.action, CommandAction::Unknown);
    }

    #[test]
    fn test_status_filter() {
        let intent = interpreter().interpret("mostrar vales pendentes");
        assert_eq!(intent.filter("status"), Some("pending"));
        assert_eq!(intent.entity_type, EntityKind::Vale);
    }

    #[test]
    fn test_time_filter_and_ordering() {
        let intent = interpreter().interpret("listar pedidos de hoje mais recentes");
        assert_eq!(intent.filter("time_filter"), Some("today"));
        assert_eq!(intent.filter("order"), Some("desc"));
    }

    #[test]
    fn test_target_marker() {
        let intent = interpreter().interpret("excluir último vale");
        assert_eq!(intent.action, CommandAction::Delete);
        assert_eq!(intent.text_slot("target"), Some("last"));
    }

    #[test]
    fn test_value_condition() {
        let intent = interpreter().interpret("mostrar vales acima de 100");
        assert_eq!(intent.filter("value_condition"), Some("greater_than"));
    }

    #[test]
    fn test_approve_action() {
        let intent = interpreter().interpret("aprovar vales pendentes do Josemir");
        assert_eq!(intent.action, CommandAction::Approve);
        assert_eq!(intent.category, CommandCategory::Action);
        assert_eq!(intent.text_slot("person_name"), Some("Josemir"));
    }
}
