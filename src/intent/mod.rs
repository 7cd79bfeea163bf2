//! Intent model
//!
//! An [`Intent`] is the structured interpretation of one user utterance:
//! action, entity type, extracted slots, filters and a confidence score.
//! It is built fresh per utterance, never mutated, and discarded once the
//! dispatcher has produced a result.

pub mod classifier;
pub mod interpreter;

pub use classifier::CommandClassifier;
pub use interpreter::CommandInterpreter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence below this value means the utterance was not recognized.
pub const CONFIDENCE_THRESHOLD: f64 = 0.3;

/// CRUD-style action identified in an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Create,
    Read,
    Update,
    Delete,
    Approve,
    Pay,
    Confirm,
    Cancel,
    Open,
    Close,
    Unknown,
}

/// Domain entity an utterance talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vale,
    Customer,
    Employee,
    Order,
    Jewelry,
    InventoryItem,
    CashTransaction,
    Note,
    Report,
    Unknown,
}

impl EntityKind {
    /// Module name used in command results (matches the ERP's UI modules).
    pub fn module(&self) -> &'static str {
        match self {
            EntityKind::Vale => "vales",
            EntityKind::Customer => "clientes",
            EntityKind::Employee => "funcionarios",
            EntityKind::Order => "encomendas",
            EntityKind::Jewelry => "joias",
            EntityKind::InventoryItem => "estoque",
            EntityKind::CashTransaction => "caixa",
            EntityKind::Note => "notas",
            EntityKind::Report => "relatorios",
            EntityKind::Unknown => "geral",
        }
    }
}

/// Coarse routing category, chosen by the first matching keyword group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    Create,
    Search,
    Report,
    Action,
    Financial,
    Inventory,
    General,
}

/// A value extracted into a named slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SlotValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SlotValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Structured interpretation of a single utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Action the user asked for
    pub action: CommandAction,
    /// Entity type the action targets
    pub entity_type: EntityKind,
    /// Coarse routing category
    pub category: CommandCategory,
    /// Extracted slot values; an absent key means "not mentioned"
    pub entities: HashMap<String, SlotValue>,
    /// Qualifiers such as status, time_filter, order
    pub filters: HashMap<String, String>,
    /// Combined confidence in [0, 1]
    pub confidence: f64,
    /// Original utterance, kept for logging and suggestions
    pub raw_text: String,
}

impl Intent {
    /// Whether the utterance was recognized at all.
    pub fn is_recognized(&self) -> bool {
        self.confidence >= CONFIDENCE_THRESHOLD
    }

    pub fn text_slot(&self, name: &str) -> Option<&str> {
        self.entities.get(name).and_then(SlotValue::as_text)
    }

    pub fn number_slot(&self, name: &str) -> Option<f64> {
        self.entities.get(name).and_then(SlotValue::as_number)
    }

    pub fn date_slot(&self, name: &str) -> Option<NaiveDate> {
        self.entities.get(name).and_then(SlotValue::as_date)
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_accessors() {
        let mut entities = HashMap::new();
        entities.insert("amount".to_string(), SlotValue::Number(200.0));
        entities.insert(
            "person_name".to_string(),
            SlotValue::Text("Josemir".to_string()),
        );

        let intent = Intent {
            action: CommandAction::Create,
            entity_type: EntityKind::Vale,
            category: CommandCategory::Create,
            entities,
            filters: HashMap::new(),
            confidence: 0.9,
            raw_text: "criar vale de 200 para Josemir".to_string(),
        };

        assert_eq!(intent.number_slot("amount"), Some(200.0));
        assert_eq!(intent.text_slot("person_name"), Some("Josemir"));
        assert!(intent.text_slot("missing").is_none());
        assert!(intent.is_recognized());
    }

    #[test]
    fn test_low_confidence_is_unrecognized() {
        let intent = Intent {
            action: CommandAction::Unknown,
            entity_type: EntityKind::Unknown,
            category: CommandCategory::General,
            entities: HashMap::new(),
            filters: HashMap::new(),
            confidence: 0.1,
            raw_text: "xyz".to_string(),
        };
        assert!(!intent.is_recognized());
    }
}
