//! Keyword Lexicon
//!
//! YAML-driven dictionary of Portuguese command vocabulary: routing
//! categories, CRUD verbs, entity nouns, name-extraction stopwords, staff
//! name corrections and sentiment/intention word sets.
//!
//! Every table that carries precedence is an ordered list evaluated top to
//! bottom, so precedence is a visible configuration artifact rather than an
//! accident of code order.

use crate::error::LexiconError;
use crate::intent::{CommandAction, CommandCategory, EntityKind};
use crate::response::{Intention, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Default lexicon shipped with the crate
const EMBEDDED_LEXICON: &str = include_str!("../config/lexicon.yaml");

/// Ordered keyword group for a routing category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: CommandCategory,
    pub keywords: Vec<String>,
}

/// Ordered keyword group for a CRUD action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: CommandAction,
    pub keywords: Vec<String>,
}

/// Ordered keyword group for an entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEntry {
    pub entity: EntityKind,
    pub keywords: Vec<String>,
}

/// Ordered keyword group for a sentiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentEntry {
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
}

/// Ordered keyword group for a conversational intention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentionEntry {
    pub intention: Intention,
    pub keywords: Vec<String>,
}

/// The command lexicon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<CategoryEntry>,
    pub actions: Vec<ActionEntry>,
    pub entities: Vec<EntityEntry>,
    pub name_exclusions: Vec<String>,
    #[serde(default)]
    pub name_corrections: HashMap<String, String>,
    pub sentiments: Vec<SentimentEntry>,
    pub intentions: Vec<IntentionEntry>,
}

impl Lexicon {
    /// Parse a lexicon from a YAML string.
    pub fn load_from_str(yaml: &str) -> Result<Self, LexiconError> {
        let lexicon: Lexicon = serde_yaml::from_str(yaml)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Load a lexicon from a YAML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// The lexicon embedded in the crate. The asset is validated by the
    /// crate's own tests, so parsing it cannot fail at runtime.
    pub fn embedded() -> Self {
        Self::load_from_str(EMBEDDED_LEXICON).expect("embedded lexicon is valid")
    }

    fn validate(&self) -> Result<(), LexiconError> {
        for (table, empty) in [
            ("categories", self.categories.is_empty()),
            ("actions", self.actions.is_empty()),
            ("entities", self.entities.is_empty()),
            ("sentiments", self.sentiments.is_empty()),
            ("intentions", self.intentions.is_empty()),
        ] {
            if empty {
                return Err(LexiconError::MissingTable {
                    table: table.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Name-extraction stopwords as a lookup set.
    pub fn exclusion_set(&self) -> HashSet<&str> {
        self.name_exclusions.iter().map(String::as_str).collect()
    }

    /// Keywords for a specific entity kind, if listed.
    pub fn entity_keywords(&self, kind: EntityKind) -> Option<&[String]> {
        self.entities
            .iter()
            .find(|e| e.entity == kind)
            .map(|e| e.keywords.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_lexicon_parses() {
        let lexicon = Lexicon::embedded();
        assert_eq!(lexicon.version, "1.0");
        assert!(!lexicon.categories.is_empty());
        assert!(!lexicon.name_exclusions.is_empty());
    }

    #[test]
    fn test_category_precedence_is_declared_order() {
        let lexicon = Lexicon::embedded();
        // "criar" routes before "buscar": create is listed first.
        assert_eq!(lexicon.categories[0].category, CommandCategory::Create);
        assert_eq!(lexicon.categories[1].category, CommandCategory::Search);
    }

    #[test]
    fn test_corrections_are_folded_forms() {
        let lexicon = Lexicon::embedded();
        assert_eq!(
            lexicon.name_corrections.get("darwin").map(String::as_str),
            Some("darvin")
        );
    }

    #[test]
    fn test_missing_table_rejected() {
        let yaml = r#"
version: "1.0"
categories:
  - category: create
    keywords: [criar]
actions: []
entities:
  - entity: vale
    keywords: [vale]
name_exclusions: [vale]
sentiments:
  - sentiment: urgent
    keywords: [urgente]
intentions:
  - intention: greeting
    keywords: [oi]
"#;
        assert!(matches!(
            Lexicon::load_from_str(yaml),
            Err(LexiconError::MissingTable { .. })
        ));
    }
}
