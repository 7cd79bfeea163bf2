//! LUA assistant core
//!
//! Natural-language command pipeline for the jewelry ERP's virtual
//! assistant: free-form Portuguese text in, a typed business outcome and a
//! personality-toned confirmation out.
//!
//! ## Pipeline
//!
//! ```text
//! utterance
//!     │
//!     ▼
//! Extractors + Classifier ──► Intent (action, entity, slots, filters)
//!     │                            │
//!     ▼                            ▼
//! NameResolver              Dispatcher ──► CommandResult
//!                                              │
//!                                              ▼
//!                            ResponseComposer ──► final text (+ audio)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lua_assistant::assistant::Assistant;
//! use lua_assistant::speech::NullSpeech;
//! use lua_assistant::store::MemoryStore;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryStore::new().with_employee("Josemir", "Ourives", 2500.0));
//! let assistant = Assistant::new(store, NullSpeech);
//!
//! let reply = assistant
//!     .interpret_and_execute("criar vale de 200 para Josemir", None, false)
//!     .await?;
//! assert!(reply.success);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Text normalization shared by matching and resolution
pub mod normalize;

// Keyword lexicon (YAML-driven configuration)
pub mod lexicon;

// Lexical extractors: amounts, names, dates, counts
pub mod extract;

// Fuzzy name-to-record resolution
pub mod resolver;

// Intent model, classifier and interpreter
pub mod intent;

// Domain records
pub mod models;

// Data-access collaborator trait + in-memory implementation
pub mod store;

// Business dispatcher
pub mod dispatch;

// Response composition and personality state
pub mod response;

// Speech-synthesis collaborator trait
pub mod speech;

// Externally visible facade
pub mod assistant;

// Public re-exports for the common entry points
pub use assistant::{Assistant, AssistantConfig, AssistantReply, ConversationTurn, Role};
pub use dispatch::{ActionTaken, CommandResult, Dispatcher};
pub use error::{AssistantError, AssistantResult, StoreError};
pub use intent::{CommandAction, CommandCategory, CommandInterpreter, EntityKind, Intent};
pub use lexicon::Lexicon;
pub use resolver::{NameResolver, NameScorer};
pub use response::{EmotionDim, PersonalityState, ResponseComposer};
pub use speech::{NullSpeech, SpeechSynthesizer};
pub use store::{ErpStore, MemoryStore};
