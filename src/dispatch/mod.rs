//! Business Dispatcher
//!
//! Maps a structured [`Intent`] to a concrete operation against the store
//! and produces a typed [`CommandResult`]. Every mutation path brackets the
//! store with commit/rollback: a persistence failure rolls the transaction
//! back and comes back as a failure result, never as a visible partial
//! write and never as a panic.

mod customers;
mod finance;
mod general;
mod inventory;
mod reports;
mod vales;

use crate::error::{AssistantResult, StoreResult};
use crate::intent::{CommandAction, CommandCategory, EntityKind, Intent};
use crate::lexicon::Lexicon;
use crate::models::ValeStatus;
use crate::normalize::fold_text;
use crate::resolver::NameResolver;
use crate::store::ErpStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the dispatcher actually did with a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    Created,
    Deleted,
    Listed,
    Reported,
    Approved,
    Paid,
    Confirmed,
    Registered,
    Balance,
    ProfitAnalysis,
    StockCheck,
    OutOfStock,
    LowStock,
    StockAdded,
    OpenForm,
    Exists,
    Suggest,
    RequestInfo,
    Greeting,
    Help,
    Status,
    Failed,
    Fallback,
}

/// Structured outcome of executing a business operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub action_taken: ActionTaken,
    pub module: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Slots the user still has to provide, for clarification requests
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl CommandResult {
    pub fn ok(module: &str, action_taken: ActionTaken, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            action_taken,
            module: module.to_string(),
            data: Value::Null,
            suggestions: Vec::new(),
            required_fields: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            action_taken: ActionTaken::Failed,
            module: String::new(),
            data: Value::Null,
            suggestions: Vec::new(),
            required_fields: Vec::new(),
        }
    }

    /// Clarification request naming the missing slots.
    pub fn request_info(message: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            success: false,
            message: message.into(),
            action_taken: ActionTaken::RequestInfo,
            module: String::new(),
            data: Value::Null,
            suggestions: Vec::new(),
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_module(mut self, module: &str) -> Self {
        self.module = module.to_string();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Intent → business operation router
pub struct Dispatcher<S: ErpStore> {
    pub(crate) store: Arc<S>,
    pub(crate) resolver: NameResolver,
}

impl<S: ErpStore> Dispatcher<S> {
    pub fn new(store: Arc<S>, lexicon: &Lexicon) -> Self {
        let resolver = NameResolver::new(lexicon.name_corrections.clone());
        Self { store, resolver }
    }

    /// Swap the resolver (e.g. for a different similarity strategy).
    pub fn with_resolver(mut self, resolver: NameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Execute the operation an intent describes.
    ///
    /// User-level problems (unrecognized command, missing slots, unknown
    /// names, store failures) come back inside the `CommandResult`; an
    /// `Err` here means the intent itself was malformed.
    pub async fn dispatch(&self, intent: &Intent) -> AssistantResult<CommandResult> {
        let folded = fold_text(&intent.raw_text);
        debug!(category = ?intent.category, action = ?intent.action, "dispatching");

        if !intent.is_recognized() {
            // Greetings, help and status carry no CRUD verb or entity noun;
            // the general handler picks them up before falling back.
            let outcome = self.handle_general(intent, &folded).await;
            return Ok(self.settle(outcome).await);
        }

        // Deletion has no keyword category of its own; route it by action.
        if intent.action == CommandAction::Delete {
            let outcome = self.handle_delete(intent).await;
            return Ok(self.settle(outcome).await);
        }

        // Question-form queries ("quanto temos de ouro", "quais os vales")
        // carry a read verb and an entity but match no category keyword.
        if intent.category == CommandCategory::General
            && intent.action == CommandAction::Read
            && intent.entity_type != EntityKind::Unknown
        {
            let outcome = self.handle_search(intent, &folded).await;
            return Ok(self.settle(outcome).await);
        }

        let outcome = match intent.category {
            CommandCategory::Create => self.handle_create(intent, &folded).await,
            CommandCategory::Search => self.handle_search(intent, &folded).await,
            CommandCategory::Report => self.handle_report(intent, &folded).await,
            CommandCategory::Action => self.handle_action(intent, &folded).await,
            CommandCategory::Financial => self.handle_financial(intent, &folded).await,
            CommandCategory::Inventory => self.handle_inventory(intent, &folded).await,
            CommandCategory::General => self.handle_general(intent, &folded).await,
        };

        Ok(self.settle(outcome).await)
    }

    /// Convert a store failure into a failure result after rolling back the
    /// in-flight transaction.
    async fn settle(&self, outcome: StoreResult<CommandResult>) -> CommandResult {
        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "store operation failed, rolling back");
                if let Err(rollback_err) = self.store.rollback().await {
                    warn!(error = %rollback_err, "rollback also failed");
                }
                CommandResult::failure(format!("Erro ao acessar os dados: {}", err))
            }
        }
    }

    async fn handle_create(&self, intent: &Intent, folded: &str) -> StoreResult<CommandResult> {
        match intent.entity_type {
            EntityKind::Vale => self.create_vale(intent, folded).await,
            EntityKind::Customer => self.create_customer(intent).await,
            EntityKind::Order => self.create_order(intent).await,
            EntityKind::Employee => Ok(self.create_employee_form(intent)),
            EntityKind::Note => self.create_note(intent).await,
            // "adicionar 10 de prata" carries a create verb but targets stock.
            EntityKind::InventoryItem => self.add_stock(intent, folded).await,
            _ => Ok(CommandResult::failure(
                "Não entendi o que deseja criar. Posso criar: vales, clientes, \
                 funcionários, encomendas ou notas.",
            )),
        }
    }

    async fn handle_search(&self, intent: &Intent, folded: &str) -> StoreResult<CommandResult> {
        match intent.entity_type {
            EntityKind::Vale => self.list_vales(intent).await,
            EntityKind::Customer => self.search_customers(intent).await,
            EntityKind::Order => self.search_orders(intent, folded).await,
            EntityKind::Employee => self.list_employees().await,
            EntityKind::Jewelry => self.search_jewelry(folded).await,
            EntityKind::InventoryItem => self.handle_inventory(intent, folded).await,
            _ => Ok(CommandResult::failure(
                "Não entendi o que deseja buscar. Posso buscar: vales, clientes, \
                 encomendas, funcionários ou joias.",
            )),
        }
    }

    async fn handle_action(&self, intent: &Intent, _folded: &str) -> StoreResult<CommandResult> {
        match intent.action {
            CommandAction::Approve if intent.entity_type == EntityKind::Vale => {
                self.approve_vales(intent).await
            }
            CommandAction::Pay if intent.entity_type == EntityKind::Vale => {
                self.pay_vales(intent).await
            }
            CommandAction::Confirm if intent.entity_type == EntityKind::Order => {
                self.confirm_orders().await
            }
            _ => Ok(CommandResult::failure(
                "Ação não reconhecida. Posso: aprovar vales, pagar vales, \
                 confirmar encomendas ou cancelar operações.",
            )),
        }
    }

    async fn handle_delete(&self, intent: &Intent) -> StoreResult<CommandResult> {
        match intent.entity_type {
            EntityKind::Vale => self.delete_vale(intent).await,
            _ => Ok(CommandResult::failure(
                "Ainda não sei excluir esse tipo de registro.",
            )),
        }
    }

    /// Parse the canonical status filter into a vale status.
    pub(crate) fn vale_status_filter(&self, intent: &Intent) -> Option<ValeStatus> {
        match intent.filter("status") {
            Some("pending") => Some(ValeStatus::Pending),
            Some("approved") => Some(ValeStatus::Approved),
            Some("paid") => Some(ValeStatus::Paid),
            _ => None,
        }
    }

    /// Resolve the employee a command refers to, if it names one.
    pub(crate) async fn resolve_employee(
        &self,
        intent: &Intent,
    ) -> StoreResult<EmployeeLookup> {
        let Some(name) = intent.text_slot("person_name") else {
            return Ok(EmployeeLookup::NotMentioned);
        };

        let employees = self.store.active_employees().await?;
        match self.resolver.resolve(name, &employees) {
            Some(employee) => Ok(EmployeeLookup::Found(employee.clone())),
            None => {
                let mut suggestions = self.resolver.suggestions(name, &employees);
                suggestions.truncate(5);
                if suggestions.is_empty() {
                    suggestions = employees.iter().take(5).map(|e| e.name.clone()).collect();
                }
                Ok(EmployeeLookup::Unknown {
                    name: name.to_string(),
                    suggestions,
                })
            }
        }
    }
}

/// Outcome of resolving a person slot against the employee roster
pub(crate) enum EmployeeLookup {
    NotMentioned,
    Found(crate::models::Employee),
    Unknown {
        name: String,
        suggestions: Vec<String>,
    },
}

impl EmployeeLookup {
    /// The standard failure result for an unresolved employee name.
    pub(crate) fn not_found_result(name: &str, suggestions: Vec<String>) -> CommandResult {
        CommandResult::failure(format!(
            "Funcionário \"{}\" não encontrado. Você quis dizer um destes?",
            name
        ))
        .with_suggestions(suggestions)
    }
}
