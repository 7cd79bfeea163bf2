//! Greetings, help, system status and the unrecognized-command fallback

use super::{ActionTaken, CommandResult, Dispatcher};
use crate::error::StoreResult;
use crate::intent::Intent;
use crate::normalize::fold_text;
use crate::store::ErpStore;
use chrono::{Local, Timelike};
use serde_json::json;

/// Command templates offered when an utterance is not understood
const COMMON_COMMANDS: &[&str] = &[
    "criar vale de [valor] para [funcionário]",
    "excluir último vale",
    "listar pedidos pendentes",
    "mostrar clientes",
    "gerar relatório de vendas",
    "aprovar vales pendentes",
    "pagar vale de [funcionário]",
    "qual o saldo do caixa",
    "buscar funcionário [nome]",
];

/// Maximum suggestions in a fallback response
const MAX_SUGGESTIONS: usize = 3;

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn handle_general(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        if ["ola", "oi", "bom dia", "boa tarde", "boa noite"]
            .iter()
            .any(|g| folded.contains(g))
        {
            return Ok(self.greeting());
        }

        if folded.contains("ajuda") || folded.contains("help") || folded.contains("comandos") {
            return Ok(self.help());
        }

        if folded.contains("status") || folded.contains("sistema") {
            return self.system_status().await;
        }

        Ok(self.fallback(intent, folded))
    }

    fn greeting(&self) -> CommandResult {
        let hour = Local::now().hour();
        let greeting = if hour < 12 {
            "Bom dia"
        } else if hour < 18 {
            "Boa tarde"
        } else {
            "Boa noite"
        };

        CommandResult::ok(
            "geral",
            ActionTaken::Greeting,
            format!(
                "{}, senhor! Como posso ajudá-lo com o sistema hoje?",
                greeting
            ),
        )
    }

    fn help(&self) -> CommandResult {
        let message = "COMANDOS DISPONÍVEIS\n\
             ========================================\n\n\
             CRIAR/CADASTRAR:\n\
             • \"Criar vale de 200 para Josemir\"\n\
             • \"Cadastrar novo cliente\"\n\
             • \"Nova encomenda para Maria\"\n\n\
             BUSCAR/LISTAR:\n\
             • \"Mostrar vales de Josemir\"\n\
             • \"Listar clientes\"\n\
             • \"Buscar encomendas de hoje\"\n\n\
             RELATÓRIOS:\n\
             • \"Relatório de vendas hoje\"\n\
             • \"Relatório financeiro\"\n\
             • \"Relatório de estoque\"\n\n\
             AÇÕES:\n\
             • \"Aprovar vales pendentes\"\n\
             • \"Pagar vale de Josemir\"\n\
             • \"Confirmar encomendas\"\n\n\
             FINANCEIRO:\n\
             • \"Qual o saldo do caixa?\"\n\
             • \"Registrar entrada de 500\"\n\
             • \"Calcular lucro do mês\"\n\n\
             ESTOQUE:\n\
             • \"Quanto temos de ouro?\"\n\
             • \"Listar itens em falta\"\n\
             • \"Adicionar 10 unidades de prata\"";

        CommandResult::ok("geral", ActionTaken::Help, message)
    }

    async fn system_status(&self) -> StoreResult<CommandResult> {
        let counts = self.store.counts().await?;
        let now = Local::now();

        let message = format!(
            "STATUS DO SISTEMA\n========================================\n\
             Funcionários: {}\nClientes: {}\nPedidos hoje: {}\n\
             Vales pendentes: {}\nHorário: {}\nData: {}",
            counts.employees,
            counts.customers,
            counts.orders_today,
            counts.pending_vales,
            now.format("%H:%M"),
            now.format("%d/%m/%Y"),
        );

        Ok(CommandResult::ok("geral", ActionTaken::Status, message).with_data(json!({
            "employees": counts.employees,
            "customers": counts.customers,
            "orders_today": counts.orders_today,
            "pending_vales": counts.pending_vales,
        })))
    }

    /// Fallback for anything the pipeline could not act on: suggest the
    /// known commands that share words with the utterance.
    pub(crate) fn fallback(&self, intent: &Intent, folded: &str) -> CommandResult {
        let suggestions = suggest_commands(folded);

        let mut message = "Desculpe, não compreendi completamente seu comando.".to_string();
        if suggestions.is_empty() {
            message.push_str(
                "\n\nTente ser mais específico ou diga \"ajuda\" para ver os \
                 comandos disponíveis.",
            );
        } else {
            message.push_str("\n\nTalvez você queira:");
            for suggestion in &suggestions {
                message.push_str(&format!("\n• \"{}\"", suggestion));
            }
        }

        CommandResult {
            success: false,
            message,
            action_taken: ActionTaken::Fallback,
            module: "geral".to_string(),
            data: json!({ "raw_text": intent.raw_text }),
            suggestions,
            required_fields: Vec::new(),
        }
    }
}

/// Commands sharing at least one word with the utterance, best effort.
fn suggest_commands(folded: &str) -> Vec<String> {
    let words: std::collections::HashSet<&str> = folded.split_whitespace().collect();

    COMMON_COMMANDS
        .iter()
        .filter(|command| {
            fold_text(command)
                .split_whitespace()
                .any(|w| words.contains(w))
        })
        .take(MAX_SUGGESTIONS)
        .map(|c| c.to_string())
        .collect()
}
