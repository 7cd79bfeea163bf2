//! Customer, order, jewelry, employee and note operations
//!
//! Customer and employee registration go through the UI form, so those
//! paths return an `OpenForm` result with pre-filled fields instead of
//! persisting directly.

use super::{ActionTaken, CommandResult, Dispatcher};
use crate::error::StoreResult;
use crate::intent::Intent;
use crate::models::OrderStatus;
use crate::normalize::fold_text;
use crate::store::{ErpStore, OrderFilter};
use chrono::Local;
use serde_json::json;

/// Maximum customers or jewelry items shown individually
const LIST_PREVIEW: usize = 10;
/// Maximum orders shown individually
const ORDER_PREVIEW: usize = 5;

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn create_customer(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let Some(name) = intent.text_slot("person_name") else {
            return Ok(CommandResult::ok(
                "clientes",
                ActionTaken::OpenForm,
                "Abrindo formulário de cadastro de cliente.",
            )
            .with_data(json!({ "action": "create" })));
        };

        let existing = self.store.customers(Some(name)).await?;
        if let Some(customer) = existing.first() {
            return Ok(CommandResult {
                success: false,
                message: format!("Cliente \"{}\" já cadastrado.", customer.name),
                action_taken: ActionTaken::Exists,
                module: "clientes".to_string(),
                data: json!({ "customer_id": customer.id }),
                suggestions: Vec::new(),
                required_fields: Vec::new(),
            });
        }

        Ok(CommandResult::ok(
            "clientes",
            ActionTaken::OpenForm,
            format!(
                "Vou abrir o formulário de cadastro para o cliente \"{}\".",
                name
            ),
        )
        .with_data(json!({ "pre_fill": { "name": name } })))
    }

    pub(crate) async fn create_order(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let Some(name) = intent.text_slot("person_name") else {
            return Ok(CommandResult::ok(
                "encomendas",
                ActionTaken::OpenForm,
                "Abrindo formulário de nova encomenda.",
            )
            .with_data(json!({ "action": "create" })));
        };

        let customers = self.store.customers(None).await?;
        match self.resolver.resolve(name, &customers) {
            Some(customer) => Ok(CommandResult::ok(
                "encomendas",
                ActionTaken::OpenForm,
                format!("Criando nova encomenda para {}.", customer.name),
            )
            .with_data(json!({
                "customer_id": customer.id,
                "customer_name": customer.name,
            }))),
            None => Ok(CommandResult {
                success: false,
                message: format!(
                    "Cliente \"{}\" não encontrado. Deseja cadastrá-lo primeiro?",
                    name
                ),
                action_taken: ActionTaken::Suggest,
                module: "clientes".to_string(),
                data: json!({ "suggested_name": name }),
                suggestions: self.resolver.suggestions(name, &customers),
                required_fields: Vec::new(),
            }),
        }
    }

    pub(crate) fn create_employee_form(&self, intent: &Intent) -> CommandResult {
        let name = intent.text_slot("person_name");
        let detail = name.map(|n| format!(" para {}", n)).unwrap_or_default();

        CommandResult::ok(
            "funcionarios",
            ActionTaken::OpenForm,
            format!("Abrindo formulário de cadastro de funcionário{}.", detail),
        )
        .with_data(match name {
            Some(n) => json!({ "action": "create", "pre_fill": { "name": n } }),
            None => json!({ "action": "create" }),
        })
    }

    pub(crate) async fn create_note(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let content = strip_note_command(&intent.raw_text);

        if content.is_empty() {
            return Ok(CommandResult::ok(
                "notas",
                ActionTaken::OpenForm,
                "Abrindo sistema de notas para criar nova anotação.",
            )
            .with_data(json!({ "action": "create" })));
        }

        let note = self.store.create_note("Nota via assistente", &content).await?;
        self.store.commit().await?;

        Ok(CommandResult::ok(
            "notas",
            ActionTaken::Created,
            "Nota criada com sucesso!",
        )
        .with_data(json!({ "nota_id": note.id, "content": content })))
    }

    pub(crate) async fn search_customers(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let name = intent.text_slot("person_name");
        let customers = self.store.customers(name).await?;

        if customers.is_empty() {
            let scope = name.map(|n| format!(" com nome {}", n)).unwrap_or_default();
            return Ok(CommandResult::ok(
                "clientes",
                ActionTaken::Listed,
                format!("Não encontrei clientes{}.", scope),
            )
            .with_data(json!({ "count": 0 })));
        }

        let mut message = format!("Encontrei {} cliente(s)", customers.len());
        if let Some(n) = name {
            message.push_str(&format!(" com nome similar a \"{}\"", n));
        }
        message.push_str(":\n\n");

        for customer in customers.iter().take(LIST_PREVIEW) {
            message.push_str(&format!(
                "• {} - {}\n",
                customer.name,
                customer.phone.as_deref().unwrap_or("Sem telefone")
            ));
        }
        if customers.len() > LIST_PREVIEW {
            message.push_str(&format!(
                "\n... e mais {} clientes.",
                customers.len() - LIST_PREVIEW
            ));
        }

        Ok(CommandResult::ok("clientes", ActionTaken::Listed, message)
            .with_data(json!({ "count": customers.len(), "search": name })))
    }

    pub(crate) async fn search_orders(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        let mut filter = OrderFilter::new();
        let today = Local::now().date_naive();

        let mut customer_name = None;
        if let Some(name) = intent.text_slot("person_name") {
            let customers = self.store.customers(None).await?;
            if let Some(customer) = self.resolver.resolve(name, &customers) {
                filter = filter.for_customer(customer.id);
                customer_name = Some(customer.name.clone());
            }
        }

        if let Some(date) = intent.date_slot("date") {
            filter = filter.created_in(crate::extract::DateRange::single(date));
        } else if folded.contains("semana") {
            filter = filter.created_in(crate::extract::DateRange {
                start: today - chrono::Duration::days(7),
                end: today,
            });
        } else if folded.contains("mes") {
            filter = filter.created_in(crate::extract::DateRange {
                start: today - chrono::Duration::days(30),
                end: today,
            });
        }

        match intent.filter("status") {
            Some("pending") => filter = filter.with_status(OrderStatus::Pending),
            Some("confirmed") => filter = filter.with_status(OrderStatus::Confirmed),
            Some("delivered") => filter = filter.with_status(OrderStatus::Delivered),
            Some("cancelled") => filter = filter.with_status(OrderStatus::Cancelled),
            _ => {}
        }

        let orders = self.store.orders(filter).await?;
        if orders.is_empty() {
            return Ok(CommandResult::ok(
                "encomendas",
                ActionTaken::Listed,
                "Não encontrei encomendas com os critérios especificados.",
            )
            .with_data(json!({ "count": 0 })));
        }

        let total: f64 = orders.iter().map(|o| o.total_price).sum();
        let mut message = format!("Encontrei {} encomenda(s)", orders.len());
        if let Some(name) = &customer_name {
            message.push_str(&format!(" de {}", name));
        }
        message.push_str(&format!(", totalizando R$ {:.2}.\n\n", total));

        let customers = self.store.customers(None).await?;
        for order in orders.iter().take(ORDER_PREVIEW) {
            let holder = order
                .customer_id
                .and_then(|id| customers.iter().find(|c| c.id == id))
                .map(|c| c.name.as_str())
                .unwrap_or("Cliente não identificado");
            message.push_str(&format!(
                "• Pedido #{}: {} - R$ {:.2} ({})\n",
                order.id, holder, order.total_price, order.status
            ));
        }
        if orders.len() > ORDER_PREVIEW {
            message.push_str(&format!(
                "\n... e mais {} encomendas.",
                orders.len() - ORDER_PREVIEW
            ));
        }

        Ok(CommandResult::ok("encomendas", ActionTaken::Listed, message)
            .with_data(json!({ "count": orders.len(), "total": total })))
    }

    pub(crate) async fn list_employees(&self) -> StoreResult<CommandResult> {
        let employees = self.store.active_employees().await?;

        if employees.is_empty() {
            return Ok(CommandResult::ok(
                "funcionarios",
                ActionTaken::Listed,
                "Não há funcionários cadastrados.",
            )
            .with_data(json!({ "count": 0 })));
        }

        let total_salary: f64 = employees.iter().map(|e| e.salary).sum();
        let mut message = format!(
            "Temos {} funcionário(s) cadastrado(s):\n\n",
            employees.len()
        );
        for employee in &employees {
            message.push_str(&format!(
                "• {} - {} (Salário: R$ {:.2})\n",
                employee.name, employee.role, employee.salary
            ));
        }
        message.push_str(&format!("\nTotal em salários: R$ {:.2}", total_salary));

        Ok(CommandResult::ok("funcionarios", ActionTaken::Listed, message)
            .with_data(json!({ "count": employees.len(), "total_salary": total_salary })))
    }

    pub(crate) async fn search_jewelry(&self, folded: &str) -> StoreResult<CommandResult> {
        let category = jewelry_category(folded);
        let jewelry = self.store.jewelry(category).await?;

        if jewelry.is_empty() {
            return Ok(CommandResult::ok(
                "joias",
                ActionTaken::Listed,
                "Não encontrei joias com os critérios especificados.",
            )
            .with_data(json!({ "count": 0 })));
        }

        let mut message = format!("Encontrei {} joia(s) no catálogo:\n\n", jewelry.len());
        for item in jewelry.iter().take(LIST_PREVIEW) {
            let price = item
                .price
                .map(|p| format!("R$ {:.2}", p))
                .unwrap_or_else(|| "Sob consulta".to_string());
            message.push_str(&format!("• {} - {} ({})\n", item.name, item.category, price));
        }
        if jewelry.len() > LIST_PREVIEW {
            message.push_str(&format!("\n... e mais {} joias.", jewelry.len() - LIST_PREVIEW));
        }

        Ok(CommandResult::ok("joias", ActionTaken::Listed, message)
            .with_data(json!({ "count": jewelry.len() })))
    }

    pub(crate) async fn confirm_orders(&self) -> StoreResult<CommandResult> {
        let pending = self
            .store
            .orders(OrderFilter::new().with_status(OrderStatus::Pending))
            .await?;

        if pending.is_empty() {
            return Ok(CommandResult::failure(
                "Não há encomendas pendentes para confirmar.",
            ));
        }

        for order in &pending {
            self.store
                .set_order_status(order.id, OrderStatus::Confirmed)
                .await?;
        }
        self.store.commit().await?;

        Ok(CommandResult::ok(
            "encomendas",
            ActionTaken::Confirmed,
            format!("{} encomenda(s) confirmada(s) com sucesso!", pending.len()),
        )
        .with_data(json!({ "count": pending.len() })))
    }
}

/// Catalogue category referenced in the utterance, if any.
fn jewelry_category(folded: &str) -> Option<&'static str> {
    if folded.contains("anel") || folded.contains("aneis") {
        Some("Anéis")
    } else if folded.contains("colar") {
        Some("Colares")
    } else if folded.contains("brinco") {
        Some("Brincos")
    } else if folded.contains("pulseira") {
        Some("Pulseiras")
    } else {
        None
    }
}

/// Drop the leading "criar nota"/"criar anotação" command words, keeping
/// only the note body.
fn strip_note_command(raw: &str) -> String {
    let folded = fold_text(raw);
    for prefix in ["criar nota", "criar anotacao", "nova nota", "nova anotacao"] {
        if folded.starts_with(prefix) {
            let skip_words = prefix.split_whitespace().count();
            return raw
                .split_whitespace()
                .skip(skip_words)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_note_command() {
        assert_eq!(
            strip_note_command("criar nota ligar para o fornecedor amanhã"),
            "ligar para o fornecedor amanhã"
        );
        assert_eq!(strip_note_command("criar nota"), "");
        assert_eq!(strip_note_command("criar anotação comprar ouro"), "comprar ouro");
    }

    #[test]
    fn test_jewelry_category() {
        assert_eq!(jewelry_category("mostrar aneis de ouro"), Some("Anéis"));
        assert_eq!(jewelry_category("listar joias"), None);
    }
}
