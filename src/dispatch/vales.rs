//! Vale (cash advance) operations
//!
//! Lifecycle: pending → approved → paid. Payment additionally writes one
//! cash-ledger debit per vale, committed together with the status change.

use super::{ActionTaken, CommandResult, Dispatcher, EmployeeLookup};
use crate::error::StoreResult;
use crate::intent::Intent;
use crate::models::{CashFlow, ValeStatus};
use crate::store::{ErpStore, ValeFilter};
use chrono::Local;
use serde_json::json;
use tracing::info;

/// Maximum vales shown individually in a listing
const LIST_PREVIEW: usize = 5;

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn create_vale(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        let employee = match self.resolve_employee(intent).await? {
            EmployeeLookup::Found(employee) => employee,
            EmployeeLookup::Unknown { name, suggestions } => {
                return Ok(EmployeeLookup::not_found_result(&name, suggestions));
            }
            EmployeeLookup::NotMentioned => {
                return Ok(CommandResult::request_info(
                    "Para criar um vale, preciso saber o nome do funcionário. \
                     Por exemplo: \"Criar vale de 200 para Josemir\"",
                    &["employee_name", "amount"],
                ));
            }
        };

        let Some(amount) = intent.number_slot("amount") else {
            return Ok(CommandResult::request_info(
                format!("Qual o valor do vale para {}?", employee.name),
                &["amount"],
            ));
        };

        let reason = vale_reason(folded);
        let vale = self.store.create_vale(employee.id, amount, reason).await?;
        self.store.commit().await?;

        info!(vale_id = vale.id, employee = %employee.name, amount, "vale created");

        Ok(CommandResult::ok(
            "vales",
            ActionTaken::Created,
            format!(
                "Vale criado com sucesso! {} receberá R$ {:.2}. Motivo: {}",
                employee.name, amount, reason
            ),
        )
        .with_data(json!({
            "vale_id": vale.id,
            "employee": employee.name,
            "amount": amount,
            "reason": reason,
            "status": "pending",
        })))
    }

    pub(crate) async fn approve_vales(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let mut filter = ValeFilter::new().with_status(ValeStatus::Pending);
        let mut employee_name = None;

        match self.resolve_employee(intent).await? {
            EmployeeLookup::Found(employee) => {
                filter = filter.for_employee(employee.id);
                employee_name = Some(employee.name);
            }
            EmployeeLookup::Unknown { name, suggestions } => {
                return Ok(EmployeeLookup::not_found_result(&name, suggestions));
            }
            EmployeeLookup::NotMentioned => {}
        }

        let vales = self.store.vales(filter).await?;
        if vales.is_empty() {
            return Ok(CommandResult::failure(
                "Não encontrei vales pendentes para aprovar.",
            ));
        }

        for vale in &vales {
            self.store
                .set_vale_status(vale.id, ValeStatus::Approved, None)
                .await?;
        }
        self.store.commit().await?;

        let total: f64 = vales.iter().map(|v| v.amount).sum();
        let mut message = format!("{} vale(s) aprovado(s) com sucesso!", vales.len());
        if let Some(name) = &employee_name {
            message.push_str(&format!(" para {}", name));
        }
        message.push_str(&format!("\nTotal aprovado: R$ {:.2}", total));

        Ok(CommandResult::ok("vales", ActionTaken::Approved, message)
            .with_data(json!({ "count": vales.len(), "total": total })))
    }

    pub(crate) async fn pay_vales(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let mut filter = ValeFilter::new().with_status(ValeStatus::Approved);
        let mut employee_name = None;

        match self.resolve_employee(intent).await? {
            EmployeeLookup::Found(employee) => {
                filter = filter.for_employee(employee.id);
                employee_name = Some(employee.name);
            }
            EmployeeLookup::Unknown { name, suggestions } => {
                return Ok(EmployeeLookup::not_found_result(&name, suggestions));
            }
            EmployeeLookup::NotMentioned => {}
        }

        let vales = self.store.vales(filter).await?;
        if vales.is_empty() {
            return Ok(CommandResult::failure(
                "Não encontrei vales aprovados para pagar.",
            ));
        }

        let now = Local::now().naive_local();
        for vale in &vales {
            self.store
                .set_vale_status(vale.id, ValeStatus::Paid, Some(now))
                .await?;

            let holder = self
                .store
                .employee(vale.employee_id)
                .await?
                .map(|e| e.name)
                .unwrap_or_else(|| "Desconhecido".to_string());

            self.store
                .record_transaction(
                    CashFlow::Saida,
                    vale.amount,
                    &format!("Pagamento de vale - {}", holder),
                )
                .await?;
        }
        self.store.commit().await?;

        let total: f64 = vales.iter().map(|v| v.amount).sum();
        let mut message = format!("{} vale(s) pago(s) com sucesso!", vales.len());
        if let Some(name) = &employee_name {
            message.push_str(&format!(" para {}", name));
        }
        message.push_str(&format!("\nTotal pago: R$ {:.2}", total));

        Ok(CommandResult::ok("vales", ActionTaken::Paid, message)
            .with_data(json!({ "count": vales.len(), "total": total })))
    }

    pub(crate) async fn delete_vale(&self, intent: &Intent) -> StoreResult<CommandResult> {
        if intent.text_slot("target") != Some("last") {
            return Ok(CommandResult::failure(
                "Especifique qual vale excluir, por exemplo: \"excluir último vale\".",
            ));
        }

        match self.store.delete_last_vale().await? {
            Some(vale) => {
                self.store.commit().await?;
                Ok(CommandResult::ok(
                    "vales",
                    ActionTaken::Deleted,
                    format!("Vale #{} de R$ {:.2} foi excluído", vale.id, vale.amount),
                )
                .with_data(json!({ "vale_id": vale.id, "amount": vale.amount })))
            }
            None => Ok(CommandResult::failure(
                "Nenhum vale encontrado para excluir.",
            )),
        }
    }

    pub(crate) async fn list_vales(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let mut filter = ValeFilter::new();
        let mut employee_name = None;

        if let Some(status) = self.vale_status_filter(intent) {
            filter = filter.with_status(status);
        }

        match self.resolve_employee(intent).await? {
            EmployeeLookup::Found(employee) => {
                filter = filter.for_employee(employee.id);
                employee_name = Some(employee.name);
            }
            EmployeeLookup::Unknown { name, .. } => {
                return Ok(CommandResult::ok(
                    "vales",
                    ActionTaken::Listed,
                    format!("Não encontrei vales para {}.", name),
                )
                .with_data(json!({ "count": 0 })));
            }
            EmployeeLookup::NotMentioned => {}
        }

        let vales = self.store.vales(filter).await?;
        if vales.is_empty() {
            let scope = employee_name
                .map(|n| format!(" para {}", n))
                .unwrap_or_default();
            return Ok(CommandResult::ok(
                "vales",
                ActionTaken::Listed,
                format!("Não encontrei vales{}.", scope),
            )
            .with_data(json!({ "count": 0 })));
        }

        let total: f64 = vales.iter().map(|v| v.amount).sum();
        let mut message = format!("Encontrei {} vale(s)", vales.len());
        if let Some(name) = &employee_name {
            message.push_str(&format!(" para {}", name));
        }
        message.push_str(&format!(", totalizando R$ {:.2}.\n\n", total));

        for vale in vales.iter().take(LIST_PREVIEW) {
            let holder = self
                .store
                .employee(vale.employee_id)
                .await?
                .map(|e| e.name)
                .unwrap_or_else(|| "Desconhecido".to_string());
            message.push_str(&format!(
                "• {}: R$ {:.2} - {} ({})\n",
                holder, vale.amount, vale.reason, vale.status
            ));
        }

        if vales.len() > LIST_PREVIEW {
            message.push_str(&format!("\n... e mais {} vales.", vales.len() - LIST_PREVIEW));
        }

        Ok(CommandResult::ok("vales", ActionTaken::Listed, message)
            .with_data(json!({ "count": vales.len(), "total": total })))
    }
}

/// Infer the vale reason from keywords in the utterance.
fn vale_reason(folded: &str) -> &'static str {
    if folded.contains("almoco") {
        "Vale almoço"
    } else if folded.contains("transporte") {
        "Vale transporte"
    } else if folded.contains("emergencia") {
        "Vale emergencial"
    } else if folded.contains("adiantamento") {
        "Adiantamento salarial"
    } else {
        "Vale solicitado via assistente"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_inference() {
        assert_eq!(vale_reason("criar vale almoco para josemir"), "Vale almoço");
        assert_eq!(vale_reason("vale transporte de 50"), "Vale transporte");
        assert_eq!(
            vale_reason("adiantamento de 300 para darvin"),
            "Adiantamento salarial"
        );
        assert_eq!(
            vale_reason("criar vale de 200"),
            "Vale solicitado via assistente"
        );
    }
}
