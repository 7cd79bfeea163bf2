//! Report generation
//!
//! Aggregates over a computed date range: explicit date, "hoje", "semana",
//! "mês", defaulting to today. Every report returns the aggregate totals in
//! `data` alongside the rendered text.

use super::{ActionTaken, CommandResult, Dispatcher};
use crate::error::StoreResult;
use crate::extract::extract_period_from;
use crate::intent::Intent;
use crate::models::{CashFlow, ValeStatus};
use crate::store::{ErpStore, OrderFilter, ValeFilter};
use chrono::Local;
use serde_json::json;

const RULE: &str = "========================================";

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn handle_report(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        if folded.contains("venda") {
            self.sales_report(intent).await
        } else if folded.contains("financeiro") || folded.contains("caixa") {
            self.financial_report(intent).await
        } else if folded.contains("estoque") {
            self.inventory_report().await
        } else if folded.contains("funcionario") || folded.contains("folha") {
            self.payroll_report().await
        } else {
            Ok(CommandResult::failure(
                "Posso gerar relatórios de: vendas, financeiro, estoque ou \
                 folha de pagamento.",
            ))
        }
    }

    async fn sales_report(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let today = Local::now().date_naive();
        let period = extract_period_from(&intent.raw_text, today);

        let orders = self
            .store
            .orders(OrderFilter::new().sales().created_in(period))
            .await?;

        if orders.is_empty() {
            return Ok(CommandResult::ok(
                "dashboard",
                ActionTaken::Reported,
                "Não há vendas no período especificado.",
            )
            .with_data(json!({ "count": 0, "total": 0.0 })));
        }

        let total: f64 = orders.iter().map(|o| o.total_price).sum();
        let average = total / orders.len() as f64;

        let message = format!(
            "RELATÓRIO DE VENDAS\n{}\nPeríodo: {} a {}\nTotal de vendas: {}\n\
             Valor total: R$ {:.2}\nTicket médio: R$ {:.2}",
            RULE,
            period.start.format("%d/%m/%Y"),
            period.end.format("%d/%m/%Y"),
            orders.len(),
            total,
            average,
        );

        Ok(CommandResult::ok("dashboard", ActionTaken::Reported, message).with_data(json!({
            "type": "sales",
            "count": orders.len(),
            "total": total,
            "average": average,
        })))
    }

    async fn financial_report(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let today = Local::now().date_naive();
        let period = extract_period_from(&intent.raw_text, today);

        let transactions = self.store.transactions_between(period).await?;
        let entradas: f64 = transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Entrada)
            .map(|t| t.amount)
            .sum();
        let saidas: f64 = transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Saida)
            .map(|t| t.amount)
            .sum();
        let saldo = entradas - saidas;

        let message = format!(
            "RELATÓRIO FINANCEIRO\n{}\nPeríodo: {} a {}\nEntradas: R$ {:.2}\n\
             Saídas: R$ {:.2}\nSaldo: R$ {:.2}\nTotal de transações: {}",
            RULE,
            period.start.format("%d/%m/%Y"),
            period.end.format("%d/%m/%Y"),
            entradas,
            saidas,
            saldo,
            transactions.len(),
        );

        Ok(CommandResult::ok("caixa", ActionTaken::Reported, message).with_data(json!({
            "type": "financial",
            "entradas": entradas,
            "saidas": saidas,
            "saldo": saldo,
            "transactions": transactions.len(),
        })))
    }

    async fn inventory_report(&self) -> StoreResult<CommandResult> {
        let inventory = self.store.inventory(None).await?;
        let low: Vec<_> = inventory.iter().filter(|i| i.is_low()).collect();
        let out: Vec<_> = inventory.iter().filter(|i| i.is_out()).collect();

        let mut message = format!(
            "RELATÓRIO DE ESTOQUE\n{}\nTotal de itens: {}\nEstoque baixo: {} itens\n\
             Sem estoque: {} itens\n",
            RULE,
            inventory.len(),
            low.len(),
            out.len(),
        );

        if !low.is_empty() {
            message.push_str("\nITENS COM ESTOQUE BAIXO:\n");
            for item in low.iter().take(5) {
                message.push_str(&format!(
                    "• {}: {} unidades (mínimo: {})\n",
                    item.name, item.quantity, item.min_quantity
                ));
            }
        }

        Ok(CommandResult::ok("estoque", ActionTaken::Reported, message).with_data(json!({
            "type": "inventory",
            "total_items": inventory.len(),
            "low_stock": low.len(),
            "out_of_stock": out.len(),
        })))
    }

    async fn payroll_report(&self) -> StoreResult<CommandResult> {
        let employees = self.store.active_employees().await?;
        let open_vales = self
            .store
            .vales(ValeFilter::new())
            .await?
            .into_iter()
            .filter(|v| v.status != ValeStatus::Paid)
            .collect::<Vec<_>>();

        let total_salaries: f64 = employees.iter().map(|e| e.salary).sum();
        let total_vales: f64 = open_vales.iter().map(|v| v.amount).sum();
        let net = total_salaries - total_vales;

        let message = format!(
            "RELATÓRIO DE FOLHA DE PAGAMENTO\n{}\nTotal de funcionários: {}\n\
             Total em salários: R$ {:.2}\nTotal em vales: R$ {:.2}\n\
             Total líquido: R$ {:.2}",
            RULE,
            employees.len(),
            total_salaries,
            total_vales,
            net,
        );

        Ok(CommandResult::ok(
            "folha-pagamento",
            ActionTaken::Reported,
            message,
        )
        .with_data(json!({
            "type": "payroll",
            "employees": employees.len(),
            "total_salaries": total_salaries,
            "total_vales": total_vales,
            "total_net": net,
        })))
    }
}
