//! Cash-ledger operations: balance, entries, profit analysis

use super::{ActionTaken, CommandResult, Dispatcher};
use crate::error::StoreResult;
use crate::extract::extract_period_from;
use crate::intent::Intent;
use crate::models::CashFlow;
use crate::store::ErpStore;
use chrono::Local;
use serde_json::json;

const RULE: &str = "========================================";

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn handle_financial(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        if folded.contains("saldo") {
            self.balance(intent).await
        } else if folded.contains("entrada") || folded.contains("receita") {
            self.record_entry(intent, folded, CashFlow::Entrada).await
        } else if folded.contains("saida") || folded.contains("despesa") {
            self.record_entry(intent, folded, CashFlow::Saida).await
        } else if folded.contains("lucro") {
            self.profit_analysis(intent).await
        } else {
            Ok(CommandResult::failure(
                "Posso ajudar com: consultar saldo, registrar entradas/saídas \
                 ou calcular lucros.",
            ))
        }
    }

    async fn balance(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let today = Local::now().date_naive();
        let day = intent.date_slot("date").unwrap_or(today);

        let transactions = self.store.transactions_through(day).await?;
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

        let day_transactions: Vec<_> = transactions
            .iter()
            .filter(|t| t.created_at.date() == day)
            .collect();
        let day_in: f64 = day_transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Entrada)
            .map(|t| t.amount)
            .sum();
        let day_out: f64 = day_transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Saida)
            .map(|t| t.amount)
            .sum();

        let message = format!(
            "SALDO DO CAIXA\n{}\nData: {}\nSaldo total: R$ {:.2}\n\n\
             MOVIMENTO DO DIA:\nEntradas: R$ {:.2}\nSaídas: R$ {:.2}\n\
             Saldo do dia: R$ {:.2}",
            RULE,
            day.format("%d/%m/%Y"),
            saldo,
            day_in,
            day_out,
            day_in - day_out,
        );

        Ok(CommandResult::ok("caixa", ActionTaken::Balance, message).with_data(json!({
            "date": day.to_string(),
            "total_balance": saldo,
            "today_in": day_in,
            "today_out": day_out,
            "today_balance": day_in - day_out,
        })))
    }

    async fn record_entry(
        &self,
        intent: &Intent,
        folded: &str,
        flow: CashFlow,
    ) -> StoreResult<CommandResult> {
        let Some(amount) = intent.number_slot("amount") else {
            let kind = match flow {
                CashFlow::Entrada => "entrada",
                CashFlow::Saida => "saída/despesa",
            };
            return Ok(CommandResult::request_info(
                format!("Qual o valor da {} que deseja registrar?", kind),
                &["amount"],
            ));
        };

        let description = entry_description(folded, flow);
        let transaction = self.store.record_transaction(flow, amount, description).await?;
        self.store.commit().await?;

        let label = match flow {
            CashFlow::Entrada => "Entrada",
            CashFlow::Saida => "Saída",
        };

        Ok(CommandResult::ok(
            "caixa",
            ActionTaken::Registered,
            format!(
                "{} de R$ {:.2} registrada com sucesso!\nDescrição: {}",
                label, amount, description
            ),
        )
        .with_data(json!({
            "transaction_id": transaction.id,
            "type": match flow {
                CashFlow::Entrada => "entrada",
                CashFlow::Saida => "saida",
            },
            "amount": amount,
            "description": description,
        })))
    }

    async fn profit_analysis(&self, intent: &Intent) -> StoreResult<CommandResult> {
        let today = Local::now().date_naive();
        let period = extract_period_from(&intent.raw_text, today);

        let transactions = self.store.transactions_between(period).await?;
        let revenue: f64 = transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Entrada)
            .map(|t| t.amount)
            .sum();
        let costs: f64 = transactions
            .iter()
            .filter(|t| t.flow == CashFlow::Saida)
            .map(|t| t.amount)
            .sum();
        let profit = revenue - costs;
        let margin = if revenue > 0.0 {
            profit / revenue * 100.0
        } else {
            0.0
        };

        let message = format!(
            "ANÁLISE DE LUCRO\n{}\nPeríodo: {} a {}\nReceita: R$ {:.2}\n\
             Custos: R$ {:.2}\nLucro: R$ {:.2}\nMargem: {:.1}%",
            RULE,
            period.start.format("%d/%m"),
            period.end.format("%d/%m/%Y"),
            revenue,
            costs,
            profit,
            margin,
        );

        Ok(
            CommandResult::ok("custos", ActionTaken::ProfitAnalysis, message).with_data(json!({
                "period": { "start": period.start.to_string(), "end": period.end.to_string() },
                "revenue": revenue,
                "costs": costs,
                "profit": profit,
                "margin": margin,
            })),
        )
    }
}

/// Infer the ledger-entry description from keywords.
fn entry_description(folded: &str, flow: CashFlow) -> &'static str {
    match flow {
        CashFlow::Entrada => {
            if folded.contains("venda") {
                "Venda de produtos"
            } else if folded.contains("servico") {
                "Prestação de serviço"
            } else {
                "Entrada registrada via assistente"
            }
        }
        CashFlow::Saida => {
            if folded.contains("fornecedor") {
                "Pagamento a fornecedor"
            } else if folded.contains("conta") {
                "Pagamento de conta"
            } else if folded.contains("material") || folded.contains("materiais") {
                "Compra de materiais"
            } else {
                "Despesa registrada via assistente"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_description_inference() {
        assert_eq!(
            entry_description("registrar entrada de venda", CashFlow::Entrada),
            "Venda de produtos"
        );
        assert_eq!(
            entry_description("despesa de fornecedor 300", CashFlow::Saida),
            "Pagamento a fornecedor"
        );
        assert_eq!(
            entry_description("registrar saida 50", CashFlow::Saida),
            "Despesa registrada via assistente"
        );
    }
}
