//! Inventory operations: stock checks, shortage listings, restocking

use super::{ActionTaken, CommandResult, Dispatcher};
use crate::error::StoreResult;
use crate::intent::Intent;
use crate::store::ErpStore;
use serde_json::json;

const RULE: &str = "========================================";

/// Words that cannot be the item name in a stock query
const ITEM_STOPWORDS: &[&str] = &[
    "quanto",
    "quantos",
    "quantas",
    "quantidade",
    "temos",
    "tenho",
    "estoque",
    "disponivel",
    "unidades",
    "unidade",
    "adicionar",
    "repor",
    "verificar",
    "mostrar",
    "falta",
    "baixo",
    "pouco",
];

impl<S: ErpStore> Dispatcher<S> {
    pub(crate) async fn handle_inventory(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        if folded.contains("falta") || folded.contains("acabou") || folded.contains("esgotado") {
            self.out_of_stock().await
        } else if folded.contains("baixo") || folded.contains("pouco") {
            self.low_stock().await
        } else if folded.contains("adicionar") || folded.contains("repor") {
            self.add_stock(intent, folded).await
        } else if folded.contains("quanto")
            || folded.contains("quantos")
            || folded.contains("quantidade")
        {
            self.stock_check(folded).await
        } else {
            Ok(CommandResult::failure(
                "Posso verificar quantidade, listar itens em falta, estoque \
                 baixo ou adicionar itens.",
            ))
        }
    }

    async fn stock_check(&self, folded: &str) -> StoreResult<CommandResult> {
        let Some(item_name) = item_name_from(folded) else {
            return Ok(CommandResult::request_info(
                "Qual item do estoque deseja verificar?",
                &["item_name"],
            ));
        };

        let items = self.store.inventory(Some(&item_name)).await?;
        if items.is_empty() {
            return Ok(CommandResult::failure(format!(
                "Não encontrei \"{}\" no estoque.",
                item_name
            )));
        }

        let mut message = format!("ESTOQUE - {}\n{}\n", item_name.to_uppercase(), RULE);
        for item in &items {
            let status = if item.is_out() {
                "Esgotado"
            } else if item.is_low() {
                "Baixo"
            } else {
                "Normal"
            };
            message.push_str(&format!(
                "{}:\n  Quantidade: {} unidades\n  Mínimo: {} unidades\n  Status: {}\n\n",
                item.name, item.quantity, item.min_quantity, status
            ));
        }

        Ok(CommandResult::ok("estoque", ActionTaken::StockCheck, message).with_data(json!({
            "search": item_name,
            "items": items
                .iter()
                .map(|i| json!({ "name": i.name, "quantity": i.quantity, "min": i.min_quantity }))
                .collect::<Vec<_>>(),
        })))
    }

    async fn out_of_stock(&self) -> StoreResult<CommandResult> {
        let out: Vec<_> = self
            .store
            .inventory(None)
            .await?
            .into_iter()
            .filter(|i| i.is_out())
            .collect();

        if out.is_empty() {
            return Ok(CommandResult::ok(
                "estoque",
                ActionTaken::OutOfStock,
                "Ótima notícia! Não há itens em falta no estoque.",
            )
            .with_data(json!({ "count": 0 })));
        }

        let mut message = format!("ITENS EM FALTA\n{}\n", RULE);
        for item in &out {
            message.push_str(&format!("• {} (Mínimo: {})\n", item.name, item.min_quantity));
        }
        message.push_str(&format!("\nTotal: {} itens em falta", out.len()));

        Ok(CommandResult::ok("estoque", ActionTaken::OutOfStock, message).with_data(json!({
            "count": out.len(),
            "items": out.iter().map(|i| i.name.clone()).collect::<Vec<_>>(),
        })))
    }

    async fn low_stock(&self) -> StoreResult<CommandResult> {
        let low: Vec<_> = self
            .store
            .inventory(None)
            .await?
            .into_iter()
            .filter(|i| i.is_low())
            .collect();

        if low.is_empty() {
            return Ok(CommandResult::ok(
                "estoque",
                ActionTaken::LowStock,
                "Todos os itens estão com estoque adequado.",
            )
            .with_data(json!({ "count": 0 })));
        }

        let mut message = format!("ESTOQUE BAIXO\n{}\n", RULE);
        for item in &low {
            let percent = if item.min_quantity > 0 {
                item.quantity as f64 / item.min_quantity as f64 * 100.0
            } else {
                0.0
            };
            message.push_str(&format!(
                "• {}: {}/{} ({:.0}%)\n",
                item.name, item.quantity, item.min_quantity, percent
            ));
        }
        message.push_str(&format!("\nTotal: {} itens com estoque baixo", low.len()));

        Ok(CommandResult::ok("estoque", ActionTaken::LowStock, message).with_data(json!({
            "count": low.len(),
            "items": low
                .iter()
                .map(|i| json!({ "name": i.name, "quantity": i.quantity, "min": i.min_quantity }))
                .collect::<Vec<_>>(),
        })))
    }

    pub(crate) async fn add_stock(
        &self,
        intent: &Intent,
        folded: &str,
    ) -> StoreResult<CommandResult> {
        let count = intent.number_slot("count").map(|c| c as i64);
        let item_name = item_name_from(folded);

        let (Some(item_name), Some(count)) = (item_name, count) else {
            return Ok(CommandResult::request_info(
                "Para adicionar ao estoque, preciso saber o item e a quantidade.",
                &["item_name", "quantity"],
            ));
        };

        let items = self.store.inventory(Some(&item_name)).await?;
        let Some(item) = items.first() else {
            return Ok(CommandResult::failure(format!(
                "Item \"{}\" não encontrado no estoque.",
                item_name
            )));
        };

        let old_quantity = item.quantity;
        let updated = self.store.adjust_inventory(item.id, count).await?;
        self.store.commit().await?;

        Ok(CommandResult::ok(
            "estoque",
            ActionTaken::StockAdded,
            format!(
                "Estoque atualizado!\n{}: {} → {} unidades",
                updated.name, old_quantity, updated.quantity
            ),
        )
        .with_data(json!({
            "item": updated.name,
            "added": count,
            "old_quantity": old_quantity,
            "new_quantity": updated.quantity,
        })))
    }
}

/// First plausible item word in a folded stock command: longer than three
/// characters, not a stopword, not a number.
fn item_name_from(folded: &str) -> Option<String> {
    folded
        .split_whitespace()
        .find(|word| {
            word.len() > 3
                && !ITEM_STOPWORDS.contains(word)
                && word.chars().any(|c| c.is_alphabetic())
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name_extraction() {
        assert_eq!(item_name_from("quanto temos de ouro"), Some("ouro".to_string()));
        assert_eq!(item_name_from("quanto temos de prata"), Some("prata".to_string()));
        assert_eq!(item_name_from("quantos brincos no estoque"), Some("brincos".to_string()));
        assert_eq!(item_name_from("quanto temos"), None);
    }
}
