//! Domain records
//!
//! These mirror the ERP's persisted entities. The assistant core treats them
//! as read-mostly rows identified by an integer id; their lifecycle belongs
//! to the data-access collaborator.

use crate::resolver::Named;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub salary: f64,
    pub active: bool,
}

impl Named for Employee {
    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
}

impl Named for Customer {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Vale lifecycle: pending until approved, approved until paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValeStatus {
    Pending,
    Approved,
    Paid,
}

impl std::fmt::Display for ValeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValeStatus::Pending => write!(f, "pendente"),
            ValeStatus::Approved => write!(f, "aprovado"),
            ValeStatus::Paid => write!(f, "pago"),
        }
    }
}

/// Cash advance issued to an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vale {
    pub id: i64,
    pub employee_id: i64,
    pub amount: f64,
    pub reason: String,
    pub status: ValeStatus,
    pub created_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pendente"),
            OrderStatus::Confirmed => write!(f, "confirmada"),
            OrderStatus::Delivered => write!(f, "entregue"),
            OrderStatus::Cancelled => write!(f, "cancelada"),
        }
    }
}

/// Customer order (encomenda)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub description: String,
    pub total_price: f64,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
}

impl Order {
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JewelryItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Option<f64>,
}

impl Named for JewelryItem {
    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub min_quantity: i64,
}

impl InventoryItem {
    pub fn is_low(&self) -> bool {
        self.quantity > 0 && self.quantity <= self.min_quantity
    }

    pub fn is_out(&self) -> bool {
        self.quantity == 0
    }
}

impl Named for InventoryItem {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Direction of a cash-ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlow {
    Entrada,
    Saida,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTransaction {
    pub id: i64,
    pub flow: CashFlow,
    pub amount: f64,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// Aggregate counters for the system status command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCounts {
    pub employees: usize,
    pub customers: usize,
    pub orders_today: usize,
    pub pending_vales: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_thresholds() {
        let out = InventoryItem {
            id: 1,
            name: "Ouro 18k".to_string(),
            quantity: 0,
            min_quantity: 5,
        };
        assert!(out.is_out());
        assert!(!out.is_low());

        let low = InventoryItem {
            id: 2,
            name: "Prata 950".to_string(),
            quantity: 3,
            min_quantity: 5,
        };
        assert!(low.is_low());
        assert!(!low.is_out());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ValeStatus::Pending.to_string(), "pendente");
        assert_eq!(OrderStatus::Delivered.to_string(), "entregue");
    }
}
