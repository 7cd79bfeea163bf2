//! Data-access collaborator
//!
//! The assistant core never talks to a database directly: every read and
//! mutation goes through [`ErpStore`]. Multi-step mutations are bracketed by
//! `commit`/`rollback` so a failure never leaves partial writes visible.
//!
//! [`MemoryStore`] is the reference implementation used by tests: it keeps a
//! committed snapshot next to the working state, so rollback is a copy and
//! commit failure can be injected to exercise the all-or-nothing paths.

use crate::error::{StoreError, StoreResult};
use crate::extract::DateRange;
use crate::models::{
    CashFlow, CashTransaction, Customer, Employee, InventoryItem, JewelryItem, Note, Order,
    OrderStatus, SystemCounts, Vale, ValeStatus,
};
use crate::normalize::fold_text;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// Filter for vale queries
#[derive(Debug, Clone, Default)]
pub struct ValeFilter {
    pub status: Option<ValeStatus>,
    pub employee_id: Option<i64>,
    pub created: Option<DateRange>,
}

impl ValeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ValeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn for_employee(mut self, employee_id: i64) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn created_in(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    fn matches(&self, vale: &Vale) -> bool {
        self.status.map_or(true, |s| vale.status == s)
            && self.employee_id.map_or(true, |id| vale.employee_id == id)
            && self
                .created
                .map_or(true, |range| range.contains(vale.created_at.date()))
    }
}

/// Filter for order queries
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub statuses: Vec<OrderStatus>,
    pub created: Option<DateRange>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Orders that count as sales (confirmed or delivered).
    pub fn sales(mut self) -> Self {
        self.statuses = vec![OrderStatus::Confirmed, OrderStatus::Delivered];
        self
    }

    pub fn created_in(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    fn matches(&self, order: &Order) -> bool {
        self.customer_id.map_or(true, |id| order.customer_id == Some(id))
            && (self.statuses.is_empty() || self.statuses.contains(&order.status))
            && self
                .created
                .map_or(true, |range| range.contains(order.created_on()))
    }
}

/// Typed query/mutation surface of the ERP persistence layer
#[async_trait]
pub trait ErpStore: Send + Sync {
    async fn active_employees(&self) -> StoreResult<Vec<Employee>>;
    async fn employee(&self, id: i64) -> StoreResult<Option<Employee>>;

    async fn vales(&self, filter: ValeFilter) -> StoreResult<Vec<Vale>>;
    async fn create_vale(&self, employee_id: i64, amount: f64, reason: &str) -> StoreResult<Vale>;
    async fn set_vale_status(
        &self,
        id: i64,
        status: ValeStatus,
        paid_at: Option<NaiveDateTime>,
    ) -> StoreResult<()>;
    async fn delete_last_vale(&self) -> StoreResult<Option<Vale>>;

    async fn customers(&self, name_fragment: Option<&str>) -> StoreResult<Vec<Customer>>;
    async fn orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>>;
    async fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<()>;
    async fn jewelry(&self, category: Option<&str>) -> StoreResult<Vec<JewelryItem>>;

    async fn inventory(&self, name_fragment: Option<&str>) -> StoreResult<Vec<InventoryItem>>;
    async fn adjust_inventory(&self, id: i64, delta: i64) -> StoreResult<InventoryItem>;

    async fn record_transaction(
        &self,
        flow: CashFlow,
        amount: f64,
        description: &str,
    ) -> StoreResult<CashTransaction>;
    /// All ledger entries up to and including `end`.
    async fn transactions_through(&self, end: NaiveDate) -> StoreResult<Vec<CashTransaction>>;
    async fn transactions_between(&self, range: DateRange) -> StoreResult<Vec<CashTransaction>>;

    async fn create_note(&self, title: &str, content: &str) -> StoreResult<Note>;
    async fn counts(&self) -> StoreResult<SystemCounts>;

    /// Promote the working state. Mutations issued since the last commit
    /// become durable together.
    async fn commit(&self) -> StoreResult<()>;
    /// Discard mutations issued since the last commit.
    async fn rollback(&self) -> StoreResult<()>;
}

/// Flat copy of every table
#[derive(Debug, Clone, Default)]
struct State {
    employees: Vec<Employee>,
    customers: Vec<Customer>,
    vales: Vec<Vale>,
    orders: Vec<Order>,
    jewelry: Vec<JewelryItem>,
    inventory: Vec<InventoryItem>,
    transactions: Vec<CashTransaction>,
    notes: Vec<Note>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

struct MemoryInner {
    working: State,
    committed: State,
    fail_next_commit: bool,
}

/// In-memory store with snapshot-based transactions
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                working: State::default(),
                committed: State::default(),
                fail_next_commit: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn seed<F: FnOnce(&mut State)>(&self, f: F) {
        let mut inner = self.lock();
        f(&mut inner.working);
        inner.committed = inner.working.clone();
    }

    /// Seed an employee; committed immediately.
    pub fn with_employee(self, name: &str, role: &str, salary: f64) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.employees.push(Employee {
                id,
                name: name.to_string(),
                role: role.to_string(),
                salary,
                active: true,
            });
        });
        self
    }

    pub fn with_customer(self, name: &str, phone: Option<&str>) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.customers.push(Customer {
                id,
                name: name.to_string(),
                phone: phone.map(str::to_string),
            });
        });
        self
    }

    pub fn with_order(self, customer_id: Option<i64>, description: &str, total: f64, status: OrderStatus) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.orders.push(Order {
                id,
                customer_id,
                description: description.to_string(),
                total_price: total,
                status,
                created_at: Local::now().naive_local(),
            });
        });
        self
    }

    pub fn with_jewelry(self, name: &str, category: &str, price: Option<f64>) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.jewelry.push(JewelryItem {
                id,
                name: name.to_string(),
                category: category.to_string(),
                price,
            });
        });
        self
    }

    pub fn with_inventory_item(self, name: &str, quantity: i64, min_quantity: i64) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.inventory.push(InventoryItem {
                id,
                name: name.to_string(),
                quantity,
                min_quantity,
            });
        });
        self
    }

    pub fn with_transaction(self, flow: CashFlow, amount: f64, description: &str) -> Self {
        self.seed(|state| {
            let id = state.next_id();
            state.transactions.push(CashTransaction {
                id,
                flow,
                amount,
                description: description.to_string(),
                created_at: Local::now().naive_local(),
            });
        });
        self
    }

    /// Make the next commit fail with a backend error, reverting the
    /// working state, so callers can exercise rollback paths.
    pub fn fail_next_commit(&self) {
        self.lock().fail_next_commit = true;
    }
}

#[async_trait]
impl ErpStore for MemoryStore {
    async fn active_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self
            .lock()
            .working
            .employees
            .iter()
            .filter(|e| e.active)
            .cloned()
            .collect())
    }

    async fn employee(&self, id: i64) -> StoreResult<Option<Employee>> {
        Ok(self
            .lock()
            .working
            .employees
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn vales(&self, filter: ValeFilter) -> StoreResult<Vec<Vale>> {
        Ok(self
            .lock()
            .working
            .vales
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }

    async fn create_vale(&self, employee_id: i64, amount: f64, reason: &str) -> StoreResult<Vale> {
        let mut inner = self.lock();
        if !inner.working.employees.iter().any(|e| e.id == employee_id) {
            return Err(StoreError::NotFound {
                entity: "employee",
                id: employee_id,
            });
        }
        let id = inner.working.next_id();
        let vale = Vale {
            id,
            employee_id,
            amount,
            reason: reason.to_string(),
            status: ValeStatus::Pending,
            created_at: Local::now().naive_local(),
            paid_at: None,
        };
        inner.working.vales.push(vale.clone());
        Ok(vale)
    }

    async fn set_vale_status(
        &self,
        id: i64,
        status: ValeStatus,
        paid_at: Option<NaiveDateTime>,
    ) -> StoreResult<()> {
        let mut inner = self.lock();
        let vale = inner
            .working
            .vales
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound {
                entity: "vale",
                id,
            })?;
        vale.status = status;
        if paid_at.is_some() {
            vale.paid_at = paid_at;
        }
        Ok(())
    }

    async fn delete_last_vale(&self) -> StoreResult<Option<Vale>> {
        let mut inner = self.lock();
        let last = inner
            .working
            .vales
            .iter()
            .max_by_key(|v| v.id)
            .map(|v| v.id);
        match last {
            Some(id) => {
                let idx = inner.working.vales.iter().position(|v| v.id == id);
                Ok(idx.map(|i| inner.working.vales.remove(i)))
            }
            None => Ok(None),
        }
    }

    async fn customers(&self, name_fragment: Option<&str>) -> StoreResult<Vec<Customer>> {
        let inner = self.lock();
        let wanted = name_fragment.map(fold_text);
        Ok(inner
            .working
            .customers
            .iter()
            .filter(|c| {
                wanted
                    .as_ref()
                    .map_or(true, |w| fold_text(&c.name).contains(w.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>> {
        Ok(self
            .lock()
            .working
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect())
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<()> {
        let mut inner = self.lock();
        let order = inner
            .working
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound {
                entity: "order",
                id,
            })?;
        order.status = status;
        Ok(())
    }

    async fn jewelry(&self, category: Option<&str>) -> StoreResult<Vec<JewelryItem>> {
        let inner = self.lock();
        let wanted = category.map(fold_text);
        Ok(inner
            .working
            .jewelry
            .iter()
            .filter(|j| {
                wanted
                    .as_ref()
                    .map_or(true, |w| fold_text(&j.category).contains(w.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn inventory(&self, name_fragment: Option<&str>) -> StoreResult<Vec<InventoryItem>> {
        let inner = self.lock();
        let wanted = name_fragment.map(fold_text);
        Ok(inner
            .working
            .inventory
            .iter()
            .filter(|i| {
                wanted
                    .as_ref()
                    .map_or(true, |w| fold_text(&i.name).contains(w.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn adjust_inventory(&self, id: i64, delta: i64) -> StoreResult<InventoryItem> {
        let mut inner = self.lock();
        let item = inner
            .working
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound {
                entity: "inventory_item",
                id,
            })?;
        item.quantity = (item.quantity + delta).max(0);
        Ok(item.clone())
    }

    async fn record_transaction(
        &self,
        flow: CashFlow,
        amount: f64,
        description: &str,
    ) -> StoreResult<CashTransaction> {
        let mut inner = self.lock();
        let id = inner.working.next_id();
        let transaction = CashTransaction {
            id,
            flow,
            amount,
            description: description.to_string(),
            created_at: Local::now().naive_local(),
        };
        inner.working.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn transactions_through(&self, end: NaiveDate) -> StoreResult<Vec<CashTransaction>> {
        Ok(self
            .lock()
            .working
            .transactions
            .iter()
            .filter(|t| t.created_at.date() <= end)
            .cloned()
            .collect())
    }

    async fn transactions_between(&self, range: DateRange) -> StoreResult<Vec<CashTransaction>> {
        Ok(self
            .lock()
            .working
            .transactions
            .iter()
            .filter(|t| range.contains(t.created_at.date()))
            .cloned()
            .collect())
    }

    async fn create_note(&self, title: &str, content: &str) -> StoreResult<Note> {
        let mut inner = self.lock();
        let id = inner.working.next_id();
        let note = Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Local::now().naive_local(),
        };
        inner.working.notes.push(note.clone());
        Ok(note)
    }

    async fn counts(&self) -> StoreResult<SystemCounts> {
        let inner = self.lock();
        let today = Local::now().date_naive();
        Ok(SystemCounts {
            employees: inner.working.employees.len(),
            customers: inner.working.customers.len(),
            orders_today: inner
                .working
                .orders
                .iter()
                .filter(|o| o.created_on() == today)
                .count(),
            pending_vales: inner
                .working
                .vales
                .iter()
                .filter(|v| v.status == ValeStatus::Pending)
                .count(),
        })
    }

    async fn commit(&self) -> StoreResult<()> {
        let mut inner = self.lock();
        if inner.fail_next_commit {
            inner.fail_next_commit = false;
            inner.working = inner.committed.clone();
            return Err(StoreError::Transaction {
                message: "commit rejected by backend".to_string(),
            });
        }
        inner.committed = inner.working.clone();
        Ok(())
    }

    async fn rollback(&self) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.working = inner.committed.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_vale_create_and_filter() {
        let store = MemoryStore::new().with_employee("Josemir", "Ourives", 2500.0);
        let employees = store.active_employees().await.unwrap();
        let vale = store
            .create_vale(employees[0].id, 200.0, "Vale almoço")
            .await
            .unwrap();
        store.commit().await.unwrap();

        assert_eq!(vale.status, ValeStatus::Pending);

        let pending = store
            .vales(ValeFilter::new().with_status(ValeStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);

        let paid = store
            .vales(ValeFilter::new().with_status(ValeStatus::Paid))
            .await
            .unwrap();
        assert!(paid.is_empty());
    }

    #[tokio::test]
    async fn test_create_vale_unknown_employee() {
        let store = MemoryStore::new();
        let err = store.create_vale(99, 100.0, "Vale").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rollback_restores_committed_snapshot() {
        let store = MemoryStore::new().with_employee("Darvin", "Gerente", 4000.0);
        let id = store.active_employees().await.unwrap()[0].id;

        store.create_vale(id, 150.0, "Vale").await.unwrap();
        store.rollback().await.unwrap();

        let all = store.vales(ValeFilter::new()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_failed_commit_reverts_working_state() {
        let store = MemoryStore::new().with_employee("Darvin", "Gerente", 4000.0);
        let id = store.active_employees().await.unwrap()[0].id;

        store.create_vale(id, 150.0, "Vale").await.unwrap();
        store.fail_next_commit();
        assert!(store.commit().await.is_err());

        let all = store.vales(ValeFilter::new()).await.unwrap();
        assert!(all.is_empty());

        // The failure knob is one-shot.
        store.create_vale(id, 80.0, "Vale").await.unwrap();
        store.commit().await.unwrap();
        assert_eq!(store.vales(ValeFilter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_last_vale() {
        let store = MemoryStore::new().with_employee("Josemir", "Ourives", 2500.0);
        let id = store.active_employees().await.unwrap()[0].id;
        store.create_vale(id, 100.0, "Primeiro").await.unwrap();
        let second = store.create_vale(id, 200.0, "Segundo").await.unwrap();
        store.commit().await.unwrap();

        let deleted = store.delete_last_vale().await.unwrap().unwrap();
        assert_eq!(deleted.id, second.id);
        assert_eq!(store.vales(ValeFilter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_customer_search_is_accent_insensitive() {
        let store = MemoryStore::new().with_customer("José Almeida", Some("9999-1234"));
        let found = store.customers(Some("jose")).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_inventory_adjust_floors_at_zero() {
        let store = MemoryStore::new().with_inventory_item("Prata 950", 3, 5);
        let id = store.inventory(None).await.unwrap()[0].id;
        let item = store.adjust_inventory(id, -10).await.unwrap();
        assert_eq!(item.quantity, 0);
    }
}
