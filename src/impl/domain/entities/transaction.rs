use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::client::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionType {
    /// Goods handed over on credit. Increases the client's debt.
    Delivery,
    /// Money collected. Decreases the client's debt.
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shift {
    Morning,
    Afternoon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub String);

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line of a delivery. Name and price are frozen at the time of sale, so
/// later catalog changes don't rewrite historical revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionItem {
    pub transaction_id: TransactionId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub client_id: ClientId,
    pub kind: TransactionType,
    pub shift: Option<Shift>,
    /// Always non-negative; the sign is implied by `kind`.
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
    /// Product name -> quantity, as embedded in the transaction row.
    pub products: BTreeMap<String, u32>,
    pub items: Vec<TransactionItem>,
}

/// Item priced from the catalog, not yet attached to a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub client_id: ClientId,
    pub kind: TransactionType,
    pub shift: Option<Shift>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Only meaningful for deliveries.
    pub items: Vec<ItemDraft>,
}

/// Fields editable after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub amount: f64,
    pub description: Option<String>,
}

// --

impl Transaction {
    /// Contribution of this transaction to the client's debt.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Delivery => self.amount,
            TransactionType::Payment => -self.amount,
        }
    }
}

impl ItemDraft {
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl NewTransaction {
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(ItemDraft::total_price).sum()
    }

    pub fn products(&self) -> BTreeMap<String, u32> {
        self.items
            .iter()
            .map(|i| (i.product_name.clone(), i.quantity))
            .collect()
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Delivery => write!(f, "Entrega"),
            TransactionType::Payment => write!(f, "Pago"),
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shift::Morning => write!(f, "Mañana"),
            Shift::Afternoon => write!(f, "Tarde"),
        }
    }
}
