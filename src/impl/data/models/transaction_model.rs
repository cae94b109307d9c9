use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use crate::entities::{
    ClientId, ItemDraft, NewTransaction, Shift, Transaction, TransactionId, TransactionItem,
    TransactionType,
};

use super::iso_date_model::ISODateModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum TransactionTypeModel {
    Delivery,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ShiftModel {
    Morning,
    Afternoon,
}

/// Row of the `transactions` table, optionally with its embedded
/// `transaction_items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TransactionModel {
    pub id: String,
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionTypeModel,
    #[serde(default)]
    pub shift: Option<ShiftModel>,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: ISODateModel,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub products: Option<BTreeMap<String, u32>>,
    #[serde(default, skip_serializing)]
    pub items: Vec<TransactionItemModel>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransactionInsertModel {
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionTypeModel,
    pub shift: Option<ShiftModel>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: ISODateModel,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<BTreeMap<String, u32>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransactionPatchModel {
    pub amount: f64,
    pub description: Option<String>,
}

/// Row of the `transaction_items` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TransactionItemModel {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub total_price: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransactionItemInsertModel {
    pub transaction_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

// --

impl From<TransactionTypeModel> for TransactionType {
    fn from(m: TransactionTypeModel) -> Self {
        match m {
            TransactionTypeModel::Delivery => TransactionType::Delivery,
            TransactionTypeModel::Payment => TransactionType::Payment,
        }
    }
}

impl From<TransactionType> for TransactionTypeModel {
    fn from(t: TransactionType) -> Self {
        match t {
            TransactionType::Delivery => TransactionTypeModel::Delivery,
            TransactionType::Payment => TransactionTypeModel::Payment,
        }
    }
}

impl From<ShiftModel> for Shift {
    fn from(m: ShiftModel) -> Self {
        match m {
            ShiftModel::Morning => Shift::Morning,
            ShiftModel::Afternoon => Shift::Afternoon,
        }
    }
}

impl From<Shift> for ShiftModel {
    fn from(s: Shift) -> Self {
        match s {
            Shift::Morning => ShiftModel::Morning,
            Shift::Afternoon => ShiftModel::Afternoon,
        }
    }
}

impl From<TransactionModel> for Transaction {
    fn from(m: TransactionModel) -> Self {
        let id = TransactionId(m.id);
        let items = m
            .items
            .into_iter()
            .map(|i| i.into_entity(&id))
            .collect();
        Transaction {
            id,
            client_id: ClientId(m.client_id),
            kind: m.kind.into(),
            shift: m.shift.map(Into::into),
            amount: m.amount,
            description: m.description,
            date: m.date.into(),
            created_at: m.created_at,
            owner_id: m.user_id,
            products: m.products.unwrap_or_default(),
            items,
        }
    }
}

impl TransactionItemModel {
    /// Rows fetched through an embed omit the parent id; fall back to it.
    pub(crate) fn into_entity(self, parent: &TransactionId) -> TransactionItem {
        let unit_price = self.unit_price.unwrap_or_else(|| {
            if self.quantity == 0 {
                0.0
            } else {
                self.total_price / self.quantity as f64
            }
        });
        TransactionItem {
            transaction_id: self
                .transaction_id
                .map(TransactionId)
                .unwrap_or_else(|| parent.clone()),
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price,
            total_price: self.total_price,
            created_at: self.created_at,
        }
    }
}

impl TransactionInsertModel {
    pub(crate) fn from_new(tx: &NewTransaction, user_id: &str) -> Self {
        let products = match tx.kind {
            TransactionType::Delivery if !tx.items.is_empty() => Some(tx.products()),
            _ => None,
        };
        Self {
            client_id: tx.client_id.0.clone(),
            kind: tx.kind.into(),
            shift: tx.shift.map(Into::into),
            amount: tx.amount,
            description: tx.description.clone(),
            date: ISODateModel(tx.date),
            user_id: user_id.to_string(),
            products,
        }
    }
}

impl TransactionItemInsertModel {
    pub(crate) fn from_draft(draft: &ItemDraft, transaction_id: &TransactionId) -> Self {
        Self {
            transaction_id: transaction_id.0.clone(),
            product_name: draft.product_name.clone(),
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total_price: draft.total_price(),
        }
    }
}
