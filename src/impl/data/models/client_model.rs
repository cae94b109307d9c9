use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use crate::entities::{Client, ClientDraft, ClientId, ClientUpdate, SeedClient};

/// Row of the `clients` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ClientModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub initial_balance: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ClientInsertModel {
    pub name: String,
    pub route: Option<String>,
    pub order_index: Option<i64>,
    pub phone: Option<String>,
    pub initial_balance: f64,
    pub user_id: String,
}

/// Bulk roster row. Carries no balance, so re-seeding never resets one.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ClientSeedModel {
    pub name: String,
    pub route: String,
    pub order_index: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ClientPatchModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<f64>,
}

/// Route label given to seeded clients.
pub(crate) const SEED_ROUTE: &str = "Cayhuayna 30";

impl From<ClientModel> for Client {
    fn from(m: ClientModel) -> Self {
        Client {
            id: ClientId(m.id),
            name: m.name,
            route: m.route,
            order_index: m.order_index,
            phone: m.phone,
            initial_balance: m.initial_balance.unwrap_or(0.0),
            owner_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

impl ClientInsertModel {
    pub(crate) fn from_draft(draft: ClientDraft, user_id: &str) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            route: draft.route,
            order_index: draft.order_index,
            phone: draft.phone,
            initial_balance: draft.initial_balance,
            user_id: user_id.to_string(),
        }
    }

}

impl ClientSeedModel {
    pub(crate) fn from_seed(seed: SeedClient, user_id: &str) -> Self {
        Self {
            name: seed.name.trim().to_string(),
            route: SEED_ROUTE.to_string(),
            order_index: seed.order_index,
            user_id: user_id.to_string(),
        }
    }
}

impl From<ClientUpdate> for ClientPatchModel {
    fn from(u: ClientUpdate) -> Self {
        Self {
            name: u.name,
            route: u.route,
            order_index: u.order_index,
            phone: u.phone,
            initial_balance: u.initial_balance,
        }
    }
}

impl ClientModel {
    pub(crate) fn apply(&mut self, patch: &ClientPatchModel) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(route) = &patch.route {
            self.route = Some(route.clone());
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = Some(order_index);
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(initial_balance) = patch.initial_balance {
            self.initial_balance = Some(initial_balance);
        }
    }
}
