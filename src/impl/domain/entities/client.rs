use std::cmp::Ordering;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub String);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub route: Option<String>,
    /// Position along the physical route. Only used for sorting and display.
    pub order_index: Option<i64>,
    pub phone: Option<String>,
    /// Debt carried over from before the client was tracked here. May be
    /// negative (credit in favour of the client).
    pub initial_balance: f64,
    pub owner_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields required to register a new client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub name: String,
    pub route: Option<String>,
    pub order_index: Option<i64>,
    pub phone: Option<String>,
    pub initial_balance: f64,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub route: Option<String>,
    pub order_index: Option<i64>,
    pub phone: Option<String>,
    pub initial_balance: Option<f64>,
}

/// Roster entry used to bootstrap an empty dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedClient {
    pub order_index: i64,
    pub name: String,
}

// --

impl Client {
    /// "3. Doña Rosa" when the client has a route position, the bare name
    /// otherwise.
    pub fn display_name(&self) -> String {
        match self.order_index {
            Some(i) => format!("{}. {}", i, self.name),
            None => self.name.clone(),
        }
    }

    /// Route order: order index ascending (unnumbered clients last), then
    /// name.
    pub fn route_order(&self, other: &Client) -> Ordering {
        match (self.order_index, other.order_index) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.name.cmp(&other.name))
    }
}

impl ClientDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route: None,
            order_index: None,
            phone: None,
            initial_balance: 0.0,
        }
    }
}
