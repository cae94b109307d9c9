use chrono::NaiveDate;

use super::{
    client::ClientId,
    totals::ShiftTotals,
    transaction::TransactionItem,
};

// Route sheet.
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheetRow {
    pub client_id: ClientId,
    pub order_index: Option<i64>,
    pub name: String,
    pub totals: ShiftTotals,
    /// All-time debt, not just the sheet's date.
    pub current_debt: f64,
    pub items_morning: Vec<TransactionItem>,
    pub items_afternoon: Vec<TransactionItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheet {
    pub date: NaiveDate,
    /// One row per known client, in route order, including idle clients.
    pub rows: Vec<RouteSheetRow>,
    pub total_delivered: f64,
    pub total_paid: f64,
}

// Product ranking.
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Inclusive calendar range. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

// Debts.
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct ClientDebt {
    pub client_id: ClientId,
    pub name: String,
    pub order_index: Option<i64>,
    pub debt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebtRollup {
    pub clients: Vec<ClientDebt>,
    pub total_receivable: f64,
}

// Dashboard.
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub debts: DebtRollup,
    pub route_sheet: RouteSheet,
    pub top_products: Vec<ProductSales>,
}

// Exports.
// ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub contents: String,
}

// --

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

impl DebtRollup {
    /// Clients who currently owe money.
    pub fn debtors(&self) -> Vec<&ClientDebt> {
        self.clients.iter().filter(|c| c.debt > 0.0).collect()
    }

    /// Case-insensitive name filter, as used by the debt view's search box.
    pub fn filtered(&self, query: &str) -> Vec<&ClientDebt> {
        let query = query.trim().to_lowercase();
        self.clients
            .iter()
            .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
            .collect()
    }
}
