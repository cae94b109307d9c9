use std::collections::HashMap;

use chrono::NaiveDate;

use crate::entities::{
    Client, ClientDebt, ClientId, DebtRollup, ProductSales, RouteSheet, RouteSheetRow, Shift,
    Transaction, TransactionItem, TransactionType,
};

use super::ledger::{balance, shift_totals};

/// Per-client day sheet. `day_transactions` are the date's transactions
/// (with items); `history` is every transaction ever recorded and only feeds
/// the debt column. Clients without activity still get a row.
pub fn route_sheet(
    date: NaiveDate,
    clients: &[Client],
    day_transactions: &[Transaction],
    history: &[Transaction],
) -> RouteSheet {
    let day_by_client = group_by_client(day_transactions.iter().filter(|t| t.date == date));
    let history_by_client = group_by_client(history.iter());

    let mut ordered: Vec<&Client> = clients.iter().collect();
    ordered.sort_by(|a, b| a.route_order(b));

    let rows: Vec<RouteSheetRow> = ordered
        .into_iter()
        .map(|c| {
            let day = day_by_client.get(&c.id).map(Vec::as_slice).unwrap_or_default();
            let all = history_by_client.get(&c.id).map(Vec::as_slice).unwrap_or_default();
            RouteSheetRow {
                client_id: c.id.clone(),
                order_index: c.order_index,
                name: c.name.clone(),
                totals: shift_totals(day.iter().copied()),
                current_debt: balance(c.initial_balance, all.iter().copied()),
                items_morning: delivery_items(day, Shift::Morning),
                items_afternoon: delivery_items(day, Shift::Afternoon),
            }
        })
        .collect();

    let total_delivered = rows.iter().map(|r| r.totals.delivered()).sum();
    let total_paid = rows.iter().map(|r| r.totals.paid()).sum();

    RouteSheet {
        date,
        rows,
        total_delivered,
        total_paid,
    }
}

/// Quantity and revenue per product name, best sellers first. Products with
/// equal quantity keep the order in which they first appear in `items`.
pub fn product_ranking(items: &[TransactionItem]) -> Vec<ProductSales> {
    let mut ranking: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let slot = *index.entry(item.product_name.as_str()).or_insert_with(|| {
            ranking.push(ProductSales {
                name: item.product_name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
            ranking.len() - 1
        });
        ranking[slot].quantity += u64::from(item.quantity);
        ranking[slot].revenue += item.total_price;
    }
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking
}

/// All-time debt for every client, in route order.
pub fn debt_rollup(clients: &[Client], history: &[Transaction]) -> DebtRollup {
    let history_by_client = group_by_client(history.iter());

    let mut ordered: Vec<&Client> = clients.iter().collect();
    ordered.sort_by(|a, b| a.route_order(b));

    let clients: Vec<ClientDebt> = ordered
        .into_iter()
        .map(|c| ClientDebt {
            client_id: c.id.clone(),
            name: c.name.clone(),
            order_index: c.order_index,
            debt: balance(
                c.initial_balance,
                history_by_client
                    .get(&c.id)
                    .into_iter()
                    .flatten()
                    .copied(),
            ),
        })
        .collect();
    let total_receivable = clients.iter().map(|c| c.debt).sum();

    DebtRollup {
        clients,
        total_receivable,
    }
}

fn group_by_client<'a, I>(transactions: I) -> HashMap<&'a ClientId, Vec<&'a Transaction>>
where
    I: Iterator<Item = &'a Transaction>,
{
    transactions.fold(HashMap::new(), |mut map, t| {
        map.entry(&t.client_id).or_default().push(t);
        map
    })
}

fn delivery_items(day: &[&Transaction], shift: Shift) -> Vec<TransactionItem> {
    day.iter()
        .filter(|t| t.kind == TransactionType::Delivery && t.shift == Some(shift))
        .flat_map(|t| t.items.iter().cloned())
        .collect()
}
