use crate::entities::{DayTotals, Shift, ShiftTotals, Transaction, TransactionType};

/// Outstanding debt of a client: initial balance plus deliveries minus
/// payments, over the full history. Positive means the client owes money.
pub fn balance<'a, I>(initial_balance: f64, transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    initial_balance
        + transactions
            .into_iter()
            .map(Transaction::signed_amount)
            .sum::<f64>()
}

/// Partitions by (type, shift). Transactions without a shift are not
/// counted in any partition.
pub fn shift_totals<'a, I>(transactions: I) -> ShiftTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(ShiftTotals::default(), |mut totals, t| {
            match (t.kind, t.shift) {
                (TransactionType::Delivery, Some(Shift::Morning)) => {
                    totals.delivered_morning += t.amount
                }
                (TransactionType::Delivery, Some(Shift::Afternoon)) => {
                    totals.delivered_afternoon += t.amount
                }
                (TransactionType::Payment, Some(Shift::Morning)) => totals.paid_morning += t.amount,
                (TransactionType::Payment, Some(Shift::Afternoon)) => {
                    totals.paid_afternoon += t.amount
                }
                (_, None) => {}
            }
            totals
        })
}

pub fn day_totals<'a, I>(transactions: I) -> DayTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(DayTotals::default(), |mut totals, t| {
            match t.kind {
                TransactionType::Delivery => totals.delivered += t.amount,
                TransactionType::Payment => totals.paid += t.amount,
            }
            totals
        })
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Whole cents, half a cent rounding away from zero.
pub(crate) fn cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{ClientId, TransactionId};

    pub(crate) fn tx(
        id: &str,
        client: &str,
        kind: TransactionType,
        shift: Option<Shift>,
        amount: f64,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: TransactionId(id.into()),
            client_id: ClientId(client.into()),
            kind,
            shift,
            amount,
            description: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            created_at: None,
            owner_id: None,
            products: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    fn history() -> Vec<Transaction> {
        use Shift::*;
        use TransactionType::*;
        vec![
            tx("1", "c", Delivery, Some(Morning), 15.0, "2024-05-01"),
            tx("2", "c", Payment, Some(Afternoon), 10.0, "2024-05-01"),
            tx("3", "c", Delivery, Some(Afternoon), 7.5, "2024-04-30"),
            tx("4", "c", Payment, None, 2.5, "2024-04-29"),
        ]
    }

    #[test]
    fn balance_adds_deliveries_and_subtracts_payments() {
        assert_eq!(balance(5.0, &history()), 15.0);
        assert_eq!(balance(-3.0, &Vec::new()), -3.0);
    }

    #[test]
    fn balance_is_order_independent() {
        let forward = history();
        let mut reversed = history();
        reversed.reverse();
        let mut rotated = history();
        rotated.rotate_left(2);

        let expected = balance(5.0, &forward);
        assert_eq!(balance(5.0, &reversed), expected);
        assert_eq!(balance(5.0, &rotated), expected);
    }

    #[test]
    fn shift_totals_partition_by_type_and_shift() {
        let totals = shift_totals(&history());
        assert_eq!(totals.delivered_morning, 15.0);
        assert_eq!(totals.delivered_afternoon, 7.5);
        assert_eq!(totals.paid_morning, 0.0);
        assert_eq!(totals.paid_afternoon, 10.0);
    }

    #[test]
    fn day_totals_ignore_shift() {
        let totals = day_totals(&history());
        assert_eq!(totals.delivered, 22.5);
        assert_eq!(totals.paid, 12.5);
    }

    #[test]
    fn round_cents_drops_float_noise() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(31.000000000000004), 31.0);
    }

    #[test]
    fn cents_settle_half_cent_sums() {
        assert_eq!(cents(0.125), 13);
        assert_eq!(cents(3.0 * 0.125), 38);
        assert_eq!(cents(round_cents(0.175)), cents(0.175));
    }
}
