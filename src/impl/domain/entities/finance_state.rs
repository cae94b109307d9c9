use chrono::NaiveDate;

use super::transaction::TransactionType;

/// Selection state of the finance screen. Transitions are pure: each
/// returns the next state and leaves the current one untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinanceState {
    pub selected_date: NaiveDate,
    pub active_tab: TransactionType,
}

impl FinanceState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: today,
            active_tab: TransactionType::Delivery,
        }
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        Self {
            selected_date: date,
            ..self
        }
    }

    pub fn with_tab(self, tab: TransactionType) -> Self {
        Self {
            active_tab: tab,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_do_not_mutate_previous_state() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let initial = FinanceState::new(today);
        let next = initial
            .with_tab(TransactionType::Payment)
            .with_date(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

        assert_eq!(initial.selected_date, today);
        assert_eq!(initial.active_tab, TransactionType::Delivery);
        assert_eq!(next.active_tab, TransactionType::Payment);
        assert_eq!(next.selected_date.to_string(), "2024-05-02");
    }
}
