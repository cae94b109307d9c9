use std::collections::BTreeMap;

use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::{
    domain::logic::ledger::{day_totals, round_cents},
    errors::ManualAmountLocked,
};

use super::{
    client::ClientId,
    product::Product,
    totals::DayTotals,
    transaction::{
        ItemDraft, Shift, Transaction, TransactionId, TransactionType, TransactionUpdate,
    },
    voice_command::VoiceCommand,
};

/// Pending entry on the intake screen.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeForm {
    pub client_id: Option<ClientId>,
    pub shift: Shift,
    pub payment_amount: Option<f64>,
    manual_delivery_amount: Option<f64>,
    product_quantities: BTreeMap<String, u32>,
}

/// Result of one submission. Each write is reported on its own; a failed
/// payment does not undo a stored delivery or vice versa.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub delivery: Option<Result<Transaction, ServerError>>,
    pub payment: Option<Result<Transaction, ServerError>>,
}

/// Transactions of the selected date, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLedger {
    pub date: NaiveDate,
    transactions: Vec<Transaction>,
}

// --

impl Default for IntakeForm {
    fn default() -> Self {
        Self {
            client_id: None,
            shift: Shift::Morning,
            payment_amount: None,
            manual_delivery_amount: None,
            product_quantities: BTreeMap::new(),
        }
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_client(&mut self, client_id: ClientId) {
        self.client_id = Some(client_id);
    }

    pub fn set_shift(&mut self, shift: Shift) {
        self.shift = shift;
    }

    pub fn set_payment_amount(&mut self, amount: Option<f64>) {
        self.payment_amount = amount;
    }

    /// Manual delivery amount. Rejected while products are selected, since
    /// the amount is then derived from the selection.
    pub fn set_delivery_amount(&mut self, amount: Option<f64>) -> Result<(), ServerError> {
        if self.has_products() {
            return Err(ManualAmountLocked::new());
        }
        self.manual_delivery_amount = amount;
        Ok(())
    }

    /// A quantity of zero deselects the product.
    pub fn set_product_quantity(&mut self, product_name: &str, quantity: u32) {
        if quantity == 0 {
            self.product_quantities.remove(product_name);
        } else {
            self.product_quantities
                .insert(product_name.to_string(), quantity);
        }
        self.manual_delivery_amount = None;
    }

    pub fn product_quantities(&self) -> &BTreeMap<String, u32> {
        &self.product_quantities
    }

    pub fn has_products(&self) -> bool {
        !self.product_quantities.is_empty()
    }

    /// Selected products priced from `catalog`. Selections naming a product
    /// that is no longer in the catalog are dropped.
    pub fn priced_items(&self, catalog: &[Product]) -> Vec<ItemDraft> {
        catalog
            .iter()
            .filter_map(|p| {
                self.product_quantities
                    .get(&p.name)
                    .filter(|q| **q > 0)
                    .map(|q| ItemDraft {
                        product_name: p.name.clone(),
                        quantity: *q,
                        unit_price: p.price,
                    })
            })
            .collect()
    }

    /// Amount of the delivery this form would create: derived from the
    /// product selection if there is one, the manual amount otherwise.
    pub fn delivery_amount(&self, catalog: &[Product]) -> Option<f64> {
        if self.has_products() {
            let items = self.priced_items(catalog);
            if items.is_empty() {
                return None;
            }
            return Some(round_cents(items.iter().map(ItemDraft::total_price).sum()));
        }
        self.manual_delivery_amount
    }

    /// Overwrites the fields the command recognized; leaves the rest alone.
    pub fn apply_voice_command(&mut self, command: &VoiceCommand) {
        if let Some(client_id) = &command.client_id {
            self.select_client(client_id.clone());
        }
        for (name, quantity) in &command.products {
            self.set_product_quantity(name, *quantity);
        }
        if let Some(amount) = command.payment_amount {
            self.payment_amount = Some(amount);
        }
        if let Some(shift) = command.shift {
            self.shift = shift;
        }
    }

    /// Ready for the next client on the route. The shift is kept.
    pub fn clear(&mut self) {
        self.client_id = None;
        self.clear_delivery();
        self.clear_payment();
    }

    pub(crate) fn clear_delivery(&mut self) {
        self.manual_delivery_amount = None;
        self.product_quantities.clear();
    }

    pub(crate) fn clear_payment(&mut self) {
        self.payment_amount = None;
    }
}

impl IntakeOutcome {
    /// True when every issued write was stored.
    pub fn is_success(&self) -> bool {
        self.delivery.as_ref().map_or(true, Result::is_ok)
            && self.payment.as_ref().map_or(true, Result::is_ok)
    }

    pub fn created(&self) -> Vec<&Transaction> {
        [&self.delivery, &self.payment]
            .into_iter()
            .filter_map(|r| r.as_ref().and_then(|r| r.as_ref().ok()))
            .collect()
    }

    pub fn failures(&self) -> Vec<(TransactionType, &ServerError)> {
        let mut failures = Vec::new();
        if let Some(Err(e)) = &self.delivery {
            failures.push((TransactionType::Delivery, e));
        }
        if let Some(Err(e)) = &self.payment {
            failures.push((TransactionType::Payment, e));
        }
        failures
    }
}

impl DailyLedger {
    pub fn new(date: NaiveDate, transactions: Vec<Transaction>) -> Self {
        Self { date, transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn prepend(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub fn apply_update(&mut self, id: &TransactionId, update: &TransactionUpdate) {
        if let Some(t) = self.transactions.iter_mut().find(|t| &t.id == id) {
            t.amount = update.amount;
            t.description = update.description.clone();
        }
    }

    pub fn remove(&mut self, id: &TransactionId) {
        self.transactions.retain(|t| &t.id != id);
    }

    pub fn totals(&self) -> DayTotals {
        day_totals(&self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProductId;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: ProductId("p1".into()),
                name: "Pan".into(),
                price: 0.2,
            },
            Product {
                id: ProductId("p2".into()),
                name: "Keke".into(),
                price: 12.5,
            },
        ]
    }

    #[test]
    fn delivery_amount_is_derived_from_selection() {
        let mut form = IntakeForm::new();
        form.set_product_quantity("Pan", 30);
        form.set_product_quantity("Keke", 2);
        assert_eq!(form.delivery_amount(&catalog()), Some(31.0));
    }

    #[test]
    fn manual_amount_is_locked_while_products_are_selected() {
        let mut form = IntakeForm::new();
        form.set_delivery_amount(Some(8.0)).unwrap();
        assert_eq!(form.delivery_amount(&catalog()), Some(8.0));

        form.set_product_quantity("Keke", 1);
        assert!(form.set_delivery_amount(Some(3.0)).is_err());
        assert_eq!(form.delivery_amount(&catalog()), Some(12.5));

        form.set_product_quantity("Keke", 0);
        assert!(form.set_delivery_amount(Some(3.0)).is_ok());
    }

    #[test]
    fn unknown_products_are_not_priced() {
        let mut form = IntakeForm::new();
        form.set_product_quantity("Empanada", 4);
        assert!(form.priced_items(&catalog()).is_empty());
        assert_eq!(form.delivery_amount(&catalog()), None);
    }

    #[test]
    fn voice_command_only_overwrites_detected_fields() {
        let mut form = IntakeForm::new();
        form.select_client(ClientId("c1".into()));
        form.set_payment_amount(Some(5.0));

        let command = VoiceCommand {
            shift: Some(Shift::Afternoon),
            ..Default::default()
        };
        form.apply_voice_command(&command);

        assert_eq!(form.client_id, Some(ClientId("c1".into())));
        assert_eq!(form.payment_amount, Some(5.0));
        assert_eq!(form.shift, Shift::Afternoon);
    }

    #[test]
    fn clear_keeps_shift() {
        let mut form = IntakeForm::new();
        form.select_client(ClientId("c1".into()));
        form.set_shift(Shift::Afternoon);
        form.set_product_quantity("Pan", 3);
        form.clear();

        assert_eq!(form.client_id, None);
        assert!(!form.has_products());
        assert_eq!(form.shift, Shift::Afternoon);
    }
}
