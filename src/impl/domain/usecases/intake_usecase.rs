use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tracing::{error, info};

use crate::{
    data::repositories::finance_repository_impl::FinanceRepositoryImpl,
    domain::repositories::finance_repository::FinanceRepository,
    entities::{
        DailyLedger, IntakeForm, IntakeOutcome, NewTransaction, Product, Transaction,
        TransactionId, TransactionType, TransactionUpdate,
    },
    errors::{ClientNotSelected, EmptySubmission},
};

pub(crate) const DELIVERY_DESCRIPTION: &str = "Venta rápida";
pub(crate) const PAYMENT_DESCRIPTION: &str = "Abono rápido";

#[async_trait]
pub(crate) trait IntakeUsecase: Send + Sync {
    async fn load_day(&self, date: NaiveDate) -> Result<DailyLedger, ServerError>;
    /// Validates the form, then stores its delivery and payment
    /// concurrently. Errors are returned only for validation; write
    /// failures are reported per write in the outcome.
    async fn submit(
        &self,
        form: &mut IntakeForm,
        ledger: &mut DailyLedger,
        catalog: &[Product],
    ) -> Result<IntakeOutcome, ServerError>;
    async fn edit(
        &self,
        ledger: &mut DailyLedger,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, ServerError>;
    async fn delete(&self, ledger: &mut DailyLedger, id: &TransactionId)
        -> Result<(), ServerError>;
}

pub(crate) struct IntakeUsecaseImpl<R1 = FinanceRepositoryImpl>
where
    R1: FinanceRepository,
{
    finance_repository: R1,
}

impl<R1: FinanceRepository> IntakeUsecaseImpl<R1> {
    pub(crate) fn new(finance_repository: R1) -> Self {
        Self { finance_repository }
    }

    async fn write(&self, tx: Option<NewTransaction>) -> Option<Result<Transaction, ServerError>> {
        match tx {
            Some(tx) => Some(self.finance_repository.record_transaction(tx).await),
            None => None,
        }
    }
}

/// The writes a form asks for, priced from `catalog`.
fn planned_writes(
    form: &IntakeForm,
    date: NaiveDate,
    catalog: &[Product],
) -> Result<(Option<NewTransaction>, Option<NewTransaction>), ServerError> {
    let client_id = form.client_id.clone().ok_or_else(|| ClientNotSelected::new())?;
    let delivery_amount = form.delivery_amount(catalog).filter(|a| *a > 0.0);
    let payment_amount = form.payment_amount.filter(|a| *a > 0.0);
    if delivery_amount.is_none() && payment_amount.is_none() {
        return Err(EmptySubmission::new());
    }

    let delivery = delivery_amount.map(|amount| NewTransaction {
        client_id: client_id.clone(),
        kind: TransactionType::Delivery,
        shift: Some(form.shift),
        amount,
        description: Some(DELIVERY_DESCRIPTION.to_string()),
        date,
        items: if form.has_products() {
            form.priced_items(catalog)
        } else {
            Vec::new()
        },
    });
    let payment = payment_amount.map(|amount| NewTransaction {
        client_id,
        kind: TransactionType::Payment,
        shift: Some(form.shift),
        amount,
        description: Some(PAYMENT_DESCRIPTION.to_string()),
        date,
        items: Vec::new(),
    });
    Ok((delivery, payment))
}

#[async_trait]
impl<R1> IntakeUsecase for IntakeUsecaseImpl<R1>
where
    R1: FinanceRepository,
{
    async fn load_day(&self, date: NaiveDate) -> Result<DailyLedger, ServerError> {
        Ok(DailyLedger::new(
            date,
            self.finance_repository.transactions_on(date).await?,
        ))
    }

    async fn submit(
        &self,
        form: &mut IntakeForm,
        ledger: &mut DailyLedger,
        catalog: &[Product],
    ) -> Result<IntakeOutcome, ServerError> {
        let (delivery, payment) = planned_writes(form, ledger.date, catalog)?;
        let (delivery, payment) = futures::join!(self.write(delivery), self.write(payment));
        let outcome = IntakeOutcome { delivery, payment };

        if let Some(Ok(tx)) = &outcome.delivery {
            ledger.prepend(tx.clone());
            form.clear_delivery();
        }
        if let Some(Ok(tx)) = &outcome.payment {
            ledger.prepend(tx.clone());
            form.clear_payment();
        }
        for (kind, e) in outcome.failures() {
            error!(%kind, %e, "intake write failed");
        }
        if outcome.is_success() {
            info!(date = %ledger.date, "intake stored");
            form.clear();
        }
        Ok(outcome)
    }

    async fn edit(
        &self,
        ledger: &mut DailyLedger,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, ServerError> {
        let updated = self
            .finance_repository
            .update_transaction(id, update.clone())
            .await?;
        ledger.apply_update(id, &update);
        Ok(updated)
    }

    async fn delete(
        &self,
        ledger: &mut DailyLedger,
        id: &TransactionId,
    ) -> Result<(), ServerError> {
        self.finance_repository.delete_transaction(id).await?;
        ledger.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        data::datasources::{
            backend_datasource::BackendDatasource, memory_datasource::InMemoryDatasource,
        },
        domain::logic::ledger::round_cents,
        entities::{ClientDraft, ClientId, ProductId, Role, Shift},
    };

    fn catalog() -> Vec<Product> {
        vec![Product {
            id: ProductId("p1".into()),
            name: "Pan".into(),
            price: 0.2,
        }]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn a_client_is_required() {
        let mut form = IntakeForm::new();
        form.set_payment_amount(Some(5.0));
        assert!(planned_writes(&form, date(), &catalog()).is_err());
    }

    #[test]
    fn something_must_be_entered() {
        let mut form = IntakeForm::new();
        form.select_client(ClientId("c".into()));
        assert!(planned_writes(&form, date(), &catalog()).is_err());

        form.set_product_quantity("Discontinued", 3);
        assert!(planned_writes(&form, date(), &catalog()).is_err());
    }

    #[test]
    fn products_and_payment_plan_two_writes() {
        let mut form = IntakeForm::new();
        form.select_client(ClientId("c".into()));
        form.set_shift(Shift::Afternoon);
        form.set_product_quantity("Pan", 5);
        form.set_payment_amount(Some(20.0));

        let (delivery, payment) = planned_writes(&form, date(), &catalog()).unwrap();
        let delivery = delivery.unwrap();
        let payment = payment.unwrap();
        assert_eq!(delivery.amount, 1.0);
        assert_eq!(delivery.items.len(), 1);
        assert_eq!(delivery.shift, Some(Shift::Afternoon));
        assert_eq!(delivery.description.as_deref(), Some("Venta rápida"));
        assert_eq!(payment.amount, 20.0);
        assert_eq!(payment.description.as_deref(), Some("Abono rápido"));
        assert_eq!(payment.date, date());
    }

    #[tokio::test]
    async fn half_cent_prices_are_stored_rounded() {
        let ds = InMemoryDatasource::new().with_user("ana@example.com", "secret", Role::User);
        ds.sign_in("ana@example.com", "secret").await.unwrap();
        let repo = FinanceRepositoryImpl::new(Arc::new(ds));
        let client = repo.create_client(ClientDraft::new("Rosa")).await.unwrap();
        let usecase = IntakeUsecaseImpl::new(repo);
        let catalog = vec![
            Product {
                id: ProductId("p1".into()),
                name: "Pan".into(),
                price: 0.125,
            },
            Product {
                id: ProductId("p2".into()),
                name: "Bizcocho".into(),
                price: 0.175,
            },
        ];

        let mut ledger = usecase.load_day(date()).await.unwrap();
        for (name, quantity, expected) in [
            ("Pan", 1, 0.13),
            ("Pan", 3, 0.38),
            ("Bizcocho", 1, round_cents(0.175)),
        ] {
            let mut form = IntakeForm::new();
            form.select_client(client.id.clone());
            form.set_product_quantity(name, quantity);

            let outcome = usecase.submit(&mut form, &mut ledger, &catalog).await.unwrap();
            assert!(outcome.is_success(), "{quantity} x {name}");
            assert_eq!(ledger.transactions()[0].amount, expected);
        }
    }
}
