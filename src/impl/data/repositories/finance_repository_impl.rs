use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tracing::{debug, error, info};

use crate::{
    data::{
        datasources::backend_datasource::BackendDatasource,
        models::{
            client_model::{ClientInsertModel, ClientPatchModel, ClientSeedModel},
            product_model::{ProductInsertModel, ProductPatchModel},
            transaction_model::{
                TransactionInsertModel, TransactionItemInsertModel, TransactionPatchModel,
            },
        },
    },
    domain::{logic::ledger::cents, repositories::finance_repository::FinanceRepository},
    entities::{
        Client, ClientDraft, ClientId, ClientUpdate, DateRange, NewTransaction, Product,
        ProductDraft, ProductId, ProductUpdate, SeedClient, Transaction, TransactionId,
        TransactionItem, TransactionType, TransactionUpdate,
    },
    errors::{
        ClientAlreadyExists, DeliveryItemsMismatch, NegativeAmount, NotAuthenticated,
        RecordNotFound,
    },
};

pub(crate) struct FinanceRepositoryImpl {
    backend: Arc<dyn BackendDatasource>,
}

impl FinanceRepositoryImpl {
    pub(crate) fn new(backend: Arc<dyn BackendDatasource>) -> Self {
        Self { backend }
    }

    async fn owner_id(&self) -> Result<String, ServerError> {
        self.backend
            .current_user()
            .await?
            .map(|u| u.id)
            .ok_or_else(|| NotAuthenticated::new())
    }
}

fn ensure_non_negative(amount: f64) -> Result<(), ServerError> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(NegativeAmount::new(amount));
    }
    Ok(())
}

/// A delivery priced from products must add up to its items, to the cent.
fn validate_transaction(tx: &NewTransaction) -> Result<(), ServerError> {
    ensure_non_negative(tx.amount)?;
    for item in &tx.items {
        ensure_non_negative(item.unit_price)?;
    }
    if tx.kind == TransactionType::Delivery && !tx.items.is_empty() {
        let items_total = tx.items_total();
        if cents(tx.amount) != cents(items_total) {
            return Err(DeliveryItemsMismatch::new(tx.amount, items_total));
        }
    }
    Ok(())
}

#[async_trait]
impl FinanceRepository for FinanceRepositoryImpl {
    async fn clients(&self) -> Result<Vec<Client>, ServerError> {
        let mut clients: Vec<Client> = self
            .backend
            .select_clients()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        clients.sort_by(|a, b| a.route_order(b));
        Ok(clients)
    }

    async fn client(&self, id: &ClientId) -> Result<Client, ServerError> {
        self.backend
            .find_client(&id.0)
            .await?
            .map(Into::into)
            .ok_or_else(|| RecordNotFound::new("Cliente", &id.0))
    }

    async fn create_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        let owner_id = self.owner_id().await?;
        let name = draft.name.trim().to_string();
        if self.backend.find_client_by_name(&name).await?.is_some() {
            return Err(ClientAlreadyExists::new(&name));
        }
        let created = self
            .backend
            .insert_client(ClientInsertModel::from_draft(draft, &owner_id))
            .await?;
        info!(client_id = %created.id, name = %created.name, "client created");
        Ok(created.into())
    }

    async fn update_client(
        &self,
        id: &ClientId,
        update: ClientUpdate,
    ) -> Result<Client, ServerError> {
        let updated = self
            .backend
            .update_client(&id.0, ClientPatchModel::from(update))
            .await?;
        info!(client_id = %id, "client updated");
        Ok(updated.into())
    }

    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        self.backend.delete_transactions_by_client(&id.0).await?;
        self.backend.delete_client(&id.0).await?;
        info!(client_id = %id, "client and its transactions deleted");
        Ok(())
    }

    async fn seed_clients(&self, roster: Vec<SeedClient>) -> Result<(), ServerError> {
        let owner_id = self.owner_id().await?;
        let count = roster.len();
        self.backend
            .upsert_clients(
                roster
                    .into_iter()
                    .map(|s| ClientSeedModel::from_seed(s, &owner_id))
                    .collect(),
            )
            .await?;
        info!(count, "client roster seeded");
        Ok(())
    }

    async fn products(&self) -> Result<Vec<Product>, ServerError> {
        Ok(self
            .backend
            .select_products()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServerError> {
        ensure_non_negative(draft.price)?;
        let owner_id = self.owner_id().await?;
        let created = self
            .backend
            .insert_product(ProductInsertModel::from_draft(draft, &owner_id))
            .await?;
        info!(product_id = %created.id, name = %created.name, "product created");
        Ok(created.into())
    }

    async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ServerError> {
        if let Some(price) = update.price {
            ensure_non_negative(price)?;
        }
        let updated = self
            .backend
            .update_product(&id.0, ProductPatchModel::from(update))
            .await?;
        info!(product_id = %id, "product updated");
        Ok(updated.into())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ServerError> {
        self.backend.delete_product(&id.0).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn seed_products(&self, catalog: Vec<ProductDraft>) -> Result<(), ServerError> {
        for draft in &catalog {
            ensure_non_negative(draft.price)?;
        }
        let owner_id = self.owner_id().await?;
        let count = catalog.len();
        self.backend
            .upsert_products(
                catalog
                    .into_iter()
                    .map(|d| ProductInsertModel::from_draft(d, &owner_id))
                    .collect(),
            )
            .await?;
        info!(count, "product catalog seeded");
        Ok(())
    }

    async fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction, ServerError> {
        validate_transaction(&tx)?;
        let owner_id = self.owner_id().await?;
        let inserted = self
            .backend
            .insert_transaction(TransactionInsertModel::from_new(&tx, &owner_id))
            .await
            .inspect_err(|e| {
                error!(client_id = %tx.client_id, kind = %tx.kind, %e, "transaction insert failed")
            })?;
        let mut transaction: Transaction = inserted.into();
        info!(
            transaction_id = %transaction.id,
            client_id = %transaction.client_id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "transaction recorded"
        );

        if tx.kind != TransactionType::Delivery || tx.items.is_empty() {
            return Ok(transaction);
        }
        let items = tx
            .items
            .iter()
            .map(|d| TransactionItemInsertModel::from_draft(d, &transaction.id))
            .collect();
        match self.backend.insert_transaction_items(items).await {
            Ok(rows) => {
                transaction.items = rows
                    .into_iter()
                    .map(|r| r.into_entity(&transaction.id))
                    .collect();
            }
            // The transaction stays; its product map still records the sale.
            Err(e) => error!(transaction_id = %transaction.id, %e, "items insert failed"),
        }
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, ServerError> {
        ensure_non_negative(update.amount)?;
        let updated = self
            .backend
            .update_transaction(
                &id.0,
                TransactionPatchModel {
                    amount: update.amount,
                    description: update.description,
                },
            )
            .await?;
        info!(transaction_id = %id, amount = updated.amount, "transaction updated");
        Ok(updated.into())
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), ServerError> {
        self.backend.delete_transaction(&id.0).await?;
        info!(transaction_id = %id, "transaction deleted");
        Ok(())
    }

    async fn transactions_on(&self, date: NaiveDate) -> Result<Vec<Transaction>, ServerError> {
        let rows = self.backend.select_transactions_by_date(date).await?;
        debug!(%date, count = rows.len(), "day transactions loaded");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn client_transactions(&self, id: &ClientId) -> Result<Vec<Transaction>, ServerError> {
        Ok(self
            .backend
            .select_transactions_by_client(&id.0)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn all_transactions(&self) -> Result<Vec<Transaction>, ServerError> {
        Ok(self
            .backend
            .select_all_transactions()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn items_in(&self, range: DateRange) -> Result<Vec<TransactionItem>, ServerError> {
        let unknown = TransactionId(String::new());
        Ok(self
            .backend
            .select_transaction_items(range.start, range.end)
            .await?
            .into_iter()
            .map(|r| r.into_entity(&unknown))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::datasources::memory_datasource::InMemoryDatasource,
        entities::{ItemDraft, Role, Shift},
    };

    async fn signed_in() -> (InMemoryDatasource, FinanceRepositoryImpl) {
        let ds = InMemoryDatasource::new().with_user("ana@example.com", "secret", Role::User);
        ds.sign_in("ana@example.com", "secret").await.unwrap();
        let repo = FinanceRepositoryImpl::new(Arc::new(ds.clone()));
        (ds, repo)
    }

    fn delivery(client_id: &ClientId, amount: f64, items: Vec<ItemDraft>) -> NewTransaction {
        NewTransaction {
            client_id: client_id.clone(),
            kind: TransactionType::Delivery,
            shift: Some(Shift::Morning),
            amount,
            description: Some("Venta rápida".into()),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            items,
        }
    }

    fn pan(quantity: u32) -> ItemDraft {
        ItemDraft {
            product_name: "Pan".into(),
            quantity,
            unit_price: 0.2,
        }
    }

    #[tokio::test]
    async fn writes_require_a_session() {
        let ds = InMemoryDatasource::new();
        let repo = FinanceRepositoryImpl::new(Arc::new(ds));
        assert!(repo.create_client(ClientDraft::new("Rosa")).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_client_names_are_rejected() {
        let (_, repo) = signed_in().await;
        repo.create_client(ClientDraft::new("Rosa")).await.unwrap();
        let err = repo.create_client(ClientDraft::new(" Rosa ")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn delivery_must_match_its_items() {
        let (_, repo) = signed_in().await;
        let client = repo.create_client(ClientDraft::new("Rosa")).await.unwrap();

        let err = repo
            .record_transaction(delivery(&client.id, 5.0, vec![pan(5)]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no coincide con la suma de sus productos"));

        let tx = repo
            .record_transaction(delivery(&client.id, 1.0, vec![pan(5)]))
            .await
            .unwrap();
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.products.get("Pan"), Some(&5));
    }

    #[tokio::test]
    async fn failed_items_keep_the_transaction() {
        let (ds, repo) = signed_in().await;
        let client = repo.create_client(ClientDraft::new("Rosa")).await.unwrap();
        ds.fail_on("insert_transaction_items");

        let tx = repo
            .record_transaction(delivery(&client.id, 1.0, vec![pan(5)]))
            .await
            .unwrap();
        assert!(tx.items.is_empty());
        assert_eq!(repo.all_transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_client_removes_its_history() {
        let (_, repo) = signed_in().await;
        let rosa = repo.create_client(ClientDraft::new("Rosa")).await.unwrap();
        let beto = repo.create_client(ClientDraft::new("Beto")).await.unwrap();
        repo.record_transaction(delivery(&rosa.id, 3.0, vec![]))
            .await
            .unwrap();
        repo.record_transaction(delivery(&beto.id, 4.0, vec![]))
            .await
            .unwrap();

        repo.delete_client(&rosa.id).await.unwrap();
        let remaining = repo.all_transactions().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].client_id, beto.id);
        assert!(repo.client(&rosa.id).await.is_err());
    }

    #[tokio::test]
    async fn negative_amounts_are_rejected() {
        let (_, repo) = signed_in().await;
        let client = repo.create_client(ClientDraft::new("Rosa")).await.unwrap();
        let err = repo
            .record_transaction(delivery(&client.id, -1.0, vec![]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no puede ser negativo"));
    }
}
