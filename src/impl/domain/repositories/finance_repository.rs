use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::entities::{
    Client, ClientDraft, ClientId, ClientUpdate, DateRange, NewTransaction, Product, ProductDraft,
    ProductId, ProductUpdate, SeedClient, Transaction, TransactionId, TransactionItem,
    TransactionUpdate,
};

#[async_trait]
pub(crate) trait FinanceRepository: Send + Sync {
    /// Route order.
    async fn clients(&self) -> Result<Vec<Client>, ServerError>;
    async fn client(&self, id: &ClientId) -> Result<Client, ServerError>;
    async fn create_client(&self, draft: ClientDraft) -> Result<Client, ServerError>;
    async fn update_client(
        &self,
        id: &ClientId,
        update: ClientUpdate,
    ) -> Result<Client, ServerError>;
    /// Removes the client's transactions first.
    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError>;
    async fn seed_clients(&self, roster: Vec<SeedClient>) -> Result<(), ServerError>;

    async fn products(&self) -> Result<Vec<Product>, ServerError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServerError>;
    async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ServerError>;
    async fn delete_product(&self, id: &ProductId) -> Result<(), ServerError>;
    async fn seed_products(&self, catalog: Vec<ProductDraft>) -> Result<(), ServerError>;

    async fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction, ServerError>;
    async fn update_transaction(
        &self,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, ServerError>;
    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), ServerError>;
    /// Newest first, with items.
    async fn transactions_on(&self, date: NaiveDate) -> Result<Vec<Transaction>, ServerError>;
    async fn client_transactions(&self, id: &ClientId) -> Result<Vec<Transaction>, ServerError>;
    async fn all_transactions(&self) -> Result<Vec<Transaction>, ServerError>;
    async fn items_in(&self, range: DateRange) -> Result<Vec<TransactionItem>, ServerError>;
}
