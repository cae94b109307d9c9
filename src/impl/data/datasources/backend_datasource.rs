use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::data::models::{
    client_model::{ClientInsertModel, ClientModel, ClientPatchModel, ClientSeedModel},
    product_model::{ProductInsertModel, ProductModel, ProductPatchModel},
    transaction_model::{
        TransactionInsertModel, TransactionItemInsertModel, TransactionItemModel,
        TransactionModel, TransactionPatchModel,
    },
    user_model::UserModel,
};

/// Remote store of clients, products, transactions and identities.
///
/// Row-level ownership is the store's concern; callers pass the owner id on
/// inserts and otherwise see whatever the store lets them read.
#[async_trait]
pub(crate) trait BackendDatasource: Send + Sync {
    // Clients.

    /// Ordered by order index (missing last), then name.
    async fn select_clients(&self) -> Result<Vec<ClientModel>, ServerError>;
    async fn find_client(&self, id: &str) -> Result<Option<ClientModel>, ServerError>;
    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientModel>, ServerError>;
    async fn insert_client(&self, client: ClientInsertModel) -> Result<ClientModel, ServerError>;
    async fn update_client(
        &self,
        id: &str,
        patch: ClientPatchModel,
    ) -> Result<ClientModel, ServerError>;
    async fn delete_client(&self, id: &str) -> Result<(), ServerError>;
    /// Insert-or-update keyed by name.
    async fn upsert_clients(&self, clients: Vec<ClientSeedModel>) -> Result<(), ServerError>;

    // Products.

    /// Ordered by name.
    async fn select_products(&self) -> Result<Vec<ProductModel>, ServerError>;
    async fn insert_product(&self, product: ProductInsertModel)
        -> Result<ProductModel, ServerError>;
    async fn update_product(
        &self,
        id: &str,
        patch: ProductPatchModel,
    ) -> Result<ProductModel, ServerError>;
    async fn delete_product(&self, id: &str) -> Result<(), ServerError>;
    /// Insert keyed by name; existing names are left untouched.
    async fn upsert_products(&self, products: Vec<ProductInsertModel>) -> Result<(), ServerError>;

    // Transactions.

    async fn insert_transaction(
        &self,
        transaction: TransactionInsertModel,
    ) -> Result<TransactionModel, ServerError>;
    async fn insert_transaction_items(
        &self,
        items: Vec<TransactionItemInsertModel>,
    ) -> Result<Vec<TransactionItemModel>, ServerError>;
    async fn update_transaction(
        &self,
        id: &str,
        patch: TransactionPatchModel,
    ) -> Result<TransactionModel, ServerError>;
    /// Also removes the transaction's items.
    async fn delete_transaction(&self, id: &str) -> Result<(), ServerError>;
    async fn delete_transactions_by_client(&self, client_id: &str) -> Result<(), ServerError>;
    /// Transactions of `date` with their items, newest first.
    async fn select_transactions_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<TransactionModel>, ServerError>;
    async fn select_transactions_by_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<TransactionModel>, ServerError>;
    async fn select_all_transactions(&self) -> Result<Vec<TransactionModel>, ServerError>;
    /// Items whose creation day (Peru time) falls within the inclusive
    /// bounds; `None` leaves that side open.
    async fn select_transaction_items(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TransactionItemModel>, ServerError>;

    // Identity.

    async fn current_user(&self) -> Result<Option<UserModel>, ServerError>;
    async fn select_profile_role(&self, user_id: &str) -> Result<Option<String>, ServerError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserModel, ServerError>;
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserModel, ServerError>;
    async fn sign_out(&self) -> Result<(), ServerError>;
}
