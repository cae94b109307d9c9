use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fractic_server_error::ServerError;
use tracing::debug;

use crate::{
    data::models::{
        client_model::{ClientInsertModel, ClientModel, ClientPatchModel, ClientSeedModel},
        product_model::{ProductInsertModel, ProductModel, ProductPatchModel},
        transaction_model::{
            TransactionInsertModel, TransactionItemInsertModel, TransactionItemModel,
            TransactionModel, TransactionPatchModel, TransactionTypeModel,
        },
        user_model::{UserMetadataModel, UserModel},
    },
    domain::logic::calendar::to_peru,
    entities::Role,
    errors::{AuthenticationFailed, BackendRejected, BackendRequestFailed, RecordNotFound},
};

use super::backend_datasource::BackendDatasource;

const CONFLICT: u16 = 409;

struct Account {
    user: UserModel,
    password: String,
    role: Option<String>,
}

#[derive(Default)]
struct Store {
    seq: u64,
    clients: Vec<ClientModel>,
    products: Vec<ProductModel>,
    /// Insertion order; items live in `items`.
    transactions: Vec<TransactionModel>,
    items: Vec<TransactionItemModel>,
    accounts: Vec<Account>,
    current_user: Option<String>,
    failing: HashSet<String>,
    calls: HashMap<String, usize>,
}

/// Process-local backend. Clones share the same store. Meant for tests and
/// offline demos; there is no row-level ownership filtering.
#[derive(Clone, Default)]
pub struct InMemoryDatasource {
    store: Arc<Mutex<Store>>,
}

impl InMemoryDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can sign in.
    pub fn with_user(self, email: &str, password: &str, role: Role) -> Self {
        {
            let mut store = self.lock();
            let id = store.next_id("user");
            store.accounts.push(Account {
                user: UserModel {
                    id,
                    email: Some(email.to_string()),
                    user_metadata: UserMetadataModel::default(),
                },
                password: password.to_string(),
                role: Some(
                    match role {
                        Role::Admin => "admin",
                        Role::User => "user",
                    }
                    .to_string(),
                ),
            });
        }
        self
    }

    /// Makes every later call of `operation` fail until `recover` is called.
    /// Operations are named after the backend calls ("insert_client",
    /// "select_all_transactions", ...); "insert_delivery" and
    /// "insert_payment" narrow "insert_transaction" to one kind.
    pub fn fail_on(&self, operation: &str) {
        self.lock().failing.insert(operation.to_string());
    }

    pub fn recover(&self, operation: &str) {
        self.lock().failing.remove(operation);
    }

    /// How many times `operation` has been called, failed calls included.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock().calls.get(operation).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the store for `operation`, honoring injected failures.
    fn open(&self, operation: &str) -> Result<MutexGuard<'_, Store>, ServerError> {
        self.open_any(&[operation])
    }

    fn open_any(&self, operations: &[&str]) -> Result<MutexGuard<'_, Store>, ServerError> {
        let mut store = self.lock();
        for operation in operations {
            *store.calls.entry(operation.to_string()).or_default() += 1;
        }
        if let Some(operation) = operations.iter().find(|o| store.failing.contains(**o)) {
            debug!(operation, "injected failure");
            return Err(BackendRequestFailed::new(operation));
        }
        Ok(store)
    }
}

impl Store {
    fn next_id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{prefix}-{:06}", self.seq)
    }

    fn with_items(&self, mut transaction: TransactionModel) -> TransactionModel {
        transaction.items = self
            .items
            .iter()
            .filter(|i| i.transaction_id.as_deref() == Some(transaction.id.as_str()))
            .cloned()
            .collect();
        transaction
    }

    fn upsert_client(&mut self, seed: ClientSeedModel) {
        match self.clients.iter_mut().find(|c| c.name == seed.name) {
            Some(existing) => {
                existing.route = Some(seed.route);
                existing.order_index = Some(seed.order_index);
            }
            None => {
                let id = self.next_id("client");
                self.clients.push(client_row(
                    id,
                    ClientInsertModel {
                        name: seed.name,
                        route: Some(seed.route),
                        order_index: Some(seed.order_index),
                        phone: None,
                        initial_balance: 0.0,
                        user_id: seed.user_id,
                    },
                ));
            }
        }
    }
}

fn client_row(id: String, client: ClientInsertModel) -> ClientModel {
    ClientModel {
        id,
        name: client.name,
        route: client.route,
        order_index: client.order_index,
        phone: client.phone,
        initial_balance: Some(client.initial_balance),
        user_id: Some(client.user_id),
        created_at: Some(Utc::now()),
    }
}

fn not_found(entity: &str, id: &str) -> ServerError {
    RecordNotFound::new(entity, id)
}

#[async_trait]
impl BackendDatasource for InMemoryDatasource {
    async fn select_clients(&self) -> Result<Vec<ClientModel>, ServerError> {
        let store = self.open("select_clients")?;
        let mut clients = store.clients.clone();
        clients.sort_by(|a, b| {
            match (a.order_index, b.order_index) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.name.cmp(&b.name))
        });
        Ok(clients)
    }

    async fn find_client(&self, id: &str) -> Result<Option<ClientModel>, ServerError> {
        let store = self.open("find_client")?;
        Ok(store.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientModel>, ServerError> {
        let store = self.open("find_client_by_name")?;
        Ok(store.clients.iter().find(|c| c.name == name).cloned())
    }

    async fn insert_client(&self, client: ClientInsertModel) -> Result<ClientModel, ServerError> {
        let mut store = self.open("insert_client")?;
        if store.clients.iter().any(|c| c.name == client.name) {
            return Err(BackendRejected::new("insert_client", CONFLICT));
        }
        let id = store.next_id("client");
        let row = client_row(id, client);
        store.clients.push(row.clone());
        Ok(row)
    }

    async fn update_client(
        &self,
        id: &str,
        patch: ClientPatchModel,
    ) -> Result<ClientModel, ServerError> {
        let mut store = self.open("update_client")?;
        let row = store
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Cliente", id))?;
        row.apply(&patch);
        Ok(row.clone())
    }

    async fn delete_client(&self, id: &str) -> Result<(), ServerError> {
        let mut store = self.open("delete_client")?;
        store.clients.retain(|c| c.id != id);
        Ok(())
    }

    async fn upsert_clients(&self, clients: Vec<ClientSeedModel>) -> Result<(), ServerError> {
        let mut store = self.open("upsert_clients")?;
        for client in clients {
            store.upsert_client(client);
        }
        Ok(())
    }

    async fn select_products(&self) -> Result<Vec<ProductModel>, ServerError> {
        let store = self.open("select_products")?;
        let mut products = store.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn insert_product(
        &self,
        product: ProductInsertModel,
    ) -> Result<ProductModel, ServerError> {
        let mut store = self.open("insert_product")?;
        if store.products.iter().any(|p| p.name == product.name) {
            return Err(BackendRejected::new("insert_product", CONFLICT));
        }
        let row = ProductModel {
            id: store.next_id("product"),
            name: product.name,
            price: product.price,
            user_id: Some(product.user_id),
        };
        store.products.push(row.clone());
        Ok(row)
    }

    async fn update_product(
        &self,
        id: &str,
        patch: ProductPatchModel,
    ) -> Result<ProductModel, ServerError> {
        let mut store = self.open("update_product")?;
        let row = store
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Producto", id))?;
        row.apply(&patch);
        Ok(row.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<(), ServerError> {
        let mut store = self.open("delete_product")?;
        store.products.retain(|p| p.id != id);
        Ok(())
    }

    async fn upsert_products(&self, products: Vec<ProductInsertModel>) -> Result<(), ServerError> {
        let mut store = self.open("upsert_products")?;
        for product in products {
            if store.products.iter().any(|p| p.name == product.name) {
                continue;
            }
            let id = store.next_id("product");
            store.products.push(ProductModel {
                id,
                name: product.name,
                price: product.price,
                user_id: Some(product.user_id),
            });
        }
        Ok(())
    }

    async fn insert_transaction(
        &self,
        transaction: TransactionInsertModel,
    ) -> Result<TransactionModel, ServerError> {
        let narrowed = match transaction.kind {
            TransactionTypeModel::Delivery => "insert_delivery",
            TransactionTypeModel::Payment => "insert_payment",
        };
        let mut store = self.open_any(&["insert_transaction", narrowed])?;
        let row = TransactionModel {
            id: store.next_id("tx"),
            client_id: transaction.client_id,
            kind: transaction.kind,
            shift: transaction.shift,
            amount: transaction.amount,
            description: transaction.description,
            date: transaction.date,
            created_at: Some(Utc::now()),
            user_id: Some(transaction.user_id),
            products: transaction.products,
            items: Vec::new(),
        };
        store.transactions.push(row.clone());
        Ok(row)
    }

    async fn insert_transaction_items(
        &self,
        items: Vec<TransactionItemInsertModel>,
    ) -> Result<Vec<TransactionItemModel>, ServerError> {
        let mut store = self.open("insert_transaction_items")?;
        let now = Utc::now();
        let rows: Vec<TransactionItemModel> = items
            .into_iter()
            .map(|i| TransactionItemModel {
                transaction_id: Some(i.transaction_id),
                product_name: i.product_name,
                quantity: i.quantity,
                unit_price: Some(i.unit_price),
                total_price: i.total_price,
                created_at: Some(now),
            })
            .collect();
        store.items.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: TransactionPatchModel,
    ) -> Result<TransactionModel, ServerError> {
        let mut store = self.open("update_transaction")?;
        let row = store
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Transacción", id))?;
        row.amount = patch.amount;
        row.description = patch.description;
        let updated = row.clone();
        Ok(store.with_items(updated))
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), ServerError> {
        let mut store = self.open("delete_transaction")?;
        store
            .items
            .retain(|i| i.transaction_id.as_deref() != Some(id));
        store.transactions.retain(|t| t.id != id);
        Ok(())
    }

    async fn delete_transactions_by_client(&self, client_id: &str) -> Result<(), ServerError> {
        let mut store = self.open("delete_transactions_by_client")?;
        let removed: HashSet<String> = store
            .transactions
            .iter()
            .filter(|t| t.client_id == client_id)
            .map(|t| t.id.clone())
            .collect();
        store.transactions.retain(|t| t.client_id != client_id);
        store.items.retain(|i| {
            i.transaction_id
                .as_ref()
                .map_or(true, |id| !removed.contains(id))
        });
        Ok(())
    }

    async fn select_transactions_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<TransactionModel>, ServerError> {
        let store = self.open("select_transactions_by_date")?;
        Ok(store
            .transactions
            .iter()
            .rev()
            .filter(|t| t.date.0 == date)
            .map(|t| store.with_items(t.clone()))
            .collect())
    }

    async fn select_transactions_by_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<TransactionModel>, ServerError> {
        let store = self.open("select_transactions_by_client")?;
        Ok(store
            .transactions
            .iter()
            .filter(|t| t.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn select_all_transactions(&self) -> Result<Vec<TransactionModel>, ServerError> {
        let store = self.open("select_all_transactions")?;
        Ok(store.transactions.clone())
    }

    async fn select_transaction_items(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TransactionItemModel>, ServerError> {
        let store = self.open("select_transaction_items")?;
        Ok(store
            .items
            .iter()
            .filter(|i| {
                let Some(day) = i.created_at.map(|c| to_peru(c).date_naive()) else {
                    return start.is_none() && end.is_none();
                };
                start.map_or(true, |s| day >= s) && end.map_or(true, |e| day <= e)
            })
            .cloned()
            .collect())
    }

    async fn current_user(&self) -> Result<Option<UserModel>, ServerError> {
        let store = self.open("current_user")?;
        Ok(store.current_user.as_ref().and_then(|id| {
            store
                .accounts
                .iter()
                .find(|a| &a.user.id == id)
                .map(|a| a.user.clone())
        }))
    }

    async fn select_profile_role(&self, user_id: &str) -> Result<Option<String>, ServerError> {
        let store = self.open("select_profile_role")?;
        Ok(store
            .accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .and_then(|a| a.role.clone()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserModel, ServerError> {
        let mut store = self.open("sign_in")?;
        let user = store
            .accounts
            .iter()
            .find(|a| a.user.email.as_deref() == Some(email) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| AuthenticationFailed::new("credenciales inválidas"))?;
        store.current_user = Some(user.id.clone());
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserModel, ServerError> {
        let mut store = self.open("sign_up")?;
        if store
            .accounts
            .iter()
            .any(|a| a.user.email.as_deref() == Some(email))
        {
            return Err(AuthenticationFailed::new("el usuario ya está registrado"));
        }
        let user = UserModel {
            id: store.next_id("user"),
            email: Some(email.to_string()),
            user_metadata: UserMetadataModel {
                full_name: full_name.map(str::to_string),
            },
        };
        store.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
            role: None,
        });
        store.current_user = Some(user.id.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ServerError> {
        let mut store = self.open("sign_out")?;
        store.current_user = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::iso_date_model::ISODateModel;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn insert(client_id: &str, date: NaiveDate) -> TransactionInsertModel {
        TransactionInsertModel {
            client_id: client_id.into(),
            kind: TransactionTypeModel::Payment,
            shift: None,
            amount: 1.0,
            description: None,
            date: ISODateModel(date),
            user_id: "u".into(),
            products: None,
        }
    }

    #[tokio::test]
    async fn day_listing_is_newest_first() {
        let ds = InMemoryDatasource::new();
        let first = ds.insert_transaction(insert("c", day(1))).await.unwrap();
        ds.insert_transaction(insert("c", day(2))).await.unwrap();
        let second = ds.insert_transaction(insert("c", day(1))).await.unwrap();

        let ids: Vec<String> = ds
            .select_transactions_by_date(day(1))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn injected_failures_last_until_recovered() {
        let ds = InMemoryDatasource::new();
        ds.fail_on("select_products");
        assert!(ds.select_products().await.is_err());
        ds.recover("select_products");
        assert!(ds.select_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_upsert_merges_by_name() {
        let ds = InMemoryDatasource::new();
        let seed = |order_index| ClientSeedModel {
            name: "Rosa".into(),
            route: "Cayhuayna 30".into(),
            order_index,
            user_id: "u".into(),
        };
        ds.upsert_clients(vec![seed(1)]).await.unwrap();
        let id = ds.select_clients().await.unwrap()[0].id.clone();
        ds.update_client(
            &id,
            ClientPatchModel {
                initial_balance: Some(12.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ds.upsert_clients(vec![seed(4)]).await.unwrap();

        let clients = ds.select_clients().await.unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].order_index, Some(4));
        assert_eq!(clients[0].initial_balance, Some(12.0));
    }
}
