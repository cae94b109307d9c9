use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::repositories::{
        auth_repository_impl::AuthRepositoryImpl, finance_repository_impl::FinanceRepositoryImpl,
    },
    domain::{
        logic::ledger::balance,
        repositories::finance_repository::FinanceRepository,
        usecases::auth_usecase::{AuthUsecase, AuthUsecaseImpl},
    },
    entities::{
        Client, ClientDraft, ClientId, ClientUpdate, Product, ProductDraft, ProductId,
        ProductUpdate, SeedClient,
    },
};

/// Clients and products. Reads are open to any session; every mutation
/// requires the admin role.
#[async_trait]
pub(crate) trait CatalogUsecase: Send + Sync {
    async fn clients(&self) -> Result<Vec<Client>, ServerError>;
    async fn products(&self) -> Result<Vec<Product>, ServerError>;
    async fn create_client(&self, draft: ClientDraft) -> Result<Client, ServerError>;
    async fn update_client(
        &self,
        id: &ClientId,
        update: ClientUpdate,
    ) -> Result<Client, ServerError>;
    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError>;
    async fn set_initial_balance(&self, id: &ClientId, amount: f64)
        -> Result<Client, ServerError>;
    /// Current debt of one client over its full history.
    async fn client_balance(&self, id: &ClientId) -> Result<f64, ServerError>;
    async fn seed_clients(&self, roster: Vec<SeedClient>) -> Result<(), ServerError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServerError>;
    async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ServerError>;
    async fn delete_product(&self, id: &ProductId) -> Result<(), ServerError>;
    async fn seed_products(&self, catalog: Vec<ProductDraft>) -> Result<(), ServerError>;
}

pub(crate) struct CatalogUsecaseImpl<R1 = FinanceRepositoryImpl, U1 = AuthUsecaseImpl<AuthRepositoryImpl>>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    finance_repository: R1,
    auth_usecase: Arc<U1>,
}

impl<R1, U1> CatalogUsecaseImpl<R1, U1>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    pub(crate) fn new(finance_repository: R1, auth_usecase: Arc<U1>) -> Self {
        Self {
            finance_repository,
            auth_usecase,
        }
    }
}

#[async_trait]
impl<R1, U1> CatalogUsecase for CatalogUsecaseImpl<R1, U1>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    async fn clients(&self) -> Result<Vec<Client>, ServerError> {
        self.finance_repository.clients().await
    }

    async fn products(&self) -> Result<Vec<Product>, ServerError> {
        self.finance_repository.products().await
    }

    async fn create_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.create_client(draft).await
    }

    async fn update_client(
        &self,
        id: &ClientId,
        update: ClientUpdate,
    ) -> Result<Client, ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.update_client(id, update).await
    }

    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.delete_client(id).await
    }

    async fn set_initial_balance(
        &self,
        id: &ClientId,
        amount: f64,
    ) -> Result<Client, ServerError> {
        self.update_client(
            id,
            ClientUpdate {
                initial_balance: Some(amount),
                ..Default::default()
            },
        )
        .await
    }

    async fn client_balance(&self, id: &ClientId) -> Result<f64, ServerError> {
        let (client, history) = futures::try_join!(
            self.finance_repository.client(id),
            self.finance_repository.client_transactions(id),
        )?;
        Ok(balance(client.initial_balance, &history))
    }

    async fn seed_clients(&self, roster: Vec<SeedClient>) -> Result<(), ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.seed_clients(roster).await
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.create_product(draft).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.update_product(id, update).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.delete_product(id).await
    }

    async fn seed_products(&self, catalog: Vec<ProductDraft>) -> Result<(), ServerError> {
        self.auth_usecase.require_admin().await?;
        self.finance_repository.seed_products(catalog).await
    }
}
