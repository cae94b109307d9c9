use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::repositories::auth_repository_impl::AuthRepositoryImpl,
    domain::{logic::route_guard::route_decision, repositories::auth_repository::AuthRepository},
    entities::{Credentials, Role, RouteDecision, SignupCredentials, User},
    errors::AdminRequired,
};

#[async_trait]
pub(crate) trait AuthUsecase: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<User, ServerError>;
    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, ServerError>;
    async fn logout(&self) -> Result<(), ServerError>;
    async fn current_user(&self) -> Result<Option<User>, ServerError>;
    async fn role(&self) -> Role;
    async fn require_admin(&self) -> Result<(), ServerError>;
    /// Route guard decision for `path` given the current session.
    async fn navigate(&self, path: &str) -> Result<RouteDecision, ServerError>;
}

pub(crate) struct AuthUsecaseImpl<R1 = AuthRepositoryImpl>
where
    R1: AuthRepository,
{
    auth_repository: R1,
}

impl<R1: AuthRepository> AuthUsecaseImpl<R1> {
    pub(crate) fn new(auth_repository: R1) -> Self {
        Self { auth_repository }
    }
}

#[async_trait]
impl<R1> AuthUsecase for AuthUsecaseImpl<R1>
where
    R1: AuthRepository,
{
    async fn login(&self, credentials: &Credentials) -> Result<User, ServerError> {
        self.auth_repository.login(credentials).await
    }

    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, ServerError> {
        self.auth_repository.signup(credentials).await
    }

    async fn logout(&self) -> Result<(), ServerError> {
        self.auth_repository.logout().await
    }

    async fn current_user(&self) -> Result<Option<User>, ServerError> {
        self.auth_repository.current_user().await
    }

    async fn role(&self) -> Role {
        self.auth_repository.current_role().await
    }

    async fn require_admin(&self) -> Result<(), ServerError> {
        match self.role().await {
            Role::Admin => Ok(()),
            Role::User => Err(AdminRequired::new()),
        }
    }

    async fn navigate(&self, path: &str) -> Result<RouteDecision, ServerError> {
        let authenticated = self.current_user().await?.is_some();
        Ok(route_decision(path, authenticated))
    }
}
