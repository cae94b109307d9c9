use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::{info, warn};

use crate::{
    data::datasources::backend_datasource::BackendDatasource,
    domain::repositories::auth_repository::AuthRepository,
    entities::{Credentials, Role, SignupCredentials, User},
};

pub(crate) struct AuthRepositoryImpl {
    backend: Arc<dyn BackendDatasource>,
}

impl AuthRepositoryImpl {
    pub(crate) fn new(backend: Arc<dyn BackendDatasource>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn login(&self, credentials: &Credentials) -> Result<User, ServerError> {
        let user = self
            .backend
            .sign_in(credentials.email.trim(), &credentials.password)
            .await?;
        info!(user_id = %user.id, "login");
        Ok(user.into())
    }

    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, ServerError> {
        let user = self
            .backend
            .sign_up(
                credentials.email.trim(),
                &credentials.password,
                credentials.full_name.as_deref().map(str::trim),
            )
            .await?;
        info!(user_id = %user.id, "signup");
        Ok(user.into())
    }

    async fn logout(&self) -> Result<(), ServerError> {
        self.backend.sign_out().await
    }

    async fn current_user(&self) -> Result<Option<User>, ServerError> {
        Ok(self.backend.current_user().await?.map(Into::into))
    }

    async fn current_role(&self) -> Role {
        let user = match self.backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return Role::User,
            Err(e) => {
                warn!(%e, "identity lookup failed; assuming non-admin");
                return Role::User;
            }
        };
        match self.backend.select_profile_role(&user.id).await {
            Ok(role) => Role::from_db(role.as_deref()),
            Err(e) => {
                warn!(user_id = %user.id, %e, "role lookup failed; assuming non-admin");
                Role::User
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datasources::memory_datasource::InMemoryDatasource;

    #[tokio::test]
    async fn role_lookup_fails_open_to_user() {
        let ds = InMemoryDatasource::new().with_user("jefe@example.com", "pw", Role::Admin);
        let repo = AuthRepositoryImpl::new(Arc::new(ds.clone()));
        assert_eq!(repo.current_role().await, Role::User);

        repo.login(&Credentials {
            email: "jefe@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
        assert_eq!(repo.current_role().await, Role::Admin);

        ds.fail_on("select_profile_role");
        assert_eq!(repo.current_role().await, Role::User);
    }

    #[tokio::test]
    async fn signup_starts_a_session_with_the_default_role() {
        let ds = InMemoryDatasource::new();
        let repo = AuthRepositoryImpl::new(Arc::new(ds));
        let user = repo
            .signup(&SignupCredentials {
                email: "nuevo@example.com".into(),
                password: "pw".into(),
                full_name: Some("Nuevo".into()),
            })
            .await
            .unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Nuevo"));
        assert_eq!(repo.current_user().await.unwrap(), Some(user));
        assert_eq!(repo.current_role().await, Role::User);

        repo.logout().await.unwrap();
        assert_eq!(repo.current_user().await.unwrap(), None);
    }
}
