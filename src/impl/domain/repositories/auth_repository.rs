use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Credentials, Role, SignupCredentials, User};

#[async_trait]
pub(crate) trait AuthRepository: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<User, ServerError>;
    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, ServerError>;
    async fn logout(&self) -> Result<(), ServerError>;
    async fn current_user(&self) -> Result<Option<User>, ServerError>;
    /// Never fails: lookup problems are logged and yield `Role::User`.
    async fn current_role(&self) -> Role;
}
