use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use fractic_server_error::ServerError;
use serde_derive::{Deserialize, Serialize};

use crate::{entities::User, errors::AuthenticationFailed};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UserMetadataModel {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Auth user as returned by the identity endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserModel {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadataModel,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionModel {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserModel,
}

/// Signup answers with a session when email confirmation is disabled and
/// with the bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignupResponseModel {
    Session(SessionModel),
    User(UserModel),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileModel {
    #[serde(default)]
    pub role: Option<String>,
}

/// Claims carried in the access token payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccessClaimsModel {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadataModel,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordGrantModel<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignupRequestModel<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: UserMetadataModel,
}

// --

impl From<UserModel> for User {
    fn from(m: UserModel) -> Self {
        User {
            id: m.id,
            email: m.email,
            full_name: m.user_metadata.full_name,
        }
    }
}

impl From<AccessClaimsModel> for UserModel {
    fn from(c: AccessClaimsModel) -> Self {
        UserModel {
            id: c.sub,
            email: c.email,
            user_metadata: c.user_metadata,
        }
    }
}

impl AccessClaimsModel {
    /// Reads the payload segment of a JWT. The signature is not verified;
    /// the backend does that on every request.
    pub(crate) fn from_token(token: &str) -> Result<Self, ServerError> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| AuthenticationFailed::new("token mal formado"))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthenticationFailed::with_debug("token mal formado", &e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AuthenticationFailed::with_debug("token mal formado", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_claims_from_access_token() {
        let payload = URL_SAFE_NO_PAD.encode(
            r#"{"sub":"u-1","email":"ana@example.com","user_metadata":{"full_name":"Ana"}}"#,
        );
        let token = format!("header.{payload}.signature");
        let user: User = UserModel::from(AccessClaimsModel::from_token(&token).unwrap()).into();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.full_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn rejects_tokens_without_payload() {
        assert!(AccessClaimsModel::from_token("garbage").is_err());
    }

    #[test]
    fn signup_accepts_bare_user() {
        let raw = r#"{"id":"u-2","email":"b@example.com","user_metadata":{}}"#;
        assert!(matches!(
            serde_json::from_str::<SignupResponseModel>(raw).unwrap(),
            SignupResponseModel::User(_)
        ));
    }
}
