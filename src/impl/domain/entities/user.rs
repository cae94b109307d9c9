#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Outcome of checking a navigation path against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

impl Role {
    /// Unknown or missing roles map to the least-privileged one.
    pub fn from_db(raw: Option<&str>) -> Self {
        match raw {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}
