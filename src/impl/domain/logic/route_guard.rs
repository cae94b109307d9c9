use crate::entities::RouteDecision;

const PROTECTED_PREFIXES: &[&str] = &["/finance", "/admin"];
const AUTH_PATHS: &[&str] = &["/login", "/signup"];

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/finance";

/// Where a request for `path` should go given whether a session exists.
pub fn route_decision(path: &str, authenticated: bool) -> RouteDecision {
    if !authenticated && PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteDecision::Redirect(LOGIN_PATH);
    }
    if authenticated && AUTH_PATHS.contains(&path) {
        return RouteDecision::Redirect(LANDING_PATH);
    }
    RouteDecision::Allow
}
