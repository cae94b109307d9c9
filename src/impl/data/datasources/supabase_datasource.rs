use std::{future::Future, sync::RwLock};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use fractic_server_error::ServerError;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::RouteLedgerConfig,
    data::models::{
        client_model::{ClientInsertModel, ClientModel, ClientPatchModel, ClientSeedModel},
        product_model::{ProductInsertModel, ProductModel, ProductPatchModel},
        transaction_model::{
            TransactionInsertModel, TransactionItemInsertModel, TransactionItemModel,
            TransactionModel, TransactionPatchModel,
        },
        user_model::{
            AccessClaimsModel, PasswordGrantModel, ProfileModel, SessionModel,
            SignupRequestModel, SignupResponseModel, UserMetadataModel, UserModel,
        },
    },
    errors::{AuthenticationFailed, BackendRejected, BackendRequestFailed, InvalidBackendResponse},
};

use super::backend_datasource::BackendDatasource;

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";
const IGNORE_DUPLICATES: &str = "resolution=ignore-duplicates,return=minimal";
const CLIENT_ORDER: &str = "order_index.asc.nullslast,name.asc";
const TRANSACTION_ORDER: &str = "created_at.asc,id.asc";
const ITEM_ORDER: &str = "created_at.asc,transaction_id.asc,product_name.asc";
const WITH_ITEMS: &str = "*,items:transaction_items(*)";
const ITEM_COLUMNS: &str = "transaction_id,product_name,quantity,unit_price,total_price,created_at";
/// Rows requested per page. The server may cap pages lower (max-rows).
const PAGE_SIZE: usize = 1000;
/// Offset appended to day bounds so ranges follow Peru's calendar.
const PERU_UTC_OFFSET: &str = "-05:00";

#[derive(Debug, Clone)]
struct AuthSession {
    access_token: String,
    user: UserModel,
}

/// Hosted Postgres behind PostgREST plus its identity service.
pub struct SupabaseDatasource {
    http: HttpClient,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<AuthSession>>,
}

impl SupabaseDatasource {
    pub fn new(config: &RouteLedgerConfig) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            session: RwLock::new(None),
        }
    }

    /// Resumes a session from a previously issued access token.
    pub fn restore_session(&self, access_token: &str) -> Result<(), ServerError> {
        let user: UserModel = AccessClaimsModel::from_token(access_token)?.into();
        debug!(user_id = %user.id, "session restored");
        self.store_session(Some(AuthSession {
            access_token: access_token.to_string(),
            user,
        }));
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_session().map(|s| s.access_token)
    }

    fn read_session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store_session(&self, session: Option<AuthSession>) {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn clients_request(&self) -> RequestBuilder {
        self.http
            .get(self.rest_url("clients"))
            .query(&[("select", "*"), ("order", CLIENT_ORDER)])
    }

    fn upsert_request<T>(&self, table: &str, prefer: &str, rows: &T) -> RequestBuilder
    where
        T: Serialize + ?Sized,
    {
        self.http
            .post(self.rest_url(table))
            .query(&[("on_conflict", "name")])
            .header("Prefer", prefer)
            .json(rows)
    }

    fn day_request(&self, date: NaiveDate) -> RequestBuilder {
        self.http.get(self.rest_url("transactions")).query(&[
            ("select", WITH_ITEMS.to_string()),
            ("date", eq(&date.format("%Y-%m-%d").to_string())),
            ("order", "created_at.desc".to_string()),
        ])
    }

    fn history_page(&self, client_id: Option<&str>, offset: usize) -> RequestBuilder {
        let mut query = vec![("select", "*".to_string())];
        if let Some(client_id) = client_id {
            query.push(("client_id", eq(client_id)));
        }
        query.push(("order", TRANSACTION_ORDER.to_string()));
        page(self.http.get(self.rest_url("transactions")).query(&query), offset)
    }

    /// Items created within `[start, end]` on Peru's calendar; the end day
    /// is included by bounding on the next midnight.
    fn items_page(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        offset: usize,
    ) -> RequestBuilder {
        let mut query = vec![("select", ITEM_COLUMNS.to_string())];
        if let Some(start) = start {
            query.push(("created_at", format!("gte.{start}T00:00:00{PERU_UTC_OFFSET}")));
        }
        if let Some(next_day) = end.and_then(|e| e.checked_add_days(Days::new(1))) {
            query.push(("created_at", format!("lt.{next_day}T00:00:00{PERU_UTC_OFFSET}")));
        }
        query.push(("order", ITEM_ORDER.to_string()));
        page(self.http.get(self.rest_url("transaction_items")).query(&query), offset)
    }

    async fn dispatch(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ServerError> {
        debug!(operation, "backend request");
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| BackendRequestFailed::with_debug(operation, &e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), %body, "backend rejected request");
        Err(BackendRejected::with_debug(operation, status.as_u16(), &body))
    }

    async fn fetch<T>(&self, operation: &str, builder: RequestBuilder) -> Result<T, ServerError>
    where
        T: DeserializeOwned,
    {
        self.dispatch(operation, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug(operation, &e))
    }

    async fn execute(&self, operation: &str, builder: RequestBuilder) -> Result<(), ServerError> {
        self.dispatch(operation, builder).await.map(|_| ())
    }

    /// Writes answer with an array even for a single row.
    async fn fetch_one<T>(&self, operation: &str, builder: RequestBuilder) -> Result<T, ServerError>
    where
        T: DeserializeOwned,
    {
        self.fetch::<Vec<T>>(operation, builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| InvalidBackendResponse::new(operation))
    }

    async fn auth_call<T>(
        &self,
        operation: &str,
        builder: RequestBuilder,
    ) -> Result<T, ServerError>
    where
        T: DeserializeOwned,
    {
        debug!(operation, "identity request");
        let response = builder
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| BackendRequestFailed::with_debug(operation, &e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthenticationFailed::with_debug(
                &auth_error_message(&body),
                &body,
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug(operation, &e))
    }
}

/// Identity errors carry their reason under varying keys.
fn auth_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| "credenciales inválidas".to_string())
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn page(builder: RequestBuilder, offset: usize) -> RequestBuilder {
    builder.query(&[("limit", PAGE_SIZE), ("offset", offset)])
}

/// Reads pages until one comes back empty. A short page is not the end: the
/// server may cap pages below `PAGE_SIZE`.
async fn collect_pages<T, F, Fut>(
    operation: &str,
    mut fetch_page: F,
) -> Result<Vec<T>, ServerError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ServerError>>,
{
    let mut rows = Vec::new();
    loop {
        let page = fetch_page(rows.len()).await?;
        if page.is_empty() {
            debug!(operation, rows = rows.len(), "paged read complete");
            return Ok(rows);
        }
        rows.extend(page);
    }
}

#[async_trait]
impl BackendDatasource for SupabaseDatasource {
    async fn select_clients(&self) -> Result<Vec<ClientModel>, ServerError> {
        self.fetch("select_clients", self.clients_request()).await
    }

    async fn find_client(&self, id: &str) -> Result<Option<ClientModel>, ServerError> {
        let rows: Vec<ClientModel> = self
            .fetch(
                "find_client",
                self.http
                    .get(self.rest_url("clients"))
                    .query(&[("select", "*".to_string()), ("id", eq(id))]),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientModel>, ServerError> {
        let rows: Vec<ClientModel> = self
            .fetch(
                "find_client_by_name",
                self.http
                    .get(self.rest_url("clients"))
                    .query(&[("select", "*".to_string()), ("name", eq(name))]),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_client(&self, client: ClientInsertModel) -> Result<ClientModel, ServerError> {
        self.fetch_one(
            "insert_client",
            self.http
                .post(self.rest_url("clients"))
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&client),
        )
        .await
    }

    async fn update_client(
        &self,
        id: &str,
        patch: ClientPatchModel,
    ) -> Result<ClientModel, ServerError> {
        self.fetch_one(
            "update_client",
            self.http
                .patch(self.rest_url("clients"))
                .query(&[("id", eq(id))])
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&patch),
        )
        .await
    }

    async fn delete_client(&self, id: &str) -> Result<(), ServerError> {
        self.execute(
            "delete_client",
            self.http
                .delete(self.rest_url("clients"))
                .query(&[("id", eq(id))]),
        )
        .await
    }

    async fn upsert_clients(&self, clients: Vec<ClientSeedModel>) -> Result<(), ServerError> {
        if clients.is_empty() {
            return Ok(());
        }
        info!(count = clients.len(), "upserting clients");
        self.execute(
            "upsert_clients",
            self.upsert_request("clients", MERGE_DUPLICATES, &clients),
        )
        .await
    }

    async fn select_products(&self) -> Result<Vec<ProductModel>, ServerError> {
        self.fetch(
            "select_products",
            self.http
                .get(self.rest_url("products"))
                .query(&[("select", "*"), ("order", "name.asc")]),
        )
        .await
    }

    async fn insert_product(
        &self,
        product: ProductInsertModel,
    ) -> Result<ProductModel, ServerError> {
        self.fetch_one(
            "insert_product",
            self.http
                .post(self.rest_url("products"))
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&product),
        )
        .await
    }

    async fn update_product(
        &self,
        id: &str,
        patch: ProductPatchModel,
    ) -> Result<ProductModel, ServerError> {
        self.fetch_one(
            "update_product",
            self.http
                .patch(self.rest_url("products"))
                .query(&[("id", eq(id))])
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&patch),
        )
        .await
    }

    async fn delete_product(&self, id: &str) -> Result<(), ServerError> {
        self.execute(
            "delete_product",
            self.http
                .delete(self.rest_url("products"))
                .query(&[("id", eq(id))]),
        )
        .await
    }

    async fn upsert_products(&self, products: Vec<ProductInsertModel>) -> Result<(), ServerError> {
        if products.is_empty() {
            return Ok(());
        }
        info!(count = products.len(), "upserting products");
        self.execute(
            "upsert_products",
            self.upsert_request("products", IGNORE_DUPLICATES, &products),
        )
        .await
    }

    async fn insert_transaction(
        &self,
        transaction: TransactionInsertModel,
    ) -> Result<TransactionModel, ServerError> {
        self.fetch_one(
            "insert_transaction",
            self.http
                .post(self.rest_url("transactions"))
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&transaction),
        )
        .await
    }

    async fn insert_transaction_items(
        &self,
        items: Vec<TransactionItemInsertModel>,
    ) -> Result<Vec<TransactionItemModel>, ServerError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(
            "insert_transaction_items",
            self.http
                .post(self.rest_url("transaction_items"))
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&items),
        )
        .await
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: TransactionPatchModel,
    ) -> Result<TransactionModel, ServerError> {
        self.fetch_one(
            "update_transaction",
            self.http
                .patch(self.rest_url("transactions"))
                .query(&[("id", eq(id)), ("select", WITH_ITEMS.to_string())])
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&patch),
        )
        .await
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), ServerError> {
        self.execute(
            "delete_transaction_items",
            self.http
                .delete(self.rest_url("transaction_items"))
                .query(&[("transaction_id", eq(id))]),
        )
        .await?;
        self.execute(
            "delete_transaction",
            self.http
                .delete(self.rest_url("transactions"))
                .query(&[("id", eq(id))]),
        )
        .await
    }

    async fn delete_transactions_by_client(&self, client_id: &str) -> Result<(), ServerError> {
        self.execute(
            "delete_transactions_by_client",
            self.http
                .delete(self.rest_url("transactions"))
                .query(&[("client_id", eq(client_id))]),
        )
        .await
    }

    async fn select_transactions_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<TransactionModel>, ServerError> {
        self.fetch("select_transactions_by_date", self.day_request(date)).await
    }

    async fn select_transactions_by_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<TransactionModel>, ServerError> {
        collect_pages("select_transactions_by_client", move |offset| {
            self.fetch::<Vec<TransactionModel>>(
                "select_transactions_by_client",
                self.history_page(Some(client_id), offset),
            )
        })
        .await
    }

    async fn select_all_transactions(&self) -> Result<Vec<TransactionModel>, ServerError> {
        collect_pages("select_all_transactions", move |offset| {
            self.fetch::<Vec<TransactionModel>>(
                "select_all_transactions",
                self.history_page(None, offset),
            )
        })
        .await
    }

    async fn select_transaction_items(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TransactionItemModel>, ServerError> {
        collect_pages("select_transaction_items", move |offset| {
            self.fetch::<Vec<TransactionItemModel>>(
                "select_transaction_items",
                self.items_page(start, end, offset),
            )
        })
        .await
    }

    async fn current_user(&self) -> Result<Option<UserModel>, ServerError> {
        let Some(session) = self.read_session() else {
            return Ok(None);
        };
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| BackendRequestFailed::with_debug("current_user", &e))?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                info!(user_id = %session.user.id, "session expired");
                self.store_session(None);
                Ok(None)
            }
            status if status.is_success() => response
                .json::<UserModel>()
                .await
                .map(Some)
                .map_err(|e| InvalidBackendResponse::with_debug("current_user", &e)),
            status => Err(BackendRejected::new("current_user", status.as_u16())),
        }
    }

    async fn select_profile_role(&self, user_id: &str) -> Result<Option<String>, ServerError> {
        let rows: Vec<ProfileModel> = self
            .fetch(
                "select_profile_role",
                self.http
                    .get(self.rest_url("profiles"))
                    .query(&[("select", "role".to_string()), ("id", eq(user_id))]),
            )
            .await?;
        Ok(rows.into_iter().next().and_then(|p| p.role))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserModel, ServerError> {
        let session: SessionModel = self
            .auth_call(
                "sign_in",
                self.http
                    .post(self.auth_url("token"))
                    .query(&[("grant_type", "password")])
                    .json(&PasswordGrantModel { email, password }),
            )
            .await?;
        info!(user_id = %session.user.id, "signed in");
        self.store_session(Some(AuthSession {
            access_token: session.access_token,
            user: session.user.clone(),
        }));
        Ok(session.user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserModel, ServerError> {
        let response: SignupResponseModel = self
            .auth_call(
                "sign_up",
                self.http.post(self.auth_url("signup")).json(&SignupRequestModel {
                    email,
                    password,
                    data: UserMetadataModel {
                        full_name: full_name.map(str::to_string),
                    },
                }),
            )
            .await?;
        match response {
            SignupResponseModel::Session(session) => {
                info!(user_id = %session.user.id, "signed up with active session");
                self.store_session(Some(AuthSession {
                    access_token: session.access_token,
                    user: session.user.clone(),
                }));
                Ok(session.user)
            }
            SignupResponseModel::User(user) => {
                info!(user_id = %user.id, "signed up, confirmation pending");
                Ok(user)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), ServerError> {
        let Some(session) = self.read_session() else {
            return Ok(());
        };
        self.store_session(None);
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| BackendRequestFailed::with_debug("sign_out", &e))?;
        if !response.status().is_success() {
            // The local session is gone either way.
            warn!(status = response.status().as_u16(), "remote logout failed");
        }
        info!(user_id = %session.user.id, "signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Request;

    use super::*;

    fn datasource() -> SupabaseDatasource {
        SupabaseDatasource::new(&RouteLedgerConfig::new("https://x.supabase.co/", "anon"))
    }

    fn built(ds: &SupabaseDatasource, builder: RequestBuilder) -> Request {
        ds.authorize(builder).build().unwrap()
    }

    fn query(request: &Request) -> Vec<(String, String)> {
        request.url().query_pairs().into_owned().collect()
    }

    fn param(request: &Request, key: &str) -> Vec<String> {
        query(request)
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }

    fn header<'a>(request: &'a Request, name: &str) -> &'a str {
        request.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn clients_come_in_route_order_with_anon_headers() {
        let ds = datasource();
        let request = built(&ds, ds.clients_request());
        assert_eq!(request.url().path(), "/rest/v1/clients");
        assert_eq!(param(&request, "order"), vec!["order_index.asc.nullslast,name.asc"]);
        assert_eq!(header(&request, "apikey"), "anon");
        assert_eq!(header(&request, "authorization"), "Bearer anon");
    }

    #[test]
    fn signed_in_requests_carry_the_session_token() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let ds = datasource();
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(r#"{"sub":"u-1"}"#));
        ds.restore_session(&token).unwrap();
        let request = built(&ds, ds.clients_request());
        assert_eq!(header(&request, "apikey"), "anon");
        assert_eq!(header(&request, "authorization"), format!("Bearer {token}"));
    }

    #[test]
    fn upserts_resolve_on_name() {
        let ds = datasource();
        let rows = vec![serde_json::json!({ "name": "Doña Rosa" })];

        let clients = built(&ds, ds.upsert_request("clients", MERGE_DUPLICATES, &rows));
        assert_eq!(clients.method(), reqwest::Method::POST);
        assert_eq!(param(&clients, "on_conflict"), vec!["name"]);
        assert!(header(&clients, "prefer").starts_with("resolution=merge-duplicates"));
        let body = clients.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, serde_json::to_vec(&rows).unwrap().as_slice());

        let products = built(&ds, ds.upsert_request("products", IGNORE_DUPLICATES, &rows));
        assert_eq!(products.url().path(), "/rest/v1/products");
        assert!(header(&products, "prefer").starts_with("resolution=ignore-duplicates"));
    }

    #[test]
    fn day_listing_embeds_items_newest_first() {
        let ds = datasource();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let request = built(&ds, ds.day_request(date));
        assert_eq!(param(&request, "select"), vec!["*,items:transaction_items(*)"]);
        assert_eq!(param(&request, "date"), vec!["eq.2024-05-01"]);
        assert_eq!(param(&request, "order"), vec!["created_at.desc"]);
    }

    #[test]
    fn item_ranges_follow_peru_days_and_page() {
        let ds = datasource();
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let request = built(&ds, ds.items_page(Some(start), Some(end), 1000));
        assert_eq!(request.url().path(), "/rest/v1/transaction_items");
        assert_eq!(
            param(&request, "created_at"),
            vec!["gte.2024-05-01T00:00:00-05:00", "lt.2024-05-03T00:00:00-05:00"]
        );
        assert_eq!(param(&request, "limit"), vec!["1000"]);
        assert_eq!(param(&request, "offset"), vec!["1000"]);

        let open = built(&ds, ds.items_page(None, None, 0));
        assert!(param(&open, "created_at").is_empty());
        assert_eq!(param(&open, "offset"), vec!["0"]);
    }

    #[test]
    fn history_pages_have_a_stable_order() {
        let ds = datasource();
        let all = built(&ds, ds.history_page(None, 2000));
        assert_eq!(param(&all, "order"), vec!["created_at.asc,id.asc"]);
        assert_eq!(param(&all, "offset"), vec!["2000"]);
        assert!(param(&all, "client_id").is_empty());

        let one = built(&ds, ds.history_page(Some("c-1"), 0));
        assert_eq!(param(&one, "client_id"), vec!["eq.c-1"]);
    }

    /// Serves `total` rows, never more than `cap` per page.
    async fn paged(total: usize, cap: usize) -> (Vec<usize>, usize) {
        let mut requests = 0;
        let rows = collect_pages("test", |offset| {
            requests += 1;
            let end = total.min(offset + cap.min(PAGE_SIZE));
            async move { Ok::<_, ServerError>((offset..end).collect::<Vec<usize>>()) }
        })
        .await
        .unwrap();
        (rows, requests)
    }

    #[tokio::test]
    async fn paging_reads_past_the_server_row_cap() {
        let (rows, requests) = paged(2500, 1000).await;
        assert_eq!(rows.len(), 2500);
        assert_eq!(rows.last(), Some(&2499));
        assert_eq!(requests, 4);

        let (rows, _) = paged(1001, 600).await;
        assert_eq!(rows, (0..1001).collect::<Vec<_>>());

        let (rows, requests) = paged(0, 1000).await;
        assert!(rows.is_empty());
        assert_eq!(requests, 1);
    }

    #[tokio::test]
    async fn paging_stops_on_the_first_error() {
        let result: Result<Vec<usize>, ServerError> = collect_pages("test", |offset| async move {
            if offset == 0 {
                Ok(vec![1, 2])
            } else {
                Err(BackendRequestFailed::new("test"))
            }
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn auth_errors_surface_the_backend_reason() {
        assert_eq!(
            auth_error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(auth_error_message("<html>"), "credenciales inválidas");
    }

    #[test]
    fn restored_sessions_authorize_requests() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let ds = datasource();
        assert_eq!(ds.access_token(), None);
        assert_eq!(ds.rest_url("clients"), "https://x.supabase.co/rest/v1/clients");

        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(r#"{"sub":"u-1"}"#));
        ds.restore_session(&token).unwrap();
        assert_eq!(ds.access_token(), Some(token));
    }
}
