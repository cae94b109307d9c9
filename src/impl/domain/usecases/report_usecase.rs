use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tracing::{debug, info};

use crate::{
    config::RouteLedgerSettings,
    data::repositories::{
        auth_repository_impl::AuthRepositoryImpl, finance_repository_impl::FinanceRepositoryImpl,
    },
    domain::{
        logic::{
            deadline::within,
            report_aggregator::{debt_rollup, product_ranking, route_sheet},
        },
        repositories::finance_repository::FinanceRepository,
        usecases::auth_usecase::{AuthUsecase, AuthUsecaseImpl},
    },
    entities::{
        DashboardSnapshot, DateRange, DebtRollup, ProductSales, Role, RouteSheet, TransactionItem,
    },
    errors::AdminRequired,
};

/// Products shown on the dashboard.
pub(crate) const TOP_PRODUCTS: usize = 5;

#[async_trait]
pub(crate) trait ReportUsecase: Send + Sync {
    async fn route_sheet(&self, date: NaiveDate) -> Result<RouteSheet, ServerError>;
    async fn product_ranking(
        &self,
        range: DateRange,
        limit: Option<usize>,
    ) -> Result<Vec<ProductSales>, ServerError>;
    async fn debt_rollup(&self) -> Result<DebtRollup, ServerError>;
    /// Admin-only. The role check and the bulk load each run under their
    /// own time limit.
    async fn dashboard(&self, date: NaiveDate) -> Result<DashboardSnapshot, ServerError>;
}

pub(crate) struct ReportUsecaseImpl<R1 = FinanceRepositoryImpl, U1 = AuthUsecaseImpl<AuthRepositoryImpl>>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    finance_repository: R1,
    auth_usecase: Arc<U1>,
    settings: RouteLedgerSettings,
}

impl<R1, U1> ReportUsecaseImpl<R1, U1>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    pub(crate) fn new(
        finance_repository: R1,
        auth_usecase: Arc<U1>,
        settings: RouteLedgerSettings,
    ) -> Self {
        Self {
            finance_repository,
            auth_usecase,
            settings,
        }
    }
}

fn ranked(items: &[TransactionItem], limit: Option<usize>) -> Vec<ProductSales> {
    let mut ranking = product_ranking(items);
    if let Some(limit) = limit {
        ranking.truncate(limit);
    }
    ranking
}

#[async_trait]
impl<R1, U1> ReportUsecase for ReportUsecaseImpl<R1, U1>
where
    R1: FinanceRepository,
    U1: AuthUsecase,
{
    async fn route_sheet(&self, date: NaiveDate) -> Result<RouteSheet, ServerError> {
        let (clients, day, history) = futures::try_join!(
            self.finance_repository.clients(),
            self.finance_repository.transactions_on(date),
            self.finance_repository.all_transactions(),
        )?;
        debug!(%date, clients = clients.len(), day = day.len(), "route sheet inputs loaded");
        Ok(route_sheet(date, &clients, &day, &history))
    }

    async fn product_ranking(
        &self,
        range: DateRange,
        limit: Option<usize>,
    ) -> Result<Vec<ProductSales>, ServerError> {
        let items = self.finance_repository.items_in(range).await?;
        Ok(ranked(&items, limit))
    }

    async fn debt_rollup(&self) -> Result<DebtRollup, ServerError> {
        let (clients, history) = futures::try_join!(
            self.finance_repository.clients(),
            self.finance_repository.all_transactions(),
        )?;
        Ok(debt_rollup(&clients, &history))
    }

    async fn dashboard(&self, date: NaiveDate) -> Result<DashboardSnapshot, ServerError> {
        let role = within(
            self.settings.role_check_timeout,
            "verificación de administrador",
            async { Ok(self.auth_usecase.role().await) },
        )
        .await?;
        if role != Role::Admin {
            return Err(AdminRequired::new());
        }

        let (clients, day, history, items) = within(
            self.settings.load_timeout,
            "carga del panel",
            async {
                futures::try_join!(
                    self.finance_repository.clients(),
                    self.finance_repository.transactions_on(date),
                    self.finance_repository.all_transactions(),
                    self.finance_repository.items_in(DateRange::all()),
                )
            },
        )
        .await?;
        let debts = debt_rollup(&clients, &history);
        let route_sheet = route_sheet(date, &clients, &day, &history);
        let top_products = ranked(&items, Some(TOP_PRODUCTS));
        info!(%date, receivable = debts.total_receivable, "dashboard loaded");
        Ok(DashboardSnapshot {
            debts,
            route_sheet,
            top_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::datasources::{
            backend_datasource::BackendDatasource, memory_datasource::InMemoryDatasource,
        },
        entities::{ClientDraft, ItemDraft, NewTransaction, Shift, TransactionType},
    };

    async fn usecase(role: Role) -> (InMemoryDatasource, ReportUsecaseImpl) {
        let ds = InMemoryDatasource::new().with_user("ana@example.com", "secret", role);
        ds.sign_in("ana@example.com", "secret").await.unwrap();
        let backend: Arc<dyn BackendDatasource> = Arc::new(ds.clone());
        let usecase = ReportUsecaseImpl::new(
            FinanceRepositoryImpl::new(backend.clone()),
            Arc::new(AuthUsecaseImpl::new(AuthRepositoryImpl::new(backend))),
            RouteLedgerSettings::default(),
        );
        (ds, usecase)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn dashboard_loads_the_history_once() {
        let (ds, usecase) = usecase(Role::Admin).await;
        let rosa = usecase
            .finance_repository
            .create_client(ClientDraft::new("Rosa"))
            .await
            .unwrap();
        usecase
            .finance_repository
            .record_transaction(NewTransaction {
                client_id: rosa.id.clone(),
                kind: TransactionType::Delivery,
                shift: Some(Shift::Morning),
                amount: 1.0,
                description: None,
                date: date(),
                items: vec![ItemDraft {
                    product_name: "Pan".into(),
                    quantity: 5,
                    unit_price: 0.2,
                }],
            })
            .await
            .unwrap();

        let dashboard = usecase.dashboard(date()).await.unwrap();
        assert_eq!(dashboard.debts.total_receivable, 1.0);
        assert_eq!(dashboard.route_sheet.rows[0].current_debt, 1.0);
        assert_eq!(dashboard.top_products[0].quantity, 5);
        assert_eq!(ds.call_count("select_all_transactions"), 1);
        assert_eq!(ds.call_count("select_clients"), 1);
    }

    #[tokio::test]
    async fn dashboard_is_for_admins() {
        let (ds, usecase) = usecase(Role::User).await;
        assert!(usecase.dashboard(date()).await.is_err());
        assert_eq!(ds.call_count("select_all_transactions"), 0);
    }
}
