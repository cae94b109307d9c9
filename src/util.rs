use std::{
    path::{Path, PathBuf},
    str::FromStr as _,
    sync::Arc,
};

use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tracing::info;

use crate::{
    config::{RouteLedgerConfig, RouteLedgerSettings},
    data::{
        datasources::{
            backend_datasource::BackendDatasource,
            memory_datasource::InMemoryDatasource,
            seed_csv_datasource::{SeedCsvDatasource as _, SeedCsvDatasourceImpl},
            supabase_datasource::SupabaseDatasource,
        },
        models::{amount_model::AmountModel, iso_date_model::ISODateModel},
        repositories::{
            auth_repository_impl::AuthRepositoryImpl,
            finance_repository_impl::FinanceRepositoryImpl,
        },
    },
    domain::{
        logic::{calendar::peru_today, voice_parser::VoiceCommandParser, voice_session::VoiceSession},
        usecases::{
            auth_usecase::{AuthUsecase as _, AuthUsecaseImpl},
            catalog_usecase::{CatalogUsecase as _, CatalogUsecaseImpl},
            intake_usecase::{IntakeUsecase as _, IntakeUsecaseImpl},
            report_usecase::{ReportUsecase as _, ReportUsecaseImpl},
        },
    },
    entities::{
        Client, ClientDraft, ClientId, ClientUpdate, Credentials, DailyLedger, DashboardSnapshot,
        DateRange, DebtRollup, IntakeForm, IntakeOutcome, Product, ProductDraft, ProductId,
        ProductSales, ProductUpdate, ReportFile, Role, RouteDecision, RouteSheet, SeedClient,
        SignupCredentials, SpeechRecognizer, Transaction, TransactionId, TransactionUpdate, User,
        VoiceCommand,
    },
    errors::WriteError,
    ext::standard_scorers::TokenEditDistance,
    presentation::{route_sheet_printer::RouteSheetPrinter, spreadsheet_writer::SpreadsheetWriter},
};

/// Entry point for an operator session: sign-in, catalog upkeep, the intake
/// screen, voice input and the admin reports.
pub struct RouteLedgerUtil {
    auth_usecase: Arc<AuthUsecaseImpl>,
    catalog_usecase: CatalogUsecaseImpl,
    intake_usecase: IntakeUsecaseImpl,
    report_usecase: ReportUsecaseImpl,
    seed_datasource: SeedCsvDatasourceImpl,
    printer: RouteSheetPrinter,
    spreadsheet_writer: SpreadsheetWriter,
    settings: RouteLedgerSettings,
}

impl RouteLedgerUtil {
    /// Talks to the hosted backend described by `config`.
    pub fn connect(config: &RouteLedgerConfig) -> Self {
        Self::with_supabase(
            Arc::new(SupabaseDatasource::new(config)),
            config.settings.clone(),
        )
    }

    /// Keep a clone of `datasource` to restore sessions on it later.
    pub fn with_supabase(datasource: Arc<SupabaseDatasource>, settings: RouteLedgerSettings) -> Self {
        Self::from_backend(datasource, settings)
    }

    pub fn in_memory(datasource: InMemoryDatasource, settings: RouteLedgerSettings) -> Self {
        Self::from_backend(Arc::new(datasource), settings)
    }

    fn from_backend(backend: Arc<dyn BackendDatasource>, settings: RouteLedgerSettings) -> Self {
        let auth_usecase = Arc::new(AuthUsecaseImpl::new(AuthRepositoryImpl::new(
            backend.clone(),
        )));
        Self {
            catalog_usecase: CatalogUsecaseImpl::new(
                FinanceRepositoryImpl::new(backend.clone()),
                auth_usecase.clone(),
            ),
            intake_usecase: IntakeUsecaseImpl::new(FinanceRepositoryImpl::new(backend.clone())),
            report_usecase: ReportUsecaseImpl::new(
                FinanceRepositoryImpl::new(backend),
                auth_usecase.clone(),
                settings.clone(),
            ),
            auth_usecase,
            seed_datasource: SeedCsvDatasourceImpl::new(),
            printer: RouteSheetPrinter::new(),
            spreadsheet_writer: SpreadsheetWriter::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &RouteLedgerSettings {
        &self.settings
    }

    /// Today's date on the route.
    pub fn today(&self) -> NaiveDate {
        peru_today()
    }

    // Access.
    // ---

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ServerError> {
        self.auth_usecase.login(credentials).await
    }

    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<User, ServerError> {
        self.auth_usecase.signup(credentials).await
    }

    pub async fn logout(&self) -> Result<(), ServerError> {
        self.auth_usecase.logout().await
    }

    pub async fn current_user(&self) -> Result<Option<User>, ServerError> {
        self.auth_usecase.current_user().await
    }

    pub async fn role(&self) -> Role {
        self.auth_usecase.role().await
    }

    pub async fn navigate(&self, path: &str) -> Result<RouteDecision, ServerError> {
        self.auth_usecase.navigate(path).await
    }

    // Catalog.
    // ---

    pub async fn clients(&self) -> Result<Vec<Client>, ServerError> {
        self.catalog_usecase.clients().await
    }

    pub async fn products(&self) -> Result<Vec<Product>, ServerError> {
        self.catalog_usecase.products().await
    }

    pub async fn create_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        self.catalog_usecase.create_client(draft).await
    }

    pub async fn update_client(
        &self,
        id: &ClientId,
        update: ClientUpdate,
    ) -> Result<Client, ServerError> {
        self.catalog_usecase.update_client(id, update).await
    }

    /// Also deletes every transaction of the client.
    pub async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        self.catalog_usecase.delete_client(id).await
    }

    pub async fn set_initial_balance(
        &self,
        id: &ClientId,
        amount: f64,
    ) -> Result<Client, ServerError> {
        self.catalog_usecase.set_initial_balance(id, amount).await
    }

    pub async fn client_balance(&self, id: &ClientId) -> Result<f64, ServerError> {
        self.catalog_usecase.client_balance(id).await
    }

    pub async fn seed_clients(&self, roster: Vec<SeedClient>) -> Result<(), ServerError> {
        self.catalog_usecase.seed_clients(roster).await
    }

    pub async fn seed_clients_from_csv(&self, csv: &str) -> Result<(), ServerError> {
        let roster = self.seed_datasource.clients_from_string(csv)?;
        self.seed_clients(roster).await
    }

    pub async fn seed_clients_from_file<P>(&self, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path>,
    {
        let roster = self.seed_datasource.clients_from_file(path)?;
        self.seed_clients(roster).await
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServerError> {
        self.catalog_usecase.create_product(draft).await
    }

    pub async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ServerError> {
        self.catalog_usecase.update_product(id, update).await
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ServerError> {
        self.catalog_usecase.delete_product(id).await
    }

    pub async fn seed_products(&self, catalog: Vec<ProductDraft>) -> Result<(), ServerError> {
        self.catalog_usecase.seed_products(catalog).await
    }

    pub async fn seed_products_from_csv(&self, csv: &str) -> Result<(), ServerError> {
        let catalog = self.seed_datasource.products_from_string(csv)?;
        self.seed_products(catalog).await
    }

    pub async fn seed_products_from_file<P>(&self, path: P) -> Result<(), ServerError>
    where
        P: AsRef<Path>,
    {
        let catalog = self.seed_datasource.products_from_file(path)?;
        self.seed_products(catalog).await
    }

    // Intake.
    // ---

    pub async fn load_day(&self, date: NaiveDate) -> Result<DailyLedger, ServerError> {
        self.intake_usecase.load_day(date).await
    }

    /// Stores the form's delivery and payment for `ledger.date`. See
    /// [`IntakeOutcome`] for how partial failures are reported.
    pub async fn submit(
        &self,
        form: &mut IntakeForm,
        ledger: &mut DailyLedger,
        catalog: &[Product],
    ) -> Result<IntakeOutcome, ServerError> {
        self.intake_usecase.submit(form, ledger, catalog).await
    }

    pub async fn edit_transaction(
        &self,
        ledger: &mut DailyLedger,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, ServerError> {
        self.intake_usecase.edit(ledger, id, update).await
    }

    pub async fn delete_transaction(
        &self,
        ledger: &mut DailyLedger,
        id: &TransactionId,
    ) -> Result<(), ServerError> {
        self.intake_usecase.delete(ledger, id).await
    }

    // Voice.
    // ---

    pub fn voice_parser(&self) -> VoiceCommandParser {
        VoiceCommandParser::with_scorer(TokenEditDistance, self.settings.client_match_threshold)
    }

    pub fn parse_voice_command(
        &self,
        transcript: &str,
        clients: &[Client],
        products: &[Product],
    ) -> VoiceCommand {
        self.voice_parser().parse(transcript, clients, products)
    }

    pub fn voice_session<R>(&self, recognizer: R) -> VoiceSession<R, TokenEditDistance>
    where
        R: SpeechRecognizer,
    {
        VoiceSession::new(recognizer, self.voice_parser())
    }

    // Reports.
    // ---

    pub async fn route_sheet(&self, date: NaiveDate) -> Result<RouteSheet, ServerError> {
        self.report_usecase.route_sheet(date).await
    }

    pub async fn product_ranking(
        &self,
        range: DateRange,
        limit: Option<usize>,
    ) -> Result<Vec<ProductSales>, ServerError> {
        self.report_usecase.product_ranking(range, limit).await
    }

    pub async fn debt_rollup(&self) -> Result<DebtRollup, ServerError> {
        self.report_usecase.debt_rollup().await
    }

    pub async fn dashboard(&self, date: NaiveDate) -> Result<DashboardSnapshot, ServerError> {
        self.report_usecase.dashboard(date).await
    }

    /// Printable table and spreadsheet of the day's route.
    pub async fn export_route_sheet(&self, date: NaiveDate) -> Result<Vec<ReportFile>, ServerError> {
        let sheet = self.route_sheet(date).await?;
        Ok(vec![
            ReportFile {
                file_name: self.printer.file_name(&sheet),
                contents: self.printer.print(&sheet),
            },
            ReportFile {
                file_name: self.spreadsheet_writer.route_sheet_file_name(&sheet),
                contents: self.spreadsheet_writer.route_sheet_csv(&sheet)?,
            },
        ])
    }

    pub async fn export_debts(&self, date: NaiveDate) -> Result<ReportFile, ServerError> {
        let rollup = self.debt_rollup().await?;
        Ok(ReportFile {
            file_name: self.spreadsheet_writer.debts_file_name(date),
            contents: self.spreadsheet_writer.debts_csv(&rollup, date)?,
        })
    }

    /// Writes `report` into `dir` and returns the file's path.
    pub async fn write_report<P>(&self, dir: P, report: &ReportFile) -> Result<PathBuf, ServerError>
    where
        P: AsRef<Path>,
    {
        let path = dir.as_ref().join(&report.file_name);
        let path_display = path.display().to_string();
        tokio::fs::create_dir_all(dir.as_ref())
            .await
            .map_err(|e| WriteError::with_debug(&path_display, &e))?;
        tokio::fs::write(&path, report.contents.as_bytes())
            .await
            .map_err(|e| WriteError::with_debug(&path_display, &e))?;
        info!(path = %path_display, "report written");
        Ok(path)
    }

    // Input helpers.
    // ---

    /// Accepts "12.50", "1,200" or "S/ 12".
    pub fn parse_amount(&self, raw: &str) -> Result<f64, ServerError> {
        Ok(AmountModel::from_str(raw)?.into())
    }

    /// YYYY-MM-DD.
    pub fn parse_date(&self, raw: &str) -> Result<NaiveDate, ServerError> {
        Ok(ISODateModel::from_str(raw)?.into())
    }
}
