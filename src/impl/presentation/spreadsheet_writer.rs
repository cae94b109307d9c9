use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::{
    entities::{DebtRollup, RouteSheet},
    errors::WriteError,
};

use super::utils::format_iso_date;

const ROUTE_SHEET_HEADERS: [&str; 7] = [
    "N°",
    "Cliente",
    "Entregado Mañana",
    "Entregado Tarde",
    "Pagado Mañana",
    "Pagado Tarde",
    "Deuda Total",
];
const DEBT_HEADERS: [&str; 3] = ["N°", "Cliente", "Deuda"];

/// CSV exports that open directly in a spreadsheet. Amounts are written as
/// plain numbers so they stay summable.
pub struct SpreadsheetWriter;

impl SpreadsheetWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn route_sheet_file_name(&self, sheet: &RouteSheet) -> String {
        format!("reporte_diario_{}.csv", format_iso_date(sheet.date))
    }

    pub fn debts_file_name(&self, date: NaiveDate) -> String {
        format!("deudas_{}.csv", format_iso_date(date))
    }

    pub fn route_sheet_csv(&self, sheet: &RouteSheet) -> Result<String, ServerError> {
        let file_name = self.route_sheet_file_name(sheet);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(ROUTE_SHEET_HEADERS)
            .map_err(|e| WriteError::with_debug(&file_name, &e))?;
        for row in &sheet.rows {
            writer
                .write_record([
                    row.order_index.map(|i| i.to_string()).unwrap_or_default(),
                    row.name.clone(),
                    number(row.totals.delivered_morning),
                    number(row.totals.delivered_afternoon),
                    number(row.totals.paid_morning),
                    number(row.totals.paid_afternoon),
                    number(row.current_debt),
                ])
                .map_err(|e| WriteError::with_debug(&file_name, &e))?;
        }
        finish(writer, &file_name)
    }

    pub fn debts_csv(&self, rollup: &DebtRollup, date: NaiveDate) -> Result<String, ServerError> {
        let file_name = self.debts_file_name(date);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(DEBT_HEADERS)
            .map_err(|e| WriteError::with_debug(&file_name, &e))?;
        for client in &rollup.clients {
            writer
                .write_record([
                    client.order_index.map(|i| i.to_string()).unwrap_or_default(),
                    client.name.clone(),
                    number(client.debt),
                ])
                .map_err(|e| WriteError::with_debug(&file_name, &e))?;
        }
        writer
            .write_record([
                String::new(),
                "Total por cobrar".to_string(),
                number(rollup.total_receivable),
            ])
            .map_err(|e| WriteError::with_debug(&file_name, &e))?;
        finish(writer, &file_name)
    }
}

fn number(amount: f64) -> String {
    format!("{amount:.2}")
}

fn finish(writer: csv::Writer<Vec<u8>>, file_name: &str) -> Result<String, ServerError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| WriteError::with_debug(file_name, e.error()))?;
    String::from_utf8(bytes).map_err(|e| WriteError::with_debug(file_name, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClientDebt, ClientId, RouteSheetRow, ShiftTotals};

    #[test]
    fn route_sheet_uses_spreadsheet_headers() {
        let sheet = RouteSheet {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rows: vec![RouteSheetRow {
                client_id: ClientId("a".into()),
                order_index: Some(3),
                name: "Rosa, la del puesto".into(),
                totals: ShiftTotals {
                    delivered_morning: 15.0,
                    ..Default::default()
                },
                current_debt: 15.0,
                items_morning: vec![],
                items_afternoon: vec![],
            }],
            total_delivered: 15.0,
            total_paid: 0.0,
        };
        let csv = SpreadsheetWriter::new().route_sheet_csv(&sheet).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("N°,Cliente,Entregado Mañana,Entregado Tarde,Pagado Mañana,Pagado Tarde,Deuda Total")
        );
        assert_eq!(
            lines.next(),
            Some("3,\"Rosa, la del puesto\",15.00,0.00,0.00,0.00,15.00")
        );
    }

    #[test]
    fn debts_end_with_total() {
        let rollup = DebtRollup {
            clients: vec![ClientDebt {
                client_id: ClientId("a".into()),
                name: "Rosa".into(),
                order_index: None,
                debt: 7.5,
            }],
            total_receivable: 7.5,
        };
        let writer = SpreadsheetWriter::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let csv = writer.debts_csv(&rollup, date).unwrap();
        assert!(csv.ends_with(",Total por cobrar,7.50\n"));
        assert_eq!(writer.debts_file_name(date), "deudas_2024-05-01.csv");
    }
}
