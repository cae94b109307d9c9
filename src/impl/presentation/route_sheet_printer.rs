use crate::entities::{RouteSheet, RouteSheetRow};

use super::utils::{format_amount, format_cell_amount, format_iso_date};

const HEADERS: [&str; 7] = [
    "N°",
    "Cliente",
    "Entregado (M)",
    "Entregado (T)",
    "Pagado (M)",
    "Pagado (T)",
    "Deuda Total",
];
const NAME_WIDTH: usize = 24;

/// Printable daily collection report.
pub struct RouteSheetPrinter;

impl RouteSheetPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn title(&self, sheet: &RouteSheet) -> String {
        format!("Reporte Diario de Cobranzas - {}", format_iso_date(sheet.date))
    }

    pub fn file_name(&self, sheet: &RouteSheet) -> String {
        format!("reporte_diario_{}.txt", format_iso_date(sheet.date))
    }

    /// Fixed-width table. Long client names wrap onto continuation lines.
    pub fn print(&self, sheet: &RouteSheet) -> String {
        let rows: Vec<Vec<Vec<String>>> = sheet.rows.iter().map(|r| self.cells(r)).collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                let longest = cell.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                widths[i] = widths[i].max(longest);
            }
        }

        let rule = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        let mut out = String::new();
        out.push_str(&self.title(sheet));
        out.push_str("\n\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&line(
            &HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
            &widths,
        ));
        out.push_str(&rule);
        out.push('\n');
        for row in &rows {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for n in 0..height {
                let cells: Vec<String> = row
                    .iter()
                    .map(|c| c.get(n).cloned().unwrap_or_default())
                    .collect();
                out.push_str(&line(&cells, &widths));
            }
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "Total entregado: {}\nTotal cobrado: {}\n",
            format_amount(sheet.total_delivered),
            format_amount(sheet.total_paid)
        ));
        out
    }

    fn cells(&self, row: &RouteSheetRow) -> Vec<Vec<String>> {
        let name = textwrap::wrap(&row.name, NAME_WIDTH)
            .into_iter()
            .map(|l| l.into_owned())
            .collect();
        vec![
            vec![row.order_index.map(|i| i.to_string()).unwrap_or_default()],
            name,
            vec![blank_if_zero(row.totals.delivered_morning)],
            vec![blank_if_zero(row.totals.delivered_afternoon)],
            vec![blank_if_zero(row.totals.paid_morning)],
            vec![blank_if_zero(row.totals.paid_afternoon)],
            vec![if row.current_debt > 0.0 {
                format_cell_amount(row.current_debt)
            } else {
                "-".to_string()
            }],
        ]
    }
}

fn blank_if_zero(amount: f64) -> String {
    if amount > 0.0 {
        format_cell_amount(amount)
    } else {
        String::new()
    }
}

/// Text columns are left aligned, amounts right aligned.
fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            if i <= 1 {
                format!(" {cell}{} ", " ".repeat(pad))
            } else {
                format!(" {}{cell} ", " ".repeat(pad))
            }
        })
        .collect();
    format!("|{}|\n", padded.join("|"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{ClientId, ShiftTotals};

    fn sheet() -> RouteSheet {
        RouteSheet {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rows: vec![
                RouteSheetRow {
                    client_id: ClientId("a".into()),
                    order_index: Some(1),
                    name: "Doña Rosa".into(),
                    totals: ShiftTotals {
                        delivered_morning: 15.0,
                        paid_afternoon: 10.0,
                        ..Default::default()
                    },
                    current_debt: 10.0,
                    items_morning: vec![],
                    items_afternoon: vec![],
                },
                RouteSheetRow {
                    client_id: ClientId("b".into()),
                    order_index: Some(2),
                    name: "Bodega de la esquina frente al mercado central".into(),
                    totals: ShiftTotals::default(),
                    current_debt: -2.0,
                    items_morning: vec![],
                    items_afternoon: vec![],
                },
            ],
            total_delivered: 15.0,
            total_paid: 10.0,
        }
    }

    #[test]
    fn prints_title_and_amount_cells() {
        let printed = RouteSheetPrinter::new().print(&sheet());
        assert!(printed.starts_with("Reporte Diario de Cobranzas - 2024-05-01\n"));
        let rosa = printed.lines().find(|l| l.contains("Doña Rosa")).unwrap();
        assert!(rosa.contains("15.00"));
        assert!(rosa.contains("10.00"));
        assert!(printed.contains("Total entregado: S/ 15.00"));
    }

    #[test]
    fn wraps_long_names_and_dashes_settled_debt() {
        let printed = RouteSheetPrinter::new().print(&sheet());
        let bodega = printed.lines().find(|l| l.contains("Bodega")).unwrap();
        assert!(bodega.trim_end().ends_with("- |"));
        assert!(printed.lines().any(|l| l.contains("central")));
        assert_eq!(
            RouteSheetPrinter::new().file_name(&sheet()),
            "reporte_diario_2024-05-01.txt"
        );
    }
}
