use chrono::NaiveDate;
use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

const CURRENCY: Currency = Currency::PEN;
const CURRENCY_SYMBOL: &str = "S/";

/// Standard number of decimal places for the route's currency.
fn decimal_places() -> u32 {
    CURRENCY.exponent().unwrap_or(0) as u32
}

/// Soles with symbol, thousands separators and fixed decimals, e.g.
/// "S/ 1,234.50". Negative amounts (credit in favor of a client) are
/// prefixed with '-'.
///
/// Uses the en locale ('.' decimal mark, ',' grouping), which is also the
/// usual notation in Peru.
pub fn format_amount(amount: f64) -> String {
    let decimal_places = decimal_places();
    let scale = 10_i64.pow(decimal_places);
    let minor_units = (amount.abs() * scale as f64).round() as i64;
    let sign = if amount < 0.0 && minor_units != 0 { "-" } else { "" };
    let integer_part = (minor_units / scale).to_formatted_string(&Locale::en);
    if decimal_places == 0 {
        return format!("{sign}{CURRENCY_SYMBOL} {integer_part}");
    }
    format!(
        "{sign}{CURRENCY_SYMBOL} {integer_part}.{:0width$}",
        minor_units % scale,
        width = decimal_places as usize
    )
}

/// Plain two-decimal amount for table cells.
pub(crate) fn format_cell_amount(amount: f64) -> String {
    format!("{:.*}", decimal_places() as usize, amount)
}

/// DD/MM/YYYY, as dates are written on the route.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// YYYY-MM-DD, as used in file names and storage.
pub(crate) fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_soles() {
        assert_eq!(format_amount(1234.5), "S/ 1,234.50");
        assert_eq!(format_amount(0.0), "S/ 0.00");
        assert_eq!(format_amount(0.999), "S/ 1.00");
        assert_eq!(format_amount(-12.3), "-S/ 12.30");
        assert_eq!(format_amount(-0.001), "S/ 0.00");
    }

    #[test]
    fn formats_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_display_date(date), "01/05/2024");
        assert_eq!(format_iso_date(date), "2024-05-01");
    }
}
