use std::str::FromStr;

use fractic_server_error::ServerError;

use crate::errors::InvalidAmount;

/// Currency amount as typed or spoken by an operator: "12.50", "S/ 1,200",
/// "S/. 3". Parenthesized values are negative, as in spreadsheet exports.
#[derive(Debug)]
pub(crate) struct AmountModel(pub f64);
impl FromStr for AmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.replace(",", "");
        let raw = raw.trim();
        let is_negative = raw.starts_with("(") && raw.ends_with(")");
        let numeric_part = raw
            .trim_matches(|c| c == '(' || c == ')')
            .trim_start_matches("S/.")
            .trim_start_matches("S/")
            .trim();
        let amount = numeric_part
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| InvalidAmount::new(s))?;
        Ok(AmountModel(if is_negative { -amount } else { amount }))
    }
}

impl From<AmountModel> for f64 {
    fn from(m: AmountModel) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<f64> {
        AmountModel::from_str(s).ok().map(Into::into)
    }

    #[test]
    fn accepts_common_notations() {
        assert_eq!(parse("12.50"), Some(12.5));
        assert_eq!(parse("S/ 1,200"), Some(1200.0));
        assert_eq!(parse("S/. 3"), Some(3.0));
        assert_eq!(parse("(20.00)"), Some(-20.0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("doce"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("NaN"), None);
    }
}
