use std::str::FromStr;

use chrono::NaiveDate;
use fractic_server_error::ServerError;
use serde::{Deserialize, Serialize};

use crate::errors::InvalidIsoDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ISODateModel(pub NaiveDate);
impl FromStr for ISODateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| InvalidIsoDate::with_debug(s, &e))?;
        Ok(ISODateModel(d))
    }
}
impl<'de> Deserialize<'de> for ISODateModel {
    fn deserialize<D>(deserializer: D) -> Result<ISODateModel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ISODateModel::from_str(&s).map_err(serde::de::Error::custom)
    }
}
impl Serialize for ISODateModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.format("%Y-%m-%d").to_string())
    }
}

impl From<ISODateModel> for NaiveDate {
    fn from(m: ISODateModel) -> Self {
        m.0
    }
}

impl From<NaiveDate> for ISODateModel {
    fn from(d: NaiveDate) -> Self {
        ISODateModel(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        let d: NaiveDate = ISODateModel::from_str("2024-05-01").unwrap().into();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(ISODateModel::from_str("01/05/2024").is_err());
    }
}
