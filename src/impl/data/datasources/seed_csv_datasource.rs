use std::{fs, str::FromStr as _};

use fractic_server_error::ServerError;

use crate::{
    data::models::amount_model::AmountModel,
    entities::{ProductDraft, SeedClient},
    errors::{InvalidCsv, InvalidCsvContent, ReadError},
};

/// Roster and catalog files used to bootstrap an empty dataset.
///
/// Clients: `N°,Cliente` (order index, name). Products: `Producto,Precio`.
/// Both files start with a header row.
pub(crate) trait SeedCsvDatasource: Send + Sync {
    fn clients_from_string(&self, s: &str) -> Result<Vec<SeedClient>, ServerError>;
    fn products_from_string(&self, s: &str) -> Result<Vec<ProductDraft>, ServerError>;

    fn clients_from_file<P>(&self, path: P) -> Result<Vec<SeedClient>, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.clients_from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }

    fn products_from_file<P>(&self, path: P) -> Result<Vec<ProductDraft>, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.products_from_string(
            &fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?,
        )
    }
}

pub(crate) struct SeedCsvDatasourceImpl;

impl SeedCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl SeedCsvDatasource for SeedCsvDatasourceImpl {
    fn clients_from_string(&self, s: &str) -> Result<Vec<SeedClient>, ServerError> {
        let mut clients = reader(s)
            .records()
            .filter_map(|r| match r {
                Err(e) => Some(Err(InvalidCsv::with_debug(&e))),
                Ok(r) => {
                    let raw_index = r.get(0).unwrap_or("").trim();
                    let raw_name = r.get(1).unwrap_or("").trim();
                    // Spreadsheet exports leave blank filler rows.
                    if raw_index.is_empty() && raw_name.is_empty() {
                        return None;
                    }
                    Some(parse_client(raw_index, raw_name))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        clients.sort_by_key(|c| c.order_index);
        Ok(clients)
    }

    fn products_from_string(&self, s: &str) -> Result<Vec<ProductDraft>, ServerError> {
        reader(s)
            .records()
            .filter_map(|r| match r {
                Err(e) => Some(Err(InvalidCsv::with_debug(&e))),
                Ok(r) => {
                    let raw_name = r.get(0).unwrap_or("").trim();
                    let raw_price = r.get(1).unwrap_or("").trim();
                    if raw_name.is_empty() && raw_price.is_empty() {
                        return None;
                    }
                    Some(parse_product(raw_name, raw_price))
                }
            })
            .collect()
    }
}

fn reader(s: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(s.as_bytes())
}

fn parse_client(raw_index: &str, raw_name: &str) -> Result<SeedClient, ServerError> {
    if raw_name.is_empty() {
        return Err(InvalidCsvContent::new(&format!(
            "client {raw_index} has no name"
        )));
    }
    let order_index = raw_index.parse::<i64>().map_err(|e| {
        InvalidCsvContent::with_debug(&format!("invalid order index '{raw_index}'"), &e)
    })?;
    Ok(SeedClient {
        order_index,
        name: raw_name.to_string(),
    })
}

fn parse_product(raw_name: &str, raw_price: &str) -> Result<ProductDraft, ServerError> {
    if raw_name.is_empty() {
        return Err(InvalidCsvContent::new("product without name"));
    }
    let price: f64 = AmountModel::from_str(raw_price)?.into();
    if price < 0.0 {
        return Err(InvalidCsvContent::new(&format!(
            "negative price for '{raw_name}'"
        )));
    }
    Ok(ProductDraft {
        name: raw_name.to_string(),
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_roster_sorted_by_order_index() {
        let csv = "N°,Cliente\n2,Beto\n,\n1, Doña Rosa \n";
        let clients = SeedCsvDatasourceImpl::new().clients_from_string(csv).unwrap();
        assert_eq!(
            clients,
            vec![
                SeedClient {
                    order_index: 1,
                    name: "Doña Rosa".into()
                },
                SeedClient {
                    order_index: 2,
                    name: "Beto".into()
                },
            ]
        );
    }

    #[test]
    fn rejects_non_numeric_order_index() {
        let csv = "N°,Cliente\nx,Beto\n";
        assert!(SeedCsvDatasourceImpl::new().clients_from_string(csv).is_err());
    }

    #[test]
    fn reads_catalog_prices() {
        let csv = "Producto,Precio\nPan,0.20\nKeke,\"S/ 12.00\"\n";
        let products = SeedCsvDatasourceImpl::new().products_from_string(csv).unwrap();
        assert_eq!(products[1].name, "Keke");
        assert_eq!(products[1].price, 12.0);
    }
}
