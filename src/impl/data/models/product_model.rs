use serde_derive::{Deserialize, Serialize};

use crate::entities::{Product, ProductDraft, ProductId, ProductUpdate};

/// Row of the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProductModel {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProductInsertModel {
    pub name: String,
    pub price: f64,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ProductPatchModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl From<ProductModel> for Product {
    fn from(m: ProductModel) -> Self {
        Product {
            id: ProductId(m.id),
            name: m.name,
            price: m.price,
        }
    }
}

impl ProductInsertModel {
    pub(crate) fn from_draft(draft: ProductDraft, user_id: &str) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            price: draft.price,
            user_id: user_id.to_string(),
        }
    }
}

impl From<ProductUpdate> for ProductPatchModel {
    fn from(u: ProductUpdate) -> Self {
        Self {
            name: u.name,
            price: u.price,
        }
    }
}

impl ProductModel {
    pub(crate) fn apply(&mut self, patch: &ProductPatchModel) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}
