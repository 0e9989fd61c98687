use serde::{Deserialize, Serialize};

use super::de::flexible_string;

// ---------------------------------------------------------------------------
// ProductList: upstream query-product document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    #[serde(default)]
    pub product_list: Vec<ProductCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    #[serde(deserialize_with = "flexible_string")]
    pub category_id: String,
    pub category_name: String,
    #[serde(default, rename = "subcategory")]
    pub subcategories: Vec<ProductSubCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubCategory {
    #[serde(deserialize_with = "flexible_string")]
    pub sub_category_id: String,
    pub sub_category_name: String,
}

// ---------------------------------------------------------------------------
// Category / SubCategory: stored master data (query results)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub sub_category_id: String,
    pub sub_category_name: String,
    pub category_id: String,
}

/// Rows newly inserted by one master-data sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataSummary {
    pub categories: usize,
    pub sub_categories: usize,
}
