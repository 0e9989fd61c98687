//! Category and sub-category master data.
//!
//! Rows are only ever inserted (never updated or deleted); the report joins
//! them for display names.

use crate::connection::{Connection, UnitOfWork};
use crate::error::Result;
use crate::models::{Category, MasterDataSummary, ProductList, SubCategory};
use crate::sql_builder::SqlBuilder;

const CATEGORY_COLS: &[&str] = &[
    "category_id AS \"categoryId\"",
    "category_name AS \"categoryName\"",
];

const SUB_CATEGORY_COLS: &[&str] = &[
    "sub_category_id AS \"subCategoryId\"",
    "sub_category_name AS \"subCategoryName\"",
    "category_id AS \"categoryId\"",
];

// ---------------------------------------------------------------------------
// MasterDataQuery
// ---------------------------------------------------------------------------

/// Read-only lookups over `category` and `sub_category`.
pub struct MasterDataQuery<'a> {
    conn: &'a Connection,
}

impl<'a> MasterDataQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All categories, ordered by id.
    pub fn categories(&self) -> Result<Vec<Category>> {
        let (sql, params) = SqlBuilder::new("category")
            .select(CATEGORY_COLS)
            .order_by(&["TRY_CAST(category_id AS BIGINT) NULLS LAST", "category_id"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    pub fn category(&self, category_id: &str) -> Result<Option<Category>> {
        let (sql, params) = SqlBuilder::new("category")
            .select(CATEGORY_COLS)
            .where_eq("category_id", category_id)
            .limit(1)
            .build();
        Ok(self.conn.execute_into(&sql, &params)?.into_iter().next())
    }

    /// Sub-categories belonging to `category_id`, ordered by id.
    pub fn sub_categories(&self, category_id: &str) -> Result<Vec<SubCategory>> {
        let (sql, params) = SqlBuilder::new("sub_category")
            .select(SUB_CATEGORY_COLS)
            .where_eq("category_id", category_id)
            .order_by(&["TRY_CAST(sub_category_id AS BIGINT) NULLS LAST", "sub_category_id"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    pub fn sub_category(&self, sub_category_id: &str) -> Result<Option<SubCategory>> {
        let (sql, params) = SqlBuilder::new("sub_category")
            .select(SUB_CATEGORY_COLS)
            .where_eq("sub_category_id", sub_category_id)
            .limit(1)
            .build();
        Ok(self.conn.execute_into(&sql, &params)?.into_iter().next())
    }
}

// ---------------------------------------------------------------------------
// MasterDataSync
// ---------------------------------------------------------------------------

/// Inserts upstream categories and sub-categories that are not stored yet.
pub struct MasterDataSync<'a> {
    conn: &'a mut Connection,
}

impl<'a> MasterDataSync<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Insert every unknown category, then every unknown sub-category, in
    /// one unit of work. Ids already present are left untouched.
    pub fn apply(&mut self, products: &ProductList) -> Result<MasterDataSummary> {
        let result = self.conn.unit_of_work(|uow| {
            let mut summary = MasterDataSummary::default();
            for product in &products.product_list {
                summary.categories +=
                    insert_category(uow, &product.category_id, &product.category_name)?;
            }
            for product in &products.product_list {
                for sub in &product.subcategories {
                    summary.sub_categories += insert_sub_category(
                        uow,
                        &sub.sub_category_id,
                        &sub.sub_category_name,
                        &product.category_id,
                    )?;
                }
            }
            Ok(summary)
        });

        match &result {
            Ok(summary) => log::info!(
                "Master data synced: {} new categories, {} new sub-categories",
                summary.categories,
                summary.sub_categories
            ),
            Err(e) => log::warn!("Master data sync rolled back: {}", e),
        }

        result
    }
}

fn insert_category(uow: &UnitOfWork<'_>, category_id: &str, category_name: &str) -> Result<usize> {
    uow.execute(
        "INSERT INTO category (category_id, category_name, status) \
         SELECT CAST(? AS VARCHAR), CAST(? AS VARCHAR), 1 \
         WHERE NOT EXISTS (SELECT 1 FROM category WHERE category_id = ?)",
        duckdb::params![category_id, category_name, category_id],
    )
}

fn insert_sub_category(
    uow: &UnitOfWork<'_>,
    sub_category_id: &str,
    sub_category_name: &str,
    category_id: &str,
) -> Result<usize> {
    uow.execute(
        "INSERT INTO sub_category (sub_category_id, sub_category_name, category_id, status) \
         SELECT CAST(? AS VARCHAR), CAST(? AS VARCHAR), CAST(? AS VARCHAR), 1 \
         WHERE NOT EXISTS (SELECT 1 FROM sub_category WHERE sub_category_id = ?)",
        duckdb::params![sub_category_id, sub_category_name, category_id, sub_category_id],
    )
}
