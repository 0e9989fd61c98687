//! Net-stock report: buy/sell sums per (category, sub-category) group.
//!
//! The count query and the page query are both derived from
//! [`ReportQuery::grouped`], so they always share the same joins, row
//! filters, group key and HAVING conditions.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::DECIMAL_TYPE;
use crate::connection::Connection;
use crate::error::{Result, StockError};
use crate::models::de::parse_decimal;
use crate::models::{Report, ReportFilter, ReportRow, TransactionType};
use crate::sql_builder::SqlBuilder;

const SOURCE: &str = "\"transaction\" t";

const JOINS: &[&str] = &[
    "transaction_category tc ON tc.transaction_id = t.id",
    "category cat ON cat.category_id = tc.category_id",
    "sub_category subcat ON subcat.sub_category_id = tc.sub_category_id",
    "transaction_items ti ON ti.transaction_category_id = tc.id",
];

const GROUP_KEY: &[&str] = &["tc.category_id", "tc.sub_category_id"];
const GROUP_NAMES: &[&str] = &["cat.category_name", "subcat.sub_category_name"];

/// Category ids are upstream strings; numeric ones sort numerically.
const ORDER: &[&str] = &[
    "TRY_CAST(tc.category_id AS BIGINT) ASC NULLS LAST",
    "tc.category_id ASC",
    "TRY_CAST(tc.sub_category_id AS BIGINT) ASC NULLS LAST",
    "tc.sub_category_id ASC",
];

/// Type the amount bounds are compared in (wide enough for any sum).
const BOUND_TYPE: &str = "DECIMAL(38,4)";

// ---------------------------------------------------------------------------
// Aggregate expressions
// ---------------------------------------------------------------------------

/// `SUM` of `column` over line items of one transaction type; zero when none.
fn side_sum(kind: TransactionType, column: &str) -> String {
    format!(
        "COALESCE(SUM(CASE WHEN t.transaction_type = '{}' THEN {} ELSE 0 END), 0)",
        kind.code(),
        column
    )
}

fn price_sum(kind: TransactionType) -> String {
    side_sum(kind, "ti.price")
}

fn quantity_sum(kind: TransactionType) -> String {
    side_sum(kind, &format!("CAST(ti.quantity AS {})", DECIMAL_TYPE))
}

// ---------------------------------------------------------------------------
// ReportQuery
// ---------------------------------------------------------------------------

/// Query interface for the net-stock report.
pub struct ReportQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ReportQuery<'a> {
    /// Create a new `ReportQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run the count query and the page query for `filter`.
    pub fn run(&self, filter: &ReportFilter) -> Result<Report> {
        let total = self.count(filter)?;
        let rows = self.rows(filter)?;
        Ok(Report { total, rows })
    }

    /// Number of groups that pass the filters and HAVING conditions.
    pub fn count(&self, filter: &ReportFilter) -> Result<u64> {
        let (sql, params) = Self::count_sql(filter);
        let total = self.conn.execute_scalar(&sql, &params)?;
        Ok(total.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// One page of aggregated rows, ordered by category then sub-category.
    pub fn rows(&self, filter: &ReportFilter) -> Result<Vec<ReportRow>> {
        let (sql, params) = Self::page_sql(filter);
        let rows = self.conn.execute(&sql, &params)?;
        rows.iter().map(row_from_map).collect()
    }

    /// SQL and params for the page query.
    pub fn page_sql(filter: &ReportFilter) -> (String, Vec<String>) {
        let buy_price = price_sum(TransactionType::Buy);
        let buy_quantity = quantity_sum(TransactionType::Buy);
        let sell_price = price_sum(TransactionType::Sell);
        let sell_quantity = quantity_sum(TransactionType::Sell);

        let cols = [
            "tc.category_id AS category_id".to_string(),
            "tc.sub_category_id AS sub_category_id".to_string(),
            "cat.category_name AS category_name".to_string(),
            "subcat.sub_category_name AS sub_category_name".to_string(),
            format!("CAST({} AS VARCHAR) AS buy_price", buy_price),
            format!("CAST({} AS VARCHAR) AS buy_quantity", buy_quantity),
            format!("CAST({} AS VARCHAR) AS sell_price", sell_price),
            format!("CAST({} AS VARCHAR) AS sell_quantity", sell_quantity),
        ];
        let col_refs: Vec<&str> = cols.iter().map(String::as_str).collect();

        let mut qb = Self::grouped(filter);
        qb.select(&col_refs)
            .group_by(GROUP_NAMES)
            .order_by(ORDER)
            .limit(filter.limit)
            .offset(filter.offset);
        qb.build()
    }

    /// SQL and params for the count query.
    pub fn count_sql(filter: &ReportFilter) -> (String, Vec<String>) {
        let mut qb = Self::grouped(filter);
        qb.select(GROUP_KEY);
        qb.build_count()
    }

    /// Joins, row filters, group key and HAVING shared by both queries.
    fn grouped(filter: &ReportFilter) -> SqlBuilder {
        let mut qb = SqlBuilder::new(SOURCE);
        for join in JOINS {
            qb.left_join(join);
        }

        if let Some(date) = filter.date {
            qb.where_date_eq("t.order_finished_date", &date.format("%Y-%m-%d").to_string());
        }
        if let Some(category_id) = &filter.category_id {
            qb.where_eq("cat.category_id", category_id);
        }
        if let Some(sub_category_id) = &filter.sub_category_id {
            qb.where_eq("subcat.sub_category_id", sub_category_id);
        }
        if let Some(order_id) = &filter.order_id {
            qb.where_contains("t.order_id", order_id);
        }
        if let Some(grade) = &filter.grade {
            qb.where_eq("ti.grade", grade);
        }

        qb.group_by(GROUP_KEY);

        let buy_price = price_sum(TransactionType::Buy);
        let sell_price = price_sum(TransactionType::Sell);

        // A group must have some buy or sell activity at all
        qb.having(
            &format!(
                "({} > 0 OR {} > 0 OR {} > 0 OR {} > 0)",
                buy_price,
                quantity_sum(TransactionType::Buy),
                sell_price,
                quantity_sum(TransactionType::Sell)
            ),
            &[],
        );

        if filter.min_amount.is_some() || filter.max_amount.is_some() {
            let (buy_cond, mut params) = within_bounds(&buy_price, filter);
            let (sell_cond, sell_params) = within_bounds(&sell_price, filter);
            params.extend(sell_params);
            let param_refs: Vec<&str> = params.iter().map(String::as_str).collect();
            qb.having(&format!("(({}) OR ({}))", buy_cond, sell_cond), &param_refs);
        }

        qb
    }
}

/// `expr` inside `[min_amount, max_amount]`; absent bounds are open.
fn within_bounds(expr: &str, filter: &ReportFilter) -> (String, Vec<String>) {
    let mut conds = Vec::new();
    let mut params = Vec::new();
    if let Some(min) = filter.min_amount {
        conds.push(format!("{} >= CAST(? AS {})", expr, BOUND_TYPE));
        params.push(min.to_string());
    }
    if let Some(max) = filter.max_amount {
        conds.push(format!("{} <= CAST(? AS {})", expr, BOUND_TYPE));
        params.push(max.to_string());
    }
    (conds.join(" AND "), params)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_from_map(row: &HashMap<String, Value>) -> Result<ReportRow> {
    Ok(ReportRow::new(
        text_column(row, "category_id"),
        text_column(row, "sub_category_id"),
        text_column(row, "category_name"),
        text_column(row, "sub_category_name"),
        (decimal_column(row, "buy_price")?, decimal_column(row, "buy_quantity")?),
        (decimal_column(row, "sell_price")?, decimal_column(row, "sell_quantity")?),
    ))
}

fn text_column(row: &HashMap<String, Value>, name: &str) -> Option<String> {
    row.get(name).and_then(|v| v.as_str()).map(str::to_string)
}

fn decimal_column(row: &HashMap<String, Value>, name: &str) -> Result<Decimal> {
    match row.get(name) {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(s)) => parse_decimal(s).map_err(StockError::Internal),
        Some(other) => Err(StockError::Internal(format!(
            "column {} is not a decimal: {}",
            name, other
        ))),
    }
}
