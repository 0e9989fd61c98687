use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::parse_decimal;
use crate::config;
use crate::error::{Result, StockError};

// ---------------------------------------------------------------------------
// ReportParams: raw string parameters as received from a query string
// ---------------------------------------------------------------------------

/// Untyped report parameters. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    #[serde(alias = "orderFinishedDate")]
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub order_id: Option<String>,
    pub grade: Option<String>,
    #[serde(alias = "minPrice")]
    pub min_amount: Option<String>,
    #[serde(alias = "maxPrice")]
    pub max_amount: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

// ---------------------------------------------------------------------------
// ReportFilter: validated filter set and page window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub order_id: Option<String>,
    pub grade: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            date: None,
            category_id: None,
            sub_category_id: None,
            order_id: None,
            grade: None,
            min_amount: None,
            max_amount: None,
            limit: config::DEFAULT_LIMIT,
            offset: config::DEFAULT_OFFSET,
        }
    }
}

impl TryFrom<&ReportParams> for ReportFilter {
    type Error = StockError;

    /// Validate raw parameters.
    ///
    /// Unparseable dates, amounts or page values are rejected with
    /// [`StockError::InvalidArgument`]; negative page values clamp to zero.
    fn try_from(params: &ReportParams) -> Result<Self> {
        let date = present(&params.date)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    StockError::InvalidArgument(format!("date must be YYYY-MM-DD, got '{}'", raw))
                })
            })
            .transpose()?;

        Ok(Self {
            date,
            category_id: present(&params.category_id).map(str::to_string),
            sub_category_id: present(&params.sub_category_id).map(str::to_string),
            order_id: present(&params.order_id).map(str::to_string),
            grade: present(&params.grade).map(str::to_string),
            min_amount: parse_amount("minAmount", &params.min_amount)?,
            max_amount: parse_amount("maxAmount", &params.max_amount)?,
            limit: parse_page("limit", &params.limit)?.unwrap_or(config::DEFAULT_LIMIT),
            offset: parse_page("offset", &params.offset)?.unwrap_or(config::DEFAULT_OFFSET),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(name: &str, value: &Option<String>) -> Result<Option<Decimal>> {
    present(value)
        .map(|raw| {
            parse_decimal(raw)
                .map_err(|e| StockError::InvalidArgument(format!("{}: {}", name, e)))
        })
        .transpose()
}

fn parse_page(name: &str, value: &Option<String>) -> Result<Option<usize>> {
    present(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map(|n| n.max(0) as usize)
                .map_err(|_| {
                    StockError::InvalidArgument(format!("{} must be an integer, got '{}'", name, raw))
                })
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// ReportRow / Report: aggregated output
// ---------------------------------------------------------------------------

/// Buy/sell aggregates for one (category, sub-category) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub category_name: Option<String>,
    pub sub_category_name: Option<String>,
    pub buy_price: Decimal,
    pub buy_quantity: Decimal,
    pub sell_price: Decimal,
    pub sell_quantity: Decimal,
    pub total_price: Decimal,
    pub total_quantity: Decimal,
}

impl ReportRow {
    /// Build a row from the four base sums; the net columns are `buy - sell`.
    pub fn new(
        category_id: Option<String>,
        sub_category_id: Option<String>,
        category_name: Option<String>,
        sub_category_name: Option<String>,
        buy: (Decimal, Decimal),
        sell: (Decimal, Decimal),
    ) -> Self {
        let (buy_price, buy_quantity) = buy;
        let (sell_price, sell_quantity) = sell;
        Self {
            category_id,
            sub_category_id,
            category_name,
            sub_category_name,
            buy_price,
            buy_quantity,
            sell_price,
            sell_quantity,
            total_price: buy_price - sell_price,
            total_quantity: buy_quantity - sell_quantity,
        }
    }
}

/// One page of the net-stock report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Number of groups across all pages.
    pub total: u64,
    pub rows: Vec<ReportRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params() -> ReportParams {
        ReportParams::default()
    }

    #[test]
    fn empty_params_use_defaults() {
        let filter = ReportFilter::try_from(&params()).unwrap();
        assert_eq!(filter, ReportFilter::default());
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let p = ReportParams {
            grade: Some("  ".into()),
            min_amount: Some(String::new()),
            ..params()
        };
        let filter = ReportFilter::try_from(&p).unwrap();
        assert!(filter.grade.is_none());
        assert!(filter.min_amount.is_none());
    }

    #[test]
    fn numeric_params_are_parsed() {
        let p = ReportParams {
            date: Some("2024-03-01".into()),
            min_amount: Some("10".into()),
            max_amount: Some("100.50".into()),
            limit: Some("25".into()),
            offset: Some("-3".into()),
            ..params()
        };
        let filter = ReportFilter::try_from(&p).unwrap();
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filter.min_amount, Some(dec!(10)));
        assert_eq!(filter.max_amount, Some(dec!(100.50)));
        assert_eq!(filter.limit, 25);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for p in [
            ReportParams { min_amount: Some("ten".into()), ..params() },
            ReportParams { max_amount: Some("1,000".into()), ..params() },
            ReportParams { limit: Some("all".into()), ..params() },
            ReportParams { offset: Some("1.5".into()), ..params() },
            ReportParams { date: Some("01-03-2024".into()), ..params() },
        ] {
            let err = ReportFilter::try_from(&p).unwrap_err();
            assert!(matches!(err, StockError::InvalidArgument(_)), "{:?}", p);
        }
    }

    #[test]
    fn original_parameter_names_are_accepted() {
        let p: ReportParams = serde_json::from_value(serde_json::json!({
            "orderFinishedDate": "2024-03-01",
            "minPrice": "5",
            "maxPrice": "50",
            "categoryId": "3"
        }))
        .unwrap();
        assert_eq!(p.date.as_deref(), Some("2024-03-01"));
        assert_eq!(p.min_amount.as_deref(), Some("5"));
        assert_eq!(p.max_amount.as_deref(), Some("50"));
        assert_eq!(p.category_id.as_deref(), Some("3"));
    }

    #[test]
    fn net_columns_are_buy_minus_sell() {
        let row = ReportRow::new(
            Some("1".into()),
            Some("11".into()),
            None,
            None,
            (dec!(1000), dec!(10)),
            (dec!(400), dec!(3)),
        );
        assert_eq!(row.total_price, dec!(600));
        assert_eq!(row.total_quantity, dec!(7));
    }
}
