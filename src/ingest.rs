//! Transactional import of upstream orders into the transaction hierarchy.
//!
//! Each order becomes one `"transaction"` row, zero or three
//! `transaction_parties` rows, one `transaction_category` row per category
//! group and one `transaction_items` row per graded line. A whole payload is
//! written inside a single [`UnitOfWork`]: either every row of every order
//! commits or none does.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{DECIMAL_SCALE, DECIMAL_TYPE};
use crate::connection::{Connection, UnitOfWork};
use crate::error::{Result, StockError};
use crate::models::{CategoryGroup, ExternalOrder, GradedItem, TransactionParties, TransactionPayload, TransactionType};

/// Rows written by one successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub transactions: usize,
    pub parties: usize,
    pub categories: usize,
    pub items: usize,
}

impl ImportSummary {
    fn absorb(&mut self, other: ImportSummary) {
        self.transactions += other.transactions;
        self.parties += other.parties;
        self.categories += other.categories;
        self.items += other.items;
    }
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Writes upstream payloads through an exclusively borrowed connection.
pub struct Importer<'a> {
    conn: &'a mut Connection,
}

impl<'a> Importer<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Import every order of `payload` as one unit of work.
    ///
    /// On any failure (malformed order, constraint violation, store error)
    /// nothing from this payload is kept and the underlying error is returned.
    pub fn import(&mut self, payload: &TransactionPayload) -> Result<ImportSummary> {
        log::debug!("Importing {} upstream orders", payload.order_count());

        let result = self.conn.unit_of_work(|uow| {
            let mut summary = ImportSummary::default();
            for (kind, orders) in payload.batches() {
                for order in orders {
                    summary.absorb(write_order(uow, order, kind)?);
                }
            }
            Ok(summary)
        });

        match &result {
            Ok(summary) => log::info!(
                "Import committed: {} transactions, {} parties, {} categories, {} items",
                summary.transactions,
                summary.parties,
                summary.categories,
                summary.items
            ),
            Err(e) => log::warn!("Import rolled back: {}", e),
        }

        result
    }
}

// ---------------------------------------------------------------------------
// Row writers
// ---------------------------------------------------------------------------

/// Write one order and everything beneath it.
///
/// Parents are inserted before children so each child can reference the id
/// generated for its parent.
pub fn write_order(uow: &UnitOfWork<'_>, order: &ExternalOrder, kind: TransactionType) -> Result<ImportSummary> {
    let finished_at = order.finished_at()?;

    let transaction_id = uow.insert_returning_id(
        "INSERT INTO \"transaction\" (order_id, order_finished_date, transaction_type) \
         VALUES (?, CAST(? AS TIMESTAMP), ?) RETURNING id",
        duckdb::params![
            order.order_id,
            finished_at.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            kind.code()
        ],
    )?;

    let mut summary = ImportSummary {
        transactions: 1,
        ..ImportSummary::default()
    };

    if let Some(parties) = &order.transaction_parties {
        summary.parties += write_parties(uow, transaction_id, parties)?;
    }

    for group in &order.request_list {
        summary.items += write_category_group(uow, transaction_id, group)?;
        summary.categories += 1;
    }

    Ok(summary)
}

fn write_parties(uow: &UnitOfWork<'_>, transaction_id: i64, parties: &TransactionParties) -> Result<usize> {
    let mut written = 0;
    for (party_type, party) in parties.by_type() {
        written += uow.execute(
            "INSERT INTO transaction_parties (transaction_id, parties_type, role_name, name, id_name) \
             VALUES (?, ?, ?, ?, ?)",
            duckdb::params![transaction_id, party_type.code(), party.role_name, party.name, party.id],
        )?;
    }
    Ok(written)
}

/// Returns the number of item rows written.
fn write_category_group(uow: &UnitOfWork<'_>, transaction_id: i64, group: &CategoryGroup) -> Result<usize> {
    let transaction_category_id = uow.insert_returning_id(
        "INSERT INTO transaction_category (transaction_id, category_id, sub_category_id) \
         VALUES (?, ?, ?) RETURNING id",
        duckdb::params![transaction_id, group.category_id, group.sub_category_id],
    )?;

    let mut written = 0;
    for item in &group.request_list {
        written += write_item(uow, transaction_category_id, item)?;
    }
    Ok(written)
}

fn write_item(uow: &UnitOfWork<'_>, transaction_category_id: i64, item: &GradedItem) -> Result<usize> {
    let sql = format!(
        "INSERT INTO transaction_items (transaction_category_id, grade, price, quantity, total) \
         VALUES (?, ?, CAST(? AS {dec}), ?, CAST(? AS {dec}))",
        dec = DECIMAL_TYPE
    );
    let price = stored_decimal("price", item.price)?;
    let total = item.total.map(|t| stored_decimal("total", t)).transpose()?;
    uow.execute(
        &sql,
        duckdb::params![transaction_category_id, item.grade, price, item.quantity, total],
    )
}

/// Text for a `DECIMAL_TYPE` column. Values the column would round are
/// refused so the stored figure always equals the upstream one.
fn stored_decimal(field: &str, value: Decimal) -> Result<String> {
    let value = value.normalize();
    if value.scale() > DECIMAL_SCALE {
        return Err(StockError::MalformedPayload(format!(
            "{} {} has more than {} decimal places",
            field, value, DECIMAL_SCALE
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn stored_decimal_keeps_in_scale_values() {
        assert_eq!(stored_decimal("price", dec!(12.5)).unwrap(), "12.5");
        assert_eq!(stored_decimal("total", dec!(1.23450)).unwrap(), "1.2345");
        assert_eq!(stored_decimal("total", dec!(1500)).unwrap(), "1500");
    }

    #[test]
    fn stored_decimal_refuses_rounding() {
        let err = stored_decimal("total", dec!(1.23456)).unwrap_err();
        assert!(matches!(err, StockError::MalformedPayload(ref m) if m.contains("1.23456")));
    }
}
