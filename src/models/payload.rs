use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::{flexible_decimal, flexible_opt_decimal, flexible_opt_string, flexible_string};
use crate::error::{Result, StockError};

// ---------------------------------------------------------------------------
// TransactionType / PartyType: stored single-letter codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl TransactionType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Buy => "B",
            Self::Sell => "S",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyType {
    #[serde(rename = "CM")]
    Customer,
    #[serde(rename = "T")]
    Transport,
    #[serde(rename = "C")]
    Collector,
}

impl PartyType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Customer => "CM",
            Self::Transport => "T",
            Self::Collector => "C",
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionPayload: upstream query-transaction document
// ---------------------------------------------------------------------------

/// One upstream transaction document.
///
/// The sell feed arrives under `sellTransaction`; a buy feed under
/// `buyTransaction`. Either may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[serde(default)]
    pub sell_transaction: Vec<ExternalOrder>,
    #[serde(default)]
    pub buy_transaction: Vec<ExternalOrder>,
}

impl TransactionPayload {
    /// Orders grouped by the transaction type they are stored under.
    pub fn batches(&self) -> [(TransactionType, &[ExternalOrder]); 2] {
        [
            (TransactionType::Buy, self.buy_transaction.as_slice()),
            (TransactionType::Sell, self.sell_transaction.as_slice()),
        ]
    }

    pub fn order_count(&self) -> usize {
        self.buy_transaction.len() + self.sell_transaction.len()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOrder {
    #[serde(deserialize_with = "flexible_string")]
    pub order_id: String,
    pub order_finished_date: String,
    #[serde(default)]
    pub order_finished_time: Option<String>,
    #[serde(default)]
    pub transaction_parties: Option<TransactionParties>,
    #[serde(default)]
    pub request_list: Vec<CategoryGroup>,
}

impl ExternalOrder {
    /// Combine the upstream date and time fields into one timestamp.
    ///
    /// `orderFinishedTime` wins when present. Without it, a time carried in
    /// the date field itself is used, and only then midnight.
    pub fn finished_at(&self) -> Result<NaiveDateTime> {
        let (date_part, embedded_time) = split_date_field(&self.order_finished_date);
        let date = parse_order_date(date_part).ok_or_else(|| {
            StockError::MalformedPayload(format!(
                "order {}: unrecognised finished date '{}'",
                self.order_id, self.order_finished_date
            ))
        })?;

        let explicit_time = self
            .order_finished_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let time = match explicit_time.or(embedded_time) {
            None => NaiveTime::MIN,
            Some(raw) => parse_order_time(raw).ok_or_else(|| {
                StockError::MalformedPayload(format!(
                    "order {}: unrecognised finished time '{}'",
                    self.order_id, raw
                ))
            })?,
        };

        Ok(date.and_time(time))
    }
}

/// Customer, transport and collector always travel together.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionParties {
    pub customer: Party,
    pub transport: Party,
    pub collector: Party,
}

impl TransactionParties {
    pub fn by_type(&self) -> [(PartyType, &Party); 3] {
        [
            (PartyType::Customer, &self.customer),
            (PartyType::Transport, &self.transport),
            (PartyType::Collector, &self.collector),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub id: Option<String>,
}

/// One category/sub-category block inside an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryGroup {
    #[serde(rename = "categoryID", alias = "categoryId", deserialize_with = "flexible_string")]
    pub category_id: String,
    #[serde(
        rename = "subCategoryID",
        alias = "subCategoryId",
        deserialize_with = "flexible_string"
    )]
    pub sub_category_id: String,
    #[serde(default, rename = "requestList")]
    pub request_list: Vec<GradedItem>,
}

/// A graded line. `total` is the upstream figure and is stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct GradedItem {
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(deserialize_with = "flexible_decimal")]
    pub price: Decimal,
    #[serde(deserialize_with = "flexible_string")]
    pub quantity: String,
    #[serde(default, deserialize_with = "flexible_opt_decimal")]
    pub total: Option<Decimal>,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// Some feeds send a full ISO timestamp in the date field.
fn split_date_field(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.trim();
    match raw.split_once(['T', ' ']) {
        Some((date, time)) => {
            let time = time.trim().trim_end_matches('Z');
            (date, (!time.is_empty()).then_some(time))
        }
        None => (raw, None),
    }
}

fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_order_time(raw: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(date: &str, time: Option<&str>) -> ExternalOrder {
        ExternalOrder {
            order_id: "ORD-1".to_string(),
            order_finished_date: date.to_string(),
            order_finished_time: time.map(str::to_string),
            transaction_parties: None,
            request_list: Vec::new(),
        }
    }

    #[test]
    fn finished_at_combines_date_and_time() {
        let ts = order("2024-03-01", Some("14:30:00")).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 14:30:00");
    }

    #[test]
    fn finished_at_accepts_day_first_and_short_time() {
        let ts = order("01/03/2024", Some("09:05")).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 09:05:00");
    }

    #[test]
    fn finished_at_defaults_to_midnight() {
        let ts = order("2024-03-01", None).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn finished_at_uses_time_embedded_in_date_field() {
        let ts = order("2024-03-01T14:30:00Z", None).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 14:30:00");

        let ts = order("2024-03-01 08:15:30", Some("  ")).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 08:15:30");

        let ts = order("2024-03-01T14:30:00.250", None).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 14:30:00.250");
    }

    #[test]
    fn explicit_time_field_wins_over_embedded_time() {
        let ts = order("2024-03-01T14:30:00Z", Some("09:00")).finished_at().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 09:00:00");
    }

    #[test]
    fn unreadable_embedded_time_is_rejected() {
        let err = order("2024-03-01Tnoon", None).finished_at().unwrap_err();
        assert!(matches!(err, StockError::MalformedPayload(ref m) if m.contains("noon")));
    }

    #[test]
    fn finished_at_rejects_garbage() {
        let err = order("yesterday", Some("14:30")).finished_at().unwrap_err();
        assert!(matches!(err, StockError::MalformedPayload(_)));
        assert!(order("2024-03-01", Some("late")).finished_at().is_err());
    }

    #[test]
    fn payload_decodes_numbers_and_strings() {
        let payload: TransactionPayload = serde_json::from_value(json!({
            "sellTransaction": [{
                "orderId": 1001,
                "orderFinishedDate": "2024-03-01",
                "orderFinishedTime": "14:30:00",
                "transactionParties": null,
                "requestList": [{
                    "categoryID": 3,
                    "subCategoryID": "31",
                    "requestList": [
                        {"grade": "A", "price": 12.5, "quantity": "4.25", "total": "53.125"}
                    ]
                }]
            }]
        }))
        .unwrap();

        assert!(payload.buy_transaction.is_empty());
        let order = &payload.sell_transaction[0];
        assert_eq!(order.order_id, "1001");
        assert!(order.transaction_parties.is_none());
        let group = &order.request_list[0];
        assert_eq!(group.category_id, "3");
        assert_eq!(group.sub_category_id, "31");
        let item = &group.request_list[0];
        assert_eq!(item.price.to_string(), "12.5");
        assert_eq!(item.quantity, "4.25");
        assert_eq!(item.total.map(|t| t.to_string()), Some("53.125".to_string()));
    }

    #[test]
    fn partial_party_block_is_rejected() {
        let result: std::result::Result<TransactionParties, _> = serde_json::from_value(json!({
            "customer": {"roleName": "customer", "name": "A", "id": "c1"},
            "transport": {"roleName": "transport", "name": "B", "id": "t1"}
        }));
        assert!(result.is_err());
    }
}
