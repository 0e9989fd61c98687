//! Shared test fixtures for the stock ledger integration tests.
//!
//! Provides `setup_sample_db()` which creates an in-memory DuckDB connection
//! with master data and a small set of imported buy/sell orders:
//!
//! | group   | buy price / qty | sell price / qty | dates                 |
//! |---------|-----------------|------------------|-----------------------|
//! | (1, 11) | 1000 / 10       | 400 / 3          | buy 03-01, sell 03-02 |
//! | (1, 12) | 0 / 0           | 0 / 0            | 03-02                 |
//! | (2, 21) | 50 / 5          | 5 / 1            | 03-01                 |
//! | (3, 31) | 500 / 2         | 0 / 0            | 03-02                 |

#![allow(dead_code)]

use recycle_stock::models::ProductList;
use recycle_stock::queries::MasterDataSync;
use recycle_stock::{Connection, Importer, TransactionPayload};
use serde_json::{json, Value};

/// In-memory store with the schema applied and master data loaded.
pub fn open_store() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    MasterDataSync::new(&mut conn).apply(&product_list()).unwrap();
    conn
}

/// In-memory store with master data and the sample orders imported.
pub fn setup_sample_db() -> Connection {
    let mut conn = open_store();
    Importer::new(&mut conn).import(&sample_payload()).unwrap();
    conn
}

pub fn product_list() -> ProductList {
    serde_json::from_value(json!({
        "productList": [
            {
                "categoryId": "1",
                "categoryName": "Plastic",
                "subcategory": [
                    {"subCategoryId": "11", "subCategoryName": "PET"},
                    {"subCategoryId": "12", "subCategoryName": "HDPE"}
                ]
            },
            {
                "categoryId": 2,
                "categoryName": "Paper",
                "subcategory": [
                    {"subCategoryId": 21, "subCategoryName": "Cardboard"}
                ]
            },
            {
                "categoryId": "3",
                "categoryName": "Metal",
                "subcategory": [
                    {"subCategoryId": "31", "subCategoryName": "Aluminium"}
                ]
            }
        ]
    }))
    .unwrap()
}

pub fn parties(tag: &str) -> Value {
    json!({
        "customer": {"roleName": "customer", "name": format!("Customer {tag}"), "id": format!("CM-{tag}")},
        "transport": {"roleName": "transport", "name": format!("Truck {tag}"), "id": format!("T-{tag}")},
        "collector": {"roleName": "collector", "name": format!("Collector {tag}"), "id": 42}
    })
}

pub fn item(grade: &str, price: Value, quantity: Value) -> Value {
    json!({"grade": grade, "price": price, "quantity": quantity, "total": null})
}

pub fn group(category_id: &str, sub_category_id: &str, items: Vec<Value>) -> Value {
    json!({"categoryID": category_id, "subCategoryID": sub_category_id, "requestList": items})
}

pub fn order(order_id: &str, date: &str, time: &str, parties: Value, groups: Vec<Value>) -> Value {
    json!({
        "orderId": order_id,
        "orderFinishedDate": date,
        "orderFinishedTime": time,
        "transactionParties": parties,
        "requestList": groups
    })
}

pub fn payload(buy: Vec<Value>, sell: Vec<Value>) -> TransactionPayload {
    serde_json::from_value(json!({"buyTransaction": buy, "sellTransaction": sell})).unwrap()
}

pub fn sample_payload() -> TransactionPayload {
    let buy = vec![
        order(
            "ORD-001",
            "2024-03-01",
            "14:30:00",
            parties("001"),
            vec![group(
                "1",
                "11",
                vec![item("A", json!(600), json!("6")), item("B", json!("400"), json!(4))],
            )],
        ),
        order(
            "ORD-002",
            "2024-03-01",
            "10:00:00",
            parties("002"),
            vec![group("2", "21", vec![item("A", json!(50), json!("5"))])],
        ),
        order(
            "ORD-003",
            "2024-03-02",
            "08:15:00",
            Value::Null,
            vec![
                group("3", "31", vec![item("B", json!("500.00"), json!("2"))]),
                group("1", "12", vec![item("C", json!(0), json!("0"))]),
            ],
        ),
    ];
    let sell = vec![
        order(
            "ORD-101",
            "2024-03-02",
            "09:00:00",
            parties("101"),
            vec![group("1", "11", vec![item("A", json!(400), json!("3"))])],
        ),
        order(
            "ORD-102",
            "2024-03-01",
            "16:00:00",
            parties("102"),
            vec![group("2", "21", vec![item("A", json!(5), json!("1"))])],
        ),
    ];
    payload(buy, sell)
}

/// `n` buy orders, each in its own category "1".."n" with sub-category "1".
/// No master data is needed for the default report.
pub fn many_groups_payload(n: usize) -> TransactionPayload {
    let buy = (1..=n)
        .map(|i| {
            order(
                &format!("ORD-{:03}", 200 + i),
                "2024-04-01",
                "12:00:00",
                Value::Null,
                vec![group(&i.to_string(), "1", vec![item("A", json!(i * 10), json!("1"))])],
            )
        })
        .collect();
    payload(buy, vec![])
}
