//! Master data tests: append-only sync and category lookups.

mod common;

use recycle_stock::models::{Category, MasterDataSummary, ProductList, SubCategory};
use recycle_stock::queries::{MasterDataQuery, MasterDataSync};
use recycle_stock::Connection;
use serde_json::json;

#[test]
fn first_sync_inserts_everything() {
    let mut conn = Connection::open_in_memory().unwrap();
    let summary = MasterDataSync::new(&mut conn).apply(&common::product_list()).unwrap();

    assert_eq!(
        summary,
        MasterDataSummary {
            categories: 3,
            sub_categories: 4
        }
    );
}

#[test]
fn repeated_sync_is_a_no_op() {
    let mut conn = common::open_store();
    let summary = MasterDataSync::new(&mut conn).apply(&common::product_list()).unwrap();

    assert_eq!(summary, MasterDataSummary::default());
    assert_eq!(conn.count_rows("category").unwrap(), 3);
    assert_eq!(conn.count_rows("sub_category").unwrap(), 4);
}

#[test]
fn sync_never_overwrites_existing_names() {
    let mut conn = common::open_store();
    let renamed: ProductList = serde_json::from_value(json!({
        "productList": [
            {
                "categoryId": "1",
                "categoryName": "Plastics (renamed)",
                "subcategory": [
                    {"subCategoryId": "11", "subCategoryName": "PET (renamed)"},
                    {"subCategoryId": "13", "subCategoryName": "PVC"}
                ]
            },
            {"categoryId": "4", "categoryName": "Glass", "subcategory": []}
        ]
    }))
    .unwrap();

    let summary = MasterDataSync::new(&mut conn).apply(&renamed).unwrap();
    assert_eq!(summary.categories, 1);
    assert_eq!(summary.sub_categories, 1);

    let query = MasterDataQuery::new(&conn);
    assert_eq!(query.category("1").unwrap().unwrap().category_name, "Plastic");
    assert_eq!(query.sub_category("11").unwrap().unwrap().sub_category_name, "PET");
    assert_eq!(query.category("4").unwrap().unwrap().category_name, "Glass");
    assert_eq!(query.sub_category("13").unwrap().unwrap().category_id, "1");
}

#[test]
fn sub_category_with_unknown_parent_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    let products: ProductList = serde_json::from_value(json!({
        "productList": [
            {"categoryId": "9", "categoryName": "Misc", "subcategory": []}
        ]
    }))
    .unwrap();
    MasterDataSync::new(&mut conn).apply(&products).unwrap();

    // Insert a dangling sub-category straight through a unit of work
    let result = conn.unit_of_work(|uow| {
        uow.execute(
            "INSERT INTO sub_category (sub_category_id, sub_category_name, category_id) VALUES (?, ?, ?)",
            duckdb::params!["99", "Orphan", "404"],
        )
    });
    assert!(result.is_err());
    assert_eq!(conn.count_rows("sub_category").unwrap(), 0);
    assert_eq!(conn.count_rows("category").unwrap(), 1);
}

// ---------------------------------------------------------------------------
// MasterDataQuery
// ---------------------------------------------------------------------------

#[test]
fn categories_are_ordered_numerically() {
    let mut conn = common::open_store();
    let extra: ProductList = serde_json::from_value(json!({
        "productList": [{"categoryId": "10", "categoryName": "E-waste", "subcategory": []}]
    }))
    .unwrap();
    MasterDataSync::new(&mut conn).apply(&extra).unwrap();

    let ids: Vec<String> = MasterDataQuery::new(&conn)
        .categories()
        .unwrap()
        .into_iter()
        .map(|c| c.category_id)
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "10"]);
}

#[test]
fn category_lookup() {
    let conn = common::open_store();
    let query = MasterDataQuery::new(&conn);

    assert_eq!(
        query.category("2").unwrap(),
        Some(Category {
            category_id: "2".into(),
            category_name: "Paper".into()
        })
    );
    assert!(query.category("missing").unwrap().is_none());
}

#[test]
fn sub_categories_of_category() {
    let conn = common::open_store();
    let subs = MasterDataQuery::new(&conn).sub_categories("1").unwrap();

    assert_eq!(
        subs,
        vec![
            SubCategory {
                sub_category_id: "11".into(),
                sub_category_name: "PET".into(),
                category_id: "1".into()
            },
            SubCategory {
                sub_category_id: "12".into(),
                sub_category_name: "HDPE".into(),
                category_id: "1".into()
            },
        ]
    );
    assert!(MasterDataQuery::new(&conn).sub_categories("missing").unwrap().is_empty());
}
