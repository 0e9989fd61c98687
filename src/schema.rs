//! Table definitions for master data and the transaction hierarchy.
//!
//! Applied with `CREATE ... IF NOT EXISTS`, so running it against an existing
//! database is a no-op.

/// Tables in foreign-key order (parents before children).
pub const TABLES: &[&str] = &[
    "category",
    "sub_category",
    "\"transaction\"",
    "transaction_parties",
    "transaction_category",
    "transaction_items",
];

pub const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS seq_transaction START 1;
CREATE SEQUENCE IF NOT EXISTS seq_transaction_parties START 1;
CREATE SEQUENCE IF NOT EXISTS seq_transaction_category START 1;
CREATE SEQUENCE IF NOT EXISTS seq_transaction_items START 1;

CREATE TABLE IF NOT EXISTS category (
    category_id VARCHAR PRIMARY KEY,
    category_name VARCHAR NOT NULL,
    status INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS sub_category (
    sub_category_id VARCHAR PRIMARY KEY,
    sub_category_name VARCHAR NOT NULL,
    category_id VARCHAR NOT NULL REFERENCES category (category_id),
    status INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS \"transaction\" (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_transaction'),
    order_id VARCHAR NOT NULL,
    order_finished_date TIMESTAMP NOT NULL,
    transaction_type VARCHAR NOT NULL CHECK (transaction_type IN ('B', 'S'))
);

CREATE TABLE IF NOT EXISTS transaction_parties (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_transaction_parties'),
    transaction_id BIGINT NOT NULL REFERENCES \"transaction\" (id),
    parties_type VARCHAR NOT NULL CHECK (parties_type IN ('CM', 'T', 'C')),
    role_name VARCHAR,
    name VARCHAR,
    id_name VARCHAR
);

CREATE TABLE IF NOT EXISTS transaction_category (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_transaction_category'),
    transaction_id BIGINT NOT NULL REFERENCES \"transaction\" (id),
    category_id VARCHAR,
    sub_category_id VARCHAR
);

CREATE TABLE IF NOT EXISTS transaction_items (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_transaction_items'),
    transaction_category_id BIGINT NOT NULL REFERENCES transaction_category (id),
    grade VARCHAR,
    price DECIMAL(18,4) NOT NULL,
    quantity VARCHAR NOT NULL CHECK (TRY_CAST(quantity AS DECIMAL(18,4)) IS NOT NULL),
    total DECIMAL(18,4)
);
";
