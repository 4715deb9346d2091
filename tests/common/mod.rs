//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use shopkeeper::entity::category::{Categories, CategoryModel, NewCategory};
use shopkeeper::entity::customer::{CustomerModel, Customers, NewCustomer};
use shopkeeper::entity::product::{NewProduct, ProductModel, Products};
use shopkeeper::{schema, SqliteStore};

/// Fresh in-memory store with the full schema applied.
pub fn store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("open in-memory store");
    schema::create_all(&store).expect("create schema");
    store
}

pub fn money(text: &str) -> Decimal {
    text.parse().expect("decimal literal")
}

pub fn category(store: &SqliteStore, name: &str) -> CategoryModel {
    Categories::insert(
        store,
        &NewCategory {
            name: name.to_string(),
            description: None,
            main_supplier_id: None,
            created_by: None,
        },
    )
    .expect("insert category")
}

pub fn product(
    store: &SqliteStore,
    name: &str,
    category_id: i64,
    price: &str,
    stock_quantity: u32,
) -> ProductModel {
    Products::insert(
        store,
        &NewProduct {
            name: name.to_string(),
            description: None,
            price: money(price),
            category_id,
            stock_quantity,
            created_by: None,
        },
    )
    .expect("insert product")
}

pub fn customer(store: &SqliteStore, first: &str, last: &str, email: &str) -> CustomerModel {
    Customers::insert(
        store,
        &NewCustomer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: None,
            created_by: None,
        },
    )
    .expect("insert customer")
}
