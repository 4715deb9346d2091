//! Constraint enforcement at the storage layer: uniqueness, deletion
//! policy, numeric guards, and timestamp maintenance.

mod common;

use common::{category, customer, money, product, store};
use sea_query::Values;
use shopkeeper::entity::category::{Categories, NewCategory};
use shopkeeper::entity::customer::Customers;
use shopkeeper::entity::order::{NewOrder, Orders, OrderStatus};
use shopkeeper::entity::order_item::{NewOrderItem, OrderItems};
use shopkeeper::entity::product::{NewProduct, Products};
use shopkeeper::entity::product_detail::{NewProductDetail, ProductDetails};
use shopkeeper::entity::product_supplier::{NewProductSupplier, ProductSuppliers};
use shopkeeper::entity::product_tag::ProductTags;
use shopkeeper::entity::review::{NewReview, Reviews};
use shopkeeper::entity::supplier::{NewSupplier, Suppliers};
use shopkeeper::entity::tag::{NewTag, Tags};
use shopkeeper::entity::user::{NewUser, Users};
use shopkeeper::{EntityTrait, StoreError, StoreExecutor};

#[test]
fn negative_price_is_rejected_before_any_write() {
    let store = store();
    let books = category(&store, "Books");
    let err = Products::insert(
        &store,
        &NewProduct {
            name: "Broken".into(),
            description: None,
            price: money("-1.00"),
            category_id: books.id,
            stock_quantity: 1,
            created_by: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "price"));
    assert_eq!(Products::find().count(&store).unwrap(), 0);
}

#[test]
fn check_constraints_hold_against_direct_writes() {
    let store = store();
    let books = category(&store, "Books");

    // Writes that bypass the crate's validation still hit the CHECKs.
    let err = store
        .execute_batch(&format!(
            "INSERT INTO products (name, price, category_id) VALUES ('X', -1, {})",
            books.id
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    let err = store
        .execute_batch(&format!(
            "INSERT INTO products (name, price, category_id, stock_quantity) \
             VALUES ('X', 1, {}, -5)",
            books.id
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}

#[test]
fn product_name_is_unique_per_category() {
    let store = store();
    let books = category(&store, "Books");
    let games = category(&store, "Games");
    product(&store, "Atlas", books.id, "10.00", 1);

    let err = Products::insert(
        &store,
        &NewProduct {
            name: "Atlas".into(),
            description: None,
            price: money("12.00"),
            category_id: books.id,
            stock_quantity: 1,
            created_by: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Unique { .. }));

    // Same name under another category is fine.
    product(&store, "Atlas", games.id, "12.00", 1);
    assert_eq!(Products::find().count(&store).unwrap(), 2);
}

#[test]
fn category_with_products_cannot_be_deleted() {
    let store = store();
    let books = category(&store, "Books");
    let empty = category(&store, "Empty");
    product(&store, "Atlas", books.id, "10.00", 1);

    let err = Categories::delete(&store, books.id).unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { .. }));

    Categories::delete(&store, empty.id).unwrap();
    assert!(matches!(
        Categories::find_by_id(&store, empty.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn product_deletion_cascades_its_satellites() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "10.00", 1);
    let acme = Suppliers::insert(
        &store,
        &NewSupplier {
            company_name: "Acme".into(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            created_by: None,
        },
    )
    .unwrap();
    let sale = Tags::insert(
        &store,
        &NewTag {
            name: "sale".into(),
            description: None,
        },
    )
    .unwrap();
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    ProductDetails::insert(
        &store,
        &NewProductDetail {
            product_id: atlas.id,
            weight_kg: Some(money("1.250")),
            dimensions: None,
            manufacturer: None,
            warranty_months: Some(12),
        },
    )
    .unwrap();
    ProductSuppliers::link(
        &store,
        &NewProductSupplier {
            product_id: atlas.id,
            supplier_id: acme.id,
            purchase_price: money("6.00"),
            delivery_days: 3,
        },
    )
    .unwrap();
    ProductTags::link(&store, atlas.id, sale.id).unwrap();
    Reviews::insert(
        &store,
        &NewReview {
            product_id: atlas.id,
            customer_id: ada.id,
            rating: 4,
            comment: None,
        },
    )
    .unwrap();

    Products::delete(&store, atlas.id).unwrap();

    assert!(matches!(
        ProductDetails::find_by_product(&store, atlas.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert!(ProductSuppliers::for_product(&store, atlas.id).unwrap().is_empty());
    assert!(Tags::for_product(&store, atlas.id).unwrap().is_empty());
    assert!(Reviews::for_product(&store, atlas.id).unwrap().is_empty());
    // The tag and supplier themselves survive.
    assert_eq!(Tags::find().count(&store).unwrap(), 1);
    assert_eq!(Suppliers::find().count(&store).unwrap(), 1);
}

#[test]
fn product_with_order_items_cannot_be_deleted() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "10.00", 5);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    let order = Orders::insert(
        &store,
        &NewOrder {
            customer_id: ada.id,
            total_amount: money("10.00"),
            status: OrderStatus::Pending,
            created_by: None,
        },
    )
    .unwrap();
    OrderItems::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: atlas.id,
            quantity: 1,
            unit_price: money("10.00"),
        },
    )
    .unwrap();

    let err = Products::delete(&store, atlas.id).unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { .. }));
    assert!(Products::find_by_id(&store, atlas.id).is_ok());
}

#[test]
fn rating_bounds_are_enforced() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "10.00", 1);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    for bad in [0u8, 6] {
        let err = Reviews::insert(
            &store,
            &NewReview {
                product_id: atlas.id,
                customer_id: ada.id,
                rating: bad,
                comment: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }), "rating {bad}");
    }
    for good in [1u8, 5] {
        Reviews::insert(
            &store,
            &NewReview {
                product_id: atlas.id,
                customer_id: ada.id,
                rating: good,
                comment: None,
            },
        )
        .unwrap();
    }

    // Storage-level guard for writes that skip validation.
    let err = store
        .execute_batch(&format!(
            "INSERT INTO reviews (product_id, customer_id, rating) VALUES ({}, {}, 6)",
            atlas.id, ada.id
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}

#[test]
fn order_item_quantity_and_pair_uniqueness() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "10.00", 5);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    let order = Orders::insert(
        &store,
        &NewOrder {
            customer_id: ada.id,
            total_amount: money("10.00"),
            status: OrderStatus::Pending,
            created_by: None,
        },
    )
    .unwrap();

    let err = OrderItems::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: atlas.id,
            quantity: 0,
            unit_price: money("10.00"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "quantity"));

    OrderItems::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: atlas.id,
            quantity: 1,
            unit_price: money("10.00"),
        },
    )
    .unwrap();

    let err = OrderItems::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: atlas.id,
            quantity: 2,
            unit_price: money("10.00"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Unique { .. }));
}

#[test]
fn deleting_a_user_nullifies_creator_references() {
    let store = store();
    let clerk = Users::insert(
        &store,
        &NewUser {
            username: "clerk".into(),
        },
    )
    .unwrap();
    let books = Categories::insert(
        &store,
        &NewCategory {
            name: "Books".into(),
            description: None,
            main_supplier_id: None,
            created_by: Some(clerk.id),
        },
    )
    .unwrap();
    assert_eq!(books.created_by, Some(clerk.id));

    Users::delete(&store, clerk.id).unwrap();
    let books = Categories::find_by_id(&store, books.id).unwrap();
    assert_eq!(books.created_by, None);
}

#[test]
fn deleting_a_supplier_nullifies_main_supplier() {
    let store = store();
    let acme = Suppliers::insert(
        &store,
        &NewSupplier {
            company_name: "Acme".into(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            created_by: None,
        },
    )
    .unwrap();
    let books = Categories::insert(
        &store,
        &NewCategory {
            name: "Books".into(),
            description: None,
            main_supplier_id: Some(acme.id),
            created_by: None,
        },
    )
    .unwrap();

    Suppliers::delete(&store, acme.id).unwrap();
    let books = Categories::find_by_id(&store, books.id).unwrap();
    assert_eq!(books.main_supplier_id, None);
}

#[test]
fn updated_at_refreshes_on_update() {
    let store = store();
    let mut books = category(&store, "Books");
    let first_seen = books.updated_at;

    std::thread::sleep(std::time::Duration::from_millis(10));
    books.description = Some("Printed matter".into());
    let books = Categories::update(&store, &books).unwrap();
    assert!(books.updated_at > first_seen);
    assert_eq!(books.created_at, first_seen);
}

#[test]
fn updated_at_refreshes_even_for_direct_writes() {
    let store = store();
    let books = category(&store, "Books");
    let first_seen = books.updated_at;

    std::thread::sleep(std::time::Duration::from_millis(10));
    store
        .execute_batch(&format!(
            "UPDATE categories SET name = 'Tomes' WHERE id = {}",
            books.id
        ))
        .unwrap();
    let books = Categories::find_by_id(&store, books.id).unwrap();
    assert_eq!(books.name, "Tomes");
    assert!(books.updated_at > first_seen);
}

#[test]
fn timestamps_are_server_assigned() {
    let store = store();
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    std::thread::sleep(std::time::Duration::from_millis(10));
    let bob = customer(&store, "Bob", "Babbage", "bob@example.com");
    assert!(bob.registration_date > ada.registration_date);
    assert!(bob.created_at >= ada.created_at);
    // The payload carries no timestamp fields at all; refetching yields the
    // same stored values.
    assert_eq!(
        Customers::find_by_id(&store, ada.id).unwrap().registration_date,
        ada.registration_date
    );
}

#[test]
fn duplicate_email_is_a_uniqueness_violation() {
    let store = store();
    customer(&store, "Ada", "Lovelace", "ada@example.com");
    let err = Customers::insert(
        &store,
        &shopkeeper::entity::customer::NewCustomer {
            first_name: "Imposter".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            created_by: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Unique { .. }));
}

#[test]
fn lookups_report_not_found() {
    let store = store();
    match Products::find_by_id(&store, 999) {
        Err(StoreError::NotFound { entity, key }) => {
            assert_eq!(entity, "products");
            assert_eq!(key, "999");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn schema_creation_is_idempotent() {
    let store = store();
    shopkeeper::schema::create_all(&store).unwrap();
    let row = store
        .query_one(
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            &Values(vec![]),
        )
        .unwrap();
    assert_eq!(row.get::<i64>("n").unwrap(), 12);
}

#[test]
fn models_serialize_for_api_consumers() {
    let store = store();
    let books = category(&store, "Books");
    let json = serde_json::to_value(&books).unwrap();
    assert_eq!(json["name"], "Books");
    assert_eq!(json["is_active"], true);
}
