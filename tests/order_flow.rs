//! Order placement and lifecycle: transactional writes, status handling,
//! and deletion policy around orders.

mod common;

use common::{category, customer, money, product, store};
use shopkeeper::entity::customer::Customers;
use shopkeeper::entity::order::{self, NewOrder, OrderLine, OrderStatus, Orders};
use shopkeeper::entity::order_item::OrderItems;
use shopkeeper::{EntityTrait, StoreError, StoreExecutor};

#[test]
fn placing_an_order_writes_order_and_items_atomically() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "19.99", 10);
    let globe = product(&store, "Globe", books.id, "5.00", 10);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    let (order, items) = order::place(
        &store,
        ada.id,
        None,
        &[
            OrderLine {
                product_id: atlas.id,
                quantity: 2,
                unit_price: money("19.99"),
            },
            OrderLine {
                product_id: globe.id,
                quantity: 1,
                unit_price: money("5.00"),
            },
        ],
    )
    .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, money("44.98"));
    assert_eq!(items.len(), 2);
    assert_eq!(OrderItems::for_order(&store, order.id).unwrap().len(), 2);
}

#[test]
fn failed_placement_leaves_no_partial_state() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "19.99", 10);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    // Second line references a product that does not exist; the first
    // line's writes must roll back with it.
    let err = order::place(
        &store,
        ada.id,
        None,
        &[
            OrderLine {
                product_id: atlas.id,
                quantity: 1,
                unit_price: money("19.99"),
            },
            OrderLine {
                product_id: 999,
                quantity: 1,
                unit_price: money("1.00"),
            },
        ],
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { .. }));
    assert_eq!(Orders::find().count(&store).unwrap(), 0);
    assert_eq!(OrderItems::find().count(&store).unwrap(), 0);
}

#[test]
fn duplicate_lines_for_one_product_roll_back() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "19.99", 10);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    let err = order::place(
        &store,
        ada.id,
        None,
        &[
            OrderLine {
                product_id: atlas.id,
                quantity: 1,
                unit_price: money("19.99"),
            },
            OrderLine {
                product_id: atlas.id,
                quantity: 2,
                unit_price: money("19.99"),
            },
        ],
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Unique { .. }));
    assert_eq!(Orders::find().count(&store).unwrap(), 0);
}

#[test]
fn empty_orders_are_rejected() {
    let store = store();
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    let err = order::place(&store, ada.id, None, &[]).unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}

#[test]
fn status_moves_through_the_closed_set() {
    let store = store();
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

    let order = Orders::set_status(&store, order.id, OrderStatus::Shipped).unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    let shipped = Orders::with_status(&store, OrderStatus::Shipped).unwrap();
    assert_eq!(shipped.len(), 1);
    assert!(Orders::with_status(&store, OrderStatus::Cancelled)
        .unwrap()
        .is_empty());
}

#[test]
fn unknown_status_text_is_rejected_by_the_store() {
    let store = store();
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    let err = store
        .execute_batch(&format!(
            "INSERT INTO orders (customer_id, total_amount, status) VALUES ({}, 1, 'bogus')",
            ada.id
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}

#[test]
fn deleting_an_order_cascades_its_items() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "19.99", 10);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");
    let (order, _) = order::place(
        &store,
        ada.id,
        None,
        &[OrderLine {
            product_id: atlas.id,
            quantity: 1,
            unit_price: money("19.99"),
        }],
    )
    .unwrap();

    Orders::delete(&store, order.id).unwrap();
    assert_eq!(OrderItems::find().count(&store).unwrap(), 0);
}

#[test]
fn customer_with_orders_cannot_be_deleted() {
    let store = store();
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

    let err = Customers::delete(&store, ada.id).unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { .. }));

    Orders::delete(&store, order.id).unwrap();
    Customers::delete(&store, ada.id).unwrap();
}

#[test]
fn manual_transactions_compose_entity_operations() {
    let store = store();
    let books = category(&store, "Books");
    let atlas = product(&store, "Atlas", books.id, "19.99", 10);
    let ada = customer(&store, "Ada", "Lovelace", "ada@example.com");

    // Roll a whole batch back by hand.
    {
        let tx = store.begin().unwrap();
        Orders::insert(
            &tx,
            &NewOrder {
                customer_id: ada.id,
                total_amount: money("19.99"),
                status: OrderStatus::Pending,
                created_by: None,
            },
        )
        .unwrap();
        tx.rollback().unwrap();
    }
    assert_eq!(Orders::find().count(&store).unwrap(), 0);

    // And commit one.
    let tx = store.begin().unwrap();
    let order = Orders::insert(
        &tx,
        &NewOrder {
            customer_id: ada.id,
            total_amount: money("19.99"),
            status: OrderStatus::Pending,
            created_by: None,
        },
    )
    .unwrap();
    OrderItems::insert(
        &tx,
        &shopkeeper::entity::order_item::NewOrderItem {
            order_id: order.id,
            product_id: atlas.id,
            quantity: 1,
            unit_price: money("19.99"),
        },
    )
    .unwrap();
    tx.commit().unwrap();
    assert_eq!(Orders::find().count(&store).unwrap(), 1);
    assert_eq!(OrderItems::for_order(&store, order.id).unwrap().len(), 1);
}
