//! # Shopkeeper
//!
//! Embedded catalog and order schema for shop applications, backed by
//! SQLite.
//!
//! The crate defines the relational data model of a shop — categories,
//! suppliers, products and their details, tags, customers, orders, order
//! items, reviews — with every integrity rule (uniqueness, deletion
//! policy, numeric ranges, server-assigned timestamps) enforced at the
//! storage layer, plus composable lazily-evaluated query helpers over the
//! product catalog.
//!
//! ```no_run
//! use rust_decimal::Decimal;
//! use shopkeeper::entity::category::{Categories, NewCategory};
//! use shopkeeper::entity::product::{NewProduct, Products};
//! use shopkeeper::{schema, EntityTrait, SqliteStore};
//!
//! # fn main() -> Result<(), shopkeeper::StoreError> {
//! let store = SqliteStore::open_in_memory()?;
//! schema::create_all(&store)?;
//!
//! let books = Categories::insert(&store, &NewCategory {
//!     name: "Books".into(),
//!     description: None,
//!     main_supplier_id: None,
//!     created_by: None,
//! })?;
//! Products::insert(&store, &NewProduct {
//!     name: "Rust in Practice".into(),
//!     description: None,
//!     price: Decimal::new(3499, 2),
//!     category_id: books.id,
//!     stock_quantity: 12,
//!     created_by: None,
//! })?;
//!
//! let in_stock = Products::find().available().all(&store)?;
//! assert_eq!(in_stock.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod query;
pub mod schema;
pub mod transaction;
mod validate;
pub mod value;

pub use config::StoreConfig;
pub use error::StoreError;
pub use executor::{SqliteStore, StoreExecutor};
pub use query::{EntityTrait, FromRow, ProductWithRating, Select, SelectWithRating};
pub use transaction::Transaction;
pub use value::Row;
