//! Query building and execution.
//!
//! [`Select`] is a lazily-evaluated query descriptor: combinators compose a
//! single `SELECT` statement and nothing touches the store until a terminal
//! call (`all`, `one`, `count`). Product-specific helpers (availability,
//! price range, tag membership, rating aggregation) live in [`product`].

pub mod product;
mod select;

pub use product::{ProductWithRating, SelectWithRating};
pub use select::Select;

use sea_query::SelectStatement;

use crate::error::StoreError;
use crate::value::Row;

/// Hydration of a model from a result row.
pub trait FromRow: Sized {
    /// Build the model from an owned result row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Value`] when a column is missing or does not
    /// convert.
    fn from_row(row: &Row) -> Result<Self, StoreError>;
}

/// An entity: a unit struct naming a table, tied to its row model.
///
/// The entity type itself is the table identifier (it implements
/// [`sea_query::Iden`]), mirroring how each table's `Column` enum names its
/// columns.
pub trait EntityTrait: sea_query::Iden + Default + Copy + 'static {
    /// Row model returned by queries against this entity.
    type Model: FromRow;

    /// Stable table name (for error messages and lookups).
    const TABLE: &'static str;

    /// Start a select over this entity.
    fn find() -> Select<Self> {
        Select::new()
    }

    /// Apply the entity's default ordering. Called for queries that did not
    /// order explicitly.
    fn order_default(_query: &mut SelectStatement) {}
}
