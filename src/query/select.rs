//! Select query builder.
//!
//! Following SeaORM's pattern: `Select<E>` where `E` is the entity, and the
//! row model is reached through the associated type `E::Model`.

use sea_query::{
    Alias, Asterisk, Expr, IntoColumnRef, IntoCondition, Order, Query, SelectStatement,
    SqliteQueryBuilder,
};
use std::marker::PhantomData;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};

/// Lazily-evaluated, further-filterable query over an entity.
///
/// Combinators return a new descriptor; nothing executes until `all`,
/// `one`, or `count`. Queries without an explicit ordering fall back to the
/// entity's default ordering.
///
/// # Examples
///
/// ```no_run
/// use sea_query::{Expr, Order};
/// use shopkeeper::entity::product::Products;
/// use shopkeeper::{EntityTrait, SqliteStore};
///
/// # fn main() -> Result<(), shopkeeper::StoreError> {
/// # let store = SqliteStore::open_in_memory()?;
/// let cheap_first = Products::find()
///     .filter(Expr::col((Products::Table, Products::StockQuantity)).gt(0))
///     .order_by((Products::Table, Products::Price), Order::Asc)
///     .limit(10)
///     .all(&store)?;
/// # Ok(())
/// # }
/// ```
pub struct Select<E>
where
    E: EntityTrait,
{
    pub(crate) query: SelectStatement,
    pub(crate) ordered: bool,
    _entity: PhantomData<E>,
}

impl<E> Select<E>
where
    E: EntityTrait,
{
    pub(crate) fn new() -> Self {
        let mut query = Query::select();
        // Table-qualified asterisk: joins added later must not leak their
        // columns into the hydrated model.
        query.column((E::default(), Asterisk)).from(E::default());
        Self {
            query,
            ordered: false,
            _entity: PhantomData,
        }
    }

    /// Add a filter condition, AND-combined with previous filters.
    pub fn filter<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.query.cond_where(condition);
        self
    }

    /// Order the result set, replacing the entity's default ordering.
    pub fn order_by<C: IntoColumnRef>(mut self, column: C, order: Order) -> Self {
        self.query.order_by(column, order);
        self.ordered = true;
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit(limit);
        self
    }

    /// Skip the first `offset` rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset(offset);
        self
    }

    /// Execute and return every matching row as a model.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution or hydration.
    pub fn all(mut self, exec: &dyn StoreExecutor) -> Result<Vec<E::Model>, StoreError> {
        if !self.ordered {
            E::order_default(&mut self.query);
        }
        let (sql, values) = self.query.build(SqliteQueryBuilder);
        let rows = exec.query_all(&sql, &values)?;
        rows.iter().map(E::Model::from_row).collect()
    }

    /// Execute and return the first matching row, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution or hydration.
    pub fn one(mut self, exec: &dyn StoreExecutor) -> Result<Option<E::Model>, StoreError> {
        if !self.ordered {
            E::order_default(&mut self.query);
        }
        self.query.limit(1);
        let (sql, values) = self.query.build(SqliteQueryBuilder);
        match exec.query_opt(&sql, &values)? {
            Some(row) => Ok(Some(E::Model::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Execute `SELECT COUNT(*)` over the composed query.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn count(self, exec: &dyn StoreExecutor) -> Result<u64, StoreError> {
        let mut outer = Query::select();
        outer
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("row_count"))
            .from_subquery(self.query, Alias::new("counted"));
        let (sql, values) = outer.build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        let count: i64 = row.get("row_count")?;
        Ok(count as u64)
    }
}
