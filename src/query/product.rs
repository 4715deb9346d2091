//! Derived query helpers over products.
//!
//! Four composable restrictions/augmentations on [`Select<Products>`]:
//! availability, inclusive price range, tag membership, and rating
//! aggregation. Each returns a new descriptor; everything composed renders
//! into one SQL statement at the terminal call.
//!
//! `with_rating` changes the row shape, so it switches the descriptor type
//! to [`SelectWithRating`], which hydrates [`ProductWithRating`] and keeps
//! the same combinators.

use rust_decimal::Decimal;
use sea_query::{
    Alias, Expr, Func, IntoColumnRef, IntoCondition, Order, Query, SelectStatement,
    SqliteQueryBuilder,
};
use serde::Serialize;

use crate::entity::product::{ProductModel, Products};
use crate::entity::product_tag::ProductTags;
use crate::entity::review::Reviews;
use crate::entity::tag::Tags;
use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow, Select};

impl Select<Products> {
    /// Restrict to products that can actually be sold: positive stock and
    /// the active flag set.
    pub fn available(mut self) -> Self {
        apply_available(&mut self.query);
        self
    }

    /// Restrict to products priced within `[low, high]`, inclusive.
    pub fn priced_between(mut self, low: Decimal, high: Decimal) -> Self {
        apply_priced_between(&mut self.query, low, high);
        self
    }

    /// Restrict to products carrying the named tag.
    pub fn by_tag(mut self, tag_name: &str) -> Self {
        apply_by_tag(&mut self.query, tag_name);
        self
    }

    /// Augment each product with its distinct review count and mean rating.
    ///
    /// The mean is `None` for products with no reviews. Further
    /// composition stays available on the returned descriptor.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_decimal::Decimal;
    /// use shopkeeper::entity::product::Products;
    /// use shopkeeper::{EntityTrait, SqliteStore};
    ///
    /// # fn main() -> Result<(), shopkeeper::StoreError> {
    /// # let store = SqliteStore::open_in_memory()?;
    /// let rated = Products::find()
    ///     .available()
    ///     .priced_between(Decimal::new(1000, 2), Decimal::new(5000, 2))
    ///     .with_rating()
    ///     .all(&store)?;
    /// for product in rated {
    ///     println!("{}: {:?} over {} reviews",
    ///         product.product.name, product.avg_rating, product.review_count);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rating(mut self) -> SelectWithRating {
        self.query
            .expr_as(
                Func::count_distinct(Expr::col((Reviews::Table, Reviews::Id))),
                Alias::new("review_count"),
            )
            .expr_as(
                Func::avg(Expr::col((Reviews::Table, Reviews::Rating))),
                Alias::new("avg_rating"),
            )
            .left_join(
                Reviews::Table,
                Expr::col((Reviews::Table, Reviews::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .group_by_col((Products::Table, Products::Id));
        SelectWithRating {
            query: self.query,
            ordered: self.ordered,
        }
    }
}

/// A product joined with its review aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithRating {
    #[serde(flatten)]
    pub product: ProductModel,
    /// Distinct reviews counted for this product.
    pub review_count: i64,
    /// Arithmetic mean of the ratings; `None` with zero reviews.
    pub avg_rating: Option<f64>,
}

impl FromRow for ProductWithRating {
    fn from_row(row: &crate::value::Row) -> Result<Self, StoreError> {
        Ok(Self {
            product: ProductModel::from_row(row)?,
            review_count: row.get("review_count")?,
            avg_rating: row.get("avg_rating")?,
        })
    }
}

/// Product select augmented with rating aggregates.
///
/// Produced by [`Select::with_rating`]; composes like [`Select`] but
/// hydrates [`ProductWithRating`].
pub struct SelectWithRating {
    query: SelectStatement,
    ordered: bool,
}

impl SelectWithRating {
    /// See [`Select::available`].
    pub fn available(mut self) -> Self {
        apply_available(&mut self.query);
        self
    }

    /// See [`Select::priced_between`].
    pub fn priced_between(mut self, low: Decimal, high: Decimal) -> Self {
        apply_priced_between(&mut self.query, low, high);
        self
    }

    /// See [`Select::by_tag`].
    pub fn by_tag(mut self, tag_name: &str) -> Self {
        apply_by_tag(&mut self.query, tag_name);
        self
    }

    /// Add a filter condition, AND-combined with previous filters.
    pub fn filter<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.query.cond_where(condition);
        self
    }

    /// Order the result set, replacing the default name ordering.
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

    /// Execute and return every matching product with its aggregate.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution or hydration.
    pub fn all(mut self, exec: &dyn StoreExecutor) -> Result<Vec<ProductWithRating>, StoreError> {
        if !self.ordered {
            Products::order_default(&mut self.query);
        }
        let (sql, values) = self.query.build(SqliteQueryBuilder);
        let rows = exec.query_all(&sql, &values)?;
        rows.iter().map(ProductWithRating::from_row).collect()
    }

    /// Execute and return the first matching product, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution or hydration.
    pub fn one(mut self, exec: &dyn StoreExecutor) -> Result<Option<ProductWithRating>, StoreError> {
        if !self.ordered {
            Products::order_default(&mut self.query);
        }
        self.query.limit(1);
        let (sql, values) = self.query.build(SqliteQueryBuilder);
        match exec.query_opt(&sql, &values)? {
            Some(row) => Ok(Some(ProductWithRating::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

fn apply_available(query: &mut SelectStatement) {
    query
        .and_where(Expr::col((Products::Table, Products::StockQuantity)).gt(0))
        .and_where(Expr::col((Products::Table, Products::IsActive)).eq(true));
}

fn apply_priced_between(query: &mut SelectStatement, low: Decimal, high: Decimal) {
    query.and_where(Expr::col((Products::Table, Products::Price)).between(low, high));
}

// Tag membership as a correlated EXISTS: semantically a join through the
// unique (product, tag) link, but it composes with the rating GROUP BY
// without fanning rows out.
fn apply_by_tag(query: &mut SelectStatement, tag_name: &str) {
    let mut linked = Query::select();
    linked
        .expr(Expr::value(1))
        .from(ProductTags::Table)
        .inner_join(
            Tags::Table,
            Expr::col((Tags::Table, Tags::Id)).equals((ProductTags::Table, ProductTags::TagId)),
        )
        .and_where(
            Expr::col((ProductTags::Table, ProductTags::ProductId))
                .equals((Products::Table, Products::Id)),
        )
        .and_where(Expr::col((Tags::Table, Tags::Name)).eq(tag_name));
    query.and_where(Expr::exists(linked));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_compose_into_one_statement() {
        let select = Products::find()
            .available()
            .priced_between(Decimal::new(1000, 2), Decimal::new(9000, 2))
            .by_tag("sale")
            .with_rating();
        let (sql, values) = select.query.build(SqliteQueryBuilder);
        assert!(sql.contains("\"stock_quantity\" > "));
        assert!(sql.contains("BETWEEN"));
        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("LEFT JOIN \"reviews\""));
        assert!(sql.contains("GROUP BY"));
        // One statement, all placeholders bound.
        assert_eq!(sql.matches("SELECT").count(), 2); // outer + EXISTS subquery
        assert_eq!(values.iter().count(), sql.matches('?').count());
    }

    #[test]
    fn base_select_is_table_qualified() {
        let (sql, _) = Products::find().available().query.build(SqliteQueryBuilder);
        assert!(sql.starts_with("SELECT \"products\".*"));
    }
}
