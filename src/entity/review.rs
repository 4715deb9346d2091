//! Product reviews.
//!
//! A customer's rating (1–5) of a product, with an optional comment.
//! Reviews vanish with either their product or their customer.

use chrono::NaiveDateTime;
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::{Row, NOW_EXPR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Reviews {
    Table,
    Id,
    ProductId,
    CustomerId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}

impl Default for Reviews {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewModel {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for ReviewModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            customer_id: row.get("customer_id")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for ReviewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "product #{} rated {}/5 by customer #{}",
            self.product_id, self.rating, self.customer_id
        )
    }
}

impl EntityTrait for Reviews {
    type Model = ReviewModel;
    const TABLE: &'static str = "reviews";

    // Newest first.
    fn order_default(query: &mut SelectStatement) {
        query.order_by((Reviews::Table, Reviews::CreatedAt), Order::Desc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewReview {
    fn validate(&self) -> Result<(), StoreError> {
        validate::rating("rating", self.rating)
    }
}

impl Reviews {
    /// Insert a review.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a rating outside `[1, 5]`,
    /// [`StoreError::ForeignKey`] when product or customer is missing.
    pub fn insert(exec: &dyn StoreExecutor, new: &NewReview) -> Result<ReviewModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Reviews::Table)
            .columns([
                Reviews::ProductId,
                Reviews::CustomerId,
                Reviews::Rating,
                Reviews::Comment,
            ])
            .values([
                new.product_id.into(),
                new.customer_id.into(),
                new.rating.into(),
                new.comment.clone().into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        ReviewModel::from_row(&row)
    }

    /// All reviews of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_product(
        exec: &dyn StoreExecutor,
        product_id: i64,
    ) -> Result<Vec<ReviewModel>, StoreError> {
        Reviews::find()
            .filter(Expr::col((Reviews::Table, Reviews::ProductId)).eq(product_id))
            .all(exec)
    }

    /// Update a review's rating and comment.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the review no longer exists, plus the
    /// same validation as [`Reviews::insert`].
    pub fn update(exec: &dyn StoreExecutor, model: &ReviewModel) -> Result<ReviewModel, StoreError> {
        validate::rating("rating", model.rating)?;
        let (sql, values) = Query::update()
            .table(Reviews::Table)
            .value(Reviews::Rating, model.rating)
            .value(Reviews::Comment, model.comment.clone())
            .value(Reviews::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Reviews::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        ReviewModel::from_row(&row)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such review exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Reviews::Table)
            .and_where(Expr::col(Reviews::Id).eq(id))
            .build(SqliteQueryBuilder);
        match exec.execute(&sql, &values)? {
            0 => Err(StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
