//! Product↔tag links.
//!
//! Bare join entity: no timestamps, no payload. Each (product, tag) pair
//! links at most once; links vanish with either parent.

use sea_query::{Expr, Iden, Query, SqliteQueryBuilder};
use serde::Serialize;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::value::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum ProductTags {
    Table,
    Id,
    ProductId,
    TagId,
}

impl Default for ProductTags {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTagModel {
    pub id: i64,
    pub product_id: i64,
    pub tag_id: i64,
}

impl FromRow for ProductTagModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            tag_id: row.get("tag_id")?,
        })
    }
}

impl EntityTrait for ProductTags {
    type Model = ProductTagModel;
    const TABLE: &'static str = "product_tags";
}

impl ProductTags {
    /// Attach a tag to a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unique`] when the product already carries the tag,
    /// [`StoreError::ForeignKey`] when either parent is missing.
    pub fn link(
        exec: &dyn StoreExecutor,
        product_id: i64,
        tag_id: i64,
    ) -> Result<ProductTagModel, StoreError> {
        let (sql, values) = Query::insert()
            .into_table(ProductTags::Table)
            .columns([ProductTags::ProductId, ProductTags::TagId])
            .values([product_id.into(), tag_id.into()])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        ProductTagModel::from_row(&row)
    }

    /// Detach a tag from a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the product does not carry the tag.
    pub fn unlink(
        exec: &dyn StoreExecutor,
        product_id: i64,
        tag_id: i64,
    ) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(ProductTags::Table)
            .and_where(Expr::col(ProductTags::ProductId).eq(product_id))
            .and_where(Expr::col(ProductTags::TagId).eq(tag_id))
            .build(SqliteQueryBuilder);
        match exec.execute(&sql, &values)? {
            0 => Err(StoreError::NotFound {
                entity: Self::TABLE,
                key: format!("product {product_id} / tag {tag_id}"),
            }),
            _ => Ok(()),
        }
    }
}
