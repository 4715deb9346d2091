//! Products.
//!
//! The catalog's central entity. A product lives in exactly one category
//! (which cannot be deleted out from under it), is named uniquely within
//! that category, and is linked to suppliers and tags through join tables.
//!
//! Derived query helpers over products (availability, price range, tag
//! membership, rating aggregation) are on [`Select<Products>`]; see
//! [`crate::query::product`].
//!
//! [`Select<Products>`]: crate::query::Select

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::{Row, NOW_EXPR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    CategoryId,
    StockQuantity,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Default for Products {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    pub stock_quantity: u32,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for ProductModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            price: row.get_decimal("price", 2)?,
            category_id: row.get("category_id")?,
            stock_quantity: row.get("stock_quantity")?,
            created_by: row.get("created_by")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for ProductModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl EntityTrait for Products {
    type Model = ProductModel;
    const TABLE: &'static str = "products";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((Products::Table, Products::Name), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewProduct {
    fn validate(&self) -> Result<(), StoreError> {
        validate::require_text("name", &self.name, 200)?;
        validate::money("price", self.price)
    }
}

impl Products {
    /// Insert a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a bad name or price,
    /// [`StoreError::Unique`] when the category already has a product of
    /// that name, [`StoreError::ForeignKey`] when the category is missing.
    pub fn insert(exec: &dyn StoreExecutor, new: &NewProduct) -> Result<ProductModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::Description,
                Products::Price,
                Products::CategoryId,
                Products::StockQuantity,
                Products::CreatedBy,
            ])
            .values([
                new.name.clone().into(),
                new.description.clone().into(),
                new.price.into(),
                new.category_id.into(),
                new.stock_quantity.into(),
                new.created_by.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        ProductModel::from_row(&row)
    }

    /// Look a product up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such product exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<ProductModel, StoreError> {
        Products::find()
            .filter(Expr::col((Products::Table, Products::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// All products of one category, name order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn in_category(
        exec: &dyn StoreExecutor,
        category_id: i64,
    ) -> Result<Vec<ProductModel>, StoreError> {
        Products::find()
            .filter(Expr::col((Products::Table, Products::CategoryId)).eq(category_id))
            .all(exec)
    }

    /// Write back an edited product and return the refreshed row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same constraint errors as [`Products::insert`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &ProductModel,
    ) -> Result<ProductModel, StoreError> {
        validate::require_text("name", &model.name, 200)?;
        validate::money("price", model.price)?;
        let (sql, values) = Query::update()
            .table(Products::Table)
            .value(Products::Name, model.name.clone())
            .value(Products::Description, model.description.clone())
            .value(Products::Price, model.price)
            .value(Products::CategoryId, model.category_id)
            .value(Products::StockQuantity, model.stock_quantity)
            .value(Products::IsActive, model.is_active)
            .value(Products::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Products::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        ProductModel::from_row(&row)
    }

    /// Delete a product.
    ///
    /// Its detail row, supplier links, tag links, and reviews cascade; the
    /// delete is blocked while any order item references the product.
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignKey`] while order items reference the product,
    /// [`StoreError::NotFound`] when no such product exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
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
