//! Order items.
//!
//! A line of an order: product, quantity, and the unit price at the time
//! of purchase. A product appears at most once per order. Items go with
//! their order; a product with items cannot be deleted.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    Quantity,
    UnitPrice,
    CreatedAt,
    UpdatedAt,
}

impl Default for OrderItems {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemModel {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl OrderItemModel {
    /// Line total in exact decimal arithmetic.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

impl FromRow for OrderItemModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            order_id: row.get("order_id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
            unit_price: row.get_decimal("unit_price", 2)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for OrderItemModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order #{} x{} of product #{}", self.order_id, self.quantity, self.product_id)
    }
}

impl EntityTrait for OrderItems {
    type Model = OrderItemModel;
    const TABLE: &'static str = "order_items";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((OrderItems::Table, OrderItems::Id), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl NewOrderItem {
    fn validate(&self) -> Result<(), StoreError> {
        validate::quantity("quantity", self.quantity)?;
        validate::money("unit_price", self.unit_price)
    }
}

impl OrderItems {
    /// Add a line to an order.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a zero quantity or bad price,
    /// [`StoreError::Unique`] when the order already has a line for the
    /// product, [`StoreError::ForeignKey`] when order or product is
    /// missing.
    pub fn insert(
        exec: &dyn StoreExecutor,
        new: &NewOrderItem,
    ) -> Result<OrderItemModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(OrderItems::Table)
            .columns([
                OrderItems::OrderId,
                OrderItems::ProductId,
                OrderItems::Quantity,
                OrderItems::UnitPrice,
            ])
            .values([
                new.order_id.into(),
                new.product_id.into(),
                new.quantity.into(),
                new.unit_price.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        OrderItemModel::from_row(&row)
    }

    /// All lines of an order, insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_order(
        exec: &dyn StoreExecutor,
        order_id: i64,
    ) -> Result<Vec<OrderItemModel>, StoreError> {
        OrderItems::find()
            .filter(Expr::col((OrderItems::Table, OrderItems::OrderId)).eq(order_id))
            .all(exec)
    }

    /// Remove a line from an order.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such line exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(OrderItems::Table)
            .and_where(Expr::col(OrderItems::Id).eq(id))
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn line_total_is_exact() {
        let item = OrderItemModel {
            id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            unit_price: Decimal::from_str("19.99").unwrap(),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        };
        assert_eq!(item.line_total(), Decimal::from_str("59.97").unwrap());
    }
}
