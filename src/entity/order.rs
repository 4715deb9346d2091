//! Orders.
//!
//! An order belongs to one customer (who cannot be deleted while orders
//! reference them) and holds a monetary total plus a lifecycle status.
//! Placing an order together with its items is a single transaction; see
//! [`place`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_query::{Expr, Iden, Order as SortOrder, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::order_item::{NewOrderItem, OrderItemModel, OrderItems};
use crate::error::StoreError;
use crate::executor::{SqliteStore, StoreExecutor};
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::{Row, NOW_EXPR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Orders {
    Table,
    Id,
    CustomerId,
    OrderDate,
    TotalAmount,
    Status,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Default for Orders {
    fn default() -> Self {
        Self::Table
    }
}

/// Order lifecycle status.
///
/// A closed set; every consumer matches exhaustively, so adding a state is
/// a compile-visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// All states, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
    ];
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(StoreError::Value(format!("unknown order status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderModel {
    pub id: i64,
    pub customer_id: i64,
    /// Assigned by the store at insert time.
    pub order_date: NaiveDateTime,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for OrderModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            customer_id: row.get("customer_id")?,
            order_date: row.get("order_date")?,
            total_amount: row.get_decimal("total_amount", 2)?,
            status: row.get::<String>("status")?.parse()?,
            created_by: row.get("created_by")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for OrderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}

impl EntityTrait for Orders {
    type Model = OrderModel;
    const TABLE: &'static str = "orders";

    // Newest first.
    fn order_default(query: &mut SelectStatement) {
        query.order_by((Orders::Table, Orders::OrderDate), SortOrder::Desc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewOrder {
    fn validate(&self) -> Result<(), StoreError> {
        validate::money("total_amount", self.total_amount)
    }
}

/// One line of an order being placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl Orders {
    /// Insert an order row. Prefer [`place`] when items are involved.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a bad total,
    /// [`StoreError::ForeignKey`] when the customer is missing.
    pub fn insert(exec: &dyn StoreExecutor, new: &NewOrder) -> Result<OrderModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Orders::Table)
            .columns([
                Orders::CustomerId,
                Orders::TotalAmount,
                Orders::Status,
                Orders::CreatedBy,
            ])
            .values([
                new.customer_id.into(),
                new.total_amount.into(),
                new.status.as_str().into(),
                new.created_by.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        OrderModel::from_row(&row)
    }

    /// Look an order up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such order exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<OrderModel, StoreError> {
        Orders::find()
            .filter(Expr::col((Orders::Table, Orders::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_customer(
        exec: &dyn StoreExecutor,
        customer_id: i64,
    ) -> Result<Vec<OrderModel>, StoreError> {
        Orders::find()
            .filter(Expr::col((Orders::Table, Orders::CustomerId)).eq(customer_id))
            .all(exec)
    }

    /// Orders currently in the given status, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn with_status(
        exec: &dyn StoreExecutor,
        status: OrderStatus,
    ) -> Result<Vec<OrderModel>, StoreError> {
        Orders::find()
            .filter(Expr::col((Orders::Table, Orders::Status)).eq(status.as_str()))
            .all(exec)
    }

    /// Move an order into a new status and return the refreshed row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such order exists.
    pub fn set_status(
        exec: &dyn StoreExecutor,
        id: i64,
        status: OrderStatus,
    ) -> Result<OrderModel, StoreError> {
        let (sql, values) = Query::update()
            .table(Orders::Table)
            .value(Orders::Status, status.as_str())
            .value(Orders::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Orders::Id).eq(id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })?;
        OrderModel::from_row(&row)
    }

    /// Delete an order; its items go with it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such order exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Orders::Table)
            .and_where(Expr::col(Orders::Id).eq(id))
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

/// Place an order with its items in one transaction.
///
/// The total is computed from the lines in `Decimal` arithmetic. Any
/// constraint failure (missing product, duplicate line for a product, bad
/// quantity) rolls the whole order back; no partial state survives.
///
/// # Errors
///
/// [`StoreError::Validation`] on an empty order or a bad line, plus any
/// constraint error from the individual inserts.
pub fn place(
    store: &SqliteStore,
    customer_id: i64,
    created_by: Option<i64>,
    lines: &[OrderLine],
) -> Result<(OrderModel, Vec<OrderItemModel>), StoreError> {
    if lines.is_empty() {
        return Err(StoreError::Validation {
            field: "lines".to_string(),
            message: "an order needs at least one line".to_string(),
        });
    }
    let mut total = Decimal::ZERO;
    for line in lines {
        validate::quantity("quantity", line.quantity)?;
        validate::money("unit_price", line.unit_price)?;
        total += Decimal::from(line.quantity) * line.unit_price;
    }
    validate::money("total_amount", total)?;

    let tx = store.begin()?;
    let order = Orders::insert(
        &tx,
        &NewOrder {
            customer_id,
            total_amount: total,
            status: OrderStatus::Pending,
            created_by,
        },
    )?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        items.push(OrderItems::insert(
            &tx,
            &NewOrderItem {
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            },
        )?);
    }
    tx.commit()?;
    log::info!("placed order #{} with {} line(s)", order.id, items.len());
    Ok((order, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
