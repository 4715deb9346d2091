//! Product↔supplier links.
//!
//! Join entity carrying the commercial terms of a supply relationship.
//! Each (product, supplier) pair links at most once; links vanish with
//! either parent.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_query::{Expr, Iden, Query, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::{Row, NOW_EXPR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum ProductSuppliers {
    Table,
    Id,
    ProductId,
    SupplierId,
    PurchasePrice,
    DeliveryDays,
    CreatedAt,
    UpdatedAt,
}

impl Default for ProductSuppliers {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSupplierModel {
    pub id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
    pub purchase_price: Decimal,
    pub delivery_days: u32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for ProductSupplierModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            supplier_id: row.get("supplier_id")?,
            purchase_price: row.get_decimal("purchase_price", 2)?,
            delivery_days: row.get("delivery_days")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for ProductSupplierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "product #{} from supplier #{}", self.product_id, self.supplier_id)
    }
}

impl EntityTrait for ProductSuppliers {
    type Model = ProductSupplierModel;
    const TABLE: &'static str = "product_suppliers";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductSupplier {
    pub product_id: i64,
    pub supplier_id: i64,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub delivery_days: u32,
}

impl NewProductSupplier {
    fn validate(&self) -> Result<(), StoreError> {
        validate::money("purchase_price", self.purchase_price)
    }
}

impl ProductSuppliers {
    /// Link a supplier to a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a bad purchase price,
    /// [`StoreError::Unique`] when the pair is already linked,
    /// [`StoreError::ForeignKey`] when either parent is missing.
    pub fn link(
        exec: &dyn StoreExecutor,
        new: &NewProductSupplier,
    ) -> Result<ProductSupplierModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(ProductSuppliers::Table)
            .columns([
                ProductSuppliers::ProductId,
                ProductSuppliers::SupplierId,
                ProductSuppliers::PurchasePrice,
                ProductSuppliers::DeliveryDays,
            ])
            .values([
                new.product_id.into(),
                new.supplier_id.into(),
                new.purchase_price.into(),
                new.delivery_days.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        ProductSupplierModel::from_row(&row)
    }

    /// All supply links of a product.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_product(
        exec: &dyn StoreExecutor,
        product_id: i64,
    ) -> Result<Vec<ProductSupplierModel>, StoreError> {
        ProductSuppliers::find()
            .filter(
                Expr::col((ProductSuppliers::Table, ProductSuppliers::ProductId)).eq(product_id),
            )
            .all(exec)
    }

    /// All supply links of a supplier.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_supplier(
        exec: &dyn StoreExecutor,
        supplier_id: i64,
    ) -> Result<Vec<ProductSupplierModel>, StoreError> {
        ProductSuppliers::find()
            .filter(
                Expr::col((ProductSuppliers::Table, ProductSuppliers::SupplierId)).eq(supplier_id),
            )
            .all(exec)
    }

    /// Update the commercial terms of a link.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the link no longer exists, plus the
    /// same validation as [`ProductSuppliers::link`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &ProductSupplierModel,
    ) -> Result<ProductSupplierModel, StoreError> {
        validate::money("purchase_price", model.purchase_price)?;
        let (sql, values) = Query::update()
            .table(ProductSuppliers::Table)
            .value(ProductSuppliers::PurchasePrice, model.purchase_price)
            .value(ProductSuppliers::DeliveryDays, model.delivery_days)
            .value(ProductSuppliers::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(ProductSuppliers::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        ProductSupplierModel::from_row(&row)
    }

    /// Remove the link between a product and a supplier.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the pair is not linked.
    pub fn unlink(
        exec: &dyn StoreExecutor,
        product_id: i64,
        supplier_id: i64,
    ) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(ProductSuppliers::Table)
            .and_where(Expr::col(ProductSuppliers::ProductId).eq(product_id))
            .and_where(Expr::col(ProductSuppliers::SupplierId).eq(supplier_id))
            .build(SqliteQueryBuilder);
        match exec.execute(&sql, &values)? {
            0 => Err(StoreError::NotFound {
                entity: Self::TABLE,
                key: format!("product {product_id} / supplier {supplier_id}"),
            }),
            _ => Ok(()),
        }
    }
}
