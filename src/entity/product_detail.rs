//! Product details.
//!
//! One-to-one extension of a product for bulky, rarely-queried attributes.
//! The row disappears with its product.

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
pub enum ProductDetails {
    Table,
    Id,
    ProductId,
    WeightKg,
    Dimensions,
    Manufacturer,
    WarrantyMonths,
    CreatedAt,
    UpdatedAt,
}

impl Default for ProductDetails {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailModel {
    pub id: i64,
    pub product_id: i64,
    pub weight_kg: Option<Decimal>,
    pub dimensions: Option<String>,
    pub manufacturer: Option<String>,
    pub warranty_months: Option<u32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for ProductDetailModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            weight_kg: row.get_decimal_opt("weight_kg", 3)?,
            dimensions: row.get("dimensions")?,
            manufacturer: row.get("manufacturer")?,
            warranty_months: row.get("warranty_months")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for ProductDetailModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "details for product #{}", self.product_id)
    }
}

impl EntityTrait for ProductDetails {
    type Model = ProductDetailModel;
    const TABLE: &'static str = "product_details";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductDetail {
    pub product_id: i64,
    #[serde(default)]
    pub weight_kg: Option<Decimal>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub warranty_months: Option<u32>,
}

impl NewProductDetail {
    fn validate(&self) -> Result<(), StoreError> {
        if let Some(weight) = self.weight_kg {
            validate::weight("weight_kg", weight)?;
        }
        validate::optional_text("dimensions", self.dimensions.as_deref(), 50)?;
        validate::optional_text("manufacturer", self.manufacturer.as_deref(), 100)
    }
}

impl ProductDetails {
    /// Attach a detail row to a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unique`] when the product already has details,
    /// [`StoreError::ForeignKey`] when the product is missing.
    pub fn insert(
        exec: &dyn StoreExecutor,
        new: &NewProductDetail,
    ) -> Result<ProductDetailModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(ProductDetails::Table)
            .columns([
                ProductDetails::ProductId,
                ProductDetails::WeightKg,
                ProductDetails::Dimensions,
                ProductDetails::Manufacturer,
                ProductDetails::WarrantyMonths,
            ])
            .values([
                new.product_id.into(),
                new.weight_kg.into(),
                new.dimensions.clone().into(),
                new.manufacturer.clone().into(),
                new.warranty_months.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        ProductDetailModel::from_row(&row)
    }

    /// The detail row of a product.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the product has no details.
    pub fn find_by_product(
        exec: &dyn StoreExecutor,
        product_id: i64,
    ) -> Result<ProductDetailModel, StoreError> {
        ProductDetails::find()
            .filter(Expr::col((ProductDetails::Table, ProductDetails::ProductId)).eq(product_id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: format!("product {product_id}"),
            })
    }

    /// Write back an edited detail row and return the refreshed row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same validation errors as [`ProductDetails::insert`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &ProductDetailModel,
    ) -> Result<ProductDetailModel, StoreError> {
        if let Some(weight) = model.weight_kg {
            validate::weight("weight_kg", weight)?;
        }
        validate::optional_text("dimensions", model.dimensions.as_deref(), 50)?;
        validate::optional_text("manufacturer", model.manufacturer.as_deref(), 100)?;
        let (sql, values) = Query::update()
            .table(ProductDetails::Table)
            .value(ProductDetails::WeightKg, model.weight_kg)
            .value(ProductDetails::Dimensions, model.dimensions.clone())
            .value(ProductDetails::Manufacturer, model.manufacturer.clone())
            .value(ProductDetails::WarrantyMonths, model.warranty_months)
            .value(ProductDetails::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(ProductDetails::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        ProductDetailModel::from_row(&row)
    }

    /// Remove a product's detail row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the product has no details.
    pub fn delete_for_product(
        exec: &dyn StoreExecutor,
        product_id: i64,
    ) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(ProductDetails::Table)
            .and_where(Expr::col(ProductDetails::ProductId).eq(product_id))
            .build(SqliteQueryBuilder);
        match exec.execute(&sql, &values)? {
            0 => Err(StoreError::NotFound {
                entity: Self::TABLE,
                key: format!("product {product_id}"),
            }),
            _ => Ok(()),
        }
    }
}
