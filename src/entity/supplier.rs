//! Suppliers.

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
pub enum Suppliers {
    Table,
    Id,
    CompanyName,
    ContactName,
    Phone,
    Email,
    Address,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Default for Suppliers {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierModel {
    pub id: i64,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for SupplierModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            company_name: row.get("company_name")?,
            contact_name: row.get("contact_name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            address: row.get("address")?,
            created_by: row.get("created_by")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for SupplierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.company_name)
    }
}

impl EntityTrait for Suppliers {
    type Model = SupplierModel;
    const TABLE: &'static str = "suppliers";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((Suppliers::Table, Suppliers::CompanyName), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplier {
    pub company_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewSupplier {
    fn validate(&self) -> Result<(), StoreError> {
        validate::require_text("company_name", &self.company_name, 200)?;
        validate::optional_text("contact_name", self.contact_name.as_deref(), 100)?;
        validate::optional_text("phone", self.phone.as_deref(), 20)?;
        validate::optional_email("email", self.email.as_deref())
    }
}

impl Suppliers {
    /// Insert a supplier.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on bad contact fields,
    /// [`StoreError::Unique`] on a duplicate company name.
    pub fn insert(
        exec: &dyn StoreExecutor,
        new: &NewSupplier,
    ) -> Result<SupplierModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Suppliers::Table)
            .columns([
                Suppliers::CompanyName,
                Suppliers::ContactName,
                Suppliers::Phone,
                Suppliers::Email,
                Suppliers::Address,
                Suppliers::CreatedBy,
            ])
            .values([
                new.company_name.clone().into(),
                new.contact_name.clone().into(),
                new.phone.clone().into(),
                new.email.clone().into(),
                new.address.clone().into(),
                new.created_by.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        SupplierModel::from_row(&row)
    }

    /// Look a supplier up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such supplier exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<SupplierModel, StoreError> {
        Suppliers::find()
            .filter(Expr::col((Suppliers::Table, Suppliers::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// Look a supplier up by its unique company name.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such supplier exists.
    pub fn find_by_company_name(
        exec: &dyn StoreExecutor,
        company_name: &str,
    ) -> Result<SupplierModel, StoreError> {
        Suppliers::find()
            .filter(Expr::col((Suppliers::Table, Suppliers::CompanyName)).eq(company_name))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: company_name.to_string(),
            })
    }

    /// Write back an edited supplier and return the refreshed row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same constraint errors as [`Suppliers::insert`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &SupplierModel,
    ) -> Result<SupplierModel, StoreError> {
        validate::require_text("company_name", &model.company_name, 200)?;
        validate::optional_text("contact_name", model.contact_name.as_deref(), 100)?;
        validate::optional_text("phone", model.phone.as_deref(), 20)?;
        validate::optional_email("email", model.email.as_deref())?;
        let (sql, values) = Query::update()
            .table(Suppliers::Table)
            .value(Suppliers::CompanyName, model.company_name.clone())
            .value(Suppliers::ContactName, model.contact_name.clone())
            .value(Suppliers::Phone, model.phone.clone())
            .value(Suppliers::Email, model.email.clone())
            .value(Suppliers::Address, model.address.clone())
            .value(Suppliers::IsActive, model.is_active)
            .value(Suppliers::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Suppliers::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        SupplierModel::from_row(&row)
    }

    /// Delete a supplier.
    ///
    /// Supply links to products go with it; categories naming it as main
    /// supplier fall back to none.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such supplier exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Suppliers::Table)
            .and_where(Expr::col(Suppliers::Id).eq(id))
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
