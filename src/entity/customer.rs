//! Customers.

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
pub enum Customers {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    RegistrationDate,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Default for Customers {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerModel {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Assigned by the store at insert time.
    pub registration_date: NaiveDateTime,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for CustomerModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            registration_date: row.get("registration_date")?,
            created_by: row.get("created_by")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for CustomerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last_name, self.first_name)
    }
}

impl EntityTrait for Customers {
    type Model = CustomerModel;
    const TABLE: &'static str = "customers";

    fn order_default(query: &mut SelectStatement) {
        query
            .order_by((Customers::Table, Customers::LastName), Order::Asc)
            .order_by((Customers::Table, Customers::FirstName), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewCustomer {
    fn validate(&self) -> Result<(), StoreError> {
        validate::require_text("first_name", &self.first_name, 100)?;
        validate::require_text("last_name", &self.last_name, 100)?;
        validate::email("email", &self.email)?;
        validate::optional_text("phone", self.phone.as_deref(), 20)
    }
}

impl Customers {
    /// Insert a customer. The registration date is assigned by the store.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on bad names or e-mail,
    /// [`StoreError::Unique`] on a duplicate e-mail.
    pub fn insert(
        exec: &dyn StoreExecutor,
        new: &NewCustomer,
    ) -> Result<CustomerModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Customers::Table)
            .columns([
                Customers::FirstName,
                Customers::LastName,
                Customers::Email,
                Customers::Phone,
                Customers::CreatedBy,
            ])
            .values([
                new.first_name.clone().into(),
                new.last_name.clone().into(),
                new.email.clone().into(),
                new.phone.clone().into(),
                new.created_by.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        CustomerModel::from_row(&row)
    }

    /// Look a customer up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such customer exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<CustomerModel, StoreError> {
        Customers::find()
            .filter(Expr::col((Customers::Table, Customers::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// Look a customer up by their unique e-mail address.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such customer exists.
    pub fn find_by_email(exec: &dyn StoreExecutor, email: &str) -> Result<CustomerModel, StoreError> {
        Customers::find()
            .filter(Expr::col((Customers::Table, Customers::Email)).eq(email))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: email.to_string(),
            })
    }

    /// Write back an edited customer and return the refreshed row.
    ///
    /// The registration date is immutable, like the other server-assigned
    /// timestamps.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same constraint errors as [`Customers::insert`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &CustomerModel,
    ) -> Result<CustomerModel, StoreError> {
        validate::require_text("first_name", &model.first_name, 100)?;
        validate::require_text("last_name", &model.last_name, 100)?;
        validate::email("email", &model.email)?;
        validate::optional_text("phone", model.phone.as_deref(), 20)?;
        let (sql, values) = Query::update()
            .table(Customers::Table)
            .value(Customers::FirstName, model.first_name.clone())
            .value(Customers::LastName, model.last_name.clone())
            .value(Customers::Email, model.email.clone())
            .value(Customers::Phone, model.phone.clone())
            .value(Customers::IsActive, model.is_active)
            .value(Customers::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Customers::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        CustomerModel::from_row(&row)
    }

    /// Delete a customer. Blocked while any order references them; their
    /// reviews go with them.
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignKey`] while orders reference the customer,
    /// [`StoreError::NotFound`] when no such customer exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Customers::Table)
            .and_where(Expr::col(Customers::Id).eq(id))
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
