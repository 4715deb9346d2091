//! Product categories.
//!
//! Categories have a unique name and may point at a "main" supplier; that
//! pointer is weak (nullified when the supplier goes away). A category with
//! products cannot be deleted.

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
pub enum Categories {
    Table,
    Id,
    Name,
    Description,
    MainSupplierId,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Default for Categories {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub main_supplier_id: Option<i64>,
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for CategoryModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            main_supplier_id: row.get("main_supplier_id")?,
            created_by: row.get("created_by")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for CategoryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl EntityTrait for Categories {
    type Model = CategoryModel;
    const TABLE: &'static str = "categories";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((Categories::Table, Categories::Name), Order::Asc);
    }
}

/// Insert payload. Timestamps and the active flag are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_supplier_id: Option<i64>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewCategory {
    fn validate(&self) -> Result<(), StoreError> {
        validate::require_text("name", &self.name, 100)
    }
}

impl Categories {
    /// Insert a category.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a bad name, [`StoreError::Unique`] on
    /// a duplicate name, [`StoreError::ForeignKey`] when
    /// `main_supplier_id` or `created_by` reference missing rows.
    pub fn insert(
        exec: &dyn StoreExecutor,
        new: &NewCategory,
    ) -> Result<CategoryModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Categories::Table)
            .columns([
                Categories::Name,
                Categories::Description,
                Categories::MainSupplierId,
                Categories::CreatedBy,
            ])
            .values([
                new.name.clone().into(),
                new.description.clone().into(),
                new.main_supplier_id.into(),
                new.created_by.into(),
            ])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        CategoryModel::from_row(&row)
    }

    /// Look a category up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such category exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<CategoryModel, StoreError> {
        Categories::find()
            .filter(Expr::col((Categories::Table, Categories::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// Look a category up by its unique name.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such category exists.
    pub fn find_by_name(exec: &dyn StoreExecutor, name: &str) -> Result<CategoryModel, StoreError> {
        Categories::find()
            .filter(Expr::col((Categories::Table, Categories::Name)).eq(name))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: name.to_string(),
            })
    }

    /// Write back an edited category and return the refreshed row.
    ///
    /// `created_by` and `created_at` are immutable; `updated_at` is
    /// reassigned by the store.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same constraint errors as [`Categories::insert`].
    pub fn update(
        exec: &dyn StoreExecutor,
        model: &CategoryModel,
    ) -> Result<CategoryModel, StoreError> {
        validate::require_text("name", &model.name, 100)?;
        let (sql, values) = Query::update()
            .table(Categories::Table)
            .value(Categories::Name, model.name.clone())
            .value(Categories::Description, model.description.clone())
            .value(Categories::MainSupplierId, model.main_supplier_id)
            .value(Categories::IsActive, model.is_active)
            .value(Categories::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Categories::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        CategoryModel::from_row(&row)
    }

    /// Delete a category. Blocked while any product references it.
    ///
    /// # Errors
    ///
    /// [`StoreError::ForeignKey`] while products reference the category,
    /// [`StoreError::NotFound`] when no such category exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::Id).eq(id))
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
