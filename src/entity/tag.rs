//! Tags.
//!
//! Free-form labels attached to products through the product↔tag link
//! table. Tags are not tracked entities; they carry timestamps only.

use chrono::NaiveDateTime;
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::product_tag::ProductTags;
use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::validate;
use crate::value::{Row, NOW_EXPR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Tags {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

impl Default for Tags {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for TagModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl fmt::Display for TagModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl EntityTrait for Tags {
    type Model = TagModel;
    const TABLE: &'static str = "tags";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((Tags::Table, Tags::Name), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTag {
    fn validate(&self) -> Result<(), StoreError> {
        validate::require_text("name", &self.name, 50)
    }
}

impl Tags {
    /// Insert a tag.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on a bad name, [`StoreError::Unique`] on
    /// a duplicate.
    pub fn insert(exec: &dyn StoreExecutor, new: &NewTag) -> Result<TagModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Tags::Table)
            .columns([Tags::Name, Tags::Description])
            .values([new.name.clone().into(), new.description.clone().into()])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        TagModel::from_row(&row)
    }

    /// Look a tag up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such tag exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<TagModel, StoreError> {
        Tags::find()
            .filter(Expr::col((Tags::Table, Tags::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// Look a tag up by its unique name.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such tag exists.
    pub fn find_by_name(exec: &dyn StoreExecutor, name: &str) -> Result<TagModel, StoreError> {
        Tags::find()
            .filter(Expr::col((Tags::Table, Tags::Name)).eq(name))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: name.to_string(),
            })
    }

    /// All tags attached to a product, name order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] from execution.
    pub fn for_product(
        exec: &dyn StoreExecutor,
        product_id: i64,
    ) -> Result<Vec<TagModel>, StoreError> {
        let mut linked = Query::select();
        linked
            .expr(Expr::value(1))
            .from(ProductTags::Table)
            .and_where(
                Expr::col((ProductTags::Table, ProductTags::TagId))
                    .equals((Tags::Table, Tags::Id)),
            )
            .and_where(Expr::col((ProductTags::Table, ProductTags::ProductId)).eq(product_id));
        Tags::find().filter(Expr::exists(linked)).all(exec)
    }

    /// Write back an edited tag and return the refreshed row.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the row no longer exists, plus the
    /// same constraint errors as [`Tags::insert`].
    pub fn update(exec: &dyn StoreExecutor, model: &TagModel) -> Result<TagModel, StoreError> {
        validate::require_text("name", &model.name, 50)?;
        let (sql, values) = Query::update()
            .table(Tags::Table)
            .value(Tags::Name, model.name.clone())
            .value(Tags::Description, model.description.clone())
            .value(Tags::UpdatedAt, Expr::cust(NOW_EXPR))
            .and_where(Expr::col(Tags::Id).eq(model.id))
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec
            .query_opt(&sql, &values)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: model.id.to_string(),
            })?;
        TagModel::from_row(&row)
    }

    /// Delete a tag and its product links.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such tag exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Tags::Table)
            .and_where(Expr::col(Tags::Id).eq(id))
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
