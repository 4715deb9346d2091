//! User accounts.
//!
//! Minimal account table serving as the target of every `created_by`
//! reference. Deleting a user nullifies those references; it never blocks
//! or cascades into shop data.

use chrono::NaiveDateTime;
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::query::{EntityTrait, FromRow};
use crate::value::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    CreatedAt,
}

impl Default for Users {
    fn default() -> Self {
        Self::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub created_at: NaiveDateTime,
}

impl FromRow for UserModel {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl fmt::Display for UserModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

impl EntityTrait for Users {
    type Model = UserModel;
    const TABLE: &'static str = "users";

    fn order_default(query: &mut SelectStatement) {
        query.order_by((Users::Table, Users::Username), Order::Asc);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    fn validate(&self) -> Result<(), StoreError> {
        crate::validate::require_text("username", &self.username, 150)
    }
}

impl Users {
    /// Insert an account.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on an empty username,
    /// [`StoreError::Unique`] on a duplicate.
    pub fn insert(exec: &dyn StoreExecutor, new: &NewUser) -> Result<UserModel, StoreError> {
        new.validate()?;
        let (sql, values) = Query::insert()
            .into_table(Users::Table)
            .columns([Users::Username])
            .values([new.username.clone().into()])?
            .returning_all()
            .build(SqliteQueryBuilder);
        let row = exec.query_one(&sql, &values)?;
        UserModel::from_row(&row)
    }

    /// Look an account up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such account exists.
    pub fn find_by_id(exec: &dyn StoreExecutor, id: i64) -> Result<UserModel, StoreError> {
        Users::find()
            .filter(Expr::col((Users::Table, Users::Id)).eq(id))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: id.to_string(),
            })
    }

    /// Look an account up by its unique username.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such account exists.
    pub fn find_by_username(
        exec: &dyn StoreExecutor,
        username: &str,
    ) -> Result<UserModel, StoreError> {
        Users::find()
            .filter(Expr::col((Users::Table, Users::Username)).eq(username))
            .one(exec)?
            .ok_or_else(|| StoreError::NotFound {
                entity: Self::TABLE,
                key: username.to_string(),
            })
    }

    /// Delete an account. `created_by` references to it become NULL.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such account exists.
    pub fn delete(exec: &dyn StoreExecutor, id: i64) -> Result<(), StoreError> {
        let (sql, values) = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
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
