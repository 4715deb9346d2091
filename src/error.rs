//! Store error types.
//!
//! All failures surface as [`StoreError`]. Violations detected by SQLite are
//! classified into the same taxonomy as the crate's own pre-write checks, so
//! callers match on one enum regardless of which layer rejected the write.

use rusqlite::ffi;
use std::fmt;

/// Errors surfaced at the storage boundary.
#[derive(Debug)]
pub enum StoreError {
    /// A value violates a field constraint. Raised by pre-write validation
    /// and by engine-level `CHECK` / `NOT NULL` failures.
    Validation {
        /// Field (or constraint) the value failed against.
        field: String,
        /// What was wrong with it.
        message: String,
    },
    /// A unique or composite-unique constraint was violated. The write was
    /// rejected with no partial state committed.
    Unique {
        /// Constraint description as reported by the engine,
        /// e.g. `products.name, products.category_id`.
        constraint: String,
    },
    /// A referential-integrity policy rejected the write: either a
    /// block-on-delete parent still has dependents, or an insert referenced
    /// a missing parent row.
    ForeignKey {
        /// Engine-reported detail.
        message: String,
    },
    /// A lookup by identifier or unique key matched no row.
    NotFound {
        /// Entity table the lookup ran against.
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },
    /// Any other SQLite error.
    Sqlite(rusqlite::Error),
    /// A statement could not be built.
    Query(String),
    /// A row value could not be converted into the model's field type.
    Value(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation { field, message } => {
                write!(f, "Validation error on '{field}': {message}")
            }
            StoreError::Unique { constraint } => {
                write!(f, "Uniqueness violation: {constraint}")
            }
            StoreError::ForeignKey { message } => {
                write!(f, "Referential integrity violation: {message}")
            }
            StoreError::NotFound { entity, key } => {
                write!(f, "No row in '{entity}' for key {key}")
            }
            StoreError::Sqlite(e) => {
                write!(f, "SQLite error: {e}")
            }
            StoreError::Query(s) => {
                write!(f, "Query build error: {s}")
            }
            StoreError::Value(s) => {
                write!(f, "Value conversion error: {s}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        classify(err)
    }
}

impl From<sea_query::error::Error> for StoreError {
    fn from(err: sea_query::error::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Classify a raw SQLite error into the store taxonomy.
///
/// SQLite reports constraint failures through extended result codes; those
/// map directly onto the taxonomy. Anything unrecognized passes through as
/// [`StoreError::Sqlite`].
fn classify(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref code, ref message) = err {
        let detail = message.clone().unwrap_or_else(|| code.to_string());
        match code.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return StoreError::Unique {
                    constraint: strip_prefix(&detail, "UNIQUE constraint failed: "),
                }
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY | ffi::SQLITE_CONSTRAINT_TRIGGER => {
                return StoreError::ForeignKey { message: detail }
            }
            ffi::SQLITE_CONSTRAINT_CHECK => {
                return StoreError::Validation {
                    field: strip_prefix(&detail, "CHECK constraint failed: "),
                    message: "check constraint failed".to_string(),
                }
            }
            ffi::SQLITE_CONSTRAINT_NOTNULL => {
                return StoreError::Validation {
                    field: strip_prefix(&detail, "NOT NULL constraint failed: "),
                    message: "value must not be null".to_string(),
                }
            }
            _ => {}
        }
    }
    StoreError::Sqlite(err)
}

fn strip_prefix(detail: &str, prefix: &str) -> String {
    detail
        .strip_prefix(prefix)
        .unwrap_or(detail)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::ConstraintViolation,
                extended_code,
            },
            Some(message.to_string()),
        )
    }

    #[test]
    fn unique_violation_is_classified() {
        let err: StoreError =
            constraint_failure(ffi::SQLITE_CONSTRAINT_UNIQUE, "UNIQUE constraint failed: tags.name")
                .into();
        match err {
            StoreError::Unique { constraint } => assert_eq!(constraint, "tags.name"),
            other => panic!("expected Unique, got {other:?}"),
        }
    }

    #[test]
    fn foreign_key_violation_is_classified() {
        let err: StoreError =
            constraint_failure(ffi::SQLITE_CONSTRAINT_FOREIGNKEY, "FOREIGN KEY constraint failed")
                .into();
        assert!(matches!(err, StoreError::ForeignKey { .. }));
    }

    #[test]
    fn check_violation_maps_to_validation() {
        let err: StoreError = constraint_failure(
            ffi::SQLITE_CONSTRAINT_CHECK,
            "CHECK constraint failed: ck_reviews_rating",
        )
        .into();
        match err {
            StoreError::Validation { field, .. } => assert_eq!(field, "ck_reviews_rating"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_errors_pass_through() {
        let err: StoreError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn display_formats() {
        let err = StoreError::NotFound {
            entity: "products",
            key: "42".to_string(),
        };
        assert!(err.to_string().contains("products"));
        assert!(err.to_string().contains("42"));
    }
}
