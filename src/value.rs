//! Value conversion between sea-query, SQLite, and the model layer.
//!
//! Statements are built with sea-query and bound through rusqlite, so every
//! [`sea_query::Value`] a statement can carry needs a SQLite rendering. The
//! conversion is a single exhaustive match; anything the schema never
//! produces is rejected rather than silently coerced.
//!
//! Hydration goes the other way: executed statements yield owned [`Row`]s
//! (the engine's row handles borrow from the statement and cannot outlive
//! it), and models pull typed fields out of them via [`FromSqlValue`].

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rusqlite::types::Value as SqliteValue;
use sea_query::Value;
use std::sync::Arc;

use crate::error::StoreError;

/// Text layout for every timestamp column. Millisecond resolution so
/// `updated_at` refreshes are observable within a single test run.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// SQL expression assigning the current time in [`DATETIME_FORMAT`].
pub(crate) const NOW_EXPR: &str = "STRFTIME('%Y-%m-%d %H:%M:%f','now')";

/// Convert the bound values of a built statement into SQLite parameters.
///
/// # Errors
///
/// Returns [`StoreError::Value`] for value types the schema has no SQLite
/// rendering for, and for unsigned values that do not fit a signed 64-bit
/// column.
pub fn bind_values(values: &sea_query::Values) -> Result<Vec<SqliteValue>, StoreError> {
    let mut params = Vec::with_capacity(values.iter().count());
    for value in values.iter() {
        params.push(bind_value(value)?);
    }
    Ok(params)
}

fn bind_value(value: &Value) -> Result<SqliteValue, StoreError> {
    let converted = match value {
        Value::Bool(Some(b)) => SqliteValue::Integer(i64::from(*b)),
        Value::TinyInt(Some(i)) => SqliteValue::Integer(i64::from(*i)),
        Value::SmallInt(Some(i)) => SqliteValue::Integer(i64::from(*i)),
        Value::Int(Some(i)) => SqliteValue::Integer(i64::from(*i)),
        Value::BigInt(Some(i)) => SqliteValue::Integer(*i),
        Value::TinyUnsigned(Some(u)) => SqliteValue::Integer(i64::from(*u)),
        Value::SmallUnsigned(Some(u)) => SqliteValue::Integer(i64::from(*u)),
        Value::Unsigned(Some(u)) => SqliteValue::Integer(i64::from(*u)),
        Value::BigUnsigned(Some(u)) => {
            let i = i64::try_from(*u).map_err(|_| {
                StoreError::Value(format!(
                    "unsigned value {u} exceeds i64::MAX and cannot be stored"
                ))
            })?;
            SqliteValue::Integer(i)
        }
        Value::Float(Some(f)) => SqliteValue::Real(f64::from(*f)),
        Value::Double(Some(d)) => SqliteValue::Real(*d),
        Value::String(Some(s)) => SqliteValue::Text(s.as_ref().clone()),
        Value::Bytes(Some(b)) => SqliteValue::Blob(b.as_ref().clone()),
        Value::ChronoDateTime(Some(dt)) => {
            SqliteValue::Text(dt.format(DATETIME_FORMAT).to_string())
        }
        Value::Decimal(Some(d)) => {
            let real = d.to_f64().ok_or_else(|| {
                StoreError::Value(format!("decimal {d} is out of range for storage"))
            })?;
            SqliteValue::Real(real)
        }
        Value::Bool(None)
        | Value::TinyInt(None)
        | Value::SmallInt(None)
        | Value::Int(None)
        | Value::BigInt(None)
        | Value::TinyUnsigned(None)
        | Value::SmallUnsigned(None)
        | Value::Unsigned(None)
        | Value::BigUnsigned(None)
        | Value::Float(None)
        | Value::Double(None)
        | Value::String(None)
        | Value::Bytes(None)
        | Value::ChronoDateTime(None)
        | Value::Decimal(None) => SqliteValue::Null,
        other => {
            return Err(StoreError::Value(format!(
                "unsupported value type in statement: {other:?}"
            )))
        }
    };
    Ok(converted)
}

/// One result row, detached from the statement that produced it.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Vec<String>>,
    values: Vec<SqliteValue>,
}

impl Row {
    pub(crate) fn new(columns: Arc<Vec<String>>, values: Vec<SqliteValue>) -> Self {
        Self { columns, values }
    }

    /// Extract a typed value by column name.
    ///
    /// Duplicate column names resolve to the first occurrence, matching the
    /// engine's own name lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Value`] when the column is absent or its value
    /// does not convert into `T`.
    pub fn get<T: FromSqlValue>(&self, column: &str) -> Result<T, StoreError> {
        let value = self.raw(column)?;
        T::from_sql(value)
            .map_err(|e| StoreError::Value(format!("column '{column}': {e}")))
    }

    /// Extract a fixed-point decimal stored as REAL, re-quantized to the
    /// column's declared scale.
    pub fn get_decimal(&self, column: &str, scale: u32) -> Result<Decimal, StoreError> {
        let real: f64 = self.get(column)?;
        decimal_from_stored(real, scale)
            .map_err(|e| StoreError::Value(format!("column '{column}': {e}")))
    }

    /// Nullable variant of [`Row::get_decimal`].
    pub fn get_decimal_opt(
        &self,
        column: &str,
        scale: u32,
    ) -> Result<Option<Decimal>, StoreError> {
        match self.get::<Option<f64>>(column)? {
            None => Ok(None),
            Some(real) => decimal_from_stored(real, scale)
                .map(Some)
                .map_err(|e| StoreError::Value(format!("column '{column}': {e}"))),
        }
    }

    fn raw(&self, column: &str) -> Result<&SqliteValue, StoreError> {
        let index = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| StoreError::Value(format!("no column named '{column}'")))?;
        Ok(&self.values[index])
    }
}

/// Conversion from a stored SQLite value into a model field type.
pub trait FromSqlValue: Sized {
    fn from_sql(value: &SqliteValue) -> Result<Self, String>;
}

impl FromSqlValue for i64 {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        match value {
            SqliteValue::Integer(i) => Ok(*i),
            other => Err(format!("expected INTEGER, got {other:?}")),
        }
    }
}

impl FromSqlValue for u32 {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        let wide = i64::from_sql(value)?;
        u32::try_from(wide).map_err(|_| format!("{wide} is out of range for u32"))
    }
}

impl FromSqlValue for u8 {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        let wide = i64::from_sql(value)?;
        u8::try_from(wide).map_err(|_| format!("{wide} is out of range for u8"))
    }
}

impl FromSqlValue for bool {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        Ok(i64::from_sql(value)? != 0)
    }
}

impl FromSqlValue for f64 {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        match value {
            SqliteValue::Real(r) => Ok(*r),
            // NUMERIC affinity may store integral reals as INTEGER.
            SqliteValue::Integer(i) => Ok(*i as f64),
            other => Err(format!("expected REAL, got {other:?}")),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        match value {
            SqliteValue::Text(s) => Ok(s.clone()),
            other => Err(format!("expected TEXT, got {other:?}")),
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        let text = String::from_sql(value)?;
        parse_datetime(&text)
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql(value: &SqliteValue) -> Result<Self, String> {
        match value {
            SqliteValue::Null => Ok(None),
            other => T::from_sql(other).map(Some),
        }
    }
}

pub(crate) fn parse_datetime(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| format!("'{text}' is not a timestamp: {e}"))
}

/// Re-quantize a REAL read back from the store to its declared scale.
///
/// Every value the schema admits (validated scale, magnitude < 10^8) round
/// trips exactly through the binary representation at this precision.
pub(crate) fn decimal_from_stored(value: f64, scale: u32) -> Result<Decimal, String> {
    let mut decimal = Decimal::from_f64_retain(value)
        .ok_or_else(|| format!("{value} is not representable as a decimal"))?
        .round_dp(scale);
    decimal.rescale(scale);
    Ok(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn binds_core_scalar_types() {
        let values = sea_query::Values(vec![
            Value::Bool(Some(true)),
            Value::BigInt(Some(7)),
            Value::String(Some(Box::new("mug".to_string()))),
            Value::Int(None),
        ]);
        let params = bind_values(&values).unwrap();
        assert_eq!(params[0], SqliteValue::Integer(1));
        assert_eq!(params[1], SqliteValue::Integer(7));
        assert_eq!(params[2], SqliteValue::Text("mug".to_string()));
        assert_eq!(params[3], SqliteValue::Null);
    }

    #[test]
    fn binds_decimal_as_real() {
        let price = Decimal::from_str("19.99").unwrap();
        let values = sea_query::Values(vec![Value::Decimal(Some(Box::new(price)))]);
        let params = bind_values(&values).unwrap();
        match params[0] {
            SqliteValue::Real(r) => assert!((r - 19.99).abs() < 1e-9),
            ref other => panic!("expected REAL, got {other:?}"),
        }
    }

    #[test]
    fn money_round_trips_through_real() {
        for text in ["0.00", "0.01", "8.99", "19.99", "12.50", "99999999.99"] {
            let money = Decimal::from_str(text).unwrap();
            let stored = money.to_f64().unwrap();
            let back = decimal_from_stored(stored, 2).unwrap();
            assert_eq!(back, money, "round trip of {text}");
        }
    }

    #[test]
    fn weight_round_trips_through_real() {
        let weight = Decimal::from_str("1.234").unwrap();
        let back = decimal_from_stored(weight.to_f64().unwrap(), 3).unwrap();
        assert_eq!(back, weight);
    }

    #[test]
    fn parses_timestamps_with_and_without_millis() {
        assert!(parse_datetime("2026-08-07 10:15:00.123").is_ok());
        assert!(parse_datetime("2026-08-07 10:15:00").is_ok());
        assert!(parse_datetime("not a date").is_err());
    }

    #[test]
    fn row_lookup_is_by_name() {
        let columns = Arc::new(vec!["id".to_string(), "name".to_string()]);
        let row = Row::new(
            columns,
            vec![SqliteValue::Integer(3), SqliteValue::Text("mug".into())],
        );
        assert_eq!(row.get::<i64>("id").unwrap(), 3);
        assert_eq!(row.get::<String>("name").unwrap(), "mug");
        assert!(row.get::<i64>("missing").is_err());
    }
}
