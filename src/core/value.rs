/// Value Module
///
/// Rows have no static shape: the executed statement decides how many columns
/// come back and of which storage class. Every cell is therefore a tagged
/// scalar [`Value`], a row is an ordered `Vec<Value>` and a result set is an
/// ordered `Vec<Row>` in the order the engine produced them.
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

/// A single SQLite scalar, used both for bound parameters and fetched cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// One fetched row (RowTuple); column count is set by the statement.
pub type Row = Vec<Value>;

/// All fetched rows, in engine order.
pub type RowSet = Vec<Row>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(f) => ValueRef::Real(*f),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

/// Copies a borrowed cell out of the engine. Text that is not valid UTF-8 is
/// replaced lossily rather than failing the fetch.
impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Blob(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Blob(b.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds a [`Row`] from anything convertible into [`Value`].
///
/// ```
/// use sqlite_exec::{row, Value};
///
/// let params = row!["John", 20, None::<i64>];
/// assert_eq!(params, vec![Value::from("John"), Value::Integer(20), Value::Null]);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(7i32), Value::Integer(7));
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from("a"), Value::Text("a".to_string()));
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(2.5)), Value::Real(2.5));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Blob(vec![1, 2]));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(3).as_i64(), Some(3));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Text("x".into()).as_i64(), None);
        assert!(Value::Null.is_null());
        assert_eq!(Value::Blob(vec![9]).as_blob(), Some(&[9u8][..]));
    }

    #[test]
    fn test_row_macro() {
        let empty = row![];
        assert!(empty.is_empty());

        let r = row!["John", 20i64, 1.5, None::<i64>];
        assert_eq!(
            r,
            vec![
                Value::Text("John".into()),
                Value::Integer(20),
                Value::Real(1.5),
                Value::Null
            ]
        );
    }

    #[test]
    fn test_binding_preserves_storage_class() {
        let conn = Connection::open_in_memory().unwrap();
        let values = row![Value::Null, 42i64, 0.25, "text", vec![0xDEu8, 0xAD]];

        let types: Vec<String> = values
            .iter()
            .map(|v| {
                conn.query_row("SELECT typeof(?1)", [v], |row| row.get(0))
                    .unwrap()
            })
            .collect();
        assert_eq!(types, vec!["null", "integer", "real", "text", "blob"]);

        let back: Value = conn
            .query_row("SELECT ?1", [&values[4]], |row| Ok(Value::from(row.get_ref(0)?)))
            .unwrap();
        assert_eq!(back, values[4]);
    }
}
