//! The `Value` tagged union and its SQL comparison semantics.
//!
//! NULL follows SQL three-valued logic for equality: NULL is never equal to
//! anything, including another NULL. Ordering puts NULLs last so ORDER BY
//! behaves consistently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

/// A row is an ordered sequence of values; position `i` corresponds to
/// column `i` of the owning schema.
pub type Row = Vec<Value>;

impl Value {
    /// Check if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Rank used as a tie-breaker when ordering values of different kinds.
    /// Arbitrary but stable: Null < Integer < Float < Text < Boolean.
    pub(crate) fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Integer(_) => 1,
            Value::Float(_) => 2,
            Value::Text(_) => 3,
            Value::Boolean(_) => 4,
        }
    }

    /// SQL equality.
    ///
    /// `NULL = NULL` is false, `NULL = anything` is false, and values of
    /// different kinds are never equal (`1` is not `1.0`). Otherwise
    /// structural equality.
    pub fn sql_equals(&self, other: &Value) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        if self.kind_rank() != other.kind_rank() {
            return false;
        }
        self == other
    }

    /// SQL ordering (`a < b`), used for ORDER BY and range comparisons.
    ///
    /// NULLs sort after every non-NULL value. Integer and Float compare
    /// numerically (the Integer is widened). Text compares byte-wise,
    /// Boolean as false < true. Any other cross-kind pair falls back to the
    /// stable kind rank, which keeps this a strict weak ordering.
    pub fn sql_less_than(&self, other: &Value) -> bool {
        if self.is_null() {
            return false;
        }
        if other.is_null() {
            return true;
        }
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a < b,
            (Value::Float(a), Value::Float(b)) => a < b,
            (Value::Integer(a), Value::Float(b)) => (*a as f64) < *b,
            (Value::Float(a), Value::Integer(b)) => *a < (*b as f64),
            (Value::Text(a), Value::Text(b)) => a < b,
            (Value::Boolean(a), Value::Boolean(b)) => !*a && *b,
            (a, b) => a.kind_rank() < b.kind_rank(),
        }
    }

    /// Kind-tagged fingerprint fragment for multiset row matching.
    ///
    /// Display text alone is ambiguous (Integer `1` and Text `"1"` both
    /// render as `1`), so the encoding tags the kind, length-prefixes text,
    /// and uses the raw bits for floats.
    pub(crate) fn fingerprint_into(&self, out: &mut String) {
        use std::fmt::Write;
        match self {
            Value::Null => out.push_str("n;"),
            Value::Integer(i) => {
                let _ = write!(out, "i{};", i);
            }
            Value::Float(f) => {
                let _ = write!(out, "f{};", f.to_bits());
            }
            Value::Text(s) => {
                let _ = write!(out, "s{}:{};", s.len(), s);
            }
            Value::Boolean(b) => out.push_str(if *b { "b1;" } else { "b0;" }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:.2}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
        }
    }
}

/// Fingerprint an entire row for multiset comparison.
pub(crate) fn row_fingerprint(row: &Row) -> String {
    let mut out = String::new();
    for value in row {
        value.fingerprint_into(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(-42).to_string(), "-42");
        assert_eq!(Value::Float(2.5).to_string(), "2.50");
        assert_eq!(Value::Float(3.14159).to_string(), "3.14");
        assert_eq!(Value::Text("hello".into()).to_string(), "hello");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_null_is_never_equal() {
        assert!(!Value::Null.sql_equals(&Value::Null));
        assert!(!Value::Null.sql_equals(&Value::Integer(1)));
        assert!(!Value::Integer(1).sql_equals(&Value::Null));
    }

    #[test]
    fn test_equality_requires_same_kind() {
        assert!(Value::Integer(1).sql_equals(&Value::Integer(1)));
        assert!(!Value::Integer(1).sql_equals(&Value::Integer(2)));
        // no implicit widening for equality
        assert!(!Value::Integer(1).sql_equals(&Value::Float(1.0)));
        assert!(!Value::Text("1".into()).sql_equals(&Value::Integer(1)));
        assert!(Value::Text("a".into()).sql_equals(&Value::Text("a".into())));
        assert!(Value::Boolean(false).sql_equals(&Value::Boolean(false)));
    }

    #[test]
    fn test_nulls_sort_last() {
        assert!(!Value::Null.sql_less_than(&Value::Integer(1)));
        assert!(Value::Integer(1).sql_less_than(&Value::Null));
        assert!(!Value::Null.sql_less_than(&Value::Null));
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(Value::Integer(1).sql_less_than(&Value::Integer(2)));
        assert!(Value::Float(1.5).sql_less_than(&Value::Float(2.5)));
        // mixed numeric widens the integer
        assert!(Value::Integer(2).sql_less_than(&Value::Float(2.5)));
        assert!(Value::Float(1.5).sql_less_than(&Value::Integer(2)));
        assert!(!Value::Float(2.5).sql_less_than(&Value::Integer(2)));
    }

    #[test]
    fn test_text_and_boolean_ordering() {
        assert!(Value::Text("a".into()).sql_less_than(&Value::Text("b".into())));
        assert!(!Value::Text("b".into()).sql_less_than(&Value::Text("a".into())));
        assert!(Value::Boolean(false).sql_less_than(&Value::Boolean(true)));
        assert!(!Value::Boolean(true).sql_less_than(&Value::Boolean(false)));
    }

    #[test]
    fn test_strict_weak_ordering() {
        let values = [
            Value::Null,
            Value::Integer(1),
            Value::Integer(2),
            Value::Float(2.5),
            Value::Text("a".into()),
            Value::Text("b".into()),
            Value::Boolean(true),
            Value::Boolean(false),
        ];

        // irreflexive
        for v in &values {
            assert!(!v.sql_less_than(v), "{} < {}", v, v);
        }
        // asymmetric
        for a in &values {
            for b in &values {
                if a.sql_less_than(b) {
                    assert!(!b.sql_less_than(a), "{} and {} both less", a, b);
                }
            }
        }
        // transitive
        for a in &values {
            for b in &values {
                for c in &values {
                    if a.sql_less_than(b) && b.sql_less_than(c) {
                        assert!(a.sql_less_than(c), "{} < {} < {} broke", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_fingerprint_separates_kinds() {
        let int_row: Row = vec![Value::Integer(1)];
        let text_row: Row = vec![Value::Text("1".into())];
        assert_ne!(row_fingerprint(&int_row), row_fingerprint(&text_row));

        let float_row: Row = vec![Value::Float(1.0)];
        assert_ne!(row_fingerprint(&int_row), row_fingerprint(&float_row));

        let a: Row = vec![Value::Null, Value::Integer(7)];
        let b: Row = vec![Value::Null, Value::Integer(7)];
        assert_eq!(row_fingerprint(&a), row_fingerprint(&b));
    }
}
