//! Operation shapes
//!
//! The caller-facing request type, the bound-value type for write payloads,
//! and the final permission-checked operation description.

use std::fmt;

use crate::policy::Action;

/// A value bound into a write payload
///
/// Payload values are always carried as data and handed to the execution
/// boundary as bound parameters, never interpolated into statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Value {
    /// Integer view of this value, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Real(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

/// A caller's requested operation shape
///
/// Describes what the caller would like to do; nothing here has been checked
/// against policy yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    /// Target table
    pub table: String,
    /// Requested action
    pub action: Action,
    /// Requested columns (Read); empty means "whatever I'm allowed"
    pub columns: Vec<String>,
    /// Column→value payload (Create/Modify), in caller order
    pub payload: Vec<(String, Value)>,
    /// Caller-supplied filter predicate
    pub filter: Option<String>,
    /// Maximum rows to return (Read)
    pub limit: Option<u64>,
}

impl OperationRequest {
    fn new(table: impl Into<String>, action: Action) -> Self {
        Self {
            table: table.into(),
            action,
            columns: Vec::new(),
            payload: Vec::new(),
            filter: None,
            limit: None,
        }
    }

    /// A read request for a table
    pub fn read(table: impl Into<String>) -> Self {
        Self::new(table, Action::Read)
    }

    /// An insert request with a column→value payload
    pub fn create(table: impl Into<String>, payload: Vec<(String, Value)>) -> Self {
        Self {
            payload,
            ..Self::new(table, Action::Create)
        }
    }

    /// An update request with a column→value payload
    pub fn modify(table: impl Into<String>, payload: Vec<(String, Value)>) -> Self {
        Self {
            payload,
            ..Self::new(table, Action::Modify)
        }
    }

    /// A delete request
    pub fn remove(table: impl Into<String>) -> Self {
        Self::new(table, Action::Remove)
    }

    /// Request specific columns (Read)
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Attach a caller-supplied filter predicate
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Limit the number of returned rows (Read)
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Effective column list of a resolved operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// All columns of the table
    All,
    /// Exactly these columns
    Columns(Vec<String>),
}

impl fmt::Display for ColumnSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelection::All => write!(f, "*"),
            ColumnSelection::Columns(columns) => write!(f, "{}", columns.join(", ")),
        }
    }
}

/// The final, permission-checked description of an operation
///
/// Built only after every check has passed; never partially constructed.
/// The combined predicate always contains the role's row restriction when one
/// exists, logically ANDed with the caller's filter, both parenthesized so
/// operator precedence in caller-supplied text cannot widen the restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOperation {
    /// Target table (from the policy vocabulary)
    pub table: String,
    /// The permitted action
    pub action: Action,
    /// Effective column list
    pub columns: ColumnSelection,
    /// Combined filter predicate, if any clause applies
    pub predicate: Option<String>,
    /// Validated column→value payload (writes), in caller order
    pub payload: Vec<(String, Value)>,
    /// Row limit (Read)
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = OperationRequest::read("orders")
            .with_columns(&["order_id", "order_date"])
            .with_filter("order_id > 10")
            .with_limit(5);

        assert_eq!(request.action, Action::Read);
        assert_eq!(request.columns.len(), 2);
        assert_eq!(request.filter.as_deref(), Some("order_id > 10"));
        assert_eq!(request.limit, Some(5));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from("brand"), Value::Text("brand".to_string()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Text("7".into()).as_int(), None);
    }

    #[test]
    fn test_value_from_json() {
        let json = serde_json::json!({"quantity": 50, "note": "restock", "priority": null});
        assert_eq!(Value::from(json["quantity"].clone()), Value::Int(50));
        assert_eq!(
            Value::from(json["note"].clone()),
            Value::Text("restock".to_string())
        );
        assert_eq!(Value::from(json["priority"].clone()), Value::Null);
    }

    #[test]
    fn test_column_selection_display() {
        assert_eq!(ColumnSelection::All.to_string(), "*");
        let cols = ColumnSelection::Columns(vec!["a".into(), "b".into()]);
        assert_eq!(cols.to_string(), "a, b");
    }
}
