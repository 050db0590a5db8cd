//! Composable boolean conditions over task columns.
//!
//! A [`Predicate`] is the value handed from the query builder to whatever
//! executes the query. It can be rendered into a parameterized SQL `WHERE`
//! fragment for SQLite, or evaluated directly against an in-memory row.
//!
//! ## Usage
//!
//! ```rust
//! use taskscope::libs::predicate::{Column, Predicate};
//!
//! let predicate = Predicate::eq(Column::CreatorId, 1).or(Predicate::is_in(Column::ProjectId, [5, 6]));
//! let (sql, params) = predicate.to_sql();
//! assert_eq!(sql, "(creator_id = ? OR project_id IN (?, ?))");
//! assert_eq!(params.len(), 3);
//! ```
//!
//! ## NULL handling
//!
//! The algebra has no negation, so SQL's three-valued logic collapses to two
//! values: any comparison against a NULL column is false, both in SQL and in
//! [`Predicate::matches`].

use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use std::cmp::Ordering;
use std::fmt;

/// Calendar date format used for date columns and date arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const ALWAYS_TRUE_SQL: &str = "1 = 1";
const ALWAYS_FALSE_SQL: &str = "1 = 0";

/// Longest `IN` list rendered with one placeholder per value. Longer lists
/// are bound as a single JSON array and expanded with `json_each`, which
/// keeps any membership set under SQLite's host parameter limit.
pub const MAX_INLINE_IN_VALUES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    CreatorId,
    ProjectId,
    IsDone,
    ScheduledAt,
    DueAt,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::CreatorId => "creator_id",
            Column::ProjectId => "project_id",
            Column::IsDone => "is_done",
            Column::ScheduledAt => "scheduled_at",
            Column::DueAt => "due_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    fn to_sql(&self) -> SqlValue {
        match self {
            Value::Int(v) => SqlValue::Integer(*v),
            Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
            Value::Date(d) => SqlValue::Text(d.format(DATE_FORMAT).to_string()),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Bool(v) => serde_json::Value::from(i64::from(*v)),
            Value::Date(d) => serde_json::Value::from(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Ordering between two values of the same kind; `None` across kinds.
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Date(d) => write!(f, "'{}'", d.format(DATE_FORMAT)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
        }
    }
}

/// Anything a predicate can be evaluated against.
pub trait Row {
    /// Current value of `column`, `None` for SQL NULL.
    fn value(&self, column: Column) -> Option<Value>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    True,
    Compare { column: Column, op: Op, value: Value },
    /// Membership test. An empty list matches nothing.
    In { column: Column, values: Vec<Value> },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(column: Column, op: Op, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Eq, value)
    }

    pub fn lt(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Lt, value)
    }

    pub fn le(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Le, value)
    }

    pub fn ge(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Ge, value)
    }

    pub fn is_in<I, V>(column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjunction. `True` operands are dropped and nested conjunctions are
    /// flattened, so repeated chaining yields a single `And` list.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(mut right)) => {
                right.insert(0, p);
                Predicate::And(right)
            }
            (left, right) => Predicate::And(vec![left, right]),
        }
    }

    /// Disjunction. A `True` operand absorbs the whole expression.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::Or(mut left), Predicate::Or(right)) => {
                left.extend(right);
                Predicate::Or(left)
            }
            (Predicate::Or(mut left), p) => {
                left.push(p);
                Predicate::Or(left)
            }
            (p, Predicate::Or(mut right)) => {
                right.insert(0, p);
                Predicate::Or(right)
            }
            (left, right) => Predicate::Or(vec![left, right]),
        }
    }

    /// Conjunction of every predicate; `True` for an empty input.
    pub fn all<I: IntoIterator<Item = Predicate>>(predicates: I) -> Predicate {
        predicates.into_iter().fold(Predicate::True, Predicate::and)
    }

    pub fn is_always_true(&self) -> bool {
        match self {
            Predicate::True => true,
            Predicate::And(parts) => parts.iter().all(Predicate::is_always_true),
            _ => false,
        }
    }

    /// Renders the predicate as a SQL fragment with `?` placeholders and
    /// returns the bind values in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let sql = self.write_sql(&mut params);
        (sql, params)
    }

    fn write_sql(&self, params: &mut Vec<SqlValue>) -> String {
        match self {
            Predicate::True => ALWAYS_TRUE_SQL.to_string(),
            Predicate::Compare { column, op, value } => {
                params.push(value.to_sql());
                format!("{} {} ?", column.name(), op.as_sql())
            }
            Predicate::In { values, .. } if values.is_empty() => ALWAYS_FALSE_SQL.to_string(),
            Predicate::In { column, values } if values.len() > MAX_INLINE_IN_VALUES => {
                let array = serde_json::Value::Array(values.iter().map(Value::to_json).collect());
                params.push(SqlValue::Text(array.to_string()));
                format!("{} IN (SELECT value FROM json_each(?))", column.name())
            }
            Predicate::In { column, values } => {
                params.extend(values.iter().map(Value::to_sql));
                format!("{} IN ({})", column.name(), vec!["?"; values.len()].join(", "))
            }
            Predicate::And(parts) => Self::write_group(parts, " AND ", ALWAYS_TRUE_SQL, params),
            Predicate::Or(parts) => Self::write_group(parts, " OR ", ALWAYS_FALSE_SQL, params),
        }
    }

    fn write_group(parts: &[Predicate], separator: &str, empty: &str, params: &mut Vec<SqlValue>) -> String {
        match parts {
            [] => empty.to_string(),
            [single] => single.write_sql(params),
            _ => {
                let rendered: Vec<String> = parts.iter().map(|p| p.write_sql(params)).collect();
                format!("({})", rendered.join(separator))
            }
        }
    }

    /// Evaluates the predicate against a single row.
    pub fn matches<R: Row + ?Sized>(&self, row: &R) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Compare { column, op, value } => row
                .value(*column)
                .and_then(|current| current.compare(value))
                .is_some_and(|ordering| op.holds(ordering)),
            Predicate::In { column, values } => row.value(*column).is_some_and(|current| values.contains(&current)),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(row)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(row)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => write!(f, "TRUE"),
            Predicate::Compare { column, op, value } => write!(f, "{} {} {}", column.name(), op.as_sql(), value),
            Predicate::In { column, values } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{} IN ({})", column.name(), values.join(", "))
            }
            Predicate::And(parts) | Predicate::Or(parts) => {
                let separator = if matches!(self, Predicate::And(_)) { " AND " } else { " OR " };
                let parts: Vec<String> = parts.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(separator))
            }
        }
    }
}
