//! Filter IR handed to the host framework's search machinery.
//!
//! A filter is either a single condition or a flat `And`/`Or` list of
//! simple conditions, mirroring the one-level domains the host accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::Value;

/// Ordering and equality comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// The operator that keeps a comparison true when both sides are
    /// moved through an order-reversing map.
    ///
    /// `<` and `>` swap, `<=` and `>=` swap; equality and inequality are
    /// unaffected by order reversal and come back unchanged.
    pub fn mirrored(self) -> Self {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            other => other,
        }
    }

    /// Whether this is one of the four ordering operators.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    /// Canonical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Filter expression over record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field not equals value.
    Ne { field: String, value: Value },
    /// Field less than value.
    Lt { field: String, value: Value },
    /// Field less than or equal to value.
    Le { field: String, value: Value },
    /// Field greater than value.
    Gt { field: String, value: Value },
    /// Field greater than or equal to value.
    Ge { field: String, value: Value },
    /// Field is in a set of values.
    In { field: String, values: Vec<Value> },
    /// Field is not in a set of values.
    NotIn { field: String, values: Vec<Value> },
    /// Field is null.
    IsNull { field: String },
    /// Field is not null.
    IsNotNull { field: String },
    /// Condition with an operator this crate does not interpret
    /// (`like`, `child_of`, ...). Handed to the host as written.
    Other {
        field: String,
        op: String,
        value: Value,
    },
    /// All conditions must be true (flat list, single level).
    And(Vec<SimpleFilter>),
    /// At least one condition must be true (flat list, single level).
    Or(Vec<SimpleFilter>),
}

/// A simple (non-compound) condition for use in `And`/`Or` lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimpleFilter {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field not equals value.
    Ne { field: String, value: Value },
    /// Field less than value.
    Lt { field: String, value: Value },
    /// Field less than or equal to value.
    Le { field: String, value: Value },
    /// Field greater than value.
    Gt { field: String, value: Value },
    /// Field greater than or equal to value.
    Ge { field: String, value: Value },
    /// Field is in a set of values.
    In { field: String, values: Vec<Value> },
    /// Field is not in a set of values.
    NotIn { field: String, values: Vec<Value> },
    /// Field is null.
    IsNull { field: String },
    /// Field is not null.
    IsNotNull { field: String },
    /// Condition with an operator this crate does not interpret.
    Other {
        field: String,
        op: String,
        value: Value,
    },
}

impl FilterExpr {
    /// Build a comparison from an operator.
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match op {
            CompareOp::Eq => FilterExpr::Eq { field, value },
            CompareOp::Ne => FilterExpr::Ne { field, value },
            CompareOp::Lt => FilterExpr::Lt { field, value },
            CompareOp::Le => FilterExpr::Le { field, value },
            CompareOp::Gt => FilterExpr::Gt { field, value },
            CompareOp::Ge => FilterExpr::Ge { field, value },
        }
    }

    /// Build a condition from an operator spelling.
    ///
    /// Comparison spellings become comparisons; anything else is kept
    /// verbatim as [`FilterExpr::Other`].
    pub fn condition(field: impl Into<String>, op: &str, value: impl Into<Value>) -> Self {
        match op.parse::<CompareOp>() {
            Ok(op) => Self::compare(field, op, value),
            Err(_) => FilterExpr::Other {
                field: field.into(),
                op: op.trim().to_string(),
                value: value.into(),
            },
        }
    }

    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// Create a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    /// Create a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    /// Create an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        FilterExpr::IsNull { field: field.into() }
    }

    /// Create an AND of simple filters.
    pub fn and(exprs: Vec<SimpleFilter>) -> Self {
        FilterExpr::And(exprs)
    }

    /// Create an OR of simple filters.
    pub fn or(exprs: Vec<SimpleFilter>) -> Self {
        FilterExpr::Or(exprs)
    }

    /// Split a comparison into its parts. `None` for every other shape.
    pub fn as_comparison(&self) -> Option<(&str, CompareOp, &Value)> {
        match self {
            FilterExpr::Eq { field, value } => Some((field, CompareOp::Eq, value)),
            FilterExpr::Ne { field, value } => Some((field, CompareOp::Ne, value)),
            FilterExpr::Lt { field, value } => Some((field, CompareOp::Lt, value)),
            FilterExpr::Le { field, value } => Some((field, CompareOp::Le, value)),
            FilterExpr::Gt { field, value } => Some((field, CompareOp::Gt, value)),
            FilterExpr::Ge { field, value } => Some((field, CompareOp::Ge, value)),
            _ => None,
        }
    }
}

impl SimpleFilter {
    /// Build a comparison from an operator.
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match op {
            CompareOp::Eq => SimpleFilter::Eq { field, value },
            CompareOp::Ne => SimpleFilter::Ne { field, value },
            CompareOp::Lt => SimpleFilter::Lt { field, value },
            CompareOp::Le => SimpleFilter::Le { field, value },
            CompareOp::Gt => SimpleFilter::Gt { field, value },
            CompareOp::Ge => SimpleFilter::Ge { field, value },
        }
    }

    /// Name of the field this condition reads.
    pub fn field(&self) -> &str {
        match self {
            SimpleFilter::Eq { field, .. }
            | SimpleFilter::Ne { field, .. }
            | SimpleFilter::Lt { field, .. }
            | SimpleFilter::Le { field, .. }
            | SimpleFilter::Gt { field, .. }
            | SimpleFilter::Ge { field, .. }
            | SimpleFilter::In { field, .. }
            | SimpleFilter::NotIn { field, .. }
            | SimpleFilter::IsNull { field }
            | SimpleFilter::IsNotNull { field }
            | SimpleFilter::Other { field, .. } => field,
        }
    }
}

impl From<SimpleFilter> for FilterExpr {
    fn from(filter: SimpleFilter) -> Self {
        match filter {
            SimpleFilter::Eq { field, value } => FilterExpr::Eq { field, value },
            SimpleFilter::Ne { field, value } => FilterExpr::Ne { field, value },
            SimpleFilter::Lt { field, value } => FilterExpr::Lt { field, value },
            SimpleFilter::Le { field, value } => FilterExpr::Le { field, value },
            SimpleFilter::Gt { field, value } => FilterExpr::Gt { field, value },
            SimpleFilter::Ge { field, value } => FilterExpr::Ge { field, value },
            SimpleFilter::In { field, values } => FilterExpr::In { field, values },
            SimpleFilter::NotIn { field, values } => FilterExpr::NotIn { field, values },
            SimpleFilter::IsNull { field } => FilterExpr::IsNull { field },
            SimpleFilter::IsNotNull { field } => FilterExpr::IsNotNull { field },
            SimpleFilter::Other { field, op, value } => FilterExpr::Other { field, op, value },
        }
    }
}

impl TryFrom<FilterExpr> for SimpleFilter {
    type Error = Error;

    fn try_from(expr: FilterExpr) -> Result<Self, Self::Error> {
        match expr {
            FilterExpr::Eq { field, value } => Ok(SimpleFilter::Eq { field, value }),
            FilterExpr::Ne { field, value } => Ok(SimpleFilter::Ne { field, value }),
            FilterExpr::Lt { field, value } => Ok(SimpleFilter::Lt { field, value }),
            FilterExpr::Le { field, value } => Ok(SimpleFilter::Le { field, value }),
            FilterExpr::Gt { field, value } => Ok(SimpleFilter::Gt { field, value }),
            FilterExpr::Ge { field, value } => Ok(SimpleFilter::Ge { field, value }),
            FilterExpr::In { field, values } => Ok(SimpleFilter::In { field, values }),
            FilterExpr::NotIn { field, values } => Ok(SimpleFilter::NotIn { field, values }),
            FilterExpr::IsNull { field } => Ok(SimpleFilter::IsNull { field }),
            FilterExpr::IsNotNull { field } => Ok(SimpleFilter::IsNotNull { field }),
            FilterExpr::Other { field, op, value } => Ok(SimpleFilter::Other { field, op, value }),
            FilterExpr::And(_) | FilterExpr::Or(_) => Err(Error::NestedFilter),
        }
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    write!(f, "({})", parts.join(", "))
}

impl fmt::Display for SimpleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        FilterExpr::from(self.clone()).fmt(f)
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Eq { field, value }
            | FilterExpr::Ne { field, value }
            | FilterExpr::Lt { field, value }
            | FilterExpr::Le { field, value }
            | FilterExpr::Gt { field, value }
            | FilterExpr::Ge { field, value } => {
                let op = self.as_comparison().map(|(_, op, _)| op.symbol()).unwrap_or("?");
                write!(f, "{field} {op} {value}")
            }
            FilterExpr::In { field, values } => {
                write!(f, "{field} IN ")?;
                fmt_list(f, values)
            }
            FilterExpr::NotIn { field, values } => {
                write!(f, "{field} NOT IN ")?;
                fmt_list(f, values)
            }
            FilterExpr::IsNull { field } => write!(f, "{field} IS NULL"),
            FilterExpr::IsNotNull { field } => write!(f, "{field} IS NOT NULL"),
            FilterExpr::Other { field, op, value } => write!(f, "{field} {op} {value}"),
            FilterExpr::And(items) => fmt_joined(f, items, " AND "),
            FilterExpr::Or(items) => fmt_joined(f, items, " OR "),
        }
    }
}

fn fmt_joined(f: &mut fmt::Formatter<'_>, items: &[SimpleFilter], joiner: &str) -> fmt::Result {
    let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    write!(f, "({})", parts.join(joiner))
}
