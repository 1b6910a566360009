//! Core type definitions for the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display precision for floating point fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Digits {
    /// Explicit total digits and digits after the decimal point.
    Fixed {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after decimal point.
        scale: u8,
    },
    /// Precision looked up by name in the host's decimal precision table.
    Named(String),
}

/// Scalar data types a field can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// Boolean flag.
    Bool,
    /// 32-bit signed integer.
    Integer,
    /// Floating point with optional display precision.
    Float(Option<Digits>),
    /// Amount expressed in the currency held by another field.
    Monetary {
        /// Field holding the currency.
        currency_field: String,
    },
    /// Single-line string.
    Char,
    /// Multi-line plain text.
    Text,
    /// Rich text.
    Html {
        /// Run the HTML sanitizer on write.
        sanitize: bool,
        /// Remove inline `style` attributes while sanitizing.
        strip_style: bool,
    },
    /// Binary attachment.
    Binary,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
}

/// Field types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A scalar value.
    Scalar(ScalarType),
    /// A closed set of `(key, label)` options.
    Selection {
        /// Allowed options in display order.
        options: Vec<(String, String)>,
    },
    /// A reference to records of another entity through a named relation.
    Relational {
        /// Name of the relation in the schema.
        relation: String,
    },
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Integer | ScalarType::Float(_) | ScalarType::Monetary { .. }
        )
    }

    /// Check if this type is a calendar type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ScalarType::Date | ScalarType::DateTime)
    }

    /// Check if this type is stored as a string.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ScalarType::Char | ScalarType::Text | ScalarType::Html { .. }
        )
    }
}

impl FieldType {
    /// Create a scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// Create a selection from `(key, label)` pairs.
    pub fn selection<K, L>(options: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        FieldType::Selection {
            options: options
                .into_iter()
                .map(|(k, l)| (k.into(), l.into()))
                .collect(),
        }
    }

    /// Create a relational field type.
    pub fn relational(relation: impl Into<String>) -> Self {
        FieldType::Relational {
            relation: relation.into(),
        }
    }

    /// Get the inner scalar type if this is a scalar field.
    pub fn scalar_type(&self) -> Option<&ScalarType> {
        match self {
            FieldType::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Relation name for relational fields.
    pub fn relation(&self) -> Option<&str> {
        match self {
            FieldType::Relational { relation } => Some(relation),
            _ => None,
        }
    }

    /// Whether `key` is one of the selection options.
    pub fn allows_option(&self, key: &str) -> bool {
        match self {
            FieldType::Selection { options } => options.iter().any(|(k, _)| k == key),
            _ => false,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "boolean",
            ScalarType::Integer => "integer",
            ScalarType::Float(_) => "float",
            ScalarType::Monetary { .. } => "monetary",
            ScalarType::Char => "char",
            ScalarType::Text => "text",
            ScalarType::Html { .. } => "html",
            ScalarType::Binary => "binary",
            ScalarType::Date => "date",
            ScalarType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            FieldType::Selection { .. } => f.write_str("selection"),
            FieldType::Relational { relation } => write!(f, "relational({relation})"),
        }
    }
}
