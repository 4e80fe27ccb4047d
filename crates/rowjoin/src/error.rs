//! Error types for rowjoin

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::shape::{FieldType, Shape};

/// Which role a shape or record plays in a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
            Side::Output => f.write_str("output"),
        }
    }
}

/// The field names of a shape, captured for error reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet {
    pub shape: String,
    pub fields: Vec<String>,
}

impl FieldSet {
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            shape: shape.name().to_string(),
            fields: shape.field_names().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.shape, self.fields.iter().join(", "))
    }
}

/// Errors that abort a whole join.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoinError {
    #[error(
        "output field `{field}` has type {ty} with no zero value and is absent from left {left} and right {right}"
    )]
    NoZeroValue {
        field: String,
        ty: FieldType,
        left: FieldSet,
        right: FieldSet,
    },

    #[error(
        "output field `{field}` expects {expected} but the {side} field has type {found}; left {left}, right {right}"
    )]
    FieldTypeMismatch {
        field: String,
        side: Side,
        expected: FieldType,
        found: FieldType,
        left: FieldSet,
        right: FieldSet,
    },

    #[error("{side} shape `{shape}` declares field `{field}` more than once")]
    DuplicateField {
        side: Side,
        shape: String,
        field: String,
    },

    #[error("output shape `{shape}` is inconsistent with its constructor: {source}")]
    OutputShapeMismatch {
        shape: String,
        #[source]
        source: ConstructError,
    },

    #[error("row from left #{left_index} and right #{right_index} could not be constructed: {source}")]
    RowConstruction {
        left_index: usize,
        right_index: usize,
        #[source]
        source: ConstructError,
    },
}

impl JoinError {
    /// Caller-side misconfiguration, as opposed to a data-driven row failure
    /// promoted by [`ConstructFailurePolicy::Abort`](crate::ConstructFailurePolicy::Abort).
    pub fn is_configuration(&self) -> bool {
        !matches!(self, JoinError::RowConstruction { .. })
    }
}

/// Why a single output record could not be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    #[error("field `{field}`: {source}")]
    Value {
        field: String,
        #[source]
        source: ValueError,
    },

    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("{side} record has no value for field `{field}`")]
    MissingValue { side: Side, field: String },

    #[error("{side} record has shape `{found}`, expected `{expected}`")]
    ShapeDrift {
        side: Side,
        expected: String,
        found: String,
    },
}

impl ConstructError {
    pub fn for_field(field: impl Into<String>, source: ValueError) -> Self {
        ConstructError::Value {
            field: field.into(),
            source,
        }
    }
}

/// A value could not be converted into a field type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: FieldType,
        found: &'static str,
    },

    #[error("{value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FieldDef;

    #[test]
    fn field_set_display() {
        let shape = Shape::new(
            "RecordB",
            [
                FieldDef::new("key", FieldType::I32),
                FieldDef::new("valB", FieldType::TEXT),
            ],
        );
        assert_eq!(FieldSet::from_shape(&shape).to_string(), "RecordB {key, valB}");
    }

    #[test]
    fn no_zero_value_names_field_and_both_shapes() {
        let err = JoinError::NoZeroValue {
            field: "id".into(),
            ty: FieldType::other("uuid"),
            left: FieldSet {
                shape: "L".into(),
                fields: vec!["key".into()],
            },
            right: FieldSet {
                shape: "R".into(),
                fields: vec!["key".into(), "name".into()],
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("`id`"));
        assert!(msg.contains("L {key}"));
        assert!(msg.contains("R {key, name}"));
        assert!(err.is_configuration());
    }

    #[test]
    fn row_construction_is_not_configuration() {
        let err = JoinError::RowConstruction {
            left_index: 0,
            right_index: 1,
            source: ConstructError::MissingValue {
                side: Side::Right,
                field: "valB".into(),
            },
        };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("right record has no value for field `valB`"));
    }
}
