//! Record traits: shape access, positional field access and canonical
//! construction.
//!
//! These are normally implemented with `#[derive(Record)]`; runtime-shaped
//! rows implement them through [`crate::dynamic`].

use std::fmt;
use std::marker::PhantomData;

use crate::error::{ConstructError, Side};
use crate::shape::Shape;
use crate::value::{FieldValue, Value};

/// A structured value with a named, ordered, typed set of fields.
pub trait Record {
    /// The shape this record conforms to.
    fn shape(&self) -> &Shape;

    /// Value of the field at `index` in shape order.
    fn field(&self, index: usize) -> Option<Value>;
}

/// A record type whose shape is known at compile time.
pub trait StaticShape {
    fn static_shape() -> &'static Shape;
}

/// Canonical constructor: builds a record from values in shape order.
pub trait FromValues: Sized {
    fn from_values(values: Vec<Value>) -> Result<Self, ConstructError>;
}

/// Descriptor of the record type a join produces.
pub trait OutputShape {
    type Output;

    fn shape(&self) -> &Shape;

    /// Build one output record from values in [`OutputShape::shape`] order.
    fn construct(&self, values: Vec<Value>) -> Result<Self::Output, ConstructError>;
}

/// [`OutputShape`] for a compile-time record type.
pub struct RecordShape<T>(PhantomData<fn() -> T>);

impl<T> RecordShape<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for RecordShape<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordShape<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordShape<T> {}

impl<T: StaticShape> fmt::Debug for RecordShape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordShape")
            .field(&T::static_shape().name())
            .finish()
    }
}

impl<T: StaticShape + FromValues> OutputShape for RecordShape<T> {
    type Output = T;

    fn shape(&self) -> &Shape {
        T::static_shape()
    }

    fn construct(&self, values: Vec<Value>) -> Result<T, ConstructError> {
        T::from_values(values)
    }
}

/// Output descriptor for the derived record type `T`.
pub fn shape_of<T: StaticShape + FromValues>() -> RecordShape<T> {
    RecordShape::new()
}

/// Support code for `#[derive(Record)]`. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use lazy_static::lazy_static;

    use super::*;

    pub fn check_arity(expected: usize, values: &[Value]) -> Result<(), ConstructError> {
        if values.len() == expected {
            Ok(())
        } else {
            Err(ConstructError::Arity {
                expected,
                found: values.len(),
            })
        }
    }

    pub fn take_field<T: FieldValue>(
        values: &mut impl Iterator<Item = Value>,
        field: &'static str,
    ) -> Result<T, ConstructError> {
        let value = values.next().ok_or_else(|| ConstructError::MissingValue {
            side: Side::Output,
            field: field.to_string(),
        })?;
        T::from_value(value).map_err(|e| ConstructError::for_field(field, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::shape::FieldType;

    #[derive(Debug, PartialEq, crate::Record)]
    struct Pair {
        key: i32,
        #[record(rename = "valA")]
        val_a: String,
    }

    #[derive(Debug, PartialEq, crate::Record)]
    struct WithSkipped {
        id: u64,
        #[record(skip)]
        scratch: Vec<String>,
        note: Option<String>,
    }

    #[derive(Debug, PartialEq, crate::Record)]
    #[record(name = "pair_row")]
    struct Named {
        key: i32,
    }

    #[test]
    fn struct_name_attribute_overrides_shape_name() {
        assert_eq!(Named::static_shape().name(), "pair_row");
    }

    #[test]
    fn derived_shape_uses_declaration_order_and_renames() {
        let shape = Pair::static_shape();
        assert_eq!(shape.name(), "Pair");
        let names: Vec<_> = shape.field_names().collect();
        assert_eq!(names, vec!["key", "valA"]);
        assert_eq!(shape.fields()[0].ty, FieldType::I32);
        assert_eq!(shape.fields()[1].ty, FieldType::TEXT);
    }

    #[test]
    fn derived_shape_is_cached() {
        assert!(std::ptr::eq(Pair::static_shape(), Pair::static_shape()));
        let pair = Pair {
            key: 1,
            val_a: "foo".into(),
        };
        assert!(std::ptr::eq(pair.shape(), Pair::static_shape()));
    }

    #[test]
    fn derived_accessors_are_positional() {
        let pair = Pair {
            key: 1,
            val_a: "foo".into(),
        };
        assert_eq!(pair.field(0), Some(Value::I32(1)));
        assert_eq!(pair.field(1), Some(Value::Text("foo".into())));
        assert_eq!(pair.field(2), None);
    }

    #[test]
    fn derived_constructor_round_trips_shape_order() {
        let built = Pair::from_values(vec![Value::I32(3), Value::Text("x".into())]).unwrap();
        assert_eq!(
            built,
            Pair {
                key: 3,
                val_a: "x".into()
            }
        );
    }

    #[test]
    fn derived_constructor_reports_arity_and_type() {
        let err = Pair::from_values(vec![Value::I32(3)]).unwrap_err();
        assert_eq!(
            err,
            ConstructError::Arity {
                expected: 2,
                found: 1
            }
        );

        let err = Pair::from_values(vec![Value::I32(3), Value::Null]).unwrap_err();
        assert_eq!(
            err,
            ConstructError::Value {
                field: "valA".into(),
                source: ValueError::Mismatch {
                    expected: FieldType::TEXT,
                    found: "null"
                }
            }
        );
    }

    #[test]
    fn skipped_fields_leave_the_shape_and_default() {
        let shape = WithSkipped::static_shape();
        let names: Vec<_> = shape.field_names().collect();
        assert_eq!(names, vec!["id", "note"]);
        assert_eq!(shape.fields()[1].ty, FieldType::TEXT.nullable());

        let built = WithSkipped::from_values(vec![Value::U64(9), Value::Null]).unwrap();
        assert_eq!(
            built,
            WithSkipped {
                id: 9,
                scratch: Vec::new(),
                note: None
            }
        );
        assert_eq!(built.field(1), Some(Value::Null));
    }

    #[test]
    fn record_shape_descriptor() {
        let out = shape_of::<Pair>();
        assert_eq!(out.shape().len(), 2);
        let pair = out
            .construct(vec![Value::I32(1), Value::Text("a".into())])
            .unwrap();
        assert_eq!(pair.key, 1);
        assert_eq!(format!("{out:?}"), "RecordShape(\"Pair\")");
    }
}
