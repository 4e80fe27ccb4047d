//! Dynamically typed field values and the conversions between them and Rust
//! field types.

use std::fmt;

use crate::error::ValueError;
use crate::shape::{FieldKind, FieldType};

/// A single field value lifted out of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Kind of a non-null value.
    pub fn kind(&self) -> Option<FieldKind> {
        let kind = match self {
            Value::Null => return None,
            Value::Bool(_) => FieldKind::Bool,
            Value::I8(_) => FieldKind::I8,
            Value::I16(_) => FieldKind::I16,
            Value::I32(_) => FieldKind::I32,
            Value::I64(_) => FieldKind::I64,
            Value::U8(_) => FieldKind::U8,
            Value::U16(_) => FieldKind::U16,
            Value::U32(_) => FieldKind::U32,
            Value::U64(_) => FieldKind::U64,
            Value::F32(_) => FieldKind::F32,
            Value::F64(_) => FieldKind::F64,
            Value::Char(_) => FieldKind::Char,
            Value::Text(_) => FieldKind::Text,
            Value::Bytes(_) => FieldKind::Bytes,
        };
        Some(kind)
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().map_or("null", |kind| kind.name())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value may be stored in a field of type `ty`.
    ///
    /// `Other` kinds carry their own representation and accept any non-null
    /// value.
    pub fn conforms_to(&self, ty: &FieldType) -> bool {
        match self.kind() {
            None => ty.nullable,
            Some(_) if matches!(ty.kind, FieldKind::Other(_)) => true,
            Some(kind) => kind == ty.kind,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v:?}"),
            Value::F64(v) => write!(f, "{v:?}"),
            Value::Char(v) => write!(f, "{v:?}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// A Rust type that can be stored in a record field.
///
/// Implemented for the primitive scalars, `String`, `Vec<u8>` and `Option<T>`.
/// Caller-defined types may implement it with [`FieldType::other`], which opts
/// them out of zero-value defaulting.
pub trait FieldValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch<T: FieldValue>(found: &Value) -> ValueError {
    ValueError::Mismatch {
        expected: T::FIELD_TYPE,
        found: found.type_name(),
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident, $const:ident;)+) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::$const;

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )+
    };
}

scalar_field_value! {
    bool => Bool, BOOL;
    i8 => I8, I8;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    u8 => U8, U8;
    u16 => U16, U16;
    u32 => U32, U32;
    u64 => U64, U64;
    f32 => F32, F32;
    f64 => F64, F64;
    char => Char, CHAR;
    String => Text, TEXT;
    Vec<u8> => Bytes, BYTES;
}

// Pointer-sized integers travel as their 64-bit counterparts.
impl FieldValue for usize {
    const FIELD_TYPE: FieldType = FieldType::U64;

    fn to_value(&self) -> Value {
        Value::U64(*self as u64)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::U64(v) => usize::try_from(v).map_err(|_| ValueError::OutOfRange {
                value: v.to_string(),
                target: "usize",
            }),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for isize {
    const FIELD_TYPE: FieldType = FieldType::I64;

    fn to_value(&self) -> Value {
        Value::I64(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::I64(v) => isize::try_from(v).map_err(|_| ValueError::OutOfRange {
                value: v.to_string(),
                target: "isize",
            }),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE.nullable();

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        assert_eq!(42i32.to_value(), Value::I32(42));
        assert_eq!(i32::from_value(Value::I32(7)), Ok(7));
        assert_eq!("foo".to_string().to_value(), Value::Text("foo".into()));
        assert_eq!(bool::from_value(Value::Bool(true)), Ok(true));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let err = i32::from_value(Value::I64(1)).unwrap_err();
        assert_eq!(
            err,
            ValueError::Mismatch {
                expected: FieldType::I32,
                found: "i64"
            }
        );
        assert!(String::from_value(Value::Null).is_err());
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(<Option<String>>::FIELD_TYPE, FieldType::TEXT.nullable());
        assert_eq!(<Option<String>>::from_value(Value::Null), Ok(None));
        assert_eq!(
            <Option<String>>::from_value(Value::Text("x".into())),
            Ok(Some("x".to_string()))
        );
        assert_eq!(None::<i32>.to_value(), Value::Null);
    }

    #[test]
    fn usize_out_of_range() {
        assert_eq!(usize::from_value(Value::U64(3)), Ok(3));
        if usize::BITS < 64 {
            assert!(usize::from_value(Value::U64(u64::MAX)).is_err());
        }
        assert_eq!(isize::FIELD_TYPE, FieldType::I64);
    }

    #[test]
    fn conformity() {
        assert!(Value::Null.conforms_to(&FieldType::TEXT.nullable()));
        assert!(!Value::Null.conforms_to(&FieldType::TEXT));
        assert!(Value::I32(1).conforms_to(&FieldType::I32));
        assert!(!Value::I32(1).conforms_to(&FieldType::I64));
        assert!(Value::Text("id".into()).conforms_to(&FieldType::other("uuid")));
    }
}
