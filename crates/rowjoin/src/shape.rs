//! Structural descriptions of records: field names, field types and their
//! zero-equivalent defaults.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use crate::error::{FieldSet, JoinError, Side};
use crate::value::Value;

/// The storage kind of a field, independent of nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Text,
    Bytes,
    /// A caller-defined type identified by name. Has no zero-equivalent.
    Other(&'static str),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match *self {
            FieldKind::Bool => "bool",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Char => "char",
            FieldKind::Text => "text",
            FieldKind::Bytes => "bytes",
            FieldKind::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldType {
    pub const BOOL: Self = Self::new(FieldKind::Bool);
    pub const I8: Self = Self::new(FieldKind::I8);
    pub const I16: Self = Self::new(FieldKind::I16);
    pub const I32: Self = Self::new(FieldKind::I32);
    pub const I64: Self = Self::new(FieldKind::I64);
    pub const U8: Self = Self::new(FieldKind::U8);
    pub const U16: Self = Self::new(FieldKind::U16);
    pub const U32: Self = Self::new(FieldKind::U32);
    pub const U64: Self = Self::new(FieldKind::U64);
    pub const F32: Self = Self::new(FieldKind::F32);
    pub const F64: Self = Self::new(FieldKind::F64);
    pub const CHAR: Self = Self::new(FieldKind::Char);
    pub const TEXT: Self = Self::new(FieldKind::Text);
    pub const BYTES: Self = Self::new(FieldKind::Bytes);

    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// A caller-defined type with no zero-equivalent.
    pub const fn other(name: &'static str) -> Self {
        Self::new(FieldKind::Other(name))
    }

    pub const fn nullable(self) -> Self {
        Self {
            kind: self.kind,
            nullable: true,
        }
    }

    /// The zero-equivalent value for this type, or `None` when the type has
    /// no defined default.
    ///
    /// Nullable types default to [`Value::Null`] regardless of kind.
    pub fn zero_value(&self) -> Option<Value> {
        if self.nullable {
            return Some(Value::Null);
        }
        let zero = match self.kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::I8 => Value::I8(0),
            FieldKind::I16 => Value::I16(0),
            FieldKind::I32 => Value::I32(0),
            FieldKind::I64 => Value::I64(0),
            FieldKind::U8 => Value::U8(0),
            FieldKind::U16 => Value::U16(0),
            FieldKind::U32 => Value::U32(0),
            FieldKind::U64 => Value::U64(0),
            FieldKind::F32 => Value::F32(0.0),
            FieldKind::F64 => Value::F64(0.0),
            FieldKind::Char => Value::Char('\0'),
            FieldKind::Text => Value::Text(String::new()),
            FieldKind::Bytes => Value::Bytes(Vec::new()),
            FieldKind::Other(_) => return None,
        };
        Some(zero)
    }

    /// Whether a source field of type `source` may feed a field of this type.
    ///
    /// Kinds must match exactly. Nullability may differ: a null arriving in a
    /// non-nullable field is a per-row failure, not a shape mismatch.
    pub fn accepts(&self, source: &FieldType) -> bool {
        self.kind == source.kind
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// A single named, typed field of a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Named, ordered set of typed fields describing one record type.
///
/// Field order is the canonical construction order of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    name: String,
    fields: Vec<FieldDef>,
}

impl Shape {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the first field called `name`. Matching is exact and
    /// case-sensitive.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_set(&self) -> FieldSet {
        FieldSet::from_shape(self)
    }

    /// Rejects shapes that declare the same field name more than once.
    pub fn check_unique(&self, side: Side) -> Result<(), JoinError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        match self.field_names().find(|name| !seen.insert(*name)) {
            Some(dup) => Err(JoinError::DuplicateField {
                side,
                shape: self.name.clone(),
                field: dup.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{ {} }}",
            self.name,
            self.fields
                .iter()
                .map(|field| format!("{}: {}", field.name, field.ty))
                .join(", ")
        )
    }
}
