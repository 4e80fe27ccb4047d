//! Output field resolution.
//!
//! Each output field is resolved by name against the left shape first, then
//! the right shape, then the zero-equivalent of its declared type. The
//! resulting table is built once per join and applied to every pair.

use std::fmt;

use crate::error::{ConstructError, JoinError, Side};
use crate::record::Record;
use crate::shape::{FieldDef, FieldType, Shape};
use crate::value::Value;

/// Where one output field takes its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// Field at this position in the left shape.
    Left(usize),
    /// Field at this position in the right shape.
    Right(usize),
    /// Zero-equivalent of the output field's type.
    Default(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub ty: FieldType,
    pub source: FieldSource,
}

/// One resolution rule per output field, in output construction order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTable {
    output: String,
    fields: Vec<ResolvedField>,
}

impl ResolutionTable {
    pub fn build(left: &Shape, right: &Shape, output: &Shape) -> Result<Self, JoinError> {
        left.check_unique(Side::Left)?;
        right.check_unique(Side::Right)?;
        output.check_unique(Side::Output)?;

        let fields = output
            .fields()
            .iter()
            .map(|def| {
                let source = if let Some(index) = left.position(&def.name) {
                    check_source_type(def, Side::Left, left.fields()[index].ty, left, right)?;
                    FieldSource::Left(index)
                } else if let Some(index) = right.position(&def.name) {
                    check_source_type(def, Side::Right, right.fields()[index].ty, left, right)?;
                    FieldSource::Right(index)
                } else {
                    let zero = def.ty.zero_value().ok_or_else(|| JoinError::NoZeroValue {
                        field: def.name.clone(),
                        ty: def.ty,
                        left: left.field_set(),
                        right: right.field_set(),
                    })?;
                    FieldSource::Default(zero)
                };
                Ok(ResolvedField {
                    name: def.name.clone(),
                    ty: def.ty,
                    source,
                })
            })
            .collect::<Result<Vec<_>, JoinError>>()?;

        let table = Self {
            output: output.name().to_string(),
            fields,
        };
        tracing::debug!(
            left = left.name(),
            right = right.name(),
            output = output.name(),
            "built resolution table\n{table}"
        );
        Ok(table)
    }

    pub fn output_name(&self) -> &str {
        &self.output
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn source_of(&self, name: &str) -> Option<&FieldSource> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.source)
    }

    /// Values for one output record, in output order.
    pub fn project<L, R>(&self, left: &L, right: &R) -> Result<Vec<Value>, ConstructError>
    where
        L: Record + ?Sized,
        R: Record + ?Sized,
    {
        self.fields
            .iter()
            .map(|field| match &field.source {
                FieldSource::Left(index) => {
                    left.field(*index).ok_or_else(|| ConstructError::MissingValue {
                        side: Side::Left,
                        field: field.name.clone(),
                    })
                }
                FieldSource::Right(index) => {
                    right.field(*index).ok_or_else(|| ConstructError::MissingValue {
                        side: Side::Right,
                        field: field.name.clone(),
                    })
                }
                FieldSource::Default(zero) => Ok(zero.clone()),
            })
            .collect()
    }
}

fn check_source_type(
    def: &FieldDef,
    side: Side,
    found: FieldType,
    left: &Shape,
    right: &Shape,
) -> Result<(), JoinError> {
    if def.ty.accepts(&found) {
        Ok(())
    } else {
        Err(JoinError::FieldTypeMismatch {
            field: def.name.clone(),
            side,
            expected: def.ty,
            found,
            left: left.field_set(),
            right: right.field_set(),
        })
    }
}

impl fmt::Display for ResolutionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}.{}: {} <- ", self.output, field.name, field.ty)?;
            match &field.source {
                FieldSource::Left(_) => write!(f, "left.{}", field.name)?,
                FieldSource::Right(_) => write!(f, "right.{}", field.name)?,
                FieldSource::Default(zero) => write!(f, "default {zero}")?,
            }
        }
        Ok(())
    }
}
