//! Rows whose field sets are only known at runtime.
//!
//! A [`DynShape`] is built once per source (for instance from a query's
//! column metadata) and shared by every [`DynRow`] decoded from that source.
//! `DynShape` doubles as an [`OutputShape`], so a join can also produce
//! runtime-shaped rows.

use std::sync::Arc;

use crate::error::{ConstructError, JoinError, Side, ValueError};
use crate::record::{OutputShape, Record};
use crate::shape::{FieldDef, FieldType, Shape};
use crate::value::Value;

/// A shared, validated runtime shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DynShape(Arc<Shape>);

impl DynShape {
    pub fn builder(name: impl Into<String>) -> DynShapeBuilder {
        DynShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.0
    }

    /// Builds a row, checking arity and that every value fits its field.
    pub fn row(&self, values: Vec<Value>) -> Result<DynRow, ConstructError> {
        if values.len() != self.0.len() {
            return Err(ConstructError::Arity {
                expected: self.0.len(),
                found: values.len(),
            });
        }
        for (def, value) in self.0.fields().iter().zip(&values) {
            if !value.conforms_to(&def.ty) {
                return Err(ConstructError::for_field(
                    def.name.clone(),
                    ValueError::Mismatch {
                        expected: def.ty,
                        found: value.type_name(),
                    },
                ));
            }
        }
        Ok(DynRow {
            shape: Arc::clone(&self.0),
            values,
        })
    }
}

impl OutputShape for DynShape {
    type Output = DynRow;

    fn shape(&self) -> &Shape {
        &self.0
    }

    fn construct(&self, values: Vec<Value>) -> Result<DynRow, ConstructError> {
        self.row(values)
    }
}

/// Builder for [`DynShape`]; fields are kept in insertion order.
#[derive(Debug, Clone)]
pub struct DynShapeBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl DynShapeBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    pub fn build(self) -> Result<DynShape, JoinError> {
        let shape = Shape::new(self.name, self.fields);
        // Roles are unknown until the shape is used in a join.
        shape.check_unique(Side::Output)?;
        Ok(DynShape(Arc::new(shape)))
    }
}

/// A row of a [`DynShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct DynRow {
    shape: Arc<Shape>,
    values: Vec<Value>,
}

impl DynRow {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Record for DynRow {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn field(&self, index: usize) -> Option<Value> {
        self.values.get(index).cloned()
    }
}
