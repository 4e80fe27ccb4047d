//! Inner joins between collections of differently shaped records.
//!
//! Two inputs are grouped by caller-supplied key functions, matching pairs are
//! cross-multiplied, and each pair is projected into an output record by field
//! name: left fields win over right fields, and fields present on neither side
//! take the zero value of their declared type.
//!
//! ```rust,ignore
//! use rowjoin::{inner_join, shape_of, Record};
//!
//! #[derive(Record)]
//! struct Order { customer_id: i64, total: f64 }
//!
//! #[derive(Record)]
//! struct Customer { customer_id: i64, name: String }
//!
//! #[derive(Record)]
//! struct Invoice { customer_id: i64, name: String, total: f64, discount: f64 }
//!
//! let invoices = inner_join(
//!     &orders, |o| o.customer_id,
//!     &customers, |c| c.customer_id,
//!     &shape_of::<Invoice>(),
//! )?;
//! ```

// Generated code refers to `::rowjoin`, including inside this crate's tests.
extern crate self as rowjoin;

mod config;
pub mod dynamic;
mod error;
pub mod group;
mod join;
mod record;
pub mod resolve;
mod shape;
mod value;

pub use config::{ConstructFailurePolicy, JoinConfig};
pub use dynamic::{DynRow, DynShape, DynShapeBuilder};
pub use error::{ConstructError, FieldSet, JoinError, Side, ValueError};
pub use group::Groups;
pub use join::{inner_join, Joined, Joiner, RowOutcome, SkippedRow};
pub use record::{shape_of, FromValues, OutputShape, Record, RecordShape, StaticShape};
pub use resolve::{FieldSource, ResolutionTable, ResolvedField};
pub use shape::{FieldDef, FieldKind, FieldType, Shape};
pub use value::{FieldValue, Value};

pub use rowjoin_derive::Record;

#[doc(hidden)]
pub use record::__private;
