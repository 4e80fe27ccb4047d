//! Fixture records and test helpers shared by rowjoin's integration tests and
//! benches.

use rowjoin::{DynRow, DynShape, FieldType, Record, Value};

/// Left-hand fixture: `{key, valA}`.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordA {
    pub key: i32,
    #[record(rename = "valA")]
    pub val_a: String,
}

/// Right-hand fixture: `{key, valB}`.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordB {
    pub key: i32,
    #[record(rename = "valB")]
    pub val_b: String,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordAB {
    pub key: i32,
    #[record(rename = "valA")]
    pub val_a: String,
    #[record(rename = "valB")]
    pub val_b: String,
}

/// `RecordAB` plus a field neither side provides.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordABExtra {
    pub key: i32,
    #[record(rename = "valA")]
    pub val_a: String,
    #[record(rename = "valB")]
    pub val_b: String,
    pub extra: f32,
}

/// Right-hand fixture that also carries a `valA`, to exercise left precedence.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordBShadow {
    pub key: i32,
    #[record(rename = "valA")]
    pub val_a: String,
    #[record(rename = "valB")]
    pub val_b: String,
}

/// Output with one defaulted field of each zero-value family.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct RecordDefaults {
    pub key: i32,
    pub count: u64,
    pub ratio: f64,
    pub flag: bool,
    pub initial: char,
    pub label: String,
    pub note: Option<String>,
    pub blob: Vec<u8>,
}

pub fn a(key: i32, val_a: &str) -> RecordA {
    RecordA {
        key,
        val_a: val_a.to_string(),
    }
}

pub fn b(key: i32, val_b: &str) -> RecordB {
    RecordB {
        key,
        val_b: val_b.to_string(),
    }
}

pub fn ab(key: i32, val_a: &str, val_b: &str) -> RecordAB {
    RecordAB {
        key,
        val_a: val_a.to_string(),
        val_b: val_b.to_string(),
    }
}

/// Runtime shape standing in for rows decoded from an `accounts` table.
pub fn accounts_shape() -> DynShape {
    DynShape::builder("accounts")
        .field("account_id", FieldType::I64)
        .field("owner", FieldType::TEXT)
        .field("closed", FieldType::BOOL)
        .build()
        .expect("accounts shape has unique fields")
}

/// Runtime shape standing in for rows decoded from a `balances` table.
pub fn balances_shape() -> DynShape {
    DynShape::builder("balances")
        .field("account_id", FieldType::I64)
        .field("currency", FieldType::TEXT)
        .field("cents", FieldType::I64)
        .build()
        .expect("balances shape has unique fields")
}

pub fn account(shape: &DynShape, id: i64, owner: &str, closed: bool) -> DynRow {
    shape
        .row(vec![
            Value::I64(id),
            Value::Text(owner.to_string()),
            Value::Bool(closed),
        ])
        .expect("account row matches accounts shape")
}

pub fn balance(shape: &DynShape, id: i64, currency: &str, cents: i64) -> DynRow {
    shape
        .row(vec![
            Value::I64(id),
            Value::Text(currency.to_string()),
            Value::I64(cents),
        ])
        .expect("balance row matches balances shape")
}

/// Install a test-writer subscriber honouring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
