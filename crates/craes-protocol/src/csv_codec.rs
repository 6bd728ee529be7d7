// crates/craes-protocol/src/csv_codec.rs

//! Order file codec.
//!
//! Each line of an order file is one order, no header row:
//!
//! `buy, volume, limitprice, condition, triggerprice, asset`
//!
//! - `buy`:          `true` | `false`
//! - `volume`:       integer, at least 1
//! - `limitprice`:   float >= 0, or `None`
//! - `condition`:    `stoploss` | `stopandreverse`, or `None`
//! - `triggerprice`: float >= 0 when a condition is set, `None` otherwise
//! - `asset`:        integer, at least 1
//!
//! Valid lines:
//!   `true,3,5.0,None,None,1`
//!   `false,10,1.0,stoploss,2.0,2`
//!
//! Tokens are taken as written (no trimming). A bad row, blank lines
//! included, aborts the whole file; no partial batch is returned.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::num::{ParseFloatError, ParseIntError};
use std::path::{Path, PathBuf};

use craes_core::{check_price, Condition, Order, OrderError, Side};
use thiserror::Error;

/// Absent-value sentinel.
pub const NONE_TOKEN: &str = "None";

/// Columns per row.
pub const FIELD_COUNT: usize = 6;

/// Why a single row was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("blank line")]
    BlankLine,

    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid buy flag {0:?}: expected `true` or `false`")]
    InvalidSide(String),

    #[error("invalid {field} {token:?}")]
    InvalidInteger {
        field: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid {field} {token:?}")]
    InvalidFloat {
        field: &'static str,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("{field} not positive: {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("unknown order condition {0:?}")]
    UnknownCondition(String),

    #[error("condition `{0}` requires a trigger price")]
    MissingTrigger(String),

    #[error("trigger price given without a condition")]
    UnexpectedTrigger,

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Errors reading a whole order file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// A row failed validation. `line` is 1-based.
    #[error("error in order file, line {line}")]
    Row {
        line: u64,
        #[source]
        source: FieldError,
    },

    #[error("cannot open order file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read order file")]
    Read(#[source] std::io::Error),

    #[error("cannot split order file row")]
    Csv(#[from] csv::Error),
}

/// Validate one row, given as its six text fields.
pub fn parse_order_fields(fields: &[&str]) -> Result<Order, FieldError> {
    if fields.len() != FIELD_COUNT {
        return Err(FieldError::FieldCount(fields.len()));
    }

    let side = match fields[0] {
        "true" => Side::Buy,
        "false" => Side::Sell,
        other => return Err(FieldError::InvalidSide(other.to_string())),
    };

    let volume = parse_positive("volume", fields[1])?;
    let limit_price = parse_optional_price("limit price", fields[2])?;

    let condition_token = match fields[3] {
        NONE_TOKEN => None,
        token @ ("stoploss" | "stopandreverse") => Some(token),
        other => return Err(FieldError::UnknownCondition(other.to_string())),
    };
    let trigger = parse_optional_price("trigger price", fields[4])?;

    let condition = match (condition_token, trigger) {
        (None, None) => Condition::Unconditional,
        (None, Some(_)) => return Err(FieldError::UnexpectedTrigger),
        (Some("stoploss"), Some(trigger)) => Condition::StopLoss { trigger },
        (Some(_), Some(trigger)) => Condition::StopAndReverse { trigger },
        (Some(token), None) => return Err(FieldError::MissingTrigger(token.to_string())),
    };

    let asset_id = parse_positive("asset id", fields[5])?;

    Ok(Order::new(side, volume, limit_price, condition, asset_id)?)
}

/// Validate one comma-separated line.
pub fn parse_order_line(line: &str) -> Result<Order, FieldError> {
    let fields: Vec<&str> = line.split(',').collect();
    parse_order_fields(&fields)
}

/// Read and validate every row.
///
/// Rows are read one physical line at a time so errors point at the real
/// line, blank ones included. A final line terminator is allowed.
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<Order>, CsvError> {
    let mut orders = Vec::new();

    for (index, text) in BufReader::new(reader).lines().enumerate() {
        let text = text.map_err(CsvError::Read)?;
        let line = index as u64 + 1;

        if text.is_empty() {
            return Err(CsvError::Row {
                line,
                source: FieldError::BlankLine,
            });
        }

        let record = split_record(&text)?;
        let fields: Vec<&str> = record.iter().collect();
        let order = parse_order_fields(&fields).map_err(|source| CsvError::Row { line, source })?;
        orders.push(order);
    }

    Ok(orders)
}

pub fn read_orders_from_path(path: impl AsRef<Path>) -> Result<Vec<Order>, CsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_orders(file)
}

/// Format an order back into its file line.
pub fn format_order_line(order: &Order) -> String {
    let buy = if order.side().is_buy() { "true" } else { "false" };
    let limit = order
        .limit_price()
        .map(|p| format!("{:?}", p))
        .unwrap_or_else(|| NONE_TOKEN.to_string());
    let condition = order.condition();
    let trigger = condition
        .trigger()
        .map(|p| format!("{:?}", p))
        .unwrap_or_else(|| NONE_TOKEN.to_string());

    format!(
        "{},{},{},{},{},{}",
        buy,
        order.volume(),
        limit,
        condition.as_token(),
        trigger,
        order.asset_id()
    )
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn split_record(text: &str) -> Result<csv::StringRecord, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    Ok(reader.records().next().transpose()?.unwrap_or_default())
}

/// Integer >= 1 over the full `u64` range. Negative tokens are reported as
/// `NotPositive` rather than as parse failures.
fn parse_positive(field: &'static str, token: &str) -> Result<u64, FieldError> {
    if token.starts_with('-') {
        let value = token
            .parse::<i64>()
            .map_err(|source| FieldError::InvalidInteger {
                field,
                token: token.to_string(),
                source,
            })?;
        return Err(FieldError::NotPositive { field, value });
    }

    let value = token
        .parse::<u64>()
        .map_err(|source| FieldError::InvalidInteger {
            field,
            token: token.to_string(),
            source,
        })?;
    if value == 0 {
        return Err(FieldError::NotPositive { field, value: 0 });
    }
    Ok(value)
}

fn parse_optional_price(field: &'static str, token: &str) -> Result<Option<f64>, FieldError> {
    if token == NONE_TOKEN {
        return Ok(None);
    }

    let value = token
        .parse::<f64>()
        .map_err(|source| FieldError::InvalidFloat {
            field,
            token: token.to_string(),
            source,
        })?;
    check_price(field, value)?;
    Ok(Some(value))
}
