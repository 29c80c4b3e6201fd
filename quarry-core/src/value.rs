use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{self, Display},
    mem,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// Lowercase spellings read as `true` by `IS TRUE` checks.
pub const TRUE_LITERALS: [&str; 6] = ["1", "y", "yes", "true", "on", "enabled"];
/// Lowercase spellings read as `false` by `IS FALSE` checks.
pub const FALSE_LITERALS: [&str; 6] = ["0", "n", "no", "false", "off", "disabled"];

/// A dynamically typed scalar.
///
/// Every variant but `Null` carries an `Option`: `Int32(None)` is a null that still
/// knows its type, which is what entity column prototypes are made of.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

/// Number view of a value used for ordering comparisons.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Numeric {
    Integer(i128),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }
    fn is_zero(self) -> bool {
        match self {
            Numeric::Integer(v) => v == 0,
            Numeric::Float(v) => v == 0.0,
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Integer(l), Numeric::Integer(r)) => l.partial_cmp(r),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

macro_rules! write_integer {
    ($value:expr) => {
        Cow::Owned(itoa::Buffer::new().format($value).to_owned())
    };
}

macro_rules! write_float {
    ($value:expr) => {
        Cow::Owned(ryu::Buffer::new().format($value).to_owned())
    };
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None)
            | Value::Int8(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::UInt8(None)
            | Value::UInt16(None)
            | Value::UInt32(None)
            | Value::UInt64(None)
            | Value::Float32(None)
            | Value::Float64(None)
            | Value::Decimal(None)
            | Value::Char(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Date(None)
            | Value::Time(None)
            | Value::Timestamp(None)
            | Value::TimestampWithTimezone(None)
            | Value::Uuid(None) => true,
            _ => false,
        }
    }

    /// The null of the same type.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(..) => Value::Decimal(None),
            Value::Char(..) => Value::Char(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int8(..)
                | Value::Int16(..)
                | Value::Int32(..)
                | Value::Int64(..)
                | Value::UInt8(..)
                | Value::UInt16(..)
                | Value::UInt32(..)
                | Value::UInt64(..)
                | Value::Float32(..)
                | Value::Float64(..)
                | Value::Decimal(..)
        )
    }

    /// Canonical string form, `None` for null.
    ///
    /// Integers and decimals are written in base 10, floats with the shortest
    /// representation that reads back to the same number, booleans as `true`/`false`,
    /// blobs as lowercase hex and temporal values in ISO-8601 with a space separator.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        Some(match self {
            Value::Boolean(Some(v)) => Cow::Borrowed(if *v { "true" } else { "false" }),
            Value::Int8(Some(v)) => write_integer!(*v),
            Value::Int16(Some(v)) => write_integer!(*v),
            Value::Int32(Some(v)) => write_integer!(*v),
            Value::Int64(Some(v)) => write_integer!(*v),
            Value::UInt8(Some(v)) => write_integer!(*v),
            Value::UInt16(Some(v)) => write_integer!(*v),
            Value::UInt32(Some(v)) => write_integer!(*v),
            Value::UInt64(Some(v)) => write_integer!(*v),
            Value::Float32(Some(v)) => write_float!(*v),
            Value::Float64(Some(v)) => write_float!(*v),
            Value::Decimal(Some(v)) => Cow::Owned(v.normalize().to_string()),
            Value::Char(Some(v)) => Cow::Owned(v.to_string()),
            Value::Varchar(Some(v)) => Cow::Borrowed(v.as_str()),
            Value::Blob(Some(v)) => Cow::Owned(hex::encode(v)),
            Value::Date(Some(v)) => Cow::Owned(v.to_string()),
            Value::Time(Some(v)) => Cow::Owned(format_time(v)),
            Value::Timestamp(Some(v)) => {
                Cow::Owned(format!("{} {}", v.date(), format_time(&v.time())))
            }
            Value::TimestampWithTimezone(Some(v)) => Cow::Owned(format!(
                "{} {}{}",
                v.date(),
                format_time(&v.time()),
                format_offset(v.offset())
            )),
            Value::Uuid(Some(v)) => Cow::Owned(v.hyphenated().to_string()),
            _ => return None,
        })
    }

    pub(crate) fn as_numeric(&self) -> Option<Numeric> {
        Some(match self {
            Value::Int8(Some(v)) => Numeric::Integer(*v as _),
            Value::Int16(Some(v)) => Numeric::Integer(*v as _),
            Value::Int32(Some(v)) => Numeric::Integer(*v as _),
            Value::Int64(Some(v)) => Numeric::Integer(*v as _),
            Value::UInt8(Some(v)) => Numeric::Integer(*v as _),
            Value::UInt16(Some(v)) => Numeric::Integer(*v as _),
            Value::UInt32(Some(v)) => Numeric::Integer(*v as _),
            Value::UInt64(Some(v)) => Numeric::Integer(*v as _),
            Value::Float32(Some(v)) => Numeric::Float(*v as _),
            Value::Float64(Some(v)) => Numeric::Float(*v),
            Value::Decimal(Some(v)) => match v.fract().is_zero() {
                true => Numeric::Integer(v.to_i128()?),
                false => Numeric::Float(v.to_f64()?),
            },
            Value::Varchar(Some(v)) => parse_numeric(v)?,
            Value::Char(Some(v)) => Numeric::Integer(v.to_digit(10)? as _),
            _ => return None,
        })
    }

    /// Equality of the canonical string forms, `false` when either side is null.
    pub fn text_eq(&self, other: &Value) -> bool {
        match (self.to_text(), other.to_text()) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    /// Equality across types: numeric values compare by number (`5i64` equals `5i32`
    /// and `5.0`), anything else by canonical string. `false` when either side is null.
    pub fn value_eq(&self, other: &Value) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return self.compare(other) == Some(Ordering::Equal);
        }
        self.text_eq(other)
    }

    /// Numeric ordering when both sides read as numbers, lexical ordering of the
    /// canonical string forms otherwise. `None` when either side is null.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if let (Some(l), Some(r)) = (self.as_numeric(), other.as_numeric()) {
            return l.partial_cmp(&r);
        }
        Some(self.to_text()?.as_ref().cmp(other.to_text()?.as_ref()))
    }

    /// Permissive truthiness: booleans, numbers (zero is false) and the spellings in
    /// [`TRUE_LITERALS`]/[`FALSE_LITERALS`]. `None` for null and for anything else.
    pub fn as_truth(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => *v,
            Value::Varchar(..) | Value::Char(..) => {
                let text = self.to_text()?.to_lowercase();
                if TRUE_LITERALS.contains(&text.as_str()) {
                    Some(true)
                } else if FALSE_LITERALS.contains(&text.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            _ if self.is_numeric() => self.as_numeric().map(|v| !v.is_zero()),
            _ => None,
        }
    }
}

fn parse_numeric(text: &str) -> Option<Numeric> {
    let text = text.trim();
    let digits = text.trim_start_matches(['-', '+']);
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if let Ok(v) = text.parse::<i128>() {
        return Some(Numeric::Integer(v));
    }
    text.parse::<f64>().ok().map(Numeric::Float)
}

fn format_time(time: &Time) -> String {
    let mut result = format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    );
    if time.nanosecond() != 0 {
        let fraction = format!("{:09}", time.nanosecond());
        result.push('.');
        result.push_str(fraction.trim_end_matches('0'));
    }
    result
}

fn format_offset(offset: UtcOffset) -> String {
    let (hours, minutes, _) = offset.as_hms();
    format!(
        "{}{:02}:{:02}",
        if offset.is_negative() { '-' } else { '+' },
        hours.unsigned_abs(),
        minutes.unsigned_abs()
    )
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(v) => f.write_str(&v),
            None => f.write_str("null"),
        }
    }
}
