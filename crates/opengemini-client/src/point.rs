//! Row-oriented points as supplied by applications.

use crate::record::FieldType;
use std::collections::BTreeMap;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// Time unit a point's timestamp is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Nanoseconds.
    #[default]
    Nanosecond,
    /// Microseconds.
    Microsecond,
    /// Milliseconds.
    Millisecond,
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
}

impl Precision {
    /// Unit string used for the `epoch` query parameter.
    pub fn epoch(self) -> &'static str {
        match self {
            Self::Nanosecond => "ns",
            Self::Microsecond => "u",
            Self::Millisecond => "ms",
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
        }
    }

    /// Length of one unit in nanoseconds.
    pub fn unit_nanos(self) -> i64 {
        match self {
            Self::Nanosecond => 1,
            Self::Microsecond => NANOS_PER_MICRO,
            Self::Millisecond => NANOS_PER_MILLI,
            Self::Second => NANOS_PER_SECOND,
            Self::Minute => NANOS_PER_MINUTE,
            Self::Hour => NANOS_PER_HOUR,
        }
    }

    /// Rounds a nanosecond timestamp to this precision, ties to even.
    ///
    /// The result is still expressed in nanoseconds.
    pub fn round_nanos(self, ts: i64) -> i64 {
        let unit = self.unit_nanos();
        if unit == 1 {
            return ts;
        }
        let quotient = ts.div_euclid(unit);
        let remainder = ts.rem_euclid(unit);
        let rounded = match (remainder * 2).cmp(&unit) {
            std::cmp::Ordering::Less => quotient,
            std::cmp::Ordering::Greater => quotient + 1,
            std::cmp::Ordering::Equal => quotient + (quotient & 1),
        };
        rounded.saturating_mul(unit)
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// UTF-8 string.
    String(String),
}

impl FieldValue {
    /// Column type this value is stored under.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Int(_) => FieldType::Int,
            Self::Float(_) => FieldType::Float,
            Self::Boolean(_) => FieldType::Boolean,
            Self::String(_) => FieldType::String,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

/// One row of time series data.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Measurement the point belongs to.
    pub measurement: String,
    /// Precision the timestamp is rounded to.
    pub precision: Precision,
    /// Tag key/value pairs.
    pub tags: BTreeMap<String, String>,
    /// Field key/value pairs.
    pub fields: BTreeMap<String, FieldValue>,
    /// Timestamp in nanoseconds since the Unix epoch.
    pub timestamp: Option<i64>,
}

impl Point {
    /// Creates a point with no tags, fields or timestamp.
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            precision: Precision::default(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Sets the precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_tag(key, value);
        self
    }

    /// Adds a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Sets the timestamp in nanoseconds.
    pub fn with_time(mut self, ts_nanos: i64) -> Self {
        self.timestamp = Some(ts_nanos);
        self
    }

    /// Inserts or replaces a tag.
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Inserts or replaces a field.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Timestamp stored in the `time` column: nanoseconds rounded to the
    /// point's precision, or 0 when unset.
    pub fn resolved_timestamp(&self) -> i64 {
        self.timestamp
            .map(|ts| self.precision.round_nanos(ts))
            .unwrap_or(0)
    }
}

/// An ordered batch of points, possibly spanning several measurements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPoints {
    /// Points in submission order.
    pub points: Vec<Point>,
}

impl BatchPoints {
    /// Creates a batch from points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Appends a point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the batch has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
