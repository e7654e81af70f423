//! Point-to-record transformation with schema unification.
//!
//! A [`RecordTransform`] turns a sequence of points of one measurement,
//! each carrying its own tag and field set, into a single [`Record`].
//!
//! # Row Commit
//!
//! Every [`RecordTransform::add_point`] call ends with a row commit:
//!
//! ```text
//! append tags → append fields → append time → row_count += 1
//!   → every column not touched by this point gets one null
//!   → touched flags reset
//! ```
//!
//! Columns first seen at row `n` are backfilled with `n` nulls when created,
//! so after each commit every column holds exactly `row_count` rows.

use crate::codec::size::MAX_STRING_LEN;
use crate::error::{ClientError, Result};
use crate::point::{FieldValue, Point};
use crate::record::{ColVal, Field, FieldType, Record, TIME_FIELD};
use std::collections::HashMap;
use tracing::debug;

/// One column under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column descriptor, fixed at first observation.
    pub field: Field,
    /// Column values.
    pub col: ColVal,
}

impl Column {
    fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            field: Field::new(name, field_type),
            col: ColVal::new(),
        }
    }

    fn add_nulls(&mut self, count: usize) {
        match self.field.field_type {
            FieldType::String | FieldType::Tag => self.col.append_string_nulls(count),
            FieldType::Float => self.col.append_float_nulls(count),
            FieldType::Boolean => self.col.append_boolean_nulls(count),
            FieldType::Int | FieldType::UInt | FieldType::Unknown | FieldType::Last => {
                self.col.append_integer_nulls(count)
            }
        }
    }

    fn add_value(&mut self, value: &FieldValue) {
        match value {
            FieldValue::Int(v) => self.col.append_integer(*v),
            FieldValue::Float(v) => self.col.append_float(*v),
            FieldValue::Boolean(v) => self.col.append_boolean(*v),
            FieldValue::String(v) => self.col.append_string(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformState {
    Accumulating,
    Finalized,
}

/// Builder that unifies heterogeneous points into one columnar record.
///
/// One instance serves one measurement within one write batch. It is not
/// meant to be shared across threads while accumulating.
#[derive(Debug)]
pub struct RecordTransform {
    state: TransformState,
    row_count: usize,
    min_time: i64,
    max_time: i64,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    touched: Vec<bool>,
}

impl Default for RecordTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordTransform {
    /// Creates an empty transform.
    pub fn new() -> Self {
        Self {
            state: TransformState::Accumulating,
            row_count: 0,
            min_time: i64::MAX,
            max_time: i64::MIN,
            columns: Vec::new(),
            index: HashMap::new(),
            touched: Vec::new(),
        }
    }

    /// Number of rows added so far.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of distinct columns seen so far, `time` included.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Smallest timestamp seen, `i64::MAX` before the first point.
    pub fn min_time(&self) -> i64 {
        self.min_time
    }

    /// Largest timestamp seen, `i64::MIN` before the first point.
    pub fn max_time(&self) -> i64 {
        self.max_time
    }

    /// Returns true once [`RecordTransform::convert_to_record`] succeeded.
    pub fn is_finalized(&self) -> bool {
        self.state == TransformState::Finalized
    }

    /// Looks up a column under construction.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Adds one point as a new row.
    ///
    /// The point is checked against the current schema before anything is
    /// appended; a rejected point leaves the transform unchanged.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TransformFinalized`] after the record was produced.
    /// - [`ClientError::ReservedColumn`] for a tag or field named `time`.
    /// - [`ClientError::NameTooLong`] for a name over 65535 bytes.
    /// - [`ClientError::DuplicateColumn`] if a name is both tag and field.
    /// - [`ClientError::TypeConflict`] if a column changes type.
    pub fn add_point(&mut self, point: &Point) -> Result<()> {
        if self.is_finalized() {
            return Err(ClientError::TransformFinalized);
        }
        self.check_schema(point)?;

        for (name, value) in &point.tags {
            let i = self.ensure_column(name, FieldType::Tag);
            self.columns[i].col.append_string(value);
            self.touched[i] = true;
        }

        for (name, value) in &point.fields {
            let i = self.ensure_column(name, value.field_type());
            self.columns[i].add_value(value);
            self.touched[i] = true;
        }

        let timestamp = point.resolved_timestamp();
        let i = self.ensure_column(TIME_FIELD, FieldType::Int);
        self.columns[i].col.append_integer(timestamp);
        self.touched[i] = true;
        self.min_time = self.min_time.min(timestamp);
        self.max_time = self.max_time.max(timestamp);

        self.row_count += 1;
        self.commit_row();
        Ok(())
    }

    fn check_schema(&self, point: &Point) -> Result<()> {
        for name in point.tags.keys() {
            self.check_column(name, FieldType::Tag)?;
        }
        for (name, value) in &point.fields {
            if point.tags.contains_key(name) {
                return Err(ClientError::DuplicateColumn(name.clone()));
            }
            self.check_column(name, value.field_type())?;
        }
        Ok(())
    }

    fn check_column(&self, name: &str, field_type: FieldType) -> Result<()> {
        if name == TIME_FIELD {
            return Err(ClientError::ReservedColumn(name.to_owned()));
        }
        if name.len() > MAX_STRING_LEN {
            return Err(ClientError::NameTooLong {
                len: name.len(),
                max: MAX_STRING_LEN,
            });
        }
        match self.column(name) {
            Some(column) if column.field.field_type != field_type => {
                Err(ClientError::TypeConflict {
                    column: name.to_owned(),
                    expected: column.field.field_type,
                    actual: field_type,
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns the index of `name`, creating it backfilled with nulls for
    /// every earlier row.
    fn ensure_column(&mut self, name: &str, field_type: FieldType) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let mut column = Column::new(name, field_type);
        column.add_nulls(self.row_count);
        let i = self.columns.len();
        self.columns.push(column);
        self.touched.push(false);
        self.index.insert(name.to_owned(), i);
        i
    }

    /// Pads every column the current row did not touch, then clears the
    /// touched flags.
    fn commit_row(&mut self) {
        for (column, touched) in self.columns.iter_mut().zip(self.touched.iter_mut()) {
            if !*touched {
                let missing = self.row_count.saturating_sub(column.col.len());
                column.add_nulls(missing);
            }
            *touched = false;
        }
    }

    /// Produces the record: value fields, then tags, then `time`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyRecord`] if no point was ever added.
    /// - [`ClientError::TransformFinalized`] on a second call.
    pub fn convert_to_record(&mut self) -> Result<Record> {
        if self.is_finalized() {
            return Err(ClientError::TransformFinalized);
        }
        if self.columns.is_empty() {
            return Err(ClientError::EmptyRecord);
        }
        self.state = TransformState::Finalized;

        let columns = std::mem::take(&mut self.columns);
        self.index.clear();
        self.touched.clear();

        let mut values = Vec::new();
        let mut tags = Vec::new();
        let mut times = Vec::new();
        for column in columns {
            if column.field.name == TIME_FIELD {
                times.push(column);
            } else if column.field.is_tag() {
                tags.push(column);
            } else {
                values.push(column);
            }
        }

        let (fields, col_vals): (Vec<_>, Vec<_>) = values
            .into_iter()
            .chain(tags)
            .chain(times)
            .map(|c| (c.field, c.col))
            .unzip();

        debug!(
            "Converted {} rows into record with {} columns, time range [{}, {}]",
            self.row_count,
            fields.len(),
            self.min_time,
            self.max_time
        );

        Ok(Record::new(fields, col_vals))
    }
}
