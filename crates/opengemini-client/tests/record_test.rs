//! End-to-end tests for point → record → bytes → record.
//!
//! These tests verify:
//! - Schema unification and null backfill across heterogeneous points
//! - Column grouping order (values, tags, time)
//! - Record marshal length and lossless decoding

use opengemini_client::{
    ClientError, FieldType, FieldValue, Point, Precision, Record, RecordTransform, TIME_FIELD,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn marshal_len_formula(record: &Record) -> usize {
    4 + record
        .fields
        .iter()
        .map(|f| 4 + f.codec_size())
        .sum::<usize>()
        + 4
        + record
            .col_vals
            .iter()
            .map(|c| 4 + c.codec_size())
            .sum::<usize>()
}

#[test]
fn test_sparse_field_is_backfilled() {
    let mut rt = RecordTransform::new();
    rt.add_point(&Point::new("m").with_field("x", 1.0).with_time(10))
        .unwrap();
    rt.add_point(
        &Point::new("m")
            .with_field("x", 2.0)
            .with_field("y", 3i64)
            .with_time(20),
    )
    .unwrap();
    rt.add_point(&Point::new("m").with_field("x", 4.0).with_time(30))
        .unwrap();

    let record = rt.convert_to_record().unwrap();
    let (_, y) = record.column("y").unwrap();
    assert_eq!(y.len(), 3);
    assert_eq!(y.nil_count(), 2);
    assert!(!y.is_valid(0));
    assert_eq!(y.integer_value(1), Some(3));
    assert!(!y.is_valid(2));

    let (_, x) = record.column("x").unwrap();
    assert_eq!(x.nil_count(), 0);
    assert_eq!(x.float_value(2), Some(4.0));
}

#[test]
fn test_empty_transform_fails() {
    let mut rt = RecordTransform::new();
    assert!(matches!(
        rt.convert_to_record(),
        Err(ClientError::EmptyRecord)
    ));
}

#[test]
fn test_single_point_with_tag() {
    let mut rt = RecordTransform::new();
    rt.add_point(
        &Point::new("weather")
            .with_tag("loc", "sz")
            .with_field("v", 1i64),
    )
    .unwrap();

    let record = rt.convert_to_record().unwrap();
    let layout: Vec<_> = record
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.field_type))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("v", FieldType::Int),
            ("loc", FieldType::Tag),
            (TIME_FIELD, FieldType::Int),
        ]
    );
    for col in &record.col_vals {
        assert_eq!(col.len(), 1);
        assert_eq!(col.nil_count(), 0);
    }
}

#[test]
fn test_record_bytes_roundtrip() {
    let mut rt = RecordTransform::new();
    let points = vec![
        Point::new("write_mm")
            .with_precision(Precision::Second)
            .with_tag("a", "ax")
            .with_tag("b", "bx")
            .with_field("x", 12.0)
            .with_field("y", 4.0)
            .with_time(1_700_000_000_000_000_000),
        Point::new("write_mm")
            .with_precision(Precision::Second)
            .with_tag("a", "ax")
            .with_tag("b", "bx")
            .with_tag("c", "cz")
            .with_field("x", 15.0)
            .with_field("y", 5.0)
            .with_field("z", 8i64)
            .with_field("name", "xx")
            .with_field("ok", true)
            .with_time(1_700_000_001_000_000_000),
    ];
    for point in &points {
        rt.add_point(point).unwrap();
    }

    let record = rt.convert_to_record().unwrap();
    let bytes = record.to_bytes();
    assert_eq!(bytes.len(), marshal_len_formula(&record));
    assert_eq!(bytes.len(), record.codec_size());

    let decoded = Record::unmarshal(&bytes).unwrap();
    assert_eq!(decoded, record);

    let (_, c) = decoded.column("c").unwrap();
    assert_eq!(c.string_value(0), None);
    assert_eq!(c.string_value(1), Some("cz"));
    let (_, name) = decoded.column("name").unwrap();
    assert_eq!(name.string_value(1), Some("xx"));
    let (_, ok) = decoded.column("ok").unwrap();
    assert_eq!(ok.boolean_value(1), Some(true));
    let (_, time) = decoded.column(TIME_FIELD).unwrap();
    assert_eq!(time.integer_value(0), Some(1_700_000_000_000_000_000));
    assert_eq!(rt.min_time(), 1_700_000_000_000_000_000);
    assert_eq!(rt.max_time(), 1_700_000_001_000_000_000);
}

#[test]
fn test_oversized_column_name_is_rejected() {
    let mut rt = RecordTransform::new();
    rt.add_point(&Point::new("m").with_field("v", 1.0).with_time(1))
        .unwrap();
    let long = "k".repeat(70_000);
    let err = rt
        .add_point(&Point::new("m").with_field(long.as_str(), 2.0).with_time(2))
        .unwrap_err();
    assert!(matches!(err, ClientError::NameTooLong { len: 70_000, .. }));

    let record = rt.convert_to_record().unwrap();
    assert_eq!(record.row_count(), 1);
    assert_eq!(Record::unmarshal(&record.to_bytes()).unwrap(), record);
}

#[test]
fn test_time_column_is_last_even_when_first_seen() {
    let mut rt = RecordTransform::new();
    rt.add_point(&Point::new("m").with_time(5)).unwrap();
    rt.add_point(&Point::new("m").with_tag("t", "x").with_field("f", 1.0))
        .unwrap();
    let record = rt.convert_to_record().unwrap();
    let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f", "t", "time"]);
    assert_eq!(rt.min_time(), 0);
    assert_eq!(rt.max_time(), 5);
}

/// Generates points drawn from a small pool of column names so that rows
/// overlap only partially.
fn sparse_points() -> impl Strategy<Value = Vec<Point>> {
    let tags = prop::collection::btree_map(
        prop::sample::select(vec!["host", "region", "zone"]).prop_map(String::from),
        "[a-z]{1,4}",
        0..3,
    );
    let value = prop_oneof![
        any::<i64>().prop_map(FieldValue::Int),
        (-1.0e6f64..1.0e6).prop_map(FieldValue::Float),
    ];
    let fields = prop::collection::btree_map(
        prop::sample::select(vec!["f_a", "f_b", "f_c", "f_d"]).prop_map(String::from),
        value,
        0..4,
    );
    prop::collection::vec((tags, fields, any::<i64>()), 1..40).prop_map(|rows| {
        // pin each field name to the type of its first occurrence
        let mut seen: BTreeMap<String, bool> = BTreeMap::new();
        rows.into_iter()
            .map(|(tags, fields, ts)| {
                let mut point = Point::new("m").with_time(ts);
                point.tags = tags;
                for (name, value) in fields {
                    let is_int = *seen
                        .entry(name.clone())
                        .or_insert(matches!(value, FieldValue::Int(_)));
                    let value = match (is_int, value) {
                        (true, FieldValue::Float(f)) => FieldValue::Int(f as i64),
                        (false, FieldValue::Int(i)) => FieldValue::Float(i as f64),
                        (_, v) => v,
                    };
                    point.fields.insert(name, value);
                }
                point
            })
            .collect()
    })
}

proptest! {
    /// After every add_point, every column holds exactly row_count rows.
    #[test]
    fn test_columns_stay_aligned(points in sparse_points()) {
        let mut rt = RecordTransform::new();
        for (i, point) in points.iter().enumerate() {
            rt.add_point(point).unwrap();
            prop_assert_eq!(rt.row_count(), i + 1);
            for name in ["host", "region", "zone", "f_a", "f_b", "f_c", "f_d", "time"] {
                if let Some(column) = rt.column(name) {
                    prop_assert_eq!(column.col.len(), i + 1, "column {}", name);
                }
            }
        }

        let record = rt.convert_to_record().unwrap();
        prop_assert!(record.validate().is_ok());
        prop_assert_eq!(record.row_count(), points.len());

        let bytes = record.to_bytes();
        prop_assert_eq!(bytes.len(), marshal_len_formula(&record));
        prop_assert_eq!(Record::unmarshal(&bytes).unwrap(), record);

        let min = points.iter().map(|p| p.resolved_timestamp()).min().unwrap();
        let max = points.iter().map(|p| p.resolved_timestamp()).max().unwrap();
        prop_assert_eq!(rt.min_time(), min);
        prop_assert_eq!(rt.max_time(), max);
    }
}
