//! Property-based tests for the binary codec and column containers.
//!
//! Uses proptest to verify lossless round-trips, exact size accounting and
//! validity bitmap correctness for arbitrary inputs.

use opengemini_client::codec::{
    append_bytes, append_int64, append_string, append_uint16, append_uint32, append_uint32_list,
    size_of_bytes, size_of_string, size_of_uint32_list, BinaryDecoder,
};
use opengemini_client::{ColVal, Field, FieldType};
use proptest::prelude::*;

/// One appended row of a typed column.
#[derive(Debug, Clone)]
enum Cell {
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Str(Option<String>),
}

fn int_column() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(prop::option::of(any::<i64>()).prop_map(Cell::Int), 0..64)
}

fn float_column() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(
        prop::option::of(-1.0e12f64..1.0e12).prop_map(Cell::Float),
        0..64,
    )
}

fn bool_column() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(prop::option::of(any::<bool>()).prop_map(Cell::Bool), 0..64)
}

fn string_column() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(prop::option::of(".{0,12}").prop_map(Cell::Str), 0..64)
}

fn any_column() -> impl Strategy<Value = Vec<Cell>> {
    prop_oneof![int_column(), float_column(), bool_column(), string_column()]
}

fn build(cells: &[Cell]) -> ColVal {
    let mut col = ColVal::new();
    for cell in cells {
        match cell {
            Cell::Int(Some(v)) => col.append_integer(*v),
            Cell::Int(None) => col.append_integer_null(),
            Cell::Float(Some(v)) => col.append_float(*v),
            Cell::Float(None) => col.append_float_null(),
            Cell::Bool(Some(v)) => col.append_boolean(*v),
            Cell::Bool(None) => col.append_boolean_null(),
            Cell::Str(Some(v)) => col.append_string(v),
            Cell::Str(None) => col.append_string_null(),
        }
    }
    col
}

fn is_value(cell: &Cell) -> bool {
    match cell {
        Cell::Int(v) => v.is_some(),
        Cell::Float(v) => v.is_some(),
        Cell::Bool(v) => v.is_some(),
        Cell::Str(v) => v.is_some(),
    }
}

proptest! {
    /// Every primitive decodes to exactly what was encoded, in sequence.
    #[test]
    fn test_primitive_roundtrip(
        i in any::<i64>(),
        u16v in any::<u16>(),
        u32v in any::<u32>(),
        s in ".{0,40}",
        b in prop::collection::vec(any::<u8>(), 0..64),
        list in prop::collection::vec(any::<u32>(), 0..32),
    ) {
        let mut buf = Vec::new();
        append_int64(&mut buf, i);
        append_uint16(&mut buf, u16v);
        append_uint32(&mut buf, u32v);
        append_string(&mut buf, &s);
        append_bytes(&mut buf, &b);
        append_uint32_list(&mut buf, &list);

        prop_assert_eq!(
            buf.len(),
            8 + 2 + 4 + size_of_string(&s) + size_of_bytes(&b) + size_of_uint32_list(&list)
        );

        let mut dec = BinaryDecoder::new(&buf);
        prop_assert_eq!(dec.int64().unwrap(), i);
        prop_assert_eq!(dec.uint16().unwrap(), u16v);
        prop_assert_eq!(dec.uint32().unwrap(), u32v);
        prop_assert_eq!(dec.string().unwrap(), s.as_str());
        prop_assert_eq!(dec.bytes().unwrap(), b.as_slice());
        prop_assert_eq!(dec.uint32_list().unwrap(), list);
        prop_assert!(dec.is_empty());
    }

    /// Any strict prefix of an encoded value fails with a bounds error.
    #[test]
    fn test_truncated_bytes_fail(b in prop::collection::vec(any::<u8>(), 1..64), cut in 0usize..64) {
        let mut buf = Vec::new();
        append_bytes(&mut buf, &b);
        let cut = cut % buf.len();
        let mut dec = BinaryDecoder::new(&buf[..cut]);
        prop_assert!(dec.bytes().is_err());
        prop_assert_eq!(dec.offset(), 0);
    }

    /// Marshal then unmarshal reproduces every ColVal member exactly.
    #[test]
    fn test_colval_roundtrip(cells in any_column()) {
        let col = build(&cells);
        let mut buf = Vec::new();
        col.marshal(&mut buf);
        prop_assert_eq!(buf.len(), col.codec_size());

        let decoded = ColVal::unmarshal(&buf).unwrap();
        prop_assert_eq!(decoded.len, col.len);
        prop_assert_eq!(decoded.nil_count, col.nil_count);
        prop_assert_eq!(decoded.bitmap_offset, col.bitmap_offset);
        prop_assert_eq!(&decoded.val, &col.val);
        prop_assert_eq!(&decoded.bitmap, &col.bitmap);
        prop_assert_eq!(&decoded.offset, &col.offset);
    }

    /// Bit i is set iff the i-th append was a value.
    #[test]
    fn test_validity_matches_appends(cells in any_column()) {
        let col = build(&cells);
        prop_assert_eq!(col.len(), cells.len());
        prop_assert_eq!(col.nil_count(), cells.iter().filter(|c| !is_value(c)).count());
        prop_assert_eq!(col.bitmap.len(), cells.len().div_ceil(8));

        for (i, cell) in cells.iter().enumerate() {
            let bit = col.bitmap[i >> 3] & (1 << (i & 7)) != 0;
            prop_assert_eq!(bit, is_value(cell), "row {}", i);
            prop_assert_eq!(col.is_valid(i), is_value(cell));
        }
    }

    /// Values read back at their logical rows.
    #[test]
    fn test_values_read_back(cells in any_column()) {
        let col = build(&cells);
        for (i, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Int(v) => {
                    prop_assert_eq!(col.integer_value(i), *v);
                }
                Cell::Float(v) => {
                    prop_assert_eq!(col.float_value(i), *v);
                }
                Cell::Bool(v) => {
                    prop_assert_eq!(col.boolean_value(i), *v);
                }
                Cell::Str(v) => {
                    prop_assert_eq!(col.string_value(i), v.as_deref());
                }
            }
        }
    }

    /// Field size accounting matches the marshaled length.
    #[test]
    fn test_field_codec_size(name in ".{0,32}", t in 0i64..8) {
        let field = Field::new(name, FieldType::from_i64(t).unwrap());
        let mut buf = Vec::new();
        field.marshal(&mut buf);
        prop_assert_eq!(buf.len(), field.codec_size());
        prop_assert_eq!(Field::unmarshal(&buf).unwrap(), field);
    }
}

#[test]
fn test_string_column_offsets_count_every_row() {
    let col = build(&[
        Cell::Str(None),
        Cell::Str(Some("a".to_string())),
        Cell::Str(None),
        Cell::Str(Some("bc".to_string())),
    ]);
    assert_eq!(col.offset, vec![0, 0, 1, 1]);
    assert_eq!(col.val, b"abc".to_vec());
}
