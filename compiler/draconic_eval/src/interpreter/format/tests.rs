//! Tests for f-string format specs.

use draconic_value::{ErrorKind, LimitKind};
use pretty_assertions::assert_eq;

use super::*;
use crate::Limits;

fn fmt(value: impl Into<Value>, spec: &str) -> String {
    format_value(&value.into(), spec, &Limits::default().size_limits()).unwrap()
}

fn fmt_err(value: impl Into<Value>, spec: &str) -> DraconicError {
    format_value(&value.into(), spec, &Limits::default().size_limits()).unwrap_err()
}

#[test]
fn parse_full_spec() {
    let spec = parse_spec("*^20.5f").unwrap();
    assert_eq!(spec.fill, Some('*'));
    assert_eq!(spec.align, Some(Align::Center));
    assert_eq!(spec.width, Some(20));
    assert_eq!(spec.precision, Some(5));
    assert_eq!(spec.kind, Some('f'));
}

#[test]
fn parse_zero_pad_and_grouping() {
    let spec = parse_spec("+010,d").unwrap();
    assert_eq!(spec.sign, Some(Sign::Plus));
    assert!(spec.zero_pad);
    assert_eq!(spec.width, Some(10));
    assert_eq!(spec.grouping, Some(','));
    assert_eq!(spec.kind, Some('d'));
}

#[test]
fn parse_rejects_trailing_characters() {
    assert!(parse_spec("5dd").is_err());
    assert!(parse_spec("z").is_err());
    assert!(parse_spec(".f").is_err());
}

// Integers

#[test]
fn int_width_and_alignment() {
    assert_eq!(fmt(42_i64, ""), "42");
    assert_eq!(fmt(42_i64, ">5"), "   42");
    assert_eq!(fmt(42_i64, "<5"), "42   ");
    assert_eq!(fmt(42_i64, "5"), "   42");
    assert_eq!(fmt(42_i64, "+d"), "+42");
}

#[test]
fn int_zero_pad_goes_after_sign() {
    assert_eq!(fmt(-42_i64, "05"), "-0042");
    assert_eq!(fmt(-42_i64, "=6"), "-   42");
}

#[test]
fn int_radix() {
    assert_eq!(fmt(255_i64, "#x"), "0xff");
    assert_eq!(fmt(255_i64, "X"), "FF");
    assert_eq!(fmt(5_i64, "08b"), "00000101");
    assert_eq!(fmt(8_i64, "#o"), "0o10");
}

#[test]
fn int_grouping() {
    assert_eq!(fmt(1_234_567_i64, ","), "1,234,567");
    assert_eq!(fmt(-1000_i64, "_"), "-1_000");
    assert_eq!(fmt(999_i64, ","), "999");
}

#[test]
fn int_promotes_for_float_types() {
    assert_eq!(fmt(3_i64, ".2f"), "3.00");
    assert_eq!(fmt(1_i64, ".0%"), "100%");
}

#[test]
fn bool_formats_as_int_with_a_spec() {
    assert_eq!(fmt(true, "d"), "1");
    assert_eq!(fmt(true, ""), "True");
}

// Floats

#[test]
fn float_fixed() {
    assert_eq!(fmt(1.23456, ".2f"), "1.23");
    assert_eq!(fmt(-1.5, "08.2f"), "-0001.50");
    assert_eq!(fmt(1234.5, ",.1f"), "1,234.5");
}

#[test]
fn float_scientific_has_two_exponent_digits() {
    assert_eq!(fmt(12345.678, ".3e"), "1.235e+04");
    assert_eq!(fmt(0.00012, ".1E"), "1.2E-04");
}

#[test]
fn float_general() {
    assert_eq!(fmt(0.000_123_4, "g"), "0.0001234");
    assert_eq!(fmt(1e20, "g"), "1e+20");
    assert_eq!(fmt(2.5, ".3"), "2.5");
}

#[test]
fn float_percent() {
    assert_eq!(fmt(0.25, ".1%"), "25.0%");
}

#[test]
fn float_non_finite() {
    assert_eq!(fmt(f64::INFINITY, "f"), "inf");
    assert_eq!(fmt(f64::NEG_INFINITY, "F"), "-INF");
    assert_eq!(fmt(f64::NAN, ">4"), " nan");
}

#[test]
fn float_rejects_integer_codes() {
    let err = fmt_err(1.5, "d");
    assert!(err.to_string().contains("Unknown format code 'd'"));
}

// Strings

#[test]
fn str_alignment_and_truncation() {
    assert_eq!(fmt("abc", "^7"), "  abc  ");
    assert_eq!(fmt("abc", "*<5"), "abc**");
    assert_eq!(fmt("abc", ">5"), "  abc");
    assert_eq!(fmt("abcdef", ".2"), "ab");
}

#[test]
fn str_rejects_numeric_options() {
    assert!(fmt_err("abc", "+").to_string().contains("Sign not allowed"));
    assert!(fmt_err("abc", "d").to_string().contains("for object of type 'str'"));
}

#[test]
fn other_values_use_their_str_form() {
    assert_eq!(fmt(Value::None, ">6"), "  None");
}

#[test]
fn width_is_checked_against_the_string_limit() {
    let limits = Limits::default().with_max_string_length(10).size_limits();
    let err = format_value(&Value::Int(1), ">20", &limits).unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::StringLength));
    assert!(matches!(err.kind(), ErrorKind::LimitExceeded { .. }));
}

#[test]
fn ascii_escapes_non_ascii() {
    assert_eq!(ascii_escape("'é'"), "'\\xe9'");
    assert_eq!(ascii_escape("'→'"), "'\\u2192'");
    assert_eq!(ascii_escape("'ok'"), "'ok'");
}
