//! Loose value semantics shared by predicate evaluation and sorting.
//!
//! Records are plain JSON, but comparisons follow the permissive rules the
//! query language has always had: `"2007"` equals `2007`, `null` equals
//! "no value", strings order lexically and everything else orders
//! numerically.
//!
//! "No value" (a missing field or an unknown parameter) is `None` throughout.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value};

/// A value after primitive conversion
#[derive(Debug, Clone, PartialEq)]
enum Primitive<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Cow<'a, str>),
}

impl Primitive<'_> {
    fn from_value(value: Option<&Value>) -> Primitive<'_> {
        match value {
            None => Primitive::Undefined,
            Some(Value::Null) => Primitive::Null,
            Some(Value::Bool(b)) => Primitive::Bool(*b),
            Some(Value::Number(n)) => Primitive::Number(n.as_f64().unwrap_or(f64::NAN)),
            Some(Value::String(s)) => Primitive::Str(Cow::Borrowed(s.as_str())),
            Some(composite) => Primitive::Str(Cow::Owned(to_display_string(Some(composite)))),
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Primitive::Undefined => f64::NAN,
            Primitive::Null => 0.0,
            Primitive::Bool(true) => 1.0,
            Primitive::Bool(false) => 0.0,
            Primitive::Number(n) => *n,
            Primitive::Str(s) => parse_number(s),
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Primitive::Undefined | Primitive::Null)
    }
}

/// Reads a string as a number.
///
/// Blank strings read as zero. `0x`/`0o`/`0b` prefixes and `Infinity` are
/// understood; anything else that is not a plain decimal literal is NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| trimmed.strip_prefix(p)) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let decimal = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Returns the number a literal string spells, if it spells one.
///
/// Unlike [`parse_number`], blank strings are not numeric here.
pub fn numeric_literal(text: &str) -> Option<f64> {
    if text.trim().is_empty() {
        return None;
    }
    let n = parse_number(text);
    (!n.is_nan()).then_some(n)
}

/// Loose equality between two operands
pub fn loose_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    // Composites only equal themselves
    if let (Some(l), Some(r)) = (left, right) {
        if is_composite(l) && is_composite(r) {
            return std::ptr::eq(l, r);
        }
    }

    let (l, r) = (Primitive::from_value(left), Primitive::from_value(right));
    match (&l, &r) {
        _ if l.is_nullish() || r.is_nullish() => l.is_nullish() && r.is_nullish(),
        (Primitive::Str(a), Primitive::Str(b)) => a == b,
        (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
        _ => l.to_number() == r.to_number(),
    }
}

/// Orders two operands, or returns `None` when no relation holds.
///
/// Two strings compare by UTF-16 code units. Every other pairing compares
/// numerically, and a NaN on either side leaves the pair unordered.
pub fn loose_cmp(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let (l, r) = (Primitive::from_value(left), Primitive::from_value(right));
    if let (Primitive::Str(a), Primitive::Str(b)) = (&l, &r) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    l.to_number().partial_cmp(&r.to_number())
}

/// Renders an operand as the string a pattern is tested against
pub fn to_display_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else if (1e-6..1e21).contains(&f.abs()) {
        format!("{}", f)
    } else {
        // Exponent form outside the plain-digit range, with an explicit sign
        let text = format!("{:e}", f);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}
