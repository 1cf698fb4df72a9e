//! f-string replacement fields.
//!
//! Parses the format-spec mini-language
//! `[[fill]align][sign][#][0][width][grouping][.precision][type]` and renders
//! a value with it. Supported types:
//!
//! - strings: `s`
//! - integers: `d`, `b`, `o`, `x`, `X`, plus every float type (promoted)
//! - floats: `e`, `E`, `f`, `F`, `g`, `G`, `%`
//!
//! Width and precision are checked against the string length limit before
//! anything is allocated.

use draconic_value::errors::value_error;
use draconic_value::{format_float, DraconicError, SizeLimits, Value};

/// Parsed format specification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FormatSpec {
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Option<Sign>,
    pub alternate: bool,
    pub zero_pad: bool,
    pub width: Option<usize>,
    /// `,` or `_` thousands separator.
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
    Center,
    /// `=`: pad between the sign and the digits.
    AfterSign,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sign {
    Plus,
    Minus,
    Space,
}

fn parse_align(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

#[cold]
fn invalid_spec(spec: &str) -> DraconicError {
    value_error(format!("Invalid format specifier '{spec}'"))
}

fn parse_number(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    // Absurd widths saturate and are then rejected by the length limit.
    let digits: String = chars[start..*pos].iter().collect();
    Some(digits.parse().unwrap_or(usize::MAX))
}

pub(crate) fn parse_spec(spec: &str) -> Result<FormatSpec, DraconicError> {
    let mut result = FormatSpec::default();
    let chars: Vec<char> = spec.chars().collect();
    let mut pos = 0;

    if let Some(align) = chars.get(1).copied().and_then(parse_align) {
        result.fill = Some(chars[0]);
        result.align = Some(align);
        pos = 2;
    } else if let Some(align) = chars.first().copied().and_then(parse_align) {
        result.align = Some(align);
        pos = 1;
    }

    if let Some(sign) = chars.get(pos).and_then(|c| match c {
        '+' => Some(Sign::Plus),
        '-' => Some(Sign::Minus),
        ' ' => Some(Sign::Space),
        _ => None,
    }) {
        result.sign = Some(sign);
        pos += 1;
    }

    if chars.get(pos) == Some(&'#') {
        result.alternate = true;
        pos += 1;
    }

    if chars.get(pos) == Some(&'0') {
        result.zero_pad = true;
        pos += 1;
    }

    result.width = parse_number(&chars, &mut pos);

    if let Some(&c @ (',' | '_')) = chars.get(pos) {
        result.grouping = Some(c);
        pos += 1;
    }

    if chars.get(pos) == Some(&'.') {
        pos += 1;
        result.precision = Some(parse_number(&chars, &mut pos).ok_or_else(|| invalid_spec(spec))?);
    }

    if let Some(&kind) = chars.get(pos) {
        if !"sdboxXeEfFgG%".contains(kind) {
            return Err(value_error(format!("Unknown format code '{kind}'")));
        }
        result.kind = Some(kind);
        pos += 1;
    }

    if pos != chars.len() {
        return Err(invalid_spec(spec));
    }
    Ok(result)
}

/// Render `value` with the format spec `spec`.
pub(crate) fn format_value(
    value: &Value,
    spec: &str,
    limits: &SizeLimits,
) -> Result<String, DraconicError> {
    if spec.is_empty() {
        return value.try_to_str(limits.max_string_length);
    }
    let spec = parse_spec(spec)?;
    limits.check_string_len(spec.width.unwrap_or(0))?;
    limits.check_string_len(spec.precision.unwrap_or(0))?;

    match value {
        Value::Float(f) => match spec.kind {
            Some(kind @ ('s' | 'd' | 'b' | 'o' | 'x' | 'X')) => Err(unknown_code(kind, value)),
            _ => format_float_spec(*f, &spec),
        },
        Value::Int(_) | Value::Bool(_) => {
            let n = value.as_int().unwrap_or_default();
            match spec.kind {
                None | Some('d' | 'b' | 'o' | 'x' | 'X') => format_int(n, &spec),
                Some('s') => Err(unknown_code('s', value)),
                Some(_) => format_float_spec(n as f64, &spec),
            }
        }
        Value::Str(s) => match spec.kind {
            None | Some('s') => {
                if spec.sign.is_some() {
                    return Err(value_error("Sign not allowed in string format specifier"));
                }
                if spec.alternate {
                    return Err(value_error(
                        "Alternate form (#) not allowed in string format specifier",
                    ));
                }
                if let Some(sep) = spec.grouping {
                    return Err(value_error(format!("Cannot specify '{sep}' with 's'.")));
                }
                Ok(format_str(s, &spec))
            }
            Some(kind) => Err(unknown_code(kind, value)),
        },
        other => match spec.kind {
            None | Some('s') => Ok(format_str(
                &other.try_to_str(limits.max_string_length)?,
                &spec,
            )),
            Some(kind) => Err(unknown_code(kind, value)),
        },
    }
}

#[cold]
fn unknown_code(kind: char, value: &Value) -> DraconicError {
    value_error(format!(
        "Unknown format code '{kind}' for object of type '{}'",
        value.type_name()
    ))
}

fn format_str(s: &str, spec: &FormatSpec) -> String {
    let text = match spec.precision {
        Some(precision) => s.chars().take(precision).collect(),
        None => s.to_string(),
    };
    align(&text, spec, Align::Left)
}

fn format_int(n: i64, spec: &FormatSpec) -> Result<String, DraconicError> {
    if spec.precision.is_some() {
        return Err(value_error("Precision not allowed in integer format specifier"));
    }
    let magnitude = n.unsigned_abs();
    let (digits, prefix) = match spec.kind {
        Some('b') => (format!("{magnitude:b}"), "0b"),
        Some('o') => (format!("{magnitude:o}"), "0o"),
        Some('x') => (format!("{magnitude:x}"), "0x"),
        Some('X') => (format!("{magnitude:X}"), "0X"),
        _ => (group(&magnitude.to_string(), spec.grouping), ""),
    };
    let prefix = if spec.alternate { prefix } else { "" };
    let sign = sign_of(n < 0, spec);
    Ok(pad_number(sign, &format!("{prefix}{digits}"), spec))
}

fn format_float_spec(f: f64, spec: &FormatSpec) -> Result<String, DraconicError> {
    let negative = f.is_sign_negative() && !f.is_nan();
    let magnitude = f.abs();
    let upper = matches!(spec.kind, Some('E' | 'F' | 'G'));

    let body = if !magnitude.is_finite() {
        let text = if magnitude.is_nan() { "nan" } else { "inf" };
        let text = if upper { text.to_uppercase() } else { text.to_string() };
        if spec.kind == Some('%') {
            format!("{text}%")
        } else {
            text
        }
    } else {
        match spec.kind {
            Some('f' | 'F') => fixed(magnitude, spec.precision.unwrap_or(6), spec.grouping),
            Some('e' | 'E') => scientific(magnitude, spec.precision.unwrap_or(6), upper),
            Some('g' | 'G') => general(magnitude, spec.precision.unwrap_or(6), upper, spec),
            Some('%') => {
                let percent = fixed(magnitude * 100.0, spec.precision.unwrap_or(6), spec.grouping);
                format!("{percent}%")
            }
            _ => match spec.precision {
                Some(precision) => general(magnitude, precision, false, spec),
                None => {
                    let repr = format_float(magnitude);
                    match spec.grouping {
                        Some(sep) => group_fraction(&repr, sep),
                        None => repr,
                    }
                }
            },
        }
    };

    let sign = sign_of(negative, spec);
    Ok(pad_number(sign, &body, spec))
}

fn fixed(magnitude: f64, precision: usize, grouping: Option<char>) -> String {
    let text = format!("{magnitude:.precision$}");
    match grouping {
        Some(sep) => group_fraction(&text, sep),
        None => text,
    }
}

/// `d.ddde+XX`, with at least two exponent digits.
fn scientific(magnitude: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exponent.unsigned_abs())
}

/// The `g` type: fixed or scientific depending on the exponent, with
/// trailing zeros removed unless `#` was given.
fn general(magnitude: f64, precision: usize, upper: bool, spec: &FormatSpec) -> String {
    let precision = precision.max(1);
    let sci_text = format!("{magnitude:.prec$e}", prec = precision - 1);
    let exponent: i64 = sci_text
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);
    let limit = i64::try_from(precision).unwrap_or(i64::MAX);
    let text = if -4 <= exponent && exponent < limit {
        let decimals = usize::try_from(limit - 1 - exponent).unwrap_or(0);
        fixed(magnitude, decimals, spec.grouping)
    } else {
        scientific(magnitude, precision - 1, upper)
    };
    if spec.alternate {
        return text;
    }
    match text.find(['e', 'E']) {
        Some(at) => {
            let (mantissa, exponent) = text.split_at(at);
            format!("{}{exponent}", trim_zeros(mantissa))
        }
        None => trim_zeros(&text).to_string(),
    }
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Insert `sep` every three digits of a run of ASCII digits.
fn group(digits: &str, sep: Option<char>) -> String {
    let Some(sep) = sep else {
        return digits.to_string();
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Group the integer part of a decimal number.
fn group_fraction(text: &str, sep: char) -> String {
    let split = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    let (int_part, rest) = text.split_at(split);
    format!("{}{rest}", group(int_part, Some(sep)))
}

fn sign_of(negative: bool, spec: &FormatSpec) -> &'static str {
    match (negative, spec.sign) {
        (true, _) => "-",
        (false, Some(Sign::Plus)) => "+",
        (false, Some(Sign::Space)) => " ",
        (false, Some(Sign::Minus) | None) => "",
    }
}

/// Numbers align right by default; `0` pads with zeros after the sign.
fn pad_number(sign: &str, body: &str, spec: &FormatSpec) -> String {
    let zero_fill = spec.zero_pad && spec.fill.is_none() && spec.align.is_none();
    let (fill, alignment) = if zero_fill {
        ('0', Align::AfterSign)
    } else {
        (spec.fill.unwrap_or(' '), spec.align.unwrap_or(Align::Right))
    };
    let width = spec.width.unwrap_or(0);
    let len = sign.chars().count() + body.chars().count();
    if len >= width {
        return format!("{sign}{body}");
    }
    let padding = width - len;
    if alignment == Align::AfterSign {
        let pad: String = std::iter::repeat_n(fill, padding).collect();
        return format!("{sign}{pad}{body}");
    }
    let spec = FormatSpec {
        fill: Some(fill),
        align: Some(alignment),
        ..spec.clone()
    };
    align(&format!("{sign}{body}"), &spec, Align::Right)
}

fn align(text: &str, spec: &FormatSpec, default: Align) -> String {
    let Some(width) = spec.width else {
        return text.to_string();
    };
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let fill = spec.fill.unwrap_or(' ');
    let padding = width - len;
    let (left, right) = match spec.align.unwrap_or(default) {
        Align::Left => (0, padding),
        Align::Right | Align::AfterSign => (padding, 0),
        Align::Center => (padding / 2, padding - padding / 2),
    };
    let mut out = String::with_capacity(text.len() + padding * fill.len_utf8());
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, right));
    out
}

/// `ascii()`: `repr` with non-ASCII characters escaped.
pub(crate) fn ascii_escape(repr: &str) -> String {
    let mut out = String::with_capacity(repr.len());
    for c in repr.chars() {
        match u32::from(c) {
            0..=0x7f => out.push(c),
            code @ 0x80..=0xff => out.push_str(&format!("\\x{code:02x}")),
            code @ 0x100..=0xffff => out.push_str(&format!("\\u{code:04x}")),
            code => out.push_str(&format!("\\U{code:08x}")),
        }
    }
    out
}

#[cfg(test)]
mod tests;
