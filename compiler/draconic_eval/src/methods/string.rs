//! `str` methods.
//!
//! Positions and widths count characters, not bytes.

use std::rc::Rc;

use draconic_ir::Name;
use draconic_value::errors::{no_attribute, type_mismatch, value_error};
use draconic_value::{DraconicError, EvalResult, SizeLimits, Value};

use super::qualified;
use crate::args::{arg_or_kwarg, expect_arity, int_arg, no_kwargs, str_arg};

pub(super) fn call(
    s: &Rc<str>,
    name: &str,
    mut args: Vec<Value>,
    mut kwargs: Vec<(Name, Value)>,
    limits: &SizeLimits,
) -> EvalResult {
    let func = qualified("str", name);

    if name == "split" {
        expect_arity(&func, &args, 0, 2)?;
        let sep = arg_or_kwarg(&mut args, 0, &mut kwargs, "sep").unwrap_or(Value::None);
        let maxsplit = match arg_or_kwarg(&mut args, 0, &mut kwargs, "maxsplit") {
            Some(value) => int_arg(&func, &value)?,
            None => -1,
        };
        no_kwargs(&func, &kwargs)?;
        let parts = match &sep {
            Value::None => split_whitespace(s, maxsplit),
            other => split_on(s, str_arg(&func, other)?, maxsplit)?,
        };
        limits.check_container_len(parts.len())?;
        return Ok(Value::list(parts.into_iter().map(Value::str).collect()));
    }
    no_kwargs(&func, &kwargs)?;

    match name {
        "upper" => {
            expect_arity(&func, &args, 0, 0)?;
            checked(s.to_uppercase(), limits)
        }
        "lower" => {
            expect_arity(&func, &args, 0, 0)?;
            checked(s.to_lowercase(), limits)
        }
        "strip" | "lstrip" | "rstrip" => {
            expect_arity(&func, &args, 0, 1)?;
            let chars: Option<Vec<char>> = match args.first() {
                None | Some(Value::None) => None,
                Some(other) => Some(str_arg(&func, other)?.chars().collect()),
            };
            let matches = |c: char| match &chars {
                Some(chars) => chars.contains(&c),
                None => c.is_whitespace(),
            };
            let stripped = match name {
                "strip" => s.trim_matches(matches),
                "lstrip" => s.trim_start_matches(matches),
                _ => s.trim_end_matches(matches),
            };
            Ok(Value::str(stripped))
        }
        "join" => {
            expect_arity(&func, &args, 1, 1)?;
            join(s, &args[0], limits)
        }
        "startswith" | "endswith" => {
            expect_arity(&func, &args, 1, 1)?;
            let candidates: Vec<Value> = match &args[0] {
                Value::Tuple(items) => items.to_vec(),
                other => vec![other.clone()],
            };
            for candidate in &candidates {
                let affix = str_arg(&func, candidate)?;
                let hit = if name == "startswith" {
                    s.starts_with(affix)
                } else {
                    s.ends_with(affix)
                };
                if hit {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "replace" => {
            expect_arity(&func, &args, 2, 3)?;
            let old = str_arg(&func, &args[0])?;
            let new = str_arg(&func, &args[1])?;
            let count = match args.get(2) {
                Some(count) => int_arg(&func, count)?,
                None => -1,
            };
            replace(s, old, new, count, limits)
        }
        "find" => {
            expect_arity(&func, &args, 1, 1)?;
            let needle = str_arg(&func, &args[0])?;
            Ok(Value::Int(match s.find(needle) {
                Some(byte) => s[..byte].chars().count() as i64,
                None => -1,
            }))
        }
        "count" => {
            expect_arity(&func, &args, 1, 1)?;
            let needle = str_arg(&func, &args[0])?;
            Ok(Value::Int(occurrences(s, needle) as i64))
        }
        "title" => {
            expect_arity(&func, &args, 0, 0)?;
            let mut out = String::with_capacity(s.len());
            let mut in_word = false;
            for c in s.chars() {
                if c.is_alphabetic() {
                    if in_word {
                        out.extend(c.to_lowercase());
                    } else {
                        out.extend(c.to_uppercase());
                    }
                    in_word = true;
                } else {
                    out.push(c);
                    in_word = false;
                }
            }
            checked(out, limits)
        }
        "capitalize" => {
            expect_arity(&func, &args, 0, 0)?;
            let mut chars = s.chars();
            let out = match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            };
            checked(out, limits)
        }
        "isdigit" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::Bool(
                !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
            ))
        }
        "isalpha" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_alphabetic)))
        }
        "zfill" => {
            expect_arity(&func, &args, 1, 1)?;
            let width = int_arg(&func, &args[0])?;
            let len = s.chars().count();
            let width = usize::try_from(width).unwrap_or(0);
            if width <= len {
                return Ok(Value::Str(Rc::clone(s)));
            }
            limits.check_string_len(s.len() + (width - len))?;
            let (sign, digits) = match s.chars().next() {
                Some(c @ ('+' | '-')) => (Some(c), &s[1..]),
                _ => (None, &s[..]),
            };
            let mut out = String::with_capacity(s.len() + width - len);
            out.extend(sign);
            out.extend(std::iter::repeat('0').take(width - len));
            out.push_str(digits);
            Ok(Value::string(out))
        }
        _ => Err(no_attribute(&Value::Str(Rc::clone(s)), name)),
    }
}

fn checked(out: String, limits: &SizeLimits) -> EvalResult {
    limits.check_string_len(out.len())?;
    Ok(Value::string(out))
}

fn split_whitespace(s: &str, maxsplit: i64) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if maxsplit >= 0 && parts.len() as i64 == maxsplit {
            parts.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }
    parts
}

fn split_on<'a>(s: &'a str, sep: &str, maxsplit: i64) -> Result<Vec<&'a str>, DraconicError> {
    if sep.is_empty() {
        return Err(value_error("empty separator"));
    }
    Ok(match usize::try_from(maxsplit) {
        Ok(max) => s.splitn(max.saturating_add(1), sep).collect(),
        Err(_) => s.split(sep).collect(),
    })
}

/// Non-overlapping occurrences; the empty string occurs between every
/// character.
fn occurrences(s: &str, needle: &str) -> usize {
    if needle.is_empty() {
        s.chars().count() + 1
    } else {
        s.matches(needle).count()
    }
}

fn replace(s: &str, old: &str, new: &str, count: i64, limits: &SizeLimits) -> EvalResult {
    let mut hits = occurrences(s, old);
    if let Ok(count) = usize::try_from(count) {
        hits = hits.min(count);
    }
    // Size the result before building it.
    let len = (s.len() - hits * old.len()).saturating_add(hits.saturating_mul(new.len()));
    limits.check_string_len(len)?;
    let out = if count < 0 {
        s.replace(old, new)
    } else {
        s.replacen(old, new, hits)
    };
    Ok(Value::string(out))
}

fn join(sep: &str, iterable: &Value, limits: &SizeLimits) -> EvalResult {
    limits.check_iterable(iterable)?;
    let items: Vec<Value> = iterable.iterate()?.collect();
    let mut len = sep.len().saturating_mul(items.len().saturating_sub(1));
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Str(part) => len = len.saturating_add(part.len()),
            other => {
                return Err(type_mismatch(format!(
                    "sequence item {i}: expected str instance, {} found",
                    other.type_name()
                )))
            }
        }
    }
    limits.check_string_len(len)?;
    let mut out = String::with_capacity(len);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        if let Value::Str(part) = item {
            out.push_str(part);
        }
    }
    Ok(Value::string(out))
}
