use crate::types::{AbiError, AbiResult, ParamType};

/// An argument value reconstructed from its source text. Leaves keep the raw
/// text and are converted to words by the encoder; compounds mirror the
/// nesting of the parameter type they were parsed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Primitive(String),
    List(Vec<Value>),
}

/// Parse one argument string against its declared parameter type.
pub fn parse_value(ty: &ParamType, text: &str) -> AbiResult<Value> {
    let text = text.trim();
    match ty {
        ParamType::Array { length, inner } => {
            let items = split_compound(text, ty, '[', ']')?;
            if let Some(expected) = length {
                if items.len() != *expected as usize {
                    return Err(AbiError::ArrayLengthMismatch {
                        expected: *expected as usize,
                        got: items.len(),
                    });
                }
            }
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(parse_value(inner, item)?);
            }
            Ok(Value::List(values))
        }
        ParamType::Tuple(fields) => {
            let items = split_compound(text, ty, '(', ')')?;
            if items.len() != fields.len() {
                return Err(AbiError::TupleLengthMismatch);
            }
            let mut values = Vec::with_capacity(items.len());
            for (field, item) in fields.iter().zip(items) {
                values.push(parse_value(field, item)?);
            }
            Ok(Value::List(values))
        }
        // string elements inside compounds arrive quoted; top-level ones do not
        ParamType::String => Ok(Value::Primitive(strip_quotes(text).to_string())),
        _ => Ok(Value::Primitive(text.to_string())),
    }
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Split the body of a `[...]` or `(...)` literal into its comma-separated
/// elements. A single pass tracks bracket depth, parenthesis depth and an
/// in-quotes flag; commas split only at depth zero outside quotes, and the
/// matching closer at depth zero ends the compound.
fn split_compound<'a>(
    text: &'a str,
    ty: &ParamType,
    open: char,
    close: char,
) -> AbiResult<Vec<&'a str>> {
    if !text.starts_with(open) {
        return Err(AbiError::Convert {
            value: text.to_string(),
            target: ty.to_string(),
        });
    }
    let body = &text[1..];
    let mut items = Vec::new();
    let mut start = 0;
    let mut brackets = 0i32;
    let mut parens = 0i32;
    let mut quoted = false;
    let mut end = None;
    for (i, c) in body.char_indices() {
        if quoted {
            if c == '"' {
                quoted = false;
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '[' => brackets += 1,
            '(' => parens += 1,
            c if c == close && brackets == 0 && parens == 0 => {
                end = Some(i);
                break;
            }
            ']' => brackets -= 1,
            ')' => parens -= 1,
            ',' if brackets == 0 && parens == 0 => {
                items.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let end = match end {
        Some(end) => end,
        None if close == ')' => return Err(AbiError::UnclosedTuple),
        None => return Err(AbiError::UnclosedArray),
    };
    if !body[end + 1..].trim().is_empty() {
        return Err(AbiError::Convert {
            value: text.to_string(),
            target: ty.to_string(),
        });
    }
    let last = &body[start..end];
    if items.is_empty() && last.trim().is_empty() {
        return Ok(items);
    }
    items.push(last);
    Ok(items)
}
