use crate::encoding::{push_unreserved, push_unreserved_reserved, PushAllow};
use crate::error::Error;
use crate::Value;

/// Expression operator, determined by the first character of a `{...}`
/// group. `None` covers both "no operator" and simple string expansion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    None,
    Plus,
    Hash,
    Dot,
    Slash,
    Semicolon,
    Question,
    Amp,
}

impl Operator {
    /// Maps an operator glyph, or `Option::None` when the character must
    /// instead start a variable name.
    pub fn from_glyph(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Plus),
            '#' => Some(Operator::Hash),
            '.' => Some(Operator::Dot),
            '/' => Some(Operator::Slash),
            ';' => Some(Operator::Semicolon),
            '?' => Some(Operator::Question),
            '&' => Some(Operator::Amp),
            _ => None,
        }
    }

    fn table(self) -> OperatorTable {
        match self {
            Operator::None => OperatorTable {
                first: "",
                sep: ",",
                named: false,
                ifemp: "",
                allow: push_unreserved,
            },
            Operator::Plus => OperatorTable {
                first: "",
                sep: ",",
                named: false,
                ifemp: "",
                allow: push_unreserved_reserved,
            },
            Operator::Hash => OperatorTable {
                first: "#",
                sep: ",",
                named: false,
                ifemp: "",
                allow: push_unreserved_reserved,
            },
            Operator::Dot => OperatorTable {
                first: ".",
                sep: ".",
                named: false,
                ifemp: "",
                allow: push_unreserved,
            },
            Operator::Slash => OperatorTable {
                first: "/",
                sep: "/",
                named: false,
                ifemp: "",
                allow: push_unreserved,
            },
            Operator::Semicolon => OperatorTable {
                first: ";",
                sep: ";",
                named: true,
                ifemp: "",
                allow: push_unreserved,
            },
            Operator::Question => OperatorTable {
                first: "?",
                sep: "&",
                named: true,
                ifemp: "=",
                allow: push_unreserved,
            },
            Operator::Amp => OperatorTable {
                first: "&",
                sep: "&",
                named: true,
                ifemp: "=",
                allow: push_unreserved,
            },
        }
    }
}

/// One variable reference inside an expression group, already stripped of
/// its modifiers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Varspec {
    pub name: String,
    pub max_chars: Option<usize>,
    pub explode: bool,
}

/// Per-operator rendering attributes: group prefix, separator, whether
/// output is `name=value` pairs, what replaces `=value` for an empty
/// value in named mode, and the percent-encoding mode.
struct OperatorTable {
    first: &'static str,
    sep: &'static str,
    named: bool,
    ifemp: &'static str,
    allow: PushAllow,
}

/// Renders one varspec into `dst`. Returns whether anything was written,
/// so the caller can track which varspec of the group renders first.
///
/// `value` is `None` for undefined variables; those and empty lists/maps
/// produce no output and no prefix/separator.
pub fn expand_varspec(
    dst: &mut String,
    operator: Operator,
    varspec: &Varspec,
    value: Option<&Value>,
    first_token: bool,
) -> Result<bool, Error> {
    let value = match value {
        None => return Ok(false),
        Some(value) => value,
    };
    let table = operator.table();
    match value {
        Value::Scalar(s) => {
            push_group_glue(dst, &table, first_token);
            push_scalar(dst, &table, &varspec.name, s, varspec.max_chars);
        }
        Value::List(items) => {
            if items.is_empty() {
                return Ok(false);
            }
            push_group_glue(dst, &table, first_token);
            if varspec.explode {
                push_list_exploded(dst, &table, varspec, items)?;
            } else {
                push_list_joined(dst, &table, varspec, items)?;
            }
        }
        Value::Map(pairs) => {
            if pairs.is_empty() {
                return Ok(false);
            }
            if varspec.max_chars.is_some() {
                return Err(Error::MapTrimming {
                    name: varspec.name.clone(),
                });
            }
            push_group_glue(dst, &table, first_token);
            if varspec.explode {
                push_map_exploded(dst, &table, varspec, pairs)?;
            } else {
                push_map_joined(dst, &table, varspec, pairs)?;
            }
        }
    }
    Ok(true)
}

fn push_group_glue(dst: &mut String, table: &OperatorTable, first_token: bool) {
    if first_token {
        dst.push_str(table.first);
    } else {
        dst.push_str(table.sep);
    }
}

/// Full scalar rendering: `name=` handling in named-pair mode, trimming,
/// then encoding. Trimming counts characters of the source string, before
/// any percent-encoding.
fn push_scalar(
    dst: &mut String,
    table: &OperatorTable,
    name: &str,
    value: &str,
    max_chars: Option<usize>,
) {
    let value = trim(value, max_chars);
    if table.named {
        dst.push_str(name);
        if value.is_empty() {
            dst.push_str(table.ifemp);
            return;
        }
        dst.push('=');
    }
    (table.allow)(dst, value);
}

/// Bare element rendering: no `name=`, just the trimmed, encoded value.
fn push_element(dst: &mut String, table: &OperatorTable, value: &str, max_chars: Option<usize>) {
    (table.allow)(dst, trim(value, max_chars));
}

fn push_list_joined(
    dst: &mut String,
    table: &OperatorTable,
    varspec: &Varspec,
    items: &[Value],
) -> Result<(), Error> {
    for (i, item) in items.iter().enumerate() {
        let item = as_scalar(item, &varspec.name)?;
        if i == 0 {
            push_scalar(dst, table, &varspec.name, item, varspec.max_chars);
        } else {
            dst.push(',');
            push_element(dst, table, item, varspec.max_chars);
        }
    }
    Ok(())
}

fn push_list_exploded(
    dst: &mut String,
    table: &OperatorTable,
    varspec: &Varspec,
    items: &[Value],
) -> Result<(), Error> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            dst.push_str(table.sep);
        }
        let item = as_scalar(item, &varspec.name)?;
        push_scalar(dst, table, &varspec.name, item, varspec.max_chars);
    }
    Ok(())
}

fn push_map_joined(
    dst: &mut String,
    table: &OperatorTable,
    varspec: &Varspec,
    pairs: &[(String, Value)],
) -> Result<(), Error> {
    for (i, (key, value)) in pairs.iter().enumerate() {
        let value = as_scalar(value, &varspec.name)?;
        if i == 0 {
            push_scalar(dst, table, &varspec.name, key, None);
        } else {
            dst.push(',');
            push_element(dst, table, key, None);
        }
        dst.push(',');
        push_element(dst, table, value, None);
    }
    Ok(())
}

fn push_map_exploded(
    dst: &mut String,
    table: &OperatorTable,
    varspec: &Varspec,
    pairs: &[(String, Value)],
) -> Result<(), Error> {
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            dst.push_str(table.sep);
        }
        let value = as_scalar(value, &varspec.name)?;
        push_element(dst, table, key, None);
        dst.push('=');
        push_element(dst, table, value, None);
    }
    Ok(())
}

fn as_scalar<'v>(value: &'v Value, name: &str) -> Result<&'v str, Error> {
    match value {
        Value::Scalar(s) => Ok(s),
        Value::List(_) | Value::Map(_) => Err(Error::UnsupportedValue {
            name: name.to_string(),
        }),
    }
}

fn trim(value: &str, max_chars: Option<usize>) -> &str {
    match max_chars {
        None => value,
        Some(max) => match value.char_indices().nth(max) {
            None => value,
            Some((end, _)) => &value[..end],
        },
    }
}
