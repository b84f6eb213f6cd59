use std::borrow::Borrow;
use std::mem;

use crate::error::Error;
use crate::expand::{expand_varspec, Operator, Varspec};
use crate::{Substitutions, Value};

/// Scanner position within the template.
#[derive(Clone, Copy)]
enum State {
    /// Copying literal characters straight to the output.
    Literal,
    /// Just consumed `{`; the next character is an operator glyph or the
    /// first character of a name.
    OperatorPending,
    /// Accumulating a variable name and its `*` modifier.
    Name,
    /// Accumulating the digits of a `:max-length` modifier.
    MaxChars,
}

/// Single pass over the template: literals are copied through verbatim
/// and each varspec is expanded the moment its terminating `,` or `}` is
/// seen. Expansion cannot be deferred to a parsed form because the
/// group's prefix-versus-separator decision depends on whether an earlier
/// varspec of the same group actually rendered.
pub fn scan<'a, V, B>(template: &str, substitutions: &'a V) -> Result<String, Error>
where
    V: Substitutions<'a, B>,
    B: Borrow<Value>,
{
    let mut dst = String::with_capacity(template.len());
    let mut state = State::Literal;
    let mut operator = Operator::None;
    let mut name = String::new();
    let mut max_buffer = String::new();
    let mut explode = false;
    let mut first_token = true;

    for (column, c) in template.chars().enumerate() {
        match state {
            State::Literal => match c {
                '{' => {
                    state = State::OperatorPending;
                    operator = Operator::None;
                    name.clear();
                    max_buffer.clear();
                    explode = false;
                    first_token = true;
                }
                '}' => return Err(Error::UnexpectedClose { column }),
                _ => dst.push(c),
            },
            State::OperatorPending => match c {
                // `{` inside an expression abandons it and opens a fresh
                // group; the buffers are already reset here.
                '{' => {}
                '}' | ',' => return Err(Error::EmptyToken { column }),
                _ => {
                    match Operator::from_glyph(c) {
                        Some(op) => operator = op,
                        None => {
                            check_name_char(c, column)?;
                            name.push(c);
                        }
                    }
                    state = State::Name;
                }
            },
            State::Name | State::MaxChars => match c {
                '{' => {
                    state = State::OperatorPending;
                    operator = Operator::None;
                    name.clear();
                    max_buffer.clear();
                    explode = false;
                    first_token = true;
                }
                '}' | ',' => {
                    let rendered = finish_varspec(
                        &mut dst,
                        operator,
                        &mut name,
                        &mut max_buffer,
                        &mut explode,
                        first_token,
                        substitutions,
                        column,
                    )?;
                    if rendered {
                        first_token = false;
                    }
                    state = if c == '}' { State::Literal } else { State::Name };
                }
                c if matches!(state, State::MaxChars) => {
                    if c.is_ascii_digit() {
                        max_buffer.push(c);
                    } else {
                        return Err(Error::InvalidMaxChars { column });
                    }
                }
                ':' => {
                    max_buffer.clear();
                    state = State::MaxChars;
                }
                '*' => explode = true,
                _ => {
                    check_name_char(c, column)?;
                    name.push(c);
                }
            },
        }
    }

    match state {
        State::Literal => Ok(dst),
        _ => Err(Error::UnterminatedToken),
    }
}

/// Expands the varspec accumulated in the scanner buffers and resets them
/// for the next varspec of the group. The operator is group-wide and is
/// left alone.
#[allow(clippy::too_many_arguments)]
fn finish_varspec<'a, V, B>(
    dst: &mut String,
    operator: Operator,
    name: &mut String,
    max_buffer: &mut String,
    explode: &mut bool,
    first_token: bool,
    substitutions: &'a V,
    column: usize,
) -> Result<bool, Error>
where
    V: Substitutions<'a, B>,
    B: Borrow<Value>,
{
    if name.is_empty() {
        return Err(Error::EmptyToken { column });
    }
    let varspec = Varspec {
        name: mem::take(name),
        max_chars: parse_max_chars(max_buffer, column)?,
        explode: mem::take(explode),
    };
    max_buffer.clear();
    let value = substitutions.get(&varspec.name);
    expand_varspec(
        dst,
        operator,
        &varspec,
        value.as_ref().map(|value| value.borrow()),
        first_token,
    )
}

/// An empty digit run (`{x:}`) means no limit, matching a bare name.
fn parse_max_chars(max_buffer: &str, column: usize) -> Result<Option<usize>, Error> {
    if max_buffer.is_empty() {
        Ok(None)
    } else {
        max_buffer
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidMaxChars { column })
    }
}

/// Characters that may not appear in a variable name. `:` and `*` are
/// absent because the scanner consumes them as modifiers first.
fn check_name_char(c: char, column: usize) -> Result<(), Error> {
    match c {
        '+' | '#' | '/' | ';' | '?' | '&' | ' ' | '!' | '=' | '$' | '|' | '*' | ':' | '~'
        | '-' => Err(Error::IllegalCharacter {
            character: c,
            column,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn variables() -> HashMap<String, Value> {
        HashMap::from([("x".to_string(), Value::from("X"))])
    }

    #[test]
    fn test_error_columns() {
        let left = scan("{}", &variables());
        assert_eq!(left, Err(Error::EmptyToken { column: 1 }));

        let left = scan("{x,,y}", &variables());
        assert_eq!(left, Err(Error::EmptyToken { column: 3 }));

        let left = scan("a}b", &variables());
        assert_eq!(left, Err(Error::UnexpectedClose { column: 1 }));

        let left = scan("{a b}", &variables());
        assert_eq!(
            left,
            Err(Error::IllegalCharacter {
                character: ' ',
                column: 2
            })
        );

        let left = scan("{x:1y}", &variables());
        assert_eq!(left, Err(Error::InvalidMaxChars { column: 4 }));

        let left = scan("{x:-1}", &variables());
        assert_eq!(left, Err(Error::InvalidMaxChars { column: 3 }));
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(scan("{x", &variables()), Err(Error::UnterminatedToken));
        assert_eq!(scan("{", &variables()), Err(Error::UnterminatedToken));
        assert_eq!(scan("a{x:2", &variables()), Err(Error::UnterminatedToken));
    }

    #[test]
    fn test_brace_inside_expression_reopens() {
        let left = scan("{y{x}", &variables()).unwrap();
        assert_eq!(left, "X");
    }

    #[test]
    fn test_empty_limit_means_no_limit() {
        let left = scan("{x:}", &variables()).unwrap();
        assert_eq!(left, "X");
    }

    #[test]
    fn test_overflowing_limit() {
        let template = format!("{{x:{}9}}", usize::MAX);
        assert!(matches!(
            scan(&template, &variables()),
            Err(Error::InvalidMaxChars { .. })
        ));
    }

    #[test]
    fn test_comma_outside_expression_is_literal() {
        let left = scan("a,b", &variables()).unwrap();
        assert_eq!(left, "a,b");
    }
}
