//! RFC 6570 URI-Template expansion.
//!
//! [`expand`] walks a template in a single pass, copying literal text
//! through and substituting each `{...}` expression from the supplied
//! variables. All four expression levels are supported: operators
//! (`+ # . / ; ? &`), the explode modifier (`*`), and the prefix
//! modifier (`:N`).
//!
//! ```
//! use uri_template_expand::{expand, Value};
//!
//! let variables = vec![
//!     ("user".to_string(), Value::from("fred")),
//!     ("lang".to_string(), Value::from_list(["en", "fr"])),
//! ];
//! let uri = expand("/u/{user}{?lang*}", &variables).unwrap();
//! assert_eq!(uri, "/u/fred?lang=en&lang=fr");
//! ```
//!
//! Templates are never compiled or cached; every call re-scans the
//! template text. Malformed templates and unsupported value shapes fail
//! with [`Error`], discarding any partially built output.

mod encoding;
mod error;
mod expand;
mod scan;

use std::borrow::Borrow;
use std::collections::HashMap;

pub use crate::error::Error;

use crate::scan::scan;

/// A value bound to a template variable.
///
/// Booleans and numbers are canonicalized to their string form when the
/// `Value` is constructed, so the expansion engine only ever sees the
/// shapes here. List elements and map values must themselves be scalars;
/// deeper nesting fails expansion with [`Error::UnsupportedValue`]. Map
/// pairs keep their insertion order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Scalar(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

/// Lookup of substitution values by variable name.
///
/// Returning `None` marks the variable as undefined: the varspec renders
/// nothing and contributes no prefix or separator. The `B: Borrow<Value>`
/// parameter lets implementations hand out either references or freshly
/// built owned values.
pub trait Substitutions<'a, B>
where
    B: Borrow<Value>,
{
    fn get(&'a self, name: &str) -> Option<B>;
}

/// Expands `template` against `substitutions`, percent-encoding the
/// substituted values per operator.
pub fn expand<'a, V, B>(template: &str, substitutions: &'a V) -> Result<String, Error>
where
    V: Substitutions<'a, B>,
    B: Borrow<Value>,
{
    scan(template, substitutions)
}

/// Builder-style convenience over [`expand`] for callers assembling
/// variables one at a time. Holds only the raw template text, so each
/// [`Expander::expand`] call re-scans it.
#[derive(Debug)]
pub struct Expander<'a> {
    template: &'a str,
    variables: HashMap<String, Value>,
}

impl<'a> Expander<'a> {
    pub fn new(template: &'a str) -> Self {
        Expander {
            template,
            variables: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn set_list<K, I, V>(&mut self, name: K, iter: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.variables.insert(name.into(), Value::from_list(iter));
        self
    }

    pub fn set_pairs<K1, I, K2, V>(&mut self, name: K1, iter: I) -> &mut Self
    where
        K1: Into<String>,
        I: IntoIterator<Item = (K2, V)>,
        K2: Into<String>,
        V: Into<Value>,
    {
        self.variables.insert(name.into(), Value::from_pairs(iter));
        self
    }

    pub fn expand(&self) -> Result<String, Error> {
        expand(self.template, &self.variables)
    }
}

impl Value {
    pub fn from_scalar<S>(s: S) -> Value
    where
        S: Into<String>,
    {
        Value::Scalar(s.into())
    }

    pub fn from_list<I, V>(iter: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(iter.into_iter().map(Into::into).collect())
    }

    pub fn from_pairs<I, K, V>(iter: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Scalar(b.to_string())
    }
}

macro_rules! value_from_number {
    ($($t:ty)*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Value {
                Value::Scalar(n.to_string())
            }
        }
    )*};
}

value_from_number!(i32 i64 u32 u64 usize f32 f64);

impl<'a> Substitutions<'a, &'a Value> for HashMap<String, Value> {
    fn get(&'a self, name: &str) -> Option<&'a Value> {
        HashMap::get(self, name)
    }
}

impl<'a> Substitutions<'a, &'a Value> for Vec<(String, Value)> {
    fn get(&'a self, name: &str) -> Option<&'a Value> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}
