//! Typed access to playlist tag values.
//!
//! A [`HeaderValue`] is the raw text after the `:` of a `#NAME:VALUE` tag.
//! Accessors parse on demand; the stored text is never modified.

use std::collections::HashMap;
use std::fmt;

use crate::error::HeaderError;

/// Opaque value of a playlist tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeaderValue(String);

impl HeaderValue {
    /// Wrap a raw tag value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` iff the value is `yes` or `true`, ignoring case.
    pub fn as_bool(&self) -> bool {
        self.0.eq_ignore_ascii_case("yes") || self.0.eq_ignore_ascii_case("true")
    }

    /// Parse the value as a floating point number.
    pub fn as_float(&self) -> Result<f64, HeaderError> {
        self.0.parse().map_err(|source| HeaderError::NotAFloat {
            value: self.0.clone(),
            source,
        })
    }

    /// Parse the value as a signed integer.
    pub fn as_int(&self) -> Result<i64, HeaderError> {
        self.0.parse().map_err(|source| HeaderError::NotAnInteger {
            value: self.0.clone(),
            source,
        })
    }

    /// Parse a `start@end` range.
    ///
    /// Lenient: returns `(0, 0)` when either half is not an integer or the
    /// separator is absent.
    pub fn as_range(&self) -> (i64, i64) {
        let Some((start, end)) = self.0.split_once('@') else {
            return (0, 0);
        };
        match (start.parse(), end.parse()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => (0, 0),
        }
    }

    /// Split once on `=` into a key and a value.
    pub fn as_param(&self) -> Result<(String, HeaderValue), HeaderError> {
        split_param(&self.0)
            .map(|(key, value)| (key.to_string(), HeaderValue::from(value)))
            .ok_or_else(|| HeaderError::MissingSeparator {
                value: self.0.clone(),
                separator: '=',
            })
    }

    /// Parse a comma separated `KEY=VALUE` attribute list.
    ///
    /// Whitespace around each comma is ignored. When a key repeats, the last
    /// occurrence wins.
    pub fn as_attribute_set(&self) -> Result<HashMap<String, HeaderValue>, HeaderError> {
        let mut attributes = HashMap::new();
        for piece in self.0.split(',').map(str::trim) {
            let (key, value) = split_param(piece).ok_or_else(|| HeaderError::MissingSeparator {
                value: piece.to_string(),
                separator: '=',
            })?;
            attributes.insert(key.to_string(), HeaderValue::from(value));
        }
        Ok(attributes)
    }
}

fn split_param(text: &str) -> Option<(&str, &str)> {
    text.split_once('=')
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for HeaderValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
