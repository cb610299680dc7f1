//! Filter formulas for list queries.
//!
//! The list endpoint accepts a `filterByFormula` expression evaluated by the
//! remote service. Values are interpolated as string literals, so quotes and
//! backslashes inside them are escaped to keep a value from terminating the
//! literal early.

use std::fmt;

use crate::error::FormulaError;

/// A rendered filter formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula(String);

impl Formula {
    /// `{field} = "value"`.
    ///
    /// # Example
    ///
    /// ```
    /// use tablink_core::Formula;
    ///
    /// let formula = Formula::field_equals("Name", "sample-1").unwrap();
    /// assert_eq!(formula.as_str(), r#"{Name} = "sample-1""#);
    /// ```
    pub fn field_equals(field: &str, value: &str) -> Result<Self, FormulaError> {
        if field.contains(['{', '}']) {
            return Err(FormulaError::InvalidFieldName(field.to_owned()));
        }
        Ok(Self(format!(
            "{{{field}}} = \"{}\"",
            escape_string_literal(value)
        )))
    }

    /// The formula text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the formula, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape a value for use inside a double-quoted formula string literal.
pub fn escape_string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            other => escaped.push(other),
        }
    }
    escaped
}
