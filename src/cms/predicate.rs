//! Backend-side query predicates.
//!
//! A predicate renders to the API's query syntax, e.g.
//! `[at(document.type, "product")]`. A whole query wraps its predicates in
//! one more pair of brackets: `[[at(..)][fulltext(..)]]`.

use std::fmt;

/// Predicate operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Exact equality on a field, document type, uid or relationship id.
    At,
    /// Full-text match on a text or rich-text field.
    Fulltext,
}

impl Operator {
    const fn name(self) -> &'static str {
        match self {
            Self::At => "at",
            Self::Fulltext => "fulltext",
        }
    }
}

/// A single filter expression evaluated by the content backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub op: Operator,
    /// Field path: `document.type`, `my.<type>.<field>`.
    pub path: String,
    pub value: String,
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: Operator::At,
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn fulltext(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: Operator::Fulltext,
            path: path.into(),
            value: value.into(),
        }
    }

    /// `document.type == kind`
    pub fn document_type(kind: &str) -> Self {
        Self::at("document.type", kind)
    }

    /// Render a full query string for the `q` parameter.
    pub fn query_string(predicates: &[Predicate]) -> String {
        let mut q = String::from("[");
        for predicate in predicates {
            q.push_str(&predicate.to_string());
        }
        q.push(']');
        q
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}({}, \"{}\")]",
            self.op.name(),
            self.path,
            escape_value(&self.value)
        )
    }
}

/// Escape backslashes and double quotes inside a quoted predicate value.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
