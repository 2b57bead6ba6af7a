//! Named SQL parameters

use crate::value::{ParamType, Value};

/// Name of the output parameter that receives a generated identity on INSERT
pub const IDENTITY_PARAM: &str = "@IDENTITY";

/// Whether a parameter flows into the statement or is read back after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// A named parameter bound to a rendered statement
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: Value,
    pub param_type: Option<ParamType>,
    pub source_column: Option<String>,
    pub direction: Direction,
}

impl Param {
    /// Create an input parameter
    ///
    /// # Examples
    /// ```
    /// use sqlpipe_core::Param;
    ///
    /// let param = Param::new("@id", 1);
    /// assert_eq!(param.placeholder(), "@id");
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            param_type: value.param_type(),
            value,
            source_column: None,
            direction: Direction::In,
        }
    }

    /// Create an input parameter that feeds the given column in INSERT and UPDATE text
    pub fn with_column(
        name: impl Into<String>,
        value: impl Into<Value>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            source_column: Some(column.into()),
            ..Self::new(name, value)
        }
    }

    /// Create an output parameter; its value is filled in by the executor
    pub fn output(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            param_type: Some(param_type),
            source_column: None,
            direction: Direction::Out,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::In
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Out
    }

    /// The parameter as it appears in SQL text
    ///
    /// Callers may name a parameter with or without the leading `@`.
    pub fn placeholder(&self) -> String {
        if self.name.starts_with('@') {
            self.name.clone()
        } else {
            format!("@{}", self.name)
        }
    }

    /// Whether this parameter has the given placeholder name
    pub fn is_named(&self, name: &str) -> bool {
        self.placeholder().eq_ignore_ascii_case(name)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `@name` tokens in `sql` with their byte offsets
///
/// Text inside single-quoted literals is skipped; a doubled quote is an
/// escaped quote. `@@` system variables are not placeholders.
pub(crate) fn placeholder_tokens(sql: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut chars = sql.char_indices().peekable();
    let mut prev: Option<char> = None;
    let mut in_literal = false;

    while let Some((start, c)) = chars.next() {
        let at_boundary = prev.map_or(true, |p| p != '@' && !is_identifier_char(p));
        prev = Some(c);

        if in_literal {
            in_literal = c != '\'';
            continue;
        }
        if c == '\'' {
            in_literal = true;
            continue;
        }
        if c != '@' || !at_boundary {
            continue;
        }

        let mut end = start + 1;
        while let Some(&(idx, next)) = chars.peek() {
            if !is_identifier_char(next) {
                break;
            }
            end = idx + next.len_utf8();
            prev = Some(next);
            chars.next();
        }
        if end > start + 1 {
            tokens.push((start, &sql[start..end]));
        }
    }

    tokens
}

/// Byte offset of the first occurrence of `placeholder` as a whole token in `sql`
pub fn placeholder_position(sql: &str, placeholder: &str) -> Option<usize> {
    placeholder_tokens(sql)
        .into_iter()
        .find(|(_, token)| *token == placeholder)
        .map(|(start, _)| start)
}

/// Input parameters referenced by `sql`, ordered by their first placeholder
///
/// Drivers that number named parameters positionally bind in this order.
/// Parameters the text never mentions are dropped.
pub fn bind_order<'p>(sql: &str, params: &'p [Param]) -> Vec<&'p Param> {
    let mut positioned: Vec<(usize, &Param)> = params
        .iter()
        .filter(|p| p.is_input())
        .filter_map(|p| placeholder_position(sql, &p.placeholder()).map(|pos| (pos, p)))
        .collect();
    positioned.sort_by_key(|(pos, _)| *pos);
    positioned.dedup_by_key(|(pos, _)| *pos);
    positioned.into_iter().map(|(_, p)| p).collect()
}
