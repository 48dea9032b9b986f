/// Why a piece of text could not be turned into a flag value.
///
/// Every variant carries the name of the parsing function and the offending
/// input so the message stands on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{func}: parsing {input:?}: invalid syntax")]
    Syntax { func: &'static str, input: String },
    #[error("{func}: parsing {input:?}: value out of range")]
    Range { func: &'static str, input: String },
    #[error("{func}: parsing {input:?}: invalid base {base}")]
    InvalidBase {
        func: &'static str,
        input: String,
        base: u32,
    },
    #[error("time: invalid duration {0:?}")]
    InvalidDuration(String),
    #[error("time: missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("time: unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

impl ParseError {
    pub(crate) fn syntax(func: &'static str, input: &str) -> Self {
        ParseError::Syntax {
            func,
            input: input.to_string(),
        }
    }

    pub(crate) fn range(func: &'static str, input: &str) -> Self {
        ParseError::Range {
            func,
            input: input.to_string(),
        }
    }

    /// Re-attributes a numeric error to an outer function and its full input.
    pub(crate) fn within(self, outer: &'static str, whole: &str) -> Self {
        match self {
            ParseError::Syntax { .. } => ParseError::syntax(outer, whole),
            ParseError::Range { .. } => ParseError::range(outer, whole),
            ParseError::InvalidBase { base, .. } => ParseError::InvalidBase {
                func: outer,
                input: whole.to_string(),
                base,
            },
            other => other,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ParseError::Range { .. })
    }
}
