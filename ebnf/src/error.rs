use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("expected a letter to start a meta identifier")]
    ExpectedMetaIdentifierStart,
    #[error("expected defining symbol")]
    ExpectedDefiningSymbol,
    #[error("expected terminator symbol ';' or '.'")]
    ExpectedTerminator,
    #[error("expected repetition symbol '*'")]
    ExpectedRepetitionSymbol,
    #[error("expected closing bracket {expected}")]
    ExpectedClosingBracket { expected: &'static str },
    #[error("integer does not fit in a usize")]
    IntegerOverflow,
    #[error("expected a symbol")]
    ExpectedSymbol,
    #[error("expected the start of an expression")]
    ExpectedExpressionStart,
    #[error("{construct} expressions are not supported")]
    UnsupportedConstruct { construct: &'static str },
}

/// The rule being parsed when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    pub name: String,
    pub line: usize,
}

/// A parse failure with the location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    /// Byte offset into the source text.
    pub offset: usize,
    /// 1-based line of `offset`.
    pub line: usize,
    pub rule: Option<RuleContext>,
}

impl Error {
    pub fn new(kind: ErrorKind, offset: usize, line: usize) -> Self {
        Error {
            kind,
            offset,
            line,
            rule: None,
        }
    }

    /// Attach the rule that was being parsed. An existing context is kept,
    /// since it is always the innermost one.
    pub fn in_rule(mut self, name: &str, line: usize) -> Self {
        if self.rule.is_none() {
            self.rule = Some(RuleContext {
                name: name.to_owned(),
                line,
            });
        }
        self
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref rule) = self.rule {
            write!(
                f,
                "failed parsing rule {} starting at line {}: ",
                rule.name, rule.line
            )?;
        }
        write!(f, "{} at line {}, offset {}", self.kind, self.line, self.offset)
    }
}

// `Display` already includes the kind, so it is not reported as a source.
impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_rule() {
        let err = Error::new(ErrorKind::ExpectedTerminator, 12, 2);
        assert_eq!(
            err.to_string(),
            "expected terminator symbol ';' or '.' at line 2, offset 12"
        );
    }

    #[test]
    fn display_with_rule() {
        let err = Error::new(ErrorKind::IntegerOverflow, 40, 3).in_rule("digits", 2);
        assert_eq!(
            err.to_string(),
            "failed parsing rule digits starting at line 2: integer does not fit in a usize at line 3, offset 40"
        );
    }

    #[test]
    fn innermost_rule_is_kept() {
        let err = Error::new(ErrorKind::ExpectedDefiningSymbol, 0, 1)
            .in_rule("inner", 1)
            .in_rule("outer", 1);
        assert_eq!(err.rule.unwrap().name, "inner");
    }

    #[test]
    fn kind_is_not_repeated_as_source() {
        use std::error::Error as _;

        let err = Error::new(ErrorKind::ExpectedSymbol, 3, 1).in_rule("a", 1);
        assert!(err.source().is_none());
    }
}
