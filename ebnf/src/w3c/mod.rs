//! Syntax trees for the W3C EBNF notation used by the XML recommendations.
//!
//! ```text
//! document ::= prolog element Misc*
//! Misc     ::= Comment | PI | S
//! ```
//!
//! Alternation and sequence are not bracketed in the notation, so the parser
//! flattens them as it goes: a run of juxtaposed expressions becomes one
//! [`ExpressionKind::List`] and a run of `|`-separated ones becomes one
//! [`ExpressionKind::Alternate`], with sequencing binding tighter.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

mod encoding;
mod merge;
mod parser;

pub use parser::parse;

/// A complete grammar.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Syntax {
    pub rules: Vec<Rule>,
}

impl Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for Syntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// `symbol ::= expression`
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub symbol: String,
    pub line: usize,
    pub expression: Expression,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ::= {}", self.symbol, self.expression)
    }
}

/// The suffix applied to an expression.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Occurrence {
    Once,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Occurrence {
    fn suffix(self) -> &'static str {
        match self {
            Occurrence::Once => "",
            Occurrence::Optional => "?",
            Occurrence::ZeroOrMore => "*",
            Occurrence::OneOrMore => "+",
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(into = "encoding::ExpressionRepr", try_from = "encoding::ExpressionRepr")]
pub struct Expression {
    pub kind: ExpressionKind,
    pub occurrence: Occurrence,
    /// Written in parentheses. A grouped alternate is never spread into an
    /// enclosing sequence.
    pub grouped: bool,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ExpressionKind {
    /// A quoted string.
    Literal(String),
    /// A reference to another rule.
    Symbol(String),
    /// `[...]` or `#x..`. Recognized but never produced by the parser.
    CharacterSet(String),
    /// Concatenation.
    List(Vec<Expression>),
    /// Choice.
    Alternate(Vec<Expression>),
    /// `matches - except`.
    Exception {
        matches: Box<Expression>,
        except: Box<Expression>,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Expression {
            kind,
            occurrence: Occurrence::Once,
            grouped: false,
        }
    }

    pub fn literal(text: &str) -> Self {
        Self::new(ExpressionKind::Literal(text.to_owned()))
    }

    pub fn symbol(name: &str) -> Self {
        Self::new(ExpressionKind::Symbol(name.to_owned()))
    }

    pub fn list(items: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::List(items))
    }

    pub fn alternate(arms: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Alternate(arms))
    }

    pub fn exception(matches: Expression, except: Expression) -> Self {
        Self::new(ExpressionKind::Exception {
            matches: Box::new(matches),
            except: Box::new(except),
        })
    }

    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn parenthesized(mut self) -> Self {
        self.grouped = true;
        self
    }

    pub fn optional(&self) -> bool {
        self.occurrence == Occurrence::Optional
    }

    pub fn one_or_more(&self) -> bool {
        self.occurrence == Occurrence::OneOrMore
    }

    pub fn zero_or_more(&self) -> bool {
        self.occurrence == Occurrence::ZeroOrMore
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.grouped {
            write!(f, "(")?;
        }
        match &self.kind {
            ExpressionKind::Literal(text) if text.contains('\'') => write!(f, "\"{}\"", text)?,
            ExpressionKind::Literal(text) => write!(f, "'{}'", text)?,
            ExpressionKind::Symbol(name) => write!(f, "{}", name)?,
            ExpressionKind::CharacterSet(set) => write!(f, "{}", set)?,
            ExpressionKind::List(items) => write_separated(f, items, " ")?,
            ExpressionKind::Alternate(arms) => write_separated(f, arms, " | ")?,
            ExpressionKind::Exception { matches, except } => {
                write!(f, "{} - {}", matches, except)?
            }
        }
        if self.grouped {
            write!(f, ")")?;
        }
        write!(f, "{}", self.occurrence.suffix())
    }
}

fn write_separated(f: &mut fmt::Formatter, items: &[Expression], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
