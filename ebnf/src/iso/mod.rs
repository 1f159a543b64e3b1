//! Syntax trees for ISO/IEC 14977 EBNF.
//!
//! ```text
//! (* a comment *)
//! digit = "0" | "1" | "2" ;
//! pair  = 2 * digit , [ "-" , digit ] - "00" ;
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

mod encoding;
mod parser;

pub use parser::parse;

/// A complete grammar.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syntax {
    pub rules: Vec<Rule>,
    /// Comments after the last rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", rule)?;
        }
        if !self.trailing_comments.is_empty() {
            writeln!(f)?;
            write_comments(f, &self.trailing_comments)?;
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

/// A production rule.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// The rule's name with all whitespace removed.
    pub meta_identifier: String,
    /// Line of the first character of the meta identifier.
    pub line: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    pub definitions_list: DefinitionsList,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_comments(f, &self.comments)?;
        write!(f, "{} = {} ;", self.meta_identifier, self.definitions_list)
    }
}

/// Alternatives, separated by `|`, `/` or `!`. Never empty.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(into = "Vec<Definition>", try_from = "Vec<Definition>")]
pub struct DefinitionsList(pub Vec<Definition>);

impl Display for DefinitionsList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_separated(f, &self.0, " | ")
    }
}

/// A sequence of terms, separated by `,`. Never empty.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(into = "Vec<Term>", try_from = "Vec<Term>")]
pub struct Definition(pub Vec<Term>);

impl Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_separated(f, &self.0, " , ")
    }
}

/// A factor, optionally excluding whatever `exception` matches.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub factor: Factor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<Factor>,
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.factor)?;
        if let Some(ref exception) = self.exception {
            write!(f, " - {}", exception)?;
        }
        Ok(())
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Factor {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// The explicit `n *` count. `None` when no count was written, which is
    /// not the same as an explicit `0 *`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<usize>,
    pub primary: Primary,
}

impl Factor {
    /// A factor with no comments and no repetition count.
    pub fn new(primary: Primary) -> Self {
        Factor {
            comments: Vec::new(),
            repetitions: None,
            primary,
        }
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_comments(f, &self.comments)?;
        if let Some(n) = self.repetitions {
            write!(f, "{} * ", n)?;
        }
        write!(f, "{}", self.primary)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(into = "encoding::PrimaryRepr", try_from = "encoding::PrimaryRepr")]
pub enum Primary {
    /// `[ ... ]` or `(/ ... /)`, matched zero or one time.
    OptionalSequence(DefinitionsList),
    /// `{ ... }` or `(: ... :)`, matched zero or more times.
    RepeatedSequence(DefinitionsList),
    /// `? ... ?`, text whose meaning is defined outside the grammar.
    SpecialSequence(String),
    /// `( ... )`.
    GroupedSequence(DefinitionsList),
    /// A reference to another rule.
    MetaIdentifier(String),
    Terminal(String),
    /// Matches nothing.
    Empty,
}

impl Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Primary::OptionalSequence(list) => write!(f, "[ {} ]", list),
            Primary::RepeatedSequence(list) => write!(f, "{{ {} }}", list),
            Primary::SpecialSequence(text) => write!(f, "? {} ?", text),
            Primary::GroupedSequence(list) => write!(f, "( {} )", list),
            Primary::MetaIdentifier(name) => write!(f, "{}", name),
            Primary::Terminal(text) if text.contains('"') => write!(f, "'{}'", text),
            Primary::Terminal(text) => write!(f, "\"{}\"", text),
            Primary::Empty => Ok(()),
        }
    }
}

fn write_comments(f: &mut fmt::Formatter, comments: &[String]) -> fmt::Result {
    for comment in comments {
        write!(f, "(* {} *) ", comment)?;
    }
    Ok(())
}

fn write_separated<T: Display>(f: &mut fmt::Formatter, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
