//! Parse EBNF grammar text into syntax trees.
//!
//! Two dialects are supported, each with its own tree:
//!
//! - [`iso`]: ISO/IEC 14977 EBNF (`rule = a , [ b ] | c ;`), keeping comments
//!   as documentation on the rule or factor that follows them.
//! - [`w3c`]: the notation of the XML recommendations (`rule ::= a b? | c`).
//!
//! Both trees serialize to a fixed JSON shape with serde, and print back to
//! grammar text with `Display`.
//!
//! ```
//! let syntax: ebnf::iso::Syntax = "digit = \"0\" | \"1\" ;".parse().unwrap();
//! assert_eq!(syntax.rules[0].meta_identifier, "digit");
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

mod cursor;
mod error;
pub mod iso;
mod lexical;
pub mod w3c;

pub use error::{Error, ErrorKind, Result, RuleContext};

/// A supported EBNF notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Iso,
    W3c,
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dialect::Iso => write!(f, "iso"),
            Dialect::W3c => write!(f, "w3c"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso" => Ok(Dialect::Iso),
            "w3c" => Ok(Dialect::W3c),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}

/// A parsed grammar of either dialect. Serializes as the dialect's own tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Grammar {
    Iso(iso::Syntax),
    W3c(w3c::Syntax),
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Grammar::Iso(syntax) => write!(f, "{}", syntax),
            Grammar::W3c(syntax) => write!(f, "{}", syntax),
        }
    }
}

/// Parse `input` as a grammar written in `dialect`.
pub fn parse(dialect: Dialect, input: &str) -> Result<Grammar> {
    match dialect {
        Dialect::Iso => iso::parse(input).map(Grammar::Iso),
        Dialect::W3c => w3c::parse(input).map(Grammar::W3c),
    }
}
