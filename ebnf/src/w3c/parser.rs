use std::mem;

use nom::bytes::complete::tag;
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::{ErrorKind, Result};
use crate::lexical;
use crate::w3c::merge;
use crate::w3c::{Expression, ExpressionKind, Occurrence, Rule, Syntax};

/// Parse a complete W3C EBNF grammar. Empty input is an empty grammar.
pub fn parse(input: &str) -> Result<Syntax> {
    Parser {
        cursor: Cursor::new(input),
    }
    .syntax()
}

/// Recursive descent over W3C rules. Only parentheses recurse, so stack use
/// follows the nesting depth of the grammar.
struct Parser<'a> {
    cursor: Cursor<'a>,
}

/// Skip whitespace and `/* */` comments.
fn skip_gap(cursor: &mut Cursor<'_>) -> Result<()> {
    loop {
        cursor.skip_whitespace();
        if !lexical::block_comment(cursor)? {
            return Ok(());
        }
    }
}

impl<'a> Parser<'a> {
    fn gap(&mut self) -> Result<()> {
        skip_gap(&mut self.cursor)
    }

    fn syntax(mut self) -> Result<Syntax> {
        let mut rules = Vec::new();
        loop {
            self.gap()?;
            if self.cursor.is_eof() {
                break;
            }
            rules.push(self.rule()?);
        }
        trace!(rules = rules.len(), "parsed syntax");
        Ok(Syntax { rules })
    }

    fn rule(&mut self) -> Result<Rule> {
        let line = self.cursor.line();
        let symbol = lexical::symbol(&mut self.cursor)
            .ok_or_else(|| self.cursor.expected(ErrorKind::ExpectedSymbol))?;
        self.rule_body(&symbol, line)
            .map_err(|err| err.in_rule(&symbol, line))
    }

    fn rule_body(&mut self, symbol: &str, line: usize) -> Result<Rule> {
        self.gap()?;
        if self.cursor.scan(tag("::=")).is_none() {
            return Err(self.cursor.expected(ErrorKind::ExpectedDefiningSymbol));
        }
        let expression = self.expression()?;
        debug!(rule = %symbol, line, "parsed rule");
        Ok(Rule {
            symbol: symbol.to_owned(),
            line,
            expression,
        })
    }

    /// Whether the next token starts another rule, `symbol ::=`.
    fn at_rule_start(&mut self) -> bool {
        self.cursor.speculate(|cursor| {
            lexical::symbol(cursor).is_some()
                && skip_gap(cursor).is_ok()
                && cursor.scan(tag("::=")).is_some()
        })
    }

    /// Everything up to the end of the current rule or the closing
    /// parenthesis of the current group.
    fn expression(&mut self) -> Result<Expression> {
        let mut arms = Vec::new();
        let mut items = Vec::new();
        loop {
            items.push(self.item()?);
            match self.cursor.peek() {
                None | Some(')') => break,
                Some('|') => {
                    self.cursor.bump();
                    arms.push(merge::sequence(mem::take(&mut items)));
                }
                _ => {
                    if self.at_rule_start() {
                        trace!(line = self.cursor.line(), "rule ends before next symbol");
                        break;
                    }
                }
            }
        }
        arms.push(merge::sequence(items));
        Ok(merge::alternate(arms))
    }

    /// A simple expression, optionally followed by `- except`. Leaves the
    /// cursor after the following gap.
    fn item(&mut self) -> Result<Expression> {
        let matches = self.simple()?;
        self.gap()?;
        if !self.cursor.eat('-') {
            return Ok(matches);
        }
        let except = self.simple()?;
        self.gap()?;
        Ok(Expression::exception(matches, except))
    }

    /// A literal, symbol or parenthesized expression with an optional
    /// suffix.
    fn simple(&mut self) -> Result<Expression> {
        self.gap()?;
        let expression = match self.cursor.peek() {
            Some('(') => {
                self.cursor.bump();
                let inner = self.expression()?;
                self.gap()?;
                if !self.cursor.eat(')') {
                    return Err(self
                        .cursor
                        .expected(ErrorKind::ExpectedClosingBracket { expected: "')'" }));
                }
                inner.parenthesized()
            }
            Some('[') | Some('#') => {
                return Err(self.cursor.error(ErrorKind::UnsupportedConstruct {
                    construct: "character set",
                }))
            }
            _ => {
                if let Some(text) = lexical::terminal(&mut self.cursor)? {
                    Expression::new(ExpressionKind::Literal(text))
                } else if let Some(name) = lexical::symbol(&mut self.cursor) {
                    Expression::new(ExpressionKind::Symbol(name))
                } else {
                    return Err(self.cursor.expected(ErrorKind::ExpectedExpressionStart));
                }
            }
        };
        Ok(self.suffix(expression))
    }

    fn suffix(&mut self, expression: Expression) -> Expression {
        let occurrence = match self.cursor.peek() {
            Some('?') => Occurrence::Optional,
            Some('*') => Occurrence::ZeroOrMore,
            Some('+') => Occurrence::OneOrMore,
            _ => return expression,
        };
        self.cursor.bump();
        expression.with_occurrence(occurrence)
    }
}
