use std::mem;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::{ErrorKind, Result};
use crate::iso::{Definition, DefinitionsList, Factor, Primary, Rule, Syntax, Term};
use crate::lexical;

/// Parse a complete ISO EBNF grammar.
pub fn parse(input: &str) -> Result<Syntax> {
    Parser::new(input).syntax()
}

/// Recursive descent over the ISO grammar. Comments found in gaps are held in
/// `pending` until the next factor or rule claims them.
struct Parser<'a> {
    cursor: Cursor<'a>,
    pending: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(input),
            pending: Vec::new(),
        }
    }

    /// Skip whitespace and comments, collecting the comments.
    fn gap(&mut self) -> Result<()> {
        while lexical::at_comment(&mut self.cursor) {
            self.cursor.skip_whitespace();
            if let Some(comment) = lexical::comment(&mut self.cursor)? {
                self.pending.push(comment);
            }
        }
        self.cursor.skip_whitespace();
        Ok(())
    }

    fn take_comments(&mut self) -> Vec<String> {
        mem::take(&mut self.pending)
    }

    fn syntax(mut self) -> Result<Syntax> {
        self.gap()?;
        let mut rules = vec![self.rule()?];
        loop {
            self.gap()?;
            if self.cursor.is_eof() {
                break;
            }
            rules.push(self.rule()?);
        }
        let trailing_comments = self.take_comments();
        trace!(
            rules = rules.len(),
            trailing = trailing_comments.len(),
            "parsed syntax"
        );
        Ok(Syntax {
            rules,
            trailing_comments,
        })
    }

    fn rule(&mut self) -> Result<Rule> {
        self.gap()?;
        let line = self.cursor.line();
        let meta_identifier = lexical::meta_identifier(&mut self.cursor)
            .ok_or_else(|| self.cursor.expected(ErrorKind::ExpectedMetaIdentifierStart))?;
        self.rule_body(&meta_identifier, line)
            .map_err(|err| err.in_rule(&meta_identifier, line))
    }

    fn rule_body(&mut self, meta_identifier: &str, line: usize) -> Result<Rule> {
        self.gap()?;
        let comments = self.take_comments();
        if !self.cursor.eat('=') {
            return Err(self.cursor.expected(ErrorKind::ExpectedDefiningSymbol));
        }
        let definitions_list = self.definitions_list()?;
        self.gap()?;
        if !(self.cursor.eat(';') || self.cursor.eat('.')) {
            return Err(self.cursor.expected(ErrorKind::ExpectedTerminator));
        }
        debug!(rule = %meta_identifier, line, "parsed rule");
        Ok(Rule {
            meta_identifier: meta_identifier.to_owned(),
            line,
            comments,
            definitions_list,
        })
    }

    fn definitions_list(&mut self) -> Result<DefinitionsList> {
        let mut definitions = vec![self.definition()?];
        loop {
            self.gap()?;
            match self.cursor.peek() {
                Some('|') | Some('!') => {}
                // "/)" closes an optional sequence.
                Some('/') if self.cursor.peek_second() != Some(')') => {}
                _ => break,
            }
            self.cursor.bump();
            definitions.push(self.definition()?);
        }
        Ok(DefinitionsList(definitions))
    }

    fn definition(&mut self) -> Result<Definition> {
        let mut terms = vec![self.term()?];
        loop {
            self.gap()?;
            if !self.cursor.eat(',') {
                break;
            }
            terms.push(self.term()?);
        }
        Ok(Definition(terms))
    }

    fn term(&mut self) -> Result<Term> {
        let factor = self.factor()?;
        self.gap()?;
        let exception = if self.cursor.eat('-') {
            Some(self.factor()?)
        } else {
            None
        };
        Ok(Term { factor, exception })
    }

    fn factor(&mut self) -> Result<Factor> {
        self.gap()?;
        let repetitions = lexical::integer(&mut self.cursor)?;
        if repetitions.is_some() {
            self.gap()?;
            if !self.cursor.eat('*') {
                return Err(self.cursor.expected(ErrorKind::ExpectedRepetitionSymbol));
            }
            self.gap()?;
        }
        let comments = self.take_comments();
        let primary = self.primary()?;
        Ok(Factor {
            comments,
            repetitions,
            primary,
        })
    }

    fn primary(&mut self) -> Result<Primary> {
        match (self.cursor.peek(), self.cursor.peek_second()) {
            (Some('['), _) | (Some('('), Some('/')) => {
                return self
                    .sequence(&["[", "(/"], &["]", "/)"], "']' or '/)'")
                    .map(Primary::OptionalSequence)
            }
            (Some('{'), _) | (Some('('), Some(':')) => {
                return self
                    .sequence(&["{", "(:"], &["}", ":)"], "'}' or ':)'")
                    .map(Primary::RepeatedSequence)
            }
            (Some('('), _) => {
                return self
                    .sequence(&["("], &[")"], "')'")
                    .map(Primary::GroupedSequence)
            }
            _ => {}
        }
        if let Some(text) = lexical::special_sequence(&mut self.cursor)? {
            return Ok(Primary::SpecialSequence(text));
        }
        if let Some(text) = lexical::terminal(&mut self.cursor)? {
            return Ok(Primary::Terminal(text));
        }
        if let Some(name) = lexical::meta_identifier(&mut self.cursor) {
            return Ok(Primary::MetaIdentifier(name));
        }
        Ok(Primary::Empty)
    }

    /// A definitions list between one of `open` and one of `close`. Either
    /// spelling of the closing bracket is accepted whichever opened it.
    fn sequence(
        &mut self,
        open: &[&str],
        close: &[&str],
        expected: &'static str,
    ) -> Result<DefinitionsList> {
        // Longest spelling first, so "(/" is not taken as "(".
        let opened = open.iter().rev().any(|s| self.cursor.eat_str(s));
        debug_assert!(opened, "sequence called off an opening bracket");
        let list = self.definitions_list()?;
        self.gap()?;
        if close.iter().any(|s| self.cursor.eat_str(s)) {
            Ok(list)
        } else {
            Err(self
                .cursor
                .expected(ErrorKind::ExpectedClosingBracket { expected }))
        }
    }
}
