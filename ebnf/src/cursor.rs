use nom::bytes::complete::take_while;
use nom::IResult;

use crate::error::{Error, ErrorKind};

/// Keep track of a position within a str, updating on successful operations.
///
/// Offsets are byte offsets and always sit on a char boundary. The line
/// counter is 1-based and advances whenever a '\n' is consumed, no matter
/// which operation consumed it.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor {
            input,
            offset: 0,
            line: 1,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// The unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Decode the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Decode the character after the next one without consuming anything.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consume a single character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume `c` if it is the next character.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Check if a string matches the current input starting at the current
    /// offset. The offset will be updated on match.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.advance_over(s);
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        self.scan(take_while(char::is_whitespace));
    }

    /// Run a recognizer against the unconsumed input, advancing past whatever
    /// it consumed. Nothing is consumed when the recognizer fails.
    pub fn scan<O, F>(&mut self, mut parser: F) -> Option<O>
    where
        F: FnMut(&'a str) -> IResult<&'a str, O>,
    {
        let input = self.rest();
        match parser(input) {
            Ok((remaining, out)) => {
                self.advance_over(&input[..input.len() - remaining.len()]);
                Some(out)
            }
            Err(_) => None,
        }
    }

    /// Run `f` and restore the position afterwards, whatever `f` consumed.
    pub fn speculate<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let (offset, line) = (self.offset, self.line);
        let out = f(self);
        self.offset = offset;
        self.line = line;
        out
    }

    /// Input between two offsets previously reported by this cursor.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// An error at the current position.
    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.offset, self.line)
    }

    /// `kind` at the current position, or `UnexpectedEndOfInput` if there is
    /// nothing left to look at.
    pub fn expected(&self, kind: ErrorKind) -> Error {
        if self.is_eof() {
            self.error(ErrorKind::UnexpectedEndOfInput)
        } else {
            self.error(kind)
        }
    }

    /// `UnexpectedEndOfInput` located at the end of the input, for constructs
    /// that were opened here but never closed.
    pub fn unterminated(&self) -> Error {
        let rest = self.rest();
        Error::new(
            ErrorKind::UnexpectedEndOfInput,
            self.input.len(),
            self.line + rest.matches('\n').count(),
        )
    }

    fn advance_over(&mut self, consumed: &str) {
        self.line += consumed.matches('\n').count();
        self.offset += consumed.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;
    use nom::character::complete::digit1;

    #[test]
    fn peek_does_not_consume() {
        let c = Cursor::new("ab");
        assert_eq!(c.peek(), Some('a'));
        assert_eq!(c.peek_second(), Some('b'));
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn peek_at_end() {
        let mut c = Cursor::new("a");
        assert_eq!(c.peek_second(), None);
        c.bump();
        assert!(c.is_eof());
        assert_eq!(c.peek(), None);
        assert_eq!(c.bump(), None);
    }

    #[test]
    fn bump_decodes_multibyte() {
        let mut c = Cursor::new("é=");
        assert_eq!(c.bump(), Some('é'));
        assert_eq!(c.offset(), 2);
        assert_eq!(c.peek(), Some('='));
    }

    #[test]
    fn whitespace_counts_lines() {
        let mut c = Cursor::new(" \n\t\r\n  x");
        c.skip_whitespace();
        assert_eq!(c.peek(), Some('x'));
        assert_eq!(c.line(), 3);
    }

    #[test]
    fn eat_str_simple() {
        let tests = vec![
            ("", "", true),
            ("hello", "world", false),
            ("hello", "hello", true),
            ("hello", "ello", false),
            ("::= x", "::=", true),
        ];
        for test in tests {
            let mut c = Cursor::new(test.0);
            let got = c.eat_str(test.1);
            assert_eq!(got, test.2, "test case: {:?}", test);
            if got {
                assert_eq!(c.offset(), test.1.len());
            } else {
                assert_eq!(c.offset(), 0);
            }
        }
    }

    #[test]
    fn scan_advances_over_consumed() {
        let mut c = Cursor::new("123abc");
        assert_eq!(c.scan(digit1), Some("123"));
        assert_eq!(c.offset(), 3);
        assert_eq!(c.scan(digit1), None);
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn scan_counts_lines() {
        let mut c = Cursor::new("a\nb\nc");
        c.scan(take_while(|ch: char| ch != 'c'));
        assert_eq!(c.line(), 3);
    }

    #[test]
    fn speculate_always_restores() {
        let mut c = Cursor::new("x\n::=");
        let matched = c.speculate(|c| {
            c.bump();
            c.skip_whitespace();
            c.scan(tag("::=")).is_some()
        });
        assert!(matched);
        assert_eq!(c.offset(), 0);
        assert_eq!(c.line(), 1);
    }

    #[test]
    fn unterminated_points_at_end() {
        let mut c = Cursor::new("'abc\ndef");
        c.bump();
        let err = c.unterminated();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput);
        assert_eq!(err.offset, 8);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn expected_at_end_is_end_of_input() {
        let c = Cursor::new("");
        assert_eq!(
            c.expected(ErrorKind::ExpectedTerminator).kind,
            ErrorKind::UnexpectedEndOfInput
        );
        let c = Cursor::new("x");
        assert_eq!(
            c.expected(ErrorKind::ExpectedTerminator).kind,
            ErrorKind::ExpectedTerminator
        );
    }
}
