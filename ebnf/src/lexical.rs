//! Token-level recognizers shared by both dialects.
//!
//! Every consuming function here looks at the next character first and
//! returns `Ok(None)` without consuming anything when the construct does not
//! start there. When it does start, the function consumes all of it and
//! leaves the cursor one character past its end.

use nom::bytes::complete::{take_until, take_while};
use nom::character::complete::{alpha1, digit1, satisfy};
use nom::combinator::recognize;
use nom::sequence::pair;
use nom::IResult;

use crate::cursor::Cursor;
use crate::error::{ErrorKind, Result};

/// A meta identifier: a letter followed by letters, digits and whitespace.
/// Trailing whitespace is part of the match.
fn meta_identifier_text(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(char::is_alphabetic),
        take_while(|c: char| c.is_alphanumeric() || c.is_whitespace()),
    ))(input)
}

/// Whether the upcoming non-whitespace text opens a comment.
pub fn at_comment(cursor: &mut Cursor<'_>) -> bool {
    cursor.speculate(|c| {
        c.skip_whitespace();
        c.starts_with("(*")
    })
}

/// Consume a meta identifier, returning it with all whitespace removed.
pub fn meta_identifier(cursor: &mut Cursor<'_>) -> Option<String> {
    cursor
        .scan(meta_identifier_text)
        .map(|text| text.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Consume a bare W3C symbol.
pub fn symbol(cursor: &mut Cursor<'_>) -> Option<String> {
    cursor.scan(alpha1).map(|s: &str| s.to_owned())
}

/// Consume a run of decimal digits.
pub fn integer(cursor: &mut Cursor<'_>) -> Result<Option<usize>> {
    let start = cursor.clone();
    match cursor.scan(digit1) {
        Some(digits) => digits
            .parse::<usize>()
            .map(Some)
            .map_err(|_| start.error(ErrorKind::IntegerOverflow)),
        None => Ok(None),
    }
}

/// Consume a quoted terminal. The body runs verbatim up to the next
/// occurrence of the opening quote; there is no escaping.
pub fn terminal(cursor: &mut Cursor<'_>) -> Result<Option<String>> {
    let quote = match cursor.peek() {
        Some('\'') => "'",
        Some('"') => "\"",
        _ => return Ok(None),
    };
    cursor.bump();
    let body = cursor
        .scan(take_until(quote))
        .ok_or_else(|| cursor.unterminated())?;
    cursor.bump();
    Ok(Some(body.to_owned()))
}

/// Consume a special sequence, `? text ?`. Surrounding whitespace is trimmed
/// from the text.
pub fn special_sequence(cursor: &mut Cursor<'_>) -> Result<Option<String>> {
    if !cursor.eat('?') {
        return Ok(None);
    }
    cursor.skip_whitespace();
    let body: &str = cursor
        .scan(take_until("?"))
        .ok_or_else(|| cursor.unterminated())?;
    cursor.bump();
    Ok(Some(body.trim_end().to_owned()))
}

/// Consume a `(* ... *)` comment, returning its trimmed body.
///
/// Comments nest, and quoted terminals and special sequences inside a
/// comment are skipped whole, so a `*)` inside either does not end it.
pub fn comment(cursor: &mut Cursor<'_>) -> Result<Option<String>> {
    if !cursor.eat_str("(*") {
        return Ok(None);
    }
    let start = cursor.offset();
    loop {
        if cursor.starts_with("*)") {
            let body = cursor.slice(start, cursor.offset());
            cursor.eat_str("*)");
            return Ok(Some(body.trim().to_owned()));
        }
        if comment(cursor)?.is_some()
            || terminal(cursor)?.is_some()
            || special_sequence(cursor)?.is_some()
        {
            continue;
        }
        if cursor.bump().is_none() {
            return Err(cursor.unterminated());
        }
    }
}

/// Consume a W3C `/* ... */` comment. These do not nest.
pub fn block_comment(cursor: &mut Cursor<'_>) -> Result<bool> {
    if !cursor.eat_str("/*") {
        return Ok(false);
    }
    cursor
        .scan(take_until("*/"))
        .ok_or_else(|| cursor.unterminated())?;
    cursor.eat_str("*/");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCase<T> {
        input: &'static str,
        // Some is the expected output and remaining input, None an error.
        out: Option<(T, &'static str)>,
    }

    fn assert_test_cases<T, F>(f: F, tests: Vec<TestCase<T>>)
    where
        T: std::fmt::Debug + PartialEq,
        F: Fn(&mut Cursor<'static>) -> Result<T>,
    {
        for t in tests {
            let mut cursor = Cursor::new(t.input);
            let res = f(&mut cursor);
            match t.out {
                Some((out, rest)) => {
                    assert_eq!(res.as_ref().ok(), Some(&out), "input: {:?}", t.input);
                    assert_eq!(cursor.rest(), rest, "input: {:?}", t.input);
                }
                None => assert!(res.is_err(), "expected error: {:?}", res),
            }
        }
    }

    #[test]
    fn parse_terminal() {
        let tests = vec![
            TestCase {
                input: "\"hello\"",
                out: Some((Some("hello".to_owned()), "")),
            },
            TestCase {
                input: "'hello' world",
                out: Some((Some("hello".to_owned()), " world")),
            },
            TestCase {
                input: "'say \"hi\"';",
                out: Some((Some("say \"hi\"".to_owned()), ";")),
            },
            TestCase {
                input: "hello",
                out: Some((None, "hello")),
            },
            TestCase {
                input: "'hello\" world",
                out: None,
            },
        ];

        assert_test_cases(terminal, tests);
    }

    #[test]
    fn terminal_counts_lines() {
        let mut c = Cursor::new("'a\nb' x");
        assert_eq!(terminal(&mut c).unwrap(), Some("a\nb".to_owned()));
        assert_eq!(c.line(), 2);
    }

    #[test]
    fn parse_special_sequence() {
        let tests = vec![
            TestCase {
                input: "? any character ?",
                out: Some((Some("any character".to_owned()), "")),
            },
            TestCase {
                input: "?\n  ASCII letters\t?;",
                out: Some((Some("ASCII letters".to_owned()), ";")),
            },
            TestCase {
                input: "??",
                out: Some((Some("".to_owned()), "")),
            },
            TestCase {
                input: "? open",
                out: None,
            },
        ];

        assert_test_cases(special_sequence, tests);
    }

    #[test]
    fn parse_comment() {
        let tests = vec![
            TestCase {
                input: "(* c *)",
                out: Some((Some("c".to_owned()), "")),
            },
            TestCase {
                input: "(* outer (* inner *) tail *) x",
                out: Some((Some("outer (* inner *) tail".to_owned()), " x")),
            },
            TestCase {
                input: "(* quoted '*)' still comment *)",
                out: Some((Some("quoted '*)' still comment".to_owned()), "")),
            },
            TestCase {
                input: "(* special ? *) ? too *)",
                out: Some((Some("special ? *) ? too".to_owned()), "")),
            },
            TestCase {
                input: "(a)",
                out: Some((None, "(a)")),
            },
            TestCase {
                input: "(* never closed",
                out: None,
            },
            TestCase {
                input: "(* (* half closed *)",
                out: None,
            },
        ];

        assert_test_cases(comment, tests);
    }

    #[test]
    fn parse_integer() {
        let tests = vec![
            TestCase {
                input: "12 * x",
                out: Some((Some(12), " * x")),
            },
            TestCase {
                input: "0",
                out: Some((Some(0), "")),
            },
            TestCase {
                input: "x",
                out: Some((None, "x")),
            },
            TestCase {
                input: "99999999999999999999999999999",
                out: None,
            },
        ];

        assert_test_cases(integer, tests);
    }

    #[test]
    fn integer_overflow_kind() {
        let mut c = Cursor::new("184467440737095516160");
        let err = integer(&mut c).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IntegerOverflow);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn meta_identifier_strips_whitespace() {
        let mut c = Cursor::new("SYNTAX RULE\n 2 = x");
        assert_eq!(meta_identifier(&mut c), Some("SYNTAXRULE2".to_owned()));
        assert_eq!(c.rest(), "= x");
        assert_eq!(c.line(), 2);

        let mut c = Cursor::new("2abc");
        assert_eq!(meta_identifier(&mut c), None);
    }

    #[test]
    fn comment_lookahead_does_not_consume() {
        let mut c = Cursor::new("  \n (* x *)");
        assert!(at_comment(&mut c));
        assert_eq!(c.offset(), 0);
        assert_eq!(c.line(), 1);

        let mut c = Cursor::new(" (x)");
        assert!(!at_comment(&mut c));
    }

    #[test]
    fn w3c_block_comment() {
        let mut c = Cursor::new("/* a /* b */ x");
        assert!(block_comment(&mut c).unwrap());
        assert_eq!(c.rest(), " x");

        let mut c = Cursor::new("/* open");
        assert!(block_comment(&mut c).is_err());
    }
}
