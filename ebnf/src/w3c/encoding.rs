use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use super::{Expression, ExpressionKind, Occurrence};

#[derive(Serialize, Deserialize)]
pub struct ExceptionRepr {
    #[serde(rename = "match")]
    matches: Box<Expression>,
    except: Box<Expression>,
}

/// The JSON shape of an [`Expression`]: one field per kind, exactly one of
/// which is present, and a flag per suffix.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    character_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list: Option<Vec<Expression>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternate: Option<Vec<Expression>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception: Option<ExceptionRepr>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    optional: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    one_or_more: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    zero_or_more: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    grouped: bool,
}

impl From<Expression> for ExpressionRepr {
    fn from(expression: Expression) -> Self {
        let mut repr = ExpressionRepr {
            optional: expression.optional(),
            one_or_more: expression.one_or_more(),
            zero_or_more: expression.zero_or_more(),
            grouped: expression.grouped,
            ..ExpressionRepr::default()
        };
        match expression.kind {
            ExpressionKind::Literal(text) => repr.literal = Some(text),
            ExpressionKind::Symbol(name) => repr.symbol = Some(name),
            ExpressionKind::CharacterSet(set) => repr.character_set = Some(set),
            ExpressionKind::List(items) => repr.list = Some(items),
            ExpressionKind::Alternate(arms) => repr.alternate = Some(arms),
            ExpressionKind::Exception { matches, except } => {
                repr.exception = Some(ExceptionRepr { matches, except })
            }
        }
        repr
    }
}

impl TryFrom<ExpressionRepr> for Expression {
    type Error = String;

    fn try_from(repr: ExpressionRepr) -> Result<Self, Self::Error> {
        let mut kinds = Vec::new();
        if let Some(text) = repr.literal {
            kinds.push(ExpressionKind::Literal(text));
        }
        if let Some(name) = repr.symbol {
            kinds.push(ExpressionKind::Symbol(name));
        }
        if let Some(set) = repr.character_set {
            kinds.push(ExpressionKind::CharacterSet(set));
        }
        if let Some(items) = repr.list {
            kinds.push(ExpressionKind::List(items));
        }
        if let Some(arms) = repr.alternate {
            kinds.push(ExpressionKind::Alternate(arms));
        }
        if let Some(ExceptionRepr { matches, except }) = repr.exception {
            kinds.push(ExpressionKind::Exception { matches, except });
        }
        if kinds.len() != 1 {
            return Err(format!(
                "expression must populate exactly one kind, found {}",
                kinds.len()
            ));
        }
        let kind = kinds.remove(0);
        if let ExpressionKind::List(items) | ExpressionKind::Alternate(items) = &kind {
            if items.is_empty() {
                return Err("list and alternate must hold at least one expression".to_owned());
            }
        }

        let occurrence = match (repr.optional, repr.one_or_more, repr.zero_or_more) {
            (false, false, false) => Occurrence::Once,
            (true, false, false) => Occurrence::Optional,
            (false, true, false) => Occurrence::OneOrMore,
            (false, false, true) => Occurrence::ZeroOrMore,
            _ => return Err("expression has more than one repetition suffix".to_owned()),
        };

        Ok(Expression {
            kind,
            occurrence,
            grouped: repr.grouped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use serde_json::json;

    #[test]
    fn encode_expressions() {
        let tests = vec![
            (Expression::literal("one"), json!({ "literal": "one" })),
            (
                Expression::symbol("S").with_occurrence(Occurrence::OneOrMore),
                json!({ "symbol": "S", "oneOrMore": true }),
            ),
            (
                Expression::alternate(vec![Expression::literal("a"), Expression::symbol("b")])
                    .parenthesized()
                    .with_occurrence(Occurrence::ZeroOrMore),
                json!({
                    "alternate": [{ "literal": "a" }, { "symbol": "b" }],
                    "zeroOrMore": true,
                    "grouped": true,
                }),
            ),
            (
                Expression::exception(Expression::symbol("Char"), Expression::literal("-")),
                json!({ "exception": { "match": { "symbol": "Char" }, "except": { "literal": "-" } } }),
            ),
        ];

        for (expression, expected) in tests {
            assert_eq!(serde_json::to_value(&expression).unwrap(), expected);
            let decoded: Expression = serde_json::from_value(expected).unwrap();
            assert_eq!(decoded, expression);
        }
    }

    #[test]
    fn decode_rejects_invalid_expressions() {
        let tests = vec![
            json!({}),
            json!({ "literal": "a", "symbol": "b" }),
            json!({ "literal": "a", "optional": true, "zeroOrMore": true }),
            json!({ "list": [] }),
            json!({ "alternate": [] }),
            json!({ "list": [{ "alternate": [] }] }),
        ];
        for value in tests {
            let res: Result<Expression, _> = serde_json::from_value(value.clone());
            assert!(res.is_err(), "expected error for {}", value);
        }
    }
}
