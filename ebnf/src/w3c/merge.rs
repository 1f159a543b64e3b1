//! Flattening of collected items into N-ary nodes.
//!
//! The parser gathers the items of each `|`-separated arm, turns every arm
//! into one expression with [`sequence`], then joins the arms with
//! [`alternate`]. Sequencing binds tighter than alternation: `a b | c` is
//! `Alternate[List[a, b], c]`.

use super::{Expression, ExpressionKind, Occurrence};

/// Join the juxtaposed `items` of one arm. A single item is returned as is.
pub fn sequence(mut items: Vec<Expression>) -> Expression {
    if items.len() == 1 {
        return items.remove(0);
    }
    Expression::list(items.into_iter().flat_map(list_items).collect())
}

/// Join `|`-separated `arms`. A single arm is returned as is.
pub fn alternate(mut arms: Vec<Expression>) -> Expression {
    if arms.len() == 1 {
        return arms.remove(0);
    }
    Expression::alternate(arms.into_iter().flat_map(alternate_arms).collect())
}

/// The items `e` contributes to an enclosing list.
fn list_items(e: Expression) -> Vec<Expression> {
    match e {
        Expression {
            kind: ExpressionKind::List(items),
            occurrence: Occurrence::Once,
            ..
        } => items,
        e => vec![e],
    }
}

/// The arms `e` contributes to an enclosing alternate. Parentheses alone do
/// not keep an alternate apart, a suffix does.
fn alternate_arms(e: Expression) -> Vec<Expression> {
    match e {
        Expression {
            kind: ExpressionKind::Alternate(arms),
            occurrence: Occurrence::Once,
            ..
        } => arms,
        e => vec![e],
    }
}
