//! Ordering and conjugation of numeric literals.
//!
//! The lookup rules and the sort comparator both funnel through [`compare_numbers`]: they build a
//! `Compare` probe, reduce it, and branch on whether it became one of the three outcome tags. A
//! probe over non-numeric operands stays a `Compare`, which the callers read as "these values
//! have no order".

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;
use std::cmp::Ordering;

/// Resolves a comparison of two numeric literals into `Less`, `Greater` or `Equals`.
pub fn compare_numbers(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Compare(lhs, rhs) = expr else {
        return Ok(false);
    };
    let (Some(lhs), Some(rhs)) = (lhs.as_number(), rhs.as_number()) else {
        return Ok(false);
    };
    let Some(ordering) = lhs.partial_cmp(rhs) else {
        return Ok(false);
    };
    *expr = match ordering {
        Ordering::Less => Expr::Less,
        Ordering::Greater => Expr::Greater,
        Ordering::Equal => Expr::Equals,
    };
    Ok(true)
}

/// `conj(n) = n` on the real numeric domain.
pub fn conjugate_number(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Conjugate(inner) = expr else {
        return Ok(false);
    };
    if inner.as_number().is_none() {
        return Ok(false);
    }
    let value = std::mem::take(inner.as_mut());
    *expr = value;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use las_expr::number::float;
    use las_expr::Number;
    use pretty_assertions::assert_eq;
    use super::*;

    fn reduce(mut expr: Expr) -> Expr {
        let mut session = Session::new();
        session.reduce(&mut expr).unwrap();
        expr
    }

    #[test]
    fn numeric_comparisons_resolve() {
        let less = Expr::Compare(Box::new(Expr::integer(1)), Box::new(Expr::integer(2)));
        assert_eq!(reduce(less), Expr::Less);

        let greater = Expr::Compare(
            Box::new(Expr::Num(Number::Float(float(2.5)))),
            Box::new(Expr::integer(2)),
        );
        assert_eq!(reduce(greater), Expr::Greater);

        let equal = Expr::Compare(Box::new(Expr::integer(3)), Box::new(Expr::integer(3)));
        assert_eq!(reduce(equal), Expr::Equals);
    }

    #[test]
    fn non_numeric_comparisons_stay_unresolved() {
        let probe = Expr::Compare(Box::new(Expr::symbol("a")), Box::new(Expr::integer(1)));
        assert_eq!(
            reduce(probe),
            Expr::Compare(Box::new(Expr::symbol("a")), Box::new(Expr::integer(1))),
        );
    }

    #[test]
    fn conjugation_is_identity_on_numbers() {
        let expr = Expr::Conjugate(Box::new(Expr::integer(4)));
        assert_eq!(reduce(expr), Expr::integer(4));

        let symbolic = Expr::Conjugate(Box::new(Expr::symbol("z")));
        assert_eq!(reduce(symbolic), Expr::Conjugate(Box::new(Expr::symbol("z"))));
    }
}
