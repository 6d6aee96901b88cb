//! Numeric folding rules for sums, products, negation and powers.
//!
//! The list and matrix rules never compute numbers themselves; they build explicit arithmetic
//! subtrees (a determinant builds `a*d + -(b*c)`, a matrix product builds sums of pairwise
//! products) and hand them back to the session. These rules are what collapse those subtrees
//! into literals. They fold numeric children only; symbols, lists and unevaluated operations
//! pass through untouched for other rules to pick up.

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Add(terms) = expr else {
        return Ok(false);
    };

    let before = terms.len();
    terms.retain(|term| term.as_number().map(|n| !n.is_zero()).unwrap_or(true));
    match terms.len() {
        len if len == before => Ok(false),
        0 => {
            *expr = Expr::integer(0);
            Ok(true)
        },
        1 => {
            *expr = terms.swap_remove(0);
            Ok(true)
        },
        _ => Ok(true),
    }
}

/// Folds every numeric term of a sum into a single literal, and collapses single-term sums.
pub fn combine_numeric_terms(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Add(terms) = expr else {
        return Ok(false);
    };

    if terms.len() == 1 {
        *expr = terms.swap_remove(0);
        return Ok(true);
    }

    let Some(first) = terms.iter().position(|term| term.as_number().is_some()) else {
        return Ok(false);
    };
    let Expr::Num(mut accumulated) = std::mem::take(&mut terms[first]) else {
        return Ok(false);
    };

    let mut combined = false;
    let mut index = first + 1;
    while index < terms.len() {
        if terms[index].as_number().is_some() {
            if let Expr::Num(rhs) = terms.remove(index) {
                accumulated = accumulated + &rhs;
                combined = true;
            }
        } else {
            index += 1;
        }
    }
    terms[first] = Expr::Num(accumulated);

    if !combined {
        return Ok(false);
    }
    if terms.len() == 1 {
        *expr = terms.swap_remove(0);
    }
    Ok(true)
}

/// `0*a = 0`
///
/// Declines whenever a factor is a list: zeroing out a whole matrix chain would bypass the
/// distribution and matrix-product rules that own those shapes.
pub fn multiply_zero(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Mul(factors) = expr else {
        return Ok(false);
    };
    if factors.iter().any(Expr::is_list) {
        return Ok(false);
    }
    if factors
        .iter()
        .any(|factor| factor.as_number().map(|n| n.is_zero()).unwrap_or(false))
    {
        *expr = Expr::integer(0);
        return Ok(true);
    }
    Ok(false)
}

/// `1*a = a`
pub fn multiply_one(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Mul(factors) = expr else {
        return Ok(false);
    };

    let before = factors.len();
    factors.retain(|factor| factor.as_integer().map(|n| *n != 1).unwrap_or(true));
    match factors.len() {
        len if len == before => Ok(false),
        0 => {
            *expr = Expr::integer(1);
            Ok(true)
        },
        1 => {
            *expr = factors.swap_remove(0);
            Ok(true)
        },
        _ => Ok(true),
    }
}

/// Folds every numeric factor of a product into a single literal, and collapses single-factor
/// products.
pub fn combine_numeric_factors(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Mul(factors) = expr else {
        return Ok(false);
    };

    if factors.len() == 1 {
        *expr = factors.swap_remove(0);
        return Ok(true);
    }

    let Some(first) = factors.iter().position(|factor| factor.as_number().is_some()) else {
        return Ok(false);
    };
    let Expr::Num(mut accumulated) = std::mem::take(&mut factors[first]) else {
        return Ok(false);
    };

    let mut combined = false;
    let mut index = first + 1;
    while index < factors.len() {
        if factors[index].as_number().is_some() {
            if let Expr::Num(rhs) = factors.remove(index) {
                accumulated = accumulated * &rhs;
                combined = true;
            }
        } else {
            index += 1;
        }
    }
    factors[first] = Expr::Num(accumulated);

    if !combined {
        return Ok(false);
    }
    if factors.len() == 1 {
        *expr = factors.swap_remove(0);
    }
    Ok(true)
}

/// `-(n) = -n` for numeric literals.
pub fn negate_number(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Neg(inner) = expr else {
        return Ok(false);
    };
    if inner.as_number().is_none() {
        return Ok(false);
    }
    let Expr::Num(value) = std::mem::take(inner.as_mut()) else {
        return Ok(false);
    };
    *expr = Expr::Num(-value);
    Ok(true)
}

/// Folds a numeric base raised to a non-negative integer exponent.
pub fn numeric_power(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Pow(base, exponent) = expr else {
        return Ok(false);
    };
    let (Some(base), Some(exponent)) = (base.as_number(), exponent.as_integer()) else {
        return Ok(false);
    };
    if exponent.cmp0() == std::cmp::Ordering::Less {
        return Ok(false);
    }
    let Some(value) = base.checked_pow(exponent) else {
        return Ok(false);
    };
    *expr = Expr::Num(value);
    Ok(true)
}
