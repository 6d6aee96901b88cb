//! Set-flavored combinatorial rules: cartesian products, cartesian powers, power sets.
//!
//! Results are ordered lists; the orderings below are fixed by the counters that enumerate them,
//! not by any set semantics. Neither the power set nor the cartesian power guards against large
//! inputs; both are exponential in time and memory by nature.

use crate::error::{set_in_error, ExpectedList, ExpectedNonNegativeInteger};
use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// The n-ary cartesian product of lists, enumerated with a rightmost-fastest odometer.
///
/// Any empty operand makes the whole product the empty list.
pub fn cartesian_product(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::CartesianProduct(operands) = expr else {
        return Ok(false);
    };
    if operands.is_empty() {
        return Ok(false);
    }

    let mut lengths = Vec::with_capacity(operands.len());
    for operand in operands.iter() {
        let Some(items) = operand.as_list() else {
            return Ok(false);
        };
        lengths.push(items.len());
    }

    if lengths.contains(&0) {
        *expr = Expr::List(Vec::new());
        return Ok(true);
    }

    let digits = operands.len();
    let mut indices = vec![0usize; digits];
    let mut result = Vec::new();
    'product: loop {
        let mut row = Vec::with_capacity(digits);
        for (operand, &index) in operands.iter().zip(&indices) {
            let Some(items) = operand.as_list() else {
                return Ok(false);
            };
            row.push(items[index].clone());
        }
        result.push(Expr::List(row));

        // odometer carry, last position fastest
        for offset in 0..digits {
            let digit = digits - offset - 1;
            indices[digit] += 1;
            if indices[digit] == lengths[digit] {
                if digit == 0 {
                    break 'product;
                }
                indices[digit] = 0;
            } else {
                break;
            }
        }
    }

    *expr = Expr::List(result);
    Ok(true)
}

/// `list^k`: expands into a k-ary cartesian product of clones of the list.
///
/// `k = 0` produces the one-element list containing the empty list; a negative `k` is a hard
/// error.
pub fn cartesian_exponentiation(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::CartesianPower(base, exponent) = expr else {
        return Ok(false);
    };
    if !base.is_list() {
        return Ok(false);
    }
    let Some(power) = exponent.as_integer() else {
        return Ok(false);
    };

    if power.cmp0() == std::cmp::Ordering::Less {
        return Err(set_in_error(exponent, ExpectedNonNegativeInteger));
    }
    if power.is_zero() {
        *expr = Expr::List(vec![Expr::List(Vec::new())]);
        return Ok(true);
    }
    let Some(power) = power.to_usize() else {
        return Ok(false);
    };

    let mut operands = Vec::with_capacity(power);
    for _ in 0..power {
        operands.push((**base).clone());
    }
    *expr = Expr::CartesianProduct(operands);
    session.reduce(expr)?;
    Ok(true)
}

/// All `2^n` subsets of a list, enumerated by an n-bit counter.
///
/// Subset `m` keeps element `pos` iff bit `pos` of `m` is **clear**: the zero mask is the whole
/// list and the all-ones mask is the empty list. Established table layouts depend on this
/// inverted convention, so it must not be "fixed".
pub fn power_set(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::PowerSet(inner) = expr else {
        return Ok(false);
    };
    let Some(items) = inner.as_list() else {
        return Err(set_in_error(inner, ExpectedList));
    };

    let size = items.len();
    let mut result = Vec::with_capacity(1usize << size);
    for mask in 0..(1usize << size) {
        let mut subset = Vec::new();
        for (pos, item) in items.iter().enumerate() {
            if mask & (1usize << pos) == 0 {
                subset.push(item.clone());
            }
        }
        result.push(Expr::List(subset));
    }

    *expr = Expr::List(result);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn reduce(mut expr: Expr) -> Expr {
        let mut session = Session::new();
        session.reduce(&mut expr).unwrap();
        expr
    }

    fn ints(values: &[i64]) -> Expr {
        Expr::List(values.iter().map(|&v| Expr::integer(v)).collect())
    }

    #[test]
    fn cartesian_product_is_rightmost_fastest() {
        let expr = Expr::CartesianProduct(vec![ints(&[1, 2]), ints(&[3, 4])]);
        assert_eq!(
            reduce(expr),
            Expr::List(vec![ints(&[1, 3]), ints(&[1, 4]), ints(&[2, 3]), ints(&[2, 4])]),
        );
    }

    #[test]
    fn cartesian_product_size_law() {
        let expr = Expr::CartesianProduct(vec![ints(&[1, 2]), ints(&[3, 4, 5]), ints(&[6])]);
        let Expr::List(rows) = reduce(expr) else {
            panic!("expected a list");
        };
        assert_eq!(rows.len(), 2 * 3 * 1);
    }

    #[test]
    fn empty_operand_empties_the_product() {
        let expr = Expr::CartesianProduct(vec![ints(&[1, 2]), ints(&[])]);
        assert_eq!(reduce(expr), Expr::List(vec![]));
    }

    #[test]
    fn cartesian_power_expands() {
        let expr = Expr::CartesianPower(Box::new(ints(&[1, 2])), Box::new(Expr::integer(2)));
        assert_eq!(
            reduce(expr),
            Expr::List(vec![ints(&[1, 1]), ints(&[1, 2]), ints(&[2, 1]), ints(&[2, 2])]),
        );
    }

    #[test]
    fn cartesian_power_zero_is_the_identity() {
        let expr = Expr::CartesianPower(Box::new(ints(&[1, 2])), Box::new(Expr::integer(0)));
        assert_eq!(reduce(expr), Expr::List(vec![Expr::List(vec![])]));
    }

    #[test]
    fn negative_cartesian_power_is_a_hard_error() {
        let mut expr =
            Expr::CartesianPower(Box::new(ints(&[1, 2])), Box::new(Expr::integer(-1)));
        let mut session = Session::new();
        let err = session.reduce(&mut expr).unwrap_err();
        assert_eq!(
            err.kind.message(),
            "Expression must be a non-negative integer number",
        );
    }

    #[test]
    fn power_set_order_follows_the_inverted_bit_convention() {
        let expr = Expr::PowerSet(Box::new(ints(&[1, 2])));
        assert_eq!(
            reduce(expr),
            Expr::List(vec![ints(&[1, 2]), ints(&[2]), ints(&[1]), ints(&[])]),
        );
    }

    #[test]
    fn power_set_size_law() {
        let expr = Expr::PowerSet(Box::new(ints(&[1, 2, 3, 4])));
        let Expr::List(subsets) = reduce(expr) else {
            panic!("expected a list");
        };
        assert_eq!(subsets.len(), 1 << 4);
    }

    #[test]
    fn power_set_of_a_non_list_is_a_hard_error() {
        let mut expr = Expr::PowerSet(Box::new(Expr::integer(5)));
        let mut session = Session::new();
        let err = session.reduce(&mut expr).unwrap_err();
        assert_eq!(err.kind.message(), "Expression must be a list");
    }
}
