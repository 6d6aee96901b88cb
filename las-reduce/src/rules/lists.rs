//! Element-wise list rules: negation, sums of lists, scalar distribution, dot and outer
//! products.

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// Distributes a negation over every element of a list.
pub fn negative_list(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Neg(inner) = expr else {
        return Ok(false);
    };
    let Expr::List(items) = inner.as_mut() else {
        return Ok(false);
    };

    for item in items.iter_mut() {
        let element = std::mem::take(item);
        *item = Expr::Neg(Box::new(element));
    }
    let list = std::mem::take(inner.as_mut());
    *expr = list;

    let Expr::List(items) = expr else {
        return Ok(false);
    };
    for item in items.iter_mut() {
        session.reduce(item)?;
    }
    Ok(true)
}

/// Element-wise accumulation of equal-length lists anywhere within an n-ary sum.
///
/// Every list acts in turn as a pivot: the rest of the chain is scanned for other lists of the
/// same length, whose elements are folded into the pivot's (wrapping a pivot element in an `Add`
/// the first time it receives a second term) before the consumed sibling is removed. A chain
/// that collapses to a single term replaces the sum entirely.
pub fn addition_lists(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Add(terms) = expr else {
        return Ok(false);
    };

    let mut updated = false;
    let mut pivot_index = 0;
    while pivot_index + 1 < terms.len() {
        let pivot_size = match terms[pivot_index].as_list() {
            Some(items) if !items.is_empty() => items.len(),
            _ => {
                pivot_index += 1;
                continue;
            },
        };

        let mut found = false;
        let mut scan = pivot_index + 1;
        while scan < terms.len() {
            if terms[scan].as_list().map(<[Expr]>::len) != Some(pivot_size) {
                scan += 1;
                continue;
            }
            let Expr::List(consumed) = terms.remove(scan) else {
                continue;
            };
            updated = true;
            found = true;

            let Some(Expr::List(pivot_items)) = terms.get_mut(pivot_index) else {
                return Ok(false);
            };
            for (cell, extra) in pivot_items.iter_mut().zip(consumed) {
                if !matches!(cell, Expr::Add(_)) {
                    let first = std::mem::take(cell);
                    *cell = Expr::Add(vec![first]);
                }
                if let Expr::Add(accumulated) = cell {
                    accumulated.push(extra);
                }
            }
        }

        if found {
            let Some(Expr::List(pivot_items)) = terms.get_mut(pivot_index) else {
                return Ok(false);
            };
            for cell in pivot_items.iter_mut() {
                session.reduce(cell)?;
            }
        }
        pivot_index += 1;
    }

    if updated {
        if terms.len() == 1 {
            *expr = terms.swap_remove(0);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Distributes a scalar over every element of a list in a two-factor product.
pub fn multiplication_scalar_list(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Mul(factors) = expr else {
        return Ok(false);
    };
    if factors.len() != 2 {
        return Ok(false);
    }
    if !matches!(factors[0], Expr::Num(_)) || !factors[1].is_list() {
        return Ok(false);
    }

    let scalar = factors[0].clone();
    let Expr::List(mut items) = std::mem::take(&mut factors[1]) else {
        return Ok(false);
    };
    for item in items.iter_mut() {
        let element = std::mem::take(item);
        *item = Expr::Mul(vec![scalar.clone(), element]);
    }
    *expr = Expr::List(items);

    let Expr::List(items) = expr else {
        return Ok(false);
    };
    for item in items.iter_mut() {
        session.reduce(item)?;
    }
    Ok(true)
}

/// The dot product of two equal-length lists.
///
/// Zero-length lists dot to the integer 0; single-element lists skip the sum wrapper.
pub fn dot_product(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::DotProduct(lhs, rhs) = expr else {
        return Ok(false);
    };
    let (Some(xs), Some(ys)) = (lhs.as_list(), rhs.as_list()) else {
        return Ok(false);
    };
    if xs.len() != ys.len() {
        return Ok(false);
    }

    match xs.len() {
        0 => {
            *expr = Expr::integer(0);
            return Ok(true);
        },
        1 => {
            let product = Expr::Mul(vec![xs[0].clone(), ys[0].clone()]);
            *expr = product;
        },
        _ => {
            let terms = xs
                .iter()
                .zip(ys)
                .map(|(x, y)| Expr::Mul(vec![x.clone(), y.clone()]))
                .collect();
            *expr = Expr::Add(terms);
        },
    }
    session.reduce(expr)?;
    Ok(true)
}

/// The outer product of two lists: an n×m matrix of pairwise products, rows indexed by the
/// first list.
pub fn outer_product(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::OuterProduct(lhs, rhs) = expr else {
        return Ok(false);
    };
    let (Some(xs), Some(ys)) = (lhs.as_list(), rhs.as_list()) else {
        return Ok(false);
    };

    let rows = xs
        .iter()
        .map(|x| {
            Expr::List(
                ys.iter()
                    .map(|y| Expr::Mul(vec![x.clone(), y.clone()]))
                    .collect(),
            )
        })
        .collect();
    *expr = Expr::List(rows);
    session.reduce(expr)?;
    Ok(true)
}
