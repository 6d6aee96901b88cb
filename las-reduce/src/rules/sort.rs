//! Sorting a list with a reducible comparator.
//!
//! The comparator is an ordinary lambda expression: the caller's, or a synthesized default over
//! the generic comparison relation. Every pairwise comparison builds an application of that
//! lambda, reduces it through the session, and classifies the outcome tag; the sort order is
//! whatever total order the comparator induces, with no stability guarantee for ties.

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;
use log::warn;
use std::cmp::Ordering;

/// Sorts a list in place with quicksort, using the second child as the comparator when present.
pub fn sort(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Sort(children) = expr else {
        return Ok(false);
    };
    if children.is_empty() || !children[0].is_list() {
        return Ok(false);
    }
    let comparator = if children.len() >= 2 {
        children[1].clone()
    } else {
        default_comparator()
    };

    let Expr::List(mut items) = std::mem::take(&mut children[0]) else {
        return Ok(false);
    };
    if items.len() > 1 {
        let last = items.len() as isize - 1;
        quick_sort(&mut items, session, &comparator, 0, last);
    }
    *expr = Expr::List(items);
    Ok(true)
}

/// The two-parameter lambda used when no comparator is supplied: it defers to the generic
/// comparison relation.
fn default_comparator() -> Expr {
    let params = Expr::List(vec![Expr::symbol("__cmp_left"), Expr::symbol("__cmp_right")]);
    let body = Expr::Compare(
        Box::new(Expr::symbol("__cmp_left")),
        Box::new(Expr::symbol("__cmp_right")),
    );
    Expr::Lambda(Box::new(params), Box::new(body))
}

/// Applies the comparator to two elements and classifies the reduced result.
///
/// Anything other than a definite `Less` or `Greater` counts as equal, including a hard error
/// inside the comparator.
fn compare(session: &mut Session, comparator: &Expr, lhs: &Expr, rhs: &Expr) -> Ordering {
    let mut application = Expr::Apply(
        Box::new(comparator.clone()),
        Box::new(Expr::List(vec![lhs.clone(), rhs.clone()])),
    );
    match session.reduce(&mut application) {
        Ok(()) => match application {
            Expr::Less => Ordering::Less,
            Expr::Greater => Ordering::Greater,
            _ => Ordering::Equal,
        },
        Err(err) => {
            warn!("comparator failed, treating operands as equal: {}", err);
            Ordering::Equal
        },
    }
}

/// Picks the median of the first, middle and last elements under the comparator.
fn median_of_three(
    session: &mut Session,
    comparator: &Expr,
    x: &Expr,
    y: &Expr,
    z: &Expr,
) -> Expr {
    if compare(session, comparator, x, y) == Ordering::Less {
        if compare(session, comparator, y, z) == Ordering::Less {
            y.clone()
        } else if compare(session, comparator, z, x) == Ordering::Less {
            x.clone()
        } else {
            z.clone()
        }
    } else if compare(session, comparator, y, z) == Ordering::Greater {
        y.clone()
    } else if compare(session, comparator, z, x) == Ordering::Greater {
        x.clone()
    } else {
        z.clone()
    }
}

/// Hoare-partition quicksort over the owned element buffer.
fn quick_sort(
    items: &mut [Expr],
    session: &mut Session,
    comparator: &Expr,
    left: isize,
    right: isize,
) {
    if left >= right {
        return;
    }

    let mut i = left;
    let mut j = right;
    let pivot = median_of_three(
        session,
        comparator,
        &items[i as usize],
        &items[(i + (j - i) / 2) as usize],
        &items[j as usize],
    );

    loop {
        while compare(session, comparator, &items[i as usize], &pivot) == Ordering::Less {
            i += 1;
        }
        while compare(session, comparator, &pivot, &items[j as usize]) == Ordering::Less {
            j -= 1;
        }
        if i >= j {
            break;
        }
        items.swap(i as usize, j as usize);
        i += 1;
        j -= 1;
    }

    quick_sort(items, session, comparator, left, i - 1);
    quick_sort(items, session, comparator, j + 1, right);
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
    fn default_comparator_sorts_ascending() {
        let expr = Expr::Sort(vec![ints(&[3, 1, 2])]);
        assert_eq!(reduce(expr), ints(&[1, 2, 3]));
    }

    #[test]
    fn sorting_handles_duplicates_and_larger_inputs() {
        let expr = Expr::Sort(vec![ints(&[5, 1, 4, 1, 5, 9, 2, 6, 5, 3])]);
        assert_eq!(reduce(expr), ints(&[1, 1, 2, 3, 4, 5, 5, 5, 6, 9]));
    }

    #[test]
    fn custom_comparator_reverses_the_order() {
        let descending = Expr::Lambda(
            Box::new(Expr::List(vec![Expr::symbol("p"), Expr::symbol("q")])),
            Box::new(Expr::Compare(
                Box::new(Expr::symbol("q")),
                Box::new(Expr::symbol("p")),
            )),
        );
        let expr = Expr::Sort(vec![ints(&[3, 1, 2]), descending]);
        assert_eq!(reduce(expr), ints(&[3, 2, 1]));
    }

    #[test]
    fn incomparable_elements_keep_some_permutation() {
        let expr = Expr::Sort(vec![Expr::List(vec![
            Expr::symbol("x"),
            Expr::symbol("y"),
        ])]);
        let Expr::List(items) = reduce(expr) else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        assert!(items.contains(&Expr::symbol("x")));
        assert!(items.contains(&Expr::symbol("y")));
    }

    #[test]
    fn empty_and_singleton_lists_sort_trivially() {
        assert_eq!(reduce(Expr::Sort(vec![ints(&[])])), ints(&[]));
        assert_eq!(reduce(Expr::Sort(vec![ints(&[42])])), ints(&[42]));
    }
}
