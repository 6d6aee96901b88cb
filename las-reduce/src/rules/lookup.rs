//! Key lookups over a table's first column.
//!
//! Both rules probe row by row with a fresh `Compare(key, rowKey)` reduced through the session,
//! so whatever ordering rules apply to the operands decide the outcome. A probe that reduces to
//! nothing at all (it still carries the `Compare` tag afterwards) means the values have no
//! order, which fails the range lookup immediately.

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// Floor lookup over an assumed-ascending first column: returns the row with the greatest key
/// not exceeding the search value, or the exact match if one exists.
pub fn range_lookup(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::RangeLookup(table, value) = expr else {
        return Ok(false);
    };
    let Some(width) = table.matrix_shape().width() else {
        return Ok(false);
    };
    if width < 2 {
        return Ok(false);
    }
    let Expr::List(rows) = table.as_ref() else {
        return Ok(false);
    };

    let row_count = rows.len();
    let mut hit = None;
    for index in 0..row_count {
        let Expr::List(cells) = &rows[index] else {
            return Ok(false);
        };
        let mut probe = Expr::Compare(
            Box::new((**value).clone()),
            Box::new(cells[0].clone()),
        );
        session.reduce_arg(&mut probe, 0)?;

        match probe {
            Expr::Greater => {
                if index == row_count - 1 {
                    hit = Some(rows[index].clone());
                    break;
                }
            },
            Expr::Less => {
                if index == 0 {
                    return Ok(false);
                }
                hit = Some(rows[index - 1].clone());
                break;
            },
            Expr::Equals => {
                hit = Some(rows[index].clone());
                break;
            },
            // no reduction was performed: the values are not comparable
            Expr::Compare(..) => return Ok(false),
            _ => {},
        }
    }

    let Some(row) = hit else {
        return Ok(false);
    };
    *expr = row;
    Ok(true)
}

/// Scans every row until the key compares equal; fails if the table is exhausted.
pub fn exact_lookup(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::ExactLookup(table, value) = expr else {
        return Ok(false);
    };
    let Some(width) = table.matrix_shape().width() else {
        return Ok(false);
    };
    if width < 2 {
        return Ok(false);
    }
    let Expr::List(rows) = table.as_ref() else {
        return Ok(false);
    };

    let mut hit = None;
    for row in rows {
        let Expr::List(cells) = row else {
            return Ok(false);
        };
        let mut probe = Expr::Compare(
            Box::new((**value).clone()),
            Box::new(cells[0].clone()),
        );
        session.reduce_arg(&mut probe, 0)?;

        if matches!(probe, Expr::Equals) {
            hit = Some(row.clone());
            break;
        }
    }

    let Some(row) = hit else {
        return Ok(false);
    };
    *expr = row;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use las_expr::Tag;
    use pretty_assertions::assert_eq;
    use super::*;

    fn reduce(mut expr: Expr) -> Expr {
        let mut session = Session::new();
        session.reduce(&mut expr).unwrap();
        expr
    }

    /// A three-row table with keys 1, 3, 5 and symbolic payloads.
    fn sample_table() -> Expr {
        Expr::List(vec![
            Expr::List(vec![Expr::integer(1), Expr::symbol("a")]),
            Expr::List(vec![Expr::integer(3), Expr::symbol("b")]),
            Expr::List(vec![Expr::integer(5), Expr::symbol("c")]),
        ])
    }

    #[test]
    fn range_lookup_floors_between_keys() {
        let expr = Expr::RangeLookup(Box::new(sample_table()), Box::new(Expr::integer(4)));
        assert_eq!(
            reduce(expr),
            Expr::List(vec![Expr::integer(3), Expr::symbol("b")]),
        );
    }

    #[test]
    fn range_lookup_matches_exact_keys() {
        let expr = Expr::RangeLookup(Box::new(sample_table()), Box::new(Expr::integer(5)));
        assert_eq!(
            reduce(expr),
            Expr::List(vec![Expr::integer(5), Expr::symbol("c")]),
        );
    }

    #[test]
    fn range_lookup_clamps_to_the_last_row() {
        let expr = Expr::RangeLookup(Box::new(sample_table()), Box::new(Expr::integer(99)));
        assert_eq!(
            reduce(expr),
            Expr::List(vec![Expr::integer(5), Expr::symbol("c")]),
        );
    }

    #[test]
    fn range_lookup_fails_below_the_first_key() {
        let expr = Expr::RangeLookup(Box::new(sample_table()), Box::new(Expr::integer(0)));
        assert_eq!(reduce(expr).tag(), Tag::RangeLookup);
    }

    #[test]
    fn range_lookup_fails_on_incomparable_values() {
        let expr = Expr::RangeLookup(Box::new(sample_table()), Box::new(Expr::symbol("q")));
        assert_eq!(reduce(expr).tag(), Tag::RangeLookup);
    }

    #[test]
    fn exact_lookup_finds_only_exact_keys() {
        let hit = Expr::ExactLookup(Box::new(sample_table()), Box::new(Expr::integer(3)));
        assert_eq!(
            reduce(hit),
            Expr::List(vec![Expr::integer(3), Expr::symbol("b")]),
        );

        let miss = Expr::ExactLookup(Box::new(sample_table()), Box::new(Expr::integer(4)));
        assert_eq!(reduce(miss).tag(), Tag::ExactLookup);
    }

    #[test]
    fn lookups_require_at_least_two_columns() {
        let narrow = Expr::List(vec![
            Expr::List(vec![Expr::integer(1)]),
            Expr::List(vec![Expr::integer(2)]),
        ]);
        let expr = Expr::RangeLookup(Box::new(narrow), Box::new(Expr::integer(1)));
        assert_eq!(reduce(expr).tag(), Tag::RangeLookup);
    }
}
