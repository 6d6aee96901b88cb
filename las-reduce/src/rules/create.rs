//! List, table and crossed-table construction: ranges, repetition, and scoped comprehensions.
//!
//! The comprehension rules are registered as special so they see their children exactly as
//! written: the template must stay unreduced until the iteration variable is bound, and the
//! bounds/source children are reduced explicitly, one at a time, before filling starts.
//!
//! Every fill loop follows the same discipline: overwrite the scope slot, clone the template,
//! reduce the clone to completion, append it, and only then overwrite the slot for the next
//! iteration.
//! Because reduction is strictly sequential, no clone ever observes a neighboring iteration's
//! binding.

use crate::error::{set_in_error, ExpectedInteger};
use crate::scope::ScopeFrame;
use crate::session::Session;
use las_error::Error;
use las_expr::number::int;
use las_expr::{Expr, MatrixShape, Number, Tag};
use std::cmp::Ordering;

/// Collapses the legacy two-child `Table(matrix, headers)` shape into the canonical one-child
/// form, splicing the header list in as row 0 of the matrix.
pub fn table(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Table(children) = expr else {
        return Ok(false);
    };
    if children.len() != 2 {
        return Ok(false);
    }
    let Some(header) = children[1].as_list() else {
        return Ok(false);
    };
    let Some(cols) = children[0].matrix_shape().width() else {
        return Ok(false);
    };
    if cols != header.len() {
        return Ok(false);
    }

    let mut matrix = children[0].clone();
    let Expr::List(rows) = &mut matrix else {
        return Ok(false);
    };
    rows.insert(0, children[1].clone());
    children[0] = matrix;
    children.truncate(1);
    Ok(true)
}

/// Expands an inclusive integer range into the list of consecutive integers between its
/// endpoints, walking up or down as the direction requires.
pub fn from_range(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::FromRange(left, right) = expr else {
        return Ok(false);
    };
    let Some(left) = left.as_integer() else {
        return Err(set_in_error(left, ExpectedInteger));
    };
    let Some(right) = right.as_integer() else {
        return Err(set_in_error(right, ExpectedInteger));
    };

    let step = if left <= right { 1 } else { -1 };
    let mut items = Vec::new();
    let mut current = left.clone();
    loop {
        items.push(Expr::Num(Number::Integer(current.clone())));
        if current == *right {
            break;
        }
        current += step;
    }

    *expr = Expr::List(items);
    Ok(true)
}

/// Splits a table comprehension's template into its header row and its per-iteration template.
///
/// A matrix-shaped template contributes its first row as the header, cloned once up front, and
/// its second row as the template each iteration clones. Any other template is itself the header
/// row and also serves as the per-iteration template. Plain list comprehensions have no header.
fn table_parts(is_table: bool, template: &Expr) -> Option<(Option<Expr>, Expr)> {
    if !is_table {
        return Some((None, template.clone()));
    }
    if matches!(template.matrix_shape(), MatrixShape::Width(_)) {
        let Expr::List(rows) = template else {
            return None;
        };
        let header = rows.first()?.clone();
        let body = rows.get(1)?.clone();
        Some((Some(header), body))
    } else {
        Some((Some(template.clone()), template.clone()))
    }
}

/// Runs one arithmetic-range fill: rebind, clone, reduce, append, advance.
fn fill_range(
    session: &mut Session,
    slot: usize,
    template: &Expr,
    from: Number,
    to: &Number,
    step: &Number,
    descending: bool,
    out: &mut Vec<Expr>,
) -> Result<(), Error> {
    let mut current = from;
    loop {
        match current.partial_cmp(to) {
            Some(Ordering::Less) if descending => break,
            Some(Ordering::Greater) if !descending => break,
            None => break,
            _ => {},
        }
        session.rebind(slot, Expr::Num(current.clone()));
        let mut element = template.clone();
        session.reduce(&mut element)?;
        out.push(element);
        current = current + step;
    }
    Ok(())
}

/// Repeat-count and arithmetic-range list creation.
///
/// Two children build a list of N clones of the template; three to five children bind a symbol
/// over `from..=to` by `step` (with `from` and `step` defaulting to 1) and clone the template
/// once per value. Under the table tag the generated list is wrapped in a `Table`, with the
/// header treatment of [`table_parts`]; the repeat form always builds a plain list.
pub fn create_list(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let tag = expr.tag();
    let (Expr::CreateList(children) | Expr::CreateTable(children)) = expr else {
        return Ok(false);
    };
    let arity = children.len();

    if arity == 2 {
        let template = children[0].clone();
        session.reduce_arg(&mut children[1], 1)?;
        let Some(count) = children[1].as_integer() else {
            return Ok(false);
        };
        let count = if count.cmp0() == Ordering::Less {
            0
        } else {
            match count.to_usize() {
                Some(count) => count,
                None => return Ok(false),
            }
        };

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(template.clone());
        }
        *expr = Expr::List(items);
        session.reduce(expr)?;
        return Ok(true);
    }

    if !(3..=5).contains(&arity) {
        return Ok(false);
    }
    let Some(symbol_name) = children[1].as_symbol().map(str::to_string) else {
        return Ok(false);
    };
    for index in 2..arity {
        session.reduce_arg(&mut children[index], index)?;
    }
    // a three-child form whose last child is a list is the comprehension form instead
    if arity == 3 && children[2].is_list() {
        return Ok(false);
    }

    let from = if arity >= 4 {
        match children[2].as_number() {
            Some(value) => value.clone(),
            None => return Ok(false),
        }
    } else {
        Number::Integer(int(1))
    };
    let to_index = if arity == 3 { 2 } else { 3 };
    let to = match children[to_index].as_number() {
        Some(value) => value.clone(),
        None => return Ok(false),
    };
    let step = if arity == 5 {
        match children[4].as_number() {
            Some(value) => value.clone(),
            None => return Ok(false),
        }
    } else {
        Number::Integer(int(1))
    };
    if step.is_zero() {
        return Ok(false);
    }
    let descending = step.is_negative();

    let is_table = tag == Tag::CreateTable;
    let Some((header, template)) = table_parts(is_table, &children[0]) else {
        return Ok(false);
    };

    let mut items = Vec::new();
    if let Some(header) = header {
        items.push(header);
    }

    let mut frame = ScopeFrame::new();
    let slot = frame.declare(symbol_name.as_str());
    session.push_scope(frame);
    let outcome = fill_range(session, slot, &template, from, &to, &step, descending, &mut items);
    session.pop_scope();
    outcome?;

    let list = Expr::List(items);
    *expr = if is_table {
        Expr::Table(vec![list])
    } else {
        list
    };
    Ok(true)
}

/// Comprehension over an existing list: one binding per symbol, matched positionally against
/// each source element's children when more than one symbol is given.
pub fn create_list_list(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let tag = expr.tag();
    let (Expr::CreateList(children) | Expr::CreateTable(children)) = expr else {
        return Ok(false);
    };
    if children.len() != 3 {
        return Ok(false);
    }

    let names: Vec<String> = match &children[1] {
        Expr::Symbol(name) => vec![name.clone()],
        Expr::List(symbols) => {
            let mut names = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                let Some(name) = symbol.as_symbol() else {
                    return Ok(false);
                };
                names.push(name.to_string());
            }
            names
        },
        _ => return Ok(false),
    };

    session.reduce_arg(&mut children[2], 2)?;
    if !children[2].is_list() {
        return Ok(false);
    }

    let is_table = tag == Tag::CreateTable;
    let Some((header, template)) = table_parts(is_table, &children[0]) else {
        return Ok(false);
    };

    let mut frame = ScopeFrame::new();
    let slots: Vec<usize> = names.iter().map(|name| frame.declare(name.as_str())).collect();
    let positional = names.len() > 1;

    let mut items = Vec::new();
    if let Some(header) = header {
        items.push(header);
    }

    session.push_scope(frame);
    let outcome: Result<bool, Error> = (|| {
        let Expr::List(source) = &children[2] else {
            return Ok(false);
        };
        for element in source {
            if positional {
                let Some(parts) = element.as_list() else {
                    return Ok(false);
                };
                if parts.len() < slots.len() {
                    return Ok(false);
                }
                for (&slot, part) in slots.iter().zip(parts) {
                    session.rebind(slot, part.clone());
                }
            } else {
                session.rebind(slots[0], element.clone());
            }

            let mut cell = template.clone();
            session.reduce(&mut cell)?;
            items.push(cell);
        }
        Ok(true)
    })();
    session.pop_scope();
    if !outcome? {
        return Ok(false);
    }

    let list = Expr::List(items);
    *expr = if is_table {
        Expr::Table(vec![list])
    } else {
        list
    };
    Ok(true)
}

/// Two symbols bound over the cartesian combination of two axis lists (or one list reused for
/// both axes), producing a `Table` whose header row carries the symbol pair and the second
/// axis's values.
pub fn create_crossed_table(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::CreateCrossedTable(children) = expr else {
        return Ok(false);
    };
    if children.len() != 3 {
        return Ok(false);
    }

    let (name1, name2) = {
        let Some(spec) = children[1].as_list() else {
            return Ok(false);
        };
        if spec.len() != 2 {
            return Ok(false);
        }
        let (Some(first), Some(second)) = (spec[0].as_symbol(), spec[1].as_symbol()) else {
            return Ok(false);
        };
        if first == second {
            return Ok(false);
        }
        (first.to_string(), second.to_string())
    };

    session.reduce_arg(&mut children[2], 2)?;
    let (axis1, axis2): (Vec<Expr>, Vec<Expr>) = {
        let Some(axes) = children[2].as_list() else {
            return Ok(false);
        };
        match axes {
            [both] => {
                let Some(items) = both.as_list() else {
                    return Ok(false);
                };
                if items.is_empty() {
                    return Ok(false);
                }
                (items.to_vec(), items.to_vec())
            },
            [first, second] => {
                let (Some(rows), Some(columns)) = (first.as_list(), second.as_list()) else {
                    return Ok(false);
                };
                if rows.is_empty() || columns.is_empty() {
                    return Ok(false);
                }
                (rows.to_vec(), columns.to_vec())
            },
            _ => return Ok(false),
        }
    };

    let template = children[0].clone();
    let symbol_pair = children[1].clone();

    let mut frame = ScopeFrame::new();
    let slot1 = frame.declare(name1.as_str());
    let slot2 = frame.declare(name2.as_str());

    let mut header = Vec::with_capacity(axis2.len() + 1);
    header.push(symbol_pair);
    header.extend(axis2.iter().cloned());
    let mut rows = vec![Expr::List(header)];

    session.push_scope(frame);
    let outcome: Result<(), Error> = (|| {
        for row_value in &axis1 {
            let mut row = Vec::with_capacity(axis2.len() + 1);
            row.push(row_value.clone());
            session.rebind(slot1, row_value.clone());
            for column_value in &axis2 {
                session.rebind(slot2, column_value.clone());
                let mut cell = template.clone();
                session.reduce(&mut cell)?;
                row.push(cell);
            }
            rows.push(Expr::List(row));
        }
        Ok(())
    })();
    session.pop_scope();
    outcome?;

    *expr = Expr::Table(vec![Expr::List(rows)]);
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
    fn range_walks_in_both_directions() {
        let up = Expr::FromRange(Box::new(Expr::integer(1)), Box::new(Expr::integer(5)));
        assert_eq!(reduce(up), ints(&[1, 2, 3, 4, 5]));

        let down = Expr::FromRange(Box::new(Expr::integer(5)), Box::new(Expr::integer(1)));
        assert_eq!(reduce(down), ints(&[5, 4, 3, 2, 1]));

        let single = Expr::FromRange(Box::new(Expr::integer(2)), Box::new(Expr::integer(2)));
        assert_eq!(reduce(single), ints(&[2]));
    }

    #[test]
    fn range_endpoints_must_be_integers() {
        let mut expr = Expr::FromRange(Box::new(Expr::symbol("a")), Box::new(Expr::integer(3)));
        let mut session = Session::new();
        let err = session.reduce(&mut expr).unwrap_err();
        assert_eq!(err.kind.message(), "Expression must be an integer number");
    }

    #[test]
    fn repeat_count_clones_the_template() {
        let expr = Expr::CreateList(vec![Expr::integer(7), Expr::integer(3)]);
        assert_eq!(reduce(expr), ints(&[7, 7, 7]));
    }

    #[test]
    fn repeat_count_reduces_its_count_child() {
        let count = Expr::Add(vec![Expr::integer(1), Expr::integer(1)]);
        let expr = Expr::CreateList(vec![Expr::symbol("a"), count]);
        assert_eq!(
            reduce(expr),
            Expr::List(vec![Expr::symbol("a"), Expr::symbol("a")]),
        );
    }

    #[test]
    fn arithmetic_range_binds_the_symbol() {
        // template 10*k over k = 1..=3
        let template = Expr::Mul(vec![Expr::integer(10), Expr::symbol("k")]);
        let expr = Expr::CreateList(vec![
            template,
            Expr::symbol("k"),
            Expr::integer(1),
            Expr::integer(3),
        ]);
        assert_eq!(reduce(expr), ints(&[10, 20, 30]));
    }

    #[test]
    fn arithmetic_range_respects_a_negative_step() {
        let expr = Expr::CreateList(vec![
            Expr::symbol("k"),
            Expr::symbol("k"),
            Expr::integer(5),
            Expr::integer(1),
            Expr::integer(-2),
        ]);
        assert_eq!(reduce(expr), ints(&[5, 3, 1]));
    }

    #[test]
    fn zero_step_declines() {
        let expr = Expr::CreateList(vec![
            Expr::symbol("k"),
            Expr::symbol("k"),
            Expr::integer(1),
            Expr::integer(3),
            Expr::integer(0),
        ]);
        let reduced = reduce(expr);
        assert_eq!(reduced.tag(), Tag::CreateList);
    }

    #[test]
    fn three_child_range_defaults_from_to_one() {
        let expr = Expr::CreateList(vec![
            Expr::symbol("k"),
            Expr::symbol("k"),
            Expr::integer(4),
        ]);
        assert_eq!(reduce(expr), ints(&[1, 2, 3, 4]));
    }

    #[test]
    fn comprehension_over_a_list() {
        let template = Expr::Mul(vec![Expr::symbol("v"), Expr::symbol("v")]);
        let expr = Expr::CreateList(vec![template, Expr::symbol("v"), ints(&[2, 3, 4])]);
        assert_eq!(reduce(expr), ints(&[4, 9, 16]));
    }

    #[test]
    fn comprehension_binds_multiple_symbols_positionally() {
        let template = Expr::Add(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let source = Expr::List(vec![ints(&[1, 2]), ints(&[10, 20])]);
        let expr = Expr::CreateList(vec![
            template,
            Expr::List(vec![Expr::symbol("a"), Expr::symbol("b")]),
            source,
        ]);
        assert_eq!(reduce(expr), ints(&[3, 30]));
    }

    #[test]
    fn iterations_never_observe_each_others_binding() {
        // each element is the sum k + k of its own iteration's value only
        let template = Expr::Add(vec![Expr::symbol("k"), Expr::symbol("k")]);
        let expr = Expr::CreateList(vec![
            template,
            Expr::symbol("k"),
            Expr::integer(1),
            Expr::integer(3),
        ]);
        assert_eq!(reduce(expr), ints(&[2, 4, 6]));
    }

    #[test]
    fn table_comprehension_extracts_the_header_row() {
        // template {{h}, {k}}: header {h}, body {k}
        let template = Expr::List(vec![
            Expr::List(vec![Expr::symbol("h")]),
            Expr::List(vec![Expr::symbol("k")]),
        ]);
        let expr = Expr::CreateTable(vec![
            template,
            Expr::symbol("k"),
            Expr::integer(1),
            Expr::integer(2),
        ]);
        assert_eq!(
            reduce(expr),
            Expr::Table(vec![Expr::List(vec![
                Expr::List(vec![Expr::symbol("h")]),
                ints(&[1]),
                ints(&[2]),
            ])]),
        );
    }

    #[test]
    fn legacy_table_shape_collapses() {
        let matrix = Expr::List(vec![ints(&[1, 2]), ints(&[3, 4])]);
        let header = Expr::List(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let expr = Expr::Table(vec![matrix, header.clone()]);
        assert_eq!(
            reduce(expr),
            Expr::Table(vec![Expr::List(vec![header, ints(&[1, 2]), ints(&[3, 4])])]),
        );
    }

    #[test]
    fn table_header_width_must_match() {
        let matrix = Expr::List(vec![ints(&[1, 2])]);
        let header = Expr::List(vec![Expr::symbol("a")]);
        let expr = Expr::Table(vec![matrix.clone(), header.clone()]);
        assert_eq!(reduce(expr), Expr::Table(vec![matrix, header]));
    }

    #[test]
    fn crossed_table_layout() {
        let template = Expr::Mul(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let spec = Expr::List(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let axes = Expr::List(vec![ints(&[1, 2]), ints(&[3, 4])]);
        let expr = Expr::CreateCrossedTable(vec![template, spec.clone(), axes]);

        let Expr::Table(children) = reduce(expr) else {
            panic!("expected a table");
        };
        let Expr::List(rows) = &children[0] else {
            panic!("expected a matrix");
        };
        assert_eq!(
            rows[0],
            Expr::List(vec![spec, Expr::integer(3), Expr::integer(4)]),
        );
        assert_eq!(rows[1], ints(&[1, 3, 4]));
        assert_eq!(rows[2], ints(&[2, 6, 8]));
    }

    #[test]
    fn crossed_table_reuses_a_single_axis() {
        let template = Expr::Mul(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let spec = Expr::List(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let axes = Expr::List(vec![ints(&[1, 2])]);
        let expr = Expr::CreateCrossedTable(vec![template, spec, axes]);

        let Expr::Table(children) = reduce(expr) else {
            panic!("expected a table");
        };
        let Expr::List(rows) = &children[0] else {
            panic!("expected a matrix");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], ints(&[1, 1, 2]));
        assert_eq!(rows[2], ints(&[2, 2, 4]));
    }
}
