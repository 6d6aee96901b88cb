//! Linear-algebra rules over matrix-shaped lists.
//!
//! Every rule here starts from a fresh [`matrix_shape`](Expr::matrix_shape) probe; shapes are
//! never remembered across rewrites, since an earlier rule may have changed a child's tag.

use crate::session::Session;
use las_error::Error;
use las_expr::Expr;

/// Swaps rows and columns of a matrix: element `(i, j)` moves to `(j, i)`.
pub fn transpose(expr: &mut Expr, _session: &mut Session) -> Result<bool, Error> {
    let Expr::Transpose(matrix) = expr else {
        return Ok(false);
    };
    let Some(cols) = matrix.matrix_shape().width() else {
        return Ok(false);
    };
    let Expr::List(rows) = matrix.as_ref() else {
        return Ok(false);
    };

    let mut result = Vec::with_capacity(cols);
    for r in 0..cols {
        let mut row = Vec::with_capacity(rows.len());
        for source in rows {
            let Expr::List(cells) = source else {
                return Ok(false);
            };
            row.push(cells[r].clone());
        }
        result.push(Expr::List(row));
    }

    *expr = Expr::List(result);
    Ok(true)
}

/// The determinant of a square matrix by cofactor expansion along row 0.
///
/// 1×1 and 2×2 matrices are the base cases; anything larger builds one
/// `(-1)^part * M[0][part] * det(minor)` term per column and sums them, with each minor
/// re-entering this rule through the session.
pub fn determinant(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Determinant(matrix) = expr else {
        return Ok(false);
    };
    let Some(size) = matrix.matrix_shape().width() else {
        return Ok(false);
    };
    let Expr::List(rows) = matrix.as_ref() else {
        return Ok(false);
    };
    if rows.len() != size {
        return Ok(false);
    }

    if size == 1 {
        let Expr::List(cells) = &rows[0] else {
            return Ok(false);
        };
        let value = cells[0].clone();
        *expr = value;
        return Ok(true);
    }

    if size == 2 {
        let (Expr::List(top), Expr::List(bottom)) = (&rows[0], &rows[1]) else {
            return Ok(false);
        };
        let main = Expr::Mul(vec![top[0].clone(), bottom[1].clone()]);
        let anti = Expr::Mul(vec![top[1].clone(), bottom[0].clone()]);
        *expr = Expr::Add(vec![main, Expr::Neg(Box::new(anti))]);
        session.reduce(expr)?;
        return Ok(true);
    }

    let Expr::List(top) = &rows[0] else {
        return Ok(false);
    };
    let mut terms = Vec::with_capacity(size);
    for part in 0..size {
        let mut minor_rows = Vec::with_capacity(size - 1);
        for row in rows.iter().skip(1) {
            let Expr::List(cells) = row else {
                return Ok(false);
            };
            let mut minor_row = Vec::with_capacity(size - 1);
            for c in 0..size - 1 {
                let source = if c >= part { c + 1 } else { c };
                minor_row.push(cells[source].clone());
            }
            minor_rows.push(Expr::List(minor_row));
        }

        let product = Expr::Mul(vec![
            top[part].clone(),
            Expr::Determinant(Box::new(Expr::List(minor_rows))),
        ]);
        // signs alternate starting positive at part 0
        let term = if part % 2 != 0 {
            Expr::Neg(Box::new(product))
        } else {
            product
        };
        terms.push(term);
    }

    *expr = Expr::Add(terms);
    session.reduce(expr)?;
    Ok(true)
}

/// The conjugate transpose: `result[i][j] = conj(matrix[j][i])`, each entry reduced
/// individually.
pub fn adjoint(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Adjoint(matrix) = expr else {
        return Ok(false);
    };
    let Some(cols) = matrix.matrix_shape().width() else {
        return Ok(false);
    };
    let Expr::List(rows) = matrix.as_ref() else {
        return Ok(false);
    };

    let mut result = Vec::with_capacity(cols);
    for r in 0..cols {
        let mut row = Vec::with_capacity(rows.len());
        for source in rows {
            let Expr::List(cells) = source else {
                return Ok(false);
            };
            row.push(Expr::Conjugate(Box::new(cells[r].clone())));
        }
        result.push(Expr::List(row));
    }
    *expr = Expr::List(result);

    let Expr::List(rows) = expr else {
        return Ok(false);
    };
    for row in rows.iter_mut() {
        let Expr::List(cells) = row else {
            return Ok(false);
        };
        for cell in cells.iter_mut() {
            session.reduce(cell)?;
        }
    }
    Ok(true)
}

/// Multiplies adjacent compatible matrices within an n-ary product.
///
/// The chain is scanned left to right; whenever `cols(left) == rows(right)` for an adjacent
/// pair, the pair is replaced by its product and the scan resumes from the same position, since
/// the replacement may be compatible with the next factor. A chain that collapses to a single
/// factor replaces the product node entirely.
pub fn matrix_multiplication(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Mul(factors) = expr else {
        return Ok(false);
    };

    let mut updated = false;
    let mut index = 0;
    while index + 1 < factors.len() {
        let Some(cols_left) = factors[index].matrix_shape().width() else {
            index += 1;
            continue;
        };
        let Some(cols_right) = factors[index + 1].matrix_shape().width() else {
            index += 1;
            continue;
        };
        let Some(rows_right) = factors[index + 1].as_list().map(<[Expr]>::len) else {
            index += 1;
            continue;
        };
        if cols_left != rows_right {
            index += 1;
            continue;
        }
        updated = true;

        let product = {
            let (Some(left), Some(right)) = (factors[index].as_list(), factors[index + 1].as_list())
            else {
                return Ok(false);
            };
            let mut rows = Vec::with_capacity(left.len());
            for left_row in left {
                let Expr::List(left_cells) = left_row else {
                    return Ok(false);
                };
                let mut row = Vec::with_capacity(cols_right);
                for c in 0..cols_right {
                    let mut products = Vec::with_capacity(cols_left);
                    for (x, right_row) in right.iter().enumerate() {
                        let Expr::List(right_cells) = right_row else {
                            return Ok(false);
                        };
                        products.push(Expr::Mul(vec![
                            left_cells[x].clone(),
                            right_cells[c].clone(),
                        ]));
                    }
                    if cols_left == 1 {
                        row.push(products.swap_remove(0));
                    } else {
                        row.push(Expr::Add(products));
                    }
                }
                rows.push(Expr::List(row));
            }
            Expr::List(rows)
        };

        factors[index] = product;
        factors.remove(index + 1);

        let Expr::List(rows) = &mut factors[index] else {
            return Ok(false);
        };
        for row in rows.iter_mut() {
            let Expr::List(cells) = row else {
                return Ok(false);
            };
            for cell in cells.iter_mut() {
                session.reduce(cell)?;
            }
        }
        // stay at the same index: a new adjacency may have formed
    }

    if updated {
        if factors.len() == 1 {
            *expr = factors.swap_remove(0);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Unrolls a square matrix raised to a positive integer power into an explicit product chain.
///
/// Cost is linear in the exponent; exponents below 1 leave the node untouched.
pub fn matrix_exponentiation(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::Pow(base, exponent) = expr else {
        return Ok(false);
    };
    let Some(cols) = base.matrix_shape().width() else {
        return Ok(false);
    };
    let Some(rows) = base.as_list().map(<[Expr]>::len) else {
        return Ok(false);
    };
    if rows != cols {
        return Ok(false);
    }
    let Some(power) = exponent.as_integer().and_then(rug::Integer::to_usize) else {
        return Ok(false);
    };
    if power == 0 {
        return Ok(false);
    }

    if power == 1 {
        let matrix = std::mem::take(base.as_mut());
        *expr = matrix;
        return Ok(true);
    }

    let mut chain = Vec::with_capacity(power);
    for _ in 0..power {
        chain.push((**base).clone());
    }
    *expr = Expr::Mul(chain);
    session.reduce(expr)?;
    Ok(true)
}

/// The n-ary Kronecker product, folding the two leftmost factors into a block matrix until one
/// remains.
pub fn kronecker_product(expr: &mut Expr, session: &mut Session) -> Result<bool, Error> {
    let Expr::KroneckerProduct(factors) = expr else {
        return Ok(false);
    };
    if factors.len() < 2 {
        return Ok(false);
    }

    loop {
        let shape1 = factors[0].matrix_shape();
        if !shape1.is_list() {
            return Ok(false);
        }
        let shape2 = factors[1].matrix_shape();
        if !shape2.is_list() {
            return Ok(false);
        }
        let cols1 = shape1.width().unwrap_or(0);
        let cols2 = shape2.width().unwrap_or(0);

        let result = {
            let (Some(m1), Some(m2)) = (factors[0].as_list(), factors[1].as_list()) else {
                return Ok(false);
            };
            let mut rows = Vec::with_capacity(m1.len() * m2.len());
            for r1 in 0..m1.len() {
                for r2 in 0..m2.len() {
                    let mut row = Vec::with_capacity(cols1 * cols2);
                    for c1 in 0..cols1 {
                        let Expr::List(cells1) = &m1[r1] else {
                            return Ok(false);
                        };
                        for c2 in 0..cols2 {
                            let Expr::List(cells2) = &m2[r2] else {
                                return Ok(false);
                            };
                            row.push(Expr::Mul(vec![
                                cells1[c1].clone(),
                                cells2[c2].clone(),
                            ]));
                        }
                    }
                    rows.push(Expr::List(row));
                }
            }
            Expr::List(rows)
        };

        if factors.len() == 2 {
            *expr = result;
            session.reduce(expr)?;
            return Ok(true);
        }
        factors[0] = result;
        factors.remove(1);
    }
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

    fn matrix(rows: &[&[i64]]) -> Expr {
        Expr::List(
            rows.iter()
                .map(|row| Expr::List(row.iter().map(|&v| Expr::integer(v)).collect()))
                .collect(),
        )
    }

    #[test]
    fn transpose_of_a_rectangular_matrix() {
        let expr = Expr::Transpose(Box::new(matrix(&[&[1, 2, 3], &[4, 5, 6]])));
        assert_eq!(reduce(expr), matrix(&[&[1, 4], &[2, 5], &[3, 6]]));
    }

    #[test]
    fn transpose_declines_non_matrices() {
        let ragged = Expr::List(vec![
            Expr::List(vec![Expr::integer(1)]),
            Expr::integer(2),
        ]);
        let expr = Expr::Transpose(Box::new(ragged.clone()));
        assert_eq!(reduce(expr), Expr::Transpose(Box::new(ragged)));
    }

    #[test]
    fn determinant_base_cases() {
        let one = Expr::Determinant(Box::new(matrix(&[&[5]])));
        assert_eq!(reduce(one), Expr::integer(5));

        let two = Expr::Determinant(Box::new(matrix(&[&[1, 2], &[3, 4]])));
        assert_eq!(reduce(two), Expr::integer(-2));
    }

    #[test]
    fn determinant_by_cofactor_expansion() {
        let identity = Expr::Determinant(Box::new(matrix(&[
            &[1, 0, 0],
            &[0, 1, 0],
            &[0, 0, 1],
        ])));
        assert_eq!(reduce(identity), Expr::integer(1));

        let full = Expr::Determinant(Box::new(matrix(&[
            &[1, 2, 3],
            &[4, 5, 6],
            &[7, 8, 10],
        ])));
        assert_eq!(reduce(full), Expr::integer(-3));
    }

    #[test]
    fn determinant_requires_square() {
        let rect = matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        let expr = Expr::Determinant(Box::new(rect.clone()));
        assert_eq!(reduce(expr), Expr::Determinant(Box::new(rect)));
    }

    #[test]
    fn adjoint_of_a_real_matrix_is_its_transpose() {
        let expr = Expr::Adjoint(Box::new(matrix(&[&[1, 2], &[3, 4]])));
        assert_eq!(reduce(expr), matrix(&[&[1, 3], &[2, 4]]));
    }

    #[test]
    fn adjacent_compatible_matrices_multiply() {
        let a = matrix(&[&[1, 2], &[3, 4]]);
        let b = matrix(&[&[5, 6], &[7, 8]]);
        let expr = Expr::Mul(vec![a, b]);
        assert_eq!(reduce(expr), matrix(&[&[19, 22], &[43, 50]]));
    }

    #[test]
    fn incompatible_dimensions_are_left_alone() {
        let a = matrix(&[&[1, 2]]);
        let b = matrix(&[&[3, 4]]);
        let expr = Expr::Mul(vec![a.clone(), b.clone()]);
        assert_eq!(reduce(expr), Expr::Mul(vec![a, b]));
    }

    #[test]
    fn chain_reduction_rolls_back_after_a_product() {
        // (2x1) * (1x2) * (2x1): after the first product a new adjacency forms
        let a = matrix(&[&[1], &[2]]);
        let b = matrix(&[&[3, 4]]);
        let c = matrix(&[&[5], &[6]]);
        let expr = Expr::Mul(vec![a, b, c]);
        assert_eq!(reduce(expr), matrix(&[&[39], &[78]]));
    }

    #[test]
    fn exponentiation_unrolls_into_a_chain() {
        let expr = Expr::Pow(
            Box::new(matrix(&[&[1, 1], &[0, 1]])),
            Box::new(Expr::integer(3)),
        );
        assert_eq!(reduce(expr), matrix(&[&[1, 3], &[0, 1]]));
    }

    #[test]
    fn exponent_one_returns_the_matrix() {
        let expr = Expr::Pow(
            Box::new(matrix(&[&[1, 2], &[3, 4]])),
            Box::new(Expr::integer(1)),
        );
        assert_eq!(reduce(expr), matrix(&[&[1, 2], &[3, 4]]));
    }

    #[test]
    fn kronecker_product_of_two_matrices() {
        let expr = Expr::KroneckerProduct(vec![
            matrix(&[&[1, 2]]),
            matrix(&[&[3], &[4]]),
        ]);
        assert_eq!(reduce(expr), matrix(&[&[3, 6], &[4, 8]]));
    }

    #[test]
    fn kronecker_product_folds_n_ary_chains() {
        let expr = Expr::KroneckerProduct(vec![
            matrix(&[&[1, 2]]),
            matrix(&[&[10]]),
            matrix(&[&[3]]),
        ]);
        assert_eq!(reduce(expr), matrix(&[&[30, 60]]));
    }
}
