//! Implementation of the rewrite rules.
//!
//! Each rule is a function that takes the node to rewrite and the driving session, performs its
//! surgery in place if it applies, and reports `Ok(true)` (applied), `Ok(false)` (does not
//! apply; the registry tries the next candidate for the tag), or a hard error.
//!
//! [`register_all`] fixes the dispatch order. The first block is the supporting layer the list
//! rules lean on (numeric folding, the comparison relation, symbol resolution and lambda
//! application); the second block is the list/matrix/table rules proper.

pub mod arithmetic;
pub mod create;
pub mod lambda;
pub mod lists;
pub mod lookup;
pub mod matrix;
pub mod relation;
pub mod sets;
pub mod sort;

use crate::registry::Registry;
use las_expr::Tag;

/// Registers every rule of this crate into the given registry, in dispatch order.
pub fn register_all(registry: &mut Registry) {
    registry.add_reducer(Tag::Add, arithmetic::add_zero, "arithmetic.addZero");
    registry.add_reducer(
        Tag::Add,
        arithmetic::combine_numeric_terms,
        "arithmetic.combineNumericTerms",
    );
    registry.add_reducer(Tag::Mul, arithmetic::multiply_zero, "arithmetic.multiplyZero");
    registry.add_reducer(Tag::Mul, arithmetic::multiply_one, "arithmetic.multiplyOne");
    registry.add_reducer(
        Tag::Mul,
        arithmetic::combine_numeric_factors,
        "arithmetic.combineNumericFactors",
    );
    registry.add_reducer(Tag::Neg, arithmetic::negate_number, "arithmetic.negateNumber");
    registry.add_reducer(Tag::Pow, arithmetic::numeric_power, "arithmetic.numericPower");
    registry.add_reducer(Tag::Compare, relation::compare_numbers, "relation.compareNumbers");
    registry.add_reducer(Tag::Conjugate, relation::conjugate_number, "relation.conjugateNumber");
    registry.add_reducer(Tag::Symbol, lambda::resolve_symbol, "symbolic.resolveSymbol");
    registry.add_special_reducer(Tag::Apply, lambda::apply_lambda, "symbolic.applyLambda");

    registry.add_reducer(Tag::Table, create::table, "list.table");
    registry.add_reducer(Tag::FromRange, create::from_range, "list.fromRange");
    registry.add_special_reducer(Tag::CreateList, create::create_list, "list.createList");
    registry.add_special_reducer(Tag::CreateList, create::create_list_list, "list.createListList");
    registry.add_special_reducer(Tag::CreateTable, create::create_list, "list.createList");
    registry.add_special_reducer(Tag::CreateTable, create::create_list_list, "list.createListList");
    registry.add_special_reducer(
        Tag::CreateCrossedTable,
        create::create_crossed_table,
        "list.createCrossedTable",
    );
    registry.add_reducer(Tag::Neg, lists::negative_list, "list.negativeList");
    registry.add_reducer(Tag::Add, lists::addition_lists, "list.additionLists");
    registry.add_reducer(
        Tag::Mul,
        lists::multiplication_scalar_list,
        "list.multiplicationScalarList",
    );
    registry.add_reducer(Tag::Mul, matrix::matrix_multiplication, "list.matrixMultiplication");
    registry.add_reducer(Tag::Pow, matrix::matrix_exponentiation, "list.matrixExponentiation");
    registry.add_reducer(Tag::Transpose, matrix::transpose, "list.matrixTranspose");
    registry.add_reducer(Tag::Determinant, matrix::determinant, "list.matrixDeterminant");
    registry.add_reducer(Tag::RangeLookup, lookup::range_lookup, "list.rangeLookup");
    registry.add_reducer(Tag::ExactLookup, lookup::exact_lookup, "list.exactLookup");
    registry.add_reducer(Tag::CartesianProduct, sets::cartesian_product, "list.cartesianProduct");
    registry.add_reducer(
        Tag::CartesianPower,
        sets::cartesian_exponentiation,
        "list.cartesianExponentiation",
    );
    registry.add_reducer(Tag::KroneckerProduct, matrix::kronecker_product, "list.kroneckerProduct");
    registry.add_reducer(Tag::DotProduct, lists::dot_product, "list.dotProduct");
    registry.add_reducer(Tag::OuterProduct, lists::outer_product, "list.outerProduct");
    registry.add_reducer(Tag::PowerSet, sets::power_set, "list.powerSet");
    registry.add_reducer(Tag::Adjoint, matrix::adjoint, "list.adjoint");
    registry.add_reducer(Tag::Sort, sort::sort, "list.sort");
}
