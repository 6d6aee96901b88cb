//! The hard domain errors reduction can raise.
//!
//! Most rule preconditions fail softly: the rule reports "no match" and the registry tries the
//! next candidate. The kinds in this module are different; they describe inputs that can never
//! become valid for the construct they appear in (a non-integer range bound, a negative cartesian
//! exponent, a power set of a non-list), so the rule marks the offending child and aborts the
//! whole reduction instead of declining.

use las_error::{Error, ErrorKind};
use las_expr::Expr;
use log::debug;

/// A range endpoint did not reduce to an exact integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedInteger;

impl ErrorKind for ExpectedInteger {
    fn message(&self) -> String {
        "Expression must be an integer number".to_string()
    }
}

/// A cartesian exponent reduced to a negative integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedNonNegativeInteger;

impl ErrorKind for ExpectedNonNegativeInteger {
    fn message(&self) -> String {
        "Expression must be a non-negative integer number".to_string()
    }
}

/// An operand that must be a list was not one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedList;

impl ErrorKind for ExpectedList {
    fn message(&self) -> String {
        "Expression must be a list".to_string()
    }
}

/// Marks the offending subexpression and builds the error that aborts the current reduction.
pub(crate) fn set_in_error(offender: &Expr, kind: impl ErrorKind + 'static) -> Error {
    debug!("reduction error at `{}`: {}", offender, kind.message());
    Error::new(offender.to_string(), kind)
}
