//! Term rewriting for lists, matrices and tables.
//!
//! This crate is the reduction layer of a symbolic list-algebra engine: a table of rewrite rules
//! over the [`las_expr::Expr`] tree, and the small kernel they run on: ordered per-tag dispatch
//! with try-next-on-decline fallback ([`registry`]), an in-place fixpoint driver with scoped
//! variable bindings ([`session`], [`scope`]), and two-tier error handling (soft "rule does not
//! apply" declines versus hard domain errors, [`error`]).
//!
//! # Reducing an expression
//!
//! ```
//! use las_expr::Expr;
//! use las_reduce::Session;
//!
//! // det [[1, 2], [3, 4]]
//! let mut expr = Expr::Determinant(Box::new(Expr::List(vec![
//!     Expr::List(vec![Expr::integer(1), Expr::integer(2)]),
//!     Expr::List(vec![Expr::integer(3), Expr::integer(4)]),
//! ])));
//!
//! let mut session = Session::new();
//! session.reduce(&mut expr).unwrap();
//! assert_eq!(expr, Expr::integer(-2));
//! ```
//!
//! A node no rule rewrites is already in normal form; reducing it is a no-op, not an error.
//! Rules decline by returning `Ok(false)`, and the registry simply tries the next candidate
//! registered for the node's tag. Hard errors (a non-integer range bound, a negative cartesian
//! exponent, a power set of a non-list) abort the whole reduction and carry the offending
//! subexpression with them.

pub mod error;
pub mod registry;
pub mod rules;
pub mod scope;
pub mod session;

pub use las_error::{Error, ErrorKind};
pub use registry::{default_registry, Reducer, Registry, Rule};
pub use scope::ScopeFrame;
pub use session::Session;
