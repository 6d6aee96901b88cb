//! Expression trees for the list/matrix reduction engine.
//!
//! This crate defines the data the engine rewrites and nothing else: the [`Expr`] tree with one
//! variant per dispatchable tag, the [`Tag`] discriminants the rewrite table is keyed by, the
//! matrix-shape probe every matrix rule begins with, and the canonical [`Number`] layer backed by
//! [`rug`]. The rules themselves, and the session that drives them, live in `las-reduce`.
//!
//! # Ownership
//!
//! The tree is fully owned: every node has exactly one parent, `clone()` is a deep copy with no
//! shared structure, and replacing a subtree is an ordinary assignment through `&mut Expr`. This
//! is what makes the reduction engine's single-writer discipline checkable by the compiler
//! instead of by convention.

pub mod expr;
pub mod number;

pub use expr::{Expr, MatrixShape, Tag};
pub use number::Number;
