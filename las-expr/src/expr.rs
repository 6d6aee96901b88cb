//! A closed tree of the expressions the reduction engine rewrites.
//!
//! Every node the engine dispatches on is a variant of [`Expr`]; the rewrite table is keyed by
//! the field-less [`Tag`] mirror of this enum. Children are owned, so "splice a replacement into
//! the tree" is an assignment through `&mut Expr`, and [`Clone`] is a deep copy that never shares
//! structure with the original.
//!
//! The order of children is semantically significant for lists and matrices (row-major); the
//! results of the set-flavored operations (power set, cartesian product) are also stored as
//! ordered lists, with the ordering fixed by the producing rule rather than by any meaning
//! attached to it.

use crate::number::Number;
use rug::Integer;
use std::fmt;

/// An expression tree node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A numeric literal.
    Num(Number),

    /// A named reference, resolved against the enclosing scopes during reduction.
    Symbol(String),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// The negation of an expression.
    Neg(Box<Expr>),

    /// An expression raised to a power.
    Pow(Box<Expr>, Box<Expr>),

    /// The complex conjugate of an expression.
    Conjugate(Box<Expr>),

    /// A pending comparison of two expressions.
    Compare(Box<Expr>, Box<Expr>),

    /// Comparison outcome: the left operand was smaller.
    Less,

    /// Comparison outcome: the left operand was greater.
    Greater,

    /// Comparison outcome: the operands were equal.
    Equals,

    /// An ordered collection of expressions.
    List(Vec<Expr>),

    /// A wrapper around a matrix-shaped list; canonically one child, with the first row of the
    /// wrapped matrix acting as the header.
    Table(Vec<Expr>),

    /// An inclusive integer range, to be expanded into a list.
    FromRange(Box<Expr>, Box<Expr>),

    /// A list comprehension specification (2–5 children, see the creation rules).
    CreateList(Vec<Expr>),

    /// A table comprehension specification.
    CreateTable(Vec<Expr>),

    /// A two-axis table comprehension specification.
    CreateCrossedTable(Vec<Expr>),

    /// The n-ary cartesian product of lists.
    CartesianProduct(Vec<Expr>),

    /// A list raised to a cartesian power.
    CartesianPower(Box<Expr>, Box<Expr>),

    /// The power set of a list.
    PowerSet(Box<Expr>),

    /// The transpose of a matrix.
    Transpose(Box<Expr>),

    /// The determinant of a square matrix.
    Determinant(Box<Expr>),

    /// The conjugate transpose of a matrix.
    Adjoint(Box<Expr>),

    /// The n-ary Kronecker product of matrices.
    KroneckerProduct(Vec<Expr>),

    /// The dot product of two equal-length lists.
    DotProduct(Box<Expr>, Box<Expr>),

    /// The outer product of two lists.
    OuterProduct(Box<Expr>, Box<Expr>),

    /// A floor-semantics lookup of a key in a table with an ascending first column.
    RangeLookup(Box<Expr>, Box<Expr>),

    /// An exact lookup of a key in a table's first column.
    ExactLookup(Box<Expr>, Box<Expr>),

    /// A sort of a list, with an optional comparator lambda as second child.
    Sort(Vec<Expr>),

    /// An anonymous function: a parameter specification and a body.
    Lambda(Box<Expr>, Box<Expr>),

    /// The application of a lambda to a list of arguments.
    Apply(Box<Expr>, Box<Expr>),
}

/// The discriminant of an [`Expr`] variant, used to key the rewrite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Num,
    Symbol,
    Add,
    Mul,
    Neg,
    Pow,
    Conjugate,
    Compare,
    Less,
    Greater,
    Equals,
    List,
    Table,
    FromRange,
    CreateList,
    CreateTable,
    CreateCrossedTable,
    CartesianProduct,
    CartesianPower,
    PowerSet,
    Transpose,
    Determinant,
    Adjoint,
    KroneckerProduct,
    DotProduct,
    OuterProduct,
    RangeLookup,
    ExactLookup,
    Sort,
    Lambda,
    Apply,
}

/// The result of probing an expression for matrix shape.
///
/// This replaces the pair of sentinel integers the shape probe traditionally returns: `NotAList`
/// for non-list nodes, `NotAMatrix` for lists that are empty, ragged, or contain non-list rows,
/// and `Width(w)` (`w >= 1`) when every row is a list of the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixShape {
    /// The node is not a list at all.
    NotAList,

    /// The node is a list, but not matrix-shaped.
    NotAMatrix,

    /// The node is a matrix with rows of this common length.
    Width(usize),
}

impl MatrixShape {
    /// The common row length, if the node is matrix-shaped.
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Width(w) => Some(w),
            _ => None,
        }
    }

    /// Returns true if the node is a list (matrix-shaped or not).
    pub fn is_list(self) -> bool {
        !matches!(self, Self::NotAList)
    }
}

impl Expr {
    /// Creates a numeric literal holding the given exact integer.
    pub fn integer<T>(n: T) -> Expr
    where
        Integer: From<T>,
    {
        Expr::Num(Number::Integer(Integer::from(n)))
    }

    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Symbol(name.into())
    }

    /// Returns the discriminant of this expression.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Num(_) => Tag::Num,
            Self::Symbol(_) => Tag::Symbol,
            Self::Add(_) => Tag::Add,
            Self::Mul(_) => Tag::Mul,
            Self::Neg(_) => Tag::Neg,
            Self::Pow(..) => Tag::Pow,
            Self::Conjugate(_) => Tag::Conjugate,
            Self::Compare(..) => Tag::Compare,
            Self::Less => Tag::Less,
            Self::Greater => Tag::Greater,
            Self::Equals => Tag::Equals,
            Self::List(_) => Tag::List,
            Self::Table(_) => Tag::Table,
            Self::FromRange(..) => Tag::FromRange,
            Self::CreateList(_) => Tag::CreateList,
            Self::CreateTable(_) => Tag::CreateTable,
            Self::CreateCrossedTable(_) => Tag::CreateCrossedTable,
            Self::CartesianProduct(_) => Tag::CartesianProduct,
            Self::CartesianPower(..) => Tag::CartesianPower,
            Self::PowerSet(_) => Tag::PowerSet,
            Self::Transpose(_) => Tag::Transpose,
            Self::Determinant(_) => Tag::Determinant,
            Self::Adjoint(_) => Tag::Adjoint,
            Self::KroneckerProduct(_) => Tag::KroneckerProduct,
            Self::DotProduct(..) => Tag::DotProduct,
            Self::OuterProduct(..) => Tag::OuterProduct,
            Self::RangeLookup(..) => Tag::RangeLookup,
            Self::ExactLookup(..) => Tag::ExactLookup,
            Self::Sort(_) => Tag::Sort,
            Self::Lambda(..) => Tag::Lambda,
            Self::Apply(..) => Tag::Apply,
        }
    }

    /// Mutable references to the direct children of this node, in order.
    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Self::Num(_) | Self::Symbol(_) | Self::Less | Self::Greater | Self::Equals => {
                Vec::new()
            },
            Self::Add(children)
            | Self::Mul(children)
            | Self::List(children)
            | Self::Table(children)
            | Self::CreateList(children)
            | Self::CreateTable(children)
            | Self::CreateCrossedTable(children)
            | Self::CartesianProduct(children)
            | Self::KroneckerProduct(children)
            | Self::Sort(children) => children.iter_mut().collect(),
            Self::Neg(child)
            | Self::Conjugate(child)
            | Self::PowerSet(child)
            | Self::Transpose(child)
            | Self::Determinant(child)
            | Self::Adjoint(child) => vec![child.as_mut()],
            Self::Pow(lhs, rhs)
            | Self::Compare(lhs, rhs)
            | Self::FromRange(lhs, rhs)
            | Self::CartesianPower(lhs, rhs)
            | Self::DotProduct(lhs, rhs)
            | Self::OuterProduct(lhs, rhs)
            | Self::RangeLookup(lhs, rhs)
            | Self::ExactLookup(lhs, rhs)
            | Self::Lambda(lhs, rhs)
            | Self::Apply(lhs, rhs) => vec![lhs.as_mut(), rhs.as_mut()],
        }
    }

    /// If the expression is a numeric literal, returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Num(n) => Some(n),
            _ => None,
        }
    }

    /// If the expression is an exact integer literal, returns a reference to the contained
    /// integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Num(Number::Integer(n)) => Some(n),
            _ => None,
        }
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if the expression is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// If the expression is a list, returns its elements.
    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Probes the expression for matrix shape.
    ///
    /// Never cached: children may have changed shape since the last probe, so callers always ask
    /// again.
    pub fn matrix_shape(&self) -> MatrixShape {
        let Self::List(rows) = self else {
            return MatrixShape::NotAList;
        };
        let Some(first) = rows.first() else {
            return MatrixShape::NotAMatrix;
        };
        let Some(width) = first.as_list().map(<[Expr]>::len) else {
            return MatrixShape::NotAMatrix;
        };
        if width == 0 {
            return MatrixShape::NotAMatrix;
        }
        for row in &rows[1..] {
            if row.as_list().map(<[Expr]>::len) != Some(width) {
                return MatrixShape::NotAMatrix;
            }
        }
        MatrixShape::Width(width)
    }
}

/// The placeholder value used when a child is temporarily moved out of its parent.
impl Default for Expr {
    fn default() -> Self {
        Expr::Num(Number::Integer(Integer::new()))
    }
}

/// Returns true if the expression prints as a single unit and never needs parentheses.
fn is_atom(expr: &Expr) -> bool {
    !matches!(
        expr,
        Expr::Add(_) | Expr::Mul(_) | Expr::Neg(_) | Expr::Pow(..),
    )
}

/// Writes a comma-separated child sequence inside the given delimiters.
fn write_seq(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    children: &[Expr],
    open: char,
    close: char,
) -> fmt::Result {
    write!(f, "{}{}", name, open)?;
    let mut iter = children.iter();
    if let Some(child) = iter.next() {
        write!(f, "{}", child)?;
        for child in iter {
            write!(f, ", {}", child)?;
        }
    }
    write!(f, "{}", close)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    if matches!(factor, Expr::Add(_)) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    for factor in iter {
                        if matches!(factor, Expr::Add(_)) {
                            write!(f, " * ({})", factor)?;
                        } else {
                            write!(f, " * {}", factor)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Neg(inner) => {
                if is_atom(inner) {
                    write!(f, "-{}", inner)
                } else {
                    write!(f, "-({})", inner)
                }
            },
            Self::Pow(base, exponent) => {
                if is_atom(base) {
                    write!(f, "{}^", base)?;
                } else {
                    write!(f, "({})^", base)?;
                }
                if is_atom(exponent) {
                    write!(f, "{}", exponent)
                } else {
                    write!(f, "({})", exponent)
                }
            },
            Self::Conjugate(inner) => write!(f, "Conjugate({})", inner),
            Self::Compare(lhs, rhs) => write!(f, "Compare({}, {})", lhs, rhs),
            Self::Less => write!(f, "Less"),
            Self::Greater => write!(f, "Greater"),
            Self::Equals => write!(f, "Equals"),
            Self::List(items) => write_seq(f, "", items, '{', '}'),
            Self::Table(children) => write_seq(f, "Table", children, '(', ')'),
            Self::FromRange(lhs, rhs) => write!(f, "FromRange({}, {})", lhs, rhs),
            Self::CreateList(children) => write_seq(f, "CreateList", children, '(', ')'),
            Self::CreateTable(children) => write_seq(f, "CreateTable", children, '(', ')'),
            Self::CreateCrossedTable(children) => {
                write_seq(f, "CreateCrossedTable", children, '(', ')')
            },
            Self::CartesianProduct(children) => {
                write_seq(f, "CartesianProduct", children, '(', ')')
            },
            Self::CartesianPower(lhs, rhs) => write!(f, "CartesianPower({}, {})", lhs, rhs),
            Self::PowerSet(inner) => write!(f, "PowerSet({})", inner),
            Self::Transpose(inner) => write!(f, "Transpose({})", inner),
            Self::Determinant(inner) => write!(f, "Determinant({})", inner),
            Self::Adjoint(inner) => write!(f, "Adjoint({})", inner),
            Self::KroneckerProduct(children) => {
                write_seq(f, "KroneckerProduct", children, '(', ')')
            },
            Self::DotProduct(lhs, rhs) => write!(f, "DotProduct({}, {})", lhs, rhs),
            Self::OuterProduct(lhs, rhs) => write!(f, "OuterProduct({}, {})", lhs, rhs),
            Self::RangeLookup(lhs, rhs) => write!(f, "RangeLookup({}, {})", lhs, rhs),
            Self::ExactLookup(lhs, rhs) => write!(f, "ExactLookup({}, {})", lhs, rhs),
            Self::Sort(children) => write_seq(f, "Sort", children, '(', ')'),
            Self::Lambda(params, body) => write!(f, "Lambda({}, {})", params, body),
            Self::Apply(lambda, args) => write!(f, "Apply({}, {})", lambda, args),
        }
    }
}
