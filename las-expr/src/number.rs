//! The canonical numeric layer: exact big integers and arbitrary-precision floats.
//!
//! Reducers never work with machine integers directly; numeric payloads travel through the tree
//! as [`Number`]s, and only the few places that need a machine-sized value (repetition counts,
//! exponents) extract one, failing softly when the value does not fit.

use rug::{ops::Pow, Assign, Float, Integer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg};

/// The number of bits of precision used for floating-point values.
pub const PRECISION: u32 = 256;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// An exact integer or an arbitrary-precision float.
///
/// Mixed-type arithmetic promotes to [`Number::Float`]; integer/integer arithmetic stays exact.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Integer(Integer),
    Float(Float),
}

impl Number {
    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_zero(),
            Self::Float(n) => n.is_zero(),
        }
    }

    /// Returns true if the number is strictly negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => n.cmp0() == Ordering::Less,
            Self::Float(n) => n.is_sign_negative() && !n.is_zero(),
        }
    }

    /// If the number is an exact integer, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            Self::Float(_) => None,
        }
    }

    /// Raises the number to a non-negative integer power, if the exponent fits in a `u32`.
    pub fn checked_pow(&self, exponent: &Integer) -> Option<Number> {
        let exponent = exponent.to_u32()?;
        match self {
            Self::Integer(n) => Some(Self::Integer(n.clone().pow(exponent))),
            Self::Float(n) => Some(Self::Float(n.clone().pow(exponent))),
        }
    }
}

impl Add<&Number> for Number {
    type Output = Number;

    fn add(self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Self::Integer(lhs), Number::Integer(rhs)) => Self::Integer(lhs + rhs),
            (Self::Float(lhs), Number::Float(rhs)) => Self::Float(lhs + rhs),
            (Self::Integer(lhs), Number::Float(rhs)) => Self::Float(float(lhs) + rhs),
            (Self::Float(lhs), Number::Integer(rhs)) => Self::Float(lhs + rhs),
        }
    }
}

impl Mul<&Number> for Number {
    type Output = Number;

    fn mul(self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Self::Integer(lhs), Number::Integer(rhs)) => Self::Integer(lhs * rhs),
            (Self::Float(lhs), Number::Float(rhs)) => Self::Float(lhs * rhs),
            (Self::Integer(lhs), Number::Float(rhs)) => Self::Float(float(lhs) * rhs),
            (Self::Float(lhs), Number::Integer(rhs)) => Self::Float(lhs * rhs),
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Self::Integer(n) => Self::Integer(-n),
            Self::Float(n) => Self::Float(-n),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => lhs.partial_cmp(rhs),
            (Self::Float(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs),
            (Self::Integer(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs),
            (Self::Float(lhs), Self::Integer(rhs)) => lhs.partial_cmp(rhs),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n.to_f64()),
        }
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Float> for Number {
    fn from(n: Float) -> Self {
        Self::Float(n)
    }
}
