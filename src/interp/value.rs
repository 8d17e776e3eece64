//! Runtime values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{Error, Result, Span};

/// A numeric runtime value. Integers stay exact; any real operand promotes
/// the operation to real arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Integer(i) => i == 0,
            Number::Real(r) => r == 0.0,
        }
    }

    pub fn add(self, rhs: Number, span: Span) -> Result<Number> {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => {
                a.checked_add(b).map(Number::Integer).ok_or(Error::IntegerOverflow { span })
            }
            (a, b) => Ok(Number::Real(a.as_f64() + b.as_f64())),
        }
    }

    pub fn sub(self, rhs: Number, span: Span) -> Result<Number> {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => {
                a.checked_sub(b).map(Number::Integer).ok_or(Error::IntegerOverflow { span })
            }
            (a, b) => Ok(Number::Real(a.as_f64() - b.as_f64())),
        }
    }

    pub fn mul(self, rhs: Number, span: Span) -> Result<Number> {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => {
                a.checked_mul(b).map(Number::Integer).ok_or(Error::IntegerOverflow { span })
            }
            (a, b) => Ok(Number::Real(a.as_f64() * b.as_f64())),
        }
    }

    /// `DIV`: quotient truncated toward zero. Stays integer when both sides are.
    pub fn int_div(self, rhs: Number, span: Span) -> Result<Number> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero { span });
        }
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => {
                a.checked_div(b).map(Number::Integer).ok_or(Error::IntegerOverflow { span })
            }
            (a, b) => Ok(Number::Real((a.as_f64() / b.as_f64()).trunc())),
        }
    }

    /// `/`: always real
    pub fn real_div(self, rhs: Number, span: Span) -> Result<Number> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero { span });
        }
        Ok(Number::Real(self.as_f64() / rhs.as_f64()))
    }

    pub fn neg(self, span: Span) -> Result<Number> {
        match self {
            Number::Integer(i) => i.checked_neg().map(Number::Integer).ok_or(Error::IntegerOverflow { span }),
            Number::Real(r) => Ok(Number::Real(-r)),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{:.1}", r),
            Number::Real(r) => write!(f, "{}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::dummy()
    }

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        let a = Number::Integer(7);
        let b = Number::Integer(2);
        assert_eq!(a.add(b, span()).unwrap(), Number::Integer(9));
        assert_eq!(a.sub(b, span()).unwrap(), Number::Integer(5));
        assert_eq!(a.mul(b, span()).unwrap(), Number::Integer(14));
    }

    #[test]
    fn test_mixed_promotes_to_real() {
        let sum = Number::Integer(1).add(Number::Real(0.5), span()).unwrap();
        assert_eq!(sum, Number::Real(1.5));
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        assert_eq!(Number::Integer(7).int_div(Number::Integer(2), span()).unwrap(), Number::Integer(3));
        assert_eq!(Number::Integer(-7).int_div(Number::Integer(2), span()).unwrap(), Number::Integer(-3));
        assert_eq!(Number::Real(7.5).int_div(Number::Integer(2), span()).unwrap(), Number::Real(3.0));
        assert_eq!(Number::Real(-7.5).int_div(Number::Integer(2), span()).unwrap(), Number::Real(-3.0));
    }

    #[test]
    fn test_real_div() {
        assert_eq!(Number::Integer(7).real_div(Number::Integer(2), span()).unwrap(), Number::Real(3.5));
        assert_eq!(Number::Integer(8).real_div(Number::Integer(2), span()).unwrap(), Number::Real(4.0));
    }

    #[test]
    fn test_division_by_zero() {
        let err = Number::Integer(1).int_div(Number::Integer(0), span()).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { .. }));
        let err = Number::Real(1.0).real_div(Number::Real(0.0), span()).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { .. }));
    }

    #[test]
    fn test_overflow() {
        let err = Number::Integer(i64::MAX).add(Number::Integer(1), span()).unwrap_err();
        assert!(matches!(err, Error::IntegerOverflow { .. }));
        assert!(Number::Integer(i64::MIN).neg(span()).is_err());
        assert!(Number::Integer(i64::MIN).int_div(Number::Integer(-1), span()).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Integer(8).to_string(), "8");
        assert_eq!(Number::Real(4.0).to_string(), "4.0");
        assert_eq!(Number::Real(3.5).to_string(), "3.5");
    }
}
