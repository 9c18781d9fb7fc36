//! Signed big integers.

use std::cmp::Ordering::{self, Equal, Greater, Less};
use std::fmt;
use std::ops::{Add, Mul, Neg, Shl, Shr, Sub};

use num_traits::{One, Zero};

use crate::biguint::BigUint;
use crate::error::Result;

use self::Sign::{Minus, NoSign, Plus};

/// The sign of a `BigInt`; `NoSign` is reserved for zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

impl Neg for Sign {
    type Output = Sign;

    #[inline]
    fn neg(self) -> Sign {
        match self {
            Minus => Plus,
            NoSign => NoSign,
            Plus => Minus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    #[inline]
    fn mul(self, other: Sign) -> Sign {
        match (self, other) {
            (NoSign, _) | (_, NoSign) => NoSign,
            (Plus, Plus) | (Minus, Minus) => Plus,
            (Plus, Minus) | (Minus, Plus) => Minus,
        }
    }
}

/// A signed big integer: a sign and a magnitude.
///
/// Zero is always `NoSign` with an empty magnitude, so there is no
/// negative zero and derived equality is value equality.
#[derive(Clone, PartialEq, Eq)]
pub struct BigInt {
    pub(crate) sign: Sign,
    pub(crate) data: BigUint,
}

/// Takes the magnitude out of a signed value.
#[inline]
pub(crate) fn into_magnitude(i: BigInt) -> BigUint {
    i.data
}

impl BigInt {
    /// Combines a sign and a magnitude, canonicalizing zero.
    pub fn from_biguint(mut sign: Sign, mut data: BigUint) -> BigInt {
        if sign == NoSign {
            data = BigUint::zero();
        } else if data.is_zero() {
            sign = NoSign;
        }
        BigInt { sign, data }
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn magnitude(&self) -> &BigUint {
        &self.data
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign == Minus
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        self.data.is_odd()
    }

    #[inline]
    pub fn bits(&self) -> usize {
        self.data.bits()
    }

    /// Whether bit `n` of the magnitude is set.
    #[inline]
    pub fn is_bit_set(&self, n: usize) -> bool {
        self.data.is_bit_set(n)
    }

    /// Whether the absolute value equals the given limb.
    #[inline]
    pub fn abs_eq_word(&self, w: u64) -> bool {
        self.data.eq_word(w)
    }

    /// Signed comparison against a machine integer.
    pub fn cmp_word(&self, other: i64) -> Ordering {
        let other_sign = match other.signum() {
            1 => Plus,
            -1 => Minus,
            _ => NoSign,
        };
        match self.sign.cmp(&other_sign) {
            Equal => {}
            ord => return ord,
        }
        let mag = self.data.cmp_word(other.wrapping_abs() as u64);
        if self.sign == Minus {
            mag.reverse()
        } else {
            mag
        }
    }

    /// Truncating division with remainder: `self = q * divisor + r`, `q`
    /// rounded toward zero. The quotient is negative when exactly one
    /// operand is, the remainder takes the dividend's sign; neither is ever
    /// negative zero.
    pub fn div_rem(&self, divisor: &BigInt) -> Result<(BigInt, BigInt)> {
        let (q, r) = self.data.div_rem(&divisor.data)?;
        Ok((
            BigInt::from_biguint(self.sign * divisor.sign, q),
            BigInt::from_biguint(self.sign, r),
        ))
    }

    /// `self mod |m|`, always in `[0, |m|)`.
    pub fn nnmod(&self, m: &BigInt) -> Result<BigUint> {
        let (_, r) = self.div_rem(m)?;
        if r.is_negative() {
            Ok(&m.data - &r.data)
        } else {
            Ok(into_magnitude(r))
        }
    }

    /// Doubling; keeps the sign.
    #[inline]
    pub fn lshift1(&self) -> BigInt {
        BigInt::from_biguint(self.sign, &self.data << 1)
    }

    /// Halving toward zero.
    #[inline]
    pub fn rshift1(&self) -> BigInt {
        BigInt::from_biguint(self.sign, &self.data >> 1)
    }

    /// Parses an optional `-` followed by hex digits, stopping at the first
    /// non-hex character. Returns the value and the number of hex digits
    /// consumed (the sign is not counted).
    pub fn parse_hex(s: &str) -> Option<(BigInt, usize)> {
        let (neg, digits) = match s.as_bytes().first() {
            Some(&b'-') => (true, &s[1..]),
            _ => (false, s),
        };
        let (mag, used) = BigUint::parse_hex(digits)?;
        let sign = if neg { Minus } else { Plus };
        Some((BigInt::from_biguint(sign, mag), used))
    }

    /// Uppercase hex with a leading `-` for negative values.
    pub fn to_hex(&self) -> String {
        match self.sign {
            Minus => format!("-{}", self.data.to_hex()),
            _ => self.data.to_hex(),
        }
    }
}

impl From<BigUint> for BigInt {
    #[inline]
    fn from(data: BigUint) -> BigInt {
        BigInt::from_biguint(Plus, data)
    }
}

impl From<i64> for BigInt {
    fn from(i: i64) -> BigInt {
        let sign = if i < 0 { Minus } else { Plus };
        BigInt::from_biguint(sign, BigUint::from(i.wrapping_abs() as u64))
    }
}

impl Zero for BigInt {
    #[inline]
    fn zero() -> BigInt {
        BigInt {
            sign: NoSign,
            data: BigUint::zero(),
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.sign == NoSign
    }
}

impl One for BigInt {
    #[inline]
    fn one() -> BigInt {
        BigInt::from_biguint(Plus, BigUint::one())
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(mut self) -> BigInt {
        self.sign = -self.sign;
        self
    }
}

impl<'a> Neg for &'a BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(self) -> BigInt {
        -self.clone()
    }
}

impl PartialOrd for BigInt {
    #[inline]
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &BigInt) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Equal => {}
            ord => return ord,
        }
        let mag = self.data.cmp(&other.data);
        if self.sign == Minus {
            mag.reverse()
        } else {
            mag
        }
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.sign {
            Minus => write!(f, "-0x{}", self.data.to_hex()),
            _ => write!(f, "0x{}", self.data.to_hex()),
        }
    }
}

impl<'a, 'b> Add<&'b BigInt> for &'a BigInt {
    type Output = BigInt;

    fn add(self, other: &BigInt) -> BigInt {
        match (self.sign, other.sign) {
            (_, NoSign) => self.clone(),
            (NoSign, _) => other.clone(),
            (s1, s2) if s1 == s2 => BigInt::from_biguint(s1, &self.data + &other.data),
            _ => match self.data.cmp(&other.data) {
                Equal => BigInt::zero(),
                Greater => BigInt::from_biguint(self.sign, &self.data - &other.data),
                Less => BigInt::from_biguint(other.sign, &other.data - &self.data),
            },
        }
    }
}

impl<'a, 'b> Sub<&'b BigInt> for &'a BigInt {
    type Output = BigInt;

    fn sub(self, other: &BigInt) -> BigInt {
        match (self.sign, other.sign) {
            (_, NoSign) => self.clone(),
            (NoSign, _) => -other.clone(),
            (s1, s2) if s1 != s2 => BigInt::from_biguint(s1, &self.data + &other.data),
            _ => match self.data.cmp(&other.data) {
                Equal => BigInt::zero(),
                Greater => BigInt::from_biguint(self.sign, &self.data - &other.data),
                Less => BigInt::from_biguint(-self.sign, &other.data - &self.data),
            },
        }
    }
}

impl<'a, 'b> Mul<&'b BigInt> for &'a BigInt {
    type Output = BigInt;

    fn mul(self, other: &BigInt) -> BigInt {
        BigInt::from_biguint(self.sign * other.sign, &self.data * &other.data)
    }
}

impl<'a> Shl<usize> for &'a BigInt {
    type Output = BigInt;

    fn shl(self, n: usize) -> BigInt {
        BigInt::from_biguint(self.sign, &self.data << n)
    }
}

impl<'a> Shr<usize> for &'a BigInt {
    type Output = BigInt;

    fn shr(self, n: usize) -> BigInt {
        BigInt::from_biguint(self.sign, &self.data >> n)
    }
}

forward_binop!(impl Add for BigInt, add);
forward_binop!(impl Sub for BigInt, sub);
forward_binop!(impl Mul for BigInt, mul);

impl Shl<usize> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shl(self, n: usize) -> BigInt {
        (&self).shl(n)
    }
}

impl Shr<usize> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shr(self, n: usize) -> BigInt {
        (&self).shr(n)
    }
}
