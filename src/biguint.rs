//! Unsigned big integers.

use std::cmp::Ordering::{self, Equal, Greater};
use std::fmt;
use std::ops::{Add, Mul, Shl, Shr, Sub};

use byteorder::{BigEndian, ByteOrder};
use num_traits::{One, Zero};
use smallvec::SmallVec;

use crate::algorithms::{
    self, __add2, biguint_shl, biguint_shl1, biguint_shr, biguint_shr1, cmp_slice, mul3, sqr, sub2,
};
use crate::big_digit::{self, BigDigit};
use crate::error::{Error, Result};

pub(crate) const VEC_SIZE: usize = 4;

/// The digit storage. Values up to `VEC_SIZE` limbs stay off the heap.
pub(crate) type BigDigitVec = SmallVec<[BigDigit; VEC_SIZE]>;

/// An unsigned big integer.
///
/// The representation is a little-endian limb vector with no zero
/// most-significant limb; zero is the empty vector. The vector length is
/// the logical length of the value and its capacity is whatever past
/// growth left behind.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BigUint {
    pub(crate) data: BigDigitVec,
}

impl BigUint {
    /// Creates a value from little-endian digits; trailing zero limbs are
    /// stripped.
    pub fn new(digits: Vec<BigDigit>) -> BigUint {
        BigUint::new_norm(digits.into_iter().collect())
    }

    /// Creates a value from a little-endian digit slice.
    pub fn from_slice(slice: &[BigDigit]) -> BigUint {
        BigUint::new_norm(slice.iter().cloned().collect())
    }

    #[inline]
    pub(crate) fn new_norm(data: BigDigitVec) -> BigUint {
        BigUint { data }.normalized()
    }

    #[inline]
    pub(crate) fn normalized(mut self) -> BigUint {
        while let Some(&0) = self.data.last() {
            self.data.pop();
        }
        self
    }

    /// A normalized value has no zero most-significant limb. The public
    /// constructors enforce this; arithmetic entry points that index limbs
    /// directly re-check it rather than trust the caller.
    #[inline]
    pub(crate) fn is_normalized(&self) -> bool {
        self.data.last() != Some(&0)
    }

    /// Bit length of the value; zero has zero bits.
    #[inline]
    pub fn bits(&self) -> usize {
        match self.data.last() {
            Some(&w) => {
                self.data.len() * big_digit::BITS - w.leading_zeros() as usize
            }
            None => 0,
        }
    }

    /// Number of bytes in the minimal big-endian encoding.
    #[inline]
    pub fn byte_len(&self) -> usize {
        (self.bits() + 7) / 8
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        self.data.first().map_or(false, |&w| w & 1 == 1)
    }

    #[inline]
    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    /// Whether bit `n` (counting from the least significant bit) is set.
    #[inline]
    pub fn is_bit_set(&self, n: usize) -> bool {
        let digit = n / big_digit::BITS;
        match self.data.get(digit) {
            Some(&w) => (w >> (n % big_digit::BITS)) & 1 == 1,
            None => false,
        }
    }

    /// Ordered comparison against a single limb.
    pub fn cmp_word(&self, other: BigDigit) -> Ordering {
        match self.data.len() {
            0 => 0.cmp(&other),
            1 => self.data[0].cmp(&other),
            _ => Greater,
        }
    }

    #[inline]
    pub fn eq_word(&self, other: BigDigit) -> bool {
        self.cmp_word(other) == Equal
    }

    /// Truncating division with remainder.
    ///
    /// Fails with `DivByZero` on a zero divisor and `NotInitialized` if
    /// either operand carries a zero most-significant limb.
    pub fn div_rem(&self, divisor: &BigUint) -> Result<(BigUint, BigUint)> {
        if !self.is_normalized() || !divisor.is_normalized() {
            return Err(Error::NotInitialized);
        }
        if divisor.is_zero() {
            return Err(Error::DivByZero);
        }
        Ok(algorithms::div_rem(self, divisor))
    }

    /// `(self - other) mod m` for operands already reduced modulo `m`.
    pub fn mod_sub_quick(&self, other: &BigUint, m: &BigUint) -> BigUint {
        debug_assert!(self < m && other < m);
        if self >= other {
            self - other
        } else {
            &(self + m) - other
        }
    }

    /// Squaring; cheaper than `self * self`.
    pub fn sqr(&self) -> BigUint {
        sqr(&self.data)
    }

    /// Parses leading hex digits from `s`, stopping at the first character
    /// that is not a hex digit. Returns the value and the number of digits
    /// consumed, or `None` if `s` does not start with a hex digit.
    pub fn parse_hex(s: &str) -> Option<(BigUint, usize)> {
        let bytes = s.as_bytes();
        let mut digits = 0;
        while digits < bytes.len() && bytes[digits].is_ascii_hexdigit() {
            digits += 1;
        }
        if digits == 0 {
            return None;
        }

        let mut data = BigDigitVec::new();
        let mut pos = digits;
        while pos > 0 {
            let start = pos.saturating_sub(16);
            // The chunk was validated above, so this cannot fail.
            let w = BigDigit::from_str_radix(&s[start..pos], 16).ok()?;
            data.push(w);
            pos = start;
        }
        Some((BigUint::new_norm(data), digits))
    }

    /// Uppercase hex, no prefix, no leading zeros; zero is `"0"`.
    pub fn to_hex(&self) -> String {
        match self.data.split_last() {
            None => "0".to_string(),
            Some((&last, rest)) => {
                let mut s = format!("{:X}", last);
                for &w in rest.iter().rev() {
                    s.push_str(&format!("{:016X}", w));
                }
                s
            }
        }
    }

    /// Big-endian encoding padded to the full length of `out` with leading
    /// zeros. Fails with `BufferTooSmall` when the value does not fit; a
    /// zero-length buffer is accepted for the value zero.
    pub fn to_bytes_be_padded(&self, out: &mut [u8]) -> Result<()> {
        let byte_len = self.byte_len();
        if out.len() < byte_len {
            return Err(Error::BufferTooSmall);
        }
        let pad = out.len() - byte_len;
        for b in &mut out[..pad] {
            *b = 0;
        }

        let n = self.data.len();
        let mut pos = out.len();
        for (i, &w) in self.data.iter().enumerate() {
            if i + 1 < n {
                BigEndian::write_u64(&mut out[pos - big_digit::BYTES..pos], w);
                pos -= big_digit::BYTES;
            } else {
                let top_bytes = byte_len - (n - 1) * big_digit::BYTES;
                let mut buf = [0u8; big_digit::BYTES];
                BigEndian::write_u64(&mut buf, w);
                out[pos - top_bytes..pos].copy_from_slice(&buf[big_digit::BYTES - top_bytes..]);
            }
        }
        Ok(())
    }

    /// Minimal big-endian encoding; empty for zero.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut out = vec![0; self.byte_len()];
        // Cannot fail: the buffer is sized exactly.
        let _ = self.to_bytes_be_padded(&mut out);
        out
    }

    /// Interprets big-endian bytes; leading zeros are ignored.
    pub fn from_bytes_be(bytes: &[u8]) -> BigUint {
        let mut data = BigDigitVec::new();
        let mut pos = bytes.len();
        while pos >= big_digit::BYTES {
            data.push(BigEndian::read_u64(&bytes[pos - big_digit::BYTES..pos]));
            pos -= big_digit::BYTES;
        }
        if pos > 0 {
            let mut buf = [0u8; big_digit::BYTES];
            buf[big_digit::BYTES - pos..].copy_from_slice(&bytes[..pos]);
            data.push(BigEndian::read_u64(&buf));
        }
        BigUint::new_norm(data)
    }
}

impl From<BigDigit> for BigUint {
    fn from(w: BigDigit) -> BigUint {
        if w == 0 {
            BigUint::default()
        } else {
            let mut data = BigDigitVec::new();
            data.push(w);
            BigUint { data }
        }
    }
}

impl Zero for BigUint {
    #[inline]
    fn zero() -> BigUint {
        BigUint::default()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.data.is_empty()
    }
}

impl One for BigUint {
    #[inline]
    fn one() -> BigUint {
        BigUint::from(1)
    }
}

impl PartialOrd for BigUint {
    #[inline]
    fn partial_cmp(&self, other: &BigUint) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigUint {
    #[inline]
    fn cmp(&self, other: &BigUint) -> Ordering {
        cmp_slice(&self.data, &other.data)
    }
}

impl fmt::Debug for BigUint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl<'a, 'b> Add<&'b BigUint> for &'a BigUint {
    type Output = BigUint;

    fn add(self, other: &BigUint) -> BigUint {
        let mut data = self.data.clone();
        while data.len() < other.data.len() {
            data.push(0);
        }
        let carry = __add2(&mut data, &other.data);
        if carry != 0 {
            data.push(carry);
        }
        BigUint { data }
    }
}

impl<'a, 'b> Sub<&'b BigUint> for &'a BigUint {
    type Output = BigUint;

    fn sub(self, other: &BigUint) -> BigUint {
        let mut data = self.data.clone();
        while data.len() < other.data.len() {
            data.push(0);
        }
        sub2(&mut data, &other.data);
        BigUint::new_norm(data)
    }
}

impl<'a, 'b> Mul<&'b BigUint> for &'a BigUint {
    type Output = BigUint;

    fn mul(self, other: &BigUint) -> BigUint {
        mul3(&self.data, &other.data)
    }
}

impl<'a> Shl<usize> for &'a BigUint {
    type Output = BigUint;

    fn shl(self, n: usize) -> BigUint {
        if n == 1 {
            biguint_shl1(self)
        } else {
            biguint_shl(self, n)
        }
    }
}

impl<'a> Shr<usize> for &'a BigUint {
    type Output = BigUint;

    fn shr(self, n: usize) -> BigUint {
        if n == 1 {
            biguint_shr1(self)
        } else {
            biguint_shr(self, n)
        }
    }
}

forward_binop!(impl Add for BigUint, add);
forward_binop!(impl Sub for BigUint, sub);
forward_binop!(impl Mul for BigUint, mul);

impl Shl<usize> for BigUint {
    type Output = BigUint;

    #[inline]
    fn shl(self, n: usize) -> BigUint {
        (&self).shl(n)
    }
}

impl Shr<usize> for BigUint {
    type Output = BigUint;

    #[inline]
    fn shr(self, n: usize) -> BigUint {
        (&self).shr(n)
    }
}
