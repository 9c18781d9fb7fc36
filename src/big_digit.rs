//! The machine word underlying the big integer types.

/// A `BigDigit` is one limb of a big integer, stored little-endian within
/// the digit vector.
pub type BigDigit = u64;

/// A `DoubleBigDigit` holds the full result of a `BigDigit` multiplication.
pub type DoubleBigDigit = u128;

/// Signed double-width digit, for borrow propagation.
pub type SignedDoubleBigDigit = i128;

pub const BITS: usize = 64;
pub const BYTES: usize = BITS / 8;
pub const MAX: BigDigit = !0;

const LO_MASK: DoubleBigDigit = (1 << BITS) - 1;

#[inline]
fn get_hi(n: DoubleBigDigit) -> BigDigit {
    (n >> BITS) as BigDigit
}

#[inline]
fn get_lo(n: DoubleBigDigit) -> BigDigit {
    (n & LO_MASK) as BigDigit
}

/// Join two `BigDigit`s into one `DoubleBigDigit`.
#[inline]
pub fn to_doublebigdigit(hi: BigDigit, lo: BigDigit) -> DoubleBigDigit {
    (DoubleBigDigit::from(hi) << BITS) | DoubleBigDigit::from(lo)
}

/// Split one `DoubleBigDigit` into two `BigDigit`s.
#[inline]
pub fn from_doublebigdigit(n: DoubleBigDigit) -> (BigDigit, BigDigit) {
    (get_hi(n), get_lo(n))
}
