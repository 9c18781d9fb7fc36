//! Randomization of big integers

use num_integer::Integer;
use num_traits::Zero;
use rand::prelude::*;

use crate::big_digit::{self, BigDigit};
use crate::bigint::BigInt;
use crate::bigint::Sign::*;
use crate::biguint::BigUint;

pub trait RandBigInt {
    /// A uniform `BigUint` of at most `bit_size` bits.
    fn gen_biguint(&mut self, bit_size: usize) -> BigUint;

    /// A `BigInt` whose magnitude has at most `bit_size` bits, with a
    /// uniform sign.
    fn gen_bigint(&mut self, bit_size: usize) -> BigInt;

    /// A uniform `BigUint` in `[0, bound)`. Panics on a zero bound.
    fn gen_biguint_below(&mut self, bound: &BigUint) -> BigUint;

    /// A uniform `BigUint` in `[lbound, ubound)`. Panics when the range
    /// is empty.
    fn gen_biguint_range(&mut self, lbound: &BigUint, ubound: &BigUint) -> BigUint;
}

fn gen_bits<R: Rng + ?Sized>(rng: &mut R, data: &mut [BigDigit], rem: usize) {
    // `fill` is faster than many `gen::<u64>` calls
    rng.fill(data);
    if rem > 0 {
        let last = data.len() - 1;
        data[last] >>= big_digit::BITS - rem;
    }
}

impl<R: Rng + ?Sized> RandBigInt for R {
    fn gen_biguint(&mut self, bit_size: usize) -> BigUint {
        let (digits, rem) = bit_size.div_rem(&big_digit::BITS);
        let mut data = vec![0; digits + (rem > 0) as usize];
        gen_bits(self, &mut data, rem);
        BigUint::new(data)
    }

    fn gen_bigint(&mut self, bit_size: usize) -> BigInt {
        // Magnitude and sign are drawn independently. Both sign draws
        // collapse onto the same value when the magnitude is zero, so one
        // of them retries; without that, zero would come up twice as often
        // as any other value.
        loop {
            let mag = self.gen_biguint(bit_size);
            let negative = self.gen();
            if mag.is_zero() {
                if negative {
                    continue;
                }
                return BigInt::from_biguint(NoSign, mag);
            }
            let sign = if negative { Minus } else { Plus };
            return BigInt::from_biguint(sign, mag);
        }
    }

    fn gen_biguint_below(&mut self, bound: &BigUint) -> BigUint {
        assert!(!bound.is_zero(), "bound must be nonzero");
        // Rejection sampling at the bound's own bit length; every draw
        // lands in range with probability above one half.
        let bits = bound.bits();
        loop {
            let candidate = self.gen_biguint(bits);
            if candidate < *bound {
                return candidate;
            }
        }
    }

    fn gen_biguint_range(&mut self, lbound: &BigUint, ubound: &BigUint) -> BigUint {
        assert!(lbound < ubound, "empty range");
        let width = ubound - lbound;
        lbound + self.gen_biguint_below(&width)
    }
}

#[test]
fn test_bit_size_bound() {
    let mut rng = StdRng::from_seed([1u8; 32]);
    for bits in &[0usize, 1, 63, 64, 65, 1000] {
        for _ in 0..8 {
            assert!(rng.gen_biguint(*bits).bits() <= *bits);
        }
    }
}

#[test]
fn test_below_and_range() {
    let mut rng = StdRng::from_seed([2u8; 32]);
    let (lo, _) = BigUint::parse_hex("100").unwrap();
    let (hi, _) = BigUint::parse_hex("DEADBEEF00").unwrap();
    for _ in 0..32 {
        let b = rng.gen_biguint_below(&hi);
        assert!(b < hi);
        let r = rng.gen_biguint_range(&lo, &hi);
        assert!(lo <= r && r < hi);
    }
}
