//! Montgomery arithmetic over a fixed odd modulus.

use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::algorithms::{adc, mac_with_carry};
use crate::big_digit::{self, BigDigit, DoubleBigDigit};
use crate::biguint::BigUint;
use crate::consttime;
use crate::error::{Error, Result};

/// Precomputed constants for reduction modulo a fixed odd modulus.
///
/// A reducer owns a copy of its modulus, so it is self-contained and can be
/// shared by reference from any number of threads; it is never mutated
/// after construction.
pub struct MontyReducer {
    /// The modulus; odd and at least 1.
    n: BigUint,
    /// `-n^-1 mod 2^64`.
    n0: BigDigit,
    /// `R^2 mod n`, where `R = 2^(64 * top(n))`.
    rr: BigUint,
}

// Calculate -num^-1 mod 2^64, for odd `num`, by Newton iteration:
// each step doubles the number of correct low bits, and the seed is
// already correct to three bits because num * num == 1 (mod 8).
//
// Reference:
// Brent & Zimmermann, Modern Computer Arithmetic, v0.5.9, Algorithm 2.3
fn negated_inv_mod_word(num: BigDigit) -> BigDigit {
    debug_assert!(num % 2 != 0);

    let mut inv = num;
    for _ in 0..5 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(num.wrapping_mul(inv)));
    }
    debug_assert_eq!(num.wrapping_mul(inv), 1);
    inv.wrapping_neg()
}

impl MontyReducer {
    /// Builds a reducer for the odd modulus `m >= 1`.
    pub fn new(m: &BigUint) -> Result<MontyReducer> {
        if m.is_zero() || !m.is_odd() {
            return Err(Error::CalledWithEvenModulus);
        }
        let n0 = negated_inv_mod_word(m.data[0]);

        // rr = 2^(2 * top * 64) mod m, by shift and reduce.
        let top = m.data.len();
        let r2 = BigUint::one() << (2 * top * big_digit::BITS);
        let (_, rr) = r2.div_rem(m)?;

        Ok(MontyReducer {
            n: m.clone(),
            n0,
            rr,
        })
    }

    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Limb count of the modulus; every Montgomery residue is carried in
    /// exactly this many limbs.
    #[inline]
    pub(crate) fn top(&self) -> usize {
        self.n.data.len()
    }

    /// Montgomery product `a * b * R^-1 mod n` of two reduced operands.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        debug_assert!(a < &self.n && b < &self.n);
        self.mul_unchecked(a, b)
    }

    /// Montgomery squaring.
    pub fn sqr(&self, a: &BigUint) -> BigUint {
        self.mul(a, a)
    }

    /// Maps `a < n` into the Montgomery domain: `a * R mod n`.
    pub fn to_mont(&self, a: &BigUint) -> BigUint {
        debug_assert!(a < &self.n);
        self.mul_unchecked(a, &self.rr)
    }

    /// Maps a Montgomery residue back to standard form: `a * R^-1 mod n`.
    pub fn from_mont(&self, a: &BigUint) -> BigUint {
        debug_assert!(a < &self.n);
        // The multiplier 1 may equal n when n is 1; the reduction bound
        // only needs b <= n, so this stays correct.
        self.mul_unchecked(a, &BigUint::one())
    }

    fn mul_unchecked(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let top = self.top();

        let mut ap = vec![0; top];
        ap[..a.data.len()].copy_from_slice(&a.data);
        let mut bp = vec![0; top];
        bp[..b.data.len()].copy_from_slice(&b.data);
        let mut out = vec![0; top];
        let mut t = vec![0; top + 2];

        self.cios(&mut t, &ap, &bp);
        self.reduce_select(&mut out, &t);
        let r = BigUint::from_slice(&out);

        t.zeroize();
        ap.zeroize();
        bp.zeroize();
        out.zeroize();
        r
    }

    /// Coarsely integrated operand scanning: the product and the reduction
    /// are interleaved so the low limb is retired on every pass and no real
    /// division ever happens. `a` and `b` are `top`-limb buffers holding
    /// reduced values; on return `t[0..=top]` holds `a * b * R^-1` before
    /// the final correction and `t[top + 1]` is zero.
    ///
    /// Reference:
    /// Koc, Acar, Kaliski, "Analyzing and Comparing Montgomery
    /// Multiplication Algorithms", method CIOS.
    pub(crate) fn cios(&self, t: &mut [BigDigit], a: &[BigDigit], b: &[BigDigit]) {
        let top = self.top();
        let n = &self.n.data;
        debug_assert!(a.len() == top && b.len() == top && t.len() == top + 2);

        for w in t.iter_mut() {
            *w = 0;
        }

        for i in 0..top {
            // t += a * b[i]
            let b_i = b[i];
            let mut carry: DoubleBigDigit = 0;
            for j in 0..top {
                t[j] = mac_with_carry(t[j], a[j], b_i, &mut carry);
            }
            let mut c2 = carry;
            t[top] = adc(t[top], 0, &mut c2);
            t[top + 1] = c2 as BigDigit;

            // t += m * n with m chosen so the low limb of the sum is zero,
            // then drop that limb.
            let m = t[0].wrapping_mul(self.n0);
            let mut carry: DoubleBigDigit = 0;
            let zero = mac_with_carry(t[0], m, n[0], &mut carry);
            debug_assert_eq!(zero, 0);
            for j in 1..top {
                t[j - 1] = mac_with_carry(t[j], m, n[j], &mut carry);
            }
            let mut c2 = carry;
            t[top - 1] = adc(t[top], 0, &mut c2);
            t[top] = t[top + 1] + c2 as BigDigit;
        }
        t[top + 1] = 0;
    }

    /// Final Montgomery correction. `t[0..=top]` holds a value below `2n`;
    /// the subtraction of `n` is always performed and the result chosen by
    /// a mask derived from the borrow, so the timing does not depend on
    /// whether the correction applied.
    pub(crate) fn reduce_select(&self, out: &mut [BigDigit], t: &[BigDigit]) {
        let top = self.top();
        let n = &self.n.data;
        debug_assert!(out.len() == top && t.len() == top + 2);
        debug_assert!(t[top] <= 1 && t[top + 1] == 0);

        let mut borrow: BigDigit = 0;
        for j in 0..top {
            let (d, b1) = t[j].overflowing_sub(n[j]);
            let (d, b2) = d.overflowing_sub(borrow);
            out[j] = d;
            borrow = (b1 | b2) as BigDigit;
        }

        // borrow == t[top] exactly when t >= n; then keep t - n.
        let mask = borrow.wrapping_sub(t[top]).wrapping_sub(1);
        for j in 0..top {
            out[j] = consttime::select(mask, out[j], t[j]);
        }
    }
}

#[test]
fn test_negated_inv_mod_word() {
    for w in (1..1000u64).step_by(2) {
        let n0 = negated_inv_mod_word(w);
        assert_eq!(w.wrapping_mul(n0.wrapping_neg()), 1, "bad n0 for {}", w);
    }
    assert_eq!(negated_inv_mod_word(1), big_digit::MAX);
}

#[test]
fn test_rejects_even_or_zero_modulus() {
    assert_eq!(
        MontyReducer::new(&BigUint::from(6)).err(),
        Some(Error::CalledWithEvenModulus)
    );
    assert_eq!(
        MontyReducer::new(&BigUint::zero()).err(),
        Some(Error::CalledWithEvenModulus)
    );
}

#[test]
fn test_rr_reduced() {
    let (m, _) = BigUint::parse_hex("C7FFFFFFFFFFFFFFFFFFFFFF1").unwrap();
    let r = MontyReducer::new(&m).unwrap();
    assert!(r.rr < m);
}

#[test]
fn test_round_trip() {
    let (m, _) = BigUint::parse_hex("F123456789ABCDEF0123456789ABCDEF1").unwrap();
    let r = MontyReducer::new(&m).unwrap();
    for a in &[0u64, 1, 2, 0xDEADBEEF] {
        let a = BigUint::from(*a);
        assert_eq!(r.from_mont(&r.to_mont(&a)), a);
    }
}

#[test]
fn test_mont_mul_vector() {
    let hex = |s: &str| BigUint::parse_hex(s).unwrap().0;
    let a = hex(
        "75F04D3D8234AAF3F7D8FE37B6D0C4F4BA775BB71CEADA14706E47EC5B6C3DE6374F94749796\
         31B3F33AD0AE9F9185ED91CD617931F23A43F7AEF3B57A5A4AF775C6250399BBF21965AFC5FF\
         FDBAE8F1DC1F6D83F0F59745EED9ECBC64F4C0A",
    );
    let b = hex(
        "4DA4203FD2383F3D5AA943F2A6274041ED448F4F66AF07485E561E1F02113BDBA23CAF984E7A\
         9A9C96E4DADE434BC67DEBB3A84637E7B44E0482BAC01C468C96A350E126482249F2B0C2A0B1\
         1B2F68BC30ADA9930AB2D4DE81B8A7A427E5954C",
    );
    let m = hex(
        "90E8420E085B9B1A5BDEF2DA9C5F1067AEA567A1D62B688ABD758A6503A8371B24875C9D86BA\
         FD710BB945C9302B8D895EC96A43930500F508791D12885D6F826A442EEBADC657CDDF1F0183\
         24483A2028A82E1096E2BF7A47A533E679723EBD",
    );
    let expected = hex(
        "61547BE04B7747E764EEDA24FDBCA53EFA1772410FCCC148A688FD5D808EB8AFCDFFFE85C917\
         BCC591AFC34866C3C079836D05EB29779DBA0415B08125CE77B635DB6E91C2E8E97B064281AE\
         2F63544ABBF2407948B09526AAF9EF89D73375A5",
    );

    let r = MontyReducer::new(&m).unwrap();
    let am = r.to_mont(&a);
    let bm = r.to_mont(&b);
    assert_eq!(r.from_mont(&r.mul(&am, &bm)), expected);
}

#[test]
fn test_modulus_one() {
    let r = MontyReducer::new(&BigUint::one()).unwrap();
    let z = BigUint::zero();
    assert_eq!(r.to_mont(&z), z);
    assert_eq!(r.from_mont(&z), z);
}
