//! RSA private key construction and consistency checking.

use num_traits::One;

use crate::biguint::BigUint;
use crate::error::{Error, Result};
use crate::monty::MontyReducer;

const MIN_MODULUS_BITS: usize = 2048;
const MAX_MODULUS_BITS: usize = 4096;

// Public exponents are required to be small; 33 bits admits the common
// F4 = 65537 and everything below 2^33.
const MAX_EXPONENT_BITS: usize = 33;

/// Borrowed RSA key material in CRT form, as parsed from an encoded key.
pub struct RsaKeyParams<'a> {
    pub n: &'a BigUint,
    pub e: &'a BigUint,
    pub p: &'a BigUint,
    pub q: &'a BigUint,
    pub dmp1: &'a BigUint,
    pub dmq1: &'a BigUint,
    pub iqmp: &'a BigUint,
}

/// A validated RSA private key in CRT form.
///
/// Every Montgomery reducer owns its copy of the corresponding modulus, so
/// the key has no internal aliasing and can be shared by reference across
/// threads.
pub struct RsaKey {
    mont_n: MontyReducer,
    mont_p: MontyReducer,
    mont_q: MontyReducer,
    e: BigUint,
    dmp1: BigUint,
    dmq1: BigUint,
    iqmp: BigUint,
    /// `iqmp` in Montgomery form with respect to `p`.
    iqmp_mont: BigUint,
    /// `q` in Montgomery form with respect to `n`, for the final CRT
    /// recombination `m = m2 + (iqmp * (m1 - m2) mod p) * q`.
    qmn_mont: BigUint,
}

fn check_modulus_and_exponent(n: &BigUint, e: &BigUint) -> Result<()> {
    let n_bits = n.bits();
    if n_bits < MIN_MODULUS_BITS || n_bits > MAX_MODULUS_BITS {
        return Err(Error::BadRsaParameters);
    }
    if !e.is_odd() || e.cmp_word(3) == std::cmp::Ordering::Less || e.bits() > MAX_EXPONENT_BITS {
        return Err(Error::BadRsaParameters);
    }
    Ok(())
}

impl RsaKey {
    /// Validates the key material against the transient witness `d` and
    /// builds the contexts the signing path needs. `d` is used only to
    /// cross-check `dmp1` and `dmq1` and is not retained.
    ///
    /// The checks, in order: the modulus size and exponent policy, `p`
    /// and `q` odd with `p > q`, `n == p * q`, `dmp1 == d mod (p-1)` and
    /// `dmq1 == d mod (q-1)`, and `iqmp < p` with `iqmp * q == 1 (mod p)`.
    pub fn new(params: &RsaKeyParams, d: &BigUint) -> Result<RsaKey> {
        check_modulus_and_exponent(params.n, params.e)?;

        if !params.p.is_odd() || !params.q.is_odd() {
            return Err(Error::BadRsaParameters);
        }

        // p == q is never acceptable; p < q would make the CRT
        // recombination below come out negative.
        if params.p <= params.q {
            return Err(Error::BadRsaParameters);
        }

        if &(params.p * params.q) != params.n {
            return Err(Error::NNotEqualPQ);
        }

        // In a valid key, d*e == 1 (mod lcm(p-1, q-1)). Checking that
        // directly needs an lcm; instead p and q are held consistent with
        // n above and with d here, and d is never used for an actual
        // private operation.
        let one = BigUint::one();
        let pm1 = params.p - &one;
        let qm1 = params.q - &one;
        if &d.div_rem(&pm1)?.1 != params.dmp1 || &d.div_rem(&qm1)?.1 != params.dmq1 {
            return Err(Error::CrtValuesIncorrect);
        }

        if params.iqmp >= params.p {
            return Err(Error::CrtValuesIncorrect);
        }

        let mont_n = MontyReducer::new(params.n)?;
        let mont_p = MontyReducer::new(params.p)?;
        let mont_q = MontyReducer::new(params.q)?;

        // iqmp * q == 1 (mod p); q < p by the ordering check, so both
        // operands are reduced. The Montgomery product leaves a stray
        // R^-1, which the to_mont undoes.
        let t = mont_p.mul(params.iqmp, params.q);
        if !mont_p.to_mont(&t).is_one() {
            return Err(Error::CrtValuesIncorrect);
        }

        let iqmp_mont = mont_p.to_mont(params.iqmp);
        let qmn_mont = mont_n.to_mont(params.q);

        Ok(RsaKey {
            mont_n,
            mont_p,
            mont_q,
            e: params.e.clone(),
            dmp1: params.dmp1.clone(),
            dmq1: params.dmq1.clone(),
            iqmp: params.iqmp.clone(),
            iqmp_mont,
            qmn_mont,
        })
    }

    #[inline]
    pub fn mont_n(&self) -> &MontyReducer {
        &self.mont_n
    }

    #[inline]
    pub fn mont_p(&self) -> &MontyReducer {
        &self.mont_p
    }

    #[inline]
    pub fn mont_q(&self) -> &MontyReducer {
        &self.mont_q
    }

    #[inline]
    pub fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    #[inline]
    pub fn dmp1(&self) -> &BigUint {
        &self.dmp1
    }

    #[inline]
    pub fn dmq1(&self) -> &BigUint {
        &self.dmq1
    }

    #[inline]
    pub fn iqmp(&self) -> &BigUint {
        &self.iqmp
    }

    /// `iqmp * R mod p`.
    #[inline]
    pub fn iqmp_mont(&self) -> &BigUint {
        &self.iqmp_mont
    }

    /// `q * R mod n`.
    #[inline]
    pub fn qmn_mont(&self) -> &BigUint {
        &self.qmn_mont
    }
}
