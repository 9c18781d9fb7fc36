//! Modular inversion.

use num_traits::{One, Zero};
use rand::Rng;

use crate::bigint::BigInt;
use crate::bigrand::RandBigInt;
use crate::biguint::BigUint;
use crate::error::{Error, Result};
use crate::monty::MontyReducer;

/// Inverse of `a` modulo the odd modulus `m`, by binary extended GCD.
///
/// Requires `0 < a < m`. Fails with `NoInverse` when `gcd(a, m) != 1`.
/// The running time depends on the operand values; callers with a secret
/// operand use [`mod_inverse_blinded`] instead.
///
/// Reference:
/// Menezes et al., Handbook of Applied Cryptography, Algorithm 14.61,
/// specialized for odd `m` so only one cofactor per side is tracked: a
/// cofactor is kept even before halving by adding `m` when it is odd.
pub fn mod_inverse_odd(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() || !m.is_odd() {
        return Err(Error::CalledWithEvenModulus);
    }
    if a.is_zero() {
        return Err(Error::NoInverse);
    }
    if a >= m {
        return Err(Error::InputNotReduced);
    }

    let mi = BigInt::from(m.clone());
    let mut u = a.clone();
    let mut v = m.clone();
    let mut x1 = BigInt::one();
    let mut x2 = BigInt::zero();

    // Invariants: x1 * a == u (mod m) and x2 * a == v (mod m).
    while !u.is_zero() {
        while u.is_even() {
            u = &u >> 1;
            x1 = if x1.is_odd() {
                (&x1 + &mi).rshift1()
            } else {
                x1.rshift1()
            };
        }
        while v.is_even() {
            v = &v >> 1;
            x2 = if x2.is_odd() {
                (&x2 + &mi).rshift1()
            } else {
                x2.rshift1()
            };
        }
        if u >= v {
            u = &u - &v;
            x1 = &x1 - &x2;
        } else {
            v = &v - &u;
            x2 = &x2 - &x1;
        }
    }

    // v now holds gcd(a, m).
    if !v.is_one() {
        return Err(Error::NoInverse);
    }
    x2.nnmod(&mi)
}

/// Inverse of `a` modulo the reducer's modulus, with the operand masked by
/// a uniform nonzero factor `b < m` so the variable-time GCD only ever
/// sees `a * b`: computes `(a * b)^-1 * b`.
pub fn mod_inverse_blinded<R: Rng + ?Sized>(
    a: &BigUint,
    ctx: &MontyReducer,
    rng: &mut R,
) -> Result<BigUint> {
    let m = ctx.modulus();
    if a.is_zero() {
        return Err(Error::NoInverse);
    }
    if a >= m {
        return Err(Error::InputNotReduced);
    }

    let mut blind = rng.gen_biguint_below(m);
    while blind.is_zero() {
        blind = rng.gen_biguint_below(m);
    }

    let blind_mont = ctx.to_mont(&blind);
    // One operand in Montgomery form, so the R factors cancel: this is
    // a * blind mod m.
    let masked = ctx.mul(a, &blind_mont);
    let inv = mod_inverse_odd(&masked, m)?;
    Ok(ctx.mul(&inv, &blind_mont))
}
