//! Modular exponentiation.
//!
//! Two variants over a Montgomery reducer: a sliding-window form whose
//! branching follows the exponent bits (public exponents only), and a
//! fixed-window form whose branch trace and memory-access pattern depend
//! only on the exponent's bit length (safe for secret exponents; cf. the
//! hyper-threading timing attacks pointed out by Colin Percival).

use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::big_digit::{self, BigDigit};
use crate::biguint::BigUint;
use crate::consttime;
use crate::error::{Error, Result};
use crate::monty::MontyReducer;

/// The fixed-window path assumes L1 data cache lines of at least this many
/// bytes.
const CACHE_LINE_BYTES: usize = 64;
const CACHE_LINE_WORDS: usize = CACHE_LINE_BYTES / big_digit::BYTES;

// For a random b-bit exponent and window size w, the multiplication count
// is roughly 2^(w-1) + (b-w)/(w+1); these cutovers minimize it. Very small
// exponents are often chosen with low Hamming weight, hence w = 1 at the
// bottom.
fn window_bits_vartime(b: usize) -> usize {
    if b > 671 {
        6
    } else if b > 239 {
        5
    } else if b > 79 {
        4
    } else if b > 23 {
        3
    } else {
        1
    }
}

// Fixed-window cutovers. The window never exceeds log2(CACHE_LINE_BYTES),
// the largest size for which the strided table layout keeps every fetch
// pattern identical at cache-line granularity.
fn window_bits_consttime(b: usize) -> usize {
    if b > 937 {
        6
    } else if b > 306 {
        5
    } else if b > 89 {
        4
    } else if b > 22 {
        3
    } else {
        1
    }
}

/// `1 mod m` in Montgomery form, i.e. `R mod m`.
fn mont_one(ctx: &MontyReducer) -> BigUint {
    let m = ctx.modulus();
    if m.is_one() {
        return BigUint::zero();
    }
    let top = ctx.top();
    if m.is_bit_set(top * big_digit::BITS - 1) {
        // When the modulus fills its top limb, R mod m is just R - m
        // (Shay Gueron's observation); no reduction needed.
        (BigUint::one() << (top * big_digit::BITS)) - m
    } else {
        ctx.to_mont(&BigUint::one())
    }
}

/// Modular exponentiation `a^exp mod m` with exponent-dependent branching.
///
/// `exp = 0` returns `1 mod m` without examining `a`; otherwise `a` must
/// be reduced (`InputNotReduced`). Must not be used when `exp` is secret.
pub fn mod_exp_vartime(a: &BigUint, exp: &BigUint, ctx: &MontyReducer) -> Result<BigUint> {
    let m = ctx.modulus();
    let bits = exp.bits();
    if bits == 0 {
        // x^0 mod 1 is still zero.
        return Ok(if m.is_one() {
            BigUint::zero()
        } else {
            BigUint::one()
        });
    }
    if a >= m {
        return Err(Error::InputNotReduced);
    }
    if a.is_zero() {
        return Ok(BigUint::zero());
    }

    let window = window_bits_vartime(bits);

    // Only odd powers are tabulated: a, a^3, ..., a^(2^window - 1).
    let mut val = Vec::with_capacity(1 << (window - 1));
    val.push(ctx.to_mont(a));
    if window > 1 {
        let d = ctx.sqr(&val[0]);
        for i in 1..1 << (window - 1) {
            let next = ctx.mul(&val[i - 1], &d);
            val.push(next);
        }
    }

    let mut r = mont_one(ctx);
    let mut start = true;
    let mut wstart = bits as isize - 1;

    loop {
        if !exp.is_bit_set(wstart as usize) {
            if !start {
                r = ctx.sqr(&r);
            }
            if wstart == 0 {
                break;
            }
            wstart -= 1;
            continue;
        }

        // The top bit of the window is set; scan ahead for the last set
        // bit that still fits, so the tabulated (odd) power is as large as
        // possible.
        let mut wvalue = 1usize;
        let mut wend = 0usize;
        for i in 1..window {
            if wstart < i as isize {
                break;
            }
            if exp.is_bit_set((wstart - i as isize) as usize) {
                wvalue = (wvalue << (i - wend)) | 1;
                wend = i;
            }
        }

        if !start {
            for _ in 0..wend + 1 {
                r = ctx.sqr(&r);
            }
        }
        r = ctx.mul(&r, &val[wvalue >> 1]);

        wstart -= wend as isize + 1;
        start = false;
        if wstart < 0 {
            break;
        }
    }

    Ok(ctx.from_mont(&r))
}

/// Writes the `top`-limb value `src` as entry `idx` of the strided table:
/// limb `j` lands at offset `j * width + idx`.
fn scatter(table: &mut [BigDigit], width: usize, idx: usize, src: &[BigDigit]) {
    for (j, &w) in src.iter().enumerate() {
        table[j * width + idx] = w;
    }
}

/// Reads entry `idx` into `dst` by touching every entry under a
/// constant-time equality mask; the access pattern is the same for every
/// index.
fn gather(dst: &mut [BigDigit], table: &[BigDigit], width: usize, window: usize, idx: usize) {
    if window <= 3 {
        for (j, d) in dst.iter_mut().enumerate() {
            let row = &table[j * width..(j + 1) * width];
            let mut acc = 0;
            for (k, &w) in row.iter().enumerate() {
                acc |= w & consttime::eq(k as BigDigit, idx as BigDigit);
            }
            *d = acc;
        }
    } else {
        // Quadrant split: the two high index bits pick one of four
        // sub-masks and the rest select within the quadrant. A quarter of
        // the masked reads of the plain loop, still index-independent.
        let xstride = 1usize << (window - 2);
        let hi = (idx >> (window - 2)) as BigDigit;
        let lo = idx & (xstride - 1);

        let y0 = consttime::eq(hi, 0);
        let y1 = consttime::eq(hi, 1);
        let y2 = consttime::eq(hi, 2);
        let y3 = consttime::eq(hi, 3);

        for (j, d) in dst.iter_mut().enumerate() {
            let row = &table[j * width..(j + 1) * width];
            let mut acc = 0;
            for k in 0..xstride {
                let quads = (row[k] & y0)
                    | (row[k + xstride] & y1)
                    | (row[k + 2 * xstride] & y2)
                    | (row[k + 3 * xstride] & y3);
                acc |= quads & consttime::eq(k as BigDigit, lo as BigDigit);
            }
            *d = acc;
        }
    }
}

/// Modular exponentiation `a^exp mod m` for secret exponents.
///
/// Fixed windows over a power table laid out so that limb `j` of every
/// entry shares one stride of `2^w` limbs, cache-line aligned; table reads
/// are masked rather than indexed. For two exponents of equal bit length
/// the executed branches and the sequence of memory accesses are
/// identical; only ALU inputs inside masked operations differ.
///
/// Same contract as [`mod_exp_vartime`]: `exp = 0` returns `1 mod m`
/// without examining `a`, any other `a >= m` is rejected.
pub fn mod_exp_consttime(a: &BigUint, exp: &BigUint, ctx: &MontyReducer) -> Result<BigUint> {
    let m = ctx.modulus();
    let bits = exp.bits();
    if bits == 0 {
        // x^0 mod 1 is still zero.
        return Ok(if m.is_one() {
            BigUint::zero()
        } else {
            BigUint::one()
        });
    }
    if a >= m {
        return Err(Error::InputNotReduced);
    }

    let top = ctx.top();
    let window = window_bits_consttime(bits);
    let width = 1usize << window;
    let table_words = top * width;

    // One buffer holds the power table and, right after it, the two
    // accumulator slots; everything sensitive lives here and is wiped on
    // the way out.
    let mut storage: Vec<BigDigit> = vec![0; table_words + 2 * top + CACHE_LINE_WORDS];
    let misalign = storage.as_ptr() as usize & (CACHE_LINE_BYTES - 1);
    let off = ((CACHE_LINE_BYTES - misalign) & (CACHE_LINE_BYTES - 1)) / big_digit::BYTES;
    let mut scratch: Vec<BigDigit> = vec![0; top + 2];

    let result = {
        let buf = &mut storage[off..off + table_words + 2 * top];
        let (table, slots) = buf.split_at_mut(table_words);
        let (acc, am) = slots.split_at_mut(top);

        // Entry 0 is 1 in Montgomery form, entry 1 is a; entry i is built
        // as entry(i-1) * a.
        let r0 = mont_one(ctx);
        acc[..r0.data.len()].copy_from_slice(&r0.data);
        let a_mont = ctx.to_mont(a);
        am[..a_mont.data.len()].copy_from_slice(&a_mont.data);

        scatter(table, width, 0, acc);
        scatter(table, width, 1, am);
        if window > 1 {
            ctx.cios(&mut scratch, am, am);
            ctx.reduce_select(acc, &scratch);
            scatter(table, width, 2, acc);
            for i in 3..width {
                ctx.cios(&mut scratch, acc, am);
                ctx.reduce_select(acc, &scratch);
                scatter(table, width, i, acc);
            }
        }

        // Pre-load the leading (bits - 1) mod window + 1 exponent bits and
        // gather the starting accumulator.
        let mut b = bits as isize - 1;
        let mut wvalue = 0usize;
        let mut i = b % window as isize;
        while i >= 0 {
            wvalue = (wvalue << 1) | exp.is_bit_set(b as usize) as usize;
            b -= 1;
            i -= 1;
        }
        gather(acc, table, width, window, wvalue);

        // One full window per iteration: `window` squarings, one masked
        // fetch, one multiplication.
        while b >= 0 {
            wvalue = 0;
            for _ in 0..window {
                ctx.cios(&mut scratch, acc, acc);
                ctx.reduce_select(acc, &scratch);
                wvalue = (wvalue << 1) | exp.is_bit_set(b as usize) as usize;
                b -= 1;
            }
            gather(am, table, width, window, wvalue);
            ctx.cios(&mut scratch, acc, am);
            ctx.reduce_select(acc, &scratch);
        }

        // Convert back to standard form; the correction inside
        // reduce_select is already constant-time.
        let mut one = vec![0; top];
        one[0] = 1;
        ctx.cios(&mut scratch, acc, &one);
        ctx.reduce_select(acc, &scratch);
        BigUint::from_slice(acc)
    };

    storage.zeroize();
    scratch.zeroize();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> BigUint {
        BigUint::parse_hex(s).unwrap().0
    }

    fn reducer(s: &str) -> MontyReducer {
        MontyReducer::new(&hex(s)).unwrap()
    }

    #[test]
    fn test_window_bits() {
        assert_eq!(window_bits_vartime(672), 6);
        assert_eq!(window_bits_vartime(671), 5);
        assert_eq!(window_bits_vartime(240), 5);
        assert_eq!(window_bits_vartime(80), 4);
        assert_eq!(window_bits_vartime(24), 3);
        assert_eq!(window_bits_vartime(23), 1);

        assert_eq!(window_bits_consttime(938), 6);
        assert_eq!(window_bits_consttime(937), 5);
        assert_eq!(window_bits_consttime(307), 5);
        assert_eq!(window_bits_consttime(90), 4);
        assert_eq!(window_bits_consttime(23), 3);
        assert_eq!(window_bits_consttime(22), 1);
    }

    #[test]
    fn test_small_vector() {
        // 2^10 mod 1001 = 23
        let ctx = reducer("3E9");
        let a = hex("2");
        let e = hex("A");
        assert_eq!(mod_exp_vartime(&a, &e, &ctx).unwrap(), hex("17"));
        assert_eq!(mod_exp_consttime(&a, &e, &ctx).unwrap(), hex("17"));
    }

    #[test]
    fn test_zero_exponent() {
        let e = BigUint::zero();
        let any = hex("123456");

        let one_ctx = reducer("1");
        assert_eq!(mod_exp_vartime(&any, &e, &one_ctx).unwrap(), BigUint::zero());
        assert_eq!(
            mod_exp_consttime(&any, &e, &one_ctx).unwrap(),
            BigUint::zero()
        );

        let ctx = reducer("3E9");
        assert_eq!(mod_exp_vartime(&any, &e, &ctx).unwrap(), BigUint::one());
        assert_eq!(mod_exp_consttime(&any, &e, &ctx).unwrap(), BigUint::one());
    }

    #[test]
    fn test_zero_base() {
        let ctx = reducer("3E9");
        let e = hex("5");
        let z = BigUint::zero();
        assert_eq!(mod_exp_vartime(&z, &e, &ctx).unwrap(), BigUint::zero());
        assert_eq!(mod_exp_consttime(&z, &e, &ctx).unwrap(), BigUint::zero());
    }

    #[test]
    fn test_rejects_unreduced() {
        let ctx = reducer("3E9");
        let e = hex("5");
        assert_eq!(
            mod_exp_vartime(&hex("3E9"), &e, &ctx),
            Err(Error::InputNotReduced)
        );
        assert_eq!(
            mod_exp_consttime(&hex("1000"), &e, &ctx),
            Err(Error::InputNotReduced)
        );
    }

    #[test]
    fn test_matches_repeated_multiplication() {
        let m = hex("FB");
        let ctx = reducer("FB");
        for a in 1u64..20 {
            for e in 0u64..12 {
                let mut expect = BigUint::one();
                for _ in 0..e {
                    let prod = &expect * &BigUint::from(a);
                    expect = prod.div_rem(&m).unwrap().1;
                }
                let a = BigUint::from(a);
                let e = BigUint::from(e);
                assert_eq!(mod_exp_vartime(&a, &e, &ctx).unwrap(), expect);
                assert_eq!(mod_exp_consttime(&a, &e, &ctx).unwrap(), expect);
            }
        }
    }

    #[test]
    fn test_variants_agree_across_window_sizes() {
        // Exponent lengths straddling every fixed-window cutover.
        let m = hex("D131BFA0581CD2B632645ACB08B3CFD633A6EDB83D455C2FD4E88B5A4A564F89");
        let ctx = MontyReducer::new(&m).unwrap();
        let a = hex("4E3EBAC901299B2DCE2EF997742ACD0013726A4B07F81E96D0F416A361DB30CE");
        let mut e = BigUint::from(0x9D);
        while e.bits() < 1100 {
            let vt = mod_exp_vartime(&a, &e, &ctx).unwrap();
            let ct = mod_exp_consttime(&a, &e, &ctx).unwrap();
            assert_eq!(vt, ct, "disagreement at {} exponent bits", e.bits());
            // Roughly doubles the bit length each round, crossing every
            // fixed-window cutover on the way up.
            let sq = e.sqr();
            e = &sq + &e;
        }
    }
}
