//! Multi-precision modular arithmetic for RSA.
//!
//! This crate implements the arithmetic that RSA signing in CRT form is
//! built out of: signed and unsigned big integers with schoolbook
//! multiplication and Knuth-style long division, Montgomery-form
//! conversion and CIOS multiplication, windowed modular exponentiation in
//! a variable-time flavor for public exponents and a fixed-window
//! constant-time flavor for secret ones, binary-GCD modular inversion
//! with a blinded wrapper, and an RSA key consistency check.
//!
//! The constant-time exponentiation keeps its power table in a single
//! cache-line-aligned buffer with the limbs of all entries interleaved,
//! and fetches entries with masked reads, so the memory-access pattern and
//! branch trace depend only on the exponent's bit length.
//!
//! # Example
//!
//! ```
//! use bigmod::{mod_exp_consttime, BigUint, MontyReducer};
//!
//! // 2^10 mod 1001
//! let (m, _) = BigUint::parse_hex("3E9").unwrap();
//! let (a, _) = BigUint::parse_hex("2").unwrap();
//! let (e, _) = BigUint::parse_hex("A").unwrap();
//!
//! let ctx = MontyReducer::new(&m).unwrap();
//! let r = mod_exp_consttime(&a, &e, &ctx).unwrap();
//! assert_eq!(r.to_hex(), "17");
//! ```

#[macro_use]
mod macros;

mod algorithms;
mod bigint;
mod biguint;
mod consttime;
mod error;
mod inverse;
mod modexp;
mod monty;
mod rsa;

pub mod big_digit;
pub mod bigrand;

pub use crate::bigint::{BigInt, Sign};
pub use crate::bigrand::RandBigInt;
pub use crate::biguint::BigUint;
pub use crate::error::{Error, Result};
pub use crate::inverse::{mod_inverse_blinded, mod_inverse_odd};
pub use crate::modexp::{mod_exp_consttime, mod_exp_vartime};
pub use crate::monty::MontyReducer;
pub use crate::rsa::{RsaKey, RsaKeyParams};
