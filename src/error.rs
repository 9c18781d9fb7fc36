use std::error;
use std::fmt;
use std::result;

/// The failure conditions surfaced by the arithmetic and key-checking
/// routines. Every fallible operation reports one of these; on failure the
/// named output must be treated as undefined in value (it is always safe to
/// drop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Division or reduction by zero.
    DivByZero,
    /// A Montgomery operation was asked to use an even (or zero) modulus.
    CalledWithEvenModulus,
    /// An operand that must be in `[0, m)` was not.
    InputNotReduced,
    /// An operand's digit vector had a zero most-significant limb; the
    /// value was never normalized and cannot be trusted.
    NotInitialized,
    /// The output buffer cannot hold the serialized value.
    BufferTooSmall,
    /// The RSA modulus or public exponent is outside the supported range.
    BadRsaParameters,
    /// The RSA key's `p * q` does not equal `n`.
    NNotEqualPQ,
    /// One of `dmp1`, `dmq1`, `iqmp` is inconsistent with `p`, `q`, `d`.
    CrtValuesIncorrect,
    /// The operand has no inverse modulo the given modulus.
    NoInverse,
}

pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::DivByZero => "division by zero",
            Error::CalledWithEvenModulus => "modulus is even",
            Error::InputNotReduced => "input not reduced modulo the modulus",
            Error::NotInitialized => "operand is not normalized",
            Error::BufferTooSmall => "output buffer too small",
            Error::BadRsaParameters => "RSA parameters out of range",
            Error::NNotEqualPQ => "n is not equal to p*q",
            Error::CrtValuesIncorrect => "RSA CRT values are inconsistent",
            Error::NoInverse => "no modular inverse exists",
        };
        f.write_str(msg)
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        "big integer arithmetic error"
    }
}
