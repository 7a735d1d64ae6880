//! Display codes for numeric identifiers
//!
//! Maps an integer ID to a fixed-width 5-digit code by multiplying with a
//! prime modulo 100 000, and back with the prime's modular inverse. The
//! mapping is a bijection on `0..100_000`; larger IDs wrap.

use thiserror::Error;

use crate::config::defaults::{CODE_MODULO, CODE_PRIME, CODE_WIDTH};

/// Inverse of `CODE_PRIME` modulo `CODE_MODULO`, checked at compile time.
pub const CODE_PRIME_INVERSE: u64 = match modular_inverse(CODE_PRIME, CODE_MODULO) {
    Some(inv) => inv,
    None => panic!("CODE_PRIME must be coprime to CODE_MODULO"),
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Invalid code '{0}': expected {} decimal digits", CODE_WIDTH)]
    Malformed(String),
}

/// Extended Euclid. `None` when `a` and `m` share a factor.
pub const fn modular_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    let (mut old_r, mut r) = (a as i128 % m as i128, m as i128);
    let (mut old_s, mut s) = (1_i128, 0_i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(m as i128) as u64)
}

/// Encode an ID as a zero-padded 5-digit code.
pub fn id_to_code(id: u64) -> String {
    let value = (id % CODE_MODULO) * CODE_PRIME % CODE_MODULO;
    format!("{value:0CODE_WIDTH$}")
}

/// Decode a 5-digit code back to the ID it was produced from.
pub fn code_to_id(code: &str) -> Result<u64, CodeError> {
    let trimmed = code.trim();
    if trimmed.len() != CODE_WIDTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodeError::Malformed(code.to_string()));
    }
    let value: u64 = trimmed
        .parse()
        .map_err(|_| CodeError::Malformed(code.to_string()))?;
    Ok(value * CODE_PRIME_INVERSE % CODE_MODULO)
}
