//! Pure numeric operations behind the `fibonacci`, `prime`, `hcf` and `lcm`
//! keys, plus the JSON argument checks each of them enforces.

use num_bigint::BigUint;
use serde_json::{Number, Value};

use crate::error::BfhlError;

/// Largest accepted Fibonacci count. Terms are unbounded integers, so the cap
/// only bounds response size (F(4999) has 1045 digits).
pub const MAX_FIBONACCI_COUNT: u64 = 5_000;

const NON_EMPTY_ARRAY: &str = "Input must be a non-empty array";
const POSITIVE_VALUES: &str = "All values must be positive integers";

/// First `n` terms of `0, 1, 1, 2, 3, ...`.
pub fn fibonacci(n: u64) -> Result<Vec<BigUint>, BfhlError> {
    if n > MAX_FIBONACCI_COUNT {
        return Err(BfhlError::invalid_argument(format!(
            "Fibonacci input must not exceed {MAX_FIBONACCI_COUNT}"
        )));
    }

    let mut terms: Vec<BigUint> = Vec::with_capacity(n as usize);
    for i in 0..n as usize {
        let term = match i {
            0 | 1 => BigUint::from(i),
            _ => &terms[i - 1] + &terms[i - 2],
        };
        terms.push(term);
    }
    Ok(terms)
}

/// Exact JSON number for an unbounded integer. Relies on serde_json's
/// `arbitrary_precision` so digits past `u64` are kept verbatim.
pub fn json_number(value: &BigUint) -> Result<Number, BfhlError> {
    serde_json::from_str(&value.to_string())
        .map_err(|e| BfhlError::invalid_argument(format!("Unrepresentable number: {e}")))
}

/// Primality over the integers accepted as input (`i64::MIN..=u64::MAX`).
/// Anything below 2, or outside `u64`, is not prime.
pub fn is_prime(x: i128) -> bool {
    u64::try_from(x).is_ok_and(is_prime_u64)
}

const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

// Miller-Rabin with the first twelve primes as bases is exact for every u64.
fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Keeps the primes of `values`, in order, duplicates included.
pub fn filter_primes(values: &[i128]) -> Vec<i128> {
    values.iter().copied().filter(|&v| is_prime(v)).collect()
}

pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

pub fn hcf(values: &[u64]) -> Result<u64, BfhlError> {
    let (first, rest) = split_positive(values)?;
    Ok(rest.iter().fold(first, |acc, &v| gcd(acc, v)))
}

pub fn lcm(values: &[u64]) -> Result<u64, BfhlError> {
    let (first, rest) = split_positive(values)?;
    rest.iter().try_fold(first, |acc, &v| {
        (acc / gcd(acc, v))
            .checked_mul(v)
            .ok_or_else(|| BfhlError::invalid_argument("LCM result is too large"))
    })
}

fn split_positive(values: &[u64]) -> Result<(u64, &[u64]), BfhlError> {
    let (&first, rest) = values
        .split_first()
        .ok_or_else(|| BfhlError::invalid_argument(NON_EMPTY_ARRAY))?;
    if values.contains(&0) {
        return Err(BfhlError::invalid_argument(POSITIVE_VALUES));
    }
    Ok((first, rest))
}

/// Reads a JSON number as an integer in `i64::MIN..=u64::MAX`. Floats count
/// when they carry no fractional part, so `5.0` reads as `5`.
pub fn as_integer(value: &Value) -> Option<i128> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < u64::MAX as f64)
                .map(|f| f as i128)
        })
}

pub fn fibonacci_count(value: &Value) -> Result<u64, BfhlError> {
    as_integer(value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| BfhlError::invalid_argument("Fibonacci input must be a non-negative integer"))
}

pub fn integer_list(value: &Value) -> Result<Vec<i128>, BfhlError> {
    let invalid = || BfhlError::invalid_argument("Prime input must be an array of integers");
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| as_integer(v).ok_or_else(invalid))
        .collect()
}

/// Validates the `hcf`/`lcm` argument: a non-empty array of positive integers.
pub fn positive_list(value: &Value) -> Result<Vec<u64>, BfhlError> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| BfhlError::invalid_argument(NON_EMPTY_ARRAY))?;

    items
        .iter()
        .map(|v| {
            as_integer(v)
                .filter(|&n| n > 0)
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| BfhlError::invalid_argument(POSITIVE_VALUES))
        })
        .collect()
}
