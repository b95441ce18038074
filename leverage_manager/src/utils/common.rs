//! Common utility and helper functions that are used across the project

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use candid::Nat;
use num_bigint::BigUint;

use super::error::*;

/// Converts String to Address and returns ManagerError on failure
pub fn string_to_address(input: String) -> ManagerResult<Address> {
    Address::from_str(&input).map_err(|err| ManagerError::DecodingError(format!("{:#?}", err)))
}

/// Parses a decimal or `0x`-prefixed hex string into `U256`
pub fn string_to_u256(input: &str) -> ManagerResult<U256> {
    U256::from_str(input.trim()).map_err(|err| ManagerError::DecodingError(format!("{:#?}", err)))
}

/// Converts values of type `U256` to `Nat`
pub fn u256_to_nat(value: &U256) -> Nat {
    Nat::from(BigUint::from_bytes_be(&value.to_be_bytes::<32>()))
}

/// Computes `value * numerator / denominator` without wraparound.
pub fn mul_div(value: U256, numerator: U256, denominator: U256) -> ManagerResult<U256> {
    value
        .checked_mul(numerator)
        .ok_or_else(|| arithmetic_err("Multiplication overflowed."))?
        .checked_div(denominator)
        .ok_or_else(|| arithmetic_err("Denominator was zero."))
}

/// Subtracts `rhs` from `lhs`, failing instead of wrapping when `rhs > lhs`.
pub fn checked_sub<S: AsRef<str>>(lhs: U256, rhs: U256, context: S) -> ManagerResult<U256> {
    lhs.checked_sub(rhs).ok_or_else(|| {
        arithmetic_err(format!(
            "{}: {} - {} underflowed.",
            context.as_ref(),
            lhs,
            rhs
        ))
    })
}
