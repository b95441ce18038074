//! Utility and helper functions needed for:
//! - Error handling
//! - Type casting between candid and EVM-style integers
//! - Checked percentage math

pub(crate) mod common;
pub(crate) mod error;
