use candid::CandidType;
use serde::Deserialize;

/// Leverage Manager Result
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Leverage Manager Errors
#[derive(Clone, CandidType, Debug, Deserialize, PartialEq)]
pub enum ManagerError {
    /// Unauthorized access
    Unauthorized,
    /// Rate, depth or fee configuration outside of the allowed bounds
    Configuration(String),
    /// A sub-call to the lending market, the rewards market or the token ledger failed
    ExternalMarket(String),
    /// Arithmetic error
    Arithmetic(String),
    /// The unwind math would divide by a zero borrow rate while debt is outstanding
    ZeroBorrowRate,
    /// The bounded unwind loop ran out of rounds before the debt could be repaid
    DeleverageDidNotConverge,
    /// The entry point is not allowed in the current lifecycle status
    InvalidState(String),
    /// Decoding issue
    DecodingError(String),
    /// Strategy is locked
    Locked,
    /// Unknown/Custom error
    Custom(String),
}

pub fn arithmetic_err<S: AsRef<str>>(s: S) -> ManagerError {
    ManagerError::Arithmetic(format!("{:#?}", s.as_ref()))
}

pub fn market_err<S: AsRef<str>>(s: S) -> ManagerError {
    ManagerError::ExternalMarket(s.as_ref().to_string())
}

pub fn config_err<S: AsRef<str>>(s: S) -> ManagerError {
    ManagerError::Configuration(s.as_ref().to_string())
}
