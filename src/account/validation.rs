use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Account;
use crate::constants::{ACCOUNT_NUMBER_PARAM, NAME_PARAM};
use crate::error::CustomError;

static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("account number pattern"));

// Letters, optionally separated by single spaces.
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}+( \p{L}+)*$").expect("name pattern"));

pub fn validate_account_number(value: &str) -> Result<(), CustomError> {
    if ACCOUNT_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(CustomError::invalid_param(ACCOUNT_NUMBER_PARAM, value))
    }
}

pub fn validate_name(value: &str) -> Result<(), CustomError> {
    if NAME.is_match(value) {
        Ok(())
    } else {
        Err(CustomError::invalid_param(NAME_PARAM, value))
    }
}

/// Field checks shared by create and update bodies.
pub fn validate_account(account: &Account) -> Result<(), CustomError> {
    validate_account_number(&account.account_number)?;
    validate_name(&account.name)
}
