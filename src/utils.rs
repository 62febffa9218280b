use serde::{Deserialize, Serialize};

use crate::error::CustomError;

pub fn des_from_str<T: for<'a> Deserialize<'a>>(body: &str) -> Result<T, CustomError> {
    Ok(serde_json::from_str(body)?)
}

pub fn ser_to_str<T: Serialize>(t: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(t)
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn error_body(err: &CustomError) -> String {
    let message = err.to_string();
    ser_to_str(&ErrorBody { error: &message }).unwrap_or_default()
}
