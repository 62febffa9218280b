use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Cash,
    Savings,
    Checking,
    Credit,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "CASH",
            AccountType::Savings => "SAVINGS",
            AccountType::Checking => "CHECKING",
            AccountType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CASH" => Ok(AccountType::Cash),
            "SAVINGS" => Ok(AccountType::Savings),
            "CHECKING" => Ok(AccountType::Checking),
            "CREDIT" => Ok(AccountType::Credit),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Option<String>,
    pub account_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub active: bool,
}

impl Account {
    pub fn new(
        id: Option<String>,
        account_number: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        active: bool,
    ) -> Self {
        Self {
            id,
            account_number: account_number.into(),
            name: name.into(),
            account_type,
            active,
        }
    }

    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..self.clone()
        }
    }
}

/// Row shape of the `accounts` table. `active` is read back as an integer
/// since the Any driver cannot decode SQLite booleans.
#[derive(Debug, sqlx::FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub account_number: String,
    pub name: String,
    pub account_type: String,
    pub active: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = String;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: Some(row.id.to_string()),
            account_number: row.account_number,
            name: row.name,
            account_type: row.account_type.parse()?,
            active: row.active != 0,
        })
    }
}
