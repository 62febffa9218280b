use async_trait::async_trait;
use tracing::{debug, info};

use super::model::Account;
use super::repository::AccountRepository;
use crate::{db::Database, error::CustomError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Accounts matching every filter that is present.
    async fn get_accounts(
        &self,
        name: Option<String>,
        account_number: Option<String>,
    ) -> Result<Vec<Account>, CustomError>;

    /// Stores a new account and returns it with its assigned id.
    async fn add_account(&self, account: Account) -> Result<Account, CustomError>;

    async fn update_account(&self, account: Account) -> Result<(), CustomError>;

    async fn delete_account(&self, id: String) -> Result<(), CustomError>;
}

pub struct SqlAccountService {
    repository: AccountRepository,
}

impl SqlAccountService {
    pub fn new(repository: AccountRepository) -> Self {
        SqlAccountService { repository }
    }
}

fn parse_id(id: &str) -> Result<i64, CustomError> {
    id.parse()
        .map_err(|_| CustomError::AccountNotFound(id.to_string()))
}

#[async_trait]
impl AccountService for SqlAccountService {
    async fn get_accounts(
        &self,
        name: Option<String>,
        account_number: Option<String>,
    ) -> Result<Vec<Account>, CustomError> {
        Database::log_pool_stats(self.repository.pool());
        let accounts = self
            .repository
            .find(name.as_deref(), account_number.as_deref())
            .await?;
        debug!(count = accounts.len(), "accounts fetched");
        Ok(accounts)
    }

    async fn add_account(&self, account: Account) -> Result<Account, CustomError> {
        let id = self.repository.insert(&account).await?;
        info!(id, "account created");
        Ok(account.with_id(id.to_string()))
    }

    async fn update_account(&self, account: Account) -> Result<(), CustomError> {
        let raw_id = account.id.clone().unwrap_or_default();
        let id = parse_id(&raw_id)?;
        match self.repository.update(id, &account).await? {
            0 => Err(CustomError::AccountNotFound(raw_id)),
            _ => {
                info!(id, "account updated");
                Ok(())
            }
        }
    }

    async fn delete_account(&self, id: String) -> Result<(), CustomError> {
        let numeric = parse_id(&id)?;
        match self.repository.delete(numeric).await? {
            0 => Err(CustomError::AccountNotFound(id)),
            _ => {
                info!(id = numeric, "account deleted");
                Ok(())
            }
        }
    }
}
